//! Error types for the pdf2img library.
//!
//! One enum covers the whole pipeline. Every variant maps to exactly one of
//! the failure classes the HTTP layer distinguishes (bad input, failed
//! remote fetch, undecodable document, failed page render) — the mapping to
//! status codes lives in [`crate::server`] so the library itself stays
//! HTTP-free. Any failure aborts the whole conversion: there is no partial
//! image list, no retry, no per-page error collection.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2img library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Multipart form did not contain a `pdf` file field.
    #[error("no PDF file provided")]
    MissingFile,

    /// JSON body contained neither a `pdf` nor a `url` field.
    #[error("no PDF data provided")]
    MissingData,

    /// JSON body contained both `pdf` and `url`; the input shapes are
    /// mutually exclusive.
    #[error("request carries both 'pdf' and 'url'; provide exactly one")]
    AmbiguousInput,

    /// The `pdf` field was not decodable base64 (after stripping any
    /// data-URI header).
    #[error("PDF field is not valid base64: {detail}")]
    InvalidBase64 { detail: String },

    /// Request content type is none of the accepted forms.
    #[error("unsupported content type '{content_type}'")]
    UnsupportedContentType { content_type: String },

    /// Request body was not parseable as JSON.
    #[error("request body is not valid JSON: {detail}")]
    InvalidJson { detail: String },

    /// Request body could not be read, or exceeded the configured size cap.
    #[error("failed to read request body: {detail}")]
    Body { detail: String },

    /// Multipart form could not be read.
    #[error("failed to read multipart form: {detail}")]
    Multipart { detail: String },

    // ── Fetch errors ──────────────────────────────────────────────────────
    /// URL-sourced input could not be fetched: network failure, timeout, or
    /// a non-success upstream status. The upstream status/message is kept in
    /// `reason` so the caller can see what its own upstream returned.
    #[error("failed to fetch PDF from '{url}': {reason}")]
    Fetch { url: String, reason: String },

    // ── Decode errors ─────────────────────────────────────────────────────
    /// The resolved bytes do not start with the `%PDF` magic.
    #[error("payload is not a PDF document (first bytes: {magic:?})")]
    NotAPdf { magic: [u8; 4] },

    /// pdfium could not parse the byte stream as a PDF.
    #[error("PDF document could not be parsed: {detail}")]
    Decode { detail: String },

    // ── Render errors ─────────────────────────────────────────────────────
    /// pdfium failed while rasterising a specific page.
    #[error("rasterisation failed for page {page}: {detail}")]
    Render { page: usize, detail: String },

    /// A rendered surface could not be encoded to PNG/JPEG.
    #[error("image encoding failed for page {page}: {detail}")]
    Encode { page: usize, detail: String },

    // ── I/O errors (CLI path) ─────────────────────────────────────────────
    /// A local input file could not be read.
    #[error("failed to read PDF file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Backend errors ────────────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "failed to bind to a pdfium library: {0}\n\
Set PDFIUM_LIB_PATH to the directory containing libpdfium, or install \
pdfium as a system library."
    )]
    PdfiumBinding(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    /// True for failures caused by the request itself (missing field, bad
    /// base64, unreachable URL) rather than by the document or the backend.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ConvertError::MissingFile
                | ConvertError::MissingData
                | ConvertError::AmbiguousInput
                | ConvertError::InvalidBase64 { .. }
                | ConvertError::UnsupportedContentType { .. }
                | ConvertError::InvalidJson { .. }
                | ConvertError::Body { .. }
                | ConvertError::Multipart { .. }
                | ConvertError::Fetch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_display_keeps_upstream_reason() {
        let e = ConvertError::Fetch {
            url: "https://example.com/doc.pdf".into(),
            reason: "HTTP 404 Not Found".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("example.com"), "got: {msg}");
        assert!(msg.contains("404"), "got: {msg}");
    }

    #[test]
    fn render_display_names_the_page() {
        let e = ConvertError::Render {
            page: 3,
            detail: "bitmap allocation failed".into(),
        };
        assert!(e.to_string().contains("page 3"));
    }

    #[test]
    fn not_a_pdf_shows_magic_bytes() {
        let e = ConvertError::NotAPdf {
            magic: *b"<htm",
        };
        assert!(e.to_string().contains("not a PDF"));
    }

    #[test]
    fn input_classification() {
        assert!(ConvertError::MissingData.is_input_error());
        assert!(ConvertError::Fetch {
            url: "x".into(),
            reason: "y".into()
        }
        .is_input_error());
        assert!(!ConvertError::Decode { detail: "z".into() }.is_input_error());
        assert!(!ConvertError::Render {
            page: 1,
            detail: "z".into()
        }
        .is_input_error());
    }
}
