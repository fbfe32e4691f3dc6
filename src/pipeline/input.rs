//! Input resolution: normalise the four accepted request shapes to one
//! contiguous PDF byte buffer.
//!
//! Exactly one shape is honoured per request. The HTTP layer inspects the
//! content type once, builds a [`PdfSource`], and everything downstream is a
//! pure byte-producing function per variant. We validate the PDF magic bytes
//! (`%PDF`) before pdfium ever sees the buffer so callers get a meaningful
//! decode error rather than a pdfium crash.

use crate::error::ConvertError;
use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use tracing::{debug, info};

/// Optional data-URI header in front of a base64 payload, e.g.
/// `data:application/pdf;base64,`. Stripped before decoding.
static DATA_URI_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:[A-Za-z0-9.+/-]*;base64,").expect("valid prefix pattern"));

/// The four alternative input shapes, resolved once at the top of request
/// handling. Mutually exclusive; no merging.
#[derive(Debug)]
pub enum PdfSource {
    /// Multipart upload under the `pdf` field.
    Upload(Bytes),
    /// `application/pdf` request body taken verbatim.
    Raw(Bytes),
    /// JSON `pdf` field holding base64 text, optionally data-URI prefixed.
    Base64(String),
    /// JSON `url` field; bytes are fetched over HTTP(S).
    RemoteUrl(String),
}

impl PdfSource {
    /// Produce the raw document bytes for this source.
    pub async fn resolve(
        self,
        client: &reqwest::Client,
        timeout_secs: u64,
    ) -> Result<Bytes, ConvertError> {
        match self {
            PdfSource::Upload(bytes) | PdfSource::Raw(bytes) => Ok(bytes),
            PdfSource::Base64(payload) => decode_base64_payload(&payload).map(Bytes::from),
            PdfSource::RemoteUrl(url) => fetch_pdf(client, &url, timeout_secs).await,
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Decode a base64 PDF payload, stripping an optional data-URI header first.
///
/// A prefixed and an unprefixed payload of the same document decode to
/// identical bytes.
pub fn decode_base64_payload(payload: &str) -> Result<Vec<u8>, ConvertError> {
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    let stripped = DATA_URI_PREFIX.replace(payload.trim(), "");
    STANDARD
        .decode(stripped.as_bytes())
        .map_err(|e| ConvertError::InvalidBase64 {
            detail: e.to_string(),
        })
}

/// Fetch PDF bytes from a remote URL.
///
/// Any network failure, timeout, or non-success status aborts the request;
/// the upstream status/message is preserved in the error.
pub async fn fetch_pdf(
    client: &reqwest::Client,
    url: &str,
    timeout_secs: u64,
) -> Result<Bytes, ConvertError> {
    info!("fetching PDF from {url}");

    let response = client
        .get(url)
        .timeout(Duration::from_secs(timeout_secs))
        .send()
        .await
        .map_err(|e| ConvertError::Fetch {
            url: url.to_string(),
            reason: if e.is_timeout() {
                format!("timed out after {timeout_secs}s")
            } else {
                e.to_string()
            },
        })?;

    if !response.status().is_success() {
        return Err(ConvertError::Fetch {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response.bytes().await.map_err(|e| ConvertError::Fetch {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    debug!("fetched {} bytes from {url}", bytes.len());
    Ok(bytes)
}

/// Verify the `%PDF` magic bytes before handing the buffer to pdfium.
pub fn ensure_pdf_magic(bytes: &[u8]) -> Result<(), ConvertError> {
    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        return Err(ConvertError::NotAPdf { magic });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn prefixed_and_bare_payloads_decode_identically() {
        let doc = b"%PDF-1.4 fake document";
        let bare = STANDARD.encode(doc);
        let prefixed = format!("data:application/pdf;base64,{bare}");

        assert_eq!(decode_base64_payload(&bare).unwrap(), doc);
        assert_eq!(decode_base64_payload(&prefixed).unwrap(), doc);
    }

    #[test]
    fn non_pdf_mime_prefix_is_also_stripped() {
        let doc = b"%PDF-1.4";
        let prefixed = format!("data:application/octet-stream;base64,{}", STANDARD.encode(doc));
        assert_eq!(decode_base64_payload(&prefixed).unwrap(), doc);
    }

    #[test]
    fn malformed_base64_is_rejected() {
        let err = decode_base64_payload("not valid base64!!!").unwrap_err();
        assert!(matches!(err, ConvertError::InvalidBase64 { .. }));
    }

    #[test]
    fn magic_check_accepts_pdf_rejects_other() {
        assert!(ensure_pdf_magic(b"%PDF-1.7\n...").is_ok());
        assert!(matches!(
            ensure_pdf_magic(b"<html></html>"),
            Err(ConvertError::NotAPdf { .. })
        ));
        assert!(matches!(
            ensure_pdf_magic(b"%P"),
            Err(ConvertError::NotAPdf { .. })
        ));
        assert!(matches!(
            ensure_pdf_magic(b""),
            Err(ConvertError::NotAPdf { .. })
        ));
    }

    #[tokio::test]
    async fn upload_and_raw_sources_resolve_verbatim() {
        let client = reqwest::Client::new();
        let bytes = Bytes::from_static(b"%PDF-1.4 payload");

        let out = PdfSource::Upload(bytes.clone())
            .resolve(&client, 1)
            .await
            .unwrap();
        assert_eq!(out, bytes);

        let out = PdfSource::Raw(bytes.clone())
            .resolve(&client, 1)
            .await
            .unwrap();
        assert_eq!(out, bytes);
    }
}
