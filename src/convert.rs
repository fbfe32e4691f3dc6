//! Direct conversion entry points.
//!
//! These run the full magic-check → render → encode pipeline with no server,
//! no authentication, and no network round trip (except when the input is
//! itself a URL). [`convert_bytes`] is the operation the HTTP handler calls
//! after input resolution; [`convert_input`] wires it to a local file or URL
//! for the CLI.

use crate::config::ConvertConfig;
use crate::error::ConvertError;
use crate::output::{ConvertOutput, ConvertStats, RenderedPage};
use crate::pipeline::{encode, input, render};
use bytes::Bytes;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Convert in-memory PDF bytes to one encoded image per page.
///
/// Pages are rendered strictly sequentially and returned ascending from
/// page 1. Any failure — undecodable document, failed page render, failed
/// encode — aborts the whole conversion; no partial page list is returned.
pub async fn convert_bytes(
    bytes: impl Into<Bytes>,
    config: &ConvertConfig,
) -> Result<ConvertOutput, ConvertError> {
    let total_start = Instant::now();
    let bytes = bytes.into();

    input::ensure_pdf_magic(&bytes)?;

    // ── Render ───────────────────────────────────────────────────────────
    let render_start = Instant::now();
    let rendered = render::render_pages(bytes, config).await?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    info!("rendered {} pages in {render_duration_ms}ms", rendered.len());

    // ── Encode ───────────────────────────────────────────────────────────
    let encode_start = Instant::now();
    let mut pages = Vec::with_capacity(rendered.len());
    for (page_num, img) in &rendered {
        let data = encode::encode_page(img, config.format, config.jpeg_quality).map_err(|e| {
            ConvertError::Encode {
                page: *page_num,
                detail: e.to_string(),
            }
        })?;
        pages.push(RenderedPage {
            page: *page_num,
            data,
        });
    }
    let encode_duration_ms = encode_start.elapsed().as_millis() as u64;
    debug!("encoded {} pages in {encode_duration_ms}ms", pages.len());

    let stats = ConvertStats {
        page_count: pages.len(),
        render_duration_ms,
        encode_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    Ok(ConvertOutput { pages, stats })
}

/// Convert a local PDF file.
pub async fn convert_file(
    path: impl AsRef<Path>,
    config: &ConvertConfig,
) -> Result<ConvertOutput, ConvertError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ConvertError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
    convert_bytes(bytes, config).await
}

/// Convert a local file path or an HTTP(S) URL.
///
/// URL inputs are fetched with a one-off client honouring the configured
/// fetch timeout; everything else is treated as a path.
pub async fn convert_input(
    input: &str,
    config: &ConvertConfig,
) -> Result<ConvertOutput, ConvertError> {
    if input::is_url(input) {
        let client = reqwest::Client::new();
        let bytes = input::fetch_pdf(&client, input, config.fetch_timeout_secs).await?;
        convert_bytes(bytes, config).await
    } else {
        convert_file(input, config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn non_pdf_bytes_fail_before_rendering() {
        // The magic check rejects the buffer before pdfium is ever bound, so
        // this test needs no pdfium library.
        let err = convert_bytes(&b"<html>nope</html>"[..], &ConvertConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::NotAPdf { .. }));
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let err = convert_file("/definitely/not/a/real/file.pdf", &ConvertConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::FileRead { .. }));
    }
}
