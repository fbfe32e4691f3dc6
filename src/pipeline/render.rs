//! PDF rasterisation: render every page to a `DynamicImage` via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the work onto the blocking
//! thread pool so the async workers never stall during CPU-heavy rendering.
//! The whole page loop runs inside one blocking call: pages render strictly
//! sequentially, each completing before the next begins, and nothing else in
//! the pipeline overlaps them.
//!
//! ## Why a temp file?
//!
//! pdfium wants a file-system path. Writing the request bytes to a
//! `NamedTempFile` gives it one while guaranteeing cleanup when the handle
//! drops, even on panic.

use crate::config::ConvertConfig;
use crate::error::ConvertError;
use bytes::Bytes;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Rasterise every page of a PDF, in order, at the configured scale factor.
///
/// # Returns
/// A vector of `(page_number_1based, DynamicImage)` tuples, ascending.
pub async fn render_pages(
    bytes: Bytes,
    config: &ConvertConfig,
) -> Result<Vec<(usize, DynamicImage)>, ConvertError> {
    let scale = config.scale;
    let lib_path = config.pdfium_lib_path.clone();

    tokio::task::spawn_blocking(move || render_pages_blocking(&bytes, scale, lib_path.as_deref()))
        .await
        .map_err(|e| ConvertError::Internal(format!("render task panicked: {e}")))?
}

/// Bind to the pdfium shared library: configured directory first, system
/// library as fallback.
fn bind_pdfium(lib_dir: Option<&Path>) -> Result<Pdfium, ConvertError> {
    let bindings = match lib_dir {
        Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
            .or_else(|_| Pdfium::bind_to_system_library()),
        None => Pdfium::bind_to_system_library(),
    };
    bindings
        .map(Pdfium::new)
        .map_err(|e| ConvertError::PdfiumBinding(format!("{e:?}")))
}

/// Blocking implementation of the page loop.
fn render_pages_blocking(
    bytes: &[u8],
    scale: f32,
    lib_dir: Option<&Path>,
) -> Result<Vec<(usize, DynamicImage)>, ConvertError> {
    let pdfium = bind_pdfium(lib_dir)?;

    // pdfium loads from a path; the temp file lives until this function
    // returns.
    let mut tmp = tempfile::NamedTempFile::new()
        .map_err(|e| ConvertError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| ConvertError::Internal(format!("tempfile write: {e}")))?;
    tmp.flush()
        .map_err(|e| ConvertError::Internal(format!("tempfile flush: {e}")))?;

    let document = pdfium
        .load_pdf_from_file(tmp.path(), None)
        .map_err(|e| ConvertError::Decode {
            detail: format!("{e:?}"),
        })?;

    let pages = document.pages();
    let total = pages.len() as usize;
    info!("PDF loaded: {total} pages");

    let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);

    let mut results = Vec::with_capacity(total);
    for (index, page) in pages.iter().enumerate() {
        let page_num = index + 1;

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| ConvertError::Render {
                page: page_num,
                detail: format!("{e:?}"),
            })?;

        let image = bitmap.as_image();
        debug!(
            "rendered page {page_num}/{total} → {}x{} px",
            image.width(),
            image.height()
        );

        results.push((page_num, image));
    }

    Ok(results)
}
