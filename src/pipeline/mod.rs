//! Pipeline stages for PDF-to-image conversion.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap
//! implementations (e.g. switch rendering backend) without touching other
//! stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ───▶ render ───▶ encode
//! (4 shapes)  (pdfium)   (data URI)
//! ```
//!
//! 1. [`input`]  — resolve one of the four accepted request shapes to a
//!    contiguous PDF byte buffer
//! 2. [`render`] — rasterise every page in order; runs in `spawn_blocking`
//!    because pdfium is not async-safe
//! 3. [`encode`] — PNG/JPEG-encode each surface and wrap it in a base64
//!    data URI for the JSON response body

pub mod encode;
pub mod input;
pub mod render;
