//! # pdf2img
//!
//! Render each page of a PDF document to a raster image and return the
//! images as data-URI strings — over HTTP, from the CLI, or as a library.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF (file / raw body / base64 / URL)
//!  │
//!  ├─ 1. Input   resolve one of four request shapes to raw bytes
//!  ├─ 2. Render  rasterise pages via pdfium (CPU-bound, spawn_blocking)
//!  ├─ 3. Encode  PNG/JPEG → base64 data URI
//!  └─ 4. Output  {"images": [{"page": 1, "data": "data:image/png;base64,…"}]}
//! ```
//!
//! Pages render strictly sequentially, ascending from page 1, and any
//! failure aborts the whole conversion — no partial image list is ever
//! produced.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2img::{convert_bytes, ConvertConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bytes = std::fs::read("document.pdf")?;
//!     let output = convert_bytes(bytes, &ConvertConfig::default()).await?;
//!     for page in &output.pages {
//!         println!("page {}: {} bytes", page.page, page.data.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! To run the HTTP endpoint instead, see [`server::serve`] or the `pdf2img
//! serve` CLI subcommand.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2img` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConvertConfig, ConvertConfigBuilder, PageImageFormat, ServerConfig};
pub use convert::{convert_bytes, convert_file, convert_input};
pub use error::ConvertError;
pub use output::{ConvertOutput, ConvertResponse, ConvertStats, RenderedPage};
