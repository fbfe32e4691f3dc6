//! Configuration types for PDF-to-image conversion and the HTTP server.
//!
//! All conversion behaviour is controlled through [`ConvertConfig`], built
//! via its [`ConvertConfigBuilder`]. The server adds [`ServerConfig`] on
//! top. Everything the original pipeline kept in module-level globals —
//! render backend location, scale factor, output format — is an explicit
//! field here, constructed once at startup and passed into the handler.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Output encoding for rendered pages.
///
/// PNG is lossless and the default; JPEG at quality 80 trades some fidelity
/// for a markedly smaller response payload, which matters when a document's
/// pages are embedded as data URIs in a single JSON body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageImageFormat {
    /// Lossless PNG at default compression. (default)
    #[default]
    Png,
    /// JPEG at the configured quality.
    Jpeg,
}

impl PageImageFormat {
    /// MIME type used in the emitted data URI.
    pub fn mime(&self) -> &'static str {
        match self {
            PageImageFormat::Png => "image/png",
            PageImageFormat::Jpeg => "image/jpeg",
        }
    }

    /// File extension for CLI output files.
    pub fn extension(&self) -> &'static str {
        match self {
            PageImageFormat::Png => "png",
            PageImageFormat::Jpeg => "jpg",
        }
    }
}

/// Configuration for one PDF-to-images conversion.
///
/// Built via [`ConvertConfig::builder()`] or [`ConvertConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2img::{ConvertConfig, PageImageFormat};
///
/// let config = ConvertConfig::builder()
///     .scale(2.0)
///     .format(PageImageFormat::Jpeg)
///     .jpeg_quality(80)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Scale factor applied to each page's native size to derive the pixel
    /// viewport. Default: 2.0.
    ///
    /// A US-Letter page (612×792 pt) renders to 1224×1584 px at 2.0 and
    /// 2448×3168 px at 4.0. Higher factors sharpen small text at the cost of
    /// a quadratically larger payload.
    pub scale: f32,

    /// Output image encoding. Default: PNG.
    pub format: PageImageFormat,

    /// JPEG quality, 1–100. Ignored for PNG. Default: 80.
    pub jpeg_quality: u8,

    /// Timeout for fetching URL-sourced input, in seconds. Default: 30.
    ///
    /// Without it a stalled upstream would pin the request forever; the
    /// render itself stays unbounded because pdfium offers no cancellation
    /// point.
    pub fetch_timeout_secs: u64,

    /// Directory containing the pdfium shared library. When `None`, the
    /// system library is used. Default: `None`.
    pub pdfium_lib_path: Option<PathBuf>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            scale: 2.0,
            format: PageImageFormat::default(),
            jpeg_quality: 80,
            fetch_timeout_secs: 30,
            pdfium_lib_path: None,
        }
    }
}

impl ConvertConfig {
    /// Create a new builder for `ConvertConfig`.
    pub fn builder() -> ConvertConfigBuilder {
        ConvertConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConvertConfig`].
#[derive(Debug)]
pub struct ConvertConfigBuilder {
    config: ConvertConfig,
}

impl ConvertConfigBuilder {
    /// Scale factor, clamped to 0.25–8.0.
    pub fn scale(mut self, scale: f32) -> Self {
        self.config.scale = scale.clamp(0.25, 8.0);
        self
    }

    pub fn format(mut self, format: PageImageFormat) -> Self {
        self.config.format = format;
        self
    }

    /// JPEG quality, clamped to 1–100.
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.config.fetch_timeout_secs = secs;
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConvertConfig, ConvertError> {
        let c = &self.config;
        if !(0.25..=8.0).contains(&c.scale) {
            return Err(ConvertError::InvalidConfig(format!(
                "scale must be 0.25–8.0, got {}",
                c.scale
            )));
        }
        if c.jpeg_quality == 0 || c.jpeg_quality > 100 {
            return Err(ConvertError::InvalidConfig(format!(
                "jpeg quality must be 1–100, got {}",
                c.jpeg_quality
            )));
        }
        if c.fetch_timeout_secs == 0 {
            return Err(ConvertError::InvalidConfig(
                "fetch timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Configuration for the HTTP endpoint.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the server binds to. Default: `127.0.0.1:8080`.
    pub bind_addr: SocketAddr,

    /// Shared secret the `x-api-key` header must equal. `None` disables the
    /// check. Default: `None`.
    pub api_key: Option<String>,

    /// Maximum accepted request body, in bytes. Default: 10 MiB.
    pub max_body_bytes: usize,

    /// Forward internal library error text in the `details` field of error
    /// responses. Default: `false` — decode/render details are redacted and
    /// only the coarse error label reaches the client. Fetch failures always
    /// carry the upstream status regardless of this flag, since that status
    /// belongs to the caller's own upstream.
    pub expose_error_details: bool,

    /// Render/encode settings applied to every request.
    pub convert: ConvertConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: ([127, 0, 0, 1], 8080).into(),
            api_key: None,
            max_body_bytes: 10 * 1024 * 1024,
            expose_error_details: false,
            convert: ConvertConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_clamps_scale() {
        let c = ConvertConfig::builder().scale(100.0).build().unwrap();
        assert_eq!(c.scale, 8.0);
        let c = ConvertConfig::builder().scale(0.0).build().unwrap();
        assert_eq!(c.scale, 0.25);
    }

    #[test]
    fn builder_clamps_jpeg_quality() {
        let c = ConvertConfig::builder().jpeg_quality(0).build().unwrap();
        assert_eq!(c.jpeg_quality, 1);
        let c = ConvertConfig::builder().jpeg_quality(255).build().unwrap();
        assert_eq!(c.jpeg_quality, 100);
    }

    #[test]
    fn zero_fetch_timeout_rejected() {
        let err = ConvertConfig::builder()
            .fetch_timeout_secs(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConvertError::InvalidConfig(_)));
    }

    #[test]
    fn format_mime_and_extension() {
        assert_eq!(PageImageFormat::Png.mime(), "image/png");
        assert_eq!(PageImageFormat::Jpeg.mime(), "image/jpeg");
        assert_eq!(PageImageFormat::Png.extension(), "png");
        assert_eq!(PageImageFormat::Jpeg.extension(), "jpg");
    }

    #[test]
    fn server_defaults() {
        let s = ServerConfig::default();
        assert_eq!(s.max_body_bytes, 10 * 1024 * 1024);
        assert!(s.api_key.is_none());
        assert!(!s.expose_error_details);
    }
}
