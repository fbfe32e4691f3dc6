//! Image encoding: rendered surface → base64 data URI.
//!
//! The response embeds every page directly in the JSON body, so the encoded
//! string must be self-describing: `data:image/<fmt>;base64,<payload>` works
//! unmodified as an `<img>` source. PNG is lossless and the default; JPEG at
//! quality 80 cuts payload size substantially when fidelity matters less
//! than transfer weight.

use crate::config::PageImageFormat;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode a rendered page surface as a data URI in the requested format.
pub fn encode_page(
    img: &DynamicImage,
    format: PageImageFormat,
    jpeg_quality: u8,
) -> Result<String, image::ImageError> {
    let mut buf = Vec::new();
    match format {
        PageImageFormat::Png => {
            img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
        }
        PageImageFormat::Jpeg => {
            // JPEG has no alpha channel; pdfium surfaces are RGBA.
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, jpeg_quality))?;
        }
    }

    let b64 = STANDARD.encode(&buf);
    debug!("encoded page → {} bytes base64 ({})", b64.len(), format.mime());

    Ok(format!("data:{};base64,{b64}", format.mime()))
}
