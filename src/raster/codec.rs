// image crate: bytes -> RasterImage, RasterImage -> JPEG/PNG bytes

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::imageops::FilterType as ResampleFilter;
use tracing::debug;

use super::{OutputFormat, RasterImage};
use crate::error::ConvertError;

/// Default JPEG quality used when a caller has no preference.
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Clamp a requested quality to the range the JPEG encoder accepts.
pub fn clamp_quality(quality: u8) -> u8 {
    quality.clamp(1, 100)
}

/// Decode image bytes (JPEG, PNG, BMP, TIFF, WebP, ...) into a raster.
///
/// # Errors
/// `DecodeError` if the container is unknown or the data is malformed.
pub fn decode(bytes: &[u8]) -> crate::error::Result<RasterImage> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| ConvertError::decode(format!("failed to decode image: {e}")))?;
    debug!(
        width = image.width(),
        height = image.height(),
        color = ?image.color(),
        "image decoded"
    );
    RasterImage::new(image).map_err(|e| ConvertError::decode(e.to_string()))
}

/// Encode a raster as JPEG or PNG.
///
/// JPEG expects an image already passed through
/// [`super::color::normalize_for`]; `quality` is clamped to 1-100 and
/// `optimize` has no JPEG effect. PNG ignores `quality` and uses the
/// strongest deflate level when `optimize` is set.
pub fn encode(
    image: &RasterImage,
    format: OutputFormat,
    quality: u8,
    optimize: bool,
) -> crate::error::Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    match format {
        OutputFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut buf, clamp_quality(quality));
            image.as_dynamic().write_with_encoder(encoder)?;
        }
        OutputFormat::Png => {
            let compression = if optimize {
                CompressionType::Best
            } else {
                CompressionType::Default
            };
            let encoder = PngEncoder::new_with_quality(&mut buf, compression, FilterType::Adaptive);
            image.as_dynamic().write_with_encoder(encoder)?;
        }
    }

    let bytes = buf.into_inner();
    debug!(%format, len = bytes.len(), "image encoded");
    Ok(bytes)
}

/// Resample to exactly `width` x `height` with Lanczos3.
pub fn resize(image: RasterImage, width: u32, height: u32) -> crate::error::Result<RasterImage> {
    if (width, height) == image.dimensions() {
        return Ok(image);
    }
    let resized = image
        .as_dynamic()
        .resize_exact(width, height, ResampleFilter::Lanczos3);
    RasterImage::new(resized)
}
