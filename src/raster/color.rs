// Pixel format normalization ahead of encoding: alpha flattening onto white.

use image::{DynamicImage, ImageBuffer, Rgb, RgbImage};
use tracing::debug;

use super::{OutputFormat, RasterImage};

/// Background used when removing transparency.
const WHITE: [u8; 3] = [255, 255, 255];

/// Prepare an image for the given raster encoder.
///
/// JPEG cannot carry alpha, so transparent pixels are composited onto white.
/// PNG keeps the alpha channel. Buffers wider than 8 bits per channel are
/// narrowed so either encoder accepts them. Already-normalized images pass
/// through untouched.
pub fn normalize_for(image: RasterImage, format: OutputFormat) -> RasterImage {
    let pixel_format = image.pixel_format();
    let dynamic = image.into_dynamic();

    let normalized = match (format, dynamic) {
        (_, img @ (DynamicImage::ImageRgb8(_) | DynamicImage::ImageLuma8(_))) => img,
        (OutputFormat::Png, img @ (DynamicImage::ImageRgba8(_) | DynamicImage::ImageLumaA8(_))) => {
            img
        }
        (OutputFormat::Jpeg, img) if pixel_format.has_alpha() => {
            debug!(?pixel_format, "flattening alpha for JPEG output");
            DynamicImage::ImageRgb8(flatten_onto_white(&img))
        }
        (OutputFormat::Png, img) if pixel_format.has_alpha() => {
            DynamicImage::ImageRgba8(img.to_rgba8())
        }
        (_, img) => DynamicImage::ImageRgb8(img.to_rgb8()),
    };

    RasterImage::from_dynamic_unchecked(normalized)
}

/// Produce the opaque 8-bit RGB image every embedded PDF page requires.
pub fn normalize_for_pdf(image: RasterImage) -> RasterImage {
    let pixel_format = image.pixel_format();
    let dynamic = image.into_dynamic();

    let rgb = match dynamic {
        img @ DynamicImage::ImageRgb8(_) => img,
        img if pixel_format.has_alpha() => DynamicImage::ImageRgb8(flatten_onto_white(&img)),
        img => DynamicImage::ImageRgb8(img.to_rgb8()),
    };

    RasterImage::from_dynamic_unchecked(rgb)
}

/// Composite an image onto an opaque white background using its alpha
/// channel as the mask.
pub fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    ImageBuffer::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let blend = |channel: u8, background: u8| -> u8 {
            let alpha = a as u32;
            ((channel as u32 * alpha + background as u32 * (255 - alpha) + 127) / 255) as u8
        };
        Rgb([blend(r, WHITE[0]), blend(g, WHITE[1]), blend(b, WHITE[2])])
    })
}
