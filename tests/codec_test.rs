// Image codec adapter and color normalization

use image::{DynamicImage, GenericImageView, ImageBuffer, Luma, LumaA, Rgb, Rgba};
use pdf_image_convert::error::ConvertError;
use pdf_image_convert::raster::{OutputFormat, PixelFormat, RasterImage, codec, color};

fn gradient_rgb(width: u32, height: u32) -> RasterImage {
    let buf = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 128])
    });
    RasterImage::new(DynamicImage::ImageRgb8(buf)).expect("non-empty image")
}

fn half_transparent_rgba(width: u32, height: u32) -> RasterImage {
    let buf = ImageBuffer::from_pixel(width, height, Rgba([200u8, 40, 40, 128]));
    RasterImage::new(DynamicImage::ImageRgba8(buf)).expect("non-empty image")
}

// ============================================================
// 1. RasterImage construction
// ============================================================

#[test]
fn test_raster_image_rejects_zero_dimensions() {
    let err = RasterImage::new(DynamicImage::new_rgb8(0, 10)).expect_err("zero width");
    assert!(matches!(err, ConvertError::InvalidDimension(_)), "{err}");
}

#[test]
fn test_pixel_format_reported() {
    assert_eq!(gradient_rgb(4, 4).pixel_format(), PixelFormat::Rgb);
    assert_eq!(half_transparent_rgba(4, 4).pixel_format(), PixelFormat::Rgba);
}

// ============================================================
// 2. Decode / encode
// ============================================================

#[test]
fn test_decode_garbage_is_decode_error() {
    let err = codec::decode(b"definitely not an image").expect_err("should fail");
    assert!(matches!(err, ConvertError::DecodeError(_)), "{err}");
}

#[test]
fn test_png_round_trip_is_lossless() {
    let image = gradient_rgb(64, 48);
    let bytes = codec::encode(&image, OutputFormat::Png, 85, true).expect("encode png");
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

    let decoded = codec::decode(&bytes).expect("decode png");
    assert_eq!(decoded.dimensions(), (64, 48));
    assert_eq!(
        decoded.as_dynamic().to_rgb8().as_raw(),
        image.as_dynamic().to_rgb8().as_raw()
    );
}

#[test]
fn test_png_keeps_alpha() {
    let image = half_transparent_rgba(8, 8);
    let normalized = color::normalize_for(image, OutputFormat::Png);
    let bytes = codec::encode(&normalized, OutputFormat::Png, 85, false).expect("encode png");
    let decoded = codec::decode(&bytes).expect("decode png");
    assert_eq!(decoded.pixel_format(), PixelFormat::Rgba);
    assert_eq!(decoded.as_dynamic().get_pixel(3, 3), Rgba([200, 40, 40, 128]));
}

#[test]
fn test_jpeg_round_trip_keeps_dimensions() {
    let image = gradient_rgb(120, 80);
    let bytes = codec::encode(&image, OutputFormat::Jpeg, 90, false).expect("encode jpeg");
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

    let decoded = codec::decode(&bytes).expect("decode jpeg");
    assert_eq!(decoded.dimensions(), (120, 80));
}

#[test]
fn test_jpeg_quality_is_clamped() {
    let image = gradient_rgb(32, 32);
    let zero = codec::encode(&image, OutputFormat::Jpeg, 0, false).expect("quality 0");
    let one = codec::encode(&image, OutputFormat::Jpeg, 1, false).expect("quality 1");
    assert_eq!(zero, one);

    let over = codec::encode(&image, OutputFormat::Jpeg, 255, false).expect("quality 255");
    let hundred = codec::encode(&image, OutputFormat::Jpeg, 100, false).expect("quality 100");
    assert_eq!(over, hundred);
}

#[test]
fn test_lower_jpeg_quality_is_smaller() {
    let image = gradient_rgb(256, 256);
    let high = codec::encode(&image, OutputFormat::Jpeg, 95, false).expect("q95");
    let low = codec::encode(&image, OutputFormat::Jpeg, 10, false).expect("q10");
    assert!(low.len() < high.len(), "q10 {} >= q95 {}", low.len(), high.len());
}

#[test]
fn test_rgba_to_jpeg_flattens_onto_white() {
    let buf = ImageBuffer::from_pixel(2000, 1000, Rgba([0u8, 0, 255, 0]));
    let image = RasterImage::new(DynamicImage::ImageRgba8(buf)).expect("image");

    let normalized = color::normalize_for(image, OutputFormat::Jpeg);
    assert_eq!(normalized.pixel_format(), PixelFormat::Rgb);
    assert_eq!(normalized.as_dynamic().get_pixel(0, 0), Rgba([255, 255, 255, 255]));

    let bytes = codec::encode(&normalized, OutputFormat::Jpeg, 85, false).expect("encode");
    let decoded = codec::decode(&bytes).expect("decode");
    assert_eq!(decoded.dimensions(), (2000, 1000));
    let Rgba([r, g, b, _]) = decoded.as_dynamic().get_pixel(1000, 500);
    assert!(r > 250 && g > 250 && b > 250, "expected white, got {r},{g},{b}");
}

// ============================================================
// 3. Normalization
// ============================================================

#[test]
fn test_normalize_rgb8_is_unchanged() {
    let image = gradient_rgb(16, 16);
    let before = image.as_dynamic().to_rgb8();
    let after = color::normalize_for(image, OutputFormat::Jpeg);
    assert_eq!(after.as_dynamic().as_rgb8().expect("still rgb8"), &before);
}

#[test]
fn test_normalize_is_idempotent() {
    let sources = [
        half_transparent_rgba(10, 10),
        gradient_rgb(10, 10),
        RasterImage::new(DynamicImage::ImageLumaA8(ImageBuffer::from_pixel(
            10,
            10,
            LumaA([90u8, 200]),
        )))
        .expect("luma alpha"),
        RasterImage::new(DynamicImage::ImageRgb16(ImageBuffer::from_pixel(
            10,
            10,
            Rgb([1000u16, 20000, 65535]),
        )))
        .expect("rgb16"),
    ];

    for format in [OutputFormat::Jpeg, OutputFormat::Png] {
        for source in &sources {
            let once = color::normalize_for(source.clone(), format);
            let twice = color::normalize_for(once.clone(), format);
            assert_eq!(once.pixel_format(), twice.pixel_format());
            assert_eq!(once.as_dynamic().as_bytes(), twice.as_dynamic().as_bytes());
        }
    }
}

#[test]
fn test_normalize_narrows_high_bit_depth() {
    let buf = ImageBuffer::from_pixel(4, 4, Rgb([65535u16, 0, 0]));
    let image = RasterImage::new(DynamicImage::ImageRgb16(buf)).expect("rgb16");
    let normalized = color::normalize_for(image, OutputFormat::Png);
    assert!(matches!(normalized.as_dynamic(), DynamicImage::ImageRgb8(_)));
}

#[test]
fn test_normalize_for_pdf_expands_grayscale() {
    let buf = ImageBuffer::from_pixel(4, 4, Luma([77u8]));
    let image = RasterImage::new(DynamicImage::ImageLuma8(buf)).expect("luma");
    let normalized = color::normalize_for_pdf(image);
    assert_eq!(normalized.pixel_format(), PixelFormat::Rgb);
    assert_eq!(normalized.as_dynamic().get_pixel(0, 0), Rgba([77, 77, 77, 255]));
}

// ============================================================
// 4. Resize
// ============================================================

#[test]
fn test_resize_exact_dimensions() {
    let resized = codec::resize(gradient_rgb(1000, 500), 400, 200).expect("resize");
    assert_eq!(resized.dimensions(), (400, 200));
}

#[test]
fn test_output_format_parse() {
    assert_eq!("JPEG".parse::<OutputFormat>().expect("JPEG"), OutputFormat::Jpeg);
    assert_eq!("png".parse::<OutputFormat>().expect("png"), OutputFormat::Png);
    let err = "gif".parse::<OutputFormat>().expect_err("gif");
    assert!(matches!(err, ConvertError::UnsupportedFormat(_)), "{err}");
}
