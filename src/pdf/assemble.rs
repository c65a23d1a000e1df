// Rasters -> PDF: contain fit into the page box, flatten to RGB, JPEG page per image

use tracing::{debug, info};

use crate::error::ConvertError;
use crate::pdf::writer::{PageImage, PdfPageWriter};
use crate::raster::geometry::{PageSize, contain_fit};
use crate::raster::{OutputFormat, RasterImage, codec, color};

/// Build a PDF with one page per image, in input order.
///
/// Each image is scaled down to fit `page_size` (never up), flattened to
/// opaque RGB and embedded as a JPEG at `quality`. The page box in points
/// equals the embedded pixel size. `compress` runs the stream compression
/// and orphan pruning pass before serialization.
///
/// # Errors
/// `InvalidRequest` for an empty image list, encode errors otherwise.
pub fn assemble(
    images: Vec<RasterImage>,
    page_size: PageSize,
    quality: u8,
    compress: bool,
) -> crate::error::Result<Vec<u8>> {
    if images.is_empty() {
        return Err(ConvertError::invalid_request(
            "at least one image is required to build a PDF",
        ));
    }

    let mut writer = PdfPageWriter::new();
    let total = images.len();

    for (index, image) in images.into_iter().enumerate() {
        let page_image = prepare_page(image, page_size, quality)?;
        debug!(
            page = index + 1,
            width = page_image.width,
            height = page_image.height,
            "adding image page"
        );
        writer.add_image_page(
            &page_image,
            page_image.width as f64,
            page_image.height as f64,
        )?;
    }

    let bytes = writer.save_to_bytes(compress)?;
    info!(pages = total, %page_size, len = bytes.len(), "PDF assembled");
    Ok(bytes)
}

/// Fit, flatten and JPEG-encode one image for embedding.
fn prepare_page(
    image: RasterImage,
    page_size: PageSize,
    quality: u8,
) -> crate::error::Result<PageImage> {
    let (width, height) = image.dimensions();
    let (box_w, box_h) = page_size.bounding_box((width, height));
    let (fit_w, fit_h) = contain_fit(width, height, box_w, box_h);

    let resized = codec::resize(image, fit_w, fit_h)?;
    let rgb = color::normalize_for_pdf(resized);
    let jpeg = codec::encode(&rgb, OutputFormat::Jpeg, quality, false)?;

    Ok(PageImage::jpeg(jpeg, rgb.width(), rgb.height()))
}
