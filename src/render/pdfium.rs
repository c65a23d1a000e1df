// pdfium-render wrapper: PDF bytes -> one DynamicImage per page (in-memory only)

use std::path::PathBuf;

use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::{debug, info};

use crate::error::ConvertError;
use crate::pdf::reader::PageRect;
use crate::raster::{OutputFormat, RasterImage, color};

/// PDF user space units per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// A rendered page together with the page box it came from.
#[derive(Debug)]
pub struct RenderedPage {
    /// 0-indexed position in the source document.
    pub index: usize,
    pub image: DynamicImage,
    pub rect: PageRect,
}

/// Resolves the path to the pdfium shared library.
///
/// Search order:
/// 1. `PDFIUM_DYNAMIC_LIB_PATH` environment variable
/// 2. `vendor/pdfium/lib/` relative to the project root (for development)
///
/// `None` means fall back to the system library search path.
fn resolve_pdfium_lib_path() -> crate::error::Result<Option<PathBuf>> {
    if let Ok(path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Ok(Some(p));
        }
        return Err(ConvertError::render(format!(
            "PDFIUM_DYNAMIC_LIB_PATH is set to '{}' but the path does not exist",
            path
        )));
    }

    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let vendor_path = PathBuf::from(&manifest_dir).join("vendor/pdfium/lib");
        if vendor_path.exists() {
            return Ok(Some(vendor_path));
        }
    }

    Ok(None)
}

/// Creates a new Pdfium instance by dynamically loading the shared library.
fn create_pdfium() -> crate::error::Result<Pdfium> {
    let bindings = match resolve_pdfium_lib_path()? {
        Some(lib_path) => {
            let lib_path_str = lib_path.to_str().ok_or_else(|| {
                ConvertError::render("pdfium library path contains non-UTF-8 characters")
            })?;
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(lib_path_str))
        }
        None => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| {
        ConvertError::render(format!(
            "pdfium library not found ({e}): set PDFIUM_DYNAMIC_LIB_PATH or place libpdfium in vendor/pdfium/lib/"
        ))
    })?;
    Ok(Pdfium::new(bindings))
}

/// Whether a pdfium library can be bound in this process.
pub fn is_available() -> bool {
    create_pdfium().is_ok()
}

fn open_document<'a>(pdfium: &'a Pdfium, bytes: &'a [u8]) -> crate::error::Result<PdfDocument<'a>> {
    pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| ConvertError::document_open(format!("failed to open PDF: {e}")))
}

fn page_rect(page: &PdfPage) -> PageRect {
    PageRect {
        width: page.width().value as f64,
        height: page.height().value as f64,
    }
}

/// Page sizes in points, in document order, without rendering.
///
/// # Errors
/// `RenderError` without a pdfium library, `DocumentOpenError` if the
/// bytes are not a PDF pdfium can open.
pub fn page_rects(pdf_bytes: &[u8]) -> crate::error::Result<Vec<PageRect>> {
    let pdfium = create_pdfium()?;
    let document = open_document(&pdfium, pdf_bytes)?;
    let rects = document.pages().iter().map(|page| page_rect(&page)).collect();
    Ok(rects)
}

/// Render every page with both axes multiplied by `scale` (1.0 = 72 DPI).
///
/// A page that fails to render aborts the whole call.
///
/// # Errors
/// `InvalidDimension` for a non-positive scale, `RenderError` if no pdfium
/// library can be bound, `DocumentOpenError` if the document cannot be
/// opened or a page cannot be rendered.
pub fn render_pages(pdf_bytes: &[u8], scale: f32) -> crate::error::Result<Vec<RenderedPage>> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(ConvertError::invalid_dimension(format!(
            "render scale must be positive, got {scale}"
        )));
    }

    let pdfium = create_pdfium()?;
    let document = open_document(&pdfium, pdf_bytes)?;
    let pages = document.pages();
    info!(pages = pages.len(), scale, "rendering PDF");

    let mut rendered = Vec::with_capacity(pages.len() as usize);
    for (index, page) in pages.iter().enumerate() {
        let rect = page_rect(&page);
        let width_px = ((rect.width as f32 * scale).round() as i32).max(1);
        let height_px = ((rect.height as f32 * scale).round() as i32).max(1);

        let config = PdfRenderConfig::new()
            .set_target_width(width_px)
            .set_target_height(height_px);

        let bitmap = page.render_with_config(&config).map_err(|e| {
            ConvertError::document_open(format!("failed to render page {}: {e}", index + 1))
        })?;
        let image = bitmap.as_image();
        debug!(
            page = index + 1,
            width = image.width(),
            height = image.height(),
            "page rendered"
        );

        rendered.push(RenderedPage { index, image, rect });
    }

    Ok(rendered)
}

/// Rasterize every page at `dpi`, normalized for `output_format`.
///
/// Entries come back in document order, each sized
/// `page_points * dpi / 72`.
///
/// # Errors
/// `InvalidDimension` when `dpi` is 0, `RenderError` without a pdfium
/// library, `DocumentOpenError` for an unreadable document or page.
pub fn rasterize(
    pdf_bytes: &[u8],
    dpi: u32,
    output_format: OutputFormat,
) -> crate::error::Result<Vec<RasterImage>> {
    if dpi == 0 {
        return Err(ConvertError::invalid_dimension("dpi must be positive"));
    }

    let scale = dpi as f32 / POINTS_PER_INCH;
    render_pages(pdf_bytes, scale)?
        .into_iter()
        .map(|page| {
            let raster = RasterImage::new(page.image)?;
            Ok(color::normalize_for(raster, output_format))
        })
        .collect()
}
