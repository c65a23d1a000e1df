// PDF recompression by rasterization: Opened -> Rasterized -> assembled bytes
//
// Every page is rendered at a reduced scale and re-embedded as a lossless
// raster on a page of the original size. Text and vector content do not
// survive; output is image-only.

use image::DynamicImage;
use tracing::{debug, info};

use crate::error::ConvertError;
use crate::model::CompressionTier;
use crate::pdf::reader::PageRect;
use crate::pdf::writer::{PageImage, PdfPageWriter};
use crate::raster::{RasterImage, color};
use crate::render::pdfium::{self, RenderedPage};

/// Source document loaded; page count and page boxes known.
pub struct Opened<'a> {
    source: &'a [u8],
    page_rects: Vec<PageRect>,
}

/// Every page rendered at the tier scale, still in document order.
pub struct Rasterized {
    tier: CompressionTier,
    pages: Vec<RenderedPage>,
}

impl<'a> Opened<'a> {
    /// # Errors
    /// `DocumentOpenError` if the bytes are not a readable PDF.
    pub fn open(source: &'a [u8]) -> crate::error::Result<Self> {
        let page_rects = pdfium::page_rects(source)?;
        if page_rects.is_empty() {
            return Err(ConvertError::document_open("PDF has no pages"));
        }
        debug!(pages = page_rects.len(), "source PDF opened");
        Ok(Self { source, page_rects })
    }

    pub fn page_count(&self) -> usize {
        self.page_rects.len()
    }

    pub fn page_rects(&self) -> &[PageRect] {
        &self.page_rects
    }

    /// Render every page at `tier.scale()`.
    ///
    /// # Errors
    /// `DocumentOpenError` if any page fails; no partial result is kept.
    pub fn rasterize(self, tier: CompressionTier) -> crate::error::Result<Rasterized> {
        let pages = pdfium::render_pages(self.source, tier.scale())?;
        if pages.len() != self.page_rects.len() {
            return Err(ConvertError::document_open(format!(
                "rendered {} pages but the document has {}",
                pages.len(),
                self.page_rects.len()
            )));
        }
        Ok(Rasterized { tier, pages })
    }
}

impl Rasterized {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn tier(&self) -> CompressionTier {
        self.tier
    }

    /// Build the output PDF: one page per source page, each the size of the
    /// original page with its raster stretched to fill it.
    pub fn assemble(self, compress: bool) -> crate::error::Result<Vec<u8>> {
        let mut writer = PdfPageWriter::new();

        for page in self.pages {
            let page_image = flatten_page(page.image)?;
            debug!(
                page = page.index + 1,
                width = page_image.width,
                height = page_image.height,
                page_width = page.rect.width,
                page_height = page.rect.height,
                "re-embedding page"
            );
            writer.add_image_page(&page_image, page.rect.width, page.rect.height)?;
        }

        writer.save_to_bytes(compress)
    }
}

fn flatten_page(image: DynamicImage) -> crate::error::Result<PageImage> {
    let rgb = color::normalize_for_pdf(RasterImage::new(image)?)
        .into_dynamic()
        .into_rgb8();
    PageImage::flate_rgb(rgb.as_raw(), rgb.width(), rgb.height())
}

/// Recompress a PDF at the given tier.
///
/// # Errors
/// `DocumentOpenError` for an invalid source or a page that cannot be
/// rendered.
pub fn recompress(
    source: &[u8],
    tier: CompressionTier,
    compress: bool,
) -> crate::error::Result<Vec<u8>> {
    let opened = Opened::open(source)?;
    let page_count = opened.page_count();
    let output = opened.rasterize(tier)?.assemble(compress)?;
    info!(
        pages = page_count,
        ?tier,
        original = source.len(),
        compressed = output.len(),
        "PDF recompressed"
    );
    Ok(output)
}
