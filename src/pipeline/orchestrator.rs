// Conversion dispatch: one strategy per conversion kind, metrics on the result

use tracing::{debug, info};

use crate::error::ConvertError;
use crate::model::{Artifact, ArtifactFormat, ConversionKind, ConversionRequest, ConversionResult};
use crate::pdf::reader::{PageRect, PdfReader};
use crate::pipeline::recompress;
use crate::raster::geometry::{self, contain_fit};
use crate::raster::{RasterImage, codec, color};
use crate::render::pdfium;

/// A conversion strategy selected by [`ConversionKind`].
pub trait Conversion {
    fn kind(&self) -> ConversionKind;

    /// Reject input counts this conversion cannot handle.
    fn check_inputs(&self, count: usize) -> crate::error::Result<()> {
        if count == 1 {
            Ok(())
        } else {
            Err(ConvertError::invalid_request(format!(
                "{} takes exactly one input, got {count}",
                self.kind()
            )))
        }
    }

    fn run(
        &self,
        inputs: &[&[u8]],
        request: &ConversionRequest,
    ) -> crate::error::Result<Vec<Artifact>>;
}

pub struct ImageToPdf;
pub struct PdfToImages;
pub struct CompressImage;
pub struct ResizeImage;
pub struct CompressPdf;

/// Strategy for a conversion kind.
pub fn strategy_for(kind: ConversionKind) -> &'static dyn Conversion {
    match kind {
        ConversionKind::ImageToPdf => &ImageToPdf,
        ConversionKind::PdfToImages => &PdfToImages,
        ConversionKind::CompressImage => &CompressImage,
        ConversionKind::ResizeImage => &ResizeImage,
        ConversionKind::CompressPdf => &CompressPdf,
    }
}

/// Run one conversion over in-memory inputs.
///
/// Either every artifact is produced or an error is returned; there is no
/// partial result.
pub fn convert(
    inputs: &[&[u8]],
    request: &ConversionRequest,
) -> crate::error::Result<ConversionResult> {
    let strategy = strategy_for(request.kind);
    strategy.check_inputs(inputs.len())?;

    let original_size = inputs.iter().map(|input| input.len() as u64).sum();
    let artifacts = strategy.run(inputs, request)?;

    let result = ConversionResult {
        kind: request.kind,
        artifacts,
        original_size,
    };
    info!(
        kind = %request.kind,
        artifacts = result.artifacts.len(),
        original = result.original_size,
        output = result.output_size(),
        reduction_percent = result.reduction_percent(),
        "conversion finished"
    );
    Ok(result)
}

/// Normalize for the requested format and encode as a raster artifact.
fn encode_artifact(
    image: RasterImage,
    request: &ConversionRequest,
) -> crate::error::Result<Artifact> {
    let normalized = color::normalize_for(image, request.output_format);
    let bytes = codec::encode(
        &normalized,
        request.output_format,
        request.quality,
        request.optimize,
    )?;
    Ok(Artifact {
        bytes,
        format: ArtifactFormat::from(request.output_format),
        dimensions: Some(normalized.dimensions()),
        page_count: None,
    })
}

fn pdf_artifact(bytes: Vec<u8>) -> crate::error::Result<Artifact> {
    let page_count = PdfReader::from_bytes(&bytes)?.page_count() as usize;
    Ok(Artifact {
        bytes,
        format: ArtifactFormat::Pdf,
        dimensions: None,
        page_count: Some(page_count),
    })
}

impl Conversion for ImageToPdf {
    fn kind(&self) -> ConversionKind {
        ConversionKind::ImageToPdf
    }

    fn check_inputs(&self, count: usize) -> crate::error::Result<()> {
        if count == 0 {
            return Err(ConvertError::invalid_request(
                "image_to_pdf needs at least one image",
            ));
        }
        Ok(())
    }

    fn run(
        &self,
        inputs: &[&[u8]],
        request: &ConversionRequest,
    ) -> crate::error::Result<Vec<Artifact>> {
        let images = inputs
            .iter()
            .map(|bytes| codec::decode(bytes))
            .collect::<crate::error::Result<Vec<_>>>()?;
        let pdf = crate::pdf::assemble(
            images,
            request.page_size,
            request.quality,
            request.compress_pdf,
        )?;
        Ok(vec![pdf_artifact(pdf)?])
    }
}

impl Conversion for PdfToImages {
    fn kind(&self) -> ConversionKind {
        ConversionKind::PdfToImages
    }

    fn run(
        &self,
        inputs: &[&[u8]],
        request: &ConversionRequest,
    ) -> crate::error::Result<Vec<Artifact>> {
        let pages = pdfium::rasterize(inputs[0], request.dpi, request.output_format)?;
        debug!(pages = pages.len(), dpi = request.dpi, "PDF rasterized");
        pages
            .into_iter()
            .map(|page| encode_artifact(page, request))
            .collect()
    }
}

impl Conversion for CompressImage {
    fn kind(&self) -> ConversionKind {
        ConversionKind::CompressImage
    }

    fn run(
        &self,
        inputs: &[&[u8]],
        request: &ConversionRequest,
    ) -> crate::error::Result<Vec<Artifact>> {
        let mut image = codec::decode(inputs[0])?;
        if let Some((max_w, max_h)) = request.target_size.max_dimensions() {
            let (width, height) = image.dimensions();
            let (fit_w, fit_h) = contain_fit(width, height, max_w, max_h);
            debug!(width, height, fit_w, fit_h, "applying size cap");
            image = codec::resize(image, fit_w, fit_h)?;
        }
        Ok(vec![encode_artifact(image, request)?])
    }
}

impl Conversion for ResizeImage {
    fn kind(&self) -> ConversionKind {
        ConversionKind::ResizeImage
    }

    fn run(
        &self,
        inputs: &[&[u8]],
        request: &ConversionRequest,
    ) -> crate::error::Result<Vec<Artifact>> {
        let spec = request
            .resize
            .as_ref()
            .ok_or_else(|| ConvertError::invalid_request("resize_image requires a resize spec"))?;
        let image = codec::decode(inputs[0])?;
        let (width, height) = image.dimensions();
        let (new_w, new_h) = geometry::resolve(width, height, spec, request.keep_aspect)?;
        debug!(width, height, new_w, new_h, "resize resolved");
        let resized = codec::resize(image, new_w, new_h)?;
        Ok(vec![encode_artifact(resized, request)?])
    }
}

impl Conversion for CompressPdf {
    fn kind(&self) -> ConversionKind {
        ConversionKind::CompressPdf
    }

    fn run(
        &self,
        inputs: &[&[u8]],
        request: &ConversionRequest,
    ) -> crate::error::Result<Vec<Artifact>> {
        let pdf = recompress::recompress(inputs[0], request.tier, request.compress_pdf)?;
        Ok(vec![pdf_artifact(pdf)?])
    }
}

/// Page layout of a PDF, read without rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInfo {
    pub page_count: usize,
    pub pages: Vec<PageRect>,
}

/// Page count and page sizes of a PDF.
///
/// # Errors
/// `DocumentOpenError` if the bytes are not a readable PDF.
pub fn inspect(pdf_bytes: &[u8]) -> crate::error::Result<DocumentInfo> {
    let reader = PdfReader::from_bytes(pdf_bytes)?;
    let pages = reader.page_rects()?;
    Ok(DocumentInfo {
        page_count: pages.len(),
        pages,
    })
}
