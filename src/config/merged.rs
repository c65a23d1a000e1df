use super::job::Job;
use super::settings::Settings;
use crate::model::{CompressionTier, ConversionKind, ConversionRequest};
use crate::raster::OutputFormat;
use crate::raster::geometry::{PageSize, ResizeSpec, TargetSize};

#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub kind: ConversionKind,
    pub quality: u8,
    pub output_format: OutputFormat,
    pub page_size: PageSize,
    pub dpi: u32,
    pub compress_pdf: bool,
    pub compression_level: CompressionTier,
    pub keep_aspect_ratio: bool,
    pub optimize: bool,
    pub resize: Option<ResizeSpec>,
    pub target_size: TargetSize,
}

impl MergedConfig {
    /// Job values win over settings. Without a job `quality`, each kind
    /// falls back to its own settings quality: `pdf_quality` for
    /// image_to_pdf, `page_image_quality` for pdf_to_images, `quality`
    /// otherwise.
    pub fn new(settings: &Settings, job: &Job) -> crate::error::Result<Self> {
        let default_quality = match job.kind {
            ConversionKind::ImageToPdf => settings.pdf_quality,
            ConversionKind::PdfToImages => settings.page_image_quality,
            _ => settings.quality,
        };
        let resize = job.resize.as_ref().map(|r| r.to_spec()).transpose()?;

        Ok(MergedConfig {
            kind: job.kind,
            quality: job.quality.unwrap_or(default_quality),
            output_format: job.output_format.unwrap_or(settings.output_format),
            page_size: job.page_size.unwrap_or(settings.page_size),
            dpi: job.dpi.unwrap_or(settings.dpi),
            compress_pdf: job.compress_pdf.unwrap_or(settings.compress_pdf),
            compression_level: job.compression_level.unwrap_or(settings.compression_level),
            keep_aspect_ratio: job.keep_aspect_ratio.unwrap_or(settings.keep_aspect_ratio),
            optimize: job.optimize.unwrap_or(settings.optimize),
            resize,
            target_size: job.target_size,
        })
    }

    pub fn to_request(&self) -> ConversionRequest {
        ConversionRequest {
            kind: self.kind,
            quality: self.quality,
            output_format: self.output_format,
            resize: self.resize,
            keep_aspect: self.keep_aspect_ratio,
            target_size: self.target_size,
            page_size: self.page_size,
            dpi: self.dpi,
            compress_pdf: self.compress_pdf,
            tier: self.compression_level,
            optimize: self.optimize,
        }
    }
}
