use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::CompressionTier;
use crate::raster::OutputFormat;
use crate::raster::codec::DEFAULT_JPEG_QUALITY;
use crate::raster::geometry::PageSize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// JPEG quality for compress/resize outputs.
    pub quality: u8,
    /// JPEG quality of page images embedded by image_to_pdf.
    pub pdf_quality: u8,
    /// JPEG quality of page images produced by pdf_to_images.
    pub page_image_quality: u8,
    pub dpi: u32,
    pub output_format: OutputFormat,
    pub page_size: PageSize,
    pub compress_pdf: bool,
    pub compression_level: CompressionTier,
    pub keep_aspect_ratio: bool,
    pub optimize: bool,
    /// JSON summary of every job, written after the batch.
    pub report: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            quality: DEFAULT_JPEG_QUALITY,
            pdf_quality: DEFAULT_JPEG_QUALITY,
            page_image_quality: 95,
            dpi: 150,
            output_format: OutputFormat::Jpeg,
            page_size: PageSize::Original,
            compress_pdf: true,
            compression_level: CompressionTier::Medium,
            keep_aspect_ratio: true,
            optimize: true,
            report: None,
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        serde_yml::from_str(yaml).map_err(|e| {
            crate::error::ConvertError::config(format!("Failed to parse settings YAML: {e}"))
        })
    }

    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}
