// Conversion request/result types shared by the orchestrator and the job runner.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;
use crate::raster::{OutputFormat, codec};
use crate::raster::geometry::{PageSize, ResizeSpec, TargetSize};

/// The five conversions the pipeline knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionKind {
    ImageToPdf,
    PdfToImages,
    CompressImage,
    ResizeImage,
    CompressPdf,
}

impl fmt::Display for ConversionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConversionKind::ImageToPdf => "image_to_pdf",
            ConversionKind::PdfToImages => "pdf_to_images",
            ConversionKind::CompressImage => "compress_image",
            ConversionKind::ResizeImage => "resize_image",
            ConversionKind::CompressPdf => "compress_pdf",
        };
        f.write_str(name)
    }
}

/// Named PDF recompression presets, each mapping to a page render scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionTier {
    #[serde(alias = "Low")]
    Low,
    #[default]
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "High")]
    High,
    #[serde(alias = "Very High", alias = "VeryHigh")]
    VeryHigh,
}

impl CompressionTier {
    /// Render scale relative to 72 DPI.
    pub fn scale(self) -> f32 {
        match self {
            CompressionTier::Low => 0.3,
            CompressionTier::Medium => 0.6,
            CompressionTier::High => 0.8,
            CompressionTier::VeryHigh => 1.0,
        }
    }
}

impl FromStr for CompressionTier {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "low" => Ok(CompressionTier::Low),
            "medium" => Ok(CompressionTier::Medium),
            "high" => Ok(CompressionTier::High),
            "veryhigh" => Ok(CompressionTier::VeryHigh),
            _ => Err(ConvertError::config(format!(
                "unknown compression level '{s}'"
            ))),
        }
    }
}

/// Immutable parameters for one conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub kind: ConversionKind,
    /// JPEG quality for raster outputs, clamped to 1-100 at encode time.
    pub quality: u8,
    pub output_format: OutputFormat,
    /// Required for `ResizeImage`.
    pub resize: Option<ResizeSpec>,
    pub keep_aspect: bool,
    /// Size cap for `CompressImage`.
    pub target_size: TargetSize,
    /// Page box for `ImageToPdf`.
    pub page_size: PageSize,
    /// Render resolution for `PdfToImages`.
    pub dpi: u32,
    /// Run the stream compression pass on generated PDFs.
    pub compress_pdf: bool,
    /// Render scale tier for `CompressPdf`.
    pub tier: CompressionTier,
    /// Extra PNG compression pass.
    pub optimize: bool,
}

impl ConversionRequest {
    pub fn new(kind: ConversionKind) -> Self {
        Self {
            kind,
            quality: codec::DEFAULT_JPEG_QUALITY,
            output_format: OutputFormat::Jpeg,
            resize: None,
            keep_aspect: true,
            target_size: TargetSize::None,
            page_size: PageSize::Original,
            dpi: 150,
            compress_pdf: true,
            tier: CompressionTier::Medium,
            optimize: true,
        }
    }
}

/// Encoded payload of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    Pdf,
    Jpeg,
    Png,
}

impl ArtifactFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactFormat::Pdf => "pdf",
            ArtifactFormat::Jpeg => "jpg",
            ArtifactFormat::Png => "png",
        }
    }
}

impl From<OutputFormat> for ArtifactFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Jpeg => ArtifactFormat::Jpeg,
            OutputFormat::Png => ArtifactFormat::Png,
        }
    }
}

/// One output buffer.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub format: ArtifactFormat,
    /// Pixel size for raster artifacts.
    pub dimensions: Option<(u32, u32)>,
    /// Page count for PDF artifacts.
    pub page_count: Option<usize>,
}

impl Artifact {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Output of a successful conversion.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub kind: ConversionKind,
    pub artifacts: Vec<Artifact>,
    /// Total byte size of all inputs.
    pub original_size: u64,
}

impl ConversionResult {
    /// Total byte size of all artifacts.
    pub fn output_size(&self) -> u64 {
        self.artifacts.iter().map(Artifact::size).sum()
    }

    /// `(original - result) / original * 100`; negative when the output grew.
    pub fn reduction_percent(&self) -> f64 {
        reduction_percent(self.original_size, self.output_size())
    }

    /// Pages in the produced PDF, or number of produced page images.
    pub fn page_count(&self) -> Option<usize> {
        match self.kind {
            ConversionKind::PdfToImages => Some(self.artifacts.len()),
            _ => self.artifacts.first().and_then(|a| a.page_count),
        }
    }

    /// Pixel size of the first raster artifact.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.artifacts.iter().find_map(|a| a.dimensions)
    }
}

pub fn reduction_percent(original: u64, result: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (original as f64 - result as f64) / original as f64 * 100.0
}
