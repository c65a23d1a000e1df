pub mod codec;
pub mod color;
pub mod geometry;

use std::fmt;
use std::str::FromStr;

use image::{ColorType, DynamicImage};
use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Pixel layout category of a decoded raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PixelFormat {
    Luma,
    LumaAlpha,
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn has_alpha(self) -> bool {
        matches!(self, PixelFormat::LumaAlpha | PixelFormat::Rgba)
    }

    fn from_color_type(color: ColorType) -> Self {
        match color {
            ColorType::L8 | ColorType::L16 => PixelFormat::Luma,
            ColorType::La8 | ColorType::La16 => PixelFormat::LumaAlpha,
            ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => PixelFormat::Rgba,
            _ if color.has_alpha() => PixelFormat::Rgba,
            _ => PixelFormat::Rgb,
        }
    }
}

/// Raster output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    #[serde(alias = "JPEG", alias = "jpg")]
    Jpeg,
    #[serde(alias = "PNG")]
    Png,
}

impl OutputFormat {
    /// File extension used when writing artifacts.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Jpeg => f.write_str("JPEG"),
            OutputFormat::Png => f.write_str("PNG"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            other => Err(ConvertError::unsupported_format(format!(
                "unknown output format '{other}' (expected JPEG or PNG)"
            ))),
        }
    }
}

/// A decoded image with non-zero dimensions.
///
/// Produced by [`codec::decode`] or by rasterizing a PDF page. Normalization
/// and resizing consume the image and return a new one.
#[derive(Debug, Clone)]
pub struct RasterImage {
    image: DynamicImage,
}

impl RasterImage {
    /// Wrap a decoded image, rejecting empty buffers.
    pub fn new(image: DynamicImage) -> crate::error::Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(ConvertError::invalid_dimension(format!(
                "image has empty dimensions {}x{}",
                image.width(),
                image.height()
            )));
        }
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    pub fn pixel_format(&self) -> PixelFormat {
        PixelFormat::from_color_type(self.image.color())
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    /// Rebuild from a transformed buffer. Only used on transforms that
    /// preserve non-zero dimensions.
    pub(crate) fn from_dynamic_unchecked(image: DynamicImage) -> Self {
        Self { image }
    }
}
