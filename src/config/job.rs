use serde::Deserialize;

use crate::error::ConvertError;
use crate::model::{CompressionTier, ConversionKind};
use crate::raster::OutputFormat;
use crate::raster::geometry::{PageSize, Preset, ResizeSpec, TargetSize};

#[derive(Debug, Clone, Deserialize)]
pub struct JobFile {
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    pub kind: ConversionKind,
    /// A single path or a list of paths; only image_to_pdf takes several.
    #[serde(deserialize_with = "deserialize_inputs")]
    pub input: Vec<String>,
    pub output: String,
    pub quality: Option<u8>,
    pub output_format: Option<OutputFormat>,
    pub page_size: Option<PageSize>,
    pub dpi: Option<u32>,
    pub compress_pdf: Option<bool>,
    pub compression_level: Option<CompressionTier>,
    pub keep_aspect_ratio: Option<bool>,
    pub optimize: Option<bool>,
    pub resize: Option<ResizeOptions>,
    #[serde(default)]
    pub target_size: TargetSize,
}

/// Resize target as written in a job file.
///
/// Exactly one form must be given:
/// - `percentage: 50`
/// - `width: 800` + `height: 600`
/// - `preset: small | medium | large`, or `preset: custom` with `width`/`height`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResizeOptions {
    pub percentage: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub preset: Option<String>,
}

impl ResizeOptions {
    pub fn to_spec(&self) -> crate::error::Result<ResizeSpec> {
        match (self.percentage, self.preset.as_deref(), self.width, self.height) {
            (Some(p), None, None, None) => Ok(ResizeSpec::Percentage(p)),
            (None, None, Some(width), Some(height)) => Ok(ResizeSpec::Explicit { width, height }),
            (None, Some(name), width, height) => {
                let preset = parse_preset(name, width, height)?;
                Ok(ResizeSpec::Preset(preset))
            }
            (None, None, _, _) => Err(ConvertError::config(
                "resize needs percentage, width and height, or preset",
            )),
            _ => Err(ConvertError::config(
                "resize accepts only one of percentage, width/height, preset",
            )),
        }
    }
}

fn parse_preset(
    name: &str,
    width: Option<u32>,
    height: Option<u32>,
) -> crate::error::Result<Preset> {
    let preset = match name.trim().to_ascii_lowercase().as_str() {
        "small" => Preset::Small,
        "medium" => Preset::Medium,
        "large" => Preset::Large,
        "custom" => {
            let (Some(width), Some(height)) = (width, height) else {
                return Err(ConvertError::config(
                    "custom preset needs both width and height",
                ));
            };
            return Ok(Preset::Custom { width, height });
        }
        other => {
            return Err(ConvertError::config(format!(
                "unknown resize preset '{other}'"
            )));
        }
    };
    if width.is_some() || height.is_some() {
        return Err(ConvertError::config(format!(
            "preset '{name}' does not take width/height"
        )));
    }
    Ok(preset)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Input path deserializer for `deserialize_with`: one string or a list.
fn deserialize_inputs<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let inputs = match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(path) => vec![path],
        OneOrMany::Many(paths) => paths,
    };
    if inputs.is_empty() {
        return Err(serde::de::Error::custom("input list cannot be empty"));
    }
    Ok(inputs)
}
