// Target pixel dimensions: percentage/explicit/preset resize, aspect lock,
// contain fit into page-size boxes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Bounds applied to explicitly requested dimensions.
pub const MIN_DIMENSION: u32 = 1;
pub const MAX_DIMENSION: u32 = 5000;

/// Named resize presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Small,
    Medium,
    Large,
    Custom { width: u32, height: u32 },
}

impl Preset {
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Preset::Small => (800, 600),
            Preset::Medium => (1024, 768),
            Preset::Large => (1920, 1080),
            Preset::Custom { width, height } => (clamp_dimension(width), clamp_dimension(height)),
        }
    }
}

/// How an image resize target is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeSpec {
    /// Scale both axes by a percentage of the source size.
    Percentage(f64),
    /// Exact target size, each side clamped to [1, 5000].
    Explicit { width: u32, height: u32 },
    Preset(Preset),
}

/// Bounding box for image pages in an assembled PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSize {
    #[default]
    #[serde(alias = "Original")]
    Original,
    #[serde(alias = "A4")]
    A4,
    #[serde(alias = "Letter")]
    Letter,
    #[serde(alias = "Small")]
    Small,
}

impl PageSize {
    /// Pixel box an image must fit into. `Original` is the source size itself.
    pub fn bounding_box(self, source: (u32, u32)) -> (u32, u32) {
        match self {
            PageSize::Original => source,
            // 300 DPI
            PageSize::A4 => (2480, 3508),
            PageSize::Letter => (2550, 3300),
            // A4 at 150 DPI
            PageSize::Small => (1240, 1754),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageSize::Original => "Original",
            PageSize::A4 => "A4",
            PageSize::Letter => "Letter",
            PageSize::Small => "Small",
        };
        f.write_str(name)
    }
}

impl FromStr for PageSize {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "original" => Ok(PageSize::Original),
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            "small" => Ok(PageSize::Small),
            other => Err(ConvertError::config(format!("unknown page size '{other}'"))),
        }
    }
}

/// Size cap for image compression, applied as a contain fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSize {
    #[default]
    None,
    #[serde(rename = "under_100kb", alias = "<100KB")]
    Under100Kb,
    #[serde(rename = "under_500kb", alias = "<500KB")]
    Under500Kb,
    #[serde(rename = "under_1mb", alias = "<1MB")]
    Under1Mb,
    #[serde(rename = "under_5mb", alias = "<5MB")]
    Under5Mb,
}

impl TargetSize {
    pub fn max_dimensions(self) -> Option<(u32, u32)> {
        match self {
            TargetSize::None => None,
            TargetSize::Under100Kb => Some((800, 600)),
            TargetSize::Under500Kb => Some((1200, 900)),
            TargetSize::Under1Mb => Some((1600, 1200)),
            TargetSize::Under5Mb => Some((2000, 1500)),
        }
    }
}

fn clamp_dimension(value: u32) -> u32 {
    value.clamp(MIN_DIMENSION, MAX_DIMENSION)
}

fn checked_dimension(value: f64, axis: &str) -> crate::error::Result<u32> {
    let rounded = value.round();
    if !rounded.is_finite() || rounded < 1.0 {
        return Err(ConvertError::invalid_dimension(format!(
            "resolved {axis} {value} is not positive"
        )));
    }
    if rounded > u32::MAX as f64 {
        return Err(ConvertError::invalid_dimension(format!(
            "resolved {axis} {value} is too large"
        )));
    }
    Ok(rounded as u32)
}

/// Resolve the target size of a resize.
///
/// A percentage scales both sides and is never aspect locked. `Explicit`
/// and `Preset` sizes are clamped to `[MIN_DIMENSION, MAX_DIMENSION]`.
///
/// With the aspect lock on, the requested width is always kept and the
/// height is derived from the source ratio, whichever side the request
/// over-constrains. A 1000x500 source asked for 400x100 resolves to 400x200.
/// Only when the derived height exceeds `MAX_DIMENSION` is the height capped
/// and the width derived from it.
///
/// # Errors
/// `InvalidDimension` if the source or a resolved side is not positive, or
/// if a percentage would produce a side larger than `MAX_DIMENSION`.
pub fn resolve(
    width: u32,
    height: u32,
    spec: &ResizeSpec,
    keep_aspect: bool,
) -> crate::error::Result<(u32, u32)> {
    if width == 0 || height == 0 {
        return Err(ConvertError::invalid_dimension(format!(
            "source dimensions {width}x{height} are not positive"
        )));
    }

    let (req_w, req_h) = match *spec {
        ResizeSpec::Percentage(percent) => {
            if !percent.is_finite() || percent <= 0.0 {
                return Err(ConvertError::invalid_dimension(format!(
                    "scale percentage must be positive, got {percent}"
                )));
            }
            let w = checked_dimension(width as f64 * percent / 100.0, "width")?;
            let h = checked_dimension(height as f64 * percent / 100.0, "height")?;
            if w > MAX_DIMENSION || h > MAX_DIMENSION {
                return Err(ConvertError::invalid_dimension(format!(
                    "{percent}% of {width}x{height} is {w}x{h}, beyond {MAX_DIMENSION} pixels"
                )));
            }
            return Ok((w, h));
        }
        ResizeSpec::Explicit { width, height } => (clamp_dimension(width), clamp_dimension(height)),
        ResizeSpec::Preset(preset) => preset.dimensions(),
    };

    if !keep_aspect {
        return Ok((req_w, req_h));
    }

    // Width wins in both directions; the req_w/req_h > ratio case does not
    // shrink the width.
    let ratio = width as f64 / height as f64;
    let h = checked_dimension(req_w as f64 / ratio, "height")?;
    if h <= MAX_DIMENSION {
        return Ok((req_w, h));
    }
    let w = checked_dimension(MAX_DIMENSION as f64 * ratio, "width")?;
    Ok((w, MAX_DIMENSION))
}

/// Scale `(width, height)` down to fit inside the box, preserving aspect
/// ratio. Sizes already inside the box are returned unchanged.
pub fn contain_fit(width: u32, height: u32, box_width: u32, box_height: u32) -> (u32, u32) {
    if width <= box_width && height <= box_height {
        return (width, height);
    }
    let scale = f64::min(
        box_width as f64 / width as f64,
        box_height as f64 / height as f64,
    );
    let fit = |side: u32, limit: u32| -> u32 {
        ((side as f64 * scale).round() as u32).clamp(1, limit.max(1))
    };
    (fit(width, box_width), fit(height, box_height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contain_fit_never_upscales() {
        assert_eq!(contain_fit(100, 50, 2480, 3508), (100, 50));
    }

    #[test]
    fn contain_fit_landscape_into_portrait_box() {
        assert_eq!(contain_fit(4000, 2000, 2480, 3508), (2480, 1240));
    }

    #[test]
    fn custom_preset_is_clamped() {
        let preset = Preset::Custom {
            width: 0,
            height: 9000,
        };
        assert_eq!(preset.dimensions(), (1, 5000));
    }
}
