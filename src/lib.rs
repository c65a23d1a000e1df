pub mod config;
pub mod error;
pub mod model;
pub mod pdf;
pub mod pipeline;
pub mod raster;
pub mod render;
pub mod report;

pub use error::{ConvertError, Result};
pub use model::{
    Artifact, ArtifactFormat, CompressionTier, ConversionKind, ConversionRequest,
    ConversionResult,
};
pub use pipeline::orchestrator::{DocumentInfo, convert, inspect};
pub use raster::{OutputFormat, PixelFormat, RasterImage};
