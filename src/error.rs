use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Image decode error: {0}")]
    DecodeError(String),

    #[error("PDF open error: {0}")]
    DocumentOpenError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Image encode error: {0}")]
    EncodeError(String),

    #[error("PDF write error: {0}")]
    PdfWriteError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Generates factory methods for [`ConvertError`] variants that wrap a `String`.
macro_rules! error_constructors {
    ($(
        $(#[doc = $doc:expr])*
        $method:ident => $variant:ident
    ),* $(,)?) => {
        impl ConvertError {
            $(
                $(#[doc = $doc])*
                pub fn $method(msg: impl Into<String>) -> Self {
                    Self::$variant(msg.into())
                }
            )*
        }
    };
}

error_constructors! {
    /// Create an image decode error.
    decode => DecodeError,
    /// Create a PDF open error.
    document_open => DocumentOpenError,
    /// Create a render backend error.
    render => RenderError,
    /// Create an invalid dimension error.
    invalid_dimension => InvalidDimension,
    /// Create an unsupported format error.
    unsupported_format => UnsupportedFormat,
    /// Create an image encode error.
    encode => EncodeError,
    /// Create a PDF write error.
    pdf_write => PdfWriteError,
    /// Create an invalid request error.
    invalid_request => InvalidRequest,
    /// Create a configuration error.
    config => ConfigError,
}

impl From<lopdf::Error> for ConvertError {
    fn from(e: lopdf::Error) -> Self {
        Self::DocumentOpenError(e.to_string())
    }
}

impl From<serde_yml::Error> for ConvertError {
    fn from(e: serde_yml::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}

impl From<serde_json::Error> for ConvertError {
    fn from(e: serde_json::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}

impl From<pdfium_render::prelude::PdfiumError> for ConvertError {
    fn from(e: pdfium_render::prelude::PdfiumError) -> Self {
        Self::DocumentOpenError(e.to_string())
    }
}

impl From<image::ImageError> for ConvertError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::Unsupported(u) => Self::UnsupportedFormat(u.to_string()),
            image::ImageError::Decoding(d) => Self::DecodeError(d.to_string()),
            other => Self::EncodeError(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
