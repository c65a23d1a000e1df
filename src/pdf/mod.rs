pub mod assemble;
pub mod optimizer;
pub mod reader;
pub mod writer;

pub use assemble::assemble;
pub use reader::{PageRect, PdfReader};
pub use writer::{PageImage, PdfPageWriter};
