//! PPTX (Office Open XML) backend: writes generated decks and reads them back.
//!
//! A .pptx file is a ZIP archive of XML parts tied together by relationship parts.

pub mod parser;
pub mod parts;
pub mod writer;

pub use parser::PptxParser;
pub use parts::PPTX_MIME;
pub use writer::PptxWriter;
