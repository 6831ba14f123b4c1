//! Error types for deck generation and inspection.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, writing, or reading a presentation.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file or buffer.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The uploaded image is not in a format that can be embedded.
    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    /// A required input field was not supplied.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// An input field was supplied but could not be used.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A PPTX part is not well-formed XML.
    #[error("PPTX parsing error: {0}")]
    PptxParseError(String),

    /// Invalid or corrupted file.
    #[error("Invalid or corrupted file: {0}")]
    CorruptedFile(String),

    /// ZIP archive error.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML reading or writing error.
    #[error("XML error: {0}")]
    XmlError(String),
}
