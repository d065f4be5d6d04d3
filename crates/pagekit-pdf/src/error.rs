use pagekit_core::{GeometryError, PageError, RangeError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    #[error("PDF operation failed: {0}")]
    Operation(String),

    #[error("PDF is encrypted; unlock it before editing")]
    Encrypted,

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("Failed to decrypt PDF: {0}")]
    Decryption(String),

    #[error(transparent)]
    Page(#[from] PageError),
}

impl From<RangeError> for PdfError {
    fn from(err: RangeError) -> Self {
        PdfError::Page(err.into())
    }
}

impl From<GeometryError> for PdfError {
    fn from(err: GeometryError) -> Self {
        PdfError::Page(err.into())
    }
}
