//! Error types for the estrai-core library.

use thiserror::Error;

/// Main error type for the estrai library.
#[derive(Error, Debug)]
pub enum EstraiError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// The document has no embedded text layer (scanned PDF).
    #[error("document has no extractable text, OCR is required")]
    UnsupportedDocument,

    /// Malformed or missing input (file, document kind).
    #[error("invalid input: {0}")]
    Input(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Coarse classification of failures, as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The request itself was malformed; nothing was extracted.
    Input,
    /// The document has no text layer and needs a different ingestion path.
    UnsupportedDocument,
    /// Anything else. Details stay in the logs.
    Internal,
}

impl EstraiError {
    /// Classify this error for the caller-facing failure surface.
    pub fn class(&self) -> ErrorClass {
        match self {
            EstraiError::Input(_) => ErrorClass::Input,
            EstraiError::UnsupportedDocument => ErrorClass::UnsupportedDocument,
            EstraiError::Pdf(_) | EstraiError::Io(_) | EstraiError::Config(_) => {
                ErrorClass::Internal
            }
        }
    }
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors raised by the text-to-JSON assistant.
///
/// These never reach the caller: the orchestrator logs them and keeps the
/// locally extracted values.
#[derive(Error, Debug)]
pub enum AssistantError {
    /// The API key environment variable is not set.
    #[error("API key not configured (set {0})")]
    MissingApiKey(String),

    /// Transport failure or timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("assistant returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The reply could not be read as a JSON object.
    #[error("malformed assistant reply: {0}")]
    MalformedReply(String),
}

/// Result type for the estrai library.
pub type Result<T> = std::result::Result<T, EstraiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_class() {
        assert_eq!(
            EstraiError::Input("missing file".into()).class(),
            ErrorClass::Input
        );
        assert_eq!(
            EstraiError::UnsupportedDocument.class(),
            ErrorClass::UnsupportedDocument
        );
        assert_eq!(
            EstraiError::Pdf(PdfError::NoPages).class(),
            ErrorClass::Internal
        );
    }
}
