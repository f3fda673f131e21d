//! Error types for the label engine

use thiserror::Error;

/// Label engine error types
#[derive(Debug, Error)]
pub enum LabelError {
    /// A required field is absent from the input record.
    /// Detected before any rendering work begins.
    #[error("record '{record_id}': required field '{field}' is missing")]
    Input {
        record_id: String,
        field: &'static str,
    },

    /// A decorative asset (logo) is unavailable.
    /// Recovered locally by the renderers: the element is omitted and
    /// layout continues. Never surfaced to callers as a failure.
    #[error("asset unavailable: {0}")]
    Asset(String),

    /// Barcode generation failed for the given content.
    /// Fatal to that record's render.
    #[error("barcode encoding failed for SKU '{sku}': {reason}")]
    Encoding { sku: String, reason: String },

    /// Artifact write/stream failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Printer connection failure
    #[error("printer connection failed: {0}")]
    Connection(String),

    /// Printer operation timed out
    #[error("printer timeout: {0}")]
    Timeout(String),

    /// OS print spooler failure
    #[error("spooler error: {0}")]
    Spooler(String),

    /// Document backend failure (PDF generation)
    #[error("document generation failed: {0}")]
    Document(String),
}

/// Result type for label engine operations
pub type LabelResult<T> = Result<T, LabelError>;
