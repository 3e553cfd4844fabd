//! Error types for the intake engine.
//!
//! This module defines all error types that can occur while driving a
//! questionnaire session, capturing a signature, or exporting a record.

/// Result type alias for intake engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during intake processing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Intake form validation failed (empty name, missing date, bad index).
    /// Recoverable: the caller corrects the input and resubmits.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Export or completion attempted with a blank signature surface.
    #[error("Signature is empty: draw at least one stroke before exporting")]
    EmptySignature,

    /// Operation called in a phase that does not accept it.
    #[error("Invalid transition: cannot {action} while in {from}")]
    InvalidTransition {
        /// Phase the session was in when the call arrived
        from: &'static str,
        /// Operation that was attempted
        action: &'static str,
    },

    /// Admin operation attempted without a successful login.
    #[error("Access denied: admin authentication required")]
    AccessDenied,

    /// Unrecoverable document-export failure. Session state is unaffected
    /// and the caller may retry.
    #[error("Render failed: {0}")]
    Render(String),

    /// Signature image could not be decoded or embedded. Rendering degrades
    /// to a textual fallback instead of surfacing this to the user.
    #[error("Image error: {0}")]
    Image(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted question list could not be parsed or written
    #[error("Question store error: {0}")]
    Json(#[from] serde_json::Error),
}
