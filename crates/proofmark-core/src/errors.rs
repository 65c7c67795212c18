//! Unified error type for the fulfillment pipeline
//!
//! A single enum covers the whole error taxonomy so collaborators can
//! propagate with `?` and the orchestrator can classify failures without
//! downcasting. Degradations (remote delete failed, attestation slot
//! unpublishable, fee check stubbed) are not errors and never appear here;
//! they are recorded as fields on results.

use serde::{Deserialize, Serialize};

/// Unified error type for all pipeline operations
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum PipelineError {
    /// Invalid input or unknown jurisdiction; raised before any I/O
    #[error("Config error: {message}")]
    Config {
        /// What was missing or unknown
        message: String,
    },

    /// Content fingerprint mismatch; treated as a tampering signal
    #[error("Integrity error: {message}")]
    Integrity {
        /// Description of the mismatch (never includes content)
        message: String,
    },

    /// Stored-object fetch failed
    #[error("Fetch error: {message}")]
    Fetch {
        /// Transport-level failure description
        message: String,
    },

    /// Document rendering or packet composition failed
    #[error("Document error: {message}")]
    Document {
        /// Which document operation failed and why
        message: String,
    },

    /// Physical mail submission failed
    #[error("Mailing error: {message}")]
    Mailing {
        /// Mail gateway failure description
        message: String,
    },

    /// Attestation ledger publish failed (non-fatal at the orchestrator)
    #[error("Ledger error: {message}")]
    Ledger {
        /// Ledger transport or confirmation failure
        message: String,
    },

    /// Confirmation email failed (non-fatal at the orchestrator)
    #[error("Notification error: {message}")]
    Notification {
        /// Email delivery failure description
        message: String,
    },

    /// Internal invariant violation
    #[error("Internal error: {message}")]
    Internal {
        /// What went wrong
        message: String,
    },
}

impl PipelineError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an integrity error
    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity {
            message: message.into(),
        }
    }

    /// Create a fetch error
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    /// Create a document error
    pub fn document(message: impl Into<String>) -> Self {
        Self::Document {
            message: message.into(),
        }
    }

    /// Create a mailing error
    pub fn mailing(message: impl Into<String>) -> Self {
        Self::Mailing {
            message: message.into(),
        }
    }

    /// Create a ledger error
    pub fn ledger(message: impl Into<String>) -> Self {
        Self::Ledger {
            message: message.into(),
        }
    }

    /// Create a notification error
    pub fn notification(message: impl Into<String>) -> Self {
        Self::Notification {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether best-effort cleanup (buffer zeroize + stored-object delete)
    /// must run before this error propagates.
    ///
    /// Config errors fail fast before any transient resource is acquired,
    /// so there is nothing to clean up.
    pub fn triggers_recovery(&self) -> bool {
        !matches!(self, Self::Config { .. })
    }
}
