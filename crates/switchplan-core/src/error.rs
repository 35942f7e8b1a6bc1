// ── Core error types ──
//
// User-facing errors from switchplan-core. Every message is written for
// the operator looking at the notification toast, not for a log file.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A form field failed a required-field or numeric-range rule.
    /// The dialog stays open and no mutation occurs.
    #[error("{message}")]
    Validation { message: String },

    /// An edit/delete/preview action was invoked with nothing selected.
    #[error("Select a {what} entry first")]
    NothingSelected { what: &'static str },
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn nothing_selected(what: &'static str) -> Self {
        Self::NothingSelected { what }
    }
}
