//! Error taxonomy for collection access and export

use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while reading or mutating a collection.
///
/// The accessor never panics and never fails synchronously: a failed read
/// surfaces on the fetch state, a failed mutation as the `Err` of its future.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum AccessError {
    /// The backing store was unreachable or the request did not complete.
    #[error("store transport failed: {message}")]
    #[diagnostic(code(atrium::store::transport))]
    Transport { message: String },

    /// The store rejected the payload shape or a constraint.
    #[error("store rejected payload: {message}")]
    #[diagnostic(code(atrium::store::validation))]
    Validation { message: String },

    /// The mutation target does not exist.
    #[error("no record '{id}' in collection '{collection}'")]
    #[diagnostic(code(atrium::store::not_found))]
    NotFound { collection: String, id: String },
}

impl AccessError {
    pub fn transport(message: impl Into<String>) -> Self {
        AccessError::Transport {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AccessError::NotFound { .. })
    }
}

/// Errors that can occur while producing an export artifact
#[derive(Debug, Error, Diagnostic)]
pub enum ExportError {
    #[error("failed to build workbook: {0}")]
    #[diagnostic(code(atrium::export::workbook))]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("failed to render print document: {0}")]
    #[diagnostic(code(atrium::export::template))]
    Template(#[from] tera::Error),
}
