//! Unified error type for the ledger.
//!
//! Structural lookup failures (unknown view, template, type, cadence) are
//! returned to the caller. Dirty reference data such as category cycles or
//! dangling category names never surfaces here; it is logged and recovered.

use thiserror::Error;

/// All errors produced by the ledger.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A category referenced by name does not exist
    #[error("Category not found: {name}")]
    CategoryNotFound {
        /// Category name
        name: String,
    },

    /// An entry type does not exist and could not be created implicitly
    #[error("Entry type not defined: {name}")]
    TypeNotFound {
        /// Type name
        name: String,
    },

    /// A view template does not exist
    #[error("View template not found: {name}")]
    TemplateNotFound {
        /// Template name
        name: String,
    },

    /// A view does not exist
    #[error("View not found: {name}")]
    ViewNotFound {
        /// View name
        name: String,
    },

    /// A stored automation carries an unknown cadence value
    #[error("Unsupported automation cadence: {value}")]
    InvalidCadence {
        /// The raw stored value
        value: i32,
    },

    /// Input rejected by validation
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the input
        message: String,
    },

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
