//! Error handling for propsheet-rs
//!
//! Structural errors of the property model live in
//! [`model::PropertyError`](crate::model::PropertyError). This module wraps
//! them, together with configuration and I/O failures, in the crate-level
//! [`PropsheetError`] and provides a Result alias for use throughout the crate.

use crate::model::PropertyError;
use thiserror::Error;

/// Main error type for propsheet-rs operations
#[derive(Error, Debug)]
pub enum PropsheetError {
    /// Errors raised by the property model
    #[error("Property error: {0}")]
    Property(#[from] PropertyError),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PropsheetError>,
    },
}

impl PropsheetError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PropsheetError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<toml::de::Error> for PropsheetError {
    fn from(err: toml::de::Error) -> Self {
        PropsheetError::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for PropsheetError {
    fn from(err: toml::ser::Error) -> Self {
        PropsheetError::Serialization(err.to_string())
    }
}

/// Result type alias for propsheet-rs operations
pub type Result<T> = std::result::Result<T, PropsheetError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<PropsheetError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: PropsheetError = e.into();
            err.with_context(context)
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: PropsheetError = e.into();
            err.with_context(f())
        })
    }
}
