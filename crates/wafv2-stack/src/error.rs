//! Error types for stack assembly.

use thiserror::Error;

use crate::validate::ValidationReport;

/// Errors raised while loading, validating or synthesizing a stack.
#[derive(Debug, Error)]
pub enum StackError {
    #[error("Template error: {0}")]
    Template(#[from] wafv2_template::TemplateError),

    #[error("Model error: {0}")]
    Model(#[from] wafv2_model::ModelError),

    /// Malformed TOML settings or manifest.
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("'{logical_id}' is a {type_name}, not a web ACL")]
    NotAWebAcl {
        logical_id: String,
        type_name: &'static str,
    },

    #[error("Unsupported manifest format: {0} (expected .toml or .json)")]
    UnsupportedFormat(String),

    /// The template has findings that fail the configured policy.
    #[error(
        "Validation failed: {} error(s), {} warning(s)",
        .0.error_count(),
        .0.warning_count()
    )]
    Validation(ValidationReport),
}

/// Result type alias for stack operations.
pub type Result<T> = std::result::Result<T, StackError>;
