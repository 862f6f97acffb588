//! Error types for template assembly.

use thiserror::Error;

/// Errors raised while building, reading or comparing templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Logical ids are 1-255 ASCII alphanumerics.
    #[error("Invalid logical id '{0}': expected 1-255 alphanumeric characters")]
    InvalidLogicalId(String),

    #[error("Logical id already declared: {0}")]
    DuplicateLogicalId(String),

    #[error("Unknown logical id: {0}")]
    UnknownLogicalId(String),

    #[error("Resource '{logical_id}' ({type_name}) has no attribute '{attribute}'")]
    UnknownAttribute {
        logical_id: String,
        type_name: &'static str,
        attribute: String,
    },

    /// A `Ref`, `Fn::GetAtt`, `Fn::Sub` variable or `DependsOn` entry
    /// points at nothing declared in the template.
    #[error("'{source_id}' references undeclared target '{target}'")]
    DanglingReference { source_id: String, target: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Model error: {0}")]
    Model(#[from] wafv2_model::ModelError),
}

/// Result type alias for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;
