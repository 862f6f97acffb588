//! Error types for the WAFv2 data model.
//!
//! Construction of a resource record can fail in exactly one way: a required
//! CloudFormation property was never supplied to the builder. Rendering can
//! additionally fail if `serde_json` rejects a value, which does not happen
//! for the types defined in this crate but is surfaced rather than hidden.

use thiserror::Error;

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised while building or rendering WAFv2 records.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A required property was not set before `build()`.
    ///
    /// The message mirrors the CloudFormation property name so it can be
    /// matched against the resource schema documentation.
    #[error("Required property '{property}' is missing")]
    MissingProperty {
        /// CloudFormation type name of the record being built.
        resource: &'static str,
        /// CloudFormation property name that was not supplied.
        property: &'static str,
    },

    /// Both or neither of two mutually exclusive keys were present.
    #[error("{owner} needs exactly one of '{first}' or '{second}', found {found}")]
    ExclusiveProperty {
        owner: &'static str,
        first: &'static str,
        second: &'static str,
        found: usize,
    },

    /// Failed to render a record to JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Unwraps a builder slot or reports the missing property.
pub(crate) fn required<T>(
    value: Option<T>,
    resource: &'static str,
    property: &'static str,
) -> Result<T> {
    value.ok_or(ModelError::MissingProperty { resource, property })
}

/// Picks the single present value of two exclusive keys.
pub(crate) fn exactly_one<A, B>(
    first: Option<A>,
    second: Option<B>,
    owner: &'static str,
    keys: (&'static str, &'static str),
) -> Result<std::result::Result<A, B>> {
    match (first, second) {
        (Some(a), None) => Ok(Ok(a)),
        (None, Some(b)) => Ok(Err(b)),
        (a, b) => Err(ModelError::ExclusiveProperty {
            owner,
            first: keys.0,
            second: keys.1,
            found: usize::from(a.is_some()) + usize::from(b.is_some()),
        }),
    }
}
