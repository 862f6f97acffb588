//! # WAFv2 Template - Assembly, Fingerprinting and Change Detection
//!
//! Turns typed WAFv2 records into a CloudFormation template, and compares
//! two templates to show what a deployment would change.
//!
//! ## Purpose
//!
//! 1. **Assembly** - [`Template`] holds resources by logical id, builds
//!    `Ref` / `Fn::GetAtt` values that are checked against declared
//!    resources, and verifies that nothing references an undeclared id.
//!
//! 2. **Canonical Fingerprint** - [`canonicalize`] renders JSON with sorted
//!    keys and no whitespace, so [`Template::fingerprint`] is stable across
//!    key order and formatting.
//!
//! 3. **Change Detection** - [`diff`] classifies every logical id as
//!    added, removed, modified in place or replaced.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  add_resource   ┌──────────────────────────────┐
//! │ WafResource  │────────────────▶│           Template           │
//! │ (wafv2-model)│                 │  Resources: BTreeMap<id, …>  │
//! └──────────────┘                 │  Outputs                     │
//!                                  └───────┬──────────────┬───────┘
//!                                          │ to_json      │ old, new
//!                                          ▼              ▼
//!                                 ┌────────────────┐ ┌──────────────┐
//!                                 │ CANONICALIZER  │ │    DIFF      │
//!                                 │ sorted keys    │ │ Add │ Modify │
//!                                 │ SHA-256 ──────▶│─│ Replace│Remove│
//!                                 └────────────────┘ └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use wafv2_model::{IpAddressVersion, IpSet, Scope};
//! use wafv2_template::{Output, Template};
//!
//! let mut template = Template::new().with_description("office allow list");
//! template.add_resource(
//!     "Office",
//!     IpSet::builder()
//!         .with_addresses(["198.51.100.0/24"])
//!         .with_ip_address_version(IpAddressVersion::Ipv4)
//!         .with_scope(Scope::Regional)
//!         .build()?,
//! )?;
//! let arn = template.get_att("Office", "Arn")?;
//! template.add_output("OfficeArn", Output::new(arn))?;
//! template.check_references()?;
//!
//! let fingerprint = template.fingerprint()?;
//! let reparsed = Template::from_json(&template.to_json_pretty()?)?;
//! assert_eq!(reparsed.fingerprint()?, fingerprint);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## References
//!
//! - CloudFormation template anatomy:
//!   <https://docs.aws.amazon.com/AWSCloudFormation/latest/UserGuide/template-anatomy.html>
//! - Update behaviors of stack resources:
//!   <https://docs.aws.amazon.com/AWSCloudFormation/latest/UserGuide/using-cfn-updating-stacks-update-behaviors.html>
//! - RFC 8785 - JSON Canonicalization Scheme

pub mod canonicalize;
pub mod diff;
pub mod error;
pub mod refs;
pub mod template;

pub use canonicalize::{canonicalize, fingerprint, Fingerprint};
pub use diff::{diff, ChangeAction, ChangeImpact, ChangeSet, ResourceChange};
pub use error::{Result, TemplateError};
pub use refs::Reference;
pub use template::{is_valid_logical_id, Export, Output, ResourceEntry, Template, FORMAT_VERSION};

#[cfg(test)]
mod tests;
