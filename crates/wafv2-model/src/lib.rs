//! # WAFv2 Model - Typed CloudFormation Records for AWS WAF
//!
//! This crate mirrors the CloudFormation resource schema of the six
//! `AWS::WAFv2::*` resource types as plain Rust records. Each record knows
//! its CloudFormation type name and renders its `Properties` object with
//! the exact wire names CloudFormation expects.
//!
//! ## Purpose
//!
//! 1. **Resource records** - [`IpSet`], [`LoggingConfiguration`],
//!    [`RegexPatternSet`], [`RuleGroup`], [`WebAcl`] and
//!    [`WebAclAssociation`], each with a builder that reports
//!    `Required property 'X' is missing` when a required property is unset.
//!
//! 2. **Statement grammar** - [`Statement`] and [`NestableStatement`] encode
//!    WAF's recursive rule statements as sum types. A statement always has
//!    exactly one variant, and the statements that may only appear at the
//!    top of a rule cannot be nested.
//!
//! 3. **Rendering** - [`CfnResource::render_properties`] and the
//!    [`WafResource`] sum produce template fragments; parsing goes the other
//!    way through the same `serde` derives.
//!
//! ## Resource Schema
//!
//! | Type | Required | Optional |
//! |------|----------|----------|
//! | `AWS::WAFv2::IPSet` | Addresses, IPAddressVersion, Scope | Description, Name, Tags |
//! | `AWS::WAFv2::LoggingConfiguration` | LogDestinationConfigs, ResourceArn | LoggingFilter, RedactedFields |
//! | `AWS::WAFv2::RegexPatternSet` | RegularExpressionList, Scope | Description, Name, Tags |
//! | `AWS::WAFv2::RuleGroup` | Capacity, Scope, VisibilityConfig | CustomResponseBodies, Description, Name, Rules, Tags |
//! | `AWS::WAFv2::WebACL` | DefaultAction, Scope, VisibilityConfig | CaptchaConfig, CustomResponseBodies, Description, Name, Rules, Tags |
//! | `AWS::WAFv2::WebACLAssociation` | ResourceArn, WebACLArn | |
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        WafResource                           │
//! │   IpSet │ RegexPatternSet │ RuleGroup │ WebAcl │ Logging │ … │
//! └───────────────────────────────┬──────────────────────────────┘
//!                                 │ rules
//!                                 ▼
//!                     ┌───────────────────────┐
//!                     │         Rule          │
//!                     │ name, priority,       │
//!                     │ Action│OverrideAction │
//!                     └───────────┬───────────┘
//!                                 │ statement
//!                                 ▼
//!   ┌─────────────────────────────────────────────────────────┐
//!   │ Statement                                               │
//!   │   RateBased ─┐   ManagedRuleGroup ─┐   RuleGroupRef     │
//!   │              │ scope-down          │ scope-down         │
//!   │              ▼                     ▼                    │
//!   │   NestableStatement: leaves │ And │ Or │ Not (recursive) │
//!   └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use wafv2_model::{
//!     CfnResource, DefaultAction, IpAddressVersion, IpSet, NestableStatement, Rule,
//!     RuleAction, Scope, VisibilityConfig, WebAcl,
//! };
//!
//! let blocked = IpSet::builder()
//!     .with_addresses(["203.0.113.0/24"])
//!     .with_ip_address_version(IpAddressVersion::Ipv4)
//!     .with_scope(Scope::Regional)
//!     .build()?;
//!
//! let acl = WebAcl::builder()
//!     .with_default_action(DefaultAction::allow())
//!     .with_scope(Scope::Regional)
//!     .with_visibility_config(VisibilityConfig::enabled("api"))
//!     .with_rule(Rule::with_action(
//!         "blocked-ips",
//!         0,
//!         NestableStatement::ip_set_reference(
//!             "arn:aws:wafv2:eu-west-1:111122223333:regional/ipset/blocked/1",
//!         ),
//!         RuleAction::block(),
//!         VisibilityConfig::enabled("blocked-ips"),
//!     ))
//!     .build()?;
//!
//! assert_eq!(IpSet::TYPE_NAME, "AWS::WAFv2::IPSet");
//! assert_eq!(blocked.render_properties()?["Scope"], "REGIONAL");
//! assert_eq!(acl.render_properties()?["Rules"][0]["Action"], serde_json::json!({"Block": {}}));
//! # Ok::<(), wafv2_model::ModelError>(())
//! ```
//!
//! ## Scope Notes
//!
//! - Semantic checks that need context beyond one record (unique rule
//!   priorities, the CloudFront region rule, rule-group-only statements)
//!   live in the `wafv2-stack` validator.
//! - Capacity accounting and CIDR syntax are left to CloudFormation.
//!
//! ## References
//!
//! - AWS WAFv2 resource type reference:
//!   <https://docs.aws.amazon.com/AWSCloudFormation/latest/UserGuide/AWS_WAFv2.html>
//! - AWS WAF rule statements:
//!   <https://docs.aws.amazon.com/waf/latest/developerguide/waf-rule-statements.html>

pub mod action;
pub mod association;
pub mod common;
pub mod error;
pub mod field;
pub mod ip_set;
pub mod logging;
pub mod regex_pattern_set;
pub mod resource;
pub mod rule;
pub mod rule_group;
pub mod statement;
pub mod web_acl;

pub use action::{BlockAction, DefaultAction, OverrideAction, RequestAction, RuleAction};
pub use association::WebAclAssociation;
pub use common::{
    CfnString, CustomResponseBody, IpAddressVersion, Intrinsic, Label, ResponseContentType,
    Scope, Tag, VisibilityConfig, CLOUDFRONT_REGION,
};
pub use error::{ModelError, Result};
pub use field::{FieldToMatch, TextTransformation, TextTransformationType};
pub use ip_set::IpSet;
pub use logging::{LoggingConfiguration, LoggingFilter};
pub use regex_pattern_set::RegexPatternSet;
pub use resource::{CfnResource, WafResource};
pub use rule::{CaptchaConfig, Rule, RuleBehavior};
pub use rule_group::RuleGroup;
pub use statement::{NestableStatement, RateBasedStatement, Statement};
pub use web_acl::WebAcl;

#[cfg(test)]
mod tests;
