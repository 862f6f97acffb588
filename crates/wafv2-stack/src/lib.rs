//! # WAFv2 Stack
//!
//! Assembles WAFv2 resources into a stack, checks them against the rules
//! WAF enforces at deploy time, and synthesizes the CloudFormation template.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │   Manifest   │───►│    Stack     │───►│  Validator   │───►│ Synthesized  │
//! │ (TOML/JSON)  │    │  (Template)  │    │  (Findings)  │    │ + Fingerprint│
//! └──────────────┘    └──────────────┘    └──────────────┘    └──────────────┘
//!                            ▲
//!                   add / associate (code)
//! ```
//!
//! Synthesis stops at the first failing stage:
//!
//! 1. Reference check: every `Ref`, `Fn::GetAtt`, `Fn::Sub` and `DependsOn`
//!    target is declared.
//! 2. Validation: no errors, and no warnings when `deny_warnings` is set.
//! 3. Fingerprint of the canonical template.
//!
//! ## Usage
//!
//! ```rust
//! use wafv2_stack::{Stack, StackManifest};
//!
//! let manifest = StackManifest::from_toml_str(r#"
//!     [stack]
//!     name = "office"
//!     region = "eu-west-1"
//!
//!     [resources.Office]
//!     Type = "AWS::WAFv2::IPSet"
//!
//!     [resources.Office.Properties]
//!     Addresses = ["198.51.100.0/24"]
//!     IPAddressVersion = "IPV4"
//!     Scope = "REGIONAL"
//! "#).unwrap();
//!
//! let stack = Stack::from_manifest(manifest).unwrap();
//! let synthesized = stack.synth().unwrap();
//! assert!(synthesized.report.is_empty());
//! println!("{}", stack.render(&synthesized).unwrap());
//! ```
//!
//! ## Configuration
//!
//! See [`StackConfig`]. Defaults target `us-east-1`, report CLOUDFRONT
//! resources declared elsewhere, allow warnings and render indented JSON.

mod config;
mod error;
mod stack;
pub mod validate;

pub use config::{
    ManifestFormat, OutputConfig, StackConfig, StackManifest, StackSettings, ValidationConfig,
};
pub use error::{Result, StackError};
pub use stack::{Stack, Synthesized};
pub use validate::{Finding, FindingKind, Severity, ValidationReport, Validator};
