//! Configuration and manifest types for WAFv2 stacks.
//!
//! A manifest is a TOML or JSON document with three settings tables and the
//! stack's resources:
//!
//! ```toml
//! [stack]
//! name = "edge"
//! region = "us-east-1"
//!
//! [validation]
//! deny_warnings = true
//!
//! [resources.Office]
//! Type = "AWS::WAFv2::IPSet"
//!
//! [resources.Office.Properties]
//! Addresses = ["198.51.100.0/24"]
//! IPAddressVersion = "IPV4"
//! Scope = "REGIONAL"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use wafv2_model::CLOUDFRONT_REGION;
use wafv2_template::{Output, ResourceEntry};

use crate::error::{Result, StackError};

/// Settings for building and checking one stack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    pub stack: StackSettings,
    pub validation: ValidationConfig,
    pub output: OutputConfig,
}

/// Identity of the stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackSettings {
    /// Stack name.
    pub name: String,

    /// Region the template is deployed to.
    pub region: String,

    /// Template `Description`.
    pub description: Option<String>,
}

impl Default for StackSettings {
    fn default() -> Self {
        Self {
            name: "wafv2".to_string(),
            region: CLOUDFRONT_REGION.to_string(),
            description: None,
        }
    }
}

/// Validator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Treat warnings as failures.
    pub deny_warnings: bool,

    /// Report CLOUDFRONT-scoped resources declared outside us-east-1.
    pub require_us_east_1_for_cloudfront: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            deny_warnings: false,
            require_us_east_1_for_cloudfront: true,
        }
    }
}

/// Rendering settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Indent rendered templates.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl StackConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads a TOML settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.stack.region = region.into();
        self
    }
}

/// Settings plus the resources and outputs of a stack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackManifest {
    #[serde(flatten)]
    pub config: StackConfig,

    /// Resources by logical id.
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceEntry>,

    #[serde(default)]
    pub outputs: BTreeMap<String, Output>,
}

/// Manifest encodings, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Toml,
    Json,
}

impl ManifestFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();
        match extension.as_str() {
            "toml" => Ok(ManifestFormat::Toml),
            "json" => Ok(ManifestFormat::Json),
            _ => Err(StackError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl StackManifest {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn parse(text: &str, format: ManifestFormat) -> Result<Self> {
        match format {
            ManifestFormat::Toml => Self::from_toml_str(text),
            ManifestFormat::Json => Self::from_json_str(text),
        }
    }

    /// Reads a `.toml` or `.json` manifest.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = ManifestFormat::from_path(path)?;
        let text = std::fs::read_to_string(path)?;
        let manifest = Self::parse(&text, format)?;
        debug!(
            path = %path.display(),
            resources = manifest.resources.len(),
            "manifest loaded"
        );
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wafv2_model::WafResource;

    #[test]
    fn test_default_config() {
        let config = StackConfig::default();
        assert_eq!(config.stack.region, "us-east-1");
        assert!(config.validation.require_us_east_1_for_cloudfront);
        assert!(!config.validation.deny_warnings);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = StackConfig::from_toml_str(
            r#"
            [stack]
            name = "api"
            region = "eu-west-1"

            [output]
            pretty = false
            "#,
        )
        .unwrap();
        assert_eq!(config.stack.name, "api");
        assert_eq!(config.stack.region, "eu-west-1");
        assert!(config.validation.require_us_east_1_for_cloudfront);
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let err = StackConfig::from_toml_str("[stack\nname = 1").unwrap_err();
        assert!(matches!(err, StackError::Config(_)));
    }

    #[test]
    fn test_manifest_from_toml() {
        let manifest = StackManifest::from_toml_str(
            r#"
            [stack]
            name = "edge"

            [resources.Office]
            Type = "AWS::WAFv2::IPSet"
            DependsOn = "Probes"

            [resources.Office.Properties]
            Addresses = ["198.51.100.0/24"]
            IPAddressVersion = "IPV4"
            Scope = "REGIONAL"

            [resources.Probes]
            Type = "AWS::WAFv2::RegexPatternSet"

            [resources.Probes.Properties]
            RegularExpressionList = ["^/wp-"]
            Scope = "REGIONAL"
            "#,
        )
        .unwrap();

        assert_eq!(manifest.config.stack.name, "edge");
        assert_eq!(manifest.config.stack.region, "us-east-1");
        assert_eq!(manifest.resources.len(), 2);
        let office = &manifest.resources["Office"];
        assert!(matches!(office.resource, WafResource::IpSet(_)));
        assert_eq!(office.depends_on, vec!["Probes".to_string()]);
    }

    #[test]
    fn test_manifest_format_by_extension() {
        assert_eq!(
            ManifestFormat::from_path(Path::new("stack.TOML")).unwrap(),
            ManifestFormat::Toml
        );
        assert_eq!(
            ManifestFormat::from_path(Path::new("stack.json")).unwrap(),
            ManifestFormat::Json
        );
        assert!(matches!(
            ManifestFormat::from_path(Path::new("stack.yaml")),
            Err(StackError::UnsupportedFormat(_))
        ));
    }
}
