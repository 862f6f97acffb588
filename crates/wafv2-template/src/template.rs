//! # CloudFormation Template
//!
//! [`Template`] is the document CloudFormation deploys: a format version, an
//! optional description, the `Resources` map keyed by logical id and an
//! optional `Outputs` map. Resources are kept in a `BTreeMap` so the
//! rendered document lists them in logical id order.
//!
//! ```text
//! {
//!   "AWSTemplateFormatVersion": "2010-09-09",
//!   "Description": "...",
//!   "Resources": {
//!     "Acl":  { "Type": "AWS::WAFv2::WebACL", "Properties": { ... } },
//!     "Link": { "Type": "AWS::WAFv2::WebACLAssociation", "Properties": { ... },
//!               "DependsOn": ["Acl"] }
//!   },
//!   "Outputs": { "AclArn": { "Value": { "Fn::GetAtt": ["Acl", "Arn"] } } }
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use wafv2_model::{CfnString, WafResource};

use crate::canonicalize::{self, Fingerprint};
use crate::error::{Result, TemplateError};
use crate::refs::{self, Reference};

/// The only template format version CloudFormation defines.
pub const FORMAT_VERSION: &str = "2010-09-09";

/// Longest logical id CloudFormation accepts.
pub const MAX_LOGICAL_ID_LEN: usize = 255;

/// Logical ids are 1-255 ASCII letters and digits.
pub fn is_valid_logical_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_LOGICAL_ID_LEN
        && id.bytes().all(|b| b.is_ascii_alphanumeric())
}

fn check_logical_id(id: &str) -> Result<()> {
    if is_valid_logical_id(id) {
        Ok(())
    } else {
        Err(TemplateError::InvalidLogicalId(id.to_string()))
    }
}

/// One `Resources` entry: the typed resource plus explicit dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    #[serde(flatten)]
    pub resource: WafResource,
    #[serde(
        rename = "DependsOn",
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub depends_on: Vec<String>,
}

impl ResourceEntry {
    pub fn new(resource: impl Into<WafResource>) -> Self {
        Self {
            resource: resource.into(),
            depends_on: Vec::new(),
        }
    }

    /// Appends to `DependsOn`, skipping ids already listed.
    pub fn with_depends_on(mut self, logical_id: impl Into<String>) -> Self {
        let logical_id = logical_id.into();
        if !self.depends_on.contains(&logical_id) {
            self.depends_on.push(logical_id);
        }
        self
    }
}

/// `DependsOn` may be a single logical id or a list.
fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(id) => vec![id],
        OneOrMany::Many(ids) => ids,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Export {
    pub name: CfnString,
}

/// A stack output, optionally exported for cross-stack `Fn::ImportValue`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    pub value: CfnString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export: Option<Export>,
}

impl Output {
    pub fn new(value: impl Into<CfnString>) -> Self {
        Self {
            value: value.into(),
            description: None,
            export: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Exports the value under `name` for `Fn::ImportValue` in other stacks.
    pub fn with_export(mut self, name: impl Into<CfnString>) -> Self {
        self.export = Some(Export { name: name.into() });
        self
    }
}

/// A CloudFormation template holding WAFv2 resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion", default = "default_format_version")]
    pub format_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceEntry>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, Output>,
}

fn default_format_version() -> String {
    FORMAT_VERSION.to_string()
}

impl Default for Template {
    fn default() -> Self {
        Self {
            format_version: default_format_version(),
            description: None,
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }
}

impl Template {
    /// Empty template with the current format version.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the top-level `Description`.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declares `resource` under `logical_id`.
    ///
    /// # Arguments
    /// * `logical_id` - Alphanumeric id, unique among resources and outputs
    /// * `resource` - Any WAFv2 record, converted into a [`WafResource`]
    ///
    /// # Errors
    /// [`TemplateError::InvalidLogicalId`] for a malformed id and
    /// [`TemplateError::DuplicateLogicalId`] if it is already declared.
    pub fn add_resource(
        &mut self,
        logical_id: impl Into<String>,
        resource: impl Into<WafResource>,
    ) -> Result<()> {
        self.add_entry(logical_id, ResourceEntry::new(resource))
    }

    /// Declares a prepared entry, keeping its `DependsOn` list.
    pub fn add_entry(&mut self, logical_id: impl Into<String>, entry: ResourceEntry) -> Result<()> {
        let logical_id = logical_id.into();
        check_logical_id(&logical_id)?;
        if self.resources.contains_key(&logical_id) {
            return Err(TemplateError::DuplicateLogicalId(logical_id));
        }
        debug!(logical_id = %logical_id, type_name = entry.resource.type_name(), "resource added");
        self.resources.insert(logical_id, entry);
        Ok(())
    }

    /// Adds an explicit dependency of `logical_id` on `depends_on`.
    /// Adding the same dependency twice is a no-op.
    ///
    /// # Errors
    /// [`TemplateError::UnknownLogicalId`] if either id is not declared.
    pub fn add_dependency(&mut self, logical_id: &str, depends_on: impl Into<String>) -> Result<()> {
        let depends_on = depends_on.into();
        if !self.resources.contains_key(&depends_on) {
            return Err(TemplateError::UnknownLogicalId(depends_on));
        }
        let entry = self
            .resources
            .get_mut(logical_id)
            .ok_or_else(|| TemplateError::UnknownLogicalId(logical_id.to_string()))?;
        if !entry.depends_on.contains(&depends_on) {
            entry.depends_on.push(depends_on);
        }
        Ok(())
    }

    /// Declares a stack output. Output names follow the logical id rules.
    pub fn add_output(&mut self, name: impl Into<String>, output: Output) -> Result<()> {
        let name = name.into();
        check_logical_id(&name)?;
        if self.outputs.contains_key(&name) {
            return Err(TemplateError::DuplicateLogicalId(name));
        }
        self.outputs.insert(name, output);
        Ok(())
    }

    pub fn resource(&self, logical_id: &str) -> Option<&WafResource> {
        self.resources.get(logical_id).map(|entry| &entry.resource)
    }

    /// Resources in logical id order.
    pub fn resources(&self) -> impl Iterator<Item = (&str, &WafResource)> {
        self.resources
            .iter()
            .map(|(id, entry)| (id.as_str(), &entry.resource))
    }

    /// Number of declared resources. Outputs are not counted.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// `Ref` to a declared resource.
    pub fn ref_to(&self, logical_id: &str) -> Result<CfnString> {
        if !self.resources.contains_key(logical_id) {
            return Err(TemplateError::UnknownLogicalId(logical_id.to_string()));
        }
        Ok(CfnString::reference(logical_id))
    }

    /// `Fn::GetAtt` of a declared resource, checked against its type's
    /// attribute list.
    ///
    /// # Arguments
    /// * `logical_id` - A resource already added to this template
    /// * `attribute` - One of the type's attributes, e.g. `Arn` or `Id`
    ///
    /// # Errors
    /// [`TemplateError::UnknownLogicalId`] or
    /// [`TemplateError::UnknownAttribute`].
    pub fn get_att(&self, logical_id: &str, attribute: &str) -> Result<CfnString> {
        let resource = self
            .resource(logical_id)
            .ok_or_else(|| TemplateError::UnknownLogicalId(logical_id.to_string()))?;
        if !resource.attributes().contains(&attribute) {
            return Err(TemplateError::UnknownAttribute {
                logical_id: logical_id.to_string(),
                type_name: resource.type_name(),
                attribute: attribute.to_string(),
            });
        }
        Ok(CfnString::get_att(logical_id, attribute))
    }

    /// Ensures every `Ref`, `Fn::GetAtt`, `Fn::Sub` variable and
    /// `DependsOn` entry resolves to a declared resource, and every
    /// `Fn::GetAtt` names an attribute that resource exposes.
    ///
    /// # Errors
    /// The first [`TemplateError::DanglingReference`] or
    /// [`TemplateError::UnknownAttribute`] found, in logical id order.
    pub fn check_references(&self) -> Result<()> {
        for (logical_id, entry) in &self.resources {
            for target in &entry.depends_on {
                self.resolve(logical_id, &Reference { target: target.clone(), attribute: None })?;
            }
            let properties = entry.resource.render_properties()?;
            for reference in refs::collect(&properties) {
                self.resolve(logical_id, &reference)?;
            }
        }
        for (name, output) in &self.outputs {
            let value = serde_json::to_value(output)?;
            for reference in refs::collect(&value) {
                self.resolve(name, &reference)?;
            }
        }
        Ok(())
    }

    fn resolve(&self, source_id: &str, reference: &Reference) -> Result<()> {
        let target = self.resource(&reference.target).ok_or_else(|| {
            TemplateError::DanglingReference {
                source_id: source_id.to_string(),
                target: reference.target.clone(),
            }
        })?;
        match &reference.attribute {
            Some(attribute) if !target.attributes().contains(&attribute.as_str()) => {
                Err(TemplateError::UnknownAttribute {
                    logical_id: reference.target.clone(),
                    type_name: target.type_name(),
                    attribute: attribute.clone(),
                })
            }
            _ => Ok(()),
        }
    }

    /// The template as a JSON value.
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON, as written by `synth`.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a template document. Resource types outside `AWS::WAFv2::*`
    /// and malformed logical ids are rejected.
    pub fn from_json(text: &str) -> Result<Self> {
        let template: Template = serde_json::from_str(text)?;
        template.check_ids()?;
        Ok(template)
    }

    /// Same as [`Template::from_json`] for an already parsed document.
    pub fn from_value(value: Value) -> Result<Self> {
        let template: Template = serde_json::from_value(value)?;
        template.check_ids()?;
        Ok(template)
    }

    fn check_ids(&self) -> Result<()> {
        self.resources
            .keys()
            .chain(self.outputs.keys())
            .try_for_each(|id| check_logical_id(id))
    }

    /// Canonical encoding of the whole template.
    pub fn canonical(&self) -> Result<String> {
        Ok(canonicalize::canonicalize(&self.to_json()?))
    }

    /// SHA-256 of [`Template::canonical`].
    pub fn fingerprint(&self) -> Result<Fingerprint> {
        Ok(canonicalize::fingerprint(&self.to_json()?))
    }
}
