//! `AWS::WAFv2::RuleGroup`: a reusable, capacity-bounded list of rules.
//!
//! `Capacity` is the WCU budget reserved when the group is created. It cannot
//! be changed afterwards; raising it means replacing the group.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::common::{CustomResponseBody, Scope, Tag, VisibilityConfig};
use crate::error::{required, Result};
use crate::resource::CfnResource;
use crate::rule::Rule;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleGroup {
    /// WCU budget, fixed at creation.
    pub capacity: u64,
    pub scope: Scope,
    pub visibility_config: VisibilityConfig,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_response_bodies: BTreeMap<String, CustomResponseBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Rule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl RuleGroup {
    pub fn builder() -> RuleGroupBuilder {
        RuleGroupBuilder::default()
    }
}

impl CfnResource for RuleGroup {
    const TYPE_NAME: &'static str = "AWS::WAFv2::RuleGroup";
    const ATTRIBUTES: &'static [&'static str] = &["Arn", "Id", "LabelNamespace"];
    const REPLACEMENT_PROPERTIES: &'static [&'static str] = &["Capacity", "Name", "Scope"];
}

/// Builder for [`RuleGroup`]; `Capacity`, `Scope` and `VisibilityConfig`
/// are required.
#[derive(Debug, Clone, Default)]
pub struct RuleGroupBuilder {
    capacity: Option<u64>,
    scope: Option<Scope>,
    visibility_config: Option<VisibilityConfig>,
    custom_response_bodies: BTreeMap<String, CustomResponseBody>,
    description: Option<String>,
    name: Option<String>,
    rules: Vec<Rule>,
    tags: Vec<Tag>,
}

impl RuleGroupBuilder {
    /// Sets `Capacity`, the WCU budget fixed at creation.
    /// Changing it replaces the group.
    pub fn with_capacity(mut self, capacity: u64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Sets `Scope`.
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Sets the group-level `VisibilityConfig`.
    pub fn with_visibility_config(mut self, config: VisibilityConfig) -> Self {
        self.visibility_config = Some(config);
        self
    }

    /// Declares a custom response body that rule actions refer to by `key`.
    pub fn with_custom_response_body(
        mut self,
        key: impl Into<String>,
        body: CustomResponseBody,
    ) -> Self {
        self.custom_response_bodies.insert(key.into(), body);
        self
    }

    /// Sets the optional `Description`.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the physical `Name`.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Appends a rule. Rules keep insertion order; WAF orders by priority.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Appends a tag.
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Builds the group.
    ///
    /// # Errors
    /// The first of `Capacity`, `Scope` or `VisibilityConfig` left unset.
    pub fn build(self) -> Result<RuleGroup> {
        Ok(RuleGroup {
            capacity: required(self.capacity, RuleGroup::TYPE_NAME, "Capacity")?,
            scope: required(self.scope, RuleGroup::TYPE_NAME, "Scope")?,
            visibility_config: required(
                self.visibility_config,
                RuleGroup::TYPE_NAME,
                "VisibilityConfig",
            )?,
            custom_response_bodies: self.custom_response_bodies,
            description: self.description,
            name: self.name,
            rules: self.rules,
            tags: self.tags,
        })
    }
}
