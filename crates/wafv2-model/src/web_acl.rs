//! `AWS::WAFv2::WebACL`: the top-level rule list WAF evaluates for a
//! protected resource.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::action::DefaultAction;
use crate::common::{CustomResponseBody, Scope, Tag, VisibilityConfig};
use crate::error::{required, Result};
use crate::resource::CfnResource;
use crate::rule::{CaptchaConfig, Rule};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WebAcl {
    /// Action for requests no rule terminates.
    pub default_action: DefaultAction,
    pub scope: Scope,
    pub visibility_config: VisibilityConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captcha_config: Option<CaptchaConfig>,
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

impl WebAcl {
    pub fn builder() -> WebAclBuilder {
        WebAclBuilder::default()
    }
}

impl CfnResource for WebAcl {
    const TYPE_NAME: &'static str = "AWS::WAFv2::WebACL";
    const ATTRIBUTES: &'static [&'static str] = &["Arn", "Id", "Capacity", "LabelNamespace"];
    const REPLACEMENT_PROPERTIES: &'static [&'static str] = &["Name", "Scope"];
}

/// Builder for [`WebAcl`]; `DefaultAction`, `Scope` and `VisibilityConfig`
/// are required.
#[derive(Debug, Clone, Default)]
pub struct WebAclBuilder {
    default_action: Option<DefaultAction>,
    scope: Option<Scope>,
    visibility_config: Option<VisibilityConfig>,
    captcha_config: Option<CaptchaConfig>,
    custom_response_bodies: BTreeMap<String, CustomResponseBody>,
    description: Option<String>,
    name: Option<String>,
    rules: Vec<Rule>,
    tags: Vec<Tag>,
}

impl WebAclBuilder {
    /// Sets `DefaultAction`, applied when no rule terminates the request.
    pub fn with_default_action(mut self, action: DefaultAction) -> Self {
        self.default_action = Some(action);
        self
    }

    /// Sets `Scope`. `CLOUDFRONT` ACLs must be deployed in us-east-1.
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Sets the ACL-level `VisibilityConfig`.
    pub fn with_visibility_config(mut self, config: VisibilityConfig) -> Self {
        self.visibility_config = Some(config);
        self
    }

    /// Sets the default CAPTCHA immunity for rules without their own.
    pub fn with_captcha_config(mut self, config: CaptchaConfig) -> Self {
        self.captcha_config = Some(config);
        self
    }

    /// Declares a custom response body under `key`.
    ///
    /// # Arguments
    /// * `key` - Name used by `CustomResponseBodyKey` in block actions
    /// * `body` - Content type and payload returned to the client
    ///
    /// A second body under the same key replaces the first.
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

    /// Sets the physical `Name`. Changing it replaces the ACL.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Appends one rule.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Appends rules in iteration order.
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Appends a tag.
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Builds the ACL.
    ///
    /// # Errors
    /// The first of `DefaultAction`, `Scope` or `VisibilityConfig` left unset.
    pub fn build(self) -> Result<WebAcl> {
        Ok(WebAcl {
            default_action: required(self.default_action, WebAcl::TYPE_NAME, "DefaultAction")?,
            scope: required(self.scope, WebAcl::TYPE_NAME, "Scope")?,
            visibility_config: required(
                self.visibility_config,
                WebAcl::TYPE_NAME,
                "VisibilityConfig",
            )?,
            captcha_config: self.captcha_config,
            custom_response_bodies: self.custom_response_bodies,
            description: self.description,
            name: self.name,
            rules: self.rules,
            tags: self.tags,
        })
    }
}
