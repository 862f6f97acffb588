//! # CloudFormation Resource Plumbing
//!
//! [`CfnResource`] is implemented by the six WAFv2 resource records. It
//! carries the CloudFormation type name, the attribute names `Fn::GetAtt`
//! can read, the properties whose change replaces the physical resource,
//! and the hook that renders the `Properties` object.
//!
//! [`WafResource`] is the sum of the six records, serialized the way a
//! template's `Resources` entry is:
//!
//! ```json
//! { "Type": "AWS::WAFv2::IPSet", "Properties": { ... } }
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::association::WebAclAssociation;
use crate::common::Scope;
use crate::error::Result;
use crate::ip_set::IpSet;
use crate::logging::LoggingConfiguration;
use crate::regex_pattern_set::RegexPatternSet;
use crate::rule::Rule;
use crate::rule_group::RuleGroup;
use crate::web_acl::WebAcl;

/// A record that maps to one CloudFormation resource type.
pub trait CfnResource: Serialize + DeserializeOwned {
    /// CloudFormation type name, e.g. `AWS::WAFv2::WebACL`.
    const TYPE_NAME: &'static str;

    /// Attribute names readable with `Fn::GetAtt`.
    const ATTRIBUTES: &'static [&'static str];

    /// Properties whose change forces CloudFormation to replace the
    /// resource instead of updating it in place.
    const REPLACEMENT_PROPERTIES: &'static [&'static str];

    /// Renders the `Properties` object. Unset optional properties are
    /// omitted.
    fn render_properties(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Any WAFv2 resource, tagged by its CloudFormation type name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "Type", content = "Properties")]
pub enum WafResource {
    #[serde(rename = "AWS::WAFv2::IPSet")]
    IpSet(IpSet),
    #[serde(rename = "AWS::WAFv2::LoggingConfiguration")]
    LoggingConfiguration(LoggingConfiguration),
    #[serde(rename = "AWS::WAFv2::RegexPatternSet")]
    RegexPatternSet(RegexPatternSet),
    #[serde(rename = "AWS::WAFv2::RuleGroup")]
    RuleGroup(RuleGroup),
    #[serde(rename = "AWS::WAFv2::WebACL")]
    WebAcl(WebAcl),
    #[serde(rename = "AWS::WAFv2::WebACLAssociation")]
    WebAclAssociation(WebAclAssociation),
}

impl WafResource {
    /// CloudFormation type name of the wrapped record.
    pub fn type_name(&self) -> &'static str {
        match self {
            WafResource::IpSet(_) => IpSet::TYPE_NAME,
            WafResource::LoggingConfiguration(_) => LoggingConfiguration::TYPE_NAME,
            WafResource::RegexPatternSet(_) => RegexPatternSet::TYPE_NAME,
            WafResource::RuleGroup(_) => RuleGroup::TYPE_NAME,
            WafResource::WebAcl(_) => WebAcl::TYPE_NAME,
            WafResource::WebAclAssociation(_) => WebAclAssociation::TYPE_NAME,
        }
    }

    /// `Fn::GetAtt` attribute names of the wrapped record's type.
    pub fn attributes(&self) -> &'static [&'static str] {
        match self {
            WafResource::IpSet(_) => IpSet::ATTRIBUTES,
            WafResource::LoggingConfiguration(_) => LoggingConfiguration::ATTRIBUTES,
            WafResource::RegexPatternSet(_) => RegexPatternSet::ATTRIBUTES,
            WafResource::RuleGroup(_) => RuleGroup::ATTRIBUTES,
            WafResource::WebAcl(_) => WebAcl::ATTRIBUTES,
            WafResource::WebAclAssociation(_) => WebAclAssociation::ATTRIBUTES,
        }
    }

    /// Replacement-triggering properties of the wrapped record's type.
    pub fn replacement_properties(&self) -> &'static [&'static str] {
        match self {
            WafResource::IpSet(_) => IpSet::REPLACEMENT_PROPERTIES,
            WafResource::LoggingConfiguration(_) => LoggingConfiguration::REPLACEMENT_PROPERTIES,
            WafResource::RegexPatternSet(_) => RegexPatternSet::REPLACEMENT_PROPERTIES,
            WafResource::RuleGroup(_) => RuleGroup::REPLACEMENT_PROPERTIES,
            WafResource::WebAcl(_) => WebAcl::REPLACEMENT_PROPERTIES,
            WafResource::WebAclAssociation(_) => WebAclAssociation::REPLACEMENT_PROPERTIES,
        }
    }

    /// Renders the wrapped record's `Properties` object.
    pub fn render_properties(&self) -> Result<serde_json::Value> {
        match self {
            WafResource::IpSet(r) => r.render_properties(),
            WafResource::LoggingConfiguration(r) => r.render_properties(),
            WafResource::RegexPatternSet(r) => r.render_properties(),
            WafResource::RuleGroup(r) => r.render_properties(),
            WafResource::WebAcl(r) => r.render_properties(),
            WafResource::WebAclAssociation(r) => r.render_properties(),
        }
    }

    /// Deployment scope, for the types that have one.
    pub fn scope(&self) -> Option<Scope> {
        match self {
            WafResource::IpSet(r) => Some(r.scope),
            WafResource::RegexPatternSet(r) => Some(r.scope),
            WafResource::RuleGroup(r) => Some(r.scope),
            WafResource::WebAcl(r) => Some(r.scope),
            WafResource::LoggingConfiguration(_) | WafResource::WebAclAssociation(_) => None,
        }
    }

    /// Rules of a web ACL or rule group; empty for other types.
    pub fn rules(&self) -> &[Rule] {
        match self {
            WafResource::RuleGroup(r) => &r.rules,
            WafResource::WebAcl(r) => &r.rules,
            _ => &[],
        }
    }
}

impl From<IpSet> for WafResource {
    fn from(r: IpSet) -> Self {
        WafResource::IpSet(r)
    }
}

impl From<LoggingConfiguration> for WafResource {
    fn from(r: LoggingConfiguration) -> Self {
        WafResource::LoggingConfiguration(r)
    }
}

impl From<RegexPatternSet> for WafResource {
    fn from(r: RegexPatternSet) -> Self {
        WafResource::RegexPatternSet(r)
    }
}

impl From<RuleGroup> for WafResource {
    fn from(r: RuleGroup) -> Self {
        WafResource::RuleGroup(r)
    }
}

impl From<WebAcl> for WafResource {
    fn from(r: WebAcl) -> Self {
        WafResource::WebAcl(r)
    }
}

impl From<WebAclAssociation> for WafResource {
    fn from(r: WebAclAssociation) -> Self {
        WafResource::WebAclAssociation(r)
    }
}
