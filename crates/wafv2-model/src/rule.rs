//! Rules: a named, prioritized statement with an action.
//!
//! A rule carries either an `Action` or an `OverrideAction`, never both.
//! [`RuleBehavior`] is flattened into [`Rule`] so the key it serializes under
//! is the variant name. Parsing goes through a wire form that rejects a rule
//! with both keys or neither.

use serde::{Deserialize, Serialize};

use crate::action::{OverrideAction, RuleAction};
use crate::common::{Label, VisibilityConfig};
use crate::error::{exactly_one, ModelError};
use crate::statement::Statement;

/// Seconds a solved CAPTCHA stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImmunityTimeProperty {
    pub immunity_time: u64,
}

/// CAPTCHA settings for a rule or web ACL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CaptchaConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immunity_time_property: Option<ImmunityTimeProperty>,
}

impl CaptchaConfig {
    /// CAPTCHA tokens valid for `seconds`.
    pub fn immunity(seconds: u64) -> Self {
        Self {
            immunity_time_property: Some(ImmunityTimeProperty {
                immunity_time: seconds,
            }),
        }
    }
}

/// The action half of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleBehavior {
    /// Action for ordinary statements.
    Action(RuleAction),
    /// Override for rule group statements.
    OverrideAction(OverrideAction),
}

/// A single rule of a web ACL or rule group.
///
/// # Example
///
/// ```rust
/// use wafv2_model::{NestableStatement, Rule, RuleAction, VisibilityConfig};
///
/// let rule = Rule::with_action(
///     "block-embargoed",
///     0,
///     NestableStatement::geo_match(["KP"]),
///     RuleAction::block(),
///     VisibilityConfig::enabled("block-embargoed"),
/// );
///
/// let json = serde_json::to_value(&rule).unwrap();
/// assert_eq!(json["Action"], serde_json::json!({"Block": {}}));
/// assert!(json.get("OverrideAction").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", try_from = "RuleWire")]
pub struct Rule {
    /// Unique within the owning web ACL or rule group.
    pub name: String,
    /// Evaluation order, ascending; unique within the owning rule list.
    pub priority: u32,
    pub statement: Statement,
    #[serde(flatten)]
    pub behavior: RuleBehavior,
    pub visibility_config: VisibilityConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rule_labels: Vec<Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captcha_config: Option<CaptchaConfig>,
}

/// `Rule` as it appears in a template, before the action check.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RuleWire {
    name: String,
    priority: u32,
    statement: Statement,
    #[serde(default)]
    action: Option<RuleAction>,
    #[serde(default)]
    override_action: Option<OverrideAction>,
    visibility_config: VisibilityConfig,
    #[serde(default)]
    rule_labels: Vec<Label>,
    #[serde(default)]
    captcha_config: Option<CaptchaConfig>,
}

impl TryFrom<RuleWire> for Rule {
    type Error = ModelError;

    fn try_from(wire: RuleWire) -> Result<Self, Self::Error> {
        let behavior = match exactly_one(
            wire.action,
            wire.override_action,
            "Rule",
            ("Action", "OverrideAction"),
        )? {
            Ok(action) => RuleBehavior::Action(action),
            Err(override_action) => RuleBehavior::OverrideAction(override_action),
        };
        Ok(Self {
            name: wire.name,
            priority: wire.priority,
            statement: wire.statement,
            behavior,
            visibility_config: wire.visibility_config,
            rule_labels: wire.rule_labels,
            captcha_config: wire.captcha_config,
        })
    }
}

impl Rule {
    /// Rule that applies `action` to requests matching `statement`.
    pub fn with_action(
        name: impl Into<String>,
        priority: u32,
        statement: impl Into<Statement>,
        action: RuleAction,
        visibility_config: VisibilityConfig,
    ) -> Self {
        Self {
            name: name.into(),
            priority,
            statement: statement.into(),
            behavior: RuleBehavior::Action(action),
            visibility_config,
            rule_labels: Vec::new(),
            captcha_config: None,
        }
    }

    /// Rule that runs a rule group statement under `override_action`.
    pub fn with_override(
        name: impl Into<String>,
        priority: u32,
        statement: impl Into<Statement>,
        override_action: OverrideAction,
        visibility_config: VisibilityConfig,
    ) -> Self {
        Self {
            name: name.into(),
            priority,
            statement: statement.into(),
            behavior: RuleBehavior::OverrideAction(override_action),
            visibility_config,
            rule_labels: Vec::new(),
            captcha_config: None,
        }
    }

    /// Adds labels to attach to matching requests.
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule_labels.extend(labels.into_iter().map(Label::new));
        self
    }

    /// Sets the rule's CAPTCHA config.
    pub fn with_captcha_config(mut self, config: CaptchaConfig) -> Self {
        self.captcha_config = Some(config);
        self
    }

    /// The rule's action, if it is not an override rule.
    pub fn action(&self) -> Option<&RuleAction> {
        match &self.behavior {
            RuleBehavior::Action(action) => Some(action),
            RuleBehavior::OverrideAction(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::{ManagedRuleGroupStatement, NestableStatement};
    use serde_json::json;

    #[test]
    fn test_override_rule_shape() {
        let rule = Rule::with_override(
            "common",
            10,
            ManagedRuleGroupStatement::aws("AWSManagedRulesCommonRuleSet"),
            OverrideAction::None {},
            VisibilityConfig::enabled("common"),
        );
        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(value["OverrideAction"], json!({"None": {}}));
        assert!(value.get("Action").is_none());
        assert_eq!(
            value["Statement"]["ManagedRuleGroupStatement"]["VendorName"],
            json!("AWS")
        );
        assert!(rule.action().is_none());
    }

    #[test]
    fn test_rule_round_trip_with_labels_and_captcha() {
        let rule = Rule::with_action(
            "login-captcha",
            3,
            NestableStatement::label("app:login"),
            RuleAction::captcha(),
            VisibilityConfig::disabled("login-captcha"),
        )
        .with_labels(["app:challenged"])
        .with_captcha_config(CaptchaConfig::immunity(300));

        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(value["RuleLabels"], json!([{"Name": "app:challenged"}]));
        assert_eq!(
            value["CaptchaConfig"],
            json!({"ImmunityTimeProperty": {"ImmunityTime": 300}})
        );

        let parsed: Rule = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, rule);
        assert_eq!(parsed.action(), Some(&RuleAction::captcha()));
    }

    #[test]
    fn test_rule_without_action_rejected() {
        let value = json!({
            "Name": "orphan",
            "Priority": 1,
            "Statement": {"LabelMatchStatement": {"Scope": "LABEL", "Key": "a:b"}},
            "VisibilityConfig": {
                "CloudWatchMetricsEnabled": false,
                "MetricName": "orphan",
                "SampledRequestsEnabled": false
            }
        });
        assert!(serde_json::from_value::<Rule>(value).is_err());
    }

    #[test]
    fn test_rule_with_both_actions_rejected() {
        let value = json!({
            "Name": "ambiguous",
            "Priority": 1,
            "Statement": {"LabelMatchStatement": {"Scope": "LABEL", "Key": "a:b"}},
            "Action": {"Block": {}},
            "OverrideAction": {"None": {}},
            "VisibilityConfig": {
                "CloudWatchMetricsEnabled": false,
                "MetricName": "ambiguous",
                "SampledRequestsEnabled": false
            }
        });
        let err = serde_json::from_value::<Rule>(value).unwrap_err();
        assert!(err.to_string().contains("exactly one of 'Action' or 'OverrideAction', found 2"));
    }

    #[test]
    fn test_rule_without_action_reports_count() {
        let value = json!({
            "Name": "orphan",
            "Priority": 1,
            "Statement": {"LabelMatchStatement": {"Scope": "LABEL", "Key": "a:b"}},
            "VisibilityConfig": {
                "CloudWatchMetricsEnabled": false,
                "MetricName": "orphan",
                "SampledRequestsEnabled": false
            }
        });
        let err = serde_json::from_value::<Rule>(value).unwrap_err();
        assert!(err.to_string().contains("found 0"));
    }
}
