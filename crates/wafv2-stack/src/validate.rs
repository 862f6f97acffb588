//! # Semantic Template Validation
//!
//! The model crate makes malformed statements unrepresentable; this module
//! catches what is well-formed but still rejected by WAF or CloudFormation
//! at deploy time.
//!
//! ## Checks
//!
//! | Kind | Severity | Rule |
//! |------|----------|------|
//! | `region` | Error | CLOUDFRONT scope is only valid in us-east-1 |
//! | `duplicate-priority` | Error | Rule priorities are unique per rule list |
//! | `duplicate-rule-name` | Error | Rule names are unique per rule list |
//! | `transformation-priority` | Error | TextTransformation priorities are distinct per statement |
//! | `misplaced-statement` | Error | Rule group statements only in web ACL rules |
//! | `action-mismatch` | Error | Rule group statements take OverrideAction, others Action |
//! | `combinator-arity` | Error | And/Or hold at least two statements |
//! | `invalid-name` | Error | Resource, rule and response body names |
//! | `invalid-metric-name` | Error | CloudWatch metric names |
//! | `invalid-label` | Error | Rule labels and label match keys |
//! | `invalid-country-code` | Error | Two uppercase letters, at least one per statement |
//! | `rate-limit` | Error | Limit within 10..=2,000,000,000 |
//! | `forwarded-ip` | Error | FORWARDED_IP aggregation needs ForwardedIPConfig |
//! | `unknown-response-body` | Error | Block responses name a declared CustomResponseBodies key |
//! | `logging-destination` | Error | Exactly one log destination |
//! | `redacted-field` | Error | SingleHeader, UriPath, QueryString or Method only |
//! | `empty-list` | Warning | IPSet without addresses, regex set without patterns |
//!
//! Capacity accounting and CIDR or regular expression syntax are left to
//! the service.
//!
//! ## References
//!
//! - AWS WAF quotas: <https://docs.aws.amazon.com/waf/latest/developerguide/limits.html>
//! - WAFv2 API data types: <https://docs.aws.amazon.com/waf/latest/APIReference/API_Types_AWS_WAFV2.html>

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use tracing::{debug, info};

use wafv2_model::statement::AggregateKeyType;
use wafv2_model::{
    CustomResponseBody, LoggingConfiguration, NestableStatement, Rule, RuleBehavior, Scope,
    Statement, VisibilityConfig, WafResource,
};
use wafv2_template::Template;

use crate::config::ValidationConfig;

/// Lowest rate limit WAF accepts.
pub const MIN_RATE_LIMIT: u64 = 10;

/// Highest rate limit WAF accepts.
pub const MAX_RATE_LIMIT: u64 = 2_000_000_000;

/// Metric names CloudWatch reserves.
const RESERVED_METRIC_NAMES: &[&str] = &["All", "Default_Action"];

/// Field kinds a logging configuration may redact.
const REDACTABLE_FIELDS: &[&str] = &["SingleHeader", "UriPath", "QueryString", "Method"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Deploys, but probably not what was meant.
    Warning,
    /// Rejected at deploy time.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    Region,
    DuplicatePriority,
    DuplicateRuleName,
    TransformationPriority,
    MisplacedStatement,
    ActionMismatch,
    CombinatorArity,
    InvalidName,
    InvalidMetricName,
    InvalidLabel,
    InvalidCountryCode,
    RateLimit,
    ForwardedIp,
    UnknownResponseBody,
    LoggingDestination,
    RedactedField,
    EmptyList,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::Region => "region",
            FindingKind::DuplicatePriority => "duplicate-priority",
            FindingKind::DuplicateRuleName => "duplicate-rule-name",
            FindingKind::TransformationPriority => "transformation-priority",
            FindingKind::MisplacedStatement => "misplaced-statement",
            FindingKind::ActionMismatch => "action-mismatch",
            FindingKind::CombinatorArity => "combinator-arity",
            FindingKind::InvalidName => "invalid-name",
            FindingKind::InvalidMetricName => "invalid-metric-name",
            FindingKind::InvalidLabel => "invalid-label",
            FindingKind::InvalidCountryCode => "invalid-country-code",
            FindingKind::RateLimit => "rate-limit",
            FindingKind::ForwardedIp => "forwarded-ip",
            FindingKind::UnknownResponseBody => "unknown-response-body",
            FindingKind::LoggingDestination => "logging-destination",
            FindingKind::RedactedField => "redacted-field",
            FindingKind::EmptyList => "empty-list",
        }
    }

    /// Severity this kind of finding is reported with.
    pub fn severity(&self) -> Severity {
        match self {
            FindingKind::EmptyList => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// One problem found in a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub kind: FindingKind,
    pub logical_id: String,
    /// Property path inside the resource, e.g. `Rules[2].Statement`.
    pub path: String,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {} {}: {}",
            self.severity,
            self.kind.as_str(),
            self.logical_id,
            self.path,
            self.message
        )
    }
}

/// All findings for one template, in resource then document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// True when there are no errors, and no warnings if `deny_warnings`.
    pub fn is_ok(&self, deny_warnings: bool) -> bool {
        self.error_count() == 0 && (!deny_warnings || self.warning_count() == 0)
    }

    pub fn of_kind(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for finding in &self.findings {
            writeln!(f, "{}", finding)?;
        }
        Ok(())
    }
}

/// Collects findings for one resource.
struct Collector<'a> {
    logical_id: &'a str,
    findings: Vec<Finding>,
}

impl<'a> Collector<'a> {
    fn push(&mut self, kind: FindingKind, path: impl Into<String>, message: impl Into<String>) {
        self.findings.push(Finding {
            severity: kind.severity(),
            kind,
            logical_id: self.logical_id.to_string(),
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Character rule with a length bound.
struct NamePattern {
    pattern: Regex,
    max_len: usize,
    description: &'static str,
}

impl NamePattern {
    fn new(pattern: &str, max_len: usize, description: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("name pattern is a valid regex"),
            max_len,
            description,
        }
    }

    fn check(&self, value: &str) -> Option<String> {
        if value.is_empty() || value.len() > self.max_len || !self.pattern.is_match(value) {
            Some(format!(
                "'{}' must be 1-{} characters of {}",
                value, self.max_len, self.description
            ))
        } else {
            None
        }
    }
}

/// Semantic validator for WAFv2 templates.
pub struct Validator {
    config: ValidationConfig,
    name: NamePattern,
    metric_name: NamePattern,
    label: NamePattern,
    country_code: Regex,
}

impl Validator {
    pub fn new() -> Self {
        Self::with_config(ValidationConfig::default())
    }

    pub fn with_config(config: ValidationConfig) -> Self {
        Self {
            config,
            name: NamePattern::new(r"^[\w\-]+$", 128, "letters, digits, '_' and '-'"),
            metric_name: NamePattern::new(
                r"^[\w#:\.\-/]+$",
                255,
                "letters, digits and _ # : . - /",
            ),
            label: NamePattern::new(r"^[0-9A-Za-z_\-:]+$", 1024, "letters, digits and _ - :"),
            country_code: Regex::new(r"^[A-Z]{2}$").expect("country pattern is a valid regex"),
        }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Checks every resource of `template` as deployed to `region`.
    pub fn validate(&self, template: &Template, region: &str) -> ValidationReport {
        let mut report = ValidationReport::default();

        for (logical_id, resource) in template.resources() {
            let mut out = Collector {
                logical_id,
                findings: Vec::new(),
            };
            self.check_resource(resource, region, &mut out);
            debug!(
                logical_id = %logical_id,
                findings = out.findings.len(),
                "resource validated"
            );
            report.findings.extend(out.findings);
        }

        info!(
            resources = template.len(),
            errors = report.error_count(),
            warnings = report.warning_count(),
            region = %region,
            "template validated"
        );
        report
    }

    fn check_resource(&self, resource: &WafResource, region: &str, out: &mut Collector<'_>) {
        if let Some(scope) = resource.scope() {
            self.check_scope(scope, region, out);
        }

        match resource {
            WafResource::IpSet(set) => {
                self.check_optional_name(set.name.as_deref(), out);
                if set.addresses.is_empty() {
                    out.push(
                        FindingKind::EmptyList,
                        "Addresses",
                        "IPSet has no addresses and matches nothing",
                    );
                }
            }
            WafResource::RegexPatternSet(set) => {
                self.check_optional_name(set.name.as_deref(), out);
                if set.regular_expression_list.is_empty() {
                    out.push(
                        FindingKind::EmptyList,
                        "RegularExpressionList",
                        "regex pattern set has no patterns and matches nothing",
                    );
                }
            }
            WafResource::RuleGroup(group) => {
                self.check_optional_name(group.name.as_deref(), out);
                self.check_visibility(&group.visibility_config, "VisibilityConfig", out);
                self.check_response_body_keys(&group.custom_response_bodies, out);
                self.check_rules(&group.rules, &group.custom_response_bodies, false, out);
            }
            WafResource::WebAcl(acl) => {
                self.check_optional_name(acl.name.as_deref(), out);
                self.check_visibility(&acl.visibility_config, "VisibilityConfig", out);
                self.check_response_body_keys(&acl.custom_response_bodies, out);
                if let Some(key) = acl.default_action.body_key() {
                    check_body_reference(key, &acl.custom_response_bodies, "DefaultAction", out);
                }
                self.check_rules(&acl.rules, &acl.custom_response_bodies, true, out);
            }
            WafResource::LoggingConfiguration(logging) => check_logging(logging, out),
            WafResource::WebAclAssociation(_) => {}
        }
    }

    fn check_scope(&self, scope: Scope, region: &str, out: &mut Collector<'_>) {
        if self.config.require_us_east_1_for_cloudfront && !scope.allowed_in_region(region) {
            out.push(
                FindingKind::Region,
                "Scope",
                format!(
                    "{} scope must be declared in us-east-1, not {}",
                    scope, region
                ),
            );
        }
    }

    fn check_optional_name(&self, name: Option<&str>, out: &mut Collector<'_>) {
        if let Some(message) = name.and_then(|n| self.name.check(n)) {
            out.push(FindingKind::InvalidName, "Name", message);
        }
    }

    fn check_visibility(&self, config: &VisibilityConfig, path: &str, out: &mut Collector<'_>) {
        let name = config.metric_name.as_str();
        let path = format!("{}.MetricName", path);
        if let Some(message) = self.metric_name.check(name) {
            out.push(FindingKind::InvalidMetricName, path, message);
        } else if RESERVED_METRIC_NAMES.contains(&name) {
            out.push(
                FindingKind::InvalidMetricName,
                path,
                format!("'{}' is a reserved metric name", name),
            );
        }
    }

    fn check_response_body_keys(
        &self,
        bodies: &BTreeMap<String, CustomResponseBody>,
        out: &mut Collector<'_>,
    ) {
        for key in bodies.keys() {
            if let Some(message) = self.name.check(key) {
                out.push(
                    FindingKind::InvalidName,
                    format!("CustomResponseBodies.{}", key),
                    message,
                );
            }
        }
    }

    fn check_rules(
        &self,
        rules: &[Rule],
        bodies: &BTreeMap<String, CustomResponseBody>,
        in_web_acl: bool,
        out: &mut Collector<'_>,
    ) {
        let mut priorities: HashMap<u32, &str> = HashMap::new();
        let mut names: HashSet<&str> = HashSet::new();

        for (i, rule) in rules.iter().enumerate() {
            let path = format!("Rules[{}]", i);

            if let Some(first) = priorities.insert(rule.priority, rule.name.as_str()) {
                out.push(
                    FindingKind::DuplicatePriority,
                    format!("{}.Priority", path),
                    format!(
                        "priority {} of rule '{}' is already used by rule '{}'",
                        rule.priority, rule.name, first
                    ),
                );
            }
            if !names.insert(rule.name.as_str()) {
                out.push(
                    FindingKind::DuplicateRuleName,
                    format!("{}.Name", path),
                    format!("rule name '{}' is used more than once", rule.name),
                );
            }
            if let Some(message) = self.name.check(&rule.name) {
                out.push(FindingKind::InvalidName, format!("{}.Name", path), message);
            }
            self.check_visibility(
                &rule.visibility_config,
                &format!("{}.VisibilityConfig", path),
                out,
            );
            for (j, label) in rule.rule_labels.iter().enumerate() {
                if let Some(message) = self.label.check(&label.name) {
                    out.push(
                        FindingKind::InvalidLabel,
                        format!("{}.RuleLabels[{}].Name", path, j),
                        message,
                    );
                }
            }

            self.check_behavior(rule, in_web_acl, &path, out);
            if let Some(key) = rule.action().and_then(|a| a.body_key()) {
                check_body_reference(key, bodies, &format!("{}.Action", path), out);
            }
            self.check_statement(&rule.statement, bodies, &format!("{}.Statement", path), out);
        }
    }

    fn check_behavior(&self, rule: &Rule, in_web_acl: bool, path: &str, out: &mut Collector<'_>) {
        let statement = &rule.statement;
        if statement.is_rule_group() && !in_web_acl {
            out.push(
                FindingKind::MisplacedStatement,
                format!("{}.Statement", path),
                format!("{} is only allowed in web ACL rules", statement.kind()),
            );
        }
        match (&rule.behavior, statement.is_rule_group()) {
            (RuleBehavior::Action(_), true) => out.push(
                FindingKind::ActionMismatch,
                format!("{}.Action", path),
                format!(
                    "rule '{}' runs a rule group and needs OverrideAction instead of Action",
                    rule.name
                ),
            ),
            (RuleBehavior::OverrideAction(_), false) => out.push(
                FindingKind::ActionMismatch,
                format!("{}.OverrideAction", path),
                format!(
                    "rule '{}' uses {} and needs Action instead of OverrideAction",
                    rule.name,
                    statement.kind()
                ),
            ),
            _ => {}
        }
    }

    fn check_statement(
        &self,
        statement: &Statement,
        bodies: &BTreeMap<String, CustomResponseBody>,
        path: &str,
        out: &mut Collector<'_>,
    ) {
        match statement {
            Statement::RateBased(rate) => {
                let path = format!("{}.RateBasedStatement", path);
                if !(MIN_RATE_LIMIT..=MAX_RATE_LIMIT).contains(&rate.limit) {
                    out.push(
                        FindingKind::RateLimit,
                        format!("{}.Limit", path),
                        format!(
                            "limit {} is outside {}..={}",
                            rate.limit, MIN_RATE_LIMIT, MAX_RATE_LIMIT
                        ),
                    );
                }
                if rate.aggregate_key_type == AggregateKeyType::ForwardedIp
                    && rate.forwarded_ip_config.is_none()
                {
                    out.push(
                        FindingKind::ForwardedIp,
                        format!("{}.ForwardedIPConfig", path),
                        "FORWARDED_IP aggregation requires ForwardedIPConfig",
                    );
                }
            }
            Statement::ManagedRuleGroup(managed) => {
                let path = format!("{}.ManagedRuleGroupStatement", path);
                for (i, over) in managed.rule_action_overrides.iter().enumerate() {
                    if let Some(key) = over.action_to_use.body_key() {
                        let at = format!("{}.RuleActionOverrides[{}].ActionToUse", path, i);
                        check_body_reference(key, bodies, &at, out);
                    }
                }
            }
            Statement::RuleGroupReference(reference) => {
                let path = format!("{}.RuleGroupReferenceStatement", path);
                for (i, over) in reference.rule_action_overrides.iter().enumerate() {
                    if let Some(key) = over.action_to_use.body_key() {
                        let at = format!("{}.RuleActionOverrides[{}].ActionToUse", path, i);
                        check_body_reference(key, bodies, &at, out);
                    }
                }
            }
            Statement::Nested(_) => {}
        }

        statement.walk(path, &mut |nested, at| self.check_nestable(nested, at, out));
    }

    fn check_nestable(&self, statement: &NestableStatement, path: &str, out: &mut Collector<'_>) {
        let kind = statement.kind();

        let mut seen = HashSet::new();
        for (i, transformation) in statement.text_transformations().iter().enumerate() {
            if !seen.insert(transformation.priority) {
                out.push(
                    FindingKind::TransformationPriority,
                    format!("{}.{}.TextTransformations[{}].Priority", path, kind, i),
                    format!(
                        "text transformation priority {} is used more than once",
                        transformation.priority
                    ),
                );
            }
        }

        match statement {
            NestableStatement::And(_) | NestableStatement::Or(_) => {
                let count = statement.children().len();
                if count < 2 {
                    out.push(
                        FindingKind::CombinatorArity,
                        format!("{}.{}.Statements", path, kind),
                        format!("{} needs at least 2 statements, found {}", kind, count),
                    );
                }
            }
            NestableStatement::GeoMatch(geo) => {
                if geo.country_codes.is_empty() {
                    out.push(
                        FindingKind::InvalidCountryCode,
                        format!("{}.{}.CountryCodes", path, kind),
                        "at least one country code is required",
                    );
                }
                for (i, code) in geo.country_codes.iter().enumerate() {
                    if !self.country_code.is_match(code) {
                        out.push(
                            FindingKind::InvalidCountryCode,
                            format!("{}.{}.CountryCodes[{}]", path, kind, i),
                            format!("'{}' is not a two-letter uppercase country code", code),
                        );
                    }
                }
            }
            NestableStatement::LabelMatch(label) => {
                if let Some(message) = self.label.check(&label.key) {
                    out.push(
                        FindingKind::InvalidLabel,
                        format!("{}.{}.Key", path, kind),
                        message,
                    );
                }
            }
            _ => {}
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

fn check_body_reference(
    key: &str,
    bodies: &BTreeMap<String, CustomResponseBody>,
    path: &str,
    out: &mut Collector<'_>,
) {
    if !bodies.contains_key(key) {
        out.push(
            FindingKind::UnknownResponseBody,
            format!("{}.Block.CustomResponse.CustomResponseBodyKey", path),
            format!("custom response body '{}' is not declared", key),
        );
    }
}

fn check_logging(logging: &LoggingConfiguration, out: &mut Collector<'_>) {
    let count = logging.log_destination_configs.len();
    if count != 1 {
        out.push(
            FindingKind::LoggingDestination,
            "LogDestinationConfigs",
            format!("exactly one log destination is required, found {}", count),
        );
    }
    for (i, field) in logging.redacted_fields.iter().enumerate() {
        if !REDACTABLE_FIELDS.contains(&field.kind()) {
            out.push(
                FindingKind::RedactedField,
                format!("RedactedFields[{}]", i),
                format!(
                    "{} cannot be redacted; use one of {}",
                    field.kind(),
                    REDACTABLE_FIELDS.join(", ")
                ),
            );
        }
    }
}
