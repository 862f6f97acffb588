//! # Rule Statement Grammar
//!
//! A statement is the predicate WAF evaluates against a web request. The
//! CloudFormation schema encodes it as an object with fifteen optional keys of
//! which exactly one may be set. This module encodes it as two sum types so
//! that both constraints on the grammar hold by construction:
//!
//! - **Exactly one variant.** An enum value is one variant; it serializes as
//!   an object with a single key.
//! - **No nesting of top-level-only statements.** RateBased, ManagedRuleGroup
//!   and RuleGroupReference statements only appear as a rule's top-level
//!   statement. Children of And/Or/Not and every scope-down statement are
//!   [`NestableStatement`], which has no variant for them. Parsing a template
//!   that nests one of them fails with an unknown-variant error.
//!
//! ```text
//! Statement ::= RateBased | ManagedRuleGroup | RuleGroupReference | Nestable
//!
//! Nestable  ::= ByteMatch | SqliMatch | XssMatch | SizeConstraint | GeoMatch
//!             | RegexMatch | IPSetReference | RegexPatternSetReference
//!             | LabelMatch
//!             | And(Nestable, Nestable, ...) | Or(...) | Not(Nestable)
//!
//! RateBased.ScopeDownStatement        : Nestable
//! ManagedRuleGroup.ScopeDownStatement : Nestable
//! ```
//!
//! ## Example
//!
//! ```rust
//! use wafv2_model::{FieldToMatch, NestableStatement, Statement, TextTransformation};
//! use wafv2_model::statement::{ByteMatchStatement, PositionalConstraint};
//!
//! let admin = NestableStatement::ByteMatch(ByteMatchStatement::text(
//!     FieldToMatch::uri_path(),
//!     PositionalConstraint::StartsWith,
//!     "/admin",
//!     TextTransformation::none(),
//! ));
//! let not_office = NestableStatement::not(NestableStatement::ip_set_reference(
//!     "arn:aws:wafv2:us-east-1:111122223333:regional/ipset/office/1",
//! ));
//! let statement: Statement = NestableStatement::and(vec![admin, not_office]).into();
//!
//! let json = serde_json::to_value(&statement).unwrap();
//! assert_eq!(json.as_object().unwrap().len(), 1);
//! assert!(json.get("AndStatement").is_some());
//! ```

use serde::{Deserialize, Serialize};

use crate::action::RuleAction;
use crate::common::CfnString;
use crate::error::{exactly_one, ModelError};
use crate::field::{FieldToMatch, TextTransformation};

/// A statement that may appear anywhere in the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NestableStatement {
    /// Search a request component for a string.
    #[serde(rename = "ByteMatchStatement")]
    ByteMatch(ByteMatchStatement),
    /// Detect SQL injection in a request component.
    #[serde(rename = "SqliMatchStatement")]
    SqliMatch(SqliMatchStatement),
    /// Detect cross-site scripting in a request component.
    #[serde(rename = "XssMatchStatement")]
    XssMatch(XssMatchStatement),
    /// Compare the size of a request component.
    #[serde(rename = "SizeConstraintStatement")]
    SizeConstraint(SizeConstraintStatement),
    /// Match the request's country of origin.
    #[serde(rename = "GeoMatchStatement")]
    GeoMatch(GeoMatchStatement),
    /// Match a request component against one regex.
    #[serde(rename = "RegexMatchStatement")]
    RegexMatch(RegexMatchStatement),
    /// Match the source IP against an IPSet.
    #[serde(rename = "IPSetReferenceStatement")]
    IpSetReference(IpSetReferenceStatement),
    /// Match a request component against a RegexPatternSet.
    #[serde(rename = "RegexPatternSetReferenceStatement")]
    RegexPatternSetReference(RegexPatternSetReferenceStatement),
    /// Match labels added by earlier rules.
    #[serde(rename = "LabelMatchStatement")]
    LabelMatch(LabelMatchStatement),
    /// All children match.
    #[serde(rename = "AndStatement")]
    And(AndStatement),
    /// Any child matches.
    #[serde(rename = "OrStatement")]
    Or(OrStatement),
    /// The child does not match.
    #[serde(rename = "NotStatement")]
    Not(NotStatement),
}

/// A rule's top-level statement.
///
/// The three top-level-only variants are tagged; every other statement is
/// serialized as the wrapped [`NestableStatement`] with no extra nesting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    /// Rate limit requests per aggregation key.
    #[serde(rename = "RateBasedStatement")]
    RateBased(RateBasedStatement),
    /// Run a vendor-managed rule group. WebACL rules only.
    #[serde(rename = "ManagedRuleGroupStatement")]
    ManagedRuleGroup(ManagedRuleGroupStatement),
    /// Run a customer-owned rule group. WebACL rules only.
    #[serde(rename = "RuleGroupReferenceStatement")]
    RuleGroupReference(RuleGroupReferenceStatement),
    /// Any nestable statement.
    #[serde(untagged)]
    Nested(NestableStatement),
}

impl From<NestableStatement> for Statement {
    fn from(statement: NestableStatement) -> Self {
        Statement::Nested(statement)
    }
}

impl From<RateBasedStatement> for Statement {
    fn from(statement: RateBasedStatement) -> Self {
        Statement::RateBased(statement)
    }
}

impl From<ManagedRuleGroupStatement> for Statement {
    fn from(statement: ManagedRuleGroupStatement) -> Self {
        Statement::ManagedRuleGroup(statement)
    }
}

impl From<RuleGroupReferenceStatement> for Statement {
    fn from(statement: RuleGroupReferenceStatement) -> Self {
        Statement::RuleGroupReference(statement)
    }
}

impl Statement {
    /// Wire key of this statement.
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::RateBased(_) => "RateBasedStatement",
            Statement::ManagedRuleGroup(_) => "ManagedRuleGroupStatement",
            Statement::RuleGroupReference(_) => "RuleGroupReferenceStatement",
            Statement::Nested(inner) => inner.kind(),
        }
    }

    /// True for statements that run a whole rule group.
    ///
    /// Rules with such a statement take an `OverrideAction` instead of an
    /// `Action`, and are only allowed in web ACLs.
    pub fn is_rule_group(&self) -> bool {
        matches!(
            self,
            Statement::ManagedRuleGroup(_) | Statement::RuleGroupReference(_)
        )
    }

    /// The scope-down statement of a RateBased or ManagedRuleGroup statement.
    pub fn scope_down(&self) -> Option<&NestableStatement> {
        match self {
            Statement::RateBased(s) => s.scope_down_statement.as_deref(),
            Statement::ManagedRuleGroup(s) => s.scope_down_statement.as_deref(),
            _ => None,
        }
    }

    /// Calls `visit` on every nestable statement reachable from this one,
    /// parents before children, with the JSON path of each.
    pub fn walk<F>(&self, path: &str, visit: &mut F)
    where
        F: FnMut(&NestableStatement, &str),
    {
        match self {
            Statement::Nested(inner) => inner.walk(path, visit),
            Statement::RateBased(_) | Statement::ManagedRuleGroup(_) => {
                if let Some(scope_down) = self.scope_down() {
                    let child = format!("{}.{}.ScopeDownStatement", path, self.kind());
                    scope_down.walk(&child, visit);
                }
            }
            Statement::RuleGroupReference(_) => {}
        }
    }
}

impl NestableStatement {
    /// `AndStatement` over `statements`.
    pub fn and(statements: Vec<NestableStatement>) -> Self {
        NestableStatement::And(AndStatement { statements })
    }

    /// `OrStatement` over `statements`.
    pub fn or(statements: Vec<NestableStatement>) -> Self {
        NestableStatement::Or(OrStatement { statements })
    }

    /// `NotStatement` negating `statement`.
    pub fn not(statement: NestableStatement) -> Self {
        NestableStatement::Not(NotStatement {
            statement: Box::new(statement),
        })
    }

    /// `IPSetReferenceStatement` for the IPSet at `arn`.
    pub fn ip_set_reference(arn: impl Into<CfnString>) -> Self {
        NestableStatement::IpSetReference(IpSetReferenceStatement {
            arn: arn.into(),
            ip_set_forwarded_ip_config: None,
        })
    }

    /// `GeoMatchStatement` for ISO 3166 alpha-2 `country_codes`.
    pub fn geo_match<I, S>(country_codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NestableStatement::GeoMatch(GeoMatchStatement {
            country_codes: country_codes.into_iter().map(Into::into).collect(),
            forwarded_ip_config: None,
        })
    }

    /// `LabelMatchStatement` matching one fully qualified label.
    pub fn label(key: impl Into<String>) -> Self {
        NestableStatement::LabelMatch(LabelMatchStatement {
            scope: LabelMatchScope::Label,
            key: key.into(),
        })
    }

    /// Wire key of this statement.
    pub fn kind(&self) -> &'static str {
        match self {
            NestableStatement::ByteMatch(_) => "ByteMatchStatement",
            NestableStatement::SqliMatch(_) => "SqliMatchStatement",
            NestableStatement::XssMatch(_) => "XssMatchStatement",
            NestableStatement::SizeConstraint(_) => "SizeConstraintStatement",
            NestableStatement::GeoMatch(_) => "GeoMatchStatement",
            NestableStatement::RegexMatch(_) => "RegexMatchStatement",
            NestableStatement::IpSetReference(_) => "IPSetReferenceStatement",
            NestableStatement::RegexPatternSetReference(_) => "RegexPatternSetReferenceStatement",
            NestableStatement::LabelMatch(_) => "LabelMatchStatement",
            NestableStatement::And(_) => "AndStatement",
            NestableStatement::Or(_) => "OrStatement",
            NestableStatement::Not(_) => "NotStatement",
        }
    }

    /// Direct children of a logical combinator; empty for leaves.
    pub fn children(&self) -> Vec<&NestableStatement> {
        match self {
            NestableStatement::And(s) => s.statements.iter().collect(),
            NestableStatement::Or(s) => s.statements.iter().collect(),
            NestableStatement::Not(s) => vec![s.statement.as_ref()],
            _ => Vec::new(),
        }
    }

    /// The request component a leaf inspects, if it inspects one.
    pub fn field_to_match(&self) -> Option<&FieldToMatch> {
        match self {
            NestableStatement::ByteMatch(s) => Some(&s.field_to_match),
            NestableStatement::SqliMatch(s) => Some(&s.field_to_match),
            NestableStatement::XssMatch(s) => Some(&s.field_to_match),
            NestableStatement::SizeConstraint(s) => Some(&s.field_to_match),
            NestableStatement::RegexMatch(s) => Some(&s.field_to_match),
            NestableStatement::RegexPatternSetReference(s) => Some(&s.field_to_match),
            _ => None,
        }
    }

    /// Text transformations of a leaf; empty for statements without them.
    pub fn text_transformations(&self) -> &[TextTransformation] {
        match self {
            NestableStatement::ByteMatch(s) => &s.text_transformations,
            NestableStatement::SqliMatch(s) => &s.text_transformations,
            NestableStatement::XssMatch(s) => &s.text_transformations,
            NestableStatement::SizeConstraint(s) => &s.text_transformations,
            NestableStatement::RegexMatch(s) => &s.text_transformations,
            NestableStatement::RegexPatternSetReference(s) => &s.text_transformations,
            _ => &[],
        }
    }

    /// Depth of the deepest leaf below this statement (a leaf is depth 1).
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(NestableStatement::depth)
            .max()
            .unwrap_or(0)
    }

    /// Calls `visit` on this statement and every descendant, parents first.
    pub fn walk<F>(&self, path: &str, visit: &mut F)
    where
        F: FnMut(&NestableStatement, &str),
    {
        visit(self, path);
        let kind = self.kind();
        match self {
            NestableStatement::And(AndStatement { statements })
            | NestableStatement::Or(OrStatement { statements }) => {
                for (i, child) in statements.iter().enumerate() {
                    child.walk(&format!("{}.{}.Statements[{}]", path, kind, i), visit);
                }
            }
            NestableStatement::Not(not) => {
                not.statement
                    .walk(&format!("{}.{}.Statement", path, kind), visit);
            }
            _ => {}
        }
    }
}

/// Where the search string must appear in the inspected component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionalConstraint {
    Exactly,
    StartsWith,
    EndsWith,
    Contains,
    ContainsWord,
}

/// The value a byte match searches for.
///
/// CloudFormation accepts the plain string or its base64 encoding, never
/// both; the enum is flattened into [`ByteMatchStatement`], which rejects
/// input carrying both keys or neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchValue {
    /// `SearchString`
    #[serde(rename = "SearchString")]
    Text(String),
    /// `SearchStringBase64`
    #[serde(rename = "SearchStringBase64")]
    Base64(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", try_from = "ByteMatchWire")]
pub struct ByteMatchStatement {
    pub field_to_match: FieldToMatch,
    pub positional_constraint: PositionalConstraint,
    #[serde(flatten)]
    pub search: SearchValue,
    pub text_transformations: Vec<TextTransformation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ByteMatchWire {
    field_to_match: FieldToMatch,
    positional_constraint: PositionalConstraint,
    #[serde(default)]
    search_string: Option<String>,
    #[serde(default)]
    search_string_base64: Option<String>,
    text_transformations: Vec<TextTransformation>,
}

impl TryFrom<ByteMatchWire> for ByteMatchStatement {
    type Error = ModelError;

    fn try_from(wire: ByteMatchWire) -> Result<Self, Self::Error> {
        let search = exactly_one(
            wire.search_string,
            wire.search_string_base64,
            "ByteMatchStatement",
            ("SearchString", "SearchStringBase64"),
        )?
        .map_or_else(SearchValue::Base64, SearchValue::Text);
        Ok(Self {
            field_to_match: wire.field_to_match,
            positional_constraint: wire.positional_constraint,
            search,
            text_transformations: wire.text_transformations,
        })
    }
}

impl ByteMatchStatement {
    /// Byte match on a plain search string.
    pub fn text(
        field_to_match: FieldToMatch,
        positional_constraint: PositionalConstraint,
        search: impl Into<String>,
        text_transformations: Vec<TextTransformation>,
    ) -> Self {
        Self {
            field_to_match,
            positional_constraint,
            search: SearchValue::Text(search.into()),
            text_transformations,
        }
    }
}

/// SQL injection detection sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensitivityLevel {
    Low,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SqliMatchStatement {
    pub field_to_match: FieldToMatch,
    pub text_transformations: Vec<TextTransformation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitivity_level: Option<SensitivityLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct XssMatchStatement {
    pub field_to_match: FieldToMatch,
    pub text_transformations: Vec<TextTransformation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonOperator {
    Eq,
    Ne,
    Le,
    Lt,
    Ge,
    Gt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SizeConstraintStatement {
    pub field_to_match: FieldToMatch,
    pub comparison_operator: ComparisonOperator,
    /// Size in bytes.
    pub size: u64,
    pub text_transformations: Vec<TextTransformation>,
}

/// Whether to match when the forwarded-IP header is missing or malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FallbackBehavior {
    Match,
    NoMatch,
}

/// Read the client IP from a header instead of the connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ForwardedIpConfiguration {
    /// Header carrying the client IP, usually `X-Forwarded-For`.
    pub header_name: String,
    pub fallback_behavior: FallbackBehavior,
}

/// Which address of a multi-valued forwarded-IP header to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ForwardedIpPosition {
    First,
    Last,
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IpSetForwardedIpConfiguration {
    pub header_name: String,
    pub fallback_behavior: FallbackBehavior,
    pub position: ForwardedIpPosition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GeoMatchStatement {
    #[serde(default)]
    pub country_codes: Vec<String>,
    #[serde(
        rename = "ForwardedIPConfig",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub forwarded_ip_config: Option<ForwardedIpConfiguration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegexMatchStatement {
    pub field_to_match: FieldToMatch,
    pub regex_string: String,
    pub text_transformations: Vec<TextTransformation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IpSetReferenceStatement {
    pub arn: CfnString,
    #[serde(
        rename = "IPSetForwardedIPConfig",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub ip_set_forwarded_ip_config: Option<IpSetForwardedIpConfiguration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegexPatternSetReferenceStatement {
    pub arn: CfnString,
    pub field_to_match: FieldToMatch,
    pub text_transformations: Vec<TextTransformation>,
}

/// Whether a label match names a full label or a namespace prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LabelMatchScope {
    Label,
    Namespace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LabelMatchStatement {
    pub scope: LabelMatchScope,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AndStatement {
    pub statements: Vec<NestableStatement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrStatement {
    pub statements: Vec<NestableStatement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NotStatement {
    pub statement: Box<NestableStatement>,
}

/// Key WAF aggregates request counts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregateKeyType {
    /// Connection source IP.
    Ip,
    /// IP read from `ForwardedIPConfig`'s header.
    ForwardedIp,
}

/// Rate limit over a five minute window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RateBasedStatement {
    /// Requests per five minutes before the rule matches.
    pub limit: u64,
    pub aggregate_key_type: AggregateKeyType,
    #[serde(
        rename = "ForwardedIPConfig",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub forwarded_ip_config: Option<ForwardedIpConfiguration>,
    /// Only requests matching this statement are counted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_down_statement: Option<Box<NestableStatement>>,
}

impl RateBasedStatement {
    /// Per-IP rate limit with no scope-down.
    pub fn per_ip(limit: u64) -> Self {
        Self {
            limit,
            aggregate_key_type: AggregateKeyType::Ip,
            forwarded_ip_config: None,
            scope_down_statement: None,
        }
    }

    /// Restricts counting to requests matching `statement`.
    pub fn with_scope_down(mut self, statement: NestableStatement) -> Self {
        self.scope_down_statement = Some(Box::new(statement));
        self
    }
}

/// A rule inside a referenced group that is switched to Count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExcludedRule {
    pub name: String,
}

/// Replaces the action of one rule inside a referenced group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleActionOverride {
    pub name: String,
    pub action_to_use: RuleAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ManagedRuleGroupStatement {
    pub name: String,
    pub vendor_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_rules: Vec<ExcludedRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rule_action_overrides: Vec<RuleActionOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_down_statement: Option<Box<NestableStatement>>,
}

impl ManagedRuleGroupStatement {
    /// An AWS managed rule group, e.g. `AWSManagedRulesCommonRuleSet`.
    pub fn aws(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vendor_name: "AWS".to_string(),
            version: None,
            excluded_rules: Vec::new(),
            rule_action_overrides: Vec::new(),
            scope_down_statement: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleGroupReferenceStatement {
    pub arn: CfnString,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_rules: Vec<ExcludedRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rule_action_overrides: Vec<RuleActionOverride>,
}
