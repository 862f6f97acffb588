//! # Schema-Shape Tests for the WAFv2 Model
//!
//! Cross-module checks of the properties every record in this crate
//! guarantees:
//!
//! 1. **Required properties**: omitting one fails construction
//! 2. **Single-key statements**: every statement renders one variant key
//! 3. **Transformation order**: lists keep order and values verbatim
//! 4. **Accessor identity**: built records hold exactly the supplied values

use crate::action::{BlockAction, DefaultAction, OverrideAction, RuleAction};
use crate::association::{WebAclAssociation, WebAclAssociationBuilder};
use crate::common::{CfnString, IpAddressVersion, Scope, VisibilityConfig};
use crate::error::{ModelError, Result};
use crate::field::{FieldToMatch, TextTransformation, TextTransformationType};
use crate::ip_set::{IpSet, IpSetBuilder};
use crate::logging::{LoggingConfiguration, LoggingConfigurationBuilder};
use crate::regex_pattern_set::{RegexPatternSet, RegexPatternSetBuilder};
use crate::resource::{CfnResource, WafResource};
use crate::rule::Rule;
use crate::rule_group::{RuleGroup, RuleGroupBuilder};
use crate::statement::{
    ComparisonOperator, ManagedRuleGroupStatement, NestableStatement, RateBasedStatement,
    RegexMatchStatement, RegexPatternSetReferenceStatement, RuleGroupReferenceStatement,
    SizeConstraintStatement, Statement, XssMatchStatement,
};
use crate::web_acl::{WebAcl, WebAclBuilder};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn transforms() -> Vec<TextTransformation> {
    vec![
        TextTransformation::new(2, TextTransformationType::Lowercase),
        TextTransformation::new(0, TextTransformationType::UrlDecode),
        TextTransformation::new(1, TextTransformationType::HtmlEntityDecode),
    ]
}

fn every_statement() -> Vec<Statement> {
    let leaves = vec![
        NestableStatement::XssMatch(XssMatchStatement {
            field_to_match: FieldToMatch::query_string(),
            text_transformations: transforms(),
        }),
        NestableStatement::SizeConstraint(SizeConstraintStatement {
            field_to_match: FieldToMatch::body(),
            comparison_operator: ComparisonOperator::Gt,
            size: 8192,
            text_transformations: TextTransformation::none(),
        }),
        NestableStatement::RegexMatch(RegexMatchStatement {
            field_to_match: FieldToMatch::uri_path(),
            regex_string: "^/api/v[0-9]+/".to_string(),
            text_transformations: TextTransformation::none(),
        }),
        NestableStatement::RegexPatternSetReference(RegexPatternSetReferenceStatement {
            arn: CfnString::get_att("Probes", "Arn"),
            field_to_match: FieldToMatch::uri_path(),
            text_transformations: TextTransformation::none(),
        }),
        NestableStatement::geo_match(["FR"]),
        NestableStatement::label("app:trusted"),
        NestableStatement::ip_set_reference(CfnString::get_att("Office", "Arn")),
    ];

    let mut statements: Vec<Statement> = leaves.iter().cloned().map(Statement::from).collect();
    statements.push(NestableStatement::and(leaves[..2].to_vec()).into());
    statements.push(NestableStatement::or(leaves[2..4].to_vec()).into());
    statements.push(NestableStatement::not(leaves[4].clone()).into());
    statements.push(
        RateBasedStatement::per_ip(1000)
            .with_scope_down(leaves[5].clone())
            .into(),
    );
    statements.push(ManagedRuleGroupStatement::aws("AWSManagedRulesSQLiRuleSet").into());
    statements.push(
        RuleGroupReferenceStatement {
            arn: CfnString::get_att("Shared", "Arn"),
            excluded_rules: Vec::new(),
            rule_action_overrides: Vec::new(),
        }
        .into(),
    );
    statements
}

/// Builds once per required property with that property left out, then once
/// with all of them set.
fn assert_each_required<B: Clone, T>(
    resource: &'static str,
    start: B,
    setters: &[(&'static str, fn(B) -> B)],
    build: fn(B) -> Result<T>,
) {
    for (skip, (property, _)) in setters.iter().enumerate() {
        let builder = setters
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != skip)
            .fold(start.clone(), |b, (_, (_, set))| set(b));
        match build(builder) {
            Err(ModelError::MissingProperty {
                resource: r,
                property: p,
            }) => {
                assert_eq!(r, resource);
                assert_eq!(p, *property);
            }
            Err(other) => panic!("{} without {}: unexpected error {}", resource, property, other),
            Ok(_) => panic!("{} built without {}", resource, property),
        }
    }
    let complete = setters.iter().fold(start, |b, (_, set)| set(b));
    assert!(build(complete).is_ok(), "{} with every required property", resource);
}

// =============================================================================
// Required Property Tests
// =============================================================================

#[test]
fn test_ip_set_omits_each_required_property() {
    let setters: [(&str, fn(IpSetBuilder) -> IpSetBuilder); 3] = [
        ("Addresses", |b| b.with_addresses(["192.0.2.0/24"])),
        ("IPAddressVersion", |b| {
            b.with_ip_address_version(IpAddressVersion::Ipv4)
        }),
        ("Scope", |b| b.with_scope(Scope::Regional)),
    ];
    assert_each_required(IpSet::TYPE_NAME, IpSet::builder(), &setters, IpSetBuilder::build);
}

#[test]
fn test_regex_pattern_set_omits_each_required_property() {
    let setters: [(&str, fn(RegexPatternSetBuilder) -> RegexPatternSetBuilder); 2] = [
        ("RegularExpressionList", |b| {
            b.with_regular_expressions(["^/admin"])
        }),
        ("Scope", |b| b.with_scope(Scope::Regional)),
    ];
    assert_each_required(
        RegexPatternSet::TYPE_NAME,
        RegexPatternSet::builder(),
        &setters,
        RegexPatternSetBuilder::build,
    );
}

#[test]
fn test_rule_group_omits_each_required_property() {
    let setters: [(&str, fn(RuleGroupBuilder) -> RuleGroupBuilder); 3] = [
        ("Capacity", |b| b.with_capacity(50)),
        ("Scope", |b| b.with_scope(Scope::Regional)),
        ("VisibilityConfig", |b| {
            b.with_visibility_config(VisibilityConfig::enabled("group"))
        }),
    ];
    assert_each_required(
        RuleGroup::TYPE_NAME,
        RuleGroup::builder(),
        &setters,
        RuleGroupBuilder::build,
    );
}

#[test]
fn test_web_acl_omits_each_required_property() {
    let setters: [(&str, fn(WebAclBuilder) -> WebAclBuilder); 3] = [
        ("DefaultAction", |b| b.with_default_action(DefaultAction::allow())),
        ("Scope", |b| b.with_scope(Scope::Regional)),
        ("VisibilityConfig", |b| {
            b.with_visibility_config(VisibilityConfig::enabled("acl"))
        }),
    ];
    assert_each_required(WebAcl::TYPE_NAME, WebAcl::builder(), &setters, WebAclBuilder::build);
}

#[test]
fn test_logging_configuration_omits_each_required_property() {
    let setters: [(&str, fn(LoggingConfigurationBuilder) -> LoggingConfigurationBuilder); 2] = [
        ("LogDestinationConfigs", |b| {
            b.with_log_destinations(["arn:aws:s3:::aws-waf-logs-x"])
        }),
        ("ResourceArn", |b| b.with_resource_arn(CfnString::get_att("Acl", "Arn"))),
    ];
    assert_each_required(
        LoggingConfiguration::TYPE_NAME,
        LoggingConfiguration::builder(),
        &setters,
        LoggingConfigurationBuilder::build,
    );
}

#[test]
fn test_association_omits_each_required_property() {
    let setters: [(&str, fn(WebAclAssociationBuilder) -> WebAclAssociationBuilder); 2] = [
        ("ResourceArn", |b| {
            b.with_resource_arn("arn:aws:apigateway:eu-west-1::/restapis/a/stages/prod")
        }),
        ("WebACLArn", |b| b.with_web_acl_arn(CfnString::get_att("Acl", "Arn"))),
    ];
    assert_each_required(
        WebAclAssociation::TYPE_NAME,
        WebAclAssociation::builder(),
        &setters,
        WebAclAssociationBuilder::build,
    );
}

#[test]
fn test_every_resource_reports_missing_required_property() {
    let cases: Vec<(String, &str)> = vec![
        (
            IpSet::builder().build().unwrap_err().to_string(),
            "Addresses",
        ),
        (
            LoggingConfiguration::builder()
                .build()
                .unwrap_err()
                .to_string(),
            "LogDestinationConfigs",
        ),
        (
            RegexPatternSet::builder().build().unwrap_err().to_string(),
            "RegularExpressionList",
        ),
        (
            RuleGroup::builder().build().unwrap_err().to_string(),
            "Capacity",
        ),
        (
            WebAcl::builder().build().unwrap_err().to_string(),
            "DefaultAction",
        ),
        (
            WebAclAssociation::builder()
                .build()
                .unwrap_err()
                .to_string(),
            "ResourceArn",
        ),
    ];

    for (message, property) in cases {
        assert_eq!(message, format!("Required property '{}' is missing", property));
    }
}

#[test]
fn test_parsing_without_required_property_fails() {
    let missing = [
        json!({"Type": "AWS::WAFv2::RuleGroup", "Properties": {
            "Scope": "REGIONAL",
            "VisibilityConfig": {"CloudWatchMetricsEnabled": true, "MetricName": "g", "SampledRequestsEnabled": true}
        }}),
        json!({"Type": "AWS::WAFv2::WebACL", "Properties": {
            "DefaultAction": {"Allow": {}},
            "Scope": "REGIONAL"
        }}),
        json!({"Type": "AWS::WAFv2::LoggingConfiguration", "Properties": {
            "LogDestinationConfigs": ["arn:aws:s3:::aws-waf-logs-x"]
        }}),
    ];
    for value in missing {
        assert!(serde_json::from_value::<WafResource>(value).is_err());
    }
}

// =============================================================================
// Statement Shape Tests
// =============================================================================

#[test]
fn test_every_statement_has_exactly_one_key() {
    for statement in every_statement() {
        let value = serde_json::to_value(&statement).unwrap();
        let obj = value.as_object().expect("statement renders as an object");
        assert_eq!(obj.len(), 1, "statement {:?}", statement.kind());
        assert!(obj.contains_key(statement.kind()));

        let parsed: Statement = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, statement);
    }
}

#[test]
fn test_transformations_keep_order_and_values() {
    let statement: Statement = NestableStatement::XssMatch(XssMatchStatement {
        field_to_match: FieldToMatch::single_header("referer"),
        text_transformations: transforms(),
    })
    .into();

    let value = serde_json::to_value(&statement).unwrap();
    assert_eq!(
        value["XssMatchStatement"]["TextTransformations"],
        json!([
            {"Priority": 2, "Type": "LOWERCASE"},
            {"Priority": 0, "Type": "URL_DECODE"},
            {"Priority": 1, "Type": "HTML_ENTITY_DECODE"}
        ])
    );

    let parsed: Statement = serde_json::from_value(value).unwrap();
    match parsed {
        Statement::Nested(inner) => assert_eq!(inner.text_transformations(), transforms().as_slice()),
        other => panic!("unexpected statement {:?}", other),
    }
}

// =============================================================================
// Identity Tests
// =============================================================================

#[test]
fn test_web_acl_accessor_identity() {
    let rule = Rule::with_action(
        "too-big",
        7,
        NestableStatement::SizeConstraint(SizeConstraintStatement {
            field_to_match: FieldToMatch::body(),
            comparison_operator: ComparisonOperator::Ge,
            size: 65536,
            text_transformations: TextTransformation::none(),
        }),
        RuleAction::Block(BlockAction::with_response(413, None)),
        VisibilityConfig::enabled("too-big"),
    );

    let acl = WebAcl::builder()
        .with_default_action(DefaultAction::allow())
        .with_scope(Scope::Regional)
        .with_visibility_config(VisibilityConfig::disabled("api"))
        .with_name("api")
        .with_description("api protection")
        .with_rule(rule.clone())
        .build()
        .unwrap();

    assert_eq!(acl.default_action, DefaultAction::allow());
    assert_eq!(acl.scope, Scope::Regional);
    assert_eq!(acl.visibility_config, VisibilityConfig::disabled("api"));
    assert_eq!(acl.name.as_deref(), Some("api"));
    assert_eq!(acl.description.as_deref(), Some("api protection"));
    assert_eq!(acl.rules, vec![rule]);
    assert!(acl.tags.is_empty());
    assert!(acl.captcha_config.is_none());
}

#[test]
fn test_resource_round_trip_through_wire_format() {
    let resources: Vec<WafResource> = vec![
        IpSet::builder()
            .with_addresses(["2001:db8::/32"])
            .with_ip_address_version(IpAddressVersion::Ipv6)
            .with_scope(Scope::Regional)
            .build()
            .unwrap()
            .into(),
        RuleGroup::builder()
            .with_capacity(50)
            .with_scope(Scope::Regional)
            .with_visibility_config(VisibilityConfig::enabled("g"))
            .with_rule(Rule::with_action(
                "r",
                0,
                NestableStatement::label("a:b"),
                RuleAction::count(),
                VisibilityConfig::enabled("r"),
            ))
            .build()
            .unwrap()
            .into(),
        WebAcl::builder()
            .with_default_action(DefaultAction::allow())
            .with_scope(Scope::Regional)
            .with_visibility_config(VisibilityConfig::enabled("acl"))
            .with_rule(Rule::with_override(
                "shared",
                0,
                RuleGroupReferenceStatement {
                    arn: CfnString::get_att("Group", "Arn"),
                    excluded_rules: Vec::new(),
                    rule_action_overrides: Vec::new(),
                },
                OverrideAction::Count {},
                VisibilityConfig::enabled("shared"),
            ))
            .build()
            .unwrap()
            .into(),
    ];

    for resource in resources {
        let text = serde_json::to_string(&resource).unwrap();
        let parsed: WafResource = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, resource);
    }
}

#[test]
fn test_type_name_constants() {
    assert_eq!(IpSet::TYPE_NAME, "AWS::WAFv2::IPSet");
    assert_eq!(LoggingConfiguration::TYPE_NAME, "AWS::WAFv2::LoggingConfiguration");
    assert_eq!(RegexPatternSet::TYPE_NAME, "AWS::WAFv2::RegexPatternSet");
    assert_eq!(RuleGroup::TYPE_NAME, "AWS::WAFv2::RuleGroup");
    assert_eq!(WebAcl::TYPE_NAME, "AWS::WAFv2::WebACL");
    assert_eq!(WebAclAssociation::TYPE_NAME, "AWS::WAFv2::WebACLAssociation");
}
