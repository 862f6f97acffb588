//! # Template Crate Tests
//!
//! ## Test Categories
//!
//! 1. **Round Trip**: render then parse a template holding every type
//! 2. **Fingerprint**: stable under key order and formatting
//! 3. **References**: dangling ids and unknown attributes
//! 4. **Change Detection**: update versus replacement per type

use crate::diff::{diff, ChangeAction, ChangeImpact};
use crate::error::TemplateError;
use crate::template::{Output, ResourceEntry, Template};
use serde_json::json;
use wafv2_model::logging::LoggedAction;
use wafv2_model::{
    CfnString, DefaultAction, IpAddressVersion, IpSet, LoggingConfiguration, LoggingFilter,
    NestableStatement, RegexPatternSet, Rule, RuleAction, RuleGroup, Scope, VisibilityConfig,
    WebAcl, WebAclAssociation,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn ip_set(addresses: &[&str]) -> IpSet {
    IpSet::builder()
        .with_addresses(addresses.iter().copied())
        .with_ip_address_version(IpAddressVersion::Ipv4)
        .with_scope(Scope::Regional)
        .build()
        .unwrap()
}

fn web_acl(name: &str) -> WebAcl {
    WebAcl::builder()
        .with_default_action(DefaultAction::allow())
        .with_scope(Scope::Regional)
        .with_visibility_config(VisibilityConfig::enabled("api"))
        .with_name(name)
        .with_rule(Rule::with_action(
            "office-only",
            0,
            NestableStatement::not(NestableStatement::ip_set_reference(CfnString::get_att(
                "Office", "Arn",
            ))),
            RuleAction::block(),
            VisibilityConfig::enabled("office-only"),
        ))
        .build()
        .unwrap()
}

/// Template with all six resource types wired together.
fn full_template() -> Template {
    let mut template = Template::new().with_description("api protection");
    template
        .add_resource("Office", ip_set(&["198.51.100.0/24"]))
        .unwrap();
    template
        .add_resource(
            "Probes",
            RegexPatternSet::builder()
                .with_regular_expressions(["^/wp-admin", "\\.php$"])
                .with_scope(Scope::Regional)
                .build()
                .unwrap(),
        )
        .unwrap();
    template
        .add_resource(
            "Shared",
            RuleGroup::builder()
                .with_capacity(50)
                .with_scope(Scope::Regional)
                .with_visibility_config(VisibilityConfig::enabled("shared"))
                .build()
                .unwrap(),
        )
        .unwrap();
    template.add_resource("Acl", web_acl("api")).unwrap();

    let acl_arn = template.get_att("Acl", "Arn").unwrap();
    template
        .add_entry(
            "Link",
            ResourceEntry::new(
                WebAclAssociation::builder()
                    .with_resource_arn(
                        "arn:aws:elasticloadbalancing:eu-west-1:111122223333:loadbalancer/app/web/1",
                    )
                    .with_web_acl_arn(acl_arn.clone())
                    .build()
                    .unwrap(),
            )
            .with_depends_on("Acl"),
        )
        .unwrap();
    template
        .add_resource(
            "Logs",
            LoggingConfiguration::builder()
                .with_log_destinations([CfnString::sub(
                    "arn:${AWS::Partition}:firehose:${AWS::Region}:${AWS::AccountId}:deliverystream/aws-waf-logs-api",
                )])
                .with_resource_arn(acl_arn.clone())
                .with_logging_filter(LoggingFilter::keep_only(&[LoggedAction::Block]))
                .build()
                .unwrap(),
        )
        .unwrap();
    template
        .add_output("AclArn", Output::new(acl_arn).with_description("web ACL ARN"))
        .unwrap();
    template
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_full_template_round_trip() {
    let template = full_template();
    template.check_references().unwrap();

    let text = template.to_json_pretty().unwrap();
    let parsed = Template::from_json(&text).unwrap();
    assert_eq!(parsed, template);
    assert_eq!(parsed.len(), 6);
}

#[test]
fn test_resources_listed_in_logical_id_order() {
    let template = full_template();
    let ids: Vec<&str> = template.resources().map(|(id, _)| id).collect();
    assert_eq!(ids, vec!["Acl", "Link", "Logs", "Office", "Probes", "Shared"]);
}

#[test]
fn test_rendered_entry_shape() {
    let value = full_template().to_json().unwrap();
    let link = &value["Resources"]["Link"];
    assert_eq!(link["Type"], json!("AWS::WAFv2::WebACLAssociation"));
    assert_eq!(link["DependsOn"], json!(["Acl"]));
    assert_eq!(
        link["Properties"]["WebACLArn"],
        json!({"Fn::GetAtt": ["Acl", "Arn"]})
    );
    assert!(value["Resources"]["Office"].get("DependsOn").is_none());
}

#[test]
fn test_unknown_resource_type_rejected() {
    let text = r#"{
        "AWSTemplateFormatVersion": "2010-09-09",
        "Resources": {
            "Bucket": {"Type": "AWS::S3::Bucket", "Properties": {}}
        }
    }"#;
    assert!(matches!(
        Template::from_json(text),
        Err(TemplateError::Serialization(_))
    ));
}

#[test]
fn test_malformed_logical_id_in_document_rejected() {
    let value = json!({
        "Resources": {
            "office-set": {
                "Type": "AWS::WAFv2::IPSet",
                "Properties": {"Addresses": [], "IPAddressVersion": "IPV4", "Scope": "REGIONAL"}
            }
        }
    });
    assert!(matches!(
        Template::from_value(value),
        Err(TemplateError::InvalidLogicalId(id)) if id == "office-set"
    ));
}

// =============================================================================
// Fingerprint Tests
// =============================================================================

#[test]
fn test_fingerprint_survives_reformatting() {
    let template = full_template();
    let compact = template.to_json_string().unwrap();
    let pretty = template.to_json_pretty().unwrap();
    assert_ne!(compact, pretty);

    let a = Template::from_json(&compact).unwrap().fingerprint().unwrap();
    let b = Template::from_json(&pretty).unwrap().fingerprint().unwrap();
    assert_eq!(a, b);
    assert_eq!(a, template.fingerprint().unwrap());
}

#[test]
fn test_fingerprint_tracks_content() {
    let mut other = full_template();
    other.description = Some("changed".to_string());
    assert_ne!(
        other.fingerprint().unwrap(),
        full_template().fingerprint().unwrap()
    );
}

// =============================================================================
// Reference Tests
// =============================================================================

#[test]
fn test_unknown_attribute_in_statement_detected() {
    let mut template = Template::new();
    template.add_resource("Office", ip_set(&[])).unwrap();
    let acl = WebAcl::builder()
        .with_default_action(DefaultAction::block())
        .with_scope(Scope::Regional)
        .with_visibility_config(VisibilityConfig::enabled("acl"))
        .with_rule(Rule::with_action(
            "office",
            0,
            NestableStatement::ip_set_reference(CfnString::get_att("Office", "LabelNamespace")),
            RuleAction::allow(),
            VisibilityConfig::enabled("office"),
        ))
        .build()
        .unwrap();
    template.add_resource("Acl", acl).unwrap();

    match template.check_references() {
        Err(TemplateError::UnknownAttribute {
            logical_id,
            type_name,
            attribute,
        }) => {
            assert_eq!(logical_id, "Office");
            assert_eq!(type_name, "AWS::WAFv2::IPSet");
            assert_eq!(attribute, "LabelNamespace");
        }
        other => panic!("expected unknown attribute, got {:?}", other),
    }
}

#[test]
fn test_dangling_depends_on_detected() {
    let mut template = Template::new();
    template
        .add_entry(
            "Office",
            ResourceEntry::new(ip_set(&["192.0.2.1/32"])).with_depends_on("Nowhere"),
        )
        .unwrap();
    assert!(matches!(
        template.check_references(),
        Err(TemplateError::DanglingReference { target, .. }) if target == "Nowhere"
    ));
}

#[test]
fn test_sub_variable_references_checked() {
    let mut template = Template::new();
    template.add_resource("Acl", web_acl("api")).unwrap();
    template.add_resource("Office", ip_set(&[])).unwrap();
    template
        .add_output("Stage", Output::new(CfnString::sub("${Gateway}/prod")))
        .unwrap();
    assert!(matches!(
        template.check_references(),
        Err(TemplateError::DanglingReference { source_id, target })
            if source_id == "Stage" && target == "Gateway"
    ));
}

#[test]
fn test_add_dependency() {
    let mut template = full_template();
    template.add_dependency("Logs", "Link").unwrap();
    template.add_dependency("Logs", "Link").unwrap();
    assert_eq!(template.resources["Logs"].depends_on, vec!["Link".to_string()]);
    assert!(matches!(
        template.add_dependency("Logs", "Ghost"),
        Err(TemplateError::UnknownLogicalId(_))
    ));
}

// =============================================================================
// Change Detection Tests
// =============================================================================

#[test]
fn test_name_change_replaces_web_acl() {
    let old = full_template();
    let mut new = full_template();
    new.resources.insert("Acl".to_string(), ResourceEntry::new(web_acl("api-v2")));

    let set = diff(&old, &new).unwrap();
    assert_eq!(set.changes.len(), 1);
    let change = &set.changes[0];
    assert_eq!(change.logical_id, "Acl");
    assert_eq!(change.action, ChangeAction::Replace);
    assert_eq!(change.properties, vec!["Name".to_string()]);
    assert_eq!(set.impact(), ChangeImpact::Replacement);
}

#[test]
fn test_address_change_updates_in_place() {
    let old = full_template();
    let mut new = full_template();
    new.resources.insert(
        "Office".to_string(),
        ResourceEntry::new(ip_set(&["198.51.100.0/24", "203.0.113.7/32"])),
    );

    let set = diff(&old, &new).unwrap();
    let change = set.get("Office").unwrap();
    assert_eq!(change.action, ChangeAction::Modify);
    assert_eq!(change.properties, vec!["Addresses".to_string()]);
    assert!(change.details.is_empty());
    assert_eq!(set.impact(), ChangeImpact::Update);
}

#[test]
fn test_depends_on_only_change_is_modify() {
    let old = full_template();
    let mut new = full_template();
    new.add_dependency("Logs", "Link").unwrap();

    let set = diff(&old, &new).unwrap();
    let change = set.get("Logs").unwrap();
    assert_eq!(change.action, ChangeAction::Modify);
    assert!(change.properties.is_empty());
    assert_eq!(change.details, vec!["DependsOn changed".to_string()]);
}

#[test]
fn test_association_target_change_replaces() {
    let old = full_template();
    let mut new = full_template();
    new.resources.insert(
        "Link".to_string(),
        ResourceEntry::new(
            WebAclAssociation::builder()
                .with_resource_arn("arn:aws:apigateway:eu-west-1::/restapis/a1/stages/prod")
                .with_web_acl_arn(CfnString::get_att("Acl", "Arn"))
                .build()
                .unwrap(),
        )
        .with_depends_on("Acl"),
    );

    let set = diff(&old, &new).unwrap();
    let change = set.get("Link").unwrap();
    assert_eq!(change.action, ChangeAction::Replace);
    assert_eq!(
        change.details,
        vec!["ResourceArn change requires replacement".to_string()]
    );
}

#[test]
fn test_output_changes_reported() {
    let old = full_template();
    let mut new = full_template();
    new.add_output("OfficeArn", Output::new(CfnString::get_att("Office", "Arn")))
        .unwrap();

    let set = diff(&old, &new).unwrap();
    assert!(set.changes.is_empty());
    assert_eq!(set.outputs, vec!["OfficeArn".to_string()]);
    assert!(!set.is_empty());
    assert_eq!(set.impact(), ChangeImpact::None);
}

#[test]
fn test_description_only_change_reported() {
    let old = full_template().with_description("a");
    let new = full_template().with_description("b");

    let set = diff(&old, &new).unwrap();
    assert_ne!(set.old_fingerprint, set.new_fingerprint);
    assert!(set.changes.is_empty());
    assert_eq!(set.template, vec!["Description".to_string()]);
    assert!(!set.is_empty());
    assert_eq!(set.impact(), ChangeImpact::None);
    assert_eq!(set.summary(), "Template Description changed\n");
}
