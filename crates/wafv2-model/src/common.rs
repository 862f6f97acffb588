//! # Shared Property Types
//!
//! Property types referenced by more than one WAFv2 resource: deployment
//! scope, tags, CloudWatch visibility settings, custom response bodies, and
//! the [`CfnString`] value used for ARN-valued properties.
//!
//! All wire names follow the CloudFormation resource schema exactly. Enum
//! values are upper snake case (`CLOUDFRONT`, `IPV4`, `TEXT_PLAIN`), property
//! names are PascalCase.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Region that CLOUDFRONT-scoped resources must be declared in.
pub const CLOUDFRONT_REGION: &str = "us-east-1";

/// Deployment target of a WAFv2 resource.
///
/// # Variants
///
/// - `Cloudfront`: protects CloudFront distributions; must be declared in
///   [`CLOUDFRONT_REGION`].
/// - `Regional`: protects regional resources (ALB, API Gateway, AppSync,
///   Cognito user pools) in the stack's own region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scope {
    /// CloudFront distributions.
    Cloudfront,
    /// Regional application resources.
    Regional,
}

impl Scope {
    /// Returns the wire value (`CLOUDFRONT` or `REGIONAL`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Cloudfront => "CLOUDFRONT",
            Scope::Regional => "REGIONAL",
        }
    }

    /// Returns true if a resource with this scope may be declared in `region`.
    pub fn allowed_in_region(&self, region: &str) -> bool {
        match self {
            Scope::Cloudfront => region == CLOUDFRONT_REGION,
            Scope::Regional => true,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// IP address family of an IPSet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IpAddressVersion {
    /// IPv4 CIDR ranges.
    Ipv4,
    /// IPv6 CIDR ranges.
    Ipv6,
}

/// A resource tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

impl Tag {
    /// Creates a tag from a key and value.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// CloudWatch metrics and request sampling settings.
///
/// Required on every WebACL, RuleGroup and Rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VisibilityConfig {
    /// Whether WAF publishes CloudWatch metrics for this entity.
    pub cloud_watch_metrics_enabled: bool,
    /// Metric name; letters, digits, hyphen and underscore only.
    pub metric_name: String,
    /// Whether WAF keeps a sample of matching requests.
    pub sampled_requests_enabled: bool,
}

impl VisibilityConfig {
    /// Metrics and sampling both enabled under `metric_name`.
    pub fn enabled(metric_name: impl Into<String>) -> Self {
        Self {
            cloud_watch_metrics_enabled: true,
            metric_name: metric_name.into(),
            sampled_requests_enabled: true,
        }
    }

    /// Metrics and sampling both disabled. A metric name is still required.
    pub fn disabled(metric_name: impl Into<String>) -> Self {
        Self {
            cloud_watch_metrics_enabled: false,
            metric_name: metric_name.into(),
            sampled_requests_enabled: false,
        }
    }
}

/// Content type of a custom response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseContentType {
    /// `text/plain`
    TextPlain,
    /// `text/html`
    TextHtml,
    /// `application/json`
    ApplicationJson,
}

/// A response body that block actions can reference by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResponseBody {
    /// Body content type.
    pub content_type: ResponseContentType,
    /// Body text.
    pub content: String,
}

impl CustomResponseBody {
    /// Creates a response body.
    pub fn new(content_type: ResponseContentType, content: impl Into<String>) -> Self {
        Self {
            content_type,
            content: content.into(),
        }
    }
}

/// A label a rule attaches to matching requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Label {
    /// Label name, e.g. `bots:scraper`.
    pub name: String,
}

impl Label {
    /// Creates a label.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A string-valued property that may be a literal or a CloudFormation
/// intrinsic function.
///
/// ARN-valued properties (IPSet references, association targets, logging
/// destinations) usually point at resources declared in the same template,
/// which is only possible through `Ref` / `Fn::GetAtt`.
///
/// # Example
///
/// ```rust
/// use wafv2_model::CfnString;
///
/// let literal = CfnString::from("arn:aws:wafv2:us-east-1:111122223333:global/ipset/x/1");
/// assert!(literal.as_literal().is_some());
///
/// let att = CfnString::get_att("BlockList", "Arn");
/// assert_eq!(
///     serde_json::to_value(&att).unwrap(),
///     serde_json::json!({"Fn::GetAtt": ["BlockList", "Arn"]})
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CfnString {
    /// A plain string.
    Literal(String),
    /// An intrinsic function resolved by CloudFormation at deploy time.
    Intrinsic(Intrinsic),
}

/// CloudFormation intrinsic functions that evaluate to a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intrinsic {
    /// `{"Ref": "LogicalId"}`
    #[serde(rename = "Ref")]
    Ref(String),
    /// `{"Fn::GetAtt": ["LogicalId", "Attribute"]}`
    #[serde(rename = "Fn::GetAtt")]
    GetAtt(String, String),
    /// `{"Fn::Sub": "arn:${AWS::Partition}:..."}`
    #[serde(rename = "Fn::Sub")]
    Sub(String),
    /// `{"Fn::ImportValue": "ExportName"}`
    #[serde(rename = "Fn::ImportValue")]
    ImportValue(String),
}

impl CfnString {
    /// `Ref` to a logical id.
    pub fn reference(logical_id: impl Into<String>) -> Self {
        CfnString::Intrinsic(Intrinsic::Ref(logical_id.into()))
    }

    /// `Fn::GetAtt` of a logical id's attribute.
    pub fn get_att(logical_id: impl Into<String>, attribute: impl Into<String>) -> Self {
        CfnString::Intrinsic(Intrinsic::GetAtt(logical_id.into(), attribute.into()))
    }

    /// `Fn::Sub` template string.
    pub fn sub(template: impl Into<String>) -> Self {
        CfnString::Intrinsic(Intrinsic::Sub(template.into()))
    }

    /// `Fn::ImportValue` of a stack export.
    pub fn import_value(export_name: impl Into<String>) -> Self {
        CfnString::Intrinsic(Intrinsic::ImportValue(export_name.into()))
    }

    /// Returns the literal string, if this is not an intrinsic.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            CfnString::Literal(s) => Some(s),
            CfnString::Intrinsic(_) => None,
        }
    }

    /// Returns the logical id this value refers to through `Ref` or
    /// `Fn::GetAtt`, with the attribute for the latter.
    pub fn logical_target(&self) -> Option<(&str, Option<&str>)> {
        match self {
            CfnString::Intrinsic(Intrinsic::Ref(id)) => Some((id, None)),
            CfnString::Intrinsic(Intrinsic::GetAtt(id, attr)) => Some((id, Some(attr))),
            _ => None,
        }
    }
}

impl From<&str> for CfnString {
    fn from(value: &str) -> Self {
        CfnString::Literal(value.to_string())
    }
}

impl From<String> for CfnString {
    fn from(value: String) -> Self {
        CfnString::Literal(value)
    }
}

impl From<Intrinsic> for CfnString {
    fn from(value: Intrinsic) -> Self {
        CfnString::Intrinsic(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scope_wire_values() {
        assert_eq!(serde_json::to_value(Scope::Cloudfront).unwrap(), json!("CLOUDFRONT"));
        assert_eq!(serde_json::to_value(Scope::Regional).unwrap(), json!("REGIONAL"));
        let parsed: Scope = serde_json::from_value(json!("REGIONAL")).unwrap();
        assert_eq!(parsed, Scope::Regional);
    }

    #[test]
    fn test_cloudfront_region_rule() {
        assert!(Scope::Cloudfront.allowed_in_region("us-east-1"));
        assert!(!Scope::Cloudfront.allowed_in_region("eu-west-1"));
        assert!(Scope::Regional.allowed_in_region("eu-west-1"));
    }

    #[test]
    fn test_ip_address_version_wire_values() {
        assert_eq!(serde_json::to_value(IpAddressVersion::Ipv4).unwrap(), json!("IPV4"));
        assert_eq!(serde_json::to_value(IpAddressVersion::Ipv6).unwrap(), json!("IPV6"));
    }

    #[test]
    fn test_visibility_config_field_names() {
        let value = serde_json::to_value(VisibilityConfig::enabled("edge")).unwrap();
        assert_eq!(
            value,
            json!({
                "CloudWatchMetricsEnabled": true,
                "MetricName": "edge",
                "SampledRequestsEnabled": true
            })
        );
    }

    #[test]
    fn test_custom_response_body_content_type() {
        let body = CustomResponseBody::new(ResponseContentType::ApplicationJson, "{}");
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["ContentType"], json!("APPLICATION_JSON"));
    }

    #[test]
    fn test_cfn_string_literal_and_intrinsics() {
        assert_eq!(serde_json::to_value(CfnString::from("arn")).unwrap(), json!("arn"));
        assert_eq!(
            serde_json::to_value(CfnString::reference("Acl")).unwrap(),
            json!({"Ref": "Acl"})
        );
        assert_eq!(
            serde_json::to_value(CfnString::sub("arn:${AWS::Partition}:x")).unwrap(),
            json!({"Fn::Sub": "arn:${AWS::Partition}:x"})
        );

        let parsed: CfnString =
            serde_json::from_value(json!({"Fn::GetAtt": ["Acl", "Arn"]})).unwrap();
        assert_eq!(parsed.logical_target(), Some(("Acl", Some("Arn"))));

        let parsed: CfnString = serde_json::from_value(json!("plain")).unwrap();
        assert_eq!(parsed.as_literal(), Some("plain"));
        assert_eq!(parsed.logical_target(), None);
    }
}
