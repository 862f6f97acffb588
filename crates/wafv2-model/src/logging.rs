//! `AWS::WAFv2::LoggingConfiguration`: where a web ACL's traffic logs go,
//! which fields are redacted, and which requests are kept.

use serde::{Deserialize, Serialize};

use crate::common::CfnString;
use crate::error::{required, Result};
use crate::field::FieldToMatch;
use crate::resource::CfnResource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoggingConfiguration {
    /// Kinesis Data Firehose, CloudWatch Logs or S3 ARNs. WAF accepts one.
    pub log_destination_configs: Vec<CfnString>,
    /// ARN of the web ACL being logged.
    pub resource_arn: CfnString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging_filter: Option<LoggingFilter>,
    /// Request parts to omit from logs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub redacted_fields: Vec<FieldToMatch>,
}

impl LoggingConfiguration {
    /// Starts a builder; `LogDestinationConfigs` and `ResourceArn` are required.
    pub fn builder() -> LoggingConfigurationBuilder {
        LoggingConfigurationBuilder::default()
    }
}

impl CfnResource for LoggingConfiguration {
    const TYPE_NAME: &'static str = "AWS::WAFv2::LoggingConfiguration";
    const ATTRIBUTES: &'static [&'static str] = &[];
    const REPLACEMENT_PROPERTIES: &'static [&'static str] = &["ResourceArn"];
}

/// Keep or drop a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterBehavior {
    Keep,
    Drop,
}

/// How a filter combines its conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterRequirement {
    MeetsAll,
    MeetsAny,
}

/// Terminating action recorded for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoggedAction {
    Allow,
    Block,
    Count,
    Captcha,
    Challenge,
    ExcludedAsCount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActionCondition {
    pub action: LoggedAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LabelNameCondition {
    pub label_name: String,
}

/// One condition of a logging filter: an action or a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    ActionCondition(ActionCondition),
    LabelNameCondition(LabelNameCondition),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Filter {
    pub behavior: FilterBehavior,
    pub requirement: FilterRequirement,
    pub conditions: Vec<Condition>,
}

/// Which requests end up in the logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoggingFilter {
    /// Applied to requests no filter matches.
    pub default_behavior: FilterBehavior,
    pub filters: Vec<Filter>,
}

impl LoggingFilter {
    /// Keep only requests whose terminating action is one of `actions`.
    pub fn keep_only(actions: &[LoggedAction]) -> Self {
        Self {
            default_behavior: FilterBehavior::Drop,
            filters: vec![Filter {
                behavior: FilterBehavior::Keep,
                requirement: FilterRequirement::MeetsAny,
                conditions: actions
                    .iter()
                    .map(|&action| Condition::ActionCondition(ActionCondition { action }))
                    .collect(),
            }],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoggingConfigurationBuilder {
    log_destination_configs: Option<Vec<CfnString>>,
    resource_arn: Option<CfnString>,
    logging_filter: Option<LoggingFilter>,
    redacted_fields: Vec<FieldToMatch>,
}

impl LoggingConfigurationBuilder {
    /// Sets `LogDestinationConfigs`.
    ///
    /// # Arguments
    /// * `destinations` - Firehose, CloudWatch Logs or S3 ARNs. Names must start
    ///   with `aws-waf-logs-`, and validation reports anything but exactly one.
    pub fn with_log_destinations<I, S>(mut self, destinations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CfnString>,
    {
        self.log_destination_configs = Some(destinations.into_iter().map(Into::into).collect());
        self
    }

    /// Sets `ResourceArn`, the web ACL being logged.
    pub fn with_resource_arn(mut self, arn: impl Into<CfnString>) -> Self {
        self.resource_arn = Some(arn.into());
        self
    }

    /// Sets the optional `LoggingFilter`.
    pub fn with_logging_filter(mut self, filter: LoggingFilter) -> Self {
        self.logging_filter = Some(filter);
        self
    }

    /// Appends a field to `RedactedFields`.
    pub fn with_redacted_field(mut self, field: FieldToMatch) -> Self {
        self.redacted_fields.push(field);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    /// A missing `LogDestinationConfigs` or `ResourceArn`.
    pub fn build(self) -> Result<LoggingConfiguration> {
        Ok(LoggingConfiguration {
            log_destination_configs: required(
                self.log_destination_configs,
                LoggingConfiguration::TYPE_NAME,
                "LogDestinationConfigs",
            )?,
            resource_arn: required(
                self.resource_arn,
                LoggingConfiguration::TYPE_NAME,
                "ResourceArn",
            )?,
            logging_filter: self.logging_filter,
            redacted_fields: self.redacted_fields,
        })
    }
}
