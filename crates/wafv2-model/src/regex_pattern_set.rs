//! `AWS::WAFv2::RegexPatternSet`: a named list of regular expressions.

use serde::{Deserialize, Serialize};

use crate::common::{Scope, Tag};
use crate::error::{required, Result};
use crate::resource::CfnResource;

/// Regular expressions referenced by `RegexPatternSetReferenceStatement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegexPatternSet {
    pub regular_expression_list: Vec<String>,
    pub scope: Scope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl RegexPatternSet {
    pub fn builder() -> RegexPatternSetBuilder {
        RegexPatternSetBuilder::default()
    }
}

impl CfnResource for RegexPatternSet {
    const TYPE_NAME: &'static str = "AWS::WAFv2::RegexPatternSet";
    const ATTRIBUTES: &'static [&'static str] = &["Arn", "Id"];
    const REPLACEMENT_PROPERTIES: &'static [&'static str] = &["Name", "Scope"];
}

#[derive(Debug, Clone, Default)]
pub struct RegexPatternSetBuilder {
    regular_expression_list: Option<Vec<String>>,
    scope: Option<Scope>,
    description: Option<String>,
    name: Option<String>,
    tags: Vec<Tag>,
}

impl RegexPatternSetBuilder {
    /// Sets `RegularExpressionList`. Patterns are passed through unchanged.
    pub fn with_regular_expressions<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regular_expression_list = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    /// Sets `Scope`.
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
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

    /// Appends a tag.
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Builds the record, failing on the first missing required property.
    pub fn build(self) -> Result<RegexPatternSet> {
        Ok(RegexPatternSet {
            regular_expression_list: required(
                self.regular_expression_list,
                RegexPatternSet::TYPE_NAME,
                "RegularExpressionList",
            )?,
            scope: required(self.scope, RegexPatternSet::TYPE_NAME, "Scope")?,
            description: self.description,
            name: self.name,
            tags: self.tags,
        })
    }
}
