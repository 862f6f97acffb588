//! # Request Components and Text Transformations
//!
//! [`FieldToMatch`] selects the part of a web request a match statement
//! inspects. [`TextTransformation`] describes one normalization step applied
//! to that part before matching; a statement carries an ordered list of them
//! and WAF applies them in ascending `Priority` order.
//!
//! On the wire a `FieldToMatch` is an object with exactly one key:
//!
//! ```json
//! { "SingleHeader": { "Name": "user-agent" } }
//! { "UriPath": {} }
//! ```

use serde::{Deserialize, Serialize};

/// The part of a web request to inspect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all_fields = "PascalCase")]
pub enum FieldToMatch {
    /// One named header.
    SingleHeader {
        /// Header name, case-insensitive.
        name: String,
    },
    /// One named query argument.
    SingleQueryArgument {
        /// Argument name, case-insensitive.
        name: String,
    },
    /// Values of all query arguments.
    AllQueryArguments {},
    /// The URI path.
    UriPath {},
    /// The raw query string.
    QueryString {},
    /// The request body, as plain text.
    Body {
        /// What to do with bodies larger than WAF inspects.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        oversize_handling: Option<OversizeHandling>,
    },
    /// The HTTP method.
    Method {},
    /// The request body parsed as JSON.
    JsonBody(JsonBody),
    /// Request headers selected by pattern.
    Headers(Headers),
    /// Request cookies selected by pattern.
    Cookies(Cookies),
}

impl FieldToMatch {
    /// Inspects a single header.
    pub fn single_header(name: impl Into<String>) -> Self {
        FieldToMatch::SingleHeader { name: name.into() }
    }

    /// Inspects a single query argument.
    pub fn single_query_argument(name: impl Into<String>) -> Self {
        FieldToMatch::SingleQueryArgument { name: name.into() }
    }

    /// Inspects the URI path.
    pub fn uri_path() -> Self {
        FieldToMatch::UriPath {}
    }

    /// Inspects the query string.
    pub fn query_string() -> Self {
        FieldToMatch::QueryString {}
    }

    /// Inspects the HTTP method.
    pub fn method() -> Self {
        FieldToMatch::Method {}
    }

    /// Inspects the body with default oversize handling.
    pub fn body() -> Self {
        FieldToMatch::Body {
            oversize_handling: None,
        }
    }

    /// Wire key of this component (`"SingleHeader"`, `"UriPath"`, ...).
    pub fn kind(&self) -> &'static str {
        match self {
            FieldToMatch::SingleHeader { .. } => "SingleHeader",
            FieldToMatch::SingleQueryArgument { .. } => "SingleQueryArgument",
            FieldToMatch::AllQueryArguments {} => "AllQueryArguments",
            FieldToMatch::UriPath {} => "UriPath",
            FieldToMatch::QueryString {} => "QueryString",
            FieldToMatch::Body { .. } => "Body",
            FieldToMatch::Method {} => "Method",
            FieldToMatch::JsonBody(_) => "JsonBody",
            FieldToMatch::Headers(_) => "Headers",
            FieldToMatch::Cookies(_) => "Cookies",
        }
    }
}

/// Handling of request components larger than WAF's inspection limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OversizeHandling {
    /// Inspect the first part and continue.
    Continue,
    /// Treat the request as matching.
    Match,
    /// Treat the request as not matching.
    NoMatch,
}

/// Which part of matched key/value pairs to inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchScope {
    /// Keys and values.
    All,
    /// Keys only.
    Key,
    /// Values only.
    Value,
}

/// Fallback when a JSON body fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JsonFallbackBehavior {
    /// Treat as matching.
    Match,
    /// Treat as not matching.
    NoMatch,
    /// Inspect the body as a plain string.
    EvaluateAsString,
}

/// JSON body inspection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JsonBody {
    /// Which JSON elements to inspect.
    pub match_pattern: JsonMatchPattern,
    /// Keys, values or both.
    pub match_scope: MatchScope,
    /// Behavior when the body is not valid JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_fallback_behavior: Option<JsonFallbackBehavior>,
    /// Oversize handling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oversize_handling: Option<OversizeHandling>,
}

/// Selection of JSON elements by JSON Pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JsonMatchPattern {
    /// Every element.
    All {},
    /// Only the listed JSON Pointer paths.
    IncludedPaths(Vec<String>),
}

/// Header inspection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Headers {
    /// Which headers to inspect.
    pub match_pattern: HeaderMatchPattern,
    /// Keys, values or both.
    pub match_scope: MatchScope,
    /// Oversize handling.
    pub oversize_handling: OversizeHandling,
}

/// Selection of headers by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderMatchPattern {
    /// Every header.
    All {},
    /// Only the named headers.
    IncludedHeaders(Vec<String>),
    /// Every header except the named ones.
    ExcludedHeaders(Vec<String>),
}

/// Cookie inspection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Cookies {
    /// Which cookies to inspect.
    pub match_pattern: CookieMatchPattern,
    /// Keys, values or both.
    pub match_scope: MatchScope,
    /// Oversize handling.
    pub oversize_handling: OversizeHandling,
}

/// Selection of cookies by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CookieMatchPattern {
    /// Every cookie.
    All {},
    /// Only the named cookies.
    IncludedCookies(Vec<String>),
    /// Every cookie except the named ones.
    ExcludedCookies(Vec<String>),
}

/// A normalization step applied before matching.
///
/// `priority` values must be distinct within one statement; WAF applies
/// the steps lowest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TextTransformation {
    /// Application order, ascending.
    pub priority: u32,
    /// Transformation to apply.
    #[serde(rename = "Type")]
    pub kind: TextTransformationType,
}

impl TextTransformation {
    /// Creates a transformation step.
    pub fn new(priority: u32, kind: TextTransformationType) -> Self {
        Self { priority, kind }
    }

    /// The single `NONE` step, for statements that inspect content as-is.
    pub fn none() -> Vec<TextTransformation> {
        vec![Self::new(0, TextTransformationType::None)]
    }
}

/// Text transformations supported by WAFv2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextTransformationType {
    None,
    CompressWhiteSpace,
    HtmlEntityDecode,
    Lowercase,
    CmdLine,
    UrlDecode,
    Base64Decode,
    HexDecode,
    Md5,
    ReplaceComments,
    EscapeSeqDecode,
    SqlHexDecode,
    CssDecode,
    JsDecode,
    NormalizePath,
    NormalizePathWin,
    RemoveNulls,
    ReplaceNulls,
    Base64DecodeExt,
    UrlDecodeUni,
    Utf8ToUnicode,
}
