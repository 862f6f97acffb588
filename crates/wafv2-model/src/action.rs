//! Rule actions, override actions and web ACL default actions.
//!
//! Each action type is a single-key object on the wire, e.g.
//! `{"Block": {"CustomResponse": {"ResponseCode": 403}}}` or `{"Count": {}}`.

use serde::{Deserialize, Serialize};

/// A header WAF inserts into a request or response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomHttpHeader {
    /// Header name. WAF prefixes inserted request headers with `x-amzn-waf-`.
    pub name: String,
    /// Header value.
    pub value: String,
}

impl CustomHttpHeader {
    /// Creates a header.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Headers to insert into requests that WAF lets through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomRequestHandling {
    /// Headers to insert.
    pub insert_headers: Vec<CustomHttpHeader>,
}

/// Action body shared by Allow, Count, Captcha and Challenge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestAction {
    /// Optional header insertion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_request_handling: Option<CustomRequestHandling>,
}

impl RequestAction {
    /// Inserts `headers` into matching requests.
    pub fn with_headers(headers: Vec<CustomHttpHeader>) -> Self {
        Self {
            custom_request_handling: Some(CustomRequestHandling {
                insert_headers: headers,
            }),
        }
    }
}

/// Custom response sent for blocked requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResponse {
    /// HTTP status code (200-599).
    pub response_code: u16,
    /// Key into the owning WebACL's or RuleGroup's `CustomResponseBodies`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_response_body_key: Option<String>,
    /// Extra response headers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub response_headers: Vec<CustomHttpHeader>,
}

/// Block action body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BlockAction {
    /// Optional custom response; WAF sends 403 without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_response: Option<CustomResponse>,
}

impl BlockAction {
    /// Blocks with `response_code` and an optional body key.
    pub fn with_response(response_code: u16, body_key: Option<&str>) -> Self {
        Self {
            custom_response: Some(CustomResponse {
                response_code,
                custom_response_body_key: body_key.map(str::to_string),
                response_headers: Vec::new(),
            }),
        }
    }

    /// Body key referenced by the custom response, if any.
    pub fn body_key(&self) -> Option<&str> {
        self.custom_response
            .as_ref()
            .and_then(|r| r.custom_response_body_key.as_deref())
    }
}

/// What a rule does with a request that matches its statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleAction {
    /// Let the request through.
    Allow(RequestAction),
    /// Block the request.
    Block(BlockAction),
    /// Count the request and keep evaluating.
    Count(RequestAction),
    /// Require a CAPTCHA solution.
    Captcha(RequestAction),
    /// Require a silent browser challenge.
    Challenge(RequestAction),
}

impl RuleAction {
    /// `{"Allow": {}}`
    pub fn allow() -> Self {
        RuleAction::Allow(RequestAction::default())
    }

    /// `{"Block": {}}`
    pub fn block() -> Self {
        RuleAction::Block(BlockAction::default())
    }

    /// `{"Count": {}}`
    pub fn count() -> Self {
        RuleAction::Count(RequestAction::default())
    }

    /// `{"Captcha": {}}`
    pub fn captcha() -> Self {
        RuleAction::Captcha(RequestAction::default())
    }

    /// `{"Challenge": {}}`
    pub fn challenge() -> Self {
        RuleAction::Challenge(RequestAction::default())
    }

    /// Custom response body key used by a block action.
    pub fn body_key(&self) -> Option<&str> {
        match self {
            RuleAction::Block(block) => block.body_key(),
            _ => None,
        }
    }
}

/// Override applied to the actions of a referenced rule group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverrideAction {
    /// Downgrade every rule action in the group to Count.
    Count {},
    /// Use the group's own rule actions.
    None {},
}

/// Action a web ACL takes when no rule terminates evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultAction {
    /// Allow unmatched requests.
    Allow(RequestAction),
    /// Block unmatched requests.
    Block(BlockAction),
}

impl DefaultAction {
    /// `{"Allow": {}}`
    pub fn allow() -> Self {
        DefaultAction::Allow(RequestAction::default())
    }

    /// `{"Block": {}}`
    pub fn block() -> Self {
        DefaultAction::Block(BlockAction::default())
    }

    /// Custom response body key used by a block default action.
    pub fn body_key(&self) -> Option<&str> {
        match self {
            DefaultAction::Block(block) => block.body_key(),
            DefaultAction::Allow(_) => None,
        }
    }
}
