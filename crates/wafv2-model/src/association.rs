//! `AWS::WAFv2::WebACLAssociation`: binds a regional web ACL to a resource.
//!
//! CloudFront distributions are not associated this way; they name the web
//! ACL in their own distribution config.

use serde::{Deserialize, Serialize};

use crate::common::CfnString;
use crate::error::{required, Result};
use crate::resource::CfnResource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebAclAssociation {
    /// ARN of the ALB, API Gateway stage, AppSync API or Cognito user pool.
    #[serde(rename = "ResourceArn")]
    pub resource_arn: CfnString,
    /// ARN of the web ACL.
    #[serde(rename = "WebACLArn")]
    pub web_acl_arn: CfnString,
}

impl WebAclAssociation {
    pub fn builder() -> WebAclAssociationBuilder {
        WebAclAssociationBuilder::default()
    }
}

impl CfnResource for WebAclAssociation {
    const TYPE_NAME: &'static str = "AWS::WAFv2::WebACLAssociation";
    const ATTRIBUTES: &'static [&'static str] = &[];
    const REPLACEMENT_PROPERTIES: &'static [&'static str] = &["ResourceArn", "WebACLArn"];
}

#[derive(Debug, Clone, Default)]
pub struct WebAclAssociationBuilder {
    resource_arn: Option<CfnString>,
    web_acl_arn: Option<CfnString>,
}

impl WebAclAssociationBuilder {
    /// Sets `ResourceArn`: the ALB, API Gateway stage, AppSync API,
    /// Cognito user pool or similar resource to protect.
    pub fn with_resource_arn(mut self, arn: impl Into<CfnString>) -> Self {
        self.resource_arn = Some(arn.into());
        self
    }

    /// Sets `WebACLArn`, usually `Fn::GetAtt` of a web ACL in the same template.
    pub fn with_web_acl_arn(mut self, arn: impl Into<CfnString>) -> Self {
        self.web_acl_arn = Some(arn.into());
        self
    }

    /// Builds the association.
    ///
    /// # Errors
    /// [`ModelError::MissingProperty`](crate::ModelError::MissingProperty) for
    /// `ResourceArn` or `WebACLArn`.
    pub fn build(self) -> Result<WebAclAssociation> {
        Ok(WebAclAssociation {
            resource_arn: required(
                self.resource_arn,
                WebAclAssociation::TYPE_NAME,
                "ResourceArn",
            )?,
            web_acl_arn: required(self.web_acl_arn, WebAclAssociation::TYPE_NAME, "WebACLArn")?,
        })
    }
}
