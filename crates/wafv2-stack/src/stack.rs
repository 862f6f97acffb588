//! The stack facade.
//!
//! A [`Stack`] owns a template under construction together with the
//! settings it will be checked and rendered with.

use tracing::{debug, info, warn};

use wafv2_model::{CfnString, WafResource, WebAcl, WebAclAssociation};
use wafv2_template::{Fingerprint, Output, ResourceEntry, Template, TemplateError};

use crate::config::{StackConfig, StackManifest};
use crate::error::{Result, StackError};
use crate::validate::{ValidationReport, Validator};

/// A checked template ready to be written out.
#[derive(Debug, Clone)]
pub struct Synthesized {
    pub template: Template,
    pub fingerprint: Fingerprint,
    /// Findings that did not block synthesis.
    pub report: ValidationReport,
}

/// A WAFv2 stack under construction.
///
/// # Example
///
/// ```rust
/// use wafv2_model::{DefaultAction, Scope, VisibilityConfig, WebAcl};
/// use wafv2_stack::{Stack, StackConfig};
///
/// let mut stack = Stack::new(StackConfig::default().with_region("eu-west-1"));
/// let acl = WebAcl::builder()
///     .with_default_action(DefaultAction::allow())
///     .with_scope(Scope::Regional)
///     .with_visibility_config(VisibilityConfig::enabled("api"))
///     .build()
///     .unwrap();
/// stack.add("Acl", acl).unwrap();
/// stack
///     .associate("Link", "arn:aws:apigateway:eu-west-1::/restapis/a1/stages/prod", "Acl")
///     .unwrap();
///
/// let synthesized = stack.synth().unwrap();
/// assert_eq!(synthesized.template.len(), 2);
/// ```
pub struct Stack {
    config: StackConfig,
    template: Template,
    validator: Validator,
}

impl Stack {
    pub fn new(config: StackConfig) -> Self {
        let mut template = Template::new();
        template.description = config.stack.description.clone();
        let validator = Validator::with_config(config.validation.clone());
        Self {
            config,
            template,
            validator,
        }
    }

    /// Builds a stack from a parsed manifest, checking every logical id.
    pub fn from_manifest(manifest: StackManifest) -> Result<Self> {
        let mut stack = Self::new(manifest.config);
        for (logical_id, entry) in manifest.resources {
            stack.add_entry(logical_id, entry)?;
        }
        for (name, output) in manifest.outputs {
            stack.add_output(name, output)?;
        }
        Ok(stack)
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn into_template(self) -> Template {
        self.template
    }

    pub fn add(
        &mut self,
        logical_id: impl Into<String>,
        resource: impl Into<WafResource>,
    ) -> Result<()> {
        Ok(self.template.add_resource(logical_id, resource)?)
    }

    pub fn add_entry(&mut self, logical_id: impl Into<String>, entry: ResourceEntry) -> Result<()> {
        Ok(self.template.add_entry(logical_id, entry)?)
    }

    pub fn add_output(&mut self, name: impl Into<String>, output: Output) -> Result<()> {
        Ok(self.template.add_output(name, output)?)
    }

    /// Associates the web ACL declared as `web_acl_id` with `resource_arn`.
    ///
    /// The association points at the ACL's `Arn` attribute and depends on
    /// it, so CloudFormation creates the ACL first.
    pub fn associate(
        &mut self,
        logical_id: impl Into<String>,
        resource_arn: impl Into<CfnString>,
        web_acl_id: &str,
    ) -> Result<()> {
        match self.template.resource(web_acl_id) {
            Some(WafResource::WebAcl(_)) => {}
            Some(other) => {
                return Err(StackError::NotAWebAcl {
                    logical_id: web_acl_id.to_string(),
                    type_name: other.type_name(),
                })
            }
            None => return Err(TemplateError::UnknownLogicalId(web_acl_id.to_string()).into()),
        }
        let web_acl_arn = self.template.get_att(web_acl_id, "Arn")?;
        let association = WebAclAssociation::builder()
            .with_resource_arn(resource_arn)
            .with_web_acl_arn(web_acl_arn)
            .build()?;
        let logical_id = logical_id.into();
        debug!(logical_id = %logical_id, web_acl = %web_acl_id, "association added");
        self.add_entry(
            logical_id,
            ResourceEntry::new(association).with_depends_on(web_acl_id),
        )
    }

    /// Web ACLs declared in the stack, by logical id.
    pub fn web_acls(&self) -> impl Iterator<Item = (&str, &WebAcl)> {
        self.template.resources().filter_map(|(id, resource)| match resource {
            WafResource::WebAcl(acl) => Some((id, acl)),
            _ => None,
        })
    }

    /// Runs the semantic checks for the configured region.
    pub fn validate(&self) -> ValidationReport {
        self.validator
            .validate(&self.template, &self.config.stack.region)
    }

    /// Checks references and semantics, then fingerprints the template.
    pub fn synth(&self) -> Result<Synthesized> {
        self.template.check_references()?;

        let report = self.validate();
        if !report.is_ok(self.config.validation.deny_warnings) {
            warn!(
                stack = %self.config.stack.name,
                errors = report.error_count(),
                warnings = report.warning_count(),
                "synthesis blocked"
            );
            return Err(StackError::Validation(report));
        }

        let fingerprint = self.template.fingerprint()?;
        info!(
            stack = %self.config.stack.name,
            resources = self.template.len(),
            fingerprint = %fingerprint.short(),
            "stack synthesized"
        );
        Ok(Synthesized {
            template: self.template.clone(),
            fingerprint,
            report,
        })
    }

    /// Renders a synthesized template as JSON text.
    pub fn render(&self, synthesized: &Synthesized) -> Result<String> {
        let text = if self.config.output.pretty {
            synthesized.template.to_json_pretty()?
        } else {
            synthesized.template.to_json_string()?
        };
        Ok(text)
    }
}
