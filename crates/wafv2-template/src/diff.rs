//! # Template Change Detection
//!
//! Compares two versions of a template and classifies what CloudFormation
//! would do to each logical id when the second version is deployed over the
//! first.
//!
//! ## Change Classes
//!
//! | Action | Trigger | Impact |
//! |--------|---------|--------|
//! | Add | logical id only in the new template | Update |
//! | Modify | properties or `DependsOn` differ | Update |
//! | Replace | resource type changed, or a replacement property changed | Replacement |
//! | Remove | logical id only in the old template | Removal |
//!
//! Replacement properties come from each type's
//! [`CfnResource::REPLACEMENT_PROPERTIES`](wafv2_model::CfnResource::REPLACEMENT_PROPERTIES);
//! for example a rule group's `Capacity` or any resource's `Name` and `Scope`.
//!
//! Identical fingerprints short-circuit the comparison.

use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, info};

use wafv2_model::Rule;

use crate::canonicalize::Fingerprint;
use crate::error::Result;
use crate::template::{ResourceEntry, Template};

/// What deploying a change does to the live resource, least to most
/// disruptive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChangeImpact {
    None,
    /// Created or updated in place.
    Update,
    /// Deleted and recreated with a new physical id.
    Replacement,
    /// Deleted.
    Removal,
}

impl fmt::Display for ChangeImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeImpact::None => "none",
            ChangeImpact::Update => "update",
            ChangeImpact::Replacement => "replacement",
            ChangeImpact::Removal => "removal",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeAction {
    Add,
    Remove,
    Modify,
    Replace,
}

impl ChangeAction {
    pub fn impact(&self) -> ChangeImpact {
        match self {
            ChangeAction::Add | ChangeAction::Modify => ChangeImpact::Update,
            ChangeAction::Replace => ChangeImpact::Replacement,
            ChangeAction::Remove => ChangeImpact::Removal,
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeAction::Add => "Add",
            ChangeAction::Remove => "Remove",
            ChangeAction::Modify => "Modify",
            ChangeAction::Replace => "Replace",
        };
        f.write_str(s)
    }
}

/// The change to one logical id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceChange {
    pub logical_id: String,
    /// Type in the new template, or the old one for removals.
    pub type_name: &'static str,
    pub action: ChangeAction,
    /// Top-level property names whose values differ, sorted.
    pub properties: Vec<String>,
    /// Human-readable notes: replacement causes and rule-level changes.
    pub details: Vec<String>,
}

impl ResourceChange {
    fn new(logical_id: &str, type_name: &'static str, action: ChangeAction) -> Self {
        Self {
            logical_id: logical_id.to_string(),
            type_name,
            action,
            properties: Vec::new(),
            details: Vec::new(),
        }
    }

    pub fn impact(&self) -> ChangeImpact {
        self.action.impact()
    }
}

/// Every change between two templates, in logical id order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    pub old_fingerprint: Fingerprint,
    pub new_fingerprint: Fingerprint,
    pub changes: Vec<ResourceChange>,
    /// Output names added, removed or modified, sorted.
    pub outputs: Vec<String>,
    /// Top-level template keys that differ, e.g. `Description`.
    pub template: Vec<String>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.outputs.is_empty() && self.template.is_empty()
    }

    /// Highest impact across all resource changes.
    pub fn impact(&self) -> ChangeImpact {
        self.changes
            .iter()
            .map(ResourceChange::impact)
            .max()
            .unwrap_or(ChangeImpact::None)
    }

    pub fn replacements(&self) -> impl Iterator<Item = &ResourceChange> {
        self.changes
            .iter()
            .filter(|c| c.action == ChangeAction::Replace)
    }

    pub fn get(&self, logical_id: &str) -> Option<&ResourceChange> {
        self.changes.iter().find(|c| c.logical_id == logical_id)
    }

    /// One line per change, indented detail lines under each.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for change in &self.changes {
            out.push_str(&format!(
                "{:<8} {} ({})",
                change.action.to_string(),
                change.logical_id,
                change.type_name
            ));
            if !change.properties.is_empty() {
                out.push_str(&format!(" [{}]", change.properties.join(", ")));
            }
            out.push('\n');
            for detail in &change.details {
                out.push_str(&format!("         - {}\n", detail));
            }
        }
        for name in &self.outputs {
            out.push_str(&format!("Output   {}\n", name));
        }
        for key in &self.template {
            out.push_str(&format!("Template {} changed\n", key));
        }
        out
    }
}

/// Compares `old` with `new`.
///
/// # Example
///
/// ```rust
/// use wafv2_model::{IpAddressVersion, IpSet, Scope};
/// use wafv2_template::{diff, ChangeAction, ChangeImpact, Template};
///
/// let set = |scope| {
///     IpSet::builder()
///         .with_addresses(["192.0.2.0/24"])
///         .with_ip_address_version(IpAddressVersion::Ipv4)
///         .with_scope(scope)
///         .build()
/// };
///
/// let mut old = Template::new();
/// old.add_resource("Office", set(Scope::Regional)?)?;
/// let mut new = Template::new();
/// new.add_resource("Office", set(Scope::Cloudfront)?)?;
///
/// let changes = diff(&old, &new)?;
/// assert_eq!(changes.changes[0].action, ChangeAction::Replace);
/// assert_eq!(changes.impact(), ChangeImpact::Replacement);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn diff(old: &Template, new: &Template) -> Result<ChangeSet> {
    let old_fingerprint = old.fingerprint()?;
    let new_fingerprint = new.fingerprint()?;

    let mut set = ChangeSet {
        old_fingerprint,
        new_fingerprint,
        changes: Vec::new(),
        outputs: Vec::new(),
        template: Vec::new(),
    };

    if old_fingerprint == new_fingerprint {
        debug!(fingerprint = %new_fingerprint.short(), "templates identical");
        return Ok(set);
    }

    let ids: BTreeSet<&String> = old.resources.keys().chain(new.resources.keys()).collect();
    for id in ids {
        let change = match (old.resources.get(id), new.resources.get(id)) {
            (None, Some(entry)) => Some(ResourceChange::new(
                id,
                entry.resource.type_name(),
                ChangeAction::Add,
            )),
            (Some(entry), None) => Some(ResourceChange::new(
                id,
                entry.resource.type_name(),
                ChangeAction::Remove,
            )),
            (Some(before), Some(after)) => compare_entries(id, before, after)?,
            (None, None) => None,
        };
        set.changes.extend(change);
    }

    let names: BTreeSet<&String> = old.outputs.keys().chain(new.outputs.keys()).collect();
    set.outputs = names
        .into_iter()
        .filter(|name| old.outputs.get(*name) != new.outputs.get(*name))
        .cloned()
        .collect();

    if old.format_version != new.format_version {
        set.template.push("AWSTemplateFormatVersion".to_string());
    }
    if old.description != new.description {
        set.template.push("Description".to_string());
    }

    info!(
        changes = set.changes.len(),
        impact = %set.impact(),
        old = %old_fingerprint.short(),
        new = %new_fingerprint.short(),
        "template diff computed"
    );
    Ok(set)
}

fn compare_entries(
    id: &str,
    before: &ResourceEntry,
    after: &ResourceEntry,
) -> Result<Option<ResourceChange>> {
    let type_name = after.resource.type_name();

    if before.resource.type_name() != type_name {
        let mut change = ResourceChange::new(id, type_name, ChangeAction::Replace);
        change.details.push(format!(
            "Type changed: {} -> {}",
            before.resource.type_name(),
            type_name
        ));
        return Ok(Some(change));
    }

    let old_props = before.resource.render_properties()?;
    let new_props = after.resource.render_properties()?;
    let properties = changed_keys(&old_props, &new_props);
    let depends_on_changed = before.depends_on != after.depends_on;

    if properties.is_empty() && !depends_on_changed {
        return Ok(None);
    }

    let replaced: Vec<&String> = properties
        .iter()
        .filter(|p| after.resource.replacement_properties().contains(&p.as_str()))
        .collect();

    let action = if replaced.is_empty() {
        ChangeAction::Modify
    } else {
        ChangeAction::Replace
    };
    let mut change = ResourceChange::new(id, type_name, action);
    for property in &replaced {
        change
            .details
            .push(format!("{} change requires replacement", property));
    }
    if properties.iter().any(|p| p == "Rules") {
        change
            .details
            .extend(rule_changes(before.resource.rules(), after.resource.rules()));
    }
    if depends_on_changed {
        change.details.push("DependsOn changed".to_string());
    }
    change.properties = properties;

    debug!(logical_id = %id, action = %change.action, "resource changed");
    Ok(Some(change))
}

/// Keys present in either object whose values differ.
fn changed_keys(old: &Value, new: &Value) -> Vec<String> {
    let empty = serde_json::Map::new();
    let old = old.as_object().unwrap_or(&empty);
    let new = new.as_object().unwrap_or(&empty);

    let keys: BTreeSet<&String> = old.keys().chain(new.keys()).collect();
    keys.into_iter()
        .filter(|k| old.get(*k) != new.get(*k))
        .cloned()
        .collect()
}

/// Rule-level notes for a `Rules` change, matched by rule name.
fn rule_changes(old: &[Rule], new: &[Rule]) -> Vec<String> {
    let mut notes = Vec::new();

    for rule in old {
        if !new.iter().any(|r| r.name == rule.name) {
            notes.push(format!("Rule '{}' removed", rule.name));
        }
    }

    for rule in new {
        match old.iter().find(|r| r.name == rule.name) {
            None => notes.push(format!("Rule '{}' added", rule.name)),
            Some(previous) => {
                if previous.priority != rule.priority {
                    notes.push(format!(
                        "Rule '{}' priority {} -> {}",
                        rule.name, previous.priority, rule.priority
                    ));
                }
                if previous.statement != rule.statement {
                    notes.push(format!("Rule '{}' statement changed", rule.name));
                }
                if previous.behavior != rule.behavior {
                    notes.push(format!("Rule '{}' action changed", rule.name));
                }
                if previous.visibility_config != rule.visibility_config
                    || previous.rule_labels != rule.rule_labels
                    || previous.captcha_config != rule.captcha_config
                {
                    notes.push(format!("Rule '{}' settings changed", rule.name));
                }
            }
        }
    }

    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use wafv2_model::{
        DefaultAction, NestableStatement, RuleAction, RuleGroup, Scope, VisibilityConfig,
        WafResource, WebAcl,
    };

    fn acl(rules: Vec<Rule>) -> WebAcl {
        WebAcl::builder()
            .with_default_action(DefaultAction::allow())
            .with_scope(Scope::Regional)
            .with_visibility_config(VisibilityConfig::enabled("api"))
            .with_rules(rules)
            .build()
            .unwrap()
    }

    fn geo_rule(name: &str, priority: u32, country: &str) -> Rule {
        Rule::with_action(
            name,
            priority,
            NestableStatement::geo_match([country]),
            RuleAction::block(),
            VisibilityConfig::enabled(name),
        )
    }

    fn template_with(id: &str, resource: impl Into<WafResource>) -> Template {
        let mut template = Template::new();
        template.add_resource(id, resource).unwrap();
        template
    }

    #[test]
    fn test_identical_templates_have_no_changes() {
        let a = template_with("Acl", acl(vec![geo_rule("geo", 0, "KP")]));
        let set = diff(&a, &a.clone()).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.impact(), ChangeImpact::None);
        assert_eq!(set.old_fingerprint, set.new_fingerprint);
    }

    #[test]
    fn test_rule_edit_is_in_place_update() {
        let old = template_with(
            "Acl",
            acl(vec![geo_rule("geo", 0, "KP"), geo_rule("old", 1, "IR")]),
        );
        let new = template_with(
            "Acl",
            acl(vec![geo_rule("geo", 5, "CU"), geo_rule("fresh", 1, "SY")]),
        );

        let set = diff(&old, &new).unwrap();
        let change = set.get("Acl").unwrap();
        assert_eq!(change.action, ChangeAction::Modify);
        assert_eq!(change.properties, vec!["Rules".to_string()]);
        assert!(change.details.contains(&"Rule 'old' removed".to_string()));
        assert!(change.details.contains(&"Rule 'fresh' added".to_string()));
        assert!(change.details.contains(&"Rule 'geo' priority 0 -> 5".to_string()));
        assert!(change.details.contains(&"Rule 'geo' statement changed".to_string()));
        assert_eq!(set.impact(), ChangeImpact::Update);
    }

    #[test]
    fn test_capacity_change_replaces_rule_group() {
        let group = |capacity| {
            RuleGroup::builder()
                .with_capacity(capacity)
                .with_scope(Scope::Regional)
                .with_visibility_config(VisibilityConfig::enabled("g"))
                .build()
                .unwrap()
        };
        let set = diff(
            &template_with("Group", group(100)),
            &template_with("Group", group(200)),
        )
        .unwrap();
        let change = set.get("Group").unwrap();
        assert_eq!(change.action, ChangeAction::Replace);
        assert_eq!(
            change.details,
            vec!["Capacity change requires replacement".to_string()]
        );
        assert_eq!(set.replacements().count(), 1);
    }

    #[test]
    fn test_add_and_remove() {
        let old = template_with("First", acl(Vec::new()));
        let new = template_with("Second", acl(Vec::new()));

        let set = diff(&old, &new).unwrap();
        assert_eq!(set.changes.len(), 2);
        assert_eq!(set.get("First").unwrap().action, ChangeAction::Remove);
        assert_eq!(set.get("Second").unwrap().action, ChangeAction::Add);
        assert_eq!(set.impact(), ChangeImpact::Removal);
    }

    #[test]
    fn test_impact_ordering() {
        assert!(ChangeImpact::None < ChangeImpact::Update);
        assert!(ChangeImpact::Update < ChangeImpact::Replacement);
        assert!(ChangeImpact::Replacement < ChangeImpact::Removal);
    }

    #[test]
    fn test_summary_lines() {
        let old = template_with("Acl", acl(Vec::new()));
        let new = template_with("Acl", acl(vec![geo_rule("geo", 0, "KP")]));
        let summary = diff(&old, &new).unwrap().summary();
        assert!(summary.starts_with("Modify   Acl (AWS::WAFv2::WebACL) [Rules]\n"));
        assert!(summary.contains("- Rule 'geo' added"));
    }
}
