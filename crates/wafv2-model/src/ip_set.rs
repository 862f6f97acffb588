//! `AWS::WAFv2::IPSet`: a named list of CIDR ranges.

use serde::{Deserialize, Serialize};

use crate::common::{IpAddressVersion, Scope, Tag};
use crate::error::{required, Result};
use crate::resource::CfnResource;

/// A set of IP address ranges referenced by `IPSetReferenceStatement`.
///
/// `Name` and `Scope` cannot change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IpSet {
    /// CIDR ranges, e.g. `192.0.2.0/24`. Uses `/32` (or `/128`) for one host.
    pub addresses: Vec<String>,
    #[serde(rename = "IPAddressVersion")]
    pub ip_address_version: IpAddressVersion,
    pub scope: Scope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl IpSet {
    /// Starts a builder.
    pub fn builder() -> IpSetBuilder {
        IpSetBuilder::default()
    }
}

impl CfnResource for IpSet {
    const TYPE_NAME: &'static str = "AWS::WAFv2::IPSet";
    const ATTRIBUTES: &'static [&'static str] = &["Arn", "Id"];
    const REPLACEMENT_PROPERTIES: &'static [&'static str] = &["Name", "Scope"];
}

/// Builder for [`IpSet`]; `Addresses`, `IPAddressVersion` and `Scope` are
/// required.
#[derive(Debug, Clone, Default)]
pub struct IpSetBuilder {
    addresses: Option<Vec<String>>,
    ip_address_version: Option<IpAddressVersion>,
    scope: Option<Scope>,
    description: Option<String>,
    name: Option<String>,
    tags: Vec<Tag>,
}

impl IpSetBuilder {
    /// Sets `Addresses`, CIDR blocks such as `192.0.2.0/24` or `2001:db8::/32`.
    /// An empty list is accepted here and reported by validation.
    pub fn with_addresses<I, S>(mut self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.addresses = Some(addresses.into_iter().map(Into::into).collect());
        self
    }

    /// Sets `IPAddressVersion`; every address must belong to it.
    pub fn with_ip_address_version(mut self, version: IpAddressVersion) -> Self {
        self.ip_address_version = Some(version);
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

    /// Sets the physical `Name`. Changing it replaces the set.
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
    pub fn build(self) -> Result<IpSet> {
        Ok(IpSet {
            addresses: required(self.addresses, IpSet::TYPE_NAME, "Addresses")?,
            ip_address_version: required(
                self.ip_address_version,
                IpSet::TYPE_NAME,
                "IPAddressVersion",
            )?,
            scope: required(self.scope, IpSet::TYPE_NAME, "Scope")?,
            description: self.description,
            name: self.name,
            tags: self.tags,
        })
    }
}
