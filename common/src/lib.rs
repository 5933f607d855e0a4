#![no_std]

//! RAUTA Common Types
//!
//! Networking types shared between the controller and the data plane:
//! ingress visibility levels and the ingress rules generated for a route.
//! All types are no_std compatible (they only need `alloc`).

extern crate alloc;
use alloc::string::String;
use alloc::vec::Vec;

/// Label value marking an object as reachable only from inside the cluster
pub const VISIBILITY_CLUSTER_LOCAL: &str = "cluster-local";

/// Network exposure level of an ingress or of a single ingress rule
///
/// Variant order is the merge order: `ClusterLocal` is the most restrictive
/// value and therefore the minimum. `Unspecified` is the zero value and is
/// treated as public.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Visibility {
    /// Only reachable from inside the cluster
    ClusterLocal,
    /// Reachable through the external load balancer
    ExternalIP,
    /// Not set (ingresses created before visibility existed)
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = ""))]
    Unspecified,
}

impl Visibility {
    /// Public means anything that is not cluster-local.
    ///
    /// `Unspecified` counts as public for backward compatibility.
    pub const fn is_public(&self) -> bool {
        !matches!(self, Visibility::ClusterLocal)
    }

    pub const fn is_cluster_local(&self) -> bool {
        matches!(self, Visibility::ClusterLocal)
    }

    /// Wire name of the visibility ("" when unspecified)
    pub const fn as_str(&self) -> &'static str {
        match self {
            Visibility::ClusterLocal => "ClusterLocal",
            Visibility::ExternalIP => "ExternalIP",
            Visibility::Unspecified => "",
        }
    }
}

impl core::fmt::Display for Visibility {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the more restrictive of two visibilities
///
/// The result is always one of the two resolved values: `ClusterLocal` if
/// either side is cluster-local, `ExternalIP` otherwise. `Unspecified` never
/// comes out of a merge.
pub fn min_visibility(a: Visibility, b: Visibility) -> Visibility {
    match core::cmp::min(a, b) {
        Visibility::ClusterLocal => Visibility::ClusterLocal,
        Visibility::ExternalIP | Visibility::Unspecified => Visibility::ExternalIP,
    }
}

/// A generated routing directive: the hosts it answers for and how widely
/// they are exposed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct IngressRule {
    /// Hostnames matched by this rule, in priority order
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub hosts: Vec<String>,

    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "is_unspecified")
    )]
    pub visibility: Visibility,
}

#[cfg(feature = "serde")]
fn is_unspecified(visibility: &Visibility) -> bool {
    *visibility == Visibility::Unspecified
}

impl IngressRule {
    pub fn new(hosts: Vec<String>, visibility: Visibility) -> Self {
        Self { hosts, visibility }
    }
}

/// Rules whose visibility is exactly `ClusterLocal`, in input order
///
/// No match is a normal outcome and yields an empty vector.
pub fn cluster_local_rules(rules: &[IngressRule]) -> Vec<IngressRule> {
    rules
        .iter()
        .filter(|rule| rule.visibility.is_cluster_local())
        .cloned()
        .collect()
}

/// Rules that are `ExternalIP` or `Unspecified`, in input order
pub fn public_rules(rules: &[IngressRule]) -> Vec<IngressRule> {
    rules
        .iter()
        .filter(|rule| rule.visibility.is_public())
        .cloned()
        .collect()
}

/// Ingress specification: the rules of an ingress plus its own visibility
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct IngressSpec {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub rules: Vec<IngressRule>,

    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "is_unspecified")
    )]
    pub visibility: Visibility,
}

impl IngressSpec {
    /// An ingress without an explicit visibility is public
    pub const fn is_public(&self) -> bool {
        self.visibility.is_public()
    }

    pub fn cluster_local_rules(&self) -> Vec<IngressRule> {
        cluster_local_rules(&self.rules)
    }

    pub fn public_rules(&self) -> Vec<IngressRule> {
        public_rules(&self.rules)
    }
}
