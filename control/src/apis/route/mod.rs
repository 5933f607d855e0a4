//! Route visibility
//!
//! A Route exposes one or more traffic targets. Each target is assigned a
//! visibility from three sources:
//! - Domain config: the Route's labels select the domain it is published under
//! - Route labels: the cluster-local visibility label forces the local domain
//! - Placeholder Services: one per target, may carry the cluster-local label
//!
//! The most restrictive source always wins.

pub mod domains;
pub mod ingress;
pub mod labels;
pub mod placeholder;
pub mod visibility;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

static NO_LABELS: BTreeMap<String, String> = BTreeMap::new();

/// Routing resource: the fields visibility resolution reads from a Route
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Route {
    pub metadata: ObjectMeta,

    #[serde(default)]
    pub spec: RouteSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSpec {
    #[serde(default)]
    pub traffic: Vec<TrafficTarget>,
}

/// One traffic split entry of a Route
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficTarget {
    /// Tag giving the target its own hostname; None for the default target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<i64>,
}

impl Route {
    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    pub fn namespace(&self) -> &str {
        self.metadata.namespace.as_deref().unwrap_or("default")
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        self.metadata.labels.as_ref().unwrap_or(&NO_LABELS)
    }

    /// Names of the traffic targets that need a visibility
    ///
    /// The default target is named "" and always comes first; tagged
    /// targets follow in traffic order, each name once.
    pub fn traffic_names(&self) -> Vec<String> {
        let mut names = vec![String::new()];
        for tag in self.spec.traffic.iter().filter_map(|t| t.tag.as_deref()) {
            if !names.iter().any(|n| n == tag) {
                names.push(tag.to_string());
            }
        }
        names
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace(), self.name())
    }
}
