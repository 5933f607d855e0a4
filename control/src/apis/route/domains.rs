//! Route domains
//!
//! Domain suffix lookup (which domain a Route is published under) and the
//! hostname templates used to name traffic targets.

use crate::apis::route::labels::is_local_visibility;
use crate::error::VisibilityError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Domain used when no selector in the domain config matches
pub const DEFAULT_DOMAIN: &str = "example.com";

/// Default template naming a tagged traffic target
pub const DEFAULT_TAG_TEMPLATE: &str = "{{.Name}}-{{.Tag}}";

/// Default template for the fully-qualified external host of a target
pub const DEFAULT_DOMAIN_TEMPLATE: &str = "{{.Name}}.{{.Namespace}}.{{.Domain}}";

lazy_static! {
    static ref TEMPLATE_FIELD: Regex =
        Regex::new(r"\{\{\s*\.([A-Za-z]\w*)\s*\}\}").expect("Failed to compile template regex");
}

/// Render a `{{.Field}}` template, resolving fields through `lookup`
///
/// Fails on fields `lookup` does not know and on stray braces.
fn render_template<'a>(
    template: &str,
    lookup: impl Fn(&str) -> Option<&'a str>,
) -> Result<String, VisibilityError> {
    let template_error = |reason: String| VisibilityError::Template {
        template: template.to_string(),
        reason,
    };

    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;
    for caps in TEMPLATE_FIELD.captures_iter(template) {
        let (Some(whole), Some(field)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let field = field.as_str();
        let literal = &template[last..whole.start()];
        if literal.contains("{{") || literal.contains("}}") {
            return Err(template_error(format!("malformed action in '{}'", literal)));
        }
        rendered.push_str(literal);

        let value =
            lookup(field).ok_or_else(|| template_error(format!("unknown field .{}", field)))?;
        rendered.push_str(value);
        last = whole.end();
    }

    let tail = &template[last..];
    if tail.contains("{{") || tail.contains("}}") {
        return Err(template_error(format!("malformed action in '{}'", tail)));
    }
    rendered.push_str(tail);

    Ok(rendered)
}

/// Validate a rendered hostname as a DNS-1123 subdomain
///
/// Rules:
/// - Lowercase alphanumeric characters, hyphens, and dots only
/// - Labels must not start or end with hyphen
/// - No empty labels
/// - Max length 253 characters
fn validate_hostname(hostname: &str) -> Result<(), String> {
    if hostname.is_empty() {
        return Err("Hostname cannot be empty".to_string());
    }

    if hostname.len() > 253 {
        return Err(format!("Hostname '{}' exceeds 253 characters", hostname));
    }

    for label in hostname.split('.') {
        if label.is_empty() {
            return Err(format!("Hostname '{}' has an empty label", hostname));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(format!(
                "Hostname label '{}' cannot start or end with '-'",
                label
            ));
        }

        if let Some(c) = label
            .chars()
            .find(|c| !c.is_ascii_lowercase() && !c.is_ascii_digit() && *c != '-')
        {
            return Err(format!(
                "Hostname '{}' contains invalid character '{}' (must be lowercase alphanumeric or hyphen)",
                hostname, c
            ));
        }
    }

    Ok(())
}

/// Hostname of a traffic target, rendered from the tag template
///
/// The default (untagged) target keeps the Route name.
pub fn hostname_from_template(
    tag_template: &str,
    route_name: &str,
    tag: &str,
) -> Result<String, VisibilityError> {
    if tag.is_empty() {
        return Ok(route_name.to_string());
    }

    let hostname = render_template(tag_template, |field| match field {
        "Name" => Some(route_name),
        "Tag" => Some(tag),
        _ => None,
    })?;

    validate_hostname(&hostname).map_err(|reason| VisibilityError::Template {
        template: tag_template.to_string(),
        reason,
    })?;

    Ok(hostname)
}

/// Fully-qualified host for a target hostname, rendered from the domain template
pub fn domain_from_template(
    domain_template: &str,
    name: &str,
    namespace: &str,
    domain: &str,
) -> Result<String, VisibilityError> {
    let host = render_template(domain_template, |field| match field {
        "Name" => Some(name),
        "Namespace" => Some(namespace),
        "Domain" => Some(domain),
        _ => None,
    })?;

    validate_hostname(&host).map_err(|reason| VisibilityError::Template {
        template: domain_template.to_string(),
        reason,
    })?;

    Ok(host)
}

/// Equality label selector for one domain entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LabelSelector {
    #[serde(default)]
    pub selector: BTreeMap<String, String>,
}

impl LabelSelector {
    /// Number of labels the selector constrains; more is more specific
    pub fn specificity(&self) -> usize {
        self.selector.len()
    }

    /// An empty selector matches every label set
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.selector
            .iter()
            .all(|(key, value)| labels.get(key) == Some(value))
    }
}

/// Domain configuration: which domain suffix each Route is published under
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DomainConfig {
    /// Domain suffix -> selector over Route labels
    #[serde(default = "default_domains")]
    pub domains: BTreeMap<String, LabelSelector>,

    /// Cluster DNS domain (e.g. "cluster.local")
    #[serde(default = "default_cluster_domain")]
    pub cluster_domain: String,
}

fn default_domains() -> BTreeMap<String, LabelSelector> {
    BTreeMap::from([(DEFAULT_DOMAIN.to_string(), LabelSelector::default())])
}

pub(crate) fn default_cluster_domain() -> String {
    "cluster.local".to_string()
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            domains: default_domains(),
            cluster_domain: default_cluster_domain(),
        }
    }
}

impl DomainConfig {
    /// Build from ConfigMap data: key is the domain, value is YAML
    /// (`selector:` map, possibly empty). Keys starting with `_` are ignored.
    pub fn from_config_map_data(
        data: &BTreeMap<String, String>,
        cluster_domain: impl Into<String>,
    ) -> Result<Self, VisibilityError> {
        let mut domains = BTreeMap::new();

        for (domain, value) in data {
            if domain.starts_with('_') {
                continue;
            }

            let selector = if value.trim().is_empty() {
                LabelSelector::default()
            } else {
                serde_yaml::from_str::<LabelSelector>(value).map_err(|e| {
                    VisibilityError::Config(format!(
                        "invalid selector for domain '{}': {}",
                        domain, e
                    ))
                })?
            };
            domains.insert(domain.clone(), selector);
        }

        if domains.is_empty() {
            domains = default_domains();
        }

        Ok(Self {
            domains,
            cluster_domain: cluster_domain.into(),
        })
    }

    /// Domain suffix reserved for cluster-local services ("svc.<cluster domain>")
    pub fn local_domain(&self) -> String {
        format!("svc.{}", self.cluster_domain)
    }

    /// Domain suffix for a Route's labels
    ///
    /// A cluster-local visibility label short-circuits to the local domain.
    /// Otherwise the most specific matching selector wins; ties go to the
    /// lexicographically smallest domain.
    pub fn lookup_domain_for_labels(&self, labels: &BTreeMap<String, String>) -> String {
        if is_local_visibility(labels) {
            return self.local_domain();
        }

        let mut best: Option<(&str, usize)> = None;
        // BTreeMap iterates domains in order, so strict `>` keeps the smallest on ties
        for (domain, selector) in &self.domains {
            if !selector.matches(labels) {
                continue;
            }
            let specificity = selector.specificity();
            if best.map_or(true, |(_, current)| specificity > current) {
                best = Some((domain, specificity));
            }
        }

        best.map_or_else(|| DEFAULT_DOMAIN.to_string(), |(domain, _)| domain.to_string())
    }
}
