//! Configuration for RAUTA controller
//!
//! Domain and hostname settings used when resolving Route visibility.

use crate::apis::route::domains::{
    default_cluster_domain, DomainConfig, DEFAULT_DOMAIN_TEMPLATE, DEFAULT_TAG_TEMPLATE,
};
use crate::error::VisibilityError;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::debug;

/// Location of the resolver config inside a Pod
const RESOLV_CONF_PATH: &str = "/etc/resolv.conf";

/// Controller configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControllerConfig {
    /// Domain suffix selection and cluster domain
    #[serde(default)]
    pub domain: DomainConfig,

    /// Template for fully-qualified external hosts
    #[serde(default = "default_domain_template")]
    pub domain_template: String,

    /// Template naming tagged traffic targets
    #[serde(default = "default_tag_template")]
    pub tag_template: String,
}

fn default_domain_template() -> String {
    DEFAULT_DOMAIN_TEMPLATE.to_string()
}

fn default_tag_template() -> String {
    DEFAULT_TAG_TEMPLATE.to_string()
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            domain: DomainConfig::default(),
            domain_template: default_domain_template(),
            tag_template: default_tag_template(),
        }
    }
}

impl ControllerConfig {
    /// Load configuration from environment variables
    ///
    /// The cluster domain comes from `RAUTA_CLUSTER_DOMAIN`, then from the
    /// Pod's resolv.conf, then falls back to "cluster.local".
    pub fn from_env() -> Result<Self, VisibilityError> {
        let mut config = Self::default();

        config.domain.cluster_domain = match env::var("RAUTA_CLUSTER_DOMAIN") {
            Ok(val) => val,
            Err(_) => std::fs::read_to_string(RESOLV_CONF_PATH)
                .ok()
                .and_then(|contents| cluster_domain_from_resolv_conf(&contents))
                .unwrap_or_else(default_cluster_domain),
        };
        debug!("Using cluster domain {}", config.domain.cluster_domain);

        if let Ok(val) = env::var("RAUTA_DOMAIN_TEMPLATE") {
            config.domain_template = val;
        }

        if let Ok(val) = env::var("RAUTA_TAG_TEMPLATE") {
            config.tag_template = val;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject empty settings that would make every hostname unrenderable
    pub fn validate(&self) -> Result<(), VisibilityError> {
        if self.domain.cluster_domain.trim().is_empty() {
            return Err(VisibilityError::Config(
                "cluster domain cannot be empty".to_string(),
            ));
        }
        if self.domain_template.trim().is_empty() {
            return Err(VisibilityError::Config(
                "domain template cannot be empty".to_string(),
            ));
        }
        if self.tag_template.trim().is_empty() {
            return Err(VisibilityError::Config(
                "tag template cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Cluster domain from resolv.conf contents
///
/// Reads the `search` line and returns what follows the first `svc.` entry,
/// e.g. "cluster.local" for `search ns.svc.cluster.local svc.cluster.local`.
pub fn cluster_domain_from_resolv_conf(contents: &str) -> Option<String> {
    contents
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix("search"))
        .flat_map(str::split_whitespace)
        .find_map(|entry| entry.strip_prefix("svc."))
        .map(|domain| domain.trim_end_matches('.').to_string())
        .filter(|domain| !domain.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ControllerConfig::default();
        assert_eq!(config.domain.cluster_domain, "cluster.local");
        assert_eq!(config.tag_template, "{{.Name}}-{{.Tag}}");
        assert_eq!(
            config.domain_template,
            "{{.Name}}.{{.Namespace}}.{{.Domain}}"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_json_uses_defaults() {
        let config: ControllerConfig = serde_json::from_value(serde_json::json!({
            "domain": {"cluster_domain": "corp.local"}
        }))
        .expect("Should parse config");

        assert_eq!(config.domain.cluster_domain, "corp.local");
        assert_eq!(config.domain.local_domain(), "svc.corp.local");
        assert_eq!(config.tag_template, "{{.Name}}-{{.Tag}}");
        assert!(config.domain.domains.contains_key("example.com"));
    }

    #[test]
    fn test_validate_rejects_empty_settings() {
        let mut config = ControllerConfig::default();
        config.tag_template = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(VisibilityError::Config(_))
        ));

        let mut config = ControllerConfig::default();
        config.domain.cluster_domain = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cluster_domain_from_resolv_conf() {
        let contents = "\
nameserver 10.96.0.10
search default.svc.cluster.local svc.cluster.local cluster.local
options ndots:5
";
        assert_eq!(
            cluster_domain_from_resolv_conf(contents),
            Some("cluster.local".to_string())
        );
    }

    #[test]
    fn test_cluster_domain_from_resolv_conf_custom_domain() {
        let contents = "search apps.svc.corp.example. svc.corp.example. corp.example.\n";
        assert_eq!(
            cluster_domain_from_resolv_conf(contents),
            Some("corp.example".to_string())
        );
    }

    #[test]
    fn test_cluster_domain_from_resolv_conf_missing() {
        assert_eq!(cluster_domain_from_resolv_conf(""), None);
        assert_eq!(
            cluster_domain_from_resolv_conf("nameserver 8.8.8.8\nsearch example.com\n"),
            None
        );
    }
}
