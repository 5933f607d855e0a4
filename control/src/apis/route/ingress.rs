//! Ingress rules for a Route
//!
//! Turns resolved traffic target visibilities into ingress rules, one rule
//! per target, in traffic name order.

use crate::apis::route::domains::{domain_from_template, hostname_from_template};
use crate::apis::route::Route;
use crate::config::ControllerConfig;
use crate::error::VisibilityError;
use common::{IngressRule, Visibility};
use std::collections::BTreeMap;

/// Build one ingress rule per traffic target
///
/// Every rule answers for the target's cluster-local host. Public targets
/// additionally answer for their external host, listed first.
pub fn build_ingress_rules(
    route: &Route,
    traffic_names: &[String],
    visibility: &BTreeMap<String, Visibility>,
    config: &ControllerConfig,
) -> Result<Vec<IngressRule>, VisibilityError> {
    let local_domain = config.domain.local_domain();
    let mut rules = Vec::with_capacity(traffic_names.len());

    for name in traffic_names {
        let target_visibility =
            *visibility
                .get(name)
                .ok_or_else(|| VisibilityError::MissingTarget {
                    route: route.to_string(),
                    target: name.clone(),
                })?;

        let hostname = hostname_from_template(&config.tag_template, route.name(), name)?;

        let mut hosts = Vec::with_capacity(2);
        if target_visibility.is_public() {
            let domain = config.domain.lookup_domain_for_labels(route.labels());
            hosts.push(domain_from_template(
                &config.domain_template,
                &hostname,
                route.namespace(),
                &domain,
            )?);
        }

        let local_host = format!("{}.{}.{}", hostname, route.namespace(), local_domain);
        if !hosts.contains(&local_host) {
            hosts.push(local_host);
        }

        rules.push(IngressRule::new(hosts, target_visibility));
    }

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{cluster_local_rules, public_rules};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn route() -> Route {
        Route {
            metadata: ObjectMeta {
                name: Some("hello".to_string()),
                namespace: Some("apps".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_rules_follow_traffic_name_order() {
        let visibility = BTreeMap::from([
            (String::new(), Visibility::ExternalIP),
            ("canary".to_string(), Visibility::ClusterLocal),
        ]);

        let rules = build_ingress_rules(
            &route(),
            &names(&["canary", ""]),
            &visibility,
            &ControllerConfig::default(),
        )
        .unwrap();

        assert_eq!(
            rules,
            vec![
                IngressRule::new(
                    vec!["hello-canary.apps.svc.cluster.local".to_string()],
                    Visibility::ClusterLocal,
                ),
                IngressRule::new(
                    vec![
                        "hello.apps.example.com".to_string(),
                        "hello.apps.svc.cluster.local".to_string(),
                    ],
                    Visibility::ExternalIP,
                ),
            ]
        );
    }

    #[test]
    fn test_rules_partition_by_visibility() {
        let visibility = BTreeMap::from([
            (String::new(), Visibility::ExternalIP),
            ("canary".to_string(), Visibility::ClusterLocal),
        ]);

        let rules = build_ingress_rules(
            &route(),
            &names(&["", "canary"]),
            &visibility,
            &ControllerConfig::default(),
        )
        .unwrap();

        let local = cluster_local_rules(&rules);
        assert_eq!(local.len(), 1);
        assert_eq!(local[0].hosts, vec!["hello-canary.apps.svc.cluster.local"]);

        let public = public_rules(&rules);
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].hosts[0], "hello.apps.example.com");
    }

    #[test]
    fn test_missing_visibility_is_error() {
        let visibility = BTreeMap::from([(String::new(), Visibility::ExternalIP)]);

        let err = build_ingress_rules(
            &route(),
            &names(&["", "canary"]),
            &visibility,
            &ControllerConfig::default(),
        )
        .expect_err("canary has no visibility");

        match err {
            VisibilityError::MissingTarget { route, target } => {
                assert_eq!(route, "apps/hello");
                assert_eq!(target, "canary");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_custom_domain_template() {
        let config = ControllerConfig {
            domain_template: "{{.Name}}-{{.Namespace}}.{{.Domain}}".to_string(),
            ..Default::default()
        };
        let visibility = BTreeMap::from([(String::new(), Visibility::ExternalIP)]);

        let rules = build_ingress_rules(&route(), &names(&[""]), &visibility, &config).unwrap();

        assert_eq!(rules[0].hosts[0], "hello-apps.example.com");
    }
}
