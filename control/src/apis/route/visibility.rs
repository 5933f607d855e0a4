//! Route visibility resolver
//!
//! Computes the visibility of every traffic target of a Route from the
//! domain config and a snapshot of the Route's placeholder Services.

use crate::apis::metrics::{record_resolved_target, record_visibility_resolution};
use crate::apis::route::domains::hostname_from_template;
use crate::apis::route::labels::is_object_local_visibility;
use crate::apis::route::placeholder::{placeholder_services, ServiceLister};
use crate::apis::route::Route;
use crate::config::ControllerConfig;
use crate::error::VisibilityError;
use common::{min_visibility, Visibility};
use k8s_openapi::api::core::v1::Service;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Visibility resolver
pub struct VisibilityResolver {
    config: Arc<ControllerConfig>,
    lister: Arc<dyn ServiceLister>,
}

impl VisibilityResolver {
    pub fn new(config: Arc<ControllerConfig>, lister: Arc<dyn ServiceLister>) -> Self {
        Self { config, lister }
    }

    /// Default visibility of a Route, from the domain its labels select
    pub fn route_visibility(&self, route: &Route) -> Visibility {
        let domain = self.config.domain.lookup_domain_for_labels(route.labels());
        if domain == self.config.domain.local_domain() {
            Visibility::ClusterLocal
        } else {
            Visibility::ExternalIP
        }
    }

    /// Resolve the visibility of each named traffic target against a
    /// placeholder snapshot
    ///
    /// Returns exactly one entry per name, never `Unspecified`. A hostname
    /// template failure aborts the whole resolution.
    pub fn resolve(
        &self,
        route: &Route,
        placeholders: &HashMap<String, Service>,
        traffic_names: &[String],
    ) -> Result<BTreeMap<String, Visibility>, VisibilityError> {
        let default_visibility = self.route_visibility(route);

        let mut resolved = BTreeMap::new();
        for name in traffic_names {
            let hostname = hostname_from_template(&self.config.tag_template, route.name(), name)?;

            let target_visibility = match placeholders.get(&hostname) {
                Some(service) if is_object_local_visibility(&service.metadata) => {
                    Visibility::ClusterLocal
                }
                _ => Visibility::ExternalIP,
            };

            resolved.insert(
                name.clone(),
                min_visibility(target_visibility, default_visibility),
            );
        }

        Ok(resolved)
    }

    /// Snapshot the Route's placeholder Services, then resolve
    pub async fn for_route(
        &self,
        route: &Route,
        traffic_names: &[String],
    ) -> Result<BTreeMap<String, Visibility>, VisibilityError> {
        let start = Instant::now();

        let result = placeholder_services(self.lister.as_ref(), route)
            .await
            .and_then(|placeholders| self.resolve(route, &placeholders, traffic_names));

        match &result {
            Ok(resolved) => {
                debug!("Route {} visibility: {:?}", route, resolved);
                resolved.values().copied().for_each(record_resolved_target);
                record_visibility_resolution(
                    route.name(),
                    route.namespace(),
                    start.elapsed().as_secs_f64(),
                    "success",
                );
            }
            Err(e) => {
                warn!("Failed to resolve visibility for Route {}: {}", route, e);
                record_visibility_resolution(
                    route.name(),
                    route.namespace(),
                    start.elapsed().as_secs_f64(),
                    "error",
                );
            }
        }

        result
    }
}
