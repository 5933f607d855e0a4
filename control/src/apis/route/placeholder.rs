//! Placeholder Services
//!
//! Each traffic target of a Route may have a placeholder Service named after
//! its hostname. The Service carries per-target metadata (such as the
//! cluster-local label) that the Route itself cannot express per target.

use crate::apis::route::labels::route_selector;
use crate::apis::route::Route;
use crate::error::VisibilityError;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Service;
use kube::api::{Api, ListParams};
use kube::{Client, ResourceExt};
use std::collections::HashMap;
use tracing::debug;

/// Lists Services from the object store
///
/// Returned objects are owned by the caller.
#[async_trait]
pub trait ServiceLister: Send + Sync {
    async fn list(&self, namespace: &str, label_selector: &str)
        -> Result<Vec<Service>, kube::Error>;
}

/// ServiceLister backed by the Kubernetes API
pub struct KubeServiceLister {
    client: Client,
}

impl KubeServiceLister {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ServiceLister for KubeServiceLister {
    async fn list(
        &self,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<Service>, kube::Error> {
        let api: Api<Service> = Api::namespaced(self.client.clone(), namespace);
        let list_params = ListParams::default().labels(label_selector);
        let services = api.list(&list_params).await?;
        Ok(services.items)
    }
}

/// Snapshot of the placeholder Services owned by a Route, keyed by name
///
/// Taken once per resolution and never reused.
pub async fn placeholder_services(
    lister: &dyn ServiceLister,
    route: &Route,
) -> Result<HashMap<String, Service>, VisibilityError> {
    let services = lister
        .list(route.namespace(), &route_selector(route.name()))
        .await?;

    debug!(
        "Route {} owns {} placeholder Service(s)",
        route,
        services.len()
    );

    Ok(services
        .into_iter()
        .map(|service| (service.name_any(), service))
        .collect())
}
