//! Route label keys
//!
//! Labels tying placeholder Services to their Route and marking objects
//! as cluster-local.

use common::VISIBILITY_CLUSTER_LOCAL;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

/// Label set on every placeholder Service, value is the owning Route name
pub const ROUTE_LABEL_KEY: &str = "rauta.io/route";

/// Label restricting a Route (or one of its traffic targets) to the cluster
pub const VISIBILITY_LABEL_KEY: &str = "rauta.io/visibility";

/// True if the label set carries the cluster-local visibility marker
pub fn is_local_visibility(labels: &BTreeMap<String, String>) -> bool {
    labels
        .get(VISIBILITY_LABEL_KEY)
        .is_some_and(|value| value == VISIBILITY_CLUSTER_LOCAL)
}

/// True if the object carries the cluster-local visibility marker
pub fn is_object_local_visibility(meta: &ObjectMeta) -> bool {
    meta.labels.as_ref().is_some_and(is_local_visibility)
}

/// Label selector matching every placeholder Service owned by a Route
pub fn route_selector(route_name: &str) -> String {
    format!("{}={}", ROUTE_LABEL_KEY, route_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta_with_labels(labels: &[(&str, &str)]) -> ObjectMeta {
        ObjectMeta {
            name: Some("hello".to_string()),
            labels: Some(
                labels
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    #[test]
    fn test_cluster_local_marker() {
        let meta = meta_with_labels(&[(VISIBILITY_LABEL_KEY, "cluster-local")]);
        assert!(is_object_local_visibility(&meta));
    }

    #[test]
    fn test_other_marker_values_are_not_local() {
        let meta = meta_with_labels(&[(VISIBILITY_LABEL_KEY, "public")]);
        assert!(!is_object_local_visibility(&meta));

        let meta = meta_with_labels(&[(VISIBILITY_LABEL_KEY, "Cluster-Local")]);
        assert!(!is_object_local_visibility(&meta));
    }

    #[test]
    fn test_missing_labels_are_not_local() {
        assert!(!is_object_local_visibility(&ObjectMeta::default()));

        let meta = meta_with_labels(&[("app", "hello")]);
        assert!(!is_object_local_visibility(&meta));
    }

    #[test]
    fn test_route_selector() {
        assert_eq!(route_selector("hello"), "rauta.io/route=hello");
    }
}
