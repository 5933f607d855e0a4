//! RAUTA Control Plane Library
//!
//! Resolves the visibility (cluster-local or external) of every traffic
//! target of a Route and builds the ingress rules for them.

pub mod apis;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use apis::route::ingress::build_ingress_rules;
pub use apis::route::placeholder::{KubeServiceLister, ServiceLister};
pub use apis::route::visibility::VisibilityResolver;
pub use apis::route::{Route, RouteSpec, TrafficTarget};
pub use common::{cluster_local_rules, min_visibility, public_rules, IngressRule, Visibility};
pub use config::ControllerConfig;
pub use error::VisibilityError;
