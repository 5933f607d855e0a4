use thiserror::Error;

/// Errors surfaced while resolving route visibility or building ingress rules
///
/// Collaborator failures are passed through unchanged; callers retry the
/// whole reconciliation pass.
#[derive(Error, Debug)]
pub enum VisibilityError {
    #[error("Kubernetes error: {0}")]
    Kubernetes(#[from] kube::Error),

    #[error("Invalid template '{template}': {reason}")]
    Template { template: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Route {route} has no resolved visibility for traffic target '{target}'")]
    MissingTarget { route: String, target: String },
}
