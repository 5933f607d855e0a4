//! Kubernetes API integrations
//!
//! This module contains Route visibility resolution and the controller metrics.

pub mod metrics;
pub mod route;
