//! One pure function per tool: (validated params, cluster) → tool result.
//! None of them writes to the cluster.

pub mod deployment_tool_service;
pub mod k8s_service_tool_service;
pub mod log_tool_service;
pub mod namespace_tool_service;
pub mod node_tool_service;
pub mod pod_tool_service;

use crate::core::client::cluster_api::ClusterError;

/// Listing inside a namespace that does not exist yields nothing, not an error.
pub(crate) fn empty_if_missing<T>(result: Result<Vec<T>, ClusterError>) -> Result<Vec<T>, ClusterError> {
    match result {
        Err(ClusterError::NotFound(_)) => Ok(Vec::new()),
        other => other,
    }
}
