use tracing::debug;

use crate::core::client::cluster_api::{ClusterApi, ClusterError};
use crate::core::client::mappers::{map_pod_to_detail, map_pod_to_summary};
use crate::domain::tool::dto::resource_records::{PodDetail, PodSummary};
use crate::domain::tool::dto::tool_params::{DescribePodParams, ListPodsParams};
use crate::domain::tool::dto::tool_result::ToolResult;
use crate::domain::tool::service::empty_if_missing;
use crate::errors::ToolInvocationError;

pub const LIST_PODS: &str = "get_pods";
pub const DESCRIBE_POD: &str = "describe_pod";

/// List pods in one namespace or all of them, in the order the API returns them.
pub async fn list_pods(cluster: &dyn ClusterApi, params: ListPodsParams) -> ToolResult<Vec<PodSummary>> {
    list_pods_inner(cluster, params).await.into()
}

async fn list_pods_inner(
    cluster: &dyn ClusterApi,
    params: ListPodsParams,
) -> Result<Vec<PodSummary>, ToolInvocationError> {
    let scope = params.scope(LIST_PODS)?;
    let pods = empty_if_missing(cluster.list_pods(&scope, params.label_selector()).await)?;

    debug!("get_pods: {} pod(s) in scope '{}'", pods.len(), scope);
    Ok(pods.iter().map(map_pod_to_summary).collect())
}

pub async fn describe_pod(cluster: &dyn ClusterApi, params: DescribePodParams) -> ToolResult<PodDetail> {
    describe_pod_inner(cluster, params).await.into()
}

async fn describe_pod_inner(
    cluster: &dyn ClusterApi,
    params: DescribePodParams,
) -> Result<PodDetail, ToolInvocationError> {
    let namespace = params.namespace();
    match cluster.get_pod(namespace, &params.name).await {
        Ok(pod) => Ok(map_pod_to_detail(&pod)),
        Err(ClusterError::NotFound(_)) => Err(ToolInvocationError::NotFound(pod_not_found(
            &params.name,
            namespace,
        ))),
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn pod_not_found(name: &str, namespace: &str) -> String {
    format!("Pod '{}' not found in namespace '{}'", name, namespace)
}
