use crate::core::client::cluster_api::ClusterApi;
use crate::core::client::mappers::map_deployment_to_summary;
use crate::domain::tool::dto::resource_records::DeploymentSummary;
use crate::domain::tool::dto::tool_params::ListScopedParams;
use crate::domain::tool::dto::tool_result::ToolResult;
use crate::domain::tool::service::empty_if_missing;
use crate::errors::ToolInvocationError;

pub const LIST_DEPLOYMENTS: &str = "get_deployments";

pub async fn list_deployments(
    cluster: &dyn ClusterApi,
    params: ListScopedParams,
) -> ToolResult<Vec<DeploymentSummary>> {
    list_deployments_inner(cluster, params).await.into()
}

async fn list_deployments_inner(
    cluster: &dyn ClusterApi,
    params: ListScopedParams,
) -> Result<Vec<DeploymentSummary>, ToolInvocationError> {
    let scope = params.scope(LIST_DEPLOYMENTS)?;
    let deployments = empty_if_missing(cluster.list_deployments(&scope).await)?;
    Ok(deployments.iter().map(map_deployment_to_summary).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::fake_cluster::FakeCluster;
    use serde_json::json;

    #[tokio::test]
    async fn deployment_replica_counts_are_reported() {
        let cluster = FakeCluster::default().with_deployment(json!({
            "metadata": {"name": "api", "namespace": "shop"},
            "spec": {
                "replicas": 3,
                "selector": {"matchLabels": {"app": "api"}},
                "template": {"spec": {"containers": [{"name": "api", "image": "api:1"}]}}
            },
            "status": {
                "availableReplicas": 2,
                "readyReplicas": 2,
                "updatedReplicas": 3,
                "conditions": [{"type": "Available", "status": "False", "reason": "MinimumReplicasUnavailable"}]
            }
        }));

        let result = list_deployments(
            &cluster,
            ListScopedParams {
                namespace: Some("shop".into()),
            },
        )
        .await;

        let deployments = result.payload().unwrap();
        assert_eq!(deployments.len(), 1);
        let api = &deployments[0];
        assert_eq!(api.replicas_desired, 3);
        assert_eq!(api.replicas_available, 2);
        assert_eq!(api.updated_replicas, 3);
        assert_eq!(api.conditions[0].reason.as_deref(), Some("MinimumReplicasUnavailable"));
    }

    #[tokio::test]
    async fn other_namespaces_are_excluded() {
        let cluster = FakeCluster::default().with_deployment(json!({
            "metadata": {"name": "api", "namespace": "shop"},
            "spec": {"selector": {}, "template": {}}
        }));

        let result = list_deployments(
            &cluster,
            ListScopedParams {
                namespace: Some("default".into()),
            },
        )
        .await;

        assert_eq!(result, ToolResult::success(vec![]));
    }
}
