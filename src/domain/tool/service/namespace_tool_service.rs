use crate::core::client::cluster_api::ClusterApi;
use crate::core::client::mappers::map_namespace_to_summary;
use crate::domain::tool::dto::resource_records::NamespaceSummary;
use crate::domain::tool::dto::tool_result::ToolResult;
use crate::errors::ToolInvocationError;

pub const LIST_NAMESPACES: &str = "get_namespaces";

pub async fn list_namespaces(cluster: &dyn ClusterApi) -> ToolResult<Vec<NamespaceSummary>> {
    list_namespaces_inner(cluster).await.into()
}

async fn list_namespaces_inner(cluster: &dyn ClusterApi) -> Result<Vec<NamespaceSummary>, ToolInvocationError> {
    let namespaces = cluster.list_namespaces().await?;
    Ok(namespaces.iter().map(map_namespace_to_summary).collect())
}
