use crate::core::client::cluster_api::ClusterApi;
use crate::core::client::mappers::map_node_to_summary;
use crate::domain::tool::dto::resource_records::NodeSummary;
use crate::domain::tool::dto::tool_result::ToolResult;
use crate::errors::ToolInvocationError;

pub const LIST_NODES: &str = "get_nodes";

pub async fn list_nodes(cluster: &dyn ClusterApi) -> ToolResult<Vec<NodeSummary>> {
    list_nodes_inner(cluster).await.into()
}

async fn list_nodes_inner(cluster: &dyn ClusterApi) -> Result<Vec<NodeSummary>, ToolInvocationError> {
    let nodes = cluster.list_nodes().await?;
    Ok(nodes.iter().map(map_node_to_summary).collect())
}
