use crate::core::client::cluster_api::ClusterApi;
use crate::core::client::mappers::map_service_to_summary;
use crate::domain::tool::dto::resource_records::ServiceSummary;
use crate::domain::tool::dto::tool_params::ListScopedParams;
use crate::domain::tool::dto::tool_result::ToolResult;
use crate::domain::tool::service::empty_if_missing;
use crate::errors::ToolInvocationError;

pub const LIST_SERVICES: &str = "get_services";

pub async fn list_services(cluster: &dyn ClusterApi, params: ListScopedParams) -> ToolResult<Vec<ServiceSummary>> {
    list_services_inner(cluster, params).await.into()
}

async fn list_services_inner(
    cluster: &dyn ClusterApi,
    params: ListScopedParams,
) -> Result<Vec<ServiceSummary>, ToolInvocationError> {
    let scope = params.scope(LIST_SERVICES)?;
    let services = empty_if_missing(cluster.list_services(&scope).await)?;
    Ok(services.iter().map(map_service_to_summary).collect())
}
