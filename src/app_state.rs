use std::sync::Arc;

use crate::core::client::kube_client::ClusterConnector;
use crate::core::client::llm::ReasoningModel;
use crate::domain::agent::service::agent_service::AgentService;
use crate::domain::tool::tool_registry::ToolRegistry;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ToolRegistry>,
    pub agent_service: Arc<AgentService>,
}

/// Bind the connector and model handle once; everything downstream shares them.
pub fn build_app_state(
    connector: Arc<ClusterConnector>,
    model: Arc<dyn ReasoningModel>,
    max_agent_steps: usize,
) -> AppState {
    let registry = Arc::new(ToolRegistry::new(connector, model));
    AppState {
        agent_service: Arc::new(AgentService::new(registry.clone(), max_agent_steps)),
        registry,
    }
}
