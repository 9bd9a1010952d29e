//! The fixed tool catalog bound to one cluster connector and one model handle.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::core::client::cluster_api::ClusterApi;
use crate::core::client::kube_client::ClusterConnector;
use crate::core::client::llm::ReasoningModel;
use crate::domain::tool::dto::tool_params::{
    parse_args, DescribePodParams, GetLogsParams, ListPodsParams, ListScopedParams, NoParams,
};
use crate::domain::tool::dto::tool_result::ToolResult;
use crate::domain::tool::dto::tool_spec::ToolSpec;
use crate::domain::tool::service::{
    deployment_tool_service, k8s_service_tool_service, log_tool_service, namespace_tool_service,
    node_tool_service, pod_tool_service,
};
use crate::errors::ToolInvocationError;

pub const AGENT_NAME: &str = "kubernetes_agent";

pub const AGENT_DESCRIPTION: &str = "An agent that can interact with Kubernetes clusters to retrieve information \
about pods, nodes, services, deployments, and other Kubernetes resources.";

pub const AGENT_INSTRUCTION: &str = "You are a helpful Kubernetes assistant that can query and retrieve information \
from Kubernetes clusters. You can list pods, nodes, services, deployments, and namespaces. You can also get \
detailed information about specific resources and retrieve logs from pod containers. When users ask about their \
Kubernetes cluster, use the appropriate tools to fetch the information they need. Always provide clear and \
organized responses about the cluster state and resources. For log requests, you can retrieve recent logs, tail \
a specific number of lines, get logs from a specific time period, or even get logs from previously crashed \
containers. Every tool returns either {\"status\": \"success\", \"payload\": ...} or \
{\"status\": \"error\", \"message\": ...}; explain errors to the user in plain language.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    GetPods,
    GetNodes,
    GetNamespaces,
    GetServices,
    GetDeployments,
    DescribePod,
    GetLogs,
}

impl ToolName {
    pub const ALL: [ToolName; 7] = [
        ToolName::GetPods,
        ToolName::GetNodes,
        ToolName::GetNamespaces,
        ToolName::GetServices,
        ToolName::GetDeployments,
        ToolName::DescribePod,
        ToolName::GetLogs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::GetPods => pod_tool_service::LIST_PODS,
            ToolName::GetNodes => node_tool_service::LIST_NODES,
            ToolName::GetNamespaces => namespace_tool_service::LIST_NAMESPACES,
            ToolName::GetServices => k8s_service_tool_service::LIST_SERVICES,
            ToolName::GetDeployments => deployment_tool_service::LIST_DEPLOYMENTS,
            ToolName::DescribePod => pod_tool_service::DESCRIBE_POD,
            ToolName::GetLogs => log_tool_service::GET_LOGS,
        }
    }

    /// Exact, case-sensitive match on the advertised name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    fn description(&self) -> &'static str {
        match self {
            ToolName::GetPods => {
                "List pods with their phase, node and restart count. namespace defaults to \"all\" \
                 (any casing) for every namespace; label_selector filters like \"app=nginx\"."
            }
            ToolName::GetNodes => "List cluster nodes with readiness, roles, capacity and allocatable resources.",
            ToolName::GetNamespaces => "List namespaces and their phase.",
            ToolName::GetServices => {
                "List services with type, cluster IP and ports. namespace defaults to \"all\"."
            }
            ToolName::GetDeployments => {
                "List deployments with desired and available replica counts. namespace defaults to \"all\"."
            }
            ToolName::DescribePod => {
                "Detailed view of one pod: metadata, status, containers, container states and conditions. \
                 namespace defaults to \"default\"."
            }
            ToolName::GetLogs => {
                "Fetch logs of one pod container. container is required only for multi-container pods. \
                 previous=true reads the last terminated instance. tail_lines and since_seconds limit output \
                 and may be combined. namespace defaults to \"default\"."
            }
        }
    }

    fn parameters(&self) -> Value {
        let namespace_all = json!({
            "type": "string",
            "description": "Namespace name, or \"all\" for every namespace."
        });
        let namespace_default = json!({
            "type": "string",
            "description": "Namespace name. Defaults to \"default\"."
        });

        match self {
            ToolName::GetPods => json!({
                "type": "object",
                "properties": {
                    "namespace": namespace_all,
                    "label_selector": {"type": "string", "description": "Kubernetes label selector."}
                }
            }),
            ToolName::GetNodes | ToolName::GetNamespaces => json!({"type": "object", "properties": {}}),
            ToolName::GetServices | ToolName::GetDeployments => json!({
                "type": "object",
                "properties": {"namespace": namespace_all}
            }),
            ToolName::DescribePod => json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string", "description": "Pod name."},
                    "namespace": namespace_default
                },
                "required": ["name"]
            }),
            ToolName::GetLogs => json!({
                "type": "object",
                "properties": {
                    "pod_name": {"type": "string", "description": "Pod name."},
                    "namespace": namespace_default,
                    "container": {"type": "string", "description": "Container name."},
                    "previous": {"type": "boolean", "description": "Logs of the previous terminated instance."},
                    "tail_lines": {"type": "integer", "description": "Only the last N lines (N >= 1)."},
                    "since_seconds": {"type": "integer", "description": "Only lines newer than N seconds (N >= 1)."},
                    "timestamps": {"type": "boolean", "description": "Prefix each line with its timestamp."}
                },
                "required": ["pod_name"]
            }),
        }
    }

    pub fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.as_str().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// A tool call whose arguments have been decoded and validated.
enum Invocation {
    Pods(ListPodsParams),
    Nodes,
    Namespaces,
    Services(ListScopedParams),
    Deployments(ListScopedParams),
    DescribePod(DescribePodParams),
    Logs(GetLogsParams),
}

impl Invocation {
    fn parse(tool: ToolName, args: Value) -> Result<Self, ToolInvocationError> {
        let name = tool.as_str();
        Ok(match tool {
            ToolName::GetPods => Invocation::Pods(parse_args(name, args)?),
            ToolName::GetNodes => {
                parse_args::<NoParams>(name, args)?;
                Invocation::Nodes
            }
            ToolName::GetNamespaces => {
                parse_args::<NoParams>(name, args)?;
                Invocation::Namespaces
            }
            ToolName::GetServices => Invocation::Services(parse_args(name, args)?),
            ToolName::GetDeployments => Invocation::Deployments(parse_args(name, args)?),
            ToolName::DescribePod => Invocation::DescribePod(parse_args(name, args)?),
            ToolName::GetLogs => Invocation::Logs(parse_args(name, args)?),
        })
    }

    async fn run(self, cluster: &dyn ClusterApi) -> ToolResult<Value> {
        match self {
            Invocation::Pods(p) => pod_tool_service::list_pods(cluster, p).await.into_json(),
            Invocation::Nodes => node_tool_service::list_nodes(cluster).await.into_json(),
            Invocation::Namespaces => namespace_tool_service::list_namespaces(cluster).await.into_json(),
            Invocation::Services(p) => k8s_service_tool_service::list_services(cluster, p).await.into_json(),
            Invocation::Deployments(p) => deployment_tool_service::list_deployments(cluster, p).await.into_json(),
            Invocation::DescribePod(p) => pod_tool_service::describe_pod(cluster, p).await.into_json(),
            Invocation::Logs(p) => log_tool_service::get_logs(cluster, p).await.into_json(),
        }
    }
}

/// Immutable after construction: no method adds, removes or replaces a tool.
pub struct ToolRegistry {
    connector: Arc<ClusterConnector>,
    model: Arc<dyn ReasoningModel>,
    catalog: Vec<ToolSpec>,
}

impl ToolRegistry {
    pub fn new(connector: Arc<ClusterConnector>, model: Arc<dyn ReasoningModel>) -> Self {
        Self {
            connector,
            model,
            catalog: ToolName::ALL.iter().map(ToolName::spec).collect(),
        }
    }

    pub fn name(&self) -> &'static str {
        AGENT_NAME
    }

    pub fn description(&self) -> &'static str {
        AGENT_DESCRIPTION
    }

    pub fn instruction(&self) -> &'static str {
        AGENT_INSTRUCTION
    }

    pub fn catalog(&self) -> &[ToolSpec] {
        &self.catalog
    }

    pub fn model(&self) -> &dyn ReasoningModel {
        self.model.as_ref()
    }

    pub fn connector(&self) -> &ClusterConnector {
        &self.connector
    }

    /// Run one tool by name. Never fails and never panics: every failure,
    /// including a panicking tool, comes back as the error shape.
    pub async fn invoke(&self, name: &str, args: Value) -> ToolResult<Value> {
        let started = Instant::now();

        let result = match ToolName::from_name(name) {
            None => ToolResult::error(ToolInvocationError::UnknownTool(name.to_string()).to_string()),
            Some(tool) => match AssertUnwindSafe(self.dispatch(tool, args)).catch_unwind().await {
                Ok(result) => result,
                Err(_) => {
                    error!("Tool {} panicked", name);
                    ToolResult::error(ToolInvocationError::Panicked(name.to_string()).to_string())
                }
            },
        };

        info!(
            tool = name,
            status = result.status(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "tool invocation finished"
        );
        result
    }

    async fn dispatch(&self, tool: ToolName, args: Value) -> ToolResult<Value> {
        let invocation = match Invocation::parse(tool, args) {
            Ok(invocation) => invocation,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        let cluster = match self.connector.client().await {
            Ok(cluster) => cluster,
            Err(e) => return ToolResult::error(ToolInvocationError::from(e).to_string()),
        };

        invocation.run(cluster.as_ref()).await
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::core::client::cluster_api::{ClusterError, LogQuery, NamespaceScope};
    use crate::core::client::fake_cluster::{pod_json, FakeCluster};
    use crate::core::client::kube_resources::{Deployment, Namespace, Node, Pod, Service};
    use crate::core::config::app_config::LlmSettings;
    use crate::domain::llm::service::backend_selector::{build_model, configure};
    use async_trait::async_trait;

    fn registry(cluster: FakeCluster) -> ToolRegistry {
        registry_with(cluster, Arc::new(IdleModel))
    }

    #[test]
    fn catalog_lists_every_tool_once_in_fixed_order() {
        let registry = registry(FakeCluster::default());
        let names: Vec<_> = registry.catalog().iter().map(|t| t.name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "get_pods",
                "get_nodes",
                "get_namespaces",
                "get_services",
                "get_deployments",
                "describe_pod",
                "get_logs"
            ]
        );
        assert_eq!(registry.name(), "kubernetes_agent");
        assert!(registry.instruction().contains("previously crashed containers"));
    }

    #[test]
    fn tool_names_round_trip() {
        for tool in ToolName::ALL {
            assert_eq!(ToolName::from_name(tool.as_str()), Some(tool));
        }
        assert_eq!(ToolName::from_name("GET_PODS"), None);
    }

    #[tokio::test]
    async fn end_to_end_pod_listing() {
        let settings = LlmSettings {
            llm_type: Some("cloud".into()),
            google_api_key: Some("test-key".into()),
            ..Default::default()
        };
        let model = build_model(configure(&settings).unwrap()).unwrap();
        let registry = registry_with(
            FakeCluster::default().with_pod(pod_json("p1", "default", "Running", &["app"])),
            model,
        );
        assert!(registry.model().descriptor().provider.starts_with("gemini"));

        let result = registry.invoke("get_pods", json!({"namespace": "default"})).await;

        assert_eq!(result.status(), "success");
        let pods = result.payload().unwrap().as_array().unwrap();
        assert_eq!(pods.len(), 1);
        assert_eq!(pods[0]["name"], "p1");
        assert_eq!(pods[0]["namespace"], "default");
        assert_eq!(pods[0]["phase"], "Running");
    }

    #[tokio::test]
    async fn blank_label_selector_lists_every_pod() {
        let registry = registry(FakeCluster::default().with_pod(pod_json("p1", "default", "Running", &["app"])));

        let result = registry
            .invoke("get_pods", json!({"namespace": "default", "label_selector": ""}))
            .await;

        assert_eq!(result.status(), "success");
        assert_eq!(result.payload().unwrap()[0]["name"], "p1");
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error_result() {
        let result = registry(FakeCluster::default()).invoke("delete_pod", json!({})).await;
        assert_eq!(result.message(), Some("Unknown tool 'delete_pod'"));
    }

    #[tokio::test]
    async fn invalid_arguments_are_an_error_result() {
        let registry = registry(FakeCluster::default());

        let missing = registry.invoke("describe_pod", json!({})).await;
        let out_of_range = registry
            .invoke("get_logs", json!({"pod_name": "web", "tail_lines": 0}))
            .await;
        let wrong_type = registry.invoke("get_pods", json!({"namespace": 5})).await;

        for result in [missing, out_of_range, wrong_type] {
            assert_eq!(result.status(), "error");
            assert!(result.message().unwrap().starts_with("Invalid arguments for"));
        }
    }

    #[tokio::test]
    async fn null_arguments_mean_defaults() {
        let registry = registry(FakeCluster::default().with_pod(pod_json("a", "x", "Running", &["c"])));
        let result = registry.invoke("get_pods", Value::Null).await;
        assert_eq!(result.payload().and_then(Value::as_array).map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn missing_credentials_surface_as_an_error_result() {
        let registry = ToolRegistry::new(Arc::new(ClusterConnector::new(Vec::new())), Arc::new(IdleModel));

        let result = registry.invoke("get_nodes", json!({})).await;

        assert!(result
            .message()
            .unwrap()
            .starts_with("Cluster connection unavailable"));
    }

    struct PanickingCluster;

    #[async_trait]
    impl ClusterApi for PanickingCluster {
        async fn list_pods(&self, _: &NamespaceScope, _: Option<&str>) -> Result<Vec<Pod>, ClusterError> {
            panic!("boom")
        }
        async fn list_nodes(&self) -> Result<Vec<Node>, ClusterError> {
            panic!("boom")
        }
        async fn list_namespaces(&self) -> Result<Vec<Namespace>, ClusterError> {
            panic!("boom")
        }
        async fn list_services(&self, _: &NamespaceScope) -> Result<Vec<Service>, ClusterError> {
            panic!("boom")
        }
        async fn list_deployments(&self, _: &NamespaceScope) -> Result<Vec<Deployment>, ClusterError> {
            panic!("boom")
        }
        async fn get_pod(&self, _: &str, _: &str) -> Result<Pod, ClusterError> {
            panic!("boom")
        }
        async fn pod_logs(&self, _: &str, _: &str, _: &LogQuery) -> Result<String, ClusterError> {
            panic!("boom")
        }
    }

    #[tokio::test]
    async fn panicking_tool_is_contained() {
        let registry = registry_with(PanickingCluster, Arc::new(IdleModel));

        let result = registry.invoke("get_nodes", json!({})).await;

        assert_eq!(result.message(), Some("Tool get_nodes aborted unexpectedly"));
    }
}
