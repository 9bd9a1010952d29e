//! In-memory cluster used by unit tests. Mirrors the API server's behavior
//! closely enough for the tool layer: namespace filtering, label selectors,
//! 404s for unknown pods and 400s for ambiguous or missing log containers.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::core::client::cluster_api::{ClusterApi, ClusterError, LogQuery, NamespaceScope};
use crate::core::client::kube_resources::{Deployment, Namespace, Node, Pod, Service};
use crate::core::client::mappers::container_names;

#[derive(Default)]
pub struct FakeCluster {
    pub pods: Vec<Pod>,
    pub nodes: Vec<Node>,
    pub namespaces: Vec<Namespace>,
    pub services: Vec<Service>,
    pub deployments: Vec<Deployment>,
    /// (namespace, pod, container, previous) → log text
    pub logs: HashMap<(String, String, String, bool), String>,
    pub failure: Option<ClusterError>,
    pub log_queries: Mutex<Vec<LogQuery>>,
}

pub fn pod_json(name: &str, namespace: &str, phase: &str, containers: &[&str]) -> Value {
    let containers: Vec<Value> = containers.iter().map(|c| json!({"name": c, "image": "busybox"})).collect();
    json!({
        "metadata": {"name": name, "namespace": namespace, "labels": {"app": name}},
        "spec": {"nodeName": "node-a", "containers": containers},
        "status": {"phase": phase}
    })
}

impl FakeCluster {
    pub fn with_pod(mut self, value: Value) -> Self {
        self.pods.push(serde_json::from_value(value).expect("valid pod json"));
        self
    }

    pub fn with_node(mut self, value: Value) -> Self {
        self.nodes.push(serde_json::from_value(value).expect("valid node json"));
        self
    }

    pub fn with_namespace(mut self, value: Value) -> Self {
        self.namespaces.push(serde_json::from_value(value).expect("valid namespace json"));
        self
    }

    pub fn with_service(mut self, value: Value) -> Self {
        self.services.push(serde_json::from_value(value).expect("valid service json"));
        self
    }

    pub fn with_deployment(mut self, value: Value) -> Self {
        self.deployments.push(serde_json::from_value(value).expect("valid deployment json"));
        self
    }

    pub fn with_logs(mut self, namespace: &str, pod: &str, container: &str, previous: bool, text: &str) -> Self {
        self.logs.insert(
            (namespace.into(), pod.into(), container.into(), previous),
            text.into(),
        );
        self
    }

    pub fn failing(mut self, err: ClusterError) -> Self {
        self.failure = Some(err);
        self
    }

    fn check(&self) -> Result<(), ClusterError> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

fn in_scope(namespace: Option<&String>, scope: &NamespaceScope) -> bool {
    match scope {
        NamespaceScope::All => true,
        NamespaceScope::Named(ns) => namespace.map(|n| n == ns).unwrap_or(false),
    }
}

fn matches_selector(labels: Option<&std::collections::BTreeMap<String, String>>, selector: &str) -> bool {
    selector.split(',').map(str::trim).filter(|s| !s.is_empty()).all(|term| {
        let (key, value) = term.split_once('=').unwrap_or((term, ""));
        labels
            .and_then(|l| l.get(key.trim()))
            .map(|v| value.is_empty() || v == value.trim())
            .unwrap_or(false)
    })
}

#[async_trait]
impl ClusterApi for FakeCluster {
    async fn list_pods(
        &self,
        scope: &NamespaceScope,
        label_selector: Option<&str>,
    ) -> Result<Vec<Pod>, ClusterError> {
        self.check()?;
        Ok(self
            .pods
            .iter()
            .filter(|p| in_scope(p.metadata.namespace.as_ref(), scope))
            .filter(|p| label_selector.map_or(true, |s| matches_selector(p.metadata.labels.as_ref(), s)))
            .cloned()
            .collect())
    }

    async fn list_nodes(&self) -> Result<Vec<Node>, ClusterError> {
        self.check()?;
        Ok(self.nodes.clone())
    }

    async fn list_namespaces(&self) -> Result<Vec<Namespace>, ClusterError> {
        self.check()?;
        Ok(self.namespaces.clone())
    }

    async fn list_services(&self, scope: &NamespaceScope) -> Result<Vec<Service>, ClusterError> {
        self.check()?;
        Ok(self
            .services
            .iter()
            .filter(|s| in_scope(s.metadata.namespace.as_ref(), scope))
            .cloned()
            .collect())
    }

    async fn list_deployments(&self, scope: &NamespaceScope) -> Result<Vec<Deployment>, ClusterError> {
        self.check()?;
        Ok(self
            .deployments
            .iter()
            .filter(|d| in_scope(d.metadata.namespace.as_ref(), scope))
            .cloned()
            .collect())
    }

    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod, ClusterError> {
        self.check()?;
        self.pods
            .iter()
            .find(|p| {
                p.metadata.namespace.as_deref() == Some(namespace) && p.metadata.name.as_deref() == Some(name)
            })
            .cloned()
            .ok_or_else(|| ClusterError::NotFound(format!("pods \"{}\" not found", name)))
    }

    async fn pod_logs(
        &self,
        namespace: &str,
        name: &str,
        query: &LogQuery,
    ) -> Result<String, ClusterError> {
        self.log_queries.lock().unwrap().push(query.clone());
        let pod = self.get_pod(namespace, name).await?;
        let names = container_names(&pod);

        let container = match &query.container {
            Some(c) if names.contains(c) => c.clone(),
            Some(c) => {
                return Err(ClusterError::BadRequest(format!(
                    "container {} is not valid for pod {}",
                    c, name
                )))
            }
            None if names.len() == 1 => names[0].clone(),
            None => {
                return Err(ClusterError::BadRequest(format!(
                    "a container name must be specified for pod {}, choose one of: {:?}",
                    name, names
                )))
            }
        };

        let key = (namespace.to_string(), name.to_string(), container.clone(), query.previous);
        let text = match self.logs.get(&key) {
            Some(text) => text.clone(),
            None if query.previous => {
                return Err(ClusterError::BadRequest(format!(
                    "previous terminated container \"{}\" in pod \"{}\" not found",
                    container, name
                )))
            }
            None => String::new(),
        };

        Ok(match query.tail_lines {
            Some(n) => {
                let lines: Vec<&str> = text.lines().collect();
                let start = lines.len().saturating_sub(n as usize);
                lines[start..].join("\n")
            }
            None => text,
        })
    }
}
