//! The read-only capability set the tools consume, and its kube-rs implementation.

use std::fmt;

use async_trait::async_trait;
use k8s_openapi::NamespaceResourceScope;
use kube::{Api, Client, Resource};
use thiserror::Error;

use crate::core::client::kube_resources::{Deployment, Namespace, Node, Pod, Service};
use crate::core::client::listing::{fetch_cluster_scoped, fetch_namespaced};
use crate::core::client::pods;

/// Which namespaces a list call covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceScope {
    All,
    Named(String),
}

impl NamespaceScope {
    pub const ALL: &'static str = "all";

    /// `"all"` in any casing selects every namespace.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.eq_ignore_ascii_case(Self::ALL) {
            Some(NamespaceScope::All)
        } else {
            Some(NamespaceScope::Named(trimmed.to_string()))
        }
    }
}

impl fmt::Display for NamespaceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamespaceScope::All => f.write_str(Self::ALL),
            NamespaceScope::Named(ns) => f.write_str(ns),
        }
    }
}

/// Log retrieval filters, forwarded to the API server as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub container: Option<String>,
    pub previous: bool,
    pub tail_lines: Option<i64>,
    pub since_seconds: Option<i64>,
    pub timestamps: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClusterError {
    #[error("Kubernetes API error (404): {0}")]
    NotFound(String),

    #[error("Kubernetes API error (400): {0}")]
    BadRequest(String),

    #[error("Kubernetes API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Kubernetes request failed: {0}")]
    Transport(String),
}

impl From<kube::Error> for ClusterError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(resp) => match resp.code {
                404 => ClusterError::NotFound(resp.message.clone()),
                400 => ClusterError::BadRequest(resp.message.clone()),
                code => ClusterError::Api {
                    code,
                    message: resp.message.clone(),
                },
            },
            other => ClusterError::Transport(other.to_string()),
        }
    }
}

#[async_trait]
pub trait ClusterApi: Send + Sync {
    async fn list_pods(
        &self,
        scope: &NamespaceScope,
        label_selector: Option<&str>,
    ) -> Result<Vec<Pod>, ClusterError>;

    async fn list_nodes(&self) -> Result<Vec<Node>, ClusterError>;

    async fn list_namespaces(&self) -> Result<Vec<Namespace>, ClusterError>;

    async fn list_services(&self, scope: &NamespaceScope) -> Result<Vec<Service>, ClusterError>;

    async fn list_deployments(&self, scope: &NamespaceScope) -> Result<Vec<Deployment>, ClusterError>;

    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod, ClusterError>;

    async fn pod_logs(
        &self,
        namespace: &str,
        name: &str,
        query: &LogQuery,
    ) -> Result<String, ClusterError>;
}

/// `Api::all` or `Api::namespaced` depending on the scope.
pub fn scoped_api<K>(client: &Client, scope: &NamespaceScope) -> Api<K>
where
    K: Resource<Scope = NamespaceResourceScope>,
    <K as Resource>::DynamicType: Default,
{
    match scope {
        NamespaceScope::All => Api::all(client.clone()),
        NamespaceScope::Named(ns) => Api::namespaced(client.clone(), ns),
    }
}

/// Live cluster access through a resolved kube-rs client.
#[derive(Clone)]
pub struct KubeClusterApi {
    client: Client,
}

impl KubeClusterApi {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ClusterApi for KubeClusterApi {
    async fn list_pods(
        &self,
        scope: &NamespaceScope,
        label_selector: Option<&str>,
    ) -> Result<Vec<Pod>, ClusterError> {
        Ok(fetch_namespaced::<Pod>(&self.client, scope, label_selector).await?)
    }

    async fn list_nodes(&self) -> Result<Vec<Node>, ClusterError> {
        Ok(fetch_cluster_scoped::<Node>(&self.client).await?)
    }

    async fn list_namespaces(&self) -> Result<Vec<Namespace>, ClusterError> {
        Ok(fetch_cluster_scoped::<Namespace>(&self.client).await?)
    }

    async fn list_services(&self, scope: &NamespaceScope) -> Result<Vec<Service>, ClusterError> {
        Ok(fetch_namespaced::<Service>(&self.client, scope, None).await?)
    }

    async fn list_deployments(&self, scope: &NamespaceScope) -> Result<Vec<Deployment>, ClusterError> {
        Ok(fetch_namespaced::<Deployment>(&self.client, scope, None).await?)
    }

    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod, ClusterError> {
        Ok(pods::fetch_pod_by_name_and_namespace(&self.client, namespace, name).await?)
    }

    async fn pod_logs(
        &self,
        namespace: &str,
        name: &str,
        query: &LogQuery,
    ) -> Result<String, ClusterError> {
        Ok(pods::fetch_pod_logs(&self.client, namespace, name, query).await?)
    }
}
