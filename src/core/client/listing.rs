//! Generic list calls shared by every resource kind the tools read.

use std::fmt::Debug;

use k8s_openapi::{ClusterResourceScope, NamespaceResourceScope};
use kube::api::ListParams;
use kube::{Api, Client, Resource};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::core::client::cluster_api::{scoped_api, NamespaceScope};

/// Every object of a cluster-scoped kind (nodes, namespaces).
pub async fn fetch_cluster_scoped<K>(client: &Client) -> Result<Vec<K>, kube::Error>
where
    K: Resource<Scope = ClusterResourceScope> + Clone + DeserializeOwned + Debug,
    <K as Resource>::DynamicType: Default,
{
    let api: Api<K> = Api::all(client.clone());
    let list = api.list(&ListParams::default()).await?;

    debug!(
        "Discovered {} {}(s)",
        list.items.len(),
        K::kind(&Default::default())
    );
    Ok(list.items)
}

/// Objects of a namespaced kind in one namespace or all of them, optionally
/// narrowed by a label selector such as "app=nginx".
pub async fn fetch_namespaced<K>(
    client: &Client,
    scope: &NamespaceScope,
    label_selector: Option<&str>,
) -> Result<Vec<K>, kube::Error>
where
    K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
    <K as Resource>::DynamicType: Default,
{
    let api: Api<K> = scoped_api(client, scope);
    let lp = match label_selector {
        Some(selector) => ListParams::default().labels(selector),
        None => ListParams::default(),
    };
    let list = api.list(&lp).await?;

    debug!(
        "Discovered {} {}(s) in scope '{}'",
        list.items.len(),
        K::kind(&Default::default()),
        scope
    );
    Ok(list.items)
}
