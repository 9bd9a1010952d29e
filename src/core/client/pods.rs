use kube::api::LogParams;
use kube::{Api, Client};
use tracing::debug;

use crate::core::client::cluster_api::LogQuery;
use crate::core::client::kube_resources::Pod;

/// Fetch a single pod by name and namespace
pub async fn fetch_pod_by_name_and_namespace(
    client: &Client,
    namespace: &str,
    pod_name: &str,
) -> Result<Pod, kube::Error> {
    let pods: Api<Pod> = Api::namespaced(client.clone(), namespace);
    let pod = pods.get(pod_name).await?;

    debug!("Fetched pod: {}/{}", namespace, pod_name);
    Ok(pod)
}

/// Fetch container logs; tail and time-window filters are applied by the API server
pub async fn fetch_pod_logs(
    client: &Client,
    namespace: &str,
    pod_name: &str,
    query: &LogQuery,
) -> Result<String, kube::Error> {
    let pods: Api<Pod> = Api::namespaced(client.clone(), namespace);
    let lp = LogParams {
        container: query.container.clone(),
        previous: query.previous,
        tail_lines: query.tail_lines,
        since_seconds: query.since_seconds,
        timestamps: query.timestamps,
        ..LogParams::default()
    };
    let logs = pods.logs(pod_name, &lp).await?;

    debug!(
        "Fetched {} byte(s) of logs from {}/{} (container={:?}, previous={})",
        logs.len(),
        namespace,
        pod_name,
        query.container,
        query.previous
    );
    Ok(logs)
}
