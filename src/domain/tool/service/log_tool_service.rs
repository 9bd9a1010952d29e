use tracing::debug;

use crate::core::client::cluster_api::{ClusterApi, ClusterError};
use crate::core::client::mappers::container_names;
use crate::domain::tool::dto::resource_records::PodLogs;
use crate::domain::tool::dto::tool_params::GetLogsParams;
use crate::domain::tool::dto::tool_result::ToolResult;
use crate::domain::tool::service::pod_tool_service::pod_not_found;
use crate::errors::ToolInvocationError;

pub const GET_LOGS: &str = "get_logs";

/// Fetch one container's log text. Filters are forwarded to the API server untouched.
pub async fn get_logs(cluster: &dyn ClusterApi, params: GetLogsParams) -> ToolResult<PodLogs> {
    get_logs_inner(cluster, params).await.into()
}

async fn get_logs_inner(cluster: &dyn ClusterApi, params: GetLogsParams) -> Result<PodLogs, ToolInvocationError> {
    let namespace = params.namespace().to_string();
    let pod_name = params.pod_name.as_str();

    let pod = match cluster.get_pod(&namespace, pod_name).await {
        Ok(pod) => pod,
        Err(ClusterError::NotFound(_)) => {
            return Err(ToolInvocationError::NotFound(pod_not_found(pod_name, &namespace)))
        }
        Err(e) => return Err(e.into()),
    };

    let names = container_names(&pod);
    let requested = params.container.as_deref().map(str::trim).filter(|c| !c.is_empty());
    let container = match requested {
        Some(c) if names.iter().any(|n| n == c) => Some(c.to_string()),
        Some(c) => {
            return Err(ToolInvocationError::NotFound(format!(
                "Container '{}' not found in pod '{}'. Available containers: {}",
                c,
                pod_name,
                names.join(", ")
            )))
        }
        None if names.len() > 1 => {
            return Err(ToolInvocationError::Rejected(format!(
                "Pod '{}' has multiple containers; specify one of: {}",
                pod_name,
                names.join(", ")
            )))
        }
        None => names.first().cloned(),
    };
    let label = container.clone().unwrap_or_else(|| pod_name.to_string());

    let query = params.log_query(container.clone());
    let text = match cluster.pod_logs(&namespace, pod_name, &query).await {
        Ok(text) => text,
        Err(ClusterError::NotFound(_)) => {
            return Err(ToolInvocationError::NotFound(pod_not_found(pod_name, &namespace)))
        }
        Err(ClusterError::BadRequest(msg)) => return Err(rejected_log_request(&msg, &label, pod_name)),
        Err(e) => return Err(e.into()),
    };

    if text.trim().is_empty() {
        return Err(no_logs_yet(&label, pod_name));
    }

    let line_count = text.lines().count();
    debug!("get_logs: {} line(s) from {}/{} [{}]", line_count, namespace, pod_name, label);

    Ok(PodLogs {
        log_text: text,
        pod: pod_name.to_string(),
        namespace,
        container,
        line_count,
        previous: params.previous,
        timestamps: params.timestamps,
        tail_lines: params.tail_lines,
        since_seconds: params.since_seconds,
    })
}

fn no_logs_yet(container: &str, pod: &str) -> ToolInvocationError {
    ToolInvocationError::Rejected(format!(
        "No logs yet for container '{}' in pod '{}'. The container may still be starting or has not written any output.",
        container, pod
    ))
}

/// Classify a 400 from the log endpoint into something the agent can act on.
fn rejected_log_request(message: &str, container: &str, pod: &str) -> ToolInvocationError {
    let lower = message.to_lowercase();
    if lower.contains("previous terminated container") {
        ToolInvocationError::Rejected(format!(
            "No previous terminated container '{}' found in pod '{}'; it has not restarted.",
            container, pod
        ))
    } else if lower.contains("waiting to start") || lower.contains("containercreating") {
        no_logs_yet(container, pod)
    } else {
        ToolInvocationError::Rejected(format!("Log request for pod '{}' was rejected: {}", pod, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::cluster_api::LogQuery;
    use crate::core::client::fake_cluster::{pod_json, FakeCluster};

    fn params(pod: &str) -> GetLogsParams {
        GetLogsParams {
            pod_name: pod.into(),
            namespace: None,
            container: None,
            previous: false,
            tail_lines: None,
            since_seconds: None,
            timestamps: false,
        }
    }

    fn cluster() -> FakeCluster {
        FakeCluster::default()
            .with_pod(pod_json("single", "default", "Running", &["app"]))
            .with_pod(pod_json("multi", "default", "Running", &["app", "sidecar"]))
            .with_pod(pod_json("fresh", "default", "Pending", &["app"]))
            .with_logs("default", "single", "app", false, "one\ntwo\nthree")
            .with_logs("default", "single", "app", true, "crashed: panic")
            .with_logs("default", "multi", "sidecar", false, "proxy ready")
    }

    #[tokio::test]
    async fn single_container_pod_needs_no_container_name() {
        let result = get_logs(&cluster(), params("single")).await;

        let logs = result.payload().expect("logs available");
        assert_eq!(logs.log_text, "one\ntwo\nthree");
        assert_eq!(logs.line_count, 3);
        assert_eq!(logs.container.as_deref(), Some("app"));
        assert_eq!(logs.namespace, "default");
    }

    #[tokio::test]
    async fn multi_container_pod_without_container_lists_the_choices() {
        let result = get_logs(&cluster(), params("multi")).await;

        let message = result.message().expect("error shape");
        assert!(message.contains("app"));
        assert!(message.contains("sidecar"));
    }

    #[tokio::test]
    async fn named_container_in_multi_container_pod() {
        let mut p = params("multi");
        p.container = Some("sidecar".into());

        let result = get_logs(&cluster(), p).await;

        assert_eq!(result.payload().map(|l| l.log_text.as_str()), Some("proxy ready"));
    }

    #[tokio::test]
    async fn unknown_container_lists_available_ones() {
        let mut p = params("multi");
        p.container = Some("db".into());

        let result = get_logs(&cluster(), p).await;

        assert_eq!(
            result.message(),
            Some("Container 'db' not found in pod 'multi'. Available containers: app, sidecar")
        );
    }

    #[tokio::test]
    async fn missing_pod_is_reported_by_name() {
        let result = get_logs(&cluster(), params("ghost")).await;
        assert_eq!(result.message(), Some("Pod 'ghost' not found in namespace 'default'"));
    }

    #[tokio::test]
    async fn empty_output_is_distinguished_from_failure() {
        let result = get_logs(&cluster(), params("fresh")).await;

        let message = result.message().expect("error shape");
        assert!(message.starts_with("No logs yet"));
    }

    #[tokio::test]
    async fn previous_instance_logs() {
        let mut p = params("single");
        p.previous = true;

        let result = get_logs(&cluster(), p).await;

        let logs = result.payload().unwrap();
        assert_eq!(logs.log_text, "crashed: panic");
        assert!(logs.previous);
    }

    #[tokio::test]
    async fn previous_without_a_restart_is_explained() {
        let mut p = params("fresh");
        p.previous = true;

        let result = get_logs(&cluster(), p).await;

        assert!(result.message().unwrap().starts_with("No previous terminated container"));
    }

    #[tokio::test]
    async fn filters_are_forwarded_untouched() {
        let cluster = cluster();
        let mut p = params("single");
        p.tail_lines = Some(2);
        p.since_seconds = Some(300);
        p.timestamps = true;

        let result = get_logs(&cluster, p).await;

        assert_eq!(result.payload().map(|l| l.log_text.as_str()), Some("two\nthree"));
        let queries = cluster.log_queries.lock().unwrap();
        assert_eq!(
            queries.last(),
            Some(&LogQuery {
                container: Some("app".into()),
                previous: false,
                tail_lines: Some(2),
                since_seconds: Some(300),
                timestamps: true,
            })
        );
    }

    #[test]
    fn waiting_container_is_treated_as_no_logs_yet() {
        let err = rejected_log_request(
            "container \"app\" in pod \"web\" is waiting to start: ContainerCreating",
            "app",
            "web",
        );
        assert!(err.to_string().starts_with("No logs yet"));
    }
}
