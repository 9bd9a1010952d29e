use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::core::client::cluster_api::{LogQuery, NamespaceScope};
use crate::errors::ToolInvocationError;

pub const DEFAULT_NAMESPACE: &str = "default";

/// Decode and validate raw tool arguments. `null` is treated as `{}`.
pub fn parse_args<P>(tool: &'static str, args: Value) -> Result<P, ToolInvocationError>
where
    P: DeserializeOwned + Validate,
{
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };

    let params: P = serde_json::from_value(args).map_err(|e| ToolInvocationError::InvalidArguments {
        tool,
        reason: e.to_string(),
    })?;
    params
        .validate()
        .map_err(|e| ToolInvocationError::InvalidArguments {
            tool,
            reason: e.to_string(),
        })?;
    Ok(params)
}

fn scope_or(
    tool: &'static str,
    namespace: Option<&str>,
    fallback: &str,
) -> Result<NamespaceScope, ToolInvocationError> {
    NamespaceScope::parse(namespace.unwrap_or(fallback)).ok_or_else(|| {
        ToolInvocationError::InvalidArguments {
            tool,
            reason: "namespace must not be empty".into(),
        }
    })
}

/// Namespace-scoped list tools: services, deployments.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ListScopedParams {
    /// Namespace name, or "all" (any casing) for every namespace. Defaults to "all".
    pub namespace: Option<String>,
}

impl ListScopedParams {
    pub fn scope(&self, tool: &'static str) -> Result<NamespaceScope, ToolInvocationError> {
        scope_or(tool, self.namespace.as_deref(), NamespaceScope::ALL)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ListPodsParams {
    pub namespace: Option<String>,
    /// Kubernetes label selector such as "app=nginx". Blank means no selector.
    pub label_selector: Option<String>,
}

impl ListPodsParams {
    pub fn scope(&self, tool: &'static str) -> Result<NamespaceScope, ToolInvocationError> {
        scope_or(tool, self.namespace.as_deref(), NamespaceScope::ALL)
    }

    pub fn label_selector(&self) -> Option<&str> {
        self.label_selector
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DescribePodParams {
    #[validate(length(min = 1))]
    pub name: String,
    pub namespace: Option<String>,
}

impl DescribePodParams {
    pub fn namespace(&self) -> &str {
        non_empty_or_default(self.namespace.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GetLogsParams {
    #[validate(length(min = 1))]
    pub pod_name: String,
    pub namespace: Option<String>,
    /// Required only when the pod runs more than one container.
    pub container: Option<String>,
    /// Read the most recently terminated instance instead of the running one.
    #[serde(default)]
    pub previous: bool,
    #[validate(range(min = 1))]
    pub tail_lines: Option<i64>,
    #[validate(range(min = 1))]
    pub since_seconds: Option<i64>,
    #[serde(default)]
    pub timestamps: bool,
}

impl GetLogsParams {
    pub fn namespace(&self) -> &str {
        non_empty_or_default(self.namespace.as_deref())
    }

    pub fn log_query(&self, container: Option<String>) -> LogQuery {
        LogQuery {
            container,
            previous: self.previous,
            tail_lines: self.tail_lines,
            since_seconds: self.since_seconds,
            timestamps: self.timestamps,
        }
    }
}

/// Tools without arguments still accept (and ignore) an object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NoParams {}

fn non_empty_or_default(ns: Option<&str>) -> &str {
    match ns.map(str::trim) {
        Some(ns) if !ns.is_empty() => ns,
        _ => DEFAULT_NAMESPACE,
    }
}
