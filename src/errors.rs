use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

use crate::core::client::cluster_api::ClusterError;
use crate::core::client::credential_sources::{CredentialSourceKind, SourceFailure};

/// One credential source that was tried and why it could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAttempt {
    pub source: CredentialSourceKind,
    pub failure: SourceFailure,
}

/// No credential source yielded a usable cluster configuration.
#[derive(Debug, Clone, Error)]
#[error("no usable Kubernetes credential found; tried: {}", format_attempts(.attempts))]
pub struct ConnectionError {
    pub attempts: Vec<SourceAttempt>,
}

fn format_attempts(attempts: &[SourceAttempt]) -> String {
    attempts
        .iter()
        .map(|a| format!("{} ({})", a.source, a.failure))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Invalid or missing reasoning-backend settings. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("unknown LLM_TYPE '{0}' (expected 'cloud' or 'local')")]
    UnknownMode(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Per-call tool failure. Always folded into the error shape of a tool result.
#[derive(Debug, Error)]
pub enum ToolInvocationError {
    #[error("Unknown tool '{0}'")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: &'static str, reason: String },

    #[error("{0}")]
    NotFound(String),

    /// A precondition the agent can fix by retrying with other arguments.
    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    Cluster(#[from] ClusterError),

    #[error("Cluster connection unavailable: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Tool {0} aborted unexpectedly")]
    Panicked(String),
}

/// Failures of the HTTP surface itself. Tool failures never reach this type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Body parsing error: {0}")]
    BodyParsingError(String),

    #[error("Reasoning backend error: {0}")]
    Backend(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            AppError::BodyParsingError(_) => StatusCode::BAD_REQUEST,
            AppError::Backend(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({
            "message": self.to_string()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_error_lists_every_attempt_in_order() {
        let err = ConnectionError {
            attempts: vec![
                SourceAttempt {
                    source: CredentialSourceKind::ExplicitPath,
                    failure: SourceFailure::NotProvided,
                },
                SourceAttempt {
                    source: CredentialSourceKind::DefaultPath,
                    failure: SourceFailure::FileMissing("/nope/config".into()),
                },
            ],
        };

        let msg = err.to_string();
        let explicit = msg.find("explicit path").expect("explicit path listed");
        let default = msg.find("default location").expect("default location listed");
        assert!(explicit < default);
        assert!(msg.contains("/nope/config"));
    }

    #[test]
    fn backend_failures_map_to_bad_gateway() {
        let resp = AppError::Backend("Gemini returned 503".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn tool_errors_render_their_message_verbatim() {
        let err = ToolInvocationError::NotFound("Pod 'x' not found in namespace 'y'".into());
        assert_eq!(err.to_string(), "Pod 'x' not found in namespace 'y'");

        let err = ToolInvocationError::from(ClusterError::Api {
            code: 403,
            message: "forbidden".into(),
        });
        assert_eq!(err.to_string(), "Kubernetes API error (403): forbidden");
    }
}
