use serde::Serialize;

use crate::errors::ConnectionError;

#[derive(Debug, Serialize)]
pub struct SourceAttemptDto {
    pub source: String,
    pub failure: String,
}

/// Outcome of the credential chain: the winning source, or every failed attempt.
#[derive(Debug, Serialize)]
pub struct ConnectionReport {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attempts: Vec<SourceAttemptDto>,
}

impl ConnectionReport {
    pub fn connected(source: Option<String>) -> Self {
        Self {
            connected: true,
            source,
            attempts: Vec::new(),
        }
    }

    pub fn failed(err: &ConnectionError) -> Self {
        Self {
            connected: false,
            source: None,
            attempts: err
                .attempts
                .iter()
                .map(|a| SourceAttemptDto {
                    source: a.source.to_string(),
                    failure: a.failure.to_string(),
                })
                .collect(),
        }
    }
}
