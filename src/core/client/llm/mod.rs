//! HTTP clients for the two supported inference protocols.

pub mod gemini_client;
pub mod openai_compat_client;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::llm::dto::llm_messages::{ModelDescriptor, ModelReply, ModelRequest};

/// A configured reasoning backend: submit prompt + tool catalog, get back
/// either a final answer or tool-call requests.
#[async_trait]
pub trait ReasoningModel: Send + Sync {
    fn descriptor(&self) -> ModelDescriptor;

    async fn complete(&self, request: &ModelRequest) -> Result<ModelReply>;
}

/// Keep error bodies readable in logs.
pub(crate) fn trim_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let mut end = max_len;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...<truncated>", &s[..end])
    }
}
