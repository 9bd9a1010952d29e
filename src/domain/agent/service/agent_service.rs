//! Minimal reasoning loop: ask the model, run the tools it asks for, feed
//! the results back, stop at a final answer or the step limit.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::domain::agent::dto::agent_dto::{AgentAnswer, ToolCallRecord};
use crate::domain::llm::dto::llm_messages::{ChatMessage, ModelReply, ModelRequest};
use crate::domain::tool::tool_registry::ToolRegistry;

pub struct AgentService {
    registry: Arc<ToolRegistry>,
    max_steps: usize,
}

impl AgentService {
    pub fn new(registry: Arc<ToolRegistry>, max_steps: usize) -> Self {
        Self {
            registry,
            max_steps: max_steps.max(1),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub async fn run(&self, query: &str) -> Result<AgentAnswer> {
        let run_id = Uuid::new_v4();
        let span = info_span!("agent_run", %run_id);
        self.run_inner(run_id, query).instrument(span).await
    }

    async fn run_inner(&self, run_id: Uuid, query: &str) -> Result<AgentAnswer> {
        let registry = self.registry.as_ref();
        let mut messages = vec![ChatMessage::user(query)];
        let mut records = Vec::new();

        info!("Agent query received ({} chars)", query.len());

        for step in 1..=self.max_steps {
            let request = ModelRequest {
                system: registry.instruction().to_string(),
                messages: messages.clone(),
                tools: registry.catalog().to_vec(),
            };

            let calls = match registry.model().complete(&request).await? {
                ModelReply::FinalAnswer(answer) => {
                    info!("Agent answered after {} step(s), {} tool call(s)", step, records.len());
                    return Ok(AgentAnswer {
                        run_id,
                        answer,
                        steps: step,
                        tool_calls: records,
                        answered_at: Utc::now(),
                    });
                }
                ModelReply::ToolCalls(calls) => calls,
            };

            debug!(
                "step {}: model requested {:?}",
                step,
                calls.iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
            );

            // Tools are read-only, so calls from one step run concurrently.
            let results = join_all(
                calls
                    .iter()
                    .map(|call| registry.invoke(&call.name, call.arguments.clone())),
            )
            .await;

            messages.push(ChatMessage::Assistant {
                content: None,
                tool_calls: calls.clone(),
            });
            for (call, result) in calls.into_iter().zip(results) {
                records.push(ToolCallRecord {
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                    status: result.status().to_string(),
                });
                messages.push(ChatMessage::Tool {
                    call_id: call.id,
                    name: call.name,
                    content: serde_json::to_value(&result)?,
                });
            }
        }

        Err(anyhow!(
            "Agent did not reach an answer within {} steps",
            self.max_steps
        ))
    }
}
