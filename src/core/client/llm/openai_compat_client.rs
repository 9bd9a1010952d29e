//! OpenAI-style chat completions, as served by LM Studio and similar local runtimes.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::core::client::llm::{trim_str, ReasoningModel};
use crate::domain::llm::dto::llm_messages::{
    ChatMessage, ModelDescriptor, ModelReply, ModelRequest, ToolCall,
};

pub struct OpenAiCompatClient {
    http: Client,
    base_url: String,
    model: String,
}

impl OpenAiCompatClient {
    pub fn new(base_url: String, model: String) -> Result<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;
        Ok(Self {
            http,
            base_url,
            model,
        })
    }

    pub fn endpoint(&self) -> String {
        chat_completions_url(&self.base_url)
    }
}

pub fn chat_completions_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

#[async_trait]
impl ReasoningModel for OpenAiCompatClient {
    fn descriptor(&self) -> ModelDescriptor {
        ModelDescriptor {
            provider: "openai-compatible".to_string(),
            model: self.model.clone(),
            endpoint: self.endpoint(),
        }
    }

    async fn complete(&self, request: &ModelRequest) -> Result<ModelReply> {
        let url = self.endpoint();
        let body = build_request_body(&self.model, request);

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to call local model server (url={}): {}", url, e))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Local model server returned {}: {} (url={})",
                status,
                trim_str(&text, 800),
                url
            ));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| anyhow!("Failed to decode local model response: {} (url={})", e, url))?;

        let reply = parse_response(&json)?;
        debug!("Local model reply: {:?}", reply);
        Ok(reply)
    }
}

pub fn build_request_body(model: &str, request: &ModelRequest) -> Value {
    let mut messages = vec![json!({"role": "system", "content": request.system})];

    for message in &request.messages {
        messages.push(match message {
            ChatMessage::User { content } => json!({"role": "user", "content": content}),
            ChatMessage::Assistant {
                content,
                tool_calls,
            } => {
                let mut m = json!({"role": "assistant", "content": content});
                if !tool_calls.is_empty() {
                    m["tool_calls"] = tool_calls
                        .iter()
                        .map(|c| {
                            json!({
                                "id": c.id,
                                "type": "function",
                                "function": {"name": c.name, "arguments": c.arguments.to_string()},
                            })
                        })
                        .collect();
                }
                m
            }
            ChatMessage::Tool {
                call_id, content, ..
            } => json!({"role": "tool", "tool_call_id": call_id, "content": content.to_string()}),
        });
    }

    let mut body = json!({
        "model": model,
        "messages": messages,
        "stream": false,
    });

    if !request.tools.is_empty() {
        body["tools"] = request
            .tools
            .iter()
            .map(|t| {
                json!({
                    "type": "function",
                    "function": {
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters,
                    },
                })
            })
            .collect();
        body["tool_choice"] = json!("auto");
    }

    body
}

pub fn parse_response(json: &Value) -> Result<ModelReply> {
    let message = json
        .pointer("/choices/0/message")
        .ok_or_else(|| anyhow!("Local model response has no choices: {}", trim_str(&json.to_string(), 400)))?;

    let calls: Vec<ToolCall> = message
        .get("tool_calls")
        .and_then(Value::as_array)
        .map(|calls| {
            calls
                .iter()
                .enumerate()
                .filter_map(|(i, call)| {
                    let function = call.get("function")?;
                    let name = function.get("name")?.as_str()?.to_string();
                    Some(ToolCall {
                        id: call
                            .get("id")
                            .and_then(Value::as_str)
                            .map(str::to_string)
                            .unwrap_or_else(|| format!("call_{}", i)),
                        name,
                        arguments: decode_arguments(function.get("arguments")),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    if !calls.is_empty() {
        return Ok(ModelReply::ToolCalls(calls));
    }

    match message.get("content").and_then(Value::as_str) {
        Some(text) if !text.trim().is_empty() => Ok(ModelReply::FinalAnswer(text.to_string())),
        _ => Err(anyhow!("Local model returned neither text nor tool calls")),
    }
}

/// Arguments normally arrive as a JSON-encoded string. Anything that does not
/// decode is passed through so the tool rejects it with a readable message.
fn decode_arguments(raw: Option<&Value>) -> Value {
    match raw {
        Some(Value::String(s)) if s.trim().is_empty() => Value::Null,
        Some(Value::String(s)) => serde_json::from_str(s).unwrap_or_else(|_| Value::String(s.clone())),
        Some(other) => other.clone(),
        None => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tool::dto::tool_spec::ToolSpec;

    #[test]
    fn url_building_tolerates_trailing_slash_and_full_path() {
        assert_eq!(
            chat_completions_url("http://127.0.0.1:1234/v1/"),
            "http://127.0.0.1:1234/v1/chat/completions"
        );
        assert_eq!(
            chat_completions_url("http://host/v1/chat/completions"),
            "http://host/v1/chat/completions"
        );
    }

    #[test]
    fn request_body_encodes_history_and_tools() {
        let request = ModelRequest {
            system: "sys".into(),
            messages: vec![
                ChatMessage::user("list namespaces"),
                ChatMessage::Assistant {
                    content: None,
                    tool_calls: vec![ToolCall {
                        id: "abc".into(),
                        name: "get_namespaces".into(),
                        arguments: json!({}),
                    }],
                },
                ChatMessage::Tool {
                    call_id: "abc".into(),
                    name: "get_namespaces".into(),
                    content: json!({"status": "success", "payload": [{"name": "default"}]}),
                },
            ],
            tools: vec![ToolSpec {
                name: "get_namespaces".into(),
                description: "List namespaces".into(),
                parameters: json!({"type": "object", "properties": {}}),
            }],
        };

        let body = build_request_body("qwen3-1.7b", &request);

        assert_eq!(body["model"], "qwen3-1.7b");
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[2]["tool_calls"][0]["function"]["arguments"], "{}");
        assert_eq!(messages[3]["role"], "tool");
        assert_eq!(messages[3]["tool_call_id"], "abc");
        let echoed: Value = serde_json::from_str(messages[3]["content"].as_str().unwrap()).unwrap();
        assert_eq!(echoed["status"], "success");
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tool_choice"], "auto");
    }

    #[test]
    fn tool_call_arguments_are_decoded() {
        let reply = parse_response(&json!({
            "choices": [{"message": {"role": "assistant", "content": null, "tool_calls": [
                {"id": "c1", "type": "function", "function": {"name": "describe_pod", "arguments": "{\"name\":\"web\"}"}}
            ]}}]
        }))
        .unwrap();

        assert_eq!(
            reply,
            ModelReply::ToolCalls(vec![ToolCall {
                id: "c1".into(),
                name: "describe_pod".into(),
                arguments: json!({"name": "web"}),
            }])
        );
    }

    #[test]
    fn plain_content_is_the_final_answer() {
        let reply = parse_response(&json!({
            "choices": [{"message": {"role": "assistant", "content": "Two nodes are Ready."}}]
        }))
        .unwrap();
        assert_eq!(reply, ModelReply::FinalAnswer("Two nodes are Ready.".into()));
    }

    #[test]
    fn empty_choices_are_an_error() {
        assert!(parse_response(&json!({"choices": []})).is_err());
    }
}
