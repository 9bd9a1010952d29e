//! Gemini `generateContent` over REST, either the direct API-key surface or
//! the Vertex AI express surface.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::core::client::llm::{trim_str, ReasoningModel};
use crate::domain::llm::dto::llm_messages::{
    ChatMessage, ModelDescriptor, ModelReply, ModelRequest, ToolCall,
};

pub const DIRECT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const VERTEX_BASE_URL: &str = "https://aiplatform.googleapis.com/v1/publishers/google";

pub struct GeminiClient {
    http: Client,
    model: String,
    api_key: String,
    use_vertex: bool,
}

impl GeminiClient {
    pub fn new(model: String, api_key: String, use_vertex: bool) -> Result<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;
        Ok(Self {
            http,
            model,
            api_key,
            use_vertex,
        })
    }

    pub fn endpoint(&self) -> String {
        let base = if self.use_vertex {
            VERTEX_BASE_URL
        } else {
            DIRECT_BASE_URL
        };
        format!(
            "{}/models/{}:generateContent",
            base,
            urlencoding::encode(&self.model)
        )
    }
}

#[async_trait]
impl ReasoningModel for GeminiClient {
    fn descriptor(&self) -> ModelDescriptor {
        ModelDescriptor {
            provider: if self.use_vertex { "gemini-vertex" } else { "gemini" }.to_string(),
            model: self.model.clone(),
            endpoint: self.endpoint(),
        }
    }

    async fn complete(&self, request: &ModelRequest) -> Result<ModelReply> {
        let url = self.endpoint();
        let body = build_request_body(request);

        // The express surface only accepts the key as a query parameter.
        let builder = if self.use_vertex {
            self.http.post(&url).query(&[("key", self.api_key.as_str())])
        } else {
            self.http.post(&url).header("x-goog-api-key", &self.api_key)
        };

        let resp = builder
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to call Gemini (url={}): {}", url, e))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Gemini returned {}: {} (url={})",
                status,
                trim_str(&text, 800),
                url
            ));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| anyhow!("Failed to decode Gemini response: {} (url={})", e, url))?;

        let reply = parse_response(&json)?;
        debug!("Gemini reply: {:?}", reply);
        Ok(reply)
    }
}

/// Translate the neutral conversation into `contents`. Consecutive tool
/// results share one user turn, as the API expects.
pub fn build_request_body(request: &ModelRequest) -> Value {
    let mut contents: Vec<Value> = Vec::new();
    let mut pending_responses: Vec<Value> = Vec::new();

    let flush = |contents: &mut Vec<Value>, pending: &mut Vec<Value>| {
        if !pending.is_empty() {
            contents.push(json!({"role": "user", "parts": std::mem::take(pending)}));
        }
    };

    for message in &request.messages {
        match message {
            ChatMessage::Tool { name, content, .. } => {
                pending_responses.push(json!({
                    "functionResponse": {"name": name, "response": as_object(content)}
                }));
            }
            ChatMessage::User { content } => {
                flush(&mut contents, &mut pending_responses);
                contents.push(json!({"role": "user", "parts": [{"text": content}]}));
            }
            ChatMessage::Assistant {
                content,
                tool_calls,
            } => {
                flush(&mut contents, &mut pending_responses);
                let mut parts: Vec<Value> = Vec::new();
                if let Some(text) = content.as_ref().filter(|t| !t.is_empty()) {
                    parts.push(json!({"text": text}));
                }
                for call in tool_calls {
                    parts.push(json!({
                        "functionCall": {"name": call.name, "args": as_object(&call.arguments)}
                    }));
                }
                contents.push(json!({"role": "model", "parts": parts}));
            }
        }
    }
    flush(&mut contents, &mut pending_responses);

    let mut body = json!({
        "systemInstruction": {"parts": [{"text": request.system}]},
        "contents": contents,
    });

    if !request.tools.is_empty() {
        let declarations: Vec<Value> = request
            .tools
            .iter()
            .map(|t| {
                let mut declaration = json!({
                    "name": t.name,
                    "description": t.description,
                });
                if has_properties(&t.parameters) {
                    declaration["parameters"] = t.parameters.clone();
                }
                declaration
            })
            .collect();
        body["tools"] = json!([{ "functionDeclarations": declarations }]);
    }

    body
}

/// Gemini rejects OBJECT schemas with an empty `properties` map.
fn has_properties(schema: &Value) -> bool {
    schema
        .get("properties")
        .and_then(Value::as_object)
        .map_or(false, |props| !props.is_empty())
}

/// Function-call args and responses must be JSON objects.
fn as_object(value: &Value) -> Value {
    match value {
        Value::Object(_) => value.clone(),
        Value::Null => Value::Object(Map::new()),
        other => json!({ "result": other }),
    }
}

pub fn parse_response(json: &Value) -> Result<ModelReply> {
    let candidate = json
        .get("candidates")
        .and_then(|c| c.get(0))
        .ok_or_else(|| {
            let reason = json
                .pointer("/promptFeedback/blockReason")
                .and_then(Value::as_str)
                .unwrap_or("no candidates returned");
            anyhow!("Gemini produced no answer: {}", reason)
        })?;

    let parts = candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let calls: Vec<ToolCall> = parts
        .iter()
        .filter_map(|p| p.get("functionCall"))
        .enumerate()
        .filter_map(|(i, call)| {
            let name = call.get("name")?.as_str()?.to_string();
            Some(ToolCall {
                id: format!("call_{}", i),
                name,
                arguments: call.get("args").cloned().unwrap_or(Value::Null),
            })
        })
        .collect();

    if !calls.is_empty() {
        return Ok(ModelReply::ToolCalls(calls));
    }

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("");

    if text.trim().is_empty() {
        let reason = candidate
            .get("finishReason")
            .and_then(Value::as_str)
            .unwrap_or("UNKNOWN");
        return Err(anyhow!("Gemini returned an empty answer (finishReason={})", reason));
    }

    Ok(ModelReply::FinalAnswer(text))
}
