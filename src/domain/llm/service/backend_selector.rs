//! Turns the raw `LLM_TYPE` family of settings into one immutable backend
//! choice. Runs once at startup; errors here abort the process.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::core::client::llm::gemini_client::GeminiClient;
use crate::core::client::llm::openai_compat_client::OpenAiCompatClient;
use crate::core::client::llm::ReasoningModel;
use crate::core::config::app_config::{parse_bool, LlmSettings};
use crate::errors::ConfigurationError;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-pro-exp";
const LM_STUDIO_ROUTE_PREFIX: &str = "lm_studio/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmType {
    Cloud,
    Local,
}

impl LlmType {
    pub fn as_code(&self) -> &'static str {
        match self {
            LlmType::Cloud => "cloud",
            LlmType::Local => "local",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "cloud" => Some(LlmType::Cloud),
            "local" => Some(LlmType::Local),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    Hosted {
        model_name: String,
        api_key: String,
        use_vertex: bool,
    },
    Local {
        base_url: String,
        model_name: String,
    },
}

impl BackendConfig {
    pub fn llm_type(&self) -> LlmType {
        match self {
            BackendConfig::Hosted { .. } => LlmType::Cloud,
            BackendConfig::Local { .. } => LlmType::Local,
        }
    }
}

/// Validate the settings for the selected mode. Fields of the other mode are ignored.
pub fn configure(settings: &LlmSettings) -> Result<BackendConfig, ConfigurationError> {
    let llm_type = match settings.llm_type.as_deref() {
        None => LlmType::Cloud,
        Some(raw) => LlmType::from_code(raw).ok_or_else(|| ConfigurationError::UnknownMode(raw.to_string()))?,
    };

    match llm_type {
        LlmType::Cloud => {
            let api_key = settings
                .google_api_key
                .clone()
                .ok_or(ConfigurationError::MissingField("GOOGLE_API_KEY"))?;
            let use_vertex = match settings.use_vertex_ai.as_deref() {
                None => false,
                Some(raw) => parse_bool(raw).ok_or_else(|| ConfigurationError::InvalidValue {
                    key: "GOOGLE_GENAI_USE_VERTEXAI",
                    reason: format!("expected true or false, got '{}'", raw),
                })?,
            };
            Ok(BackendConfig::Hosted {
                model_name: settings
                    .gemini_model
                    .clone()
                    .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                api_key,
                use_vertex,
            })
        }
        LlmType::Local => {
            let base_url = settings
                .lm_studio_api_base
                .clone()
                .ok_or(ConfigurationError::MissingField("LM_STUDIO_API_BASE"))?;
            validate_base_url(&base_url)?;

            let raw_model = settings
                .lm_studio_model
                .as_deref()
                .ok_or(ConfigurationError::MissingField("LM_STUDIO_MODEL"))?;
            let model_name = raw_model
                .strip_prefix(LM_STUDIO_ROUTE_PREFIX)
                .unwrap_or(raw_model)
                .trim()
                .to_string();
            if model_name.is_empty() {
                return Err(ConfigurationError::InvalidValue {
                    key: "LM_STUDIO_MODEL",
                    reason: "model identifier is empty".into(),
                });
            }

            Ok(BackendConfig::Local { base_url, model_name })
        }
    }
}

/// Syntactic check only; reachability is discovered at inference time.
fn validate_base_url(raw: &str) -> Result<(), ConfigurationError> {
    let invalid = |reason: &str| ConfigurationError::InvalidValue {
        key: "LM_STUDIO_API_BASE",
        reason: format!("{} ('{}')", reason, raw),
    };

    let uri: http::Uri = raw.parse().map_err(|_| invalid("not a valid URL"))?;
    match uri.scheme_str() {
        Some("http") | Some("https") => {}
        _ => return Err(invalid("scheme must be http or https")),
    }
    if uri.host().map_or(true, str::is_empty) {
        return Err(invalid("missing host"));
    }
    Ok(())
}

/// Construct the model handle for an already-validated configuration.
pub fn build_model(config: BackendConfig) -> Result<Arc<dyn ReasoningModel>> {
    let model: Arc<dyn ReasoningModel> = match config {
        BackendConfig::Hosted {
            model_name,
            api_key,
            use_vertex,
        } => Arc::new(GeminiClient::new(model_name, api_key, use_vertex)?),
        BackendConfig::Local { base_url, model_name } => {
            Arc::new(OpenAiCompatClient::new(base_url, model_name)?)
        }
    };

    let descriptor = model.descriptor();
    info!(
        "Reasoning backend: {} model={} endpoint={}",
        descriptor.provider, descriptor.model, descriptor.endpoint
    );
    Ok(model)
}
