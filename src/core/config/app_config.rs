use std::path::PathBuf;

use anyhow::{anyhow, Result};
use validator::Validate;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_AGENT_STEPS: usize = 8;
pub const KUBECONFIG_ENV: &str = "KUBECONFIG";

/// Raw reasoning-backend settings, exactly as found in the environment.
///
/// Interpretation (which fields are required, defaults) belongs to the
/// backend selector; this struct only trims and carries the values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LlmSettings {
    pub llm_type: Option<String>,
    pub google_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub use_vertex_ai: Option<String>,
    pub lm_studio_api_base: Option<String>,
    pub lm_studio_model: Option<String>,
}

/// Inputs for the credential-source chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterSettings {
    /// Path handed over by the hosting process (`KUBEAGENT_KUBECONFIG`).
    pub explicit_kubeconfig: Option<PathBuf>,
    /// Value of `KUBECONFIG`, captured at startup.
    pub kubeconfig_env: Option<String>,
    /// Value of `KUBERNETES_SERVICE_HOST`, used to detect in-cluster execution.
    pub service_host: Option<String>,
    /// Conventional `~/.kube/config`.
    pub default_kubeconfig: Option<PathBuf>,
    pub eager_connect: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ServerSettings {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    #[validate(range(min = 1, max = 64))]
    pub max_agent_steps: usize,
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub llm: LlmSettings,
    pub cluster: ClusterSettings,
    pub server: ServerSettings,
}

impl AppConfig {
    /// Snapshot the process environment. Called once from `main`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| normalize(lookup(key));

        let llm = LlmSettings {
            llm_type: get("LLM_TYPE"),
            google_api_key: get("GOOGLE_API_KEY"),
            gemini_model: get("GEMINI_MODEL"),
            use_vertex_ai: get("GOOGLE_GENAI_USE_VERTEXAI"),
            lm_studio_api_base: get("LM_STUDIO_API_BASE"),
            lm_studio_model: get("LM_STUDIO_MODEL"),
        };

        let cluster = ClusterSettings {
            explicit_kubeconfig: get("KUBEAGENT_KUBECONFIG").map(PathBuf::from),
            kubeconfig_env: get(KUBECONFIG_ENV),
            service_host: get("KUBERNETES_SERVICE_HOST"),
            default_kubeconfig: dirs::home_dir().map(|h| h.join(".kube").join("config")),
            eager_connect: parse_flag("KUBEAGENT_EAGER_CONNECT", get("KUBEAGENT_EAGER_CONNECT"))?
                .unwrap_or(false),
        };

        let server = ServerSettings {
            host: get("KUBEAGENT_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_number("KUBEAGENT_PORT", get("KUBEAGENT_PORT"))?.unwrap_or(DEFAULT_PORT),
            max_agent_steps: parse_number("KUBEAGENT_MAX_AGENT_STEPS", get("KUBEAGENT_MAX_AGENT_STEPS"))?
                .unwrap_or(DEFAULT_MAX_AGENT_STEPS),
            log_dir: get("KUBEAGENT_LOG_DIR").map(PathBuf::from),
        };
        server
            .validate()
            .map_err(|e| anyhow!("Invalid server settings: {}", e))?;

        Ok(Self { llm, cluster, server })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn normalize(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: Option<String>) -> Result<Option<T>> {
    raw.map(|s| {
        s.parse::<T>()
            .map_err(|_| anyhow!("{} must be a number, got '{}'", key, s))
    })
    .transpose()
}

/// Accepts the usual spellings of a boolean switch.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_flag(key: &str, raw: Option<String>) -> Result<Option<bool>> {
    raw.map(|s| parse_bool(&s).ok_or_else(|| anyhow!("{} must be true or false, got '{}'", key, s)))
        .transpose()
}
