//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the demo services.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for a demo service process.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Which service this process runs.
    pub service: ServiceKind,

    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request limits.
    pub security: SecurityConfig,

    /// Cross-origin settings.
    pub cors: CorsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    pub users: UsersConfig,

    pub hello: HelloConfig,

    /// Chat relay and inference provider settings.
    pub chat: ChatConfig,
}

/// The service a process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceKind {
    /// Fixed JSON greetings and static files.
    #[default]
    Hello,
    /// Fruits API with `{name}` records.
    Fruits,
    /// Fruits API with `{name, color, weight}` records.
    FruitsDetailed,
    /// Users CRUD API.
    Users,
    /// WebSocket chat relay.
    Chat,
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ServiceKind::Hello => "hello",
            ServiceKind::Fruits => "fruits",
            ServiceKind::FruitsDetailed => "fruits-detailed",
            ServiceKind::Users => "users",
            ServiceKind::Chat => "chat",
        };
        f.write_str(name)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".to_string(),
        }
    }
}

/// Timeout configuration for HTTP handling.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    /// Does not apply to upgraded WebSocket connections.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Enable the CORS layer.
    pub enabled: bool,

    /// Allowed origins. Credentials are allowed, so wildcards are not accepted.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UsersConfig {
    /// Seed the store with two demo users (one inactive).
    pub seed_demo_data: bool,

    /// Page size when `limit` is not given.
    pub default_page_size: usize,

    /// Largest accepted `limit`.
    pub max_page_size: usize,
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            seed_demo_data: true,
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HelloConfig {
    /// Message returned by `GET /api/hello`.
    pub greeting: String,

    /// Directory served under `/static`.
    pub static_dir: String,
}

impl Default for HelloConfig {
    fn default() -> Self {
        Self {
            greeting: "Hello from the demo server!".to_string(),
            static_dir: "static".to_string(),
        }
    }
}

/// How much of the transcript is sent to the provider on each turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextPolicy {
    /// Every transcript entry, capped by `history_limit`.
    #[default]
    FullTranscript,
    /// Only the message that started the turn.
    LatestMessage,
}

/// Chat relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Title shown on the chat page.
    pub app_name: String,

    /// Base URL of the OpenAI-compatible inference API.
    pub api_base: String,

    /// Bearer credential. Normally supplied by `HUGGINGFACE_API_TOKEN`.
    #[serde(skip_serializing)]
    pub api_token: Option<String>,

    /// Model identifier. `MODEL_ID` overrides this.
    pub model: String,

    pub max_tokens: u32,

    pub temperature: f32,

    /// Upper bound on a single inference call in seconds.
    pub request_timeout_secs: u64,

    pub context_policy: ContextPolicy,

    /// Most recent transcript entries sent under `full_transcript` (0 = all).
    pub history_limit: usize,

    /// Frame sent before each reply.
    pub status_message: String,

    /// Reply sent when the provider's answer cannot be read.
    pub fallback_reply: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            app_name: "My ChatBot".to_string(),
            api_base: "https://router.huggingface.co/v1".to_string(),
            api_token: None,
            model: "deepseek-ai/DeepSeek-V3-0324".to_string(),
            max_tokens: 200,
            temperature: 0.7,
            request_timeout_secs: 60,
            context_policy: ContextPolicy::FullTranscript,
            history_limit: 0,
            status_message: "Bot is thinking...".to_string(),
            fallback_reply: "Sorry, I couldn't understand the model's response.".to_string(),
        }
    }
}
