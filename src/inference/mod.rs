//! Inference provider capability.
//!
//! # Data Flow
//! ```text
//! relay session (transcript context)
//!     → InferenceProvider::generate
//!         → HostedClient: POST {api_base}/chat/completions
//!         → Unconfigured: fails immediately
//!     → reply text | InferenceError
//! ```
//!
//! # Design Decisions
//! - The relay depends only on the trait; vendors plug in behind it
//! - Every provider failure is a value, never a panic
//! - A missing credential selects `Unconfigured` instead of failing startup

pub mod client;
pub mod provider;
pub mod types;

pub use client::HostedClient;
pub use provider::{from_config, InferenceProvider, Unconfigured};
pub use types::{ChatMessage, InferenceError, Role};
