//! Minimal HTTP demo services: hello/static, fruits, users and a WebSocket
//! chat relay in front of a hosted inference API.

pub mod config;
pub mod http;
pub mod inference;
pub mod lifecycle;
pub mod observability;
pub mod relay;
pub mod store;
pub mod validation;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
