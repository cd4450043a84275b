//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, trace span)
//!     → service routes: hello.rs | fruits.rs | users.rs | chat.rs
//!     → extract.rs (body/query/path parsing and validation)
//!     → error.rs (ApiError → JSON error response)
//! ```

pub mod chat;
pub mod error;
pub mod extract;
pub mod fruits;
pub mod hello;
pub mod middleware;
pub mod request;
pub mod server;
pub mod users;

pub use error::ApiError;
pub use request::X_REQUEST_ID;
pub use server::HttpServer;
