//! Chat session relay.
//!
//! # Data Flow
//! ```text
//! WebSocket text frame
//!     → session.rs (append user entry, status frame, provider call)
//!     → transcript.rs (context chosen by ContextPolicy)
//!     → reply frame (assistant text, `Error: ...`, or fallback)
//!
//! Session States:
//!     Connecting → Open → AwaitingReply → Open → ... → Closed
//! ```
//!
//! # Design Decisions
//! - One task per connection; transcripts are never shared
//! - The registry is the only cross-connection state, touched at open/close
//! - Provider failures become reply text and never end the session

pub mod registry;
pub mod session;
pub mod transcript;

pub use registry::{ConnectionRegistry, SessionGuard, SessionId};
pub use session::{ChatSession, RelaySettings, SessionState};
pub use transcript::Transcript;
