//! In-memory record stores.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → payload validated (crate::validation)
//!     → store operation under the store's lock
//!     → snapshot (cloned records) returned to the handler
//! ```
//!
//! # Design Decisions
//! - Stores are owned by a service instance and injected as router state
//! - Records keep insertion order; lookups are linear scans
//! - Locks are never held across an await point

pub mod fruits;
pub mod users;

pub use fruits::{BasicFruit, Fruit, FruitRecord, FruitStore};
pub use users::{ListFilter, NewUser, StoreError, User, UserStore, UserUpdate};
