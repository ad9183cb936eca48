//! Flow identity subsystem.
//!
//! # Data Flow
//! ```text
//! request / flow origin
//!     → FlowContext::new_flow() (id.rs generates a LogId)
//!     → passed down the call chain by value
//!     → nested boundaries call with_log_id() (keeps the existing id)
//!     → logger reads log_id() / environment() on every call
//! ```
//!
//! # Design Decisions
//! - A plain immutable struct instead of a dynamic key/value map
//! - Missing id is not an error; records are emitted untagged
//! - The bootstrap context is built explicitly, never at module load

pub mod flow;
pub mod id;

pub use flow::{with_log_id, Environment, FlowContext};
pub use id::{LogId, LOG_ID_LEN};
