//! Reverse proxy subsystem.
//!
//! # Data Flow
//! ```text
//! matched proxy route (carries its ProxyBinding)
//!     → forwarder.rs (strip prefix, Host policy, forwarding headers)
//!     → hyper client → target origin
//!     → response streamed back unmodified
//! ```
//!
//! # Design Decisions
//! - Bindings are plain immutable data computed at startup
//! - One shared client; per-request state lives on the stack
//! - Upstream failures map to a 502 at the dispatch layer, never a panic

pub mod binding;
pub mod forwarder;

pub use binding::{HostPolicy, ProxyBinding};
pub use forwarder::{Forwarder, ProxyError};
