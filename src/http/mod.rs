//! HTTP surface of the front-end.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → dispatch (route table lookup, first match wins)
//!     → stub script | compiler proxy | upstream proxy | static files
//!     → response streamed to client
//! ```

pub mod server;

pub use server::{shutdown_signal, HttpServer};
