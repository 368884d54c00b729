//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via tracing, initialized once at startup
//! - Request IDs are generated and propagated by tower-http middleware
//!   in the HTTP layer, so every log line of a request can be correlated

pub mod logging;
