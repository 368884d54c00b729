//! devmux — a development-time HTTP front-end.
//!
//! Presents a single origin to a browser while multiplexing each
//! request across three backends:
//!
//! ```text
//!                      ┌──────────────────────────────────────────┐
//!                      │                 devmux                   │
//!                      │                                          │
//!   Browser request    │  ┌────────┐      ┌──────────────┐        │
//!   ───────────────────┼─▶│  http  │─────▶│  dispatcher  │        │
//!                      │  │ server │      │ (route table)│        │
//!                      │  └────────┘      └──────┬───────┘        │
//!                      │                         │                │
//!                      │        ┌────────────────┼─────────────┐  │
//!                      │        ▼                ▼             ▼  │
//!                      │  ┌───────────┐   ┌────────────┐  ┌─────────────┐
//!                      │  │ stub      │   │ compiler   │  │ fallback:   │
//!                      │  │ script    │   │ proxy      │  │ static dir  │
//!                      │  │ (rendered │   │ (strips    │  │ or upstream │
//!                      │  │ at start) │   │ prefixes)  │  │ proxy       │
//!                      │  └───────────┘   └────────────┘  └─────────────┘
//!                      └──────────────────────────────────────────┘
//! ```
//!
//! The route table is built once at startup — after the incremental
//! compiler server's address is resolved — and is immutable for the
//! lifetime of the process.

// Core subsystems
pub mod config;
pub mod http;
pub mod routing;

// Collaborators
pub mod compiler;
pub mod modules;
pub mod proxy;

// Cross-cutting concerns
pub mod observability;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use routing::RouteTable;
