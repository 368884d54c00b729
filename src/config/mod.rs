//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! command line
//!     → args.rs (clap parse)
//!     → validation.rs (semantic checks, all errors reported)
//!     → schema.rs (ServerConfig: normalized, immutable)
//!     → consumed by compiler startup and the route table builder
//! ```
//!
//! # Design Decisions
//! - Config is immutable once assembled; changes require a restart
//! - Path prefixes are normalized before anything else sees them
//! - The base-dir XOR proxy-to invariant is made structural (an enum)
//!   so downstream code cannot observe an invalid combination

pub mod args;
pub mod schema;
pub mod validation;

pub use args::{Args, ConfigError};
pub use schema::{CompilerConfig, FallbackConfig, ModuleSpec, ServerConfig};
pub use validation::ValidationError;
