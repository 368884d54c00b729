//! Module descriptors and stub scripts.
//!
//! # Data Flow
//! ```text
//! configured module specs
//!     → descriptor.rs (resolve URL-facing output names, once)
//!     → stub.rs (render per-module bootstrap script, once)
//!     → route table builder (one exact + one prefix route per module)
//! ```

pub mod descriptor;
pub mod stub;

pub use descriptor::{resolve_all, ConventionResolver, Module, ModuleError, ModuleResolver};
pub use stub::StubScript;
