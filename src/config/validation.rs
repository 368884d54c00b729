//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (clap handles syntactic)
//! - Enforce the base-dir XOR proxy-to invariant
//! - Reject origins the forwarder could not bind to
//! - Detect option combinations that can never take effect
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function over the raw arguments
//! - Runs before any collaborator is started or socket is opened

use crate::config::args::Args;
use crate::proxy::{HostPolicy, ProxyBinding};

/// A single semantic violation in the supplied arguments.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("--base-dir and --proxy-to are mutually exclusive")]
    FallbackConflict,

    #[error("one of --base-dir or --proxy-to must be specified")]
    FallbackMissing,

    #[error("invalid --proxy-to origin `{origin}`: {reason}")]
    InvalidOrigin { origin: String, reason: String },

    #[error("--compiler-port must be an integer or \"auto\"")]
    InvalidCompilerPort,

    #[error("--compiler-port auto requires --compiler-cmd")]
    AutoPortRequiresLaunch,

    #[error("at least one module must be supplied")]
    NoModules,
}

/// Check the raw arguments for semantic violations.
///
/// Every violation is reported; none of them is recoverable, so the
/// caller aborts startup before any listener is opened.
pub fn validate(args: &Args) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match (&args.base_dir, &args.proxy_to) {
        (Some(_), Some(_)) => errors.push(ValidationError::FallbackConflict),
        (None, None) => errors.push(ValidationError::FallbackMissing),
        _ => {}
    }

    if let Some(origin) = &args.proxy_to {
        // The binding parser applies the same rules the forwarder will
        // rely on at runtime, so a passing origin is known-forwardable.
        if let Err(e) = ProxyBinding::from_origin(origin, None, HostPolicy::Rewrite) {
            errors.push(ValidationError::InvalidOrigin {
                origin: origin.clone(),
                reason: e.to_string(),
            });
        }
    }

    match parse_compiler_port(&args.compiler_port) {
        Some(0) if args.compiler_cmd.is_none() => {
            errors.push(ValidationError::AutoPortRequiresLaunch);
        }
        Some(_) => {}
        None => errors.push(ValidationError::InvalidCompilerPort),
    }

    if args.modules.is_empty() {
        errors.push(ValidationError::NoModules);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parse the `--compiler-port` argument: a port number, or `auto`
/// (mapped to zero) to let the launched compiler pick one.
pub fn parse_compiler_port(raw: &str) -> Option<u16> {
    if raw == "auto" {
        Some(0)
    } else {
        raw.parse().ok()
    }
}
