//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! front-end server. All types derive Serde traits so a resolved
//! configuration can be logged or dumped for debugging.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the front-end server.
///
/// Built from command-line arguments, validated, then immutable for the
/// lifetime of the process. Changing any of these requires a restart.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Address to bind the listen socket to.
    pub bind_address: String,

    /// TCP port for the front-end server.
    pub port: u16,

    /// Outer path segment scoping every route served by this instance.
    /// Stored normalized (no leading or trailing separator).
    pub context_path: Option<String>,

    /// Inner path segment scoping only module routes (stub + compiler
    /// proxy), not the fallback. Stored normalized.
    pub module_path_prefix: Option<String>,

    /// Where requests that match no module route end up.
    pub fallback: FallbackConfig,

    /// The incremental compiler server collaborator.
    pub compiler: CompilerConfig,

    /// Modules to serve, in the order they were supplied.
    pub modules: Vec<ModuleSpec>,
}

/// Fallback content handler selection.
///
/// Exactly one variant is active per server instance; the mutual
/// exclusion of `--base-dir` and `--proxy-to` is enforced during
/// validation, so this enum makes the invariant structural.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub enum FallbackConfig {
    /// Serve files from a local directory.
    Static {
        /// Root directory for static content.
        base_dir: PathBuf,
    },
    /// Forward unmatched requests to an external origin.
    Proxy {
        /// Target origin: scheme, host, and optional port. No path.
        origin: String,
        /// Forward the original Host header instead of rewriting it to
        /// the target origin.
        preserve_host: bool,
    },
}

/// The compiler server collaborator.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompilerConfig {
    /// Host the proxy (and the browser, via the stub script) uses to
    /// reach the compiler server.
    pub connect_address: String,

    /// Compiler server port. Zero means auto-assign, which is only
    /// possible when this process launches the compiler itself.
    pub port: u16,

    /// Command used to launch the compiler server, if this process is
    /// responsible for starting it.
    pub launch: Option<String>,
}

/// A module as supplied on the command line: a compiler-facing
/// identifier, optionally paired with an explicit output name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModuleSpec {
    /// Compiler-facing module identifier.
    pub identifier: String,

    /// Explicit URL-facing output name, overriding the naming
    /// convention.
    pub output_name: Option<String>,
}

impl ModuleSpec {
    /// Parse an `identifier` or `identifier=output` argument.
    pub fn parse(arg: &str) -> Self {
        match arg.split_once('=') {
            Some((id, out)) => Self {
                identifier: id.to_string(),
                output_name: Some(out.to_string()),
            },
            None => Self {
                identifier: arg.to_string(),
                output_name: None,
            },
        }
    }
}

/// Normalize a configured path prefix: strip leading and trailing
/// separators, collapse an empty result to `None`.
pub fn normalize_prefix(raw: &str) -> Option<String> {
    let trimmed = raw.trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
