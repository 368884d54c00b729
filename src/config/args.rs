//! Command-line interface.
//!
//! Arguments mirror the options of the original development workflow:
//! a fallback (static directory or upstream origin), optional path
//! prefixes, the compiler server coordinates, and the modules to serve.

use std::path::PathBuf;

use clap::Parser;

use crate::config::schema::{
    normalize_prefix, CompilerConfig, FallbackConfig, ModuleSpec, ServerConfig,
};
use crate::config::validation::{parse_compiler_port, validate, ValidationError};

/// Development front-end for incrementally compiled browser modules.
#[derive(Parser, Debug)]
#[command(name = "devmux")]
#[command(about = "Serves module stub scripts, proxies module requests to an incremental \
compiler server, and falls back to static files or an upstream origin", long_about = None)]
pub struct Args {
    /// Address to bind the listen socket to.
    #[arg(long, default_value = "127.0.0.1")]
    pub bind_address: String,

    /// TCP port for the front-end server.
    #[arg(long, default_value_t = 8888)]
    pub port: u16,

    /// Directory to serve as static files (mutually exclusive with --proxy-to).
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Origin (scheme, host, and optional port) to proxy unmatched requests to.
    #[arg(long)]
    pub proxy_to: Option<String>,

    /// Forward the original Host header to the --proxy-to origin instead of
    /// rewriting it.
    #[arg(long)]
    pub preserve_host: bool,

    /// Prefix to prepend to URLs when serving --base-dir.
    #[arg(long)]
    pub context_path: Option<String>,

    /// The path inside --context-path where modules are served.
    #[arg(long)]
    pub module_path_prefix: Option<String>,

    /// Host used to reach the compiler server.
    #[arg(long, default_value = "127.0.0.1")]
    pub compiler_address: String,

    /// TCP port for the compiler server, or "auto".
    #[arg(long, default_value = "9876")]
    pub compiler_port: String,

    /// Command used to launch the compiler server before routes are built.
    #[arg(long)]
    pub compiler_cmd: Option<String>,

    /// Module identifiers, optionally with an explicit output name
    /// (identifier=output).
    #[arg(required = true)]
    pub modules: Vec<String>,
}

/// Error assembling a configuration from arguments.
#[derive(Debug)]
pub enum ConfigError {
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Validation(errors) => {
                write!(f, "invalid configuration: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Args {
    /// Validate the arguments and assemble the immutable server
    /// configuration.
    ///
    /// Option combinations that cannot take effect are warned about and
    /// dropped, matching the behavior users of the original tooling
    /// expect; genuinely contradictory combinations are errors.
    pub fn into_config(self) -> Result<ServerConfig, ConfigError> {
        validate(&self).map_err(ConfigError::Validation)?;

        if self.preserve_host && self.proxy_to.is_none() {
            tracing::warn!("--preserve-host is only meaningful along with --proxy-to; ignoring");
        }

        let mut context_path = self.context_path;
        if context_path.is_some() && self.base_dir.is_none() {
            tracing::warn!("--context-path is only meaningful along with --base-dir; ignoring");
            context_path = None;
        }

        let fallback = match (self.base_dir, self.proxy_to) {
            (Some(base_dir), None) => FallbackConfig::Static { base_dir },
            (None, Some(origin)) => FallbackConfig::Proxy {
                origin,
                preserve_host: self.preserve_host,
            },
            // validate() rejected every other combination
            _ => unreachable!("fallback invariant enforced by validation"),
        };

        // validate() already proved the port parses
        let compiler_port = parse_compiler_port(&self.compiler_port).unwrap_or(0);

        Ok(ServerConfig {
            bind_address: self.bind_address,
            port: self.port,
            context_path: context_path.as_deref().and_then(normalize_prefix),
            module_path_prefix: self.module_path_prefix.as_deref().and_then(normalize_prefix),
            fallback,
            compiler: CompilerConfig {
                connect_address: self.compiler_address,
                port: compiler_port,
                launch: self.compiler_cmd,
            },
            modules: self.modules.iter().map(|m| ModuleSpec::parse(m)).collect(),
        })
    }
}
