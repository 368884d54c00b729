//! Incremental compiler server collaborator.
//!
//! The compiler server is an external process with an HTTP origin of
//! its own, serving freshly recompiled module artifacts under
//! `/<outputName>/...`. This module owns the two-phase startup the rest
//! of the system depends on: the compiler's address (its port may be
//! auto-assigned) must be fully resolved before the route table is
//! built, because module proxy bindings and stub scripts embed it.

use std::time::Duration;

use tokio::net::TcpStream;
use tokio::process::{Child, Command};

use crate::config::CompilerConfig;

/// How long to wait for the compiler server to accept connections.
const READY_TIMEOUT: Duration = Duration::from_secs(60);

/// Delay between readiness probes.
const PROBE_INTERVAL: Duration = Duration::from_millis(200);

/// The compiler server's resolved connect address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerAddress {
    /// Host the proxy and the stub script reach the compiler under.
    pub host: String,
    /// Resolved TCP port (never zero).
    pub port: u16,
}

impl std::fmt::Display for CompilerAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Error starting or reaching the compiler server.
#[derive(Debug, thiserror::Error)]
pub enum CompilerError {
    #[error("compiler launch command is empty")]
    EmptyCommand,

    #[error("failed to reserve a port for the compiler server: {0}")]
    PortReservation(std::io::Error),

    #[error("failed to spawn compiler server `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("compiler server at {address} did not become ready within {timeout:?}")]
    NotReady {
        address: CompilerAddress,
        timeout: Duration,
    },
}

/// Handle to the running compiler server.
///
/// When this process launched the compiler, the child handle is held
/// here so the compiler dies with the front-end.
#[derive(Debug)]
pub struct CompilerServer {
    address: CompilerAddress,
    child: Option<Child>,
}

impl CompilerServer {
    /// Start (or attach to) the compiler server and wait until it
    /// accepts connections.
    ///
    /// With a launch command configured, the command is spawned with
    /// `--port <resolved-port>` followed by the module identifiers; a
    /// configured port of zero is resolved to a free port first. With
    /// no launch command, the compiler is expected to already be
    /// running at the configured address, and only readiness is probed.
    pub async fn start(
        config: &CompilerConfig,
        module_identifiers: &[String],
    ) -> Result<Self, CompilerError> {
        let port = if config.port == 0 {
            reserve_port()?
        } else {
            config.port
        };
        let address = CompilerAddress {
            host: config.connect_address.clone(),
            port,
        };

        let child = match &config.launch {
            Some(command) => {
                tracing::info!(command = %command, port = port, "Launching compiler server");
                Some(spawn(command, port, module_identifiers)?)
            }
            None => {
                tracing::info!(address = %address, "Attaching to running compiler server");
                None
            }
        };

        wait_ready(&address).await?;
        tracing::info!(address = %address, "Compiler server ready");

        Ok(Self { address, child })
    }

    /// The resolved connect address.
    pub fn address(&self) -> &CompilerAddress {
        &self.address
    }

    /// Whether this process launched the compiler itself.
    pub fn is_managed(&self) -> bool {
        self.child.is_some()
    }
}

/// Reserve a currently-free TCP port by binding port zero and reading
/// back the assignment. The listener is dropped immediately; the
/// compiler binds the port itself moments later.
fn reserve_port() -> Result<u16, CompilerError> {
    let listener =
        std::net::TcpListener::bind(("127.0.0.1", 0)).map_err(CompilerError::PortReservation)?;
    let port = listener
        .local_addr()
        .map_err(CompilerError::PortReservation)?
        .port();
    Ok(port)
}

/// Spawn the launch command. Whitespace-split, no shell interpretation.
fn spawn(command: &str, port: u16, module_identifiers: &[String]) -> Result<Child, CompilerError> {
    let mut words = command.split_whitespace();
    let program = words.next().ok_or(CompilerError::EmptyCommand)?;
    Command::new(program)
        .args(words)
        .arg("--port")
        .arg(port.to_string())
        .args(module_identifiers)
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| CompilerError::Spawn {
            command: command.to_string(),
            source,
        })
}

/// Probe the compiler's listen socket until it accepts a connection.
async fn wait_ready(address: &CompilerAddress) -> Result<(), CompilerError> {
    let target = (address.host.as_str(), address.port);
    let probe = async {
        loop {
            match TcpStream::connect(target).await {
                Ok(_) => return,
                Err(_) => tokio::time::sleep(PROBE_INTERVAL).await,
            }
        }
    };
    tokio::time::timeout(READY_TIMEOUT, probe)
        .await
        .map_err(|_| CompilerError::NotReady {
            address: address.clone(),
            timeout: READY_TIMEOUT,
        })
}
