//! Shared utilities for integration testing.

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use devmux::compiler::CompilerAddress;
use devmux::config::{CompilerConfig, FallbackConfig, ModuleSpec, ServerConfig};
use devmux::http::HttpServer;
use devmux::modules::{resolve_all, ConventionResolver};
use devmux::routing::RouteTable;

/// Start a mock backend that answers every request with a body
/// describing exactly what it received: `METHOD target|host=HOST`.
///
/// Lets tests assert the forwarded path (and Host header) byte-exactly.
pub async fn start_echo_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut head = Vec::new();
                        let mut chunk = [0u8; 1024];
                        loop {
                            match socket.read(&mut chunk).await {
                                Ok(0) => break,
                                Ok(n) => {
                                    head.extend_from_slice(&chunk[..n]);
                                    if head.windows(4).any(|w| w == b"\r\n\r\n") {
                                        break;
                                    }
                                }
                                Err(_) => return,
                            }
                        }

                        let head = String::from_utf8_lossy(&head);
                        let mut lines = head.lines();
                        let request_line = lines.next().unwrap_or_default();
                        let mut parts = request_line.split_whitespace();
                        let method = parts.next().unwrap_or_default();
                        let target = parts.next().unwrap_or_default();
                        let host = lines
                            .filter_map(|line| {
                                let (name, value) = line.split_once(':')?;
                                name.eq_ignore_ascii_case("host")
                                    .then(|| value.trim().to_string())
                            })
                            .next()
                            .unwrap_or_default();

                        let body = format!("{} {}|host={}", method, target, host);
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Assemble a server configuration for tests. The bind address and
/// port fields are unused by `spawn_front_end`, which binds port zero.
#[allow(dead_code)]
pub fn test_config(
    fallback: FallbackConfig,
    compiler_port: u16,
    module_specs: &[&str],
) -> ServerConfig {
    ServerConfig {
        bind_address: "127.0.0.1".to_string(),
        port: 0,
        context_path: None,
        module_path_prefix: None,
        fallback,
        compiler: CompilerConfig {
            connect_address: "127.0.0.1".to_string(),
            port: compiler_port,
            launch: None,
        },
        modules: module_specs.iter().map(|m| ModuleSpec::parse(m)).collect(),
    }
}

/// Resolve modules, build the route table, and run a front-end server
/// on an ephemeral port. Returns the address it serves on.
#[allow(dead_code)]
pub async fn spawn_front_end(config: ServerConfig) -> SocketAddr {
    let resolver = ConventionResolver::from_specs(&config.modules);
    let modules = resolve_all(&config.modules, &resolver).unwrap();
    let compiler = CompilerAddress {
        host: config.compiler.connect_address.clone(),
        port: config.compiler.port,
    };
    let table = RouteTable::build(&config, &modules, &compiler).unwrap();
    let server = HttpServer::new(&config, table);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener, std::future::pending()).await;
    });
    addr
}

/// HTTP client that talks straight to the front-end under test.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
}
