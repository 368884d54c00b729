use clap::Parser;
use tokio::net::TcpListener;

use devmux::compiler::CompilerServer;
use devmux::config::Args;
use devmux::http::{shutdown_signal, HttpServer};
use devmux::modules::{resolve_all, ConventionResolver};
use devmux::observability;
use devmux::routing::RouteTable;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::logging::init();

    tracing::info!("devmux v0.1.0 starting");

    let config = Args::parse().into_config()?;

    tracing::info!(
        bind_address = %config.bind_address,
        port = config.port,
        modules = config.modules.len(),
        "Configuration loaded"
    );

    // Two-phase startup: the compiler server must be up, with its
    // (possibly auto-assigned) port resolved, before the route table
    // is built — module proxy bindings and stub scripts embed it.
    let identifiers: Vec<String> = config
        .modules
        .iter()
        .map(|m| m.identifier.clone())
        .collect();
    let compiler = CompilerServer::start(&config.compiler, &identifiers).await?;

    let resolver = ConventionResolver::from_specs(&config.modules);
    let modules = resolve_all(&config.modules, &resolver)?;
    for module in &modules {
        tracing::info!(
            identifier = %module.identifier,
            output_name = %module.output_name,
            "Module resolved"
        );
    }

    let table = RouteTable::build(&config, &modules, compiler.address())?;
    tracing::info!(routes = table.routes().len(), "Route table built");

    let listener = TcpListener::bind((config.bind_address.as_str(), config.port)).await?;
    let server = HttpServer::new(&config, table);
    server.run(listener, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
