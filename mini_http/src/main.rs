//! # mini_http - Entry Point
//! src/main.rs
//!
//! Binario de demo: parsea la CLI, instala el subscriber de logs, registra
//! las rutas de ejemplo y queda bloqueado sirviendo.
//!
//! El nivel de log se controla con `RUST_LOG` (default: `info`).

use mini_http::commands;
use mini_http::config::Config;
use mini_http::server::Server;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = Config::from_args();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_thread_names(true)
        .init();

    config.validate()?;

    let mut server = Server::new(config);
    commands::register_demo_routes(&mut server);

    // Bloquea hasta stop() o hasta que falle el bind
    server.run()?;

    Ok(())
}
