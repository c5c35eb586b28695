//! # mini_http
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo para embeber en una aplicación: un request por
//! conexión, despacho por (method, path) exactos y un pool fijo de workers.
//!
//! ## Arquitectura
//!
//! - `http`: framing HTTP/1.1 (parsing, lectura del body, serialización)
//! - `router`: tabla ordenada de bindings, el primero que coincide gana
//! - `server`: accept loop, cola de conexiones, workers y ciclo de vida
//! - `config`: puerto, host y cantidad de workers
//! - `commands`: handlers de demo (`/`, `/hello`, `/echo`)
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use mini_http::config::Config;
//! use mini_http::server::Server;
//!
//! let mut server = Server::new(Config::new(8080).with_workers(4));
//! server.register("GET", "/ping", |_req, res| {
//!     res.set_body("pong\n");
//!     Ok(())
//! });
//!
//! let handle = server.handle();
//! std::thread::spawn(move || {
//!     std::thread::sleep(std::time::Duration::from_secs(10));
//!     handle.stop();
//! });
//!
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod http;
pub mod router;
pub mod server;

pub use config::Config;
pub use error::ServerError;
pub use http::{Request, Response, StatusCode};
pub use router::{HandlerError, HandlerResult, Router};
pub use server::{Server, ServerHandle};
