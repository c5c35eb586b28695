//! Errores del ciclo de vida del servidor.
//!
//! Los errores por request (parseo, I/O de una conexión, fallas de handler)
//! nunca llegan hasta acá: se resuelven dentro del manejo de la conexión.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// No se pudo hacer bind/listen; `run()` retorna sin lanzar workers
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] io::Error),

    /// `run()` solo puede llamarse una vez por servidor
    #[error("server was already started")]
    AlreadyStarted,
}

pub type Result<T> = std::result::Result<T, ServerError>;
