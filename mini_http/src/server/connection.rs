//! # Manejo de una Conexión
//! src/server/connection.rs
//!
//! Un worker es dueño de la conexión de principio a fin:
//!
//! ```text
//! leer headers → leer body → router → handler → serializar → escribir → cerrar
//! ```
//!
//! | Situación                          | Resultado                          |
//! |------------------------------------|------------------------------------|
//! | Request line/headers malformados   | 400 fijo                           |
//! | Sin binding para (method, target)  | 404 fijo                           |
//! | Handler devuelve `Err` o panic     | 500 con la descripción del error   |
//! | Headers > 64 KiB sin terminar      | se cierra sin responder            |
//! | Error de I/O leyendo               | se cierra sin responder            |
//!
//! El cierre lo hace el `Drop` del stream en el worker, una sola vez.

use crate::http::{read_request, FrameError, Response, StatusCode};
use crate::router::{Dispatch, Router};
use std::io::{Read, Write};
use tracing::{debug, error, warn};

/// Body del 400 fijo
pub const BAD_REQUEST_BODY: &str = "Malformed request\n";

/// Body del 404 fijo
pub const NOT_FOUND_BODY: &str = "Route not found\n";

/// Cómo terminó una conexión (solo para logging y tests)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionOutcome {
    /// Se escribió una respuesta completa con este código
    Served { status: u16 },

    /// Se cerró sin respuesta completa
    Aborted,
}

/// Atiende un request sobre `stream` y escribe exactamente una respuesta
///
/// Ningún error sale de acá: todo se traduce a una respuesta fija o a un
/// cierre silencioso.
pub fn handle_connection<S: Read + Write>(stream: &mut S, router: &Router) -> ConnectionOutcome {
    let request = match read_request(stream) {
        Ok(request) => request,
        Err(e) if e.is_protocol_error() => {
            debug!(error = %e, "rejecting malformed request");
            return send(stream, &bad_request());
        }
        Err(FrameError::HeadersTooLarge { limit }) => {
            warn!(limit, "header block too large, dropping connection");
            return ConnectionOutcome::Aborted;
        }
        Err(e) => {
            debug!(error = %e, "failed to read request");
            return ConnectionOutcome::Aborted;
        }
    };

    debug!(method = request.method(), target = request.target(), "dispatching");

    let response = match router.dispatch(&request) {
        Dispatch::Handled(response) => response,
        Dispatch::NotFound => not_found(),
        Dispatch::Failed(description) => {
            error!(
                method = request.method(),
                target = request.target(),
                error = %description,
                "handler failed"
            );
            internal_error(&description)
        }
    };

    send(stream, &response)
}

/// Escribe la respuesta completa; `write_all` reintenta escrituras parciales
fn send<S: Write>(stream: &mut S, response: &Response) -> ConnectionOutcome {
    let bytes = response.to_bytes();

    match stream.write_all(&bytes).and_then(|_| stream.flush()) {
        Ok(()) => ConnectionOutcome::Served {
            status: response.status(),
        },
        Err(e) => {
            debug!(error = %e, "write failed, closing connection");
            ConnectionOutcome::Aborted
        }
    }
}

pub fn bad_request() -> Response {
    Response::text(StatusCode::BadRequest, BAD_REQUEST_BODY)
}

pub fn not_found() -> Response {
    Response::text(StatusCode::NotFound, NOT_FOUND_BODY)
}

pub fn internal_error(description: &str) -> Response {
    Response::text(
        StatusCode::InternalServerError,
        &format!("Internal Server Error: {}\n", description),
    )
}
