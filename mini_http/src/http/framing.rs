//! # Lectura de Requests desde el socket
//! src/http/framing.rs
//!
//! Acumula bytes hasta encontrar `\r\n\r\n`, parsea el bloque de headers y
//! luego lee el body hasta la longitud declarada.
//!
//! - Si el bloque sin terminar supera [`MAX_HEADER_BYTES`] la conexión se
//!   aborta sin respuesta.
//! - Si el peer cierra antes de completar el body, el body corto se entrega
//!   tal cual (lectura indulgente, no cumple el RFC al 100%).

use super::request::{ParseError, Request};
use std::io::{ErrorKind, Read};
use thiserror::Error;
use tracing::debug;

/// Límite del bloque de headers sin terminar
pub const MAX_HEADER_BYTES: usize = 64 * 1024;

const READ_CHUNK: usize = 4096;
const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Errores al leer un request del socket
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// El peer cerró antes de terminar los headers
    #[error("connection closed before end of headers")]
    ConnectionClosed,

    #[error("header block exceeds {limit} bytes")]
    HeadersTooLarge { limit: usize },

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl FrameError {
    /// Solo los errores de protocolo se contestan (400); el resto aborta
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, FrameError::Parse(_))
    }
}

/// Lee un request completo (headers + body)
pub fn read_request<R: Read>(reader: &mut R) -> Result<Request, FrameError> {
    let (head, leftover) = read_head(reader)?;

    let mut request = Request::parse(&head)?;
    let declared = request.content_length()?;

    let body = read_body(reader, leftover, declared)?;
    if body.len() < declared {
        debug!(declared, received = body.len(), "peer closed before full body");
    }
    request.set_body(body);

    Ok(request)
}

/// Lee hasta el terminador de headers
///
/// Retorna el bloque de headers (incluye el `\r\n` de la última línea) y los
/// bytes que ya llegaron después del terminador.
fn read_head<R: Read>(reader: &mut R) -> Result<(Vec<u8>, Vec<u8>), FrameError> {
    let mut buffer = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];
    // Desde dónde buscar el terminador en la próxima vuelta
    let mut search_from = 0;

    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => return Err(FrameError::ConnectionClosed),
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        buffer.extend_from_slice(&chunk[..n]);

        if let Some(pos) = find_terminator(&buffer[search_from..]) {
            let end = search_from + pos;
            let leftover = buffer.split_off(end + HEADER_TERMINATOR.len());
            // Conservar el CRLF de la última línea de header
            buffer.truncate(end + 2);
            return Ok((buffer, leftover));
        }

        if buffer.len() > MAX_HEADER_BYTES {
            return Err(FrameError::HeadersTooLarge {
                limit: MAX_HEADER_BYTES,
            });
        }

        // El terminador podría quedar partido entre dos lecturas
        search_from = buffer.len().saturating_sub(HEADER_TERMINATOR.len() - 1);
    }
}

/// Completa el body hasta `declared` bytes o hasta que el peer cierre
fn read_body<R: Read>(
    reader: &mut R,
    mut body: Vec<u8>,
    declared: usize,
) -> Result<Vec<u8>, FrameError> {
    body.truncate(declared);
    // No reservar a ciegas lo que diga el cliente
    body.reserve(declared.saturating_sub(body.len()).min(MAX_HEADER_BYTES));

    let mut chunk = [0u8; READ_CHUNK];
    while body.len() < declared {
        let want = (declared - body.len()).min(READ_CHUNK);
        match reader.read(&mut chunk[..want]) {
            Ok(0) => break,
            Ok(n) => body.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(body)
}

fn find_terminator(haystack: &[u8]) -> Option<usize> {
    haystack
        .windows(HEADER_TERMINATOR.len())
        .position(|window| window == HEADER_TERMINATOR)
}
