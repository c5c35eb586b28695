//! # Comandos Básicos
//! src/commands/basic.rs
//!
//! - `GET /`: mensaje de bienvenida
//! - `GET /hello`: saludo con el User-Agent del cliente
//! - `POST /echo`: devuelve el body tal cual

use crate::http::{Request, Response, DEFAULT_CONTENT_TYPE};
use crate::router::HandlerResult;

pub const INDEX_BODY: &str = "It works! Try GET /hello or POST /echo\n";

/// Handler para `GET /`
pub fn index_handler(_req: &Request, res: &mut Response) -> HandlerResult {
    res.set_header("content-type", DEFAULT_CONTENT_TYPE);
    res.set_body(INDEX_BODY);
    Ok(())
}

/// Handler para `GET /hello`
///
/// # Ejemplo de response
/// ```text
/// Hello from Rust!
/// Your User-Agent: curl/8.0
/// ```
pub fn hello_handler(req: &Request, res: &mut Response) -> HandlerResult {
    let user_agent = req.header("user-agent").unwrap_or("(unknown)");

    res.set_header("content-type", DEFAULT_CONTENT_TYPE);
    res.set_body(format!("Hello from Rust!\nYour User-Agent: {}\n", user_agent));
    Ok(())
}

/// Handler para `POST /echo`
pub fn echo_handler(req: &Request, res: &mut Response) -> HandlerResult {
    res.set_header("content-type", DEFAULT_CONTENT_TYPE);
    res.set_body(req.body().to_vec());
    Ok(())
}
