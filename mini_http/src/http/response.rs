//! # Construcción de Respuestas HTTP
//!
//! Los handlers reciben una `Response` por defecto (200 OK, sin headers, sin
//! body) y la modifican. Al serializar siempre se fuerzan `connection: close`
//! y un `content-length` recalculado desde el body real.
//!
//! ## Formato de salida
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! connection: close\r\n
//! content-type: text/plain; charset=utf-8\r\n
//! content-length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use mini_http::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::NotFound)
//!     .with_body("Route not found\n");
//!
//! let bytes = response.to_bytes();
//! assert!(bytes.starts_with(b"HTTP/1.1 404 Not Found\r\n"));
//! ```

use super::StatusCode;
use std::collections::HashMap;

/// `content-type` que se inyecta si el handler no puso uno
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Respuesta HTTP modificable por el handler
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    reason: String,

    /// Nombres en minúsculas; `HashMap` para evitar duplicados
    headers: HashMap<String, String>,

    body: Vec<u8>,
}

impl Default for Response {
    /// 200 OK, sin headers ni body
    fn default() -> Self {
        Self::new(StatusCode::Ok)
    }
}

impl Response {
    /// Crea una respuesta con el código y su reason phrase estándar
    pub fn new(status: StatusCode) -> Self {
        Self {
            status: status.as_u16(),
            reason: status.reason_phrase().to_string(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Respuesta de texto plano con código y body dados
    pub fn text(status: StatusCode, body: &str) -> Self {
        Self::new(status)
            .with_header("content-type", DEFAULT_CONTENT_TYPE)
            .with_body(body)
    }

    /// Agrega un header (si ya existe se sobrescribe)
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.as_bytes().to_vec();
        self
    }

    /// Cambia el código y usa su reason phrase estándar
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status.as_u16();
        self.reason = status.reason_phrase().to_string();
    }

    /// Código y reason arbitrarios (ej: 201 "Created")
    pub fn set_status_line(&mut self, status: u16, reason: &str) {
        self.status = status;
        self.reason = reason.to_string();
    }

    /// Agrega o reemplaza un header; el nombre se guarda en minúsculas
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers
            .insert(name.trim().to_ascii_lowercase(), value.to_string());
    }

    /// Acceso directo al mapa de headers
    pub fn headers_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.headers
    }

    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = body.into();
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Busca un header sin importar mayúsculas/minúsculas
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// - `connection: close` y `content-length` siempre se escriben, pisando
    ///   lo que haya puesto el handler (sin importar mayúsculas)
    /// - `content-type` solo se inyecta si falta
    /// - un reason vacío se reemplaza por el estándar del código
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(128 + self.body.len());

        // 1. Status line
        let reason = if self.reason.is_empty() {
            StatusCode::from_u16(self.status)
                .map(|s| s.reason_phrase())
                .unwrap_or("OK")
        } else {
            self.reason.as_str()
        };
        result.extend_from_slice(format!("HTTP/1.1 {} {}\r\n", self.status, reason).as_bytes());

        // 2. Headers inyectados
        let content_type = self.header("content-type").unwrap_or(DEFAULT_CONTENT_TYPE);
        result.extend_from_slice(b"connection: close\r\n");
        result.extend_from_slice(format!("content-type: {}\r\n", content_type).as_bytes());
        result.extend_from_slice(format!("content-length: {}\r\n", self.body.len()).as_bytes());

        // 3. Headers del handler
        for (name, value) in &self.headers {
            if is_managed_header(name) {
                continue;
            }
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }

        // 4. Línea vacía + body
        result.extend_from_slice(b"\r\n");
        result.extend_from_slice(&self.body);

        result
    }
}

fn is_managed_header(name: &str) -> bool {
    ["connection", "content-type", "content-length"]
        .iter()
        .any(|managed| name.eq_ignore_ascii_case(managed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_text(response: &Response) -> String {
        String::from_utf8(response.to_bytes()).unwrap()
    }

    #[test]
    fn test_default_response() {
        let response = Response::default();
        assert_eq!(response.status(), 200);
        assert_eq!(response.reason(), "OK");
        assert!(response.headers().is_empty());
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_to_bytes_layout() {
        let response = Response::new(StatusCode::Ok).with_body("Test");
        let text = to_text(&response);

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("connection: close\r\n"));
        assert!(text.contains("content-type: text/plain; charset=utf-8\r\n"));
        assert!(text.contains("content-length: 4\r\n"));
        assert!(text.ends_with("\r\n\r\nTest"));
    }

    #[test]
    fn test_content_length_overrides_handler_value() {
        let mut response = Response::default();
        response.set_header("Content-Length", "999");
        response.headers_mut().insert("CONTENT-LENGTH".to_string(), "7".to_string());
        response.set_body("hello");

        let text = to_text(&response);
        assert_eq!(text.matches("content-length").count(), 1);
        assert!(!text.to_ascii_lowercase().contains("content-length: 999"));
        assert!(!text.to_ascii_lowercase().contains("content-length: 7"));
        assert!(text.contains("content-length: 5\r\n"));
    }

    #[test]
    fn test_connection_always_close() {
        let response = Response::default().with_header("Connection", "keep-alive");
        let text = to_text(&response);

        assert!(text.contains("connection: close\r\n"));
        assert!(!text.contains("keep-alive"));
    }

    #[test]
    fn test_content_type_kept_when_set() {
        let response = Response::default().with_header("Content-Type", "application/json");
        let text = to_text(&response);

        assert!(text.contains("content-type: application/json\r\n"));
        assert!(!text.contains(DEFAULT_CONTENT_TYPE));
    }

    #[test]
    fn test_custom_headers_written() {
        let response = Response::default().with_header("X-Custom", "value");
        assert!(to_text(&response).contains("x-custom: value\r\n"));
    }

    #[test]
    fn test_custom_status_line() {
        let mut response = Response::default();
        response.set_status_line(201, "Created");
        assert!(to_text(&response).starts_with("HTTP/1.1 201 Created\r\n"));

        response.set_status_line(404, "");
        assert!(to_text(&response).starts_with("HTTP/1.1 404 Not Found\r\n"));

        response.set_status_line(299, "");
        assert!(to_text(&response).starts_with("HTTP/1.1 299 OK\r\n"));
    }

    #[test]
    fn test_set_status_uses_standard_reason() {
        let mut response = Response::default();
        response.set_status(StatusCode::NotFound);
        assert_eq!(response.status(), 404);
        assert_eq!(response.reason(), "Not Found");
        assert!(to_text(&response).starts_with("HTTP/1.1 404 Not Found\r\n"));

        response.set_status(StatusCode::InternalServerError);
        assert!(to_text(&response).starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
    }

    #[test]
    fn test_binary_body_length() {
        let mut response = Response::default();
        response.set_body(vec![0x00, 0x01, 0x02, 0xFF]);

        let bytes = response.to_bytes();
        assert!(bytes.ends_with(&[0x00, 0x01, 0x02, 0xFF]));
        assert!(String::from_utf8_lossy(&bytes).contains("content-length: 4\r\n"));
    }

    #[test]
    fn test_empty_body_response() {
        let text = to_text(&Response::default());
        assert!(text.contains("content-length: 0\r\n"));
        assert!(text.ends_with("\r\n\r\n"));
    }
}
