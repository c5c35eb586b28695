//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser del bloque de headers (todo lo que viene antes de `\r\n\r\n`).
//! La lectura de bytes del socket vive en [`crate::http::framing`].
//!
//! ## Formato
//!
//! ```text
//! POST /echo HTTP/1.1\r\n
//! Host: localhost:8080\r\n
//! Content-Length: 4\r\n
//! \r\n
//! ping
//! ```
//!
//! 1. **Request Line**: `METHOD TARGET VERSION`, separados por espacios
//! 2. **Headers**: `Name: Value`, el nombre se guarda en minúsculas
//! 3. **Empty Line**: fin de los headers
//! 4. **Body**: tantos bytes como diga `Content-Length` (0 si no viene)

use std::collections::HashMap;
use thiserror::Error;

/// Request HTTP parseado
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// Método tal cual llegó (`GET`, `POST`, ...)
    method: String,

    /// Target crudo, sin decodificar (path + query)
    target: String,

    /// Versión tal cual llegó (ej: "HTTP/1.1")
    version: String,

    /// Headers con nombre en minúsculas; si se repite un nombre gana el último
    headers: HashMap<String, String>,

    body: Vec<u8>,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// La request line no tiene terminador o tiene menos de 3 tokens
    #[error("malformed request line")]
    MalformedRequestLine,

    /// `Content-Length` presente pero no es un entero sin signo
    #[error("invalid content-length: {0}")]
    InvalidContentLength(String),
}

impl Request {
    /// Construye un request a mano (útil en tests de handlers)
    pub fn new(method: &str, target: &str) -> Self {
        Self {
            method: method.to_string(),
            target: target.to_string(),
            version: "HTTP/1.1".to_string(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Parsea el bloque de headers (sin el `\r\n\r\n` final, aunque se tolera)
    ///
    /// El body queda vacío; lo llena el lector una vez conocido `content_length()`.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use mini_http::http::Request;
    ///
    /// let request = Request::parse(b"GET /hello HTTP/1.1\r\nUser-Agent: curl\r\n").unwrap();
    ///
    /// assert_eq!(request.method(), "GET");
    /// assert_eq!(request.target(), "/hello");
    /// assert_eq!(request.header("user-agent"), Some("curl"));
    /// ```
    pub fn parse(head: &[u8]) -> Result<Self, ParseError> {
        let text = String::from_utf8_lossy(head);

        // Sin terminador no hay request line completa
        let line_end = text.find("\r\n").ok_or(ParseError::MalformedRequestLine)?;
        let (method, target, version) = Self::parse_request_line(&text[..line_end])?;

        let headers = Self::parse_headers(&text[line_end + 2..]);

        Ok(Request {
            method,
            target,
            version,
            headers,
            body: Vec::new(),
        })
    }

    /// Formato: `METHOD TARGET VERSION`; tokens extra se ignoran
    fn parse_request_line(line: &str) -> Result<(String, String, String), ParseError> {
        let mut parts = line.split_whitespace();

        match (parts.next(), parts.next(), parts.next()) {
            (Some(method), Some(target), Some(version)) => {
                Ok((method.to_string(), target.to_string(), version.to_string()))
            }
            _ => Err(ParseError::MalformedRequestLine),
        }
    }

    /// Cada header tiene formato `Name: Value`. Las líneas sin `:` se ignoran.
    fn parse_headers(block: &str) -> HashMap<String, String> {
        let mut headers = HashMap::new();

        for line in block.split("\r\n") {
            // La línea vacía marca el fin de los headers
            if line.is_empty() {
                break;
            }

            if let Some((name, value)) = line.split_once(':') {
                headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
            }
        }

        headers
    }

    /// Longitud declarada del body (0 si no hay `Content-Length`)
    pub fn content_length(&self) -> Result<usize, ParseError> {
        match self.headers.get("content-length") {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| ParseError::InvalidContentLength(raw.clone())),
            None => Ok(0),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Busca un header sin importar mayúsculas/minúsculas
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|s| s.as_str())
    }

    /// Agrega o reemplaza un header (nombre normalizado a minúsculas)
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        self
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body como String, si es UTF-8 válido
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub(crate) fn set_body(&mut self, body: Vec<u8>) {
        self.body = body;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_get() {
        let request = Request::parse(b"GET / HTTP/1.1\r\n\r\n").unwrap();

        assert_eq!(request.method(), "GET");
        assert_eq!(request.target(), "/");
        assert_eq!(request.version(), "HTTP/1.1");
        assert!(request.headers().is_empty());
        assert!(request.body().is_empty());
    }

    #[test]
    fn test_target_is_not_decoded() {
        let request = Request::parse(b"GET /a%20b?x=1&y=2 HTTP/1.1\r\n").unwrap();
        assert_eq!(request.target(), "/a%20b?x=1&y=2");
    }

    #[test]
    fn test_headers_lowercased_and_trimmed() {
        let raw = b"GET / HTTP/1.1\r\nHost:   localhost:8080  \r\nUser-Agent: test\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.headers().get("host"), Some(&"localhost:8080".to_string()));
        assert_eq!(request.header("User-Agent"), Some("test"));
    }

    #[test]
    fn test_repeated_header_last_wins() {
        let raw = b"GET / HTTP/1.1\r\nX-Tag: one\r\nx-tag: two\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.header("x-tag"), Some("two"));
    }

    #[test]
    fn test_colonless_header_ignored() {
        let raw = b"GET / HTTP/1.1\r\ngarbage line\r\nHost: a\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.header("host"), Some("a"));
    }

    #[test]
    fn test_empty_line_ends_headers() {
        let raw = b"GET / HTTP/1.1\r\nA: 1\r\n\r\nB: 2\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.header("a"), Some("1"));
        assert_eq!(request.header("b"), None);
    }

    #[test]
    fn test_value_keeps_later_colons() {
        let request = Request::parse(b"GET / HTTP/1.1\r\nHost: localhost:8080\r\n").unwrap();
        assert_eq!(request.header("host"), Some("localhost:8080"));
    }

    #[test]
    fn test_too_few_tokens() {
        for raw in [&b"GET\r\n\r\n"[..], b"GET /\r\n\r\n", b"\r\n\r\n", b"   \r\n"] {
            assert_eq!(Request::parse(raw).unwrap_err(), ParseError::MalformedRequestLine);
        }
    }

    #[test]
    fn test_missing_line_terminator() {
        let result = Request::parse(b"GET / HTTP/1.1");
        assert_eq!(result.unwrap_err(), ParseError::MalformedRequestLine);
    }

    #[test]
    fn test_extra_tokens_ignored() {
        let request = Request::parse(b"GET / HTTP/1.1 trailing\r\n").unwrap();
        assert_eq!(request.version(), "HTTP/1.1");
    }

    #[test]
    fn test_content_length() {
        let request = Request::parse(b"POST /echo HTTP/1.1\r\nContent-Length: 4\r\n").unwrap();
        assert_eq!(request.content_length(), Ok(4));

        let request = Request::parse(b"GET / HTTP/1.1\r\n").unwrap();
        assert_eq!(request.content_length(), Ok(0));
    }

    #[test]
    fn test_invalid_content_length() {
        let request = Request::parse(b"POST / HTTP/1.1\r\nContent-Length: -1\r\n").unwrap();
        assert_eq!(
            request.content_length(),
            Err(ParseError::InvalidContentLength("-1".to_string()))
        );
    }

    #[test]
    fn test_body_string() {
        let request = Request::new("POST", "/echo").with_body(b"hola".to_vec());
        assert_eq!(request.body_string(), Some("hola".to_string()));

        let request = Request::new("POST", "/echo").with_body(vec![0xFF, 0xFE]);
        assert_eq!(request.body_string(), None);
    }
}
