//! # Módulo HTTP
//!
//! Framing HTTP/1.1 desde cero, sin librerías de alto nivel:
//!
//! - Parsing del request line y headers
//! - Lectura del body según `Content-Length`
//! - Serialización de responses
//!
//! ## Lo que NO soporta
//!
//! - Conexiones persistentes (toda respuesta lleva `connection: close`)
//! - Chunked transfer encoding
//! - Pipelining
//!
//! ### Formato de Request
//!
//! ```text
//! GET /hello HTTP/1.1\r\n
//! User-Agent: curl/8.0\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! connection: close\r\n
//! content-type: text/plain; charset=utf-8\r\n
//! content-length: 3\r\n
//! \r\n
//! hi\n
//! ```

pub mod framing;   // Lectura de bytes del socket
pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use framing::{read_request, FrameError, MAX_HEADER_BYTES};
pub use request::{ParseError, Request};
pub use response::{Response, DEFAULT_CONTENT_TYPE};
pub use status::StatusCode;
