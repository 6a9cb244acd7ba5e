//! # Módulo HTTP
//!
//! Implementa el subconjunto de HTTP/1.x que necesita el servidor, sin
//! librerías de alto nivel:
//!
//! - Parsing incremental de requests (request line, headers, body)
//! - Lectura acotada desde un `ByteSource`
//! - Serialización de responses
//! - Códigos de estado
//!
//! Fuera de alcance: keep-alive, chunked transfer encoding, decodificación
//! de percent-encoding.
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path?query=value HTTP/1.1\r\n
//! Header-Name: Header-Value\r\n
//! \r\n
//! [body de content-length bytes]
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! content-type: text/html\r\n
//! content-length: 13\r\n
//! \r\n
//! <html></html>
//! ```

pub mod parser;    // Máquina de estados incremental
pub mod reader;    // Lectura acotada desde el transporte
pub mod request;   // Request parseado y parsers de línea
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use parser::{Limits, ParseState, RequestParser};
pub use reader::RequestReader;
pub use request::Request;
pub use response::Response;
pub use status::StatusCode;
