//! # Construcción de Respuestas HTTP
//!
//! API para armar una respuesta y serializarla a bytes para el socket.
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 404 Not Found\r\n
//! server: goserv/0.1.0\r\n
//! content-length: 16\r\n
//! content-type: text/html\r\n
//! \r\n
//! <html>...</html>
//! ```
//!
//! `content-length` y `server` los calcula siempre el builder al
//! serializar; cualquier valor que haya puesto el caller se ignora.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use goserv::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_protocol("HTTP/1.0")
//!     .with_header("Content-Type", "text/plain")
//!     .with_body("Hello");
//!
//! let bytes = response.to_bytes();
//! assert!(bytes.starts_with(b"HTTP/1.0 200 OK\r\n"));
//! ```

use super::StatusCode;
use std::collections::HashMap;

/// Valor del header `server`
pub const SERVER_NAME: &str = concat!("goserv/", env!("CARGO_PKG_VERSION"));

/// Protocolo usado cuando no se conoce el del request
pub const DEFAULT_PROTOCOL: &str = "HTTP/1.1";

const CONTENT_LENGTH: &str = "content-length";
const SERVER: &str = "server";

/// Representa una respuesta HTTP completa
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Protocolo de la status line (eco del request)
    protocol: String,

    /// Código de estado (200, 404, etc.)
    status: u16,

    /// Texto de razón que acompaña al código
    reason: String,

    /// Headers con el nombre en minúsculas
    headers: HashMap<String, String>,

    /// Cuerpo de la respuesta, se emite tal cual
    body: Vec<u8>,
}

impl Response {
    /// Crea una respuesta con un código conocido y protocolo `HTTP/1.1`
    pub fn new(status: StatusCode) -> Self {
        Self::with_status(status.as_u16(), status.reason_phrase())
    }

    /// Crea una respuesta con código y razón arbitrarios
    ///
    /// # Ejemplo
    /// ```
    /// use goserv::http::Response;
    ///
    /// let response = Response::with_status(418, "I'm a teapot");
    /// assert_eq!(response.status(), 418);
    /// ```
    pub fn with_status(status: u16, reason: &str) -> Self {
        Self {
            protocol: DEFAULT_PROTOCOL.to_string(),
            status,
            reason: reason.to_string(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Respuesta mínima para un fallo de parsing o de lectura
    ///
    /// El body es el código y la razón en texto plano.
    pub fn canned(status: StatusCode, protocol: &str) -> Self {
        Self::new(status)
            .with_protocol(protocol)
            .with_header("Content-Type", "text/plain")
            .with_body(&format!("{}\n", status))
    }

    /// Cambia el protocolo de la status line
    pub fn with_protocol(mut self, protocol: &str) -> Self {
        self.protocol = protocol.to_string();
        self
    }

    /// Agrega un header a la respuesta
    ///
    /// El nombre se guarda en minúsculas; si ya existe, se sobrescribe.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Agrega un header a una respuesta existente (versión mutable)
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
    }

    /// Establece el cuerpo de la respuesta desde un string
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.as_bytes().to_vec();
        self
    }

    /// Establece el cuerpo de la respuesta desde bytes
    ///
    /// Útil para respuestas binarias (imágenes, etc.)
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// Orden fijo:
    /// - Status line: `PROTOCOL CODE REASON\r\n`
    /// - `server` y `content-length`, derivados aquí
    /// - Resto de headers: `name: value\r\n`, ordenados por nombre
    /// - Línea vacía: `\r\n`
    /// - Body: bytes sin re-codificar
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(128 + self.body.len());

        // 1. Status line
        let status_line = format!("{} {} {}\r\n", self.protocol, self.status, self.reason);
        result.extend_from_slice(status_line.as_bytes());

        // 2. Headers derivados, pisan lo que haya puesto el caller
        push_header(&mut result, SERVER, SERVER_NAME);
        push_header(&mut result, CONTENT_LENGTH, &self.body.len().to_string());

        // 3. Headers del caller
        let mut names: Vec<&String> = self
            .headers
            .keys()
            .filter(|name| name.as_str() != SERVER && name.as_str() != CONTENT_LENGTH)
            .collect();
        names.sort();
        for name in names {
            push_header(&mut result, name, &self.headers[name]);
        }

        // 4. Línea vacía que separa headers del body
        result.extend_from_slice(b"\r\n");

        // 5. Body (si existe)
        result.extend_from_slice(&self.body);

        result
    }

    /// Obtiene el protocolo de la respuesta
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Obtiene el texto de razón
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Obtiene una referencia a los headers puestos por el caller
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

fn push_header(out: &mut Vec<u8>, name: &str, value: &str) {
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(b": ");
    out.extend_from_slice(value.as_bytes());
    out.extend_from_slice(b"\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Separa la salida serializada en (head, body)
    fn split_wire(bytes: &[u8]) -> (String, &[u8]) {
        let pos = bytes
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("missing blank line");
        (
            String::from_utf8(bytes[..pos].to_vec()).unwrap(),
            &bytes[pos + 4..],
        )
    }

    fn header_value<'a>(head: &'a str, name: &str) -> Vec<&'a str> {
        head.lines()
            .skip(1)
            .filter_map(|line| line.split_once(": "))
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
            .collect()
    }

    #[test]
    fn test_new_response() {
        let response = Response::new(StatusCode::Ok);
        assert_eq!(response.status(), 200);
        assert_eq!(response.reason(), "OK");
        assert_eq!(response.protocol(), "HTTP/1.1");
        assert!(response.headers().is_empty());
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_with_header_lowercases_name() {
        let response = Response::new(StatusCode::Ok)
            .with_header("Content-Type", "text/plain")
            .with_header("content-type", "text/html");

        assert_eq!(response.headers().len(), 1);
        assert_eq!(
            response.headers().get("content-type"),
            Some(&"text/html".to_string())
        );
    }

    #[test]
    fn test_not_found_scenario() {
        let body = "<html><body>missing</body></html>";
        let response = Response::new(StatusCode::NotFound)
            .with_header("Content-Type", "text/html")
            .with_body(body);

        let bytes = response.to_bytes();
        assert!(bytes.starts_with(b"HTTP/1.1 404 Not Found\r\n"));

        let (head, wire_body) = split_wire(&bytes);
        assert_eq!(header_value(&head, "content-length"), vec![body.len().to_string()]);
        assert_eq!(wire_body, body.as_bytes());
    }

    #[test]
    fn test_derived_headers_override_caller() {
        let response = Response::new(StatusCode::Ok)
            .with_header("Content-Length", "999")
            .with_header("Server", "apache")
            .with_body("abc");

        let bytes = response.to_bytes();
        let (head, _) = split_wire(&bytes);

        assert_eq!(header_value(&head, "content-length"), vec!["3"]);
        assert_eq!(header_value(&head, "server"), vec![SERVER_NAME]);
    }

    #[test]
    fn test_content_length_counts_bytes_not_chars() {
        let body = "ñandú";
        let response = Response::new(StatusCode::Ok).with_body(body);
        let bytes = response.to_bytes();
        let (head, wire_body) = split_wire(&bytes);

        assert_eq!(header_value(&head, "content-length"), vec!["7"]);
        assert_eq!(wire_body, body.as_bytes());
    }

    #[test]
    fn test_binary_body_verbatim() {
        let binary = vec![0x00, 0x0D, 0x0A, 0x0D, 0x0A, 0xFF];
        let response = Response::new(StatusCode::Ok).with_body_bytes(binary.clone());

        let bytes = response.to_bytes();
        let (head, wire_body) = split_wire(&bytes);
        assert_eq!(header_value(&head, "content-length"), vec!["6"]);
        assert_eq!(wire_body, &binary[..]);
    }

    #[test]
    fn test_empty_body_response() {
        let bytes = Response::with_status(204, "No Content").to_bytes();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("HTTP/1.1 204 No Content\r\n"));
        assert!(text.contains("content-length: 0\r\n"));
        assert!(text.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_protocol_echo() {
        let bytes = Response::new(StatusCode::Ok)
            .with_protocol("HTTP/1.0")
            .to_bytes();
        assert!(bytes.starts_with(b"HTTP/1.0 200 OK\r\n"));
    }

    #[test]
    fn test_canned_response() {
        let response = Response::canned(StatusCode::RequestHeaderFieldsTooLarge, "HTTP/1.0");

        assert_eq!(response.status(), 431);
        assert_eq!(response.protocol(), "HTTP/1.0");
        assert_eq!(response.body(), b"431 Request Header Fields Too Large\n");
        assert_eq!(
            response.headers().get("content-type"),
            Some(&"text/plain".to_string())
        );
    }
}
