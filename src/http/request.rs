//! # Parsing de Requests HTTP/1.x
//! src/http/request.rs
//!
//! Tipos del request parseado y parsers de línea: la request line y
//! cada línea del bloque de headers. La acumulación de bytes entre
//! lecturas vive en [`crate::http::parser`].
//!
//! ## Formato de un Request
//!
//! ```text
//! GET /search?q=a&lang=en HTTP/1.1\r\n
//! Host: localhost:8080\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD TARGET PROTOCOL`, separados por un espacio
//! 2. **Headers**: Pares `Name: Value` (uno por línea)
//! 3. **Empty Line**: `\r\n` que separa headers del body
//! 4. **Body**: `content-length` bytes, o vacío

use super::parser::{Limits, RequestParser};
use crate::error::HttpError;
use std::collections::HashMap;

/// Separador obligatorio entre nombre y valor de un header
const HEADER_SEPARATOR: &str = ": ";

/// Representa un request HTTP parseado
///
/// Se construye completo o no se construye: el parser nunca entrega un
/// request a medio poblar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Método HTTP en mayúsculas (ej: "GET")
    method: String,

    /// Path de la petición, siempre empieza con '/'
    path: String,

    /// Query parameters sin decodificar (ej: {"q": "a"})
    query: HashMap<String, String>,

    /// Versión del protocolo (ej: "HTTP/1.1")
    protocol: String,

    /// Headers con el nombre en minúsculas (ej: {"host": "localhost"})
    headers: HashMap<String, String>,

    /// Body del request, de largo `content-length`
    body: Vec<u8>,
}

/// Resultado de parsear la primera línea del request
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RequestLine {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub protocol: String,
}

impl Request {
    pub(crate) fn from_parts(
        line: RequestLine,
        headers: HashMap<String, String>,
        body: Vec<u8>,
    ) -> Self {
        Self {
            method: line.method,
            path: line.path,
            query: line.query,
            protocol: line.protocol,
            headers,
            body,
        }
    }

    /// Parsea un request completo que ya está en memoria
    ///
    /// Usa los límites por defecto. Si el buffer termina antes que el
    /// mensaje retorna `IncompleteRequest`.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use goserv::http::Request;
    ///
    /// let raw = b"GET /search?q=a HTTP/1.1\r\nHost: x\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/search");
    /// assert_eq!(request.query_param("q"), Some("a"));
    /// assert_eq!(request.header("Host"), Some("x"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, HttpError> {
        let mut parser = RequestParser::new(Limits::default());
        parser.feed(buffer)?.ok_or(HttpError::IncompleteRequest)
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Obtiene el path del request
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene todos los query parameters
    pub fn query(&self) -> &HashMap<String, String> {
        &self.query
    }

    /// Obtiene un query parameter específico
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(|s| s.as_str())
    }

    /// Obtiene la versión del protocolo
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Obtiene todos los headers (nombres en minúsculas)
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header específico, sin distinguir mayúsculas
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|s| s.as_str())
    }

    /// Obtiene el body del request
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Parsea la request line (sin el CRLF final)
///
/// Formato: `METHOD TARGET PROTOCOL`, separados por exactamente un espacio.
/// Un token vacío (dos espacios seguidos) también es un error.
pub(crate) fn parse_request_line(line: &[u8]) -> Result<RequestLine, HttpError> {
    let text = std::str::from_utf8(line)
        .map_err(|_| HttpError::MalformedRequestLine(String::from_utf8_lossy(line).into_owned()))?;
    let malformed = || HttpError::MalformedRequestLine(text.to_string());

    let parts: Vec<&str> = text.split(' ').collect();
    if parts.len() != 3 || parts.iter().any(|part| part.is_empty()) {
        return Err(malformed());
    }

    let (path, query) = parse_target(parts[1]);
    if !path.starts_with('/') {
        return Err(malformed());
    }

    Ok(RequestLine {
        method: parts[0].to_ascii_uppercase(),
        path: path.to_string(),
        query,
        protocol: parts[2].to_string(),
    })
}

/// Separa el target en path y query parameters
///
/// Ejemplo: "/search?q=a&lang=en"
/// Retorna: ("/search", {"q": "a", "lang": "en"})
fn parse_target(target: &str) -> (&str, HashMap<String, String>) {
    match target.split_once('?') {
        Some((path, query)) => (path, parse_query_string(query)),
        None => (target, HashMap::new()),
    }
}

/// Parsea una query string; el último valor de una key repetida gana
///
/// No decodifica percent-encoding: los caracteres pasan tal cual.
fn parse_query_string(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();

    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        match pair.split_once('=') {
            Some((key, value)) => params.insert(key.to_string(), value.to_string()),
            // Parámetro sin valor (ej: "?debug")
            None => params.insert(pair.to_string(), String::new()),
        };
    }

    params
}

/// Parsea una línea de header no vacía (sin el CRLF final)
///
/// Retorna `(nombre en minúsculas, valor)`, ambos sin espacios alrededor.
pub(crate) fn parse_header_line(line: &[u8]) -> Result<(String, String), HttpError> {
    let text = std::str::from_utf8(line)
        .map_err(|_| HttpError::MalformedHeaderLine(String::from_utf8_lossy(line).into_owned()))?;

    // Exactamente un separador por línea
    if text.matches(HEADER_SEPARATOR).count() != 1 {
        return Err(HttpError::MalformedHeaderLine(text.to_string()));
    }
    let (name, value) = text
        .split_once(HEADER_SEPARATOR)
        .ok_or_else(|| HttpError::MalformedHeaderLine(text.to_string()))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(HttpError::MalformedHeaderLine(text.to_string()));
    }

    Ok((name.to_ascii_lowercase(), value.trim().to_string()))
}
