//! # Responders
//! src/responder.rs
//!
//! Un responder decide el contenido de la respuesta a partir del request:
//! código, razón, body y content type. El núcleo del servidor no sabe
//! cómo se mapea un path a contenido; eso vive aquí.
//!
//! ```text
//! Request → Responder → Reply → Response Builder → bytes
//! ```

use crate::http::{Request, StatusCode};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Página que se envía cuando el archivo no existe
const NOT_FOUND_PAGE: &str = "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Goserv</title></head><body><h1>Oops!</h1><p>We couldn't find the file you asked for.</p></body></html>";

const INDEX_FILE: &str = "index.html";

/// Contenido de la respuesta elegido por un responder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub reason: String,
    pub body: Vec<u8>,
    pub content_type: String,
}

impl Reply {
    /// Reply con un código conocido
    pub fn new(status: StatusCode, body: Vec<u8>, content_type: &str) -> Self {
        Self {
            status: status.as_u16(),
            reason: status.reason_phrase().to_string(),
            body,
            content_type: content_type.to_string(),
        }
    }

    /// Reply HTML
    pub fn html(status: StatusCode, body: &str) -> Self {
        Self::new(status, body.as_bytes().to_vec(), "text/html")
    }
}

/// Mapea un request a su contenido de respuesta
///
/// Se comparte entre todos los threads de conexión.
pub trait Responder: Send + Sync {
    fn respond(&self, request: &Request) -> Reply;
}

impl<F> Responder for F
where
    F: Fn(&Request) -> Reply + Send + Sync,
{
    fn respond(&self, request: &Request) -> Reply {
        self(request)
    }
}

/// Sirve archivos desde un directorio raíz
///
/// - `/` y cualquier path terminado en `/` sirven `index.html`
/// - Un segmento `..` se rechaza con 403
/// - Archivo inexistente → 404 con página HTML
#[derive(Debug, Clone)]
pub struct StaticFileResponder {
    root: PathBuf,
}

impl StaticFileResponder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Traduce el path del request a un archivo bajo la raíz
    ///
    /// Retorna `None` si el path intenta salir de la raíz.
    pub fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let mut relative = request_path.trim_start_matches('/').to_string();
        if relative.is_empty() || relative.ends_with('/') {
            relative.push_str(INDEX_FILE);
        }

        let relative = Path::new(&relative);
        let escapes = relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir));
        if escapes {
            return None;
        }

        Some(self.root.join(relative))
    }
}

impl Responder for StaticFileResponder {
    fn respond(&self, request: &Request) -> Reply {
        let Some(file_path) = self.resolve(request.path()) else {
            debug!(path = request.path(), "Rejected path outside document root");
            return Reply::html(StatusCode::Forbidden, "<h1>Forbidden</h1>");
        };

        if file_path.is_dir() {
            return Reply::html(StatusCode::NotFound, NOT_FOUND_PAGE);
        }

        match fs::read(&file_path) {
            Ok(contents) => Reply::new(StatusCode::Ok, contents, content_type_for(&file_path)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Reply::html(StatusCode::NotFound, NOT_FOUND_PAGE)
            }
            Err(e) => {
                warn!(path = %file_path.display(), error = %e, "Failed to read file");
                Reply::html(StatusCode::InternalServerError, "<h1>Internal Server Error</h1>")
            }
        }
    }
}

/// Content type según la extensión del archivo
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("txt") => "text/plain",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}
