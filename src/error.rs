//! # Errores de Conexión
//! src/error.rs
//!
//! Taxonomía de fallos que puede producir una conexión, desde el parsing
//! del request hasta la escritura de la respuesta. Todos son terminales
//! para la conexión: no hay reintentos ni recuperación parcial.

use crate::http::StatusCode;
use std::io;
use thiserror::Error;

/// Fallos del ciclo lectura → parsing → escritura de una conexión
#[derive(Debug, Error)]
pub enum HttpError {
    /// La request line no tiene exactamente tres tokens válidos
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),

    /// Línea de header sin separador `": "` o con valor inválido
    #[error("malformed header line: {0:?}")]
    MalformedHeaderLine(String),

    /// El bloque de headers superó el límite sin llegar a la línea vacía
    #[error("header block exceeds {limit} bytes")]
    HeaderBlockTooLarge { limit: usize },

    /// El `content-length` declarado supera el máximo de body
    #[error("body of {length} bytes exceeds limit of {limit} bytes")]
    BodyTooLarge { length: usize, limit: usize },

    /// Ninguna lectura completó dentro del idle timeout
    #[error("read timed out")]
    ReadTimeout,

    /// El cliente cerró la conexión sin enviar ningún byte
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// El cliente cerró la conexión a mitad del mensaje
    #[error("connection closed before the request was complete")]
    IncompleteRequest,

    /// Error de I/O durante la lectura
    #[error("read failed: {0}")]
    Io(#[from] io::Error),

    /// No se pudo escribir la respuesta
    #[error("write failed: {0}")]
    TransportWriteFailure(#[source] io::Error),
}

impl HttpError {
    /// Código de estado de la respuesta enlatada para este fallo
    ///
    /// También es el código que queda en el access log, aunque la
    /// respuesta no llegue a escribirse.
    pub fn canned_status(&self) -> StatusCode {
        match self {
            HttpError::MalformedRequestLine(_)
            | HttpError::MalformedHeaderLine(_)
            | HttpError::IncompleteRequest => StatusCode::BadRequest,
            HttpError::HeaderBlockTooLarge { .. } => StatusCode::RequestHeaderFieldsTooLarge,
            HttpError::BodyTooLarge { .. } => StatusCode::PayloadTooLarge,
            HttpError::ReadTimeout => StatusCode::RequestTimeout,
            HttpError::ConnectionClosed
            | HttpError::Io(_)
            | HttpError::TransportWriteFailure(_) => StatusCode::InternalServerError,
        }
    }

    /// Indica si todavía tiene sentido intentar escribir una respuesta
    ///
    /// Un timeout significa que el cliente se fue (o es un ataque
    /// slow-send): se cierra sin escribir nada.
    pub fn should_respond(&self) -> bool {
        matches!(
            self,
            HttpError::MalformedRequestLine(_)
                | HttpError::MalformedHeaderLine(_)
                | HttpError::HeaderBlockTooLarge { .. }
                | HttpError::BodyTooLarge { .. }
                | HttpError::IncompleteRequest
        )
    }
}
