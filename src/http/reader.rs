//! # Lector de Requests
//! src/http/reader.rs
//!
//! Lee del `ByteSource` en trozos de tamaño fijo y alimenta el
//! [`RequestParser`] hasta tener un request completo. Cada lectura tiene
//! su propio idle timeout: un cliente que deja de enviar bytes no puede
//! retener la conexión indefinidamente.

use super::parser::{Limits, RequestParser};
use super::Request;
use crate::error::HttpError;
use crate::server::transport::{is_timeout, ByteSource};
use std::io;
use std::time::Duration;
use tracing::{debug, trace};

/// Tamaño de cada lectura por defecto
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Orquesta lecturas acotadas y el parser incremental
#[derive(Debug, Clone)]
pub struct RequestReader {
    limits: Limits,
    idle_timeout: Duration,
    chunk_size: usize,
}

impl RequestReader {
    pub fn new(limits: Limits, idle_timeout: Duration) -> Self {
        Self {
            limits,
            idle_timeout,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Cambia el tamaño de cada lectura (mínimo 1 byte)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Lee un request completo
    ///
    /// # Errores
    ///
    /// * `ReadTimeout` - Una lectura no recibió nada dentro del idle timeout
    /// * `ConnectionClosed` - El cliente cerró sin enviar nada
    /// * `IncompleteRequest` - El cliente cerró a mitad del mensaje
    /// * Errores de parsing y de límites del [`RequestParser`]
    pub fn read_request<S: ByteSource + ?Sized>(&self, source: &mut S) -> Result<Request, HttpError> {
        self.read_with(source, &mut self.parser())
    }

    /// Parser nuevo con los límites de este lector
    pub fn parser(&self) -> RequestParser {
        RequestParser::new(self.limits)
    }

    /// Igual que [`RequestReader::read_request`], pero con un parser del
    /// llamador: si la lectura falla, el parser conserva lo que alcanzó a
    /// parsear.
    pub fn read_with<S: ByteSource + ?Sized>(
        &self,
        source: &mut S,
        parser: &mut RequestParser,
    ) -> Result<Request, HttpError> {
        let mut chunk = vec![0u8; self.chunk_size];

        loop {
            let read = match source.read_chunk(&mut chunk, self.idle_timeout) {
                Ok(0) if parser.bytes_received() == 0 => return Err(HttpError::ConnectionClosed),
                Ok(0) => return Err(HttpError::IncompleteRequest),
                Ok(read) => read,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if is_timeout(&e) => {
                    debug!(received = parser.bytes_received(), state = ?parser.state(), "Idle timeout while reading request");
                    return Err(HttpError::ReadTimeout);
                }
                Err(e) => return Err(HttpError::Io(e)),
            };

            trace!(read, state = ?parser.state(), "Read chunk");
            if let Some(request) = parser.feed(&chunk[..read])? {
                return Ok(request);
            }
        }
    }
}
