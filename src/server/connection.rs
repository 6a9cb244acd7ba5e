//! # Manejo de una Conexión
//! src/server/connection.rs
//!
//! Control de flujo por conexión, como máquina de estados:
//!
//! ```text
//! Reading ──ok──→ Responding ──→ Closing
//!    └────error (respuesta enlatada best-effort)──↗
//! ```
//!
//! No hay reintentos entre estados. Siempre se emite un registro de
//! acceso y siempre se cierra la conexión, incluso si algo hace panic.

use crate::access_log::{AccessLogger, AccessRecord};
use crate::error::HttpError;
use crate::http::response::DEFAULT_PROTOCOL;
use crate::http::{Request, RequestReader, Response, StatusCode};
use crate::responder::Responder;
use crate::server::transport::ByteSource;
use std::ops::{Deref, DerefMut};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

enum ConnectionState {
    Reading,
    Responding(Request),
    Closing,
}

/// Cierra el `ByteSource` al salir de scope, en cualquier camino
struct ConnectionGuard<S: ByteSource> {
    source: S,
}

impl<S: ByteSource> Deref for ConnectionGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.source
    }
}

impl<S: ByteSource> DerefMut for ConnectionGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

impl<S: ByteSource> Drop for ConnectionGuard<S> {
    fn drop(&mut self) {
        self.source.close();
    }
}

/// Lee, responde, registra y cierra una conexión
///
/// No guarda estado mutable entre conexiones: el mismo handler se
/// comparte entre todos los threads.
pub struct ConnectionHandler {
    reader: RequestReader,
    responder: Arc<dyn Responder>,
    access_log: Arc<dyn AccessLogger>,
}

impl ConnectionHandler {
    pub fn new(
        reader: RequestReader,
        responder: Arc<dyn Responder>,
        access_log: Arc<dyn AccessLogger>,
    ) -> Self {
        Self {
            reader,
            responder,
            access_log,
        }
    }

    /// Atiende una conexión completa y retorna su registro de acceso
    pub fn handle<S: ByteSource>(&self, source: S) -> AccessRecord {
        let mut conn = ConnectionGuard { source };
        let mut record = AccessRecord::new(conn.remote_addr());
        let mut state = ConnectionState::Reading;

        loop {
            state = match state {
                ConnectionState::Reading => self.read(&mut conn, &mut record),
                ConnectionState::Responding(request) => {
                    self.respond(&mut conn, &request, &mut record);
                    ConnectionState::Closing
                }
                ConnectionState::Closing => break,
            };
        }

        self.access_log.log(&record);
        drop(conn);
        record
    }

    fn read<S: ByteSource>(&self, conn: &mut ConnectionGuard<S>, record: &mut AccessRecord) -> ConnectionState {
        let mut parser = self.reader.parser();
        match self.reader.read_with(&mut conn.source, &mut parser) {
            Ok(request) => {
                debug!(method = request.method(), path = request.path(), "Request parsed");
                record.set_request(&request);
                ConnectionState::Responding(request)
            }
            Err(err) => {
                if let Some(line) = parser.request_line() {
                    record.set_request_line(line);
                }
                self.fail(conn, err, record);
                ConnectionState::Closing
            }
        }
    }

    /// Convierte un fallo de lectura en respuesta enlatada (si corresponde)
    fn fail<S: ByteSource>(&self, conn: &mut ConnectionGuard<S>, err: HttpError, record: &mut AccessRecord) {
        let status = err.canned_status();

        match &err {
            HttpError::ConnectionClosed => debug!(remote = %record.remote_addr, "Peer closed without sending a request"),
            HttpError::ReadTimeout => info!(remote = %record.remote_addr, "Closing idle connection"),
            _ => warn!(remote = %record.remote_addr, error = %err, "Failed to read request"),
        }

        if !err.should_respond() {
            record.finish(status.as_u16(), 0);
            return;
        }

        let protocol = record.protocol.as_deref().unwrap_or(DEFAULT_PROTOCOL);
        let response = Response::canned(status, protocol).with_header("Connection", "close");
        self.write(conn, &response);
        record.finish(response.status(), response.body().len());
    }

    fn respond<S: ByteSource>(&self, conn: &mut ConnectionGuard<S>, request: &Request, record: &mut AccessRecord) {
        let responder = &self.responder;
        let reply = panic::catch_unwind(AssertUnwindSafe(|| responder.respond(request)));

        let response = match reply {
            Ok(reply) => Response::with_status(reply.status, &reply.reason)
                .with_protocol(request.protocol())
                .with_header("Content-Type", &reply.content_type)
                .with_body_bytes(reply.body),
            Err(_) => {
                error!(path = request.path(), "Responder panicked");
                Response::canned(StatusCode::InternalServerError, request.protocol())
            }
        }
        .with_header("Connection", "close");

        self.write(conn, &response);
        record.finish(response.status(), response.body().len());
    }

    /// Registra una conexión aceptada que no llegó a atenderse
    ///
    /// El llamador ya no tiene el stream; solo queda dejar constancia.
    pub fn abandon(&self, remote_addr: String) -> AccessRecord {
        let mut record = AccessRecord::new(remote_addr);
        record.finish(StatusCode::InternalServerError.as_u16(), 0);
        self.access_log.log(&record);
        record
    }

    /// Escritura best-effort: el error se registra y se descarta
    fn write<S: ByteSource>(&self, conn: &mut ConnectionGuard<S>, response: &Response) {
        if let Err(e) = conn
            .write_bytes(&response.to_bytes())
            .map_err(HttpError::TransportWriteFailure)
        {
            warn!(remote = %conn.remote_addr(), error = %e, "Failed to write response");
        }
    }
}
