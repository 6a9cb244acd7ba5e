//! # Access Log
//! src/access_log.rs
//!
//! El manejador de conexiones produce un [`AccessRecord`] por conexión y
//! lo entrega a un [`AccessLogger`] inyectado; el formato y el destino
//! son decisión del logger.
//!
//! Formato `common` (estilo Apache, sin ident ni user):
//!
//! ```text
//! 127.0.0.1:53412 - - [2017-02-08T19:28:31Z] "GET / HTTP/1.0" 200 1545
//! ```

use crate::http::request::RequestLine;
use crate::http::Request;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Un registro por conexión atendida
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessRecord {
    pub remote_addr: String,
    pub timestamp: DateTime<Utc>,

    /// `None` si el request no llegó a parsearse
    pub method: Option<String>,
    pub path: Option<String>,
    pub protocol: Option<String>,

    pub status: u16,
    pub body_length: usize,
}

impl AccessRecord {
    /// Registro vacío para una conexión recién aceptada
    pub fn new(remote_addr: String) -> Self {
        Self {
            remote_addr,
            timestamp: Utc::now(),
            method: None,
            path: None,
            protocol: None,
            status: 0,
            body_length: 0,
        }
    }

    /// Copia método, path y protocolo del request parseado
    pub fn set_request(&mut self, request: &Request) {
        self.method = Some(request.method().to_string());
        self.path = Some(request.path().to_string());
        self.protocol = Some(request.protocol().to_string());
    }

    /// Igual que `set_request`, para un request que falló después de la
    /// request line
    pub(crate) fn set_request_line(&mut self, line: &RequestLine) {
        self.method = Some(line.method.clone());
        self.path = Some(line.path.clone());
        self.protocol = Some(line.protocol.clone());
    }

    /// Fija el resultado y la hora de cierre
    pub fn finish(&mut self, status: u16, body_length: usize) {
        self.status = status;
        self.body_length = body_length;
        self.timestamp = Utc::now();
    }

    /// Línea en formato `common`; los campos desconocidos van como `-`
    pub fn common_line(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} {}\" {} {}",
            self.remote_addr,
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.method.as_deref().unwrap_or("-"),
            self.path.as_deref().unwrap_or("-"),
            self.protocol.as_deref().unwrap_or("-"),
            self.status,
            self.body_length
        )
    }
}

/// Destino de los registros de acceso
pub trait AccessLogger: Send + Sync {
    fn log(&self, record: &AccessRecord);
}

/// Formato de salida del access log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Una línea estilo common log
    #[default]
    Common,
    /// Un objeto JSON por línea
    Json,
}

/// Emite cada registro por `tracing` con target `access`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAccessLogger {
    format: LogFormat,
}

impl TracingAccessLogger {
    pub fn new(format: LogFormat) -> Self {
        Self { format }
    }

    /// Renderiza el registro según el formato configurado
    pub fn render(&self, record: &AccessRecord) -> Result<String, serde_json::Error> {
        match self.format {
            LogFormat::Common => Ok(record.common_line()),
            LogFormat::Json => serde_json::to_string(record),
        }
    }
}

impl AccessLogger for TracingAccessLogger {
    fn log(&self, record: &AccessRecord) {
        match self.render(record) {
            Ok(line) => info!(target: "access", "{}", line),
            Err(e) => warn!(error = %e, "Failed to render access record"),
        }
    }
}
