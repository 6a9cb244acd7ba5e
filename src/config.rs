//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor con soporte para argumentos CLI y
//! variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./goserv --port 8080 \
//!   --root ./public \
//!   --read-timeout-ms 5000 \
//!   --max-header-bytes 8192
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 DOC_ROOT=./public ACCESS_LOG_FORMAT=json ./goserv
//! ```

use crate::access_log::LogFormat;
use crate::http::Limits;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Configuración del servidor HTTP
#[derive(Debug, Clone, Parser)]
#[command(name = "goserv")]
#[command(about = "Servidor HTTP/1.x de archivos estáticos")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio desde el que se sirven los archivos
    #[arg(long, default_value = ".", env = "DOC_ROOT")]
    pub root: PathBuf,

    // === Timeouts ===

    /// Tiempo máximo que una lectura espera bytes del cliente
    #[arg(long = "read-timeout-ms", default_value = "5000", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    /// Tiempo máximo para escribir la respuesta
    #[arg(long = "write-timeout-ms", default_value = "5000", env = "WRITE_TIMEOUT_MS")]
    pub write_timeout_ms: u64,

    // === Límites por conexión ===

    /// Máximo de bytes para request line + headers
    #[arg(long = "max-header-bytes", default_value = "8192", env = "MAX_HEADER_BYTES")]
    pub max_header_bytes: usize,

    /// Máximo content-length aceptado
    #[arg(long = "max-body-bytes", default_value = "1048576", env = "MAX_BODY_BYTES")]
    pub max_body_bytes: usize,

    /// Tamaño de cada lectura del socket
    #[arg(long = "read-chunk-bytes", default_value = "1024", env = "READ_CHUNK_BYTES")]
    pub read_chunk_bytes: usize,

    // === Logging ===

    /// Formato del access log
    #[arg(long = "log-format", value_enum, default_value = "common", env = "ACCESS_LOG_FORMAT")]
    pub log_format: LogFormat,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use goserv::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    /// Límites de memoria para el parser
    pub fn limits(&self) -> Limits {
        Limits {
            max_header_bytes: self.max_header_bytes,
            max_body_bytes: self.max_body_bytes,
        }
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        // Un timeout de 0 no es válido para SO_RCVTIMEO / SO_SNDTIMEO
        if self.read_timeout_ms == 0 {
            return Err("Read timeout must be > 0".to_string());
        }
        if self.write_timeout_ms == 0 {
            return Err("Write timeout must be > 0".to_string());
        }

        if self.max_header_bytes == 0 {
            return Err("Max header bytes must be >= 1".to_string());
        }
        if self.read_chunk_bytes == 0 {
            return Err("Read chunk bytes must be >= 1".to_string());
        }

        if !self.root.is_dir() {
            return Err(format!("Document root is not a directory: {}", self.root.display()));
        }

        Ok(())
    }

    /// Registra un resumen de la configuración
    pub fn log_summary(&self) {
        info!(
            address = %self.address(),
            root = %self.root.display(),
            read_timeout_ms = self.read_timeout_ms,
            write_timeout_ms = self.write_timeout_ms,
            max_header_bytes = self.max_header_bytes,
            max_body_bytes = self.max_body_bytes,
            read_chunk_bytes = self.read_chunk_bytes,
            log_format = ?self.log_format,
            "Configuration"
        );
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            root: PathBuf::from("."),
            read_timeout_ms: 5_000,
            write_timeout_ms: 5_000,
            max_header_bytes: 8 * 1024,
            max_body_bytes: 1024 * 1024,
            read_chunk_bytes: 1024,
            log_format: LogFormat::Common,
        }
    }
}
