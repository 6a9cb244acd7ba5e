//! # goserv
//! src/lib.rs
//!
//! Núcleo de un servidor HTTP/1.x implementado desde cero: recibe bytes
//! de una conexión TCP, los parsea a un request estructurado, obtiene la
//! respuesta de un responder y la serializa de vuelta al socket.
//!
//! ## Arquitectura
//!
//! ```text
//! ByteSource → RequestReader (RequestParser) → Request
//!            → Responder → Reply → Response → bytes → ByteSource
//! ```
//!
//! - `http`: Parsing incremental, lectura acotada y serialización
//! - `server`: Transporte, manejo de cada conexión y accept loop
//! - `responder`: Mapeo request → contenido (archivos estáticos)
//! - `access_log`: Un registro estructurado por conexión
//! - `config`: CLI y variables de entorno
//! - `logging`: Subscriber de `tracing`
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use goserv::access_log::TracingAccessLogger;
//! use goserv::config::Config;
//! use goserv::responder::StaticFileResponder;
//! use goserv::server::Server;
//! use std::sync::Arc;
//!
//! let config = Config::default();
//! let responder = Arc::new(StaticFileResponder::new(&config.root));
//! let access_log = Arc::new(TracingAccessLogger::new(config.log_format));
//! let server = Server::bind(config, responder, access_log).expect("bind");
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod access_log;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod responder;
pub mod server;

#[cfg(test)]
pub(crate) mod testing;

pub use error::HttpError;
