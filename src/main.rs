//! # goserv - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor: configuración, logging, bind y accept
//! loop. Sirve archivos estáticos desde `--root`.

use goserv::access_log::TracingAccessLogger;
use goserv::config::Config;
use goserv::logging;
use goserv::responder::StaticFileResponder;
use goserv::server::Server;
use std::sync::Arc;
use tracing::error;

fn main() {
    let config = Config::new();

    if let Err(e) = logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    }
    config.log_summary();

    let responder = Arc::new(StaticFileResponder::new(&config.root));
    let access_log = Arc::new(TracingAccessLogger::new(config.log_format));

    let server = match Server::bind(config, responder, access_log) {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "Failed to bind listener");
            std::process::exit(1);
        }
    };

    // Iniciar el servidor (esto bloqueará el thread)
    if let Err(e) = server.run() {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
