//! # Logging
//! src/logging.rs
//!
//! Inicializa el subscriber de `tracing`. El nivel se controla con
//! `RUST_LOG` (por defecto `info`); el access log sale por el target
//! `access`, así se puede filtrar aparte (ej: `RUST_LOG=warn,access=info`).

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Instala el subscriber global
///
/// Retorna error si ya había uno instalado.
pub fn init() -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| e.to_string())
}
