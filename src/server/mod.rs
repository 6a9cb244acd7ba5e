//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes (un thread por conexión)
//! 3. Lee y parsea requests HTTP con lecturas acotadas
//! 4. Genera y envía responses HTTP
//! 5. Registra cada conexión en el access log y la cierra

pub mod connection;
pub mod tcp;
pub mod transport;

// Re-exportar para facilitar el uso
pub use connection::ConnectionHandler;
pub use tcp::Server;
pub use transport::ByteSource;
