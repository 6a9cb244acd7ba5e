//! # Transporte
//! src/server/transport.rs
//!
//! Abstracción sobre un stream conectado. El lector de requests y el
//! manejador de conexiones solo conocen este trait, así los tests pueden
//! reemplazar el socket por un stream en memoria.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

/// Stream conectado del que se leen y al que se escriben bytes
pub trait ByteSource {
    /// Lee hasta `buf.len()` bytes, esperando como máximo `idle_timeout`
    ///
    /// `Ok(0)` significa que el cliente cerró su lado. Un timeout se
    /// reporta como `ErrorKind::WouldBlock` o `ErrorKind::TimedOut`.
    fn read_chunk(&mut self, buf: &mut [u8], idle_timeout: Duration) -> io::Result<usize>;

    /// Escribe todos los bytes
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Cierra la conexión; debe tolerar ser llamado más de una vez
    fn close(&mut self);

    /// Dirección del cliente, para el access log
    fn remote_addr(&self) -> String;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_chunk(&mut self, buf: &mut [u8], idle_timeout: Duration) -> io::Result<usize> {
        (**self).read_chunk(buf, idle_timeout)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write_bytes(bytes)
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn remote_addr(&self) -> String {
        (**self).remote_addr()
    }
}

impl ByteSource for TcpStream {
    fn read_chunk(&mut self, buf: &mut [u8], idle_timeout: Duration) -> io::Result<usize> {
        self.set_read_timeout(Some(idle_timeout))?;
        self.read(buf)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.write_all(bytes)?;
        self.flush()
    }

    fn close(&mut self) {
        // NotConnected si el cliente ya cerró; no hay nada más que hacer
        let _ = self.shutdown(Shutdown::Both);
    }

    fn remote_addr(&self) -> String {
        self.peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    }
}

/// Indica si un error de lectura corresponde a un timeout
///
/// Unix reporta `WouldBlock` cuando vence `SO_RCVTIMEO`; Windows usa
/// `TimedOut`.
pub fn is_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}
