//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Acepta conexiones y atiende cada una en su propio thread. Los threads
//! no comparten estado mutable: solo el `ConnectionHandler`, que es de
//! solo lectura.

use crate::access_log::AccessLogger;
use crate::config::Config;
use crate::http::RequestReader;
use crate::responder::Responder;
use crate::server::connection::ConnectionHandler;
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info, warn};

/// Servidor HTTP/1.x con un thread por conexión
pub struct Server {
    config: Config,
    handler: Arc<ConnectionHandler>,
    listener: TcpListener,
}

impl Server {
    /// Abre el socket de escucha en `config.address()`
    ///
    /// Con puerto 0 el sistema elige uno libre; ver [`Server::local_addr`].
    pub fn bind(
        config: Config,
        responder: Arc<dyn Responder>,
        access_log: Arc<dyn AccessLogger>,
    ) -> io::Result<Self> {
        let address = config.address();
        let listener = TcpListener::bind(&address)?;

        let reader = RequestReader::new(config.limits(), config.read_timeout())
            .with_chunk_size(config.read_chunk_bytes);
        let handler = ConnectionHandler::new(reader, responder, access_log);

        info!(address = %address, "Listening");
        Ok(Self {
            config,
            handler: Arc::new(handler),
            listener,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Acepta conexiones para siempre
    ///
    /// Un error al aceptar o al crear un thread solo afecta a esa
    /// conexión; el loop sigue. Una conexión aceptada que no se puede
    /// atender igual deja su registro de acceso (500, sin body).
    pub fn run(self) -> io::Result<()> {
        info!("Concurrent mode: one thread per connection");

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => self.spawn_connection(stream),
                Err(e) => warn!(error = %e, "Failed to accept connection"),
            }
        }

        Ok(())
    }

    fn spawn_connection(&self, stream: TcpStream) {
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        if let Err(e) = stream.set_write_timeout(Some(self.config.write_timeout())) {
            warn!(remote = %peer, error = %e, "Failed to set write timeout");
            self.handler.abandon(peer);
            return;
        }

        debug!(remote = %peer, "New connection");
        let handler = Arc::clone(&self.handler);
        let spawned = thread::Builder::new()
            .name(format!("conn-{}", peer))
            .spawn(move || {
                handler.handle(stream);
            });

        if let Err(e) = spawned {
            error!(remote = %peer, error = %e, "Failed to spawn connection thread");
            self.handler.abandon(peer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responder::Reply;
    use crate::http::{Request, StatusCode};
    use crate::testing::{init_test_logging, CollectingLogger};
    use std::io::{Read, Write};
    use std::time::Duration;

    fn start(config: Config) -> (SocketAddr, Arc<CollectingLogger>) {
        init_test_logging();
        let logger = Arc::new(CollectingLogger::default());
        let responder: Arc<dyn Responder> = Arc::new(|request: &Request| {
            Reply::new(StatusCode::Ok, request.path().as_bytes().to_vec(), "text/plain")
        });

        let server = Server::bind(config, responder, logger.clone()).unwrap();
        let addr = server.local_addr().unwrap();
        thread::spawn(move || server.run());
        (addr, logger)
    }

    fn test_config() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            ..Config::default()
        }
    }

    #[test]
    fn test_serves_concurrent_connections() {
        let (addr, logger) = start(test_config());

        // La primera conexión queda abierta sin enviar nada
        let idle = TcpStream::connect(addr).unwrap();

        let clients: Vec<_> = (0..4)
            .map(|i| {
                thread::spawn(move || {
                    let mut stream = TcpStream::connect(addr).unwrap();
                    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
                    write!(stream, "GET /client/{} HTTP/1.1\r\n\r\n", i).unwrap();
                    let mut reply = String::new();
                    stream.read_to_string(&mut reply).unwrap();
                    (i, reply)
                })
            })
            .collect();

        for client in clients {
            let (i, reply) = client.join().unwrap();
            assert!(reply.starts_with("HTTP/1.1 200 OK\r\n"));
            assert!(reply.ends_with(&format!("/client/{}", i)));
        }

        assert!(logger.records().len() >= 4);
        drop(idle);
    }

    #[test]
    fn test_bind_reports_address_in_use() {
        let taken = TcpListener::bind("127.0.0.1:0").unwrap();
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: taken.local_addr().unwrap().port(),
            ..Config::default()
        };

        let result = Server::bind(
            config,
            Arc::new(|_: &Request| Reply::html(StatusCode::Ok, "")),
            Arc::new(CollectingLogger::default()),
        );
        assert!(result.is_err());
    }
}
