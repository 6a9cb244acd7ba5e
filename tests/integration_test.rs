//! Tests de integración para el servidor HTTP
//! tests/integration_test.rs
//!
//! Cada test levanta su propio servidor en un puerto libre, sirviendo un
//! directorio temporal, y habla con él por TCP.

use goserv::access_log::{LogFormat, TracingAccessLogger};
use goserv::config::Config;
use goserv::responder::StaticFileResponder;
use goserv::server::Server;
use std::fs;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

const INDEX_BODY: &str = "<h1>Hola</h1>";

/// Levanta un servidor sobre un docroot temporal
///
/// El `TempDir` se retorna para que viva lo que dure el test.
fn start_server(read_timeout_ms: u64) -> (SocketAddr, TempDir) {
    let root = tempfile::tempdir().expect("tempdir");
    fs::write(root.path().join("index.html"), INDEX_BODY).expect("write index");
    fs::write(root.path().join("style.css"), "body { color: red; }").expect("write css");

    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        root: root.path().to_path_buf(),
        read_timeout_ms,
        ..Config::default()
    };

    let responder = Arc::new(StaticFileResponder::new(root.path()));
    let access_log = Arc::new(TracingAccessLogger::new(LogFormat::Common));
    let server = Server::bind(config, responder, access_log).expect("bind");
    let addr = server.local_addr().expect("local addr");

    thread::spawn(move || server.run());
    (addr, root)
}

fn connect(addr: SocketAddr) -> TcpStream {
    let stream = TcpStream::connect(addr).expect("connect");
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream.set_write_timeout(Some(Duration::from_secs(5))).unwrap();
    stream
}

/// Envía los bytes y lee hasta que el servidor cierra
fn send_raw(addr: SocketAddr, raw: &[u8]) -> String {
    let mut stream = connect(addr);
    stream.write_all(raw).unwrap();
    stream.flush().unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

fn extract_body(response: &str) -> &str {
    match response.find("\r\n\r\n") {
        Some(pos) => &response[pos + 4..],
        None => "",
    }
}

fn header_value<'a>(response: &'a str, name: &str) -> Option<&'a str> {
    let head = response.split("\r\n\r\n").next()?;
    head.lines().skip(1).find_map(|line| {
        let (key, value) = line.split_once(": ")?;
        if key.eq_ignore_ascii_case(name) {
            Some(value)
        } else {
            None
        }
    })
}

#[test]
fn test_serves_index_file() {
    let (addr, _root) = start_server(5_000);

    let response = send_raw(addr, b"GET /index.html HTTP/1.1\r\nHost: localhost\r\n\r\n");

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "got: {}", response);
    assert_eq!(extract_body(&response), INDEX_BODY);
    let expected_length = INDEX_BODY.len().to_string();
    assert_eq!(header_value(&response, "content-length"), Some(expected_length.as_str()));
    assert_eq!(header_value(&response, "content-type"), Some("text/html"));
    assert_eq!(header_value(&response, "connection"), Some("close"));
    assert!(header_value(&response, "server").unwrap().starts_with("goserv/"));
}

#[test]
fn test_root_path_serves_index() {
    let (addr, _root) = start_server(5_000);

    let response = send_raw(addr, b"GET / HTTP/1.0\r\n\r\n");

    assert!(response.starts_with("HTTP/1.0 200 OK\r\n"), "got: {}", response);
    assert_eq!(extract_body(&response), INDEX_BODY);
}

#[test]
fn test_query_string_is_ignored_for_lookup() {
    let (addr, _root) = start_server(5_000);

    let response = send_raw(addr, b"GET /style.css?v=3&debug HTTP/1.1\r\n\r\n");

    assert!(response.contains("200 OK"), "got: {}", response);
    assert_eq!(header_value(&response, "content-type"), Some("text/css"));
    assert_eq!(extract_body(&response), "body { color: red; }");
}

#[test]
fn test_missing_file_is_404() {
    let (addr, _root) = start_server(5_000);

    let response = send_raw(addr, b"GET /nope.html HTTP/1.1\r\n\r\n");

    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"), "got: {}", response);
    assert!(extract_body(&response).contains("Oops!"));
}

#[test]
fn test_path_traversal_is_forbidden() {
    let (addr, _root) = start_server(5_000);

    let response = send_raw(addr, b"GET /../etc/passwd HTTP/1.1\r\n\r\n");

    assert!(response.starts_with("HTTP/1.1 403 Forbidden\r\n"), "got: {}", response);
}

#[test]
fn test_garbage_request_is_400() {
    let (addr, _root) = start_server(5_000);

    let response = send_raw(addr, b"GARBAGE\r\n\r\n");

    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"), "got: {}", response);
    assert_eq!(header_value(&response, "connection"), Some("close"));
}

#[test]
fn test_headers_split_across_writes() {
    let (addr, _root) = start_server(5_000);
    let mut stream = connect(addr);

    stream.write_all(b"GET /index.html HTTP/1.1\r\nHo").unwrap();
    stream.flush().unwrap();
    thread::sleep(Duration::from_millis(100));
    stream.write_all(b"st: localhost\r\n\r\n").unwrap();
    stream.flush().unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "got: {}", response);
    assert_eq!(extract_body(&response), INDEX_BODY);
}

#[test]
fn test_post_with_body() {
    let (addr, _root) = start_server(5_000);

    let response = send_raw(
        addr,
        b"POST /index.html HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello",
    );

    assert!(response.contains("200 OK"), "got: {}", response);
}

#[test]
fn test_idle_client_is_closed_without_response() {
    let (addr, _root) = start_server(200);
    let mut stream = connect(addr);

    stream.write_all(b"GET /index.html HTTP/1.1\r\nHost: loc").unwrap();
    stream.flush().unwrap();

    let mut response = Vec::new();
    let result = stream.read_to_end(&mut response);

    // El servidor cierra sin escribir nada; según la plataforma llega
    // EOF limpio o un reset
    if result.is_ok() {
        assert!(response.is_empty(), "got: {:?}", String::from_utf8_lossy(&response));
    }
}
