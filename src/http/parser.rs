//! # Parser Incremental de Requests
//! src/http/parser.rs
//!
//! Máquina de estados que recibe los bytes del request en trozos de
//! cualquier tamaño y arma el [`Request`] cuando el mensaje está completo.
//! Nunca asume que una sola lectura trae el mensaje entero: una línea
//! cortada entre dos lecturas queda en `pending` hasta que llega su CRLF.
//!
//! ```text
//! AwaitingRequestLine → AwaitingHeaders → AwaitingBody → Complete
//!                                  └──────────────────────↗
//! ```
//!
//! La memoria está acotada: el head (request line + headers) no puede
//! pasar de `max_header_bytes` y el body de `max_body_bytes`.

use super::request::{parse_header_line, parse_request_line, Request, RequestLine};
use crate::error::HttpError;
use std::collections::HashMap;
use std::mem;

const CRLF: &[u8] = b"\r\n";

/// Límites de memoria por conexión
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Máximo de bytes entre el inicio del request y la línea vacía inclusive
    pub max_header_bytes: usize,

    /// Máximo `content-length` aceptado
    pub max_body_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_header_bytes: 8 * 1024,
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Estado observable del parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    AwaitingRequestLine,
    AwaitingHeaders,
    AwaitingBody,
    Complete,
}

/// Etapa interna; guarda lo ya parseado para no tener campos opcionales
#[derive(Debug)]
enum Stage {
    RequestLine,
    Headers(RequestLine),
    Body(RequestLine, usize),
    Done,
}

/// Parser incremental de un único request
#[derive(Debug)]
pub struct RequestParser {
    limits: Limits,
    stage: Stage,

    /// Bytes recibidos que todavía no forman una línea completa
    pending: Vec<u8>,

    /// Bytes del head ya consumidos (líneas completas con su CRLF)
    head_bytes: usize,

    /// Total de bytes recibidos por `feed`
    received: usize,

    headers: HashMap<String, String>,
    body: Vec<u8>,
    finished: Option<Request>,
}

impl RequestParser {
    pub fn new(limits: Limits) -> Self {
        Self {
            limits,
            stage: Stage::RequestLine,
            pending: Vec::new(),
            head_bytes: 0,
            received: 0,
            headers: HashMap::new(),
            body: Vec::new(),
            finished: None,
        }
    }

    /// Estado actual de la máquina
    pub fn state(&self) -> ParseState {
        match self.stage {
            Stage::RequestLine => ParseState::AwaitingRequestLine,
            Stage::Headers(_) => ParseState::AwaitingHeaders,
            Stage::Body(..) => ParseState::AwaitingBody,
            Stage::Done => ParseState::Complete,
        }
    }

    /// Total de bytes entregados al parser hasta ahora
    pub fn bytes_received(&self) -> usize {
        self.received
    }

    /// Request line ya parseada, si la hay
    ///
    /// Sigue disponible después de un error en los headers o el body;
    /// es `None` al inicio y una vez entregado el request.
    pub(crate) fn request_line(&self) -> Option<&RequestLine> {
        match &self.stage {
            Stage::Headers(line) | Stage::Body(line, _) => Some(line),
            Stage::RequestLine | Stage::Done => None,
        }
    }

    /// Entrega el siguiente trozo de bytes
    ///
    /// # Retorna
    ///
    /// * `Ok(Some(request))` - El mensaje quedó completo con este trozo
    /// * `Ok(None)` - Faltan bytes (o el request ya se entregó antes)
    /// * `Err(HttpError)` - Request inválido o fuera de los límites
    ///
    /// Los bytes que sobran después del body se descartan: no hay
    /// conexiones persistentes.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Option<Request>, HttpError> {
        if matches!(self.stage, Stage::Done) {
            return Ok(None);
        }

        self.received += chunk.len();
        self.pending.extend_from_slice(chunk);

        let mut cursor = 0;
        while self.reading_head() {
            let Some(offset) = find_crlf(&self.pending[cursor..]) else {
                break;
            };
            let line_start = cursor;
            let line_end = cursor + offset;
            cursor = line_end + CRLF.len();

            self.head_bytes += offset + CRLF.len();
            if self.head_bytes > self.limits.max_header_bytes {
                return Err(self.header_overflow());
            }

            let line = &self.pending[line_start..line_end];
            if matches!(self.stage, Stage::RequestLine) {
                let request_line = parse_request_line(line)?;
                self.stage = Stage::Headers(request_line);
            } else if line.is_empty() {
                self.finish_head()?;
            } else {
                let (name, value) = parse_header_line(line)?;
                self.headers.insert(name, value);
            }
        }

        if self.reading_head() {
            // Línea parcial: se conserva para la próxima lectura
            let partial = self.pending.len() - cursor;
            if self.head_bytes + partial > self.limits.max_header_bytes {
                return Err(self.header_overflow());
            }
            self.pending.drain(..cursor);
            return Ok(None);
        }

        if let Stage::Body(_, length) = self.stage {
            let available = &self.pending[cursor..];
            let wanted = (length - self.body.len()).min(available.len());
            self.body.extend_from_slice(&available[..wanted]);

            if self.body.len() == length {
                self.complete();
            }
        }

        self.pending.clear();
        Ok(self.finished.take())
    }

    fn reading_head(&self) -> bool {
        matches!(self.stage, Stage::RequestLine | Stage::Headers(_))
    }

    fn header_overflow(&self) -> HttpError {
        HttpError::HeaderBlockTooLarge {
            limit: self.limits.max_header_bytes,
        }
    }

    /// Procesa la línea vacía: decide si hay body que esperar
    fn finish_head(&mut self) -> Result<(), HttpError> {
        let length = self.content_length()?;
        if length > self.limits.max_body_bytes {
            return Err(HttpError::BodyTooLarge {
                length,
                limit: self.limits.max_body_bytes,
            });
        }

        if length == 0 {
            self.complete();
        } else if let Stage::Headers(line) = mem::replace(&mut self.stage, Stage::Done) {
            self.body = Vec::with_capacity(length);
            self.stage = Stage::Body(line, length);
        }
        Ok(())
    }

    fn content_length(&self) -> Result<usize, HttpError> {
        match self.headers.get("content-length") {
            Some(value) => value
                .parse()
                .map_err(|_| HttpError::MalformedHeaderLine(format!("content-length: {}", value))),
            None => Ok(0),
        }
    }

    /// Arma el request final y pasa a `Complete`
    fn complete(&mut self) {
        match mem::replace(&mut self.stage, Stage::Done) {
            Stage::Headers(line) | Stage::Body(line, _) => {
                self.finished = Some(Request::from_parts(
                    line,
                    mem::take(&mut self.headers),
                    mem::take(&mut self.body),
                ));
            }
            Stage::RequestLine | Stage::Done => {}
        }
    }
}

fn find_crlf(haystack: &[u8]) -> Option<usize> {
    haystack.windows(CRLF.len()).position(|window| window == CRLF)
}
