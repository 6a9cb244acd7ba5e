//! Utilidades compartidas por los tests unitarios.

use crate::access_log::{AccessLogger, AccessRecord};
use crate::server::transport::ByteSource;
use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
        .with_test_writer()
        .try_init();
}

/// Paso del guion de un `ScriptedSource`
#[derive(Debug)]
pub enum Step {
    /// La próxima lectura entrega estos bytes
    Data(Vec<u8>),
    /// La próxima lectura vence su idle timeout
    Stall,
    /// La próxima lectura falla con este error
    Fail(io::ErrorKind),
}

impl Step {
    pub fn data(text: impl AsRef<[u8]>) -> Self {
        Step::Data(text.as_ref().to_vec())
    }
}

/// Stream en memoria que reproduce un guion de lecturas
///
/// Al agotarse el guion las lecturas retornan `Ok(0)` (cliente cerró).
#[derive(Debug, Default)]
pub struct ScriptedSource {
    steps: VecDeque<Step>,
    pub written: Vec<u8>,
    pub write_calls: usize,
    pub close_calls: usize,
    pub timed_out: bool,
    pub wrote_after_timeout: bool,
    pub fail_writes: bool,
}

impl ScriptedSource {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: steps.into(),
            ..Self::default()
        }
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn remaining_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn written_text(&self) -> String {
        String::from_utf8_lossy(&self.written).into_owned()
    }
}

impl ByteSource for ScriptedSource {
    fn read_chunk(&mut self, buf: &mut [u8], _idle_timeout: Duration) -> io::Result<usize> {
        match self.steps.pop_front() {
            None => Ok(0),
            Some(Step::Stall) => {
                self.timed_out = true;
                Err(io::Error::from(io::ErrorKind::WouldBlock))
            }
            Some(Step::Fail(kind)) => Err(io::Error::from(kind)),
            Some(Step::Data(mut data)) => {
                let read = data.len().min(buf.len());
                buf[..read].copy_from_slice(&data[..read]);
                if read < data.len() {
                    self.steps.push_front(Step::Data(data.split_off(read)));
                }
                Ok(read)
            }
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.write_calls += 1;
        if self.timed_out {
            self.wrote_after_timeout = true;
        }
        if self.fail_writes {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe));
        }
        self.written.extend_from_slice(bytes);
        Ok(())
    }

    fn close(&mut self) {
        self.close_calls += 1;
    }

    fn remote_addr(&self) -> String {
        "127.0.0.1:40000".to_string()
    }
}

/// Access logger que guarda los registros en memoria
#[derive(Debug, Default)]
pub struct CollectingLogger {
    records: Mutex<Vec<AccessRecord>>,
}

impl CollectingLogger {
    pub fn records(&self) -> Vec<AccessRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl AccessLogger for CollectingLogger {
    fn log(&self, record: &AccessRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record.clone());
        }
    }
}
