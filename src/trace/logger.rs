use std::{
    fs::{File, OpenOptions},
    io::{self, LineWriter, Write},
    sync::{Mutex, PoisonError},
};

use crate::config::error::ConfigError;
use crate::config::settings::Settings;
use crate::trace::trace::LifecycleEvent;

/// JSONL sink for lifecycle events.
///
/// The file is opened once, when the client is built, so a bad
/// `trace_file` surfaces as a configuration error rather than a silent
/// gap in the trace. After that, a failed write costs one warning and the
/// lifecycle step carries on.
pub struct TraceLogger {
    sink: Option<Mutex<LineWriter<File>>>,
}

impl TraceLogger {
    /// Open (or create) `path` for appending.
    pub fn open(path: &str) -> Result<Self, ConfigError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| ConfigError::TraceFile {
                path: path.to_string(),
                source,
            })?;
        Ok(Self {
            sink: Some(Mutex::new(LineWriter::new(file))),
        })
    }

    /// Logger for the configured `trace_file`; disabled when none is set.
    pub fn for_settings(settings: &Settings) -> Result<Self, ConfigError> {
        match settings.trace_file.as_deref() {
            Some(path) => Self::open(path),
            None => Ok(Self::disabled()),
        }
    }

    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn record(&self, event: &LifecycleEvent) {
        let Some(sink) = &self.sink else {
            return;
        };
        // A panic mid-write leaves at worst a torn line; keep appending.
        let mut writer = sink.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = write_event(&mut *writer, event) {
            tracing::warn!(operation = %event.operation, "lifecycle trace write failed: {}", e);
        }
    }
}

fn write_event(writer: &mut impl Write, event: &LifecycleEvent) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, event)?;
    writer.write_all(b"\n")
}
