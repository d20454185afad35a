use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::error::SchemaError;
use crate::schema::Schema;

/// Where introspection JSON comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    File(PathBuf),
    /// A shell command whose stdout is the introspection result, run through `bash -c`.
    Command(String),
}

impl SchemaSource {
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Command(command) => format!("`{command}`"),
        }
    }
}

/// What the explorer sees of the provider on each render.
#[derive(Debug, Clone, Default)]
pub struct ProviderSnapshot {
    pub schema: Option<Arc<Schema>>,
    pub is_fetching: bool,
    pub fetch_error: Option<String>,
}

#[derive(Debug)]
pub enum ProviderEvent {
    Fetched {
        fetch_id: u64,
        result: Result<Schema, SchemaError>,
    },
}

pub struct SchemaProvider {
    source: SchemaSource,
    snapshot: ProviderSnapshot,
    latest_fetch_id: u64,
    event_tx: Sender<ProviderEvent>,
    event_rx: Receiver<ProviderEvent>,
}

impl SchemaProvider {
    pub fn new(source: SchemaSource) -> Self {
        let (event_tx, event_rx) = mpsc::channel();
        Self {
            source,
            snapshot: ProviderSnapshot::default(),
            latest_fetch_id: 0,
            event_tx,
            event_rx,
        }
    }

    pub fn snapshot(&self) -> &ProviderSnapshot {
        &self.snapshot
    }

    /// Starts a background fetch. The current schema stays visible to the snapshot until the
    /// fetch settles; results of any earlier fetch that is still running are discarded.
    pub fn refetch(&mut self) {
        self.latest_fetch_id = self.latest_fetch_id.saturating_add(1);
        self.snapshot.is_fetching = true;
        self.snapshot.fetch_error = None;
        tracing::info!(
            fetch_id = self.latest_fetch_id,
            source = %self.source.describe(),
            "fetching schema"
        );
        Self::spawn_fetch(
            self.source.clone(),
            self.latest_fetch_id,
            self.event_tx.clone(),
        );
    }

    /// Applies up to `max_events` settled fetches. Returns `true` when the snapshot changed.
    pub fn poll_limited(&mut self, max_events: usize) -> bool {
        let mut changed = false;
        for event in self.drain_events_limited(max_events) {
            match event {
                ProviderEvent::Fetched { fetch_id, result } => {
                    if fetch_id != self.latest_fetch_id {
                        tracing::debug!(fetch_id, "ignoring superseded schema fetch");
                        continue;
                    }
                    self.apply_result(result);
                    changed = true;
                }
            }
        }
        changed
    }

    fn apply_result(&mut self, result: Result<Schema, SchemaError>) {
        self.snapshot.is_fetching = false;
        match result {
            Ok(schema) => {
                tracing::info!(types = schema.types().len(), "schema loaded");
                self.snapshot.schema = Some(Arc::new(schema));
                self.snapshot.fetch_error = None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "schema fetch failed");
                self.snapshot.schema = None;
                self.snapshot.fetch_error = Some(err.to_string());
            }
        }
    }

    fn drain_events_limited(&self, max_events: usize) -> Vec<ProviderEvent> {
        let mut events = Vec::new();
        while events.len() < max_events {
            let Ok(event) = self.event_rx.try_recv() else {
                break;
            };
            events.push(event);
        }
        events
    }

    fn spawn_fetch(source: SchemaSource, fetch_id: u64, tx: Sender<ProviderEvent>) {
        thread::spawn(move || {
            let result = load_schema(&source);
            let _ = tx.send(ProviderEvent::Fetched { fetch_id, result });
        });
    }
}

/// Loads and parses a schema synchronously.
pub fn load_schema(source: &SchemaSource) -> Result<Schema, SchemaError> {
    match source {
        SchemaSource::File(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Read {
                path: path.clone(),
                source,
            })?;
            Schema::from_introspection_str(&text)
        }
        SchemaSource::Command(command_line) => {
            let output = Command::new("bash")
                .args(["-c", command_line])
                .stdin(Stdio::null())
                .output()
                .map_err(|source| SchemaError::CommandSpawn {
                    command: command_line.clone(),
                    source,
                })?;
            if !output.status.success() {
                return Err(SchemaError::CommandFailed {
                    command: command_line.clone(),
                    code: output.status.code().unwrap_or(-1),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }
            Schema::from_introspection_str(&String::from_utf8_lossy(&output.stdout))
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/provider_tests.rs"]
mod tests;
