/// Deploy event logging
///
/// Structured JSON-line events for deploy-time actions so an operator
/// can reconstruct what a host's install/launch history actually did.
/// Events always go to the log facade; a file sink is optional.
use crate::config::types::{DeployError, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Deploy-time event types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DeployEventType {
    InstallStart,
    InstallSuccess,
    InstallFailure,
    LaunchStart,
    LaunchExec,
    LaunchFailure,
    RenderRun,
    VerifyRun,
}

/// A single deploy event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployEvent {
    /// Unique event identifier
    pub event_id: String,
    /// Seconds since the Unix epoch
    pub timestamp_secs: u64,
    pub event_type: DeployEventType,
    /// Free-form detail; must never carry secret values
    pub detail: String,
}

impl DeployEvent {
    pub fn new(event_type: DeployEventType, detail: impl Into<String>) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            timestamp_secs: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            event_type,
            detail: detail.into(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| DeployError::Config(e.to_string()))
    }
}

struct AuditSink {
    file: Option<PathBuf>,
}

static AUDIT_SINK: OnceLock<Mutex<AuditSink>> = OnceLock::new();

fn sink() -> &'static Mutex<AuditSink> {
    AUDIT_SINK.get_or_init(|| Mutex::new(AuditSink { file: None }))
}

/// Route audit events to a JSON-lines file in addition to the log facade
pub fn init_audit_log(path: Option<PathBuf>) -> Result<()> {
    if let Some(path) = &path {
        // Fail now rather than on the first event.
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                DeployError::Config(format!(
                    "Cannot open audit log {}: {}",
                    path.display(),
                    e
                ))
            })?;
    }

    let mut guard = sink().lock().expect("audit sink poisoned");
    guard.file = path;
    Ok(())
}

/// Record a deploy event
pub fn record(event: DeployEvent) {
    let line = match event.to_json() {
        Ok(line) => line,
        Err(e) => {
            warn!("Failed to serialize deploy event: {}", e);
            return;
        }
    };

    info!("deploy event: {}", line);

    let guard = sink().lock().expect("audit sink poisoned");
    if let Some(path) = &guard.file {
        let appended = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| writeln!(file, "{}", line));
        if let Err(e) = appended {
            warn!("Failed to append deploy event to {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serializes_with_type_and_detail() {
        let event = DeployEvent::new(DeployEventType::InstallSuccess, "program=youtube-stt");
        let json = event.to_json().unwrap();
        assert!(json.contains("InstallSuccess"));
        assert!(json.contains("program=youtube-stt"));
    }

    #[test]
    fn events_get_unique_ids() {
        let a = DeployEvent::new(DeployEventType::LaunchStart, "");
        let b = DeployEvent::new(DeployEventType::LaunchStart, "");
        assert_ne!(a.event_id, b.event_id);
    }

    #[test]
    fn record_without_file_sink_does_not_panic() {
        record(DeployEvent::new(DeployEventType::VerifyRun, "root=/tmp"));
    }
}
