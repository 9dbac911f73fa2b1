//! Audit logger for scrub operations

use crate::anonymization::models::ScrubOutcome;
use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: String,
    request_id: String,
    language: String,
    detections_count: usize,
    processing_time_ms: u64,
    detections: Vec<AuditDetection>,
}

/// Audit detection entry (with hashed PII)
#[derive(Debug, Serialize)]
struct AuditDetection {
    entity_label: String,
    start: usize,
    end: usize,
    score: f64,
    /// SHA-256 hash of the detected value (never log plaintext PII)
    value_hash: String,
}

/// Audit logger for scrub operations
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    write_lock: Mutex<()>,
}

impl AuditLogger {
    /// Create an audit logger, creating the log directory if needed
    ///
    /// The engine only builds one when `audit.enabled` is set.
    pub fn new(log_path: PathBuf, json_format: bool) -> Result<Self> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create audit log directory: {}", parent.display())
            })?;
        }

        Ok(Self {
            log_path,
            json_format,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the audit log file
    pub fn log_path(&self) -> &PathBuf {
        &self.log_path
    }

    /// Log a scrub outcome
    ///
    /// `original_text` is only used to hash the detected values; offsets in
    /// the outcome refer to it.
    pub fn log_scrub(&self, original_text: &str, outcome: &ScrubOutcome) -> Result<()> {
        let entry = AuditLogEntry {
            timestamp: outcome.timestamp.to_rfc3339(),
            request_id: Uuid::new_v4().to_string(),
            language: outcome.language.clone(),
            detections_count: outcome.detections.len(),
            processing_time_ms: outcome.processing_time_ms,
            detections: outcome
                .detections
                .iter()
                .map(|d| AuditDetection {
                    entity_label: d.entity_label.clone(),
                    start: d.start,
                    end: d.end,
                    score: d.score,
                    value_hash: self.hash_pii_value(
                        original_text.get(d.start..d.end).unwrap_or_default(),
                    ),
                })
                .collect(),
        };

        self.write_entry(&entry)
    }

    /// Hash a PII value using SHA-256
    fn hash_pii_value(&self, value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        let result = hasher.finalize();
        format!("{result:x}")
    }

    /// Write an audit entry to the log file
    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let line = if self.json_format {
            serde_json::to_string(entry).context("Failed to serialize audit entry")?
        } else {
            let labels: Vec<&str> = entry
                .detections
                .iter()
                .map(|d| d.entity_label.as_str())
                .collect();
            format!(
                "[{}] Request: {} | Language: {} | Detections: {} [{}] | Time: {}ms",
                entry.timestamp,
                entry.request_id,
                entry.language,
                entry.detections_count,
                labels.join(", "),
                entry.processing_time_ms
            )
        };

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("Audit log lock poisoned"))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        writeln!(file, "{line}").context("Failed to write audit entry")?;
        Ok(())
    }
}
