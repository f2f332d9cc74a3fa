//! Operator audit trail
//!
//! Every terminal outcome of a removal produces exactly one English audit
//! line, regardless of the caller's locale. The sink is injected, so tests
//! and embedders can capture lines without touching global state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use uuid::Uuid;

/// Severity of an audit line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AuditLevel {
    /// Successful outcome
    Info,
    /// Expected rejection (not found, forbidden)
    Warn,
    /// Infrastructure failure
    Error,
}

/// A recorded audit line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique entry ID.
    pub id: Uuid,
    /// Timestamp.
    pub timestamp: DateTime<Utc>,
    /// Severity.
    pub level: AuditLevel,
    /// The audit line.
    pub message: String,
}

/// Trait for audit sinks.
pub trait AuditLog: Send + Sync {
    /// Record one audit line.
    fn record(&self, level: AuditLevel, message: &str);
}

/// Audit sink that emits through `tracing` under the `audit` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditLog;

impl AuditLog for TracingAuditLog {
    fn record(&self, level: AuditLevel, message: &str) {
        match level {
            AuditLevel::Info => tracing::info!(target: "audit", "{}", message),
            AuditLevel::Warn => tracing::warn!(target: "audit", "{}", message),
            AuditLevel::Error => tracing::error!(target: "audit", "{}", message),
        }
    }
}

/// Audit sink that keeps every entry in memory.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded entry, oldest first.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Every recorded line, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.message).collect()
    }

    /// Drop every recorded entry.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl AuditLog for MemoryAuditLog {
    fn record(&self, level: AuditLevel, message: &str) {
        let entry = AuditEntry {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            level,
            message: message.to_string(),
        };
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_log_keeps_order() {
        let log = MemoryAuditLog::new();
        log.record(AuditLevel::Warn, "first");
        log.record(AuditLevel::Info, "second");

        assert_eq!(log.lines(), vec!["first", "second"]);
        let entries = log.entries();
        assert_eq!(entries[0].level, AuditLevel::Warn);
        assert!(entries[0].timestamp <= entries[1].timestamp);

        log.clear();
        assert!(log.lines().is_empty());
    }

    #[test]
    fn test_tracing_log_does_not_require_subscriber() {
        TracingAuditLog.record(AuditLevel::Error, "no subscriber installed");
    }
}
