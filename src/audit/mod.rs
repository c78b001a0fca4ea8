//! Audit log: SQLite-based write history.
//!
//! Every step of every executed write plan (set, update, delete) is
//! recorded in a local SQLite database next to the vault file, at
//! `<vault_dir>/audit.db`.
//!
//! Designed for graceful degradation: if the database can't be opened or
//! written to, operations silently continue without logging.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::errors::{ExplorerError, Result};
use crate::sync::WritePlan;
use crate::vault::ExecutionOutcome;

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub secret_name: String,
    pub plan_kind: String,
    pub changed_by: String,
    pub details: Option<String>,
}

/// SQLite-backed audit log.
pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open (or create) the audit database at `<dir>/audit.db`.
    ///
    /// Returns `None` if the database can't be opened; callers should
    /// treat this as "audit logging unavailable" and continue normally.
    pub fn open(dir: &Path) -> Option<Self> {
        let db_path = Self::db_path(dir);
        let conn = Connection::open(&db_path).ok()?;

        // Owner-only, the log names every secret.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_log (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp   TEXT NOT NULL,
                operation   TEXT NOT NULL,
                secret_name TEXT NOT NULL,
                plan_kind   TEXT NOT NULL,
                changed_by  TEXT NOT NULL,
                details     TEXT
            );",
        )
        .ok()?;

        Some(Self { conn })
    }

    /// Record one step. Fire-and-forget, errors are silently ignored.
    pub fn log(
        &self,
        operation: &str,
        secret_name: &str,
        plan_kind: &str,
        changed_by: &str,
        details: Option<&str>,
    ) {
        let now = Utc::now().to_rfc3339();
        let _ = self.conn.execute(
            "INSERT INTO audit_log (timestamp, operation, secret_name, plan_kind, changed_by, details)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![now, operation, secret_name, plan_kind, changed_by, details],
        );
    }

    /// Record the steps of an executed plan.
    ///
    /// A cleanup step that failed is logged as `orphaned` with the reason.
    pub fn log_plan(&self, plan: &WritePlan, outcome: &ExecutionOutcome, changed_by: &str) {
        let kind = plan.kind.to_string();
        self.log(plan.primary.verb(), plan.primary.name(), &kind, changed_by, None);

        if let Some(cleanup) = &plan.cleanup {
            match outcome {
                ExecutionOutcome::Completed { .. } => {
                    self.log(cleanup.verb(), cleanup.name(), &kind, changed_by, None);
                }
                ExecutionOutcome::PartiallyApplied { reason, .. } => {
                    self.log("orphaned", cleanup.name(), &kind, changed_by, Some(reason));
                }
            }
        }
    }

    /// Query recent audit entries.
    ///
    /// - `limit`: maximum number of entries to return (most recent first).
    /// - `since`: if provided, only return entries newer than this timestamp.
    pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let since_str = since.map(|ts| ts.to_rfc3339());

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, operation, secret_name, plan_kind, changed_by, details
                 FROM audit_log
                 WHERE ?1 IS NULL OR timestamp >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
            )
            .map_err(|e| ExplorerError::AuditError(format!("query prepare: {e}")))?;

        let rows = stmt
            .query_map(rusqlite::params![since_str, limit_i64], |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    operation: row.get(2)?,
                    secret_name: row.get(3)?,
                    plan_kind: row.get(4)?,
                    changed_by: row.get(5)?,
                    details: row.get(6)?,
                })
            })
            .map_err(|e| ExplorerError::AuditError(format!("query exec: {e}")))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| ExplorerError::AuditError(format!("row parse: {e}")))?);
        }

        Ok(entries)
    }

    /// Return the path to the audit database.
    pub fn db_path(dir: &Path) -> PathBuf {
        dir.join("audit.db")
    }
}
