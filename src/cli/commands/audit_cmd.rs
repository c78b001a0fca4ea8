//! `kvx audit`: display the audit log.
//!
//! Usage:
//!   kvx audit               # show last 50 entries
//!   kvx audit --last 20     # show last 20
//!   kvx audit --since 7d    # entries from last 7 days

use chrono::{DateTime, Utc};

use crate::audit::{AuditEntry, AuditLog};
use crate::cli::output;
use crate::cli::Context;
use crate::errors::{ExplorerError, Result};

/// Execute the `audit` command.
pub fn execute(ctx: &Context, last: usize, since: Option<&str>) -> Result<()> {
    let audit = AuditLog::open(&ctx.vault_dir())
        .ok_or_else(|| ExplorerError::AuditError("failed to open audit database".into()))?;

    let since_dt = since.map(parse_duration).transpose()?;
    let entries = audit.query(last, since_dt)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);
    Ok(())
}

/// Parse a human-friendly duration string like "7d", "24h", "30m" into
/// the point in time that long ago.
fn parse_duration(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();

    let (num_str, unit) = if let Some(s) = input.strip_suffix('d') {
        (s, 'd')
    } else if let Some(s) = input.strip_suffix('h') {
        (s, 'h')
    } else if let Some(s) = input.strip_suffix('m') {
        (s, 'm')
    } else {
        return Err(ExplorerError::CommandFailed(format!(
            "invalid duration '{input}', use a form like 7d, 24h or 30m"
        )));
    };

    let num: u32 = num_str.parse().map_err(|_| {
        ExplorerError::CommandFailed(format!("invalid duration '{input}': bad number"))
    })?;

    let duration = match unit {
        'd' => chrono::Duration::days(i64::from(num)),
        'h' => chrono::Duration::hours(i64::from(num)),
        _ => chrono::Duration::minutes(i64::from(num)),
    };

    Ok(Utc::now() - duration)
}

/// Print audit entries in a formatted table.
fn print_audit_table(entries: &[AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Secret", "Plan", "Changed by", "Details"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            colorize_operation(&entry.operation),
            entry.secret_name.clone(),
            entry.plan_kind.clone(),
            entry.changed_by.clone(),
            entry.details.clone().unwrap_or_else(|| "-".into()),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

/// Colorize operation names for display.
fn colorize_operation(op: &str) -> String {
    use console::style;

    match op {
        "set" => style(op).green().to_string(),
        "update" => style(op).blue().to_string(),
        "delete" => style(op).red().to_string(),
        "orphaned" => style(op).yellow().bold().to_string(),
        _ => op.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_days() {
        let dt = parse_duration("7d").unwrap();
        let diff = Utc::now() - dt;
        assert!((diff.num_days() - 7).abs() <= 1);
    }

    #[test]
    fn parse_duration_hours() {
        let dt = parse_duration("24h").unwrap();
        let diff = Utc::now() - dt;
        assert!((diff.num_hours() - 24).abs() <= 1);
    }

    #[test]
    fn parse_duration_minutes() {
        let dt = parse_duration("30m").unwrap();
        let diff = Utc::now() - dt;
        assert!((diff.num_minutes() - 30).abs() <= 1);
    }

    #[test]
    fn parse_duration_invalid() {
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("7x").is_err());
        assert!(parse_duration("d").is_err());
        assert!(parse_duration("-3d").is_err());
    }

    #[test]
    fn colorize_operation_keeps_text() {
        assert!(colorize_operation("orphaned").contains("orphaned"));
        assert_eq!(colorize_operation("custom"), "custom");
    }

    #[test]
    fn recent_entries_pass_since_filter() {
        let dir = tempfile::TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        audit.log("set", "db-pass", "create", "alice", None);

        let since = parse_duration("1h").unwrap();
        assert_eq!(audit.query(10, Some(since)).unwrap().len(), 1);
    }
}
