//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::content::DisplayValue;
use crate::vault::{SecretMetadata, SecretRecord};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of secret metadata.
pub fn print_secrets_table(secrets: &[SecretMetadata]) {
    if secrets.is_empty() {
        info("No secrets found.");
        tip("Run `kvx add <NAME>` to add a secret.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Type", "Enabled", "Expires", "Updated", "Changed by"]);

    for s in secrets {
        let enabled = if s.enabled {
            style("yes").green().to_string()
        } else {
            style("no").red().to_string()
        };
        table.add_row(vec![
            s.name.clone(),
            s.content_type.display_name().to_string(),
            enabled,
            s.expires
                .map(|e| e.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            s.updated.format("%Y-%m-%d %H:%M:%S").to_string(),
            s.changed_by.clone().unwrap_or_default(),
        ]);
    }

    println!("{table}");
}

/// Print a secret's metadata block followed by its decoded value.
pub fn print_secret(record: &SecretRecord, value: &DisplayValue) {
    let meta = SecretMetadata::from(record);

    println!("{}  {}", style("Name:").bold(), meta.name);
    println!("{}  {}", style("Type:").bold(), meta.content_type.display_name());
    println!(
        "{}  {}",
        style("Enabled:").bold(),
        if meta.enabled { "yes" } else { "no" }
    );
    if let Some(nb) = record.attributes.not_before {
        println!("{}  {}", style("Valid from:").bold(), nb.to_rfc3339());
    }
    if let Some(exp) = meta.expires {
        println!("{}  {}", style("Expires:").bold(), exp.to_rfc3339());
    }
    println!(
        "{}  {}",
        style("Updated:").bold(),
        meta.updated.format("%Y-%m-%d %H:%M:%S")
    );
    if let Some(fp) = meta.fingerprint {
        println!("{}  {}", style("Fingerprint:").bold(), style(fp).dim());
    }
    if let Some(who) = meta.changed_by {
        println!("{}  {}", style("Changed by:").bold(), who);
    }
    for (k, v) in crate::sync::custom_tags(&record.tags) {
        println!("{}  {k}={v}", style("Tag:").bold());
    }

    println!();
    println!("{value}");
}
