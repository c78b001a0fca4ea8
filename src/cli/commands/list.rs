//! `kvx list`: list secrets, optionally filtered.

use regex::RegexBuilder;

use crate::cli::output;
use crate::cli::Context;
use crate::errors::{ExplorerError, Result};
use crate::vault::{SecretMetadata, VaultClient};

/// Execute the `list` command.
pub fn execute(ctx: &Context, search: Option<&str>) -> Result<()> {
    let vault = ctx.open_vault()?;
    let records = vault.list()?;

    let matcher = search.map(build_matcher).transpose()?;

    let metadata: Vec<SecretMetadata> = records
        .iter()
        .filter(|r| matcher.as_ref().map_or(true, |m| r.matches(m)))
        .map(SecretMetadata::from)
        .collect();

    if metadata.is_empty() {
        if let Some(pattern) = search {
            output::info(&format!("No secrets match '{pattern}'."));
            return Ok(());
        }
    }

    output::print_secrets_table(&metadata);
    Ok(())
}

/// Plain text search: the pattern is matched literally, ignoring case.
fn build_matcher(pattern: &str) -> Result<regex::Regex> {
    RegexBuilder::new(&regex::escape(pattern))
        .case_insensitive(true)
        .build()
        .map_err(|e| ExplorerError::CommandFailed(format!("invalid search '{pattern}': {e}")))
}
