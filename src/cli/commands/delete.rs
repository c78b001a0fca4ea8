//! `kvx delete`: remove a secret from the vault.

use crate::cli::output;
use crate::cli::{record_event, Context};
use crate::errors::Result;
use crate::vault::VaultClient;

/// Execute the `delete` command.
pub fn execute(ctx: &Context, name: &str, force: bool) -> Result<()> {
    let mut vault = ctx.open_vault()?;

    // Fail on a missing name before asking anything.
    vault.get(name)?;

    if !force && !ctx.confirm(&format!("Delete secret '{name}'?"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    vault.delete(name)?;
    record_event(ctx, "delete", name, None);

    output::success(&format!(
        "Deleted secret '{name}' ({} left)",
        vault.secret_count()
    ));
    Ok(())
}
