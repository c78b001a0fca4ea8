//! `kvx show`: print a secret's decoded value and metadata.

use crate::cli::output;
use crate::cli::Context;
use crate::errors::Result;
use crate::vault::VaultClient;

/// Execute the `show` command.
pub fn execute(ctx: &Context, name: &str) -> Result<()> {
    let vault = ctx.open_vault()?;
    let record = vault.get(name)?;
    let value = record.display_value()?;

    output::print_secret(&record, &value);
    Ok(())
}
