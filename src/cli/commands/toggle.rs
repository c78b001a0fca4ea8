//! `kvx toggle`: enable a disabled secret or disable an enabled one.

use crate::cli::output;
use crate::cli::{commit_plan, Context};
use crate::errors::Result;
use crate::sync::plan_toggle;
use crate::vault::VaultClient;

/// Execute the `toggle` command.
pub fn execute(ctx: &Context, name: &str) -> Result<()> {
    let mut vault = ctx.open_vault()?;
    let prior = vault.get(name)?;
    let enable = !prior.attributes.is_enabled();

    let verb = if enable { "Enable" } else { "Disable" };
    if !ctx.confirm(&format!("{verb} secret '{name}'?"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    let plan = plan_toggle(&prior, enable, &ctx.settings.changed_by())?;
    commit_plan(ctx, &mut vault, &plan)?;

    output::success(&format!(
        "Secret '{name}' {}",
        if enable { "enabled" } else { "disabled" }
    ));
    Ok(())
}
