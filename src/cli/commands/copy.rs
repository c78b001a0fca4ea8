//! `kvx copy`: put a secret on the clipboard.
//!
//! Certificates copy their password; the binary never goes to the
//! clipboard.

use arboard::Clipboard;

use crate::cli::output;
use crate::cli::Context;
use crate::errors::{ExplorerError, Result};
use crate::vault::VaultClient;

/// Execute the `copy` command.
pub fn execute(ctx: &Context, name: &str) -> Result<()> {
    let vault = ctx.open_vault()?;
    let record = vault.get(name)?;
    if !record.attributes.is_enabled() {
        return Err(ExplorerError::SecretDisabled(name.to_string()));
    }
    let content_type = record.content_type();
    let text = content_type.clipboard_value(&record.display_value()?)?;

    if content_type.is_certificate() && text.is_empty() {
        output::warning(&format!("Certificate '{name}' has no password, nothing copied."));
        return Ok(());
    }

    let mut clipboard =
        Clipboard::new().map_err(|e| ExplorerError::ClipboardError(e.to_string()))?;
    clipboard
        .set_text(text)
        .map_err(|e| ExplorerError::ClipboardError(e.to_string()))?;

    if content_type.is_certificate() {
        output::success(&format!("Copied the password of '{name}' to the clipboard"));
    } else {
        output::success(&format!("Copied '{name}' to the clipboard"));
    }
    Ok(())
}
