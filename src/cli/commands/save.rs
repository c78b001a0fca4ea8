//! `kvx save`: write a secret to a file named `<name><extension>`.

use std::path::{Path, PathBuf};

use crate::cli::output;
use crate::cli::Context;
use crate::content::ContentType;
use crate::errors::{ExplorerError, Result};
use crate::vault::VaultClient;

/// Execute the `save` command.
pub fn execute(ctx: &Context, name: &str, output_path: Option<&Path>) -> Result<()> {
    let vault = ctx.open_vault()?;
    let record = vault.get(name)?;
    if !record.attributes.is_enabled() {
        return Err(ExplorerError::SecretDisabled(name.to_string()));
    }
    let content_type = record.content_type();
    let bytes = content_type.export_bytes(&record.display_value()?)?;

    let target = target_path(&content_type, name, output_path, &ctx.project_dir);

    if target.exists()
        && !ctx.confirm(&format!("{} already exists. Overwrite?", target.display()))?
    {
        output::info("Cancelled.");
        return Ok(());
    }

    std::fs::write(&target, &bytes).map_err(|e| {
        ExplorerError::CommandFailed(format!("cannot write {}: {e}", target.display()))
    })?;

    output::success(&format!(
        "Saved '{name}' to {} ({} bytes)",
        target.display(),
        bytes.len()
    ));
    Ok(())
}

/// An explicit file path wins; a directory (or nothing) gets the
/// default file name inside it.
fn target_path(
    content_type: &ContentType,
    name: &str,
    output_path: Option<&Path>,
    cwd: &Path,
) -> PathBuf {
    let file_name = content_type.file_name(name);
    match output_path {
        Some(p) if p.is_dir() => p.join(file_name),
        Some(p) => p.to_path_buf(),
        None => cwd.join(file_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_target_uses_extension() {
        let cwd = Path::new("/work");
        assert_eq!(
            target_path(&ContentType::CertificatePfx, "site", None, cwd),
            PathBuf::from("/work/site.pfx")
        );
    }

    #[test]
    fn directory_target_gets_file_name() {
        let dir = TempDir::new().unwrap();
        let target = target_path(&ContentType::Json, "cfg", Some(dir.path()), Path::new("/"));
        assert_eq!(target, dir.path().join("cfg.json"));
    }

    #[test]
    fn explicit_file_target_kept() {
        let target = target_path(
            &ContentType::Json,
            "cfg",
            Some(Path::new("/tmp/out.txt")),
            Path::new("/"),
        );
        assert_eq!(target, PathBuf::from("/tmp/out.txt"));
    }
}
