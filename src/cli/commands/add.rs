//! `kvx add`: add a new secret from a value, stdin, or a file.

use std::path::Path;

use crate::cli::input::{self, parse_optional_timestamp, parse_tags};
use crate::cli::output;
use crate::cli::{commit_plan, confirm_duplicates, find_secret, Context, MetaArgs, ValueArgs};
use crate::errors::{ExplorerError, Result};
use crate::sync::{plan, PlanKind, SecretDescriptor};
use crate::vault::SecretAttributes;

/// Execute the `add` command.
pub fn execute(
    ctx: &Context,
    name: Option<&str>,
    value_args: &ValueArgs,
    meta: &MetaArgs,
    disabled: bool,
) -> Result<()> {
    let name = resolve_name(name, value_args.file.as_deref())?;

    let mut vault = ctx.open_vault()?;
    let prior = find_secret(&vault, &name)?;

    if let Some(existing) = &prior {
        if !existing.attributes.is_enabled() {
            return Err(ExplorerError::SecretDisabled(name));
        }
        if !ctx.confirm(&format!("Secret '{name}' already exists. Replace it?"))? {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let loaded = input::read_value(value_args, &name, ctx.settings.max_file_bytes)?;

    let attributes = SecretAttributes {
        enabled: Some(!disabled),
        expires: parse_optional_timestamp(meta.expires.as_deref())?,
        not_before: parse_optional_timestamp(meta.not_before.as_deref())?,
    };

    let desired = parse_tags(&meta.tags)?.into_iter().fold(
        SecretDescriptor::new(&name, loaded.content_type, loaded.value)
            .with_attributes(attributes),
        SecretDescriptor::with_tag,
    );

    let plan = plan(
        prior.as_ref(),
        &desired,
        &ctx.settings.changed_by(),
        &ctx.settings.limits(),
    )?;

    if plan.writes_value() {
        confirm_duplicates(ctx, &vault, &desired, None)?;
    }

    let written = commit_plan(ctx, &mut vault, &plan)?;

    let verb = match plan.kind {
        PlanKind::Create => "added",
        PlanKind::AttributesOnly => "unchanged (metadata updated)",
        _ => "replaced",
    };
    output::success(&format!(
        "Secret '{}' {verb} as {} ({} total)",
        written.name,
        written.content_type().display_name(),
        vault.secret_count()
    ));

    Ok(())
}

/// An explicit name wins; otherwise the stem of the imported file.
fn resolve_name(name: Option<&str>, file: Option<&Path>) -> Result<String> {
    if let Some(name) = name {
        return Ok(name.to_string());
    }
    file.and_then(|f| f.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| ExplorerError::CommandFailed("a secret name is required".into()))
}
