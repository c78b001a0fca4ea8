//! `kvx edit`: change a secret's value, type, tags, validity, or name.
//!
//! Editing never touches a disabled secret.  A rename writes the new
//! secret first and deletes the old one only after that succeeded.

use std::collections::BTreeMap;

use crate::cli::input::{self, parse_optional_timestamp, parse_tags};
use crate::cli::output;
use crate::cli::{commit_plan, confirm_duplicates, find_secret, Context, MetaArgs, ValueArgs};
use crate::content::{ContentType, DisplayValue};
use crate::errors::{ExplorerError, Result};
use crate::sync::{custom_tags, plan, PlanKind, SecretDescriptor, TagItem};
use crate::vault::SecretRecord;

/// Everything `edit` can change, besides the name.
pub struct EditRequest<'a> {
    pub rename: Option<&'a str>,
    pub value: &'a ValueArgs,
    pub meta: &'a MetaArgs,
    pub remove_tags: &'a [String],
    pub clear_expires: bool,
    pub clear_not_before: bool,
}

/// Execute the `edit` command.
pub fn execute(ctx: &Context, name: &str, request: &EditRequest<'_>) -> Result<()> {
    let mut vault = ctx.open_vault()?;
    let prior = find_secret(&vault, name)?
        .ok_or_else(|| ExplorerError::SecretNotFound(name.to_string()))?;

    if !prior.attributes.is_enabled() {
        return Err(ExplorerError::SecretDisabled(name.to_string()));
    }

    let target = request.rename.unwrap_or(name);
    if target != name && find_secret(&vault, target)?.is_some() {
        return Err(ExplorerError::SecretAlreadyExists(target.to_string()));
    }

    let desired = build_descriptor(ctx, &prior, target, request)?;

    if target == name && is_noop(&prior, &desired) && !input::has_value(request.value) {
        output::info(&format!("Nothing to change for '{name}'."));
        return Ok(());
    }

    let plan = plan(
        Some(&prior),
        &desired,
        &ctx.settings.changed_by(),
        &ctx.settings.limits(),
    )?;

    if plan.writes_value() {
        confirm_duplicates(ctx, &vault, &desired, Some(name))?;
    }

    commit_plan(ctx, &mut vault, &plan)?;

    match plan.kind {
        PlanKind::Rename => output::success(&format!("Renamed '{name}' to '{target}'")),
        PlanKind::Replace => output::success(&format!("Updated the value of '{name}'")),
        _ => output::success(&format!("Updated the metadata of '{name}'")),
    }
    Ok(())
}

/// The prior state with the requested changes applied.
fn build_descriptor(
    ctx: &Context,
    prior: &SecretRecord,
    target: &str,
    request: &EditRequest<'_>,
) -> Result<SecretDescriptor> {
    let args = request.value;
    let declared = input::declared_type(args);

    let (content_type, value) = if let Some(path) = &args.file {
        let loaded = input::load_file(
            path,
            declared,
            args.password.as_deref(),
            ctx.settings.max_file_bytes,
        )?;
        (loaded.content_type, loaded.value)
    } else if let Some(text) = &args.value {
        let ct = declared.unwrap_or_else(|| prior.content_type());
        (ct, DisplayValue::Text(text.clone()))
    } else {
        let ct = declared.unwrap_or_else(|| prior.content_type());
        let value = retyped_value(prior, &ct, args.password.as_deref())?;
        (ct, value)
    };

    let tags = edited_tags(&prior.tags, &parse_tags(&request.meta.tags)?, request.remove_tags);

    let mut attributes = prior.attributes;
    if let Some(exp) = parse_optional_timestamp(request.meta.expires.as_deref())? {
        attributes.expires = Some(exp);
    } else if request.clear_expires {
        attributes.expires = None;
    }
    if let Some(nb) = parse_optional_timestamp(request.meta.not_before.as_deref())? {
        attributes.not_before = Some(nb);
    } else if request.clear_not_before {
        attributes.not_before = None;
    }

    let mut desired = SecretDescriptor::new(target, content_type, value).with_attributes(attributes);
    desired.tags = tags;
    Ok(desired)
}

/// The prior value carried over to `content_type`, with a new
/// certificate password applied when one was given.
fn retyped_value(
    prior: &SecretRecord,
    content_type: &ContentType,
    password: Option<&str>,
) -> Result<DisplayValue> {
    let value = if *content_type == prior.content_type() {
        prior.display_value()?
    } else {
        // Reinterpret the stored text under the new type.
        DisplayValue::Text(prior.value.clone())
    };

    match (value, password) {
        (DisplayValue::Certificate(mut cert), Some(pw)) => {
            cert.password = pw.to_string();
            Ok(DisplayValue::Certificate(cert))
        }
        (_, Some(_)) => Err(ExplorerError::ContentTypeMismatch(format!(
            "'{}' is not a certificate, --password does not apply",
            prior.name
        ))),
        (value, None) => Ok(value),
    }
}

/// Custom tags after removals, then additions.
fn edited_tags(
    stored: &BTreeMap<String, String>,
    added: &[TagItem],
    removed: &[String],
) -> BTreeMap<String, String> {
    let mut tags = custom_tags(stored);
    for name in removed {
        if tags.remove(name).is_none() {
            output::warning(&format!("Tag '{name}' is not set, nothing to remove."));
        }
    }
    for tag in added {
        tags.insert(tag.name.clone(), tag.value.clone());
    }
    tags
}

/// `true` if `desired` describes exactly what is already stored.
fn is_noop(prior: &SecretRecord, desired: &SecretDescriptor) -> bool {
    prior.content_type() == desired.content_type
        && custom_tags(&prior.tags) == desired.tags
        && prior.attributes == desired.attributes
        && desired
            .raw_value()
            .map_or(false, |raw| raw == prior.value)
}
