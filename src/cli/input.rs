//! Turning command-line input into secret values, tags and dates.

use std::io::{self, IsTerminal, Read};
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};

use crate::cli::{output, ValueArgs};
use crate::content::{CertificateValueObject, ContentType, DisplayValue};
use crate::errors::{ExplorerError, Result};
use crate::sync::TagItem;

/// A value read from the user together with the content type it implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedValue {
    pub content_type: ContentType,
    pub value: DisplayValue,
}

/// The content type named by `--content-type`, if any.
pub fn declared_type(args: &ValueArgs) -> Option<ContentType> {
    args.content_type.as_deref().map(ContentType::from_cli_name)
}

/// `true` if the arguments carry a new value (inline or from a file).
pub fn has_value(args: &ValueArgs) -> bool {
    args.value.is_some() || args.file.is_some()
}

/// Read the value for `name` from, in order: `--file`, `--value`, piped
/// stdin, or an interactive prompt.
pub fn read_value(args: &ValueArgs, name: &str, max_file_bytes: u64) -> Result<LoadedValue> {
    if let Some(path) = &args.file {
        return load_file(
            path,
            declared_type(args),
            args.password.as_deref(),
            max_file_bytes,
        );
    }

    let text = read_text(args.value.as_deref(), name)?;
    Ok(LoadedValue {
        content_type: declared_type(args).unwrap_or_default(),
        value: DisplayValue::Text(text),
    })
}

/// Load a file as a secret value.
///
/// Certificates keep their bytes verbatim; every other type must be
/// UTF-8 text.  Without a declared type the extension decides.
pub fn load_file(
    path: &Path,
    declared: Option<ContentType>,
    password: Option<&str>,
    max_file_bytes: u64,
) -> Result<LoadedValue> {
    let size = std::fs::metadata(path)
        .map_err(|e| ExplorerError::CommandFailed(format!("cannot read {}: {e}", path.display())))?
        .len();
    if size > max_file_bytes {
        return Err(ExplorerError::OversizedValue {
            size: usize::try_from(size).unwrap_or(usize::MAX),
            max: usize::try_from(max_file_bytes).unwrap_or(usize::MAX),
        });
    }

    let content_type = declared.unwrap_or_else(|| ContentType::from_extension(path));
    let bytes = std::fs::read(path)?;

    let value = if content_type.is_certificate() {
        DisplayValue::Certificate(CertificateValueObject::from_file_bytes(bytes, password))
    } else {
        let text = String::from_utf8(bytes).map_err(|_| {
            ExplorerError::SerializationError(format!(
                "{} is not UTF-8 text; pass --content-type pfx or cer for certificates",
                path.display()
            ))
        })?;
        DisplayValue::Text(text)
    };

    Ok(LoadedValue {
        content_type,
        value,
    })
}

/// Inline value, then piped stdin, then a hidden prompt.
fn read_text(inline: Option<&str>, name: &str) -> Result<String> {
    if let Some(v) = inline {
        output::warning("Value provided on command line — it may appear in shell history.");
        return Ok(v.to_string());
    }

    if !io::stdin().is_terminal() {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf.trim_end_matches(['\r', '\n']).to_string());
    }

    dialoguer::Password::new()
        .with_prompt(format!("Enter value for {name}"))
        .interact()
        .map_err(|e| ExplorerError::CommandFailed(format!("input prompt: {e}")))
}

/// Parse repeated `--tag NAME=VALUE` arguments.
pub fn parse_tags(raw: &[String]) -> Result<Vec<TagItem>> {
    raw.iter().map(|s| TagItem::parse(s)).collect()
}

/// Parse a date given as RFC 3339 or `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            ExplorerError::InvalidAttributes(format!(
                "'{s}' is not a date (use YYYY-MM-DD or RFC 3339)"
            ))
        })
}

/// Parse an optional date argument.
pub fn parse_optional_timestamp(s: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    s.map(parse_timestamp).transpose()
}
