//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod input;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use dialoguer::Confirm;

use crate::config::Settings;
use crate::errors::{ExplorerError, Result};
use crate::sync::{find_collisions, snapshot, SecretDescriptor, WritePlan};
use crate::vault::{execute_plan, ExecutionOutcome, FileVault, SecretRecord, VaultClient};

/// kvx: key vault explorer for typed secrets.
#[derive(Parser)]
#[command(
    name = "kvx",
    about = "Explore and edit typed secrets in a key vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault file (overrides `vault_file` in .kvx.toml)
    #[arg(long, global = true, env = "KVX_VAULT_FILE")]
    pub vault_file: Option<String>,

    /// Answer yes to every confirmation prompt
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,
}

/// Value, content and metadata options shared by `add` and `edit`.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct ValueArgs {
    /// Secret value (omit for prompt or stdin)
    #[arg(long, conflicts_with = "file")]
    pub value: Option<String>,

    /// Load the value from a file (certificates, config files, ...)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Content type: secret, text, json, xml, config, pfx, cer, or a label
    #[arg(short = 't', long)]
    pub content_type: Option<String>,

    /// Password for a certificate file
    #[arg(long)]
    pub password: Option<String>,
}

/// Tag and attribute options shared by `add` and `edit`.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct MetaArgs {
    /// Custom tag NAME=VALUE (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Valid until (RFC 3339 or YYYY-MM-DD, UTC)
    #[arg(long)]
    pub expires: Option<String>,

    /// Valid from (RFC 3339 or YYYY-MM-DD, UTC)
    #[arg(long)]
    pub not_before: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// List secrets (optionally filtered by a search pattern)
    List {
        /// Case-insensitive pattern matched against names, types and tags
        search: Option<String>,
    },

    /// Show a secret's decoded value and metadata
    Show {
        /// Secret name
        name: String,
    },

    /// Copy a secret to the clipboard (the password, for certificates)
    Copy {
        /// Secret name
        name: String,
    },

    /// Save a secret to a file named `<name><extension>`
    Save {
        /// Secret name
        name: String,
        /// Output file or directory (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Add a new secret
    Add {
        /// Secret name (defaults to the file stem with --file)
        name: Option<String>,
        #[command(flatten)]
        value: ValueArgs,
        #[command(flatten)]
        meta: MetaArgs,
        /// Create the secret disabled
        #[arg(long)]
        disabled: bool,
    },

    /// Edit a secret (value, type, tags, validity, or name)
    Edit {
        /// Secret name
        name: String,
        /// New name (renames: writes the new secret, then deletes the old one)
        #[arg(long)]
        rename: Option<String>,
        #[command(flatten)]
        value: ValueArgs,
        #[command(flatten)]
        meta: MetaArgs,
        /// Remove a custom tag (repeatable)
        #[arg(long = "remove-tag")]
        remove_tags: Vec<String>,
        /// Clear the expiry date
        #[arg(long, conflicts_with = "expires")]
        clear_expires: bool,
        /// Clear the valid-from date
        #[arg(long, conflicts_with = "not_before")]
        clear_not_before: bool,
    },

    /// Enable a disabled secret or disable an enabled one
    Toggle {
        /// Secret name
        name: String,
    },

    /// Delete a secret
    Delete {
        /// Secret name
        name: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// View the audit log of vault writes
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Everything a command needs besides its own arguments.
pub struct Context {
    pub project_dir: PathBuf,
    pub settings: Settings,
    pub vault_path: PathBuf,
    pub assume_yes: bool,
}

impl Context {
    /// Load `.kvx.toml` from the working directory and apply CLI overrides.
    pub fn load(cli: &Cli) -> Result<Self> {
        let project_dir = std::env::current_dir()?;
        let settings = Settings::load(&project_dir)?;
        let vault_path = match &cli.vault_file {
            Some(path) => project_dir.join(path),
            None => settings.vault_path(&project_dir),
        };
        Ok(Self {
            project_dir,
            settings,
            vault_path,
            assume_yes: cli.yes,
        })
    }

    pub fn open_vault(&self) -> Result<FileVault> {
        FileVault::open(&self.vault_path)
    }

    /// Directory holding the vault file (and the audit database).
    pub fn vault_dir(&self) -> PathBuf {
        self.vault_path
            .parent()
            .map_or_else(|| self.project_dir.clone(), |p| p.to_path_buf())
    }

    /// Ask a yes/no question (default: no).  `--yes` answers yes.
    pub fn confirm(&self, prompt: &str) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| ExplorerError::CommandFailed(format!("confirm prompt: {e}")))
    }
}

/// Fetch a secret, mapping "not found" to `None`.
pub fn find_secret(vault: &dyn VaultClient, name: &str) -> Result<Option<SecretRecord>> {
    match vault.get(name) {
        Ok(record) => Ok(Some(record)),
        Err(ExplorerError::SecretNotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Warn about other secrets holding the same content and ask whether to
/// continue.  `exclude` names secrets that don't count (the rename source).
pub fn confirm_duplicates(
    ctx: &Context,
    vault: &dyn VaultClient,
    desired: &SecretDescriptor,
    exclude: Option<&str>,
) -> Result<()> {
    let known: Vec<_> = snapshot(&vault.list()?)
        .into_iter()
        .filter(|k| Some(k.name.as_str()) != exclude)
        .collect();

    let collisions = find_collisions(desired, &known)?;
    if collisions.is_empty() {
        return Ok(());
    }

    output::warning(&format!(
        "{} other secret(s) hold the same value (fingerprint {}): {}",
        collisions.len(),
        desired.fingerprint()?,
        collisions.join(", ")
    ));

    if ctx.confirm(&format!(
        "Save '{}' anyway and keep duplicate secrets?",
        desired.name
    ))? {
        Ok(())
    } else {
        Err(ExplorerError::UserCancelled)
    }
}

/// Execute a plan, record it in the audit log, and report the outcome.
pub fn commit_plan(
    ctx: &Context,
    vault: &mut dyn VaultClient,
    plan: &WritePlan,
) -> Result<SecretRecord> {
    let outcome = execute_plan(vault, plan)?;
    record_audit(ctx, plan, &outcome);

    if let ExecutionOutcome::PartiallyApplied {
        written,
        orphaned,
        reason,
    } = &outcome
    {
        output::warning(&format!(
            "'{}' was written, but the old secret '{orphaned}' could not be deleted: {reason}",
            written.name
        ));
        output::tip(&format!("Remove it by hand: kvx delete {orphaned}"));
    }

    Ok(outcome.written().clone())
}

/// Record a single vault operation that didn't go through a plan.
#[cfg(feature = "audit-log")]
pub fn record_event(ctx: &Context, operation: &str, secret_name: &str, details: Option<&str>) {
    if !ctx.settings.audit_enabled {
        return;
    }
    if let Some(audit) = crate::audit::AuditLog::open(&ctx.vault_dir()) {
        audit.log(
            operation,
            secret_name,
            operation,
            &ctx.settings.changed_by(),
            details,
        );
    }
}

#[cfg(not(feature = "audit-log"))]
pub fn record_event(_ctx: &Context, _operation: &str, _secret_name: &str, _details: Option<&str>) {}

#[cfg(feature = "audit-log")]
fn record_audit(ctx: &Context, plan: &WritePlan, outcome: &ExecutionOutcome) {
    if !ctx.settings.audit_enabled {
        return;
    }
    if let Some(audit) = crate::audit::AuditLog::open(&ctx.vault_dir()) {
        audit.log_plan(plan, outcome, &ctx.settings.changed_by());
    }
}

#[cfg(not(feature = "audit-log"))]
fn record_audit(_ctx: &Context, _plan: &WritePlan, _outcome: &ExecutionOutcome) {}
