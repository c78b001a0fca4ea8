use clap::Parser;
use kvexplorer::cli::commands::edit::EditRequest;
use kvexplorer::cli::{Cli, Commands, Context};
use kvexplorer::errors::Result;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        kvexplorer::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    // Completions need no config or vault.
    if let Commands::Completions { shell } = cli.command {
        return kvexplorer::cli::commands::completions::execute(shell);
    }

    let ctx = Context::load(cli)?;

    match cli.command {
        Commands::List { ref search } => {
            kvexplorer::cli::commands::list::execute(&ctx, search.as_deref())
        }
        Commands::Show { ref name } => kvexplorer::cli::commands::show::execute(&ctx, name),
        Commands::Copy { ref name } => kvexplorer::cli::commands::copy::execute(&ctx, name),
        Commands::Save {
            ref name,
            ref output,
        } => kvexplorer::cli::commands::save::execute(&ctx, name, output.as_deref()),
        Commands::Add {
            ref name,
            ref value,
            ref meta,
            disabled,
        } => kvexplorer::cli::commands::add::execute(&ctx, name.as_deref(), value, meta, disabled),
        Commands::Edit {
            ref name,
            ref rename,
            ref value,
            ref meta,
            ref remove_tags,
            clear_expires,
            clear_not_before,
        } => {
            let request = EditRequest {
                rename: rename.as_deref(),
                value,
                meta,
                remove_tags,
                clear_expires,
                clear_not_before,
            };
            kvexplorer::cli::commands::edit::execute(&ctx, name, &request)
        }
        Commands::Toggle { ref name } => kvexplorer::cli::commands::toggle::execute(&ctx, name),
        Commands::Delete { ref name, force } => {
            kvexplorer::cli::commands::delete::execute(&ctx, name, force)
        }
        Commands::Audit { last, ref since } => audit(&ctx, last, since.as_deref()),
        Commands::Completions { .. } => Ok(()),
    }
}

#[cfg(feature = "audit-log")]
fn audit(ctx: &Context, last: usize, since: Option<&str>) -> Result<()> {
    kvexplorer::cli::commands::audit_cmd::execute(ctx, last, since)
}

#[cfg(not(feature = "audit-log"))]
fn audit(_ctx: &Context, _last: usize, _since: Option<&str>) -> Result<()> {
    Err(kvexplorer::errors::ExplorerError::AuditError(
        "this build has no audit log (enable the `audit-log` feature)".into(),
    ))
}
