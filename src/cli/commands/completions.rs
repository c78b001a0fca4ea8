//! `kvx completions`: print a shell completion script to stdout.
//!
//!   kvx completions bash > ~/.local/share/bash-completion/completions/kvx
//!   kvx completions zsh > ~/.zfunc/_kvx

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `completions` command.
pub fn execute(shell: Shell) -> Result<()> {
    let mut stdout = io::stdout().lock();
    write_script(shell, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Render the completion script for `shell` into `out`.
fn write_script(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin, out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut buf = Vec::new();
        write_script(shell, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn bash_script_lists_subcommands() {
        let out = script(Shell::Bash);
        assert!(out.contains("kvx"));
        for sub in ["toggle", "save", "copy"] {
            assert!(out.contains(sub), "missing {sub}");
        }
    }

    #[test]
    fn fish_script_mentions_global_flags() {
        assert!(script(Shell::Fish).contains("vault-file"));
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
