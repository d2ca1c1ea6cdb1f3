//! Completions command implementation
//!
//! Handles the `traffic-audit completions` command which generates
//! shell completion scripts for bash, zsh, fish, etc.

use clap::Command;
use clap_complete::{generate, Shell};
use std::io::Write;

/// Write the completion script for `shell` into `out`
///
/// The command tree comes from the binary's derived parser, so completions
/// always match the real CLI.
pub fn write_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    let bin_name = cmd.get_name().to_string();
    generate(shell, cmd, bin_name, out);
}

/// Generate shell completion scripts on stdout
///
/// # Examples
///
/// ```bash
/// # Bash
/// traffic-audit completions bash > /etc/bash_completion.d/traffic-audit
///
/// # Zsh
/// traffic-audit completions zsh > ~/.zfunc/_traffic-audit
///
/// # Fish
/// traffic-audit completions fish > ~/.config/fish/completions/traffic-audit.fish
/// ```
pub fn cmd_completions(shell: Shell, mut cmd: Command) {
    write_completions(shell, &mut cmd, &mut std::io::stdout());
}
