//! Commands typed at the dashboard prompt

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    disable_help_flag = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
struct PromptLine {
    #[command(subcommand)]
    command: DashboardCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum DashboardCommand {
    /// Generate a new key, optionally with a label
    #[command(visible_aliases = ["gen", "new"])]
    Generate {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        name: Vec<String>,
    },

    /// Rename a key
    #[command(visible_alias = "mv")]
    Rename {
        id: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        name: Vec<String>,
    },

    /// Revoke a key
    #[command(visible_aliases = ["delete", "rm"])]
    Revoke { id: String },

    /// Copy a key's secret to the clipboard
    #[command(visible_alias = "cp")]
    Copy { id: String },

    /// Reload keys and quota from the service
    Reload,

    /// Show available commands
    #[command(visible_alias = "?")]
    Help,

    /// Leave the dashboard
    #[command(visible_aliases = ["exit", "q"])]
    Quit,
}

pub const HELP_TEXT: &str = "\
Commands:
  generate [name...]      generate a new key (aliases: gen, new)
  rename <id> <name...>   rename a key (alias: mv)
  revoke <id>             revoke a key (aliases: delete, rm)
  copy <id>               copy a key's secret to the clipboard (alias: cp)
  reload                  reload keys and quota from the service
  help                    show this help
  quit                    leave the dashboard (aliases: exit, q)

Keys may be selected by a unique prefix of their id.";

/// Parse one prompt line; `Ok(None)` for a blank line
pub fn parse_line(line: &str) -> Result<Option<DashboardCommand>, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }

    PromptLine::try_parse_from(words)
        .map(|parsed| Some(parsed.command))
        .map_err(|_| format!("Unrecognised command '{}'. Type `help` for a list.", line.trim()))
}

/// Joined label words, `None` when no label was given
pub fn label(words: &[String]) -> Option<String> {
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}
