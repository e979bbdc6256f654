//! Command-line surface of the `selfmap` binary.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "selfmap")]
#[command(about = "Collect evidence about yourself and group it under traits")]
#[command(version)]
pub struct Cli {
    /// SQLite database file. Without it the board lives in memory only.
    #[arg(long, global = true, env = "SELFMAP_DB", value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Directory for rolling log files. Logging is off when omitted.
    #[arg(long, global = true, env = "SELFMAP_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    #[arg(long, global = true, default_value = "info", value_name = "LEVEL")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the board
    Show(ShowArgs),
    /// Add a new evidence item to the unassigned pool
    AddEvidence { text: String },
    /// Replace the text of an evidence item
    EditEvidence { id: String, text: String },
    /// Delete an evidence item
    DeleteEvidence { id: String },
    /// Append a trait with the next default name
    AddTrait,
    /// Rename a trait
    RenameTrait { id: String, name: String },
    /// Delete a trait; its evidence returns to the pool
    DeleteTrait { id: String },
    /// Drag an unassigned card and drop it onto a trait, or nowhere
    Drag(DragArgs),
    /// Move an evidence item out of a trait back to the pool
    Unassign { trait_id: String, evidence_id: String },
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[arg(long, help = "Print the board as JSON")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct DragArgs {
    pub evidence_id: String,

    #[arg(long, value_name = "TRAIT_ID", help = "Trait to drop onto; omit to drop outside")]
    pub onto: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_drag_with_target_and_global_flags() {
        let cli = Cli::try_parse_from([
            "selfmap",
            "drag",
            "evidence-1",
            "--onto",
            "trait-1",
            "--db",
            "/tmp/board.db",
        ])
        .unwrap();
        assert_eq!(cli.db.as_deref(), Some(std::path::Path::new("/tmp/board.db")));
        match cli.command {
            Command::Drag(args) => {
                assert_eq!(args.evidence_id, "evidence-1");
                assert_eq!(args.onto.as_deref(), Some("trait-1"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_defaults_to_text() {
        let cli = Cli::try_parse_from(["selfmap", "show"]).unwrap();
        assert!(matches!(cli.command, Command::Show(ref args) if !args.json));
        assert_eq!(cli.log_level, "info");
    }
}
