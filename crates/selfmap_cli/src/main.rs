//! `selfmap` command-line front end.
//!
//! # Responsibility
//! - Build a `BoardConfig` from flags and environment.
//! - Run one board operation, wait for it to persist, then print the board.
//!
//! # Invariants
//! - Sync failures are reported as notices and turn into a failing exit code.
//! - Logging is only initialized when a log directory is configured.

mod cli;
mod render;

use clap::Parser;
use cli::{Cli, Command};
use log::info;
use selfmap_core::{
    init_logging, BoardConfig, BoardError, BoardService, ConfigError, DragOutcome, DropTarget,
    LogLevel, LoggingError, NoticeLevel, SyncMode,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

const SYNC_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
enum CliError {
    Config(ConfigError),
    Logging(LoggingError),
    Board(BoardError),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Logging(err) => write!(f, "logging setup failed: {err}"),
            Self::Board(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Json(err) => write!(f, "json encoding failed: {err}"),
        }
    }
}

impl Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<BoardError> for CliError {
    fn from(value: BoardError) -> Self {
        Self::Board(value)
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("selfmap: {err}");
            ExitCode::FAILURE
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf, std::io::Error> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn build_config(cli: &Cli) -> Result<BoardConfig, CliError> {
    let log_dir = match &cli.log_dir {
        Some(dir) => Some(absolute(dir)?),
        None => None,
    };
    let config = BoardConfig {
        db_path: cli.db.clone(),
        log_level: cli.log_level.parse::<LogLevel>()?,
        log_dir,
        ..BoardConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Returns `Ok(false)` when the command ran but a sync failure was reported.
fn run(cli: Cli) -> Result<bool, CliError> {
    let config = build_config(&cli)?;
    if let Some(dir) = &config.log_dir {
        init_logging(config.log_level, dir)?;
    }

    let mut board = BoardService::bootstrap(&config);
    if config.db_path.is_some() && board.sync_mode() == SyncMode::LocalOnly {
        eprintln!("selfmap: storage unavailable, changes will not be saved");
    }
    info!("event=cli_command module=cli status=start");

    let json = matches!(&cli.command, Command::Show(args) if args.json);
    execute(&mut board, cli.command)?;

    if !board.wait_for_sync(SYNC_TIMEOUT) {
        eprintln!(
            "selfmap: {} change(s) still unconfirmed after {}s",
            board.pending_sync_count(),
            SYNC_TIMEOUT.as_secs()
        );
    }
    let notices = board.poll_sync();
    for notice in &notices {
        eprintln!("{}", render::notice_line(notice));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(board.snapshot())?);
    } else {
        print!("{}", render::board_text(board.snapshot()));
    }

    let failed = notices.iter().any(|n| n.level == NoticeLevel::Error);
    info!(
        "event=cli_command module=cli status={}",
        if failed { "error" } else { "ok" }
    );
    Ok(!failed)
}

fn execute(board: &mut BoardService, command: Command) -> Result<(), CliError> {
    match command {
        Command::Show(_) => {}
        Command::AddEvidence { text } => {
            let id = board.add_evidence(&text)?;
            println!("added {id}");
        }
        Command::EditEvidence { id, text } => {
            if !board.edit_evidence(&id, &text)? {
                println!("unchanged {id}");
            }
        }
        Command::DeleteEvidence { id } => board.delete_evidence(&id)?,
        Command::AddTrait => {
            let id = board.add_trait()?;
            println!("added {id}");
        }
        Command::RenameTrait { id, name } => {
            if !board.rename_trait(&id, &name)? {
                println!("unchanged {id}");
            }
        }
        Command::DeleteTrait { id } => board.delete_trait(&id)?,
        Command::Drag(args) => {
            board.drag_start(&args.evidence_id)?;
            let target = args.onto.map(DropTarget::Trait);
            if board.drag_end(target.as_ref())? == DragOutcome::SnapBack {
                println!("dropped outside a trait; nothing moved");
            }
        }
        Command::Unassign {
            trait_id,
            evidence_id,
        } => board.move_to_unassigned(&trait_id, &evidence_id)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{build_config, execute};
    use crate::cli::Cli;
    use clap::Parser;
    use selfmap_core::{BoardConfig, BoardService, LogLevel};

    #[test]
    fn config_takes_flags_and_absolutizes_log_dir() {
        let cli = Cli::try_parse_from([
            "selfmap",
            "show",
            "--log-level",
            "debug",
            "--log-dir",
            "logs",
        ])
        .unwrap();
        let config = build_config(&cli).unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert!(config.log_dir.unwrap().is_absolute());
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let cli = Cli::try_parse_from(["selfmap", "show", "--log-level", "loud"]).unwrap();
        assert!(build_config(&cli).is_err());
    }

    #[test]
    fn commands_drive_a_local_board() {
        let mut board = BoardService::local_only(&BoardConfig::default());
        execute(
            &mut board,
            Cli::try_parse_from(["selfmap", "add-evidence", "likes quiet mornings"])
                .unwrap()
                .command,
        )
        .unwrap();
        execute(
            &mut board,
            Cli::try_parse_from(["selfmap", "add-trait"]).unwrap().command,
        )
        .unwrap();

        let evidence_id = board.unassigned()[0].id.clone();
        let trait_id = board.traits()[0].id.clone();
        execute(
            &mut board,
            Cli::try_parse_from(["selfmap", "drag", evidence_id.as_str(), "--onto", trait_id.as_str()])
                .unwrap()
                .command,
        )
        .unwrap();
        assert!(board.unassigned().is_empty());
        assert_eq!(board.traits()[0].evidence[0].id, evidence_id);

        execute(
            &mut board,
            Cli::try_parse_from(["selfmap", "unassign", trait_id.as_str(), evidence_id.as_str()])
                .unwrap()
                .command,
        )
        .unwrap();
        assert_eq!(board.unassigned()[0].id, evidence_id);
    }
}
