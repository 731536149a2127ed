//! Command-line host for the NoteTmp scratchpad.
//!
//! # Responsibility
//! - Drive `notetmp_core` from a terminal: show, write, clear and export the
//!   scratchpad, and adjust display settings.
//! - One-shot commands flush before exit; `type` runs a small event loop that
//!   exercises the debounce the way an editor would.

use clap::{Parser, Subcommand};
use log::info;
use notetmp_core::{
    core_version, export_to_dir, init_logging, ping, Clock, ScratchpadConfig, ScratchpadSession,
    SettingsPatch, SqliteKvStore, SystemClock,
};
use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_DB_FILE_NAME: &str = "notetmp.sqlite3";

type CliSession = ScratchpadSession<SqliteKvStore, SystemClock>;

#[derive(Parser)]
#[command(name = "notetmp", version, about = "Auto-saving scratchpad whose notes expire.")]
struct Args {
    /// SQLite file holding the scratchpad. Defaults to the system temp directory.
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Hours a saved note lives before it is discarded.
    #[arg(long, default_value_t = notetmp_core::config::DEFAULT_TTL_HOURS)]
    ttl_hours: u32,

    /// Absolute directory for rolling log files. Logging is off when omitted.
    #[arg(long, value_name = "DIR")]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,

    /// Prefer the dark theme when none has been chosen yet.
    #[arg(long)]
    prefers_dark: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the current note.
    Show,
    /// Replace the note with TEXT.
    Write { text: String },
    /// Append TEXT as a new line.
    Append { text: String },
    /// Read stdin line by line into the note, committing on idle pauses.
    Type,
    /// Delete the note.
    Clear,
    /// Write the note to a dated .txt file in DIR (default: current directory).
    Export { dir: Option<PathBuf> },
    /// Print state, remaining time and word/char counts.
    Status,
    /// Show or change display settings.
    Settings {
        #[arg(long)]
        font_size: Option<u32>,
        #[arg(long)]
        tab_size: Option<u32>,
        #[arg(long)]
        line_height: Option<f64>,
    },
    /// Restore default display settings.
    SettingsReset,
    /// Switch between light and dark theme.
    ThemeToggle,
    /// Print core linkage info.
    Ping,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("notetmp: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    if let Some(log_dir) = args.log_dir.as_deref() {
        let level = args
            .log_level
            .as_deref()
            .unwrap_or_else(|| notetmp_core::default_log_level());
        init_logging(level, log_dir)?;
    }

    if matches!(args.command, Command::Ping) {
        println!("notetmp_core ping={}", ping());
        println!("notetmp_core version={}", core_version());
        return Ok(());
    }

    let db_path = args
        .db
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
    let store = SqliteKvStore::open(&db_path).map_err(|err| err.to_string())?;
    let config = ScratchpadConfig::default().with_ttl_hours(args.ttl_hours);
    let mut session = ScratchpadSession::open(store, SystemClock, config, args.prefers_dark)
        .map_err(|err| err.to_string())?;
    info!(
        "event=cli_open module=cli status=ok db={}",
        db_path.display()
    );

    let result = dispatch(&mut session, args.command);
    session.close();
    if let Some(notice) = session.storage_notice() {
        eprintln!("notetmp: warning: {notice}");
    }
    result
}

fn dispatch(session: &mut CliSession, command: Command) -> Result<(), String> {
    match command {
        Command::Show => {
            print!("{}", session.notes.content());
            if session.notes.has_content() && !session.notes.content().ends_with('\n') {
                println!();
            }
        }
        Command::Write { text } => {
            session.notes.update_content(text);
            session.notes.flush();
            print_status(session);
        }
        Command::Append { text } => {
            let mut content = session.notes.content().to_string();
            if !content.is_empty() && !content.ends_with('\n') {
                content.push('\n');
            }
            content.push_str(&text);
            session.notes.update_content(content);
            session.notes.flush();
            print_status(session);
        }
        Command::Type => type_from_stdin(session)?,
        Command::Clear => {
            session.notes.clear_notes();
            println!("Notes cleared.");
        }
        Command::Export { dir } => {
            let dir = dir.unwrap_or_else(|| PathBuf::from("."));
            let path = export_to_dir(&dir, session.notes.content(), SystemClock.now_ms())
                .map_err(|err| err.to_string())?;
            println!("Exported to {}", path.display());
        }
        Command::Status => print_status(session),
        Command::Settings {
            font_size,
            tab_size,
            line_height,
        } => {
            let patch = SettingsPatch {
                font_size,
                tab_size,
                line_height,
            };
            if !patch.is_empty() {
                session.settings.update_settings(&patch);
            }
            print_settings(session);
        }
        Command::SettingsReset => {
            session.settings.reset_settings();
            print_settings(session);
        }
        Command::ThemeToggle => {
            let theme = session.theme.toggle();
            println!("theme={}", theme.as_str());
        }
        Command::Ping => {}
    }
    Ok(())
}

fn type_from_stdin(session: &mut CliSession) -> Result<(), String> {
    let mut content = session.notes.content().to_string();
    for line in std::io::stdin().lock().lines() {
        let line = line.map_err(|err| format!("failed to read stdin: {err}"))?;
        // The wait for this line was the idle period; let a due commit land first.
        if session.notes.tick().committed {
            eprintln!("saved ({} chars)", session.notes.stats().chars);
        }
        if !content.is_empty() {
            content.push('\n');
        }
        content.push_str(&line);
        session.notes.update_content(content.as_str());
    }
    session.notes.flush();
    print_status(session);
    Ok(())
}

fn print_status(session: &CliSession) {
    let notes = &session.notes;
    let stats = notes.stats();
    println!("state={}", notes.state().as_str());
    if !notes.time_remaining().is_empty() {
        println!("expires_in={}", notes.time_remaining());
    }
    println!("words={} chars={}", stats.words, stats.chars);
}

fn print_settings(session: &CliSession) {
    let settings = session.settings.settings();
    println!("font_size={}", settings.font_size);
    println!("tab_size={}", settings.tab_size);
    println!("line_height={}", settings.line_height);
    println!("theme={}", session.theme.theme().as_str());
}
