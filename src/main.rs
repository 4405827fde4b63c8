mod app;
mod board;
mod config;
mod form;
mod input;
mod ui;

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use tracing_subscriber::EnvFilter;

use board::storage::{CsvStore, TaskStore};
use board::{Board, Status};
use form::Form;

#[derive(Parser)]
#[command(name = "lanes", about = "A three-column kanban board for the terminal")]
struct Cli {
    /// Task file to use instead of the one named in config.toml
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Create the config file and an empty task file
    Init,
    /// Append a task to a column
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Column (todo, in_progress, done)
        #[arg(short, long, default_value = "todo")]
        status: Status,
    },
    /// List tasks grouped by column
    List {
        /// Only show one column
        #[arg(short, long)]
        status: Option<Status>,
    },
}

fn main() {
    // Install color_eyre for unexpected panics/errors (developer bugs).
    let _ = color_eyre::install();

    let cli = Cli::parse();
    let result = run_cli(cli);

    if let Err(e) = result {
        print_user_error(&e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> color_eyre::Result<()> {
    let config_dir = config::config_dir()?;
    init_logging(&config_dir);

    let config = config::load_or_init(&config_dir)?;
    let db_path = cli.db.unwrap_or(config.db_path);
    tracing::info!(db = %db_path.display(), "starting");

    match cli.command {
        Some(Command::Init) => cmd_init(&config_dir, &db_path),
        Some(Command::Add { title, description, status }) => {
            cmd_add(&db_path, &title, &description, status)
        }
        Some(Command::List { status }) => cmd_list(&db_path, status),
        None => cmd_tui(&db_path),
    }
}

/// Log to `<config dir>/lanes.log`; the terminal belongs to the UI. Logging is
/// skipped if the file cannot be opened.
fn init_logging(config_dir: &Path) {
    if std::fs::create_dir_all(config_dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config_dir.join(config::LOG_FILE))
    else {
        return;
    };
    let filter = EnvFilter::try_from_env("LANES_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

/// Print a user-friendly error message, with actionable hints for known error types.
fn print_user_error(error: &color_eyre::Report) {
    if let Some(storage_err) = error.downcast_ref::<board::storage::StorageError>() {
        match storage_err {
            board::storage::StorageError::Csv { path, line, reason } => {
                eprintln!("error: task file {} is malformed at line {line}.", path.display());
                eprintln!("  {reason}");
                eprintln!("  Fix the file by hand or point --db at another one.");
            }
            board::storage::StorageError::Io(e) => {
                eprintln!("error: could not read or write the task file.");
                eprintln!("  {e}");
            }
        }
        return;
    }

    if let Some(config_err) = error.downcast_ref::<config::ConfigError>() {
        match config_err {
            config::ConfigError::NoConfigDir => {
                eprintln!("error: could not find a config directory.");
                eprintln!("  Set XDG_CONFIG_HOME (or HOME) and try again.");
            }
            config::ConfigError::TomlDe(e) => {
                eprintln!("error: config.toml has invalid TOML syntax.");
                eprintln!("  {e}");
            }
            config::ConfigError::TomlSer(e) => {
                eprintln!("error: failed to write the default config.");
                eprintln!("  {e}");
            }
            config::ConfigError::Io(e) => {
                eprintln!("error: could not read or write the config file.");
                eprintln!("  {e}");
            }
        }
        return;
    }

    eprintln!("error: {e:#}", e = error);
}

fn cmd_init(config_dir: &Path, db_path: &Path) -> color_eyre::Result<()> {
    let store = CsvStore::open(db_path)?;
    println!("Config: {}", config_dir.join("config.toml").display());
    println!("Tasks:  {}", store.path().display());
    Ok(())
}

fn cmd_add(db_path: &Path, title: &str, description: &str, status: Status) -> color_eyre::Result<()> {
    let mut store = CsvStore::open(db_path)?;
    let mut board = Board::from_tasks(store.load()?);

    let mut form = Form::create(status);
    form.set_title(title);
    form.set_description(description);
    board.apply(form.into_submission());

    store.persist(&board.tasks())?;
    tracing::info!(%title, %status, "added task from cli");
    println!("Added to {}: {title}", status.title());
    Ok(())
}

fn cmd_list(db_path: &Path, status: Option<Status>) -> color_eyre::Result<()> {
    let store = CsvStore::open(db_path)?;
    let board = Board::from_tasks(store.load()?);

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    write_listing(&mut out, &board, status)?;
    out.flush().wrap_err("error flushing stdout")?;
    Ok(())
}

fn write_listing(out: &mut impl Write, board: &Board, status: Option<Status>) -> io::Result<()> {
    for col in board.columns() {
        if status.is_some_and(|s| s != col.status()) {
            continue;
        }
        writeln!(out, "{} ({})", col.title(), col.len())?;
        for task in col.tasks() {
            if task.description.is_empty() {
                writeln!(out, "  - {}", task.title)?;
            } else {
                writeln!(out, "  - {}: {}", task.title, task.description)?;
            }
        }
    }
    Ok(())
}

fn cmd_tui(db_path: &Path) -> color_eyre::Result<()> {
    let mut store = CsvStore::open(db_path)?;
    let mut board = Board::from_tasks(store.load()?);

    let mut terminal = ratatui::init();
    let result = app::run(&mut terminal, &mut board, &mut store);
    ratatui::restore();

    if let Some(e) = result? {
        eprintln!("warning: your last changes could not be saved to {}.", db_path.display());
        eprintln!("  {e}");
    }
    tracing::info!(tasks = board.task_count(), "exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Task;

    #[test]
    fn cmd_add_appends_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("tasks.csv");
        cmd_add(&db, "buy milk", "2%", Status::Todo).unwrap();
        cmd_add(&db, "ship", "", Status::Done).unwrap();
        cmd_add(&db, "eat sushi", "", Status::Todo).unwrap();

        let tasks = CsvStore::open(&db).unwrap().load().unwrap();
        assert_eq!(
            tasks,
            vec![
                Task::new(Status::Todo, "buy milk", "2%"),
                Task::new(Status::Todo, "eat sushi", ""),
                Task::new(Status::Done, "ship", ""),
            ]
        );
    }

    #[test]
    fn cmd_init_creates_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("sub/tasks.csv");
        cmd_init(dir.path(), &db).unwrap();
        assert!(db.exists());
        assert!(CsvStore::open(&db).unwrap().load().unwrap().is_empty());
    }

    #[test]
    fn write_listing_groups_by_column() {
        let board = Board::from_tasks(vec![
            Task::new(Status::Done, "stay cool", ""),
            Task::new(Status::Todo, "buy milk", "strawberry"),
        ]);
        let mut out = Vec::new();
        write_listing(&mut out, &board, None).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "To Do (1)\n  - buy milk: strawberry\nIn Progress (0)\nDone (1)\n  - stay cool\n"
        );
    }

    #[test]
    fn write_listing_filters_status() {
        let board = Board::from_tasks(vec![
            Task::new(Status::Done, "stay cool", ""),
            Task::new(Status::Todo, "buy milk", ""),
        ]);
        let mut out = Vec::new();
        write_listing(&mut out, &board, Some(Status::Done)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Done (1)\n  - stay cool\n");
    }

    #[test]
    fn cli_parses_status_argument() {
        let cli = Cli::try_parse_from(["lanes", "add", "x", "-s", "in_progress"]).unwrap();
        match cli.command {
            Some(Command::Add { status, .. }) => assert_eq!(status, Status::InProgress),
            _ => panic!("expected add"),
        }
        assert!(Cli::try_parse_from(["lanes", "add", "x", "-s", "blocked"]).is_err());
    }
}
