//! Line-oriented console front-end for the task list.
//!
//! Usage:
//!
//! ```text
//! tasklist
//! > add buy milk
//! > ls
//!   1. [ ] buy milk
//! 0 done, 1 open
//! > toggle 1
//! > rm 1
//! delete "buy milk"? [y/n] y
//! > quit
//! ```
//!
//! Tasks are kept in the directory named by `TASKLIST_DATA_DIR` (default
//! `.tasklist`) under the key from `TASKLIST_STORAGE_KEY`. Log output goes to
//! stderr and is filtered by `TASKLIST_LOG`.

use std::env;
use std::io::{self, Write};
use std::sync::Arc;

use tasklist::logging::{LogConfig, LoggingError, init_tracing};
use tasklist::task::{
    adapters::file::FileKeyValueStore,
    domain::TaskId,
    ports::StorageError,
    services::{DeleteConfirmation, PersistenceSync, SyncConfig, SyncNotice, TaskStore},
};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Builder;
use tokio::sync::broadcast;
use tracing::{info, warn};

const DATA_DIR_ENV: &str = "TASKLIST_DATA_DIR";
const DEFAULT_DATA_DIR: &str = ".tasklist";
const HELP: &str = "commands: add <text> | toggle <n> | rm <n> | ls | help | quit";

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that end the console session.
#[derive(Debug, Error)]
enum ConsoleError {
    #[error("failed to initialise logging: {0}")]
    Logging(#[from] LoggingError),
    #[error("failed to open task storage: {0}")]
    Storage(#[from] StorageError),
    #[error("failed to build async runtime: {0}")]
    RuntimeInit(#[source] io::Error),
    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Rejected console input.
#[derive(Debug, Error, PartialEq, Eq)]
enum CommandError {
    #[error("unknown command '{0}'; type 'help'")]
    Unknown(String),
    #[error("'add' needs some text")]
    MissingText,
    #[error("'{0}' is not a task number")]
    BadNumber(String),
}

/// A parsed console command. Task numbers are 1-based display positions.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Add(String),
    Toggle(usize),
    Remove(usize),
    List,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, CommandError> {
    let trimmed = line.trim();
    let (verb, tail) = trimmed
        .split_once(char::is_whitespace)
        .unwrap_or((trimmed, ""));
    let argument = tail.trim();
    match verb {
        "add" if argument.is_empty() => Err(CommandError::MissingText),
        "add" => Ok(Command::Add(argument.to_owned())),
        "toggle" | "t" => parse_number(argument).map(Command::Toggle),
        "rm" | "del" => parse_number(argument).map(Command::Remove),
        "ls" | "list" | "" => Ok(Command::List),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_owned())),
    }
}

fn parse_number(raw: &str) -> Result<usize, CommandError> {
    raw.parse::<usize>()
        .ok()
        .filter(|number| *number > 0)
        .ok_or_else(|| CommandError::BadNumber(raw.to_owned()))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn say(message: impl std::fmt::Display) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{message}")
}

fn prompt() -> io::Result<()> {
    let mut out = io::stdout().lock();
    write!(out, "> ")?;
    out.flush()
}

/// Returns the task shown at 1-based position `number`.
fn task_at(tasks: &TaskStore, number: usize) -> Option<(TaskId, String)> {
    let snapshot = tasks.snapshot();
    let task = number
        .checked_sub(1)
        .and_then(|index| snapshot.tasks().as_slice().get(index))?;
    Some((task.id().clone(), task.text().to_string()))
}

fn show_list(tasks: &TaskStore) -> io::Result<()> {
    let snapshot = tasks.snapshot();
    let list = snapshot.tasks();
    let mut out = io::stdout().lock();
    if list.is_empty() {
        return writeln!(out, "no tasks yet");
    }
    for (index, task) in list.iter().enumerate() {
        let mark = if task.is_completed() { 'x' } else { ' ' };
        writeln!(out, "{:>3}. [{mark}] {}", index + 1, task.text())?;
    }
    writeln!(
        out,
        "{} done, {} open",
        list.completed_count(),
        list.pending_count()
    )
}

fn execute(
    command: &Command,
    tasks: &TaskStore,
    confirmation: &mut DeleteConfirmation,
) -> io::Result<()> {
    match command {
        Command::Add(text) => match tasks.add(text) {
            Some(_) => show_list(tasks),
            None => say("nothing to add"),
        },
        Command::Toggle(number) => {
            let toggled =
                task_at(tasks, *number).is_some_and(|(id, _)| tasks.toggle_complete(&id));
            if toggled {
                show_list(tasks)
            } else {
                say(format!("no task number {number}"))
            }
        }
        Command::Remove(number) => match task_at(tasks, *number) {
            Some((id, text)) => {
                confirmation.request(id);
                let mut out = io::stdout().lock();
                write!(out, "delete \"{text}\"? [y/n] ")?;
                out.flush()
            }
            None => say(format!("no task number {number}")),
        },
        Command::List => show_list(tasks),
        Command::Help => say(HELP),
        Command::Quit => Ok(()),
    }
}

fn answer_delete(
    answer: &str,
    tasks: &TaskStore,
    confirmation: &mut DeleteConfirmation,
) -> io::Result<()> {
    if !is_yes(answer) {
        confirmation.cancel();
        return say("kept");
    }
    if confirmation.confirm(tasks) {
        show_list(tasks)
    } else {
        say("that task is already gone")
    }
}

async fn print_notices(mut notices: broadcast::Receiver<SyncNotice>) {
    loop {
        match notices.recv().await {
            Ok(notice) => {
                let mut err = io::stderr().lock();
                if writeln!(err, "warning: {}", notice.user_message()).is_err() {
                    warn!(reason = notice.reason(), "could not show notice");
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "notices dropped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn data_dir() -> String {
    env::var(DATA_DIR_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DATA_DIR.to_owned())
}

async fn run() -> Result<(), ConsoleError> {
    let data_dir = data_dir();
    let storage = Arc::new(FileKeyValueStore::open(&data_dir)?);
    let config = SyncConfig::from_env();
    info!(
        data_dir = data_dir.as_str(),
        storage_key = config.storage_key.as_str(),
        "starting task list"
    );

    let tasks = TaskStore::new();
    let sync = PersistenceSync::new(tasks.clone(), storage, config);
    let notice_printer = tokio::spawn(print_notices(sync.subscribe_notices()));
    let handle = sync.start();

    let mut confirmation = DeleteConfirmation::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    say(HELP)?;
    prompt()?;
    while let Some(line) = lines.next_line().await? {
        if confirmation.pending().is_some() {
            answer_delete(&line, &tasks, &mut confirmation)?;
        } else {
            match parse_command(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => execute(&command, &tasks, &mut confirmation)?,
                Err(err) => say(err)?,
            }
        }
        if confirmation.pending().is_none() {
            prompt()?;
        }
    }

    drop(tasks);
    handle.join().await?;
    notice_printer.await?;
    info!("task list closed");
    Ok(())
}

fn main() -> Result<(), BoxError> {
    init_tracing(&LogConfig::from_env()).map_err(ConsoleError::from)?;
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(ConsoleError::RuntimeInit)?;
    runtime.block_on(run()).map_err(Into::into)
}
