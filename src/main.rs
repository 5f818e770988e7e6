mod app;
mod cli;
mod client;
mod commands;
mod components;
mod db;
mod logging;
mod model;
mod storage;
mod theme;
mod ui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Command, NoteCommand, NotebookCommand};
use std::env;

fn main() -> Result<()> {
    let mut args = cli::Cli::parse();
    let command = args.command.take().unwrap_or(Command::Tui);
    let location = match (&command, args.store_dir.as_deref()) {
        (Command::Init, Some(dir)) => storage::init_store_at(dir)?,
        (Command::Init, None) => {
            let cwd = env::current_dir().context("reading current directory")?;
            storage::init_project_store(&cwd)?
        }
        (_, explicit) => storage::locate_store(explicit)?,
    };
    let _logger = logging::init_logging(args.log_level(), &location.log_dir())?;

    match command {
        Command::Init => commands::init(&location),
        Command::Notebook(NotebookCommand::Add { name }) => commands::notebook_add(&location, name),
        Command::Notebook(NotebookCommand::List) => commands::notebook_list(&location),
        Command::Notebook(NotebookCommand::Rename { notebook_id, name }) => {
            commands::notebook_rename(&location, notebook_id, name)
        }
        Command::Notebook(NotebookCommand::Delete { notebook_id }) => {
            commands::notebook_delete(&location, notebook_id)
        }
        Command::Note(NoteCommand::Add {
            notebook_id,
            fields,
        }) => commands::note_add(&location, notebook_id, fields),
        Command::Note(NoteCommand::List { notebook_id }) => {
            commands::note_list(&location, notebook_id)
        }
        Command::Note(NoteCommand::Edit { note_id, fields }) => {
            commands::note_edit(&location, note_id, fields)
        }
        Command::Note(NoteCommand::Delete {
            notebook_id,
            note_id,
        }) => commands::note_delete(&location, notebook_id, note_id),
        Command::Theme { toggle } => commands::theme(&location, toggle),
        Command::Tui => commands::tui(&location),
    }
}
