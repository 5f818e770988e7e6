use crate::logging;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "notekeeper", version, about = "Notebooks and notes in the terminal")]
pub struct Cli {
    /// Use this directory as the store instead of the project or global one
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,
    /// Log level written to <store>/logs (trace|debug|info|warn|error|off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The `--log-level` flag, else the build's default.
    pub fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or(logging::default_log_level())
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a project store in the current directory
    Init,
    /// Manage notebooks
    #[command(subcommand)]
    Notebook(NotebookCommand),
    /// Manage notes
    #[command(subcommand)]
    Note(NoteCommand),
    /// Show the display theme, or switch it
    Theme {
        /// Switch between light and dark
        #[arg(long)]
        toggle: bool,
    },
    /// Launch the interactive TUI
    Tui,
}

#[derive(Subcommand, Debug)]
pub enum NotebookCommand {
    /// Create a notebook
    Add {
        /// Notebook name
        name: String,
    },
    /// List notebooks with their note counts
    List,
    /// Rename a notebook
    Rename {
        /// Notebook id
        notebook_id: String,
        /// New name
        name: String,
    },
    /// Delete a notebook and all its notes
    Delete {
        /// Notebook id
        notebook_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum NoteCommand {
    /// Add a note to a notebook
    Add {
        /// Notebook id
        notebook_id: String,
        #[command(flatten)]
        fields: NoteFields,
    },
    /// List the notes of a notebook, newest first
    List {
        /// Notebook id
        notebook_id: String,
    },
    /// Change a note's title and/or text
    Edit {
        /// Note id
        note_id: String,
        #[command(flatten)]
        fields: NoteFields,
    },
    /// Delete a note
    Delete {
        /// Notebook id holding the note
        notebook_id: String,
        /// Note id
        note_id: String,
    },
}

#[derive(Args, Debug)]
pub struct NoteFields {
    /// Note title
    #[arg(long)]
    pub title: Option<String>,
    /// Note text
    #[arg(long)]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_nested_note_command() {
        let cli = Cli::try_parse_from([
            "notekeeper",
            "--store-dir",
            "/tmp/nk",
            "note",
            "edit",
            "abc",
            "--title",
            "X",
        ])
        .unwrap();
        assert_eq!(cli.store_dir, Some(PathBuf::from("/tmp/nk")));
        match cli.command {
            Some(Command::Note(NoteCommand::Edit { note_id, fields })) => {
                assert_eq!(note_id, "abc");
                assert_eq!(fields.title.as_deref(), Some("X"));
                assert_eq!(fields.text, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["notekeeper"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn log_level_flag_overrides_default() {
        let cli = Cli::try_parse_from(["notekeeper", "--log-level", "warn", "tui"]).unwrap();
        assert_eq!(cli.log_level(), "warn");
        let cli = Cli::try_parse_from(["notekeeper"]).unwrap();
        assert_eq!(cli.log_level(), logging::default_log_level());
    }
}
