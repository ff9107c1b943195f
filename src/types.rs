//! Shared types for the notecat application.
//!
//! This module contains the crate-wide `Result` alias and the command-line
//! command structures.
use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::NoteError;

/// A specialized Result type for notecat operations.
pub type Result<T> = std::result::Result<T, NoteError>;

/// Options for editing a note from the command line
#[derive(Args, Debug, Clone)]
pub struct EditNoteOptions {
    /// ID of the note to edit (defaults to the active note)
    #[clap(long)]
    pub id: Option<String>,

    /// New title for the note
    #[clap(short = 'T', long)]
    pub title: Option<String>,

    /// New content for the note
    #[clap(short, long)]
    pub content: Option<String>,

    /// Path to a file containing the new note content
    #[clap(short, long)]
    pub file: Option<PathBuf>,

    /// Open the note content in the configured editor
    #[clap(short, long = "editor")]
    pub open_editor: bool,
}

/// Available subcommands for the notecat application
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List notes, most recently updated first
    List {
        /// Limit the number of notes shown (0 means no limit)
        #[clap(short = 'n', long, default_value_t = 0)]
        limit: usize,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Create a new note and make it active
    New {
        /// Title of the note
        #[clap(short = 'T', long)]
        title: Option<String>,
    },

    /// Show a note (defaults to the active note)
    Show {
        /// ID of the note to show
        id: Option<String>,

        /// Format output as raw JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Make a note the active note
    Select {
        /// ID of the note to select
        id: String,
    },

    /// Edit the title or content of a note
    Edit(EditNoteOptions),

    /// Delete a note by ID
    Delete {
        /// ID of the note to delete
        id: String,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Show word, character and storage statistics
    Stats {
        /// ID of the note (defaults to the active note)
        id: Option<String>,
    },

    /// Start an interactive editing session
    Shell,

    /// Configuration management
    Config {
        /// Show current configuration
        #[clap(short = 'S', long)]
        show: bool,

        /// Reset configuration to defaults
        #[clap(short, long)]
        reset: bool,
    },
}
