//! CLI module for the notecat application
//!
//! This module handles the one-shot commands and hands the `shell` command
//! over to an interactive session.
use std::{
    fs::{read_to_string, OpenOptions},
    io::{stdin, stdout, Write},
    path::{Path, PathBuf},
    process::Command,
};

use console::style;
use log::{debug, info};
use shell_words::split;
use tempfile::Builder;
use tokio::io::BufReader;

use crate::{
    format_date, format_storage_used, format_text_stats, run_shell, text_stats, Commands, Config,
    Controller, EditNoteOptions, FileMedium, Note, NoteError, NoteStore, NoteView, NullView,
    Result, Session, TerminalView,
};

/// CLI Application handler - processes CLI commands against the note store
pub struct App {
    /// Application configuration
    config: Config,

    /// Where the configuration was loaded from
    config_path: PathBuf,

    /// Whether to display verbose output
    verbose: bool,
}

impl App {
    pub fn new(config: Config, config_path: PathBuf, verbose: bool) -> Self {
        Self {
            config,
            config_path,
            verbose,
        }
    }

    /// Run the CLI application with the given command
    pub async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::List { limit, json } => self.list_notes(limit, json)?,
            Commands::New { title } => self.create_note(title)?,
            Commands::Show { id, json } => self.show_note(id, json)?,
            Commands::Select { id } => self.select_note(&id)?,
            Commands::Edit(options) => self.handle_edit(options)?,
            Commands::Delete { id, force } => self.handle_delete(&id, force)?,
            Commands::Stats { id } => self.show_stats(id)?,
            Commands::Shell => self.run_shell().await?,
            Commands::Config { show, reset } => self.handle_config(show, reset)?,
        }

        Ok(())
    }

    fn open_store(&self) -> Result<NoteStore<FileMedium>> {
        let medium = FileMedium::open(&self.config.data_file, self.config.capacity_bytes)?;
        Ok(NoteStore::new(medium))
    }

    fn load_controller<V: NoteView>(&self, view: V) -> Result<Controller<FileMedium, V>> {
        Controller::load(self.open_store()?, view)
    }

    /// Resolves an explicit id or the active note; a missing note is `NotFound`.
    fn resolve_note(
        &self,
        controller: &Controller<FileMedium, NullView>,
        id: Option<String>,
    ) -> Result<Note> {
        match id {
            Some(id) => controller
                .store()
                .get(&id)?
                .ok_or(NoteError::NotFound { id }),
            None => controller
                .active_note()
                .cloned()
                .ok_or_else(|| NoteError::Application {
                    message: "No active note. Create one with `notecat new`.".to_string(),
                }),
        }
    }

    fn list_notes(&self, limit: usize, json: bool) -> Result<()> {
        let controller = self.load_controller(NullView)?;
        let mut notes = controller.notes().to_vec();
        let total = notes.len();
        if limit > 0 && notes.len() > limit {
            notes.truncate(limit);
        }

        if json {
            println!("{}", serde_json::to_string_pretty(&notes)?);
            return Ok(());
        }

        if notes.is_empty() {
            println!("No notes yet.");
            return Ok(());
        }

        let active_id = controller.active_note_id();
        for note in &notes {
            let marker = if active_id == Some(note.id.as_str()) { "▶" } else { " " };
            println!(
                "{} {}  {}  {}",
                marker,
                style(note.display_title()).bold(),
                style(format_date(note.updated_at)).dim(),
                style(&note.id).dim()
            );
        }

        let used = controller.used_bytes()?;
        println!(
            "\n{} of {} note{} | storage used: {}",
            notes.len(),
            total,
            if total == 1 { "" } else { "s" },
            format_storage_used(used, self.config.capacity_bytes)
        );
        Ok(())
    }

    fn create_note(&self, title: Option<String>) -> Result<()> {
        let mut controller = self.load_controller(NullView)?;
        let note = controller.new_note(title.as_deref())?;
        println!("Note created with ID: {}", note.id);
        Ok(())
    }

    fn show_note(&self, id: Option<String>, json: bool) -> Result<()> {
        let controller = self.load_controller(NullView)?;
        let note = self.resolve_note(&controller, id)?;

        if json {
            println!("{}", serde_json::to_string_pretty(&note)?);
            return Ok(());
        }

        println!("{}", style(note.display_title()).bold().underlined());
        println!(
            "{}",
            style(format!(
                "Created {} | Updated {} | {}",
                format_date(note.created_at),
                format_date(note.updated_at),
                note.id
            ))
            .dim()
        );
        if !note.content.is_empty() {
            println!("\n{}", note.content);
        }
        Ok(())
    }

    fn select_note(&self, id: &str) -> Result<()> {
        let mut controller = self.load_controller(NullView)?;
        if controller.select_note(id)? {
            println!("Active note: {}", id);
        } else {
            println!("No note with ID {}; selection unchanged.", id);
        }
        Ok(())
    }

    fn handle_edit(&self, options: EditNoteOptions) -> Result<()> {
        // Validate input - check for conflicting options
        let sources = [
            options.content.is_some(),
            options.file.is_some(),
            options.open_editor,
        ];
        if sources.iter().filter(|set| **set).count() > 1 {
            return Err(NoteError::Application {
                message: "Use only one of --content, --file and --editor".to_string(),
            });
        }
        if options.title.is_none() && !sources.iter().any(|set| *set) {
            return Err(NoteError::Application {
                message: "Nothing to edit: pass --title, --content, --file or --editor"
                    .to_string(),
            });
        }

        let mut controller = self.load_controller(NullView)?;
        if let Some(id) = &options.id {
            if !controller.select_note(id)? {
                return Err(NoteError::NotFound { id: id.clone() });
            }
        }
        let note = controller
            .active_note()
            .cloned()
            .ok_or_else(|| NoteError::Application {
                message: "No active note to edit".to_string(),
            })?;

        if let Some(title) = &options.title {
            controller.on_title_changed(title);
        }

        let new_content = if let Some(content) = options.content {
            Some(content)
        } else if let Some(file_path) = options.file {
            Some(self.read_content_from_file(&file_path)?)
        } else if options.open_editor {
            Some(self.open_editor_with_content(&note.content)?)
        } else {
            None
        };
        if let Some(content) = new_content {
            controller.on_content_changed(&content);
        }

        controller.save_active()?;
        println!("Note {} updated successfully", note.id);
        Ok(())
    }

    fn read_content_from_file(&self, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(NoteError::Application {
                message: format!("Not a file: {}", path.display()),
            });
        }
        read_to_string(path).map_err(NoteError::Io)
    }

    fn open_editor_with_content(&self, existing_content: &str) -> Result<String> {
        let temp_file = Builder::new().suffix(".md").tempfile()?;
        let temp_path = temp_file.path().to_path_buf();

        {
            let mut file = OpenOptions::new().write(true).open(&temp_path)?;
            file.write_all(existing_content.as_bytes())?;
        }

        let editor_cmd = self.config.get_editor_command();
        info!("Opening editor to edit note content. Save and exit when done...");
        self.launch_editor(&editor_cmd, &temp_path)?;

        Ok(read_to_string(&temp_path)?)
    }

    fn launch_editor(&self, editor_cmd: &str, file_path: &Path) -> Result<()> {
        let args = split(editor_cmd).map_err(|e| NoteError::Editor {
            message: format!("Failed to parse editor command: {}", e),
        })?;

        let Some((program, rest)) = args.split_first() else {
            return Err(NoteError::Editor {
                message: "Empty editor command".to_string(),
            });
        };
        debug!("Launching editor: {} {:?}", program, rest);

        let status = Command::new(program)
            .args(rest)
            .arg(file_path)
            .status()
            .map_err(|e| NoteError::Editor {
                message: format!("Failed to execute editor command: {}", e),
            })?;

        if !status.success() {
            return Err(NoteError::Editor {
                message: "Editor exited with non-zero status".to_string(),
            });
        }

        Ok(())
    }

    fn handle_delete(&self, id: &str, force: bool) -> Result<()> {
        let mut controller = self.load_controller(NullView)?;
        let note = controller
            .store()
            .get(id)?
            .ok_or_else(|| NoteError::NotFound { id: id.to_string() })?;

        if !force {
            println!("You are about to delete the following note:");
            println!("ID:      {}", note.id);
            println!("Title:   {}", note.display_title());
            println!("Updated: {}", format_date(note.updated_at));
            println!("\nThis action cannot be undone!");
            print!("Are you sure you want to delete this note? [y/N]: ");
            stdout().flush()?;

            let mut input = String::new();
            stdin().read_line(&mut input)?;
            let input = input.trim().to_lowercase();
            if input != "y" && input != "yes" {
                println!("Deletion cancelled.");
                return Ok(());
            }
        }

        controller.delete_note(id)?;
        println!(
            "Note '{}' ({}) has been permanently deleted.",
            note.display_title(),
            note.id
        );
        match controller.active_note() {
            Some(active) => println!("Active note: {} ({})", active.display_title(), active.id),
            None => println!("No notes left."),
        }
        Ok(())
    }

    fn show_stats(&self, id: Option<String>) -> Result<()> {
        let controller = self.load_controller(NullView)?;
        let quota = self.config.capacity_bytes;
        let used = controller.used_bytes()?;

        let note = match self.resolve_note(&controller, id) {
            Ok(note) => Some(note),
            Err(NoteError::Application { .. }) => None,
            Err(e) => return Err(e),
        };

        if let Some(note) = note {
            let formatted = format_text_stats(&text_stats(&note.content), quota);
            println!("{}", style(note.display_title()).bold());
            println!("  {}", formatted.word_count);
            println!("  {}", formatted.character_count);
            println!("  {}", formatted.storage_used);
        }
        println!(
            "All notes ({}): {}",
            controller.store().note_count()?,
            format_storage_used(used, quota)
        );
        Ok(())
    }

    async fn run_shell(&self) -> Result<()> {
        let view = TerminalView::stdout(self.config.capacity_bytes);
        let controller = self.load_controller(view)?;
        let session = Session::start(
            controller,
            self.config.debounce(),
            self.config.date_refresh(),
        )?;

        run_shell(session, BufReader::new(tokio::io::stdin())).await
    }

    fn handle_config(&self, show: bool, reset: bool) -> Result<()> {
        if reset {
            let defaults = Config::default();
            defaults.save(&self.config_path)?;
            println!(
                "Configuration reset to defaults at {}",
                self.config_path.display()
            );
            return Ok(());
        }

        if show || self.verbose {
            println!("Configuration file: {}", self.config_path.display());
        }
        println!("{}", serde_json::to_string_pretty(&self.config)?);
        Ok(())
    }
}
