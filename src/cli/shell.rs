//! Interactive line-based editing session.
use console::style;
use log::{debug, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::{
    format_storage_used, format_text_stats, text_stats, NoteError, NoteView, Result, Session,
    StorageMedium,
};

const HELP: &str = "\
Commands:
  list              show the note list
  new [title]       create a note and make it active
  select <id>       make a note active
  delete <id>       delete a note
  title <text>      set the active note's title
  write <text>      replace the active note's content
  append <text>     add a line to the active note's content
  save              save pending edits now
  stats             show statistics for the active note
  refresh           update relative dates now
  help              show this help
  quit              save and leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Empty,
    List,
    New(Option<String>),
    Select(String),
    Delete(String),
    Title(String),
    Write(String),
    Append(String),
    Save,
    Stats,
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellOutcome {
    Continue(Option<String>),
    Quit,
}

/// Parses one input line. The command word may be followed by any run of
/// whitespace; text arguments keep their inner spacing.
pub fn parse_shell_command(line: &str) -> std::result::Result<ShellCommand, String> {
    let line = line.trim_end_matches(&['\r', '\n'][..]);
    let trimmed = line.trim_start();
    if trimmed.trim().is_empty() {
        return Ok(ShellCommand::Empty);
    }

    let (word, rest) = match trimmed.find(char::is_whitespace) {
        Some(at) => (&trimmed[..at], trimmed[at..].trim_start()),
        None => (trimmed, ""),
    };
    let argument = rest.trim();

    let required = |name: &str| -> std::result::Result<String, String> {
        if argument.is_empty() {
            Err(format!("`{}` needs an argument", name))
        } else {
            Ok(argument.to_string())
        }
    };

    match word {
        "list" | "ls" => Ok(ShellCommand::List),
        "new" => Ok(ShellCommand::New(
            (!argument.is_empty()).then(|| argument.to_string()),
        )),
        "select" | "open" => required("select").map(ShellCommand::Select),
        "delete" | "rm" => required("delete").map(ShellCommand::Delete),
        // Titles and content may legitimately be emptied.
        "title" => Ok(ShellCommand::Title(rest.to_string())),
        "write" => Ok(ShellCommand::Write(rest.to_string())),
        "append" => Ok(ShellCommand::Append(rest.to_string())),
        "save" => Ok(ShellCommand::Save),
        "stats" => Ok(ShellCommand::Stats),
        "refresh" => Ok(ShellCommand::Refresh),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
        other => Err(format!("unknown command `{}` (try `help`)", other)),
    }
}

pub async fn execute_shell_command<M, V>(
    session: &mut Session<M, V>,
    command: ShellCommand,
) -> Result<ShellOutcome>
where
    M: StorageMedium + 'static,
    V: NoteView + 'static,
{
    let message = match command {
        ShellCommand::Empty => None,
        ShellCommand::List => {
            session.controller().lock().await.render();
            None
        }
        ShellCommand::New(title) => {
            let note = session.create(title.as_deref()).await?;
            Some(format!("Created note {}", note.id))
        }
        ShellCommand::Select(id) => {
            if session.select(&id).await? {
                None
            } else {
                Some(format!("No note with ID {}; selection unchanged", id))
            }
        }
        ShellCommand::Delete(id) => {
            session.delete(&id).await?;
            Some(format!("Deleted note {}", id))
        }
        ShellCommand::Title(text) => no_active_note_message(session.title_input(&text).await),
        ShellCommand::Write(text) => no_active_note_message(session.content_input(&text).await),
        ShellCommand::Append(text) => {
            let current = session
                .controller()
                .lock()
                .await
                .active_note()
                .map(|note| note.content.clone());
            match current {
                Some(content) => {
                    let updated = if content.is_empty() {
                        text
                    } else {
                        format!("{}\n{}", content, text)
                    };
                    no_active_note_message(session.content_input(&updated).await)
                }
                None => no_active_note_message(false),
            }
        }
        ShellCommand::Save => {
            if session.flush().await? {
                Some("Saved".to_string())
            } else {
                Some("Nothing to save".to_string())
            }
        }
        ShellCommand::Stats => {
            let controller = session.controller();
            let controller = controller.lock().await;
            let quota = controller.store().capacity_bytes();
            let used = controller.used_bytes()?;
            match controller.active_note() {
                Some(note) => {
                    let formatted = format_text_stats(&text_stats(&note.content), quota);
                    Some(format!(
                        "{}, {}, {} | all notes: {}",
                        formatted.word_count,
                        formatted.character_count,
                        formatted.storage_used,
                        format_storage_used(used, quota)
                    ))
                }
                None => Some(format!("All notes: {}", format_storage_used(used, quota))),
            }
        }
        ShellCommand::Refresh => {
            session.refresher().refresh_now().await?;
            None
        }
        ShellCommand::Help => Some(HELP.to_string()),
        ShellCommand::Quit => return Ok(ShellOutcome::Quit),
    };

    Ok(ShellOutcome::Continue(message))
}

fn no_active_note_message(applied: bool) -> Option<String> {
    (!applied).then(|| "No active note; use `new` or `select <id>` first".to_string())
}

fn report_error(e: &NoteError) {
    let text = if e.is_storage_full() {
        "Storage is full. Delete some notes to free space.".to_string()
    } else {
        e.to_string()
    };
    eprintln!("{} {}", style("error:").red().bold(), text);
}

/// Reads commands from `input` until `quit` or end of input, then flushes
/// pending edits and stops the session.
pub async fn run_shell<M, V, R>(mut session: Session<M, V>, input: R) -> Result<()>
where
    M: StorageMedium + 'static,
    V: NoteView + 'static,
    R: AsyncBufRead + Unpin,
{
    println!("{}", style("notecat shell, type `help` for commands").dim());
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        let command = match parse_shell_command(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{} {}", style("error:").red().bold(), message);
                continue;
            }
        };
        debug!("Shell command: {:?}", command);

        match execute_shell_command(&mut session, command).await {
            Ok(ShellOutcome::Quit) => break,
            Ok(ShellOutcome::Continue(Some(message))) => println!("{}", message),
            Ok(ShellOutcome::Continue(None)) => {}
            Err(e) => {
                warn!("Shell command failed: {}", e);
                report_error(&e);
            }
        }

        for e in session.take_save_errors() {
            report_error(&e);
        }
    }

    session.shutdown().await
}
