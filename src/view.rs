//! Rendering surfaces driven by the controller.
//!
//! The controller never formats anything itself; it hands state to a
//! `NoteView`, which decides how (and whether) to show it.

use std::io::{self, Write};

use console::style;

use crate::{
    format_date, format_relative_date, format_text_stats, now_millis, Note, TextStats,
};

/// Sidebar, editor and status bar as one rendering target.
pub trait NoteView: Send {
    /// Re-renders the sidebar list; `active_id` marks the highlighted entry.
    fn render_note_list(&mut self, notes: &[Note], active_id: Option<&str>);

    /// Loads a note into the editor fields.
    fn show_editor(&mut self, note: &Note);

    fn hide_editor(&mut self);

    fn update_status(&mut self, stats: &TextStats, created_at: i64, updated_at: i64);

    fn clear_status(&mut self);
}

/// A view that renders nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl NoteView for NullView {
    fn render_note_list(&mut self, _notes: &[Note], _active_id: Option<&str>) {}
    fn show_editor(&mut self, _note: &Note) {}
    fn hide_editor(&mut self) {}
    fn update_status(&mut self, _stats: &TextStats, _created_at: i64, _updated_at: i64) {}
    fn clear_status(&mut self) {}
}

/// Plain-terminal rendering of the three panes.
pub struct TerminalView<W: Write + Send = io::Stdout> {
    out: W,
    quota: u64,
}

impl TerminalView<io::Stdout> {
    pub fn stdout(quota: u64) -> Self {
        Self::new(io::stdout(), quota)
    }
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W, quota: u64) -> Self {
        Self { out, quota }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn separator_width() -> usize {
        terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80)
            .min(60)
    }

    // Rendering is best effort; a closed stdout must not abort an edit.
    fn emit(&mut self, text: String) {
        let _ = writeln!(self.out, "{}", text);
    }
}

impl<W: Write + Send> NoteView for TerminalView<W> {
    fn render_note_list(&mut self, notes: &[Note], active_id: Option<&str>) {
        self.emit(format!("{}", style("Notes").bold()));
        if notes.is_empty() {
            self.emit(format!("  {}", style("No notes yet").dim()));
            return;
        }

        for note in notes {
            let is_active = active_id == Some(note.id.as_str());
            let marker = if is_active { "▶" } else { " " };
            let title = if is_active {
                style(note.display_title()).bold().to_string()
            } else {
                note.display_title().to_string()
            };
            self.emit(format!(
                "{} {}  {}  {}",
                marker,
                title,
                style(format_date(note.updated_at)).dim(),
                style(&note.id).dim()
            ));
        }
    }

    fn show_editor(&mut self, note: &Note) {
        let width = Self::separator_width();
        self.emit("-".repeat(width));
        self.emit(format!("{}", style(note.display_title()).bold().underlined()));
        if !note.content.is_empty() {
            self.emit(note.content.clone());
        }
        self.emit("-".repeat(width));
    }

    fn hide_editor(&mut self) {
        self.emit(format!("{}", style("No note selected").dim()));
    }

    fn update_status(&mut self, stats: &TextStats, created_at: i64, updated_at: i64) {
        let formatted = format_text_stats(stats, self.quota);
        let now = now_millis();
        self.emit(format!(
            "{}  {}  |  {}  {}  {}",
            style(format!("Created {}", format_relative_date(created_at, now))).dim(),
            style(format!("Updated {}", format_relative_date(updated_at, now))).dim(),
            formatted.word_count,
            formatted.character_count,
            style(formatted.storage_used).cyan()
        ));
    }

    fn clear_status(&mut self) {}
}
