//! Presentation components with their own small state: note cards, the note
//! editor modal, the delete confirmation and tooltips. None of them draw
//! anything; the TUI renders them.

use crate::model::{is_blank, Note, NoteDraft, NoteId, NotebookId};
use crate::utils::relative_time;
use chrono::{DateTime, Utc};
use ratatui::layout::Rect;

pub const DEFAULT_NOTE_TITLE: &str = "Untitled";

/// Resolves once. Closing an unresolved modal cancels it.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<T> {
    Pending,
    Submitted(T),
    Cancelled,
}

impl<T> Submission<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Submission::Pending)
    }

    fn resolve(&mut self, value: T) -> bool {
        if !self.is_pending() {
            return false;
        }
        *self = Submission::Submitted(value);
        true
    }

    fn cancel(&mut self) {
        if self.is_pending() {
            *self = Submission::Cancelled;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub note_id: NoteId,
    pub notebook_id: NotebookId,
    pub title: String,
    pub text: String,
    pub posted_on: DateTime<Utc>,
}

impl From<&Note> for Card {
    fn from(note: &Note) -> Self {
        Card {
            note_id: note.id.clone(),
            notebook_id: note.notebook_id.clone(),
            title: note.title.clone(),
            text: note.text.clone(),
            posted_on: note.posted_on,
        }
    }
}

impl Card {
    pub fn time_label(&self, now: DateTime<Utc>) -> String {
        relative_time(self.posted_on, now)
    }

    pub fn delete_tooltip() -> Tooltip {
        Tooltip::new("Delete note")
    }

    /// Editor prefilled with this note, showing when it was posted.
    pub fn edit_modal(&self, now: DateTime<Utc>) -> NoteModal {
        NoteModal::with_values(&self.title, &self.text, self.time_label(now))
    }

    pub fn delete_modal(&self) -> DeleteConfirmModal {
        DeleteConfirmModal::new(&self.title)
    }
}

/// Single-line or multi-line input with a byte cursor kept on a char boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct TextField {
    value: String,
    cursor: usize,
}

impl TextField {
    pub fn new(value: &str) -> Self {
        TextField {
            value: value.to_string(),
            cursor: value.len(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_left(&mut self) {
        self.cursor = prev_boundary(&self.value, self.cursor);
    }

    pub fn move_right(&mut self) {
        self.cursor = next_boundary(&self.value, self.cursor);
    }

    pub fn move_up(&mut self) {
        let (starts, line, col) = line_state(&self.value, self.cursor);
        if line == 0 {
            return;
        }
        self.cursor = index_at_col(&self.value, starts[line - 1], col);
    }

    pub fn move_down(&mut self) {
        let (starts, line, col) = line_state(&self.value, self.cursor);
        if line + 1 >= starts.len() {
            return;
        }
        self.cursor = index_at_col(&self.value, starts[line + 1], col);
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = prev_boundary(&self.value, self.cursor);
        self.value.drain(prev..self.cursor);
        self.cursor = prev;
    }

    pub fn insert_char(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn with_caret(&self) -> String {
        let mut text = self.value.clone();
        text.insert(self.cursor, '▌');
        text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalField {
    Title,
    Text,
}

/// Editor for a note's title and text.
#[derive(Debug, Clone)]
pub struct NoteModal {
    title: TextField,
    text: TextField,
    time: String,
    focus: ModalField,
    open: bool,
    submission: Submission<NoteDraft>,
}

impl Default for NoteModal {
    fn default() -> Self {
        NoteModal::with_values(DEFAULT_NOTE_TITLE, "", String::new())
    }
}

impl NoteModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(title: &str, text: &str, time: String) -> Self {
        NoteModal {
            title: TextField::new(title),
            text: TextField::new(text),
            time,
            focus: ModalField::Title,
            open: false,
            submission: Submission::Pending,
        }
    }

    /// Shows the modal with the title field focused.
    pub fn open(&mut self) {
        self.open = true;
        self.focus = ModalField::Title;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.submission.cancel();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn title(&self) -> &TextField {
        &self.title
    }

    pub fn text(&self) -> &TextField {
        &self.text
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn focus(&self) -> ModalField {
        self.focus
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            ModalField::Title => ModalField::Text,
            ModalField::Text => ModalField::Title,
        };
    }

    pub fn focused_mut(&mut self) -> &mut TextField {
        match self.focus {
            ModalField::Title => &mut self.title,
            ModalField::Text => &mut self.text,
        }
    }

    /// Save stays disabled while both fields are blank.
    pub fn can_submit(&self) -> bool {
        !(is_blank(self.title.value()) && is_blank(self.text.value()))
    }

    /// Current field values, without resolving the submission.
    pub fn draft(&self) -> Option<NoteDraft> {
        if !self.open || !self.submission.is_pending() || !self.can_submit() {
            return None;
        }
        Some(NoteDraft::new(self.title.value(), self.text.value()))
    }

    /// Resolves the submission with the current field values. Returns the
    /// payload the first time only; later calls yield `None`.
    pub fn submit(&mut self) -> Option<NoteDraft> {
        if !self.open || !self.can_submit() {
            return None;
        }
        let draft = NoteDraft::new(self.title.value(), self.text.value());
        if self.submission.resolve(draft.clone()) {
            Some(draft)
        } else {
            None
        }
    }

    pub fn submission(&self) -> &Submission<NoteDraft> {
        &self.submission
    }
}

/// Asks whether to delete the named item.
#[derive(Debug, Clone)]
pub struct DeleteConfirmModal {
    subject: String,
    open: bool,
    submission: Submission<bool>,
}

impl DeleteConfirmModal {
    pub fn new(subject: &str) -> Self {
        DeleteConfirmModal {
            subject: subject.to_string(),
            open: false,
            submission: Submission::Pending,
        }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.submission.cancel();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn prompt(&self) -> String {
        format!("Are you sure you want to delete \"{}\"?", self.subject)
    }

    /// Records the answer. Returns `true` only for a first, affirmative answer.
    pub fn confirm(&mut self, confirmed: bool) -> bool {
        self.open && self.submission.resolve(confirmed) && confirmed
    }

    pub fn submission(&self) -> &Submission<bool> {
        &self.submission
    }
}

/// Hint shown just below an anchor, centered on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    label: String,
}

impl Tooltip {
    pub fn new(label: impl Into<String>) -> Self {
        Tooltip {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// One row under `anchor`, or above it when there is no room below;
    /// always kept inside `screen`.
    pub fn placement(&self, anchor: Rect, screen: Rect) -> Rect {
        let width = (self.label.chars().count() as u16 + 2).min(screen.width);
        let center = anchor.x + anchor.width / 2;
        let max_x = screen.x + screen.width.saturating_sub(width);
        let x = center.saturating_sub(width / 2).clamp(screen.x, max_x);
        let below = anchor.y.saturating_add(anchor.height);
        let y = if below < screen.y + screen.height {
            below
        } else {
            anchor.y.saturating_sub(1).max(screen.y)
        };
        Rect::new(x, y, width, screen.height.min(1))
    }
}

fn prev_boundary(text: &str, cursor: usize) -> usize {
    text[..cursor]
        .char_indices()
        .next_back()
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

fn next_boundary(text: &str, cursor: usize) -> usize {
    text[cursor..]
        .chars()
        .next()
        .map(|ch| cursor + ch.len_utf8())
        .unwrap_or(cursor)
}

/// Line start offsets, the cursor's line, and its column in chars.
fn line_state(text: &str, cursor: usize) -> (Vec<usize>, usize, usize) {
    let mut starts = vec![0];
    starts.extend(
        text.char_indices()
            .filter(|(_, ch)| *ch == '\n')
            .map(|(idx, _)| idx + 1),
    );
    let line = starts.iter().rposition(|start| *start <= cursor).unwrap_or(0);
    let col = text[starts[line]..cursor].chars().count();
    (starts, line, col)
}

fn index_at_col(text: &str, start: usize, target_col: usize) -> usize {
    let slice = &text[start..];
    let limit = slice.find('\n').unwrap_or(slice.len());
    slice[..limit]
        .char_indices()
        .nth(target_col)
        .map(|(idx, _)| start + idx)
        .unwrap_or(start + limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn typed(modal: &mut NoteModal, text: &str) {
        for ch in text.chars() {
            modal.focused_mut().insert_char(ch);
        }
    }

    #[test]
    fn text_field_edits_multibyte_text() {
        let mut field = TextField::new("héllo");
        field.move_left();
        field.move_left();
        field.backspace();
        assert_eq!(field.value(), "hélo");
        field.insert_char('ł');
        assert_eq!(field.value(), "héłlo");
        assert_eq!(field.with_caret(), "héł▌lo");
    }

    #[test]
    fn text_field_moves_between_lines_by_column() {
        let mut field = TextField::new("abcd\nxy\nlonger");
        field.move_up();
        assert_eq!(&field.value()[field.cursor()..], "\nlonger");
        field.move_up();
        assert_eq!(&field.value()[field.cursor()..], "cd\nxy\nlonger");
        field.move_down();
        field.move_down();
        assert_eq!(&field.value()[field.cursor()..], "nger");
    }

    #[test]
    fn blank_modal_cannot_submit() {
        let mut modal = NoteModal::with_values("", "", String::new());
        modal.open();
        assert!(!modal.can_submit());
        assert_eq!(modal.submit(), None);
        assert!(modal.submission().is_pending());
    }

    #[test]
    fn new_modal_starts_with_default_title() {
        let mut modal = NoteModal::new();
        modal.open();
        assert_eq!(modal.title().value(), DEFAULT_NOTE_TITLE);
        assert!(modal.can_submit());
    }

    #[test]
    fn submission_resolves_once() {
        let mut modal = NoteModal::with_values("", "", String::new());
        modal.open();
        typed(&mut modal, "Milk");
        modal.toggle_focus();
        typed(&mut modal, "2%");

        assert_eq!(modal.draft(), Some(NoteDraft::new("Milk", "2%")));
        assert!(modal.submission().is_pending());
        assert_eq!(modal.submit(), Some(NoteDraft::new("Milk", "2%")));
        assert_eq!(modal.submit(), None);
        assert_eq!(modal.draft(), None);
        modal.close();
        assert_eq!(
            modal.submission(),
            &Submission::Submitted(NoteDraft::new("Milk", "2%"))
        );
    }

    #[test]
    fn closing_without_submit_cancels() {
        let mut modal = NoteModal::new();
        modal.open();
        modal.close();
        assert!(!modal.is_open());
        assert_eq!(modal.submission(), &Submission::Cancelled);
        modal.open();
        assert_eq!(modal.submit(), None);
    }

    #[test]
    fn delete_confirm_reports_only_affirmative_answer() {
        let mut modal = DeleteConfirmModal::new("Milk");
        assert!(modal.prompt().contains("\"Milk\""));
        assert!(!modal.confirm(true), "closed modal ignores answers");
        modal.open();
        assert!(modal.confirm(true));
        assert!(!modal.confirm(true));

        let mut cancelled = DeleteConfirmModal::new("Eggs");
        cancelled.open();
        assert!(!cancelled.confirm(false));
        assert_eq!(cancelled.submission(), &Submission::Submitted(false));
    }

    #[test]
    fn card_builds_edit_modal_with_time() {
        let now = Utc::now();
        let note = Note::new(
            "n1".into(),
            "nb1".into(),
            NoteDraft::new("Milk", "2%"),
            now - Duration::minutes(3),
        );
        let card = Card::from(&note);
        let modal = card.edit_modal(now);
        assert_eq!(modal.title().value(), "Milk");
        assert_eq!(modal.text().value(), "2%");
        assert_eq!(modal.time(), "3 min ago");
        assert_eq!(Card::delete_tooltip().label(), "Delete note");
    }

    #[test]
    fn tooltip_sits_below_and_stays_on_screen() {
        let screen = Rect::new(0, 0, 40, 10);
        let tip = Tooltip::new("Delete note");

        let placed = tip.placement(Rect::new(10, 2, 6, 1), screen);
        assert_eq!(placed.y, 3);
        assert_eq!(placed.width, 13);
        assert_eq!(placed.x, 13 - 6);

        let edge = tip.placement(Rect::new(38, 9, 2, 1), screen);
        assert_eq!(edge.y, 8);
        assert_eq!(edge.x + edge.width, 40);
    }
}
