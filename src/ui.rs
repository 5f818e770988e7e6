use crate::app::App;
use crate::client::{Panel, ViewState, EMPTY_NOTES_LABEL};
use crate::components::{Card, DeleteConfirmModal, ModalField, NoteModal, TextField, Tooltip};
use crate::db::{Db, DbResult};
use crate::model::{NoteDraft, NoteId, NotePatch, NotebookId};
use crate::storage::{FileStore, KeyValueStore, StoreLocation};
use crate::theme::{Palette, Theme};
use crate::utils::{greeting, today_label};
use anyhow::Result;
use chrono::{DateTime, Local, Timelike, Utc};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::{info, warn};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Alignment, Color, Modifier, Rect, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Terminal;
use std::io::{stdout, Stdout};
use std::mem;
use std::time::Duration;

/// Rows a note card takes in the panel, separator included.
const CARD_HEIGHT: usize = 4;
const CARD_SCROLLOFF: usize = 1;

pub fn run(db: Db<FileStore>, location: StoreLocation) -> Result<()> {
    let mut tui = Tui::new(App::new(db, ViewState::new()), location);
    let mut terminal = setup_terminal()?;
    let result = tui.event_loop(&mut terminal);
    teardown_terminal(&mut terminal)?;
    info!("event=tui_exit ok={}", result.is_ok());
    result
}

struct Tui<S> {
    app: App<S, ViewState>,
    location: StoreLocation,
    theme: Theme,
    focus: Focus,
    selected_card: usize,
    card_offset: usize,
    status: String,
    mode: Mode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Notebooks,
    Notes,
}

enum Mode {
    Normal,
    NamingNotebook {
        renaming: Option<NotebookId>,
        field: TextField,
    },
    Composing {
        editing: Option<NoteId>,
        modal: NoteModal,
    },
    ConfirmDelete {
        target: DeleteTarget,
        modal: DeleteConfirmModal,
    },
}

enum DeleteTarget {
    Notebook(NotebookId),
    Note {
        notebook_id: NotebookId,
        note_id: NoteId,
    },
}

impl<S: KeyValueStore> Tui<S> {
    /// A store that cannot be loaded leaves the view empty and the error on
    /// the status line.
    fn new(mut app: App<S, ViewState>, location: StoreLocation) -> Self {
        let theme = Theme::load(app.db().store()).unwrap_or_else(|err| {
            warn!("event=theme_load status=error error={}", err);
            Theme::default()
        });
        let status = match app.load() {
            Ok(()) => format!(
                "{} notebooks in {} store",
                app.view().nav().len(),
                location.scope.label()
            ),
            Err(err) => {
                warn!("event=tui_load status=error error={}", err);
                format!("Error: {}", err)
            }
        };
        Tui {
            app,
            location,
            theme,
            focus: Focus::Notebooks,
            selected_card: 0,
            card_offset: 0,
            status,
            mode: Mode::Normal,
        }
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;
            if event::poll(Duration::from_millis(200))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key) {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns true when the user asked to quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Normal => return self.handle_normal_key(key),
            Mode::NamingNotebook { renaming, field } => {
                self.mode = self.handle_name_key(renaming, field, key)
            }
            Mode::Composing { editing, modal } => {
                self.mode = self.handle_compose_key(editing, modal, key)
            }
            Mode::ConfirmDelete { target, modal } => {
                self.mode = self.handle_confirm_key(target, modal, key)
            }
        }
        false
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Notebooks => Focus::Notes,
                    Focus::Notes => Focus::Notebooks,
                }
            }
            KeyCode::Left | KeyCode::Char('h') => self.focus = Focus::Notebooks,
            KeyCode::Right | KeyCode::Char('l') => self.focus = Focus::Notes,
            KeyCode::Up | KeyCode::Char('k') => self.step(-1),
            KeyCode::Down | KeyCode::Char('j') => self.step(1),
            KeyCode::Char('a') => {
                self.mode = Mode::NamingNotebook {
                    renaming: None,
                    field: TextField::new(""),
                }
            }
            KeyCode::Char('r') => self.start_rename(),
            KeyCode::Char('x') => self.start_notebook_delete(),
            KeyCode::Char('n') => self.start_note(),
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Enter | KeyCode::Char('e') if self.focus == Focus::Notes => {
                self.start_edit()
            }
            KeyCode::Char('d') if self.focus == Focus::Notes => self.start_note_delete(),
            _ => {}
        }
        false
    }

    fn handle_name_key(
        &mut self,
        renaming: Option<NotebookId>,
        mut field: TextField,
        key: KeyEvent,
    ) -> Mode {
        match key.code {
            KeyCode::Esc => {
                self.status = "Canceled".to_string();
                Mode::Normal
            }
            KeyCode::Enter => {
                match renaming {
                    Some(notebook_id) => {
                        let result = self.app.rename_notebook(&notebook_id, field.value());
                        self.report(result, |nb| format!("Renamed notebook to {}", nb.name));
                    }
                    None => {
                        let result = self.app.create_notebook(field.value());
                        if let Some(notebook) =
                            self.report(result, |nb| format!("Created notebook {}", nb.name))
                        {
                            self.select(&notebook.id);
                        }
                    }
                }
                Mode::Normal
            }
            _ => {
                edit_text(&mut field, key);
                Mode::NamingNotebook { renaming, field }
            }
        }
    }

    fn handle_compose_key(
        &mut self,
        editing: Option<NoteId>,
        mut modal: NoteModal,
        key: KeyEvent,
    ) -> Mode {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let save = ctrl && matches!(key.code, KeyCode::Char('s') | KeyCode::Enter);
        if save {
            let Some(draft) = modal.draft() else {
                self.status = "Add a title or some text before saving".to_string();
                return Mode::Composing { editing, modal };
            };
            if !self.save_note(editing.as_deref(), draft) {
                return Mode::Composing { editing, modal };
            }
            modal.submit();
            modal.close();
            return Mode::Normal;
        }
        match key.code {
            KeyCode::Esc => {
                modal.close();
                self.status = "Canceled".to_string();
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::BackTab => modal.toggle_focus(),
            KeyCode::Enter => match modal.focus() {
                ModalField::Title => modal.toggle_focus(),
                ModalField::Text => modal.focused_mut().insert_char('\n'),
            },
            KeyCode::Up => modal.focused_mut().move_up(),
            KeyCode::Down => modal.focused_mut().move_down(),
            _ => edit_text(modal.focused_mut(), key),
        }
        Mode::Composing { editing, modal }
    }

    fn handle_confirm_key(
        &mut self,
        target: DeleteTarget,
        mut modal: DeleteConfirmModal,
        key: KeyEvent,
    ) -> Mode {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                if modal.confirm(true) {
                    self.delete(target);
                }
                Mode::Normal
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                modal.confirm(false);
                modal.close();
                self.status = "Delete canceled".to_string();
                Mode::Normal
            }
            _ => Mode::ConfirmDelete { target, modal },
        }
    }

    fn step(&mut self, delta: isize) {
        match self.focus {
            Focus::Notebooks => {
                let view = self.app.view();
                let len = view.nav().len();
                if len == 0 {
                    return;
                }
                let current = view.active_index().unwrap_or(0);
                let next = step_index(current, delta, len);
                if view.active_index() == Some(next) {
                    return;
                }
                let notebook_id = view.nav()[next].notebook_id.clone();
                self.select(&notebook_id);
            }
            Focus::Notes => {
                let len = self.app.view().cards().len();
                if len > 0 {
                    self.selected_card = step_index(self.selected_card, delta, len);
                }
            }
        }
    }

    fn select(&mut self, notebook_id: &str) {
        let result = self.app.select_notebook(notebook_id);
        if self.report(result, |_| String::new()).is_some() {
            self.selected_card = 0;
            self.card_offset = 0;
            self.status = format!("Opened {}", self.app.view().title());
        }
    }

    fn start_rename(&mut self) {
        let view = self.app.view();
        let Some(item) = view.active_index().map(|idx| &view.nav()[idx]) else {
            self.status = "No notebook selected".to_string();
            return;
        };
        self.mode = Mode::NamingNotebook {
            renaming: Some(item.notebook_id.clone()),
            field: TextField::new(&item.name),
        };
    }

    fn start_notebook_delete(&mut self) {
        let view = self.app.view();
        let Some(item) = view.active_index().map(|idx| &view.nav()[idx]) else {
            self.status = "No notebook selected".to_string();
            return;
        };
        let mut modal = DeleteConfirmModal::new(&item.name);
        modal.open();
        self.mode = Mode::ConfirmDelete {
            target: DeleteTarget::Notebook(item.notebook_id.clone()),
            modal,
        };
    }

    fn start_note(&mut self) {
        if !self.app.view().note_create_enabled() {
            self.status = "Create a notebook first (a)".to_string();
            return;
        }
        let mut modal = NoteModal::new();
        modal.open();
        self.mode = Mode::Composing {
            editing: None,
            modal,
        };
    }

    fn selected(&self) -> Option<&Card> {
        self.app.view().cards().get(self.selected_card)
    }

    fn start_edit(&mut self) {
        let Some(card) = self.selected().cloned() else {
            return;
        };
        let mut modal = card.edit_modal(Utc::now());
        modal.open();
        self.mode = Mode::Composing {
            editing: Some(card.note_id),
            modal,
        };
    }

    fn start_note_delete(&mut self) {
        let Some(card) = self.selected().cloned() else {
            return;
        };
        let mut modal = card.delete_modal();
        modal.open();
        self.mode = Mode::ConfirmDelete {
            target: DeleteTarget::Note {
                notebook_id: card.notebook_id,
                note_id: card.note_id,
            },
            modal,
        };
    }

    /// Returns false when the write failed and the editor should stay open.
    fn save_note(&mut self, editing: Option<&str>, draft: NoteDraft) -> bool {
        match editing {
            Some(note_id) => {
                let result = self.app.edit_note(note_id, NotePatch::from(draft));
                self.report(result, |note| format!("Saved {}", note.title))
                    .is_some()
            }
            None => {
                let result = self.app.create_note(draft);
                let saved = self
                    .report(result, |note| format!("Added {}", note.title))
                    .is_some();
                if saved {
                    self.selected_card = 0;
                    self.focus = Focus::Notes;
                }
                saved
            }
        }
    }

    fn delete(&mut self, target: DeleteTarget) {
        match target {
            DeleteTarget::Notebook(notebook_id) => {
                let result = self.app.delete_notebook(&notebook_id);
                self.report(result, |_| "Notebook deleted".to_string());
                self.selected_card = 0;
                self.card_offset = 0;
            }
            DeleteTarget::Note {
                notebook_id,
                note_id,
            } => {
                let result = self.app.delete_note(&notebook_id, &note_id);
                self.report(result, |_| "Note deleted".to_string());
                let len = self.app.view().cards().len();
                self.selected_card = self.selected_card.min(len.saturating_sub(1));
            }
        }
    }

    fn toggle_theme(&mut self) {
        let next = self.theme.toggled();
        match next.save(self.app.db().store()) {
            Ok(()) => {
                info!("event=theme_changed theme={}", next.as_str());
                self.theme = next;
                self.status = format!("Theme: {}", next.as_str());
            }
            Err(err) => {
                warn!("event=theme_save status=error error={}", err);
                self.status = format!("Error: {}", err);
            }
        }
    }

    /// Failures land on the status line; the session keeps going.
    fn report<T>(&mut self, result: DbResult<T>, success: impl FnOnce(&T) -> String) -> Option<T> {
        match result {
            Ok(value) => {
                self.status = success(&value);
                Some(value)
            }
            Err(err) => {
                if err.is_not_found() {
                    info!("event=action_failed reason=not_found error={}", err);
                } else {
                    warn!("event=action_failed error={}", err);
                }
                self.status = format!("Error: {}", err);
                None
            }
        }
    }

    fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let palette = self.theme.palette();
        let size = f.size();
        f.render_widget(
            Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
            size,
        );
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(6),
                Constraint::Length(3),
            ])
            .split(size);
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(28), Constraint::Percentage(72)])
            .split(rows[1]);

        self.draw_header(f, rows[0], &palette);
        self.draw_notebooks(f, body[0], &palette);
        let now = Utc::now();
        self.draw_notes(f, body[1], &palette, now);
        self.draw_footer(f, rows[2], &palette);

        match &self.mode {
            Mode::Normal => {}
            Mode::NamingNotebook { renaming, field } => {
                draw_name_prompt(f, renaming.is_some(), field, &palette)
            }
            Mode::Composing { editing, modal } if modal.is_open() => {
                draw_note_modal(f, editing.is_some(), modal, &palette)
            }
            Mode::ConfirmDelete { modal, .. } if modal.is_open() => {
                draw_confirm(f, modal, &palette)
            }
            _ => {}
        }
    }

    fn draw_header(&self, f: &mut ratatui::Frame<'_>, area: Rect, palette: &Palette) {
        let local = Local::now();
        let line = Line::from(vec![
            Span::styled(
                "notekeeper",
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(greeting(local.hour()), Style::default().fg(palette.text)),
            Span::styled(
                format!("  {}", today_label(local.date_naive())),
                Style::default().fg(palette.muted),
            ),
            Span::styled(
                format!(
                    "  {} store {}",
                    self.location.scope.label(),
                    self.location.dir.display()
                ),
                Style::default().fg(palette.muted),
            ),
        ]);
        let header = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(palette.muted)),
        );
        f.render_widget(header, area);
    }

    fn draw_notebooks(&self, f: &mut ratatui::Frame<'_>, area: Rect, palette: &Palette) {
        let view = self.app.view();
        let items: Vec<ListItem> = view
            .nav()
            .iter()
            .map(|item| ListItem::new(Line::from(format!(" {}", item.name))))
            .collect();
        let mut state = ListState::default();
        state.select(view.active_index());
        let list = List::new(items)
            .block(panel_block(
                "Notebooks",
                self.focus == Focus::Notebooks,
                palette,
            ))
            .highlight_style(
                Style::default()
                    .fg(palette.background)
                    .bg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            );
        f.render_stateful_widget(list, area, &mut state);
    }

    fn draw_notes(
        &mut self,
        f: &mut ratatui::Frame<'_>,
        area: Rect,
        palette: &Palette,
        now: DateTime<Utc>,
    ) {
        let focused = self.focus == Focus::Notes;
        let view = self.app.view();
        let block = panel_block(view.title(), focused, palette);
        let inner = block.inner(area);
        match view.panel() {
            Panel::Blank => f.render_widget(block, area),
            Panel::Empty => {
                let placeholder = Paragraph::new(vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        EMPTY_NOTES_LABEL,
                        Style::default().fg(palette.muted),
                    )),
                    Line::from(Span::styled(
                        "press n to write one",
                        Style::default()
                            .fg(palette.muted)
                            .add_modifier(Modifier::DIM),
                    )),
                ])
                .alignment(Alignment::Center)
                .block(block);
                f.render_widget(placeholder, area);
            }
            Panel::Cards(cards) => {
                let viewport = inner.height as usize / CARD_HEIGHT;
                self.selected_card = self.selected_card.min(cards.len().saturating_sub(1));
                self.card_offset = adjust_offset(
                    self.selected_card,
                    self.card_offset,
                    viewport,
                    CARD_SCROLLOFF,
                    cards.len(),
                );
                let items: Vec<ListItem> = cards
                    .iter()
                    .skip(self.card_offset)
                    .map(|card| card_item(card, inner.width, now, palette))
                    .collect();
                let mut state = ListState::default();
                if focused {
                    state.select(Some(self.selected_card - self.card_offset));
                }
                let list = List::new(items).block(block).highlight_style(
                    Style::default()
                        .bg(palette.surface)
                        .add_modifier(Modifier::BOLD),
                );
                f.render_stateful_widget(list, area, &mut state);

                if focused && viewport > 0 && matches!(self.mode, Mode::Normal) {
                    let row = (self.selected_card - self.card_offset) * CARD_HEIGHT;
                    let anchor = Rect::new(
                        inner.x,
                        inner.y + row as u16,
                        inner.width,
                        (CARD_HEIGHT as u16 - 1).min(inner.height),
                    );
                    draw_tooltip(f, &Card::delete_tooltip(), anchor, inner, palette);
                }
            }
        }
    }

    fn draw_footer(&self, f: &mut ratatui::Frame<'_>, area: Rect, palette: &Palette) {
        let key = |k: &'static str| {
            Span::styled(
                k,
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            )
        };
        let text = |t: &'static str| Span::styled(t, Style::default().fg(palette.muted));
        let help = Line::from(vec![
            key("a"),
            text(" add notebook  "),
            key("r"),
            text(" rename  "),
            key("x"),
            text(" delete notebook  "),
            key("n"),
            text(" new note  "),
            key("e"),
            text(" edit  "),
            key("d"),
            text(" delete note  "),
            key("t"),
            text(" theme  "),
            key("Tab"),
            text(" focus  "),
            key("q"),
            text(" quit"),
        ]);
        let status_style = if self.status.starts_with("Error") {
            Style::default().fg(palette.danger)
        } else {
            Style::default().fg(palette.text)
        };
        let footer = Paragraph::new(vec![help, Line::from(Span::styled(&self.status, status_style))])
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(palette.muted)),
            );
        f.render_widget(footer, area);
    }
}

fn panel_block<'a>(title: &'a str, focused: bool, palette: &Palette) -> Block<'a> {
    let border = if focused { palette.accent } else { palette.muted };
    Block::default()
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

fn card_item(card: &Card, width: u16, now: DateTime<Utc>, palette: &Palette) -> ListItem<'static> {
    let max = width.saturating_sub(2).max(8) as usize;
    let preview = card.text.lines().next().unwrap_or("");
    ListItem::new(vec![
        Line::from(Span::styled(
            format!(" {}", truncate_text(&card.title, max)),
            Style::default()
                .fg(palette.text)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(" {}", truncate_text(preview, max)),
            Style::default().fg(palette.text),
        )),
        Line::from(Span::styled(
            format!(" {}", card.time_label(now)),
            Style::default().fg(palette.muted),
        )),
        Line::from(""),
    ])
}

fn draw_tooltip(
    f: &mut ratatui::Frame<'_>,
    tooltip: &Tooltip,
    anchor: Rect,
    screen: Rect,
    palette: &Palette,
) {
    let area = tooltip.placement(anchor, screen);
    if area.width == 0 || area.height == 0 {
        return;
    }
    let label = Paragraph::new(Line::from(vec![
        Span::styled("d ", Style::default().fg(palette.danger)),
        Span::raw(tooltip.label()),
    ]))
    .alignment(Alignment::Center)
    .style(Style::default().bg(palette.surface).fg(palette.muted));
    f.render_widget(Clear, area);
    f.render_widget(label, area);
}

fn draw_name_prompt(f: &mut ratatui::Frame<'_>, renaming: bool, field: &TextField, palette: &Palette) {
    let area = centered_rect(50, 20, f.size());
    let title = if renaming {
        "Rename Notebook"
    } else {
        "New Notebook"
    };
    let body = vec![
        Line::from(vec![
            Span::styled("Name: ", Style::default().fg(palette.muted)),
            Span::styled(field.with_caret(), Style::default().fg(palette.accent)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Enter to save, Esc to cancel",
            Style::default().fg(palette.muted),
        )),
    ];
    let dialog = Paragraph::new(body).block(dialog_block(title, palette.accent, palette));
    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

fn draw_note_modal(f: &mut ratatui::Frame<'_>, editing: bool, modal: &NoteModal, palette: &Palette) {
    let area = centered_rect(70, 60, f.size());
    let title = if editing { "Edit Note" } else { "New Note" };
    let mut lines = field_lines(
        "Title",
        modal.title(),
        modal.focus() == ModalField::Title,
        palette,
    );
    lines.push(Line::from(""));
    lines.extend(field_lines(
        "Text",
        modal.text(),
        modal.focus() == ModalField::Text,
        palette,
    ));
    lines.push(Line::from(""));
    if !modal.time().is_empty() {
        lines.push(Line::from(Span::styled(
            modal.time().to_string(),
            Style::default().fg(palette.muted),
        )));
    }
    let save_hint = if modal.can_submit() {
        Span::styled("Ctrl+S save", Style::default().fg(palette.accent))
    } else {
        Span::styled(
            "Ctrl+S save (needs a title or text)",
            Style::default()
                .fg(palette.muted)
                .add_modifier(Modifier::DIM),
        )
    };
    lines.push(Line::from(vec![
        save_hint,
        Span::styled("  Tab switch field  Esc close", Style::default().fg(palette.muted)),
    ]));
    let dialog = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(dialog_block(title, palette.accent, palette));
    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

fn draw_confirm(f: &mut ratatui::Frame<'_>, modal: &DeleteConfirmModal, palette: &Palette) {
    let area = centered_rect(50, 30, f.size());
    let body = vec![
        Line::from(Span::styled(
            modal.prompt(),
            Style::default()
                .fg(palette.danger)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Press y to confirm, n or Esc to cancel"),
    ];
    let dialog = Paragraph::new(body)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(dialog_block("Confirm Delete", palette.danger, palette));
    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

fn dialog_block<'a>(title: &'a str, color: Color, palette: &Palette) -> Block<'a> {
    Block::default()
        .title(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(palette.surface).fg(palette.text))
}

fn field_lines(
    label: &str,
    field: &TextField,
    active: bool,
    palette: &Palette,
) -> Vec<Line<'static>> {
    let label_style = Style::default()
        .fg(palette.muted)
        .add_modifier(Modifier::BOLD);
    let value_style = Style::default().fg(if active { palette.accent } else { palette.text });
    let prefix = format!("{}: ", label);
    let spacer = " ".repeat(prefix.chars().count());
    let text = if active {
        field.with_caret()
    } else {
        field.value().to_string()
    };
    text.split('\n')
        .enumerate()
        .map(|(idx, segment)| {
            let lead = if idx == 0 {
                Span::styled(prefix.clone(), label_style)
            } else {
                Span::raw(spacer.clone())
            };
            Line::from(vec![lead, Span::styled(segment.to_string(), value_style)])
        })
        .collect()
}

/// Plain typing keys shared by every text input.
fn edit_text(field: &mut TextField, key: KeyEvent) {
    match key.code {
        KeyCode::Left => field.move_left(),
        KeyCode::Right => field.move_right(),
        KeyCode::Backspace => field.backspace(),
        KeyCode::Char(ch)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            field.insert_char(ch)
        }
        _ => {}
    }
}

fn step_index(current: usize, delta: isize, len: usize) -> usize {
    let last = len.saturating_sub(1) as isize;
    (current as isize + delta).clamp(0, last) as usize
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(rows[1])[1]
}

/// Scroll offset keeping `selected` visible with `scrolloff` rows of margin.
fn adjust_offset(
    selected: usize,
    current_offset: usize,
    viewport: usize,
    scrolloff: usize,
    len: usize,
) -> usize {
    if viewport == 0 || len == 0 {
        return 0;
    }
    let max_offset = len.saturating_sub(viewport);
    let margin = scrolloff.min(viewport.saturating_sub(1));
    let mut offset = current_offset.min(max_offset);
    if selected < offset + margin {
        offset = selected.saturating_sub(margin);
    } else if selected + margin >= offset + viewport {
        offset = (selected + margin + 1).saturating_sub(viewport);
    }
    offset.min(max_offset)
}

fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(&".".repeat(max - keep));
    out
}
