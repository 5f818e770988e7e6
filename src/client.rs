//! Client layer: mirrors records returned by the persistence layer onto a
//! [`RenderTarget`]. It never reads or writes the store itself.

use crate::components::Card;
use crate::model::{Note, Notebook, NotebookId};

pub const EMPTY_NOTES_LABEL: &str = "No notes";

#[derive(Debug, Clone, PartialEq)]
pub struct NavItem {
    pub notebook_id: NotebookId,
    pub name: String,
}

impl From<&Notebook> for NavItem {
    fn from(notebook: &Notebook) -> Self {
        NavItem {
            notebook_id: notebook.id.clone(),
            name: notebook.name.clone(),
        }
    }
}

/// The UI surface the client drives: a navigation list, a titled note panel
/// and the note-creation affordance.
pub trait RenderTarget {
    fn append_nav_item(&mut self, item: NavItem);
    fn replace_nav_item(&mut self, notebook_id: &str, item: NavItem);
    fn remove_nav_item(&mut self, notebook_id: &str);
    /// The entry after `notebook_id`, else the one before it.
    fn nav_sibling(&self, notebook_id: &str) -> Option<NotebookId>;
    fn set_active_nav(&mut self, notebook_id: Option<&str>);
    fn active_nav(&self) -> Option<NotebookId>;

    fn set_panel_title(&mut self, title: &str);
    fn clear_panel(&mut self);
    fn show_placeholder(&mut self);
    fn has_cards(&self) -> bool;
    fn prepend_card(&mut self, card: Card);
    fn append_card(&mut self, card: Card);
    fn replace_card(&mut self, note_id: &str, card: Card);
    fn remove_card(&mut self, note_id: &str);

    fn set_note_create_enabled(&mut self, enabled: bool);
}

pub struct Client<R> {
    target: R,
}

impl<R: RenderTarget> Client<R> {
    pub fn new(target: R) -> Self {
        Client { target }
    }

    pub fn target(&self) -> &R {
        &self.target
    }

    pub fn notebook_created(&mut self, notebook: &Notebook) {
        self.target.append_nav_item(NavItem::from(notebook));
        self.target.set_active_nav(Some(&notebook.id));
        self.target.set_panel_title(&notebook.name);
        self.target.show_placeholder();
        self.target.set_note_create_enabled(true);
    }

    /// The first notebook becomes active; nothing remembers a previous choice.
    pub fn notebooks_loaded(&mut self, notebooks: &[Notebook]) {
        self.target.set_note_create_enabled(!notebooks.is_empty());
        for (index, notebook) in notebooks.iter().enumerate() {
            self.target.append_nav_item(NavItem::from(notebook));
            if index == 0 {
                self.target.set_active_nav(Some(&notebook.id));
                self.target.set_panel_title(&notebook.name);
            }
        }
    }

    pub fn notebook_updated(&mut self, notebook_id: &str, notebook: &Notebook) {
        self.target
            .replace_nav_item(notebook_id, NavItem::from(notebook));
        self.target.set_active_nav(Some(&notebook.id));
        self.target.set_panel_title(&notebook.name);
    }

    pub fn notebook_selected(&mut self, notebook: &Notebook) {
        self.target.set_active_nav(Some(&notebook.id));
        self.target.set_panel_title(&notebook.name);
    }

    /// Removes the entry. Returns the sibling the caller should select, or
    /// `None` after clearing the panel when no notebook is left.
    pub fn notebook_deleted(&mut self, notebook_id: &str) -> Option<NotebookId> {
        let sibling = self.target.nav_sibling(notebook_id);
        self.target.remove_nav_item(notebook_id);
        if sibling.is_none() {
            self.target.set_active_nav(None);
            self.target.set_panel_title("");
            self.target.clear_panel();
            self.target.set_note_create_enabled(false);
        }
        sibling
    }

    pub fn note_created(&mut self, note: &Note) {
        if !self.target.has_cards() {
            self.target.clear_panel();
        }
        self.target.prepend_card(Card::from(note));
    }

    pub fn notes_loaded(&mut self, notes: &[Note]) {
        if notes.is_empty() {
            self.target.show_placeholder();
            return;
        }
        self.target.clear_panel();
        for note in notes {
            self.target.append_card(Card::from(note));
        }
    }

    pub fn note_updated(&mut self, note_id: &str, note: &Note) {
        self.target.replace_card(note_id, Card::from(note));
    }

    pub fn note_deleted(&mut self, note_id: &str, still_has_notes: bool) {
        self.target.remove_card(note_id);
        if !still_has_notes {
            self.target.show_placeholder();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Panel {
    /// Nothing to show: no notebook is selected.
    #[default]
    Blank,
    /// A notebook is selected but has no notes.
    Empty,
    Cards(Vec<Card>),
}

/// In-memory render target. Frontends draw from it; tests inspect it.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    nav: Vec<NavItem>,
    active: Option<NotebookId>,
    title: String,
    panel: Panel,
    create_enabled: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nav(&self) -> &[NavItem] {
        &self.nav
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_index(&self) -> Option<usize> {
        let active = self.active.as_deref()?;
        self.nav.iter().position(|item| item.notebook_id == active)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn cards(&self) -> &[Card] {
        match &self.panel {
            Panel::Cards(cards) => cards,
            _ => &[],
        }
    }

    pub fn card(&self, note_id: &str) -> Option<&Card> {
        self.cards().iter().find(|card| card.note_id == note_id)
    }

    pub fn note_create_enabled(&self) -> bool {
        self.create_enabled
    }

    /// Adds a card, turning a blank or placeholder panel into a card list.
    fn insert_card(&mut self, card: Card, at_front: bool) {
        match &mut self.panel {
            Panel::Cards(cards) if at_front => cards.insert(0, card),
            Panel::Cards(cards) => cards.push(card),
            panel => *panel = Panel::Cards(vec![card]),
        }
    }
}

impl RenderTarget for ViewState {
    fn append_nav_item(&mut self, item: NavItem) {
        self.nav.push(item);
    }

    fn replace_nav_item(&mut self, notebook_id: &str, item: NavItem) {
        if let Some(slot) = self
            .nav
            .iter_mut()
            .find(|entry| entry.notebook_id == notebook_id)
        {
            *slot = item;
        }
    }

    fn remove_nav_item(&mut self, notebook_id: &str) {
        self.nav.retain(|entry| entry.notebook_id != notebook_id);
        if self.active.as_deref() == Some(notebook_id) {
            self.active = None;
        }
    }

    fn nav_sibling(&self, notebook_id: &str) -> Option<NotebookId> {
        let index = self
            .nav
            .iter()
            .position(|entry| entry.notebook_id == notebook_id)?;
        self.nav
            .get(index + 1)
            .or_else(|| index.checked_sub(1).and_then(|prev| self.nav.get(prev)))
            .map(|entry| entry.notebook_id.clone())
    }

    fn set_active_nav(&mut self, notebook_id: Option<&str>) {
        self.active = notebook_id.map(str::to_string);
    }

    fn active_nav(&self) -> Option<NotebookId> {
        self.active.clone()
    }

    fn set_panel_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn clear_panel(&mut self) {
        self.panel = Panel::Blank;
    }

    fn show_placeholder(&mut self) {
        self.panel = Panel::Empty;
    }

    fn has_cards(&self) -> bool {
        !self.cards().is_empty()
    }

    fn prepend_card(&mut self, card: Card) {
        self.insert_card(card, true);
    }

    fn append_card(&mut self, card: Card) {
        self.insert_card(card, false);
    }

    fn replace_card(&mut self, note_id: &str, card: Card) {
        if let Panel::Cards(cards) = &mut self.panel {
            if let Some(slot) = cards.iter_mut().find(|existing| existing.note_id == note_id) {
                *slot = card;
            }
        }
    }

    fn remove_card(&mut self, note_id: &str) {
        if let Panel::Cards(cards) = &mut self.panel {
            cards.retain(|card| card.note_id != note_id);
        }
    }

    fn set_note_create_enabled(&mut self, enabled: bool) {
        self.create_enabled = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NoteDraft;
    use chrono::Utc;

    fn notebook(id: &str, name: &str) -> Notebook {
        Notebook::new(id.into(), name)
    }

    fn note(id: &str, notebook_id: &str, title: &str) -> Note {
        Note::new(
            id.into(),
            notebook_id.into(),
            NoteDraft::new(title, ""),
            Utc::now(),
        )
    }

    fn loaded(names: &[(&str, &str)]) -> Client<ViewState> {
        let mut client = Client::new(ViewState::new());
        let notebooks: Vec<_> = names.iter().map(|(id, n)| notebook(id, n)).collect();
        client.notebooks_loaded(&notebooks);
        client
    }

    #[test]
    fn first_loaded_notebook_is_active() {
        let client = loaded(&[("a", "Work"), ("b", "Home")]);
        let view = client.target();
        assert_eq!(view.nav().len(), 2);
        assert_eq!(view.active(), Some("a"));
        assert_eq!(view.title(), "Work");
        assert!(view.note_create_enabled());
    }

    #[test]
    fn empty_load_disables_note_creation() {
        let client = loaded(&[]);
        assert!(!client.target().note_create_enabled());
        assert_eq!(client.target().active(), None);
    }

    #[test]
    fn created_notebook_becomes_active_with_placeholder() {
        let mut client = loaded(&[]);
        client.notebook_created(&notebook("a", "Fresh"));
        let view = client.target();
        assert_eq!(view.active(), Some("a"));
        assert_eq!(view.title(), "Fresh");
        assert_eq!(view.panel(), &Panel::Empty);
        assert!(view.note_create_enabled());
    }

    #[test]
    fn rename_keeps_position_and_panel() {
        let mut client = loaded(&[("a", "One"), ("b", "Two")]);
        client.notes_loaded(&[note("n1", "a", "kept")]);
        client.notebook_updated("a", &notebook("a", "Uno"));
        let view = client.target();
        assert_eq!(view.nav()[0].name, "Uno");
        assert_eq!(view.active(), Some("a"));
        assert_eq!(view.title(), "Uno");
        assert_eq!(view.cards().len(), 1);
    }

    #[test]
    fn deleting_prefers_next_sibling_then_previous() {
        let mut client = loaded(&[("a", "A"), ("b", "B"), ("c", "C")]);
        assert_eq!(client.notebook_deleted("b"), Some("c".to_string()));
        assert_eq!(client.notebook_deleted("c"), Some("a".to_string()));
        assert_eq!(client.target().nav().len(), 1);
    }

    #[test]
    fn deleting_last_notebook_clears_everything() {
        let mut client = loaded(&[("a", "A")]);
        client.notes_loaded(&[note("n1", "a", "x")]);
        assert_eq!(client.notebook_deleted("a"), None);
        let view = client.target();
        assert!(view.nav().is_empty());
        assert_eq!(view.active(), None);
        assert_eq!(view.title(), "");
        assert_eq!(view.panel(), &Panel::Blank);
        assert!(!view.note_create_enabled());
    }

    #[test]
    fn created_note_replaces_placeholder_and_goes_first() {
        let mut client = loaded(&[("a", "A")]);
        client.notes_loaded(&[]);
        assert_eq!(client.target().panel(), &Panel::Empty);

        client.note_created(&note("n1", "a", "first"));
        client.note_created(&note("n2", "a", "second"));
        let ids: Vec<_> = client
            .target()
            .cards()
            .iter()
            .map(|c| c.note_id.as_str())
            .collect();
        assert_eq!(ids, vec!["n2", "n1"]);
    }

    #[test]
    fn loading_notes_keeps_order() {
        let mut client = loaded(&[("a", "A")]);
        client.notes_loaded(&[note("n2", "a", "new"), note("n1", "a", "old")]);
        let cards = client.target().cards();
        assert_eq!(cards[0].note_id, "n2");
        assert_eq!(cards[1].note_id, "n1");
    }

    #[test]
    fn updated_note_replaces_card_in_place() {
        let mut client = loaded(&[("a", "A")]);
        client.notes_loaded(&[note("n1", "a", "one"), note("n2", "a", "two")]);
        client.note_updated("n2", &note("n2", "a", "deux"));
        let view = client.target();
        assert_eq!(view.cards()[1].title, "deux");
        assert_eq!(view.card("n1").unwrap().title, "one");
    }

    #[test]
    fn deleting_final_note_shows_placeholder() {
        let mut client = loaded(&[("a", "A")]);
        client.notes_loaded(&[note("n1", "a", "one"), note("n2", "a", "two")]);
        client.note_deleted("n1", true);
        assert_eq!(client.target().cards().len(), 1);
        client.note_deleted("n2", false);
        assert_eq!(client.target().panel(), &Panel::Empty);
    }

    #[test]
    fn card_edits_leave_placeholder_alone() {
        let mut client = loaded(&[("a", "A")]);
        client.notes_loaded(&[]);
        client.note_updated("n1", &note("n1", "a", "ghost"));
        client.note_deleted("n1", false);
        assert_eq!(client.target().panel(), &Panel::Empty);

        let mut view = ViewState::new();
        view.append_card(Card::from(&note("n1", "a", "one")));
        view.prepend_card(Card::from(&note("n2", "a", "two")));
        let ids: Vec<_> = view.cards().iter().map(|c| c.note_id.as_str()).collect();
        assert_eq!(ids, vec!["n2", "n1"]);
    }
}
