//! Wires user actions to the persistence layer and hands the returned records
//! to the client layer.

use crate::client::{Client, RenderTarget};
use crate::db::{Db, DbError, DbResult};
use crate::model::{is_blank, Note, NoteDraft, NotePatch, Notebook};
use crate::storage::KeyValueStore;
use log::{debug, info};

pub const DEFAULT_NOTEBOOK_NAME: &str = "Untitled";

pub struct App<S, R> {
    db: Db<S>,
    client: Client<R>,
}

impl<S: KeyValueStore, R: RenderTarget> App<S, R> {
    pub fn new(db: Db<S>, target: R) -> Self {
        App {
            db,
            client: Client::new(target),
        }
    }

    pub fn db(&self) -> &Db<S> {
        &self.db
    }

    pub fn view(&self) -> &R {
        self.client.target()
    }

    /// Renders stored notebooks and the notes of the first one.
    pub fn load(&mut self) -> DbResult<()> {
        let notebooks = self.db.list_notebooks()?;
        info!("event=app_load notebooks={}", notebooks.len());
        self.client.notebooks_loaded(&notebooks);
        if let Some(first) = notebooks.first() {
            self.client.notes_loaded(&first.notes);
        }
        Ok(())
    }

    /// A blank name becomes "Untitled".
    pub fn create_notebook(&mut self, name: &str) -> DbResult<Notebook> {
        let name = if is_blank(name) {
            DEFAULT_NOTEBOOK_NAME
        } else {
            name.trim()
        };
        let notebook = self.db.create_notebook(name)?;
        self.client.notebook_created(&notebook);
        Ok(notebook)
    }

    pub fn rename_notebook(&mut self, notebook_id: &str, name: &str) -> DbResult<Notebook> {
        let notebook = self.db.update_notebook(notebook_id, name.trim())?;
        self.client.notebook_updated(notebook_id, &notebook);
        Ok(notebook)
    }

    /// Deletes the notebook, then selects the neighbouring one if any.
    pub fn delete_notebook(&mut self, notebook_id: &str) -> DbResult<()> {
        self.db.delete_notebook(notebook_id)?;
        if let Some(sibling) = self.client.notebook_deleted(notebook_id) {
            debug!("event=select_sibling deleted={} next={}", notebook_id, sibling);
            self.select_notebook(&sibling)?;
        }
        Ok(())
    }

    pub fn select_notebook(&mut self, notebook_id: &str) -> DbResult<()> {
        let notebook = self
            .db
            .list_notebooks()?
            .into_iter()
            .find(|nb| nb.id == notebook_id)
            .ok_or_else(|| DbError::NotebookNotFound(notebook_id.to_string()))?;
        self.client.notebook_selected(&notebook);
        self.client.notes_loaded(&notebook.notes);
        Ok(())
    }

    pub fn active_notebook_id(&self) -> Option<String> {
        self.client.target().active_nav()
    }

    /// Adds a note to the active notebook.
    pub fn create_note(&mut self, draft: NoteDraft) -> DbResult<Note> {
        let notebook_id = self
            .active_notebook_id()
            .ok_or_else(|| DbError::NotebookNotFound("(none selected)".to_string()))?;
        let note = self.db.create_note(&notebook_id, draft)?;
        self.client.note_created(&note);
        Ok(note)
    }

    pub fn edit_note(&mut self, note_id: &str, patch: NotePatch) -> DbResult<Note> {
        let note = self.db.update_note(note_id, patch)?;
        self.client.note_updated(note_id, &note);
        Ok(note)
    }

    pub fn delete_note(&mut self, notebook_id: &str, note_id: &str) -> DbResult<()> {
        let remaining = self.db.delete_note(notebook_id, note_id)?;
        self.client.note_deleted(note_id, !remaining.is_empty());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Panel, ViewState};
    use crate::storage::MemoryStore;

    fn app() -> App<MemoryStore, ViewState> {
        let mut app = App::new(Db::open(MemoryStore::new()).unwrap(), ViewState::new());
        app.load().unwrap();
        app
    }

    #[test]
    fn fresh_store_starts_with_nothing_selected() {
        let app = app();
        assert!(app.view().nav().is_empty());
        assert!(!app.view().note_create_enabled());
        assert_eq!(app.view().panel(), &Panel::Blank);
    }

    #[test]
    fn blank_notebook_name_falls_back_to_untitled() {
        let mut app = app();
        let nb = app.create_notebook("  ").unwrap();
        assert_eq!(nb.name, DEFAULT_NOTEBOOK_NAME);
        assert_eq!(app.view().title(), DEFAULT_NOTEBOOK_NAME);
    }

    #[test]
    fn notes_go_into_active_notebook() {
        let mut app = app();
        let first = app.create_notebook("First").unwrap();
        let second = app.create_notebook("Second").unwrap();
        assert_eq!(app.active_notebook_id().as_deref(), Some(second.id.as_str()));

        app.select_notebook(&first.id).unwrap();
        let note = app.create_note(NoteDraft::new("Milk", "2%")).unwrap();
        assert_eq!(note.notebook_id, first.id);
        assert_eq!(app.db().list_notes(&first.id).unwrap()[0].id, note.id);
        assert!(app.db().list_notes(&second.id).unwrap().is_empty());
        assert_eq!(app.view().cards()[0].note_id, note.id);
    }

    #[test]
    fn deleting_active_notebook_selects_next_and_loads_its_notes() {
        let mut app = app();
        let a = app.create_notebook("A").unwrap();
        let b = app.create_notebook("B").unwrap();
        app.create_note(NoteDraft::new("in b", "")).unwrap();

        app.select_notebook(&a.id).unwrap();
        assert_eq!(app.view().panel(), &Panel::Empty);
        app.delete_notebook(&a.id).unwrap();

        assert_eq!(app.active_notebook_id().as_deref(), Some(b.id.as_str()));
        assert_eq!(app.view().title(), "B");
        assert_eq!(app.view().cards().len(), 1);
    }

    #[test]
    fn deleting_trailing_notebook_selects_previous() {
        let mut app = app();
        let a = app.create_notebook("A").unwrap();
        let b = app.create_notebook("B").unwrap();
        app.delete_notebook(&b.id).unwrap();
        assert_eq!(app.active_notebook_id().as_deref(), Some(a.id.as_str()));
    }

    #[test]
    fn deleting_last_notebook_disables_note_creation() {
        let mut app = app();
        let only = app.create_notebook("Only").unwrap();
        app.create_note(NoteDraft::new("x", "")).unwrap();
        app.delete_notebook(&only.id).unwrap();

        assert_eq!(app.view().panel(), &Panel::Blank);
        assert_eq!(app.view().title(), "");
        assert!(!app.view().note_create_enabled());
        assert!(matches!(
            app.create_note(NoteDraft::new("orphan", "")),
            Err(DbError::NotebookNotFound(_))
        ));
        assert_eq!(app.db().list_notebooks().unwrap().len(), 0);
    }

    #[test]
    fn deleting_only_note_shows_placeholder() {
        let mut app = app();
        let nb = app.create_notebook("Solo").unwrap();
        let note = app.create_note(NoteDraft::new("one", "")).unwrap();
        app.delete_note(&nb.id, &note.id).unwrap();
        assert!(app.db().list_notes(&nb.id).unwrap().is_empty());
        assert_eq!(app.view().panel(), &Panel::Empty);
    }

    #[test]
    fn edit_updates_card_and_store() {
        let mut app = app();
        app.create_notebook("Edits").unwrap();
        let note = app.create_note(NoteDraft::new("before", "body")).unwrap();
        app.edit_note(&note.id, NotePatch::title("after")).unwrap();
        let card = app.view().card(&note.id).unwrap();
        assert_eq!(card.title, "after");
        assert_eq!(card.text, "body");
    }

    #[test]
    fn failed_edit_leaves_view_untouched() {
        let mut app = app();
        app.create_notebook("Guarded").unwrap();
        let note = app.create_note(NoteDraft::new("keep", "")).unwrap();
        assert!(app.edit_note(&note.id, NotePatch::title(" ")).is_err());
        assert_eq!(app.view().card(&note.id).unwrap().title, "keep");
    }

    #[test]
    fn reload_selects_first_notebook() {
        let store = MemoryStore::new();
        {
            let mut app = App::new(Db::open(&store).unwrap(), ViewState::new());
            app.load().unwrap();
            app.create_notebook("One").unwrap();
            app.create_notebook("Two").unwrap();
            app.create_note(NoteDraft::new("in two", "")).unwrap();
        }
        let mut app = App::new(Db::open(&store).unwrap(), ViewState::new());
        app.load().unwrap();
        assert_eq!(app.view().title(), "One");
        assert_eq!(app.view().panel(), &Panel::Empty);
        assert_eq!(app.view().nav().len(), 2);
    }
}
