//! Persistence layer: CRUD over the [`Document`] stored under one key.
//!
//! Nothing is cached between calls. Each operation reads the document from
//! the store, and each mutating operation writes it back exactly once. A
//! failed operation leaves the stored document untouched.

use crate::model::{is_blank, Document, Note, NoteDraft, NotePatch, Notebook};
use crate::storage::{KeyValueStore, StoreError};
use crate::utils::generate_id;
use chrono::{SubsecRound, Utc};
use log::debug;

pub const DOCUMENT_KEY: &str = "noteKeeperDB";

#[derive(thiserror::Error, Debug)]
pub enum DbError {
    #[error("notebook not found: {0}")]
    NotebookNotFound(String),
    #[error("note not found: {0}")]
    NoteNotFound(String),
    #[error("a note needs a title or some text")]
    EmptyNote,
    #[error("notebook name cannot be empty")]
    EmptyNotebookName,
    #[error("storage unavailable: {0}")]
    Storage(#[from] StoreError),
    #[error("stored document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl DbError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotebookNotFound(_) | DbError::NoteNotFound(_))
    }
}

pub type DbResult<T> = Result<T, DbError>;

pub struct Db<S> {
    store: S,
}

impl<S: KeyValueStore> Db<S> {
    /// Wraps `store`, writing an empty document if none exists yet.
    pub fn open(store: S) -> DbResult<Self> {
        let db = Db { store };
        if db.store.get(DOCUMENT_KEY)?.is_none() {
            debug!("event=db_init status=created key={}", DOCUMENT_KEY);
            db.write(&Document::default())?;
        }
        Ok(db)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn create_notebook(&self, name: &str) -> DbResult<Notebook> {
        if is_blank(name) {
            return Err(DbError::EmptyNotebookName);
        }
        let mut doc = self.read()?;
        let id = generate_id(|candidate| doc.contains_id(candidate));
        let notebook = Notebook::new(id, name);
        doc.notebooks.push(notebook.clone());
        self.write(&doc)?;
        debug!("event=notebook_created id={}", notebook.id);
        Ok(notebook)
    }

    pub fn create_note(&self, notebook_id: &str, draft: NoteDraft) -> DbResult<Note> {
        if draft.is_blank() {
            return Err(DbError::EmptyNote);
        }
        let mut doc = self.read()?;
        let id = generate_id(|candidate| doc.contains_id(candidate));
        let notebook = doc
            .find_notebook_mut(notebook_id)
            .ok_or_else(|| DbError::NotebookNotFound(notebook_id.to_string()))?;
        // The wire format stores milliseconds; truncate so the returned
        // record equals what a later read produces.
        let note = Note::new(
            id,
            notebook.id.clone(),
            draft,
            Utc::now().trunc_subsecs(3),
        );
        notebook.notes.insert(0, note.clone());
        self.write(&doc)?;
        debug!(
            "event=note_created id={} notebook={}",
            note.id, note.notebook_id
        );
        Ok(note)
    }

    pub fn list_notebooks(&self) -> DbResult<Vec<Notebook>> {
        Ok(self.read()?.notebooks)
    }

    pub fn list_notes(&self, notebook_id: &str) -> DbResult<Vec<Note>> {
        let doc = self.read()?;
        doc.find_notebook(notebook_id)
            .map(|nb| nb.notes.clone())
            .ok_or_else(|| DbError::NotebookNotFound(notebook_id.to_string()))
    }

    pub fn update_notebook(&self, notebook_id: &str, name: &str) -> DbResult<Notebook> {
        if is_blank(name) {
            return Err(DbError::EmptyNotebookName);
        }
        let mut doc = self.read()?;
        let notebook = doc
            .find_notebook_mut(notebook_id)
            .ok_or_else(|| DbError::NotebookNotFound(notebook_id.to_string()))?;
        notebook.name = name.to_string();
        let updated = notebook.clone();
        self.write(&doc)?;
        debug!("event=notebook_updated id={}", notebook_id);
        Ok(updated)
    }

    pub fn update_note(&self, note_id: &str, patch: NotePatch) -> DbResult<Note> {
        let mut doc = self.read()?;
        let note = doc
            .find_note_mut(note_id)
            .ok_or_else(|| DbError::NoteNotFound(note_id.to_string()))?;
        let mut merged = note.clone();
        merged.apply(patch);
        if merged.is_blank() {
            return Err(DbError::EmptyNote);
        }
        *note = merged.clone();
        self.write(&doc)?;
        debug!("event=note_updated id={}", note_id);
        Ok(merged)
    }

    pub fn delete_notebook(&self, notebook_id: &str) -> DbResult<()> {
        let mut doc = self.read()?;
        let index = doc
            .find_notebook_index(notebook_id)
            .ok_or_else(|| DbError::NotebookNotFound(notebook_id.to_string()))?;
        let removed = doc.notebooks.remove(index);
        self.write(&doc)?;
        debug!(
            "event=notebook_deleted id={} notes={}",
            notebook_id,
            removed.notes.len()
        );
        Ok(())
    }

    /// Returns the notes left in the notebook so callers can tell when it
    /// became empty.
    pub fn delete_note(&self, notebook_id: &str, note_id: &str) -> DbResult<Vec<Note>> {
        let mut doc = self.read()?;
        let notebook = doc
            .find_notebook_mut(notebook_id)
            .ok_or_else(|| DbError::NotebookNotFound(notebook_id.to_string()))?;
        let index = notebook
            .find_note_index(note_id)
            .ok_or_else(|| DbError::NoteNotFound(note_id.to_string()))?;
        notebook.notes.remove(index);
        let remaining = notebook.notes.clone();
        self.write(&doc)?;
        debug!(
            "event=note_deleted id={} notebook={} remaining={}",
            note_id,
            notebook_id,
            remaining.len()
        );
        Ok(remaining)
    }

    fn read(&self) -> DbResult<Document> {
        match self.store.get(DOCUMENT_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Document::default()),
        }
    }

    fn write(&self, doc: &Document) -> DbResult<()> {
        let serialized = serde_json::to_string(doc)?;
        self.store.set(DOCUMENT_KEY, &serialized)?;
        Ok(())
    }
}
