use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type NotebookId = String;
pub type NoteId = String;

/// Root persisted object. Everything the application knows lives here.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Document {
    pub notebooks: Vec<Notebook>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Notebook {
    pub id: NotebookId,
    pub name: String,
    /// Most recent first.
    pub notes: Vec<Note>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub notebook_id: NotebookId,
    pub title: String,
    pub text: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub posted_on: DateTime<Utc>,
}

/// Fields supplied when creating a note.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteDraft {
    pub title: String,
    pub text: String,
}

/// Partial update for a note; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub text: Option<String>,
}

impl Document {
    pub fn find_notebook(&self, id: &str) -> Option<&Notebook> {
        self.notebooks.iter().find(|nb| nb.id == id)
    }

    pub fn find_notebook_mut(&mut self, id: &str) -> Option<&mut Notebook> {
        self.notebooks.iter_mut().find(|nb| nb.id == id)
    }

    pub fn find_notebook_index(&self, id: &str) -> Option<usize> {
        self.notebooks.iter().position(|nb| nb.id == id)
    }

    /// Scans every notebook; note ids are unique across the document.
    pub fn find_note(&self, note_id: &str) -> Option<&Note> {
        self.notebooks
            .iter()
            .flat_map(|nb| nb.notes.iter())
            .find(|note| note.id == note_id)
    }

    pub fn find_note_mut(&mut self, note_id: &str) -> Option<&mut Note> {
        self.notebooks
            .iter_mut()
            .flat_map(|nb| nb.notes.iter_mut())
            .find(|note| note.id == note_id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.notebooks
            .iter()
            .any(|nb| nb.id == id || nb.notes.iter().any(|note| note.id == id))
    }
}

impl Notebook {
    pub fn new(id: NotebookId, name: impl Into<String>) -> Self {
        Notebook {
            id,
            name: name.into(),
            notes: Vec::new(),
        }
    }

    pub fn find_note_index(&self, note_id: &str) -> Option<usize> {
        self.notes.iter().position(|note| note.id == note_id)
    }
}

impl Note {
    pub fn new(
        id: NoteId,
        notebook_id: NotebookId,
        draft: NoteDraft,
        posted_on: DateTime<Utc>,
    ) -> Self {
        Note {
            id,
            notebook_id,
            title: draft.title,
            text: draft.text,
            posted_on,
        }
    }

    /// Shallow merge; `id`, `notebook_id` and `posted_on` never change.
    pub fn apply(&mut self, patch: NotePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(text) = patch.text {
            self.text = text;
        }
    }

    pub fn is_blank(&self) -> bool {
        is_blank(&self.title) && is_blank(&self.text)
    }
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        NoteDraft {
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        is_blank(&self.title) && is_blank(&self.text)
    }
}

impl NotePatch {
    pub fn title(title: impl Into<String>) -> Self {
        NotePatch {
            title: Some(title.into()),
            text: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        NotePatch {
            title: None,
            text: Some(text.into()),
        }
    }
}

impl From<NoteDraft> for NotePatch {
    fn from(draft: NoteDraft) -> Self {
        NotePatch {
            title: Some(draft.title),
            text: Some(draft.text),
        }
    }
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
