use crate::cli::NoteFields;
use crate::db::Db;
use crate::model::{Note, NoteDraft, NotePatch};
use crate::storage::{FileStore, StoreLocation};
use crate::theme::Theme;
use crate::ui;
use crate::utils::relative_time;
use anyhow::{bail, Context, Result};
use chrono::Utc;
use log::info;

pub fn init(location: &StoreLocation) -> Result<()> {
    let db = open_db(location)?;
    let dir = db.store().dir();
    info!("event=store_init dir={}", dir.display());
    println!("Initialized store at {}", dir.display());
    Ok(())
}

pub fn notebook_add(location: &StoreLocation, name: String) -> Result<()> {
    let db = open_db(location)?;
    let notebook = db
        .create_notebook(&name)
        .with_context(|| format!("creating notebook {:?}", name))?;
    println!("Added notebook {} ({})", notebook.id, notebook.name);
    Ok(())
}

pub fn notebook_list(location: &StoreLocation) -> Result<()> {
    let db = open_db(location)?;
    let notebooks = db.list_notebooks()?;
    println!(
        "Store: {} ({})",
        location.dir.display(),
        location.scope.label()
    );
    if notebooks.is_empty() {
        println!("  (no notebooks)");
    }
    for notebook in notebooks {
        println!(
            "  {}  {} ({} notes)",
            notebook.id,
            notebook.name,
            notebook.notes.len()
        );
    }
    Ok(())
}

pub fn notebook_rename(location: &StoreLocation, notebook_id: String, name: String) -> Result<()> {
    let db = open_db(location)?;
    let notebook = db
        .update_notebook(&notebook_id, &name)
        .with_context(|| format!("renaming notebook {}", notebook_id))?;
    println!("Renamed notebook {} to {}", notebook.id, notebook.name);
    Ok(())
}

pub fn notebook_delete(location: &StoreLocation, notebook_id: String) -> Result<()> {
    let db = open_db(location)?;
    db.delete_notebook(&notebook_id)
        .with_context(|| format!("deleting notebook {}", notebook_id))?;
    println!("Deleted notebook {}", notebook_id);
    Ok(())
}

pub fn note_add(location: &StoreLocation, notebook_id: String, fields: NoteFields) -> Result<()> {
    let db = open_db(location)?;
    let draft = NoteDraft::new(
        fields.title.unwrap_or_default(),
        fields.text.unwrap_or_default(),
    );
    let note = db
        .create_note(&notebook_id, draft)
        .with_context(|| format!("adding note to notebook {}", notebook_id))?;
    println!("Added note {} to {}", note.id, notebook_id);
    Ok(())
}

pub fn note_list(location: &StoreLocation, notebook_id: String) -> Result<()> {
    let db = open_db(location)?;
    let notes = db
        .list_notes(&notebook_id)
        .with_context(|| format!("listing notebook {}", notebook_id))?;
    if notes.is_empty() {
        println!("No notes");
    }
    for note in &notes {
        print_note(note);
    }
    Ok(())
}

pub fn note_edit(location: &StoreLocation, note_id: String, fields: NoteFields) -> Result<()> {
    if fields.title.is_none() && fields.text.is_none() {
        bail!("nothing to change: pass --title and/or --text");
    }
    let db = open_db(location)?;
    let patch = NotePatch {
        title: fields.title,
        text: fields.text,
    };
    let note = db
        .update_note(&note_id, patch)
        .with_context(|| format!("editing note {}", note_id))?;
    println!("Updated note {}", note.id);
    Ok(())
}

pub fn note_delete(location: &StoreLocation, notebook_id: String, note_id: String) -> Result<()> {
    let db = open_db(location)?;
    let remaining = db
        .delete_note(&notebook_id, &note_id)
        .with_context(|| format!("deleting note {}", note_id))?;
    println!(
        "Deleted note {} ({} left in {})",
        note_id,
        remaining.len(),
        notebook_id
    );
    Ok(())
}

pub fn theme(location: &StoreLocation, toggle: bool) -> Result<()> {
    let store = location.open();
    let mut current = Theme::load(&store).context("reading theme")?;
    if toggle {
        current = current.toggled();
        current.save(&store).context("saving theme")?;
        info!("event=theme_changed theme={}", current.as_str());
    }
    println!("{}", current.as_str());
    Ok(())
}

pub fn tui(location: &StoreLocation) -> Result<()> {
    let db = open_db(location)?;
    ui::run(db, location.clone())
}

fn open_db(location: &StoreLocation) -> Result<Db<FileStore>> {
    Db::open(location.open()).with_context(|| format!("opening store {:?}", location.dir))
}

fn print_note(note: &Note) {
    println!("  - {}: {}", note.id, note.title);
    if !note.text.is_empty() {
        for line in note.text.lines() {
            println!("    {}", line);
        }
    }
    println!("    {}", relative_time(note.posted_on, Utc::now()));
}
