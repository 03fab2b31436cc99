//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::notes::Note;

use super::CreateNoteValues;
use super::NoteFilter;
use super::Result;
use super::SortKey;
use super::Storage;
use super::UpdateNoteValues;

/// An in-memory storage
///
/// Will be destroyed on system shutdown
#[derive(Clone, Debug)]
pub struct Memory {
    /// All notes in storage, plus the id sequence
    state: Arc<Mutex<State>>,
}

#[derive(Debug)]
struct State {
    /// Next value of the id sequence
    next_id: i64,

    /// All notes in storage
    notes: HashMap<i64, Note>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                next_id: 1,
                notes: HashMap::new(),
            })),
        }
    }
}

/// Whether a note belongs in a listing
///
/// Same contract as the Postgres WHERE composition
fn matches_filter(note: &Note, filter: &NoteFilter) -> bool {
    // trash and non-trash are mutually exclusive
    if note.is_deleted() != filter.show_deleted {
        return false;
    }

    // archived notes only hide from non-trash listings
    if !filter.show_deleted && !filter.show_archived && note.is_archived {
        return false;
    }

    if !filter.date.matches(note.date) {
        return false;
    }

    if let Some(search) = &filter.search {
        if !note
            .content
            .to_lowercase()
            .contains(&search.to_lowercase())
        {
            return false;
        }
    }

    if let Some(tag) = &filter.tag {
        if !note.tags.iter().any(|note_tag| note_tag == tag) {
            return false;
        }
    }

    true
}

/// Listing order of two notes
///
/// Same contract as the Postgres ORDER BY composition
fn listing_order(a: &Note, b: &Note, filter: &NoteFilter) -> Ordering {
    let pinned_first = if filter.ignore_pinned {
        Ordering::Equal
    } else {
        b.is_pinned.cmp(&a.is_pinned)
    };

    pinned_first.then_with(|| match filter.sort_by {
        SortKey::Date => b
            .date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at)),
        SortKey::Updated => b.updated_at.cmp(&a.updated_at),
        SortKey::Alpha => a.content.cmp(&b.content),
    })
}

#[async_trait]
impl Storage for Memory {
    async fn find_all_notes(&self, filter: &NoteFilter) -> Result<Vec<Note>> {
        let mut notes = self
            .state
            .lock()
            .await
            .notes
            .values()
            .filter(|note| matches_filter(note, filter))
            .cloned()
            .collect::<Vec<Note>>();

        notes.sort_by(|a, b| listing_order(a, b, filter));

        Ok(notes)
    }

    async fn find_single_note_by_id(&self, id: i64) -> Result<Option<Note>> {
        Ok(self.state.lock().await.notes.get(&id).cloned())
    }

    async fn create_note(&self, values: &CreateNoteValues<'_>) -> Result<Note> {
        let mut state = self.state.lock().await;

        let note = Note {
            id: state.next_id,
            content: values.content.to_string(),
            date: values.date,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            is_pinned: values.is_pinned,
            is_archived: false,
            tags: values.tags.to_vec(),
            author: values.author.map(ToString::to_string),
            deleted_at: None,
        };

        state.next_id += 1;
        state.notes.insert(note.id, note.clone());

        Ok(note)
    }

    async fn update_note(&self, note: &Note, values: &UpdateNoteValues<'_>) -> Result<Note> {
        Ok(self
            .state
            .lock()
            .await
            .notes
            .get_mut(&note.id)
            .map(|note| {
                if let Some(content) = values.content {
                    note.content = content.to_string();
                }

                if let Some(date) = values.date {
                    note.date = date;
                }

                if let Some(tags) = values.tags {
                    note.tags = tags.clone();
                }

                if let Some(is_pinned) = values.is_pinned {
                    note.is_pinned = is_pinned;
                }

                if let Some(is_archived) = values.is_archived {
                    note.is_archived = is_archived;
                }

                note.updated_at = Utc::now();

                note.clone()
            })
            .expect("HashMap is the source of the note"))
    }

    async fn delete_note(&self, note: &Note) -> Result<()> {
        if let Some(note) = self.state.lock().await.notes.get_mut(&note.id) {
            note.deleted_at = Some(Utc::now());
        }

        Ok(())
    }

    async fn restore_note(&self, note: &Note) -> Result<Note> {
        Ok(self
            .state
            .lock()
            .await
            .notes
            .get_mut(&note.id)
            .map(|note| {
                note.deleted_at = None;

                note.clone()
            })
            .expect("HashMap is the source of the note"))
    }

    async fn purge_note(&self, note: &Note) -> Result<()> {
        self.state.lock().await.notes.remove(&note.id);

        Ok(())
    }
}
