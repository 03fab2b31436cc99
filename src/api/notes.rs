//! Notes API endpoints
//!
//! Everything related to the notes management: listing with filters,
//! creation, partial updates and the trash lifecycle

use axum::Extension;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::notes::Note;
use crate::storage;
use crate::storage::CreateNoteValues;
use crate::storage::DateFilter;
use crate::storage::NoteFilter;
use crate::storage::SortKey;
use crate::storage::Storage;
use crate::storage::UpdateNoteValues;

use super::Error;
use super::Form;
use super::PathParameters;
use super::Query;
use super::Success;

/// Note response going to the user
///
/// Field presence is normalized: tags are always an array, flags always
/// booleans, timestamps always the same string format
#[derive(Debug, Serialize)]
pub struct NoteResponse {
    /// Note ID
    pub id: i64,

    /// Rich-text content
    pub content: String,

    /// Calendar day the note belongs to
    pub date: NaiveDate,

    /// Creation date
    pub created_at: DateTime<Utc>,

    /// Last updated at
    pub updated_at: DateTime<Utc>,

    /// Pinned flag
    pub is_pinned: bool,

    /// Archived flag
    pub is_archived: bool,

    /// Tags
    pub tags: Vec<String>,

    /// Display name of whoever wrote the note
    pub author: Option<String>,

    /// When the note was moved to the trash, if it is there
    pub deleted_at: Option<DateTime<Utc>>,
}

impl NoteResponse {
    /// Create a response from a [`Note`](Note)
    fn from_note(note: Note) -> Self {
        Self {
            id: note.id,
            content: note.content,
            date: note.date,
            created_at: note.created_at,
            updated_at: note.updated_at,
            is_pinned: note.is_pinned,
            is_archived: note.is_archived,
            tags: note.tags,
            author: note.author,
            deleted_at: note.deleted_at,
        }
    }

    /// Create a response from multiple [`Note`](Note)s
    fn from_note_multiple(mut notes: Vec<Note>) -> Vec<Self> {
        notes.drain(..).map(Self::from_note).collect::<Vec<Self>>()
    }
}

/// Query string of the note listing
///
/// Every dimension is optional; the defaults give the normal view of
/// active, non-archived notes, pinned first, newest date first
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotesQuery {
    /// Only notes of exactly this day
    date: Option<NaiveDate>,

    /// Start of a date range, inclusive
    start_date: Option<NaiveDate>,

    /// End of a date range, inclusive; ignored without a start date
    end_date: Option<NaiveDate>,

    /// Case-insensitive substring match on the content
    search: Option<String>,

    /// Only notes carrying this tag
    tag: Option<String>,

    /// Include archived notes
    #[serde(default)]
    show_archived: bool,

    /// List the trash instead of the active notes
    #[serde(default)]
    show_deleted: bool,

    /// Sort order: `date`, `updated` or `alpha`
    #[serde(default)]
    sort_by: SortKey,

    /// Do not sort pinned notes first, used by range views
    #[serde(default)]
    ignore_pinned: bool,
}

/// List all notes matching the filters
///
/// Request:
/// ```sh
/// curl -v 'http://localhost:6000/api/notes?tag=work&sortBy=updated'
/// ```
///
/// Response:
/// ```json
/// { "data": [ { "id": 1, "content": "<p>hello</p>" ... } ] }
/// ```
pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
    Query(query): Query<ListNotesQuery>,
) -> Result<Success<Vec<NoteResponse>>, Error> {
    let filter = NoteFilter {
        search: query.search.filter(|search| !search.is_empty()),
        tag: query.tag.filter(|tag| !tag.is_empty()),
        show_archived: query.show_archived,
        show_deleted: query.show_deleted,
        sort_by: query.sort_by,
        date: DateFilter::from_parts(query.date, query.start_date, query.end_date),
        ignore_pinned: query.ignore_pinned,
    };

    let notes = storage
        .find_all_notes(&filter)
        .await
        .map_err(storage_error)?;

    Ok(Success::ok(NoteResponse::from_note_multiple(notes)))
}

/// Get a single note
///
/// Also finds notes sitting in the trash, so the trash view can load its
/// rows
pub async fn single<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(note_id): PathParameters<i64>,
) -> Result<Success<NoteResponse>, Error> {
    fetch_note(&storage, note_id)
        .await
        .map(|note| Success::ok(NoteResponse::from_note(note)))
}

/// Create note form
#[derive(Debug, Deserialize)]
pub struct CreateNoteForm {
    /// Content of the note, must not be empty
    content: String,

    /// Calendar day the note belongs to
    date: NaiveDate,

    /// Tags of the note
    tags: Option<Vec<String>>,

    /// Pin the note right away
    is_pinned: Option<bool>,

    /// Display name of the caller
    author: Option<String>,
}

/// Create a note based on the [`CreateNoteForm`](CreateNoteForm) form
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "content": "<p>hello</p>", "date": "2024-01-01", "tags": ["work"] }' \
///     http://localhost:6000/api/notes
/// ```
///
/// Response:
/// ```json
/// { "data": { "id": 1, "content": "<p>hello</p>" ... } }
/// ```
pub async fn create<S: Storage>(
    Extension(storage): Extension<S>,
    Form(form): Form<CreateNoteForm>,
) -> Result<Success<NoteResponse>, Error> {
    if form.content.is_empty() {
        return Err(Error::bad_request("Content is required"));
    }

    let values = CreateNoteValues {
        content: &form.content,
        date: form.date,
        tags: form.tags.as_deref().unwrap_or_default(),
        is_pinned: form.is_pinned.unwrap_or(false),
        author: form.author.as_deref(),
    };

    let note = storage
        .create_note(&values)
        .await
        .map_err(storage_error)?;

    Ok(Success::created(NoteResponse::from_note(note)))
}

/// Update note form
///
/// Fields to update a note with, all fields are optional and are not
/// touched when not provided
#[derive(Debug, Deserialize)]
pub struct UpdateNoteForm {
    /// New content of the note
    content: Option<String>,

    /// New calendar day
    date: Option<NaiveDate>,

    /// New tags, replacing the previous set
    tags: Option<Vec<String>>,

    /// New pinned flag
    is_pinned: Option<bool>,

    /// New archived flag
    is_archived: Option<bool>,
}

/// Update a note based on the [`UpdateNoteForm`](UpdateNoteForm) form
///
/// Only provided values are processed, the other fields of the note will
/// not be touched; sending just `{ "is_pinned": true }` is a valid pin
/// toggle
pub async fn update<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(note_id): PathParameters<i64>,
    Form(form): Form<UpdateNoteForm>,
) -> Result<Success<NoteResponse>, Error> {
    let note = fetch_note(&storage, note_id).await?;

    let values = UpdateNoteValues {
        content: form.content.as_ref(),
        date: form.date,
        tags: form.tags.as_ref(),
        is_pinned: form.is_pinned,
        is_archived: form.is_archived,
    };

    let updated_note = storage
        .update_note(&note, &values)
        .await
        .map_err(storage_error)?;

    Ok(Success::ok(NoteResponse::from_note(updated_note)))
}

/// Query string of the delete endpoint
#[derive(Debug, Deserialize)]
pub struct DeleteNoteQuery {
    /// Remove the row instead of moving the note to the trash
    #[serde(default)]
    permanent: bool,
}

/// Delete a note
///
/// Moves the note to the trash; with `?permanent=true` the note is
/// removed for good
///
/// Request:
/// ```sh
/// curl -v -XDELETE http://localhost:6000/api/notes/1?permanent=true
/// ```
pub async fn delete<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(note_id): PathParameters<i64>,
    Query(query): Query<DeleteNoteQuery>,
) -> Result<Success<&'static str>, Error> {
    let note = fetch_note(&storage, note_id).await?;

    if query.permanent {
        storage.purge_note(&note).await.map_err(storage_error)?;
    } else {
        storage.delete_note(&note).await.map_err(storage_error)?;
    }

    Ok(Success::<&'static str>::no_content())
}

/// Restore a note from the trash
///
/// Only notes in the trash can be restored; restoring an active note is
/// a no-match, it never mutates the note
///
/// Request:
/// ```sh
/// curl -v -XPOST http://localhost:6000/api/notes/1/restore
/// ```
pub async fn restore<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(note_id): PathParameters<i64>,
) -> Result<Success<NoteResponse>, Error> {
    let note = fetch_note(&storage, note_id).await?;

    if !note.is_deleted() {
        return Err(Error::not_found("Note is not in the trash"));
    }

    let restored_note = storage
        .restore_note(&note)
        .await
        .map_err(storage_error)?;

    Ok(Success::ok(NoteResponse::from_note(restored_note)))
}

/// Fetch note from storage
async fn fetch_note<S: Storage>(storage: &S, note_id: i64) -> Result<Note, Error> {
    storage
        .find_single_note_by_id(note_id)
        .await
        .map_err(storage_error)?
        .map_or_else(|| Err(Error::not_found("Note not found")), Ok)
}

/// Log the storage failure, reply with a generic message
fn storage_error(err: storage::Error) -> Error {
    tracing::error!("Storage error: {err}");

    Error::internal_server_error("Storage error")
}
