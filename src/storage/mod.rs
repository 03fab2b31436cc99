//! All things related to the storage of notes

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::notes::Note;

#[cfg(not(feature = "postgres"))]
use memory::Memory;
#[cfg(feature = "postgres")]
use postgres::Postgres;

#[cfg(not(feature = "postgres"))]
mod memory;
#[cfg(feature = "postgres")]
mod postgres;

/// Setup the storage
#[cfg(not(feature = "postgres"))]
#[allow(clippy::unused_async)]
pub async fn setup() -> Memory {
    Memory::new()
}

/// Setup the storage
#[cfg(feature = "postgres")]
pub async fn setup() -> Postgres {
    Postgres::new().await
}

/// Storage errors
#[derive(Debug, Error)]
pub enum Error {
    /// A connection error with the storage
    #[error("Connection error: {0}")]
    Connection(String),
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Sort order of a note listing
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Note date, newest first, creation time as tie-breaker
    #[default]
    Date,

    /// Last update, newest first
    Updated,

    /// Content, alphabetically
    Alpha,
}

/// Calendar constraint of a note listing
///
/// A single day wins over a range; a range needs both ends, a lone start
/// date leaves the range open-ended
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DateFilter {
    /// No constraint
    #[default]
    Any,

    /// Exactly this day
    On(NaiveDate),

    /// Inclusive range
    Between(NaiveDate, NaiveDate),

    /// Open-ended, this day and later
    From(NaiveDate),
}

impl DateFilter {
    /// Combine the raw query parameters into a single constraint
    pub fn from_parts(
        date: Option<NaiveDate>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Self {
        match (date, start_date, end_date) {
            (Some(date), _, _) => Self::On(date),
            (None, Some(start), Some(end)) => Self::Between(start, end),
            (None, Some(start), None) => Self::From(start),
            // an end date without a start date is ignored
            (None, None, _) => Self::Any,
        }
    }

    /// Whether a note date satisfies the constraint
    pub fn matches(self, date: NaiveDate) -> bool {
        match self {
            Self::Any => true,
            Self::On(day) => date == day,
            Self::Between(start, end) => start <= date && date <= end,
            Self::From(start) => start <= date,
        }
    }
}

/// Filter and sort dimensions of a note listing
///
/// All dimensions are independent; the defaults give the "normal" view:
/// active notes only, archived and trashed excluded, pinned first,
/// newest date first
#[derive(Clone, Debug, Default)]
pub struct NoteFilter {
    /// Case-insensitive substring match on the content
    pub search: Option<String>,

    /// Exact match against one of the note tags
    pub tag: Option<String>,

    /// Include archived notes in a non-trash listing
    pub show_archived: bool,

    /// List the trash instead of the active notes
    ///
    /// Trash and non-trash listings are mutually exclusive result sets
    pub show_deleted: bool,

    /// Sort order
    pub sort_by: SortKey,

    /// Calendar constraint
    pub date: DateFilter,

    /// Suppress the pinned-first prefix of the sort order
    pub ignore_pinned: bool,
}

/// Values to create a Note
pub struct CreateNoteValues<'a> {
    /// Content of the note, rich-text HTML
    pub content: &'a str,

    /// Calendar day the note belongs to
    pub date: NaiveDate,

    /// Tags, order preserved for display
    pub tags: &'a [String],

    /// Pin the note to the top of the default sort
    pub is_pinned: bool,

    /// Display name of the caller, taken at face value
    pub author: Option<&'a str>,
}

/// Values to update a Note
///
/// Every `None` keeps the previous value
#[derive(Default)]
pub struct UpdateNoteValues<'a> {
    /// New content of the note
    pub content: Option<&'a String>,

    /// New calendar day
    pub date: Option<NaiveDate>,

    /// New tags, replacing the previous set
    pub tags: Option<&'a Vec<String>>,

    /// New pinned flag
    pub is_pinned: Option<bool>,

    /// New archived flag
    pub is_archived: Option<bool>,
}

/// Storage with all supported operations
#[async_trait]
pub trait Storage: Clone + Send + Sync + 'static {
    /// Find all notes matching the filter
    ///
    /// Returns the full matching set, sorted; no pagination
    async fn find_all_notes(&self, filter: &NoteFilter) -> Result<Vec<Note>>;

    /// Find a single note by its ID
    ///
    /// DOES NOT respect the soft-delete; a single fetch is not a listing
    /// and the trash view needs its rows
    async fn find_single_note_by_id(&self, id: i64) -> Result<Option<Note>>;

    /// Create a note
    ///
    /// The note starts out of the trash, `deleted_at` is forced null
    async fn create_note(&self, values: &CreateNoteValues<'_>) -> Result<Note>;

    /// Update a note, merging the provided values
    ///
    /// Refreshes `updated_at`
    async fn update_note(&self, note: &Note, values: &UpdateNoteValues<'_>) -> Result<Note>;

    /// Soft-delete a note
    async fn delete_note(&self, note: &Note) -> Result<()>;

    /// Clear the soft-delete marker of a note
    async fn restore_note(&self, note: &Note) -> Result<Note>;

    /// Remove a note for good
    async fn purge_note(&self, note: &Note) -> Result<()>;
}
