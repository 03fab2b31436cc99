use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;

/// A single journal note
///
/// The `date` is the calendar day the note belongs to, assigned by the
/// user; `created_at` is when the row came into existence.
#[derive(Clone, Debug)]
pub struct Note {
    pub id: i64,
    pub content: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_pinned: bool,
    pub is_archived: bool,
    pub tags: Vec<String>,
    pub author: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Whether the note sits in the trash
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
