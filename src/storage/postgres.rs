//! Postgres storage

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::QueryBuilder;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use crate::notes::Note;

use super::CreateNoteValues;
use super::DateFilter;
use super::Error;
use super::NoteFilter;
use super::Result;
use super::SortKey;
use super::Storage;
use super::UpdateNoteValues;

/// Migrator to run migrations on startup
static MIGRATOR: Migrator = sqlx::migrate!();

/// Columns of every note statement, kept in `SqlxNote` field order
const NOTE_COLUMNS: &str =
    "id, content, date, created_at, updated_at, is_pinned, is_archived, tags, author, deleted_at";

/// Postgres storage
#[derive(Clone)]
pub struct Postgres {
    /// Pool of connections
    connection_pool: PgPool,
}

impl Postgres {
    /// Create Postgres storage
    ///
    /// Use the `DATABASE_URL` environment variable
    ///
    /// Migrations will be run
    pub async fn new() -> Self {
        let database_connection_string = std::env::var("DATABASE_URL").expect("Valid DATABASE_URL");

        let connection_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_connection_string)
            .await
            .expect("Valid connection");

        Self::new_with_pool(connection_pool).await
    }

    /// Create Postgres storage with existing pool
    ///
    /// Migrations will be run
    pub async fn new_with_pool(connection_pool: PgPool) -> Self {
        let migration_result = MIGRATOR.run(&connection_pool).await;

        if let Err(err) = migration_result {
            panic!("Migrations could not run: {err}");
        }

        Self { connection_pool }
    }
}

/// Postgres version of a note
#[derive(sqlx::FromRow)]
struct SqlxNote {
    /// Note ID
    id: i64,

    /// Rich-text content
    content: String,

    /// Calendar day the note belongs to
    date: NaiveDate,

    /// Creation date
    created_at: DateTime<Utc>,

    /// Last updated at
    updated_at: DateTime<Utc>,

    /// Pinned flag
    is_pinned: bool,

    /// Archived flag
    is_archived: bool,

    /// Tags
    tags: Vec<String>,

    /// Caller-supplied display name
    author: Option<String>,

    /// Deleted at
    deleted_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Create note from postgres version
    fn from_sqlx_note(note: SqlxNote) -> Self {
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

    /// Maybe create note from postgres version
    fn from_sqlx_note_optional(note: Option<SqlxNote>) -> Option<Self> {
        note.map(Self::from_sqlx_note)
    }

    /// Create multiple notes from postgres version
    fn from_sqlx_note_multiple(mut notes: Vec<SqlxNote>) -> Vec<Self> {
        notes
            .drain(..)
            .map(Self::from_sqlx_note)
            .collect::<Vec<Self>>()
    }
}

#[async_trait]
impl Storage for Postgres {
    async fn find_all_notes(&self, filter: &NoteFilter) -> Result<Vec<Note>> {
        let mut query =
            QueryBuilder::new(format!("SELECT {NOTE_COLUMNS} FROM notes WHERE "));

        // trash and non-trash are mutually exclusive; archived notes only
        // hide from non-trash listings
        if filter.show_deleted {
            query.push("deleted_at IS NOT NULL");
        } else {
            query.push("deleted_at IS NULL");

            if !filter.show_archived {
                query.push(" AND is_archived = FALSE");
            }
        }

        match filter.date {
            DateFilter::Any => {}
            DateFilter::On(day) => {
                query.push(" AND date = ");
                query.push_bind(day);
            }
            DateFilter::Between(start, end) => {
                query.push(" AND date >= ");
                query.push_bind(start);
                query.push(" AND date <= ");
                query.push_bind(end);
            }
            DateFilter::From(start) => {
                query.push(" AND date >= ");
                query.push_bind(start);
            }
        }

        if let Some(search) = &filter.search {
            query.push(" AND content ILIKE ");
            query.push_bind(format!("%{search}%"));
        }

        if let Some(tag) = &filter.tag {
            query.push(" AND ");
            query.push_bind(tag);
            query.push(" = ANY(tags)");
        }

        query.push(" ORDER BY ");

        if !filter.ignore_pinned {
            query.push("is_pinned DESC, ");
        }

        query.push(match filter.sort_by {
            SortKey::Date => "date DESC, created_at DESC",
            SortKey::Updated => "updated_at DESC",
            SortKey::Alpha => "content ASC",
        });

        let notes = query
            .build_query_as::<SqlxNote>()
            .fetch_all(&self.connection_pool)
            .await
            .map(Note::from_sqlx_note_multiple)
            .map_err(connection_error)?;

        Ok(notes)
    }

    async fn find_single_note_by_id(&self, id: i64) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, SqlxNote>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1 LIMIT 1"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map(Note::from_sqlx_note_optional)
        .map_err(connection_error)?;

        Ok(note)
    }

    async fn create_note(&self, values: &CreateNoteValues<'_>) -> Result<Note> {
        let note = sqlx::query_as::<_, SqlxNote>(&format!(
            "INSERT INTO notes (content, date, tags, is_pinned, author)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {NOTE_COLUMNS}"
        ))
        .bind(values.content)
        .bind(values.date)
        .bind(values.tags)
        .bind(values.is_pinned)
        .bind(values.author)
        .fetch_one(&self.connection_pool)
        .await
        .map(Note::from_sqlx_note)
        .map_err(connection_error)?;

        Ok(note)
    }

    async fn update_note(&self, note: &Note, values: &UpdateNoteValues<'_>) -> Result<Note> {
        let updated_note = sqlx::query_as::<_, SqlxNote>(&format!(
            "UPDATE notes
            SET content = $1, date = $2, tags = $3, is_pinned = $4, is_archived = $5,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $6
            RETURNING {NOTE_COLUMNS}"
        ))
        .bind(values.content.unwrap_or(&note.content))
        .bind(values.date.unwrap_or(note.date))
        .bind(values.tags.unwrap_or(&note.tags))
        .bind(values.is_pinned.unwrap_or(note.is_pinned))
        .bind(values.is_archived.unwrap_or(note.is_archived))
        .bind(note.id)
        .fetch_one(&self.connection_pool)
        .await
        .map(Note::from_sqlx_note)
        .map_err(connection_error)?;

        Ok(updated_note)
    }

    async fn delete_note(&self, note: &Note) -> Result<()> {
        sqlx::query("UPDATE notes SET deleted_at = CURRENT_TIMESTAMP WHERE id = $1")
            .bind(note.id)
            .execute(&self.connection_pool)
            .await
            .map_err(connection_error)?;

        Ok(())
    }

    async fn restore_note(&self, note: &Note) -> Result<Note> {
        let restored_note = sqlx::query_as::<_, SqlxNote>(&format!(
            "UPDATE notes SET deleted_at = NULL WHERE id = $1 RETURNING {NOTE_COLUMNS}"
        ))
        .bind(note.id)
        .fetch_one(&self.connection_pool)
        .await
        .map(Note::from_sqlx_note)
        .map_err(connection_error)?;

        Ok(restored_note)
    }

    async fn purge_note(&self, note: &Note) -> Result<()> {
        sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(note.id)
            .execute(&self.connection_pool)
            .await
            .map_err(connection_error)?;

        Ok(())
    }
}

/// Convert `SQLx` to storage connection error
fn connection_error<E>(err: E) -> Error
where
    E: std::error::Error,
{
    Error::Connection(err.to_string())
}
