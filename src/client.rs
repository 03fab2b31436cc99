//! Client-side note cache with optimistic updates
//!
//! Mirrors the bookkeeping of the web client's data-fetching hook: every
//! mutation rewrites the cached list immediately, before the request
//! resolves, and marks the cache stale so the next revalidating fetch
//! reconciles with server truth. There is no diff-based rollback; a
//! failed mutation is rolled back by that same forced re-fetch.

use std::time::Duration;
use std::time::Instant;

use chrono::Utc;

use crate::notes::Note;

/// Refresh interval of the background poll
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Client-visible state of a single note
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteState {
    /// Live in the normal listing
    Active,

    /// Archived, hidden from the normal listing
    Archived,

    /// In the trash, waiting for restore or purge
    Trashed,

    /// Permanently deleted, terminal
    Gone,
}

/// Cache of the server note list with optimistic local mutations
#[derive(Debug)]
pub struct NoteStore {
    /// Last known note list, including optimistic rewrites
    notes: Vec<Note>,

    /// Interval of the background poll
    refresh_interval: Duration,

    /// When the cache last matched server truth
    last_refresh: Option<Instant>,

    /// A revalidating fetch is due regardless of the interval
    stale: bool,
}

impl NoteStore {
    /// Create an empty store
    ///
    /// The store starts stale; nothing was fetched yet
    pub fn new(refresh_interval: Duration) -> Self {
        Self {
            notes: Vec::new(),
            refresh_interval,
            last_refresh: None,
            stale: true,
        }
    }

    /// The cached list, optimistic rewrites included
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Client-visible state of a note
    ///
    /// A note missing from the cache is gone
    pub fn state_of(&self, id: i64) -> NoteState {
        match self.notes.iter().find(|note| note.id == id) {
            None => NoteState::Gone,
            Some(note) if note.is_deleted() => NoteState::Trashed,
            Some(note) if note.is_archived => NoteState::Archived,
            Some(_) => NoteState::Active,
        }
    }

    /// Optimistically prepend a created note
    pub fn created(&mut self, note: Note) {
        self.notes.insert(0, note);
        self.stale = true;
    }

    /// Optimistically replace an updated note in place
    ///
    /// An unknown id leaves the cache untouched; the revalidation will
    /// pick the note up
    pub fn updated(&mut self, updated_note: Note) {
        if let Some(note) = self
            .notes
            .iter_mut()
            .find(|note| note.id == updated_note.id)
        {
            *note = updated_note;
        }

        self.stale = true;
    }

    /// Optimistically move a note to the trash
    pub fn soft_deleted(&mut self, id: i64) {
        if let Some(note) = self.notes.iter_mut().find(|note| note.id == id) {
            note.deleted_at = Some(Utc::now());
        }

        self.stale = true;
    }

    /// Optimistically pull a note out of the trash
    pub fn restored(&mut self, id: i64) {
        if let Some(note) = self.notes.iter_mut().find(|note| note.id == id) {
            note.deleted_at = None;
        }

        self.stale = true;
    }

    /// Optimistically drop a permanently deleted note
    pub fn purged(&mut self, id: i64) {
        self.notes.retain(|note| note.id != id);
        self.stale = true;
    }

    /// Replace the cache with server truth
    ///
    /// Called with the result of every revalidating fetch, successful
    /// mutation or not
    pub fn reconcile(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        self.last_refresh = Some(Instant::now());
        self.stale = false;
    }

    /// Force a revalidation, used on focus and reconnect events
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Whether a revalidating fetch is due
    pub fn needs_refresh(&self, now: Instant) -> bool {
        if self.stale {
            return true;
        }

        self.last_refresh
            .is_none_or(|last_refresh| now.duration_since(last_refresh) >= self.refresh_interval)
    }
}

impl Default for NoteStore {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_INTERVAL)
    }
}
