use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::Note;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("note store is full ({0} notes)")]
    CapacityExceeded(usize),
}

/// Append-only in-memory note store.
///
/// Notes are kept sorted by timestamp ascending; equal timestamps keep insertion order.
pub struct Repository {
    notes: Vec<Note>,
    ids: HashSet<Uuid>,
    max_notes: Option<usize>,
}

impl Repository {
    pub fn new(max_notes: Option<usize>) -> Self {
        Self {
            notes: Vec::new(),
            ids: HashSet::new(),
            max_notes,
        }
    }

    pub fn create_note(&mut self, content: String) -> Result<Note, RepositoryError> {
        self.create_note_at(content, Utc::now())
    }

    pub fn create_note_at(
        &mut self,
        content: String,
        timestamp: DateTime<Utc>,
    ) -> Result<Note, RepositoryError> {
        if let Some(limit) = self.max_notes {
            if self.notes.len() >= limit {
                return Err(RepositoryError::CapacityExceeded(limit));
            }
        }

        let mut id = Uuid::new_v4();
        while self.ids.contains(&id) {
            id = Uuid::new_v4();
        }

        let note = Note {
            id,
            content,
            timestamp,
        };

        let pos = self.notes.partition_point(|n| n.timestamp <= timestamp);
        self.notes.insert(pos, note.clone());
        self.ids.insert(id);

        tracing::debug!("Stored note {} at position {}", id, pos);

        Ok(note)
    }

    /// All notes, most recent first.
    pub fn get_all_notes(&self) -> Vec<Note> {
        self.notes.iter().rev().cloned().collect()
    }

    /// Notes with `start <= timestamp <= end`, oldest first.
    pub fn get_notes_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Note> {
        let from = self.notes.partition_point(|n| n.timestamp < start);
        let to = self.notes.partition_point(|n| n.timestamp <= end);

        if from >= to {
            return Vec::new();
        }

        self.notes[from..to].to_vec()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, hour, minute, 0).unwrap()
    }

    #[test]
    fn list_all_returns_every_note_most_recent_first() {
        let mut repo = Repository::new(None);
        repo.create_note_at("second".to_string(), at(10, 0)).unwrap();
        repo.create_note_at("first".to_string(), at(9, 0)).unwrap();
        repo.create_note_at("third".to_string(), at(11, 0)).unwrap();

        let contents: Vec<_> = repo
            .get_all_notes()
            .into_iter()
            .map(|n| n.content)
            .collect();

        assert_eq!(contents, vec!["third", "second", "first"]);
    }

    #[test]
    fn ids_are_unique() {
        let mut repo = Repository::new(None);
        let mut seen = HashSet::new();

        for i in 0..500 {
            let note = repo.create_note(format!("note {i}")).unwrap();
            assert!(seen.insert(note.id), "duplicate id {}", note.id);
        }

        assert_eq!(repo.len(), 500);
        assert_eq!(repo.get_all_notes().len(), 500);
    }

    #[test]
    fn notes_are_stored_as_given() {
        let mut repo = Repository::new(None);
        let created = repo.create_note("  padded  ".to_string()).unwrap();

        let all = repo.get_all_notes();
        assert_eq!(all, vec![created]);
        assert_eq!(all[0].content, "  padded  ");
    }

    #[test]
    fn between_is_inclusive_and_ascending() {
        let mut repo = Repository::new(None);
        repo.create_note_at("before".to_string(), at(7, 59)).unwrap();
        repo.create_note_at("end".to_string(), at(12, 0)).unwrap();
        repo.create_note_at("start".to_string(), at(8, 0)).unwrap();
        repo.create_note_at("middle".to_string(), at(10, 0)).unwrap();
        repo.create_note_at("after".to_string(), at(12, 0) + Duration::milliseconds(1))
            .unwrap();

        let contents: Vec<_> = repo
            .get_notes_between(at(8, 0), at(12, 0))
            .into_iter()
            .map(|n| n.content)
            .collect();

        assert_eq!(contents, vec!["start", "middle", "end"]);
    }

    #[test]
    fn between_with_inverted_window_is_empty() {
        let mut repo = Repository::new(None);
        repo.create_note_at("note".to_string(), at(10, 0)).unwrap();

        assert!(repo.get_notes_between(at(11, 0), at(9, 0)).is_empty());
    }

    #[test]
    fn equal_timestamps_keep_insertion_order() {
        let mut repo = Repository::new(None);
        repo.create_note_at("a".to_string(), at(10, 0)).unwrap();
        repo.create_note_at("b".to_string(), at(10, 0)).unwrap();

        let asc: Vec<_> = repo
            .get_notes_between(at(10, 0), at(10, 0))
            .into_iter()
            .map(|n| n.content)
            .collect();
        assert_eq!(asc, vec!["a", "b"]);
    }

    #[test]
    fn append_beyond_capacity_fails_without_storing() {
        let mut repo = Repository::new(Some(1));
        repo.create_note("kept".to_string()).unwrap();

        let err = repo.create_note("dropped".to_string()).unwrap_err();

        assert!(matches!(err, RepositoryError::CapacityExceeded(1)));
        assert_eq!(repo.len(), 1);
    }
}
