use std::collections::HashSet;

use notekeeper_template::Schema;
use tracing::debug;

use crate::note::{Note, name_key};

/// The in-memory base.
///
/// A base loaded from empty text holds a single placeholder note built from
/// the template defaults, so the store is never empty once loaded.  The
/// placeholder is dropped by the first [`RecordStore::insert`].
#[derive(Debug, Clone)]
pub struct RecordStore {
    schema: Schema,
    notes: Vec<Note>,
    placeholder: bool,
}

impl RecordStore {
    pub fn load(schema: Schema, text: &str) -> Self {
        let notes: Vec<Note> = schema
            .parse(text)
            .into_vec()
            .iter()
            .map(Note::from_record)
            .collect();

        if notes.is_empty() {
            if !text.trim().is_empty() {
                tracing::warn!(
                    bytes = text.len(),
                    "base text matched no records; starting from an empty base"
                );
            }
            let placeholder = Note::from_record(&schema.defaults());
            return Self {
                schema,
                notes: vec![placeholder],
                placeholder: true,
            };
        }

        debug!(records = notes.len(), "base loaded");
        Self {
            schema,
            notes,
            placeholder: false,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Whether the only note is the throwaway placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Case-insensitive, trimmed name lookup.  A blank name never matches.
    pub fn find(&self, name: &str) -> Option<usize> {
        let key = name_key(name)?;
        if self.placeholder {
            return None;
        }
        self.notes
            .iter()
            .position(|note| note.lookup_key().as_deref() == Some(key.as_str()))
    }

    pub fn get(&self, index: usize) -> Option<&Note> {
        if self.placeholder {
            return None;
        }
        self.notes.get(index)
    }

    pub fn insert(&mut self, note: Note) {
        if self.placeholder {
            self.notes.clear();
            self.placeholder = false;
        }
        debug!(name = %note.name, "record inserted");
        self.notes.push(note);
    }

    pub fn delete(&mut self, index: usize) -> Option<Note> {
        if self.placeholder || index >= self.notes.len() {
            return None;
        }
        let removed = self.notes.remove(index);
        debug!(name = %removed.name, "record deleted");
        Some(removed)
    }

    /// Swaps the note at `index` for `note`, returning the old one.
    pub fn replace(&mut self, index: usize, note: Note) -> Option<Note> {
        if self.placeholder {
            return None;
        }
        let slot = self.notes.get_mut(index)?;
        debug!(name = %note.name, "record replaced");
        Some(std::mem::replace(slot, note))
    }

    /// Every stored note, the placeholder included.
    pub fn records(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Full text of the base file.  A lone placeholder serializes to nothing.
    pub fn serialize(&self) -> String {
        if self.placeholder {
            return String::new();
        }
        let records: Vec<_> = self.notes.iter().map(Note::to_record).collect();
        self.schema.stringify_all(&records)
    }

    /// Every tag in the base, deduplicated case-insensitively and sorted.
    pub fn used_tags(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut tags: Vec<String> = self
            .notes
            .iter()
            .flat_map(|note| note.tags.iter())
            .filter(|tag| seen.insert(tag.to_lowercase()))
            .cloned()
            .collect();
        tags.sort_by_key(|tag| tag.to_lowercase());
        tags
    }
}
