//! In-memory set of known scores, one per `id`.

use std::collections::HashMap;

use super::entry::ScoreEntry;

/// Holds the current known scores in fetch/insertion order.
///
/// `index` maps an entry id to its slot in `entries`, so an id can never
/// occupy two slots.
#[derive(Debug, Default, Clone)]
pub struct ScoreStore {
    entries: Vec<ScoreEntry>,
    index: HashMap<String, usize>,
}

impl ScoreStore {
    pub fn new() -> Self { Self::default() }

    /// Discard the current contents and install `entries`.
    ///
    /// A repeated id overwrites the earlier occurrence in place.
    pub fn replace_all(&mut self, entries: impl IntoIterator<Item = ScoreEntry>) {
        self.entries.clear();
        self.index.clear();
        for entry in entries {
            self.upsert(entry);
        }
    }

    /// Insert `entry`, or overwrite the entry carrying the same id.
    pub fn upsert(&mut self, entry: ScoreEntry) {
        match self.index.get(&entry.id) {
            Some(&slot) => self.entries[slot] = entry,
            None => {
                self.index.insert(entry.id.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Snapshot of every entry.
    pub fn all(&self) -> Vec<ScoreEntry> {
        self.entries.clone()
    }

    pub fn get(&self, id: &str) -> Option<&ScoreEntry> {
        self.index.get(id).map(|&slot| &self.entries[slot])
    }

    pub fn len(&self) -> usize { self.entries.len() }
}
