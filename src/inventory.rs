//! Insertion-ordered list of collected items and granted bonuses.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "one")]
    pub count: u32,
}

fn one() -> u32 {
    1
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    entries: Vec<InventoryEntry>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores entries from a save; a later duplicate id replaces the earlier
    /// one in place.
    pub fn from_entries(entries: impl IntoIterator<Item = InventoryEntry>) -> Self {
        let mut inventory = Self::new();
        for mut entry in entries {
            entry.count = entry.count.max(1);
            match inventory.position(&entry.id) {
                Some(i) => inventory.entries[i] = entry,
                None => inventory.entries.push(entry),
            }
        }
        inventory
    }

    /// Increments the count for `id`, creating it at 1.  An existing entry
    /// keeps its name and description.
    pub fn add(&mut self, id: &str, name: &str, description: &str) {
        match self.position(id) {
            Some(i) => self.entries[i].count += 1,
            None => self.entries.push(InventoryEntry {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                count: 1,
            }),
        }
    }

    /// Overwrites `id` with a single-count entry.  Used for levelled
    /// equipment such as the drone and barrier.
    pub fn set(&mut self, id: &str, name: &str, description: &str) {
        let entry = InventoryEntry {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            count: 1,
        };
        match self.position(id) {
            Some(i) => self.entries[i] = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, id: &str) -> Option<&InventoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn count(&self, id: &str) -> u32 {
        self.get(id).map_or(0, |entry| entry.count)
    }

    pub fn entries(&self) -> &[InventoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }
}
