use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::info;

use super::error::HistoryError;
use super::id_source::IdSource;

/// Records how innovation numbers were rewritten when two independently
/// evolved gene spaces were merged by combining crossover: each entry maps the
/// old innovation number of a spliced gene to the fresh number its archetype
/// copy was given. Entries are removed as the genes they describe are pruned,
/// so the map never points at nonexistent genes.
///
/// INVARIANT: no two keys map to the same value. Every adjusted number comes
/// fresh from the [`IdSource`], so a duplicate value means the map was
/// corrupted somewhere upstream, and [`CombiningCrossoverMap::key_for_value`]
/// treats it as fatal.
#[derive(Clone, Debug, Default)]
pub struct CombiningCrossoverMap {
    old_to_new: HashMap<u64, u64>,
}

impl CombiningCrossoverMap {
    pub fn new() -> CombiningCrossoverMap {
        CombiningCrossoverMap::default()
    }

    pub fn len(&self) -> usize {
        self.old_to_new.len()
    }

    pub fn is_empty(&self) -> bool {
        self.old_to_new.is_empty()
    }

    pub fn put(&mut self, old: u64, new: u64) {
        self.old_to_new.insert(old, new);
    }

    pub fn get(&self, old: u64) -> Option<u64> {
        self.old_to_new.get(&old).copied()
    }

    pub fn contains_key(&self, old: u64) -> bool {
        self.old_to_new.contains_key(&old)
    }

    pub fn contains_value(&self, new: u64) -> bool {
        self.old_to_new.values().any(|&v| v == new)
    }

    pub fn remove(&mut self, old: u64) -> Option<u64> {
        self.old_to_new.remove(&old)
    }

    /// Reverse lookup: the key mapping to `new`, if any.
    pub fn key_for_value(&self, new: u64) -> Option<u64> {
        let mut keys = self.old_to_new.iter().filter(|&(_, &v)| v == new).map(|(&k, _)| k);
        let first = keys.next();
        if let Some(second) = keys.next() {
            panic!(
                "two keys ({} and {}) map to innovation {} in combining crossover map: {:?}",
                first.unwrap(), second, new, self.old_to_new
            );
        }
        first
    }

    /// The innovation number `old` was rewritten to during combining
    /// crossover, registering a fresh one if this is the first time `old` is
    /// spliced. The fresh number keeps archetype copies from colliding with
    /// the genes they were cloned from.
    pub fn adjusted_innovation(&mut self, old: u64, ids: &mut IdSource) -> u64 {
        match self.get(old) {
            Some(new) => new,
            None => {
                let new = ids.next_innovation();
                self.put(old, new);
                new
            }
        }
    }

    /// Entries as `(old, new)` pairs, sorted by key so persisted files are
    /// stable across runs.
    pub fn pairs(&self) -> Vec<(u64, u64)> {
        let mut pairs: Vec<(u64, u64)> = self.old_to_new.iter().map(|(&k, &v)| (k, v)).collect();
        pairs.sort_unstable();
        pairs
    }

    pub fn save(&self, path: &Path) -> Result<(), HistoryError> {
        info!("Saving combining crossover map ({} entries) to {}", self.len(), path.display());
        fs::write(path, serde_json::to_string_pretty(&self.pairs())?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<CombiningCrossoverMap, HistoryError> {
        info!("Loading combining crossover map from {}", path.display());
        let pairs: Vec<(u64, u64)> = serde_json::from_str(&fs::read_to_string(path)?)?;
        Ok(CombiningCrossoverMap {
            old_to_new: pairs.into_iter().collect(),
        })
    }
}
