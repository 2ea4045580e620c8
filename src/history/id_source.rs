use serde::{Deserialize, Serialize};

/// Issues the two process-wide identifier streams: innovation numbers for
/// structural genes and ids for whole genotypes. Each call returns the current
/// counter value and then increments it, so no value is ever issued twice.
///
/// This is owned state, not a global: the [`super::store::ArchetypeStore`]
/// holds one and every call site takes it by `&mut`, which keeps counters
/// deterministic and test-isolated. The struct is serde-derived so the store
/// can checkpoint the high-water marks alongside the archetype files; a
/// resumed run must never reissue an identifier already on disk.
///
/// Counter exhaustion (u64 overflow) is a fatal condition. At one innovation
/// per structural mutation it takes a multi-billion-generation run to get
/// there, so no defensive handling is attempted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdSource {
    next_innovation: u64,
    next_genotype_id: u64,
}

impl IdSource {
    pub fn new() -> IdSource {
        IdSource::default()
    }

    pub fn starting_at(next_innovation: u64, next_genotype_id: u64) -> IdSource {
        IdSource { next_innovation, next_genotype_id }
    }

    pub fn next_innovation(&mut self) -> u64 {
        let result = self.next_innovation;
        self.next_innovation += 1;
        result
    }

    pub fn next_genotype_id(&mut self) -> u64 {
        let result = self.next_genotype_id;
        self.next_genotype_id += 1;
        result
    }

    /// Make sure the next issued innovation number is at least `floor`.
    /// Called after loading an archetype whose embedded innovation numbers may
    /// exceed the in-memory counter. Never lowers the counter.
    pub fn raise_innovation_floor(&mut self, floor: u64) {
        self.next_innovation = self.next_innovation.max(floor);
    }

    pub fn raise_genotype_id_floor(&mut self, floor: u64) {
        self.next_genotype_id = self.next_genotype_id.max(floor);
    }

    /// The next innovation number that would be issued, without issuing it.
    pub fn peek_innovation(&self) -> u64 {
        self.next_innovation
    }

    pub fn peek_genotype_id(&self) -> u64 {
        self.next_genotype_id
    }
}
