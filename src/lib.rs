//! Bookkeeping core for NEAT-style neuroevolution: tracks, per population, an
//! ordered "archetype" superset of every node gene ever introduced, and issues
//! the monotonically increasing innovation numbers that name structural
//! novelty so genomes with divergent topologies can be aligned for crossover.
//!
//! The genetic operators, phenotype networks, and the evolutionary loop driver
//! all live elsewhere; they call into this crate whenever a structural gene is
//! created, spliced during combining crossover, or pruned.

pub mod history;

pub use history::activation_functions::ActivationFunction;
pub use history::archetype::Archetype;
pub use history::config::HistoryConfig;
pub use history::crossover_map::CombiningCrossoverMap;
pub use history::error::HistoryError;
pub use history::genes::{NodeGene, NodeType};
pub use history::id_source::IdSource;
pub use history::store::ArchetypeStore;
