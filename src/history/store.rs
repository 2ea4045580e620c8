use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use super::archetype::Archetype;
use super::config::HistoryConfig;
use super::crossover_map::CombiningCrossoverMap;
use super::error::HistoryError;
use super::genes::NodeGene;
use super::id_source::IdSource;

/// On-disk form of one archetype: the ordered gene list plus a header saying
/// when the checkpoint was written.
#[derive(Serialize, Deserialize)]
struct ArchetypeFile {
    saved_at: DateTime<Utc>,
    genes: Vec<NodeGene>,
}

/// Owns all archetype state for a run: one [`Archetype`] per population, the
/// [`CombiningCrossoverMap`], the [`IdSource`], and the persistence paths.
/// The evolutionary loop driver holds exactly one of these and threads it
/// (single-threaded, by `&mut`) through every structural event: mutation,
/// combining crossover, generational cleaning, and checkpointing.
pub struct ArchetypeStore {
    config: HistoryConfig,
    archetypes: Vec<Archetype>,
    crossover_map: CombiningCrossoverMap,
    ids: IdSource,
}

impl ArchetypeStore {
    pub fn new(config: HistoryConfig) -> ArchetypeStore {
        ArchetypeStore {
            config,
            archetypes: Vec::new(),
            crossover_map: CombiningCrossoverMap::new(),
            ids: IdSource::new(),
        }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    fn ensure_slot(&mut self, population_index: usize) {
        if self.archetypes.len() <= population_index {
            self.archetypes.resize_with(population_index + 1, Archetype::new);
        }
    }

    /// Initializes a population's archetype from this run's default location:
    /// a missing file means a fresh start from the template genome's genes.
    pub fn initialize_default(&mut self, population_index: usize, template: &[NodeGene]) -> Result<(), HistoryError> {
        let path = self.config.archetype_path(population_index);
        let load = path.exists().then_some(path);
        self.initialize(population_index, load.as_deref(), template)
    }

    /// Initializes a population's archetype at run start.
    ///
    /// Without a load path (or with one that does not exist) this is a fresh
    /// start: the archetype is copied from the template genome's gene list
    /// and saved immediately. With an existing path the gene list and the
    /// companion crossover map are deserialized, the innovation counter is
    /// raised above the largest loaded innovation number. If the loaded path
    /// is not where this run saves, a copy is written out right away: that
    /// was a seed from another run, not a resume, and this run's output
    /// directory needs its own.
    pub fn initialize(
        &mut self,
        population_index: usize,
        load: Option<&Path>,
        template: &[NodeGene],
    ) -> Result<(), HistoryError> {
        self.ensure_slot(population_index);
        match load {
            Some(path) if path.exists() => {
                info!("Loading archetype {} from {}", population_index, path.display());
                let file: ArchetypeFile = serde_json::from_str(&fs::read_to_string(path)?)?;
                self.archetypes[population_index] = Archetype::from_genes(file.genes);
                if let Some(map_path) = self.config.crossover_map_path() {
                    if map_path.exists() {
                        self.crossover_map = CombiningCrossoverMap::load(&map_path)?;
                    }
                }
                // The counter must never fall behind innovation numbers
                // already embedded in the loaded genes.
                if let Some(highest) = self.archetypes[population_index].genes().iter().map(|g| g.innovation).max() {
                    self.ids.raise_innovation_floor(highest + 1);
                }
                self.restore_counters()?;
                if path != self.config.archetype_path(population_index) {
                    self.save(population_index)?;
                }
            }
            _ => {
                info!("Fresh archetype {} from template ({} genes)", population_index, template.len());
                self.archetypes[population_index] = Archetype::from_genes(template.to_vec());
                // Template genes carry innovation numbers that are now in use.
                if let Some(highest) = template.iter().map(|g| g.innovation).max() {
                    self.ids.raise_innovation_floor(highest + 1);
                }
                self.save(population_index)?;
            }
        }
        Ok(())
    }

    /// Serializes the archetype's gene list and, when combining crossover has
    /// happened, the crossover map; also checkpoints the identifier counters.
    /// A no-op when `netio` is off.
    pub fn save(&self, population_index: usize) -> Result<(), HistoryError> {
        if !self.config.netio {
            return Ok(());
        }
        fs::create_dir_all(&self.config.save_directory)?;
        let path = self.config.archetype_path(population_index);
        info!("Saving archetype {} to {}", population_index, path.display());
        let file = ArchetypeFile {
            saved_at: Utc::now(),
            genes: self.archetypes[population_index].genes().to_vec(),
        };
        fs::write(&path, serde_json::to_string_pretty(&file)?)?;
        if !self.crossover_map.is_empty() {
            if let Some(map_path) = self.config.crossover_map_path() {
                self.crossover_map.save(&map_path)?;
            }
        }
        self.checkpoint_counters()?;
        Ok(())
    }

    /// Writes the identifier high-water marks so a resumed run cannot reissue
    /// an already-used identifier.
    pub fn checkpoint_counters(&self) -> Result<(), HistoryError> {
        fs::create_dir_all(&self.config.save_directory)?;
        fs::write(self.config.counters_path(), serde_json::to_string_pretty(&self.ids)?)?;
        Ok(())
    }

    /// Raises both counters to at least their last checkpointed values, if a
    /// counters file exists. In-memory counters that are already ahead win.
    pub fn restore_counters(&mut self) -> Result<(), HistoryError> {
        let path = self.config.counters_path();
        if path.exists() {
            let saved: IdSource = serde_json::from_str(&fs::read_to_string(&path)?)?;
            self.ids.raise_innovation_floor(saved.peek_innovation());
            self.ids.raise_genotype_id_floor(saved.peek_genotype_id());
        }
        Ok(())
    }

    /// Registers a structural gene produced by a mutation operator. Idempotent
    /// per innovation number, see [`Archetype::add`].
    pub fn add(&mut self, population_index: usize, gene: NodeGene) {
        self.archetypes[population_index].add(gene);
    }

    /// Positional insertion for the crossover layer, with combine-copy
    /// splicing. Borrows the archetype, the crossover map, and the id source
    /// together so callers do not have to.
    pub fn insert_at(&mut self, population_index: usize, position: usize, gene: NodeGene, combine_copy: bool) {
        let ArchetypeStore { archetypes, crossover_map, ids, .. } = self;
        archetypes[population_index].insert_at(position, gene, combine_copy, crossover_map, ids);
    }

    /// Unconditional pruning pass for one population.
    pub fn clean(&mut self, population_index: usize, active_innovations: &HashSet<u64>) {
        let ArchetypeStore { archetypes, crossover_map, .. } = self;
        archetypes[population_index].clean(active_innovations, crossover_map);
    }

    /// Pruning on the configured generational cadence; the driver calls this
    /// every generation and the store decides whether it is time.
    pub fn maybe_clean(&mut self, population_index: usize, generation: u64, active_innovations: &HashSet<u64>) {
        if generation % self.config.clean_frequency == 0 {
            info!("Cleaning archetype {} at generation {}", population_index, generation);
            self.clean(population_index, active_innovations);
        }
    }

    pub fn archetype(&self, population_index: usize) -> &Archetype {
        &self.archetypes[population_index]
    }

    pub fn archetype_mut(&mut self, population_index: usize) -> &mut Archetype {
        &mut self.archetypes[population_index]
    }

    pub fn output_count(&self, population_index: usize) -> usize {
        self.archetypes[population_index].output_count()
    }

    pub fn ids(&self) -> &IdSource {
        &self.ids
    }

    pub fn ids_mut(&mut self) -> &mut IdSource {
        &mut self.ids
    }

    pub fn crossover_map(&self) -> &CombiningCrossoverMap {
        &self.crossover_map
    }

    pub fn crossover_map_mut(&mut self) -> &mut CombiningCrossoverMap {
        &mut self.crossover_map
    }
}
