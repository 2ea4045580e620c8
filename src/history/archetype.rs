use std::collections::HashSet;
use std::fmt;

use log::debug;

use super::crossover_map::CombiningCrossoverMap;
use super::genes::{NodeGene, NodeType};
use super::id_source::IdSource;

/// One population's archetype: the ordered superset of every node gene ever
/// active in that population, used to align genomes with divergent topologies
/// for crossover.
///
/// INVARIANT: scanned left to right the gene list visits its sections in the
/// order Input, Hidden, Output, each section contiguous. Every mutating
/// operation re-checks this in debug builds; a violation is a logic defect
/// upstream and panics rather than letting crossover silently misalign.
///
/// All positional reasoning stays inside this type. Callers pass innovation
/// numbers (or positions they just computed through [`Archetype::index_of_innovation`])
/// and never hold raw indices across a pruning.
#[derive(Clone, Debug, Default)]
pub struct Archetype {
    genes: Vec<NodeGene>,
    /// Number of Output-typed genes currently present. Cached so
    /// `first_output_index` is O(1); recomputed while pruning.
    output_count: usize,
}

impl Archetype {
    pub fn new() -> Archetype {
        Archetype::default()
    }

    /// Builds an archetype from an existing gene list: the template genome's
    /// nodes at a fresh start, or a deserialized list on resume. The list must
    /// already be section-ordered.
    pub fn from_genes(genes: Vec<NodeGene>) -> Archetype {
        let output_count = genes.iter().filter(|g| g.node_type == NodeType::Output).count();
        let archetype = Archetype { genes, output_count };
        assert!(
            archetype.is_ordered(),
            "gene list is not section-ordered: {archetype}"
        );
        archetype
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn genes(&self) -> &[NodeGene] {
        &self.genes
    }

    pub fn output_count(&self) -> usize {
        self.output_count
    }

    /// Position of the gene with this innovation number. Linear scan:
    /// archetype size is bounded by historical structural diversity, not
    /// population size, so O(n) is acceptable here.
    pub fn index_of_innovation(&self, innovation: u64) -> Option<usize> {
        self.genes.iter().position(|g| g.innovation == innovation)
    }

    pub fn contains(&self, innovation: u64) -> bool {
        self.index_of_innovation(innovation).is_some()
    }

    /// Appends `gene` unless a gene with its innovation number is already
    /// present. The already-present case is common, not an error: a sibling
    /// genome usually registered the same structural mutation earlier in the
    /// generation.
    pub fn add(&mut self, gene: NodeGene) {
        if self.contains(gene.innovation) {
            return;
        }
        if gene.node_type == NodeType::Output {
            self.output_count += 1;
        }
        self.genes.push(gene);
        debug_assert!(self.is_ordered(), "node order broken after add: {self}");
    }

    /// Inserts `gene` at `position`, shifting subsequent genes right. With
    /// `combine_copy` set the insertion came from combining crossover and is
    /// followed by a splice step dispatched on the type of the gene
    /// immediately preceding `position`:
    ///
    /// - Input predecessor: the gene starts a second, independently evolved
    ///   hidden chain. Its copy is spliced before the first already-combined
    ///   hidden gene, or before the output section if there is none yet, so
    ///   combined genes stay contiguous and ahead of naturally evolved ones.
    /// - Hidden predecessor: if the predecessor was itself a combine target
    ///   (it keys an entry in the crossover map), the copy goes directly after
    ///   the gene the predecessor was rewritten to, anticipating future
    ///   combining crossover. Otherwise the insertion was a plain multitask
    ///   splice and nothing more happens.
    /// - Output predecessor: contract violation; panics with a dump.
    pub fn insert_at(
        &mut self,
        position: usize,
        gene: NodeGene,
        combine_copy: bool,
        crossover_map: &mut CombiningCrossoverMap,
        ids: &mut IdSource,
    ) {
        if gene.node_type == NodeType::Output {
            self.output_count += 1;
        }
        self.genes.insert(position, gene.clone());
        if combine_copy {
            assert!(
                position > 0,
                "combine copy {gene} inserted at position 0 has no predecessor: {self}"
            );
            let previous = self.genes[position - 1].clone();
            match previous.node_type {
                NodeType::Input => {
                    let splice_position = match self.first_combined_index(NodeType::Hidden) {
                        // No combining crossover yet: land just ahead of the outputs.
                        None => self.genes.len() - self.output_count,
                        Some(first_combined) => first_combined,
                    };
                    self.splice_from_combining_crossover(&gene, splice_position, crossover_map, ids);
                }
                NodeType::Hidden => {
                    if let Some(new_previous) = crossover_map.get(previous.innovation) {
                        let index_new_previous = self.index_of_innovation(new_previous).unwrap_or_else(|| {
                            panic!(
                                "crossover map rewrites {} to {}, but {} is not in the archetype: {}",
                                previous.innovation, new_previous, new_previous, self
                            )
                        });
                        self.splice_from_combining_crossover(&gene, index_new_previous + 1, crossover_map, ids);
                    }
                    // Otherwise the gene was only spliced into a multitask
                    // network and needs no companion copy.
                }
                NodeType::Output => {
                    panic!("combine copy {gene} inserted after output gene {previous}: {self}");
                }
            }
        }
        debug_assert!(self.is_ordered(), "node order broken after insert at {position}: {self}");
    }

    /// Splices a clone of `gene` at `position`: the clone gets a rewritten
    /// innovation number from the crossover map (fresh if this gene was never
    /// spliced before) and is flagged as combined. The caller's gene is left
    /// untouched.
    fn splice_from_combining_crossover(
        &mut self,
        gene: &NodeGene,
        position: usize,
        crossover_map: &mut CombiningCrossoverMap,
        ids: &mut IdSource,
    ) {
        let mut copy = gene.clone();
        copy.innovation = crossover_map.adjusted_innovation(copy.innovation, ids);
        copy.from_combining_crossover = true;
        if copy.node_type == NodeType::Output {
            self.output_count += 1;
        }
        self.genes.insert(position, copy);
    }

    /// First position flagged `from_combining_crossover` with the given type,
    /// if combining crossover has produced one.
    pub fn first_combined_index(&self, node_type: NodeType) -> Option<usize> {
        self.genes.iter().position(|g| g.from_combining_crossover && g.node_type == node_type)
    }

    /// Position of the first Output-typed gene, derived from the cached
    /// output count.
    pub fn first_output_index(&self) -> usize {
        let result = self.genes.len() - self.output_count;
        debug_assert!(
            self.genes[result].node_type == NodeType::Output,
            "first output is not an output! pos {result} in {self}"
        );
        result
    }

    /// Prunes every gene whose innovation number is no longer in use by any
    /// live genome, with one exception: a gene that is the *target* of a
    /// combining crossover mapping stays as long as its source gene is still
    /// in the archetype, since the source still expects to align against it.
    /// Map entries are dropped together with the genes they describe, in
    /// either direction, so no mapping outlives its genes.
    pub fn clean(&mut self, active_innovations: &HashSet<u64>, crossover_map: &mut CombiningCrossoverMap) {
        debug!("Cleaning archetype of {} genes, {} active", self.genes.len(), active_innovations.len());
        self.output_count = 0;
        let mut i = 0;
        while i < self.genes.len() {
            let innovation = self.genes[i].innovation;
            if !active_innovations.contains(&innovation) {
                if crossover_map.contains_value(innovation) {
                    // contains_value just succeeded, so a key must exist.
                    let source = crossover_map.key_for_value(innovation).unwrap_or_else(|| {
                        panic!("crossover map contains value {innovation} but no key for it: {crossover_map:?}")
                    });
                    if self.index_of_innovation(source).is_none() {
                        // The other half of the merge is gone too; drop the
                        // combine target and its mapping.
                        self.genes.remove(i);
                        crossover_map.remove(source);
                        continue;
                    }
                    // Source still present: the combine target stays.
                } else if crossover_map.contains_key(innovation) {
                    crossover_map.remove(innovation);
                    self.genes.remove(i);
                    continue;
                } else {
                    self.genes.remove(i);
                    continue;
                }
            }
            if self.genes[i].node_type == NodeType::Output {
                self.output_count += 1;
            }
            i += 1;
        }
        debug_assert!(self.is_ordered(), "node order broken after clean: {self}");
    }

    /// Diagnostic scan of the section-ordering invariant: inputs, then hidden
    /// nodes, then outputs, no interleaving. Runs as a debug assertion after
    /// every mutating operation; tests call it unconditionally.
    pub fn is_ordered(&self) -> bool {
        let mut section = NodeType::Input;
        for gene in &self.genes {
            if gene.node_type < section {
                return false;
            }
            section = gene.node_type;
        }
        true
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Archetype[{} genes, {} outputs:", self.genes.len(), self.output_count)?;
        for gene in &self.genes {
            write!(f, " {gene}")?;
        }
        write!(f, "]")
    }
}
