use thiserror::Error;

/// Failures surfaced to the evolutionary loop driver, which decides whether
/// to abort the run or rebuild state fresh from a template genome.
///
/// Invariant violations (broken section ordering, a splice after an
/// output-typed gene, a combining mapping pointing at a gene that is not
/// there) are deliberately *not* represented here: they indicate a logic
/// defect upstream and panic with a dump of the offending state instead,
/// since continuing would silently misalign genomes in crossover.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("archetype I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("archetype serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
