use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where archetype state lives on disk and how often it is pruned. Pulled out
/// of the driver's run configuration; everything here is serde-friendly so the
/// driver can embed it in its own config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Directory all archetype state for this run is saved under.
    pub save_directory: PathBuf,
    /// Archetype files are named `{archetype_prefix}{population_index}.json`.
    pub archetype_prefix: String,
    /// File stem for the combining crossover map; `None` disables loading and
    /// saving the map entirely.
    pub crossover_map_name: Option<String>,
    /// Generations between archetype cleanings (see `Archetype::clean`).
    pub clean_frequency: u64,
    /// Master switch for all archetype I/O. When false, `save` is a no-op and
    /// the run keeps its state purely in memory.
    pub netio: bool,
}

impl HistoryConfig {
    pub fn new(save_directory: impl Into<PathBuf>) -> HistoryConfig {
        HistoryConfig {
            save_directory: save_directory.into(),
            archetype_prefix: "archetype".to_string(),
            crossover_map_name: Some("combiningCrossoverMapping".to_string()),
            clean_frequency: 10,
            netio: true,
        }
    }

    pub fn archetype_path(&self, population_index: usize) -> PathBuf {
        self.save_directory.join(format!("{}{}.json", self.archetype_prefix, population_index))
    }

    pub fn crossover_map_path(&self) -> Option<PathBuf> {
        self.crossover_map_name.as_ref().map(|name| self.save_directory.join(format!("{name}.json")))
    }

    pub fn counters_path(&self) -> PathBuf {
        self.save_directory.join("counters.json")
    }
}

#[cfg(test)]
mod tests {
    use super::HistoryConfig;

    #[test]
    fn paths_are_built_under_the_save_directory() {
        let config = HistoryConfig::new("/tmp/run0");
        assert_eq!("/tmp/run0/archetype2.json", config.archetype_path(2).to_str().unwrap());
        assert_eq!(
            "/tmp/run0/combiningCrossoverMapping.json",
            config.crossover_map_path().unwrap().to_str().unwrap()
        );
        let mut config = config;
        config.crossover_map_name = None;
        assert!(config.crossover_map_path().is_none());
    }
}
