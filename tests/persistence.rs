use std::collections::HashSet;

use neat_history::{ActivationFunction, ArchetypeStore, HistoryConfig, NodeGene, NodeType};

fn gene(innovation: u64, node_type: NodeType) -> NodeGene {
    NodeGene::new(innovation, node_type, ActivationFunction::Tanh, 0.25)
}

/// 2 inputs, 1 hidden, 2 outputs; innovations 0..=4.
fn template() -> Vec<NodeGene> {
    vec![
        gene(0, NodeType::Input),
        gene(1, NodeType::Input),
        gene(2, NodeType::Hidden),
        gene(3, NodeType::Output),
        gene(4, NodeType::Output),
    ]
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn fresh_start_copies_template_and_saves() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let config = HistoryConfig::new(dir.path());
    let mut store = ArchetypeStore::new(config.clone());

    store.initialize(0, None, &template()).unwrap();
    assert_eq!(5, store.archetype(0).len());
    assert_eq!(2, store.output_count(0));
    assert!(config.archetype_path(0).exists());
    // No combining crossover yet, so no map file.
    assert!(!config.crossover_map_path().unwrap().exists());
}

#[test]
fn round_trip_restores_genes_map_and_counters() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let config = HistoryConfig::new(dir.path());

    let mut store = ArchetypeStore::new(config.clone());
    store.initialize(0, None, &template()).unwrap();
    // Issue an identifier for a new output module, grow the archetype, and
    // force a combine splice so the crossover map has entries to persist.
    let innovation = store.ids_mut().next_innovation();
    assert_eq!(5, innovation, "template innovations 0..=4 are already in use");
    store.add(0, gene(innovation, NodeType::Output));
    store.insert_at(0, 2, gene(40, NodeType::Hidden), true);
    assert_eq!(1, store.crossover_map().len());
    store.save(0).unwrap();

    let mut resumed = ArchetypeStore::new(config.clone());
    resumed.initialize(0, Some(&config.archetype_path(0)), &[]).unwrap();
    assert_eq!(store.archetype(0).genes(), resumed.archetype(0).genes());
    assert_eq!(store.crossover_map().pairs(), resumed.crossover_map().pairs());
    assert_eq!(store.output_count(0), resumed.output_count(0));

    // The resumed run must not reissue anything already on disk.
    let highest = store.archetype(0).genes().iter().map(|g| g.innovation).max().unwrap();
    assert!(resumed.ids().peek_innovation() > highest);
    let next = resumed.ids_mut().next_innovation();
    assert!(store.archetype(0).genes().iter().all(|g| g.innovation != next));
}

#[test]
fn loading_raises_innovation_floor_above_embedded_maximum() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let config = HistoryConfig::new(dir.path());

    let mut store = ArchetypeStore::new(config.clone());
    let mut seed = template();
    seed.push(gene(41, NodeType::Output));
    store.initialize(0, None, &seed).unwrap();

    let mut resumed = ArchetypeStore::new(config.clone());
    assert_eq!(0, resumed.ids().peek_innovation());
    resumed.initialize(0, Some(&config.archetype_path(0)), &[]).unwrap();
    assert!(resumed.ids().peek_innovation() >= 42);
}

#[test]
fn seed_from_another_run_is_copied_into_this_runs_directory() {
    init_logging();
    let seed_dir = tempfile::tempdir().unwrap();
    let run_dir = tempfile::tempdir().unwrap();

    let mut seed_store = ArchetypeStore::new(HistoryConfig::new(seed_dir.path()));
    seed_store.initialize(0, None, &template()).unwrap();
    let seed_path = seed_store.config().archetype_path(0);

    // Loading someone else's archetype is not a resume: this run saves its
    // own copy immediately.
    let config = HistoryConfig::new(run_dir.path());
    let mut store = ArchetypeStore::new(config.clone());
    store.initialize(0, Some(&seed_path), &[]).unwrap();
    assert!(config.archetype_path(0).exists());
    assert_eq!(5, store.archetype(0).len());
}

#[test]
fn missing_explicit_path_falls_back_to_template() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let config = HistoryConfig::new(dir.path());
    let mut store = ArchetypeStore::new(config.clone());

    let missing = dir.path().join("not-there.json");
    store.initialize(0, Some(&missing), &template()).unwrap();
    assert_eq!(5, store.archetype(0).len());
    assert!(config.archetype_path(0).exists());
}

#[test]
fn netio_off_disables_all_saving() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let mut config = HistoryConfig::new(dir.path());
    config.netio = false;
    let mut store = ArchetypeStore::new(config.clone());

    store.initialize(0, None, &template()).unwrap();
    store.save(0).unwrap();
    assert!(!config.archetype_path(0).exists());
    assert!(!config.counters_path().exists());
}

#[test]
fn cleaning_runs_only_on_the_configured_cadence() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let mut config = HistoryConfig::new(dir.path());
    config.clean_frequency = 3;
    config.netio = false;
    let mut store = ArchetypeStore::new(config);
    store.initialize(0, None, &template()).unwrap();

    // Hidden gene 2 is no longer active anywhere.
    let active: HashSet<u64> = [0, 1, 3, 4].into_iter().collect();
    store.maybe_clean(0, 1, &active);
    assert!(store.archetype(0).contains(2), "cleaned off-cadence");
    store.maybe_clean(0, 3, &active);
    assert!(!store.archetype(0).contains(2));
    assert_eq!(4, store.archetype(0).len());
}

#[test]
fn two_populations_keep_independent_archetypes() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let mut config = HistoryConfig::new(dir.path());
    config.netio = false;
    let mut store = ArchetypeStore::new(config);

    store.initialize(0, None, &template()).unwrap();
    store.initialize(1, None, &template()[..3].to_vec()).unwrap();
    store.add(0, gene(50, NodeType::Output));
    assert_eq!(6, store.archetype(0).len());
    assert_eq!(3, store.archetype(1).len());
    assert!(!store.archetype(1).contains(50));
}
