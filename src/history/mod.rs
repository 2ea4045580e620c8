pub mod activation_functions;
pub mod archetype;
pub mod config;
pub mod crossover_map;
pub mod error;
pub mod genes;
pub mod id_source;
pub mod store;
