//! Probabilistic cellular-automaton step engine

pub mod probability;
pub mod step;

// Re-export main types
pub use probability::ignition_probability;
pub use step::{apply_transitions, compute_tick, is_run_complete, Transition};
