//! Interaction potentials and the force-field evaluator built from them.
pub mod angular;
pub mod force_field;
pub mod harmonic;
pub mod lennard_jones;
pub mod potential;

pub use force_field::{ForceField, ForceOutput};
