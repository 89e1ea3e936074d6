//! The bead state evolved by the integrator and the geometry kernel acting on it.
pub mod distances;
pub mod new;
pub mod properties;
pub mod transformations;
pub mod velocities;

pub use new::Beads;
