/// Number of spatial dimensions the force field and integrator operate in.
pub const N_DIM: usize = 2;

/// Distances below this are treated as coincident beads.
pub const MIN_DISTANCE: f64 = 1e-10;

/// Rank that draws the thermostat noise and sums the reductions.
pub const ROOT_RANK: usize = 0;
