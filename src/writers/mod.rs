pub mod dump_traj;
pub mod thermo;
