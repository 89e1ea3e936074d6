use std::{
    fs::File,
    io::{self, BufWriter, Write},
};

use crate::{
    beads::Beads,
    errors::{Result, SimError},
    simulation_box::SimulationBox,
};

/// LAMMPS-style text trajectory of positions, velocities and forces.
pub struct DumpTraj {
    path: String,
    out: BufWriter<File>,
}

impl DumpTraj {
    pub fn new(path: &str) -> Result<Self> {
        let file = File::create(path).map_err(|e| SimError::DumpFileError {
            path: path.to_string(),
            source: e,
        })?;
        Ok(DumpTraj {
            path: path.to_string(),
            out: BufWriter::new(file),
        })
    }

    fn write_timestep(&mut self, step: usize) -> io::Result<()> {
        writeln!(self.out, "ITEM: TIMESTEP")?;
        writeln!(self.out, "{}", step)?;
        Ok(())
    }

    fn write_nbeads(&mut self, n_beads: usize) -> io::Result<()> {
        writeln!(self.out, "ITEM: NUMBER OF ATOMS")?;
        writeln!(self.out, "{}", n_beads)?;
        Ok(())
    }

    fn write_bounds(&mut self, sim_box: &SimulationBox) -> io::Result<()> {
        let cell_dim = sim_box.cell_dim();
        writeln!(self.out, "ITEM: BOX BOUNDS pp pp")?;
        writeln!(self.out, "{} {}", 0.0, cell_dim.x)?;
        writeln!(self.out, "{} {}", 0.0, cell_dim.y)?;
        Ok(())
    }

    fn write_beads_info(&mut self, beads: &Beads) -> io::Result<()> {
        writeln!(self.out, "ITEM: ATOMS id x y vx vy fx fy")?;
        for i in 0..beads.n_beads {
            let r = beads.positions.column(i);
            let v = beads.velocities.column(i);
            let f = beads.forces.column(i);
            writeln!(
                self.out,
                "{} {} {} {} {} {} {}",
                i + 1,
                r[0],
                r[1],
                v[0],
                v[1],
                f[0],
                f[1]
            )?;
        }
        Ok(())
    }

    pub fn write_step(&mut self, beads: &Beads, step: usize) -> Result<()> {
        self.write_frame(beads, step)
            .map_err(|e| SimError::DumpFileError {
                path: self.path.clone(),
                source: e,
            })
    }

    fn write_frame(&mut self, beads: &Beads, step: usize) -> io::Result<()> {
        self.write_timestep(step)?;
        self.write_nbeads(beads.n_beads)?;
        self.write_bounds(&beads.sim_box)?;
        self.write_beads_info(beads)?;
        self.out.flush()
    }
}
