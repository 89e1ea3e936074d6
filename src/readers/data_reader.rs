//! Reader for the bead data file: cell, positions, optional velocities and the
//! bonded topology.
//!
//! ```text
//! 3 beads
//! 0.0 10.0 xlo xhi
//! 0.0 10.0 ylo yhi
//!
//! Beads
//! 1 4.0 5.0
//! 2 5.0 5.0
//! 3 6.0 5.0
//!
//! Bonds
//! 1 1 2
//! 2 2 3
//!
//! Angles
//! 1 1 2 3
//! ```
//!
//! Ids are one-based. Positions are shifted so that the cell starts at the origin.
use std::{
    fs::File,
    io::{BufRead, BufReader},
};

use log::{info, warn};
use na::{Matrix2xX, Vector2};

use crate::{
    errors::{Result, SimError},
    extensions::{ArgsExt, OneBasedIndex},
    readers::uncommented_tokens,
    simulation_box::SimulationBox,
    topology::{Angle, Bond},
};

/// Contents of a data file, before parameters are applied.
#[derive(Debug, Clone)]
pub struct DataFile {
    pub n_beads: usize,
    pub sim_box: SimulationBox,
    pub positions: Matrix2xX<f64>,
    pub velocities: Option<Matrix2xX<f64>>,
    pub bonds: Vec<Bond>,
    pub angles: Vec<Angle>,
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Header,
    Beads,
    Velocities,
    Bonds,
    Angles,
}

pub struct DataReader {
    infile: String,
}

impl DataReader {
    pub fn new(infile: String) -> Self {
        Self { infile }
    }

    pub fn read(&self) -> Result<DataFile> {
        let file = File::open(&self.infile).map_err(|e| SimError::InputFileError {
            path: self.infile.clone(),
            source: e,
        })?;
        let reader = BufReader::new(file);

        let mut section = Section::Header;
        let mut n_beads: usize = 0;
        let (mut xlo, mut xhi): (f64, f64) = (0.0, 1.0);
        let (mut ylo, mut yhi): (f64, f64) = (0.0, 1.0);

        let mut positions: Matrix2xX<f64> = Matrix2xX::zeros(0);
        let mut velocities: Option<Matrix2xX<f64>> = None;
        let mut n_positions = 0;
        let mut bonds = Vec::new();
        let mut angles = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line_num = line_num + 1;
            let line = line.map_err(|e| SimError::DataFileError {
                path: self.infile.clone(),
                line: line_num,
                source: e,
            })?;
            let line_split = uncommented_tokens(&line);
            if line_split.is_empty() {
                continue;
            }
            let args: &[&str] = &line_split;

            // section headers
            match args[0] {
                "Beads" => {
                    section = Section::Beads;
                    continue;
                }
                "Velocities" => {
                    section = Section::Velocities;
                    velocities = Some(Matrix2xX::zeros(n_beads));
                    continue;
                }
                "Bonds" => {
                    section = Section::Bonds;
                    continue;
                }
                "Angles" => {
                    section = Section::Angles;
                    continue;
                }
                _ => {}
            }

            if section == Section::Header {
                match (args.get(1).copied(), args.get(2).copied()) {
                    // "3 beads"
                    (Some("beads"), _) => {
                        n_beads = args.parse_count_at(0, line_num)?;
                        positions = Matrix2xX::zeros(n_beads);
                    }
                    // "0.0 10.0 xlo xhi"
                    (_, Some("xlo")) => {
                        xlo = args.parse_float_at(0, line_num)?;
                        xhi = args.parse_float_at(1, line_num)?;
                    }
                    (_, Some("ylo")) => {
                        ylo = args.parse_float_at(0, line_num)?;
                        yhi = args.parse_float_at(1, line_num)?;
                    }
                    _ => warn!("{}:{}: ignoring header line", self.infile, line_num),
                }
                continue;
            }

            let id = args.parse_count_at(0, line_num)?;
            match section {
                Section::Beads => {
                    let id = id.to_index(n_beads)?;
                    positions[(0, id)] = args.parse_float_at(1, line_num)? - xlo;
                    positions[(1, id)] = args.parse_float_at(2, line_num)? - ylo;
                    n_positions += 1;
                }
                Section::Velocities => {
                    let id = id.to_index(n_beads)?;
                    if let Some(velocities) = velocities.as_mut() {
                        velocities[(0, id)] = args.parse_float_at(1, line_num)?;
                        velocities[(1, id)] = args.parse_float_at(2, line_num)?;
                    }
                }
                Section::Bonds => {
                    let i = args.parse_count_at(1, line_num)?.to_index(n_beads)?;
                    let j = args.parse_count_at(2, line_num)?.to_index(n_beads)?;
                    bonds.push(Bond { i, j });
                }
                Section::Angles => {
                    let i = args.parse_count_at(1, line_num)?.to_index(n_beads)?;
                    let j = args.parse_count_at(2, line_num)?.to_index(n_beads)?;
                    let k = args.parse_count_at(3, line_num)?.to_index(n_beads)?;
                    angles.push(Angle { i, j, k });
                }
                Section::Header => {}
            }
        }

        if n_positions != n_beads {
            return Err(SimError::BeadCountMismatch {
                expected: n_beads,
                found: n_positions,
            });
        }
        let sim_box = SimulationBox::new(Vector2::new(xhi - xlo, yhi - ylo))?;
        info!(
            "read {} beads, {} bonds, {} angles from {}",
            n_beads,
            bonds.len(),
            angles.len(),
            self.infile
        );

        Ok(DataFile {
            n_beads,
            sim_box,
            positions,
            velocities,
            bonds,
            angles,
        })
    }
}
