//! The pivotal struct to initialize and run the system can be found here
use std::{
    fs::File,
    io::{BufRead, BufReader},
};

use log::{debug, info};

use crate::{
    beads::Beads,
    ensemble::Ensemble,
    errors::{Result, SimError},
    integrator::Integrator,
    parallel::{run_spmd, Communicator},
    potentials::ForceField,
    readers::{
        input_file::commands::Command, simulation_context::SimulationContext, uncommented_tokens,
    },
    topology::TopologySlice,
    writers::{dump_traj::DumpTraj, thermo::Thermo},
};

/// [`System`] is the basic API for running a simulation.
///
/// [`System::new`] takes the path to the input file. [`System::read`] collects
/// the commands, [`System::contextualize`] builds beads, topology and ensemble
/// from them and [`System::run`] integrates, on one rank or on several.
///
/// ```no_run
/// use colecm::system::System;
///
/// let mut system = System::new(String::from("input.colecm"));
/// system.read()?.contextualize()?.run()?;
/// # Ok::<(), colecm::errors::SimError>(())
/// ```
pub struct System {
    /// the path to the input file which contains the arguments to initialize and run the system
    infile: String,
    ctx: SimulationContext,
}

/// Output settings shared by every rank, only the root acts on them.
struct Output<'a> {
    steps: usize,
    thermo_step: usize,
    dump: Option<(&'a str, usize)>,
}

impl System {
    pub fn new(infile: String) -> Self {
        let ctx = SimulationContext::default();
        Self { infile, ctx }
    }

    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    pub fn set_ranks(&mut self, ranks: usize) {
        self.ctx.ranks = ranks.max(1);
    }

    /// Reads the input file and collects all the arguments provided by the input file.
    pub fn read(&mut self) -> Result<&mut Self> {
        let file = File::open(&self.infile).map_err(|e| SimError::InputFileError {
            path: self.infile.clone(),
            source: e,
        })?;
        let reader = BufReader::new(file);

        for (line_num, line) in reader.lines().enumerate() {
            let line_num = line_num + 1;
            let line = line.map_err(|e| SimError::DataFileError {
                path: self.infile.clone(),
                line: line_num,
                source: e,
            })?;

            let line_split = uncommented_tokens(&line);
            let Some((&command, args)) = line_split.split_first() else {
                continue;
            };
            if args.is_empty() {
                return Err(SimError::MissingArgument { line: line_num });
            }

            match Command::from_str(command) {
                Some(cmd) => cmd.run(args, line_num, &mut self.ctx)?,
                None => {
                    return Err(SimError::UnknownCommand {
                        command: command.to_string(),
                        line: line_num,
                    })
                }
            }
        }
        Ok(self)
    }

    /// Creates the beads, topology, parameters and ensemble the run starts from.
    pub fn contextualize(&mut self) -> Result<&mut Self> {
        self.ctx.build()?;
        if let (Some(beads), Some(topology)) = (&self.ctx.beads, &self.ctx.topology) {
            info!(
                "{} beads, {} bonds, {} angles, {} non-bonded pairs, ensemble {}",
                beads.n_beads,
                topology.bonds.len(),
                topology.angles.len(),
                topology.pairs.len(),
                self.ctx.ensemble
            );
        }
        Ok(self)
    }

    /// Integrates `steps` timesteps. The final state replaces the context's beads.
    pub fn run(&mut self) -> Result<&mut Self> {
        let ctx = &self.ctx;
        let (Some(beads), Some(topology), Some(params), Some(ensemble)) = (
            ctx.beads.as_ref(),
            ctx.topology.as_ref(),
            ctx.params.as_ref(),
            ctx.ensemble_kind.as_ref(),
        ) else {
            return Err(SimError::NoBeadsDefined);
        };
        let output = Output {
            steps: ctx.steps,
            thermo_step: ctx.thermo_step,
            dump: ctx
                .dump_args
                .as_ref()
                .map(|d| (d.file_name.as_str(), d.dump_step)),
        };
        let force_field = ForceField::from_params(params);

        let final_beads = if ctx.ranks <= 1 {
            info!("running {} steps on a single rank", ctx.steps);
            let integrator = Integrator::serial(
                ensemble.clone(),
                force_field,
                topology.clone(),
                ctx.timestep,
                ctx.seed,
            )?;
            drive(integrator, beads.clone(), &output)?
        } else {
            info!("running {} steps on {} ranks", ctx.steps, ctx.ranks);
            let results = run_spmd(ctx.ranks, |comm| {
                let slice = TopologySlice::block(topology, comm.size(), comm.rank());
                let integrator = Integrator::distributed(
                    comm,
                    ensemble.clone(),
                    force_field.clone(),
                    topology,
                    &slice,
                    ctx.timestep,
                    ctx.seed,
                )?;
                drive(integrator, beads.clone(), &output)
            })?;
            first_cause(results)?
        };

        self.ctx.beads = Some(final_beads);
        Ok(self)
    }
}

/// The rank-0 result, or the error of the rank where a failure originated.
fn first_cause(results: Vec<Result<Beads>>) -> Result<Beads> {
    let mut peer_failure = None;
    let mut root = None;
    for result in results {
        match result {
            Ok(beads) => {
                root.get_or_insert(beads);
            }
            Err(SimError::PeerFailure { failed }) => {
                peer_failure.get_or_insert(SimError::PeerFailure { failed });
            }
            Err(e) => return Err(e),
        }
    }
    match (peer_failure, root) {
        (Some(e), _) => Err(e),
        (None, Some(beads)) => Ok(beads),
        (None, None) => Err(SimError::NoBeadsDefined),
    }
}

/// The simulation loop run identically by every rank.
fn drive<C: Communicator, E: Ensemble>(
    mut integrator: Integrator<C, E>,
    mut beads: Beads,
    output: &Output,
) -> Result<Beads> {
    let is_root = integrator.comm().is_root();
    integrator.initialise(&mut beads)?;

    let mut dump = match output.dump {
        Some((path, every)) if is_root => Some((DumpTraj::new(path)?, every)),
        _ => None,
    };

    for step in 0..=output.steps {
        if step > 0 {
            integrator.step(&mut beads)?;
        }
        if !is_root {
            continue;
        }
        if output.thermo_step > 0 && step % output.thermo_step == 0 {
            info!("{}", Thermo::from_beads(step, &beads));
        }
        if let Some((dump, every)) = dump.as_mut() {
            if step % *every == 0 {
                dump.write_step(&beads, step)?;
            }
        }
    }
    debug!("rank {} finished", integrator.comm().rank());
    Ok(beads)
}
