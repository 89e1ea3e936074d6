//! Structs to read individual commands in the input file can be found here
use log::warn;

use crate::{
    errors::{Result, SimError},
    extensions::ArgsExt,
    readers::{
        data_reader::DataReader,
        simulation_context::{DumpArgs, SimulationContext, StartVelocity},
    },
};

/// Implemented by the parser of each command's arguments.
pub trait ParseCommand {
    /// `args` excludes the command name, `line` is used in error reports
    fn run(&self, args: &[&str], line: usize, ctx: &mut SimulationContext) -> Result<()>;
}

/// Every command understood in the input file
pub enum Command {
    TimeStep(TimeStep),
    RunSteps(RunSteps),
    Seed(Seed),
    Ensemble(EnsembleStyle),
    Param(Param),
    ReadData(ReadData),
    Dump(Dump),
    Thermo(Thermo),
    Ranks(Ranks),
    Velocity(Velocity),
}

impl Command {
    pub fn from_str(name: &str) -> Option<Self> {
        let command = match name {
            "timestep" => Self::TimeStep(TimeStep),
            "run" => Self::RunSteps(RunSteps),
            "seed" => Self::Seed(Seed),
            "ensemble" => Self::Ensemble(EnsembleStyle),
            "param" => Self::Param(Param),
            "read_data" => Self::ReadData(ReadData),
            "dump" => Self::Dump(Dump),
            "thermo" => Self::Thermo(Thermo),
            "ranks" => Self::Ranks(Ranks),
            "velocity" => Self::Velocity(Velocity),
            _ => return None,
        };
        Some(command)
    }

    pub fn run(&self, args: &[&str], line: usize, ctx: &mut SimulationContext) -> Result<()> {
        match self {
            Self::TimeStep(cmd) => cmd.run(args, line, ctx),
            Self::RunSteps(cmd) => cmd.run(args, line, ctx),
            Self::Seed(cmd) => cmd.run(args, line, ctx),
            Self::Ensemble(cmd) => cmd.run(args, line, ctx),
            Self::Param(cmd) => cmd.run(args, line, ctx),
            Self::ReadData(cmd) => cmd.run(args, line, ctx),
            Self::Dump(cmd) => cmd.run(args, line, ctx),
            Self::Thermo(cmd) => cmd.run(args, line, ctx),
            Self::Ranks(cmd) => cmd.run(args, line, ctx),
            Self::Velocity(cmd) => cmd.run(args, line, ctx),
        }
    }
}

/// argument parser for the "timestep" command
pub struct TimeStep;

impl ParseCommand for TimeStep {
    fn run(&self, args: &[&str], line: usize, ctx: &mut SimulationContext) -> Result<()> {
        ctx.timestep = args.parse_float_at(0, line)?;
        Ok(())
    }
}

/// Argument parser for the "run" command
pub struct RunSteps;

impl ParseCommand for RunSteps {
    fn run(&self, args: &[&str], line: usize, ctx: &mut SimulationContext) -> Result<()> {
        ctx.steps = args.parse_count_at(0, line)?;
        Ok(())
    }
}

/// Argument parser for the "seed" command, the seed of the thermostat noise
pub struct Seed;

impl ParseCommand for Seed {
    fn run(&self, args: &[&str], line: usize, ctx: &mut SimulationContext) -> Result<()> {
        ctx.seed = args.parse_count_at(0, line)? as u64;
        Ok(())
    }
}

/// Argument parser for the "ensemble" command: nve, nvt or npt
pub struct EnsembleStyle;

impl ParseCommand for EnsembleStyle {
    fn run(&self, args: &[&str], line: usize, ctx: &mut SimulationContext) -> Result<()> {
        let style = args.get_required(0, line)?;
        match style {
            "nve" | "nvt" | "npt" => ctx.ensemble = style.to_string(),
            _ => {
                return Err(SimError::UnknownEnsemble {
                    name: style.to_string(),
                })
            }
        }
        Ok(())
    }
}

/// Argument parser for the "param" command: `param <name> <value>`
pub struct Param;

impl ParseCommand for Param {
    fn run(&self, args: &[&str], line: usize, ctx: &mut SimulationContext) -> Result<()> {
        let name = args.get_required(0, line)?;
        if name == "n_dim" {
            ctx.param_args.n_dim = Some(args.parse_count_at(1, line)?);
            return Ok(());
        }
        let value = args.parse_float_at(1, line)?;
        if !ctx.param_args.set(name, value) {
            return Err(SimError::InvalidArgument {
                string: name.to_string(),
                line,
            });
        }
        Ok(())
    }
}

/// Argument parser for the "read_data" command
pub struct ReadData;

impl ParseCommand for ReadData {
    fn run(&self, args: &[&str], line: usize, ctx: &mut SimulationContext) -> Result<()> {
        // the first argument is the path to the data file
        let path = args.get_required(0, line)?;
        ctx.data = Some(DataReader::new(path.to_string()).read()?);
        Ok(())
    }
}

/// Argument parser for the "dump" command: `dump <path> <every>`
pub struct Dump;

impl ParseCommand for Dump {
    fn run(&self, args: &[&str], line: usize, ctx: &mut SimulationContext) -> Result<()> {
        let file_name = args.get_required(0, line)?.to_string();
        let dump_step = args.parse_count_at(1, line)?;
        if dump_step == 0 {
            return Err(SimError::InvalidArgument {
                string: args[1].to_string(),
                line,
            });
        }
        ctx.dump_args = Some(DumpArgs {
            file_name,
            dump_step,
        });
        Ok(())
    }
}

/// Argument parser for the "thermo" command, zero disables the thermo output
pub struct Thermo;

impl ParseCommand for Thermo {
    fn run(&self, args: &[&str], line: usize, ctx: &mut SimulationContext) -> Result<()> {
        ctx.thermo_step = args.parse_count_at(0, line)?;
        Ok(())
    }
}

/// Argument parser for the "ranks" command
pub struct Ranks;

impl ParseCommand for Ranks {
    fn run(&self, args: &[&str], line: usize, ctx: &mut SimulationContext) -> Result<()> {
        let ranks = args.parse_count_at(0, line)?;
        if ranks == 0 {
            return Err(SimError::InvalidArgument {
                string: args[0].to_string(),
                line,
            });
        }
        ctx.ranks = ranks;
        Ok(())
    }
}

/// Argument parser for the "velocity" command: `velocity create <kbt> [seed]`
pub struct Velocity;

impl ParseCommand for Velocity {
    fn run(&self, args: &[&str], line: usize, ctx: &mut SimulationContext) -> Result<()> {
        let style = args.get_required(0, line)?;
        // Of all the style options in the velocity command only create is available right now
        if style != "create" {
            return Err(SimError::InvalidArgument {
                string: style.to_string(),
                line,
            });
        }
        let kbt = args.parse_float_at(1, line)?;
        let seed = match args.get(2) {
            Some(_) => Some(args.parse_count_at(2, line)? as u64),
            None => None,
        };
        if args.len() > 3 {
            warn!("line {}: ignoring extra velocity arguments {:?}", line, &args[3..]);
        }
        ctx.starting_velocity = Some(StartVelocity { kbt, seed });
        Ok(())
    }
}
