use log::warn;

use crate::beads::Beads;
use crate::ensemble::EnsembleKind;
use crate::errors::{Result, SimError};
use crate::params::ParamSet;
use crate::readers::data_reader::DataFile;
use crate::topology::Topology;

pub struct StartVelocity {
    pub kbt: f64,
    pub seed: Option<u64>,
}

pub struct DumpArgs {
    pub file_name: String,
    pub dump_step: usize,
}

/// Parameters as given by `param` commands; unset fields fall back to
/// [`ParamSet::default`] unless the ensemble needs them.
#[derive(Debug, Clone, Default)]
pub struct ParamArgs {
    pub mass: Option<f64>,
    pub n_dim: Option<usize>,
    pub vdw_sigma: Option<f64>,
    pub vdw_epsilon: Option<f64>,
    pub rc: Option<f64>,
    pub bond_r0: Option<f64>,
    pub bond_k0: Option<f64>,
    pub angle_k0: Option<f64>,
    pub sigma: Option<f64>,
    pub gamma: Option<f64>,
    pub lambda_p: Option<f64>,
    pub p_0: Option<f64>,
    /// Thermal energy used to derive `sigma` when it is not given
    pub kbt: Option<f64>,
    /// Coefficient of every generated non-bonded pair
    pub vdw_coeff: Option<f64>,
}

impl ParamArgs {
    /// Assigns the parameter called `name`. Returns false for unknown names.
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        let slot = match name {
            "mass" => &mut self.mass,
            "vdw_sigma" => &mut self.vdw_sigma,
            "vdw_epsilon" => &mut self.vdw_epsilon,
            "rc" => &mut self.rc,
            "bond_r0" => &mut self.bond_r0,
            "bond_k0" => &mut self.bond_k0,
            "angle_k0" => &mut self.angle_k0,
            "sigma" => &mut self.sigma,
            "gamma" => &mut self.gamma,
            "lambda_p" => &mut self.lambda_p,
            "p_0" | "P_0" => &mut self.p_0,
            "kbt" => &mut self.kbt,
            "vdw_coeff" => &mut self.vdw_coeff,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Validated parameter set for `n_beads` beads. The Langevin ensembles
    /// need `gamma` and either `sigma` or `kbt`.
    pub fn to_param_set(&self, ensemble: &str, n_beads: usize) -> Result<ParamSet> {
        let defaults = ParamSet::default();
        let mass = self.mass.unwrap_or(defaults.mass);

        let (sigma, gamma) = if ensemble == "nve" {
            (
                self.sigma.unwrap_or(defaults.sigma),
                self.gamma.unwrap_or(defaults.gamma),
            )
        } else {
            let gamma = self.gamma.ok_or(SimError::MissingParameter { name: "gamma" })?;
            let sigma = match (self.sigma, self.kbt) {
                (Some(sigma), _) => sigma,
                (None, Some(kbt)) => ParamSet::thermostat_sigma(gamma, kbt, mass),
                (None, None) => return Err(SimError::MissingParameter { name: "sigma" }),
            };
            (sigma, gamma)
        };

        let params = ParamSet {
            mass,
            n_dim: self.n_dim.unwrap_or(defaults.n_dim),
            n_bead: n_beads,
            vdw_sigma: self.vdw_sigma.unwrap_or(defaults.vdw_sigma),
            vdw_epsilon: self.vdw_epsilon.unwrap_or(defaults.vdw_epsilon),
            rc: self.rc.unwrap_or(defaults.rc),
            bond_r0: self.bond_r0.unwrap_or(defaults.bond_r0),
            bond_k0: self.bond_k0.unwrap_or(defaults.bond_k0),
            angle_k0: self.angle_k0.unwrap_or(defaults.angle_k0),
            sigma,
            gamma,
            lambda_p: self.lambda_p.unwrap_or(defaults.lambda_p),
            p_0: self.p_0.unwrap_or(defaults.p_0),
        };
        params.validate()?;
        Ok(params)
    }
}

/// Everything collected from the input file, and after contextualisation the
/// state a run starts from.
pub struct SimulationContext {
    pub timestep: f64,
    pub steps: usize,
    pub seed: u64,
    pub ensemble: String,
    pub ranks: usize,
    pub thermo_step: usize,
    pub param_args: ParamArgs,
    pub data: Option<DataFile>,
    pub starting_velocity: Option<StartVelocity>,
    pub dump_args: Option<DumpArgs>,

    pub params: Option<ParamSet>,
    pub beads: Option<Beads>,
    pub topology: Option<Topology>,
    pub ensemble_kind: Option<EnsembleKind>,
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self {
            timestep: 0.01,
            steps: 100,
            seed: 0,
            ensemble: String::from("nvt"),
            ranks: 1,
            thermo_step: 100,
            param_args: ParamArgs::default(),
            data: None,
            starting_velocity: None,
            dump_args: None,
            params: None,
            beads: None,
            topology: None,
            ensemble_kind: None,
        }
    }
}

impl SimulationContext {
    /// Builds parameters, beads, topology and ensemble from the parsed input.
    pub fn build(&mut self) -> Result<()> {
        let data = self.data.take().ok_or(SimError::NoBeadsDefined)?;
        if data.n_beads == 0 {
            return Err(SimError::NoBeadsDefined);
        }

        let mut param_args = self.param_args.clone();
        if param_args.kbt.is_none() {
            param_args.kbt = self.starting_velocity.as_ref().map(|v| v.kbt);
        }
        let params = param_args.to_param_set(&self.ensemble, data.n_beads)?;

        let mut beads = Beads::new(data.positions, params.mass, data.sim_box)?;
        match (data.velocities, &self.starting_velocity) {
            (Some(velocities), start) => {
                if start.is_some() {
                    warn!("velocities read from the data file, ignoring velocity create");
                }
                beads = beads.with_velocities(velocities)?;
            }
            (None, Some(start)) => {
                beads.start_velocities(start.kbt, start.seed.unwrap_or(self.seed))?;
            }
            (None, None) => {}
        }

        let topology = Topology::with_non_bonded_pairs(
            data.n_beads,
            data.bonds,
            data.angles,
            self.param_args.vdw_coeff.unwrap_or(1.0),
        )?;

        self.ensemble_kind = Some(EnsembleKind::from_name(&self.ensemble, &params)?);
        self.params = Some(params);
        self.beads = Some(beads);
        self.topology = Some(topology);
        Ok(())
    }
}
