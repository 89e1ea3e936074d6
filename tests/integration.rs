use std::fs;

use approx::assert_relative_eq;
use nalgebra::{Matrix2xX, Vector2};

use colecm::{
    beads::Beads,
    ensemble::EnsembleKind,
    errors::SimError,
    integrator::Integrator,
    parallel::{run_spmd, Communicator},
    params::ParamSet,
    potentials::ForceField,
    simulation_box::SimulationBox,
    system::System,
    topology::{Angle, Bond, Topology, TopologySlice},
};

fn params() -> ParamSet {
    ParamSet {
        n_bead: 5,
        vdw_sigma: 1.0,
        vdw_epsilon: 0.5,
        rc: 3.0,
        bond_r0: 1.0,
        bond_k0: 20.0,
        angle_k0: 2.0,
        sigma: 0.2,
        gamma: 0.1,
        ..ParamSet::default()
    }
}

fn zigzag() -> (Matrix2xX<f64>, SimulationBox, Topology) {
    let positions = Matrix2xX::from_columns(&[
        Vector2::new(5.0, 5.0),
        Vector2::new(6.1, 5.3),
        Vector2::new(7.0, 4.6),
        Vector2::new(8.2, 5.0),
        Vector2::new(9.0, 5.9),
    ]);
    let sim_box = SimulationBox::new(Vector2::new(20.0, 20.0)).unwrap();
    let bonds = (0..4).map(|i| Bond { i, j: i + 1 }).collect();
    let angles = (0..3)
        .map(|i| Angle {
            i,
            j: i + 1,
            k: i + 2,
        })
        .collect();
    let topology = Topology::with_non_bonded_pairs(5, bonds, angles, 1.0).unwrap();
    (positions, sim_box, topology)
}

#[test]
fn forces_are_the_energy_gradient() {
    let (positions, sim_box, topology) = zigzag();
    let field = ForceField::from_params(&params());
    let out = field.evaluate(&positions, &sim_box, &topology).unwrap();

    let h = 1e-6;
    for bead in 0..5 {
        for axis in 0..2 {
            let mut plus = positions.clone();
            plus[(axis, bead)] += h;
            let mut minus = positions.clone();
            minus[(axis, bead)] -= h;
            let e_plus = field.evaluate(&plus, &sim_box, &topology).unwrap().potential_energy;
            let e_minus = field.evaluate(&minus, &sim_box, &topology).unwrap().potential_energy;
            let numeric = -(e_plus - e_minus) / (2.0 * h);
            assert_relative_eq!(out.forces[(axis, bead)], numeric, epsilon = 1e-5);
        }
    }
}

#[test]
fn forces_sum_to_zero() {
    let (positions, sim_box, topology) = zigzag();
    let out = ForceField::from_params(&params())
        .evaluate(&positions, &sim_box, &topology)
        .unwrap();
    let net: Vector2<f64> = out.forces.column_sum();
    assert_relative_eq!(net.norm(), 0.0, epsilon = 1e-10);
    assert_relative_eq!(out.virial[(0, 1)], out.virial[(1, 0)]);
}

#[test]
fn bending_forces_close_for_each_triplet() {
    let (positions, sim_box, mut topology) = zigzag();
    topology.bonds.clear();
    topology.pairs.clear();
    let out = ForceField::from_params(&params())
        .evaluate(&positions, &sim_box, &topology)
        .unwrap();
    assert!(out.potential_energy > 0.0);
    assert_relative_eq!(out.forces.column_sum().norm(), 0.0, epsilon = 1e-12);
}

#[test]
fn distributed_evaluation_matches_serial() {
    let (positions, sim_box, topology) = zigzag();
    let field = ForceField::from_params(&params());
    let serial = field.evaluate(&positions, &sim_box, &topology).unwrap();

    for size in [2, 3, 4] {
        let reports = run_spmd(size, |comm| {
            let mut beads = Beads::new(positions.clone(), 1.0, sim_box.clone()).unwrap();
            let slice = TopologySlice::block(&topology, size, comm.rank());
            let mut integrator = Integrator::distributed(
                comm,
                EnsembleKind::from_name("nve", &params()).unwrap(),
                field.clone(),
                &topology,
                &slice,
                0.01,
                3,
            )
            .unwrap();
            integrator.initialise(&mut beads).unwrap();
            beads
        })
        .unwrap();

        for beads in reports {
            assert_relative_eq!(beads.potential_energy, serial.potential_energy, epsilon = 1e-10);
            assert_relative_eq!(beads.forces, serial.forces, epsilon = 1e-10);
            assert_relative_eq!(beads.virial, serial.virial, epsilon = 1e-10);
        }
    }
}

fn interleaved(n: usize, size: usize, rank: usize) -> Vec<usize> {
    (0..n).filter(|id| id % size == rank).collect()
}

#[test]
fn interleaved_partition_matches_serial() {
    let (positions, sim_box, topology) = zigzag();
    let field = ForceField::from_params(&params());
    let serial = field.evaluate(&positions, &sim_box, &topology).unwrap();

    for size in [2, 3] {
        let ranks = run_spmd(size, |comm| {
            let rank = comm.rank();
            let slice = TopologySlice {
                bonds: interleaved(topology.bonds.len(), size, rank),
                angles: interleaved(topology.angles.len(), size, rank),
                pairs: interleaved(topology.pairs.len(), size, rank),
            };
            let mut beads = Beads::new(positions.clone(), 1.0, sim_box.clone()).unwrap();
            let mut integrator = Integrator::distributed(
                comm,
                EnsembleKind::from_name("nve", &params()).unwrap(),
                field.clone(),
                &topology,
                &slice,
                0.01,
                3,
            )
            .unwrap();
            integrator.initialise(&mut beads).unwrap();
            beads
        })
        .unwrap();

        for beads in ranks {
            assert_relative_eq!(beads.potential_energy, serial.potential_energy, epsilon = 1e-10);
            assert_relative_eq!(beads.forces, serial.forces, epsilon = 1e-10);
            assert_relative_eq!(beads.virial, serial.virial, epsilon = 1e-10);
        }
    }
}

#[test]
fn distributed_trajectory_matches_serial() {
    let (positions, sim_box, topology) = zigzag();
    let params = params();
    let field = ForceField::from_params(&params);
    let steps = 25;

    let mut serial_beads = Beads::new(positions.clone(), params.mass, sim_box.clone()).unwrap();
    let mut serial = Integrator::serial(
        EnsembleKind::from_name("nvt", &params).unwrap(),
        field.clone(),
        topology.clone(),
        0.005,
        17,
    )
    .unwrap();
    serial.initialise(&mut serial_beads).unwrap();
    for _ in 0..steps {
        serial.step(&mut serial_beads).unwrap();
    }

    let ranks = run_spmd(3, |comm| {
        let slice = TopologySlice::block(&topology, comm.size(), comm.rank());
        let mut beads = Beads::new(positions.clone(), params.mass, sim_box.clone()).unwrap();
        let mut integrator = Integrator::distributed(
            comm,
            EnsembleKind::from_name("nvt", &params).unwrap(),
            field.clone(),
            &topology,
            &slice,
            0.005,
            17,
        )
        .unwrap();
        integrator.initialise(&mut beads).unwrap();
        for _ in 0..steps {
            integrator.step(&mut beads).unwrap();
        }
        beads
    })
    .unwrap();

    for beads in &ranks {
        assert_relative_eq!(beads.positions, serial_beads.positions, epsilon = 1e-9);
        assert_relative_eq!(beads.velocities, serial_beads.velocities, epsilon = 1e-9);
    }
    // replicas stay bit-identical across ranks
    assert_eq!(ranks[0].positions, ranks[1].positions);
    assert_eq!(ranks[0].positions, ranks[2].positions);
}

#[test]
fn bad_partition_is_rejected_on_every_rank() {
    let (_, _, topology) = zigzag();
    let field = ForceField::from_params(&params());
    let results = run_spmd(2, |comm| {
        // both ranks claim the whole topology
        let slice = TopologySlice::full(&topology);
        Integrator::distributed(
            comm,
            EnsembleKind::from_name("nve", &params()).unwrap(),
            field.clone(),
            &topology,
            &slice,
            0.01,
            0,
        )
        .map(|_| ())
    })
    .unwrap();
    for result in results {
        assert!(matches!(result, Err(SimError::PartitionMismatch { .. })));
    }
}

fn write_inputs(dir: &std::path::Path, ensemble: &str, ranks: usize) -> String {
    let data = dir.join("chain.data");
    fs::write(
        &data,
        "5 beads
0.0 12.0 xlo xhi
0.0 12.0 ylo yhi

Beads
1 3.0 6.0
2 4.0 6.2
3 5.0 6.0
4 6.0 6.2
5 7.0 6.0

Bonds
1 1 2
2 2 3
3 3 4
4 4 5

Angles
1 1 2 3
2 2 3 4
3 3 4 5
",
    )
    .unwrap();

    let dump = dir.join("chain.dump");
    let input = dir.join("input.colecm");
    fs::write(
        &input,
        format!(
            "# chain under Langevin dynamics
read_data {}
ensemble {}
param gamma 0.05
param kbt 0.5
param lambda_p 0.001
param p_0 0.1
param bond_k0 50.0
timestep 0.002
seed 5
run 200
thermo 50
dump {} 100
ranks {}
",
            data.display(),
            ensemble,
            dump.display(),
            ranks
        ),
    )
    .unwrap();
    input.to_string_lossy().into_owned()
}

#[test]
fn npt_run_from_input_files() {
    let dir = tempfile::tempdir().unwrap();
    let infile = write_inputs(dir.path(), "npt", 2);

    let mut system = System::new(infile);
    system.read().unwrap().contextualize().unwrap().run().unwrap();

    let beads = system.context().beads.as_ref().unwrap();
    let cell = *beads.sim_box.cell_dim();
    assert!(cell.x > 0.0 && cell.y > 0.0);
    for r in beads.positions.column_iter() {
        assert!(r.x >= 0.0 && r.x < cell.x);
        assert!(r.y >= 0.0 && r.y < cell.y);
    }
    assert!(beads.potential_energy.is_finite());

    // frames at steps 0, 100 and 200
    let dump = fs::read_to_string(dir.path().join("chain.dump")).unwrap();
    assert_eq!(dump.matches("ITEM: TIMESTEP").count(), 3);
}

#[test]
fn serial_and_distributed_runs_agree() {
    let run = |ranks: usize| {
        let dir = tempfile::tempdir().unwrap();
        let infile = write_inputs(dir.path(), "nvt", ranks);
        let mut system = System::new(infile);
        system.read().unwrap().contextualize().unwrap().run().unwrap();
        system.context().beads.clone().unwrap()
    };
    let serial = run(1);
    let distributed = run(3);
    assert_relative_eq!(serial.positions, distributed.positions, epsilon = 1e-8);
}

#[test]
fn unknown_command_is_reported_with_its_line() {
    let dir = tempfile::tempdir().unwrap();
    let infile = dir.path().join("input.colecm");
    fs::write(&infile, "timestep 0.01\n\npair_style lj/cut 2.5\n").unwrap();
    let mut system = System::new(infile.to_string_lossy().into_owned());
    assert!(matches!(
        system.read(),
        Err(SimError::UnknownCommand { line: 3, .. })
    ));
}

#[test]
fn run_without_beads_fails() {
    let dir = tempfile::tempdir().unwrap();
    let infile = dir.path().join("input.colecm");
    fs::write(&infile, "ensemble nve\nrun 10\n").unwrap();
    let mut system = System::new(infile.to_string_lossy().into_owned());
    system.read().unwrap();
    assert!(matches!(
        system.contextualize(),
        Err(SimError::NoBeadsDefined)
    ));
}
