use rayon::prelude::*;

use crate::config::Config;
use crate::fields::{FieldId, Fields};
use crate::hydro::eos::{GasState, IdealGas};
use crate::hydro::error::Fault;
use crate::hydro::geometry;
use crate::meshing::Mesh;
use crate::num_vec::Vector2;
use crate::reduce::{self, Min, Sum};
use crate::schedule::{Domain, Job, Rank, Schedule};
use crate::solvers::boundary::{boundary_conditions, Walls};

use Domain::*;
use FieldId::*;

/// The first rank of the per-iteration schedule. Lower ranks are run once,
/// before the first iteration.
pub const LOOP_RANK: Rank = 1;

pub type GlaceJob = Job<Context, Fields, Fault>;
pub type GlaceSchedule = Schedule<Context, Fields, Fault>;

type KernelResult = Result<(), Fault>;




/**
 * Everything a kernel may read but never writes: the mesh connectivity,
 * the run options and the objects derived from them.
 */
#[derive(Clone, Debug)]
pub struct Context {
    pub mesh: Mesh,
    pub config: Config,
    pub eos: IdealGas,
    pub walls: Walls,
}

impl Context {
    pub fn new(config: Config, mesh: Mesh) -> Self {
        Self {
            eos: IdealGas::new(config.gamma),
            walls: Walls::from_config(&config),
            mesh,
            config,
        }
    }
}




// ============================================================================
fn finite(value: f64, field: FieldId, index: usize) -> KernelResult {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Fault::NonFinite { field, index })
    }
}

fn finite_vector(value: Vector2, field: FieldId, index: usize) -> KernelResult {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Fault::NonFinite { field, index })
    }
}

fn positive_volume(cell: usize, volume: f64) -> KernelResult {
    if volume > 0.0 && volume.is_finite() {
        Ok(())
    } else {
        Err(Fault::NonPositiveVolume { cell, volume })
    }
}




// ============================================================================
fn copy_initial_position(ctx: &Context, f: &mut Fields) -> KernelResult {
    f.position
        .current_mut()
        .par_iter_mut()
        .zip(ctx.mesh.nodes().par_iter())
        .for_each(|(x, x0)| *x = *x0);
    Ok(())
}

fn initial_center(ctx: &Context, f: &mut Fields) -> KernelResult {
    let x0 = ctx.mesh.nodes();

    f.center
        .par_iter_mut()
        .enumerate()
        .for_each(|(j, c)| *c = geometry::center(&ctx.mesh.gather(j, x0)));
    Ok(())
}

fn initial_corner_vectors(ctx: &Context, f: &mut Fields) -> KernelResult {
    let x0 = ctx.mesh.nodes();

    f.initial
        .corner_vector
        .par_iter_mut()
        .enumerate()
        .for_each(|(j, c)| *c = geometry::corner_vectors(&ctx.mesh.gather(j, x0)));
    Ok(())
}

fn initial_velocity(_: &Context, f: &mut Fields) -> KernelResult {
    f.cell_velocity
        .current_mut()
        .par_iter_mut()
        .for_each(|u| *u = Vector2::zeros());
    Ok(())
}

fn initial_state(ctx: &Context, f: &mut Fields) -> KernelResult {
    let problem = ctx.config.two_state();
    let center = &f.center;

    f.initial
        .density
        .par_iter_mut()
        .zip(f.initial.pressure.par_iter_mut())
        .zip(center.par_iter())
        .for_each(|((rho, p), c)| {
            let state = problem.state_at(c.x());
            *rho = state.density;
            *p = state.pressure;
        });
    Ok(())
}

fn initial_volume(ctx: &Context, f: &mut Fields) -> KernelResult {
    let x0 = ctx.mesh.nodes();
    let c = &f.initial.corner_vector;

    f.initial
        .volume
        .par_iter_mut()
        .enumerate()
        .try_for_each(|(j, v)| {
            *v = geometry::volume(&c[j], &ctx.mesh.gather(j, x0));
            positive_volume(j, *v)
        })
}

fn initial_mass(_: &Context, f: &mut Fields) -> KernelResult {
    let rho = &f.initial.density;
    let v = &f.initial.volume;

    f.mass
        .par_iter_mut()
        .enumerate()
        .for_each(|(j, m)| *m = rho[j] * v[j]);
    Ok(())
}

fn initial_energy(ctx: &Context, f: &mut Fields) -> KernelResult {
    let rho = &f.initial.density;
    let p = &f.initial.pressure;

    f.total_energy
        .current_mut()
        .par_iter_mut()
        .enumerate()
        .try_for_each(|(j, e)| {
            *e = ctx.eos.specific_internal_energy(GasState::new(rho[j], p[j]));
            finite(*e, TotalEnergy, j)
        })
}




// ============================================================================
fn corner_vectors(ctx: &Context, f: &mut Fields) -> KernelResult {
    let x = f.position.current();

    f.corner_vector
        .par_iter_mut()
        .enumerate()
        .for_each(|(j, c)| *c = geometry::corner_vectors(&ctx.mesh.gather(j, x)));
    Ok(())
}

fn internal_energy(ctx: &Context, f: &mut Fields) -> KernelResult {
    let total = f.total_energy.current();
    let u = f.cell_velocity.current();

    f.internal_energy
        .par_iter_mut()
        .enumerate()
        .try_for_each(|(j, e)| {
            *e = ctx.eos.internal_from_total(total[j], u[j]);
            finite(*e, InternalEnergy, j)
        })
}

fn corner_lengths(_: &Context, f: &mut Fields) -> KernelResult {
    let c = &f.corner_vector;

    f.corner_length
        .par_iter_mut()
        .enumerate()
        .try_for_each(|(j, l)| {
            *l = geometry::corner_lengths(&c[j]);

            for (corner, &length) in l.iter().enumerate() {
                if !(length > 0.0 && length.is_finite()) {
                    return Err(Fault::DegenerateCorner { cell: j, corner, length });
                }
            }
            Ok(())
        })
}

fn volume(ctx: &Context, f: &mut Fields) -> KernelResult {
    let x = f.position.current();
    let c = &f.corner_vector;

    f.volume
        .par_iter_mut()
        .enumerate()
        .try_for_each(|(j, v)| {
            *v = geometry::volume(&c[j], &ctx.mesh.gather(j, x));
            positive_volume(j, *v)
        })
}

fn density(_: &Context, f: &mut Fields) -> KernelResult {
    let m = &f.mass;
    let v = &f.volume;

    f.density
        .par_iter_mut()
        .enumerate()
        .try_for_each(|(j, rho)| {
            *rho = m[j] / v[j];

            if *rho > 0.0 && rho.is_finite() {
                Ok(())
            } else {
                Err(Fault::NonPositiveDensity { cell: j, density: *rho })
            }
        })
}

fn pressure(ctx: &Context, f: &mut Fields) -> KernelResult {
    let rho = &f.density;
    let e = &f.internal_energy;

    f.pressure
        .par_iter_mut()
        .enumerate()
        .try_for_each(|(j, p)| {
            *p = ctx.eos.gas_pressure(rho[j], e[j]);
            finite(*p, Pressure, j)?;

            if *p > 0.0 {
                Ok(())
            } else {
                Err(Fault::NonPositivePressure { cell: j, pressure: *p })
            }
        })
}

fn sound_speed(ctx: &Context, f: &mut Fields) -> KernelResult {
    let rho = &f.density;
    let p = &f.pressure;

    f.sound_speed
        .par_iter_mut()
        .enumerate()
        .try_for_each(|(j, c)| {
            *c = ctx.eos.sound_speed(rho[j], p[j]);
            finite(*c, SoundSpeed, j)
        })
}

fn local_time_step(_: &Context, f: &mut Fields) -> KernelResult {
    let v = &f.volume;
    let c = &f.sound_speed;
    let l = &f.corner_length;

    f.local_time_step
        .par_iter_mut()
        .enumerate()
        .try_for_each(|(j, dt)| {
            let perimeter: f64 = reduce::fold(&Sum, l[j].iter().copied());
            *dt = 2.0 * v[j] / (c[j] * perimeter);
            finite(*dt, LocalTimeStep, j)
        })
}

fn corner_tensor(_: &Context, f: &mut Fields) -> KernelResult {
    let rho = &f.density;
    let c = &f.sound_speed;
    let l = &f.corner_length;
    let cv = &f.corner_vector;

    f.corner_tensor
        .par_iter_mut()
        .enumerate()
        .for_each(|(j, ajr)| {
            let rc = rho[j] * c[j];

            for (r, a) in ajr.iter_mut().enumerate() {
                *a = cv[j][r].outer(cv[j][r]) * (rc / l[j][r]);
            }
        });
    Ok(())
}

fn node_matrix(ctx: &Context, f: &mut Fields) -> KernelResult {
    let ajr = &f.corner_tensor;

    f.node_matrix
        .par_iter_mut()
        .enumerate()
        .for_each(|(r, ar)| {
            *ar = reduce::fold(&Sum, ctx.mesh.cells_of_node(r).iter().map(|i| ajr[i.cell][i.corner]));
        });
    Ok(())
}

fn node_rhs(ctx: &Context, f: &mut Fields) -> KernelResult {
    let p = &f.pressure;
    let cv = &f.corner_vector;
    let ajr = &f.corner_tensor;
    let u = f.cell_velocity.current();

    f.node_rhs
        .par_iter_mut()
        .enumerate()
        .for_each(|(r, b)| {
            *b = reduce::fold(&Sum, ctx.mesh.cells_of_node(r).iter().map(|i| {
                cv[i.cell][i.corner] * p[i.cell] + ajr[i.cell][i.corner] * u[i.cell]
            }));
        });
    Ok(())
}

fn time_step(ctx: &Context, f: &mut Fields) -> KernelResult {
    let dtj = &f.local_time_step;
    let dt = ctx.config.deltat_cfl * reduce::par_reduce(&Min, dtj.len(), |j| dtj[j]);

    finite(dt, NextTimeStep, 0)?;

    if dt <= 0.0 {
        return Err(Fault::NonPositiveTimeStep { time_step: dt });
    }
    *f.time_step.next_mut() = dt;
    Ok(())
}

fn commit_time_step(_: &Context, f: &mut Fields) -> KernelResult {
    f.time_step.swap();
    Ok(())
}

fn advance_time(_: &Context, f: &mut Fields) -> KernelResult {
    *f.time.next_mut() = *f.time.current() + *f.time_step.current();
    Ok(())
}

fn node_velocity(_: &Context, f: &mut Fields) -> KernelResult {
    let mt = &f.corrected_matrix;
    let bt = &f.corrected_rhs;

    f.node_velocity
        .par_iter_mut()
        .enumerate()
        .try_for_each(|(r, u)| {
            let inverse = mt[r]
                .inverse()
                .ok_or_else(|| Fault::SingularSystem { node: r, determinant: mt[r].determinant() })?;
            *u = inverse * bt[r];
            finite_vector(*u, NodeVelocity, r)
        })
}

fn commit_time(_: &Context, f: &mut Fields) -> KernelResult {
    f.time.swap();
    Ok(())
}

fn corner_force(ctx: &Context, f: &mut Fields) -> KernelResult {
    let p = &f.pressure;
    let cv = &f.corner_vector;
    let ajr = &f.corner_tensor;
    let uj = f.cell_velocity.current();
    let ur = &f.node_velocity;

    f.corner_force
        .par_iter_mut()
        .enumerate()
        .for_each(|(j, force)| {
            let ur = ctx.mesh.gather(j, ur);

            for (r, fjr) in force.iter_mut().enumerate() {
                *fjr = cv[j][r] * p[j] + ajr[j][r] * (uj[j] - ur[r]);
            }
        });
    Ok(())
}

fn position_advance(_: &Context, f: &mut Fields) -> KernelResult {
    let dt = *f.time_step.current();
    let ur = &f.node_velocity;
    let (x, x_next) = f.position.split_mut();

    x_next
        .par_iter_mut()
        .enumerate()
        .for_each(|(r, xn)| *xn = x[r] + ur[r] * dt);
    Ok(())
}

fn momentum(_: &Context, f: &mut Fields) -> KernelResult {
    let dt = *f.time_step.current();
    let m = &f.mass;
    let force = &f.corner_force;
    let (u, u_next) = f.cell_velocity.split_mut();

    u_next
        .par_iter_mut()
        .enumerate()
        .try_for_each(|(j, un)| {
            let sum: Vector2 = reduce::fold(&Sum, force[j].iter().copied());
            *un = u[j] - sum * (dt / m[j]);
            finite_vector(*un, NextCellVelocity, j)
        })
}

fn energy(ctx: &Context, f: &mut Fields) -> KernelResult {
    let dt = *f.time_step.current();
    let m = &f.mass;
    let force = &f.corner_force;
    let ur = &f.node_velocity;
    let (e, e_next) = f.total_energy.split_mut();

    e_next
        .par_iter_mut()
        .enumerate()
        .try_for_each(|(j, en)| {
            let ur = ctx.mesh.gather(j, ur);
            let work: f64 = reduce::fold(&Sum, force[j].iter().zip(&ur).map(|(fjr, ur)| fjr.dot(*ur)));
            *en = e[j] - work * (dt / m[j]);
            finite(*en, NextTotalEnergy, j)
        })
}

fn commit_position(_: &Context, f: &mut Fields) -> KernelResult {
    f.position.swap();
    Ok(())
}

fn commit_cell_velocity(_: &Context, f: &mut Fields) -> KernelResult {
    f.cell_velocity.swap();
    Ok(())
}

fn commit_total_energy(_: &Context, f: &mut Fields) -> KernelResult {
    f.total_energy.swap();
    Ok(())
}




// ============================================================================
macro_rules! job {
    ($run:ident, $rank:expr, $domain:expr, [$($r:ident),*] => [$($w:ident),*]) => {
        Job {
            name: stringify!($run),
            rank: $rank,
            domain: $domain,
            reads: &[$($r),*],
            writes: &[$($w),*],
            run: $run,
        }
    };
}

/**
 * Return the full job list of the scheme: the initialization stages at
 * negative ranks followed by the per-iteration stages.
 */
pub fn jobs() -> Vec<GlaceJob> {
    vec![
        job!(copy_initial_position,  -3, Nodes,  [InitialPosition] => [Position]),
        job!(initial_center,         -3, Cells,  [InitialPosition] => [Center]),
        job!(initial_corner_vectors, -3, Cells,  [InitialPosition] => [InitialCornerVector]),
        job!(initial_velocity,       -3, Cells,  [] => [CellVelocity]),
        job!(initial_state,          -2, Cells,  [Center] => [InitialDensity, InitialPressure]),
        job!(initial_volume,         -2, Cells,  [InitialPosition, InitialCornerVector] => [InitialVolume]),
        job!(initial_mass,           -1, Cells,  [InitialDensity, InitialVolume] => [Mass]),
        job!(initial_energy,         -1, Cells,  [InitialDensity, InitialPressure] => [TotalEnergy]),

        job!(corner_vectors,          1, Cells,  [Position] => [CornerVector]),
        job!(internal_energy,         1, Cells,  [TotalEnergy, CellVelocity] => [InternalEnergy]),
        job!(corner_lengths,          2, Cells,  [CornerVector] => [CornerLength]),
        job!(volume,                  2, Cells,  [Position, CornerVector] => [Volume]),
        job!(density,                 3, Cells,  [Mass, Volume] => [Density]),
        job!(pressure,                4, Cells,  [Density, InternalEnergy] => [Pressure]),
        job!(sound_speed,             5, Cells,  [Density, Pressure] => [SoundSpeed]),
        job!(local_time_step,         6, Cells,  [Volume, SoundSpeed, CornerLength] => [LocalTimeStep]),
        job!(corner_tensor,           6, Cells,  [Density, SoundSpeed, CornerLength, CornerVector] => [CornerTensor]),
        job!(node_matrix,             7, Nodes,  [CornerTensor] => [NodeMatrix]),
        job!(node_rhs,                7, Nodes,  [Pressure, CornerVector, CornerTensor, CellVelocity] => [NodeRhs]),
        job!(time_step,               7, Global, [LocalTimeStep] => [NextTimeStep]),
        job!(commit_time_step,        8, Global, [] => [TimeStep, NextTimeStep]),
        job!(boundary_conditions,     8, Nodes,  [Position, NodeMatrix, NodeRhs] => [CorrectedMatrix, CorrectedRhs]),
        job!(advance_time,            9, Global, [Time, TimeStep] => [NextTime]),
        job!(node_velocity,           9, Nodes,  [CorrectedMatrix, CorrectedRhs] => [NodeVelocity]),
        job!(commit_time,            10, Global, [] => [Time, NextTime]),
        job!(corner_force,           10, Cells,  [Pressure, CornerVector, CornerTensor, CellVelocity, NodeVelocity] => [CornerForce]),
        job!(position_advance,       10, Nodes,  [Position, TimeStep, NodeVelocity] => [NextPosition]),
        job!(momentum,               11, Cells,  [Mass, TimeStep, CornerForce, CellVelocity] => [NextCellVelocity]),
        job!(energy,                 11, Cells,  [Mass, TimeStep, CornerForce, NodeVelocity, TotalEnergy] => [NextTotalEnergy]),
        job!(commit_position,        12, Global, [] => [Position, NextPosition]),
        job!(commit_cell_velocity,   12, Global, [] => [CellVelocity, NextCellVelocity]),
        job!(commit_total_energy,    12, Global, [] => [TotalEnergy, NextTotalEnergy]),
    ]
}

/**
 * Build the schedule and split it into the one-off initialization part and
 * the per-iteration part.
 */
pub fn schedules() -> (GlaceSchedule, GlaceSchedule) {
    Schedule::new(jobs()).split_before(LOOP_RANK)
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;
    use crate::hydro::error::FaultClass;
    use crate::num_vec::Matrix2;
    use crate::schedule::conflicts;

    fn context(nx: usize, ny: usize) -> Context {
        let config = Config {
            x_edge_elems: nx,
            y_edge_elems: ny,
            x_interface: 0.005 * nx as f64,
            ..Config::default()
        };
        let mesh = Mesh::cartesian(nx, ny, config.x_edge_length, config.y_edge_length).unwrap();
        Context::new(config, mesh)
    }

    fn initialized(ctx: &Context) -> Fields {
        let (init, _) = schedules();
        let mut fields = Fields::new(&ctx.mesh, ctx.config.deltat_ini);
        init.execute(ctx, &mut fields).unwrap();
        fields
    }

    #[test]
    fn job_list_is_free_of_same_rank_hazards() {
        assert!(conflicts(&jobs()).is_empty());
    }

    #[test]
    fn every_loop_job_has_a_positive_rank() {
        let (init, main) = schedules();
        assert_eq!(init.len(), 8);
        assert_eq!(main.len(), 24);
        assert!(main.jobs().all(|j| j.rank >= LOOP_RANK));
        assert!(init.jobs().all(|j| j.rank < LOOP_RANK));
    }

    #[test]
    fn initialization_sets_mass_and_energy() {
        let ctx = context(4, 2);
        let fields = initialized(&ctx);
        let v = 0.01 * 0.01;

        for j in 0..ctx.mesh.num_cells() {
            let left = fields.center[j].x() < ctx.config.x_interface;
            let (rho, e) = if left { (1.0, 2.5) } else { (0.125, 2.0) };
            assert!((fields.mass[j] - rho * v).abs() < 1e-15);
            assert!((fields.total_energy.current()[j] - e).abs() < 1e-12);
            assert_eq!(fields.cell_velocity.current()[j], Vector2::zeros());
        }
    }

    #[test]
    fn first_iteration_matches_the_closed_form_step() {
        let ctx = context(4, 2);
        let (_, main) = schedules();
        let mut fields = initialized(&ctx);
        main.execute(&ctx, &mut fields).unwrap();

        let min_dtj = fields.local_time_step.iter().copied().fold(f64::INFINITY, f64::min);
        let dt = *fields.time_step.current();
        assert!((dt - 0.4 * min_dtj).abs() < 1e-18);
        assert!((*fields.time.current() - dt).abs() < 1e-18);
    }

    #[test]
    fn uniform_gas_stays_at_rest() {
        let mut ctx = context(3, 3);
        ctx.config.rho_right = ctx.config.rho_left;
        ctx.config.p_right = ctx.config.p_left;

        let (_, main) = schedules();
        let mut fields = initialized(&ctx);

        for _ in 0..3 {
            main.execute(&ctx, &mut fields).unwrap();
        }
        for u in fields.cell_velocity.current() {
            assert!(u.norm() < 1e-12);
        }
        for (x, x0) in fields.position.current().iter().zip(ctx.mesh.nodes()) {
            assert!((*x - *x0).norm() < 1e-12);
        }
    }

    #[test]
    fn inverted_cell_is_a_geometry_fault() {
        let ctx = context(2, 1);
        let (_, main) = schedules();
        let mut fields = initialized(&ctx);

        let n = ctx.mesh.nodes_of_cell(0)[2];
        fields.position.current_mut()[n] = Vector2::new(-0.02, 0.01);

        let failure = main.execute(&ctx, &mut fields).unwrap_err();
        assert_eq!(failure.job, "volume");
        assert!(matches!(failure.fault, Fault::NonPositiveVolume { cell: 0, .. }));
    }

    #[test]
    fn zero_corner_vector_is_a_degenerate_corner() {
        let ctx = context(2, 1);
        let mut fields = initialized(&ctx);
        corner_vectors(&ctx, &mut fields).unwrap();
        fields.corner_vector[1][2] = Vector2::zeros();

        let fault = corner_lengths(&ctx, &mut fields).unwrap_err();
        assert_eq!(fault, Fault::DegenerateCorner { cell: 1, corner: 2, length: 0.0 });
    }

    #[test]
    fn singular_node_system_is_reported() {
        let ctx = context(2, 2);
        let mut fields = initialized(&ctx);

        for m in &mut fields.corrected_matrix {
            *m = Matrix2::identity();
        }
        fields.corrected_matrix[4] = Matrix2::zeros();

        let fault = node_velocity(&ctx, &mut fields).unwrap_err();
        assert_eq!(fault, Fault::SingularSystem { node: 4, determinant: 0.0 });
    }

    #[test]
    fn negative_volume_gives_a_non_positive_density() {
        let ctx = context(2, 2);
        let mut fields = initialized(&ctx);

        for v in &mut fields.volume {
            *v = 1e-4;
        }
        fields.volume[1] = -1e-4;

        match density(&ctx, &mut fields).unwrap_err() {
            Fault::NonPositiveDensity { cell, density } => {
                assert_eq!(cell, 1);
                assert!(density < 0.0);
            }
            other => panic!("unexpected fault {:?}", other),
        }
    }

    #[test]
    fn negative_internal_energy_gives_a_non_positive_pressure() {
        let ctx = context(2, 2);
        let mut fields = initialized(&ctx);

        for (rho, e) in fields.density.iter_mut().zip(&mut fields.internal_energy) {
            *rho = 1.0;
            *e = 2.0;
        }
        fields.internal_energy[2] = -0.5;

        let fault = pressure(&ctx, &mut fields).unwrap_err();
        assert!(matches!(fault, Fault::NonPositivePressure { cell: 2, .. }));
        assert_eq!(fault.class(), FaultClass::NonphysicalState);
    }

    #[test]
    fn nan_total_energy_gives_a_non_finite_internal_energy() {
        let ctx = context(2, 1);
        let mut fields = initialized(&ctx);
        fields.total_energy.current_mut()[1] = f64::NAN;

        let fault = internal_energy(&ctx, &mut fields).unwrap_err();
        assert_eq!(fault, Fault::NonFinite { field: InternalEnergy, index: 1 });
    }

    #[test]
    fn non_positive_global_step_is_not_labelled_non_finite() {
        let ctx = context(2, 1);
        let mut fields = initialized(&ctx);

        for dt in &mut fields.local_time_step {
            *dt = 1e-3;
        }
        fields.local_time_step[0] = -1.0;

        let fault = time_step(&ctx, &mut fields).unwrap_err();
        assert_eq!(fault, Fault::NonPositiveTimeStep { time_step: -0.4 });

        fields.local_time_step[0] = f64::INFINITY;
        fields.local_time_step[1] = f64::INFINITY;
        let fault = time_step(&ctx, &mut fields).unwrap_err();
        assert_eq!(fault, Fault::NonFinite { field: NextTimeStep, index: 0 });
        assert_eq!(*fields.time_step.next(), ctx.config.deltat_ini);
    }

    #[test]
    fn every_fault_belongs_to_one_class() {
        let cases = [
            (Fault::NonPositiveVolume { cell: 0, volume: -1.0 }, FaultClass::Geometry),
            (Fault::DegenerateCorner { cell: 0, corner: 1, length: 0.0 }, FaultClass::Geometry),
            (Fault::SingularSystem { node: 0, determinant: 0.0 }, FaultClass::SingularSystem),
            (Fault::NonPositiveDensity { cell: 0, density: -1.0 }, FaultClass::NonphysicalState),
            (Fault::NonPositivePressure { cell: 0, pressure: -1.0 }, FaultClass::NonphysicalState),
            (Fault::NonPositiveTimeStep { time_step: 0.0 }, FaultClass::NonphysicalState),
            (Fault::NonFinite { field: Pressure, index: 0 }, FaultClass::NonphysicalState),
        ];
        for (fault, class) in cases {
            assert_eq!(fault.class(), class, "{}", fault);
        }
    }
}
