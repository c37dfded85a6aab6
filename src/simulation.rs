use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

use log::{debug, error, info};

use crate::config::Config;
use crate::error::Error;
use crate::fields::Fields;
use crate::meshing::Mesh;
use crate::output::{Frame, Observer};
use crate::solvers::glace2d::{self, Context, GlaceSchedule};




/**
 * Which termination condition ended the run.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    StopTime,
    MaxIterations,
}

/**
 * The state of a run. `Stopped` and `Failed` are terminal.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Initializing,
    Stepping,
    Stopped(StopReason),
    Failed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::StopTime => write!(f, "stop time reached"),
            StopReason::MaxIterations => write!(f, "iteration limit reached"),
        }
    }
}




/**
 * Totals reported at the end of a run.
 */
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary {
    pub iterations: u64,
    pub final_time: f64,
    pub stop_reason: StopReason,
    pub cpu_seconds: f64,
    pub io_seconds: f64,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} after {} iterations at t = {:.6} (cpu {:.3}s, io {:.3}s)",
            self.stop_reason, self.iterations, self.final_time, self.cpu_seconds, self.io_seconds
        )
    }
}




/**
 * Drives the scheme: runs the initialization stages once, then the
 * per-iteration stages until a stop condition holds. An iteration that
 * fails commits nothing: positions, velocities, energies, time and step
 * keep their values from the previous iteration, and the run moves to
 * `Status::Failed`.
 */
pub struct Simulation {
    context: Context,
    fields: Fields,
    initialization: GlaceSchedule,
    iteration_schedule: GlaceSchedule,
    iteration: u64,
    status: Status,
    cpu_seconds: f64,
    io_seconds: f64,
}




// ============================================================================
impl Simulation {

    /**
     * Validate the configuration and build the rectilinear mesh it
     * describes.
     */
    pub fn new(config: Config) -> Result<Self, Error> {
        let mesh = Mesh::cartesian(config.x_edge_elems, config.y_edge_elems, config.x_edge_length, config.y_edge_length)?;
        Self::with_mesh(config, mesh)
    }

    /**
     * Use a caller-supplied mesh. The wall positions are still taken from
     * the configured domain extents.
     */
    pub fn with_mesh(config: Config, mesh: Mesh) -> Result<Self, Error> {
        config.validate()?;

        let fields = Fields::new(&mesh, config.deltat_ini);
        let (initialization, iteration_schedule) = glace2d::schedules();
        initialization.log_layout("init");
        iteration_schedule.log_layout("iteration");

        Ok(Self {
            context: Context::new(config, mesh),
            fields,
            initialization,
            iteration_schedule,
            iteration: 0,
            status: Status::Initializing,
            cpu_seconds: 0.0,
            io_seconds: 0.0,
        })
    }

    /**
     * Replace the per-iteration schedule with the same jobs in reversed
     * order within each rank. Results must not change.
     */
    pub fn reverse_within_ranks(mut self) -> Self {
        self.iteration_schedule = self.iteration_schedule.reversed_within_groups();
        self
    }

    pub fn config(&self) -> &Config {
        &self.context.config
    }

    pub fn mesh(&self) -> &Mesh {
        &self.context.mesh
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /**
     * Number of completed iterations.
     */
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn time(&self) -> f64 {
        *self.fields.time.current()
    }

    pub fn time_step(&self) -> f64 {
        *self.fields.time_step.current()
    }

    /**
     * Run the initialization stages if they have not run yet, then release
     * the initial-condition fields.
     */
    pub fn initialize(&mut self) -> Result<(), Error> {
        match self.status {
            Status::Initializing => {}
            Status::Failed => return Err(Error::Halted),
            _ => return Ok(()),
        }

        let start = Instant::now();
        let result = self.initialization.execute(&self.context, &mut self.fields);
        self.cpu_seconds += start.elapsed().as_secs_f64();

        if let Err(failure) = result {
            self.status = Status::Failed;
            error!("initialization failed in {}: {}", failure.job, failure.fault);
            return Err(Error::Kernel { iteration: 0, job: failure.job, fault: failure.fault });
        }
        self.fields.initial.release();
        self.status = Status::Stepping;
        Ok(())
    }

    /**
     * Return the stop condition that currently holds, if any.
     */
    pub fn stop_reason(&self) -> Option<StopReason> {
        if self.time() >= self.context.config.stop_time {
            Some(StopReason::StopTime)
        } else if self.iteration >= self.context.config.max_iterations {
            Some(StopReason::MaxIterations)
        } else {
            None
        }
    }

    /**
     * Check the stop conditions and, if none holds, execute one iteration.
     * Returns the status after the call: `Stepping` if an iteration ran,
     * `Stopped` if the run has just ended.
     */
    pub fn step(&mut self) -> Result<Status, Error> {
        self.initialize()?;

        match self.status {
            Status::Initializing | Status::Stepping => {}
            Status::Stopped(_) | Status::Failed => return Err(Error::Halted),
        }

        if let Some(reason) = self.stop_reason() {
            self.status = Status::Stopped(reason);
            return Ok(self.status);
        }

        let saved = self.fields.time_levels();
        let iteration = self.iteration + 1;

        let start = Instant::now();
        let result = self.iteration_schedule.execute(&self.context, &mut self.fields);
        self.cpu_seconds += start.elapsed().as_secs_f64();

        if let Err(failure) = result {
            self.fields.restore_time_levels(saved);
            self.status = Status::Failed;
            error!("[{}] {} failed: {}", iteration, failure.job, failure.fault);
            return Err(Error::Kernel { iteration, job: failure.job, fault: failure.fault });
        }
        self.iteration = iteration;
        Ok(self.status)
    }

    /**
     * Borrow the current state as an export frame.
     */
    pub fn frame(&self) -> Frame<'_> {
        let f = &self.fields;

        let mut cell_fields: BTreeMap<&str, Cow<[f64]>> = BTreeMap::new();
        cell_fields.insert("Density", Cow::Borrowed(&f.density[..]));
        cell_fields.insert("Pressure", Cow::Borrowed(&f.pressure[..]));
        cell_fields.insert("InternalEnergy", Cow::Borrowed(&f.internal_energy[..]));

        let mut node_fields: BTreeMap<&str, Cow<[f64]>> = BTreeMap::new();
        node_fields.insert("VelocityX", Cow::Owned(f.node_velocity.iter().map(|u| u.x()).collect()));
        node_fields.insert("VelocityY", Cow::Owned(f.node_velocity.iter().map(|u| u.y()).collect()));

        Frame {
            iteration: self.iteration,
            time: self.time(),
            positions: f.position.current(),
            cells: self.context.mesh.cells(),
            cell_fields,
            node_fields,
        }
    }

    /**
     * Step until a stop condition holds, handing a frame to the observer
     * after every `output_period`-th iteration.
     */
    pub fn run<O: Observer + ?Sized>(&mut self, observer: &mut O) -> Result<RunSummary, Error> {
        let config = self.context.config.clone();
        let wall = Instant::now();

        self.initialize()?;
        info!(
            "start: {} nodes, {} cells, stop at t = {} or {} iterations",
            self.context.mesh.num_nodes(),
            self.context.mesh.num_cells(),
            config.stop_time,
            config.max_iterations
        );

        loop {
            let cpu = self.cpu_seconds;

            if let Status::Stopped(stop_reason) = self.step()? {
                let summary = RunSummary {
                    iterations: self.iteration,
                    final_time: self.time(),
                    stop_reason,
                    cpu_seconds: self.cpu_seconds,
                    io_seconds: self.io_seconds,
                };
                info!("{} ({:.3}s wall)", summary, wall.elapsed().as_secs_f64());
                return Ok(summary);
            }
            info!("[{}] t={:.6} dt={:.3e}", self.iteration, self.time(), self.time_step());

            let mut io = 0.0;

            if config.output_period > 0 && self.iteration % config.output_period == 0 {
                let start = Instant::now();
                observer.observe(&self.frame())?;
                io = start.elapsed().as_secs_f64();
                self.io_seconds += io;
            }

            let progress = f64::max(
                self.iteration as f64 / config.max_iterations as f64,
                self.time() / config.stop_time,
            );
            let elapsed = wall.elapsed().as_secs_f64();
            let remaining = if progress > 0.0 { elapsed * (1.0 - progress).max(0.0) / progress } else { 0.0 };

            debug!("cpu {:.3e}s io {:.3e}s, about {:.1}s remaining", self.cpu_seconds - cpu, io, remaining);
        }
    }
}
