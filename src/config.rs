use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::hydro::eos::{GasState, TwoStateProblem};

/**
 * Immutable run options: mesh sizing, stopping criteria, equation of state,
 * the two-state (shock tube) initial condition and the time-step controls.
 * Missing keys in a YAML document take their default value, which
 * reproduces the Sod problem on a 100x10 mesh.
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub x_edge_length: f64,
    pub y_edge_length: f64,
    pub x_edge_elems: usize,
    pub y_edge_elems: usize,
    pub stop_time: f64,
    pub max_iterations: u64,
    pub gamma: f64,
    pub x_interface: f64,
    pub rho_left: f64,
    pub p_left: f64,
    pub rho_right: f64,
    pub p_right: f64,
    pub deltat_ini: f64,
    pub deltat_cfl: f64,

    /// Export a frame every this many iterations; 0 disables output.
    pub output_period: u64,

    /// Absolute tolerance for deciding that a node lies on a wall.
    pub boundary_epsilon: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            x_edge_length: 0.01,
            y_edge_length: 0.01,
            x_edge_elems: 100,
            y_edge_elems: 10,
            stop_time: 0.2,
            max_iterations: 20000,
            gamma: 1.4,
            x_interface: 0.5,
            rho_left: 1.0,
            p_left: 1.0,
            rho_right: 0.125,
            p_right: 0.1,
            deltat_ini: 1.0e-5,
            deltat_cfl: 0.4,
            output_period: 1,
            boundary_epsilon: 1.0e-10,
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, Error> {
        serde_yaml::from_str(yaml).map_err(|e| Error::Configuration(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Configuration(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&contents)
    }

    pub fn x_max(&self) -> f64 {
        self.x_edge_elems as f64 * self.x_edge_length
    }

    pub fn y_max(&self) -> f64 {
        self.y_edge_elems as f64 * self.y_edge_length
    }

    pub fn two_state(&self) -> TwoStateProblem {
        TwoStateProblem {
            x_interface: self.x_interface,
            left: GasState::new(self.rho_left, self.p_left),
            right: GasState::new(self.rho_right, self.p_right),
        }
    }

    /**
     * Check the options for consistency. Called before any mesh or field is
     * built.
     */
    pub fn validate(&self) -> Result<(), Error> {
        let positive = [
            ("x_edge_length", self.x_edge_length),
            ("y_edge_length", self.y_edge_length),
            ("stop_time", self.stop_time),
            ("rho_left", self.rho_left),
            ("p_left", self.p_left),
            ("rho_right", self.rho_right),
            ("p_right", self.p_right),
            ("deltat_ini", self.deltat_ini),
            ("deltat_cfl", self.deltat_cfl),
            ("boundary_epsilon", self.boundary_epsilon),
        ];

        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(Error::Configuration(format!("{} must be positive and finite, got {}", name, value)));
            }
        }
        if self.x_edge_elems == 0 || self.y_edge_elems == 0 {
            return Err(Error::Configuration(format!(
                "element counts must be non-zero, got {}x{}", self.x_edge_elems, self.y_edge_elems)));
        }
        if self.max_iterations == 0 {
            return Err(Error::Configuration("max_iterations must be non-zero".into()));
        }
        if self.deltat_cfl > 1.0 {
            return Err(Error::Configuration(format!("deltat_cfl must not exceed 1, got {}", self.deltat_cfl)));
        }
        if !(self.gamma > 1.0 && self.gamma.is_finite()) {
            return Err(Error::Configuration(format!("gamma must be greater than 1, got {}", self.gamma)));
        }
        if self.boundary_epsilon >= 0.5 * self.x_edge_length.min(self.y_edge_length) {
            return Err(Error::Configuration(format!(
                "boundary_epsilon {} is not small compared to the cell size", self.boundary_epsilon)));
        }
        if !(self.x_interface > 0.0 && self.x_interface < self.x_max()) {
            warn!("interface x = {} lies outside the domain (0, {}): the initial state is uniform", self.x_interface, self.x_max());
        }
        Ok(())
    }
}
