//! Glace is a cell-centered Lagrangian solver for the 2D compressible Euler
//! equations on unstructured quadrilateral meshes, using the GLACE nodal
//! solver. The mesh moves with the fluid: each iteration computes the corner
//! geometry of every cell, closes the state with a gamma-law equation of
//! state, solves a 2x2 acoustic Riemann system at every node for the node
//! velocity, and advances positions, momentum and total energy from the
//! resulting corner forces.
//!
//! The scheme is expressed as a list of kernels, each tagged with a rank and
//! its declared read and write sets. Kernels of one rank run between
//! barriers and each fans out over its nodes or cells with Rayon; kernels
//! never overlap their writes within a rank. Time-evolving fields are
//! double buffered and only committed once every fallible kernel of an
//! iteration has succeeded.

pub mod config;
pub mod error;
pub mod fields;
pub mod hydro;
pub mod meshing;
pub mod num_vec;
pub mod output;
pub mod reduce;
pub mod schedule;
pub mod simulation;
pub mod solvers;

pub use config::Config;
pub use error::Error;
pub use simulation::{RunSummary, Simulation, Status, StopReason};
