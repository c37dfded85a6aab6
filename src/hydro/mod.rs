pub mod eos;
pub mod error;
pub mod geometry;
