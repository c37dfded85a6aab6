use std::error;
use std::fmt;

use crate::hydro::error::Fault;

#[derive(Clone, Debug, PartialEq)]

/**
 * Error to represent a failed configuration, an aborted iteration, or a
 * failure to export a frame.
 */
pub enum Error {
    /// The run configuration or mesh is unusable; raised before the run
    /// starts.
    Configuration(String),

    /// A kernel detected a numerical fault. The iteration was abandoned
    /// without committing any of its buffers.
    Kernel {
        iteration: u64,
        job: &'static str,
        fault: Fault,
    },

    /// The observer could not persist a frame.
    Output(String),

    /// A step was requested after the run reached a terminal state.
    Halted,
}

impl Error {
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Error::Kernel { fault, .. } => Some(fault),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        use Error::*;

        match self {
            Configuration(what) => write!(fmt, "invalid configuration: {}", what),
            Kernel { iteration, job, fault } => write!(fmt, "[{}] {} failed: {}", iteration, job, fault),
            Output(what) => write!(fmt, "output failed: {}", what),
            Halted => write!(fmt, "the run has already stopped"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Kernel { fault, .. } => Some(fault),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Output(e.to_string())
    }
}
