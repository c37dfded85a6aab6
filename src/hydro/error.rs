use std::error;
use std::fmt;

use crate::fields::FieldId;




/**
 * The class a fault belongs to, used by callers that only care which kind
 * of numerical breakdown occurred.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultClass {
    Geometry,
    SingularSystem,
    NonphysicalState,
}

#[derive(Clone, Debug, PartialEq)]

/**
 * Error to represent a numerical failure detected by a kernel at a single
 * mesh entity.
 */
pub enum Fault {
    NonPositiveVolume { cell: usize, volume: f64 },
    DegenerateCorner { cell: usize, corner: usize, length: f64 },
    SingularSystem { node: usize, determinant: f64 },
    NonPositiveDensity { cell: usize, density: f64 },
    NonPositivePressure { cell: usize, pressure: f64 },
    NonPositiveTimeStep { time_step: f64 },
    NonFinite { field: FieldId, index: usize },
}

impl Fault {
    pub fn class(&self) -> FaultClass {
        use Fault::*;

        match self {
            NonPositiveVolume { .. } | DegenerateCorner { .. } => FaultClass::Geometry,
            SingularSystem { .. } => FaultClass::SingularSystem,
            NonPositiveDensity { .. }
            | NonPositivePressure { .. }
            | NonPositiveTimeStep { .. }
            | NonFinite { .. } => FaultClass::NonphysicalState,
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        use Fault::*;

        match self {
            NonPositiveVolume { cell, volume } => write!(fmt, "non-positive volume {} in cell {}", volume, cell),
            DegenerateCorner { cell, corner, length } => write!(fmt, "degenerate corner {} of cell {} (length {})", corner, cell, length),
            SingularSystem { node, determinant } => write!(fmt, "singular nodal system at node {} (determinant {})", node, determinant),
            NonPositiveDensity { cell, density } => write!(fmt, "non-positive mass density {} in cell {}", density, cell),
            NonPositivePressure { cell, pressure } => write!(fmt, "non-positive gas pressure {} in cell {}", pressure, cell),
            NonPositiveTimeStep { time_step } => write!(fmt, "non-positive time step {}", time_step),
            NonFinite { field, index } => write!(fmt, "non-finite value of {} at index {}", field, index),
        }
    }
}

impl error::Error for Fault {}
