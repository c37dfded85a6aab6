use crate::num_vec::Vector2;




// ============================================================================
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GasState {
    pub density: f64,
    pub pressure: f64,
}

/**
 * Piecewise-constant initial data split by the vertical line
 * `x = x_interface`: cells whose centre lies strictly left of it take the
 * left state, all others the right state.
 */
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TwoStateProblem {
    pub x_interface: f64,
    pub left: GasState,
    pub right: GasState,
}

/**
 * Gamma-law equation of state.
 */
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IdealGas {
    gamma_law_index: f64,
}




// ============================================================================
impl GasState {
    pub fn new(density: f64, pressure: f64) -> Self {
        Self { density, pressure }
    }
}

impl TwoStateProblem {
    pub fn state_at(&self, center: f64) -> GasState {
        if center < self.x_interface {
            self.left
        } else {
            self.right
        }
    }
}




// ============================================================================
impl IdealGas {

    pub fn new(gamma_law_index: f64) -> Self {
        Self { gamma_law_index }
    }

    pub fn gamma_law_index(&self) -> f64 {
        self.gamma_law_index
    }

    /**
     * Specific internal energy of a gas at rest: `p / ((gamma - 1) rho)`.
     */
    pub fn specific_internal_energy(&self, state: GasState) -> f64 {
        state.pressure / ((self.gamma_law_index - 1.0) * state.density)
    }

    pub fn internal_from_total(&self, total_energy: f64, velocity: Vector2) -> f64 {
        total_energy - 0.5 * velocity.dot(velocity)
    }

    pub fn gas_pressure(&self, density: f64, internal_energy: f64) -> f64 {
        (self.gamma_law_index - 1.0) * density * internal_energy
    }

    pub fn sound_speed(&self, density: f64, pressure: f64) -> f64 {
        (self.gamma_law_index * pressure / density).sqrt()
    }
}
