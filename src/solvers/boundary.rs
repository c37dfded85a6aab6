use rayon::prelude::*;

use crate::config::Config;
use crate::fields::Fields;
use crate::hydro::error::Fault;
use crate::num_vec::{Matrix2, Vector2};
use crate::solvers::glace2d::Context;

/**
 * The four walls of the rectangular domain. The bottom and top walls are
 * reflective (slip): the velocity component along the wall normal is
 * removed. The left and right walls are fixed: the velocity is pinned to
 * zero. A node is on a wall if its coordinate is within `epsilon` of the
 * wall's extent.
 */
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Walls {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub epsilon: f64,
}

impl Walls {
    pub fn from_config(config: &Config) -> Self {
        Self {
            x_min: 0.0,
            x_max: config.x_max(),
            y_min: 0.0,
            y_max: config.y_max(),
            epsilon: config.boundary_epsilon,
        }
    }

    /**
     * Return the outward normal of the reflective wall the given position
     * lies on, if any.
     */
    pub fn reflective_normal(&self, x: Vector2) -> Option<Vector2> {
        if (x.1 - self.y_min).abs() < self.epsilon {
            Some(Vector2::new(0.0, -1.0))
        } else if (x.1 - self.y_max).abs() < self.epsilon {
            Some(Vector2::new(0.0, 1.0))
        } else {
            None
        }
    }

    pub fn is_fixed(&self, x: Vector2) -> bool {
        (x.0 - self.x_min).abs() < self.epsilon || (x.0 - self.x_max).abs() < self.epsilon
    }

    /**
     * Correct the nodal system `a u = b` of a node at position `x`.
     *
     * On a reflective wall with normal `n`, the system is projected with
     * `P = I - n ⊗ n`, and `(n ⊗ n) tr(a)` is added back so the corrected
     * matrix stays invertible; the solution then has no normal component.
     * On a fixed wall the system becomes `I u = 0`. The fixed-wall rule
     * wins at the domain corners.
     */
    pub fn correct(&self, x: Vector2, a: Matrix2, b: Vector2) -> (Matrix2, Vector2) {
        let mut corrected = (a, b);

        if let Some(n) = self.reflective_normal(x) {
            let nxn = n.outer(n);
            let p = Matrix2::identity() - nxn;
            corrected = (p * (a * p) + nxn * a.trace(), p * b);
        }
        if self.is_fixed(x) {
            corrected = (Matrix2::identity(), Vector2::zeros());
        }
        corrected
    }
}

/**
 * Build the corrected nodal systems: interior nodes take the assembled
 * system unchanged, boundary nodes get the wall correction.
 */
pub fn boundary_conditions(ctx: &Context, f: &mut Fields) -> Result<(), Fault> {
    let x = f.position.current();
    let ar = &f.node_matrix;
    let b = &f.node_rhs;

    f.corrected_matrix
        .par_iter_mut()
        .zip(f.corrected_rhs.par_iter_mut())
        .enumerate()
        .for_each(|(r, (mt, bt))| {
            let (m, rhs) = if ctx.mesh.is_boundary_node(r) {
                ctx.walls.correct(x[r], ar[r], b[r])
            } else {
                (ar[r], b[r])
            };
            *mt = m;
            *bt = rhs;
        });
    Ok(())
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;

    fn walls() -> Walls {
        Walls { x_min: 0.0, x_max: 1.0, y_min: 0.0, y_max: 0.1, epsilon: 1e-10 }
    }

    #[test]
    fn detection_uses_a_tolerance() {
        let w = walls();
        assert!(w.is_fixed(Vector2::new(1.0 - 1e-12, 0.05)));
        assert!(!w.is_fixed(Vector2::new(0.5, 0.05)));
        assert_eq!(w.reflective_normal(Vector2::new(0.5, 1e-12)), Some(Vector2::new(0.0, -1.0)));
        assert_eq!(w.reflective_normal(Vector2::new(0.5, 0.1 + 1e-12)), Some(Vector2::new(0.0, 1.0)));
        assert_eq!(w.reflective_normal(Vector2::new(0.5, 0.05)), None);
    }

    #[test]
    fn reflective_wall_removes_the_normal_velocity() {
        let a = Matrix2(2.0, 0.5, 0.5, 3.0);
        let b = Vector2::new(1.0, 4.0);
        let (m, rhs) = walls().correct(Vector2::new(0.5, 0.0), a, b);

        assert_eq!(rhs, Vector2::new(1.0, 0.0));
        assert_eq!(m, Matrix2(2.0, 0.0, 0.0, 5.0));

        let u = m.inverse().unwrap() * rhs;
        assert_eq!(u.1, 0.0);
        assert!((u.0 - 0.5).abs() < 1e-15);
    }

    #[test]
    fn fixed_wall_pins_the_velocity() {
        let a = Matrix2(2.0, 0.5, 0.5, 3.0);
        let b = Vector2::new(1.0, 4.0);

        for x in [Vector2::new(0.0, 0.05), Vector2::new(1.0, 0.05), Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.1)] {
            let (m, rhs) = walls().correct(x, a, b);
            assert_eq!(m, Matrix2::identity());
            assert_eq!(rhs, Vector2::zeros());
        }
    }

    #[test]
    fn interior_positions_are_untouched() {
        let a = Matrix2(2.0, 0.5, 0.5, 3.0);
        let b = Vector2::new(1.0, 4.0);
        assert_eq!(walls().correct(Vector2::new(0.5, 0.05), a, b), (a, b));
    }
}
