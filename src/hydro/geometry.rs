use crate::fields::Corners;
use crate::meshing::NODES_PER_CELL;
use crate::num_vec::Vector2;

/**
 * Return the corner vectors of a polygon with the given (counter-clockwise)
 * node positions. The corner vector at node `r` is half the clockwise
 * perpendicular of the chord from node `r - 1` to node `r + 1`; it points
 * outward and the corner vectors of a closed polygon sum to zero.
 */
pub fn corner_vectors(x: &Corners<Vector2>) -> Corners<Vector2> {
    let n = NODES_PER_CELL;
    let mut c = [Vector2::zeros(); NODES_PER_CELL];

    for (r, c) in c.iter_mut().enumerate() {
        let xm = x[(r + n - 1) % n];
        let xp = x[(r + 1) % n];
        *c = (xp - xm).perp() * 0.5;
    }
    c
}

pub fn corner_lengths(c: &Corners<Vector2>) -> Corners<f64> {
    c.map(|c| c.norm())
}

/**
 * Polygon area from the divergence identity `V = 1/2 sum_r C_r . X_r`.
 */
pub fn volume(c: &Corners<Vector2>, x: &Corners<Vector2>) -> f64 {
    0.5 * c.iter().zip(x).map(|(c, x)| c.dot(*x)).sum::<f64>()
}

/**
 * Arithmetic mean of the node positions.
 */
pub fn center(x: &Corners<Vector2>) -> Vector2 {
    x.iter().copied().sum::<Vector2>() * (1.0 / NODES_PER_CELL as f64)
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;

    fn quad(x: [(f64, f64); 4]) -> Corners<Vector2> {
        x.map(|(a, b)| Vector2::new(a, b))
    }

    #[test]
    fn unit_square_corner_vectors_point_outward() {
        let x = quad([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let c = corner_vectors(&x);
        assert_eq!(c[0], Vector2::new(-0.5, -0.5));
        assert_eq!(c[1], Vector2::new(0.5, -0.5));
        assert_eq!(c[2], Vector2::new(0.5, 0.5));
        assert_eq!(c[3], Vector2::new(-0.5, 0.5));
        assert_eq!(volume(&c, &x), 1.0);
    }

    #[test]
    fn corner_vectors_close_for_a_skewed_quad() {
        let x = quad([(0.1, -0.2), (1.3, 0.05), (1.1, 0.9), (-0.2, 1.4)]);
        let s: Vector2 = corner_vectors(&x).iter().copied().sum();
        assert!(s.norm() < 1e-15);
    }

    #[test]
    fn volume_matches_the_shoelace_formula() {
        let x = quad([(0.1, -0.2), (1.3, 0.05), (1.1, 0.9), (-0.2, 1.4)]);
        let shoelace = 0.5 * (0..4)
            .map(|a| x[a].0 * x[(a + 1) % 4].1 - x[(a + 1) % 4].0 * x[a].1)
            .sum::<f64>();
        assert!((volume(&corner_vectors(&x), &x) - shoelace).abs() < 1e-14);
    }

    #[test]
    fn volume_is_translation_invariant() {
        let x = quad([(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (0.0, 1.0)]);
        let y = x.map(|p| p + Vector2::new(10.0, -3.0));
        assert!((volume(&corner_vectors(&y), &y) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn corner_lengths_of_a_rectangle() {
        let x = quad([(0.0, 0.0), (0.02, 0.0), (0.02, 0.01), (0.0, 0.01)]);
        let l = corner_lengths(&corner_vectors(&x));
        let expected = 0.5 * (0.02f64.powi(2) + 0.01f64.powi(2)).sqrt();
        assert!(l.iter().all(|l| (l - expected).abs() < 1e-15));
    }

    #[test]
    fn center_of_a_square() {
        let x = quad([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        assert_eq!(center(&x), Vector2::new(0.5, 0.5));
    }
}
