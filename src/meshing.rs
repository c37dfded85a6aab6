use std::collections::hash_map::{Entry, HashMap};

use crate::error::Error;
use crate::num_vec::Vector2;

/// Every cell in the mesh is a quadrilateral.
pub const NODES_PER_CELL: usize = 4;




/**
 * A cell incident to a node, together with the node's local (corner) index
 * within that cell.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Incidence {
    pub cell: usize,
    pub corner: usize,
}




/**
 * An unstructured mesh of convex quadrilateral cells with counter-clockwise
 * node ordering. The mesh owns the undeformed node coordinates and all the
 * connectivity the scheme needs: nodes of each cell, cells around each node
 * (with the corner index of the node in each), faces, and the partition of
 * nodes into interior and boundary. Everything is computed at construction
 * and read-only afterwards.
 */
#[derive(Clone, Debug)]
pub struct Mesh {
    nodes: Vec<Vector2>,
    cells: Vec<[usize; NODES_PER_CELL]>,
    incidence_offsets: Vec<usize>,
    incidences: Vec<Incidence>,
    faces: Vec<[usize; 2]>,
    outer_faces: Vec<usize>,
    inner_nodes: Vec<usize>,
    boundary_nodes: Vec<usize>,
    on_boundary: Vec<bool>,
}




// ============================================================================
impl Mesh {

    /**
     * Generate a rectilinear mesh of `nx * ny` cells covering
     * `[0, nx * dx] x [0, ny * dy]`. Node `(i, j)` has index
     * `j * (nx + 1) + i`, and cell `(i, j)` has index `j * nx + i`.
     */
    pub fn cartesian(nx: usize, ny: usize, dx: f64, dy: f64) -> Result<Self, Error> {
        if nx == 0 || ny == 0 {
            return Err(Error::Configuration(format!("mesh must have at least one cell on each axis, got {}x{}", nx, ny)));
        }
        if !(dx > 0.0 && dx.is_finite() && dy > 0.0 && dy.is_finite()) {
            return Err(Error::Configuration(format!("edge lengths must be positive, got {} and {}", dx, dy)));
        }

        let node = |i: usize, j: usize| j * (nx + 1) + i;

        let nodes = (0..=ny)
            .flat_map(|j| (0..=nx).map(move |i| Vector2::new(i as f64 * dx, j as f64 * dy)))
            .collect();

        let cells = (0..ny)
            .flat_map(|j| (0..nx).map(move |i| [node(i, j), node(i + 1, j), node(i + 1, j + 1), node(i, j + 1)]))
            .collect();

        Self::from_parts(nodes, cells)
    }

    /**
     * Build a mesh from node coordinates and cell connectivity. Faces and the
     * boundary partition are derived: a face belonging to exactly one cell is
     * a boundary face. Fails if a cell references a missing node, repeats a
     * node, or is not counter-clockwise.
     */
    pub fn from_parts(nodes: Vec<Vector2>, cells: Vec<[usize; NODES_PER_CELL]>) -> Result<Self, Error> {
        let num_nodes = nodes.len();

        for (j, cell) in cells.iter().enumerate() {
            if let Some(r) = cell.iter().find(|&&r| r >= num_nodes) {
                return Err(Error::Configuration(format!("cell {} references missing node {}", j, r)));
            }
            for a in 0..NODES_PER_CELL {
                if cell[a + 1..].contains(&cell[a]) {
                    return Err(Error::Configuration(format!("cell {} repeats node {}", j, cell[a])));
                }
            }
            if signed_area(cell.map(|r| nodes[r])) <= 0.0 {
                return Err(Error::Configuration(format!("cell {} is not counter-clockwise", j)));
            }
        }

        let mut counts = vec![0usize; num_nodes];

        for cell in &cells {
            for &r in cell {
                counts[r] += 1;
            }
        }

        let mut incidence_offsets = Vec::with_capacity(num_nodes + 1);
        incidence_offsets.push(0);

        for count in &counts {
            incidence_offsets.push(incidence_offsets.last().copied().unwrap_or(0) + count);
        }

        let mut fill = incidence_offsets.clone();
        let mut incidences = vec![Incidence { cell: 0, corner: 0 }; incidence_offsets[num_nodes]];

        for (j, cell) in cells.iter().enumerate() {
            for (corner, &r) in cell.iter().enumerate() {
                incidences[fill[r]] = Incidence { cell: j, corner };
                fill[r] += 1;
            }
        }

        let mut face_index: HashMap<(usize, usize), usize> = HashMap::new();
        let mut faces = Vec::new();
        let mut face_cells: Vec<u32> = Vec::new();

        for cell in &cells {
            for a in 0..NODES_PER_CELL {
                let r0 = cell[a];
                let r1 = cell[(a + 1) % NODES_PER_CELL];

                match face_index.entry((r0.min(r1), r0.max(r1))) {
                    Entry::Occupied(entry) => face_cells[*entry.get()] += 1,
                    Entry::Vacant(entry) => {
                        entry.insert(faces.len());
                        faces.push([r0, r1]);
                        face_cells.push(1);
                    }
                }
            }
        }

        let outer_faces: Vec<usize> = face_cells
            .iter()
            .enumerate()
            .filter(|&(_, &n)| n == 1)
            .map(|(k, _)| k)
            .collect();

        let mut on_boundary = vec![false; num_nodes];

        for &k in &outer_faces {
            for &r in &faces[k] {
                on_boundary[r] = true;
            }
        }

        let (boundary_nodes, inner_nodes): (Vec<usize>, Vec<usize>) = (0..num_nodes).partition(|&r| on_boundary[r]);

        Ok(Self {
            nodes,
            cells,
            incidence_offsets,
            incidences,
            faces,
            outer_faces,
            inner_nodes,
            boundary_nodes,
            on_boundary,
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn num_outer_faces(&self) -> usize {
        self.outer_faces.len()
    }

    /**
     * Return the undeformed node coordinates.
     */
    pub fn nodes(&self) -> &[Vector2] {
        &self.nodes
    }

    /**
     * Return the node lists of all cells (the quads, for visualization).
     */
    pub fn cells(&self) -> &[[usize; NODES_PER_CELL]] {
        &self.cells
    }

    pub fn nodes_of_cell(&self, cell: usize) -> &[usize; NODES_PER_CELL] {
        &self.cells[cell]
    }

    /**
     * Return the cells around a node, each with the node's corner index in
     * that cell.
     */
    pub fn cells_of_node(&self, node: usize) -> &[Incidence] {
        &self.incidences[self.incidence_offsets[node]..self.incidence_offsets[node + 1]]
    }

    /**
     * Return the local corner index of `node` in `cell`, if the node belongs
     * to it.
     */
    pub fn corner_of(&self, cell: usize, node: usize) -> Option<usize> {
        self.cells[cell].iter().position(|&r| r == node)
    }

    pub fn nodes_of_face(&self, face: usize) -> &[usize; 2] {
        &self.faces[face]
    }

    pub fn outer_faces(&self) -> &[usize] {
        &self.outer_faces
    }

    pub fn inner_nodes(&self) -> &[usize] {
        &self.inner_nodes
    }

    pub fn boundary_nodes(&self) -> &[usize] {
        &self.boundary_nodes
    }

    pub fn is_boundary_node(&self, node: usize) -> bool {
        self.on_boundary[node]
    }

    /**
     * Gather per-node values into the corner order of a cell.
     */
    pub fn gather<T: Copy>(&self, cell: usize, values: &[T]) -> [T; NODES_PER_CELL] {
        self.cells[cell].map(|r| values[r])
    }
}




// ============================================================================
fn signed_area(x: [Vector2; NODES_PER_CELL]) -> f64 {
    (0..NODES_PER_CELL)
        .map(|a| {
            let p = x[a];
            let q = x[(a + 1) % NODES_PER_CELL];
            p.0 * q.1 - q.0 * p.1
        })
        .sum::<f64>() * 0.5
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn cartesian_mesh_has_expected_counts() {
        let mesh = Mesh::cartesian(4, 3, 0.25, 0.5).unwrap();
        assert_eq!(mesh.num_nodes(), 20);
        assert_eq!(mesh.num_cells(), 12);
        assert_eq!(mesh.num_outer_faces(), 2 * (4 + 3));
        assert_eq!(mesh.boundary_nodes().len(), 2 * (4 + 3));
        assert_eq!(mesh.inner_nodes().len(), 3 * 2);
        assert_eq!(mesh.nodes()[19], Vector2::new(1.0, 1.5));
    }

    #[test]
    fn cartesian_cells_are_counter_clockwise() {
        let mesh = Mesh::cartesian(3, 2, 1.0, 1.0).unwrap();

        for j in 0..mesh.num_cells() {
            assert!(signed_area(mesh.gather(j, mesh.nodes())) > 0.0);
        }
        assert_eq!(mesh.nodes_of_cell(4), &[5, 6, 10, 9]);
    }

    #[test]
    fn incidence_records_the_corner_index() {
        let mesh = Mesh::cartesian(3, 3, 1.0, 1.0).unwrap();

        for r in 0..mesh.num_nodes() {
            for inc in mesh.cells_of_node(r) {
                assert_eq!(mesh.nodes_of_cell(inc.cell)[inc.corner], r);
                assert_eq!(mesh.corner_of(inc.cell, r), Some(inc.corner));
            }
        }
        assert_eq!(mesh.cells_of_node(5).len(), 4);
        assert_eq!(mesh.cells_of_node(0).len(), 1);
        assert_eq!(mesh.corner_of(0, 15), None);
    }

    #[test]
    fn boundary_partition_matches_outer_faces() {
        let mesh = Mesh::cartesian(5, 2, 1.0, 1.0).unwrap();

        for &k in mesh.outer_faces() {
            for &r in mesh.nodes_of_face(k) {
                assert!(mesh.is_boundary_node(r));
            }
        }
        for &r in mesh.inner_nodes() {
            assert!(!mesh.is_boundary_node(r));
            assert_eq!(mesh.cells_of_node(r).len(), 4);
        }
    }

    #[test]
    fn bad_meshes_are_rejected() {
        assert!(Mesh::cartesian(0, 3, 1.0, 1.0).is_err());
        assert!(Mesh::cartesian(3, 3, -1.0, 1.0).is_err());

        let nodes = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(0.0, 1.0),
        ];
        assert!(Mesh::from_parts(nodes.clone(), vec![[0, 1, 2, 3]]).is_ok());
        assert!(Mesh::from_parts(nodes.clone(), vec![[0, 3, 2, 1]]).is_err());
        assert!(Mesh::from_parts(nodes.clone(), vec![[0, 1, 2, 2]]).is_err());
        assert!(Mesh::from_parts(nodes, vec![[0, 1, 2, 4]]).is_err());
    }
}
