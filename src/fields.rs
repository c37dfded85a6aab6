use std::fmt;

use crate::meshing::{Mesh, NODES_PER_CELL};
use crate::num_vec::{Matrix2, Vector2};

/// Per-corner data for one cell, aligned with the cell's node ordering.
pub type Corners<T> = [T; NODES_PER_CELL];




/**
 * Two storage slots for a time-evolving quantity: the current time level and
 * the next one. Kernels read the current level and write the next; a swap
 * exchanges the two slots in constant time (for a `Vec`, only the heap
 * pointers move). Swapping twice restores the original slots.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct DoubleBuffer<T> {
    current: T,
    next: T,
}

impl<T> DoubleBuffer<T> {
    pub fn new(current: T, next: T) -> Self {
        Self { current, next }
    }

    pub fn current(&self) -> &T {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut T {
        &mut self.current
    }

    pub fn next(&self) -> &T {
        &self.next
    }

    pub fn next_mut(&mut self) -> &mut T {
        &mut self.next
    }

    /**
     * Borrow the current level for reading and the next level for writing at
     * the same time.
     */
    pub fn split_mut(&mut self) -> (&T, &mut T) {
        (&self.current, &mut self.next)
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next)
    }
}

impl<T: Clone> DoubleBuffer<T> {
    /**
     * Create a double buffer with both levels equal to the given value.
     */
    pub fn splat(value: T) -> Self {
        Self::new(value.clone(), value)
    }
}




/**
 * Names of every field a kernel may read or write. Double-buffered fields
 * have one name per time level.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    // mesh geometry at t = 0
    InitialPosition,

    // node fields
    Position,
    NextPosition,
    NodeVelocity,
    NodeMatrix,
    CorrectedMatrix,
    NodeRhs,
    CorrectedRhs,

    // cell fields
    Mass,
    Volume,
    Density,
    Pressure,
    SoundSpeed,
    InternalEnergy,
    TotalEnergy,
    NextTotalEnergy,
    CellVelocity,
    NextCellVelocity,
    Center,
    LocalTimeStep,

    // corner fields
    CornerVector,
    CornerLength,
    CornerTensor,
    CornerForce,

    // initial condition fields
    InitialCornerVector,
    InitialDensity,
    InitialPressure,
    InitialVolume,

    // global scalars
    Time,
    NextTime,
    TimeStep,
    NextTimeStep,
}

impl FieldId {
    pub fn name(&self) -> &'static str {
        use FieldId::*;

        match self {
            InitialPosition => "X_n0",
            Position => "X",
            NextPosition => "X_nplus1",
            NodeVelocity => "ur",
            NodeMatrix => "Ar",
            CorrectedMatrix => "Mt",
            NodeRhs => "b",
            CorrectedRhs => "bt",
            Mass => "m",
            Volume => "V",
            Density => "rho",
            Pressure => "p",
            SoundSpeed => "c",
            InternalEnergy => "e",
            TotalEnergy => "E",
            NextTotalEnergy => "E_nplus1",
            CellVelocity => "uj",
            NextCellVelocity => "uj_nplus1",
            Center => "center",
            LocalTimeStep => "deltatj",
            CornerVector => "C",
            CornerLength => "l",
            CornerTensor => "Ajr",
            CornerForce => "F",
            InitialCornerVector => "C_ic",
            InitialDensity => "rho_ic",
            InitialPressure => "p_ic",
            InitialVolume => "V_ic",
            Time => "t",
            NextTime => "t_nplus1",
            TimeStep => "deltat",
            NextTimeStep => "deltat_nplus1",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}




/**
 * Cell fields needed only to set up the run: the two-state density and
 * pressure, and the volume and corner vectors of the undeformed mesh. They
 * are released once the initialization stages have run.
 */
#[derive(Clone, Debug, Default)]
pub struct InitialConditions {
    pub corner_vector: Vec<Corners<Vector2>>,
    pub density: Vec<f64>,
    pub pressure: Vec<f64>,
    pub volume: Vec<f64>,
}

impl InitialConditions {
    fn zeros(num_cells: usize) -> Self {
        Self {
            corner_vector: vec![[Vector2::zeros(); NODES_PER_CELL]; num_cells],
            density: vec![0.0; num_cells],
            pressure: vec![0.0; num_cells],
            volume: vec![0.0; num_cells],
        }
    }

    pub fn is_released(&self) -> bool {
        self.density.is_empty()
    }

    pub fn release(&mut self) {
        *self = Self::default()
    }
}




/**
 * Every numeric array the scheme operates on, sized once from the mesh and
 * reused for the whole run.
 */
#[derive(Clone, Debug)]
pub struct Fields {
    // node fields
    pub position: DoubleBuffer<Vec<Vector2>>,
    pub node_velocity: Vec<Vector2>,
    pub node_matrix: Vec<Matrix2>,
    pub corrected_matrix: Vec<Matrix2>,
    pub node_rhs: Vec<Vector2>,
    pub corrected_rhs: Vec<Vector2>,

    // cell fields
    pub mass: Vec<f64>,
    pub volume: Vec<f64>,
    pub density: Vec<f64>,
    pub pressure: Vec<f64>,
    pub sound_speed: Vec<f64>,
    pub internal_energy: Vec<f64>,
    pub total_energy: DoubleBuffer<Vec<f64>>,
    pub cell_velocity: DoubleBuffer<Vec<Vector2>>,
    pub center: Vec<Vector2>,
    pub local_time_step: Vec<f64>,

    // corner fields
    pub corner_vector: Vec<Corners<Vector2>>,
    pub corner_length: Vec<Corners<f64>>,
    pub corner_tensor: Vec<Corners<Matrix2>>,
    pub corner_force: Vec<Corners<Vector2>>,

    // global scalars
    pub time: DoubleBuffer<f64>,
    pub time_step: DoubleBuffer<f64>,

    pub initial: InitialConditions,
}

impl Fields {
    /**
     * Allocate zeroed fields for the given mesh. Both time levels of the
     * step start at `initial_time_step`.
     */
    pub fn new(mesh: &Mesh, initial_time_step: f64) -> Self {
        let nn = mesh.num_nodes();
        let nc = mesh.num_cells();

        Self {
            position: DoubleBuffer::splat(vec![Vector2::zeros(); nn]),
            node_velocity: vec![Vector2::zeros(); nn],
            node_matrix: vec![Matrix2::zeros(); nn],
            corrected_matrix: vec![Matrix2::zeros(); nn],
            node_rhs: vec![Vector2::zeros(); nn],
            corrected_rhs: vec![Vector2::zeros(); nn],
            mass: vec![0.0; nc],
            volume: vec![0.0; nc],
            density: vec![0.0; nc],
            pressure: vec![0.0; nc],
            sound_speed: vec![0.0; nc],
            internal_energy: vec![0.0; nc],
            total_energy: DoubleBuffer::splat(vec![0.0; nc]),
            cell_velocity: DoubleBuffer::splat(vec![Vector2::zeros(); nc]),
            center: vec![Vector2::zeros(); nc],
            local_time_step: vec![0.0; nc],
            corner_vector: vec![[Vector2::zeros(); NODES_PER_CELL]; nc],
            corner_length: vec![[0.0; NODES_PER_CELL]; nc],
            corner_tensor: vec![[Matrix2::zeros(); NODES_PER_CELL]; nc],
            corner_force: vec![[Vector2::zeros(); NODES_PER_CELL]; nc],
            time: DoubleBuffer::splat(0.0),
            time_step: DoubleBuffer::splat(initial_time_step),
            initial: InitialConditions::zeros(nc),
        }
    }

    pub fn time_levels(&self) -> TimeLevels {
        TimeLevels {
            time: self.time.clone(),
            time_step: self.time_step.clone(),
        }
    }

    pub fn restore_time_levels(&mut self, levels: TimeLevels) {
        self.time = levels.time;
        self.time_step = levels.time_step;
    }
}




/**
 * The scalar double buffers, saved at the start of an iteration so that an
 * aborted iteration leaves them untouched.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct TimeLevels {
    pub time: DoubleBuffer<f64>,
    pub time_step: DoubleBuffer<f64>,
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn swap_exchanges_levels_without_copying() {
        let mut buffer = DoubleBuffer::new(vec![1.0, 2.0], vec![3.0, 4.0]);
        let a = buffer.current().as_ptr();
        let b = buffer.next().as_ptr();

        buffer.swap();
        assert_eq!(buffer.current(), &vec![3.0, 4.0]);
        assert_eq!(buffer.current().as_ptr(), b);
        assert_eq!(buffer.next().as_ptr(), a);
    }

    #[test]
    fn double_swap_restores_identity_and_values() {
        let mut buffer = DoubleBuffer::new(vec![1.0, 2.0], vec![3.0, 4.0]);
        let original = buffer.clone();
        let a = buffer.current().as_ptr();
        let b = buffer.next().as_ptr();

        buffer.swap();
        buffer.swap();
        assert_eq!(buffer, original);
        assert_eq!(buffer.current().as_ptr(), a);
        assert_eq!(buffer.next().as_ptr(), b);
    }

    #[test]
    fn split_mut_writes_only_the_next_level() {
        let mut buffer = DoubleBuffer::splat(vec![0.0; 3]);
        let (current, next) = buffer.split_mut();

        for (n, c) in next.iter_mut().zip(current) {
            *n = c + 1.0;
        }
        assert_eq!(buffer.current(), &vec![0.0; 3]);
        assert_eq!(buffer.next(), &vec![1.0; 3]);
    }

    #[test]
    fn initial_conditions_are_released() {
        let mesh = Mesh::cartesian(2, 2, 1.0, 1.0).unwrap();
        let mut fields = Fields::new(&mesh, 1e-3);
        assert_eq!(fields.initial.density.len(), 4);
        assert!(!fields.initial.is_released());

        fields.initial.release();
        assert!(fields.initial.is_released());
        assert_eq!(fields.initial.corner_vector.capacity(), 0);
    }

    #[test]
    fn field_names_are_distinct() {
        use std::collections::HashSet;
        use FieldId::*;

        let all = [
            InitialPosition, Position, NextPosition, NodeVelocity, NodeMatrix,
            CorrectedMatrix, NodeRhs, CorrectedRhs, Mass, Volume, Density,
            Pressure, SoundSpeed, InternalEnergy, TotalEnergy, NextTotalEnergy,
            CellVelocity, NextCellVelocity, Center, LocalTimeStep, CornerVector,
            CornerLength, CornerTensor, CornerForce, InitialCornerVector,
            InitialDensity, InitialPressure, InitialVolume, Time, NextTime,
            TimeStep, NextTimeStep,
        ];
        let names: HashSet<_> = all.iter().map(FieldId::name).collect();
        assert_eq!(names.len(), all.len());
    }
}
