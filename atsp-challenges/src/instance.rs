use crate::error::{SolverError, SolverResult};
use crate::matrix::CostMatrix;
use ndarray::Array2;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::f64::consts::PI;

/// A problem instance: the cost matrix plus node coordinates when the matrix was
/// derived from a geometric layout.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Instance {
    pub matrix: CostMatrix,
    pub coordinates: Option<Vec<(f64, f64)>>,
}

impl Instance {
    pub fn from_matrix(matrix: CostMatrix) -> Self {
        Self {
            matrix,
            coordinates: None,
        }
    }

    pub fn from_points(points: Vec<(f64, f64)>) -> SolverResult<Self> {
        let matrix = CostMatrix::from_points(&points)?;
        Ok(Self {
            matrix,
            coordinates: Some(points),
        })
    }

    pub fn with_coordinates(
        matrix: CostMatrix,
        coordinates: Vec<(f64, f64)>,
    ) -> SolverResult<Self> {
        if coordinates.len() != matrix.size() {
            return Err(SolverError::invalid_matrix(format!(
                "{} coordinates supplied for {} nodes",
                coordinates.len(),
                matrix.size()
            )));
        }
        if coordinates
            .iter()
            .any(|&(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(SolverError::invalid_matrix("coordinates must be finite"));
        }
        Ok(Self {
            matrix,
            coordinates: Some(coordinates),
        })
    }

    pub fn size(&self) -> usize {
        self.matrix.size()
    }

    /// Distinct integer positions on a 1000x1000 square.
    pub fn generate_random_euclidean(seed: u64, size: usize) -> SolverResult<Self> {
        let mut rng = SmallRng::seed_from_u64(seed);
        Self::from_points(random_positions(&mut rng, size))
    }

    /// `size` points evenly spaced on a circle, listed in angular order.
    pub fn generate_circle(size: usize, radius: f64) -> SolverResult<Self> {
        let points = (0..size)
            .map(|k| {
                let angle = 2.0 * PI * k as f64 / size as f64;
                (radius * angle.cos(), radius * angle.sin())
            })
            .collect();
        Self::from_points(points)
    }

    /// A `rows x cols` lattice with uniform spacing, listed row by row.
    pub fn generate_grid(rows: usize, cols: usize, spacing: f64) -> SolverResult<Self> {
        let points = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| (c as f64 * spacing, r as f64 * spacing)))
            .collect();
        Self::from_points(points)
    }

    /// Euclidean base costs where each direction is independently scaled by a factor
    /// drawn from `[1, 1 + asymmetry]`. Coordinates are not exposed, as for matrix-only input.
    pub fn generate_random_asymmetric(
        seed: u64,
        size: usize,
        asymmetry: f64,
    ) -> SolverResult<Self> {
        if !asymmetry.is_finite() || asymmetry < 0.0 {
            return Err(SolverError::invalid_matrix(format!(
                "asymmetry factor must be a non-negative number, got {}",
                asymmetry
            )));
        }
        let mut rng = SmallRng::seed_from_u64(seed);
        let points = random_positions(&mut rng, size);
        let mut costs = Array2::<f64>::zeros((size, size));
        for i in 0..size {
            for j in 0..size {
                if i == j {
                    continue;
                }
                let dx = points[i].0 - points[j].0;
                let dy = points[i].1 - points[j].1;
                let factor = 1.0 + asymmetry * rng.gen::<f64>();
                costs[[i, j]] = (dx.hypot(dy) * factor).round();
            }
        }
        Ok(Self::from_matrix(CostMatrix::from_array(costs)?))
    }
}

fn random_positions(rng: &mut SmallRng, size: usize) -> Vec<(f64, f64)> {
    let mut node_positions: Vec<(f64, f64)> = Vec::with_capacity(size);
    let mut node_positions_set: HashSet<(i32, i32)> = HashSet::with_capacity(size);
    while node_positions.len() < size {
        let pos = (rng.gen_range(0..=1000), rng.gen_range(0..=1000));
        if node_positions_set.contains(&pos) {
            continue;
        }
        node_positions.push((pos.0 as f64, pos.1 as f64));
        node_positions_set.insert(pos);
    }
    node_positions
}
