use crate::error::{SolverError, SolverResult};
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Relative tolerance used when comparing `c(i, j)` against `c(j, i)`.
pub const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Square table of non-negative travel costs. `c(i, j)` need not equal `c(j, i)`.
/// The diagonal is ignored and stored as zero.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct CostMatrix {
    costs: Array2<f64>,
}

impl CostMatrix {
    pub fn new(rows: Vec<Vec<f64>>) -> SolverResult<Self> {
        let n = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(SolverError::invalid_matrix(format!(
                "row {} has {} entries but the matrix has {} rows",
                i,
                row.len(),
                n
            )));
        }
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        let costs = Array2::from_shape_vec((n, n), flat)
            .map_err(|e| SolverError::invalid_matrix(e.to_string()))?;
        Self::from_array(costs)
    }

    pub fn from_array(mut costs: Array2<f64>) -> SolverResult<Self> {
        let (rows, cols) = costs.dim();
        if rows != cols {
            return Err(SolverError::invalid_matrix(format!(
                "matrix is {}x{}, expected a square matrix",
                rows, cols
            )));
        }
        if rows < 2 {
            return Err(SolverError::invalid_matrix(format!(
                "matrix has {} nodes, at least 2 are required",
                rows
            )));
        }
        for ((i, j), &value) in costs.indexed_iter() {
            if i == j {
                continue;
            }
            if !value.is_finite() {
                return Err(SolverError::invalid_matrix(format!(
                    "entry ({}, {}) is not finite ({})",
                    i, j, value
                )));
            }
            if value < 0.0 {
                return Err(SolverError::invalid_matrix(format!(
                    "entry ({}, {}) is negative ({})",
                    i, j, value
                )));
            }
        }
        costs.diag_mut().fill(0.0);
        Ok(Self { costs })
    }

    /// Euclidean matrix over 2D points.
    pub fn from_points(points: &[(f64, f64)]) -> SolverResult<Self> {
        let n = points.len();
        let costs = Array2::from_shape_fn((n, n), |(i, j)| {
            let dx = points[i].0 - points[j].0;
            let dy = points[i].1 - points[j].1;
            dx.hypot(dy)
        });
        Self::from_array(costs)
    }

    pub fn size(&self) -> usize {
        self.costs.nrows()
    }

    pub fn cost(&self, i: usize, j: usize) -> SolverResult<f64> {
        let size = self.size();
        for index in [i, j] {
            if index >= size {
                return Err(SolverError::OutOfRange { index, size });
            }
        }
        Ok(self.costs[[i, j]])
    }

    /// Unchecked lookup for the hot paths of the search. Callers guarantee `i, j < size()`.
    #[inline(always)]
    pub fn c(&self, i: usize, j: usize) -> f64 {
        self.costs[[i, j]]
    }

    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.costs.row(i)
    }

    pub fn column(&self, j: usize) -> ArrayView1<'_, f64> {
        self.costs.column(j)
    }

    pub fn is_asymmetric(&self) -> bool {
        let n = self.size();
        (0..n).any(|i| {
            ((i + 1)..n).any(|j| {
                let (a, b) = (self.costs[[i, j]], self.costs[[j, i]]);
                (a - b).abs() > SYMMETRY_TOLERANCE * a.abs().max(b.abs()).max(1.0)
            })
        })
    }

    /// `Σ|c(i,j) - c(j,i)| / Σ (c(i,j) + c(j,i)) / 2` over unordered pairs; 0 when
    /// symmetric.
    pub fn asymmetry_ratio(&self) -> f64 {
        let n = self.size();
        let mut diff = 0.0;
        let mut total = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (self.costs[[i, j]], self.costs[[j, i]]);
                diff += (a - b).abs();
                total += (a + b) / 2.0;
            }
        }
        if total > 0.0 {
            diff / total
        } else {
            0.0
        }
    }

    pub fn off_diagonal(&self) -> impl Iterator<Item = f64> + '_ {
        self.costs
            .indexed_iter()
            .filter(|((i, j), _)| i != j)
            .map(|(_, &v)| v)
    }

    pub fn max_cost(&self) -> f64 {
        self.off_diagonal().fold(0.0, f64::max)
    }

    /// Closed-tour cost of `route`. Callers guarantee every index is in range.
    pub fn route_cost(&self, route: &[usize]) -> f64 {
        match route.len() {
            0 | 1 => 0.0,
            len => {
                route.windows(2).map(|w| self.c(w[0], w[1])).sum::<f64>()
                    + self.c(route[len - 1], route[0])
            }
        }
    }
}

impl TryFrom<Vec<Vec<f64>>> for CostMatrix {
    type Error = SolverError;

    fn try_from(rows: Vec<Vec<f64>>) -> SolverResult<Self> {
        Self::new(rows)
    }
}

impl From<CostMatrix> for Vec<Vec<f64>> {
    fn from(matrix: CostMatrix) -> Self {
        matrix
            .costs
            .outer_iter()
            .map(|row| row.to_vec())
            .collect()
    }
}
