//! Loop matrix assembly and solving.

use crate::error::{LoopflowError, Result};

/// Dense mesh system R·I = V.
#[derive(Debug, Clone)]
pub struct LoopMatrix {
    /// Loop-resistance matrix R (row-major)
    pub r: Vec<f64>,
    /// Loop-voltage vector V
    pub v: Vec<f64>,
    /// Number of loops
    pub size: usize,
}

impl LoopMatrix {
    /// Create a zeroed system for `size` loops.
    pub fn new(size: usize) -> Self {
        Self {
            r: vec![0.0; size * size],
            v: vec![0.0; size],
            size,
        }
    }

    /// Get matrix element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.r[row * self.size + col]
    }

    /// Add to matrix element at (row, col).
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.r[row * self.size + col] += value;
    }

    /// Add to voltage vector element.
    pub fn add_source(&mut self, row: usize, value: f64) {
        self.v[row] += value;
    }

    /// Stamp a component shared by a set of loops.
    ///
    /// `loops` lists (loop index, traversal direction) for every loop that
    /// contains the component. Every pair (i, j) gets `d_i * d_j * R`, which
    /// puts the plain resistance on the diagonal and a signed mutual term
    /// off the diagonal. Each loop's V gets `d_i * emf`.
    pub fn stamp_branch(&mut self, loops: &[(usize, f64)], resistance: f64, emf: f64) {
        for &(i, di) in loops {
            for &(j, dj) in loops {
                self.add(i, j, di * dj * resistance);
            }
            self.add_source(i, di * emf);
        }
    }

    /// Solve by Gaussian elimination with partial pivoting.
    ///
    /// At each step the remaining row with the largest entry in the pivot
    /// column is swapped into place. A pivot smaller than `epsilon` after
    /// pivoting means the system has no unique solution.
    pub fn solve(&self, epsilon: f64) -> Result<Vec<f64>> {
        let n = self.size;
        let mut a = self.r.clone();
        let mut b = self.v.clone();

        for k in 0..n {
            // Find pivot
            let mut max_val = a[k * n + k].abs();
            let mut max_row = k;
            for i in (k + 1)..n {
                let val = a[i * n + k].abs();
                if val > max_val {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_val < epsilon {
                return Err(LoopflowError::singular(k, max_val));
            }

            // Swap rows if needed
            if max_row != k {
                for j in 0..n {
                    a.swap(k * n + j, max_row * n + j);
                }
                b.swap(k, max_row);
            }

            // Eliminate
            let pivot = a[k * n + k];
            for i in (k + 1)..n {
                let factor = a[i * n + k] / pivot;
                if factor == 0.0 {
                    continue;
                }
                a[i * n + k] = 0.0;
                for j in (k + 1)..n {
                    a[i * n + j] -= factor * a[k * n + j];
                }
                b[i] -= factor * b[k];
            }
        }

        // Back substitution
        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let mut sum = b[i];
            for j in (i + 1)..n {
                sum -= a[i * n + j] * x[j];
            }
            x[i] = sum / a[i * n + i];
        }

        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solve_2x2() {
        // 20 I1 - 10 I2 = 10
        // -10 I1 + 30 I2 = 0
        let mut m = LoopMatrix::new(2);
        m.add(0, 0, 20.0);
        m.add(0, 1, -10.0);
        m.add(1, 0, -10.0);
        m.add(1, 1, 30.0);
        m.add_source(0, 10.0);

        let x = m.solve(1e-10).unwrap();
        assert_relative_eq!(x[0], 0.6, epsilon = 1e-12);
        assert_relative_eq!(x[1], 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_pivoting_handles_zero_diagonal() {
        // [0 1; 1 0] x = [2; 3]
        let mut m = LoopMatrix::new(2);
        m.add(0, 1, 1.0);
        m.add(1, 0, 1.0);
        m.add_source(0, 2.0);
        m.add_source(1, 3.0);

        let x = m.solve(1e-10).unwrap();
        assert_relative_eq!(x[0], 3.0);
        assert_relative_eq!(x[1], 2.0);
    }

    #[test]
    fn test_singular_matrix() {
        let mut m = LoopMatrix::new(2);
        m.add(0, 0, 1.0);
        m.add(0, 1, 2.0);
        m.add(1, 0, 2.0);
        m.add(1, 1, 4.0);
        assert!(matches!(
            m.solve(1e-10),
            Err(LoopflowError::SingularMatrix { row: 1, .. })
        ));

        // All-zero single loop
        assert!(LoopMatrix::new(1).solve(1e-10).is_err());
    }

    #[test]
    fn test_stamp_branch_signs() {
        let mut m = LoopMatrix::new(2);
        // Shared resistor traversed in opposite directions by the two loops
        m.stamp_branch(&[(0, 1.0), (1, -1.0)], 5.0, 0.0);
        // Source only in loop 0, traversed backwards
        m.stamp_branch(&[(0, -1.0)], 0.0, 9.0);

        assert_eq!(m.get(0, 0), 5.0);
        assert_eq!(m.get(1, 1), 5.0);
        assert_eq!(m.get(0, 1), -5.0);
        assert_eq!(m.get(1, 0), -5.0);
        assert_eq!(m.v[0], -9.0);
        assert_eq!(m.v[1], 0.0);
    }

    #[test]
    fn test_empty_system() {
        assert!(LoopMatrix::new(0).solve(1e-10).unwrap().is_empty());
    }
}
