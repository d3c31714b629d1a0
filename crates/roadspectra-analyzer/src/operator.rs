//! The sparse adjacency operator.
//!
//! The road network's directed adjacency structure is materialized as a
//! compressed sparse row matrix and treated as a discrete linear map. Only
//! matrix-vector products, the Frobenius norm, and a bounded dense
//! principal submatrix are ever needed downstream, so the type stays
//! deliberately small.

use std::collections::BTreeSet;

use ndarray::Array2;
use roadspectra_core::RoadNetwork;

use crate::index::NodeIndex;

/// A real N×M matrix in compressed sparse row form.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<f64>,
}

impl CsrMatrix {
    /// Build a matrix from `(row, col, value)` triplets. Duplicate
    /// coordinates sum their values.
    #[must_use]
    pub fn from_triplets(rows: usize, cols: usize, triplets: &[(usize, usize, f64)]) -> Self {
        let mut sorted: Vec<(usize, usize, f64)> = triplets.to_vec();
        sorted.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let mut row_counts = vec![0usize; rows];
        let mut col_idx: Vec<usize> = Vec::with_capacity(sorted.len());
        let mut values: Vec<f64> = Vec::with_capacity(sorted.len());
        let mut prev: Option<(usize, usize)> = None;

        for &(r, c, v) in &sorted {
            debug_assert!(r < rows && c < cols);
            if prev == Some((r, c)) {
                if let Some(last) = values.last_mut() {
                    *last += v;
                }
            } else {
                col_idx.push(c);
                values.push(v);
                row_counts[r] += 1;
                prev = Some((r, c));
            }
        }

        let mut row_ptr = vec![0usize; rows + 1];
        for r in 0..rows {
            row_ptr[r + 1] = row_ptr[r] + row_counts[r];
        }

        Self {
            rows,
            cols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Number of explicitly stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Entry at `(row, col)`, zero when not stored.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        let start = self.row_ptr[row];
        let end = self.row_ptr[row + 1];
        for k in start..end {
            if self.col_idx[k] == col {
                return self.values[k];
            }
        }
        0.0
    }

    /// `y = A x`
    #[must_use]
    pub fn matvec(&self, x: &[f64]) -> Vec<f64> {
        debug_assert_eq!(x.len(), self.cols);
        let mut y = vec![0.0; self.rows];
        for r in 0..self.rows {
            let mut acc = 0.0;
            for k in self.row_ptr[r]..self.row_ptr[r + 1] {
                acc += self.values[k] * x[self.col_idx[k]];
            }
            y[r] = acc;
        }
        y
    }

    /// `y = Aᵀ x`
    #[must_use]
    pub fn matvec_transpose(&self, x: &[f64]) -> Vec<f64> {
        debug_assert_eq!(x.len(), self.rows);
        let mut y = vec![0.0; self.cols];
        for r in 0..self.rows {
            let xr = x[r];
            if xr == 0.0 {
                continue;
            }
            for k in self.row_ptr[r]..self.row_ptr[r + 1] {
                y[self.col_idx[k]] += self.values[k] * xr;
            }
        }
        y
    }

    /// Frobenius norm: square root of the sum of squares of all stored
    /// entries. For a unit-weighted adjacency operator this is √nnz.
    #[must_use]
    pub fn frobenius_norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Dense copy of the leading principal submatrix of the given size.
    #[must_use]
    pub fn principal_submatrix_dense(&self, size: usize) -> Array2<f64> {
        let s = size.min(self.rows).min(self.cols);
        let mut dense = Array2::zeros((s, s));
        for r in 0..s {
            for k in self.row_ptr[r]..self.row_ptr[r + 1] {
                let c = self.col_idx[k];
                if c < s {
                    dense[[r, c]] = self.values[k];
                }
            }
        }
        dense
    }
}

/// Construct the unit-weighted adjacency operator for a network.
///
/// Each edge whose endpoints both resolve through the index contributes a
/// unit entry at `(index(from), index(to))`; parallel edges and loops
/// collapse to a single entry. Edges with an unresolved endpoint are
/// silently dropped; that is expected filtering, not a data error. Returns the
/// operator together with the number of edges that contributed.
#[must_use]
pub fn build_operator<N>(network: &N, index: &NodeIndex) -> (CsrMatrix, usize)
where
    N: RoadNetwork + ?Sized,
{
    let n = index.len();
    let mut pairs: BTreeSet<(usize, usize)> = BTreeSet::new();
    let mut contributing = 0usize;

    for edge in network.edges() {
        let (Some(i), Some(j)) = (index.get(&edge.from), index.get(&edge.to)) else {
            continue;
        };
        contributing += 1;
        pairs.insert((i, j));
    }

    let triplets: Vec<(usize, usize, f64)> = pairs.into_iter().map(|(i, j)| (i, j, 1.0)).collect();
    (CsrMatrix::from_triplets(n, n, &triplets), contributing)
}
