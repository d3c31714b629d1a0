//! Singular decomposition results and their ordering discipline.
//!
//! Iterative sparse SVD solvers conventionally return their triplets in
//! ascending singular-value order. [`SvdTriplets`] keeps that convention at
//! the backend boundary; [`SingularDecomposition::from_ascending`] performs
//! the explicit joint re-sort into descending order. Values and vectors are
//! permuted together; an order mismatch between the arrays would silently
//! corrupt the critical-edge ranking, so the pairing is re-checked in tests.

/// Raw triplets as produced by a backend, in **ascending** singular-value
/// order. `left[i]` / `right[i]` pair with `singular_values[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SvdTriplets {
    /// Singular values, ascending
    pub singular_values: Vec<f64>,
    /// Left singular vectors, one per value
    pub left: Vec<Vec<f64>>,
    /// Right singular vectors, one per value
    pub right: Vec<Vec<f64>>,
}

/// Singular triplets re-sorted into descending order, ready for ranking
/// and norm estimation.
#[derive(Debug, Clone, PartialEq)]
pub struct SingularDecomposition {
    /// Singular values, descending
    pub singular_values: Vec<f64>,
    /// Left singular vectors, `left[i]` paired with `singular_values[i]`
    pub left: Vec<Vec<f64>>,
    /// Right singular vectors, `right[i]` paired with `singular_values[i]`
    pub right: Vec<Vec<f64>>,
}

impl SingularDecomposition {
    /// Re-sort backend triplets into descending order, permuting values
    /// and both vector families with the same index map.
    #[must_use]
    pub fn from_ascending(triplets: SvdTriplets) -> Self {
        let SvdTriplets {
            singular_values,
            left,
            right,
        } = triplets;
        debug_assert_eq!(singular_values.len(), left.len());
        debug_assert_eq!(singular_values.len(), right.len());

        let mut order: Vec<usize> = (0..singular_values.len()).collect();
        order.sort_by(|&a, &b| {
            singular_values[b]
                .partial_cmp(&singular_values[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let sorted_values: Vec<f64> = order.iter().map(|&i| singular_values[i]).collect();
        let mut left_slots: Vec<Option<Vec<f64>>> = left.into_iter().map(Some).collect();
        let mut right_slots: Vec<Option<Vec<f64>>> = right.into_iter().map(Some).collect();
        let sorted_left: Vec<Vec<f64>> = order
            .iter()
            .map(|&i| left_slots[i].take().unwrap_or_default())
            .collect();
        let sorted_right: Vec<Vec<f64>> = order
            .iter()
            .map(|&i| right_slots[i].take().unwrap_or_default())
            .collect();

        Self {
            singular_values: sorted_values,
            left: sorted_left,
            right: sorted_right,
        }
    }

    /// The top singular value, 0.0 when the decomposition is empty.
    #[must_use]
    pub fn sigma_max(&self) -> f64 {
        self.singular_values.first().copied().unwrap_or(0.0)
    }

    /// Dominant left singular vector.
    #[must_use]
    pub fn u1(&self) -> &[f64] {
        self.left.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Dominant right singular vector.
    #[must_use]
    pub fn v1(&self) -> &[f64] {
        self.right.first().map(Vec::as_slice).unwrap_or(&[])
    }
}
