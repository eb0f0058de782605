//! Permanent of a square matrix over \(GF(2^k)\).
//!
//! In characteristic 2 the sign of a permutation is `1`, so the permanent and the
//! determinant coincide and plain Gaussian elimination computes it. Row swaps need no
//! sign bookkeeping.

use crate::error::Result;
use crate::gf::GaloisField;

// ============================================================================
// SquareMatrix
// ============================================================================

/// Dense square matrix of field elements in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SquareMatrix {
    n: usize,
    data: Vec<u8>,
}

impl SquareMatrix {
    /// Creates an `n × n` zero matrix.
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0u8; n * n],
        }
    }

    /// Builds a matrix from rows.
    ///
    /// # Panics
    /// Panics if the rows do not form a square.
    pub fn from_rows(rows: &[Vec<u8>]) -> Self {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for row in rows {
            assert_eq!(row.len(), n, "matrix rows must have length {n}");
            data.extend_from_slice(row);
        }
        Self { n, data }
    }

    /// Dimension `n`.
    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Entry at `(i, j)`.
    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> u8 {
        self.data[i * self.n + j]
    }

    /// Sets the entry at `(i, j)`.
    #[inline(always)]
    pub fn set(&mut self, i: usize, j: usize, value: u8) {
        self.data[i * self.n + j] = value;
    }

    /// Adds `value` to the entry at `(i, j)` (XOR in characteristic 2).
    #[inline(always)]
    pub fn xor_assign(&mut self, i: usize, j: usize, value: u8) {
        self.data[i * self.n + j] ^= value;
    }

    /// Resets every entry to zero, keeping the allocation.
    #[inline]
    pub fn fill_zero(&mut self) {
        self.data.fill(0);
    }

    /// Row `i` as a slice.
    pub fn row(&self, i: usize) -> &[u8] {
        let start = i * self.n;
        &self.data[start..start + self.n]
    }

    /// Swaps rows `a` and `b`.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let n = self.n;
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.data.split_at_mut(hi * n);
        head[lo * n..lo * n + n].swap_with_slice(&mut tail[..n]);
    }

    /// Mutable access to `(pivot_row, target_row)` with `pivot_row < target_row`.
    #[inline]
    fn row_pair_mut(&mut self, pivot: usize, target: usize) -> (&[u8], &mut [u8]) {
        debug_assert!(pivot < target);
        let n = self.n;
        let (head, tail) = self.data.split_at_mut(target * n);
        (&head[pivot * n..pivot * n + n], &mut tail[..n])
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Returns the permanent of `matrix`, eliminating on a private copy.
///
/// # Errors
/// Propagates an invariant violation if elimination ever divides by zero.
pub fn permanent(field: &GaloisField, matrix: &SquareMatrix) -> Result<u8> {
    let mut scratch = matrix.clone();
    permanent_in_place(field, &mut scratch)
}

/// Returns the permanent of `matrix`, destroying its contents.
///
/// Used by callers that rebuild a scratch matrix for every evaluation.
///
/// # Errors
/// Propagates an invariant violation if elimination ever divides by zero.
pub fn permanent_in_place(field: &GaloisField, matrix: &mut SquareMatrix) -> Result<u8> {
    let n = matrix.dim();

    for i in 0..n {
        if matrix.get(i, i) == 0 {
            match (i + 1..n).find(|&j| matrix.get(j, i) != 0) {
                Some(j) => matrix.swap_rows(i, j),
                None => return Ok(0),
            }
        }

        let pivot = matrix.get(i, i);
        for j in i + 1..n {
            let lead = matrix.get(j, i);
            if lead == 0 {
                continue;
            }
            let m = field.div(lead, pivot)?;
            let (pivot_row, row) = matrix.row_pair_mut(i, j);
            for c in i..n {
                row[c] ^= field.mul(m, pivot_row[c]);
            }
        }
    }

    Ok((0..n).fold(1u8, |acc, i| field.mul(acc, matrix.get(i, i))))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    /// Sum over all permutations of the product of selected entries.
    fn brute_permanent(field: &GaloisField, m: &SquareMatrix) -> u8 {
        fn go(field: &GaloisField, m: &SquareMatrix, row: usize, used: u32, acc: u8) -> u8 {
            if row == m.dim() {
                return acc;
            }
            let mut total = 0u8;
            for col in 0..m.dim() {
                if used & (1 << col) == 0 {
                    let term = field.mul(acc, m.get(row, col));
                    if term != 0 {
                        total ^= go(field, m, row + 1, used | (1 << col), term);
                    }
                }
            }
            total
        }
        go(field, m, 0, 0, 1)
    }

    fn random_matrix<R: Rng>(rng: &mut R, field: &GaloisField, n: usize, density: f64) -> SquareMatrix {
        let mut m = SquareMatrix::zeros(n);
        for i in 0..n {
            for j in 0..n {
                if rng.random_bool(density) {
                    m.set(i, j, rng.random_range(0..field.order()) as u8);
                }
            }
        }
        m
    }

    #[test]
    fn matches_bruteforce_on_random_matrices() {
        let mut rng = XorShiftRng::seed_from_u64(0x9E57);
        for k in 2..=8 {
            let field = GaloisField::new(k).unwrap();
            for n in 0..=6 {
                for &density in &[0.3, 0.7, 1.0] {
                    for _ in 0..12 {
                        let m = random_matrix(&mut rng, &field, n, density);
                        assert_eq!(
                            permanent(&field, &m).unwrap(),
                            brute_permanent(&field, &m),
                            "k={k}, n={n}, m={m:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn pivot_swap_is_sign_free() {
        let field = GaloisField::new(3).unwrap();
        // [[0, a], [b, 0]] -> a*b, requires a swap at the first pivot.
        let m = SquareMatrix::from_rows(&[vec![0, 3], vec![5, 0]]);
        assert_eq!(permanent(&field, &m).unwrap(), field.mul(3, 5));
    }

    #[test]
    fn singular_matrix_has_zero_permanent() {
        let field = GaloisField::new(4).unwrap();
        // Two equal rows cancel in characteristic 2.
        let m = SquareMatrix::from_rows(&[vec![1, 2, 3], vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(permanent(&field, &m).unwrap(), 0);

        let zero_col = SquareMatrix::from_rows(&[vec![0, 7], vec![0, 9]]);
        assert_eq!(permanent(&field, &zero_col).unwrap(), 0);
    }

    #[test]
    fn empty_and_identity() {
        let field = GaloisField::new(2).unwrap();
        assert_eq!(permanent(&field, &SquareMatrix::zeros(0)).unwrap(), 1);

        let mut id = SquareMatrix::zeros(5);
        for i in 0..5 {
            id.set(i, i, 1);
        }
        assert_eq!(permanent(&field, &id).unwrap(), 1);
    }

    #[test]
    fn permanent_leaves_input_untouched() {
        let field = GaloisField::new(5).unwrap();
        let m = SquareMatrix::from_rows(&[vec![0, 4, 1], vec![9, 0, 2], vec![3, 8, 0]]);
        let before = m.clone();
        let _ = permanent(&field, &m).unwrap();
        assert_eq!(m, before);
    }

    #[test]
    fn swap_rows_exchanges_contents() {
        let mut m = SquareMatrix::from_rows(&[vec![1, 2], vec![3, 4]]);
        m.swap_rows(1, 0);
        assert_eq!(m.row(0), &[3, 4]);
        assert_eq!(m.row(1), &[1, 2]);
        m.swap_rows(1, 1);
        assert_eq!(m.row(1), &[1, 2]);
    }
}
