//! Encode matrix construction and Gaussian inversion over GF(2⁸).

use crate::gf256::{gf_inv, gf_mul};

/// The `(k + m) × k` encode matrix.
///
/// Systematic form: the top `k` rows are the identity, so data fragments are
/// the payload blocks verbatim. Parity row `k + p`, column `j` is
/// `1 / ((k + p) XOR j)` — a Cauchy block with pairwise-distinct parameters,
/// which makes every `k × k` row-submatrix nonsingular for any `k + m ≤ 256`.
/// That invariant is what lets decode pick *any* `k` surviving fragments.
#[derive(Debug, Clone)]
pub(crate) struct EncodeMatrix {
    rows: Vec<Vec<u8>>,
}

impl EncodeMatrix {
    /// Build the matrix for `data` data rows and `parity` parity rows.
    ///
    /// Callers validate the counts first; this constructor only debug-asserts
    /// the bounds it relies on for the Cauchy parameters to stay distinct.
    pub(crate) fn new(data: usize, parity: usize) -> Self {
        debug_assert!(data >= 1 && parity >= 1 && data + parity <= 256);

        let mut rows = Vec::with_capacity(data + parity);
        for r in 0..data {
            let mut row = vec![0u8; data];
            row[r] = 1;
            rows.push(row);
        }
        for p in 0..parity {
            // (data + p) and j live in disjoint ranges, so the XOR is never
            // zero and the inverse always exists.
            let x = (data + p) as u8;
            let row = (0..data).map(|j| gf_inv(x ^ j as u8)).collect();
            rows.push(row);
        }

        Self { rows }
    }

    pub(crate) fn row(&self, r: usize) -> &[u8] {
        &self.rows[r]
    }
}

/// Invert a square matrix over GF(2⁸) by Gaussian elimination on `[M | I]`.
///
/// Pivot search is first-nonzero at or below the diagonal, ascending — the
/// tie-break is deterministic and only observable when inversion fails.
/// Returns `None` when a pivot column is all zeros (singular input).
pub(crate) fn invert(matrix: &[Vec<u8>]) -> Option<Vec<Vec<u8>>> {
    let size = matrix.len();
    let mut aug: Vec<Vec<u8>> = matrix
        .iter()
        .enumerate()
        .map(|(i, row)| {
            debug_assert_eq!(row.len(), size);
            let mut r = Vec::with_capacity(size * 2);
            r.extend_from_slice(row);
            r.extend((0..size).map(|j| u8::from(i == j)));
            r
        })
        .collect();

    for col in 0..size {
        let pivot = (col..size).find(|&r| aug[r][col] != 0)?;
        if pivot != col {
            aug.swap(pivot, col);
        }

        let scale = gf_inv(aug[col][col]);
        for v in &mut aug[col] {
            *v = gf_mul(*v, scale);
        }

        for r in 0..size {
            let factor = aug[r][col];
            if r == col || factor == 0 {
                continue;
            }
            // Field addition is XOR, so eliminating is XOR-adding the
            // scaled pivot row.
            let (pivot_row, target) = if r < col {
                let (head, tail) = aug.split_at_mut(col);
                (&tail[0], &mut head[r])
            } else {
                let (head, tail) = aug.split_at_mut(r);
                (&head[col], &mut tail[0])
            };
            for (t, &p) in target.iter_mut().zip(pivot_row.iter()) {
                *t ^= gf_mul(factor, p);
            }
        }
    }

    Some(
        aug.into_iter()
            .map(|row| row[size..].to_vec())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multiply(a: &[Vec<u8>], b: &[Vec<u8>]) -> Vec<Vec<u8>> {
        let n = a.len();
        (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| (0..n).fold(0u8, |acc, t| acc ^ gf_mul(a[i][t], b[t][j])))
                    .collect()
            })
            .collect()
    }

    fn identity(n: usize) -> Vec<Vec<u8>> {
        (0..n)
            .map(|i| (0..n).map(|j| u8::from(i == j)).collect())
            .collect()
    }

    #[test]
    fn top_block_is_identity() {
        let e = EncodeMatrix::new(4, 2);
        for r in 0..4 {
            for c in 0..4 {
                assert_eq!(e.row(r)[c], u8::from(r == c));
            }
        }
    }

    #[test]
    fn parity_rows_have_no_zero_entries() {
        let e = EncodeMatrix::new(8, 4);
        for r in 8..12 {
            assert!(e.row(r).iter().all(|&v| v != 0));
        }
    }

    #[test]
    fn invert_identity() {
        let inv = invert(&identity(5)).unwrap();
        assert_eq!(inv, identity(5));
    }

    #[test]
    fn invert_singular_returns_none() {
        // Two equal rows.
        let m = vec![vec![1, 2], vec![1, 2]];
        assert!(invert(&m).is_none());
    }

    #[test]
    fn inverse_times_original_is_identity() {
        let e = EncodeMatrix::new(4, 3);
        // A mixed selection of data and parity rows.
        let selection = [0usize, 2, 5, 6];
        let m: Vec<Vec<u8>> = selection.iter().map(|&r| e.row(r).to_vec()).collect();
        let inv = invert(&m).unwrap();
        assert_eq!(multiply(&inv, &m), identity(4));
        assert_eq!(multiply(&m, &inv), identity(4));
    }

    /// Every k-row selection of the encode matrix must be invertible; this
    /// is the property the whole decode path rests on.
    #[test]
    fn every_submatrix_is_nonsingular() {
        fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
            let mut out = Vec::new();
            let mut idx: Vec<usize> = (0..k).collect();
            loop {
                out.push(idx.clone());
                let mut i = k;
                loop {
                    if i == 0 {
                        return out;
                    }
                    i -= 1;
                    if idx[i] != i + n - k {
                        break;
                    }
                }
                idx[i] += 1;
                for j in i + 1..k {
                    idx[j] = idx[j - 1] + 1;
                }
            }
        }

        for k in 1..=8usize {
            for m in 1..=4usize {
                let e = EncodeMatrix::new(k, m);
                for rows in combinations(k + m, k) {
                    let sub: Vec<Vec<u8>> = rows.iter().map(|&r| e.row(r).to_vec()).collect();
                    assert!(
                        invert(&sub).is_some(),
                        "singular submatrix for k={k} m={m} rows={rows:?}"
                    );
                }
            }
        }
    }
}
