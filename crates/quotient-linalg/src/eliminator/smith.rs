use quotient_rings::traits::EuclideanDomain;

use super::diagonal::Diagonal;
use super::{Eliminator, Strategy};
use crate::ops::ElementaryOperation;

/// Smith normal form: a diagonal form whose entries divide their successors.
///
/// Positions before `target_index` hold settled invariant factors.
#[derive(Debug, Default)]
pub(crate) struct Smith {
    target_index: usize,
}

impl<R: EuclideanDomain> Strategy<R> for Smith {
    fn prepare(&mut self, e: &mut Eliminator<R>) {
        e.run(Diagonal);
    }

    fn is_done(&self, e: &Eliminator<R>) -> bool {
        self.target_index >= e.target().nnz()
    }

    fn iterate(&mut self, e: &mut Eliminator<R>) {
        let rank = e.target().nnz();
        let diagonal: Vec<(usize, R)> = (self.target_index..rank)
            .map(|i| (i, e.target().entry(i, i)))
            .collect();

        let Some((i, a)) = diagonal
            .iter()
            .min_by(|(_, a), (_, b)| a.cmp_degree(b))
            .cloned()
        else {
            self.target_index = rank;
            return;
        };

        if !a.is_unit() {
            let offender = diagonal
                .iter()
                .find(|(j, b)| *j != i && !a.divides(b))
                .cloned();
            if let Some((j, b)) = offender {
                diagonal_gcd(e, (i, &a), (j, &b));
                return;
            }
        }

        e.normalize_row(i, &a);
        e.apply(ElementaryOperation::SwapRows(i, self.target_index));
        e.apply(ElementaryOperation::SwapCols(i, self.target_index));
        self.target_index += 1;
    }
}

/// Replaces diagonal entries `a` at `i` and `b` at `j` by `gcd(a, b)` at `i`
/// and `-ab / gcd(a, b)` at `j`.
///
/// With `r = p·a + q·b`:
///
/// ```text
/// [a 0]  →  [a  0]  →  [a 0]  →  [0 -ab/r]  →  [0 -ab/r]  →  [r    0 ]
/// [0 b]     [pa b]     [r b]     [r   b  ]     [r   0   ]     [0 -ab/r]
/// ```
fn diagonal_gcd<R: EuclideanDomain>(
    e: &mut Eliminator<R>,
    (i, a): (usize, &R),
    (j, b): (usize, &R),
) {
    let (r, p, q) = a.extended_gcd(b);

    e.apply(ElementaryOperation::AddRow { at: i, to: j, mul: p });
    e.apply(ElementaryOperation::AddCol { at: j, to: i, mul: q });
    e.apply(ElementaryOperation::AddRow {
        at: j,
        to: i,
        mul: -a.div(&r),
    });
    e.apply(ElementaryOperation::AddCol {
        at: i,
        to: j,
        mul: -b.div(&r),
    });
    e.apply(ElementaryOperation::SwapRows(i, j));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse_matrix::SparseMatrix;
    use quotient_rings::integers::Z;

    fn diag(rows: usize, cols: usize, entries: &[i64]) -> SparseMatrix<Z> {
        let triplets: Vec<_> = entries
            .iter()
            .enumerate()
            .map(|(i, &d)| (i, i, Z::new(d)))
            .collect();
        SparseMatrix::from_triplets(rows, cols, &triplets)
    }

    #[test]
    fn test_diagonal_gcd() {
        let a = diag(2, 2, &[4, 6]);
        let mut e = Eliminator::new(a.clone());
        diagonal_gcd(&mut e, (0, &Z::new(4)), (1, &Z::new(6)));
        let (result, log) = e.into_parts();

        assert_eq!(result, diag(2, 2, &[2, -12]));
        assert_eq!(&(&log.left(2) * &a) * &log.right(2), result);
    }

    #[test]
    fn test_smith_orders_by_divisibility() {
        let a = diag(3, 4, &[6, 4, 1]);
        let mut e = Eliminator::new(a.clone());
        e.run(Smith::default());
        let (result, log) = e.into_parts();

        assert_eq!(result, diag(3, 4, &[1, 2, 12]));
        assert_eq!(&(&log.left(3) * &a) * &log.right(4), result);
    }
}
