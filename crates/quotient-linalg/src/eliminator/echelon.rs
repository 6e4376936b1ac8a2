use quotient_rings::traits::EuclideanDomain;

use super::{Eliminator, Strategy};
use crate::ops::ElementaryOperation;
use crate::sparse_matrix::{Alignment, SparseMatrix};

/// Row echelon elimination.
///
/// Rows above `target_row` hold settled pivots; below it every entry left of
/// `target_col` is zero.
#[derive(Debug, Default)]
pub(crate) struct RowEchelon {
    target_row: usize,
    target_col: usize,
}

impl<R: EuclideanDomain> Strategy<R> for RowEchelon {
    fn prepare(&mut self, e: &mut Eliminator<R>) {
        e.align(Alignment::Rows);
    }

    fn is_done(&self, e: &Eliminator<R>) -> bool {
        self.target_row >= e.target().num_lines() || self.target_col >= e.target().num_cols()
    }

    fn iterate(&mut self, e: &mut Eliminator<R>) {
        let candidates: Vec<(usize, R)> = e
            .target()
            .lines()
            .filter(|(i, _)| *i >= self.target_row)
            .filter_map(|(i, line)| match line.first() {
                Some((j, a)) if *j == self.target_col => Some((i, a.clone())),
                _ => None,
            })
            .collect();

        let Some((pivot_row, pivot)) = select_pivot(e.target(), &candidates) else {
            self.target_col += 1;
            return;
        };

        let mut cleared = true;
        for (i, a) in candidates.iter().filter(|(i, _)| *i != pivot_row) {
            let (q, r) = a.div_rem(&pivot);
            e.apply(ElementaryOperation::AddRow {
                at: pivot_row,
                to: *i,
                mul: -q,
            });
            if !r.is_zero() {
                cleared = false;
            }
        }

        // A non-zero remainder has smaller degree than the pivot; retry with it.
        if !cleared {
            return;
        }

        e.normalize_row(pivot_row, &pivot);
        e.apply(ElementaryOperation::SwapRows(pivot_row, self.target_row));
        self.target_row += 1;
        self.target_col += 1;
    }
}

/// A unit if there is one, otherwise the candidate of least degree, ties going
/// to the sparser row.
fn select_pivot<R: EuclideanDomain>(
    matrix: &SparseMatrix<R>,
    candidates: &[(usize, R)],
) -> Option<(usize, R)> {
    if let Some(unit) = candidates.iter().find(|(_, a)| a.is_unit()) {
        return Some(unit.clone());
    }
    candidates
        .iter()
        .min_by(|(i, a), (j, b)| {
            a.cmp_degree(b)
                .then_with(|| row_weight(matrix, *i).cmp(&row_weight(matrix, *j)))
        })
        .cloned()
}

fn row_weight<R: EuclideanDomain>(matrix: &SparseMatrix<R>, i: usize) -> usize {
    matrix
        .line(i)
        .unwrap_or_default()
        .iter()
        .fold(0usize, |acc, (_, a)| acc.saturating_add(a.degree()))
}

/// Column echelon elimination, run as row echelon on the transpose.
#[derive(Debug, Default)]
pub(crate) struct ColEchelon {
    done: bool,
}

impl<R: EuclideanDomain> Strategy<R> for ColEchelon {
    fn is_done(&self, _e: &Eliminator<R>) -> bool {
        self.done
    }

    fn iterate(&mut self, e: &mut Eliminator<R>) {
        e.run_transposed(RowEchelon::default());
        self.done = true;
    }
}
