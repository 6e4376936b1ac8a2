use quotient_rings::traits::EuclideanDomain;

use super::echelon::RowEchelon;
use super::{Eliminator, Strategy};
use crate::ops::ElementaryOperation;

/// Row Hermite elimination: row echelon, then every entry above a pivot is
/// reduced modulo that pivot.
#[derive(Debug, Default)]
pub(crate) struct RowHermite {
    target_row: usize,
    target_col: usize,
    rank: usize,
}

impl<R: EuclideanDomain> Strategy<R> for RowHermite {
    fn prepare(&mut self, e: &mut Eliminator<R>) {
        e.run(RowEchelon::default());
        self.rank = e.target().num_lines();
    }

    fn is_done(&self, e: &Eliminator<R>) -> bool {
        self.target_row >= self.rank || self.target_col >= e.target().num_cols()
    }

    fn iterate(&mut self, e: &mut Eliminator<R>) {
        let Some(pivot) = e.target().get(self.target_row, self.target_col).cloned() else {
            self.target_col += 1;
            return;
        };

        let above: Vec<(usize, R)> = e
            .target()
            .col_iter(self.target_col)
            .filter(|(i, _)| *i < self.target_row)
            .map(|(i, a)| (i, a.clone()))
            .collect();

        for (i, a) in above {
            let q = a.div(&pivot);
            e.apply(ElementaryOperation::AddRow {
                at: self.target_row,
                to: i,
                mul: -q,
            });
        }

        self.target_row += 1;
        self.target_col += 1;
    }
}

/// Column Hermite elimination, run as row Hermite on the transpose.
#[derive(Debug, Default)]
pub(crate) struct ColHermite {
    done: bool,
}

impl<R: EuclideanDomain> Strategy<R> for ColHermite {
    fn is_done(&self, _e: &Eliminator<R>) -> bool {
        self.done
    }

    fn iterate(&mut self, e: &mut Eliminator<R>) {
        e.run_transposed(RowHermite::default());
        self.done = true;
    }
}
