use quotient_rings::traits::EuclideanDomain;

use super::hermite::{ColHermite, RowHermite};
use super::{Eliminator, Strategy};

/// Alternates row and column Hermite elimination until the only non-zero
/// entries are normalized and sit at `(0, 0), …, (r-1, r-1)`.
///
/// Each round either finishes or strictly lowers the degree of some pivot.
#[derive(Debug, Default)]
pub(crate) struct Diagonal;

impl<R: EuclideanDomain> Strategy<R> for Diagonal {
    fn is_done(&self, e: &Eliminator<R>) -> bool {
        let target = e.target();
        let nnz = target.nnz();
        target
            .entries()
            .all(|(i, j, a)| i == j && i < nnz && a.normalizing_unit().is_one())
    }

    fn iterate(&mut self, e: &mut Eliminator<R>) {
        e.run(RowHermite::default());
        if <Self as Strategy<R>>::is_done(self, e) {
            return;
        }
        e.run(ColHermite::default());
    }
}
