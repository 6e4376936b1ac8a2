//! Reduction of sparse matrices to echelon, Hermite, diagonal and Smith form.
//!
//! An [`Eliminator`] owns the matrix being reduced together with the log of
//! every operation applied to it. Each target form is a [`Strategy`] run by
//! the same driver loop:
//!
//! ```text
//! prepare; while !is_done { iterate }; finish
//! ```
//!
//! Strategies compose: Hermite runs echelon in its `prepare`, diagonal
//! alternates row and column Hermite, Smith runs diagonal first. Column forms
//! run the row algorithm on the transposed matrix and transpose the logged
//! operations back.

mod diagonal;
mod echelon;
mod hermite;
mod smith;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use quotient_rings::traits::EuclideanDomain;

use crate::ops::{ElementaryOperation, OperationLog, Unit};
use crate::result::EliminationResult;
use crate::sparse_matrix::{Alignment, ParallelConfig, SparseMatrix};

use diagonal::Diagonal;
use echelon::{ColEchelon, RowEchelon};
use hermite::{ColHermite, RowHermite};
use smith::Smith;

/// The normal form an elimination reduces to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatrixForm {
    /// Row echelon form: `L·A` with leading entries moving strictly right.
    RowEchelon,
    /// Column echelon form: `A·R`, the transpose of a row echelon form.
    ColEchelon,
    /// Row echelon form with entries above each pivot reduced modulo it.
    RowHermite,
    /// Column echelon form with entries left of each pivot reduced modulo it.
    ColHermite,
    /// Normalized entries on the leading diagonal only.
    Diagonal,
    /// Diagonal form whose entries divide their successors.
    #[default]
    Smith,
}

impl MatrixForm {
    /// Returns true for forms produced by row operations only.
    #[must_use]
    pub fn is_row_form(self) -> bool {
        matches!(self, Self::RowEchelon | Self::RowHermite)
    }

    /// Returns true for forms produced by column operations only.
    #[must_use]
    pub fn is_col_form(self) -> bool {
        matches!(self, Self::ColEchelon | Self::ColHermite)
    }

    /// Returns true for the diagonal and Smith forms.
    #[must_use]
    pub fn is_diagonal(self) -> bool {
        matches!(self, Self::Diagonal | Self::Smith)
    }
}

/// Options for a single elimination run.
#[derive(Clone, Debug, Default)]
pub struct EliminationConfig {
    /// Target form.
    pub form: MatrixForm,
    /// Parallelism of the matrix products behind derived views.
    pub parallel: ParallelConfig,
}

impl EliminationConfig {
    /// Configuration for `form` with default parallelism.
    #[must_use]
    pub fn new(form: MatrixForm) -> Self {
        Self {
            form,
            parallel: ParallelConfig::default(),
        }
    }
}

/// A reduction step driven by [`Eliminator::run`].
pub(crate) trait Strategy<R: EuclideanDomain> {
    fn prepare(&mut self, _e: &mut Eliminator<R>) {}

    fn is_done(&self, e: &Eliminator<R>) -> bool;

    fn iterate(&mut self, e: &mut Eliminator<R>);

    fn finish(&mut self, _e: &mut Eliminator<R>) {}
}

/// The matrix under reduction and the operations applied so far.
pub(crate) struct Eliminator<R> {
    target: SparseMatrix<R>,
    log: OperationLog<R>,
}

impl<R: EuclideanDomain> Eliminator<R> {
    pub(crate) fn new(target: SparseMatrix<R>) -> Self {
        Self {
            target,
            log: OperationLog::new(),
        }
    }

    pub(crate) fn target(&self) -> &SparseMatrix<R> {
        &self.target
    }

    pub(crate) fn into_parts(self) -> (SparseMatrix<R>, OperationLog<R>) {
        (self.target, self.log)
    }

    pub(crate) fn run<S: Strategy<R>>(&mut self, mut strategy: S) {
        strategy.prepare(self);
        while !strategy.is_done(self) {
            strategy.iterate(self);
        }
        strategy.finish(self);
    }

    /// Runs `strategy` on the transpose, then transposes the matrix and every
    /// logged operation back.
    pub(crate) fn run_transposed<S: Strategy<R>>(&mut self, strategy: S) {
        let (rows, cols) = (self.target.num_rows(), self.target.num_cols());
        let target = std::mem::replace(&mut self.target, SparseMatrix::zero(rows, cols));

        trace!(rows = cols, cols = rows, "running on transpose");
        let mut sub = Eliminator::new(target.transposed());
        sub.run(strategy);

        let (target, log) = sub.into_parts();
        self.target = target.transposed();
        self.log.append_transposed(log);
    }

    pub(crate) fn run_form(&mut self, form: MatrixForm) {
        match form {
            MatrixForm::RowEchelon => self.run(RowEchelon::default()),
            MatrixForm::ColEchelon => self.run(ColEchelon::default()),
            MatrixForm::RowHermite => self.run(RowHermite::default()),
            MatrixForm::ColHermite => self.run(ColHermite::default()),
            MatrixForm::Diagonal => self.run(Diagonal),
            MatrixForm::Smith => self.run(Smith::default()),
        }
    }

    /// Applies and records `op`. Operations that change nothing are dropped.
    pub(crate) fn apply(&mut self, op: ElementaryOperation<R>) {
        if op.is_identity() {
            return;
        }
        trace!(?op, "apply");
        op.apply(&mut self.target);
        self.log.push(op);
    }

    /// Scales row `i`, whose leading entry is `a`, so that `a` is normalized.
    pub(crate) fn normalize_row(&mut self, i: usize, a: &R) {
        if let Some(by) = Unit::new(a.normalizing_unit()) {
            self.apply(ElementaryOperation::MulRow { at: i, by });
        }
    }

    pub(crate) fn align(&mut self, alignment: Alignment) {
        self.target.set_alignment(alignment);
    }
}

impl<R: EuclideanDomain> SparseMatrix<R> {
    /// Reduces a copy of this matrix to `form`.
    ///
    /// ```
    /// use quotient_linalg::{MatrixForm, SparseMatrix};
    /// use quotient_rings::Z;
    ///
    /// let a = SparseMatrix::from_rows(vec![
    ///     vec![Z::new(2), Z::new(0)],
    ///     vec![Z::new(0), Z::new(3)],
    /// ]);
    /// let e = a.eliminate(MatrixForm::Smith);
    /// assert_eq!(e.diagonal().unwrap(), &[Z::new(1), Z::new(6)]);
    /// ```
    #[must_use]
    pub fn eliminate(&self, form: MatrixForm) -> EliminationResult<R> {
        self.eliminate_with(&EliminationConfig::new(form))
    }

    /// Reduces a copy of this matrix as configured.
    #[must_use]
    pub fn eliminate_with(&self, config: &EliminationConfig) -> EliminationResult<R> {
        debug!(
            form = ?config.form,
            rows = self.num_rows(),
            cols = self.num_cols(),
            nnz = self.nnz(),
            "elimination started"
        );

        let mut eliminator = Eliminator::new(self.clone());
        eliminator.run_form(config.form);
        let (result, log) = eliminator.into_parts();

        debug!(
            form = ?config.form,
            row_ops = log.row_ops().len(),
            col_ops = log.col_ops().len(),
            "elimination finished"
        );

        EliminationResult::new(config.form, result, log, config.parallel.clone())
    }
}
