//! Elementary operations and the log that replays them.
//!
//! Every operation recorded during elimination is unimodular: additions
//! carry arbitrary scalars, but multiplications only ever carry a [`Unit`].
//! This is what lets the inverse transforms be rebuilt by replaying inverse
//! operations instead of inverting a matrix.

use std::ops::Range;

use quotient_rings::traits::EuclideanDomain;

use crate::sparse_matrix::{Alignment, SparseMatrix};

/// A ring unit paired with its inverse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unit<R> {
    value: R,
    inverse: R,
}

impl<R: EuclideanDomain> Unit<R> {
    /// Wraps `value`, or `None` if it is not a unit.
    #[must_use]
    pub fn new(value: R) -> Option<Self> {
        let inverse = value.unit_inverse()?;
        Some(Self { value, inverse })
    }

    /// The multiplicative identity.
    #[must_use]
    pub fn one() -> Self {
        Self {
            value: R::one(),
            inverse: R::one(),
        }
    }

    /// The unit itself.
    #[must_use]
    pub fn value(&self) -> &R {
        &self.value
    }

    /// The inverse unit.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            value: self.inverse.clone(),
            inverse: self.value.clone(),
        }
    }
}

/// An elementary row or column operation.
///
/// `AddRow { at, to, mul }` adds `mul` times row `at` to row `to`; the
/// column variants act on columns the same way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementaryOperation<R> {
    /// Row `to` += `mul` * row `at`.
    AddRow {
        /// Source row.
        at: usize,
        /// Destination row.
        to: usize,
        /// Multiplier.
        mul: R,
    },
    /// Row `at` *= `by`.
    MulRow {
        /// The row.
        at: usize,
        /// The unit multiplier.
        by: Unit<R>,
    },
    /// Exchange two rows.
    SwapRows(usize, usize),
    /// Column `to` += `mul` * column `at`.
    AddCol {
        /// Source column.
        at: usize,
        /// Destination column.
        to: usize,
        /// Multiplier.
        mul: R,
    },
    /// Column `at` *= `by`.
    MulCol {
        /// The column.
        at: usize,
        /// The unit multiplier.
        by: Unit<R>,
    },
    /// Exchange two columns.
    SwapCols(usize, usize),
}

impl<R: EuclideanDomain> ElementaryOperation<R> {
    /// Returns true for row operations.
    #[must_use]
    pub fn is_row_operation(&self) -> bool {
        matches!(self, Self::AddRow { .. } | Self::MulRow { .. } | Self::SwapRows(..))
    }

    /// Returns true for column operations.
    #[must_use]
    pub fn is_col_operation(&self) -> bool {
        !self.is_row_operation()
    }

    /// Returns true if applying the operation changes nothing.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        match self {
            Self::AddRow { mul, .. } | Self::AddCol { mul, .. } => mul.is_zero(),
            Self::MulRow { by, .. } | Self::MulCol { by, .. } => by.value().is_one(),
            Self::SwapRows(i, j) | Self::SwapCols(i, j) => i == j,
        }
    }

    /// The operation undoing this one.
    #[must_use]
    pub fn inverse(&self) -> Self {
        match self {
            Self::AddRow { at, to, mul } => Self::AddRow {
                at: *at,
                to: *to,
                mul: -mul.clone(),
            },
            Self::AddCol { at, to, mul } => Self::AddCol {
                at: *at,
                to: *to,
                mul: -mul.clone(),
            },
            Self::MulRow { at, by } => Self::MulRow {
                at: *at,
                by: by.inverse(),
            },
            Self::MulCol { at, by } => Self::MulCol {
                at: *at,
                by: by.inverse(),
            },
            Self::SwapRows(..) | Self::SwapCols(..) => self.clone(),
        }
    }

    /// The same operation acting on the other side (row kind ↔ column kind).
    #[must_use]
    pub fn transpose(&self) -> Self {
        match self {
            Self::AddRow { at, to, mul } => Self::AddCol {
                at: *at,
                to: *to,
                mul: mul.clone(),
            },
            Self::AddCol { at, to, mul } => Self::AddRow {
                at: *at,
                to: *to,
                mul: mul.clone(),
            },
            Self::MulRow { at, by } => Self::MulCol {
                at: *at,
                by: by.clone(),
            },
            Self::MulCol { at, by } => Self::MulRow {
                at: *at,
                by: by.clone(),
            },
            Self::SwapRows(i, j) => Self::SwapCols(*i, *j),
            Self::SwapCols(i, j) => Self::SwapRows(*i, *j),
        }
    }

    /// Determinant of the corresponding elementary matrix.
    #[must_use]
    pub fn determinant(&self) -> R {
        match self {
            Self::AddRow { .. } | Self::AddCol { .. } => R::one(),
            Self::MulRow { by, .. } | Self::MulCol { by, .. } => by.value().clone(),
            Self::SwapRows(..) | Self::SwapCols(..) => -R::one(),
        }
    }

    /// Applies the operation to a matrix in place.
    pub fn apply(&self, matrix: &mut SparseMatrix<R>) {
        match self {
            Self::AddRow { at, to, mul } => matrix.add_row(*at, *to, mul),
            Self::AddCol { at, to, mul } => matrix.add_col(*at, *to, mul),
            Self::MulRow { at, by } => matrix.multiply_row(*at, by.value()),
            Self::MulCol { at, by } => matrix.multiply_col(*at, by.value()),
            Self::SwapRows(i, j) => matrix.swap_rows(*i, *j),
            Self::SwapCols(i, j) => matrix.swap_cols(*i, *j),
        }
    }
}

/// Ordered row and column operations of one elimination run.
///
/// With row operations `E_1, ..., E_k` and column operations `F_1, ..., F_l`
/// the run computed `L·A·R` where `L = E_k⋯E_1` and `R = F_1⋯F_l`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OperationLog<R> {
    row_ops: Vec<ElementaryOperation<R>>,
    col_ops: Vec<ElementaryOperation<R>>,
}

impl<R: EuclideanDomain> OperationLog<R> {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self {
            row_ops: Vec::new(),
            col_ops: Vec::new(),
        }
    }

    /// Records an operation on the side it acts on.
    pub fn push(&mut self, op: ElementaryOperation<R>) {
        if op.is_row_operation() {
            self.row_ops.push(op);
        } else {
            self.col_ops.push(op);
        }
    }

    /// Appends the operations of a run made on the transposed matrix,
    /// transposing each one back.
    pub fn append_transposed(&mut self, other: Self) {
        self.row_ops.extend(other.col_ops.iter().map(ElementaryOperation::transpose));
        self.col_ops.extend(other.row_ops.iter().map(ElementaryOperation::transpose));
    }

    /// Row operations in application order.
    #[must_use]
    pub fn row_ops(&self) -> &[ElementaryOperation<R>] {
        &self.row_ops
    }

    /// Column operations in application order.
    #[must_use]
    pub fn col_ops(&self) -> &[ElementaryOperation<R>] {
        &self.col_ops
    }

    /// Total number of operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.row_ops.len() + self.col_ops.len()
    }

    /// Returns true if no operation was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_ops.is_empty() && self.col_ops.is_empty()
    }

    /// The n×n left transform `L`.
    #[must_use]
    pub fn left(&self, n: usize) -> SparseMatrix<R> {
        let mut p = SparseMatrix::identity(n);
        for op in &self.row_ops {
            op.apply(&mut p);
        }
        p
    }

    /// `L⁻¹`, or only its columns in `cols`.
    ///
    /// Replays the inverse operations in reverse order.
    #[must_use]
    pub fn left_inverse(&self, n: usize, cols: Option<Range<usize>>) -> SparseMatrix<R> {
        let mut p = SparseMatrix::identity(n);
        if let Some(cols) = cols {
            p = p.submatrix_cols(cols);
        }
        for op in self.row_ops.iter().rev() {
            op.inverse().apply(&mut p);
        }
        p
    }

    /// The n×n right transform `R`.
    #[must_use]
    pub fn right(&self, n: usize) -> SparseMatrix<R> {
        let mut p = SparseMatrix::identity(n).with_alignment(Alignment::Cols);
        for op in &self.col_ops {
            op.apply(&mut p);
        }
        p
    }

    /// `R⁻¹`, or only its rows in `rows`.
    ///
    /// Replays the inverse operations in reverse order.
    #[must_use]
    pub fn right_inverse(&self, n: usize, rows: Option<Range<usize>>) -> SparseMatrix<R> {
        let mut p = SparseMatrix::identity(n).with_alignment(Alignment::Cols);
        if let Some(rows) = rows {
            p = p.submatrix_rows(rows);
        }
        for op in self.col_ops.iter().rev() {
            op.inverse().apply(&mut p);
        }
        p
    }

    /// `det(L)⁻¹ · det(R)⁻¹`, a unit.
    #[must_use]
    pub fn inverse_determinant(&self) -> R {
        self.row_ops
            .iter()
            .chain(&self.col_ops)
            .fold(R::one(), |acc, op| acc * op.inverse().determinant())
    }
}
