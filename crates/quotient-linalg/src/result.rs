//! The outcome of an elimination run and the matrices derived from it.
//!
//! Writing `L` for the accumulated row operations and `R` for the column
//! operations, a run on `A` produced `L·A·R`. Every derived matrix is built
//! on first request and cached.

use std::sync::OnceLock;

use quotient_rings::traits::EuclideanDomain;

use crate::eliminator::MatrixForm;
use crate::error::{LinalgError, Result};
use crate::ops::{ElementaryOperation, OperationLog};
use crate::sparse_matrix::{ParallelConfig, SparseMatrix};

/// An immutable elimination result with lazily derived transforms.
#[derive(Clone, Debug)]
pub struct EliminationResult<R> {
    form: MatrixForm,
    result: SparseMatrix<R>,
    log: OperationLog<R>,
    parallel: ParallelConfig,

    diagonal: OnceLock<Vec<R>>,
    left: OnceLock<SparseMatrix<R>>,
    left_inverse: OnceLock<SparseMatrix<R>>,
    right: OnceLock<SparseMatrix<R>>,
    right_inverse: OnceLock<SparseMatrix<R>>,
    kernel: OnceLock<SparseMatrix<R>>,
    kernel_transition: OnceLock<SparseMatrix<R>>,
    image: OnceLock<SparseMatrix<R>>,
    image_transition: OnceLock<SparseMatrix<R>>,
    inverse: OnceLock<Option<SparseMatrix<R>>>,
}

impl<R: EuclideanDomain> EliminationResult<R> {
    pub(crate) fn new(
        form: MatrixForm,
        result: SparseMatrix<R>,
        log: OperationLog<R>,
        parallel: ParallelConfig,
    ) -> Self {
        Self {
            form,
            result,
            log,
            parallel,
            diagonal: OnceLock::new(),
            left: OnceLock::new(),
            left_inverse: OnceLock::new(),
            right: OnceLock::new(),
            right_inverse: OnceLock::new(),
            kernel: OnceLock::new(),
            kernel_transition: OnceLock::new(),
            image: OnceLock::new(),
            image_transition: OnceLock::new(),
            inverse: OnceLock::new(),
        }
    }

    /// The form the matrix was reduced to.
    #[must_use]
    pub fn form(&self) -> MatrixForm {
        self.form
    }

    /// The reduced matrix `L·A·R`.
    #[must_use]
    pub fn result(&self) -> &SparseMatrix<R> {
        &self.result
    }

    /// Consumes the result, returning the reduced matrix.
    #[must_use]
    pub fn into_result(self) -> SparseMatrix<R> {
        self.result
    }

    /// The full operation log.
    #[must_use]
    pub fn log(&self) -> &OperationLog<R> {
        &self.log
    }

    /// Row operations in application order.
    #[must_use]
    pub fn row_operations(&self) -> &[ElementaryOperation<R>] {
        self.log.row_ops()
    }

    /// Column operations in application order.
    #[must_use]
    pub fn col_operations(&self) -> &[ElementaryOperation<R>] {
        self.log.col_ops()
    }

    /// Rank of the original matrix.
    #[must_use]
    pub fn rank(&self) -> usize {
        match self.form {
            MatrixForm::RowEchelon | MatrixForm::RowHermite => self.result.nonzero_rows(),
            MatrixForm::ColEchelon | MatrixForm::ColHermite => self.result.nonzero_cols(),
            MatrixForm::Diagonal | MatrixForm::Smith => self.result.nnz(),
        }
    }

    /// Dimension of the kernel: `cols - rank`.
    #[must_use]
    pub fn nullity(&self) -> usize {
        self.result.num_cols() - self.rank()
    }

    /// The non-zero diagonal entries `d_0, …, d_{rank-1}`.
    ///
    /// # Errors
    ///
    /// [`LinalgError::UnsupportedForm`] unless the form is diagonal or Smith.
    pub fn diagonal(&self) -> Result<&[R]> {
        self.require_diagonal("diagonal")?;
        Ok(self
            .diagonal
            .get_or_init(|| (0..self.rank()).map(|i| self.result.entry(i, i)).collect()))
    }

    /// The rows×rows left transform `L`.
    #[must_use]
    pub fn left(&self) -> &SparseMatrix<R> {
        self.left.get_or_init(|| self.log.left(self.result.num_rows()))
    }

    /// `L⁻¹`.
    #[must_use]
    pub fn left_inverse(&self) -> &SparseMatrix<R> {
        self.left_inverse
            .get_or_init(|| self.log.left_inverse(self.result.num_rows(), None))
    }

    /// The cols×cols right transform `R`.
    #[must_use]
    pub fn right(&self) -> &SparseMatrix<R> {
        self.right.get_or_init(|| self.log.right(self.result.num_cols()))
    }

    /// `R⁻¹`.
    #[must_use]
    pub fn right_inverse(&self) -> &SparseMatrix<R> {
        self.right_inverse
            .get_or_init(|| self.log.right_inverse(self.result.num_cols(), None))
    }

    /// A basis of the kernel as the columns of a cols×nullity matrix `Z`.
    ///
    /// # Errors
    ///
    /// [`LinalgError::UnsupportedForm`] for row forms, which carry no column
    /// operations.
    pub fn kernel_matrix(&self) -> Result<&SparseMatrix<R>> {
        self.require_kernel("kernel matrix")?;
        let (rank, cols) = (self.rank(), self.result.num_cols());
        Ok(self
            .kernel
            .get_or_init(|| self.right().submatrix_cols(rank..cols)))
    }

    /// A nullity×cols matrix `T` with `T·Z = I`, mapping kernel vectors to
    /// their coordinates in the kernel basis.
    ///
    /// # Errors
    ///
    /// [`LinalgError::UnsupportedForm`] for row forms.
    pub fn kernel_transition_matrix(&self) -> Result<&SparseMatrix<R>> {
        self.require_kernel("kernel transition matrix")?;
        let (rank, cols) = (self.rank(), self.result.num_cols());
        Ok(self
            .kernel_transition
            .get_or_init(|| self.log.right_inverse(cols, Some(rank..cols))))
    }

    /// A basis of the image as the columns of a rows×rank matrix.
    ///
    /// For diagonal forms this is `L⁻¹[:, 0..r] · D`; for column forms it is
    /// the leading `r` columns of the result.
    ///
    /// # Errors
    ///
    /// [`LinalgError::UnsupportedForm`] for row forms.
    pub fn image_matrix(&self) -> Result<&SparseMatrix<R>> {
        if self.form.is_row_form() {
            return Err(self.unsupported("image matrix"));
        }
        let rank = self.rank();
        Ok(self.image.get_or_init(|| {
            if self.form.is_col_form() {
                return self.result.submatrix_cols(0..rank);
            }
            let basis = self.log.left_inverse(self.result.num_rows(), Some(0..rank));
            let d = self.result.submatrix(0..rank, 0..rank);
            basis.mul_with(&d, &self.parallel)
        }))
    }

    /// `L[0..r, :]`: coordinates of image vectors with respect to the
    /// columns of `L⁻¹[:, 0..r]`.
    ///
    /// # Errors
    ///
    /// [`LinalgError::UnsupportedForm`] unless the form is diagonal or Smith.
    pub fn image_transition_matrix(&self) -> Result<&SparseMatrix<R>> {
        self.require_diagonal("image transition matrix")?;
        let rank = self.rank();
        Ok(self
            .image_transition
            .get_or_init(|| self.left().submatrix_rows(0..rank)))
    }

    /// Determinant of the original matrix.
    ///
    /// The result of a square matrix is triangular in every form, so this
    /// is the product of its diagonal divided by `det(L)·det(R)`.
    ///
    /// # Errors
    ///
    /// [`LinalgError::DimensionMismatch`] if the matrix is not square.
    pub fn determinant(&self) -> Result<R> {
        self.require_square()?;
        let n = self.result.num_rows();
        let product = (0..n).fold(R::one(), |acc, i| acc * self.result.entry(i, i));
        Ok(product * self.log.inverse_determinant())
    }

    /// The inverse `R·D⁻¹·L`, or `None` if the matrix is not invertible.
    ///
    /// # Errors
    ///
    /// [`LinalgError::DimensionMismatch`] if the matrix is not square and
    /// [`LinalgError::UnsupportedForm`] unless the form is diagonal or Smith.
    pub fn inverse(&self) -> Result<Option<&SparseMatrix<R>>> {
        self.require_square()?;
        self.require_diagonal("inverse")?;
        let inverse = self.inverse.get_or_init(|| {
            let n = self.result.num_rows();
            if self.rank() < n {
                return None;
            }
            let d_inv = (0..n)
                .map(|i| self.result.entry(i, i).unit_inverse().map(|u| (i, i, u)))
                .collect::<Option<Vec<_>>>()?;
            let d_inv = SparseMatrix::from_triplets(n, n, &d_inv);
            let rd = self.right().mul_with(&d_inv, &self.parallel);
            Some(rd.mul_with(self.left(), &self.parallel))
        });
        Ok(inverse.as_ref())
    }

    /// Returns true if the matrix is injective as a map on column vectors.
    #[must_use]
    pub fn is_injective(&self) -> bool {
        let (rows, cols) = (self.result.num_rows(), self.result.num_cols());
        cols <= rows && self.rank() == cols
    }

    /// Returns true if the matrix is surjective as a map on column vectors.
    ///
    /// # Errors
    ///
    /// [`LinalgError::UnsupportedForm`] unless the form is diagonal or Smith.
    pub fn is_surjective(&self) -> Result<bool> {
        let diagonal = self.diagonal()?;
        let (rows, cols) = (self.result.num_rows(), self.result.num_cols());
        Ok(rows <= cols && self.rank() == rows && diagonal.iter().all(R::is_unit))
    }

    /// Returns true if the matrix is invertible.
    ///
    /// # Errors
    ///
    /// [`LinalgError::UnsupportedForm`] unless the form is diagonal or Smith.
    pub fn is_bijective(&self) -> Result<bool> {
        Ok(self.is_injective() && self.is_surjective()?)
    }

    fn unsupported(&self, view: &'static str) -> LinalgError {
        LinalgError::UnsupportedForm {
            view,
            form: self.form,
        }
    }

    fn require_diagonal(&self, view: &'static str) -> Result<()> {
        if self.form.is_diagonal() {
            Ok(())
        } else {
            Err(self.unsupported(view))
        }
    }

    fn require_kernel(&self, view: &'static str) -> Result<()> {
        if self.form.is_row_form() {
            Err(self.unsupported(view))
        } else {
            Ok(())
        }
    }

    fn require_square(&self) -> Result<()> {
        if self.result.is_square() {
            Ok(())
        } else {
            Err(LinalgError::DimensionMismatch {
                expected: "a square matrix".to_string(),
                found: format!("{}×{}", self.result.num_rows(), self.result.num_cols()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotient_rings::integers::Z;

    fn z(rows: &[&[i64]]) -> SparseMatrix<Z> {
        SparseMatrix::from_rows(
            rows.iter()
                .map(|row| row.iter().map(|&v| Z::new(v)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_rank_per_form() {
        let a = z(&[&[1, 2, 3], &[2, 4, 6], &[1, 0, 1]]);
        for form in [
            MatrixForm::RowEchelon,
            MatrixForm::ColEchelon,
            MatrixForm::RowHermite,
            MatrixForm::ColHermite,
            MatrixForm::Diagonal,
            MatrixForm::Smith,
        ] {
            let e = a.eliminate(form);
            assert_eq!(e.rank(), 2, "{form:?}");
            assert_eq!(e.nullity(), 1, "{form:?}");
        }
    }

    #[test]
    fn test_unsupported_views() {
        let e = z(&[&[1, 2], &[3, 4]]).eliminate(MatrixForm::RowEchelon);
        assert_eq!(
            e.kernel_matrix().unwrap_err(),
            LinalgError::UnsupportedForm {
                view: "kernel matrix",
                form: MatrixForm::RowEchelon,
            }
        );
        assert!(e.image_matrix().is_err());
        assert!(e.diagonal().is_err());
        assert!(e.inverse().is_err());
        assert!(e.is_surjective().is_err());
    }

    #[test]
    fn test_kernel_and_transition() {
        let a = z(&[&[1, 2, 3], &[2, 4, 6]]);
        for form in [MatrixForm::ColEchelon, MatrixForm::ColHermite, MatrixForm::Smith] {
            let e = a.eliminate(form);
            let kernel = e.kernel_matrix().unwrap();
            assert_eq!(kernel.num_cols(), 2, "{form:?}");
            assert!((&a * kernel).is_zero(), "{form:?}");

            let t = e.kernel_transition_matrix().unwrap();
            assert_eq!(t * kernel, SparseMatrix::identity(2), "{form:?}");
        }
    }

    #[test]
    fn test_image_spans_columns() {
        let a = z(&[&[2, 0], &[0, 4], &[0, 0]]);
        let e = a.eliminate(MatrixForm::Smith);
        let image = e.image_matrix().unwrap();
        assert_eq!(image.num_rows(), 3);
        assert_eq!(image.num_cols(), 2);

        // L·image recovers the leading diagonal block.
        let coords = e.image_transition_matrix().unwrap() * image;
        assert_eq!(coords, z(&[&[2, 0], &[0, 4]]));

        let e = a.eliminate(MatrixForm::ColEchelon);
        assert_eq!(e.image_matrix().unwrap(), &e.result().submatrix_cols(0..2));
    }

    #[test]
    fn test_determinant_and_inverse() {
        let a = z(&[&[2, 1], &[1, 1]]);
        for form in [MatrixForm::RowEchelon, MatrixForm::ColHermite, MatrixForm::Smith] {
            assert_eq!(a.eliminate(form).determinant().unwrap(), Z::new(1), "{form:?}");
        }

        let e = a.eliminate(MatrixForm::Smith);
        let inv = e.inverse().unwrap().unwrap();
        assert_eq!(&a * inv, SparseMatrix::identity(2));
        assert!(e.is_bijective().unwrap());

        let b = z(&[&[2, 0], &[0, 3]]);
        let e = b.eliminate(MatrixForm::Smith);
        assert_eq!(e.determinant().unwrap(), Z::new(6));
        assert_eq!(e.inverse().unwrap(), None);
        assert!(e.is_injective());
        assert!(!e.is_surjective().unwrap());
    }

    #[test]
    fn test_determinant_of_swapped_rows() {
        let a = z(&[&[0, 1], &[1, 0]]);
        assert_eq!(a.eliminate(MatrixForm::RowEchelon).determinant().unwrap(), Z::new(-1));
        assert_eq!(a.eliminate(MatrixForm::Smith).determinant().unwrap(), Z::new(-1));
    }

    #[test]
    fn test_determinant_requires_square() {
        let e = z(&[&[1, 2, 3]]).eliminate(MatrixForm::Smith);
        assert!(matches!(
            e.determinant(),
            Err(LinalgError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_shape_predicates() {
        let wide = z(&[&[1, 0, 0], &[0, 1, 0]]).eliminate(MatrixForm::Smith);
        assert!(!wide.is_injective());
        assert!(wide.is_surjective().unwrap());

        let tall = z(&[&[1, 0], &[0, 1], &[0, 0]]).eliminate(MatrixForm::Smith);
        assert!(tall.is_injective());
        assert!(!tall.is_surjective().unwrap());
        assert!(!tall.is_bijective().unwrap());
    }
}
