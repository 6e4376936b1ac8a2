//! Integration tests for quotient-linalg.

#[cfg(test)]
mod integration_tests {
    use crate::eliminator::{EliminationConfig, MatrixForm};
    use crate::result::EliminationResult;
    use crate::sparse_matrix::{ParallelConfig, SparseMatrix};
    use quotient_rings::finite_field::GF2;
    use quotient_rings::integers::Z;
    use quotient_rings::poly_ring::Polynomial;
    use quotient_rings::rationals::Q;
    use quotient_rings::traits::{EuclideanDomain, Ring};

    const FORMS: [MatrixForm; 6] = [
        MatrixForm::RowEchelon,
        MatrixForm::ColEchelon,
        MatrixForm::RowHermite,
        MatrixForm::ColHermite,
        MatrixForm::Diagonal,
        MatrixForm::Smith,
    ];

    fn z(rows: usize, cols: usize, grid: &[i64]) -> SparseMatrix<Z> {
        SparseMatrix::from_grid(rows, cols, grid.iter().map(|&v| Z::new(v)).collect())
    }

    fn z_diag(rows: usize, cols: usize, diagonal: &[i64]) -> SparseMatrix<Z> {
        let triplets: Vec<_> = diagonal
            .iter()
            .enumerate()
            .filter(|(_, d)| **d != 0)
            .map(|(i, &d)| (i, i, Z::new(d)))
            .collect();
        SparseMatrix::from_triplets(rows, cols, &triplets)
    }

    fn q(rows: usize, cols: usize, grid: &[(i64, i64)]) -> SparseMatrix<Q> {
        SparseMatrix::from_grid(rows, cols, grid.iter().map(|&(n, d)| Q::new(n, d)).collect())
    }

    fn q_diag(n: usize, diagonal: &[i64]) -> SparseMatrix<Q> {
        let triplets: Vec<_> = diagonal
            .iter()
            .enumerate()
            .filter(|(_, d)| **d != 0)
            .map(|(i, &d)| (i, i, Q::from_integer(d)))
            .collect();
        SparseMatrix::from_triplets(n, n, &triplets)
    }

    fn assert_round_trip<R: EuclideanDomain>(a: &SparseMatrix<R>, e: &EliminationResult<R>) {
        assert_eq!(&(e.left() * a) * e.right(), *e.result(), "{:?}", e.form());
        assert_eq!(
            &(e.left_inverse() * e.result()) * e.right_inverse(),
            *a,
            "{:?}",
            e.form()
        );
    }

    fn assert_smith<R: EuclideanDomain>(a: &SparseMatrix<R>, expected: &SparseMatrix<R>) {
        let e = a.eliminate(MatrixForm::Smith);
        assert_eq!(e.result(), expected);
        assert_round_trip(a, &e);
    }

    #[test]
    fn test_smith_regular() {
        let a = z(
            5,
            5,
            &[
                2, -1, -2, -2, -3, 1, 2, -1, 1, -1, 2, -2, -4, -3, -6, 1, 7, 1, 5, 3, 1, -12, -6,
                -10, -11,
            ],
        );
        assert_smith(&a, &SparseMatrix::identity(5));
    }

    #[test]
    fn test_smith_rank4() {
        let a = z(
            5,
            5,
            &[
                3, -5, -22, 20, 8, 6, -11, -50, 45, 18, -1, 2, 10, -9, -3, 3, -6, -30, 27, 10, -1,
                2, 7, -6, -3,
            ],
        );
        assert_smith(&a, &z_diag(5, 5, &[1, 1, 1, 1, 0]));
    }

    #[test]
    fn test_smith_full_rank_with_factors() {
        let a = z(
            5,
            5,
            &[
                -20, -7, -27, 2, 29, 17, 8, 14, -4, -10, 13, 8, 10, -4, -6, -9, -2, -14, 0, 16, 5,
                0, 5, -1, -4,
            ],
        );
        assert_smith(&a, &z_diag(5, 5, &[1, 1, 1, 2, 60]));
    }

    #[test]
    fn test_smith_rank3_with_factors() {
        let a = z(
            5,
            5,
            &[
                4, 6, -18, -15, -46, -1, 0, 6, 4, 13, -13, -12, 36, 30, 97, -7, -6, 18, 15, 49, -6,
                -6, 18, 15, 48,
            ],
        );
        assert_smith(&a, &z_diag(5, 5, &[1, 1, 6, 0, 0]));
    }

    #[test]
    fn test_smith_rectangular() {
        let a = z(
            4,
            6,
            &[
                8, -6, 14, -10, -14, 6, 12, -8, 18, -18, -20, 8, -16, 7, -23, 22, 23, -7, 32, -17,
                44, -49, -49, 17,
            ],
        );
        assert_smith(&a, &z_diag(4, 6, &[1, 1, 2, 12]));
    }

    #[test]
    fn test_smith_zero_rectangular() {
        let a = SparseMatrix::<Z>::zero(4, 6);
        let e = a.eliminate(MatrixForm::Smith);
        assert!(e.result().is_zero());
        assert_eq!(e.rank(), 0);
        assert_eq!(e.nullity(), 6);
        assert!(e.diagonal().unwrap().is_empty());
        assert_round_trip(&a, &e);
    }

    #[test]
    fn test_smith_rational_regular() {
        let a = q(
            5,
            5,
            &[
                (-3, 1),
                (0, 1),
                (0, 1),
                (-9, 2),
                (0, 1),
                (10, 3),
                (2, 1),
                (0, 1),
                (-15, 2),
                (6, 1),
                (-10, 3),
                (-2, 1),
                (0, 1),
                (15, 2),
                (-10, 1),
                (0, 1),
                (0, 1),
                (3, 4),
                (-5, 1),
                (0, 1),
                (0, 1),
                (0, 1),
                (1, 1),
                (0, 1),
                (0, 1),
            ],
        );
        assert_smith(&a, &SparseMatrix::identity(5));
    }

    #[test]
    fn test_smith_rational_rank3() {
        let a = q(
            5,
            5,
            &[
                (1, 1),
                (1, 1),
                (0, 1),
                (8, 3),
                (10, 3),
                (-3, 1),
                (0, 1),
                (0, 1),
                (-3, 1),
                (-5, 1),
                (2, 1),
                (0, 1),
                (10, 3),
                (2, 1),
                (16, 3),
                (79, 8),
                (0, 1),
                (395, 24),
                (79, 8),
                (79, 3),
                (7, 2),
                (0, 1),
                (35, 6),
                (7, 2),
                (28, 3),
            ],
        );
        assert_smith(&a, &q_diag(5, &[1, 1, 1, 0, 0]));
    }

    #[test]
    fn test_every_form_round_trips() {
        let a = z(
            4,
            6,
            &[
                8, -6, 14, -10, -14, 6, 12, -8, 18, -18, -20, 8, -16, 7, -23, 22, 23, -7, 32, -17,
                44, -49, -49, 17,
            ],
        );
        for form in FORMS {
            let e = a.eliminate(form);
            assert_round_trip(&a, &e);
            assert_eq!(e.rank(), 4, "{form:?}");
            assert_eq!(e.rank() + e.nullity(), 6, "{form:?}");
        }
    }

    #[test]
    fn test_row_forms_use_only_row_operations() {
        let a = z(3, 3, &[2, 4, 1, 6, 8, 3, 1, 1, 1]);
        for form in [MatrixForm::RowEchelon, MatrixForm::RowHermite] {
            assert!(a.eliminate(form).col_operations().is_empty(), "{form:?}");
        }
        for form in [MatrixForm::ColEchelon, MatrixForm::ColHermite] {
            assert!(a.eliminate(form).row_operations().is_empty(), "{form:?}");
        }
    }

    #[test]
    fn test_identity_is_fixed() {
        let id = SparseMatrix::<Z>::identity(5);
        for form in FORMS {
            let e = id.eliminate(form);
            assert_eq!(e.result(), &id, "{form:?}");
            assert!(e.log().is_empty(), "{form:?}");
        }
    }

    #[test]
    fn test_eliminated_smith_is_fixed() {
        let a = z_diag(3, 3, &[1, 2, 6]);
        let e = a.eliminate(MatrixForm::Smith);
        assert_eq!(e.result(), &a);
        assert!(e.log().is_empty());
    }

    #[test]
    fn test_polynomial_entries() {
        type P = Polynomial<Q>;
        let x_minus_1 = P::new(vec![Q::from_integer(-1), Q::from_integer(1)]);
        let x_plus_1 = P::new(vec![Q::from_integer(1), Q::from_integer(1)]);

        let a = SparseMatrix::from_rows(vec![
            vec![x_minus_1.clone(), P::zero()],
            vec![P::zero(), x_plus_1.clone()],
        ]);
        let e = a.eliminate(MatrixForm::Smith);

        assert_eq!(e.diagonal().unwrap(), &[P::one(), x_minus_1 * x_plus_1]);
        assert_round_trip(&a, &e);
    }

    #[test]
    fn test_gf2_rank() {
        let one = GF2::from(1u64);
        let zero = GF2::zero();
        let a = SparseMatrix::from_rows(vec![
            vec![one, one, zero],
            vec![one, zero, one],
            vec![zero, one, one],
        ]);
        let e = a.eliminate(MatrixForm::Diagonal);
        assert_eq!(e.rank(), 2);
        assert_eq!(e.diagonal().unwrap(), &[one, one]);
        assert_round_trip(&a, &e);

        let kernel = e.kernel_matrix().unwrap();
        assert_eq!(kernel.num_cols(), 1);
        assert!((&a * kernel).is_zero());
    }

    #[test]
    fn test_parallel_products_agree() {
        let a = z(3, 3, &[2, 1, 0, 1, 1, 0, 0, 0, 1]);
        let sequential = a.eliminate(MatrixForm::Smith);
        let parallel = a.eliminate_with(&EliminationConfig {
            form: MatrixForm::Smith,
            parallel: ParallelConfig {
                parallel_threshold: 1,
            },
        });

        assert_eq!(
            sequential.inverse().unwrap(),
            parallel.inverse().unwrap()
        );
        assert_eq!(
            sequential.image_matrix().unwrap(),
            parallel.image_matrix().unwrap()
        );
    }

    #[test]
    fn test_form_serde() {
        let json = serde_json::to_string(&MatrixForm::ColHermite).unwrap();
        assert_eq!(json, "\"ColHermite\"");
        assert_eq!(MatrixForm::default(), MatrixForm::Smith);
    }

    #[test]
    fn test_result_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EliminationResult<Z>>();

        let a = z(2, 2, &[2, 1, 1, 1]);
        let e = a.eliminate(MatrixForm::Smith);
        std::thread::scope(|s| {
            let left = s.spawn(|| e.left().clone());
            let right = s.spawn(|| e.right().clone());
            assert_eq!(left.join().unwrap(), *e.left());
            assert_eq!(right.join().unwrap(), *e.right());
        });
    }
}

#[cfg(test)]
mod proptest_tests {
    use std::cmp::Ordering;

    use crate::eliminator::MatrixForm;
    use crate::sparse_matrix::SparseMatrix;
    use proptest::prelude::*;
    use quotient_rings::integers::Z;
    use quotient_rings::traits::{EuclideanDomain, Ring};

    /// Every entry above a row's leading entry is smaller than that entry.
    fn entries_above_pivots_are_reduced(m: &SparseMatrix<Z>) -> bool {
        (0..m.num_rows()).all(|r| {
            let Some(col) = m.row_iter(r).map(|(j, _)| j).min() else {
                return true;
            };
            let pivot = m.entry(r, col);
            (0..r).all(|i| m.entry(i, col).cmp_degree(&pivot) == Ordering::Less)
        })
    }

    fn int_matrix() -> impl Strategy<Value = SparseMatrix<Z>> {
        (1usize..6, 1usize..6).prop_flat_map(|(rows, cols)| {
            prop::collection::vec(prop_oneof![2 => Just(0i64), 3 => -9i64..=9], rows * cols)
                .prop_map(move |grid| {
                    SparseMatrix::from_grid(rows, cols, grid.into_iter().map(Z::new).collect())
                })
        })
    }

    proptest! {
        #[test]
        fn prop_transforms_round_trip(a in int_matrix()) {
            for form in [
                MatrixForm::RowEchelon,
                MatrixForm::ColEchelon,
                MatrixForm::RowHermite,
                MatrixForm::ColHermite,
                MatrixForm::Diagonal,
                MatrixForm::Smith,
            ] {
                let e = a.eliminate(form);
                prop_assert_eq!(&(e.left() * &a) * e.right(), e.result().clone());
                prop_assert_eq!(&(e.left_inverse() * e.result()) * e.right_inverse(), a.clone());
            }
        }

        #[test]
        fn prop_rank_agrees_across_forms(a in int_matrix()) {
            let rank = a.eliminate(MatrixForm::Smith).rank();
            for form in [MatrixForm::RowEchelon, MatrixForm::ColHermite, MatrixForm::Diagonal] {
                let e = a.eliminate(form);
                prop_assert_eq!(e.rank(), rank);
                prop_assert_eq!(e.rank() + e.nullity(), a.num_cols());
            }
        }

        #[test]
        fn prop_hermite_reduces_above_pivots(a in int_matrix()) {
            let row = a.eliminate(MatrixForm::RowHermite);
            prop_assert!(entries_above_pivots_are_reduced(row.result()));

            let col = a.eliminate(MatrixForm::ColHermite);
            prop_assert!(entries_above_pivots_are_reduced(&col.result().clone().transposed()));
        }

        #[test]
        fn prop_smith_divisibility(a in int_matrix()) {
            let e = a.eliminate(MatrixForm::Smith);
            let d = e.diagonal().unwrap();
            prop_assert!(e.result().is_diagonal());
            prop_assert!(d.iter().all(|x| !x.is_zero() && x.signum() > 0));
            prop_assert!(d.windows(2).all(|w| w[0].divides(&w[1])));
        }

        #[test]
        fn prop_kernel_is_annihilated(a in int_matrix()) {
            let e = a.eliminate(MatrixForm::Smith);
            let kernel = e.kernel_matrix().unwrap();
            prop_assert_eq!(kernel.num_cols(), e.nullity());
            prop_assert!((&a * kernel).is_zero());
        }

        #[test]
        fn prop_determinant_agrees_across_forms(n in 1usize..5, seed in prop::collection::vec(-5i64..=5, 16)) {
            let a = SparseMatrix::from_fn(n, n, |i, j| Z::new(seed[i * 4 + j]));
            let det = a.eliminate(MatrixForm::Smith).determinant().unwrap();
            for form in [MatrixForm::RowEchelon, MatrixForm::ColEchelon, MatrixForm::Diagonal] {
                prop_assert_eq!(a.eliminate(form).determinant().unwrap(), det.clone());
            }
        }
    }
}
