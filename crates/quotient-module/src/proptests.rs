//! Property-based tests for module decompositions over the integers.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use quotient_linalg::SparseMatrix;
    use quotient_rings::integers::Z;
    use quotient_rings::traits::EuclideanDomain;

    use crate::{AbstractBasisElement, FreeModule, ModuleStructure};

    type A = AbstractBasisElement;

    /// Generator count, a relation matrix with no more columns than rows,
    /// and two elements' coordinates.
    fn presentation() -> impl Strategy<Value = (usize, SparseMatrix<Z>, Vec<i64>, Vec<i64>)> {
        (1usize..5)
            .prop_flat_map(|n| (Just(n), 0..=n))
            .prop_flat_map(|(n, l)| {
                (
                    Just(n),
                    Just(l),
                    prop::collection::vec(prop_oneof![Just(0i64), -6i64..=6], n * l),
                    prop::collection::vec(-10i64..=10, n),
                    prop::collection::vec(-10i64..=10, n),
                )
            })
            .prop_map(|(n, l, grid, x, y)| {
                let grid = grid.into_iter().map(Z::new).collect();
                (n, SparseMatrix::from_grid(n, l, grid), x, y)
            })
    }

    fn element(basis: &[A], coords: &[i64]) -> FreeModule<A, Z> {
        let coords: Vec<Z> = coords.iter().map(|&c| Z::new(c)).collect();
        FreeModule::from_components(basis, &coords)
    }

    proptest! {
        #[test]
        fn relations_vanish((n, relations, _x, _y) in presentation()) {
            let basis = A::basis(n);
            let m = ModuleStructure::from_relations(basis.clone(), &relations);
            for j in 0..relations.num_cols() {
                let coords: Vec<Z> = (0..n).map(|i| relations.entry(i, j)).collect();
                prop_assert!(m.element_is_zero(&FreeModule::from_components(&basis, &coords)));
            }
        }

        #[test]
        fn factorize_is_additive((n, relations, x, y) in presentation()) {
            let basis = A::basis(n);
            let m = ModuleStructure::from_relations(basis.clone(), &relations);
            let (x, y) = (element(&basis, &x), element(&basis, &y));

            let fx = m.factorize(&x);
            let fy = m.factorize(&y);
            let fxy = m.factorize(&(&x + &y));
            for (i, s) in m.summands().iter().enumerate() {
                let diff = fx[i].clone() + fy[i].clone() - fxy[i].clone();
                prop_assert!(s.divisor().divides(&diff));
            }
        }

        #[test]
        fn divisors_form_a_chain((n, relations, _x, _y) in presentation()) {
            let m = ModuleStructure::from_relations(A::basis(n), &relations);
            let torsion = m.torsion_coefficients();
            prop_assert!(torsion.windows(2).all(|w| w[0].divides(&w[1])));
            prop_assert!(torsion.iter().all(|d| !d.is_unit() && d.signum() > 0));
            prop_assert_eq!(m.summands().len(), m.rank() + torsion.len());
        }

        #[test]
        fn generators_map_to_unit_vectors((n, relations, _x, _y) in presentation()) {
            let m = ModuleStructure::from_relations(A::basis(n), &relations);
            for (i, g) in m.generators().iter().enumerate() {
                let f = m.factorize(g);
                for (j, c) in f.iter().enumerate() {
                    let expected = if i == j { Z::new(1) } else { Z::new(0) };
                    prop_assert_eq!(c, &expected);
                }
            }
        }
    }
}
