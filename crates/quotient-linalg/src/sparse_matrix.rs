//! Sparse matrices with switchable alignment.
//!
//! Entries are stored as sorted lines keyed by their major index: rows when
//! the alignment is [`Alignment::Rows`], columns otherwise. Only non-zero
//! entries are stored, and a line with no entries is removed from the table,
//! so the number of non-zero rows of a row-aligned matrix is the table size.
//!
//! Elimination works line by line:
//! - row operations on a row-aligned matrix touch two lines
//! - column operations on a row-aligned matrix touch every line once
//! - `transpose` only swaps the dimensions and flips the alignment

use std::borrow::Cow;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::{Add, Mul, Neg, Range, Sub};

use rayon::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use quotient_rings::traits::Ring;

use crate::error::{LinalgError, Result};

/// Which index a matrix groups its entries by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    /// Entries grouped by row.
    #[default]
    Rows,
    /// Entries grouped by column.
    Cols,
}

impl Alignment {
    /// The other alignment.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Rows => Self::Cols,
            Self::Cols => Self::Rows,
        }
    }
}

/// Configuration for parallel matrix products.
#[derive(Clone, Debug)]
pub struct ParallelConfig {
    /// Minimum number of left-hand rows before rows are multiplied in parallel.
    pub parallel_threshold: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 64,
        }
    }
}

type Line<R> = Vec<(usize, R)>;

/// A sparse matrix over a ring R.
///
/// # Memory Layout
///
/// For an m×n row-aligned matrix, `table[i]` holds the non-zero entries of
/// row i as `(column, value)` pairs sorted by column. Column alignment is the
/// same with the roles of rows and columns exchanged.
#[derive(Clone, Debug)]
pub struct SparseMatrix<R> {
    rows: usize,
    cols: usize,
    alignment: Alignment,
    table: BTreeMap<usize, Line<R>>,
}

impl<R: Ring> SparseMatrix<R> {
    /// Creates the rows×cols zero matrix.
    #[must_use]
    pub fn zero(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            alignment: Alignment::Rows,
            table: BTreeMap::new(),
        }
    }

    /// Creates an identity matrix of size n×n.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        let table = (0..n).map(|i| (i, vec![(i, R::one())])).collect();
        Self {
            rows: n,
            cols: n,
            alignment: Alignment::Rows,
            table,
        }
    }

    /// Creates a sparse matrix from triplets (row, col, value).
    ///
    /// Duplicate entries are summed and zero sums are dropped.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds.
    #[must_use]
    pub fn from_triplets(rows: usize, cols: usize, triplets: &[(usize, usize, R)]) -> Self {
        Self::build(rows, cols, Alignment::Rows, triplets.iter().cloned())
    }

    /// Creates a matrix from a row-major dense array of length rows×cols.
    ///
    /// # Panics
    ///
    /// Panics if `grid.len() != rows * cols`.
    #[must_use]
    pub fn from_grid(rows: usize, cols: usize, grid: Vec<R>) -> Self {
        match Self::try_from_grid(rows, cols, grid) {
            Ok(m) => m,
            Err(e) => panic!("{e}"),
        }
    }

    /// Creates a matrix from a row-major dense array of length rows×cols.
    ///
    /// # Errors
    ///
    /// Returns [`LinalgError::DimensionMismatch`] if the array has the wrong
    /// length or `rows×cols` overflows.
    pub fn try_from_grid(rows: usize, cols: usize, grid: Vec<R>) -> Result<Self> {
        let mismatch = |expected: String| LinalgError::DimensionMismatch {
            expected,
            found: format!("{} entries", grid.len()),
        };
        let Some(len) = rows.checked_mul(cols) else {
            return Err(mismatch(format!("a {rows}×{cols} grid, which overflows")));
        };
        if grid.len() != len {
            return Err(mismatch(format!("{len} entries ({rows}×{cols})")));
        }
        let entries = grid
            .into_iter()
            .enumerate()
            .map(|(k, r)| (k / cols, k % cols, r));
        Ok(Self::build(rows, cols, Alignment::Rows, entries))
    }

    /// Creates a matrix from a list of equally long rows.
    ///
    /// # Panics
    ///
    /// Panics if the rows have different lengths.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<R>>) -> Self {
        let num_rows = rows.len();
        let num_cols = rows.first().map_or(0, Vec::len);
        assert!(
            rows.iter().all(|row| row.len() == num_cols),
            "all rows must have the same length"
        );
        let entries = rows.into_iter().enumerate().flat_map(|(i, row)| {
            row.into_iter().enumerate().map(move |(j, r)| (i, j, r))
        });
        Self::build(num_rows, num_cols, Alignment::Rows, entries)
    }

    /// Creates a matrix whose (i, j) entry is `f(i, j)`.
    #[must_use]
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> R) -> Self {
        let mut entries = Vec::new();
        for i in 0..rows {
            for j in 0..cols {
                entries.push((i, j, f(i, j)));
            }
        }
        Self::build(rows, cols, Alignment::Rows, entries)
    }

    fn build(
        rows: usize,
        cols: usize,
        alignment: Alignment,
        entries: impl IntoIterator<Item = (usize, usize, R)>,
    ) -> Self {
        let mut acc: BTreeMap<usize, BTreeMap<usize, R>> = BTreeMap::new();
        for (i, j, r) in entries {
            assert!(
                i < rows && j < cols,
                "entry ({i}, {j}) out of bounds for a {rows}×{cols} matrix"
            );
            if r.is_zero() {
                continue;
            }
            let (major, minor) = orient(alignment, i, j);
            match acc.entry(major).or_default().entry(minor) {
                Entry::Vacant(e) => {
                    e.insert(r);
                }
                Entry::Occupied(mut e) => {
                    let sum = e.get().clone() + r;
                    *e.get_mut() = sum;
                }
            }
        }

        let table = acc
            .into_iter()
            .map(|(major, line)| (major, line.into_iter().filter(|(_, r)| !r.is_zero()).collect::<Line<R>>()))
            .filter(|(_, line)| !line.is_empty())
            .collect();

        Self {
            rows,
            cols,
            alignment,
            table,
        }
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn num_cols(&self) -> usize {
        self.cols
    }

    /// Returns the current alignment.
    #[must_use]
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Returns the number of non-zero entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.table.values().map(Vec::len).sum()
    }

    /// Returns the density (fraction of non-zero entries).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn density(&self) -> f64 {
        let total = self.rows as f64 * self.cols as f64;
        if total == 0.0 {
            0.0
        } else {
            self.nnz() as f64 / total
        }
    }

    /// Returns true if every entry is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns true if the matrix is square.
    #[must_use]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Returns true if every non-zero entry lies on the diagonal.
    #[must_use]
    pub fn is_diagonal(&self) -> bool {
        self.entries().all(|(i, j, _)| i == j)
    }

    /// Returns the entry at (row, col), or None if zero.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&R> {
        let (major, minor) = orient(self.alignment, row, col);
        let line = self.table.get(&major)?;
        let idx = line.binary_search_by_key(&minor, |(k, _)| *k).ok()?;
        Some(&line[idx].1)
    }

    /// Returns the entry at (row, col), zero included.
    #[must_use]
    pub fn entry(&self, row: usize, col: usize) -> R {
        self.get(row, col).cloned().unwrap_or_else(R::zero)
    }

    /// Sets the entry at (row, col); setting zero removes it.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: R) {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        let (major, minor) = orient(self.alignment, row, col);
        let line = self.table.entry(major).or_default();
        match line.binary_search_by_key(&minor, |(k, _)| *k) {
            Ok(idx) if value.is_zero() => {
                line.remove(idx);
            }
            Ok(idx) => line[idx].1 = value,
            Err(_) if value.is_zero() => {}
            Err(idx) => line.insert(idx, (minor, value)),
        }
        if line.is_empty() {
            self.table.remove(&major);
        }
    }

    /// Returns an iterator over the non-zero entries of a row.
    pub fn row_iter(&self, row: usize) -> Box<dyn Iterator<Item = (usize, &R)> + '_> {
        match self.alignment {
            Alignment::Rows => Box::new(self.line_iter(row)),
            Alignment::Cols => Box::new(self.cross_iter(row)),
        }
    }

    /// Returns an iterator over the non-zero entries of a column.
    pub fn col_iter(&self, col: usize) -> Box<dyn Iterator<Item = (usize, &R)> + '_> {
        match self.alignment {
            Alignment::Rows => Box::new(self.cross_iter(col)),
            Alignment::Cols => Box::new(self.line_iter(col)),
        }
    }

    fn line_iter(&self, major: usize) -> impl Iterator<Item = (usize, &R)> {
        self.table
            .get(&major)
            .into_iter()
            .flat_map(|line| line.iter().map(|(k, r)| (*k, r)))
    }

    fn cross_iter(&self, minor: usize) -> impl Iterator<Item = (usize, &R)> {
        self.table.iter().filter_map(move |(&major, line)| {
            line.binary_search_by_key(&minor, |(k, _)| *k)
                .ok()
                .map(|idx| (major, &line[idx].1))
        })
    }

    /// Iterates over all non-zero entries as `(row, col, value)`.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, &R)> {
        let alignment = self.alignment;
        self.table.iter().flat_map(move |(&major, line)| {
            line.iter().map(move |(minor, r)| {
                let (i, j) = orient(alignment, major, *minor);
                (i, j, r)
            })
        })
    }

    /// The entries (i, i) for `i < min(rows, cols)`, zeros included.
    #[must_use]
    pub fn diagonal(&self) -> Vec<R> {
        (0..self.rows.min(self.cols)).map(|i| self.entry(i, i)).collect()
    }

    /// Converts to a dense row-major grid.
    #[must_use]
    pub fn to_grid(&self) -> Vec<Vec<R>> {
        let mut grid = vec![vec![R::zero(); self.cols]; self.rows];
        for (i, j, r) in self.entries() {
            grid[i][j] = r.clone();
        }
        grid
    }

    /// Number of rows holding a non-zero entry.
    #[must_use]
    pub fn nonzero_rows(&self) -> usize {
        match self.alignment {
            Alignment::Rows => self.table.len(),
            Alignment::Cols => self.minor_support(),
        }
    }

    /// Number of columns holding a non-zero entry.
    #[must_use]
    pub fn nonzero_cols(&self) -> usize {
        match self.alignment {
            Alignment::Rows => self.minor_support(),
            Alignment::Cols => self.table.len(),
        }
    }

    fn minor_support(&self) -> usize {
        self.table
            .values()
            .flat_map(|line| line.iter().map(|(k, _)| *k))
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// The sorted non-zero line with the given major index.
    pub(crate) fn line(&self, major: usize) -> Option<&[(usize, R)]> {
        self.table.get(&major).map(Vec::as_slice)
    }

    /// All non-empty lines in major order.
    pub(crate) fn lines(&self) -> impl Iterator<Item = (usize, &[(usize, R)])> {
        self.table.iter().map(|(&major, line)| (major, line.as_slice()))
    }

    /// Number of non-empty lines.
    pub(crate) fn num_lines(&self) -> usize {
        self.table.len()
    }

    // --- elementary operations ---

    /// Adds `r` times row `at` to row `to`.
    ///
    /// # Panics
    ///
    /// Panics if `at == to`.
    pub fn add_row(&mut self, at: usize, to: usize, r: &R) {
        match self.alignment {
            Alignment::Rows => self.add_major(at, to, r),
            Alignment::Cols => self.add_minor(at, to, r),
        }
    }

    /// Adds `r` times column `at` to column `to`.
    ///
    /// # Panics
    ///
    /// Panics if `at == to`.
    pub fn add_col(&mut self, at: usize, to: usize, r: &R) {
        match self.alignment {
            Alignment::Rows => self.add_minor(at, to, r),
            Alignment::Cols => self.add_major(at, to, r),
        }
    }

    /// Multiplies row `at` by `r`.
    pub fn multiply_row(&mut self, at: usize, r: &R) {
        match self.alignment {
            Alignment::Rows => self.scale_major(at, r),
            Alignment::Cols => self.scale_minor(at, r),
        }
    }

    /// Multiplies column `at` by `r`.
    pub fn multiply_col(&mut self, at: usize, r: &R) {
        match self.alignment {
            Alignment::Rows => self.scale_minor(at, r),
            Alignment::Cols => self.scale_major(at, r),
        }
    }

    /// Swaps rows `i` and `j`.
    pub fn swap_rows(&mut self, i: usize, j: usize) {
        match self.alignment {
            Alignment::Rows => self.swap_major(i, j),
            Alignment::Cols => self.swap_minor(i, j),
        }
    }

    /// Swaps columns `i` and `j`.
    pub fn swap_cols(&mut self, i: usize, j: usize) {
        match self.alignment {
            Alignment::Rows => self.swap_minor(i, j),
            Alignment::Cols => self.swap_major(i, j),
        }
    }

    fn add_major(&mut self, at: usize, to: usize, r: &R) {
        assert_ne!(at, to, "cannot add a line to itself");
        if r.is_zero() {
            return;
        }
        let Some(src) = self.table.get(&at) else {
            return;
        };
        let scaled: Line<R> = src
            .iter()
            .map(|(k, v)| (*k, r.clone() * v.clone()))
            .filter(|(_, v)| !v.is_zero())
            .collect();
        let dst = self.table.remove(&to).unwrap_or_default();
        let merged = merge_lines(dst, scaled);
        if !merged.is_empty() {
            self.table.insert(to, merged);
        }
    }

    fn add_minor(&mut self, at: usize, to: usize, r: &R) {
        assert_ne!(at, to, "cannot add a line to itself");
        if r.is_zero() {
            return;
        }
        for line in self.table.values_mut() {
            let Ok(src) = line.binary_search_by_key(&at, |(k, _)| *k) else {
                continue;
            };
            let delta = r.clone() * line[src].1.clone();
            match line.binary_search_by_key(&to, |(k, _)| *k) {
                Ok(idx) => {
                    let sum = line[idx].1.clone() + delta;
                    if sum.is_zero() {
                        line.remove(idx);
                    } else {
                        line[idx].1 = sum;
                    }
                }
                Err(idx) => {
                    if !delta.is_zero() {
                        line.insert(idx, (to, delta));
                    }
                }
            }
        }
        self.table.retain(|_, line| !line.is_empty());
    }

    fn scale_major(&mut self, at: usize, r: &R) {
        if let Some(line) = self.table.get_mut(&at) {
            for (_, v) in line.iter_mut() {
                *v = r.clone() * v.clone();
            }
            line.retain(|(_, v)| !v.is_zero());
            if line.is_empty() {
                self.table.remove(&at);
            }
        }
    }

    fn scale_minor(&mut self, at: usize, r: &R) {
        for line in self.table.values_mut() {
            if let Ok(idx) = line.binary_search_by_key(&at, |(k, _)| *k) {
                let v = r.clone() * line[idx].1.clone();
                if v.is_zero() {
                    line.remove(idx);
                } else {
                    line[idx].1 = v;
                }
            }
        }
        self.table.retain(|_, line| !line.is_empty());
    }

    fn swap_major(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let a = self.table.remove(&i);
        let b = self.table.remove(&j);
        if let Some(a) = a {
            self.table.insert(j, a);
        }
        if let Some(b) = b {
            self.table.insert(i, b);
        }
    }

    fn swap_minor(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        for line in self.table.values_mut() {
            let mut touched = false;
            for (k, _) in line.iter_mut() {
                if *k == i {
                    *k = j;
                    touched = true;
                } else if *k == j {
                    *k = i;
                    touched = true;
                }
            }
            if touched {
                line.sort_by_key(|(k, _)| *k);
            }
        }
    }

    // --- shape ---

    /// Transposes in place by swapping the dimensions and flipping the
    /// alignment; no entry is moved.
    pub fn transpose(&mut self) {
        std::mem::swap(&mut self.rows, &mut self.cols);
        self.alignment = self.alignment.flipped();
    }

    /// Returns the transpose.
    #[must_use]
    pub fn transposed(mut self) -> Self {
        self.transpose();
        self
    }

    /// Regroups the entries under the given alignment.
    pub fn set_alignment(&mut self, alignment: Alignment) {
        if self.alignment == alignment {
            return;
        }
        let mut table: BTreeMap<usize, Line<R>> = BTreeMap::new();
        for (major, line) in std::mem::take(&mut self.table) {
            for (minor, r) in line {
                table.entry(minor).or_default().push((major, r));
            }
        }
        self.table = table;
        self.alignment = alignment;
    }

    /// Returns a copy with the given alignment.
    #[must_use]
    pub fn with_alignment(&self, alignment: Alignment) -> Self {
        let mut m = self.clone();
        m.set_alignment(alignment);
        m
    }

    fn aligned(&self, alignment: Alignment) -> Cow<'_, Self> {
        if self.alignment == alignment {
            Cow::Borrowed(self)
        } else {
            Cow::Owned(self.with_alignment(alignment))
        }
    }

    // --- views ---

    /// The block `rows × cols`, re-indexed from zero.
    ///
    /// # Panics
    ///
    /// Panics if a range exceeds the matrix.
    #[must_use]
    pub fn submatrix(&self, rows: Range<usize>, cols: Range<usize>) -> Self {
        assert!(rows.end <= self.rows && cols.end <= self.cols, "submatrix out of bounds");
        let (row_start, col_start) = (rows.start, cols.start);
        let num_rows = rows.len();
        let num_cols = cols.len();
        let entries = self
            .entries()
            .filter(|(i, j, _)| rows.contains(i) && cols.contains(j))
            .map(|(i, j, r)| (i - row_start, j - col_start, r.clone()));
        Self::build(num_rows, num_cols, self.alignment, entries)
    }

    /// The rows in `rows`, all columns.
    #[must_use]
    pub fn submatrix_rows(&self, rows: Range<usize>) -> Self {
        self.submatrix(rows, 0..self.cols)
    }

    /// The columns in `cols`, all rows.
    #[must_use]
    pub fn submatrix_cols(&self, cols: Range<usize>) -> Self {
        self.submatrix(0..self.rows, cols)
    }

    /// Keeps the rows and columns whose index satisfies the predicates,
    /// preserving their order.
    #[must_use]
    pub fn submatrix_by(
        &self,
        row_pred: impl Fn(usize) -> bool,
        col_pred: impl Fn(usize) -> bool,
    ) -> Self {
        let row_map = reindex(self.rows, row_pred);
        let col_map = reindex(self.cols, col_pred);
        let num_rows = row_map.iter().flatten().count();
        let num_cols = col_map.iter().flatten().count();
        let entries = self
            .entries()
            .filter_map(|(i, j, r)| Some((row_map[i]?, col_map[j]?, r.clone())));
        Self::build(num_rows, num_cols, self.alignment, entries)
    }

    // --- algebra ---

    /// Matrix product, multiplying rows in parallel above the configured
    /// threshold.
    ///
    /// # Panics
    ///
    /// Panics if `self.num_cols() != other.num_rows()`.
    #[must_use]
    pub fn mul_with(&self, other: &Self, config: &ParallelConfig) -> Self {
        assert_eq!(
            self.cols, other.rows,
            "cannot multiply a {}×{} matrix by a {}×{} matrix",
            self.rows, self.cols, other.rows, other.cols
        );

        let lhs = self.aligned(Alignment::Rows);
        let rhs = other.aligned(Alignment::Rows);
        let rhs: &Self = &rhs;

        let row_product = |line: &Line<R>| -> Line<R> {
            let mut acc: BTreeMap<usize, R> = BTreeMap::new();
            for (k, a) in line {
                let Some(rline) = rhs.table.get(k) else {
                    continue;
                };
                for (j, b) in rline {
                    let term = a.clone() * b.clone();
                    match acc.entry(*j) {
                        Entry::Vacant(e) => {
                            e.insert(term);
                        }
                        Entry::Occupied(mut e) => {
                            let sum = e.get().clone() + term;
                            *e.get_mut() = sum;
                        }
                    }
                }
            }
            acc.into_iter().filter(|(_, r)| !r.is_zero()).collect()
        };

        let lines: Vec<(usize, &Line<R>)> = lhs.table.iter().map(|(i, l)| (*i, l)).collect();
        let products: Vec<(usize, Line<R>)> = if lhs.rows >= config.parallel_threshold {
            lines
                .into_par_iter()
                .map(|(i, line)| (i, row_product(line)))
                .collect()
        } else {
            lines
                .into_iter()
                .map(|(i, line)| (i, row_product(line)))
                .collect()
        };

        Self {
            rows: self.rows,
            cols: other.cols,
            alignment: Alignment::Rows,
            table: products.into_iter().filter(|(_, l)| !l.is_empty()).collect(),
        }
    }

    /// Matrix-vector product `A * x`.
    ///
    /// # Panics
    ///
    /// Panics if `x.len() != self.num_cols()`.
    #[must_use]
    pub fn mul_vec(&self, x: &[R]) -> Vec<R> {
        assert_eq!(x.len(), self.cols, "vector dimension mismatch");
        let mut y = vec![R::zero(); self.rows];
        for (i, j, r) in self.entries() {
            y[i] = y[i].clone() + r.clone() * x[j].clone();
        }
        y
    }

    /// Multiplies every entry by a scalar.
    #[must_use]
    pub fn scale(&self, c: &R) -> Self {
        let entries = self.entries().map(|(i, j, r)| (i, j, c.clone() * r.clone()));
        Self::build(self.rows, self.cols, self.alignment, entries)
    }
}

/// Orients `(row, col)` as `(major, minor)`; the map is its own inverse.
fn orient(alignment: Alignment, i: usize, j: usize) -> (usize, usize) {
    match alignment {
        Alignment::Rows => (i, j),
        Alignment::Cols => (j, i),
    }
}

fn reindex(n: usize, pred: impl Fn(usize) -> bool) -> Vec<Option<usize>> {
    let mut next = 0;
    (0..n)
        .map(|i| {
            pred(i).then(|| {
                next += 1;
                next - 1
            })
        })
        .collect()
}

/// Sums two sorted lines, dropping zero sums.
fn merge_lines<R: Ring>(a: Line<R>, b: Line<R>) -> Line<R> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let mut a = a.into_iter().peekable();
    let mut b = b.into_iter().peekable();

    loop {
        let keys = (a.peek().map(|(k, _)| *k), b.peek().map(|(k, _)| *k));
        let next = match keys {
            (Some(i), Some(j)) if i < j => a.next(),
            (Some(i), Some(j)) if i > j => b.next(),
            (Some(_), Some(_)) => match (a.next(), b.next()) {
                (Some((k, x)), Some((_, y))) => Some((k, x + y)),
                _ => None,
            },
            (Some(_), None) => a.next(),
            (None, Some(_)) => b.next(),
            (None, None) => break,
        };
        if let Some((k, r)) = next {
            if !r.is_zero() {
                out.push((k, r));
            }
        }
    }

    out
}

impl<R: Ring> PartialEq for SparseMatrix<R> {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self.table == other.aligned(self.alignment).table
    }
}

impl<R: Ring> Eq for SparseMatrix<R> {}

impl<R: Ring> Mul for &SparseMatrix<R> {
    type Output = SparseMatrix<R>;

    fn mul(self, other: Self) -> SparseMatrix<R> {
        self.mul_with(other, &ParallelConfig::default())
    }
}

impl<R: Ring> Add for &SparseMatrix<R> {
    type Output = SparseMatrix<R>;

    fn add(self, other: Self) -> SparseMatrix<R> {
        assert!(
            self.rows == other.rows && self.cols == other.cols,
            "cannot add matrices of different shapes"
        );

        let mut lhs = self.table.clone();
        for (major, line) in other.aligned(self.alignment).table.iter() {
            let current = lhs.remove(major).unwrap_or_default();
            let merged = merge_lines(current, line.clone());
            if !merged.is_empty() {
                lhs.insert(*major, merged);
            }
        }

        SparseMatrix {
            rows: self.rows,
            cols: self.cols,
            alignment: self.alignment,
            table: lhs,
        }
    }
}

impl<R: Ring> Neg for &SparseMatrix<R> {
    type Output = SparseMatrix<R>;

    fn neg(self) -> SparseMatrix<R> {
        SparseMatrix {
            rows: self.rows,
            cols: self.cols,
            alignment: self.alignment,
            table: self
                .table
                .iter()
                .map(|(major, line)| {
                    (*major, line.iter().map(|(k, r)| (*k, -r.clone())).collect())
                })
                .collect(),
        }
    }
}

impl<R: Ring> Sub for &SparseMatrix<R> {
    type Output = SparseMatrix<R>;

    fn sub(self, other: Self) -> SparseMatrix<R> {
        self + &(-other)
    }
}

impl<R: Ring + fmt::Display> fmt::Display for SparseMatrix<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.to_grid().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
            write!(f, "[{}]", cells.join(", "))?;
        }
        Ok(())
    }
}

// --- serialization ---

/// On-disk shape of a matrix: a dense row-major `grid` for dense matrices,
/// `(row, col, value)` `components` otherwise.
#[derive(Serialize, Deserialize)]
struct MatrixRecord<R> {
    rows: usize,
    cols: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    grid: Option<Vec<R>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    components: Option<Vec<(usize, usize, R)>>,
}

impl<R: Ring> SparseMatrix<R> {
    fn to_record(&self) -> MatrixRecord<R> {
        let m = self;
        if m.density() > 0.5 {
            MatrixRecord {
                rows: m.rows,
                cols: m.cols,
                grid: Some(m.to_grid().into_iter().flatten().collect()),
                components: None,
            }
        } else {
            let mut components: Vec<_> = m.entries().map(|(i, j, r)| (i, j, r.clone())).collect();
            components.sort_by_key(|(i, j, _)| (*i, *j));
            MatrixRecord {
                rows: m.rows,
                cols: m.cols,
                grid: None,
                components: Some(components),
            }
        }
    }

    fn from_record(record: MatrixRecord<R>) -> Result<Self> {
        let MatrixRecord {
            rows,
            cols,
            grid,
            components,
        } = record;

        if rows.checked_mul(cols).is_none() {
            return Err(LinalgError::InvalidRecord(format!(
                "a {rows}×{cols} matrix has more entries than fit in memory"
            )));
        }
        match (grid, components) {
            (Some(_), Some(_)) => Err(LinalgError::InvalidRecord(
                "both `grid` and `components` are present".to_owned(),
            )),
            (Some(grid), None) => Self::try_from_grid(rows, cols, grid),
            (None, components) => {
                let components = components.unwrap_or_default();
                if let Some((i, j, _)) = components.iter().find(|(i, j, _)| *i >= rows || *j >= cols) {
                    return Err(LinalgError::InvalidRecord(format!(
                        "component ({i}, {j}) out of bounds for a {rows}×{cols} matrix"
                    )));
                }
                Ok(Self::build(rows, cols, Alignment::Rows, components))
            }
        }
    }
}

impl<R: Ring + Serialize> Serialize for SparseMatrix<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl<'de, R: Ring + Deserialize<'de>> Deserialize<'de> for SparseMatrix<R> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let record = MatrixRecord::<R>::deserialize(deserializer)?;
        Self::from_record(record).map_err(serde::de::Error::custom)
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
    fn test_from_rows() {
        let m = z(&[&[1, 0, 2], &[0, 3, 0], &[4, 0, 5]]);

        assert_eq!(m.num_rows(), 3);
        assert_eq!(m.num_cols(), 3);
        assert_eq!(m.nnz(), 5);

        assert_eq!(m.get(0, 0), Some(&Z::new(1)));
        assert_eq!(m.get(0, 1), None);
        assert_eq!(m.get(0, 2), Some(&Z::new(2)));
        assert_eq!(m.get(1, 1), Some(&Z::new(3)));
        assert_eq!(m.get(2, 0), Some(&Z::new(4)));
        assert_eq!(m.entry(1, 0), Z::new(0));
    }

    #[test]
    fn test_from_triplets_sums_duplicates() {
        let m = SparseMatrix::from_triplets(
            2,
            2,
            &[(0, 0, Z::new(1)), (0, 0, Z::new(2)), (1, 1, Z::new(5)), (1, 1, Z::new(-5))],
        );
        assert_eq!(m.get(0, 0), Some(&Z::new(3)));
        assert_eq!(m.get(1, 1), None);
        assert_eq!(m.nnz(), 1);
        assert_eq!(m.nonzero_rows(), 1);
    }

    #[test]
    fn test_grid_and_fn_constructors() {
        let grid: Vec<Z> = (1..=6).map(Z::new).collect();
        let a = SparseMatrix::from_grid(2, 3, grid);
        let b = SparseMatrix::from_fn(2, 3, |i, j| Z::new(i64::try_from(3 * i + j + 1).unwrap()));
        assert_eq!(a, b);
        assert_eq!(a.entry(1, 2), Z::new(6));

        let err = SparseMatrix::try_from_grid(2, 2, vec![Z::new(1)]).unwrap_err();
        assert!(matches!(err, LinalgError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_set_zero_removes() {
        let mut m = SparseMatrix::<Z>::zero(2, 2);
        m.set(1, 0, Z::new(7));
        assert_eq!(m.nnz(), 1);
        m.set(1, 0, Z::new(0));
        assert!(m.is_zero());
    }

    #[test]
    fn test_row_ops_in_both_alignments() {
        for alignment in [Alignment::Rows, Alignment::Cols] {
            let mut m = z(&[&[1, 2], &[3, 4]]).with_alignment(alignment);

            m.add_row(0, 1, &Z::new(-3));
            assert_eq!(m, z(&[&[1, 2], &[0, -2]]));

            m.add_col(0, 1, &Z::new(-2));
            assert_eq!(m, z(&[&[1, 0], &[0, -2]]));

            m.multiply_row(1, &Z::new(-1));
            assert_eq!(m, z(&[&[1, 0], &[0, 2]]));

            m.swap_rows(0, 1);
            assert_eq!(m, z(&[&[0, 2], &[1, 0]]));

            m.swap_cols(0, 1);
            assert_eq!(m, z(&[&[2, 0], &[0, 1]]));

            m.multiply_col(0, &Z::new(3));
            assert_eq!(m, z(&[&[6, 0], &[0, 1]]));
        }
    }

    #[test]
    fn test_cancellation_drops_entries() {
        let mut m = z(&[&[2, 4], &[1, 2]]);
        m.add_row(1, 0, &Z::new(-2));
        assert_eq!(m.nonzero_rows(), 1);
        assert_eq!(m.nnz(), 2);
    }

    #[test]
    fn test_transpose() {
        let m = z(&[&[1, 2, 0], &[0, 3, 4]]);
        let t = m.clone().transposed();

        assert_eq!(t.num_rows(), 3);
        assert_eq!(t.num_cols(), 2);
        assert_eq!(t.alignment(), Alignment::Cols);
        assert_eq!(t.get(0, 0), Some(&Z::new(1)));
        assert_eq!(t.get(1, 0), Some(&Z::new(2)));
        assert_eq!(t.get(1, 1), Some(&Z::new(3)));
        assert_eq!(t.get(2, 1), Some(&Z::new(4)));
        assert_eq!(t.transposed(), m);
    }

    #[test]
    fn test_iterators() {
        let m = z(&[&[1, 0, 2], &[0, 3, 0]]);
        let row: Vec<_> = m.row_iter(0).map(|(j, r)| (j, r.clone())).collect();
        assert_eq!(row, vec![(0, Z::new(1)), (2, Z::new(2))]);
        let col: Vec<_> = m.col_iter(1).map(|(i, r)| (i, r.clone())).collect();
        assert_eq!(col, vec![(1, Z::new(3))]);
        assert_eq!(m.nonzero_cols(), 3);
        assert_eq!(m.diagonal(), vec![Z::new(1), Z::new(3)]);
    }

    #[test]
    fn test_submatrix() {
        let m = z(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 9]]);
        assert_eq!(m.submatrix(1..3, 0..2), z(&[&[4, 5], &[7, 8]]));
        assert_eq!(m.submatrix_rows(2..3), z(&[&[7, 8, 9]]));
        assert_eq!(m.submatrix_cols(1..2), z(&[&[2], &[5], &[8]]));
        assert_eq!(m.submatrix_by(|i| i != 1, |j| j != 1), z(&[&[1, 3], &[7, 9]]));
    }

    #[test]
    fn test_product_and_algebra() {
        let a = z(&[&[1, 2], &[3, 4]]);
        let b = z(&[&[0, 1], &[1, 0]]);
        assert_eq!(&a * &b, z(&[&[2, 1], &[4, 3]]));
        assert_eq!(&a + &b, z(&[&[1, 3], &[4, 4]]));
        assert_eq!(&a - &a, SparseMatrix::zero(2, 2));
        assert_eq!(a.scale(&Z::new(2)), z(&[&[2, 4], &[6, 8]]));
        assert_eq!(a.mul_vec(&[Z::new(1), Z::new(1)]), vec![Z::new(3), Z::new(7)]);
        assert_eq!(&a * &SparseMatrix::identity(2), a);
    }

    #[test]
    fn test_parallel_product_matches_sequential() {
        let a = SparseMatrix::from_fn(5, 4, |i, j| Z::new(i64::try_from(i * 4 + j).unwrap() % 3 - 1));
        let b = SparseMatrix::from_fn(4, 3, |i, j| Z::new(i64::try_from(i + 2 * j).unwrap() % 4));
        let forced = ParallelConfig {
            parallel_threshold: 1, // force the rayon path
        };
        assert_eq!(a.mul_with(&b, &forced), &a * &b);
    }

    #[test]
    fn test_serde_dense_and_sparse() {
        let dense = z(&[&[1, 2], &[3, 0]]);
        let json = serde_json::to_string(&dense).unwrap();
        assert!(json.contains("\"grid\""));
        assert_eq!(serde_json::from_str::<SparseMatrix<Z>>(&json).unwrap(), dense);

        let sparse = SparseMatrix::from_triplets(3, 3, &[(2, 1, Z::new(-4))]);
        let json = serde_json::to_string(&sparse).unwrap();
        assert_eq!(json, r#"{"rows":3,"cols":3,"components":[[2,1,"-4"]]}"#);
        assert_eq!(serde_json::from_str::<SparseMatrix<Z>>(&json).unwrap(), sparse);
    }

    #[test]
    fn test_serde_rejects_bad_records() {
        let short = r#"{"rows":2,"cols":2,"grid":["1"]}"#;
        assert!(serde_json::from_str::<SparseMatrix<Z>>(short).is_err());

        let outside = r#"{"rows":2,"cols":2,"components":[[2,0,"1"]]}"#;
        assert!(serde_json::from_str::<SparseMatrix<Z>>(outside).is_err());
    }

    #[test]
    fn test_overflowing_shape_is_rejected() {
        let huge = r#"{"rows":9223372036854775808,"cols":2,"grid":[]}"#;
        let err = serde_json::from_str::<SparseMatrix<Z>>(huge).unwrap_err();
        assert!(err.to_string().contains("invalid matrix record"));

        let huge = r#"{"rows":9223372036854775808,"cols":2,"components":[]}"#;
        assert!(serde_json::from_str::<SparseMatrix<Z>>(huge).is_err());

        let err = SparseMatrix::<Z>::try_from_grid(usize::MAX, 2, Vec::new()).unwrap_err();
        assert!(matches!(err, LinalgError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_density_of_wide_shapes() {
        let m = SparseMatrix::<Z>::zero(usize::MAX, 2);
        assert!(m.density().abs() < f64::EPSILON);
        assert!(z(&[&[1, 0], &[0, 0]]).density() > 0.2);
    }

    #[test]
    fn test_display() {
        assert_eq!(z(&[&[1, 0], &[0, -2]]).to_string(), "[1, 0]\n[0, -2]");
    }
}
