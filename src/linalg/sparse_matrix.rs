use super::sparsity_pattern::SparsityPattern;
use bytes::{BufMut, Bytes, BytesMut};
use nalgebra::{DMatrix, DVector};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::{Index, IndexMut};
use std::sync::Arc;

/// Relative tolerance used to compare mirrored entries in [`SparseMatrix::symmetric`]
pub const SYMMETRY_TOLERANCE: f64 = 1e-12;

/// Class id that opens a PETSc binary matrix file
pub const PETSC_MAT_FILE_CLASSID: i32 = 1211216;

/// Square matrix with the non-zero structure of a [`SparsityPattern`] ("arrow" format)
///
/// The diagonal is stored densely. Off-diagonal entries are stored in two arrays (upper and lower triangle)
/// addressed by the arrow index of the coupled pair, so `(i, j)` and `(j, i)` live at the same position of
/// `upper` and `lower` respectively. The two triangles are independent: symmetry is a property that can be
/// checked, not one that is enforced.
#[derive(Clone, Debug)]
pub struct SparseMatrix {
    pattern: Arc<SparsityPattern>,
    diagonal: Vec<f64>,
    upper: Vec<f64>,
    lower: Vec<f64>,
}

impl SparseMatrix {
    /// Construct a matrix of zeros
    pub fn new(pattern: Arc<SparsityPattern>) -> Self {
        let n = pattern.n_eqns();
        let n_pairs = pattern.n_off_diagonal_entries() / 2;

        Self {
            pattern,
            diagonal: vec![0.0; n],
            upper: vec![0.0; n_pairs],
            lower: vec![0.0; n_pairs],
        }
    }

    /// Number of rows (and columns)
    pub fn n(&self) -> usize {
        self.diagonal.len()
    }

    pub fn pattern(&self) -> &SparsityPattern {
        &self.pattern
    }

    /// Value of entry `(i, j)`
    ///
    /// Panics if the entry is not stored
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self[[i, j]]
    }

    /// Add a value onto an entry
    pub fn add(&mut self, entry: [usize; 2], value: f64) {
        self[entry] += value;
    }

    /// Set every stored entry to zero (the sparsity pattern is retained)
    pub fn zero_entries(&mut self) {
        self.diagonal.iter_mut().for_each(|v| *v = 0.0);
        self.upper.iter_mut().for_each(|v| *v = 0.0);
        self.lower.iter_mut().for_each(|v| *v = 0.0);
    }

    /// Iterate over all stored entries: the diagonal, then the upper triangle, then the lower triangle
    pub fn iter_entries(&self) -> impl Iterator<Item = ([usize; 2], f64)> + '_ {
        let diagonal = self.diagonal.iter().enumerate().map(|(i, v)| ([i, i], *v));
        let upper = self
            .pattern
            .iter()
            .zip(self.upper.iter())
            .map(|([i, j], v)| ([*i, *j], *v));
        let lower = self
            .pattern
            .iter()
            .zip(self.lower.iter())
            .map(|([i, j], v)| ([*j, *i], *v));

        diagonal.chain(upper).chain(lower)
    }

    /// Whether every pair of mirrored entries agrees up to [`SYMMETRY_TOLERANCE`] (relative)
    pub fn symmetric(&self) -> bool {
        self.upper
            .iter()
            .zip(self.lower.iter())
            .all(|(a, b)| (a - b).abs() <= (a.abs() + b.abs()) * SYMMETRY_TOLERANCE)
    }

    /// Whether the magnitude of every diagonal entry is strictly larger than the sum of the magnitudes of the other entries in its row
    pub fn diagonally_dominant(&self) -> bool {
        let mut margins: Vec<f64> = self.diagonal.iter().map(|d| d.abs()).collect();

        for (idx, [i, j]) in self.pattern.iter().enumerate() {
            margins[*i] -= self.upper[idx].abs();
            margins[*j] -= self.lower[idx].abs();
        }

        margins.iter().all(|margin| *margin > 0.0)
    }

    /// Symmetric and strictly diagonally dominant
    ///
    /// This is only a sufficient test for positive definiteness (given a positive diagonal):
    /// some SPD matrices that are not diagonally dominant will be reported as `false`
    pub fn spd(&self) -> bool {
        self.symmetric() && self.diagonally_dominant()
    }

    /// dst = A * src
    pub fn vmult(&self, src: &DVector<f64>, dst: &mut DVector<f64>) {
        self.check_vector_sizes(src, dst);
        dst.fill(0.0);
        self.accumulate_product(src, dst);
    }

    /// dst += A * src
    pub fn vmult_add(&self, src: &DVector<f64>, dst: &mut DVector<f64>) {
        self.check_vector_sizes(src, dst);
        self.accumulate_product(src, dst);
    }

    fn accumulate_product(&self, src: &DVector<f64>, dst: &mut DVector<f64>) {
        for (row, d) in self.diagonal.iter().enumerate() {
            dst[row] += d * src[row];
        }

        for (idx, [i, j]) in self.pattern.iter().enumerate() {
            dst[*i] += self.upper[idx] * src[*j];
            dst[*j] += self.lower[idx] * src[*i];
        }
    }

    fn check_vector_sizes(&self, src: &DVector<f64>, dst: &DVector<f64>) {
        assert_eq!(
            src.len(),
            self.n(),
            "Source vector has length {}; expected {}!",
            src.len(),
            self.n()
        );
        assert_eq!(
            dst.len(),
            self.n(),
            "Destination vector has length {}; expected {}!",
            dst.len(),
            self.n()
        );
    }

    // position of an entry in one of the three storage arrays
    fn locate(&self, [i, j]: [usize; 2]) -> Slot {
        assert!(
            i < self.n() && j < self.n(),
            "Entry ({}, {}) is outside of the {}x{} matrix!",
            i,
            j,
            self.n(),
            self.n()
        );

        match i.cmp(&j) {
            std::cmp::Ordering::Equal => Slot::Diagonal(i),
            std::cmp::Ordering::Less => Slot::Upper(self.pattern.arrow_index_from_ij(i, j)),
            std::cmp::Ordering::Greater => Slot::Lower(self.pattern.arrow_index_from_ij(j, i)),
        }
    }
}

enum Slot {
    Diagonal(usize),
    Upper(usize),
    Lower(usize),
}

impl Index<[usize; 2]> for SparseMatrix {
    type Output = f64;

    fn index(&self, entry: [usize; 2]) -> &Self::Output {
        match self.locate(entry) {
            Slot::Diagonal(idx) => &self.diagonal[idx],
            Slot::Upper(idx) => &self.upper[idx],
            Slot::Lower(idx) => &self.lower[idx],
        }
    }
}

impl IndexMut<[usize; 2]> for SparseMatrix {
    fn index_mut(&mut self, entry: [usize; 2]) -> &mut Self::Output {
        match self.locate(entry) {
            Slot::Diagonal(idx) => &mut self.diagonal[idx],
            Slot::Upper(idx) => &mut self.upper[idx],
            Slot::Lower(idx) => &mut self.lower[idx],
        }
    }
}

impl From<&SparseMatrix> for DMatrix<f64> {
    fn from(sm: &SparseMatrix) -> Self {
        let mut dense = DMatrix::zeros(sm.n(), sm.n());
        for ([r, c], v) in sm.iter_entries() {
            dense[(r, c)] = v;
        }
        dense
    }
}

impl From<&SparseMatrix> for AIJMatrixBinary {
    fn from(sm: &SparseMatrix) -> Self {
        // sorted by row then column
        let entries: BTreeMap<[usize; 2], f64> = sm.iter_entries().collect();

        // number of entries in each row
        let mut row_counts = vec![0; sm.n()];
        for [r, _] in entries.keys() {
            row_counts[*r] += 1;
        }

        // matrix entries and their associated columns
        let (j, a) = entries.iter().map(|([_, c], v)| (*c as i32, *v)).unzip();

        AIJMatrixBinary {
            a,
            i: row_counts,
            j,
            dim: sm.n(),
        }
    }
}

/// Petsc Sparse Matrix Format
pub struct AIJMatrixBinary {
    pub a: Vec<f64>,
    pub i: Vec<i32>, // Number of entries on each row (compute a prefix sum to get canonical form)
    pub j: Vec<i32>,
    pub dim: usize,
}

impl AIJMatrixBinary {
    /// Encode the matrix in PETSc's binary format (big-endian)
    pub fn to_petsc_bytes(&self) -> Bytes {
        let mut buf =
            BytesMut::with_capacity(16 + 4 * self.i.len() + 4 * self.j.len() + 8 * self.a.len());

        // header
        buf.put_i32(PETSC_MAT_FILE_CLASSID);
        buf.put_u32(self.dim as u32);
        buf.put_u32(self.dim as u32);
        buf.put_u32(self.a.len() as u32);

        // num-non-zero entries on each row
        for &rnz in self.i.iter() {
            buf.put_i32(rnz);
        }

        // column indices of non-zero entries
        for &j in self.j.iter() {
            buf.put_i32(j);
        }

        // non-zero entries
        for &a in self.a.iter() {
            buf.put_f64(a);
        }

        buf.freeze()
    }

    pub fn print_to_petsc_binary_file(&self, path: impl AsRef<str>) -> std::io::Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);

        writer.write_all(self.to_petsc_bytes().as_ref())?;
        writer.flush()
    }
}
