use crate::domain::mesh::Mesh;
#[cfg(feature = "json_export")]
use json::{object, JsonValue};
use std::collections::BTreeMap;
use std::io::Write;
use thiserror::Error;
use tracing::debug;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SparsityError {
    #[error("Cannot construct a sparsity pattern for a Mesh without Cells!")]
    EmptyMesh,
    #[error("Face {face} is numbered among the internal Faces but lies on a boundary patch!")]
    BoundaryFaceInInternalRange { face: usize },
    #[error("Internal Face {face} couples Cell {cell} to itself!")]
    SelfCoupling { face: usize, cell: usize },
    #[error("Internal Face {face} couples Cells ({i}, {j}) which are already coupled by another Face!")]
    DuplicateCoupling { face: usize, i: usize, j: usize },
    #[error("Entry ({i}, {j}) is not part of the sparsity pattern!")]
    NotInPattern { i: usize, j: usize },
}

/// The non-zero structure of a matrix whose rows and columns correspond to the Cells of a Mesh
///
/// Two Cells are coupled iff they share an internal Face. Each coupling is stored once as a pair `[i, j]` with `i < j`,
/// at the position of its Face in the internal Face numbering (its "arrow index").
#[derive(Clone, Debug, PartialEq)]
pub struct SparsityPattern {
    n: usize,
    ij_indices: Vec<[usize; 2]>,
    reverse_lookup: BTreeMap<[usize; 2], usize>,
}

impl SparsityPattern {
    pub fn new<const DIM: usize, const SPACEDIM: usize>(
        mesh: &Mesh<DIM, SPACEDIM>,
    ) -> Result<Self, SparsityError> {
        let n = mesh.n_cells();
        if n == 0 {
            return Err(SparsityError::EmptyMesh);
        }

        let n_internal = mesh.n_internal_faces();
        let mut ij_indices = Vec::with_capacity(n_internal);
        let mut reverse_lookup = BTreeMap::new();

        for face in mesh.faces()[0..n_internal].iter() {
            if face.is_boundary() {
                return Err(SparsityError::BoundaryFaceInInternalRange { face: face.id });
            }

            let [a, b] = [face.neighbour_indices()[0], face.neighbour_indices()[1]];
            if a == b {
                return Err(SparsityError::SelfCoupling {
                    face: face.id,
                    cell: a,
                });
            }

            let ij = [a.min(b), a.max(b)];
            if reverse_lookup.insert(ij, ij_indices.len()).is_some() {
                return Err(SparsityError::DuplicateCoupling {
                    face: face.id,
                    i: ij[0],
                    j: ij[1],
                });
            }
            ij_indices.push(ij);
        }

        let pattern = Self {
            n,
            ij_indices,
            reverse_lookup,
        };
        debug!(
            "sparsity pattern: {} equations, {} off-diagonal entries, band {}",
            pattern.n_eqns(),
            pattern.n_off_diagonal_entries(),
            pattern.matrix_band()
        );

        Ok(pattern)
    }

    /// Number of rows (and columns) of the matrix
    pub fn n_eqns(&self) -> usize {
        self.n
    }

    /// Number of entries off the diagonal (both triangles)
    pub fn n_off_diagonal_entries(&self) -> usize {
        2 * self.ij_indices.len()
    }

    /// Largest distance between a stored entry and the diagonal
    pub fn matrix_band(&self) -> usize {
        self.ij_indices
            .iter()
            .map(|[i, j]| j - i)
            .max()
            .unwrap_or(0)
    }

    /// Position of the pair `[i, j]` in the pattern
    ///
    /// Panics unless `i < j` and Cells `i` and `j` share an internal Face
    pub fn arrow_index_from_ij(&self, i: usize, j: usize) -> usize {
        match self.try_arrow_index_from_ij(i, j) {
            Ok(idx) => idx,
            Err(err) => panic!("{}", err),
        }
    }

    /// Position of the pair `[i, j]` in the pattern; `Err` if the Cells are not coupled
    ///
    /// Panics unless `i < j`
    pub fn try_arrow_index_from_ij(&self, i: usize, j: usize) -> Result<usize, SparsityError> {
        assert!(
            i < j,
            "Arrow indices are only defined above the diagonal; got ({}, {})!",
            i,
            j
        );
        self.reverse_lookup
            .get(&[i, j])
            .copied()
            .ok_or(SparsityError::NotInPattern { i, j })
    }

    pub fn ij_from_arrow_index(&self, idx: usize) -> [usize; 2] {
        assert!(
            idx < self.ij_indices.len(),
            "Arrow index {} is out of range; the pattern has {} pairs!",
            idx,
            self.ij_indices.len()
        );
        self.ij_indices[idx]
    }

    /// Iterate over the stored pairs in arrow index order
    pub fn iter(&self) -> impl Iterator<Item = &[usize; 2]> + '_ {
        self.ij_indices.iter()
    }

    /// Write the positions of all non-zero entries in a format that can be plotted with gnuplot
    ///
    /// Each line holds a column and a negated row index so the plot matches the usual matrix layout
    pub fn write_gnuplot(&self, mut w: impl Write) -> std::io::Result<()> {
        for i in 0..self.n {
            writeln!(w, "{} {}", i, -(i as i64))?;
        }
        for [i, j] in self.ij_indices.iter() {
            writeln!(w, "{} {}", i, -(*j as i64))?;
            writeln!(w, "{} {}", j, -(*i as i64))?;
        }
        Ok(())
    }

    /// Produce a Json Object that describes this sparsity pattern
    #[cfg(feature = "json_export")]
    pub fn to_json(&self) -> JsonValue {
        object! {
            "n_eqns": self.n,
            "band": self.matrix_band(),
            "pairs": JsonValue::from(
                self.ij_indices
                    .iter()
                    .map(|ij| JsonValue::from(ij.to_vec()))
                    .collect::<Vec<_>>()
            ),
        }
    }
}
