/// Sparsely Packed Matrix in "arrow" format
pub mod sparse_matrix;
/// Non-zero structure derived from the internal Faces of a Mesh
pub mod sparsity_pattern;

pub use sparse_matrix::{AIJMatrixBinary, SparseMatrix};
pub use sparsity_pattern::{SparsityError, SparsityPattern};
