//! Geometry kernel for finite volume meshes
//!
//! A [`Mesh`] is built from a topology (points, faces and cells) through one of its constructors. The face and
//! cell geometry needed by a finite volume discretisation (areas, outward area-vectors, volumes, centroids,
//! and face interpolation data) is computed once at construction.
//!
//! The internal faces of a mesh define the [`SparsityPattern`] of the linear systems assembled over it,
//! which a [`SparseMatrix`] stores in "arrow" format.
//!
//! ```
//! use fvm_mesh::domain::mesh::generator::{box_mesh, BoxMeshSpec};
//! use fvm_mesh::{SparseMatrix, SparsityPattern};
//! use std::sync::Arc;
//!
//! let mesh = box_mesh(BoxMeshSpec::new([1.0, 1.0, 1.0], [4, 4, 4])).unwrap();
//! let pattern = Arc::new(SparsityPattern::new(&mesh).unwrap());
//! let mut matrix = SparseMatrix::new(pattern);
//!
//! for face in mesh.internal_faces() {
//!     let [owner, neighbour] = [face.owner(), face.neighbour().unwrap()];
//!     let coefficient = face.area() * face.delta();
//!
//!     matrix.add([owner, owner], coefficient);
//!     matrix.add([neighbour, neighbour], coefficient);
//!     matrix.add([owner, neighbour], -coefficient);
//!     matrix.add([neighbour, owner], -coefficient);
//! }
//!
//! assert!(matrix.symmetric());
//! ```

/// Meshes and their geometric entities
pub mod domain;
/// Sparse linear algebra over the Cells of a Mesh
pub mod linalg;

pub use domain::mesh::{
    boundary::{BoundaryPatch, BoundaryType},
    cell::Cell,
    face::Face,
    space::{Point, Point2, Point3},
    topology::TopologyError,
    Mesh, Mesh2D, Mesh3D, SurfaceMesh,
};
pub use linalg::{SparseMatrix, SparsityError, SparsityPattern};
