use super::cell::Cell;
use super::face::Face;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Defects in the topology handed to the `Mesh` constructors
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("Mesh has no Cells!")]
    EmptyMesh,
    #[error("Mesh of dimension {dim} embedded in {spacedim}D space is not supported!")]
    UnsupportedDimension { dim: usize, spacedim: usize },
    #[error("Face {face} references Point {point}, but the Mesh only has {n_points} Points!")]
    PointOutOfRange {
        face: usize,
        point: usize,
        n_points: usize,
    },
    #[error("Cell {cell} references Face {face}, but the Mesh only has {n_faces} Faces!")]
    FaceOutOfRange {
        cell: usize,
        face: usize,
        n_faces: usize,
    },
    #[error("Face {face} has {found} vertices; expected {expected}!")]
    InvalidVertexCount {
        face: usize,
        found: usize,
        expected: &'static str,
    },
    #[error("Cell {cell} has no Faces!")]
    EmptyCell { cell: usize },
    #[error("Faces of Cell {cell} do not form a closed chain!")]
    OpenCell { cell: usize },
    #[error("Cell {cell} does not enclose a region (its volume is not positive)!")]
    DegenerateCell { cell: usize },
    #[error("Face {face} has {count} adjacent Cells; a Face should only have one or two!")]
    InvalidNeighbourCount { face: usize, count: usize },
    #[error("Face {face} has only one adjacent Cell but is not on a boundary patch!")]
    UnmarkedBoundaryFace { face: usize },
    #[error("Face {face} belongs to boundary patch {patch} but has two adjacent Cells!")]
    BoundaryFaceWithTwoCells { face: usize, patch: usize },
    #[error("Boundary patch '{name}' starts at Face {start_face}; expected it to start at Face {expected}!")]
    PatchOutOfOrder {
        name: String,
        start_face: usize,
        expected: usize,
    },
    #[error("Boundary patches end at Face {end}, but the Mesh has {n_faces} Faces!")]
    PatchesIncomplete { end: usize, n_faces: usize },
    #[error("Owner list has {n_owner} entries, but the Mesh has {n_faces} Faces!")]
    OwnerCountMismatch { n_owner: usize, n_faces: usize },
    #[error("Neighbour list has {n_neighbour} entries, but the Mesh has {n_internal} internal Faces!")]
    NeighbourCountMismatch {
        n_neighbour: usize,
        n_internal: usize,
    },
}

/// Orient every Face's area-vector away from its owner Cell
///
/// Also checks that each Face has one (boundary) or two (internal) adjacent Cells.
/// Returns the number of area-vectors that had to be flipped.
pub(crate) fn fix_normals<const DIM: usize, const SPACEDIM: usize>(
    faces: &mut [Face<DIM, SPACEDIM>],
    cells: &[Cell<DIM, SPACEDIM>],
) -> Result<usize, TopologyError> {
    let mut n_flipped = 0;

    for face in faces.iter_mut() {
        match (face.neighbour_indices().len(), face.is_boundary()) {
            (1, true) | (2, false) => (),
            (1, false) => return Err(TopologyError::UnmarkedBoundaryFace { face: face.id }),
            (2, true) => {
                return Err(TopologyError::BoundaryFaceWithTwoCells {
                    face: face.id,
                    patch: face.boundary_id(),
                })
            }
            (count, _) => {
                return Err(TopologyError::InvalidNeighbourCount {
                    face: face.id,
                    count,
                })
            }
        }

        let owner_center = *cells[face.owner()].center();
        if face.orient_away_from(&owner_center) {
            trace!("flipped area-vector of Face {} away from Cell {}", face.id, face.owner());
            n_flipped += 1;
        }
    }

    debug!("oriented {} Faces ({} flipped)", faces.len(), n_flipped);
    Ok(n_flipped)
}

/// Register the Cells on either side of every internal Face as neighbours of each other
pub(crate) fn determine_cell_neighbours<const DIM: usize, const SPACEDIM: usize>(
    faces: &[Face<DIM, SPACEDIM>],
    cells: &mut [Cell<DIM, SPACEDIM>],
) {
    for face in faces.iter().filter(|face| !face.is_boundary()) {
        let [a, b] = [face.neighbour_indices()[0], face.neighbour_indices()[1]];
        cells[a].add_neighbour(b);
        cells[b].add_neighbour(a);
    }
}

/// Compute the `delta` and `interpolation_factor` of every Face
///
/// Must run after the Faces have been oriented, as both depend on which Cell owns the Face.
pub(crate) fn compute_interpolation_geometry<const DIM: usize, const SPACEDIM: usize>(
    faces: &mut [Face<DIM, SPACEDIM>],
    cells: &[Cell<DIM, SPACEDIM>],
) {
    for face in faces.iter_mut() {
        debug_assert!(face.is_oriented(), "Face {} has not been oriented!", face.id);
        let owner_center = cells[face.owner()].center();

        let (distance, interpolation_factor) = match face.neighbour() {
            None => (face.center().distance(owner_center), 1.0),
            Some(neighbour) => {
                let owner_to_neighbour = owner_center.distance(cells[neighbour].center());
                (
                    owner_to_neighbour,
                    owner_center.distance(face.center()) / owner_to_neighbour,
                )
            }
        };

        if distance == 0.0 {
            warn!(
                "Face {} has a zero centroid distance to its adjacent Cell(s); its delta is infinite",
                face.id
            );
        }

        face.set_interpolation(1.0 / distance, interpolation_factor);
    }
}
