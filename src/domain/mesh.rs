/// Boundary patches: named, contiguous ranges of boundary `Face`s
pub mod boundary;
/// The control volumes of the Mesh
pub mod cell;
/// The interfaces between neighbouring control volumes
pub mod face;
/// Structured box and rectangle meshes
pub mod generator;
/// Area, volume and centroid computations over ordered vertex lists
pub mod geometry;
/// Points in 1, 2 or 3 dimensional Real Space
pub mod space;
/// Orientation fixing, neighbour derivation, and face interpolation geometry
pub mod topology;

use boundary::BoundaryPatch;
use cell::{unique_vertices, Cell};
use face::Face;
use space::Point;
use topology::TopologyError;

#[cfg(feature = "json_export")]
use json::{object, JsonValue};
#[cfg(feature = "json_export")]
use std::fs::File;
#[cfg(feature = "json_export")]
use std::io::BufWriter;
use std::ops::Range;
use tracing::debug;

/// The expected number of Cells adjacent to a Face. This determines the stack allocation size of each Face's neighbour list
pub const EXPECTED_FACE_NEIGHBOURS: usize = 2;

/// A volumetric mesh of polyhedral Cells
pub type Mesh3D = Mesh<3, 3>;
/// A planar mesh of polygonal Cells
pub type Mesh2D = Mesh<2, 2>;
/// A mesh of polygonal Cells on a surface in 3D space
pub type SurfaceMesh = Mesh<2, 3>;

/// An unstructured mesh of `DIM`-dimensional Cells embedded in `SPACEDIM`-dimensional space
///
/// Points, Faces and Cells are stored in flat arenas and refer to one another by index.
///
/// Face numbering follows a fixed convention: all internal Faces come first, followed by the boundary Faces,
/// grouped contiguously by [`BoundaryPatch`] in patch order.
///
/// A `Mesh` can only be obtained through one of its constructors, which compute all geometry and then run the
/// finishing passes in order:
/// 1. orient every Face's area-vector away from its owner Cell
/// 2. derive each Cell's neighbour list
/// 3. compute each Face's `delta` and `interpolation_factor`
#[derive(Debug, Clone)]
pub struct Mesh<const DIM: usize, const SPACEDIM: usize> {
    points: Vec<Point<f64, SPACEDIM>>,
    faces: Vec<Face<DIM, SPACEDIM>>,
    cells: Vec<Cell<DIM, SPACEDIM>>,
    patches: Vec<BoundaryPatch>,
}

impl<const DIM: usize, const SPACEDIM: usize> Mesh<DIM, SPACEDIM> {
    /// Construct a Mesh where each Cell is described by the list of its Face ids
    ///
    /// A Face's owner is the first Cell that lists it.
    ///
    /// * `points`: the coordinates of every vertex
    /// * `faces`: the vertex ids of each Face (in cyclic order)
    /// * `cells`: the Face ids of each Cell (the edges of a polygonal Cell may be listed in any order)
    /// * `patches`: the boundary patches (which must cover all Faces after the internal ones, in order)
    pub fn from_cells(
        points: Vec<Point<f64, SPACEDIM>>,
        faces: Vec<Vec<usize>>,
        cells: Vec<Vec<usize>>,
        patches: Vec<BoundaryPatch>,
    ) -> Result<Self, TopologyError> {
        check_dimensions::<DIM, SPACEDIM>()?;
        if cells.is_empty() {
            return Err(TopologyError::EmptyMesh);
        }

        let mut face_arena = build_faces::<DIM, SPACEDIM>(&points, faces)?;

        for (cell_id, face_ids) in cells.iter().enumerate() {
            if face_ids.is_empty() {
                return Err(TopologyError::EmptyCell { cell: cell_id });
            }
            if let Some(face_id) = face_ids.iter().find(|f| **f >= face_arena.len()) {
                return Err(TopologyError::FaceOutOfRange {
                    cell: cell_id,
                    face: *face_id,
                    n_faces: face_arena.len(),
                });
            }
        }

        let mut cell_arena = Vec::with_capacity(cells.len());
        for (cell_id, face_ids) in cells.into_iter().enumerate() {
            let cell = build_cell(cell_id, face_ids, &face_arena, &points)?;
            for face_id in cell.faces() {
                face_arena[*face_id].connect_cell(cell_id);
            }
            cell_arena.push(cell);
        }

        Self::finish(points, face_arena, cell_arena, patches)
    }

    /// Construct a Mesh from owner/neighbour lists
    ///
    /// * `owner[f]` is the Cell that owns Face `f` (one entry per Face)
    /// * `neighbour[f]` is the other Cell adjacent to internal Face `f` (one entry per internal Face)
    ///
    /// The number of Cells is inferred from the largest Cell id referenced.
    pub fn from_owner_neighbour(
        points: Vec<Point<f64, SPACEDIM>>,
        faces: Vec<Vec<usize>>,
        owner: Vec<usize>,
        neighbour: Vec<usize>,
        patches: Vec<BoundaryPatch>,
    ) -> Result<Self, TopologyError> {
        check_dimensions::<DIM, SPACEDIM>()?;
        if owner.len() != faces.len() {
            return Err(TopologyError::OwnerCountMismatch {
                n_owner: owner.len(),
                n_faces: faces.len(),
            });
        }
        let n_internal = internal_face_count(&patches, faces.len());
        if neighbour.len() != n_internal {
            return Err(TopologyError::NeighbourCountMismatch {
                n_neighbour: neighbour.len(),
                n_internal,
            });
        }

        let n_cells = match owner.iter().chain(neighbour.iter()).max() {
            Some(max_cell_id) => max_cell_id + 1,
            None => return Err(TopologyError::EmptyMesh),
        };

        let mut face_arena = build_faces::<DIM, SPACEDIM>(&points, faces)?;

        let mut cell_faces: Vec<Vec<usize>> = vec![Vec::new(); n_cells];
        for (face_id, face) in face_arena.iter_mut().enumerate() {
            let neighbour_id = neighbour.get(face_id).copied();
            face.set_neighbours(owner[face_id], neighbour_id);

            cell_faces[owner[face_id]].push(face_id);
            if let Some(neighbour_id) = neighbour_id {
                cell_faces[neighbour_id].push(face_id);
            }
        }

        let cell_arena = cell_faces
            .into_iter()
            .enumerate()
            .map(|(cell_id, face_ids)| {
                if face_ids.is_empty() {
                    return Err(TopologyError::EmptyCell { cell: cell_id });
                }
                build_cell(cell_id, face_ids, &face_arena, &points)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::finish(points, face_arena, cell_arena, patches)
    }

    // mark boundary faces, then run the finishing passes in order
    fn finish(
        points: Vec<Point<f64, SPACEDIM>>,
        mut faces: Vec<Face<DIM, SPACEDIM>>,
        mut cells: Vec<Cell<DIM, SPACEDIM>>,
        patches: Vec<BoundaryPatch>,
    ) -> Result<Self, TopologyError> {
        apply_patches(&mut faces, &patches)?;

        topology::fix_normals(&mut faces, &cells)?;
        topology::determine_cell_neighbours(&faces, &mut cells);
        topology::compute_interpolation_geometry(&mut faces, &cells);

        debug!(
            "constructed {}D Mesh: {} points, {} faces ({} internal), {} cells, {} patches",
            DIM,
            points.len(),
            faces.len(),
            internal_face_count(&patches, faces.len()),
            cells.len(),
            patches.len()
        );

        Ok(Self {
            points,
            faces,
            cells,
            patches,
        })
    }

    /// Print the mesh to a JSON file specified by path.
    #[cfg(feature = "json_export")]
    pub fn export_to_json(&self, path: impl AsRef<str>) -> std::io::Result<()> {
        let f = File::create(path.as_ref())?;
        let mut w = BufWriter::new(&f);

        self.to_json().write_pretty(&mut w, 4)?;

        Ok(())
    }

    /// Produce a Json Object that describes this Mesh
    #[cfg(feature = "json_export")]
    pub fn to_json(&self) -> JsonValue {
        object! {
            "Points": JsonValue::from(
                self.points
                    .iter()
                    .map(|p| JsonValue::from(p.iter().copied().collect::<Vec<f64>>()))
                    .collect::<Vec<_>>()
            ),
            "Faces": JsonValue::from(
                self.faces.iter().map(|face| face.to_json()).collect::<Vec<_>>()
            ),
            "Cells": JsonValue::from(
                self.cells.iter().map(|cell| cell.to_json()).collect::<Vec<_>>()
            ),
            "Patches": JsonValue::from(
                self.patches
                    .iter()
                    .map(|patch| object! {
                        "name": patch.name.clone(),
                        "type": patch.kind.to_string(),
                        "n_faces": patch.n_faces,
                        "start_face": patch.start_face,
                    })
                    .collect::<Vec<_>>()
            ),
        }
    }

    // ----------------------------------------------------------------------------------------------------
    // General Data Retrieval
    // ----------------------------------------------------------------------------------------------------

    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn n_boundary_patches(&self) -> usize {
        self.patches.len()
    }

    /// Number of Faces that are not on the boundary (these are numbered before all boundary Faces)
    pub fn n_internal_faces(&self) -> usize {
        internal_face_count(&self.patches, self.faces.len())
    }

    pub fn point(&self, point_id: usize) -> &Point<f64, SPACEDIM> {
        assert!(
            point_id < self.points.len(),
            "Point {} does not exist!",
            point_id
        );
        &self.points[point_id]
    }

    pub fn face(&self, face_id: usize) -> &Face<DIM, SPACEDIM> {
        assert!(face_id < self.faces.len(), "Face {} does not exist!", face_id);
        &self.faces[face_id]
    }

    pub fn cell(&self, cell_id: usize) -> &Cell<DIM, SPACEDIM> {
        assert!(cell_id < self.cells.len(), "Cell {} does not exist!", cell_id);
        &self.cells[cell_id]
    }

    pub fn points(&self) -> &[Point<f64, SPACEDIM>] {
        &self.points
    }

    pub fn faces(&self) -> &[Face<DIM, SPACEDIM>] {
        &self.faces
    }

    pub fn cells(&self) -> &[Cell<DIM, SPACEDIM>] {
        &self.cells
    }

    pub fn patches(&self) -> &[BoundaryPatch] {
        &self.patches
    }

    /// Iterate over all internal `Face`s
    pub fn internal_faces(&self) -> impl Iterator<Item = &Face<DIM, SPACEDIM>> + '_ {
        self.faces[0..self.n_internal_faces()].iter()
    }

    /// Iterate over all boundary `Face`s
    pub fn boundary_faces(&self) -> impl Iterator<Item = &Face<DIM, SPACEDIM>> + '_ {
        self.faces[self.n_internal_faces()..].iter()
    }

    /// Iterate over the `Face`s of one boundary patch
    pub fn patch_faces(&self, patch_id: usize) -> impl Iterator<Item = &Face<DIM, SPACEDIM>> + '_ {
        assert!(
            patch_id < self.patches.len(),
            "Boundary patch {} does not exist!",
            patch_id
        );
        self.faces[self.patches[patch_id].faces()].iter()
    }

    /// Find the Cell containing a Point
    ///
    /// A Point is inside a Cell if it lies on the inner side of all of the Cell's Faces. This is only meaningful for convex Cells.
    /// Points on a Face shared by two Cells are attributed to the lower numbered Cell.
    ///
    /// Panics for meshes whose Faces have no normal (lines embedded in 3D)
    pub fn cell_containing_point(&self, point: &Point<f64, SPACEDIM>) -> Option<usize> {
        assert!(
            DIM == SPACEDIM,
            "Cannot locate Points in a {}D Mesh embedded in {}D space!",
            DIM,
            SPACEDIM
        );

        self.cells
            .iter()
            .find(|cell| {
                cell.faces().iter().all(|face_id| {
                    let face = &self.faces[*face_id];
                    let outward = if face.owner() == cell.id {
                        face.area_vector()
                    } else {
                        face.area_vector() * -1.0
                    };
                    outward.dot(&(*point - *face.center())) <= 0.0
                })
            })
            .map(|cell| cell.id)
    }
}

fn check_dimensions<const DIM: usize, const SPACEDIM: usize>() -> Result<(), TopologyError> {
    if (DIM == 2 || DIM == 3) && (SPACEDIM == 2 || SPACEDIM == 3) && SPACEDIM >= DIM {
        Ok(())
    } else {
        Err(TopologyError::UnsupportedDimension {
            dim: DIM,
            spacedim: SPACEDIM,
        })
    }
}

fn internal_face_count(patches: &[BoundaryPatch], n_faces: usize) -> usize {
    patches.first().map_or(n_faces, |patch| patch.start_face)
}

fn build_faces<const DIM: usize, const SPACEDIM: usize>(
    points: &[Point<f64, SPACEDIM>],
    faces: Vec<Vec<usize>>,
) -> Result<Vec<Face<DIM, SPACEDIM>>, TopologyError> {
    faces
        .into_iter()
        .enumerate()
        .map(|(face_id, vertices)| {
            let (valid, expected) = match DIM {
                2 => (vertices.len() == 2, "exactly 2"),
                _ => (vertices.len() >= 3, "at least 3"),
            };
            if !valid {
                return Err(TopologyError::InvalidVertexCount {
                    face: face_id,
                    found: vertices.len(),
                    expected,
                });
            }
            if let Some(point_id) = vertices.iter().find(|v| **v >= points.len()) {
                return Err(TopologyError::PointOutOfRange {
                    face: face_id,
                    point: *point_id,
                    n_points: points.len(),
                });
            }
            Ok(Face::new(face_id, vertices, points))
        })
        .collect()
}

fn apply_patches<const DIM: usize, const SPACEDIM: usize>(
    faces: &mut [Face<DIM, SPACEDIM>],
    patches: &[BoundaryPatch],
) -> Result<(), TopologyError> {
    let mut expected_start = internal_face_count(patches, faces.len());

    for (patch_id, patch) in patches.iter().enumerate() {
        if patch.start_face != expected_start {
            return Err(TopologyError::PatchOutOfOrder {
                name: patch.name.clone(),
                start_face: patch.start_face,
                expected: expected_start,
            });
        }
        let face_range: Range<usize> = patch.faces();
        if face_range.end > faces.len() {
            return Err(TopologyError::PatchesIncomplete {
                end: face_range.end,
                n_faces: faces.len(),
            });
        }
        for face in faces[face_range.clone()].iter_mut() {
            face.mark_boundary(patch_id);
        }
        expected_start = face_range.end;
    }

    if expected_start != faces.len() {
        return Err(TopologyError::PatchesIncomplete {
            end: expected_start,
            n_faces: faces.len(),
        });
    }

    Ok(())
}

// Construct a Cell whose geometry encloses a region of positive volume
//
// Polygonal cells have their edges chained first, so their vertices are visited in cyclic order
fn build_cell<const DIM: usize, const SPACEDIM: usize>(
    cell_id: usize,
    face_ids: Vec<usize>,
    faces: &[Face<DIM, SPACEDIM>],
    points: &[Point<f64, SPACEDIM>],
) -> Result<Cell<DIM, SPACEDIM>, TopologyError> {
    let face_ids = if DIM == 2 {
        let chain = chain_faces(cell_id, face_ids, faces)?;
        let n_vertices = unique_vertices(chain.iter().map(|f| faces[*f].vertices())).len();
        if n_vertices < 3 {
            return Err(TopologyError::DegenerateCell { cell: cell_id });
        }
        chain
    } else {
        face_ids
    };

    let cell = Cell::new(cell_id, face_ids, faces, points);
    if !(cell.volume() > 0.0) {
        return Err(TopologyError::DegenerateCell { cell: cell_id });
    }

    Ok(cell)
}

// order the edges of a polygonal cell such that consecutive edges share a vertex
fn chain_faces<const DIM: usize, const SPACEDIM: usize>(
    cell_id: usize,
    mut remaining: Vec<usize>,
    faces: &[Face<DIM, SPACEDIM>],
) -> Result<Vec<usize>, TopologyError> {
    let first = remaining.remove(0);
    let start = faces[first].vertices()[0];
    let mut tail = faces[first].vertices()[1];
    let mut chain = vec![first];

    while !remaining.is_empty() {
        let next = remaining
            .iter()
            .position(|f| faces[*f].vertices().contains(&tail))
            .ok_or(TopologyError::OpenCell { cell: cell_id })?;
        let face_id = remaining.remove(next);

        let vertices = faces[face_id].vertices();
        tail = if vertices[0] == tail {
            vertices[1]
        } else {
            vertices[0]
        };
        chain.push(face_id);
    }

    if tail != start {
        return Err(TopologyError::OpenCell { cell: cell_id });
    }

    Ok(chain)
}
