use super::boundary::{BoundaryPatch, BoundaryType};
use super::space::{Point2, Point3};
use super::topology::TopologyError;
use super::{Mesh2D, Mesh3D};
use tracing::debug;

/// Names of the side patches of a box mesh (in patch order)
pub const BOX_PATCH_NAMES: [&str; 6] = ["x_min", "x_max", "y_min", "y_max", "z_min", "z_max"];

/// Names of the side patches of a rectangle mesh (in patch order)
pub const RECTANGLE_PATCH_NAMES: [&str; 4] = ["x_min", "x_max", "y_min", "y_max"];

/// Description of a structured hexahedral mesh of an axis-aligned box
#[derive(Clone, Debug, PartialEq)]
pub struct BoxMeshSpec {
    /// Corner of the box with the smallest coordinates
    pub origin: Point3,
    /// Side lengths of the box
    pub lengths: [f64; 3],
    /// Number of Cells along each axis
    pub n_cells: [usize; 3],
    /// Boundary type of each side patch (ordered as [`BOX_PATCH_NAMES`])
    pub boundary_types: [BoundaryType; 6],
}

impl BoxMeshSpec {
    pub fn new(lengths: [f64; 3], n_cells: [usize; 3]) -> Self {
        Self {
            lengths,
            n_cells,
            ..Self::default()
        }
    }
}

impl Default for BoxMeshSpec {
    fn default() -> Self {
        Self {
            origin: Point3::origin(),
            lengths: [1.0; 3],
            n_cells: [1; 3],
            boundary_types: [BoundaryType::Wall; 6],
        }
    }
}

/// Description of a structured quadrilateral mesh of an axis-aligned rectangle
#[derive(Clone, Debug, PartialEq)]
pub struct RectangleMeshSpec {
    pub origin: Point2,
    pub lengths: [f64; 2],
    pub n_cells: [usize; 2],
    /// Boundary type of each side patch (ordered as [`RECTANGLE_PATCH_NAMES`])
    pub boundary_types: [BoundaryType; 4],
}

impl RectangleMeshSpec {
    pub fn new(lengths: [f64; 2], n_cells: [usize; 2]) -> Self {
        Self {
            lengths,
            n_cells,
            ..Self::default()
        }
    }
}

impl Default for RectangleMeshSpec {
    fn default() -> Self {
        Self {
            origin: Point2::origin(),
            lengths: [1.0; 2],
            n_cells: [1; 2],
            boundary_types: [BoundaryType::Wall; 4],
        }
    }
}

// Faces in owner/neighbour form, accumulated in Face id order
#[derive(Default)]
struct FaceList {
    vertices: Vec<Vec<usize>>,
    owner: Vec<usize>,
    neighbour: Vec<usize>,
}

impl FaceList {
    fn push_internal(&mut self, vertices: Vec<usize>, owner: usize, neighbour: usize) {
        self.vertices.push(vertices);
        self.owner.push(owner);
        self.neighbour.push(neighbour);
    }

    fn push_boundary(&mut self, vertices: Vec<usize>, owner: usize) {
        self.vertices.push(vertices);
        self.owner.push(owner);
    }

    fn len(&self) -> usize {
        self.vertices.len()
    }
}

/// Build a structured mesh of an `nx × ny × nz` box
///
/// Cell `(i, j, k)` has id `i + nx * (j + ny * k)`. Internal Faces are numbered first (x-normal, then y-normal, then z-normal),
/// followed by the six side patches ordered as [`BOX_PATCH_NAMES`].
pub fn box_mesh(spec: BoxMeshSpec) -> Result<Mesh3D, TopologyError> {
    let [nx, ny, nz] = spec.n_cells;
    assert!(
        nx > 0 && ny > 0 && nz > 0,
        "A box mesh needs at least one Cell along each axis!"
    );
    assert!(
        spec.lengths.iter().all(|l| *l > 0.0),
        "A box mesh must have positive side lengths!"
    );

    let p = |i: usize, j: usize, k: usize| i + (nx + 1) * (j + (ny + 1) * k);
    let c = |i: usize, j: usize, k: usize| i + nx * (j + ny * k);
    let step = [
        spec.lengths[0] / nx as f64,
        spec.lengths[1] / ny as f64,
        spec.lengths[2] / nz as f64,
    ];

    let mut points = Vec::with_capacity((nx + 1) * (ny + 1) * (nz + 1));
    for k in 0..=nz {
        for j in 0..=ny {
            for i in 0..=nx {
                points.push(
                    spec.origin
                        + Point3::new([
                            i as f64 * step[0],
                            j as f64 * step[1],
                            k as f64 * step[2],
                        ]),
                );
            }
        }
    }

    let x_face = |i: usize, j: usize, k: usize| {
        vec![
            p(i, j, k),
            p(i, j + 1, k),
            p(i, j + 1, k + 1),
            p(i, j, k + 1),
        ]
    };
    let y_face = |i: usize, j: usize, k: usize| {
        vec![
            p(i, j, k),
            p(i + 1, j, k),
            p(i + 1, j, k + 1),
            p(i, j, k + 1),
        ]
    };
    let z_face = |i: usize, j: usize, k: usize| {
        vec![
            p(i, j, k),
            p(i + 1, j, k),
            p(i + 1, j + 1, k),
            p(i, j + 1, k),
        ]
    };

    let mut faces = FaceList::default();

    for k in 0..nz {
        for j in 0..ny {
            for i in 1..nx {
                faces.push_internal(x_face(i, j, k), c(i - 1, j, k), c(i, j, k));
            }
        }
    }
    for k in 0..nz {
        for j in 1..ny {
            for i in 0..nx {
                faces.push_internal(y_face(i, j, k), c(i, j - 1, k), c(i, j, k));
            }
        }
    }
    for k in 1..nz {
        for j in 0..ny {
            for i in 0..nx {
                faces.push_internal(z_face(i, j, k), c(i, j, k - 1), c(i, j, k));
            }
        }
    }

    let mut patch_sizes = [0; 6];
    let mut boundary = |faces: &mut FaceList, patch: usize, vertices: Vec<usize>, owner: usize| {
        faces.push_boundary(vertices, owner);
        patch_sizes[patch] += 1;
    };

    for k in 0..nz {
        for j in 0..ny {
            boundary(&mut faces, 0, x_face(0, j, k), c(0, j, k));
        }
    }
    for k in 0..nz {
        for j in 0..ny {
            boundary(&mut faces, 1, x_face(nx, j, k), c(nx - 1, j, k));
        }
    }
    for k in 0..nz {
        for i in 0..nx {
            boundary(&mut faces, 2, y_face(i, 0, k), c(i, 0, k));
        }
    }
    for k in 0..nz {
        for i in 0..nx {
            boundary(&mut faces, 3, y_face(i, ny, k), c(i, ny - 1, k));
        }
    }
    for j in 0..ny {
        for i in 0..nx {
            boundary(&mut faces, 4, z_face(i, j, 0), c(i, j, 0));
        }
    }
    for j in 0..ny {
        for i in 0..nx {
            boundary(&mut faces, 5, z_face(i, j, nz), c(i, j, nz - 1));
        }
    }

    let patches = side_patches(
        &BOX_PATCH_NAMES,
        &spec.boundary_types,
        &patch_sizes,
        faces.neighbour.len(),
    );

    debug!(
        "generating {}x{}x{} box mesh with {} faces",
        nx,
        ny,
        nz,
        faces.len()
    );

    Mesh3D::from_owner_neighbour(points, faces.vertices, faces.owner, faces.neighbour, patches)
}

/// Build a structured mesh of an `nx × ny` rectangle
///
/// Cell `(i, j)` has id `i + nx * j`. Internal Faces are numbered first (x-normal, then y-normal),
/// followed by the four side patches ordered as [`RECTANGLE_PATCH_NAMES`].
pub fn rectangle_mesh(spec: RectangleMeshSpec) -> Result<Mesh2D, TopologyError> {
    let [nx, ny] = spec.n_cells;
    assert!(
        nx > 0 && ny > 0,
        "A rectangle mesh needs at least one Cell along each axis!"
    );
    assert!(
        spec.lengths.iter().all(|l| *l > 0.0),
        "A rectangle mesh must have positive side lengths!"
    );

    let p = |i: usize, j: usize| i + (nx + 1) * j;
    let c = |i: usize, j: usize| i + nx * j;
    let step = [spec.lengths[0] / nx as f64, spec.lengths[1] / ny as f64];

    let points: Vec<Point2> = (0..=ny)
        .flat_map(|j| (0..=nx).map(move |i| (i, j)))
        .map(|(i, j)| spec.origin + Point2::new([i as f64 * step[0], j as f64 * step[1]]))
        .collect();

    let mut faces = FaceList::default();

    for j in 0..ny {
        for i in 1..nx {
            faces.push_internal(vec![p(i, j), p(i, j + 1)], c(i - 1, j), c(i, j));
        }
    }
    for j in 1..ny {
        for i in 0..nx {
            faces.push_internal(vec![p(i, j), p(i + 1, j)], c(i, j - 1), c(i, j));
        }
    }

    for j in 0..ny {
        faces.push_boundary(vec![p(0, j), p(0, j + 1)], c(0, j));
    }
    for j in 0..ny {
        faces.push_boundary(vec![p(nx, j), p(nx, j + 1)], c(nx - 1, j));
    }
    for i in 0..nx {
        faces.push_boundary(vec![p(i, 0), p(i + 1, 0)], c(i, 0));
    }
    for i in 0..nx {
        faces.push_boundary(vec![p(i, ny), p(i + 1, ny)], c(i, ny - 1));
    }

    let patches = side_patches(
        &RECTANGLE_PATCH_NAMES,
        &spec.boundary_types,
        &[ny, ny, nx, nx],
        faces.neighbour.len(),
    );

    debug!(
        "generating {}x{} rectangle mesh with {} faces",
        nx,
        ny,
        faces.len()
    );

    Mesh2D::from_owner_neighbour(points, faces.vertices, faces.owner, faces.neighbour, patches)
}

fn side_patches(
    names: &[&str],
    kinds: &[BoundaryType],
    sizes: &[usize],
    n_internal: usize,
) -> Vec<BoundaryPatch> {
    let mut start_face = n_internal;
    names
        .iter()
        .zip(kinds.iter())
        .zip(sizes.iter())
        .map(|((name, kind), n_faces)| {
            let patch = BoundaryPatch::new(*name, *kind, *n_faces, start_face);
            start_face += n_faces;
            patch
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_counts() {
        let mesh = box_mesh(BoxMeshSpec::new([1.0, 1.0, 1.0], [2, 2, 1])).unwrap();

        assert_eq!(mesh.n_points(), 18);
        assert_eq!(mesh.n_cells(), 4);
        assert_eq!(mesh.n_internal_faces(), 4);
        assert_eq!(mesh.n_faces(), 20);
        assert_eq!(mesh.n_boundary_patches(), 6);

        let patch_sizes: Vec<usize> = mesh.patches().iter().map(|patch| patch.n_faces).collect();
        assert_eq!(patch_sizes, vec![2, 2, 2, 2, 4, 4]);
        assert_eq!(mesh.patches()[4].name, "z_min");

        for cell in mesh.cells() {
            assert!((cell.volume() - 0.25).abs() < 1e-14);
            assert_eq!(cell.neighbour_indices().len(), 2);
        }
        assert!(mesh
            .cell(3)
            .center()
            .distance(&Point3::new([0.75, 0.75, 0.5]))
            < 1e-14);
    }

    #[test]
    fn box_boundary_normals() {
        let mesh = box_mesh(BoxMeshSpec::new([2.0, 1.0, 3.0], [2, 3, 2])).unwrap();

        let expected_normals = [
            Point3::new([-1.0, 0.0, 0.0]),
            Point3::new([1.0, 0.0, 0.0]),
            Point3::new([0.0, -1.0, 0.0]),
            Point3::new([0.0, 1.0, 0.0]),
            Point3::new([0.0, 0.0, -1.0]),
            Point3::new([0.0, 0.0, 1.0]),
        ];
        for (patch_id, expected) in expected_normals.iter().enumerate() {
            for face in mesh.patch_faces(patch_id) {
                assert!(face.normal().distance(expected) < 1e-14);
                assert!((face.interpolation_factor() - 1.0).abs() < 1e-14);
            }
        }
    }

    #[test]
    fn box_patch_types() {
        let mut spec = BoxMeshSpec::new([1.0, 1.0, 0.1], [4, 4, 1]);
        spec.boundary_types[4] = BoundaryType::Empty;
        spec.boundary_types[5] = BoundaryType::Empty;
        let mesh = box_mesh(spec).unwrap();

        let empty: Vec<&str> = mesh
            .patches()
            .iter()
            .filter(|patch| patch.kind == BoundaryType::Empty)
            .map(|patch| patch.name.as_str())
            .collect();
        assert_eq!(empty, vec!["z_min", "z_max"]);
    }

    #[test]
    fn rectangle_counts() {
        let mesh = rectangle_mesh(RectangleMeshSpec::new([2.0, 1.0], [2, 2])).unwrap();

        assert_eq!(mesh.n_points(), 9);
        assert_eq!(mesh.n_cells(), 4);
        assert_eq!(mesh.n_internal_faces(), 4);
        assert_eq!(mesh.n_faces(), 12);

        for cell in mesh.cells() {
            assert!((cell.volume() - 0.5).abs() < 1e-14);
            assert_eq!(cell.faces().len(), 4);
        }
        assert!(mesh
            .cell(1)
            .center()
            .distance(&Point2::new([1.5, 0.25]))
            < 1e-14);

        let pairs: Vec<[usize; 2]> = mesh
            .internal_faces()
            .map(|face| [face.owner(), face.neighbour().unwrap()])
            .collect();
        assert_eq!(pairs, vec![[0, 1], [2, 3], [0, 2], [1, 3]]);
    }

    #[test]
    #[should_panic]
    fn box_without_cells() {
        let _ = box_mesh(BoxMeshSpec::new([1.0, 1.0, 1.0], [0, 1, 1]));
    }
}
