use super::face::Face;
use super::geometry::{planar_area_and_centroid, polyhedron_volume_and_centroid};
use super::space::{Point, Point3};
#[cfg(feature = "json_export")]
use json::{object, JsonValue};

/// `Cell`s are the control volumes of the `Mesh`
///
/// A `Cell` is defined by the `Face`s that bound it. Its volume (a length in 1D or an area in 2D) and centroid
/// are computed once upon construction from the already constructed `Face`s.
#[derive(Debug, Clone)]
pub struct Cell<const DIM: usize, const SPACEDIM: usize> {
    pub id: usize,
    faces: Vec<usize>,
    neighbours: Vec<usize>,
    volume: f64,
    center: Point<f64, SPACEDIM>,
}

impl<const DIM: usize, const SPACEDIM: usize> Cell<DIM, SPACEDIM> {
    /// Construct a new Cell from a list of Face ids
    ///
    /// Every referenced `Face` must already exist in `face_arena`
    pub fn new(
        id: usize,
        faces: Vec<usize>,
        face_arena: &[Face<DIM, SPACEDIM>],
        points: &[Point<f64, SPACEDIM>],
    ) -> Self {
        let cell_faces: Vec<&Face<DIM, SPACEDIM>> = faces
            .iter()
            .map(|f| {
                assert!(
                    *f < face_arena.len(),
                    "Cell {} references Face {} which does not exist!",
                    id,
                    f
                );
                &face_arena[*f]
            })
            .collect();

        let vertex_ids = unique_vertices(cell_faces.iter().map(|face| face.vertices()));
        assert!(
            !vertex_ids.is_empty(),
            "Cell {} has no vertices; cannot compute its volume!",
            id
        );
        let vertices: Vec<Point<f64, SPACEDIM>> = vertex_ids.iter().map(|v| points[*v]).collect();

        let face_fans: Vec<(Point<f64, SPACEDIM>, Vec<Point<f64, SPACEDIM>>)> = if DIM == 3 {
            cell_faces
                .iter()
                .map(|face| {
                    (
                        *face.center(),
                        face.vertices().iter().map(|v| points[*v]).collect(),
                    )
                })
                .collect()
        } else {
            Vec::new()
        };

        let (volume, center) = volume_and_centroid::<DIM, SPACEDIM>(&vertices, &face_fans);

        Self {
            id,
            faces,
            neighbours: Vec::new(),
            volume,
            center,
        }
    }

    /// Ids of the Faces bounding this Cell
    pub fn faces(&self) -> &[usize] {
        &self.faces
    }

    /// Ids of the Cells sharing a non-boundary Face with this Cell
    pub fn neighbour_indices(&self) -> &[usize] {
        &self.neighbours
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn center(&self) -> &Point<f64, SPACEDIM> {
        &self.center
    }

    pub(crate) fn add_neighbour(&mut self, cell_id: usize) {
        self.neighbours.push(cell_id);
    }

    /// Produce a Json Object that describes this Cell
    #[cfg(feature = "json_export")]
    pub fn to_json(&self) -> JsonValue {
        object! {
            "id": self.id,
            "faces": JsonValue::from(self.faces.clone()),
            "neighbours": JsonValue::from(self.neighbours.clone()),
            "volume": self.volume,
            "center": JsonValue::from(self.center.iter().copied().collect::<Vec<f64>>()),
        }
    }
}

/// Collect the distinct vertex ids reachable through a set of faces (in the order they are first encountered)
pub(crate) fn unique_vertices<'a>(face_vertices: impl Iterator<Item = &'a [usize]>) -> Vec<usize> {
    let mut vertex_ids: Vec<usize> = Vec::new();
    for vertex in face_vertices.flatten() {
        if !vertex_ids.contains(vertex) {
            vertex_ids.push(*vertex);
        }
    }
    vertex_ids
}

/// Volume and centroid of a Cell given its distinct vertices (and, in 3D, the centroid and vertices of each of its faces)
///
/// * 1D: the two vertices bound a line segment
/// * 2D: the vertices (in cyclic order) bound a polygon; the absolute area is returned
/// * 3D: see [`polyhedron_volume_and_centroid`]
pub(crate) fn volume_and_centroid<const DIM: usize, const SPACEDIM: usize>(
    vertices: &[Point<f64, SPACEDIM>],
    face_fans: &[(Point<f64, SPACEDIM>, Vec<Point<f64, SPACEDIM>>)],
) -> (f64, Point<f64, SPACEDIM>) {
    match DIM {
        1 => {
            assert_eq!(
                vertices.len(),
                2,
                "A 1D Cell must have exactly two vertices!"
            );
            (
                vertices[0].distance(&vertices[1]),
                Point::between(&vertices[0], &vertices[1]),
            )
        }
        2 => {
            let (area, center) = planar_area_and_centroid(vertices);
            (area.abs(), center)
        }
        3 => {
            assert_eq!(SPACEDIM, 3, "A 3D Cell must be embedded in 3D space!");
            let vertices_3d: Vec<Point3> = vertices.iter().map(|v| v.resize()).collect();
            let faces_3d: Vec<(Point3, Vec<Point3>)> = face_fans
                .iter()
                .map(|(c, vs)| (c.resize(), vs.iter().map(|v| v.resize()).collect()))
                .collect();

            let (volume, center) = polyhedron_volume_and_centroid(&vertices_3d, &faces_3d);
            (volume, center.resize())
        }
        _ => panic!("Cells of a {}D mesh are not implemented!", DIM),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mesh::space::Point2;

    #[test]
    fn line_cell() {
        let vertices = [Point::new([1.0]), Point::new([4.0])];
        let (length, center) = volume_and_centroid::<1, 1>(&vertices, &[]);
        assert!((length - 3.0).abs() < 1e-14);
        assert!((center[0] - 2.5).abs() < 1e-14);
    }

    #[test]
    fn quad_cell_2d() {
        let points = vec![
            Point2::new([0.0, 0.0]),
            Point2::new([2.0, 0.0]),
            Point2::new([2.0, 1.0]),
            Point2::new([0.0, 1.0]),
        ];
        let faces: Vec<Face<2, 2>> = [[0, 1], [1, 2], [3, 2], [0, 3]]
            .iter()
            .enumerate()
            .map(|(id, v)| Face::new(id, v.to_vec(), &points))
            .collect();

        let cell = Cell::new(0, vec![0, 1, 2, 3], &faces, &points);
        assert!((cell.volume() - 2.0).abs() < 1e-14);
        assert!(cell.center().distance(&Point2::new([1.0, 0.5])) < 1e-14);

        // clockwise traversal still yields a positive area
        let reversed = Cell::new(1, vec![3, 2, 1, 0], &faces, &points);
        assert!((reversed.volume() - 2.0).abs() < 1e-14);
        assert!(reversed.center().distance(&Point2::new([1.0, 0.5])) < 1e-14);
    }

    #[test]
    fn hexahedral_cell() {
        let points: Vec<Point3> = (0..8)
            .map(|i| {
                Point3::new([
                    0.5 * (i & 1) as f64,
                    0.5 * ((i >> 1) & 1) as f64,
                    0.5 * ((i >> 2) & 1) as f64,
                ])
            })
            .collect();
        let faces: Vec<Face<3, 3>> = [
            [0, 2, 3, 1],
            [4, 5, 7, 6],
            [0, 1, 5, 4],
            [2, 6, 7, 3],
            [0, 4, 6, 2],
            [1, 3, 7, 5],
        ]
        .iter()
        .enumerate()
        .map(|(id, v)| Face::new(id, v.to_vec(), &points))
        .collect();

        let cell = Cell::new(0, (0..6).collect(), &faces, &points);
        assert!((cell.volume() - 0.125).abs() < 1e-14);
        assert!(cell.center().distance(&Point3::new([0.25, 0.25, 0.25])) < 1e-14);
        for face in faces.iter() {
            assert!((face.center().distance(cell.center()) - 0.25).abs() < 1e-14);
            assert!((face.area() - 0.25).abs() < 1e-14);
        }
    }

    #[test]
    fn vertex_deduplication() {
        let faces: Vec<Vec<usize>> = vec![vec![0, 1], vec![1, 2], vec![2, 0]];
        assert_eq!(
            unique_vertices(faces.iter().map(|f| f.as_slice())),
            vec![0, 1, 2]
        );
    }

    #[test]
    #[should_panic]
    fn missing_face() {
        let points = vec![Point2::new([0.0, 0.0]), Point2::new([1.0, 0.0])];
        let faces: Vec<Face<2, 2>> = vec![Face::new(0, vec![0, 1], &points)];
        let _ = Cell::new(0, vec![0, 1], &faces, &points);
    }
}
