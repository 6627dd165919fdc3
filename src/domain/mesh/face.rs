use super::geometry::planar_area_and_centroid;
use super::space::Point;
use super::EXPECTED_FACE_NEIGHBOURS;
#[cfg(feature = "json_export")]
use json::{array, object, JsonValue};
use smallvec::SmallVec;

/// The boundary between two `Cell`s (or between a `Cell` and the outside of the domain)
///
/// `DIM` is the dimension of the mesh that the `Face` belongs to, and `SPACEDIM` the dimension of the space it is embedded in:
/// * `Face<3, 3>` is a polygon separating two polyhedral cells
/// * `Face<2, 2>` is a line separating two polygonal cells
/// * `Face<2, 3>` is a line separating two polygons of a surface mesh
///
/// Geometry (area, area-vector and centroid) is computed once upon construction.
/// The sign of the area-vector is provisional until the mesh orients it away from the owner `Cell`.
#[derive(Debug, Clone)]
pub struct Face<const DIM: usize, const SPACEDIM: usize> {
    pub id: usize,
    vertices: Vec<usize>,
    area: f64,
    area_vector: Point<f64, SPACEDIM>,
    center: Point<f64, SPACEDIM>,
    neighbours: SmallVec<[usize; EXPECTED_FACE_NEIGHBOURS]>,
    boundary: Option<usize>,
    oriented: bool,
    delta: f64,
    interpolation_factor: f64,
}

impl<const DIM: usize, const SPACEDIM: usize> Face<DIM, SPACEDIM> {
    /// Construct a new Face from a cyclically ordered list of vertex ids
    ///
    /// Panics if the dimension combination is unsupported or if there are too few vertices
    pub fn new(id: usize, vertices: Vec<usize>, points: &[Point<f64, SPACEDIM>]) -> Self {
        assert!(
            SPACEDIM >= DIM,
            "Cannot embed a {}D mesh in {}D space!",
            DIM,
            SPACEDIM
        );
        assert!(
            SPACEDIM == 2 || SPACEDIM == 3,
            "Faces are not implemented in {}D space!",
            SPACEDIM
        );

        let coords: Vec<Point<f64, SPACEDIM>> = vertices
            .iter()
            .map(|v| {
                assert!(
                    *v < points.len(),
                    "Face {} references Point {} which does not exist!",
                    id,
                    v
                );
                points[*v]
            })
            .collect();

        let (area, center, area_vector) = match DIM {
            2 => {
                assert_eq!(
                    coords.len(),
                    2,
                    "Face {} is a line; it must have exactly two vertices!",
                    id
                );
                let length = coords[0].distance(&coords[1]);
                let center = Point::between(&coords[0], &coords[1]);

                // a line embedded in 3D space has no unique normal
                let mut area_vector = Point::origin();
                if SPACEDIM == 2 {
                    let edge = coords[1] - coords[0];
                    area_vector[0] = edge[1];
                    area_vector[1] = -edge[0];
                    area_vector *= length / area_vector.norm();
                }

                (length, center, area_vector)
            }
            3 => {
                assert!(
                    coords.len() >= 3,
                    "Face {} is a polygon; it must have at least three vertices!",
                    id
                );
                let (area, center) = planar_area_and_centroid(&coords);

                let edge_1 = (center - coords[0]).resize::<3>();
                let edge_2 = (center - coords[1]).resize::<3>();
                let normal = edge_1.cross(&edge_2);
                let area_vector = (normal * (area / normal.norm())).resize::<SPACEDIM>();

                (area, center, area_vector)
            }
            _ => panic!("Faces of a {}D mesh are not implemented!", DIM),
        };

        Self {
            id,
            vertices,
            area,
            area_vector,
            center,
            neighbours: SmallVec::new(),
            boundary: None,
            oriented: false,
            delta: 0.0,
            interpolation_factor: 0.0,
        }
    }

    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Ids of the Points that make up this Face (in cyclic order)
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    /// Ids of the one or two Cells adjacent to this Face. The first is always the owner (the `Cell` the area-vector points away from)
    pub fn neighbour_indices(&self) -> &[usize] {
        &self.neighbours
    }

    /// Id of the Cell that owns this face
    pub fn owner(&self) -> usize {
        self.neighbours[0]
    }

    /// Id of the Cell on the other side of this face (None on the boundary)
    pub fn neighbour(&self) -> Option<usize> {
        self.neighbours.get(1).copied()
    }

    /// Given one adjacent Cell, get the id of the other
    pub fn other_cell(&self, cell_id: usize) -> Option<usize> {
        match self.neighbours.iter().position(|id| *id == cell_id) {
            Some(0) => self.neighbour(),
            Some(1) => Some(self.neighbours[0]),
            _ => None,
        }
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    /// Unit normal (pointing away from the owner Cell)
    ///
    /// Panics for a line embedded in 3D space
    pub fn normal(&self) -> Point<f64, SPACEDIM> {
        self.area_vector() / self.area
    }

    /// Normal scaled by the Face's area
    ///
    /// Panics for a line embedded in 3D space
    pub fn area_vector(&self) -> Point<f64, SPACEDIM> {
        assert!(
            self.has_area_vector(),
            "Can't define a normal vector for a line embedded in 3D space (Face {})!",
            self.id
        );
        self.area_vector
    }

    /// Whether a normal vector can be defined for this kind of Face
    pub fn has_area_vector(&self) -> bool {
        DIM == SPACEDIM
    }

    pub fn center(&self) -> &Point<f64, SPACEDIM> {
        &self.center
    }

    pub fn is_boundary(&self) -> bool {
        self.boundary.is_some()
    }

    /// Id of the boundary patch this Face belongs to
    ///
    /// Panics if the Face is not on the boundary
    pub fn boundary_id(&self) -> usize {
        self.boundary.unwrap_or_else(|| {
            panic!(
                "Face {} is not on the boundary; it has no boundary id!",
                self.id
            )
        })
    }

    /// Whether the area-vector has been oriented away from the owner Cell
    pub fn is_oriented(&self) -> bool {
        self.oriented
    }

    /// Inverse distance between the owner and neighbour centroids (or between the owner and face centroids on the boundary)
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Fraction of the owner-to-neighbour distance at which the face centroid sits (1 on the boundary)
    pub fn interpolation_factor(&self) -> f64 {
        self.interpolation_factor
    }

    pub(crate) fn connect_cell(&mut self, cell_id: usize) {
        self.neighbours.push(cell_id);
    }

    pub(crate) fn set_neighbours(&mut self, owner: usize, neighbour: Option<usize>) {
        self.neighbours.clear();
        self.neighbours.push(owner);
        if let Some(neighbour) = neighbour {
            self.neighbours.push(neighbour);
        }
    }

    pub(crate) fn mark_boundary(&mut self, patch_id: usize) {
        self.boundary = Some(patch_id);
    }

    /// Point the area-vector away from `owner_center`. Returns true if it had to be flipped.
    pub(crate) fn orient_away_from(&mut self, owner_center: &Point<f64, SPACEDIM>) -> bool {
        self.oriented = true;
        if self.has_area_vector() && self.area_vector.dot(&(self.center - *owner_center)) < 0.0 {
            self.area_vector *= -1.0;
            true
        } else {
            false
        }
    }

    pub(crate) fn set_interpolation(&mut self, delta: f64, interpolation_factor: f64) {
        self.delta = delta;
        self.interpolation_factor = interpolation_factor;
    }

    /// Produce a Json Object that describes this Face
    #[cfg(feature = "json_export")]
    pub fn to_json(&self) -> JsonValue {
        let mut face_json = object! {
            "id": self.id,
            "vertices": JsonValue::from(self.vertices.clone()),
            "neighbours": JsonValue::from(self.neighbours.to_vec()),
            "area": self.area,
            "center": JsonValue::from(self.center.iter().copied().collect::<Vec<f64>>()),
            "delta": self.delta,
            "interpolation_factor": self.interpolation_factor,
        };

        face_json["area_vector"] = if self.has_area_vector() {
            JsonValue::from(self.area_vector.iter().copied().collect::<Vec<f64>>())
        } else {
            array![]
        };
        face_json["boundary_id"] = match self.boundary {
            Some(patch_id) => JsonValue::from(patch_id),
            None => JsonValue::Null,
        };

        face_json
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mesh::space::{Point2, Point3};

    fn unit_square_points() -> Vec<Point3> {
        vec![
            Point3::new([0.0, 0.0, 0.0]),
            Point3::new([1.0, 0.0, 0.0]),
            Point3::new([1.0, 1.0, 0.0]),
            Point3::new([0.0, 1.0, 0.0]),
        ]
    }

    #[test]
    fn polygon_face() {
        let points = unit_square_points();
        let face: Face<3, 3> = Face::new(0, vec![0, 1, 2, 3], &points);

        assert!((face.area() - 1.0).abs() < 1e-14);
        assert!(face.center().distance(&Point3::new([0.5, 0.5, 0.0])) < 1e-14);
        assert!((face.area_vector().norm() - 1.0).abs() < 1e-14);
        assert!(face.normal()[0].abs() < 1e-14);
        assert!(face.normal()[1].abs() < 1e-14);
        assert!((face.normal()[2].abs() - 1.0).abs() < 1e-14);
        assert!(!face.is_oriented());
    }

    #[test]
    fn orientation_flip() {
        let points = unit_square_points();
        let mut face: Face<3, 3> = Face::new(0, vec![0, 1, 2, 3], &points);

        let below = Point3::new([0.5, 0.5, -0.5]);
        let above = Point3::new([0.5, 0.5, 0.5]);

        face.orient_away_from(&below);
        assert!(face.is_oriented());
        assert!(face.normal()[2] > 0.0);

        assert!(face.orient_away_from(&above));
        assert!(face.normal()[2] < 0.0);
        assert!(!face.orient_away_from(&above));
    }

    #[test]
    fn line_face_2d() {
        let points = vec![Point2::new([1.0, 0.0]), Point2::new([1.0, 2.0])];
        let face: Face<2, 2> = Face::new(3, vec![0, 1], &points);

        assert!((face.area() - 2.0).abs() < 1e-14);
        assert!(face.center().distance(&Point2::new([1.0, 1.0])) < 1e-14);
        assert!(face.area_vector().distance(&Point2::new([2.0, 0.0])) < 1e-14);
    }

    #[test]
    fn line_face_3d() {
        let points = vec![Point3::new([0.0, 0.0, 0.0]), Point3::new([0.0, 3.0, 4.0])];
        let face: Face<2, 3> = Face::new(0, vec![0, 1], &points);

        assert!((face.area() - 5.0).abs() < 1e-14);
        assert!(!face.has_area_vector());
    }

    #[test]
    #[should_panic]
    fn line_face_3d_normal() {
        let points = vec![Point3::new([0.0, 0.0, 0.0]), Point3::new([0.0, 3.0, 4.0])];
        let face: Face<2, 3> = Face::new(0, vec![0, 1], &points);
        let _ = face.normal();
    }

    #[test]
    #[should_panic]
    fn line_with_three_vertices() {
        let points = vec![
            Point2::new([0.0, 0.0]),
            Point2::new([1.0, 0.0]),
            Point2::new([2.0, 0.0]),
        ];
        let _: Face<2, 2> = Face::new(0, vec![0, 1, 2], &points);
    }

    #[test]
    #[should_panic]
    fn polygon_in_2d_space() {
        let points = vec![
            Point2::new([0.0, 0.0]),
            Point2::new([1.0, 0.0]),
            Point2::new([0.0, 1.0]),
        ];
        let _: Face<3, 2> = Face::new(0, vec![0, 1, 2], &points);
    }

    #[test]
    #[should_panic]
    fn boundary_id_of_internal_face() {
        let points = unit_square_points();
        let face: Face<3, 3> = Face::new(0, vec![0, 1, 2, 3], &points);
        let _ = face.boundary_id();
    }

    #[test]
    fn neighbour_lookup() {
        let points = unit_square_points();
        let mut face: Face<3, 3> = Face::new(0, vec![0, 1, 2, 3], &points);
        face.set_neighbours(4, Some(7));

        assert_eq!(face.owner(), 4);
        assert_eq!(face.neighbour(), Some(7));
        assert_eq!(face.other_cell(4), Some(7));
        assert_eq!(face.other_cell(7), Some(4));
        assert_eq!(face.other_cell(2), None);
    }
}
