use super::space::{Point, Point3};

/// Area of the triangle spanned by three Points
///
/// * In 2D, the area is signed (positive for counter-clockwise vertices)
/// * In 3D, the area is always positive
///
/// Panics for any other dimension
pub fn triangle_area<const D: usize>(
    p1: &Point<f64, D>,
    p2: &Point<f64, D>,
    p3: &Point<f64, D>,
) -> f64 {
    let edge_1 = *p2 - *p1;
    let edge_2 = *p3 - *p1;

    match D {
        2 => 0.5 * (edge_1[0] * edge_2[1] - edge_1[1] * edge_2[0]),
        3 => 0.5 * edge_1.resize::<3>().cross(&edge_2.resize()).norm(),
        _ => panic!("Triangle area is not implemented for {}D space!", D),
    }
}

/// Centroid of a triangle (the average of its vertices)
pub fn triangle_centroid<const D: usize>(
    p1: &Point<f64, D>,
    p2: &Point<f64, D>,
    p3: &Point<f64, D>,
) -> Point<f64, D> {
    (*p1 + *p2 + *p3) / 3.0
}

/// Compute the area and centroid of a planar polygon embedded in 2D or 3D space.
///
/// `vertices` must be listed in cyclic order (the order one would connect them when drawing the polygon).
///
/// Triangles are handled exactly. Larger polygons are split into a fan of triangles about the average vertex position;
/// the centroid is then the area-weighted average of the triangle centroids.
/// This is exact for convex polygons. Planarity and convexity are not checked.
pub fn planar_area_and_centroid<const D: usize>(
    vertices: &[Point<f64, D>],
) -> (f64, Point<f64, D>) {
    assert!(
        D == 2 || D == 3,
        "Planar area is not implemented for {}D space!",
        D
    );
    assert!(
        vertices.len() >= 3,
        "Cannot form a valid planar object with {} points!",
        vertices.len()
    );

    let vertex_average = average(vertices);

    if vertices.len() == 3 {
        return (
            triangle_area(&vertices[0], &vertices[1], &vertices[2]),
            vertex_average,
        );
    }

    let n = vertices.len();
    let (total_area, area_weighted_sum) = (0..n).fold(
        (0.0, Point::origin()),
        |(total, weighted), i| {
            let (a, b) = (&vertices[i], &vertices[(i + 1) % n]);
            let area = triangle_area(&vertex_average, a, b);
            (
                total + area,
                weighted + triangle_centroid(&vertex_average, a, b) * area,
            )
        },
    );

    (total_area, area_weighted_sum / total_area)
}

/// Volume of a tetrahedron (independent of vertex ordering)
pub fn tetrahedron_volume(vertices: &[Point3; 4]) -> f64 {
    let edge_1 = vertices[1] - vertices[0];
    let edge_2 = vertices[2] - vertices[0];
    let edge_3 = vertices[3] - vertices[0];

    edge_1.dot(&edge_2.cross(&edge_3)).abs() / 6.0
}

/// Centroid of a tetrahedron (the average of its vertices)
pub fn tetrahedron_centroid(vertices: &[Point3; 4]) -> Point3 {
    average(vertices)
}

/// Volume and centroid of a polyhedron
///
/// `faces` lists each bounding face as its centroid and its cyclically ordered vertices.
///
/// The polyhedron is decomposed into tetrahedra `(apex, face_centroid, v[i], v[i+1])`, where the apex is the average of `vertices`.
/// The result is exact for polyhedra that are star-shaped with respect to the apex.
pub fn polyhedron_volume_and_centroid(
    vertices: &[Point3],
    faces: &[(Point3, Vec<Point3>)],
) -> (f64, Point3) {
    assert!(
        !vertices.is_empty(),
        "Cannot compute the volume of a polyhedron without vertices!"
    );
    let apex = average(vertices);

    let mut volume = 0.0;
    let mut weighted_centroid = Point3::origin();

    for (face_centroid, face_vertices) in faces.iter() {
        let n = face_vertices.len();
        for i in 0..n {
            let tet = [
                apex,
                *face_centroid,
                face_vertices[i],
                face_vertices[(i + 1) % n],
            ];
            let tet_volume = tetrahedron_volume(&tet);

            volume += tet_volume;
            weighted_centroid += tetrahedron_centroid(&tet) * tet_volume;
        }
    }

    (volume, weighted_centroid / volume)
}

/// Arithmetic mean of a set of Points
pub fn average<const D: usize>(points: &[Point<f64, D>]) -> Point<f64, D> {
    points
        .iter()
        .fold(Point::origin(), |acc, p| acc + *p)
        / points.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mesh::space::Point2;

    fn close(a: f64, b: f64) -> bool {
        if a == 0.0 {
            return b.abs() < 1e-12;
        }
        if b == 0.0 {
            return a.abs() < 1e-12;
        }
        (a - b).abs() <= a.abs().max(b.abs()) * 1e-12
    }

    #[test]
    fn triangle_2d() {
        let p1 = Point2::new([1.0, 1.0]);
        let p2 = Point2::new([3.0, 1.0]);
        let p3 = Point2::new([1.0, 5.0]);

        assert!(close(triangle_area(&p1, &p2, &p3), 0.5 * 2.0 * 4.0));
        assert!(close(triangle_area(&p1, &p3, &p2), -0.5 * 2.0 * 4.0));

        let (area, centroid) = planar_area_and_centroid(&[p1, p2, p3]);
        assert!(close(area, 4.0));
        assert!(close(centroid.distance(&Point2::new([5.0 / 3.0, 7.0 / 3.0])), 0.0));
    }

    #[test]
    fn triangle_3d() {
        let p1 = Point3::new([1.0, 1.0, 1.0]);
        let p2 = Point3::new([1.0, 1.0, 6.0]);
        let p3 = Point3::new([1.0, 7.0, 1.0]);

        assert!(close(triangle_area(&p1, &p2, &p3), 15.0));

        let (area, centroid) = planar_area_and_centroid(&[p1, p2, p3]);
        assert!(close(area, 15.0));
        assert!(close(centroid.distance(&Point3::new([1.0, 3.0, 8.0 / 3.0])), 0.0));
    }

    #[test]
    fn regular_pentagon() {
        let n_sides = 5;
        let radius = 1.5;
        let angle = 2.0 * std::f64::consts::PI / n_sides as f64;

        let vertices: Vec<Point3> = (0..n_sides)
            .map(|i| {
                let theta = angle * i as f64;
                Point3::new([2.0, 1.0 + radius * theta.cos(), radius * theta.sin()])
            })
            .collect();

        let (area, centroid) = planar_area_and_centroid(&vertices);
        assert!(close(
            area,
            0.5 * n_sides as f64 * radius * radius * angle.sin()
        ));
        assert!(close(centroid.distance(&Point3::new([2.0, 1.0, 0.0])), 0.0));
    }

    #[test]
    fn unit_square_2d() {
        let vertices = [
            Point2::new([0.0, 0.0]),
            Point2::new([1.0, 0.0]),
            Point2::new([1.0, 1.0]),
            Point2::new([0.0, 1.0]),
        ];
        let (area, centroid) = planar_area_and_centroid(&vertices);
        assert!(close(area, 1.0));
        assert!(close(centroid.distance(&Point2::new([0.5, 0.5])), 0.0));
    }

    #[test]
    fn unit_right_tetrahedron() {
        let tet = [
            Point3::new([0.0, 0.0, 0.0]),
            Point3::new([1.0, 0.0, 0.0]),
            Point3::new([0.0, 1.0, 0.0]),
            Point3::new([0.0, 0.0, 1.0]),
        ];
        assert!(close(tetrahedron_volume(&tet), 1.0 / 6.0));
        assert!(close(
            tetrahedron_centroid(&tet).distance(&Point3::new([0.25, 0.25, 0.25])),
            0.0
        ));
    }

    #[test]
    fn unit_cube_polyhedron() {
        let corners: Vec<Point3> = (0..8)
            .map(|i| {
                Point3::new([
                    (i & 1) as f64,
                    ((i >> 1) & 1) as f64,
                    ((i >> 2) & 1) as f64,
                ])
            })
            .collect();
        let quads: [[usize; 4]; 6] = [
            [0, 2, 3, 1],
            [4, 5, 7, 6],
            [0, 1, 5, 4],
            [2, 6, 7, 3],
            [0, 4, 6, 2],
            [1, 3, 7, 5],
        ];
        let faces: Vec<(Point3, Vec<Point3>)> = quads
            .iter()
            .map(|q| {
                let verts: Vec<Point3> = q.iter().map(|&i| corners[i]).collect();
                (average(&verts), verts)
            })
            .collect();

        let (volume, centroid) = polyhedron_volume_and_centroid(&corners, &faces);
        assert!(close(volume, 1.0));
        assert!(close(centroid.distance(&Point3::new([0.5, 0.5, 0.5])), 0.0));
    }

    #[test]
    #[should_panic]
    fn too_few_vertices() {
        let _ = planar_area_and_centroid(&[Point2::new([0.0, 0.0]), Point2::new([1.0, 0.0])]);
    }

    #[test]
    #[should_panic]
    fn unsupported_dimension() {
        let p = Point::new([0.0; 4]);
        let _ = triangle_area(&p, &p, &p);
    }
}
