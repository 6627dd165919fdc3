//! Property-based tests for the polygon and polyhedron decompositions.

use approx::relative_eq;
use fvm_mesh::domain::mesh::geometry::{
    planar_area_and_centroid, polyhedron_volume_and_centroid, tetrahedron_volume,
};
use fvm_mesh::{Point2, Point3};
use proptest::prelude::*;
use std::f64::consts::PI;

fn finite_coordinate() -> impl Strategy<Value = f64> {
    -100.0..100.0f64
}

fn point3() -> impl Strategy<Value = Point3> {
    prop::array::uniform3(finite_coordinate()).prop_map(Point3::new)
}

fn regular_polygon(n: usize, radius: f64, center: [f64; 2], phase: f64) -> Vec<Point2> {
    (0..n)
        .map(|k| {
            let theta = phase + 2.0 * PI * k as f64 / n as f64;
            Point2::new([center[0] + radius * theta.cos(), center[1] + radius * theta.sin()])
        })
        .collect()
}

/// Orthonormal vectors spanning the plane whose unit normal has the given polar and azimuthal angles
fn plane_basis(polar: f64, azimuth: f64) -> (Point3, Point3) {
    let normal = Point3::new([
        polar.sin() * azimuth.cos(),
        polar.sin() * azimuth.sin(),
        polar.cos(),
    ]);
    let helper = if normal[0].abs() < 0.9 {
        Point3::new([1.0, 0.0, 0.0])
    } else {
        Point3::new([0.0, 1.0, 0.0])
    };
    let u = normal.cross(&helper);
    let u = u / u.norm();
    (u, normal.cross(&u))
}

proptest! {
    /// Property: a regular n-gon has area n r² sin(2π/n) / 2 and its centroid at its center
    #[test]
    fn prop_regular_polygon(
        n in 3usize..13,
        radius in 0.1..10.0f64,
        center in prop::array::uniform2(finite_coordinate()),
        phase in 0.0..(2.0 * PI),
    ) {
        let vertices = regular_polygon(n, radius, center, phase);
        let (area, centroid) = planar_area_and_centroid(&vertices);

        let expected = 0.5 * n as f64 * radius * radius * (2.0 * PI / n as f64).sin();
        prop_assert!(relative_eq!(area, expected, max_relative = 1e-9));
        prop_assert!(centroid.distance(&Point2::new(center)) < 1e-9 * (1.0 + radius));
    }

    /// Property: a regular n-gon keeps its area and centroid when placed in an arbitrary plane in 3D space
    #[test]
    fn prop_tilted_regular_polygon(
        n in 3usize..13,
        radius in 0.1..10.0f64,
        center in point3(),
        polar in 0.0..PI,
        azimuth in 0.0..(2.0 * PI),
        phase in 0.0..(2.0 * PI),
    ) {
        let (u, v) = plane_basis(polar, azimuth);
        let vertices: Vec<Point3> = (0..n)
            .map(|k| {
                let theta = phase + 2.0 * PI * k as f64 / n as f64;
                center + (u * theta.cos() + v * theta.sin()) * radius
            })
            .collect();
        let (area, centroid) = planar_area_and_centroid(&vertices);

        let expected = 0.5 * n as f64 * radius * radius * (2.0 * PI / n as f64).sin();
        prop_assert!(relative_eq!(area, expected, max_relative = 1e-9));
        prop_assert!(centroid.distance(&center) < 1e-9 * (1.0 + center.norm()));
    }

    /// Property: reversing the vertex order of a planar polygon only flips the sign of its area
    #[test]
    fn prop_polygon_orientation(
        n in 3usize..9,
        radius in 0.1..10.0f64,
        center in prop::array::uniform2(finite_coordinate()),
    ) {
        let mut vertices = regular_polygon(n, radius, center, 0.3);
        let (area, _) = planar_area_and_centroid(&vertices);
        vertices.reverse();
        let (reversed_area, _) = planar_area_and_centroid(&vertices);

        prop_assert!(area > 0.0);
        prop_assert!(relative_eq!(area, -reversed_area, max_relative = 1e-12));
    }

    /// Property: the volume of a tetrahedron does not depend on the order of its vertices
    #[test]
    fn prop_tetrahedron_permutation(a in point3(), b in point3(), c in point3(), d in point3()) {
        let volume = tetrahedron_volume(&[a, b, c, d]);
        prop_assert!(volume >= 0.0);

        for permuted in [[b, a, c, d], [c, d, a, b], [d, c, b, a], [a, c, d, b]] {
            prop_assert!(relative_eq!(
                tetrahedron_volume(&permuted),
                volume,
                epsilon = 1e-6,
                max_relative = 1e-9
            ));
        }
    }

    /// Property: an axis-aligned box decomposes into its exact volume and center
    #[test]
    fn prop_box_polyhedron(
        origin in point3(),
        lengths in prop::array::uniform3(0.01..50.0f64),
    ) {
        let corner = |i: usize| {
            origin + Point3::new([
                lengths[0] * (i & 1) as f64,
                lengths[1] * ((i >> 1) & 1) as f64,
                lengths[2] * ((i >> 2) & 1) as f64,
            ])
        };
        let vertices: Vec<Point3> = (0..8).map(corner).collect();
        let faces: Vec<(Point3, Vec<Point3>)> = [
            [0, 2, 3, 1],
            [4, 5, 7, 6],
            [0, 1, 5, 4],
            [2, 6, 7, 3],
            [0, 4, 6, 2],
            [1, 3, 7, 5],
        ]
        .iter()
        .map(|ids| {
            let face_vertices: Vec<Point3> = ids.iter().map(|i| vertices[*i]).collect();
            let (_, centroid) = planar_area_and_centroid(&face_vertices);
            (centroid, face_vertices)
        })
        .collect();

        let (volume, centroid) = polyhedron_volume_and_centroid(&vertices, &faces);
        let expected_center = origin + Point3::new(lengths) * 0.5;

        prop_assert!(relative_eq!(
            volume,
            lengths[0] * lengths[1] * lengths[2],
            max_relative = 1e-9
        ));
        prop_assert!(centroid.distance(&expected_center) < 1e-9 * (1.0 + expected_center.norm()));
    }
}
