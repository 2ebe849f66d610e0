//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use eyepiece_mount::{
    float_types::Real,
    mesh::{Mesh, polygon::Polygon, vertex::Vertex},
    traits::CSG,
};
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;

/// Low resolution keeps the BSP booleans quick in debug builds.
pub const TEST_SEGMENTS: usize = 24;

/// Returns the bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]` of a mesh.
pub fn bounding_box<S: Clone + Send + Sync + Debug>(mesh: &Mesh<S>) -> [Real; 6] {
    let bb = mesh.bounding_box();
    [bb.mins.x, bb.mins.y, bb.mins.z, bb.maxs.x, bb.maxs.y, bb.maxs.z]
}

/// Largest and smallest distance of any vertex from the Z axis.
pub fn radial_extent<S: Clone + Send + Sync + Debug>(mesh: &Mesh<S>) -> (Real, Real) {
    mesh.vertices()
        .iter()
        .map(|v| v.pos.x.hypot(v.pos.y))
        .fold((Real::MAX, 0.0), |(lo, hi), r| (lo.min(r), hi.max(r)))
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Volume of a regular `segments`-gon prism inscribed in a circle of `radius`.
pub fn prism_volume(radius: Real, height: Real, segments: usize) -> Real {
    let n = segments as Real;
    0.5 * n * radius * radius * (std::f64::consts::TAU / n).sin() * height
}

/// Helper to make a simple Polygon in 3D with given vertices.
pub fn make_polygon_3d(points: &[[Real; 3]]) -> Polygon<()> {
    let verts = points
        .iter()
        .map(|p| Vertex::new(Point3::new(p[0], p[1], p[2]), Vector3::z()))
        .collect();
    Polygon::new(verts, None)
}

/// A closed, outward-facing solid with positive volume.
pub fn assert_solid<S: Clone + Send + Sync + Debug>(mesh: &Mesh<S>, what: &str) {
    assert!(!mesh.polygons.is_empty(), "{what}: no polygons");
    assert!(
        mesh.is_closed(1e-5),
        "{what}: open surface, net area vector {:?} vs area {}",
        mesh.vector_area(),
        mesh.surface_area()
    );
    assert!(mesh.volume() > 0.0, "{what}: volume {} not positive", mesh.volume());
}

/// [`assert_solid`] plus edge-manifoldness of the exported triangles.
pub fn assert_watertight<S: Clone + Send + Sync + Debug>(mesh: &Mesh<S>, what: &str) {
    assert_solid(mesh, what);
    assert!(
        mesh.triangulate().is_manifold(),
        "{what}: some triangle edge is not shared by exactly two faces"
    );
}

/// Distance from the axis to the middle of a facet of a `segments`-gon
/// inscribed in a circle of `radius`.
pub fn apothem(radius: Real, segments: usize) -> Real {
    radius * (std::f64::consts::PI / segments as Real).cos()
}
