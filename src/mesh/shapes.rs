//! Primitive solids: cuboid, frustum, cylinder, tube and profiles revolved
//! about the Z axis.
//!
//! Every primitive stands on the XY plane and grows along +Z. Round ones
//! put ring vertex `i` at angle `i / segments * TAU`, so two primitives with the
//! same segment count share their facet angles exactly.

use crate::float_types::{Real, TAU};
use crate::mesh::Mesh;
use crate::mesh::polygon::Polygon;
use nalgebra::{Point2, Point3};
use std::fmt::Debug;

/// Radii below this are treated as an apex.
const APEX_RADIUS: Real = 1e-9;

fn ring(radius: Real, z: Real, segments: usize) -> Vec<Point3<Real>> {
    (0..segments)
        .map(|i| {
            let angle = i as Real / segments as Real * TAU;
            Point3::new(radius * angle.cos(), radius * angle.sin(), z)
        })
        .collect()
}

impl<S: Clone + Send + Sync + Debug> Mesh<S> {
    /// Axis-aligned box with one corner at the origin.
    pub fn cuboid(width: Real, length: Real, height: Real, metadata: Option<S>) -> Mesh<S> {
        let p = |x: Real, y: Real, z: Real| Point3::new(x * width, y * length, z * height);
        let faces = [
            [p(0., 0., 0.), p(0., 1., 0.), p(1., 1., 0.), p(1., 0., 0.)], // -Z
            [p(0., 0., 1.), p(1., 0., 1.), p(1., 1., 1.), p(0., 1., 1.)], // +Z
            [p(0., 0., 0.), p(1., 0., 0.), p(1., 0., 1.), p(0., 0., 1.)], // -Y
            [p(0., 1., 0.), p(0., 1., 1.), p(1., 1., 1.), p(1., 1., 0.)], // +Y
            [p(0., 0., 0.), p(0., 0., 1.), p(0., 1., 1.), p(0., 1., 0.)], // -X
            [p(1., 0., 0.), p(1., 1., 0.), p(1., 1., 1.), p(1., 0., 1.)], // +X
        ];
        let polygons: Vec<Polygon<S>> = faces
            .iter()
            .map(|face| Polygon::from_points(face, metadata.clone()))
            .collect();
        Mesh::from_polygons(&polygons, metadata)
    }

    /// Truncated cone from `bottom_radius` at z = 0 to `top_radius` at z = `height`.
    ///
    /// Either radius may be zero, which closes that end in an apex.
    pub fn frustum(
        bottom_radius: Real,
        top_radius: Real,
        height: Real,
        segments: usize,
        metadata: Option<S>,
    ) -> Mesh<S> {
        let segments = segments.max(3);
        let bottom = ring(bottom_radius, 0.0, segments);
        let top = ring(top_radius, height, segments);
        let bottom_apex = bottom_radius < APEX_RADIUS;
        let top_apex = top_radius < APEX_RADIUS;

        let mut polygons = Vec::with_capacity(segments + 2);
        for i in 0..segments {
            let j = (i + 1) % segments;
            let side: Vec<Point3<Real>> = match (bottom_apex, top_apex) {
                (false, false) => vec![bottom[i], bottom[j], top[j], top[i]],
                (true, false) => vec![bottom[i], top[j], top[i]],
                (false, true) => vec![bottom[i], bottom[j], top[i]],
                (true, true) => continue,
            };
            polygons.push(Polygon::from_points(&side, metadata.clone()));
        }

        if !bottom_apex {
            let cap: Vec<Point3<Real>> = bottom.iter().rev().copied().collect();
            polygons.push(Polygon::from_points(&cap, metadata.clone()));
        }
        if !top_apex {
            polygons.push(Polygon::from_points(&top, metadata.clone()));
        }

        Mesh::from_polygons(&polygons, metadata)
    }

    /// Right circular cylinder, z ∈ [0, height].
    pub fn cylinder(radius: Real, height: Real, segments: usize, metadata: Option<S>) -> Mesh<S> {
        Self::frustum(radius, radius, height, segments, metadata)
    }

    /// An annulus (circle of `outer_radius` minus circle of `inner_radius`)
    /// extruded by `height`, z ∈ [0, height].
    pub fn tube(
        outer_radius: Real,
        inner_radius: Real,
        height: Real,
        segments: usize,
        metadata: Option<S>,
    ) -> Mesh<S> {
        let section = [
            Point2::new(inner_radius, 0.0),
            Point2::new(outer_radius, 0.0),
            Point2::new(outer_radius, height),
            Point2::new(inner_radius, height),
        ];
        Self::revolve(&section, segments, metadata)
    }

    /// Solid of revolution about the Z axis.
    ///
    /// `profile` is a simple closed polygon in the (radius, z) half plane,
    /// counter-clockwise with radius along x. Each profile edge sweeps one band
    /// of quads; edges ending on the axis sweep triangles. Neighbouring bands
    /// share their ring vertices exactly, so the result is edge-manifold.
    pub fn revolve(profile: &[Point2<Real>], segments: usize, metadata: Option<S>) -> Mesh<S> {
        let tagged: Vec<(Point2<Real>, Option<S>)> =
            profile.iter().map(|p| (*p, metadata.clone())).collect();
        Self::revolve_tagged(&tagged, segments)
    }

    /// [`Mesh::revolve`] where each profile point carries the metadata of the
    /// edge that starts at it.
    pub fn revolve_tagged(profile: &[(Point2<Real>, Option<S>)], segments: usize) -> Mesh<S> {
        let segments = segments.max(3);
        let rings: Vec<Vec<Point3<Real>>> = profile
            .iter()
            .map(|(p, _)| ring(p.x, p.y, segments))
            .collect();

        let mut polygons = Vec::with_capacity(profile.len() * segments);
        for (k, (a, tag)) in profile.iter().enumerate() {
            let l = (k + 1) % profile.len();
            let b = profile[l].0;
            let a_on_axis = a.x < APEX_RADIUS;
            let b_on_axis = b.x < APEX_RADIUS;
            if (a_on_axis && b_on_axis) || (b - *a).norm() < APEX_RADIUS {
                continue;
            }

            let (from, to) = (&rings[k], &rings[l]);
            for i in 0..segments {
                let j = (i + 1) % segments;
                let face = if a_on_axis {
                    vec![from[i], to[j], to[i]]
                } else if b_on_axis {
                    vec![from[i], from[j], to[i]]
                } else {
                    vec![from[i], from[j], to[j], to[i]]
                };
                polygons.push(Polygon::from_points(&face, tag.clone()));
            }
        }

        let metadata = profile.first().and_then(|(_, tag)| tag.clone());
        Mesh::from_polygons(&polygons, metadata)
    }
}
