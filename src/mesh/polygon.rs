//! Planar convex polygons carrying optional per-polygon metadata.

use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};

/// Sine of the turn angle below which a vertex counts as straight.
const STRAIGHT_TURN: Real = 1e-7;

/// A convex, planar polygon.
///
/// Every primitive in this crate emits convex faces and splitting a convex
/// polygon by a plane keeps both halves convex, so fan triangulation is exact.
#[derive(Debug, Clone)]
pub struct Polygon<S: Clone> {
    pub vertices: Vec<Vertex>,
    pub plane: Plane,
    pub metadata: Option<S>,
}

impl<S: Clone> Polygon<S> {
    /// Build a polygon and derive its plane from the vertex winding.
    pub fn new(vertices: Vec<Vertex>, metadata: Option<S>) -> Self {
        let plane = Plane::from_vertices(&vertices);
        Polygon {
            vertices,
            plane,
            metadata,
        }
    }

    /// Build a polygon that reuses an already known supporting plane.
    pub const fn with_plane(vertices: Vec<Vertex>, plane: Plane, metadata: Option<S>) -> Self {
        Polygon {
            vertices,
            plane,
            metadata,
        }
    }

    /// Build a polygon from bare points; every vertex gets the facet normal.
    pub fn from_points(points: &[Point3<Real>], metadata: Option<S>) -> Self {
        let mut vertices: Vec<Vertex> = points
            .iter()
            .map(|p| Vertex::new(*p, Vector3::zeros()))
            .collect();
        let plane = Plane::from_vertices(&vertices);
        for v in &mut vertices {
            v.normal = plane.normal;
        }
        Polygon {
            vertices,
            plane,
            metadata,
        }
    }

    /// Reverse winding, vertex normals and plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.vertices.iter_mut().for_each(Vertex::flip);
        self.plane.flip();
    }

    /// Fan triangulation.
    ///
    /// Faces with a vertex lying on a straight edge (left there by
    /// [`Mesh::repair_manifold`](crate::mesh::Mesh::repair_manifold)) are
    /// fanned around their centroid so no triangle collapses onto that edge.
    /// Everything else is fanned around the first vertex.
    pub fn triangulate(&self) -> Vec<[Vertex; 3]> {
        let n = self.vertices.len();
        if n < 3 {
            return Vec::new();
        }
        if n > 3 && self.has_straight_vertex() {
            let sum = self
                .vertices
                .iter()
                .fold(Vector3::zeros(), |acc, v| acc + v.pos.coords);
            let centre = Vertex::new(Point3::from(sum / n as Real), self.plane.normal());
            return (0..n)
                .map(|i| [centre, self.vertices[i], self.vertices[(i + 1) % n]])
                .collect();
        }
        let anchor = self.vertices[0];
        self.vertices
            .windows(2)
            .skip(1)
            .map(|pair| [anchor, pair[0], pair[1]])
            .collect()
    }

    /// Number of triangles [`Polygon::triangulate`] yields.
    pub fn triangle_count(&self) -> usize {
        match self.vertices.len() {
            n if n < 3 => 0,
            n if n > 3 && self.has_straight_vertex() => n,
            n => n - 2,
        }
    }

    fn has_straight_vertex(&self) -> bool {
        let n = self.vertices.len();
        (0..n).any(|i| {
            let prev = self.vertices[(i + n - 1) % n].pos;
            let here = self.vertices[i].pos;
            let next = self.vertices[(i + 1) % n].pos;
            let (incoming, outgoing) = (here - prev, next - here);
            incoming.cross(&outgoing).norm() <= STRAIGHT_TURN * incoming.norm() * outgoing.norm()
        })
    }

    /// Area-weighted normal: its length is the polygon's area.
    pub fn area_vector(&self) -> Vector3<Real> {
        let n = self.vertices.len();
        let mut sum = Vector3::zeros();
        for (i, current) in self.vertices.iter().enumerate() {
            let next = &self.vertices[(i + 1) % n];
            sum += current.pos.coords.cross(&next.pos.coords);
        }
        sum * 0.5
    }

    pub fn area(&self) -> Real {
        self.area_vector().norm()
    }

    pub fn bounding_box(&self) -> Aabb {
        let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
        let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
        for v in &self.vertices {
            mins = mins.inf(&v.pos);
            maxs = maxs.sup(&v.pos);
        }
        Aabb::new(mins, maxs)
    }
}
