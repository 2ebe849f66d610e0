//! Polygon-soup solids and their BSP booleans.

use crate::float_types::{
    Real,
    parry3d::bounding_volume::{Aabb, BoundingVolume},
};
use crate::mesh::{bsp::Node, plane::Plane, polygon::Polygon, vertex::Vertex};
use crate::traits::CSG;
use nalgebra::{Matrix4, Point3};
use std::{fmt::Debug, sync::OnceLock};

pub mod bsp;
pub mod manifold;
pub mod plane;
pub mod polygon;
pub mod shapes;
pub mod vertex;

/// A closed solid stored as a soup of convex planar polygons.
///
/// `S` is per-polygon metadata; booleans carry every surviving polygon's tag
/// through unchanged, so a fused part still knows which input each face came
/// from.
#[derive(Clone, Debug)]
pub struct Mesh<S: Clone + Send + Sync + Debug> {
    /// Boundary faces, wound counter-clockwise seen from outside.
    pub polygons: Vec<Polygon<S>>,

    /// Cached extent of `polygons`, cleared by anything that moves a vertex.
    pub bounding_box: OnceLock<Aabb>,

    pub metadata: Option<S>,
}

impl<S: Clone + Send + Sync + Debug> Mesh<S> {
    /// Wrap `polygons` as a solid without checking closure.
    pub fn from_polygons(polygons: &[Polygon<S>], metadata: Option<S>) -> Self {
        Mesh {
            polygons: polygons.to_vec(),
            bounding_box: OnceLock::new(),
            metadata,
        }
    }

    /// New solid from `polygons`, keeping this mesh's tag.
    fn rebuilt(&self, polygons: Vec<Polygon<S>>) -> Mesh<S> {
        Mesh {
            polygons,
            bounding_box: OnceLock::new(),
            metadata: self.metadata.clone(),
        }
    }

    /// Faces whose box overlaps `reach` first, the rest second.
    fn split_by_reach(polygons: &[Polygon<S>], reach: &Aabb) -> (Vec<Polygon<S>>, Vec<Polygon<S>>) {
        polygons
            .iter()
            .cloned()
            .partition(|p| p.bounding_box().intersects(reach))
    }

    /// Every polygon corner, duplicates included.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.polygons
            .iter()
            .flat_map(|p| p.vertices.iter().copied())
            .collect()
    }

    /// Fan-split every face into triangles sharing its plane and tag.
    pub fn triangulate(&self) -> Mesh<S> {
        let triangles: Vec<Polygon<S>> = self
            .polygons
            .iter()
            .flat_map(|poly| {
                poly.triangulate().into_iter().map(move |triangle| {
                    Polygon::with_plane(triangle.to_vec(), poly.plane.clone(), poly.metadata.clone())
                })
            })
            .collect();

        Mesh::from_polygons(&triangles, self.metadata.clone())
    }

    /// Number of triangles the mesh exports as.
    pub fn triangle_count(&self) -> usize {
        self.polygons.iter().map(Polygon::triangle_count).sum()
    }

    /// Polygons of both meshes in one soup, without any clipping.
    ///
    /// Only meaningful for disjoint solids. Overlapping inputs give a mesh
    /// with interior faces.
    pub fn merged(&self, other: &Mesh<S>) -> Mesh<S> {
        let mut polygons = self.polygons.clone();
        polygons.extend_from_slice(&other.polygons);
        self.rebuilt(polygons)
    }
}

impl<S: Clone + Send + Sync + Debug> CSG for Mesh<S> {
    fn new() -> Self {
        Mesh {
            polygons: Vec::new(),
            bounding_box: OnceLock::new(),
            metadata: None,
        }
    }

    /// Solid covering either operand.
    ///
    /// Faces whose bounding box misses the other operand skip the BSP passes
    /// and are copied straight into the result.
    fn union(&self, other: &Mesh<S>) -> Mesh<S> {
        let (a_near, a_far) = Self::split_by_reach(&self.polygons, &other.bounding_box());
        let (b_near, b_far) = Self::split_by_reach(&other.polygons, &self.bounding_box());

        let mut a = Node::from_polygons(&a_near);
        let mut b = Node::from_polygons(&b_near);

        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());

        let mut kept = a.all_polygons();
        kept.extend(a_far);
        kept.extend(b_far);
        self.rebuilt(kept)
    }

    /// `self` with `other` carved out. Metadata of faces cut by `other` is
    /// kept from `other`, so a bore's walls stay tagged with the cutter.
    fn difference(&self, other: &Mesh<S>) -> Mesh<S> {
        let (a_near, a_far) = Self::split_by_reach(&self.polygons, &other.bounding_box());
        let (b_near, _) = Self::split_by_reach(&other.polygons, &self.bounding_box());

        let mut a = Node::from_polygons(&a_near);
        let mut b = Node::from_polygons(&b_near);

        a.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());
        a.invert();

        let mut kept = a.all_polygons();
        kept.extend(a_far);
        self.rebuilt(kept)
    }

    /// Solid common to both operands.
    fn intersection(&self, other: &Mesh<S>) -> Mesh<S> {
        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);

        a.invert();
        b.clip_to(&a);
        b.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        a.build(&b.all_polygons());
        a.invert();

        self.rebuilt(a.all_polygons())
    }

    /// Reflections reverse every polygon's winding afterwards so faces keep
    /// pointing out of the solid.
    fn transform(&self, mat: &Matrix4<Real>) -> Mesh<S> {
        let normal_matrix = mat
            .try_inverse()
            .map(|inv| inv.transpose())
            .unwrap_or_else(Matrix4::identity);
        let reflects = mat.fixed_view::<3, 3>(0, 0).clone_owned().determinant() < 0.0;

        let mut mesh = self.clone();
        for poly in &mut mesh.polygons {
            for vert in &mut poly.vertices {
                let homogeneous = mat * vert.pos.to_homogeneous();
                vert.pos = Point3::from_homogeneous(homogeneous).unwrap_or(vert.pos);
                let normal = normal_matrix.transform_vector(&vert.normal);
                vert.normal = normal.try_normalize(Real::EPSILON).unwrap_or(normal);
            }
            if reflects {
                poly.vertices.reverse();
            }
            poly.plane = Plane::from_vertices(&poly.vertices);
        }

        mesh.bounding_box = OnceLock::new();
        mesh
    }

    fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
            for v in self.polygons.iter().flat_map(|p| p.vertices.iter()) {
                mins = mins.inf(&v.pos);
                maxs = maxs.sup(&v.pos);
            }

            // no polygons: a trivial AABB at the origin
            if mins.x > maxs.x {
                return Aabb::new(Point3::origin(), Point3::origin());
            }
            Aabb::new(mins, maxs)
        })
    }

    fn invalidate_bounding_box(&mut self) {
        self.bounding_box = OnceLock::new();
    }

    /// Same surface with every face turned inward.
    fn inverse(&self) -> Mesh<S> {
        let mut mesh = self.clone();
        mesh.polygons.iter_mut().for_each(Polygon::flip);
        mesh
    }
}
