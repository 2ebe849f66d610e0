//! Watertightness checks, T-junction repair and integral properties of a `Mesh`.

use crate::float_types::{Real, tolerance};
use crate::mesh::Mesh;
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use hashbrown::{HashMap, HashSet};
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;
use tracing::debug;

const QUANTIZATION_FACTOR: Real = 1e7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct QuantizedPoint(i64, i64, i64);

fn quantize_point(p: &Point3<Real>) -> QuantizedPoint {
    QuantizedPoint(
        (p.x * QUANTIZATION_FACTOR).round() as i64,
        (p.y * QUANTIZATION_FACTOR).round() as i64,
        (p.z * QUANTIZATION_FACTOR).round() as i64,
    )
}

impl<S: Clone + Debug + Send + Sync> Mesh<S> {
    /// Checks if the Mesh object is an oriented 2-manifold.
    ///
    /// ### Returns
    /// Returns `true` if every directed triangle edge appears exactly once and
    /// its reverse appears exactly once, i.e. every edge is shared by two
    /// consistently wound faces.
    ///
    /// ### Notes:
    /// - Positions are compared after quantizing to 1e-7.
    /// - Boolean results contain T-junctions until they go through
    ///   [`Mesh::repair_manifold`].
    pub fn is_manifold(&self) -> bool {
        let mut directed: HashMap<(QuantizedPoint, QuantizedPoint), u32> = HashMap::new();

        for poly in &self.polygons {
            for tri in poly.triangulate() {
                for &(i0, i1) in &[(0, 1), (1, 2), (2, 0)] {
                    let key = (quantize_point(&tri[i0].pos), quantize_point(&tri[i1].pos));
                    *directed.entry(key).or_insert(0) += 1;
                }
            }
        }

        !directed.is_empty()
            && directed
                .iter()
                .all(|(&(a, b), &count)| count == 1 && directed.get(&(b, a)) == Some(&1))
    }

    /// Weld the vertices of a boolean result and split its T-junctions.
    ///
    /// 1. Vertices closer than [`tolerance`] collapse onto the first one seen.
    /// 2. Faces whose corners then lie on one line are dropped.
    /// 3. Every vertex that sits inside an unmatched edge is inserted into
    ///    that edge, so both sides of a seam end up with the same vertices.
    ///
    /// Shape, orientation and metadata are unchanged. A closed result comes
    /// out edge-manifold.
    pub fn repair_manifold(&self) -> Mesh<S> {
        let distance = tolerance();
        let mut welder = Welder::new(distance);

        let mut faces: Vec<(Vec<usize>, &Polygon<S>)> = Vec::with_capacity(self.polygons.len());
        for poly in &self.polygons {
            let mut ids: Vec<usize> = Vec::with_capacity(poly.vertices.len());
            for v in &poly.vertices {
                let id = welder.weld(&v.pos);
                if ids.last() != Some(&id) {
                    ids.push(id);
                }
            }
            while ids.len() > 1 && ids.first() == ids.last() {
                ids.pop();
            }
            if ids.len() >= 3 && !is_collapsed(&ids, &welder.points, distance) {
                faces.push((ids, poly));
            }
        }

        let points = welder.points;
        let dropped = self.polygons.len() - faces.len();
        let mut inserted = 0;
        // one round normally suffices
        for _ in 0..3 {
            let added = split_t_junctions(&mut faces, &points, distance);
            inserted += added;
            if added == 0 {
                break;
            }
        }
        debug!(points = points.len(), dropped, inserted, "repaired mesh seams");

        let polygons = faces
            .into_iter()
            .map(|(ids, poly)| {
                let normal = poly.plane.normal();
                let vertices = ids.iter().map(|&id| Vertex::new(points[id], normal)).collect();
                Polygon::with_plane(vertices, poly.plane.clone(), poly.metadata.clone())
            })
            .collect();
        self.rebuilt(polygons)
    }

    /// Sum of the polygons' area vectors. Zero for any closed surface,
    /// T-junctions included.
    pub fn vector_area(&self) -> Vector3<Real> {
        self.polygons
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.area_vector())
    }

    /// Total surface area.
    pub fn surface_area(&self) -> Real {
        self.polygons.iter().map(|p| p.area()).sum()
    }

    /// `true` when the net area vector is within `relative_tolerance` of the
    /// total surface area.
    pub fn is_closed(&self, relative_tolerance: Real) -> bool {
        let area = self.surface_area();
        area > 0.0 && self.vector_area().norm() <= relative_tolerance * area
    }

    /// Enclosed volume by the divergence theorem; positive when faces point out.
    pub fn volume(&self) -> Real {
        self.polygons
            .iter()
            .flat_map(|p| p.triangulate())
            .map(|[a, b, c]| a.pos.coords.dot(&b.pos.coords.cross(&c.pos.coords)))
            .sum::<Real>()
            / 6.0
    }
}

/// Position-deduplicating vertex store on a hashed grid of `distance` cells.
struct Welder {
    distance: Real,
    points: Vec<Point3<Real>>,
    cells: HashMap<QuantizedPoint, Vec<usize>>,
}

impl Welder {
    fn new(distance: Real) -> Self {
        Welder {
            distance,
            points: Vec::new(),
            cells: HashMap::new(),
        }
    }

    fn cell(&self, p: &Point3<Real>) -> QuantizedPoint {
        QuantizedPoint(
            (p.x / self.distance).floor() as i64,
            (p.y / self.distance).floor() as i64,
            (p.z / self.distance).floor() as i64,
        )
    }

    /// Index of a stored point within `distance` of `p`, storing `p` if none is.
    fn weld(&mut self, p: &Point3<Real>) -> usize {
        let QuantizedPoint(x, y, z) = self.cell(p);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(ids) = self.cells.get(&QuantizedPoint(x + dx, y + dy, z + dz)) else {
                        continue;
                    };
                    if let Some(&id) = ids
                        .iter()
                        .find(|&&id| (self.points[id] - p).norm() <= self.distance)
                    {
                        return id;
                    }
                }
            }
        }

        let id = self.points.len();
        self.points.push(*p);
        self.cells.entry(QuantizedPoint(x, y, z)).or_default().push(id);
        id
    }
}

/// `true` when every corner lies within `distance` of one line.
fn is_collapsed(ids: &[usize], points: &[Point3<Real>], distance: Real) -> bool {
    let start = points[ids[0]];
    let far = ids
        .iter()
        .map(|&id| points[id])
        .max_by(|p, q| (p - start).norm_squared().total_cmp(&(q - start).norm_squared()))
        .unwrap_or(start);
    let axis = far - start;
    let length = axis.norm();
    if length <= distance {
        return true;
    }
    let direction = axis / length;
    ids.iter().all(|&id| {
        let offset = points[id] - start;
        (offset - direction * offset.dot(&direction)).norm() <= distance
    })
}

/// Parameter along `a`..`b` of a point strictly inside that segment.
fn inside_segment(a: &Point3<Real>, b: &Point3<Real>, p: &Point3<Real>, distance: Real) -> Option<Real> {
    let edge = b - a;
    let length = edge.norm();
    if length <= 2.0 * distance {
        return None;
    }
    let t = (p - a).dot(&edge) / (length * length);
    if t * length <= distance || (1.0 - t) * length <= distance {
        return None;
    }
    ((p - (a + edge * t)).norm() <= distance).then_some(t)
}

/// Insert into every unmatched edge the seam vertices lying inside it.
/// Returns how many vertices were inserted.
fn split_t_junctions<S: Clone>(
    faces: &mut [(Vec<usize>, &Polygon<S>)],
    points: &[Point3<Real>],
    distance: Real,
) -> usize {
    let edges = |ids: &[usize]| {
        let n = ids.len();
        (0..n).map(move |k| (ids[k], ids[(k + 1) % n])).collect::<Vec<_>>()
    };

    let directed: HashSet<(usize, usize)> = faces.iter().flat_map(|(ids, _)| edges(ids.as_slice())).collect();
    let open: Vec<(usize, usize)> = directed
        .iter()
        .copied()
        .filter(|&(a, b)| !directed.contains(&(b, a)))
        .collect();
    if open.is_empty() {
        return 0;
    }
    let mut seam: Vec<usize> = open.iter().flat_map(|&(a, b)| [a, b]).collect();
    seam.sort_unstable();
    seam.dedup();

    let mut inserted = 0;
    for (ids, _) in faces.iter_mut() {
        let mut split = Vec::with_capacity(ids.len());
        for (a, b) in edges(ids.as_slice()) {
            split.push(a);
            if directed.contains(&(b, a)) {
                continue;
            }
            let mut between: Vec<(Real, usize)> = seam
                .iter()
                .filter(|&&id| !ids.contains(&id))
                .filter_map(|&id| {
                    inside_segment(&points[a], &points[b], &points[id], distance).map(|t| (t, id))
                })
                .collect();
            between.sort_by(|x, y| x.0.total_cmp(&y.0));
            inserted += between.len();
            split.extend(between.into_iter().map(|(_, id)| id));
        }
        *ids = split;
    }
    inserted
}
