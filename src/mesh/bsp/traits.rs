//! Splitting-plane selection for BSP construction

use crate::float_types::Real;
use crate::mesh::plane::{BACK, COPLANAR, FRONT, Plane};
use crate::mesh::polygon::Polygon;

/// Picks the plane a BSP node splits its polygons with.
pub trait SplittingPlaneStrategy<S: Clone> {
    /// `polygons` is never empty when called by [`Node::build`](super::Node::build).
    fn pick_best_splitting_plane(&self, polygons: &[Polygon<S>]) -> Plane;
}

/// Scores the planes of the first `sample_size` polygons and keeps the one
/// that splits the fewest polygons while keeping the halves balanced.
pub struct BalancedSplittingStrategy {
    pub span_weight: Real,
    pub balance_weight: Real,
    pub sample_size: usize,
}

impl Default for BalancedSplittingStrategy {
    fn default() -> Self {
        Self {
            span_weight: 8.0,
            balance_weight: 1.0,
            sample_size: 20,
        }
    }
}

impl<S: Clone> SplittingPlaneStrategy<S> for BalancedSplittingStrategy {
    fn pick_best_splitting_plane(&self, polygons: &[Polygon<S>]) -> Plane {
        let mut best_plane = polygons[0].plane.clone();
        let mut best_score = Real::MAX;

        for candidate in polygons.iter().take(self.sample_size) {
            let plane = &candidate.plane;
            let (mut front, mut back, mut spanning) = (0usize, 0usize, 0usize);
            for poly in polygons {
                match plane.classify_polygon(poly) {
                    COPLANAR => {},
                    FRONT => front += 1,
                    BACK => back += 1,
                    _ => spanning += 1,
                }
            }

            let score = self.span_weight * spanning as Real
                + self.balance_weight * (front as Real - back as Real).abs();
            if score < best_score {
                best_score = score;
                best_plane = plane.clone();
            }
        }

        best_plane
    }
}
