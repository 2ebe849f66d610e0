//! BSP tree node and the clip / invert / build passes the booleans are made of

use crate::mesh::bsp::traits::{BalancedSplittingStrategy, SplittingPlaneStrategy};
use crate::mesh::plane::Plane;
use crate::mesh::polygon::Polygon;
use std::fmt::Debug;

/// One splitting plane of a BSP tree with the faces lying in it.
#[derive(Debug, Clone)]
pub struct Node<S: Clone> {
    /// Splitting plane for this node *or* **None** for an empty tree.
    pub plane: Option<Plane>,

    /// Subtree on the side the normal points to.
    pub front: Option<Box<Node<S>>>,

    /// Subtree behind the plane.
    pub back: Option<Box<Node<S>>>,

    /// Polygons that lie *exactly* on `plane`.
    pub polygons: Vec<Polygon<S>>,
}

impl<S: Clone + Debug> Default for Node<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone + Debug> Node<S> {
    pub const fn new() -> Self {
        Self {
            plane: None,
            front: None,
            back: None,
            polygons: Vec::new(),
        }
    }

    /// Creates a BSP tree from polygons
    pub fn from_polygons(polygons: &[Polygon<S>]) -> Self {
        let mut node = Self::new();
        node.build(polygons);
        node
    }

    /// Convert solid space to empty space and empty space to solid space.
    pub fn invert(&mut self) {
        let mut stack = vec![self];
        while let Some(current) = stack.pop() {
            current.polygons.iter_mut().for_each(Polygon::flip);
            if let Some(plane) = current.plane.as_mut() {
                plane.flip();
            }
            std::mem::swap(&mut current.front, &mut current.back);

            if let Some(front) = current.front.as_deref_mut() {
                stack.push(front);
            }
            if let Some(back) = current.back.as_deref_mut() {
                stack.push(back);
            }
        }
    }

    /// Recursively remove all parts of `polygons` that are inside this BSP tree.
    pub fn clip_polygons(&self, polygons: &[Polygon<S>]) -> Vec<Polygon<S>> {
        let Some(plane) = self.plane.as_ref() else {
            return polygons.to_vec();
        };

        let mut front_polys = Vec::with_capacity(polygons.len());
        let mut back_polys = Vec::with_capacity(polygons.len());
        for polygon in polygons {
            let (coplanar_front, coplanar_back, front_parts, back_parts) =
                plane.split_polygon(polygon);
            front_polys.extend(coplanar_front);
            front_polys.extend(front_parts);
            back_polys.extend(coplanar_back);
            back_polys.extend(back_parts);
        }

        let mut result = match self.front.as_deref() {
            Some(front) => front.clip_polygons(&front_polys),
            None => front_polys,
        };
        // behind a leaf is solid: whatever lands there is dropped
        if let Some(back) = self.back.as_deref() {
            result.extend(back.clip_polygons(&back_polys));
        }
        result
    }

    /// Remove all polygons in this tree that are inside the `other` tree.
    pub fn clip_to(&mut self, other: &Node<S>) {
        self.polygons = other.clip_polygons(&self.polygons);
        if let Some(front) = self.front.as_deref_mut() {
            front.clip_to(other);
        }
        if let Some(back) = self.back.as_deref_mut() {
            back.clip_to(other);
        }
    }

    /// Every polygon stored anywhere in the tree.
    pub fn all_polygons(&self) -> Vec<Polygon<S>> {
        let mut result = Vec::new();
        let mut stack = vec![self];
        while let Some(current) = stack.pop() {
            result.extend_from_slice(&current.polygons);
            stack.extend(current.front.as_deref());
            stack.extend(current.back.as_deref());
        }
        result
    }

    /// Insert `polygons` into the tree, splitting them where they straddle
    /// existing planes. An empty node adopts a plane picked by
    /// [`BalancedSplittingStrategy`].
    pub fn build(&mut self, polygons: &[Polygon<S>]) {
        self.build_with(polygons, &BalancedSplittingStrategy::default());
    }

    pub fn build_with<P: SplittingPlaneStrategy<S>>(&mut self, polygons: &[Polygon<S>], strategy: &P) {
        if polygons.is_empty() {
            return;
        }

        let plane = self
            .plane
            .get_or_insert_with(|| strategy.pick_best_splitting_plane(polygons))
            .clone();

        let mut front = Vec::with_capacity(polygons.len() / 2);
        let mut back = Vec::with_capacity(polygons.len() / 2);
        for polygon in polygons {
            let (coplanar_front, coplanar_back, front_parts, back_parts) =
                plane.split_polygon(polygon);
            self.polygons.extend(coplanar_front);
            self.polygons.extend(coplanar_back);
            front.extend(front_parts);
            back.extend(back_parts);
        }

        if !front.is_empty() {
            self.front
                .get_or_insert_with(|| Box::new(Node::new()))
                .build_with(&front, strategy);
        }
        if !back.is_empty() {
            self.back
                .get_or_insert_with(|| Box::new(Node::new()))
                .build_with(&back, strategy);
        }
    }
}
