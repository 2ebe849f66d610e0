//! ISO metric screw threads as closed helical solids.
//!
//! A thread is a single tooth, a trapezoid in the (radius, z) half plane,
//! swept along a helix whose lead equals the pitch. External teeth stand on
//! the root cylinder of a screw and point outward. Internal teeth hang from
//! the wall of a bore and point inward. The tooth is sunk into its host by
//! `root_overlap` so a boolean union has real shared volume to work with.

use crate::errors::{ValidationError, ensure_positive};
use crate::float_types::{Real, TAU};
use crate::mesh::Mesh;
use crate::mesh::plane::Plane;
use crate::mesh::polygon::Polygon;
use crate::traits::CSG;
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;
use tracing::debug;

/// Radial depth of an external ISO thread, as a fraction of the pitch.
pub const EXTERNAL_DEPTH_FACTOR: Real = 0.6134;

/// Height of the fundamental 60° triangle, as a fraction of the pitch.
pub const FUNDAMENTAL_HEIGHT_FACTOR: Real = 0.866_025_403_784_438_6;

/// Radial depth of an internal ISO thread (5H/8), as a fraction of the pitch.
pub const INTERNAL_DEPTH_FACTOR: Real = 0.625 * FUNDAMENTAL_HEIGHT_FACTOR;

/// tan(30°), the flank slope of the 60° profile.
const FLANK_SLOPE: Real = 0.577_350_269_189_625_8;

/// Largest root overlap, as a fraction of the pitch, that keeps adjacent
/// turns of the tooth from touching.
pub const MAX_ROOT_OVERLAP_FACTOR: Real = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Hand {
    /// Advances along +Z while turning counter-clockwise seen from +Z.
    #[default]
    Right,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadKind {
    External,
    Internal,
}

/// How the ends of the thread are finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndFinish {
    /// The sweep stops while the whole tooth is still inside
    /// z ∈ [0, length]. The ends are the tooth profile itself.
    #[default]
    Raw,
    /// The sweep overruns both ends and is cut flush at z = 0 and z = length.
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreadSpec {
    pub major_diameter: Real,
    pub pitch: Real,
    /// Axial engagement length.
    pub length: Real,
    pub hand: Hand,
    pub kind: ThreadKind,
    pub end_finish: EndFinish,
    /// How far the tooth base reaches into its host, radially.
    pub root_overlap: Real,
}

impl ThreadSpec {
    pub fn external(major_diameter: Real, pitch: Real, length: Real) -> Self {
        ThreadSpec {
            major_diameter,
            pitch,
            length,
            hand: Hand::Right,
            kind: ThreadKind::External,
            end_finish: EndFinish::Raw,
            root_overlap: MAX_ROOT_OVERLAP_FACTOR * pitch,
        }
    }

    pub fn internal(major_diameter: Real, pitch: Real, length: Real) -> Self {
        ThreadSpec {
            kind: ThreadKind::Internal,
            ..Self::external(major_diameter, pitch, length)
        }
    }

    pub const fn with_hand(mut self, hand: Hand) -> Self {
        self.hand = hand;
        self
    }

    pub const fn with_end_finish(mut self, end_finish: EndFinish) -> Self {
        self.end_finish = end_finish;
        self
    }

    pub const fn with_root_overlap(mut self, root_overlap: Real) -> Self {
        self.root_overlap = root_overlap;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_positive("major_diameter", self.major_diameter)?;
        ensure_positive("pitch", self.pitch)?;
        ensure_positive("length", self.length)?;
        if self.length < self.pitch {
            return Err(ValidationError::EngagementShorterThanPitch {
                length: self.length,
                pitch: self.pitch,
            });
        }
        if self.major_diameter / 2.0 <= self.thread_depth() + self.overlap() {
            return Err(ValidationError::WallTooThick {
                wall: self.thread_depth() + self.overlap(),
                limit: self.major_diameter / 2.0,
            });
        }
        Ok(())
    }

    /// Radial height of the tooth, root to crest.
    pub fn thread_depth(&self) -> Real {
        match self.kind {
            ThreadKind::External => EXTERNAL_DEPTH_FACTOR * self.pitch,
            ThreadKind::Internal => INTERNAL_DEPTH_FACTOR * self.pitch,
        }
    }

    /// Radius where the tooth meets its host, before overlap.
    pub fn root_radius(&self) -> Real {
        match self.kind {
            ThreadKind::External => self.major_diameter / 2.0 - self.thread_depth(),
            ThreadKind::Internal => self.major_diameter / 2.0,
        }
    }

    /// Radius of the tooth's flat tip.
    pub fn crest_radius(&self) -> Real {
        match self.kind {
            ThreadKind::External => self.major_diameter / 2.0,
            ThreadKind::Internal => self.major_diameter / 2.0 - self.thread_depth(),
        }
    }

    fn overlap(&self) -> Real {
        self.root_overlap.clamp(0.0, MAX_ROOT_OVERLAP_FACTOR * self.pitch)
    }

    /// Radius of the tooth base after sinking it into the host.
    fn base_radius(&self) -> Real {
        match self.kind {
            ThreadKind::External => self.root_radius() - self.overlap(),
            ThreadKind::Internal => self.root_radius() + self.overlap(),
        }
    }

    /// Half of the tooth's axial width at the base.
    fn base_half_width(&self) -> Real {
        self.crest_half_width() + (self.crest_radius() - self.base_radius()).abs() * FLANK_SLOPE
    }

    /// ISO crest flats: P/8 on a screw, P/4 in a nut.
    fn crest_half_width(&self) -> Real {
        match self.kind {
            ThreadKind::External => self.pitch / 16.0,
            ThreadKind::Internal => self.pitch / 8.0,
        }
    }

    /// Tooth cross-section as (radius, z) pairs around z = 0, counter-clockwise
    /// with radius to the right and z up.
    fn profile(&self) -> [(Real, Real); 4] {
        let (base, crest) = (self.base_radius(), self.crest_radius());
        let (hb, hc) = (self.base_half_width(), self.crest_half_width());
        match self.kind {
            ThreadKind::External => [(base, -hb), (crest, -hc), (crest, hc), (base, hb)],
            ThreadKind::Internal => [(crest, -hc), (base, -hb), (base, hb), (crest, hc)],
        }
    }

    /// Build the thread as a closed solid spanning z ∈ [0, length].
    ///
    /// `segments` is the number of sweep steps per turn. Using the same count
    /// as the host's round primitives lines the tooth facets up with the host's.
    pub fn solid<S: Clone + Send + Sync + Debug>(
        &self,
        segments: usize,
        metadata: Option<S>,
    ) -> Mesh<S> {
        let segments = segments.max(3);
        let half_width = self.base_half_width();

        let (z_start, z_end) = match self.end_finish {
            EndFinish::Raw => (half_width, self.length - half_width),
            EndFinish::Square => (-half_width, self.length + half_width),
        };
        let turns = ((z_end - z_start) / self.pitch).max(0.0);
        let steps = ((turns * segments as Real).floor() as usize).max(1);

        let swept = self.sweep(z_start, steps, segments, metadata.clone());
        debug!(
            kind = ?self.kind,
            hand = ?self.hand,
            major = self.major_diameter,
            pitch = self.pitch,
            steps,
            polygons = swept.polygons.len(),
            "swept thread tooth"
        );

        let finished = match self.end_finish {
            EndFinish::Raw => swept,
            EndFinish::Square => {
                let reach = self.major_diameter / 2.0 + self.pitch;
                let slab = Mesh::cylinder(reach, self.length, segments, metadata);
                swept.intersection(&slab).repair_manifold()
            },
        };

        match self.hand {
            Hand::Right => finished,
            Hand::Left => finished.mirror(Plane::from_normal(Vector3::y(), 0.0)),
        }
    }

    /// Right-hand helical sweep of the profile, `steps` steps of one
    /// `segments`-th of a turn each, with the tooth centre starting at `z_start`.
    fn sweep<S: Clone + Send + Sync + Debug>(
        &self,
        z_start: Real,
        steps: usize,
        segments: usize,
        metadata: Option<S>,
    ) -> Mesh<S> {
        let profile = self.profile();
        let angle_step = TAU / segments as Real;
        let rise_step = self.pitch / segments as Real;

        let rings: Vec<[Point3<Real>; 4]> = (0..=steps)
            .map(|k| {
                let angle = k as Real * angle_step;
                let z = z_start + k as Real * rise_step;
                let (sin, cos) = angle.sin_cos();
                profile.map(|(r, dz)| Point3::new(r * cos, r * sin, z + dz))
            })
            .collect();

        let mut polygons = Vec::with_capacity(steps * 8 + 2);
        for pair in rings.windows(2) {
            let (here, next) = (&pair[0], &pair[1]);
            for i in 0..4 {
                let j = (i + 1) % 4;
                polygons.push(Polygon::from_points(&[here[i], next[i], next[j]], metadata.clone()));
                polygons.push(Polygon::from_points(&[here[i], next[j], here[j]], metadata.clone()));
            }
        }

        // the profile's own winding faces backwards along the sweep
        if let (Some(first), Some(last)) = (rings.first(), rings.last()) {
            polygons.push(Polygon::from_points(first, metadata.clone()));
            let mut end_cap = *last;
            end_cap.reverse();
            polygons.push(Polygon::from_points(&end_cap, metadata.clone()));
        }

        Mesh::from_polygons(&polygons, metadata)
    }
}
