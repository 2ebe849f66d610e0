//! Input parameters, tuning constants and the dimensions derived from them.

use crate::errors::{ValidationError, ensure_positive};
use crate::float_types::Real;
use crate::thread::{EXTERNAL_DEPTH_FACTOR, MAX_ROOT_OVERLAP_FACTOR, ThreadSpec};

/// Axial margin added to the engaged turns of the camera screw, in mm.
pub const SCREW_LENGTH_MARGIN: Real = 2.0;

/// Fewest facets a round primitive may have.
pub const MIN_SEGMENTS: usize = 8;

/// The five user-facing inputs. Every other length is derived from these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdapterParameters {
    /// Nominal major diameter of the female lens-side thread.
    pub lens_mount_diameter: Real,
    /// Nominal major diameter of the male camera-side thread.
    pub camera_screw_diameter: Real,
    /// Shared by both threads.
    pub pitch: Real,
    /// Engaged turns on the camera side.
    pub thread_turns: u32,
    pub wall_thickness: Real,
}

impl Default for AdapterParameters {
    /// M18×0.75 lens socket on an M16×0.75 camera boss, four turns, 1 mm wall.
    fn default() -> Self {
        AdapterParameters {
            lens_mount_diameter: 18.0,
            camera_screw_diameter: 16.0,
            pitch: 0.75,
            thread_turns: 4,
            wall_thickness: 1.0,
        }
    }
}

/// How the camera mount and the lens socket end up in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Composition {
    /// The socket overlaps the cone by half a wall and both are unioned into
    /// one printable solid.
    #[default]
    Fused,
    /// The socket sits `socket_gap` below the cone as a separate body.
    CoLocated,
}

/// Empirical constants of the design, kept out of the construction code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    /// Cone height over camera mount height.
    pub taper_ratio: Real,
    /// Axial clearance between cone and socket in [`Composition::CoLocated`].
    pub socket_gap: Real,
    pub composition: Composition,
    /// Facets per full circle for every round primitive and thread sweep.
    pub segments: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            taper_ratio: 1.33,
            socket_gap: 0.005,
            composition: Composition::Fused,
            segments: 64,
        }
    }
}

impl Tuning {
    pub const fn with_segments(mut self, segments: usize) -> Self {
        self.segments = segments;
        self
    }

    pub const fn with_composition(mut self, composition: Composition) -> Self {
        self.composition = composition;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.segments < MIN_SEGMENTS {
            return Err(ValidationError::TooFewSegments(self.segments));
        }
        if !(self.taper_ratio.is_finite() && self.taper_ratio > 1.0) {
            return Err(ValidationError::Tuning(format!(
                "taper ratio must exceed 1, got {}",
                self.taper_ratio
            )));
        }
        if !(self.socket_gap.is_finite() && self.socket_gap >= 0.0) {
            return Err(ValidationError::Tuning(format!(
                "socket gap must be zero or more, got {}",
                self.socket_gap
            )));
        }
        Ok(())
    }
}

/// Every length the construction needs, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub lens_mount_diameter: Real,
    pub camera_screw_diameter: Real,
    pub pitch: Real,
    pub wall_thickness: Real,

    pub camera_screw_length: Real,
    pub camera_mount_height: Real,
    pub adapter_body_height: Real,
    pub adapter_body_top_radius: Real,
    pub lens_mount_external_radius: Real,
    pub thread_depth: Real,
    pub camera_screw_radius: Real,
    pub camera_root_radius: Real,
    pub camera_screw_bore_radius: Real,
    /// Depth of the socket cavity.
    pub lens_mount_depth: Real,
    /// Axial engagement of the lens-side thread.
    pub lens_mount_thread_depth: Real,
    pub socket_height: Real,
}

impl AdapterParameters {
    /// Derive with the default taper ratio.
    pub fn derive(&self) -> Dimensions {
        self.derive_with_ratio(Tuning::default().taper_ratio)
    }

    pub fn derive_with_ratio(&self, taper_ratio: Real) -> Dimensions {
        let turns = Real::from(self.thread_turns);
        let camera_screw_length = self.pitch * turns + SCREW_LENGTH_MARGIN;
        let camera_mount_height = camera_screw_length;
        let thread_depth = EXTERNAL_DEPTH_FACTOR * self.pitch;
        let lens_mount_depth = camera_screw_length;
        let outer_radius = (self.lens_mount_diameter + self.wall_thickness) / 2.0;

        Dimensions {
            lens_mount_diameter: self.lens_mount_diameter,
            camera_screw_diameter: self.camera_screw_diameter,
            pitch: self.pitch,
            wall_thickness: self.wall_thickness,

            camera_screw_length,
            camera_mount_height,
            adapter_body_height: camera_mount_height * taper_ratio,
            adapter_body_top_radius: outer_radius,
            lens_mount_external_radius: outer_radius,
            thread_depth,
            camera_screw_radius: self.camera_screw_diameter / 2.0,
            camera_root_radius: (self.camera_screw_diameter - 2.0 * thread_depth) / 2.0,
            camera_screw_bore_radius: self.camera_screw_diameter / 2.0 - self.wall_thickness / 2.0,
            lens_mount_depth,
            lens_mount_thread_depth: self.pitch + turns,
            socket_height: lens_mount_depth + self.wall_thickness,
        }
    }

    /// Check every precondition the construction relies on.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_positive("lens_mount_diameter", self.lens_mount_diameter)?;
        ensure_positive("camera_screw_diameter", self.camera_screw_diameter)?;
        ensure_positive("pitch", self.pitch)?;
        ensure_positive("wall_thickness", self.wall_thickness)?;
        if self.thread_turns < 1 {
            return Err(ValidationError::TooFewTurns(self.thread_turns));
        }

        let dims = self.derive();
        let limit = self.camera_screw_diameter / 2.0 - dims.thread_depth;
        if self.wall_thickness >= limit {
            return Err(ValidationError::WallTooThick {
                wall: self.wall_thickness,
                limit,
            });
        }
        if dims.camera_root_radius <= dims.camera_screw_bore_radius {
            return Err(ValidationError::SleeveWithoutWall {
                root: dims.camera_root_radius,
                bore: dims.camera_screw_bore_radius,
            });
        }
        if dims.lens_mount_thread_depth > dims.socket_height {
            return Err(ValidationError::ThreadExceedsSocket {
                thread: dims.lens_mount_thread_depth,
                socket: dims.socket_height,
            });
        }

        dims.camera_thread().validate()?;
        dims.lens_thread().validate()
    }

    /// Base file name, e.g. `m18x075_f_to_m16x075_diopter_mount`.
    pub fn designation(&self) -> String {
        let pitch = compact(self.pitch);
        format!(
            "m{}x{pitch}_f_to_m{}x{pitch}_diopter_mount",
            compact(self.lens_mount_diameter),
            compact(self.camera_screw_diameter),
        )
    }
}

/// `18.0` -> `18`, `0.75` -> `075`
fn compact(value: Real) -> String {
    value.to_string().replace('.', "")
}

impl Dimensions {
    /// Radial material between the camera bore and the thread root.
    pub fn sleeve_wall(&self) -> Real {
        self.camera_root_radius - self.camera_screw_bore_radius
    }

    /// Axial position of the socket's top face.
    pub fn socket_offset(&self, tuning: &Tuning) -> Real {
        match tuning.composition {
            Composition::Fused => -(self.adapter_body_height - self.wall_thickness / 2.0),
            Composition::CoLocated => -(self.adapter_body_height + tuning.socket_gap),
        }
    }

    /// A fused socket sinks half a wall into the cone. Its top face must stay
    /// below the narrow end, and the cone's outer wall must still clear the
    /// socket bore at that height.
    pub fn check_socket_seat(&self) -> Result<(), ValidationError> {
        let required = (self.wall_thickness / 2.0)
            .max(self.adapter_body_top_radius - self.camera_screw_radius);
        if self.adapter_body_height > required {
            Ok(())
        } else {
            Err(ValidationError::ConeTooShort {
                height: self.adapter_body_height,
                required,
            })
        }
    }

    /// Male thread on the camera sleeve, sunk into the sleeve without
    /// reaching the bore.
    pub fn camera_thread(&self) -> ThreadSpec {
        let overlap = (MAX_ROOT_OVERLAP_FACTOR * self.pitch).min(self.sleeve_wall() / 2.0);
        ThreadSpec::external(self.camera_screw_diameter, self.pitch, self.camera_screw_length)
            .with_root_overlap(overlap)
    }

    /// Female thread inside the lens socket.
    pub fn lens_thread(&self) -> ThreadSpec {
        let overlap = (MAX_ROOT_OVERLAP_FACTOR * self.pitch)
            .min((self.lens_mount_external_radius - self.lens_mount_diameter / 2.0) / 2.0);
        ThreadSpec::internal(self.lens_mount_diameter, self.pitch, self.lens_mount_thread_depth)
            .with_root_overlap(overlap)
    }
}
