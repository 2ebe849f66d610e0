//! The threaded diopter mount: parameters, construction and the finished
//! assembly.
//!
//! ```text
//!              z
//!              ^   camera sleeve, male thread
//!        5.00  |  ||
//!        0.00  |  \\__     hollow cone
//!              |     \\__
//!       -6.15  |  |‾‾‾‾‾‾|  lens socket, female thread
//!              |  |      |
//!      -12.15  |  |______|
//! ```

mod builder;
mod params;

pub use builder::AdapterBuilder;
pub use params::{
    AdapterParameters, Composition, Dimensions, MIN_SEGMENTS, SCREW_LENGTH_MARGIN, Tuning,
};

use crate::errors::ValidationError;
use crate::mesh::Mesh;
use crate::traits::CSG;
use std::fmt;

/// Which part of the adapter a polygon belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    CameraMount,
    LensSocket,
}

impl Part {
    pub const fn name(self) -> &'static str {
        match self {
            Part::CameraMount => "camera_mount",
            Part::LensSocket => "lens_socket",
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One named solid of an assembly.
#[derive(Debug, Clone)]
pub struct Body {
    pub name: String,
    pub mesh: Mesh<Part>,
}

impl Body {
    pub fn new(name: impl Into<String>, mesh: Mesh<Part>) -> Self {
        Body {
            name: name.into(),
            mesh,
        }
    }
}

/// The positioned solids of one adapter, sharing the Z axis.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub label: String,
    pub bodies: Vec<Body>,
}

impl Assembly {
    pub const LABEL: &'static str = "eyepiece";

    pub fn new(bodies: Vec<Body>) -> Self {
        Assembly {
            label: Self::LABEL.to_string(),
            bodies,
        }
    }

    /// Build the default M18 to M16 mount.
    pub fn eyepiece(tuning: Tuning) -> Result<Self, ValidationError> {
        Ok(AdapterBuilder::new(AdapterParameters::default(), tuning)?.build())
    }

    pub fn body(&self, name: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.name == name)
    }

    /// All bodies as one polygon soup. Bodies are disjoint or already fused,
    /// so no clipping is needed.
    pub fn to_mesh(&self) -> Mesh<Part> {
        let mut bodies = self.bodies.iter();
        match bodies.next() {
            Some(first) => bodies.fold(first.mesh.clone(), |acc, b| acc.merged(&b.mesh)),
            None => Mesh::new(),
        }
    }
}
