//! A parametric **threaded diopter mount**: an M18×0.75 female lens socket
//! joined by a hollow cone to an M16×0.75 male camera boss.
//!
//! The solids are built with a small polygon-soup **Constructive Solid
//! Geometry (CSG)** kernel ([BSP](mesh::bsp) trees, csg.js style) and
//! exported as STL and as a STEP faceted B-rep.
//!
//! ```no_run
//! use eyepiece_mount::adapter::{AdapterBuilder, AdapterParameters, Tuning};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let params = AdapterParameters::default();
//! let assembly = AdapterBuilder::new(params, Tuning::default())?.build();
//! assembly.export(std::path::Path::new("out"), &params.designation())?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod adapter;
pub mod errors;
pub mod float_types;
pub mod io;
pub mod mesh;
pub mod thread;
pub mod traits;

pub use adapter::{AdapterBuilder, AdapterParameters, Assembly, Composition, Part, Tuning};
pub use errors::ValidationError;
pub use mesh::Mesh;
pub use thread::{EndFinish, Hand, ThreadKind, ThreadSpec};
pub use traits::CSG;
