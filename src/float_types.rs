// parry built for f64 coordinates
pub use parry3d_f64 as parry3d;

/// Scalar used for every coordinate and length in the crate, in millimetres.
pub type Real = f64;

use core::str::FromStr;
use std::sync::OnceLock;

/// Distance within which a point counts as lying on a plane.
///
/// Read from `EYEPIECE_TOLERANCE` when the crate is compiled, or fixed at run
/// time by the first [`set_tolerance`] call made before any solid is built.
static TOLERANCE_CELL: OnceLock<Real> = OnceLock::new();

#[inline]
const fn default_tolerance() -> Real {
    1e-5
}

/// Current on-plane tolerance in millimetres.
pub fn tolerance() -> Real {
    *TOLERANCE_CELL.get_or_init(|| {
        if let Some(environment_variable) = option_env!("EYEPIECE_TOLERANCE") {
            if let Ok(value) = Real::from_str(environment_variable) {
                return value.max(Real::EPSILON);
            }
        }
        default_tolerance()
    })
}

/// First call wins. Later calls, or calls after [`tolerance`] was read, do nothing.
pub fn set_tolerance(value: Real) {
    let _ = TOLERANCE_CELL.set(value.max(Real::EPSILON));
}

pub const TAU: Real = core::f64::consts::TAU;
