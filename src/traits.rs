use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::float_types::Real;
use crate::mesh::plane::Plane;
use nalgebra::{Matrix3, Matrix4, Rotation3, Translation3, Vector3};

/// Solid modelling operations shared by every kernel type.
///
/// Every method returns a new value; nothing is modified in place, so a
/// construction is a plain chain of expressions.
pub trait CSG: Sized + Clone {
    fn new() -> Self;
    fn union(&self, other: &Self) -> Self;
    fn difference(&self, other: &Self) -> Self;
    fn intersection(&self, other: &Self) -> Self;
    /// Apply an affine transform. Orientation-reversing matrices must keep
    /// the result outward-facing.
    fn transform(&self, matrix: &Matrix4<Real>) -> Self;
    fn bounding_box(&self) -> Aabb;
    fn invalidate_bounding_box(&mut self);
    fn inverse(&self) -> Self;

    /// Shift by `vector`.
    fn translate_vector(&self, vector: Vector3<Real>) -> Self {
        self.transform(&Translation3::from(vector).to_homogeneous())
    }

    fn translate(&self, x: Real, y: Real, z: Real) -> Self {
        self.translate_vector(Vector3::new(x, y, z))
    }

    /// Euler angles in degrees, applied about X first and Z last.
    fn rotate(&self, x_deg: Real, y_deg: Real, z_deg: Real) -> Self {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), x_deg.to_radians());
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), y_deg.to_radians());
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), z_deg.to_radians());

        let rot = rz * ry * rx;
        self.transform(&rot.to_homogeneous())
    }

    /// Per-axis scale. A negative factor is a reflection.
    fn scale(&self, sx: Real, sy: Real, sz: Real) -> Self {
        self.transform(&Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz)))
    }

    /// Reflection through `plane`.
    ///
    /// A reflection reverses handedness: a right-hand helix comes back
    /// left-handed. [`CSG::transform`] implementations keep faces
    /// outward-facing for orientation-reversing matrices.
    fn mirror(&self, plane: Plane) -> Self {
        let len = plane.normal().norm();
        if len < Real::EPSILON {
            return self.clone();
        }

        let n = plane.normal() / len;
        let offset = n * (plane.offset() / len);

        // R = I - 2 n n^T, applied about a plane moved through the origin
        let mut reflect = Matrix4::identity();
        let reflect_3 = Matrix3::identity() - 2.0 * n * n.transpose();
        reflect.fixed_view_mut::<3, 3>(0, 0).copy_from(&reflect_3);

        let to_origin = Translation3::from(-offset).to_homogeneous();
        let back = Translation3::from(offset).to_homogeneous();

        self.transform(&(back * reflect * to_origin))
    }
}
