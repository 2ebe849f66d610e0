//! Solid construction of the camera mount, the lens socket and their assembly.
//!
//! The round bodies are revolved from (radius, z) outlines, so the only
//! booleans left are the thread unions. Each boolean result is welded and
//! has its T-junctions split before it leaves the builder.

use super::params::{AdapterParameters, Composition, Dimensions, Tuning};
use super::{Assembly, Body, Part};
use crate::errors::ValidationError;
use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::traits::CSG;
use nalgebra::Point2;
use tracing::debug;

/// Builds the adapter from validated inputs.
///
/// All checks happen in [`AdapterBuilder::new`]. The construction methods are
/// infallible and each returns a fresh solid.
#[derive(Debug, Clone)]
pub struct AdapterBuilder {
    dimensions: Dimensions,
    tuning: Tuning,
}

impl AdapterBuilder {
    pub fn new(params: AdapterParameters, tuning: Tuning) -> Result<Self, ValidationError> {
        params.validate()?;
        tuning.validate()?;
        let dimensions = params.derive_with_ratio(tuning.taper_ratio);
        if tuning.composition == Composition::Fused {
            dimensions.check_socket_seat()?;
        }
        debug!(?dimensions, ?tuning, "derived adapter dimensions");
        Ok(AdapterBuilder { dimensions, tuning })
    }

    pub const fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    pub const fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Sleeve tube with the male thread, z ∈ [0, camera_mount_height].
    pub fn threaded_sleeve(&self) -> Mesh<Part> {
        let d = &self.dimensions;
        let sleeve = Mesh::tube(
            d.camera_root_radius,
            d.camera_screw_bore_radius,
            d.camera_mount_height,
            self.tuning.segments,
            Some(Part::CameraMount),
        );

        let threaded = sleeve.union(&self.camera_thread()).repair_manifold();
        debug!(polygons = threaded.polygons.len(), "threaded camera sleeve");
        threaded
    }

    /// Hollow cone from the camera screw radius at z = 0 out to the lens-side
    /// radius at z = -adapter_body_height. The wall is half the nominal wall,
    /// measured radially.
    pub fn transition_shell(&self) -> Mesh<Part> {
        let d = &self.dimensions;
        let inset = d.wall_thickness / 2.0;
        let height = d.adapter_body_height;
        let outline = [
            Point2::new(d.adapter_body_top_radius - inset, -height),
            Point2::new(d.adapter_body_top_radius, -height),
            Point2::new(d.camera_screw_radius, 0.0),
            Point2::new(d.camera_screw_radius - inset, 0.0),
        ];

        let shell = Mesh::revolve(&outline, self.tuning.segments, Some(Part::CameraMount));
        debug!(polygons = shell.polygons.len(), "hollow transition shell");
        shell
    }

    /// The camera-side body: threaded sleeve above z = 0, hollow cone below.
    pub fn camera_mount(&self) -> Mesh<Part> {
        let d = &self.dimensions;
        let mut outline = self.sleeve_outline();
        outline.extend([
            (
                Point2::new(d.adapter_body_top_radius - d.wall_thickness / 2.0, -d.adapter_body_height),
                Some(Part::CameraMount),
            ),
            (
                Point2::new(d.adapter_body_top_radius, -d.adapter_body_height),
                Some(Part::CameraMount),
            ),
        ]);

        let body = Mesh::revolve_tagged(&outline, self.tuning.segments)
            .union(&self.camera_thread())
            .repair_manifold();
        debug!(polygons = body.polygons.len(), "camera mount");
        body
    }

    /// The threaded lens socket in local coordinates, top face at z = 0.
    pub fn lens_socket(&self) -> Mesh<Part> {
        let d = &self.dimensions;
        let blank = Mesh::tube(
            d.lens_mount_external_radius,
            d.lens_mount_diameter / 2.0,
            d.socket_height,
            self.tuning.segments,
            Some(Part::LensSocket),
        )
        .translate(0.0, 0.0, -d.socket_height);

        let socket = blank.union(&self.lens_thread(0.0)).repair_manifold();
        debug!(polygons = socket.polygons.len(), "lens socket");
        socket
    }

    /// Camera mount and socket as one solid, the socket's top face sunk half
    /// a wall into the wide end of the cone.
    ///
    /// The cone's wide end spans exactly the socket wall, so the outline runs
    /// from the cone's inner wall straight down the socket bore and from the
    /// socket's top face up the cone's outer wall.
    pub fn fused_body(&self) -> Mesh<Part> {
        let d = &self.dimensions;
        let top = d.socket_offset(&self.tuning);
        let bottom = top - d.socket_height;
        let flare = (d.adapter_body_top_radius - d.camera_screw_radius) / d.adapter_body_height;
        let seat = d.camera_screw_radius - flare * top;
        let bore = d.lens_mount_diameter / 2.0;
        let outer = d.lens_mount_external_radius;
        let socket = Some(Part::LensSocket);

        let mut outline = self.sleeve_outline();
        outline.extend([
            (Point2::new(bore, -d.adapter_body_height), socket),
            (Point2::new(bore, bottom), socket),
            (Point2::new(outer, bottom), socket),
            (Point2::new(outer, top), socket),
            (Point2::new(seat, top), Some(Part::CameraMount)),
        ]);

        let body = Mesh::revolve_tagged(&outline, self.tuning.segments)
            .union(&self.camera_thread())
            .union(&self.lens_thread(top))
            .repair_manifold();
        debug!(polygons = body.polygons.len(), seat, "fused eyepiece body");
        body
    }

    /// Position the socket below the cone and compose the two parts.
    pub fn build(&self) -> Assembly {
        let offset = self.dimensions.socket_offset(&self.tuning);
        debug!(offset, composition = ?self.tuning.composition, "placing lens socket");

        let bodies = match self.tuning.composition {
            Composition::Fused => vec![Body::new(Assembly::LABEL, self.fused_body())],
            Composition::CoLocated => vec![
                Body::new(Part::CameraMount.name(), self.camera_mount()),
                Body::new(
                    Part::LensSocket.name(),
                    self.lens_socket().translate(0.0, 0.0, offset),
                ),
            ],
        };
        Assembly::new(bodies)
    }

    /// Outline of the sleeve, counter-clockwise from the cone's outer narrow
    /// corner down to the bore at z = 0. The cone's inner wall starts there.
    fn sleeve_outline(&self) -> Vec<(Point2<Real>, Option<Part>)> {
        let d = &self.dimensions;
        let tag = Some(Part::CameraMount);
        vec![
            (Point2::new(d.camera_screw_radius, 0.0), tag),
            (Point2::new(d.camera_root_radius, 0.0), tag),
            (Point2::new(d.camera_root_radius, d.camera_mount_height), tag),
            (Point2::new(d.camera_screw_bore_radius, d.camera_mount_height), tag),
            (Point2::new(d.camera_screw_bore_radius, 0.0), tag),
        ]
    }

    /// Male thread turned to its start phase on the sleeve.
    fn camera_thread(&self) -> Mesh<Part> {
        self.dimensions
            .camera_thread()
            .solid(self.tuning.segments, Some(Part::CameraMount))
            .rotate(0.0, 0.0, 180.0)
    }

    /// Female thread hanging from the socket's top face at z = `top`.
    fn lens_thread(&self, top: Real) -> Mesh<Part> {
        let d = &self.dimensions;
        d.lens_thread()
            .solid(self.tuning.segments, Some(Part::LensSocket))
            .translate(0.0, 0.0, top - d.lens_mount_thread_depth)
    }
}
