mod support;

use approx::assert_relative_eq;
use eyepiece_mount::{
    adapter::{AdapterBuilder, AdapterParameters, Assembly, Composition, Part, Tuning},
    errors::ValidationError,
    float_types::Real,
    mesh::Mesh,
};

use crate::support::{
    TEST_SEGMENTS, apothem, approx_eq, assert_watertight, bounding_box, radial_extent,
};

fn builder(composition: Composition) -> AdapterBuilder {
    let tuning = Tuning::default()
        .with_segments(TEST_SEGMENTS)
        .with_composition(composition);
    AdapterBuilder::new(AdapterParameters::default(), tuning).unwrap()
}

/// Polygonal frustum volume for the ring layout of the round primitives.
fn frustum_volume(r0: Real, r1: Real, height: Real) -> Real {
    let area = |r: Real| {
        let n = TEST_SEGMENTS as Real;
        0.5 * n * r * r * (std::f64::consts::TAU / n).sin()
    };
    let (a0, a1) = (area(r0), area(r1));
    height / 3.0 * (a0 + a1 + (a0 * a1).sqrt())
}

fn has_part(mesh: &Mesh<Part>, part: Part) -> bool {
    mesh.polygons.iter().any(|p| p.metadata == Some(part))
}

#[test]
fn transition_shell_is_a_hollow_cone_below_the_origin() {
    let shell = builder(Composition::Fused).transition_shell();
    assert_watertight(&shell, "transition shell");

    let bb = bounding_box(&shell);
    assert!(approx_eq(bb[2], -6.65, 1e-9));
    assert!(approx_eq(bb[5], 0.0, 1e-9));

    let (inner, outer) = radial_extent(&shell);
    assert!(approx_eq(outer, 9.5, 1e-9));
    assert!(inner >= 7.5 - 1e-9);

    let expected = frustum_volume(8.0, 9.5, 6.65) - frustum_volume(7.5, 9.0, 6.65);
    assert_relative_eq!(shell.volume(), expected, max_relative = 1e-6);
}

#[test]
fn threaded_sleeve_sits_above_the_origin() {
    let b = builder(Composition::Fused);
    let sleeve = b.threaded_sleeve();
    assert_watertight(&sleeve, "threaded sleeve");

    let bb = bounding_box(&sleeve);
    assert!(approx_eq(bb[2], 0.0, 1e-9));
    assert!(approx_eq(bb[5], 5.0, 1e-9));

    let (inner, outer) = radial_extent(&sleeve);
    assert!(approx_eq(outer, 8.0, 1e-9));
    // boolean splits leave vertices on the bore's flat facets
    let bore = b.dimensions().camera_screw_bore_radius;
    assert!(inner >= apothem(bore, TEST_SEGMENTS) - 1e-9);
    assert!(inner <= bore + 1e-9);

    let d = b.dimensions();
    let bare = frustum_volume(d.camera_root_radius, d.camera_root_radius, 5.0)
        - frustum_volume(d.camera_screw_bore_radius, d.camera_screw_bore_radius, 5.0);
    assert!(sleeve.volume() > bare);
}

#[test]
fn camera_mount_spans_cone_and_sleeve() {
    let camera = builder(Composition::Fused).camera_mount();
    assert_watertight(&camera, "camera mount");
    assert!(camera.polygons.iter().all(|p| p.metadata == Some(Part::CameraMount)));

    let bb = bounding_box(&camera);
    assert!(approx_eq(bb[2], -6.65, 1e-9));
    assert!(approx_eq(bb[5], 5.0, 1e-9));
}

#[test]
fn lens_socket_in_local_coordinates() {
    let b = builder(Composition::Fused);
    let socket = b.lens_socket();
    assert_watertight(&socket, "lens socket");
    assert!(socket.polygons.iter().all(|p| p.metadata == Some(Part::LensSocket)));

    let bb = bounding_box(&socket);
    assert!(approx_eq(bb[2], -6.0, 1e-9));
    assert!(approx_eq(bb[5], 0.0, 1e-9));

    let (inner, outer) = radial_extent(&socket);
    assert!(approx_eq(outer, 9.5, 1e-9));
    let crest = b.dimensions().lens_thread().crest_radius();
    assert!(inner >= apothem(crest, TEST_SEGMENTS) - 1e-9);
    assert!(inner <= crest + 1e-9);

    let bare = frustum_volume(9.5, 9.5, 6.0) - frustum_volume(9.0, 9.0, 6.0);
    assert!(socket.volume() > bare);
}

#[test]
fn fused_assembly_is_one_solid() {
    let b = builder(Composition::Fused);
    let assembly = b.build();
    assert_eq!(assembly.label, "eyepiece");
    assert_eq!(assembly.bodies.len(), 1);

    let body = assembly.body("eyepiece").unwrap();
    assert_watertight(&body.mesh, "fused eyepiece");
    assert!(has_part(&body.mesh, Part::CameraMount));
    assert!(has_part(&body.mesh, Part::LensSocket));

    let bb = bounding_box(&body.mesh);
    assert!(approx_eq(bb[2], -12.15, 1e-9));
    assert!(approx_eq(bb[5], 5.0, 1e-9));
    assert!(approx_eq(radial_extent(&body.mesh).1, 9.5, 1e-9));

    // the socket overlaps the cone, so fusing loses some volume
    let camera = b.camera_mount().volume();
    let socket = b.lens_socket().volume();
    let fused = body.mesh.volume();
    assert!(fused < camera + socket);
    assert!(fused > camera.max(socket));
}

#[test]
fn co_located_assembly_keeps_two_bodies_apart() {
    let assembly = builder(Composition::CoLocated).build();
    assert_eq!(assembly.bodies.len(), 2);

    let camera = &assembly.body("camera_mount").unwrap().mesh;
    let socket = &assembly.body("lens_socket").unwrap().mesh;
    assert_watertight(camera, "camera mount");
    assert_watertight(socket, "lens socket");
    assert!(!has_part(camera, Part::LensSocket));
    assert!(!has_part(socket, Part::CameraMount));

    let camera_bb = bounding_box(camera);
    let socket_bb = bounding_box(socket);
    assert!(approx_eq(camera_bb[2], -6.65, 1e-9));
    assert!(approx_eq(socket_bb[5], -6.655, 1e-9));
    assert!(approx_eq(socket_bb[2], -12.655, 1e-9));

    let merged = assembly.to_mesh();
    assert_eq!(merged.polygons.len(), camera.polygons.len() + socket.polygons.len());
    assert!(merged.is_manifold());
    assert_relative_eq!(merged.volume(), camera.volume() + socket.volume(), max_relative = 1e-12);
}

#[test]
fn construction_is_deterministic() {
    let first = builder(Composition::Fused).build();
    let second = builder(Composition::Fused).build();
    let (a, b) = (&first.bodies[0].mesh, &second.bodies[0].mesh);
    assert_eq!(a.polygons.len(), b.polygons.len());
    assert_eq!(a.volume(), b.volume());
}

#[test]
fn eyepiece_shortcut_uses_default_parameters() {
    let assembly = Assembly::eyepiece(Tuning::default().with_segments(TEST_SEGMENTS)).unwrap();
    assert_eq!(assembly.bodies.len(), 1);
    assert_eq!(assembly.bodies[0].name, Assembly::LABEL);
}

#[test]
fn builder_rejects_invalid_input() {
    let coarse = Tuning::default().with_segments(4);
    assert_eq!(
        AdapterBuilder::new(AdapterParameters::default(), coarse).unwrap_err(),
        ValidationError::TooFewSegments(4)
    );

    let thin = AdapterParameters {
        wall_thickness: 0.5,
        ..AdapterParameters::default()
    };
    assert!(matches!(
        AdapterBuilder::new(thin, Tuning::default()),
        Err(ValidationError::SleeveWithoutWall { .. })
    ));
}

#[test]
fn fused_body_needs_a_cone_that_seats_the_socket() {
    let wide_lens = AdapterParameters {
        lens_mount_diameter: 40.0,
        ..AdapterParameters::default()
    };
    assert!(matches!(
        AdapterBuilder::new(wide_lens, Tuning::default()),
        Err(ValidationError::ConeTooShort { .. })
    ));

    let apart = Tuning::default().with_composition(Composition::CoLocated);
    assert!(AdapterBuilder::new(wide_lens, apart).is_ok());
}

#[test]
fn sleeve_and_cone_meet_without_a_seam() {
    let b = builder(Composition::Fused);
    let d = *b.dimensions();
    let camera = b.camera_mount();

    // nothing but the cone's exposed shoulder faces up at z = 0
    let up_at_origin: Real = camera
        .polygons
        .iter()
        .filter(|p| p.vertices.iter().all(|v| v.pos.z.abs() < 1e-9))
        .map(|p| p.area_vector().z)
        .sum();
    let shoulder = support::prism_volume(d.camera_screw_radius, 1.0, TEST_SEGMENTS)
        - support::prism_volume(d.camera_root_radius, 1.0, TEST_SEGMENTS);
    assert_relative_eq!(up_at_origin, shoulder, max_relative = 1e-6);
}

#[test]
fn default_resolution_eyepiece_is_watertight() {
    let assembly = Assembly::eyepiece(Tuning::default()).unwrap();
    let body = assembly.body(Assembly::LABEL).unwrap();
    assert_watertight(&body.mesh, "eyepiece at the default resolution");
    assert!(has_part(&body.mesh, Part::CameraMount));
    assert!(has_part(&body.mesh, Part::LensSocket));
}
