mod support;

use approx::assert_relative_eq;
use eyepiece_mount::{
    adapter::{AdapterParameters, Composition, Tuning},
    errors::ValidationError,
    float_types::Real,
    thread::EXTERNAL_DEPTH_FACTOR,
};

use crate::support::approx_eq;

#[test]
fn default_dimensions() {
    let dims = AdapterParameters::default().derive();

    assert_relative_eq!(dims.camera_screw_length, 5.0, epsilon = 1e-4);
    assert_relative_eq!(dims.camera_mount_height, 5.0, epsilon = 1e-4);
    assert_relative_eq!(dims.adapter_body_height, 6.65, epsilon = 1e-4);
    assert_relative_eq!(dims.thread_depth, 0.46005, epsilon = 1e-4);
    assert_relative_eq!(dims.camera_root_radius, 7.53995, epsilon = 1e-4);
    assert_relative_eq!(dims.camera_screw_bore_radius, 7.5, epsilon = 1e-4);
    assert_relative_eq!(dims.camera_screw_radius, 8.0, epsilon = 1e-12);
    assert_relative_eq!(dims.adapter_body_top_radius, 9.5, epsilon = 1e-12);
    assert_relative_eq!(dims.lens_mount_external_radius, 9.5, epsilon = 1e-12);
    assert_relative_eq!(dims.lens_mount_depth, 5.0, epsilon = 1e-12);
    assert_relative_eq!(dims.lens_mount_thread_depth, 4.75, epsilon = 1e-12);
    assert_relative_eq!(dims.socket_height, 6.0, epsilon = 1e-12);
}

#[test]
fn taper_ratio_scales_cone_height_only() {
    let params = AdapterParameters::default();
    let steep = params.derive_with_ratio(2.0);
    assert_relative_eq!(steep.adapter_body_height, 10.0, epsilon = 1e-12);
    assert_eq!(steep.camera_root_radius, params.derive().camera_root_radius);
}

#[test]
fn thread_depth_is_exactly_proportional_to_pitch() {
    for pitch in [0.5, 0.75, 1.0, 1.25, 2.0] {
        let params = AdapterParameters {
            pitch,
            ..AdapterParameters::default()
        };
        assert_eq!(params.derive().thread_depth, EXTERNAL_DEPTH_FACTOR * pitch);
    }
}

#[test]
fn screw_length_grows_with_turns() {
    let mut previous = 0.0;
    for thread_turns in 1..=20 {
        let params = AdapterParameters {
            thread_turns,
            ..AdapterParameters::default()
        };
        let length = params.derive().camera_screw_length;
        assert!(length > previous, "turns {thread_turns}: {length} <= {previous}");
        previous = length;
    }
}

#[test]
fn derived_radii_stay_positive_under_wall_limit() {
    for camera_screw_diameter in [4.0, 8.0, 16.0, 30.0] {
        for pitch in [0.25, 0.5, 0.75, 1.5] {
            let thread_depth = EXTERNAL_DEPTH_FACTOR * pitch;
            let limit = camera_screw_diameter / 2.0 - thread_depth;
            for fraction in [0.05, 0.5, 0.95] {
                let params = AdapterParameters {
                    camera_screw_diameter,
                    pitch,
                    wall_thickness: limit * fraction,
                    ..AdapterParameters::default()
                };
                let dims = params.derive();
                assert!(dims.camera_root_radius > 0.0);
                assert!(dims.camera_screw_bore_radius > 0.0);
                assert!(dims.camera_mount_height > 0.0);
            }
        }
    }
}

#[test]
fn socket_offsets() {
    let dims = AdapterParameters::default().derive();
    let fused = dims.socket_offset(&Tuning::default());
    let co_located = dims.socket_offset(&Tuning::default().with_composition(Composition::CoLocated));

    assert!(approx_eq(fused, -6.15, 1e-9));
    // the magic -3.33 of a cone centred on the origin, shifted by half its height
    assert!(approx_eq(co_located + 6.65 / 2.0, -3.33, 1e-9));
}

#[test]
fn defaults_validate() {
    assert_eq!(AdapterParameters::default().validate(), Ok(()));
    assert_eq!(Tuning::default().validate(), Ok(()));
}

#[test]
fn rejects_non_positive_lengths() {
    let params = AdapterParameters {
        pitch: 0.0,
        ..AdapterParameters::default()
    };
    assert_eq!(
        params.validate(),
        Err(ValidationError::NonPositive {
            name: "pitch",
            value: 0.0
        })
    );

    let params = AdapterParameters {
        wall_thickness: Real::NAN,
        ..AdapterParameters::default()
    };
    assert!(matches!(
        params.validate(),
        Err(ValidationError::NonPositive { name: "wall_thickness", .. })
    ));
}

#[test]
fn rejects_zero_turns() {
    let params = AdapterParameters {
        thread_turns: 0,
        ..AdapterParameters::default()
    };
    assert_eq!(params.validate(), Err(ValidationError::TooFewTurns(0)));
}

#[test]
fn rejects_wall_thicker_than_the_screw() {
    let params = AdapterParameters {
        wall_thickness: 7.6,
        ..AdapterParameters::default()
    };
    assert!(matches!(
        params.validate(),
        Err(ValidationError::WallTooThick { .. })
    ));
}

#[test]
fn rejects_bore_reaching_the_thread_root() {
    // half the wall (0.45) is less than the thread depth (0.46005)
    let params = AdapterParameters {
        wall_thickness: 0.9,
        ..AdapterParameters::default()
    };
    assert!(matches!(
        params.validate(),
        Err(ValidationError::SleeveWithoutWall { .. })
    ));
}

#[test]
fn rejects_lens_thread_longer_than_socket() {
    let params = AdapterParameters {
        pitch: 0.5,
        thread_turns: 10,
        ..AdapterParameters::default()
    };
    assert_eq!(
        params.validate(),
        Err(ValidationError::ThreadExceedsSocket {
            thread: 10.5,
            socket: 8.0
        })
    );
}

#[test]
fn rejects_coarse_tuning() {
    let tuning = Tuning::default().with_segments(4);
    assert_eq!(tuning.validate(), Err(ValidationError::TooFewSegments(4)));

    let tuning = Tuning {
        socket_gap: -0.1,
        ..Tuning::default()
    };
    assert!(matches!(tuning.validate(), Err(ValidationError::Tuning(_))));
}

#[test]
fn designations() {
    assert_eq!(
        AdapterParameters::default().designation(),
        "m18x075_f_to_m16x075_diopter_mount"
    );
    let params = AdapterParameters {
        lens_mount_diameter: 20.0,
        pitch: 1.0,
        ..AdapterParameters::default()
    };
    assert_eq!(params.designation(), "m20x1_f_to_m16x1_diopter_mount");
}
