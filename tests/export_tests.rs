mod support;

use eyepiece_mount::{
    adapter::{AdapterBuilder, AdapterParameters, Assembly, Composition, Tuning},
    io::{IoError, StlFormat, save_exports, step::to_step},
    mesh::Mesh,
};
use std::collections::HashSet;
use std::fs::{self, File};

use crate::support::TEST_SEGMENTS;

fn assembly(composition: Composition) -> Assembly {
    let tuning = Tuning::default()
        .with_segments(TEST_SEGMENTS)
        .with_composition(composition);
    AdapterBuilder::new(AdapterParameters::default(), tuning)
        .unwrap()
        .build()
}

#[test]
fn export_writes_both_files() {
    let dir = tempfile::tempdir().unwrap();
    let assembly = assembly(Composition::Fused);
    let name = AdapterParameters::default().designation();

    let files = assembly.export(dir.path(), &name).unwrap();
    assert_eq!(files.stl, dir.path().join("m18x075_f_to_m16x075_diopter_mount.stl"));
    assert_eq!(files.step, dir.path().join("m18x075_f_to_m16x075_diopter_mount.step"));
    assert!(files.stl.is_file());
    assert!(files.step.is_file());
}

#[test]
fn binary_stl_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let assembly = assembly(Composition::Fused);
    let files = assembly.export(dir.path(), "mount").unwrap();

    let mut file = File::open(&files.stl).unwrap();
    let read = stl_io::read_stl(&mut file).unwrap();
    assert_eq!(read.faces.len(), assembly.to_mesh().triangle_count());

    // every edge of the written (f32) triangles has a facing partner
    let mut unpaired = HashSet::new();
    for face in &read.faces {
        for i in 0..3 {
            let (u, v) = (face.vertices[i], face.vertices[(i + 1) % 3]);
            if !unpaired.remove(&(v, u)) {
                unpaired.insert((u, v));
            }
        }
    }
    assert!(unpaired.is_empty(), "{} unpaired STL edges", unpaired.len());
}

#[test]
fn ascii_stl_names_the_solid() {
    let dir = tempfile::tempdir().unwrap();
    let assembly = assembly(Composition::Fused);
    let files = save_exports(&assembly, dir.path(), "mount", StlFormat::Ascii).unwrap();

    let text = fs::read_to_string(&files.stl).unwrap();
    assert!(text.starts_with("solid mount\n"));
    assert!(text.trim_end().ends_with("endsolid mount"));
    assert_eq!(
        text.matches("facet normal").count(),
        assembly.to_mesh().triangle_count()
    );
}

#[test]
fn step_holds_one_brep_per_body() {
    let dir = tempfile::tempdir().unwrap();

    let fused = assembly(Composition::Fused);
    let files = fused.export(dir.path(), "fused").unwrap();
    let text = fs::read_to_string(&files.step).unwrap();
    assert!(text.starts_with("ISO-10303-21;"));
    assert!(text.trim_end().ends_with("END-ISO-10303-21;"));
    assert!(text.contains("FILE_SCHEMA(('AUTOMOTIVE_DESIGN"));
    assert!(text.contains("SI_UNIT(.MILLI.,.METRE.)"));
    assert_eq!(text.matches("FACETED_BREP('eyepiece'").count(), 1);
    assert!(text.contains("PRODUCT('fused','fused'"));

    let apart = assembly(Composition::CoLocated);
    let files = apart.export(dir.path(), "apart").unwrap();
    let text = fs::read_to_string(&files.step).unwrap();
    assert_eq!(text.matches("FACETED_BREP('camera_mount'").count(), 1);
    assert_eq!(text.matches("FACETED_BREP('lens_socket'").count(), 1);
    assert_eq!(text.matches("CLOSED_SHELL").count(), 2);
}

#[test]
fn step_shares_coincident_points() {
    let cube = Mesh::<()>::cuboid(1.0, 1.0, 1.0, None);
    let moved = cube.clone();
    let text = to_step(&[("a", &cube), ("b", &moved)], "pair");
    // eight corners shared by both bodies, plus the placement origin
    assert_eq!(text.matches("CARTESIAN_POINT").count(), 9);
    assert_eq!(text.matches("POLY_LOOP").count(), 12);
}

#[test]
fn rebuild_gives_identical_files() {
    let first_dir = tempfile::tempdir().unwrap();
    let second_dir = tempfile::tempdir().unwrap();

    let first = assembly(Composition::Fused).export(first_dir.path(), "mount").unwrap();
    let second = assembly(Composition::Fused).export(second_dir.path(), "mount").unwrap();

    assert_eq!(fs::read(&first.stl).unwrap(), fs::read(&second.stl).unwrap());
    assert_eq!(fs::read(&first.step).unwrap(), fs::read(&second.step).unwrap());
}

#[test]
fn export_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("out").join("parts");
    let files = assembly(Composition::CoLocated).export(&nested, "mount").unwrap();
    assert!(files.stl.starts_with(&nested));
}

#[test]
fn rejects_base_names_with_separators() {
    let dir = tempfile::tempdir().unwrap();
    let assembly = assembly(Composition::Fused);
    for bad in ["", "sub/mount", "sub\\mount"] {
        assert!(matches!(
            assembly.export(dir.path(), bad),
            Err(IoError::MalformedPath(_))
        ));
    }
}
