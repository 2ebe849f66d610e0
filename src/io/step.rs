//! ISO-10303-21 (STEP AP214) export of meshes as faceted B-reps.
//!
//! Every body becomes a `FACETED_BREP` over a `CLOSED_SHELL` whose faces are
//! the mesh polygons, each bounded by one `POLY_LOOP`. Coincident vertices
//! share a single `CARTESIAN_POINT` across the whole file.

use crate::float_types::Real;
use crate::mesh::Mesh;
use hashbrown::HashMap;
use nalgebra::Point3;
use std::fmt::{Debug, Write};

/// Fixed so that identical geometry always produces identical files.
const TIMESTAMP: &str = "2000-01-01T00:00:00";

/// Grid (mm) points are snapped to before being shared.
const POINT_QUANTUM: Real = 1e-6;

type PointKey = (i64, i64, i64);

fn point_key(p: &Point3<Real>) -> PointKey {
    (
        (p.x / POINT_QUANTUM).round() as i64,
        (p.y / POINT_QUANTUM).round() as i64,
        (p.z / POINT_QUANTUM).round() as i64,
    )
}

/// STEP reals need a decimal point; `{:.6}` always gives one.
fn real(value: Real) -> String {
    let text = format!("{value:.6}");
    if text.trim_start_matches('-').bytes().all(|b| b == b'0' || b == b'.') {
        "0.000000".to_string()
    } else {
        text
    }
}

fn string(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

fn refs(ids: &[usize]) -> String {
    let inner: Vec<String> = ids.iter().map(|id| format!("#{id}")).collect();
    format!("({})", inner.join(","))
}

/// Numbered entity instances of the DATA section.
#[derive(Debug, Default)]
struct EntityWriter {
    data: String,
    next_id: usize,
    points: HashMap<PointKey, usize>,
}

impl EntityWriter {
    fn add(&mut self, entity: &str) -> usize {
        self.next_id += 1;
        let _ = writeln!(self.data, "#{} = {entity};", self.next_id);
        self.next_id
    }

    fn point(&mut self, p: &Point3<Real>) -> usize {
        let key = point_key(p);
        if let Some(&id) = self.points.get(&key) {
            return id;
        }
        let id = self.add(&format!(
            "CARTESIAN_POINT('',({},{},{}))",
            real(p.x),
            real(p.y),
            real(p.z)
        ));
        self.points.insert(key, id);
        id
    }

    /// Returns the `FACETED_BREP` id, or `None` when no face survives.
    fn faceted_brep<S: Clone + Debug + Send + Sync>(
        &mut self,
        name: &str,
        mesh: &Mesh<S>,
    ) -> Option<usize> {
        let mut faces = Vec::with_capacity(mesh.polygons.len());
        for poly in &mesh.polygons {
            let mut loop_ids: Vec<usize> = Vec::with_capacity(poly.vertices.len());
            for v in &poly.vertices {
                let id = self.point(&v.pos);
                if loop_ids.last() != Some(&id) {
                    loop_ids.push(id);
                }
            }
            if loop_ids.len() > 1 && loop_ids.first() == loop_ids.last() {
                loop_ids.pop();
            }
            if loop_ids.len() < 3 {
                continue;
            }
            let poly_loop = self.add(&format!("POLY_LOOP('',{})", refs(&loop_ids)));
            let bound = self.add(&format!("FACE_OUTER_BOUND('',#{poly_loop},.T.)"));
            faces.push(self.add(&format!("FACE('',(#{bound}))")));
        }
        if faces.is_empty() {
            return None;
        }

        let shell = self.add(&format!("CLOSED_SHELL('',{})", refs(&faces)));
        Some(self.add(&format!("FACETED_BREP({},#{shell})", string(name))))
    }
}

/// Write `bodies` as one AP214 part called `name`.
pub fn to_step<S: Clone + Debug + Send + Sync>(bodies: &[(&str, &Mesh<S>)], name: &str) -> String {
    let mut w = EntityWriter::default();

    let app = w.add("APPLICATION_CONTEXT('core data for automotive mechanical design processes')");
    w.add(&format!(
        "APPLICATION_PROTOCOL_DEFINITION('international standard','automotive_design',2000,#{app})"
    ));
    let product_context = w.add(&format!("PRODUCT_CONTEXT('',#{app},'mechanical')"));
    let definition_context = w.add(&format!("PRODUCT_DEFINITION_CONTEXT('part definition',#{app},'design')"));
    let product = w.add(&format!(
        "PRODUCT({0},{0},'',(#{product_context}))",
        string(name)
    ));
    let formation = w.add(&format!("PRODUCT_DEFINITION_FORMATION('','',#{product})"));
    let definition = w.add(&format!("PRODUCT_DEFINITION('design','',#{formation},#{definition_context})"));
    let definition_shape = w.add(&format!("PRODUCT_DEFINITION_SHAPE('','',#{definition})"));

    let length = w.add("(LENGTH_UNIT() NAMED_UNIT(*) SI_UNIT(.MILLI.,.METRE.))");
    let angle = w.add("(NAMED_UNIT(*) PLANE_ANGLE_UNIT() SI_UNIT($,.RADIAN.))");
    let solid_angle = w.add("(NAMED_UNIT(*) SI_UNIT($,.STERADIAN.) SOLID_ANGLE_UNIT())");
    let uncertainty = w.add(&format!(
        "UNCERTAINTY_MEASURE_WITH_UNIT(LENGTH_MEASURE(1.E-06),#{length},'distance_accuracy_value','confusion accuracy')"
    ));
    let context = w.add(&format!(
        "(GEOMETRIC_REPRESENTATION_CONTEXT(3) GLOBAL_UNCERTAINTY_ASSIGNED_CONTEXT((#{uncertainty})) \
         GLOBAL_UNIT_ASSIGNED_CONTEXT((#{length},#{angle},#{solid_angle})) REPRESENTATION_CONTEXT('',''))"
    ));

    let origin = w.add("CARTESIAN_POINT('',(0.000000,0.000000,0.000000))");
    let axis = w.add("DIRECTION('',(0.000000,0.000000,1.000000))");
    let reference = w.add("DIRECTION('',(1.000000,0.000000,0.000000))");
    let placement = w.add(&format!("AXIS2_PLACEMENT_3D('',#{origin},#{axis},#{reference})"));

    let mut items = vec![placement];
    items.extend(
        bodies
            .iter()
            .filter_map(|(body_name, mesh)| w.faceted_brep(body_name, mesh)),
    );

    let representation = w.add(&format!(
        "FACETED_BREP_SHAPE_REPRESENTATION({},{},#{context})",
        string(name),
        refs(&items)
    ));
    w.add(&format!("SHAPE_DEFINITION_REPRESENTATION(#{definition_shape},#{representation})"));

    let mut out = String::new();
    out.push_str("ISO-10303-21;\nHEADER;\n");
    out.push_str("FILE_DESCRIPTION(('faceted B-rep'),'2;1');\n");
    let _ = writeln!(
        out,
        "FILE_NAME({},'{TIMESTAMP}',(''),(''),'eyepiece-mount','eyepiece-mount','');",
        string(&format!("{name}.step"))
    );
    out.push_str("FILE_SCHEMA(('AUTOMOTIVE_DESIGN { 1 0 10303 214 1 1 1 1 }'));\nENDSEC;\nDATA;\n");
    out.push_str(&w.data);
    out.push_str("ENDSEC;\nEND-ISO-10303-21;\n");
    out
}

impl<S: Clone + Debug + Send + Sync> Mesh<S> {
    /// This mesh alone as a STEP part.
    pub fn to_step(&self, name: &str) -> String {
        self::to_step(&[(name, self)], name)
    }
}
