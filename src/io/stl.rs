use crate::mesh::Mesh;
use std::fmt::{Debug, Write};
use std::io::Cursor;

/// Text STL of `mesh`, one facet per fan triangle, solid called `name`.
///
/// ```rust
/// # use eyepiece_mount::mesh::Mesh;
/// # use eyepiece_mount::io::stl::to_stl_ascii;
/// let mesh = Mesh::<()>::cuboid(1.0, 1.0, 1.0, None);
/// let text = to_stl_ascii(&mesh, "my_solid");
/// assert!(text.starts_with("solid my_solid"));
/// ```
pub fn to_stl_ascii<S: Clone + Debug + Send + Sync>(mesh: &Mesh<S>, name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "solid {name}");

    for poly in &mesh.polygons {
        let n = poly.plane.normal();
        for tri in poly.triangulate() {
            let _ = writeln!(out, "  facet normal {:.6} {:.6} {:.6}", n.x, n.y, n.z);
            out.push_str("    outer loop\n");
            for v in &tri {
                let _ = writeln!(out, "      vertex {:.6} {:.6} {:.6}", v.pos.x, v.pos.y, v.pos.z);
            }
            out.push_str("    endloop\n");
            out.push_str("  endfacet\n");
        }
    }

    let _ = writeln!(out, "endsolid {name}");
    out
}

/// Binary STL of `mesh`.
///
/// Facet normals are the polygon plane normals. Coordinates are narrowed to
/// `f32`, as the format requires.
pub fn to_stl_binary<S: Clone + Debug + Send + Sync>(mesh: &Mesh<S>) -> std::io::Result<Vec<u8>> {
    use stl_io::{Normal, Triangle, Vertex, write_stl};

    let mut triangles = Vec::<Triangle>::with_capacity(mesh.triangle_count());
    for poly in &mesh.polygons {
        let n = poly.plane.normal();
        for tri in poly.triangulate() {
            triangles.push(Triangle {
                normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: tri.map(|v| Vertex::new([v.pos.x as f32, v.pos.y as f32, v.pos.z as f32])),
            });
        }
    }

    let mut cursor = Cursor::new(Vec::new());
    write_stl(&mut cursor, triangles.iter())?;
    Ok(cursor.into_inner())
}

impl<S: Clone + Debug + Send + Sync> Mesh<S> {
    pub fn to_stl_ascii(&self, name: &str) -> String {
        self::to_stl_ascii(self, name)
    }

    pub fn to_stl_binary(&self) -> std::io::Result<Vec<u8>> {
        self::to_stl_binary(self)
    }
}
