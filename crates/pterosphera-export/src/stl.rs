//! Binary STL encoding.

use std::fs;
use std::path::Path;

use pterosphera_kernel::TriangleMesh;

use crate::{ExportError, Result};

const HEADER: &[u8] = b"pterosphera binary STL";

/// Unit normal of a triangle by the right-hand rule, `+Z` when degenerate.
fn triangle_normal(tri: &[[f32; 3]; 3]) -> [f32; 3] {
    let [a, b, c] = tri;
    let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        e1[1] * e2[2] - e1[2] * e2[1],
        e1[2] * e2[0] - e1[0] * e2[2],
        e1[0] * e2[1] - e1[1] * e2[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len > 1e-10 {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        [0.0, 0.0, 1.0]
    }
}

/// Encode a mesh as binary STL.
///
/// Layout: 80-byte header, `u32` triangle count, then per triangle a
/// normal, three vertices (all `f32` little-endian) and a zero `u16`
/// attribute.
pub fn to_stl_bytes(mesh: &TriangleMesh) -> Result<Vec<u8>> {
    if mesh.is_empty() {
        return Err(ExportError::EmptyMesh);
    }
    let num_triangles = mesh.num_triangles();
    let mut data = Vec::with_capacity(84 + num_triangles * 50);

    let mut header = [0u8; 80];
    header[..HEADER.len()].copy_from_slice(HEADER);
    data.extend_from_slice(&header);
    data.extend_from_slice(&(num_triangles as u32).to_le_bytes());

    for tri in mesh.triangles() {
        for c in triangle_normal(&tri) {
            data.extend_from_slice(&c.to_le_bytes());
        }
        for v in tri {
            for c in v {
                data.extend_from_slice(&c.to_le_bytes());
            }
        }
        data.extend_from_slice(&0u16.to_le_bytes());
    }

    Ok(data)
}

/// Write a mesh as binary STL, creating parent directories.
pub fn write_stl(mesh: &TriangleMesh, path: &Path) -> Result<()> {
    let bytes = to_stl_bytes(mesh)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles() -> TriangleMesh {
        TriangleMesh {
            vertices: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            indices: vec![0, 1, 2, 0, 3, 1],
        }
    }

    #[test]
    fn test_stl_layout() {
        let bytes = to_stl_bytes(&two_triangles()).unwrap();
        assert_eq!(bytes.len(), 84 + 2 * 50);
        assert!(bytes.starts_with(HEADER));
        let count = u32::from_le_bytes(bytes[80..84].try_into().unwrap());
        assert_eq!(count, 2);
        // First normal is +Z.
        let nz = f32::from_le_bytes(bytes[92..96].try_into().unwrap());
        assert!((nz - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normal_right_hand_rule() {
        let n = triangle_normal(&[[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]]);
        assert!((n[2] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_mesh_rejected() {
        assert!(matches!(
            to_stl_bytes(&TriangleMesh::new()),
            Err(ExportError::EmptyMesh)
        ));
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/part.stl");
        write_stl(&two_triangles(), &path).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 184);
    }
}
