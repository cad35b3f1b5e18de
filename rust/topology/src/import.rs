// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Import adapter: parsed OBJ geometry into the geometry store.
//!
//! Source geometry is validated completely before any buffer is acquired, so
//! a rejected import never disturbs the mesh. Attributes the source does not
//! supply get a single placeholder element, which keeps every per-corner
//! index in range.

use manifold_lite_core::{parse_obj, ObjCorner, ObjGeometry};
use nalgebra::Vector3;

use crate::alloc::{BufferAllocator, SystemAllocator};
use crate::attributes::{Color, Face, Normal, Position, Uv};
use crate::error::{Error, ImportError, Result};
use crate::keys::Attribute;
use crate::store::{Mesh, MeshBuffers, MeshCounts};

/// Checks source element counts against the 32-bit index range.
///
/// Face counts are limited so that `3 * faces` half-edges stay addressable.
pub(crate) fn check_source_counts(
    vertices: usize,
    faces: usize,
) -> std::result::Result<(), ImportError> {
    let max = u32::MAX as usize;
    let too_many_faces = faces.checked_mul(3).map_or(true, |edges| edges > max);
    if vertices > max || too_many_faces {
        return Err(ImportError::TooLarge { vertices, faces });
    }
    if vertices == 0 || faces == 0 {
        return Err(ImportError::Empty);
    }
    Ok(())
}

fn check_corner_ranges(obj: &ObjGeometry) -> std::result::Result<(), ImportError> {
    let vertices = obj.positions.len();
    let normals = obj.normals.len();
    let texcoords = obj.texcoords.len();

    for (face, triangle) in obj.triangles.iter().enumerate() {
        for corner in triangle {
            let checks = [
                (Attribute::Vertex, Some(corner.vertex), vertices),
                (Attribute::Normal, corner.normal, normals),
                (Attribute::Uv, corner.texcoord, texcoords),
            ];
            for (attribute, index, count) in checks {
                if let Some(index) = index {
                    if index as usize >= count {
                        return Err(ImportError::IndexOutOfRange {
                            face,
                            attribute,
                            index: index as usize,
                            count,
                        });
                    }
                }
            }
        }
    }
    Ok(())
}

/// Fills freshly acquired buffers from the source geometry.
fn fill(buffers: &mut MeshBuffers, obj: &ObjGeometry) {
    for (dst, src) in buffers.positions.iter_mut().zip(&obj.positions) {
        *dst = Position::new(src[0], src[1], src[2]);
    }

    if obj.normals.is_empty() {
        buffers.colors[0] = Color::OPAQUE_BLACK;
    } else {
        // No colour channel in OBJ; colours are derived from the normals.
        for ((normal, color), src) in buffers
            .normals
            .iter_mut()
            .zip(buffers.colors.iter_mut())
            .zip(&obj.normals)
        {
            let n = Vector3::new(src[0], src[1], src[2]);
            *normal = Normal::quantize(&n);
            *color = Color::from_normal(&n);
        }
    }

    for (dst, src) in buffers.uvs.iter_mut().zip(&obj.texcoords) {
        *dst = Uv::new(src[0], src[1]);
    }

    for (face, triangle) in buffers.base_faces_mut().iter_mut().zip(&obj.triangles) {
        *face = face_from_corners(*triangle);
    }
}

fn face_from_corners(corners: [ObjCorner; 3]) -> Face {
    let normals = corners.map(|c| c.normal.unwrap_or(0));
    Face {
        vertices: corners.map(|c| c.vertex),
        normals,
        colors: normals,
        uvs: corners.map(|c| c.texcoord.unwrap_or(0)),
    }
}

impl Mesh {
    /// Replaces the mesh contents with parsed OBJ geometry.
    ///
    /// The previous buffers stay live until the new set is committed; on any
    /// error the mesh is unchanged. A successful import discards the edge
    /// table and classification.
    pub fn import_obj(&mut self, obj: &ObjGeometry) -> Result<()> {
        self.import_obj_with(obj, &SystemAllocator)
    }

    /// [`Mesh::import_obj`] with an explicit buffer allocator.
    pub fn import_obj_with<A: BufferAllocator>(
        &mut self,
        obj: &ObjGeometry,
        allocator: &A,
    ) -> Result<()> {
        check_source_counts(obj.positions.len(), obj.triangles.len())
            .and_then(|()| check_corner_ranges(obj))
            .map_err(|kind| self.import_error(kind))?;

        let counts = MeshCounts {
            vertices: obj.positions.len(),
            normals: obj.normals.len().max(1),
            colors: obj.normals.len().max(1),
            uvs: obj.texcoords.len().max(1),
            faces: obj.triangles.len(),
        };
        let mut buffers = MeshBuffers::acquire(&counts, allocator)
            .map_err(|buffer| self.allocation_failure(buffer))?;
        fill(&mut buffers, obj);
        self.commit(buffers);

        tracing::info!(
            mesh = %self.name,
            vertices = counts.vertices,
            normals = obj.normals.len(),
            uvs = obj.texcoords.len(),
            faces = counts.faces,
            "Imported mesh"
        );
        Ok(())
    }

    /// Parses OBJ text and imports it into a new mesh.
    pub fn from_obj_str(name: impl Into<String>, text: &str) -> Result<Mesh> {
        let mut mesh = Mesh::new(name);
        let obj = parse_obj(text).map_err(|source| Error::Parse {
            mesh: mesh.name.clone(),
            source,
        })?;
        mesh.import_obj(&obj)?;
        Ok(mesh)
    }

    /// Builds a mesh from positions and vertex-index triples; every other
    /// attribute is a single placeholder.
    pub fn from_triangles(
        name: impl Into<String>,
        positions: &[[f32; 3]],
        triangles: &[[u32; 3]],
    ) -> Result<Mesh> {
        let obj = ObjGeometry {
            positions: positions.to_vec(),
            triangles: triangles
                .iter()
                .map(|&tri| tri.map(ObjCorner::new))
                .collect(),
            ..ObjGeometry::new()
        };
        let mut mesh = Mesh::new(name);
        mesh.import_obj(&obj)?;
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::BufferKind;
    use std::cell::Cell;

    const QUAD: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
vn 0.6 -0.8 0
vt 0 0
vt 1 0
vt 1 1
f 1/1/1 2/2/1 3/3/2 4/1/2
";

    #[test]
    fn oversize_counts_are_rejected() {
        let max = u32::MAX as usize;
        assert_eq!(
            check_source_counts(max + 1, 1),
            Err(ImportError::TooLarge {
                vertices: max + 1,
                faces: 1,
            })
        );
        assert!(check_source_counts(max, 1).is_ok());
        assert!(matches!(
            check_source_counts(3, max / 3 + 1),
            Err(ImportError::TooLarge { .. })
        ));
        assert!(check_source_counts(3, max / 3).is_ok());
    }

    #[test]
    fn empty_counts_are_rejected() {
        assert_eq!(check_source_counts(0, 5), Err(ImportError::Empty));
        assert_eq!(check_source_counts(5, 0), Err(ImportError::Empty));
    }

    #[test]
    fn imports_attributes_and_corners() {
        let mesh = Mesh::from_obj_str("quad", QUAD).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.normals().len(), 2);
        assert_eq!(mesh.colors().len(), 2);
        assert_eq!(mesh.uvs().len(), 3);
        assert_eq!(mesh.face_count(), 2);

        assert_eq!(mesh.positions()[2], Position::new(1.0, 1.0, 0.0));
        assert_eq!(
            mesh.normals()[1],
            Normal {
                x: 127,
                y: -128,
                z: 0,
            }
        );
        assert_eq!(
            mesh.colors()[0],
            Color {
                r: 0,
                g: 0,
                b: 255,
                a: 255,
            }
        );
        assert_eq!(mesh.uvs()[2], Uv::new(1.0, 1.0));

        let faces = mesh.base_faces();
        assert_eq!(faces[0].vertices, [0, 1, 2]);
        assert_eq!(faces[1].vertices, [0, 2, 3]);
        assert_eq!(faces[0].normals, [0, 0, 1]);
        assert_eq!(faces[0].colors, faces[0].normals);
        assert_eq!(faces[1].uvs, [0, 2, 0]);
    }

    #[test]
    fn missing_attributes_get_placeholders() {
        let mesh = Mesh::from_triangles(
            "tri",
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            &[[0, 1, 2]],
        )
        .unwrap();

        assert_eq!(mesh.normals(), &[Normal::default()]);
        assert_eq!(mesh.colors(), &[Color::OPAQUE_BLACK]);
        assert_eq!(mesh.uvs(), &[Uv::origin()]);
        assert_eq!(mesh.base_faces()[0], Face::new([0, 1, 2]));
    }

    #[test]
    fn out_of_range_corner_is_rejected() {
        let err = Mesh::from_triangles("bad", &[[0.0; 3], [1.0; 3]], &[[0, 1, 2]]).unwrap_err();
        match err {
            Error::Import {
                mesh,
                kind: ImportError::IndexOutOfRange {
                    face,
                    attribute,
                    index,
                    count,
                },
            } => {
                assert_eq!(mesh, "bad");
                assert_eq!((face, attribute, index, count), (0, Attribute::Vertex, 2, 2));
            }
            other => panic!("unexpected error {other:?}"),
        }

        let err = Mesh::from_obj_str("bad", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1//1 2//1 3//1\n")
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Import {
                kind: ImportError::IndexOutOfRange {
                    attribute: Attribute::Normal,
                    ..
                },
                ..
            }
        ));
    }

    #[test]
    fn empty_source_is_rejected() {
        let err = Mesh::from_obj_str("nothing", "# only a comment\n").unwrap_err();
        assert_eq!(err.to_string(), "Mesh \"nothing\": no vertices/faces");
    }

    #[test]
    fn parse_errors_carry_the_mesh_name() {
        let err = Mesh::from_obj_str("broken", "v 1 2\n").unwrap_err();
        assert!(matches!(err, Error::Parse { ref mesh, .. } if mesh == "broken"));
    }

    struct FailOn(BufferKind, Cell<bool>);

    impl BufferAllocator for FailOn {
        fn acquire<T: Clone>(&self, kind: BufferKind, len: usize, fill: T) -> Option<Vec<T>> {
            if kind == self.0 {
                self.1.set(true);
                return None;
            }
            SystemAllocator.acquire(kind, len, fill)
        }
    }

    #[test]
    fn failed_reimport_keeps_previous_mesh() {
        let mut mesh = Mesh::from_obj_str("quad", QUAD).unwrap();
        let obj = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let allocator = FailOn(BufferKind::Uvs, Cell::new(false));
        let err = mesh.import_obj_with(&obj, &allocator).unwrap_err();
        assert!(allocator.1.get());
        assert!(matches!(
            err,
            Error::AllocationFailure {
                buffer: BufferKind::Uvs,
                ..
            }
        ));
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);

        mesh.import_obj(&obj).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
    }
}
