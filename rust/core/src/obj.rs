// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parsed OBJ attribute arrays.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One triangle corner with 0-based indices into the attribute arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjCorner {
    pub vertex: u32,
    pub texcoord: Option<u32>,
    pub normal: Option<u32>,
}

impl ObjCorner {
    #[inline]
    pub fn new(vertex: u32) -> Self {
        Self {
            vertex,
            texcoord: None,
            normal: None,
        }
    }
}

/// Attribute arrays and triangles of one OBJ document.
///
/// Polygons are already fan-triangulated. Indices are resolved but not
/// range-checked against the attribute arrays.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjGeometry {
    /// Vertex positions (x, y, z)
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals (nx, ny, nz)
    pub normals: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub texcoords: Vec<[f32; 2]>,
    /// Triangles as corner triples
    pub triangles: Vec<[ObjCorner; 3]>,
}

impl ObjGeometry {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of positions
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get number of triangles
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Check if the document contains no triangles
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}
