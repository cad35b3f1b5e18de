// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-vertex attribute and face records.

use nalgebra::{Point2, Point3, Vector3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::keys::VertexIndex;

/// Vertex position (x, y, z)
pub type Position = Point3<f32>;

/// Texture coordinate (u, v)
pub type Uv = Point2<f32>;

/// Scale applied to unit-vector components before narrowing to 8 bits
const QUANTIZATION_SCALE: f32 = 255.0;

#[inline]
fn quantize(component: f32) -> f32 {
    (component * QUANTIZATION_SCALE).round()
}

/// Quantized vertex normal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Normal {
    pub x: i8,
    pub y: i8,
    pub z: i8,
}

impl Normal {
    /// Quantize a unit vector as `round(n * 255)`.
    ///
    /// Float-to-int casts saturate, so components beyond ±127/255 clamp to
    /// the `i8` range.
    #[inline]
    pub fn quantize(n: &Vector3<f32>) -> Self {
        Self {
            x: quantize(n.x) as i8,
            y: quantize(n.y) as i8,
            z: quantize(n.z) as i8,
        }
    }
}

/// RGBA vertex colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Placeholder colour used when a source has no colour data
    pub const OPAQUE_BLACK: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };

    /// Derive a colour from normal data (sources without a colour channel).
    /// Negative components saturate to 0; alpha is always 255.
    #[inline]
    pub fn from_normal(n: &Vector3<f32>) -> Self {
        Self {
            r: quantize(n.x) as u8,
            g: quantize(n.y) as u8,
            b: quantize(n.z) as u8,
            a: 255,
        }
    }
}

/// Triangle with per-corner attribute indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Face {
    /// Position index of each corner
    pub vertices: [VertexIndex; 3],
    /// Normal index of each corner
    pub normals: [u32; 3],
    /// Colour index of each corner
    pub colors: [u32; 3],
    /// UV index of each corner
    pub uvs: [u32; 3],
}

impl Face {
    /// Create a face whose per-corner attributes all use element 0
    #[inline]
    pub fn new(vertices: [VertexIndex; 3]) -> Self {
        Self {
            vertices,
            ..Self::default()
        }
    }
}
