// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Index types and buffer/attribute discriminants.
//!
//! Every buffer in a mesh is addressed with 32-bit indices. Half-edges of
//! face `f` live at `3f`, `3f + 1` and `3f + 2`.

/// Index into the vertex (position) buffer.
pub type VertexIndex = u32;

/// Index into the half-edge table.
pub type EdgeIndex = u32;

/// Index into a face buffer.
pub type FaceIndex = u32;

/// Number of level-of-detail face slots a mesh carries.
pub const MAX_LOD_LEVELS: usize = 4;

/// Discriminant for the buffers a mesh owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BufferKind {
    Positions = 0,
    Normals = 1,
    Colors = 2,
    Uvs = 3,
    Faces = 4,
    Edges = 5,
    SeedEdges = 6,
    VertexDegrees = 7,
}

impl BufferKind {
    /// Buffers acquired by a store allocation, in acquisition order.
    pub const ATTRIBUTES: [BufferKind; 5] = [
        BufferKind::Positions,
        BufferKind::Normals,
        BufferKind::Colors,
        BufferKind::Uvs,
        BufferKind::Faces,
    ];

    /// Buffers acquired by edge construction, in acquisition order.
    pub const TOPOLOGY: [BufferKind; 3] = [
        BufferKind::Edges,
        BufferKind::SeedEdges,
        BufferKind::VertexDegrees,
    ];

    /// Returns the buffer name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            BufferKind::Positions => "position",
            BufferKind::Normals => "normal",
            BufferKind::Colors => "colour",
            BufferKind::Uvs => "UV",
            BufferKind::Faces => "face",
            BufferKind::Edges => "edge",
            BufferKind::SeedEdges => "seed-edge",
            BufferKind::VertexDegrees => "vertex-degree",
        }
    }
}

impl std::fmt::Display for BufferKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-corner attribute a face index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Vertex,
    Normal,
    Color,
    Uv,
}

impl Attribute {
    /// Returns the attribute name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Vertex => "vertex",
            Attribute::Normal => "normal",
            Attribute::Color => "colour",
            Attribute::Uv => "UV coordinate",
        }
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
