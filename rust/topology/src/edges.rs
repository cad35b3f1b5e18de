// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Half-edge records and the per-mesh edge table.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::keys::{EdgeIndex, FaceIndex, VertexIndex};

/// A directed edge bound to one face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HalfEdge {
    /// Originating vertex
    pub v1: VertexIndex,
    /// Destination vertex
    pub v2: VertexIndex,
    /// Following half-edge in the same face's 3-cycle
    pub next: EdgeIndex,
    /// Reverse-direction half-edge in the adjacent face; `None` on a boundary
    pub other_half: Option<EdgeIndex>,
    /// Owning face
    pub face: FaceIndex,
}

impl HalfEdge {
    /// Endpoints as (lower index, higher index)
    #[inline]
    pub fn unordered(&self) -> (VertexIndex, VertexIndex) {
        if self.v1 > self.v2 {
            (self.v2, self.v1)
        } else {
            (self.v1, self.v2)
        }
    }

    /// True if `other` runs between the same vertices in the opposite direction
    #[inline]
    pub fn reverses(&self, other: &HalfEdge) -> bool {
        self.v1 == other.v2 && self.v2 == other.v1
    }

    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.other_half.is_none()
    }
}

/// Half-edges of the base level-of-detail plus the per-vertex seed and
/// degree indices.
///
/// Derived from the base face list by [`Mesh::build_edges`](crate::Mesh::build_edges)
/// and owned by the mesh. `edges.len()` is always three times the face count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EdgeTable {
    pub(crate) edges: Vec<HalfEdge>,
    /// One outgoing half-edge per vertex, `None` for unreferenced vertices
    pub(crate) seeds: Vec<Option<EdgeIndex>>,
    /// Outgoing half-edge count per vertex
    pub(crate) degrees: Vec<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unordered_sorts_endpoints() {
        let e = HalfEdge {
            v1: 7,
            v2: 2,
            ..Default::default()
        };
        assert_eq!(e.unordered(), (2, 7));
        let e = HalfEdge {
            v1: 2,
            v2: 7,
            ..Default::default()
        };
        assert_eq!(e.unordered(), (2, 7));
    }

    #[test]
    fn reverses_requires_opposite_direction() {
        let a = HalfEdge {
            v1: 1,
            v2: 2,
            ..Default::default()
        };
        let b = HalfEdge {
            v1: 2,
            v2: 1,
            ..Default::default()
        };
        assert!(a.reverses(&b));
        assert!(!a.reverses(&a));
        assert!(a.is_boundary());
    }
}
