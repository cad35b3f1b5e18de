// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read-only adjacency queries over an [`EdgeTable`].
//!
//! ## Rotating around a vertex
//!
//! For an outgoing half-edge `e` of vertex `v`:
//!
//! - [`EdgeTable::rotate_forward`] crosses the face's incoming edge
//!   (`next(next(e))`) to the adjacent face and returns that face's outgoing
//!   edge of `v`.
//! - [`EdgeTable::rotate_backward`] crosses `e` itself and steps along `next`.
//!
//! Both return `None` at a boundary. Every walk is bounded by the vertex
//! degree, so an inconsistent table can never loop.

use crate::edges::{EdgeTable, HalfEdge};
use crate::keys::{EdgeIndex, FaceIndex, VertexIndex};

/// How a walk around a vertex ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanShape {
    /// Rotation returned to the seed edge (interior vertex).
    Closed,
    /// Rotation hit a boundary in both directions. `origin` is the outgoing
    /// edge with no other half, where a forward walk must start.
    Open { origin: EdgeIndex },
    /// Rotation stepped back into a face already on the walk, as happens
    /// around a vertex that a face references twice.
    Revisit { face: FaceIndex },
    /// Rotation took more steps than the vertex has outgoing edges. Only a
    /// table whose pairing or degrees are inconsistent can produce this.
    Overrun,
}

/// Result of walking the fan of one vertex from its seed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanWalk {
    /// Outgoing half-edges of the vertex
    pub degree: usize,
    /// Distinct fan faces reached
    pub faces: usize,
    pub shape: FanShape,
}

impl FanWalk {
    /// True if every outgoing edge lies on one connected fan.
    #[inline]
    pub fn is_single_fan(&self) -> bool {
        matches!(self.shape, FanShape::Closed | FanShape::Open { .. }) && self.faces == self.degree
    }

    #[inline]
    pub fn boundary_origin(&self) -> Option<EdgeIndex> {
        match self.shape {
            FanShape::Open { origin } => Some(origin),
            _ => None,
        }
    }
}

impl EdgeTable {
    /// Number of half-edges (three per face).
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Number of vertices covered by the seed index.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.seeds.len()
    }

    #[inline]
    pub fn edges(&self) -> &[HalfEdge] {
        &self.edges
    }

    #[inline]
    pub fn edge(&self, e: EdgeIndex) -> Option<&HalfEdge> {
        self.edges.get(e as usize)
    }

    /// An outgoing half-edge of `v`, or `None` for unreferenced vertices.
    ///
    /// After [`Mesh::check_manifold`](crate::Mesh::check_manifold) the seed of
    /// an open-fan vertex is its boundary origin.
    #[inline]
    pub fn seed_edge(&self, v: VertexIndex) -> Option<EdgeIndex> {
        self.seeds.get(v as usize).copied().flatten()
    }

    #[inline]
    pub fn seed_edges(&self) -> &[Option<EdgeIndex>] {
        &self.seeds
    }

    /// The three half-edges of face `f`, in cycle order.
    #[inline]
    pub fn face_edges(&self, f: FaceIndex) -> [EdgeIndex; 3] {
        let base = f * 3;
        [base, base + 1, base + 2]
    }

    /// The face owning `e` and the face across it, if any.
    pub fn faces_sharing(&self, e: EdgeIndex) -> Option<(FaceIndex, Option<FaceIndex>)> {
        let edge = self.edge(e)?;
        let across = edge
            .other_half
            .and_then(|o| self.edge(o))
            .map(|other| other.face);
        Some((edge.face, across))
    }

    #[inline]
    pub fn is_boundary(&self, e: EdgeIndex) -> bool {
        self.edge(e).is_some_and(HalfEdge::is_boundary)
    }

    pub fn boundary_edges(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_boundary())
            .map(|(i, _)| i as EdgeIndex)
    }

    pub fn boundary_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_boundary()).count()
    }

    /// Outgoing half-edge count of every vertex.
    #[inline]
    pub fn vertex_degrees(&self) -> &[u32] {
        &self.degrees
    }

    #[inline]
    pub fn vertex_degree(&self, v: VertexIndex) -> usize {
        self.degrees.get(v as usize).map_or(0, |&d| d as usize)
    }

    /// Next outgoing edge of `e.v1` across the face's incoming edge.
    #[inline]
    pub fn rotate_forward(&self, e: EdgeIndex) -> Option<EdgeIndex> {
        let next = self.edge(e)?.next;
        let prev = self.edge(next)?.next;
        self.edge(prev)?.other_half
    }

    /// Previous outgoing edge of `e.v1` across `e` itself.
    #[inline]
    pub fn rotate_backward(&self, e: EdgeIndex) -> Option<EdgeIndex> {
        let other = self.edge(e)?.other_half?;
        Some(self.edge(other)?.next)
    }

    /// Walks the fan of `v` starting at its current seed edge.
    ///
    /// Returns `None` for unreferenced vertices.
    pub fn walk_fan(&self, v: VertexIndex) -> Option<FanWalk> {
        let seed = self.seed_edge(v)?;
        Some(self.walk_from(seed, self.vertex_degree(v)))
    }

    /// Walks forward from `seed`; on reaching a boundary, walks backward from
    /// `seed` to the fan origin. Stepping into a face already on the walk
    /// ends it with [`FanShape::Revisit`].
    pub(crate) fn walk_from(&self, seed: EdgeIndex, degree: usize) -> FanWalk {
        let walk = |faces, shape| FanWalk {
            degree,
            faces,
            shape,
        };

        let mut visited: Vec<FaceIndex> = Vec::with_capacity(degree);
        visited.extend(self.edge(seed).map(|e| e.face));

        let mut current = seed;
        while let Some(next) = self.rotate_forward(current) {
            if next == seed {
                return walk(visited.len(), FanShape::Closed);
            }
            if let Some(shape) = self.enter(next, &mut visited, degree) {
                return walk(visited.len(), shape);
            }
            current = next;
        }

        let mut origin = seed;
        while let Some(prev) = self.rotate_backward(origin) {
            if let Some(shape) = self.enter(prev, &mut visited, degree) {
                return walk(visited.len(), shape);
            }
            origin = prev;
        }
        walk(visited.len(), FanShape::Open { origin })
    }

    /// Records the face of `e` on the walk, or returns the shape that ends it.
    fn enter(
        &self,
        e: EdgeIndex,
        visited: &mut Vec<FaceIndex>,
        degree: usize,
    ) -> Option<FanShape> {
        let face = self.edge(e)?.face;
        if visited.contains(&face) {
            return Some(FanShape::Revisit { face });
        }
        if visited.len() >= degree {
            return Some(FanShape::Overrun);
        }
        visited.push(face);
        None
    }

    /// The edge a fan walk around `v` should start from: the boundary origin
    /// for an open fan, otherwise the seed edge. Never mutates the table.
    pub fn fan_origin(&self, v: VertexIndex) -> Option<EdgeIndex> {
        let seed = self.seed_edge(v)?;
        let walk = self.walk_from(seed, self.vertex_degree(v));
        Some(walk.boundary_origin().unwrap_or(seed))
    }

    /// Outgoing half-edges around `v` in forward rotation order, starting at
    /// [`EdgeTable::fan_origin`]. Yields at most the vertex degree.
    pub fn vertex_fan(&self, v: VertexIndex) -> VertexFan<'_> {
        let start = self.fan_origin(v);
        VertexFan {
            table: self,
            start,
            current: start,
            remaining: if start.is_some() {
                self.vertex_degree(v)
            } else {
                0
            },
        }
    }
}

/// Iterator returned by [`EdgeTable::vertex_fan`].
#[derive(Debug, Clone)]
pub struct VertexFan<'a> {
    table: &'a EdgeTable,
    start: Option<EdgeIndex>,
    current: Option<EdgeIndex>,
    remaining: usize,
}

impl Iterator for VertexFan<'_> {
    type Item = EdgeIndex;

    fn next(&mut self) -> Option<EdgeIndex> {
        if self.remaining == 0 {
            return None;
        }
        let e = self.current?;
        let start = self.start;
        self.remaining -= 1;
        self.current = self
            .table
            .rotate_forward(e)
            .filter(|&n| Some(n) != start);
        Some(e)
    }
}
