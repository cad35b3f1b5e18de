// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Half-edge construction.
//!
//! Builds the edge table of the base level-of-detail in three passes:
//!
//! 1. **Emit** three half-edges per face, `(p0→p1)`, `(p1→p2)`, `(p2→p0)`,
//!    with `next` closing the face cycle.
//! 2. **Pair** each half-edge with its reverse in the adjacent face. A working
//!    copy of `(lo, hi, index)` keys is sorted so that every half-edge on the
//!    same undirected edge lands in one contiguous run. Within a run, half-edges
//!    are visited in ascending index order and each unpaired one takes the
//!    lowest-indexed unpaired reversed half-edge after it. This reproduces the
//!    quadratic scan exactly, including edges shared by three or more faces.
//! 3. **Seed** every vertex with its lowest-indexed outgoing half-edge and
//!    count its outgoing half-edges.
//!
//! Runs are independent and are paired in parallel.

use rayon::prelude::*;

use crate::alloc::{BufferAllocator, SystemAllocator};
use crate::attributes::Face;
use crate::edges::{EdgeTable, HalfEdge};
use crate::error::{Error, ImportError, Result};
use crate::keys::{Attribute, BufferKind, EdgeIndex, FaceIndex, VertexIndex};
use crate::store::Mesh;

/// Sort key of a half-edge: unordered endpoints, then table index.
type PairKey = (VertexIndex, VertexIndex, EdgeIndex);

impl Mesh {
    /// Builds the half-edge table, seed index and degree index from the
    /// level-0 faces.
    ///
    /// Any previous edge table is released first. Malformed topology is never
    /// an error here; it is classified by [`Mesh::check_manifold`].
    pub fn build_edges(&mut self) -> Result<()> {
        self.build_edges_with(&SystemAllocator)
    }

    /// [`Mesh::build_edges`] with an explicit buffer allocator.
    ///
    /// On [`Error::AllocationFailure`] the mesh has no edge table.
    pub fn build_edges_with<A: BufferAllocator>(&mut self, allocator: &A) -> Result<()> {
        self.invalidate_topology();

        let Some(buffers) = self.buffers.as_ref() else {
            return Err(Error::Unallocated {
                mesh: self.name.clone(),
            });
        };
        let faces = buffers.base_faces();
        let vertex_count = buffers.positions.len();
        check_face_vertices(faces, vertex_count).map_err(|kind| self.import_error(kind))?;

        let mut edges = allocator
            .acquire(BufferKind::Edges, faces.len() * 3, HalfEdge::default())
            .ok_or_else(|| self.allocation_failure(BufferKind::Edges))?;
        let mut seeds = allocator
            .acquire(BufferKind::SeedEdges, vertex_count, None)
            .ok_or_else(|| self.allocation_failure(BufferKind::SeedEdges))?;
        let mut degrees = allocator
            .acquire(BufferKind::VertexDegrees, vertex_count, 0)
            .ok_or_else(|| self.allocation_failure(BufferKind::VertexDegrees))?;

        emit_half_edges(faces, &mut edges);
        pair_reverse_edges(&mut edges);
        assign_seed_edges(&edges, &mut seeds, &mut degrees);

        let table = EdgeTable {
            edges,
            seeds,
            degrees,
        };
        tracing::debug!(
            mesh = %self.name,
            edges = table.len(),
            boundary = table.boundary_edge_count(),
            "Built half-edge table"
        );
        self.topology = Some(table);
        Ok(())
    }
}

fn check_face_vertices(
    faces: &[Face],
    vertex_count: usize,
) -> std::result::Result<(), ImportError> {
    for (face, f) in faces.iter().enumerate() {
        if let Some(&index) = f.vertices.iter().find(|&&v| v as usize >= vertex_count) {
            return Err(ImportError::IndexOutOfRange {
                face,
                attribute: Attribute::Vertex,
                index: index as usize,
                count: vertex_count,
            });
        }
    }
    Ok(())
}

/// Writes the three half-edges of every face into its own slot triple.
pub(crate) fn emit_half_edges(faces: &[Face], edges: &mut [HalfEdge]) {
    edges
        .par_chunks_exact_mut(3)
        .zip(faces.par_iter())
        .enumerate()
        .for_each(|(f, (slots, face))| {
            let base = (f * 3) as EdgeIndex;
            for (k, slot) in slots.iter_mut().enumerate() {
                let k_next = (k + 1) % 3;
                *slot = HalfEdge {
                    v1: face.vertices[k],
                    v2: face.vertices[k_next],
                    next: base + k_next as EdgeIndex,
                    other_half: None,
                    face: f as FaceIndex,
                };
            }
        });
}

/// Links every half-edge to its reverse; unmatched edges stay boundary.
pub(crate) fn pair_reverse_edges(edges: &mut [HalfEdge]) {
    let pairs: Vec<(EdgeIndex, EdgeIndex)> = {
        let table: &[HalfEdge] = edges;
        let mut keys: Vec<PairKey> = table
            .par_iter()
            .enumerate()
            .map(|(i, e)| {
                let (lo, hi) = e.unordered();
                (lo, hi, i as EdgeIndex)
            })
            .collect();
        keys.par_sort_unstable();

        let runs: Vec<&[PairKey]> = keys
            .chunk_by(|a, b| (a.0, a.1) == (b.0, b.1))
            .filter(|run| run.len() > 1)
            .collect();
        runs.par_iter()
            .flat_map_iter(|run| pair_run(table, run))
            .collect()
    };

    for (a, b) in pairs {
        edges[a as usize].other_half = Some(b);
        edges[b as usize].other_half = Some(a);
    }
}

/// Pairs the half-edges of one undirected edge. `run` is in ascending index
/// order.
fn pair_run(edges: &[HalfEdge], run: &[PairKey]) -> Vec<(EdgeIndex, EdgeIndex)> {
    let mut paired = vec![false; run.len()];
    let mut pairs = Vec::with_capacity(run.len() / 2);

    for i in 0..run.len() {
        if paired[i] {
            continue;
        }
        let e = &edges[run[i].2 as usize];
        let candidate =
            (i + 1..run.len()).find(|&j| !paired[j] && e.reverses(&edges[run[j].2 as usize]));
        if let Some(j) = candidate {
            paired[i] = true;
            paired[j] = true;
            pairs.push((run[i].2, run[j].2));
        }
    }
    pairs
}

/// Records the lowest-indexed outgoing half-edge and the outgoing half-edge
/// count of every vertex. `degrees` must start zeroed.
pub(crate) fn assign_seed_edges(
    edges: &[HalfEdge],
    seeds: &mut [Option<EdgeIndex>],
    degrees: &mut [u32],
) {
    // Reverse order so the lowest index is written last.
    for (i, e) in edges.iter().enumerate().rev() {
        seeds[e.v1 as usize] = Some(i as EdgeIndex);
        degrees[e.v1 as usize] += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Quadratic reference pairing.
    fn naive_pairing(edges: &mut [HalfEdge]) {
        for e in 0..edges.len() {
            if edges[e].other_half.is_some() {
                continue;
            }
            for f in e + 1..edges.len() {
                if edges[f].other_half.is_none() && edges[e].reverses(&edges[f]) {
                    edges[e].other_half = Some(f as EdgeIndex);
                    edges[f].other_half = Some(e as EdgeIndex);
                    break;
                }
            }
        }
    }

    fn emitted(triangles: &[[u32; 3]]) -> Vec<HalfEdge> {
        let faces: Vec<Face> = triangles.iter().copied().map(Face::new).collect();
        let mut edges = vec![HalfEdge::default(); faces.len() * 3];
        emit_half_edges(&faces, &mut edges);
        edges
    }

    fn assert_matches_naive(triangles: &[[u32; 3]]) {
        let mut fast = emitted(triangles);
        let mut slow = fast.clone();
        pair_reverse_edges(&mut fast);
        naive_pairing(&mut slow);
        assert_eq!(fast, slow, "pairing differs for {triangles:?}");
    }

    #[test]
    fn emit_builds_face_cycles() {
        let edges = emitted(&[[0, 1, 2], [2, 1, 3]]);
        assert_eq!(edges.len(), 6);
        assert_eq!((edges[3].v1, edges[3].v2), (2, 1));
        assert_eq!((edges[5].v1, edges[5].v2), (3, 2));
        for (i, e) in edges.iter().enumerate() {
            assert_eq!(e.face as usize, i / 3);
            let next = &edges[e.next as usize];
            assert_eq!(next.face, e.face);
            assert_eq!(next.v1, e.v2);
            // three steps close the cycle
            let back = edges[edges[e.next as usize].next as usize].next;
            assert_eq!(back as usize, i);
        }
    }

    #[test]
    fn shared_edge_pairs_reverse() {
        let mut edges = emitted(&[[0, 1, 2], [2, 1, 3]]);
        pair_reverse_edges(&mut edges);
        // (1→2) in face 0 and (2→1) in face 1
        assert_eq!(edges[1].other_half, Some(3));
        assert_eq!(edges[3].other_half, Some(1));
        assert_eq!(edges.iter().filter(|e| e.is_boundary()).count(), 4);
    }

    #[test]
    fn same_direction_edges_stay_unpaired() {
        let mut edges = emitted(&[[0, 1, 2], [0, 1, 3]]);
        pair_reverse_edges(&mut edges);
        assert!(edges.iter().all(HalfEdge::is_boundary));
    }

    #[test]
    fn over_shared_edge_pairs_lowest_candidate() {
        // Three faces on edge {0, 1}: 0→1, 1→0, 1→0
        let mut edges = emitted(&[[0, 1, 2], [1, 0, 3], [1, 0, 4]]);
        pair_reverse_edges(&mut edges);
        assert_eq!(edges[0].other_half, Some(3));
        assert_eq!(edges[3].other_half, Some(0));
        assert_eq!(edges[6].other_half, None);
    }

    #[test]
    fn sorted_pairing_matches_quadratic_scan() {
        assert_matches_naive(&[[0, 1, 2], [0, 2, 3], [0, 3, 1], [1, 3, 2]]);
        assert_matches_naive(&[[0, 1, 2], [1, 0, 3], [1, 0, 4], [0, 1, 5]]);
        assert_matches_naive(&[[0, 1, 2], [0, 1, 3], [1, 0, 4]]);
        assert_matches_naive(&[[0, 0, 1], [1, 0, 0]]);
        assert_matches_naive(&[[0, 1, 2], [0, 3, 4], [2, 1, 5], [4, 3, 6]]);
    }

    #[test]
    fn seeds_take_lowest_outgoing_edge() {
        let edges = emitted(&[[1, 2, 3], [3, 2, 1]]);
        let mut seeds = vec![None; 5];
        let mut degrees = vec![0; 5];
        assign_seed_edges(&edges, &mut seeds, &mut degrees);
        assert_eq!(seeds, vec![None, Some(0), Some(1), Some(2), None]);
        assert_eq!(degrees, vec![0, 2, 2, 2, 0]);
    }

    #[test]
    fn build_edges_requires_buffers() {
        let mut mesh = Mesh::new("none");
        assert!(matches!(mesh.build_edges(), Err(Error::Unallocated { .. })));
    }

    #[test]
    fn build_edges_rejects_out_of_range_vertices() {
        let mut mesh = Mesh::from_triangles("m", &[[0.0; 3]; 3], &[[0, 1, 2]]).unwrap();
        // Bypass set_base_faces validation by shrinking positions instead.
        mesh.buffers.as_mut().unwrap().positions.truncate(2);
        match mesh.build_edges() {
            Err(Error::Import {
                kind: ImportError::IndexOutOfRange {
                    face,
                    index,
                    count,
                    ..
                },
                ..
            }) => assert_eq!((face, index, count), (0, 2, 2)),
            other => panic!("unexpected result {other:?}"),
        }
        assert!(mesh.edge_table().is_none());
    }

    #[test]
    fn rebuild_follows_face_changes() {
        let mut mesh =
            Mesh::from_triangles("m", &[[0.0; 3]; 4], &[[0, 1, 2], [2, 1, 3]]).unwrap();
        mesh.build_edges().unwrap();
        assert_eq!(mesh.edge_table().unwrap().len(), 6);
        assert_eq!(mesh.owned_buffer_count(), 8);

        mesh.set_base_faces(vec![Face::new([0, 1, 2])]).unwrap();
        assert!(mesh.edge_table().is_none());
        mesh.build_edges().unwrap();
        assert_eq!(mesh.edge_table().unwrap().len(), 3);
        assert_eq!(mesh.edge_table().unwrap().seed_edge(3), None);
        assert_eq!(mesh.edge_table().unwrap().vertex_degrees(), &[1, 1, 1, 0]);
    }
}
