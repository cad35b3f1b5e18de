// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2-manifold classification.
//!
//! A mesh is manifold when all three tests pass:
//!
//! - **Edge sharing**: no undirected edge is used by more than two half-edges,
//!   and no two half-edges traverse the same edge in the same direction.
//! - **Pairing symmetry**: every paired half-edge is paired back and runs the
//!   opposite way. A failure is a construction defect and is reported as
//!   [`Error::PairingInvariant`] rather than as a classification.
//! - **Vertex fans**: the outgoing half-edges of every referenced vertex form a
//!   single fan, closed or open, with each fan face entered once.
//!
//! The sharing and fan tests run in parallel and share one [`ManifoldFlag`].

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::edges::{EdgeTable, HalfEdge};
use crate::error::{Error, Result};
use crate::keys::{EdgeIndex, VertexIndex};
use crate::store::Mesh;

/// Mesh-wide result shared by parallel workers.
///
/// Starts set and can only be cleared, so concurrent writes commute and
/// relaxed ordering suffices.
#[derive(Debug)]
pub struct ManifoldFlag(AtomicBool);

impl ManifoldFlag {
    pub fn new() -> Self {
        Self(AtomicBool::new(true))
    }

    #[inline]
    pub fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    #[inline]
    pub fn get(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for ManifoldFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl Mesh {
    /// Classifies the mesh as 2-manifold and caches the result.
    ///
    /// Requires [`Mesh::build_edges`]. A `false` result is a classification,
    /// not an error.
    ///
    /// # Post-condition
    ///
    /// For every vertex whose fan is open, the seed index is rewritten to the
    /// fan's boundary origin (see [`EdgeTable::fan_origin`]), so later walks
    /// from the seed cover the whole fan in forward order.
    pub fn check_manifold(&mut self) -> Result<bool> {
        let Mesh {
            name,
            topology,
            manifold,
            ..
        } = self;
        let Some(table) = topology.as_mut() else {
            return Err(Error::EdgesNotBuilt { mesh: name.clone() });
        };

        let flag = ManifoldFlag::new();
        let shared_ok = check_edge_sharing(&table.edges, &flag);
        verify_pairing(&table.edges).map_err(|(edge, other)| Error::PairingInvariant {
            mesh: name.clone(),
            edge,
            other,
        })?;
        let corrections = check_vertex_fans(table, &flag);
        let corrected = corrections.len();
        for (v, origin) in corrections {
            table.seeds[v as usize] = Some(origin);
        }

        let result = flag.get();
        *manifold = Some(result);
        tracing::debug!(
            mesh = %name,
            manifold = result,
            edge_sharing = shared_ok,
            corrected_seeds = corrected,
            "Classified mesh"
        );
        Ok(result)
    }
}

/// Sharing test. Clears `flag` and returns `false` if an undirected edge is
/// over-shared or traversed twice in one direction.
pub(crate) fn check_edge_sharing(edges: &[HalfEdge], flag: &ManifoldFlag) -> bool {
    let mut keys: Vec<(VertexIndex, VertexIndex, VertexIndex)> = edges
        .par_iter()
        .map(|e| {
            let (lo, hi) = e.unordered();
            (lo, hi, e.v1)
        })
        .collect();
    keys.par_sort_unstable();

    let same_direction = keys.par_windows(2).any(|w| w[0] == w[1]);
    let over_shared = keys
        .par_windows(3)
        .any(|w| (w[0].0, w[0].1) == (w[2].0, w[2].1));

    let ok = !(same_direction || over_shared);
    if !ok {
        flag.clear();
    }
    ok
}

/// Symmetry test. Returns the first offending `(edge, other_half)` pair.
pub(crate) fn verify_pairing(
    edges: &[HalfEdge],
) -> std::result::Result<(), (EdgeIndex, EdgeIndex)> {
    let broken = edges.par_iter().enumerate().find_first(|(i, e)| {
        let Some(o) = e.other_half else {
            return false;
        };
        match edges.get(o as usize) {
            Some(other) => other.other_half != Some(*i as EdgeIndex) || !e.reverses(other),
            None => true,
        }
    });
    match broken {
        Some((i, e)) => Err((i as EdgeIndex, e.other_half.unwrap_or_default())),
        None => Ok(()),
    }
}

/// Fan test over every referenced vertex. Clears `flag` for any vertex
/// whose edges do not form one fan and returns the seed corrections for open
/// fans.
pub(crate) fn check_vertex_fans(
    table: &EdgeTable,
    flag: &ManifoldFlag,
) -> Vec<(VertexIndex, EdgeIndex)> {
    table
        .seeds
        .par_iter()
        .zip(table.degrees.par_iter())
        .enumerate()
        .filter_map(|(v, (seed, &degree))| {
            let seed = (*seed)?;
            let walk = table.walk_from(seed, degree as usize);
            if !walk.is_single_fan() {
                flag.clear();
            }
            walk.boundary_origin()
                .filter(|&origin| origin != seed)
                .map(|origin| (v as VertexIndex, origin))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSITIONS: [[f32; 3]; 6] = [[0.0; 3]; 6];

    fn built(triangles: &[[u32; 3]]) -> Mesh {
        let mut mesh = Mesh::from_triangles("m", &POSITIONS, triangles).unwrap();
        mesh.build_edges().unwrap();
        mesh
    }

    #[test]
    fn flag_only_clears() {
        let flag = ManifoldFlag::new();
        assert!(flag.get());
        (0..64).into_par_iter().for_each(|i| {
            if i % 7 == 0 {
                flag.clear();
            }
        });
        assert!(!flag.get());
    }

    #[test]
    fn requires_edge_table() {
        let mut mesh = Mesh::from_triangles("m", &POSITIONS, &[[0, 1, 2]]).unwrap();
        assert!(matches!(
            mesh.check_manifold(),
            Err(Error::EdgesNotBuilt { .. })
        ));
        assert_eq!(mesh.is_manifold(), None);
    }

    #[test]
    fn sharing_detects_same_direction() {
        let mesh = built(&[[0, 1, 2], [0, 1, 3]]);
        let flag = ManifoldFlag::new();
        assert!(!check_edge_sharing(mesh.edge_table().unwrap().edges(), &flag));
        assert!(!flag.get());
    }

    #[test]
    fn sharing_detects_three_faces() {
        let mesh = built(&[[0, 1, 2], [1, 0, 3], [0, 4, 1]]);
        let flag = ManifoldFlag::new();
        assert!(!check_edge_sharing(mesh.edge_table().unwrap().edges(), &flag));
    }

    #[test]
    fn sharing_accepts_paired_edges() {
        let mesh = built(&[[0, 1, 2], [2, 1, 3]]);
        let flag = ManifoldFlag::new();
        assert!(check_edge_sharing(mesh.edge_table().unwrap().edges(), &flag));
        assert!(flag.get());
    }

    #[test]
    fn broken_pairing_is_an_error() {
        let mut mesh = built(&[[0, 1, 2], [2, 1, 3]]);
        let table = mesh.topology.as_mut().unwrap();
        table.edges[0].other_half = Some(3);

        match mesh.check_manifold() {
            Err(Error::PairingInvariant { edge, other, .. }) => assert_eq!((edge, other), (0, 3)),
            other => panic!("unexpected result {other:?}"),
        }
        assert_eq!(mesh.is_manifold(), None);
    }

    #[test]
    fn repeated_corner_is_not_manifold() {
        // 0→1 and 1→0 pair with each other inside the one face
        let mut mesh = built(&[[0, 0, 1]]);
        let table = mesh.edge_table().unwrap();
        assert_eq!(table.edge(1).unwrap().other_half, Some(2));
        assert_eq!(table.vertex_degree(0), 2);

        let flag = ManifoldFlag::new();
        assert!(check_edge_sharing(table.edges(), &flag));
        assert!(check_vertex_fans(table, &flag).is_empty());
        assert!(!flag.get());

        assert!(!mesh.check_manifold().unwrap());
        assert_eq!(mesh.is_manifold(), Some(false));
    }

    #[test]
    fn open_fan_seed_is_corrected() {
        // Fan around vertex 0 entered mid-way by its seed
        let mut mesh = built(&[[0, 2, 3], [0, 3, 4], [0, 1, 2]]);
        assert_eq!(mesh.edge_table().unwrap().seed_edge(0), Some(0));

        assert!(mesh.check_manifold().unwrap());
        let table = mesh.edge_table().unwrap();
        assert_eq!(table.seed_edge(0), Some(6));
        assert!(table.is_boundary(6));
        // Seeds already at their origin are untouched
        assert_eq!(table.fan_origin(0), table.seed_edge(0));
        assert_eq!(mesh.is_manifold(), Some(true));
    }
}
