// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Manifold-Lite Topology
//!
//! Half-edge adjacency and 2-manifold classification for triangle meshes.
//!
//! A [`Mesh`] owns its attribute buffers and per-level-of-detail face lists.
//! [`Mesh::build_edges`] derives an [`EdgeTable`] from the base faces, pairing
//! every half-edge with its reverse in the adjacent face, and
//! [`Mesh::check_manifold`] classifies the surface:
//!
//! ```
//! use manifold_lite_topology::Mesh;
//!
//! let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
//! let tetrahedron = [[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]];
//!
//! let mut mesh = Mesh::from_triangles("tetrahedron", &positions, &tetrahedron)?;
//! mesh.build_edges()?;
//! assert!(mesh.check_manifold()?);
//!
//! let edges = mesh.edge_table().unwrap();
//! assert_eq!(edges.len(), 12);
//! assert_eq!(edges.boundary_edge_count(), 0);
//! # Ok::<(), manifold_lite_topology::Error>(())
//! ```
//!
//! All buffers are obtained through a [`BufferAllocator`]; allocation failure
//! is an [`Error`], and a failed allocation never leaves partial buffers live.

pub mod alloc;
pub mod attributes;
pub mod construction;
pub mod edges;
pub mod error;
pub mod import;
pub mod keys;
pub mod manifold;
pub mod store;
pub mod traversal;

pub use alloc::{BufferAllocator, SystemAllocator};
pub use attributes::{Color, Face, Normal, Position, Uv};
pub use edges::{EdgeTable, HalfEdge};
pub use error::{Error, ImportError, Result};
pub use keys::{Attribute, BufferKind, EdgeIndex, FaceIndex, VertexIndex, MAX_LOD_LEVELS};
pub use manifold::ManifoldFlag;
pub use store::{LodSlot, Mesh, MeshCounts};
pub use traversal::{FanShape, FanWalk, VertexFan};
