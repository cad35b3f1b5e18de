// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for mesh storage, import and topology operations.
//!
//! A non-manifold classification is not an error; it is the `false` result of
//! [`Mesh::check_manifold`](crate::Mesh::check_manifold).

use crate::keys::{Attribute, BufferKind, EdgeIndex};

/// Result type alias for topology operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during mesh operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A buffer could not be obtained at the requested size.
    #[error("Could not allocate {buffer} buffer for mesh \"{mesh}\"")]
    AllocationFailure { mesh: String, buffer: BufferKind },

    /// Source geometry is malformed or too large.
    #[error("Mesh \"{mesh}\": {kind}")]
    Import { mesh: String, kind: ImportError },

    /// Source text could not be parsed.
    #[error("Could not parse mesh \"{mesh}\": {source}")]
    Parse {
        mesh: String,
        #[source]
        source: manifold_lite_core::Error,
    },

    /// The operation needs attribute buffers but the store is empty.
    #[error("Mesh \"{mesh}\" has no allocated buffers")]
    Unallocated { mesh: String },

    /// Manifold validation was requested before the edge table exists.
    #[error("Mesh \"{mesh}\" has no edge table (build edges first)")]
    EdgesNotBuilt { mesh: String },

    /// The edge table violates the symmetric pairing invariant. This is a
    /// defect in edge construction, not a property of the input mesh.
    #[error("Asymmetric half-edge pairing in mesh \"{mesh}\": edge {edge} -> {other}")]
    PairingInvariant {
        mesh: String,
        edge: EdgeIndex,
        other: EdgeIndex,
    },
}

/// Reasons source geometry is rejected before any buffer is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("mesh too large ({vertices} vertices, {faces} faces)")]
    TooLarge { vertices: usize, faces: usize },

    #[error("no vertices/faces")]
    Empty,

    #[error("face {face} references {attribute} {index} but only {count} exist")]
    IndexOutOfRange {
        face: usize,
        attribute: Attribute,
        index: usize,
        count: usize,
    },
}
