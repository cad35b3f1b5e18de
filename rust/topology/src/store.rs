// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry store: the buffers owned by one mesh.
//!
//! A [`Mesh`] owns its attribute buffers (positions, normals, colours, UVs),
//! one face list per level-of-detail slot, and the derived [`EdgeTable`].
//! Attribute buffers are replaced as a unit: a new set is fully acquired
//! before it is committed, so a failed allocation leaves the previous state
//! untouched and never leaves a partial set live.
//!
//! ## Level-of-detail slots
//!
//! Only level 0 carries its own face list. Slots `1..MAX_LOD_LEVELS` are
//! [`LodSlot::SharedPlaceholder`] until lower-resolution lists exist, and
//! resolve to level 0 when read. Placeholders own nothing, so releasing the
//! store can never free the level-0 list twice.

use crate::alloc::{BufferAllocator, SystemAllocator};
use crate::attributes::{Color, Face, Normal, Position, Uv};
use crate::edges::EdgeTable;
use crate::error::{Error, ImportError, Result};
use crate::keys::{Attribute, BufferKind, MAX_LOD_LEVELS};

/// Element counts requested from [`Mesh::allocate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshCounts {
    pub vertices: usize,
    pub normals: usize,
    pub colors: usize,
    pub uvs: usize,
    pub faces: usize,
}

/// Ownership of one level-of-detail face list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LodSlot {
    /// No face list.
    #[default]
    Empty,
    /// This slot owns its faces.
    Owned(Vec<Face>),
    /// Reads resolve to the level-0 list; nothing is owned.
    SharedPlaceholder,
}

impl LodSlot {
    #[inline]
    pub fn is_owned(&self) -> bool {
        matches!(self, LodSlot::Owned(_))
    }
}

/// Attribute and face buffers, acquired and committed together.
#[derive(Debug, Clone)]
pub(crate) struct MeshBuffers {
    pub(crate) positions: Vec<Position>,
    pub(crate) normals: Vec<Normal>,
    pub(crate) colors: Vec<Color>,
    pub(crate) uvs: Vec<Uv>,
    pub(crate) lods: [LodSlot; MAX_LOD_LEVELS],
    pub(crate) lod_count: usize,
}

impl MeshBuffers {
    /// Acquire zero-initialized buffers for `counts`.
    ///
    /// On failure returns the buffer that could not be obtained; everything
    /// acquired before it is dropped on return.
    pub(crate) fn acquire<A: BufferAllocator>(
        counts: &MeshCounts,
        allocator: &A,
    ) -> std::result::Result<Self, BufferKind> {
        let positions = allocator
            .acquire(BufferKind::Positions, counts.vertices, Position::origin())
            .ok_or(BufferKind::Positions)?;
        let normals = allocator
            .acquire(BufferKind::Normals, counts.normals, Normal::default())
            .ok_or(BufferKind::Normals)?;
        let colors = allocator
            .acquire(BufferKind::Colors, counts.colors, Color::default())
            .ok_or(BufferKind::Colors)?;
        let uvs = allocator
            .acquire(BufferKind::Uvs, counts.uvs, Uv::origin())
            .ok_or(BufferKind::Uvs)?;
        let faces = allocator
            .acquire(BufferKind::Faces, counts.faces, Face::default())
            .ok_or(BufferKind::Faces)?;

        let mut lods: [LodSlot; MAX_LOD_LEVELS] =
            std::array::from_fn(|_| LodSlot::SharedPlaceholder);
        lods[0] = LodSlot::Owned(faces);

        Ok(Self {
            positions,
            normals,
            colors,
            uvs,
            lods,
            lod_count: 1,
        })
    }

    pub(crate) fn base_faces(&self) -> &[Face] {
        match &self.lods[0] {
            LodSlot::Owned(faces) => faces,
            _ => &[],
        }
    }

    pub(crate) fn base_faces_mut(&mut self) -> &mut [Face] {
        match &mut self.lods[0] {
            LodSlot::Owned(faces) => faces,
            _ => &mut [],
        }
    }

    fn owned_count(&self) -> usize {
        4 + self.lods.iter().filter(|slot| slot.is_owned()).count()
    }
}

/// A triangle mesh: geometry store plus derived topology.
///
/// # Example
///
/// ```
/// use manifold_lite_topology::{Mesh, MeshCounts};
///
/// let mut mesh = Mesh::new("scratch");
/// mesh.allocate(MeshCounts { vertices: 3, normals: 1, colors: 1, uvs: 1, faces: 1 })
///     .unwrap();
/// assert_eq!(mesh.vertex_count(), 3);
///
/// mesh.release();
/// assert_eq!(mesh.owned_buffer_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Mesh {
    pub(crate) name: String,
    pub(crate) buffers: Option<MeshBuffers>,
    pub(crate) topology: Option<EdgeTable>,
    pub(crate) manifold: Option<bool>,
}

impl Mesh {
    /// Creates a named mesh that owns no buffers.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            buffers: None,
            topology: None,
            manifold: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // --- Allocation ---

    /// Allocates zero-initialized buffers for `counts` from the global heap.
    pub fn allocate(&mut self, counts: MeshCounts) -> Result<()> {
        self.allocate_with(counts, &SystemAllocator)
    }

    /// Allocates zero-initialized buffers for `counts` from `allocator`.
    ///
    /// All-or-nothing: on [`Error::AllocationFailure`] the mesh is exactly as
    /// it was before the call. On success the previous buffers, edge table
    /// and classification are released.
    pub fn allocate_with<A: BufferAllocator>(
        &mut self,
        counts: MeshCounts,
        allocator: &A,
    ) -> Result<()> {
        let buffers = MeshBuffers::acquire(&counts, allocator)
            .map_err(|buffer| self.allocation_failure(buffer))?;
        self.commit(buffers);
        tracing::debug!(
            mesh = %self.name,
            vertices = counts.vertices,
            normals = counts.normals,
            colors = counts.colors,
            uvs = counts.uvs,
            faces = counts.faces,
            "Allocated mesh buffers"
        );
        Ok(())
    }

    /// Frees every owned buffer. Safe to call on an empty mesh.
    pub fn release(&mut self) {
        self.buffers = None;
        self.invalidate_topology();
    }

    /// Number of buffers currently owned, counting attribute buffers, owned
    /// LOD face lists, the edge table and the seed and degree indices.
    pub fn owned_buffer_count(&self) -> usize {
        let attributes = self.buffers.as_ref().map_or(0, MeshBuffers::owned_count);
        let topology = if self.topology.is_some() {
            BufferKind::TOPOLOGY.len()
        } else {
            0
        };
        attributes + topology
    }

    pub fn is_allocated(&self) -> bool {
        self.buffers.is_some()
    }

    pub(crate) fn commit(&mut self, buffers: MeshBuffers) {
        self.buffers = Some(buffers);
        self.invalidate_topology();
    }

    pub(crate) fn invalidate_topology(&mut self) {
        self.topology = None;
        self.manifold = None;
    }

    pub(crate) fn allocation_failure(&self, buffer: BufferKind) -> Error {
        tracing::warn!(mesh = %self.name, buffer = %buffer, "Allocation failed");
        Error::AllocationFailure {
            mesh: self.name.clone(),
            buffer,
        }
    }

    pub(crate) fn import_error(&self, kind: ImportError) -> Error {
        Error::Import {
            mesh: self.name.clone(),
            kind,
        }
    }

    // --- Attribute access ---

    pub fn positions(&self) -> &[Position] {
        self.buffers.as_ref().map(|b| b.positions.as_slice()).unwrap_or_default()
    }

    pub fn normals(&self) -> &[Normal] {
        self.buffers.as_ref().map(|b| b.normals.as_slice()).unwrap_or_default()
    }

    pub fn colors(&self) -> &[Color] {
        self.buffers.as_ref().map(|b| b.colors.as_slice()).unwrap_or_default()
    }

    pub fn uvs(&self) -> &[Uv] {
        self.buffers.as_ref().map(|b| b.uvs.as_slice()).unwrap_or_default()
    }

    /// Mutable access to positions. Topology does not depend on positions, so
    /// the edge table stays valid.
    pub fn positions_mut(&mut self) -> &mut [Position] {
        self.buffers
            .as_mut()
            .map(|b| b.positions.as_mut_slice())
            .unwrap_or_default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions().len()
    }

    // --- Faces ---

    /// Number of populated level-of-detail levels.
    pub fn lod_count(&self) -> usize {
        self.buffers.as_ref().map_or(0, |b| b.lod_count)
    }

    /// Ownership state of a level-of-detail slot.
    pub fn lod_slot(&self, level: usize) -> Option<&LodSlot> {
        self.buffers.as_ref().and_then(|b| b.lods.get(level))
    }

    /// Faces of a level-of-detail; placeholder slots resolve to level 0.
    pub fn faces(&self, level: usize) -> &[Face] {
        let Some(buffers) = self.buffers.as_ref() else {
            return &[];
        };
        match buffers.lods.get(level) {
            Some(LodSlot::Owned(faces)) => faces,
            Some(LodSlot::SharedPlaceholder) => buffers.base_faces(),
            Some(LodSlot::Empty) | None => &[],
        }
    }

    pub fn base_faces(&self) -> &[Face] {
        self.faces(0)
    }

    pub fn face_count(&self) -> usize {
        self.base_faces().len()
    }

    /// Replaces the level-0 face list.
    ///
    /// Every corner index must address an existing element of its attribute
    /// buffer. The edge table and classification are discarded; call
    /// [`Mesh::build_edges`] again.
    pub fn set_base_faces(&mut self, faces: Vec<Face>) -> Result<()> {
        let Some(buffers) = self.buffers.as_ref() else {
            return Err(Error::Unallocated {
                mesh: self.name.clone(),
            });
        };
        let counts = [
            (Attribute::Vertex, buffers.positions.len()),
            (Attribute::Normal, buffers.normals.len()),
            (Attribute::Color, buffers.colors.len()),
            (Attribute::Uv, buffers.uvs.len()),
        ];
        for (i, face) in faces.iter().enumerate() {
            let corners = [face.vertices, face.normals, face.colors, face.uvs];
            for ((attribute, count), indices) in counts.iter().zip(corners) {
                if let Some(&index) = indices.iter().find(|&&idx| idx as usize >= *count) {
                    return Err(self.import_error(ImportError::IndexOutOfRange {
                        face: i,
                        attribute: *attribute,
                        index: index as usize,
                        count: *count,
                    }));
                }
            }
        }

        if let Some(buffers) = self.buffers.as_mut() {
            buffers.lods[0] = LodSlot::Owned(faces);
        }
        self.invalidate_topology();
        Ok(())
    }

    // --- Derived data ---

    /// The half-edge table, if [`Mesh::build_edges`] has run since the faces
    /// last changed.
    pub fn edge_table(&self) -> Option<&EdgeTable> {
        self.topology.as_ref()
    }

    /// Cached result of the last [`Mesh::check_manifold`].
    pub fn is_manifold(&self) -> Option<bool> {
        self.manifold
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new("")
    }
}
