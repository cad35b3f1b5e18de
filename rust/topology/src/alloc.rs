// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Buffer acquisition.
//!
//! Every buffer a mesh owns is obtained through a [`BufferAllocator`], so
//! allocation failure is reported as an error instead of aborting the
//! process, and tests can inject failures at any acquisition step.

use crate::keys::BufferKind;

/// Source of fixed-size, pre-filled buffers.
pub trait BufferAllocator {
    /// Returns a buffer of `len` copies of `fill`, or `None` if it cannot be
    /// obtained.
    fn acquire<T: Clone>(&self, kind: BufferKind, len: usize, fill: T) -> Option<Vec<T>>;
}

/// Allocator backed by the global heap via `Vec::try_reserve_exact`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAllocator;

impl BufferAllocator for SystemAllocator {
    fn acquire<T: Clone>(&self, kind: BufferKind, len: usize, fill: T) -> Option<Vec<T>> {
        let mut buffer = Vec::new();
        if let Err(err) = buffer.try_reserve_exact(len) {
            tracing::warn!(buffer = %kind, len, error = %err, "Buffer reservation failed");
            return None;
        }
        buffer.resize(len, fill);
        Some(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_allocator_fills() {
        let buf = SystemAllocator.acquire(BufferKind::Faces, 4, 7u32).unwrap();
        assert_eq!(buf, vec![7, 7, 7, 7]);
    }

    #[test]
    fn system_allocator_rejects_impossible_sizes() {
        assert!(SystemAllocator
            .acquire(BufferKind::Edges, usize::MAX, 0u64)
            .is_none());
    }
}
