// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Bump allocation of descriptor slots from a pre-sized heap.

use crate::renderer::api::{DescriptorHeapInfo, DescriptorSlot};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct Cursor {
    index: u32,
    offset: u64,
    free: u32,
}

/// Hands out fixed-stride slots from a descriptor heap, front to back.
///
/// Slots are never reclaimed individually. Asking for more slots than the
/// heap has left is a programming error and panics.
#[derive(Debug)]
pub struct DescriptorAllocator {
    heap: DescriptorHeapInfo,
    cursor: Mutex<Cursor>,
}

impl DescriptorAllocator {
    /// Creates an allocator over an empty heap.
    pub fn new(heap: DescriptorHeapInfo) -> Self {
        Self {
            cursor: Mutex::new(Cursor {
                index: 0,
                offset: heap.base,
                free: heap.capacity,
            }),
            heap,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Cursor> {
        self.cursor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reserves `count` consecutive slots and returns the first one.
    ///
    /// # Panics
    ///
    /// Panics if `count` is zero or exceeds the number of free slots.
    pub fn allocate(&self, count: u32) -> DescriptorSlot {
        assert!(count > 0, "descriptor allocation of zero slots");
        let mut cursor = self.lock();
        assert!(
            count <= cursor.free,
            "descriptor heap {:?} exhausted: requested {count}, {} of {} free",
            self.heap.id,
            cursor.free,
            self.heap.capacity
        );

        let slot = DescriptorSlot {
            heap: self.heap.id,
            kind: self.heap.kind,
            offset: cursor.offset,
            index: cursor.index,
            stride: self.heap.stride,
        };
        cursor.offset += u64::from(count) * u64::from(self.heap.stride);
        cursor.index += count;
        cursor.free -= count;
        slot
    }

    /// Rewinds the cursor to the start of the heap.
    ///
    /// Only valid once every slot handed out so far has been abandoned, which
    /// the exclusive borrow makes the caller state explicitly.
    pub fn reset(&mut self) {
        let cursor = self
            .cursor
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        cursor.index = 0;
        cursor.offset = self.heap.base;
        cursor.free = self.heap.capacity;
    }

    /// Number of slots still available.
    pub fn free_remaining(&self) -> u32 {
        self.lock().free
    }

    /// Number of slots handed out since creation or the last reset.
    pub fn allocated(&self) -> u32 {
        self.heap.capacity - self.lock().free
    }

    /// Layout of the underlying heap.
    pub fn heap(&self) -> &DescriptorHeapInfo {
        &self.heap
    }
}
