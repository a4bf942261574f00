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

//! Descriptor heaps and the fixed-stride slots carved out of them.

/// The kind of view a descriptor heap stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    /// Render-target views (one per swap-chain buffer).
    RenderTarget,
    /// Depth-stencil views.
    DepthStencil,
}

/// An opaque handle to a backend descriptor heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorHeapId(pub u32);

/// Layout of a pre-sized descriptor heap, as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorHeapInfo {
    /// The heap this layout belongs to.
    pub id: DescriptorHeapId,
    /// The kind of views stored in the heap.
    pub kind: DescriptorKind,
    /// Number of descriptors the heap can hold.
    pub capacity: u32,
    /// Distance in bytes between two consecutive descriptors.
    pub stride: u32,
    /// Address of the first descriptor.
    pub base: u64,
}

/// A handle to one descriptor inside a heap.
///
/// Handed out by value; copying it never allocates anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorSlot {
    /// The heap the slot lives in.
    pub heap: DescriptorHeapId,
    /// The kind of view the slot holds.
    pub kind: DescriptorKind,
    /// Absolute address of the slot (`base + index * stride`).
    pub offset: u64,
    /// Position of the slot inside its heap.
    pub index: u32,
    /// Stride of the owning heap.
    pub stride: u32,
}

impl DescriptorSlot {
    /// Returns the slot `n` positions after this one in the same heap.
    ///
    /// Used to address the individual descriptors of a multi-slot allocation.
    pub fn offset_by(self, n: u32) -> DescriptorSlot {
        DescriptorSlot {
            offset: self.offset + u64::from(n) * u64::from(self.stride),
            index: self.index + n,
            ..self
        }
    }
}
