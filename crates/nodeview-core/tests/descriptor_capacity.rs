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

mod common;

use common::{EventLog, MockDevice};
use nodeview_core::renderer::{DescriptorAllocator, DescriptorKind, GraphicsDevice};

fn allocator(capacity: u32) -> DescriptorAllocator {
    let device = MockDevice::new(EventLog::default());
    let heap = device
        .create_descriptor_heap(DescriptorKind::RenderTarget, capacity)
        .unwrap();
    DescriptorAllocator::new(heap)
}

#[test]
fn capacity_allocations_are_spaced_by_the_stride() {
    let allocator = allocator(5);
    let base = allocator.heap().base;
    for i in 0..5u64 {
        let slot = allocator.allocate(1);
        assert_eq!(slot.offset, base + i * u64::from(MockDevice::STRIDE));
    }
    assert_eq!(allocator.free_remaining(), 0);
}

#[test]
#[should_panic(expected = "exhausted")]
fn one_more_than_capacity_panics() {
    let allocator = allocator(5);
    for _ in 0..5 {
        allocator.allocate(1);
    }
    allocator.allocate(1);
}

#[test]
#[should_panic(expected = "exhausted")]
fn oversized_batch_panics_even_on_an_empty_heap() {
    allocator(2).allocate(3);
}
