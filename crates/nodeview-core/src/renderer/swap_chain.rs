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

//! The presentable buffer ring and its render-target views.

use crate::renderer::api::{DescriptorKind, DescriptorSlot, TextureFormat, TextureId};
use crate::renderer::descriptor_allocator::DescriptorAllocator;
use crate::renderer::error::{InitError, PresentError, ResizeError};
use crate::renderer::traits::{CommandRecorder, GraphicsDevice, PresentationSurface};
use std::sync::Arc;

/// One presentable image and the render-target view bound to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapChainBuffer {
    /// The image owned by the presentation surface.
    pub texture: TextureId,
    /// The render-target view slot.
    pub rtv: DescriptorSlot,
}

/// Owns the ring of presentable buffers and rebuilds their views on resize.
///
/// Render-target views come from a dedicated heap sized to the ring, which
/// is rewound wholesale each time the ring is rebuilt.
#[derive(Debug)]
pub struct SwapChainManager {
    device: Arc<dyn GraphicsDevice>,
    surface: Box<dyn PresentationSurface>,
    rtv_allocator: DescriptorAllocator,
    buffers: Vec<SwapChainBuffer>,
    buffer_count: u32,
    current: u32,
    extent: (u32, u32),
}

impl SwapChainManager {
    /// Creates an empty ring of `buffer_count` buffers over `surface`.
    ///
    /// Nothing is drawable until the first [`resize`](Self::resize).
    pub fn new(
        device: Arc<dyn GraphicsDevice>,
        surface: Box<dyn PresentationSurface>,
        buffer_count: u32,
    ) -> Result<Self, InitError> {
        let heap = device.create_descriptor_heap(DescriptorKind::RenderTarget, buffer_count)?;
        log::debug!(
            "Swap chain RTV heap {:?}: {} slots, stride {}",
            heap.id,
            heap.capacity,
            heap.stride
        );
        Ok(Self {
            device,
            surface,
            rtv_allocator: DescriptorAllocator::new(heap),
            buffers: Vec::with_capacity(buffer_count as usize),
            buffer_count,
            current: 0,
            extent: (0, 0),
        })
    }

    /// Rebuilds every buffer at `width` x `height`.
    ///
    /// The GPU must be idle. On failure the ring is left empty and the swap
    /// chain is not drawable.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), ResizeError> {
        self.release();

        if let Err(e) = self
            .surface
            .resize_buffers(self.buffer_count, width, height)
        {
            log::error!("Presentation surface refused a {width}x{height} resize: {e}");
            return Err(ResizeError::ResizeFailed(e.to_string()));
        }

        self.rtv_allocator.reset();
        for index in 0..self.buffer_count {
            if let Err(e) = self.bind_buffer(index) {
                log::error!("Failed to rebuild swap chain buffer {index}: {e}");
                self.release();
                return Err(e);
            }
        }

        self.current = 0;
        self.extent = (width, height);
        log::debug!(
            "Swap chain rebuilt: {} x {width}x{height} {:?}",
            self.buffer_count,
            self.surface.format()
        );
        Ok(())
    }

    fn bind_buffer(&mut self, index: u32) -> Result<(), ResizeError> {
        let texture = self.surface.buffer(index)?;
        let rtv = self.rtv_allocator.allocate(1);
        self.device.create_render_target_view(texture, rtv)?;
        self.buffers.push(SwapChainBuffer { texture, rtv });
        Ok(())
    }

    /// Drops every view and asks the surface to let go of its images.
    pub fn release(&mut self) {
        self.buffers.clear();
        self.surface.release_buffers();
        self.extent = (0, 0);
    }

    /// `true` when the whole ring is bound.
    pub fn is_drawable(&self) -> bool {
        self.buffers.len() == self.buffer_count as usize
    }

    /// Index of the buffer the next frame renders into.
    pub fn current_index(&self) -> u32 {
        self.current
    }

    /// The buffer the next frame renders into, if the ring is bound.
    pub fn current_buffer(&self) -> Option<&SwapChainBuffer> {
        self.buffers.get(self.current as usize)
    }

    /// Every bound buffer, in ring order.
    pub fn buffers(&self) -> &[SwapChainBuffer] {
        &self.buffers
    }

    /// Number of buffers in the ring.
    pub fn buffer_count(&self) -> u32 {
        self.buffer_count
    }

    /// The negotiated buffer format.
    pub fn format(&self) -> TextureFormat {
        self.surface.format()
    }

    /// Size of the bound buffers, `(0, 0)` when empty.
    pub fn extent(&self) -> (u32, u32) {
        self.extent
    }

    /// Records what the presentation engine needs to show the current buffer.
    pub fn prepare_present(
        &mut self,
        recorder: &mut dyn CommandRecorder,
    ) -> Result<(), PresentError> {
        self.surface.prepare_present(recorder, self.current)
    }

    /// Presents the current buffer and moves to the next one in the ring.
    pub fn present(&mut self) -> Result<(), PresentError> {
        self.surface.present()?;
        self.current = (self.current + 1) % self.buffer_count;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::test_support::{MockDevice, MockSurface};

    fn manager(count: u32) -> (Arc<MockDevice>, MockSurface, SwapChainManager) {
        let device = Arc::new(MockDevice::default());
        let surface = MockSurface::new(device.clone());
        let chain = SwapChainManager::new(device.clone(), Box::new(surface.clone()), count).unwrap();
        (device, surface, chain)
    }

    #[test]
    fn resize_binds_one_view_per_buffer_in_order() {
        let (device, _, mut chain) = manager(3);
        assert!(!chain.is_drawable());
        chain.resize(800, 600).unwrap();

        assert!(chain.is_drawable());
        assert_eq!(chain.current_index(), 0);
        let indices: Vec<u32> = chain.buffers().iter().map(|b| b.rtv.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(device.bound_render_targets(), 3);
    }

    #[test]
    fn every_resize_produces_fresh_images() {
        let (_, _, mut chain) = manager(3);
        chain.resize(640, 480).unwrap();
        let first: Vec<TextureId> = chain.buffers().iter().map(|b| b.texture).collect();
        chain.resize(640, 480).unwrap();
        let second: Vec<TextureId> = chain.buffers().iter().map(|b| b.texture).collect();

        assert_eq!(second.len(), 3);
        assert!(first.iter().all(|t| !second.contains(t)));
    }

    #[test]
    fn refused_resize_leaves_the_ring_empty() {
        let (_, surface, mut chain) = manager(2);
        chain.resize(100, 100).unwrap();
        surface.fail_next_resize();

        let err = chain.resize(200, 200).unwrap_err();
        assert!(matches!(err, ResizeError::ResizeFailed(_)));
        assert!(chain.buffers().is_empty());
        assert!(!chain.is_drawable());
        assert_eq!(chain.extent(), (0, 0));
    }

    #[test]
    fn present_walks_the_ring() {
        let (_, _, mut chain) = manager(3);
        chain.resize(10, 10).unwrap();
        for expected in [1, 2, 0, 1] {
            chain.present().unwrap();
            assert_eq!(chain.current_index(), expected);
        }
    }
}
