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

//! The depth-stencil buffer paired with the swap chain.

use crate::renderer::api::{
    DepthBufferDescriptor, DescriptorKind, DescriptorSlot, TextureFormat, TextureId,
};
use crate::renderer::descriptor_allocator::DescriptorAllocator;
use crate::renderer::error::{InitError, ResizeError};
use crate::renderer::traits::GraphicsDevice;
use std::borrow::Cow;
use std::sync::Arc;

/// A depth texture resized alongside the swap chain, viewed through one
/// fixed depth-stencil slot.
#[derive(Debug)]
pub struct DepthBuffer {
    device: Arc<dyn GraphicsDevice>,
    format: TextureFormat,
    clear_depth: f32,
    clear_stencil: u32,
    dsv: DescriptorSlot,
    texture: Option<TextureId>,
}

impl DepthBuffer {
    /// Reserves the view slot; the texture itself is created on the first resize.
    pub fn new(
        device: Arc<dyn GraphicsDevice>,
        format: TextureFormat,
        clear_depth: f32,
        clear_stencil: u32,
    ) -> Result<Self, InitError> {
        if !format.is_depth() {
            return Err(InitError::InvalidConfig(format!(
                "{format:?} is not a depth format"
            )));
        }
        let heap = device.create_descriptor_heap(DescriptorKind::DepthStencil, 1)?;
        let dsv = DescriptorAllocator::new(heap).allocate(1);
        Ok(Self {
            device,
            format,
            clear_depth,
            clear_stencil,
            dsv,
            texture: None,
        })
    }

    /// Replaces the texture with a new one of `width` x `height`.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), ResizeError> {
        self.release();

        let texture = self.device.create_depth_texture(&DepthBufferDescriptor {
            label: Some(Cow::Borrowed("Depth Buffer")),
            width,
            height,
            format: self.format,
            clear_depth: self.clear_depth,
            clear_stencil: self.clear_stencil,
        })?;
        if let Err(e) = self
            .device
            .create_depth_stencil_view(texture, self.format, self.dsv)
        {
            if let Err(destroy) = self.device.destroy_texture(texture) {
                log::warn!("Failed to destroy orphaned depth texture: {destroy}");
            }
            return Err(e.into());
        }
        self.texture = Some(texture);
        log::debug!("Depth buffer rebuilt: {width}x{height} {:?}", self.format);
        Ok(())
    }

    /// Destroys the current texture, if any.
    pub fn release(&mut self) {
        if let Some(texture) = self.texture.take() {
            if let Err(e) = self.device.destroy_texture(texture) {
                log::warn!("Failed to destroy depth texture {texture:?}: {e}");
            }
        }
    }

    /// The live texture, if the buffer has been sized.
    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    /// The fixed depth-stencil view slot.
    pub fn slot(&self) -> DescriptorSlot {
        self.dsv
    }

    /// The depth format.
    pub fn format(&self) -> TextureFormat {
        self.format
    }
}

impl Drop for DepthBuffer {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::test_support::MockDevice;

    #[test]
    fn resize_rebinds_the_same_slot_to_a_new_texture() {
        let device = Arc::new(MockDevice::default());
        let mut depth =
            DepthBuffer::new(device.clone(), TextureFormat::Depth32Float, 1.0, 0).unwrap();
        assert!(depth.texture().is_none());

        depth.resize(800, 600).unwrap();
        let first = depth.texture().unwrap();
        let slot = depth.slot();
        depth.resize(1024, 768).unwrap();

        assert_ne!(depth.texture(), Some(first));
        assert_eq!(depth.slot(), slot);
        assert_eq!(device.live_textures(), 1);
        assert_eq!(device.last_depth_descriptor(), Some((1024, 768, 1.0)));
    }

    #[test]
    fn dropping_destroys_the_texture() {
        let device = Arc::new(MockDevice::default());
        {
            let mut depth =
                DepthBuffer::new(device.clone(), TextureFormat::Depth24PlusStencil8, 1.0, 0)
                    .unwrap();
            depth.resize(16, 16).unwrap();
            assert_eq!(device.live_textures(), 1);
        }
        assert_eq!(device.live_textures(), 0);
    }

    #[test]
    fn color_formats_are_refused() {
        let device = Arc::new(MockDevice::default());
        let err = DepthBuffer::new(device, TextureFormat::Rgba8Unorm, 1.0, 0).unwrap_err();
        assert!(matches!(err, InitError::InvalidConfig(_)));
    }
}
