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

use super::command::WgpuCommandRecorder;
use super::context::{ResourceRegistry, WgpuContext};
use super::conversions::IntoWgpu;
use nodeview_core::renderer::api::*;
use nodeview_core::renderer::error::ResourceError;
use nodeview_core::renderer::traits::{CommandRecorder, GraphicsDevice};
use std::sync::Arc;

/// The `wgpu` implementation of [`GraphicsDevice`].
#[derive(Debug)]
pub struct WgpuDevice {
    context: Arc<WgpuContext>,
    resources: Arc<ResourceRegistry>,
    frame_constants: wgpu::Buffer,
}

impl WgpuDevice {
    /// Creates the device front-end and its frame-constant buffer.
    pub fn new(context: Arc<WgpuContext>, resources: Arc<ResourceRegistry>) -> Self {
        let frame_constants = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Constants"),
            size: CameraState::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            context,
            resources,
            frame_constants,
        }
    }
}

impl GraphicsDevice for WgpuDevice {
    fn adapter_info(&self) -> GraphicsAdapterInfo {
        self.context.adapter_info.clone()
    }

    fn create_descriptor_heap(
        &self,
        kind: DescriptorKind,
        capacity: u32,
    ) -> Result<DescriptorHeapInfo, ResourceError> {
        if capacity == 0 {
            return Err(ResourceError::CreationFailed(
                "descriptor heap capacity must be non-zero".to_string(),
            ));
        }
        Ok(self.resources.create_table(kind, capacity))
    }

    fn create_depth_texture(
        &self,
        descriptor: &DepthBufferDescriptor,
    ) -> Result<TextureId, ResourceError> {
        if !descriptor.format.is_depth() {
            return Err(ResourceError::CreationFailed(format!(
                "{:?} is not a depth format",
                descriptor.format
            )));
        }
        let texture = self
            .context
            .scoped("Depth texture creation", || {
                self.context.device.create_texture(&wgpu::TextureDescriptor {
                    label: descriptor.label.as_deref(),
                    size: wgpu::Extent3d {
                        width: descriptor.width.max(1),
                        height: descriptor.height.max(1),
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: descriptor.format.into_wgpu(),
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                })
            })
            .map_err(|e| ResourceError::CreationFailed(e.to_string()))?;
        Ok(self.resources.insert_texture(texture, descriptor.format))
    }

    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError> {
        self.resources.destroy_texture(id)
    }

    fn create_render_target_view(
        &self,
        texture: TextureId,
        slot: DescriptorSlot,
    ) -> Result<(), ResourceError> {
        let (texture, format) = self.resources.texture(texture)?;
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Render Target View"),
            format: Some(format.into_wgpu()),
            ..Default::default()
        });
        self.resources.write_view(slot, view)
    }

    fn create_depth_stencil_view(
        &self,
        texture: TextureId,
        format: TextureFormat,
        slot: DescriptorSlot,
    ) -> Result<(), ResourceError> {
        let (texture, _) = self.resources.texture(texture)?;
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Depth Stencil View"),
            format: Some(format.into_wgpu()),
            aspect: wgpu::TextureAspect::All,
            ..Default::default()
        });
        self.resources.write_view(slot, view)
    }

    fn create_command_recorder(&self) -> Result<Box<dyn CommandRecorder>, ResourceError> {
        if self.context.is_lost() {
            return Err(ResourceError::BackendError("device lost".to_string()));
        }
        Ok(Box::new(WgpuCommandRecorder::new(
            self.context.clone(),
            self.resources.clone(),
        )))
    }

    fn write_frame_constants(&self, camera: &CameraState) -> Result<(), ResourceError> {
        if self.context.is_lost() {
            return Err(ResourceError::BackendError("device lost".to_string()));
        }
        self.context
            .queue
            .write_buffer(&self.frame_constants, 0, camera.as_bytes());
        Ok(())
    }
}
