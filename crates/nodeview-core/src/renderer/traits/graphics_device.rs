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

use crate::renderer::api::*;
use crate::renderer::error::ResourceError;
use crate::renderer::traits::CommandRecorder;
use std::fmt::Debug;

/// The main interface for creating and binding GPU resources.
///
/// Object safe, so the render core can hold it as `Arc<dyn GraphicsDevice>`.
pub trait GraphicsDevice: Send + Sync + Debug + 'static {
    /// Returns information about the adapter the device was created on.
    fn adapter_info(&self) -> GraphicsAdapterInfo;

    /// Creates a pre-sized descriptor heap.
    /// ## Arguments
    /// * `kind` - The kind of views the heap will store.
    /// * `capacity` - The number of descriptors the heap can hold.
    /// ## Returns
    /// The layout of the created heap.
    /// ## Errors
    /// * `ResourceError` - If the backend cannot create the heap.
    fn create_descriptor_heap(
        &self,
        kind: DescriptorKind,
        capacity: u32,
    ) -> Result<DescriptorHeapInfo, ResourceError>;

    /// Creates a depth(-stencil) texture.
    /// ## Errors
    /// * `ResourceError::CreationFailed` - If the format is not a depth format or allocation fails.
    fn create_depth_texture(
        &self,
        descriptor: &DepthBufferDescriptor,
    ) -> Result<TextureId, ResourceError>;

    /// Destroys a texture created by this device.
    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError>;

    /// Writes a render-target view of `texture` into `slot`.
    /// ## Errors
    /// * `ResourceError::TextureNotFound` - If `texture` is not live.
    /// * `ResourceError::HeapNotFound` - If the slot's heap does not exist.
    fn create_render_target_view(
        &self,
        texture: TextureId,
        slot: DescriptorSlot,
    ) -> Result<(), ResourceError>;

    /// Writes a depth-stencil view of `texture` into `slot`.
    fn create_depth_stencil_view(
        &self,
        texture: TextureId,
        format: TextureFormat,
        slot: DescriptorSlot,
    ) -> Result<(), ResourceError>;

    /// Creates a command recorder bound to this device's direct queue.
    fn create_command_recorder(&self) -> Result<Box<dyn CommandRecorder>, ResourceError>;

    /// Uploads the per-frame camera constants.
    fn write_frame_constants(&self, camera: &CameraState) -> Result<(), ResourceError>;
}
