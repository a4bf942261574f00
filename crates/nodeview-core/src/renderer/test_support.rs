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

//! In-memory backend used by the unit tests of this module.

use crate::renderer::api::*;
use crate::renderer::command::test_support::{CallLog, LoggingRecorder};
use crate::renderer::error::{PresentError, ResourceError};
use crate::renderer::traits::{CommandRecorder, GraphicsDevice, PresentationSurface};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub struct MockDevice {
    next_texture: AtomicU64,
    next_heap: AtomicU32,
    live: Mutex<HashSet<TextureId>>,
    render_targets: AtomicUsize,
    last_depth: Mutex<Option<(u32, u32, f32)>>,
    pub recorder_log: CallLog,
}

impl MockDevice {
    pub fn register_texture(&self) -> TextureId {
        let id = TextureId(self.next_texture.fetch_add(1, Ordering::SeqCst));
        self.live.lock().unwrap().insert(id);
        id
    }

    pub fn forget_texture(&self, id: TextureId) {
        self.live.lock().unwrap().remove(&id);
    }

    pub fn live_textures(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    pub fn bound_render_targets(&self) -> usize {
        self.render_targets.load(Ordering::SeqCst)
    }

    pub fn last_depth_descriptor(&self) -> Option<(u32, u32, f32)> {
        *self.last_depth.lock().unwrap()
    }
}

impl GraphicsDevice for MockDevice {
    fn adapter_info(&self) -> GraphicsAdapterInfo {
        GraphicsAdapterInfo {
            name: "Mock Adapter".into(),
            ..Default::default()
        }
    }

    fn create_descriptor_heap(
        &self,
        kind: DescriptorKind,
        capacity: u32,
    ) -> Result<DescriptorHeapInfo, ResourceError> {
        let id = self.next_heap.fetch_add(1, Ordering::SeqCst);
        Ok(DescriptorHeapInfo {
            id: DescriptorHeapId(id),
            kind,
            capacity,
            stride: 32,
            base: u64::from(id) << 32,
        })
    }

    fn create_depth_texture(
        &self,
        descriptor: &DepthBufferDescriptor,
    ) -> Result<TextureId, ResourceError> {
        *self.last_depth.lock().unwrap() =
            Some((descriptor.width, descriptor.height, descriptor.clear_depth));
        Ok(self.register_texture())
    }

    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError> {
        if self.live.lock().unwrap().remove(&id) {
            Ok(())
        } else {
            Err(ResourceError::TextureNotFound(id))
        }
    }

    fn create_render_target_view(
        &self,
        texture: TextureId,
        _: DescriptorSlot,
    ) -> Result<(), ResourceError> {
        if !self.live.lock().unwrap().contains(&texture) {
            return Err(ResourceError::TextureNotFound(texture));
        }
        self.render_targets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn create_depth_stencil_view(
        &self,
        texture: TextureId,
        _: TextureFormat,
        _: DescriptorSlot,
    ) -> Result<(), ResourceError> {
        if self.live.lock().unwrap().contains(&texture) {
            Ok(())
        } else {
            Err(ResourceError::TextureNotFound(texture))
        }
    }

    fn create_command_recorder(&self) -> Result<Box<dyn CommandRecorder>, ResourceError> {
        Ok(Box::new(LoggingRecorder::new(self.recorder_log.clone())))
    }

    fn write_frame_constants(&self, _: &CameraState) -> Result<(), ResourceError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct SurfaceImages {
    images: Vec<TextureId>,
    presents: usize,
}

#[derive(Debug, Clone)]
pub struct MockSurface {
    device: Arc<MockDevice>,
    images: Arc<Mutex<SurfaceImages>>,
    fail_resize: Arc<AtomicBool>,
    pub present_error: Arc<Mutex<Option<PresentError>>>,
}

impl MockSurface {
    pub fn new(device: Arc<MockDevice>) -> Self {
        Self {
            device,
            images: Arc::default(),
            fail_resize: Arc::default(),
            present_error: Arc::default(),
        }
    }

    pub fn fail_next_resize(&self) {
        self.fail_resize.store(true, Ordering::SeqCst);
    }

    pub fn presents(&self) -> usize {
        self.images.lock().unwrap().presents
    }
}

impl PresentationSurface for MockSurface {
    fn format(&self) -> TextureFormat {
        TextureFormat::Rgba8Unorm
    }

    fn resize_buffers(&mut self, count: u32, _: u32, _: u32) -> Result<(), ResourceError> {
        if self.fail_resize.swap(false, Ordering::SeqCst) {
            return Err(ResourceError::BackendError("surface refused".into()));
        }
        let mut images = self.images.lock().unwrap();
        images.images = (0..count).map(|_| self.device.register_texture()).collect();
        Ok(())
    }

    fn buffer(&self, index: u32) -> Result<TextureId, ResourceError> {
        self.images
            .lock()
            .unwrap()
            .images
            .get(index as usize)
            .copied()
            .ok_or_else(|| ResourceError::BackendError(format!("no buffer {index}")))
    }

    fn release_buffers(&mut self) {
        for id in self.images.lock().unwrap().images.drain(..) {
            self.device.forget_texture(id);
        }
    }

    fn prepare_present(
        &mut self,
        _: &mut dyn CommandRecorder,
        _: u32,
    ) -> Result<(), PresentError> {
        match self.present_error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn present(&mut self) -> Result<(), PresentError> {
        self.images.lock().unwrap().presents += 1;
        Ok(())
    }
}
