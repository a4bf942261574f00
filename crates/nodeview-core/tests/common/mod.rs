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

//! A recording mock backend shared by the integration tests.

#![allow(dead_code)]

use nodeview_core::renderer::*;
use std::any::Any;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// Every backend call, in the order it happened.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn position(&self, event: &str) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.events().iter().filter(|e| e.starts_with(prefix)).count()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

#[derive(Debug)]
struct FenceGate {
    completed: u64,
    gated: bool,
    waiting: usize,
}

/// A queue whose fence only moves when the test says so.
///
/// Ungated, every wait completes immediately. Gated, waits block until
/// [`trigger`](Self::trigger) or [`open`](Self::open).
#[derive(Debug)]
pub struct MockQueue {
    log: EventLog,
    gate: Mutex<FenceGate>,
    changed: Condvar,
}

impl MockQueue {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            gate: Mutex::new(FenceGate {
                completed: 0,
                gated: false,
                waiting: 0,
            }),
            changed: Condvar::new(),
        }
    }

    pub fn close_gate(&self) {
        self.gate.lock().unwrap().gated = true;
    }

    pub fn open(&self) {
        self.gate.lock().unwrap().gated = false;
        self.changed.notify_all();
    }

    pub fn trigger(&self, value: u64) {
        let mut gate = self.gate.lock().unwrap();
        gate.completed = gate.completed.max(value);
        self.changed.notify_all();
    }

    /// Blocks until some thread is parked in [`CommandQueue::wait_for_value`].
    pub fn wait_for_waiter(&self, limit: Duration) -> bool {
        let deadline = Instant::now() + limit;
        let mut gate = self.gate.lock().unwrap();
        while gate.waiting == 0 {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            gate = self.changed.wait_timeout(gate, deadline - now).unwrap().0;
        }
        true
    }
}

impl CommandQueue for MockQueue {
    fn execute_command_list(&self, recorder: &mut dyn CommandRecorder) -> Result<(), CommandError> {
        let closed = recorder
            .as_any_mut()
            .downcast_mut::<MockRecorder>()
            .map(|r| r.closed)
            .ok_or_else(|| CommandError::SubmitFailed("foreign recorder".into()))?;
        if !closed {
            return Err(CommandError::SubmitFailed("recorder is open".into()));
        }
        self.log.push("execute");
        Ok(())
    }

    fn signal(&self, value: u64) -> Result<(), FenceError> {
        self.log.push(format!("signal {value}"));
        Ok(())
    }

    fn completed_value(&self) -> u64 {
        self.gate.lock().unwrap().completed
    }

    fn wait_for_value(&self, value: u64, timeout: Option<Duration>) -> FenceWaitStatus {
        self.log.push(format!("wait {value}"));
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut gate = self.gate.lock().unwrap();
        gate.waiting += 1;
        self.changed.notify_all();

        let status = loop {
            if gate.completed >= value {
                break FenceWaitStatus::Reached;
            }
            if !gate.gated {
                gate.completed = value;
                break FenceWaitStatus::Reached;
            }
            match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        break FenceWaitStatus::TimedOut;
                    }
                    gate = self.changed.wait_timeout(gate, deadline - now).unwrap().0;
                }
                None => gate = self.changed.wait(gate).unwrap(),
            }
        };
        gate.waiting -= 1;
        status
    }
}

#[derive(Debug)]
pub struct MockRecorder {
    log: EventLog,
    closed: bool,
    refuse_reset: Arc<AtomicBool>,
}

impl CommandRecorder for MockRecorder {
    fn reset(&mut self) -> Result<(), CommandError> {
        if self.refuse_reset.load(Ordering::SeqCst) {
            return Err(CommandError::ResetFailed("allocator busy".into()));
        }
        self.closed = false;
        self.log.push("reset");
        Ok(())
    }

    fn set_viewport(&mut self, viewport: &Viewport) {
        self.log
            .push(format!("viewport {}x{}", viewport.width, viewport.height));
    }

    fn set_scissor_rect(&mut self, rect: &ScissorRect) {
        self.log.push(format!(
            "scissor {},{},{},{}",
            rect.left, rect.top, rect.right, rect.bottom
        ));
    }

    fn clear_targets(&mut self, targets: &ClearTargets) {
        self.log.push(format!(
            "clear color={} depth={}",
            targets.color.is_some(),
            targets.depth.is_some()
        ));
    }

    fn close(&mut self) -> Result<(), CommandError> {
        self.closed = true;
        self.log.push("close");
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A device that hands out never-reused texture ids and logs every binding.
#[derive(Debug)]
pub struct MockDevice {
    log: EventLog,
    next_texture: AtomicU64,
    next_heap: AtomicU32,
    live: Mutex<HashSet<TextureId>>,
    refuse_reset: Arc<AtomicBool>,
}

impl MockDevice {
    pub const STRIDE: u32 = 64;

    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            next_texture: AtomicU64::new(100),
            next_heap: AtomicU32::new(0),
            live: Mutex::new(HashSet::new()),
            refuse_reset: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn new_texture(&self) -> TextureId {
        let id = TextureId(self.next_texture.fetch_add(1, Ordering::SeqCst));
        self.live.lock().unwrap().insert(id);
        id
    }

    pub fn drop_texture(&self, id: TextureId) {
        self.live.lock().unwrap().remove(&id);
    }

    /// Makes every recorder created by this device refuse `reset`.
    pub fn refuse_resets(&self, refuse: bool) {
        self.refuse_reset.store(refuse, Ordering::SeqCst);
    }

    pub fn live_textures(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    fn check_live(&self, id: TextureId) -> Result<(), ResourceError> {
        if self.live.lock().unwrap().contains(&id) {
            Ok(())
        } else {
            Err(ResourceError::TextureNotFound(id))
        }
    }
}

impl GraphicsDevice for MockDevice {
    fn adapter_info(&self) -> GraphicsAdapterInfo {
        GraphicsAdapterInfo {
            name: "Mock Adapter".into(),
            device_type: RendererDeviceType::DiscreteGpu,
            dedicated_video_memory: 4 << 30,
            ..Default::default()
        }
    }

    fn create_descriptor_heap(
        &self,
        kind: DescriptorKind,
        capacity: u32,
    ) -> Result<DescriptorHeapInfo, ResourceError> {
        let id = self.next_heap.fetch_add(1, Ordering::SeqCst);
        self.log.push(format!("heap {kind:?} x{capacity}"));
        Ok(DescriptorHeapInfo {
            id: DescriptorHeapId(id),
            kind,
            capacity,
            stride: Self::STRIDE,
            base: 0x10_0000 * (u64::from(id) + 1),
        })
    }

    fn create_depth_texture(
        &self,
        descriptor: &DepthBufferDescriptor,
    ) -> Result<TextureId, ResourceError> {
        let id = self.new_texture();
        self.log.push(format!(
            "create_depth {}x{} {:?} clear={}",
            descriptor.width, descriptor.height, descriptor.format, descriptor.clear_depth
        ));
        Ok(id)
    }

    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError> {
        self.check_live(id)?;
        self.drop_texture(id);
        self.log.push(format!("destroy {}", id.0));
        Ok(())
    }

    fn create_render_target_view(
        &self,
        texture: TextureId,
        slot: DescriptorSlot,
    ) -> Result<(), ResourceError> {
        self.check_live(texture)?;
        self.log.push(format!("rtv {} -> {}", texture.0, slot.index));
        Ok(())
    }

    fn create_depth_stencil_view(
        &self,
        texture: TextureId,
        _: TextureFormat,
        slot: DescriptorSlot,
    ) -> Result<(), ResourceError> {
        self.check_live(texture)?;
        self.log.push(format!("dsv {} -> {}", texture.0, slot.index));
        Ok(())
    }

    fn create_command_recorder(&self) -> Result<Box<dyn CommandRecorder>, ResourceError> {
        Ok(Box::new(MockRecorder {
            log: self.log.clone(),
            closed: true,
            refuse_reset: self.refuse_reset.clone(),
        }))
    }

    fn write_frame_constants(&self, _: &CameraState) -> Result<(), ResourceError> {
        self.log.push("constants");
        Ok(())
    }
}

/// A presentation surface whose images are textures of the [`MockDevice`].
#[derive(Debug, Clone)]
pub struct MockSurface {
    log: EventLog,
    device: Arc<MockDevice>,
    images: Arc<Mutex<Vec<TextureId>>>,
    refuse_resize: Arc<AtomicBool>,
}

impl MockSurface {
    pub fn new(log: EventLog, device: Arc<MockDevice>) -> Self {
        Self {
            log,
            device,
            images: Arc::default(),
            refuse_resize: Arc::default(),
        }
    }

    pub fn refuse_next_resize(&self) {
        self.refuse_resize.store(true, Ordering::SeqCst);
    }
}

impl PresentationSurface for MockSurface {
    fn format(&self) -> TextureFormat {
        TextureFormat::Rgba8Unorm
    }

    fn resize_buffers(&mut self, count: u32, width: u32, height: u32) -> Result<(), ResourceError> {
        self.log.push(format!("resize_buffers {count} {width}x{height}"));
        if self.refuse_resize.swap(false, Ordering::SeqCst) {
            return Err(ResourceError::BackendError("swap chain refused".into()));
        }
        *self.images.lock().unwrap() = (0..count).map(|_| self.device.new_texture()).collect();
        Ok(())
    }

    fn buffer(&self, index: u32) -> Result<TextureId, ResourceError> {
        self.images
            .lock()
            .unwrap()
            .get(index as usize)
            .copied()
            .ok_or_else(|| ResourceError::BackendError(format!("no buffer {index}")))
    }

    fn release_buffers(&mut self) {
        let images: Vec<TextureId> = self.images.lock().unwrap().drain(..).collect();
        for id in &images {
            self.device.drop_texture(*id);
        }
        self.log.push(format!("release_buffers {}", images.len()));
    }

    fn prepare_present(
        &mut self,
        _: &mut dyn CommandRecorder,
        index: u32,
    ) -> Result<(), PresentError> {
        self.log.push(format!("prepare_present {index}"));
        Ok(())
    }

    fn present(&mut self) -> Result<(), PresentError> {
        self.log.push("present");
        Ok(())
    }
}

/// Every piece of the mock backend, wired to one event log.
pub struct MockBackend {
    pub log: EventLog,
    pub device: Arc<MockDevice>,
    pub queue: Arc<MockQueue>,
    pub surface: MockSurface,
}

impl MockBackend {
    pub fn new() -> Self {
        let log = EventLog::default();
        let device = Arc::new(MockDevice::new(log.clone()));
        let queue = Arc::new(MockQueue::new(log.clone()));
        let surface = MockSurface::new(log.clone(), device.clone());
        Self {
            log,
            device,
            queue,
            surface,
        }
    }

    pub fn render_surface(&self, config: RenderSurfaceConfig) -> RenderSurface {
        RenderSurface::new(
            self.device.clone(),
            self.queue.clone(),
            Box::new(self.surface.clone()),
            config,
        )
        .unwrap()
    }

    pub fn fence(&self, timeout: Option<Duration>) -> FenceSync {
        FenceSync::new(self.queue.clone(), timeout)
    }
}
