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

//! The device-wide state shared by every `wgpu` backend object.

use anyhow::{anyhow, Result};
use nodeview_core::renderer::api::{
    DescriptorHeapId, DescriptorHeapInfo, DescriptorKind, DescriptorSlot, GraphicsAdapterInfo,
    TextureFormat, TextureId,
};
use nodeview_core::renderer::error::ResourceError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Holds the core WGPU state objects for one logical device.
#[derive(Debug)]
pub struct WgpuContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub adapter_info: GraphicsAdapterInfo,
    lost: Arc<AtomicBool>,
}

impl WgpuContext {
    /// Wraps a freshly created device and hooks its error and loss
    /// notifications into the log.
    pub fn new(
        instance: wgpu::Instance,
        adapter: wgpu::Adapter,
        device: wgpu::Device,
        queue: wgpu::Queue,
        adapter_info: GraphicsAdapterInfo,
    ) -> Self {
        device.on_uncaptured_error(Box::new(|e| {
            log::error!("WGPU Uncaptured Error: {e}");
        }));

        let lost = Arc::new(AtomicBool::new(false));
        let lost_flag = lost.clone();
        device.set_device_lost_callback(move |reason, message| {
            lost_flag.store(true, Ordering::SeqCst);
            log::error!("WGPU device lost ({reason:?}): {message}");
        });

        Self {
            instance,
            adapter,
            device,
            queue,
            adapter_info,
            lost,
        }
    }

    /// `true` once the device has been reported lost.
    pub fn is_lost(&self) -> bool {
        self.lost.load(Ordering::SeqCst)
    }

    /// Runs `f` inside validation and out-of-memory error scopes and turns a
    /// captured error into an `Err`.
    pub fn scoped<T>(&self, label: &str, f: impl FnOnce() -> T) -> Result<T> {
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = f();
        let validation = pollster::block_on(self.device.pop_error_scope());
        let out_of_memory = pollster::block_on(self.device.pop_error_scope());
        match validation.or(out_of_memory) {
            Some(e) => Err(anyhow!("{label} failed: {e}")),
            None => Ok(value),
        }
    }
}

#[derive(Debug)]
struct TextureEntry {
    texture: wgpu::Texture,
    format: TextureFormat,
}

#[derive(Debug)]
struct DescriptorTable {
    kind: DescriptorKind,
    views: Vec<Option<wgpu::TextureView>>,
}

/// Maps the core's opaque texture ids and descriptor slots onto `wgpu` objects.
///
/// `wgpu` has no descriptor heaps, so each heap is a table of optional
/// views and a slot index addresses one entry.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    next_texture: AtomicU64,
    next_heap: AtomicU32,
    textures: Mutex<HashMap<TextureId, TextureEntry>>,
    tables: Mutex<HashMap<DescriptorHeapId, DescriptorTable>>,
}

impl ResourceRegistry {
    /// Byte distance between two emulated descriptors.
    pub const STRIDE: u32 = std::mem::size_of::<Option<wgpu::TextureView>>() as u32;

    /// Takes ownership of `texture` and returns a never-reused id for it.
    pub fn insert_texture(&self, texture: wgpu::Texture, format: TextureFormat) -> TextureId {
        let id = TextureId(self.next_texture.fetch_add(1, Ordering::Relaxed));
        self.textures
            .lock()
            .unwrap()
            .insert(id, TextureEntry { texture, format });
        id
    }

    /// Removes and destroys a texture.
    pub fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError> {
        let entry = self
            .textures
            .lock()
            .unwrap()
            .remove(&id)
            .ok_or(ResourceError::TextureNotFound(id))?;
        entry.texture.destroy();
        Ok(())
    }

    /// Returns a handle to a live texture and its format.
    pub fn texture(&self, id: TextureId) -> Result<(wgpu::Texture, TextureFormat), ResourceError> {
        self.textures
            .lock()
            .unwrap()
            .get(&id)
            .map(|entry| (entry.texture.clone(), entry.format))
            .ok_or(ResourceError::TextureNotFound(id))
    }

    /// Creates an empty descriptor table.
    pub fn create_table(&self, kind: DescriptorKind, capacity: u32) -> DescriptorHeapInfo {
        let id = DescriptorHeapId(self.next_heap.fetch_add(1, Ordering::Relaxed));
        self.tables.lock().unwrap().insert(
            id,
            DescriptorTable {
                kind,
                views: vec![None; capacity as usize],
            },
        );
        DescriptorHeapInfo {
            id,
            kind,
            capacity,
            stride: Self::STRIDE,
            base: u64::from(id.0) << 32,
        }
    }

    /// Stores `view` in the table entry addressed by `slot`.
    pub fn write_view(
        &self,
        slot: DescriptorSlot,
        view: wgpu::TextureView,
    ) -> Result<(), ResourceError> {
        let mut tables = self.tables.lock().unwrap();
        let table = tables
            .get_mut(&slot.heap)
            .ok_or(ResourceError::HeapNotFound(slot.heap))?;
        if table.kind != slot.kind {
            return Err(ResourceError::BackendError(format!(
                "{:?} slot written into a {:?} heap",
                slot.kind, table.kind
            )));
        }
        let entry = table
            .views
            .get_mut(slot.index as usize)
            .ok_or(ResourceError::SlotOutOfRange {
                heap: slot.heap,
                index: slot.index,
            })?;
        *entry = Some(view);
        Ok(())
    }

    /// Reads the view stored in `slot`.
    pub fn view(&self, slot: DescriptorSlot) -> Result<wgpu::TextureView, ResourceError> {
        let tables = self.tables.lock().unwrap();
        let table = tables
            .get(&slot.heap)
            .ok_or(ResourceError::HeapNotFound(slot.heap))?;
        table
            .views
            .get(slot.index as usize)
            .and_then(Option::clone)
            .ok_or(ResourceError::SlotOutOfRange {
                heap: slot.heap,
                index: slot.index,
            })
    }
}
