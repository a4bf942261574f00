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

//! Adapter enumeration and device creation for the `wgpu` backend.

use super::conversions::adapter_info_from_wgpu;
use nodeview_core::renderer::api::{FeatureLevel, GraphicsAdapterInfo};
use nodeview_core::renderer::traits::AdapterProvider;

/// `wgpu` implementation of the [`AdapterProvider`] trait.
///
/// When a surface is given, adapters that cannot present to it are left out
/// of the enumeration.
#[derive(Debug)]
pub struct WgpuAdapterProvider<'a> {
    instance: &'a wgpu::Instance,
    surface: Option<&'a wgpu::Surface<'static>>,
}

impl<'a> WgpuAdapterProvider<'a> {
    /// Creates a provider over every backend `instance` was created with.
    pub fn new(instance: &'a wgpu::Instance, surface: Option<&'a wgpu::Surface<'static>>) -> Self {
        Self { instance, surface }
    }

    fn limits_for(adapter: &wgpu::Adapter, level: FeatureLevel) -> wgpu::Limits {
        let base = match level {
            FeatureLevel::Core => wgpu::Limits::default(),
            FeatureLevel::Downlevel => wgpu::Limits::downlevel_defaults(),
        };
        base.using_resolution(adapter.limits())
    }
}

impl AdapterProvider for WgpuAdapterProvider<'_> {
    type Adapter = wgpu::Adapter;
    type Device = (wgpu::Device, wgpu::Queue);

    fn enumerate_adapters(&self) -> Vec<wgpu::Adapter> {
        let adapters = self.instance.enumerate_adapters(wgpu::Backends::all());
        log::debug!("wgpu enumerated {} adapter(s)", adapters.len());
        match self.surface {
            Some(surface) => adapters
                .into_iter()
                .filter(|adapter| {
                    let supported = adapter.is_surface_supported(surface);
                    if !supported {
                        log::debug!(
                            "Adapter '{}' cannot present to the window surface",
                            adapter.get_info().name
                        );
                    }
                    supported
                })
                .collect(),
            None => adapters,
        }
    }

    fn adapter_info(&self, adapter: &wgpu::Adapter) -> GraphicsAdapterInfo {
        adapter_info_from_wgpu(&adapter.get_info(), &adapter.limits())
    }

    fn create_device(
        &self,
        adapter: &wgpu::Adapter,
        minimum_level: FeatureLevel,
    ) -> Result<(wgpu::Device, wgpu::Queue), String> {
        if minimum_level == FeatureLevel::Core
            && !adapter.get_downlevel_capabilities().is_webgpu_compliant()
        {
            return Err("adapter only supports a downlevel feature set".to_string());
        }

        pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("NodeView Logical Device"),
            required_features: wgpu::Features::empty(),
            required_limits: Self::limits_for(adapter, minimum_level),
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::Off,
        }))
        .map_err(|e| format!("failed to create logical device: {e}"))
    }
}
