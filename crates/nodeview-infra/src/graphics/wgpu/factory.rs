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

//! Assembles a [`RenderSurface`] on top of the `wgpu` backend.

use super::adapter::WgpuAdapterProvider;
use super::context::{ResourceRegistry, WgpuContext};
use super::device::WgpuDevice;
use super::queue::WgpuQueue;
use super::surface::WgpuPresentationSurface;
use nodeview_core::platform::NodeviewWindow;
use nodeview_core::renderer::api::RenderSurfaceConfig;
use nodeview_core::renderer::error::InitError;
use nodeview_core::renderer::{AdapterSelector, RenderSurface};
use std::sync::Arc;

/// Creates a render surface for `window`.
///
/// The surface is created but not sized; the host sends the first
/// [`RenderSurface::resize`] once the window reports its dimensions.
///
/// ## Errors
/// * `InitError::InvalidConfig` - If `config` fails validation.
/// * `InitError::SurfaceCreationFailed` - If `wgpu` cannot target the window.
/// * `InitError::NoSuitableDevice` - If no adapter passed selection.
pub fn create_render_surface<W: NodeviewWindow>(
    window: &W,
    config: RenderSurfaceConfig,
) -> Result<RenderSurface, InitError> {
    config.validate()?;

    let flags = if config.enable_validation {
        wgpu::InstanceFlags::debugging()
    } else {
        wgpu::InstanceFlags::empty()
    };
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        flags,
        ..Default::default()
    });

    let surface = instance
        .create_surface(window.surface_handle())
        .map_err(|e| InitError::SurfaceCreationFailed(e.to_string()))?;

    let selection = {
        let provider = WgpuAdapterProvider::new(&instance, Some(&surface));
        AdapterSelector::new(config.adapter_selection()).select(&provider)?
    };
    let (device, queue) = selection.device;
    log::info!(
        "Rendering on '{}' ({:?}, {:?})",
        selection.adapter_info.name,
        selection.adapter_info.backend_type,
        selection.adapter_info.device_type
    );

    let context = Arc::new(WgpuContext::new(
        instance,
        selection.adapter,
        device,
        queue,
        selection.adapter_info,
    ));
    let resources = Arc::new(ResourceRegistry::default());

    let presentation = WgpuPresentationSurface::new(
        context.clone(),
        resources.clone(),
        surface,
        config.color_format,
        config.vsync,
        window.inner_size(),
    )
    .map_err(|e| InitError::SurfaceCreationFailed(e.to_string()))?;

    let graphics_device = Arc::new(WgpuDevice::new(context.clone(), resources));
    let command_queue = Arc::new(WgpuQueue::new(context));

    RenderSurface::new(
        graphics_device,
        command_queue,
        Box::new(presentation),
        config,
    )
}
