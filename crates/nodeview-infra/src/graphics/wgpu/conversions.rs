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

//! Conversions between the render core's value types and `wgpu` types.

use nodeview_core::renderer::api::{
    GraphicsAdapterInfo, GraphicsBackendType, RendererDeviceType, TextureFormat,
};
use nodeview_core::renderer::error::PresentError;

/// A local extension trait to convert our types into WGPU-compatible types.
/// This avoids Rust's orphan rules while keeping an idiomatic `.into_wgpu()` syntax.
pub trait IntoWgpu<T> {
    /// Consumes self and converts it into a WGPU-compatible type.
    fn into_wgpu(self) -> T;
}

impl IntoWgpu<wgpu::TextureFormat> for TextureFormat {
    fn into_wgpu(self) -> wgpu::TextureFormat {
        match self {
            TextureFormat::Rgba8Unorm => wgpu::TextureFormat::Rgba8Unorm,
            TextureFormat::Rgba8UnormSrgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            TextureFormat::Bgra8Unorm => wgpu::TextureFormat::Bgra8Unorm,
            TextureFormat::Bgra8UnormSrgb => wgpu::TextureFormat::Bgra8UnormSrgb,
            TextureFormat::Rgb10a2Unorm => wgpu::TextureFormat::Rgb10a2Unorm,
            TextureFormat::Rgba16Float => wgpu::TextureFormat::Rgba16Float,
            TextureFormat::Depth16Unorm => wgpu::TextureFormat::Depth16Unorm,
            TextureFormat::Depth24Plus => wgpu::TextureFormat::Depth24Plus,
            TextureFormat::Depth24PlusStencil8 => wgpu::TextureFormat::Depth24PlusStencil8,
            TextureFormat::Depth32Float => wgpu::TextureFormat::Depth32Float,
            TextureFormat::Depth32FloatStencil8 => wgpu::TextureFormat::Depth32FloatStencil8,
        }
    }
}

impl IntoWgpu<wgpu::Color> for [f32; 4] {
    fn into_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: f64::from(self[0]),
            g: f64::from(self[1]),
            b: f64::from(self[2]),
            a: f64::from(self[3]),
        }
    }
}

/// Maps a surface format reported by `wgpu` back to ours, if we know it.
pub fn texture_format_from_wgpu(format: wgpu::TextureFormat) -> Option<TextureFormat> {
    Some(match format {
        wgpu::TextureFormat::Rgba8Unorm => TextureFormat::Rgba8Unorm,
        wgpu::TextureFormat::Rgba8UnormSrgb => TextureFormat::Rgba8UnormSrgb,
        wgpu::TextureFormat::Bgra8Unorm => TextureFormat::Bgra8Unorm,
        wgpu::TextureFormat::Bgra8UnormSrgb => TextureFormat::Bgra8UnormSrgb,
        wgpu::TextureFormat::Rgb10a2Unorm => TextureFormat::Rgb10a2Unorm,
        wgpu::TextureFormat::Rgba16Float => TextureFormat::Rgba16Float,
        wgpu::TextureFormat::Depth16Unorm => TextureFormat::Depth16Unorm,
        wgpu::TextureFormat::Depth24Plus => TextureFormat::Depth24Plus,
        wgpu::TextureFormat::Depth24PlusStencil8 => TextureFormat::Depth24PlusStencil8,
        wgpu::TextureFormat::Depth32Float => TextureFormat::Depth32Float,
        wgpu::TextureFormat::Depth32FloatStencil8 => TextureFormat::Depth32FloatStencil8,
        _ => return None,
    })
}

/// Convert a WGPU backend to our generic backend type.
pub fn backend_type_from_wgpu(backend: wgpu::Backend) -> GraphicsBackendType {
    match backend {
        wgpu::Backend::Vulkan => GraphicsBackendType::Vulkan,
        wgpu::Backend::Metal => GraphicsBackendType::Metal,
        wgpu::Backend::Dx12 => GraphicsBackendType::Dx12,
        wgpu::Backend::Gl => GraphicsBackendType::OpenGL,
        wgpu::Backend::BrowserWebGpu => GraphicsBackendType::WebGpu,
        wgpu::Backend::Noop => GraphicsBackendType::Unknown,
    }
}

/// Convert a WGPU device type to our generic device type.
pub fn device_type_from_wgpu(device_type: wgpu::DeviceType) -> RendererDeviceType {
    match device_type {
        wgpu::DeviceType::IntegratedGpu => RendererDeviceType::IntegratedGpu,
        wgpu::DeviceType::DiscreteGpu => RendererDeviceType::DiscreteGpu,
        wgpu::DeviceType::VirtualGpu => RendererDeviceType::VirtualGpu,
        wgpu::DeviceType::Cpu => RendererDeviceType::Cpu,
        wgpu::DeviceType::Other => RendererDeviceType::Unknown,
    }
}

/// `wgpu` does not report dedicated memory; the largest buffer a discrete
/// adapter accepts stands in for it, and every other kind reports none.
pub fn dedicated_memory_estimate(device_type: RendererDeviceType, max_buffer_size: u64) -> u64 {
    match device_type {
        RendererDeviceType::DiscreteGpu => max_buffer_size,
        _ => 0,
    }
}

/// Builds our adapter description from what `wgpu` reports.
pub fn adapter_info_from_wgpu(info: &wgpu::AdapterInfo, limits: &wgpu::Limits) -> GraphicsAdapterInfo {
    let device_type = device_type_from_wgpu(info.device_type);
    GraphicsAdapterInfo {
        name: info.name.clone(),
        vendor: info.vendor,
        device: info.device,
        backend_type: backend_type_from_wgpu(info.backend),
        device_type,
        dedicated_video_memory: dedicated_memory_estimate(device_type, limits.max_buffer_size),
        is_software: device_type == RendererDeviceType::Cpu,
    }
}

/// Maps a surface acquisition failure to a presentation error.
pub fn present_error_from_wgpu(error: wgpu::SurfaceError) -> PresentError {
    match error {
        wgpu::SurfaceError::Lost => PresentError::Lost,
        wgpu::SurfaceError::Outdated => PresentError::Outdated,
        wgpu::SurfaceError::Timeout => PresentError::Timeout,
        wgpu::SurfaceError::OutOfMemory => PresentError::OutOfMemory,
        other => PresentError::Other(other.to_string()),
    }
}

/// Picks the present mode for the vsync setting, falling back to FIFO.
pub fn present_mode_for(vsync: bool, supported: &[wgpu::PresentMode]) -> wgpu::PresentMode {
    let preferred: &[wgpu::PresentMode] = if vsync {
        &[wgpu::PresentMode::Fifo]
    } else {
        &[wgpu::PresentMode::Mailbox, wgpu::PresentMode::Immediate]
    };
    preferred
        .iter()
        .copied()
        .find(|mode| supported.contains(mode))
        .unwrap_or(wgpu::PresentMode::Fifo)
}
