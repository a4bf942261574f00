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
use super::conversions::{present_error_from_wgpu, present_mode_for, texture_format_from_wgpu, IntoWgpu};
use anyhow::{anyhow, Result};
use nodeview_core::renderer::api::{TextureFormat, TextureId};
use nodeview_core::renderer::error::{PresentError, ResourceError};
use nodeview_core::renderer::traits::{CommandRecorder, PresentationSurface};
use std::sync::Arc;

/// The window surface of the `wgpu` backend.
///
/// `wgpu` hands out one surface image per frame instead of a fixed ring,
/// so the ring is a set of offscreen textures in the surface format. The
/// frame renders into one of them and [`prepare_present`](PresentationSurface::prepare_present)
/// copies it into the acquired surface image inside the same submission.
#[derive(Debug)]
pub struct WgpuPresentationSurface {
    context: Arc<WgpuContext>,
    resources: Arc<ResourceRegistry>,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    ring: Vec<TextureId>,
    pending: Option<wgpu::SurfaceTexture>,
}

/// Picks the surface format: the requested one, else its sRGB counterpart,
/// else the first format the surface offers that we understand.
pub fn negotiate_format(
    requested: TextureFormat,
    available: &[wgpu::TextureFormat],
) -> Option<TextureFormat> {
    let offered = |format: TextureFormat| available.contains(&format.into_wgpu());
    if offered(requested) {
        return Some(requested);
    }
    if let Some(counterpart) = requested.srgb_counterpart().filter(|f| offered(*f)) {
        return Some(counterpart);
    }
    available
        .iter()
        .copied()
        .filter_map(texture_format_from_wgpu)
        .find(|f| !f.is_depth())
}

impl WgpuPresentationSurface {
    /// Configures `surface` for the adapter in `context`.
    ///
    /// ## Errors
    /// Fails when the surface offers no usable color format or cannot be a copy destination.
    pub fn new(
        context: Arc<WgpuContext>,
        resources: Arc<ResourceRegistry>,
        surface: wgpu::Surface<'static>,
        requested: TextureFormat,
        vsync: bool,
        size: (u32, u32),
    ) -> Result<Self> {
        let caps = surface.get_capabilities(&context.adapter);
        let format = negotiate_format(requested, &caps.formats)
            .ok_or_else(|| anyhow!("surface offers no supported color format: {:?}", caps.formats))?;
        if format != requested {
            log::warn!("Requested swap chain format {requested:?} unavailable, using {format:?}");
        }
        if !caps.usages.contains(wgpu::TextureUsages::COPY_DST) {
            return Err(anyhow!("surface images cannot be used as copy destinations"));
        }
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_DST,
            format: format.into_wgpu(),
            width: size.0.max(1),
            height: size.1.max(1),
            present_mode: present_mode_for(vsync, &caps.present_modes),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        log::debug!(
            "Surface configured: {:?} {:?} {}x{}",
            config.format,
            config.present_mode,
            config.width,
            config.height
        );

        Ok(Self {
            context,
            resources,
            surface,
            config,
            format,
            ring: Vec::new(),
            pending: None,
        })
    }
}

impl PresentationSurface for WgpuPresentationSurface {
    fn format(&self) -> TextureFormat {
        self.format
    }

    fn resize_buffers(&mut self, count: u32, width: u32, height: u32) -> Result<(), ResourceError> {
        self.config.width = width;
        self.config.height = height;
        self.context
            .scoped("Surface configuration", || {
                self.surface.configure(&self.context.device, &self.config)
            })
            .map_err(|e| ResourceError::BackendError(e.to_string()))?;

        for index in 0..count {
            let texture = self
                .context
                .scoped("Swap chain buffer creation", || {
                    self.context.device.create_texture(&wgpu::TextureDescriptor {
                        label: Some("Swap Chain Buffer"),
                        size: wgpu::Extent3d {
                            width,
                            height,
                            depth_or_array_layers: 1,
                        },
                        mip_level_count: 1,
                        sample_count: 1,
                        dimension: wgpu::TextureDimension::D2,
                        format: self.config.format,
                        usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                            | wgpu::TextureUsages::COPY_SRC,
                        view_formats: &[],
                    })
                })
                .map_err(|e| {
                    self.release_buffers();
                    ResourceError::CreationFailed(format!("buffer {index}: {e}"))
                })?;
            self.ring.push(self.resources.insert_texture(texture, self.format));
        }
        Ok(())
    }

    fn buffer(&self, index: u32) -> Result<TextureId, ResourceError> {
        self.ring
            .get(index as usize)
            .copied()
            .ok_or_else(|| ResourceError::BackendError(format!("swap chain has no buffer {index}")))
    }

    fn release_buffers(&mut self) {
        self.pending = None;
        for id in self.ring.drain(..) {
            if let Err(e) = self.resources.destroy_texture(id) {
                log::warn!("Failed to release swap chain buffer: {e}");
            }
        }
    }

    fn prepare_present(
        &mut self,
        recorder: &mut dyn CommandRecorder,
        index: u32,
    ) -> Result<(), PresentError> {
        let back_buffer = self
            .ring
            .get(index as usize)
            .copied()
            .ok_or_else(|| PresentError::Other(format!("swap chain has no buffer {index}")))?;
        let (source, _) = self
            .resources
            .texture(back_buffer)
            .map_err(|e| PresentError::Other(e.to_string()))?;

        let frame = self
            .surface
            .get_current_texture()
            .map_err(present_error_from_wgpu)?;
        if frame.suboptimal {
            log::debug!("Surface image is suboptimal; a resize will follow");
        }

        let encoder = recorder
            .as_any_mut()
            .downcast_mut::<WgpuCommandRecorder>()
            .and_then(WgpuCommandRecorder::encoder_mut)
            .ok_or_else(|| PresentError::Other("no open wgpu encoder to present from".into()))?;
        encoder.copy_texture_to_texture(
            source.as_image_copy(),
            frame.texture.as_image_copy(),
            wgpu::Extent3d {
                width: self.config.width,
                height: self.config.height,
                depth_or_array_layers: 1,
            },
        );
        self.pending = Some(frame);
        Ok(())
    }

    fn present(&mut self) -> Result<(), PresentError> {
        let frame = self
            .pending
            .take()
            .ok_or_else(|| PresentError::Other("no frame was prepared".into()))?;
        frame.present();
        Ok(())
    }
}

impl Drop for WgpuPresentationSurface {
    fn drop(&mut self) {
        self.release_buffers();
    }
}
