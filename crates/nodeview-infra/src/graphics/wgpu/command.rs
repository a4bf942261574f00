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

use super::context::{ResourceRegistry, WgpuContext};
use super::conversions::IntoWgpu;
use nodeview_core::renderer::api::{ClearTargets, ScissorRect, Viewport};
use nodeview_core::renderer::error::CommandError;
use nodeview_core::renderer::traits::CommandRecorder;
use std::any::Any;
use std::sync::Arc;

/// A `wgpu` command encoder that is recreated on every reset.
///
/// Viewport and scissor are render-pass state in `wgpu`, so they are kept
/// here and applied to each pass the recorder opens.
#[derive(Debug)]
pub struct WgpuCommandRecorder {
    context: Arc<WgpuContext>,
    resources: Arc<ResourceRegistry>,
    encoder: Option<wgpu::CommandEncoder>,
    finished: Option<wgpu::CommandBuffer>,
    viewport: Option<Viewport>,
    scissor: Option<ScissorRect>,
}

impl WgpuCommandRecorder {
    pub(crate) fn new(context: Arc<WgpuContext>, resources: Arc<ResourceRegistry>) -> Self {
        Self {
            context,
            resources,
            encoder: None,
            finished: None,
            viewport: None,
            scissor: None,
        }
    }

    /// The open encoder, for backend code that records outside of passes.
    pub fn encoder_mut(&mut self) -> Option<&mut wgpu::CommandEncoder> {
        self.encoder.as_mut()
    }

    /// Takes the command buffer produced by the last [`close`](CommandRecorder::close).
    pub fn take_finished(&mut self) -> Option<wgpu::CommandBuffer> {
        self.finished.take()
    }
}

fn apply_regions(
    pass: &mut wgpu::RenderPass<'_>,
    viewport: Option<&Viewport>,
    scissor: Option<&ScissorRect>,
) {
    if let Some(vp) = viewport {
        pass.set_viewport(vp.x, vp.y, vp.width, vp.height, vp.min_depth, vp.max_depth);
    }
    if let Some(rect) = scissor {
        pass.set_scissor_rect(
            rect.left.max(0) as u32,
            rect.top.max(0) as u32,
            rect.width(),
            rect.height(),
        );
    }
}

impl CommandRecorder for WgpuCommandRecorder {
    fn reset(&mut self) -> Result<(), CommandError> {
        if self.context.is_lost() {
            return Err(CommandError::ResetFailed("device lost".to_string()));
        }
        self.finished = None;
        self.viewport = None;
        self.scissor = None;
        self.encoder = Some(self.context.device.create_command_encoder(
            &wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            },
        ));
        Ok(())
    }

    fn set_viewport(&mut self, viewport: &Viewport) {
        self.viewport = Some(*viewport);
    }

    fn set_scissor_rect(&mut self, rect: &ScissorRect) {
        self.scissor = Some(*rect);
    }

    fn clear_targets(&mut self, targets: &ClearTargets) {
        let color_view = match targets.color.map(|slot| self.resources.view(slot)).transpose() {
            Ok(view) => view,
            Err(e) => {
                log::error!("Cannot clear render target: {e}");
                return;
            }
        };
        let depth_view = match targets.depth.map(|slot| self.resources.view(slot)).transpose() {
            Ok(view) => view,
            Err(e) => {
                log::error!("Cannot clear depth target: {e}");
                return;
            }
        };

        let color_attachment = color_view.as_ref().map(|view| wgpu::RenderPassColorAttachment {
            view,
            depth_slice: None,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(targets.values.color.into_wgpu()),
                store: wgpu::StoreOp::Store,
            },
        });
        let depth_attachment =
            depth_view
                .as_ref()
                .map(|view| wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(targets.values.depth),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: targets.clear_stencil.then_some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(targets.values.stencil),
                        store: wgpu::StoreOp::Store,
                    }),
                });

        let Some(encoder) = self.encoder.as_mut() else {
            log::error!("clear_targets recorded without an open encoder");
            return;
        };
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Clear Pass"),
            color_attachments: &[color_attachment],
            depth_stencil_attachment: depth_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        apply_regions(&mut pass, self.viewport.as_ref(), self.scissor.as_ref());
    }

    fn close(&mut self) -> Result<(), CommandError> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| CommandError::CloseFailed("no open encoder".to_string()))?;
        self.finished = Some(encoder.finish());
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
