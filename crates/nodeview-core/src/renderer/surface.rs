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

//! The composition root: one window's worth of rendering state.

use crate::renderer::api::{
    CameraState, ClearTargets, RenderSurfaceConfig, ScissorRect, TextureFormat, Viewport,
};
use crate::renderer::command::{CommandSubmission, LocalContext};
use crate::renderer::depth_buffer::DepthBuffer;
use crate::renderer::error::{DrawError, InitError, ResizeError};
use crate::renderer::fence::FenceSync;
use crate::renderer::swap_chain::SwapChainManager;
use crate::renderer::traits::{CommandQueue, GraphicsDevice, PresentationSurface};
use std::sync::Arc;

/// Whether a [`RenderSurface`] can currently draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    /// Created but never successfully resized.
    Uninitialized,
    /// Buffers are bound and frames are drawn.
    Ready,
    /// The window has a zero-sized client area.
    Suspended,
    /// The last resize failed or presentation reported the surface lost.
    NeedsResize,
}

/// Owns the command submission, swap chain and depth buffer of one window
/// and drives them through resizes and frames.
#[derive(Debug)]
pub struct RenderSurface {
    device: Arc<dyn GraphicsDevice>,
    fence: Arc<FenceSync>,
    submission: CommandSubmission,
    swap_chain: SwapChainManager,
    depth: DepthBuffer,
    config: RenderSurfaceConfig,
    viewport: Viewport,
    scissor: ScissorRect,
    state: SurfaceState,
    frames_drawn: u64,
}

impl RenderSurface {
    /// Assembles a render surface from an already created device, queue and
    /// presentation surface.
    ///
    /// No buffers exist until the first successful [`resize`](Self::resize).
    pub fn new(
        device: Arc<dyn GraphicsDevice>,
        queue: Arc<dyn CommandQueue>,
        surface: Box<dyn PresentationSurface>,
        config: RenderSurfaceConfig,
    ) -> Result<Self, InitError> {
        config.validate()?;

        let fence = Arc::new(FenceSync::new(queue, config.fence_timeout));
        let recorder = device.create_command_recorder()?;
        let submission = CommandSubmission::new(recorder, fence.clone());

        let swap_chain = SwapChainManager::new(device.clone(), surface, config.buffer_count)?;
        if swap_chain.format() != config.color_format {
            log::info!(
                "Swap chain negotiated {:?} instead of the requested {:?}",
                swap_chain.format(),
                config.color_format
            );
        }
        let depth = DepthBuffer::new(
            device.clone(),
            config.depth_format,
            config.depth_clear_value,
            config.stencil_clear_value,
        )?;

        log::info!(
            "Render surface created on \"{}\" ({} buffers, {:?} depth)",
            device.adapter_info().name,
            config.buffer_count,
            config.depth_format
        );

        Ok(Self {
            device,
            fence,
            submission,
            swap_chain,
            depth,
            config,
            viewport: Viewport::full(0, 0),
            scissor: ScissorRect::full(0, 0),
            state: SurfaceState::Uninitialized,
            frames_drawn: 0,
        })
    }

    /// Rebuilds the color and depth buffers at `width` x `height`.
    ///
    /// The GPU is flushed before anything is released and again once the new
    /// resources exist. A zero-sized area suspends drawing. Any failure,
    /// including a flush that times out, leaves the buffers empty and the
    /// surface in [`SurfaceState::NeedsResize`] until a later resize succeeds.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), ResizeError> {
        log::debug!("Resizing render surface to {width}x{height}");
        let flushed = match self.fence.flush_and_wait_idle() {
            Ok(value) => value,
            Err(e) => {
                self.state = SurfaceState::NeedsResize;
                return Err(e.into());
            }
        };
        log::trace!("GPU idle at fence value {flushed}, rebuilding buffers");

        if width == 0 || height == 0 {
            self.swap_chain.release();
            self.depth.release();
            self.state = SurfaceState::Suspended;
            log::debug!("Render surface suspended");
            return Ok(());
        }

        let rebuilt = self
            .swap_chain
            .resize(width, height)
            .and_then(|()| self.depth.resize(width, height))
            .and_then(|()| {
                self.fence
                    .flush_and_wait_idle()
                    .map(drop)
                    .map_err(ResizeError::from)
            });
        if let Err(e) = rebuilt {
            log::error!("Resize to {width}x{height} failed: {e}");
            self.swap_chain.release();
            self.depth.release();
            self.state = SurfaceState::NeedsResize;
            return Err(e);
        }

        self.viewport = Viewport::full(width, height);
        self.scissor = ScissorRect::full(width, height);
        self.state = SurfaceState::Ready;
        log::info!("Render surface resized to {width}x{height}");
        Ok(())
    }

    /// Records, submits and presents one frame.
    ///
    /// Does nothing unless the surface is [`SurfaceState::Ready`]. A lost or
    /// outdated presentation surface moves it to
    /// [`SurfaceState::NeedsResize`] and the frame is skipped.
    pub fn draw(&mut self, camera: &CameraState) -> Result<(), DrawError> {
        if self.state != SurfaceState::Ready {
            log::trace!("Skipping draw while {:?}", self.state);
            return Ok(());
        }
        let Some(back_buffer) = self.swap_chain.current_buffer().copied() else {
            return Ok(());
        };

        self.fence.wait_until(self.submission.last_submitted())?;
        self.device.write_frame_constants(camera)?;

        let targets = ClearTargets {
            color: Some(back_buffer.rtv),
            depth: Some(self.depth.slot()),
            clear_stencil: self.depth.format().has_stencil(),
            values: self.config.clear_values(),
        };

        let mut context = LocalContext::new(&mut self.submission);
        let Some(submission) = context.get() else {
            return context.into_result().map_err(DrawError::from);
        };

        submission.set_viewport_and_scissor(&self.viewport, &self.scissor)?;
        submission.clear(&targets);
        if let Err(e) = self.swap_chain.prepare_present(submission.recorder_mut()) {
            if e.needs_resize() {
                log::warn!("Presentation surface needs a resize: {e}");
                self.state = SurfaceState::NeedsResize;
            }
            return Err(e.into());
        }
        let fence_value = submission.submit()?;
        drop(context);

        if let Err(e) = self.swap_chain.present() {
            if e.needs_resize() {
                log::warn!("Presentation surface needs a resize: {e}");
                self.state = SurfaceState::NeedsResize;
            }
            return Err(e.into());
        }

        self.frames_drawn += 1;
        log::trace!("Frame {} submitted with fence value {fence_value}", self.frames_drawn);
        Ok(())
    }

    /// Whether the surface can currently draw.
    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// Fence value of the most recent frame, 0 before the first one.
    pub fn last_frame_fence(&self) -> u64 {
        self.submission.last_submitted()
    }

    /// Number of frames submitted so far.
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// The fence shared by every submission of this surface.
    pub fn fence(&self) -> &Arc<FenceSync> {
        &self.fence
    }

    /// The swap chain.
    pub fn swap_chain(&self) -> &SwapChainManager {
        &self.swap_chain
    }

    /// The depth buffer.
    pub fn depth_buffer(&self) -> &DepthBuffer {
        &self.depth
    }

    /// The full-surface viewport applied to every frame.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The full-surface scissor applied to every frame.
    pub fn scissor(&self) -> ScissorRect {
        self.scissor
    }

    /// The negotiated color format.
    pub fn color_format(&self) -> TextureFormat {
        self.swap_chain.format()
    }

    /// The configuration the surface was created with.
    pub fn config(&self) -> &RenderSurfaceConfig {
        &self.config
    }
}

impl Drop for RenderSurface {
    fn drop(&mut self) {
        if let Err(e) = self.fence.flush_and_wait_idle() {
            log::warn!("GPU flush at shutdown failed: {e}");
        }
        self.swap_chain.release();
        self.depth.release();
        log::debug!("Render surface released after {} frames", self.frames_drawn);
    }
}
