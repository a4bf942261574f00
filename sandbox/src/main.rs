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

// NodeView Sandbox
// Opens a window and keeps a render surface in step with it.

mod camera;

use anyhow::{Context, Result};
use nodeview_core::platform::NodeviewWindow;
use nodeview_core::renderer::{DrawError, RenderSurface, RenderSurfaceConfig};
use nodeview_infra::{create_render_surface, WinitWindow, WinitWindowBuilder};
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

const CONFIG_ENV: &str = "NODEVIEW_CONFIG";

/// Loads the surface configuration from the JSON file named by `NODEVIEW_CONFIG`, if any.
fn load_config() -> Result<RenderSurfaceConfig> {
    let Ok(path) = std::env::var(CONFIG_ENV) else {
        return Ok(RenderSurfaceConfig::default());
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let config = serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    log::info!("Loaded render surface configuration from {path}");
    Ok(config)
}

struct SandboxState {
    config: RenderSurfaceConfig,
    window: Option<WinitWindow>,
    surface: Option<RenderSurface>,
    started: Instant,
}

impl SandboxState {
    fn new(config: RenderSurfaceConfig) -> Self {
        Self {
            config,
            window: None,
            surface: None,
            started: Instant::now(),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(surface) = self.surface.as_mut() {
            log::info!("Window resized to {width}x{height}");
            if let Err(e) = surface.resize(width, height) {
                log::error!("Resize to {width}x{height} failed: {e}");
            }
        }
    }

    fn redraw(&mut self) {
        let (Some(window), Some(surface)) = (self.window.as_ref(), self.surface.as_mut()) else {
            return;
        };
        let (width, height) = window.inner_size();
        let camera = camera::orbit(self.started.elapsed().as_secs_f32(), width, height);

        match surface.draw(&camera) {
            Ok(()) => log::trace!("Frame {} drawn", surface.frames_drawn()),
            Err(DrawError::Present(e)) if e.needs_resize() => {
                log::warn!("Surface out of date ({e}), rebuilding");
                if let Err(e) = surface.resize(width, height) {
                    log::error!("Rebuilding the surface failed: {e}");
                }
            }
            Err(e) => log::error!("Frame skipped: {e}"),
        }
    }
}

impl ApplicationHandler for SandboxState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match WinitWindowBuilder::new().with_title("NodeView Sandbox").build(event_loop) {
            Ok(window) => window,
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };
        let surface = match create_render_surface(&window, self.config.clone()) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create render surface: {e}");
                event_loop.exit();
                return;
            }
        };

        let (width, height) = window.inner_size();
        self.window = Some(window);
        self.surface = Some(surface);
        self.resize(width, height);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Shutdown requested, exiting event loop...");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}

impl Drop for SandboxState {
    fn drop(&mut self) {
        // The surface flushes the GPU on drop and must go before its window.
        if let Some(surface) = self.surface.take() {
            log::info!("Shutting down after {} frame(s)", surface.frames_drawn());
        }
        self.window = None;
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("wgpu_hal", log::LevelFilter::Error)
        .init();

    let config = load_config()?;
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut state = SandboxState::new(config);
    event_loop.run_app(&mut state)?;
    Ok(())
}
