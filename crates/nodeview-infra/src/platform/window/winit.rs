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

//! The sandbox's window, backed by `winit`.

use nodeview_core::platform::{NodeviewWindow, NodeviewWindowHandle};
use std::sync::Arc;
use winit::{dpi::LogicalSize, error::OsError, event_loop::ActiveEventLoop, window::Window};

/// A shared `winit` window.
#[derive(Debug, Clone)]
pub struct WinitWindow(Arc<Window>);

/// Collects the attributes of a [`WinitWindow`] before the event loop creates it.
pub struct WinitWindowBuilder {
    title: String,
    size: LogicalSize<u32>,
}

impl WinitWindowBuilder {
    pub fn new() -> Self {
        Self {
            title: "NodeView".to_string(),
            size: LogicalSize::new(1280, 720),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// # Errors
    /// Returns the `OsError` reported by `winit`.
    pub fn build(self, event_loop: &ActiveEventLoop) -> Result<WinitWindow, OsError> {
        let window = event_loop.create_window(
            Window::default_attributes()
                .with_title(&self.title)
                .with_inner_size(self.size),
        )?;
        log::info!(
            "Opened window '{}' ({}x{} logical, id {:?})",
            self.title,
            self.size.width,
            self.size.height,
            window.id()
        );
        Ok(WinitWindow(Arc::new(window)))
    }
}

impl Default for WinitWindowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeviewWindow for WinitWindow {
    fn inner_size(&self) -> (u32, u32) {
        let size = self.0.inner_size();
        (size.width, size.height)
    }

    fn request_redraw(&self) {
        self.0.request_redraw();
    }

    fn surface_handle(&self) -> NodeviewWindowHandle {
        self.0.clone()
    }
}
