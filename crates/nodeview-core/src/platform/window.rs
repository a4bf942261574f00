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

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use std::sync::Arc;

/// Window and display handle in one object-safe trait.
pub trait WindowHandle: HasWindowHandle + HasDisplayHandle {}

impl<T: HasWindowHandle + HasDisplayHandle> WindowHandle for T {}

/// Owned handle a presentation surface keeps alive for as long as it exists.
pub type NodeviewWindowHandle = Arc<dyn WindowHandle + Send + Sync>;

/// A host window a [`RenderSurface`](crate::renderer::RenderSurface) can present into.
pub trait NodeviewWindow: Send + Sync {
    /// Client area in physical pixels.
    fn inner_size(&self) -> (u32, u32);

    /// Asks the host for another frame.
    fn request_redraw(&self);

    /// The native handle the backend builds its presentation surface from.
    fn surface_handle(&self) -> NodeviewWindowHandle;
}
