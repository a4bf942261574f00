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

//! Defines the backend contracts of the render core.
//!
//! These traits decouple the synchronization and resource-lifecycle logic from
//! any specific graphics API.
//!
//! - [`AdapterProvider`]: Enumerates adapters and creates devices on them.
//! - [`GraphicsDevice`]: Creates descriptor heaps, depth textures, views and recorders.
//! - [`CommandQueue`]: Executes recorded work and exposes the queue fence.
//! - [`CommandRecorder`]: Records commands into a reusable command buffer.
//! - [`PresentationSurface`]: Owns the presentable images of a window.

mod adapter_provider;
mod command_queue;
mod command_recorder;
mod graphics_device;
mod presentation_surface;

pub use self::adapter_provider::AdapterProvider;
pub use self::command_queue::*;
pub use self::command_recorder::CommandRecorder;
pub use self::graphics_device::GraphicsDevice;
pub use self::presentation_surface::PresentationSurface;
