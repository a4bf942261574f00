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

//! The `wgpu` implementation of the render core's backend traits.

mod adapter;
mod command;
mod context;
mod conversions;
mod device;
mod factory;
mod queue;
mod surface;

pub use self::adapter::WgpuAdapterProvider;
pub use self::command::WgpuCommandRecorder;
pub use self::context::{ResourceRegistry, WgpuContext};
pub use self::conversions::IntoWgpu;
pub use self::device::WgpuDevice;
pub use self::factory::create_render_surface;
pub use self::queue::WgpuQueue;
pub use self::surface::{negotiate_format, WgpuPresentationSurface};
