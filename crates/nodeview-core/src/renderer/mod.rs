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

//! GPU command submission, fence synchronization and the resource lifecycle
//! of a window's render targets.
//!
//! The components build on each other leaf-first: [`AdapterSelector`],
//! [`FenceSync`], [`DescriptorAllocator`], [`CommandSubmission`],
//! [`SwapChainManager`], and finally [`RenderSurface`], which owns the rest.

pub mod api;
pub mod error;
pub mod traits;

mod adapter_selector;
mod command;
mod depth_buffer;
mod descriptor_allocator;
mod fence;
mod surface;
mod swap_chain;

#[cfg(test)]
mod test_support;

pub use self::adapter_selector::AdapterSelector;
pub use self::api::*;
pub use self::command::{CommandSubmission, LocalContext, SubmissionState};
pub use self::depth_buffer::DepthBuffer;
pub use self::descriptor_allocator::DescriptorAllocator;
pub use self::error::*;
pub use self::fence::FenceSync;
pub use self::surface::{RenderSurface, SurfaceState};
pub use self::swap_chain::{SwapChainBuffer, SwapChainManager};
pub use self::traits::*;
