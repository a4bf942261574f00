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

//! # NodeView Core
//!
//! Backend-agnostic contracts and components for GPU command submission,
//! CPU/GPU fence synchronization, descriptor allocation and swap-chain
//! lifecycle management.
//!
//! The concrete graphics backend lives in `nodeview-infra`; everything in this
//! crate talks to it exclusively through the traits in [`renderer::traits`].

#![warn(missing_docs)]

pub mod platform;
pub mod renderer;

pub use platform::window::{NodeviewWindowHandle, WindowHandle};
pub use renderer::RenderSurface;
