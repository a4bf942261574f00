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

use crate::renderer::api::{TextureFormat, TextureId};
use crate::renderer::error::{PresentError, ResourceError};
use crate::renderer::traits::CommandRecorder;
use std::fmt::Debug;

/// A trait for the window-bound ring of presentable images.
///
/// The surface owns the images; the
/// [`SwapChainManager`](crate::renderer::SwapChainManager) owns the views
/// onto them and decides when they are rebuilt.
pub trait PresentationSurface: Send + Debug {
    /// The format the images were negotiated at.
    fn format(&self) -> TextureFormat;

    /// Recreates the image ring at the given size.
    ///
    /// Must only be called after [`release_buffers`](Self::release_buffers)
    /// and while the GPU is idle.
    /// ## Errors
    /// * `ResourceError` - If the images could not be recreated; the ring is empty afterwards.
    fn resize_buffers(&mut self, count: u32, width: u32, height: u32)
        -> Result<(), ResourceError>;

    /// Returns the image at `index` in the ring.
    fn buffer(&self, index: u32) -> Result<TextureId, ResourceError>;

    /// Drops every reference the surface holds to its images.
    fn release_buffers(&mut self);

    /// Records whatever the presentation engine needs to show image `index`.
    ///
    /// Called with the frame's recorder still open, before it is submitted.
    fn prepare_present(
        &mut self,
        recorder: &mut dyn CommandRecorder,
        index: u32,
    ) -> Result<(), PresentError>;

    /// Presents the image prepared by [`prepare_present`](Self::prepare_present).
    fn present(&mut self) -> Result<(), PresentError>;
}
