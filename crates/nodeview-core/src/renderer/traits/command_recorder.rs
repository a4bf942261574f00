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

use crate::renderer::api::{ClearTargets, ScissorRect, Viewport};
use crate::renderer::error::CommandError;
use std::any::Any;

/// A trait for a reusable command buffer paired with its allocator.
///
/// The backend only sees commands; the open/closed bookkeeping lives in
/// [`CommandSubmission`](crate::renderer::CommandSubmission).
pub trait CommandRecorder: Send {
    /// Resets the allocator and reopens the buffer for recording.
    /// ## Errors
    /// * `CommandError::ResetFailed` - If the backend refuses the reset.
    fn reset(&mut self) -> Result<(), CommandError>;

    /// Sets the viewport for subsequent commands.
    fn set_viewport(&mut self, viewport: &Viewport);

    /// Sets the scissor rectangle for subsequent commands.
    ///
    /// Callers only pass rectangles for which [`ScissorRect::is_valid`] holds.
    fn set_scissor_rect(&mut self, rect: &ScissorRect);

    /// Clears the given render-target and depth-stencil views.
    fn clear_targets(&mut self, targets: &ClearTargets);

    /// Closes the buffer so it can be submitted.
    fn close(&mut self) -> Result<(), CommandError>;

    /// Downcast hook for the backend that produced this recorder.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
