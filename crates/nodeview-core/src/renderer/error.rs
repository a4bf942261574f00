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

//! Defines the hierarchy of error types for the render core.

use crate::renderer::api::{DescriptorHeapId, ScissorRect, TextureId};
use std::fmt;
use std::time::Duration;

/// An error raised by a backend while creating, binding or destroying a resource.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// The backend failed to create the resource.
    CreationFailed(String),
    /// The texture id does not name a live texture.
    TextureNotFound(TextureId),
    /// The descriptor heap id does not name a live heap.
    HeapNotFound(DescriptorHeapId),
    /// A descriptor slot index lies past the end of its heap.
    SlotOutOfRange {
        /// The heap that was addressed.
        heap: DescriptorHeapId,
        /// The offending slot index.
        index: u32,
    },
    /// A backend-specific failure.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::CreationFailed(msg) => write!(f, "Resource creation failed: {msg}"),
            ResourceError::TextureNotFound(id) => write!(f, "Texture not found: {id:?}"),
            ResourceError::HeapNotFound(id) => write!(f, "Descriptor heap not found: {id:?}"),
            ResourceError::SlotOutOfRange { heap, index } => {
                write!(f, "Descriptor slot {index} is out of range for heap {heap:?}")
            }
            ResourceError::BackendError(msg) => write!(f, "Backend error: {msg}"),
        }
    }
}

impl std::error::Error for ResourceError {}

/// The reason a fence wait gave up on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LostCause {
    /// The wait exceeded its time bound.
    TimedOut(Duration),
    /// The backend reported the device as removed or reset.
    DeviceRemoved,
}

/// An error raised by [`FenceSync`](crate::renderer::FenceSync).
#[derive(Debug, Clone, PartialEq)]
pub enum FenceError {
    /// The device stopped making progress while a wait was pending.
    DeviceLost {
        /// The fence value that was being waited on.
        target: u64,
        /// The last completed value observed before giving up.
        last_completed: u64,
        /// Why the wait gave up.
        cause: LostCause,
    },
    /// A wait targeted a value no submission has carried yet.
    NeverSignaled {
        /// The fence value that was requested.
        target: u64,
        /// The next value that will be signaled.
        next_value: u64,
    },
    /// The queue refused to schedule the signal.
    SignalFailed(String),
}

impl FenceError {
    /// Returns `true` when the error means the device is unusable.
    pub fn is_device_lost(&self) -> bool {
        matches!(self, FenceError::DeviceLost { .. })
    }
}

impl fmt::Display for FenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenceError::DeviceLost {
                target,
                last_completed,
                cause,
            } => match cause {
                LostCause::TimedOut(timeout) => write!(
                    f,
                    "Device lost: fence value {target} not reached within {timeout:?} (last completed {last_completed})"
                ),
                LostCause::DeviceRemoved => write!(
                    f,
                    "Device lost: removed while waiting for fence value {target} (last completed {last_completed})"
                ),
            },
            FenceError::NeverSignaled { target, next_value } => write!(
                f,
                "Fence value {target} has never been signaled (next value is {next_value})"
            ),
            FenceError::SignalFailed(msg) => write!(f, "Fence signal failed: {msg}"),
        }
    }
}

impl std::error::Error for FenceError {}

/// An error raised while recording or submitting commands.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// The backend refused to reset the allocator or reopen the command buffer.
    ResetFailed(String),
    /// A scissor rectangle that encloses no pixel was rejected.
    InvalidRegion(ScissorRect),
    /// The backend failed to close the command buffer.
    CloseFailed(String),
    /// The backend failed to execute the command buffer.
    SubmitFailed(String),
    /// Creating the command recorder failed.
    Resource(ResourceError),
    /// Advancing the fence after submission failed.
    Fence(FenceError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::ResetFailed(msg) => write!(f, "Command buffer reset failed: {msg}"),
            CommandError::InvalidRegion(rect) => write!(
                f,
                "Invalid scissor region: left {} right {} top {} bottom {}",
                rect.left, rect.right, rect.top, rect.bottom
            ),
            CommandError::CloseFailed(msg) => write!(f, "Command buffer close failed: {msg}"),
            CommandError::SubmitFailed(msg) => write!(f, "Command submission failed: {msg}"),
            CommandError::Resource(e) => write!(f, "{e}"),
            CommandError::Fence(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Resource(e) => Some(e),
            CommandError::Fence(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FenceError> for CommandError {
    fn from(err: FenceError) -> Self {
        CommandError::Fence(err)
    }
}

impl From<ResourceError> for CommandError {
    fn from(err: ResourceError) -> Self {
        CommandError::Resource(err)
    }
}

/// An error raised when the presentation engine refuses a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentError {
    /// The surface was lost and must be recreated.
    Lost,
    /// The surface no longer matches the window and must be resized.
    Outdated,
    /// Acquiring the next image timed out.
    Timeout,
    /// The presentation engine ran out of memory.
    OutOfMemory,
    /// Any other backend failure.
    Other(String),
}

impl PresentError {
    /// Returns `true` when a resize is required before the next frame.
    pub fn needs_resize(&self) -> bool {
        matches!(self, PresentError::Lost | PresentError::Outdated)
    }
}

impl fmt::Display for PresentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresentError::Lost => write!(f, "Presentation surface lost"),
            PresentError::Outdated => write!(f, "Presentation surface outdated"),
            PresentError::Timeout => write!(f, "Timed out acquiring the next surface image"),
            PresentError::OutOfMemory => write!(f, "Out of memory while presenting"),
            PresentError::Other(msg) => write!(f, "Presentation failed: {msg}"),
        }
    }
}

impl std::error::Error for PresentError {}

/// An error raised by [`RenderSurface::resize`](crate::renderer::RenderSurface::resize).
#[derive(Debug, Clone, PartialEq)]
pub enum ResizeError {
    /// The presentation surface refused to resize its buffers.
    ResizeFailed(String),
    /// Creating or binding a buffer or view failed.
    Resource(ResourceError),
    /// The idle flush around the resize failed.
    Fence(FenceError),
}

impl fmt::Display for ResizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResizeError::ResizeFailed(msg) => write!(f, "Swap chain resize failed: {msg}"),
            ResizeError::Resource(e) => write!(f, "Resize resource error: {e}"),
            ResizeError::Fence(e) => write!(f, "Resize flush failed: {e}"),
        }
    }
}

impl std::error::Error for ResizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResizeError::Resource(e) => Some(e),
            ResizeError::Fence(e) => Some(e),
            ResizeError::ResizeFailed(_) => None,
        }
    }
}

impl From<ResourceError> for ResizeError {
    fn from(err: ResourceError) -> Self {
        ResizeError::Resource(err)
    }
}

impl From<FenceError> for ResizeError {
    fn from(err: FenceError) -> Self {
        ResizeError::Fence(err)
    }
}

/// An error raised by [`RenderSurface::draw`](crate::renderer::RenderSurface::draw).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawError {
    /// Recording or submitting the frame failed.
    Command(CommandError),
    /// Waiting for the frame's buffer to become free failed.
    Fence(FenceError),
    /// Uploading frame constants failed.
    Resource(ResourceError),
    /// Presenting the frame failed.
    Present(PresentError),
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawError::Command(e) => write!(f, "Draw failed: {e}"),
            DrawError::Fence(e) => write!(f, "Draw failed: {e}"),
            DrawError::Resource(e) => write!(f, "Draw failed: {e}"),
            DrawError::Present(e) => write!(f, "Draw failed: {e}"),
        }
    }
}

impl std::error::Error for DrawError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DrawError::Command(e) => Some(e),
            DrawError::Fence(e) => Some(e),
            DrawError::Resource(e) => Some(e),
            DrawError::Present(e) => Some(e),
        }
    }
}

impl From<CommandError> for DrawError {
    fn from(err: CommandError) -> Self {
        DrawError::Command(err)
    }
}

impl From<FenceError> for DrawError {
    fn from(err: FenceError) -> Self {
        DrawError::Fence(err)
    }
}

impl From<ResourceError> for DrawError {
    fn from(err: ResourceError) -> Self {
        DrawError::Resource(err)
    }
}

impl From<PresentError> for DrawError {
    fn from(err: PresentError) -> Self {
        DrawError::Present(err)
    }
}

/// A fatal error raised while creating a [`RenderSurface`](crate::renderer::RenderSurface).
#[derive(Debug, Clone, PartialEq)]
pub enum InitError {
    /// No enumerated adapter satisfied the selection constraints.
    NoSuitableDevice {
        /// Number of adapters that were enumerated.
        adapters_examined: usize,
    },
    /// The selected adapter could not create a device.
    DeviceCreationFailed(String),
    /// The command queue or its fence could not be created.
    QueueCreationFailed(String),
    /// The presentation surface could not be created for the window.
    SurfaceCreationFailed(String),
    /// The configuration is not usable.
    InvalidConfig(String),
    /// A startup resource (descriptor heap, command recorder) could not be created.
    Resource(ResourceError),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::NoSuitableDevice { adapters_examined } => write!(
                f,
                "No suitable graphics device found ({adapters_examined} adapters examined)"
            ),
            InitError::DeviceCreationFailed(msg) => write!(f, "Device creation failed: {msg}"),
            InitError::QueueCreationFailed(msg) => write!(f, "Queue creation failed: {msg}"),
            InitError::SurfaceCreationFailed(msg) => {
                write!(f, "Presentation surface creation failed: {msg}")
            }
            InitError::InvalidConfig(msg) => write!(f, "Invalid configuration: {msg}"),
            InitError::Resource(e) => write!(f, "Startup resource error: {e}"),
        }
    }
}

impl std::error::Error for InitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InitError::Resource(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ResourceError> for InitError {
    fn from(err: ResourceError) -> Self {
        InitError::Resource(err)
    }
}

impl From<CommandError> for InitError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Resource(e) => InitError::Resource(e),
            other => InitError::QueueCreationFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn device_lost_message_names_the_target() {
        let err = FenceError::DeviceLost {
            target: 7,
            last_completed: 5,
            cause: LostCause::TimedOut(Duration::from_millis(250)),
        };
        let text = err.to_string();
        assert!(text.contains("fence value 7"));
        assert!(text.contains("last completed 5"));
        assert!(err.is_device_lost());
    }

    #[test]
    fn draw_error_keeps_the_fence_error_as_source() {
        let err: DrawError = FenceError::SignalFailed("queue gone".into()).into();
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("Fence signal failed: queue gone"));
    }

    #[test]
    fn only_lost_and_outdated_request_a_resize() {
        assert!(PresentError::Lost.needs_resize());
        assert!(PresentError::Outdated.needs_resize());
        assert!(!PresentError::Timeout.needs_resize());
    }
}
