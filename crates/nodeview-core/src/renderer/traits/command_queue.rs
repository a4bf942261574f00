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

use crate::renderer::error::{CommandError, FenceError};
use crate::renderer::traits::CommandRecorder;
use std::fmt::Debug;
use std::time::Duration;

/// The outcome of a bounded wait on the queue fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceWaitStatus {
    /// The fence reached the requested value.
    Reached,
    /// The time bound expired first.
    TimedOut,
    /// The device was removed while waiting.
    DeviceLost,
}

/// A trait for a GPU queue together with its monotonic fence.
///
/// Submissions are executed in order, so once the fence reaches a value every
/// submission signaled with a smaller or equal value has completed.
pub trait CommandQueue: Send + Sync + Debug {
    /// Submits the closed command buffer held by `recorder` for execution.
    /// ## Errors
    /// * `CommandError::SubmitFailed` - If the recorder was not produced by this backend or is not closed.
    fn execute_command_list(&self, recorder: &mut dyn CommandRecorder) -> Result<(), CommandError>;

    /// Asks the queue to set its fence to `value` once all prior work has completed.
    fn signal(&self, value: u64) -> Result<(), FenceError>;

    /// The value the GPU has most recently written to the fence.
    fn completed_value(&self) -> u64;

    /// Blocks the calling thread until the fence reaches `value`.
    ///
    /// A `timeout` of `None` waits without bound.
    fn wait_for_value(&self, value: u64, timeout: Option<Duration>) -> FenceWaitStatus;
}
