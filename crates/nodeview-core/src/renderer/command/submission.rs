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
use crate::renderer::fence::FenceSync;
use crate::renderer::traits::CommandRecorder;
use std::sync::Arc;

/// Lifecycle of the command buffer owned by a [`CommandSubmission`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    /// Nothing recorded since the last submission.
    Idle,
    /// The buffer is open and accepting commands.
    Recording,
    /// The buffer is closed but was not submitted.
    Closed,
}

/// A reusable command buffer bound to a queue and its fence.
///
/// Follows `Idle -> Recording -> Closed -> Idle`: [`reset`](Self::reset)
/// opens the buffer, [`submit`](Self::submit) closes, executes and signals.
/// The caller must have waited on [`last_submitted`](Self::last_submitted)
/// before resetting, since the allocator is reused.
pub struct CommandSubmission {
    recorder: Box<dyn CommandRecorder>,
    fence: Arc<FenceSync>,
    state: SubmissionState,
    last_submitted: u64,
    // Executed on the queue but the fence signal after it was refused.
    unsignaled: bool,
}

impl std::fmt::Debug for CommandSubmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSubmission")
            .field("state", &self.state)
            .field("last_submitted", &self.last_submitted)
            .field("unsignaled", &self.unsignaled)
            .finish_non_exhaustive()
    }
}

impl CommandSubmission {
    /// Wraps `recorder`; submissions go to the queue behind `fence`.
    pub fn new(recorder: Box<dyn CommandRecorder>, fence: Arc<FenceSync>) -> Self {
        Self {
            recorder,
            fence,
            state: SubmissionState::Idle,
            last_submitted: 0,
            unsignaled: false,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Fence value carried by the most recent submission, 0 before the first one.
    pub fn last_submitted(&self) -> u64 {
        self.last_submitted
    }

    /// The fence submissions advance.
    pub fn fence(&self) -> &Arc<FenceSync> {
        &self.fence
    }

    /// Resets the allocator and reopens the buffer.
    ///
    /// If the previous submission reached the queue but its fence signal
    /// failed, the queue is flushed first so the allocator is known to be
    /// idle. On failure the state is left unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is already recording, or if the GPU has not yet
    /// completed [`last_submitted`](Self::last_submitted).
    pub fn reset(&mut self) -> Result<(), CommandError> {
        assert_ne!(
            self.state,
            SubmissionState::Recording,
            "CommandSubmission::reset called while recording"
        );
        if self.unsignaled {
            let value = self.fence.flush_and_wait_idle()?;
            log::debug!("Unsignaled submission retired at fence value {value}");
            self.last_submitted = value;
            self.unsignaled = false;
            self.state = SubmissionState::Idle;
        }
        let completed = self.fence.last_completed();
        assert!(
            completed >= self.last_submitted,
            "CommandSubmission::reset called with GPU work outstanding \
             (submitted {}, completed {completed})",
            self.last_submitted
        );
        self.recorder.reset()?;
        self.state = SubmissionState::Recording;
        Ok(())
    }

    /// Records the viewport and scissor rectangle.
    ///
    /// A scissor enclosing no pixel is rejected before anything is recorded.
    pub fn set_viewport_and_scissor(
        &mut self,
        viewport: &Viewport,
        scissor: &ScissorRect,
    ) -> Result<(), CommandError> {
        if !scissor.is_valid() {
            return Err(CommandError::InvalidRegion(*scissor));
        }
        self.assert_recording("set_viewport_and_scissor");
        self.recorder.set_viewport(viewport);
        self.recorder.set_scissor_rect(scissor);
        Ok(())
    }

    /// Records a clear of the given targets.
    pub fn clear(&mut self, targets: &ClearTargets) {
        self.assert_recording("clear");
        self.recorder.clear_targets(targets);
    }

    /// Gives backend collaborators access to the open recorder.
    pub fn recorder_mut(&mut self) -> &mut dyn CommandRecorder {
        self.assert_recording("recorder_mut");
        self.recorder.as_mut()
    }

    /// Closes and executes the buffer, then advances the fence.
    ///
    /// Returns the fence value that marks this submission's completion.
    ///
    /// # Panics
    ///
    /// Panics if [`reset`](Self::reset) was not called first.
    pub fn submit(&mut self) -> Result<u64, CommandError> {
        assert_eq!(
            self.state,
            SubmissionState::Recording,
            "CommandSubmission::submit called without reset"
        );
        self.state = SubmissionState::Closed;
        self.recorder.close()?;
        self.fence.queue().execute_command_list(self.recorder.as_mut())?;
        let value = self.fence.advance().inspect_err(|e| {
            log::error!("Command buffer executed but its fence signal failed: {e}");
            self.unsignaled = true;
        })?;
        self.state = SubmissionState::Idle;
        self.last_submitted = value;
        log::trace!("Submitted command buffer with fence value {value}");
        Ok(value)
    }

    /// Closes an open buffer without submitting it.
    pub fn abandon(&mut self) {
        if self.state != SubmissionState::Recording {
            return;
        }
        self.state = SubmissionState::Closed;
        if let Err(e) = self.recorder.close() {
            log::warn!("Failed to close abandoned command buffer: {e}");
        }
    }

    fn assert_recording(&self, operation: &str) {
        assert_eq!(
            self.state,
            SubmissionState::Recording,
            "CommandSubmission::{operation} called outside of recording"
        );
    }
}
