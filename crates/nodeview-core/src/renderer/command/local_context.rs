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

use super::submission::{CommandSubmission, SubmissionState};
use crate::renderer::error::CommandError;

/// A scoped recording session over a [`CommandSubmission`].
///
/// Creating the context resets the submission. If the reset fails the
/// context is unusable and the frame should be abandoned. A buffer still
/// open when the context is dropped is closed without being submitted.
#[derive(Debug)]
pub struct LocalContext<'a> {
    submission: &'a mut CommandSubmission,
    reset_error: Option<CommandError>,
}

impl<'a> LocalContext<'a> {
    /// Opens a recording session.
    pub fn new(submission: &'a mut CommandSubmission) -> Self {
        let reset_error = submission.reset().err();
        if let Some(e) = &reset_error {
            log::warn!("Failed to reset command context: {e}");
        }
        Self {
            submission,
            reset_error,
        }
    }

    /// `true` when the reset succeeded and commands may be recorded.
    pub fn is_usable(&self) -> bool {
        self.reset_error.is_none()
    }

    /// The error that made the context unusable, if any.
    pub fn reset_error(&self) -> Option<&CommandError> {
        self.reset_error.as_ref()
    }

    /// The submission being recorded, or `None` when unusable.
    pub fn get(&mut self) -> Option<&mut CommandSubmission> {
        if self.is_usable() {
            Some(&mut *self.submission)
        } else {
            None
        }
    }

    /// Consumes the context, yielding the reset error if there was one.
    pub fn into_result(mut self) -> Result<(), CommandError> {
        match self.reset_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Drop for LocalContext<'_> {
    fn drop(&mut self) {
        if self.submission.state() == SubmissionState::Recording {
            log::debug!("Closing command buffer left open by an abandoned frame");
            self.submission.abandon();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::{ScissorRect, Viewport};
    use crate::renderer::command::test_support::{CallLog, InstantQueue, LoggingRecorder};
    use crate::renderer::fence::FenceSync;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    #[test]
    fn usable_context_resets_on_entry_and_closes_on_drop() {
        let log = CallLog::default();
        let fence = Arc::new(FenceSync::new(Arc::new(InstantQueue::new(log.clone())), None));
        let mut sub = CommandSubmission::new(Box::new(LoggingRecorder::new(log.clone())), fence);
        {
            let mut ctx = LocalContext::new(&mut sub);
            assert!(ctx.is_usable());
            let sub = ctx.get().unwrap();
            sub.set_viewport_and_scissor(&Viewport::full(4, 4), &ScissorRect::full(4, 4))
                .unwrap();
        }
        assert_eq!(sub.state(), SubmissionState::Closed);
        assert_eq!(log.lock().unwrap().last().map(String::as_str), Some("close"));
    }

    #[test]
    fn submitted_context_is_left_idle() {
        let log = CallLog::default();
        let fence = Arc::new(FenceSync::new(Arc::new(InstantQueue::new(log.clone())), None));
        let mut sub = CommandSubmission::new(Box::new(LoggingRecorder::new(log.clone())), fence);
        {
            let mut ctx = LocalContext::new(&mut sub);
            ctx.get().unwrap().submit().unwrap();
        }
        assert_eq!(sub.state(), SubmissionState::Idle);
    }

    #[test]
    fn failed_reset_makes_the_context_unusable() {
        let log = CallLog::default();
        let fence = Arc::new(FenceSync::new(Arc::new(InstantQueue::new(log.clone())), None));
        let recorder = LoggingRecorder::new(log.clone());
        recorder.refuse_reset.store(true, Ordering::SeqCst);
        let mut sub = CommandSubmission::new(Box::new(recorder), fence);

        let mut ctx = LocalContext::new(&mut sub);
        assert!(!ctx.is_usable());
        assert!(ctx.get().is_none());
        assert!(matches!(ctx.into_result(), Err(CommandError::ResetFailed(_))));
        assert!(log.lock().unwrap().is_empty());
    }
}
