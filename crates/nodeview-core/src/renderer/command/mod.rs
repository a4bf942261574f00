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

//! Command recording and submission.

mod local_context;
mod submission;

pub use self::local_context::LocalContext;
pub use self::submission::{CommandSubmission, SubmissionState};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::renderer::api::{ClearTargets, ScissorRect, Viewport};
    use crate::renderer::error::{CommandError, FenceError};
    use crate::renderer::traits::{CommandQueue, CommandRecorder, FenceWaitStatus};
    use std::any::Any;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    pub type CallLog = Arc<Mutex<Vec<String>>>;

    #[derive(Debug)]
    pub struct LoggingRecorder {
        pub log: CallLog,
        pub refuse_reset: Arc<AtomicBool>,
    }

    impl LoggingRecorder {
        pub fn new(log: CallLog) -> Self {
            Self {
                log,
                refuse_reset: Arc::new(AtomicBool::new(false)),
            }
        }

        fn push(&self, call: impl Into<String>) {
            self.log.lock().unwrap().push(call.into());
        }
    }

    impl CommandRecorder for LoggingRecorder {
        fn reset(&mut self) -> Result<(), CommandError> {
            if self.refuse_reset.load(Ordering::SeqCst) {
                return Err(CommandError::ResetFailed("allocator in use".into()));
            }
            self.push("reset");
            Ok(())
        }

        fn set_viewport(&mut self, viewport: &Viewport) {
            self.push(format!("viewport {}x{}", viewport.width, viewport.height));
        }

        fn set_scissor_rect(&mut self, rect: &ScissorRect) {
            self.push(format!("scissor {}x{}", rect.width(), rect.height()));
        }

        fn clear_targets(&mut self, _: &ClearTargets) {
            self.push("clear");
        }

        fn close(&mut self) -> Result<(), CommandError> {
            self.push("close");
            Ok(())
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[derive(Debug)]
    pub struct InstantQueue {
        pub log: CallLog,
        pub completed: AtomicU64,
        /// Refuses the next signal, then behaves again.
        pub refuse_signal: AtomicBool,
    }

    impl InstantQueue {
        pub fn new(log: CallLog) -> Self {
            Self {
                log,
                completed: AtomicU64::new(0),
                refuse_signal: AtomicBool::new(false),
            }
        }
    }

    impl CommandQueue for InstantQueue {
        fn execute_command_list(&self, _: &mut dyn CommandRecorder) -> Result<(), CommandError> {
            self.log.lock().unwrap().push("execute".into());
            Ok(())
        }

        fn signal(&self, value: u64) -> Result<(), FenceError> {
            if self.refuse_signal.swap(false, Ordering::SeqCst) {
                return Err(FenceError::SignalFailed("queue refused".into()));
            }
            self.log.lock().unwrap().push(format!("signal {value}"));
            Ok(())
        }

        fn completed_value(&self) -> u64 {
            self.completed.load(Ordering::SeqCst)
        }

        fn wait_for_value(&self, value: u64, _: Option<Duration>) -> FenceWaitStatus {
            self.completed.fetch_max(value, Ordering::SeqCst);
            FenceWaitStatus::Reached
        }
    }
}
