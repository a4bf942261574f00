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

use super::command::WgpuCommandRecorder;
use super::context::WgpuContext;
use nodeview_core::renderer::error::{CommandError, FenceError};
use nodeview_core::renderer::traits::{CommandQueue, CommandRecorder, FenceWaitStatus};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// The `wgpu` queue together with an emulated monotonic fence.
///
/// `wgpu` has no fence objects. A signal registers a work-done callback
/// that raises the completed value once everything submitted so far has
/// finished, and waits drive the device's poll loop until it does.
#[derive(Debug)]
pub struct WgpuQueue {
    context: Arc<WgpuContext>,
    completed: Arc<AtomicU64>,
}

impl WgpuQueue {
    /// Creates the queue front-end with its fence at 0.
    pub fn new(context: Arc<WgpuContext>) -> Self {
        Self {
            context,
            completed: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl CommandQueue for WgpuQueue {
    fn execute_command_list(&self, recorder: &mut dyn CommandRecorder) -> Result<(), CommandError> {
        let recorder = recorder
            .as_any_mut()
            .downcast_mut::<WgpuCommandRecorder>()
            .ok_or_else(|| {
                CommandError::SubmitFailed("recorder was not created by the wgpu backend".into())
            })?;
        let buffer = recorder
            .take_finished()
            .ok_or_else(|| CommandError::SubmitFailed("command buffer is not closed".into()))?;
        self.context.queue.submit(std::iter::once(buffer));
        Ok(())
    }

    fn signal(&self, value: u64) -> Result<(), FenceError> {
        if self.context.is_lost() {
            return Err(FenceError::SignalFailed("device lost".to_string()));
        }
        let completed = self.completed.clone();
        self.context.queue.on_submitted_work_done(move || {
            completed.fetch_max(value, Ordering::SeqCst);
        });
        Ok(())
    }

    fn completed_value(&self) -> u64 {
        self.completed.load(Ordering::SeqCst)
    }

    fn wait_for_value(&self, value: u64, timeout: Option<Duration>) -> FenceWaitStatus {
        let deadline = timeout.map(|t| Instant::now() + t);
        loop {
            if self.completed.load(Ordering::SeqCst) >= value {
                return FenceWaitStatus::Reached;
            }
            if self.context.is_lost() {
                return FenceWaitStatus::DeviceLost;
            }

            let poll_type = match deadline {
                Some(deadline) if Instant::now() >= deadline => return FenceWaitStatus::TimedOut,
                Some(_) => wgpu::PollType::Poll,
                None => wgpu::PollType::Wait,
            };
            match self.context.device.poll(poll_type) {
                Ok(_) | Err(wgpu::PollError::Timeout) => {}
                Err(e) => {
                    log::error!("Device poll failed while waiting for fence value {value}: {e}");
                    return FenceWaitStatus::DeviceLost;
                }
            }
            if deadline.is_some() && self.completed.load(Ordering::SeqCst) < value {
                std::thread::sleep(POLL_INTERVAL);
            }
        }
    }
}
