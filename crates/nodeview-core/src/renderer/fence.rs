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

//! CPU/GPU synchronization through the queue's monotonic fence.

use crate::renderer::error::{FenceError, LostCause};
use crate::renderer::traits::{CommandQueue, FenceWaitStatus};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug)]
struct FenceState {
    next_value: u64,
    last_completed: u64,
}

/// Tracks GPU progress through a monotonically increasing fence value.
///
/// `next_value` starts at 1 and `last_completed` at 0, so the first real
/// submission carries fence value 1 and "nothing submitted" reads as 0.
/// Both counters live behind one mutex, which is never held across a
/// blocking wait.
#[derive(Debug)]
pub struct FenceSync {
    queue: Arc<dyn CommandQueue>,
    state: Mutex<FenceState>,
    timeout: Option<Duration>,
}

impl FenceSync {
    /// Creates a fence tracker for `queue`.
    ///
    /// Every blocking wait gives up after `timeout`; `None` waits forever.
    pub fn new(queue: Arc<dyn CommandQueue>, timeout: Option<Duration>) -> Self {
        Self {
            queue,
            state: Mutex::new(FenceState {
                next_value: 1,
                last_completed: 0,
            }),
            timeout,
        }
    }

    fn lock(&self) -> MutexGuard<'_, FenceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Signals the queue with the next fence value and returns it.
    ///
    /// The value is only consumed when the signal was accepted.
    pub fn advance(&self) -> Result<u64, FenceError> {
        let mut state = self.lock();
        let value = state.next_value;
        self.queue.signal(value)?;
        state.next_value += 1;
        log::trace!("Fence signaled with value {value}");
        Ok(value)
    }

    /// Blocks until the GPU has completed every submission up to `target`.
    ///
    /// Returns immediately when `target` is at or below the cached completed
    /// value, or when the queue already reports it as reached.
    pub fn wait_until(&self, target: u64) -> Result<(), FenceError> {
        let last_completed = {
            let state = self.lock();
            if target <= state.last_completed {
                return Ok(());
            }
            if target >= state.next_value {
                return Err(FenceError::NeverSignaled {
                    target,
                    next_value: state.next_value,
                });
            }
            state.last_completed
        };

        let completed = self.queue.completed_value();
        if completed >= target {
            self.observe(completed);
            return Ok(());
        }

        log::trace!("Waiting for fence value {target} (GPU at {completed})");
        match self.queue.wait_for_value(target, self.timeout) {
            FenceWaitStatus::Reached => {
                self.observe(target);
                Ok(())
            }
            FenceWaitStatus::TimedOut => {
                let timeout = self.timeout.unwrap_or_default();
                log::error!("Fence value {target} not reached within {timeout:?}");
                Err(FenceError::DeviceLost {
                    target,
                    last_completed,
                    cause: LostCause::TimedOut(timeout),
                })
            }
            FenceWaitStatus::DeviceLost => {
                log::error!("Device lost while waiting for fence value {target}");
                Err(FenceError::DeviceLost {
                    target,
                    last_completed,
                    cause: LostCause::DeviceRemoved,
                })
            }
        }
    }

    /// Signals a new value and waits for it, leaving the GPU idle.
    ///
    /// Returns the value that was waited on.
    pub fn flush_and_wait_idle(&self) -> Result<u64, FenceError> {
        let value = self.advance()?;
        self.wait_until(value)?;
        Ok(value)
    }

    fn observe(&self, completed: u64) {
        let mut state = self.lock();
        state.last_completed = state.last_completed.max(completed);
    }

    /// The next value [`advance`](Self::advance) will signal.
    pub fn next_value(&self) -> u64 {
        self.lock().next_value
    }

    /// The highest fence value known to be completed.
    pub fn last_completed(&self) -> u64 {
        self.lock().last_completed
    }

    /// The bound applied to every blocking wait.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The queue this fence belongs to.
    pub fn queue(&self) -> &Arc<dyn CommandQueue> {
        &self.queue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::error::CommandError;
    use crate::renderer::traits::CommandRecorder;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct ScriptedQueue {
        completed: AtomicU64,
        signals: Mutex<Vec<u64>>,
        waits: AtomicUsize,
        outcome: Mutex<Option<FenceWaitStatus>>,
    }

    impl ScriptedQueue {
        fn failing_with(status: FenceWaitStatus) -> Self {
            Self {
                outcome: Mutex::new(Some(status)),
                ..Default::default()
            }
        }
    }

    impl CommandQueue for ScriptedQueue {
        fn execute_command_list(&self, _: &mut dyn CommandRecorder) -> Result<(), CommandError> {
            Ok(())
        }

        fn signal(&self, value: u64) -> Result<(), FenceError> {
            self.signals.lock().unwrap().push(value);
            Ok(())
        }

        fn completed_value(&self) -> u64 {
            self.completed.load(Ordering::SeqCst)
        }

        fn wait_for_value(&self, value: u64, _: Option<Duration>) -> FenceWaitStatus {
            self.waits.fetch_add(1, Ordering::SeqCst);
            match *self.outcome.lock().unwrap() {
                Some(status) => status,
                None => {
                    self.completed.fetch_max(value, Ordering::SeqCst);
                    FenceWaitStatus::Reached
                }
            }
        }
    }

    fn fence_with(queue: ScriptedQueue) -> (Arc<ScriptedQueue>, FenceSync) {
        let queue = Arc::new(queue);
        let fence = FenceSync::new(queue.clone(), Some(Duration::from_millis(50)));
        (queue, fence)
    }

    #[test]
    fn advance_hands_out_strictly_increasing_values_from_one() {
        let (queue, fence) = fence_with(ScriptedQueue::default());
        assert_eq!(fence.next_value(), 1);
        assert_eq!(fence.last_completed(), 0);
        let values: Vec<u64> = (0..4).map(|_| fence.advance().unwrap()).collect();
        assert_eq!(values, vec![1, 2, 3, 4]);
        assert_eq!(*queue.signals.lock().unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(fence.next_value(), 5);
    }

    #[test]
    fn waits_at_or_below_the_cache_never_block() {
        let (queue, fence) = fence_with(ScriptedQueue::default());
        let value = fence.flush_and_wait_idle().unwrap();
        assert_eq!(queue.waits.load(Ordering::SeqCst), 1);

        fence.wait_until(value).unwrap();
        fence.wait_until(0).unwrap();
        assert_eq!(queue.waits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn already_completed_values_skip_the_blocking_wait() {
        let (queue, fence) = fence_with(ScriptedQueue::default());
        fence.advance().unwrap();
        fence.advance().unwrap();
        queue.completed.store(2, Ordering::SeqCst);

        fence.wait_until(1).unwrap();
        assert_eq!(queue.waits.load(Ordering::SeqCst), 0);
        assert_eq!(fence.last_completed(), 2);
    }

    #[test]
    fn last_completed_never_decreases() {
        let (_, fence) = fence_with(ScriptedQueue::default());
        for _ in 0..3 {
            fence.advance().unwrap();
        }
        fence.wait_until(3).unwrap();
        fence.wait_until(2).unwrap();
        assert_eq!(fence.last_completed(), 3);
    }

    #[test]
    fn waiting_on_an_unsignaled_value_is_rejected() {
        let (queue, fence) = fence_with(ScriptedQueue::default());
        let err = fence.wait_until(1).unwrap_err();
        assert_eq!(
            err,
            FenceError::NeverSignaled {
                target: 1,
                next_value: 1
            }
        );
        assert_eq!(queue.waits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn timeouts_surface_as_device_lost() {
        let (_, fence) = fence_with(ScriptedQueue::failing_with(FenceWaitStatus::TimedOut));
        let err = fence.flush_and_wait_idle().unwrap_err();
        assert!(matches!(
            err,
            FenceError::DeviceLost {
                target: 1,
                last_completed: 0,
                cause: LostCause::TimedOut(_)
            }
        ));
        assert_eq!(fence.last_completed(), 0);
    }

    #[test]
    fn device_removal_surfaces_as_device_lost() {
        let (_, fence) = fence_with(ScriptedQueue::failing_with(FenceWaitStatus::DeviceLost));
        let err = fence.flush_and_wait_idle().unwrap_err();
        assert!(matches!(
            err,
            FenceError::DeviceLost {
                cause: LostCause::DeviceRemoved,
                ..
            }
        ));
    }
}
