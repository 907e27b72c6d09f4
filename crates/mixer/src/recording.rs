//! In-memory mute controller for tests.

use crate::{MuteController, MuteError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// A call received by [`RecordingController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuteCall {
    Mute,
    Unmute,
}

/// Records every call and optionally fails them.
///
/// Failing calls are still recorded.
#[derive(Default)]
pub struct RecordingController {
    calls: Mutex<Vec<MuteCall>>,
    failing: AtomicBool,
}

impl RecordingController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a controller whose calls all fail.
    pub fn failing() -> Self {
        let controller = Self::default();
        controller.set_failing(true);
        controller
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Get all recorded calls.
    pub fn calls(&self) -> Vec<MuteCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: MuteCall) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == call).count()
    }

    /// Whether the last call was a mute.
    pub fn is_muted(&self) -> bool {
        self.calls.lock().unwrap().last() == Some(&MuteCall::Mute)
    }

    fn record(&self, call: MuteCall) -> Result<(), MuteError> {
        self.calls.lock().unwrap().push(call);

        if self.failing.load(Ordering::SeqCst) {
            return Err(MuteError::Unavailable("recording controller set to fail".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MuteController for RecordingController {
    async fn mute(&self) -> Result<(), MuteError> {
        self.record(MuteCall::Mute)
    }

    async fn unmute(&self) -> Result<(), MuteError> {
        self.record(MuteCall::Unmute)
    }
}
