//! System mute control.
//!
//! The engine only sees [`MuteController`]; [`AmixerController`] is the
//! ALSA/PulseAudio backend and [`RecordingController`] captures calls for
//! tests.

mod amixer;
mod error;
mod recording;

use async_trait::async_trait;
use std::sync::Arc;

pub use amixer::{AmixerController, DEFAULT_CONTROL, DEFAULT_DEVICE};
pub use error::MuteError;
pub use recording::{MuteCall, RecordingController};

/// Mutes and unmutes the system audio output.
///
/// Both operations are idempotent and perform exactly one external call.
/// Failures are returned, never retried.
#[async_trait]
pub trait MuteController: Send + Sync {
    async fn mute(&self) -> Result<(), MuteError>;

    async fn unmute(&self) -> Result<(), MuteError>;
}

/// Type alias for a shared mute controller.
pub type MuteControllerRef = Arc<dyn MuteController>;
