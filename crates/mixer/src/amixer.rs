//! `amixer` backend.
//!
//! Runs `amixer -q -D <device> sset <control> mute|unmute` as program + args
//! (no shell).

use crate::{MuteController, MuteError};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Default ALSA device, routed through PulseAudio/PipeWire.
pub const DEFAULT_DEVICE: &str = "pulse";

/// Default simple mixer control.
pub const DEFAULT_CONTROL: &str = "Master";

const PROGRAM: &str = "amixer";
const COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

/// Mutes the master channel with `amixer`.
#[derive(Debug, Clone)]
pub struct AmixerController {
    program: String,
    device: String,
    control: String,
}

impl Default for AmixerController {
    fn default() -> Self {
        Self {
            program: PROGRAM.to_string(),
            device: DEFAULT_DEVICE.to_string(),
            control: DEFAULT_CONTROL.to_string(),
        }
    }
}

impl AmixerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }

    pub fn with_control(mut self, control: impl Into<String>) -> Self {
        self.control = control.into();
        self
    }

    /// Use a different executable (must accept amixer's arguments).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn args(&self, muted: bool) -> Vec<String> {
        let state = if muted { "mute" } else { "unmute" };
        vec![
            "-q".to_string(),
            "-D".to_string(),
            self.device.clone(),
            "sset".to_string(),
            self.control.clone(),
            state.to_string(),
        ]
    }

    async fn set_muted(&self, muted: bool) -> Result<(), MuteError> {
        let args = self.args(muted);
        tracing::debug!(program = %self.program, ?args, "running mixer command");

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| MuteError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        let output = timeout(COMMAND_TIMEOUT, child.wait_with_output())
            .await
            .map_err(|_| MuteError::Timeout {
                program: self.program.clone(),
                seconds: COMMAND_TIMEOUT.as_secs(),
            })?
            .map_err(|e| MuteError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(MuteError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

#[async_trait]
impl MuteController for AmixerController {
    async fn mute(&self) -> Result<(), MuteError> {
        self.set_muted(true).await
    }

    async fn unmute(&self) -> Result<(), MuteError> {
        self.set_muted(false).await
    }
}
