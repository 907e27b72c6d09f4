//! Mute state machine.
//!
//! Pure decision logic: consumes classified events and timer expirations,
//! returns the commands to execute. It never touches the mixer, the
//! notification daemon or the clock itself.

use spotify_mute_bus::TimerId;
use spotify_mute_config::Settings;
use spotify_mute_detect::ClassifiedEvent;
use spotify_mute_notify::Notification;
use std::time::Duration;

/// Audio state as last commanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MuteState {
    #[default]
    Unmuted,
    Muted,
    /// Muted, with an unmute scheduled by the given timer.
    PendingUnmute(TimerId),
}

impl MuteState {
    pub fn label(&self) -> &'static str {
        match self {
            MuteState::Unmuted => "unmuted",
            MuteState::Muted => "muted",
            MuteState::PendingUnmute(_) => "pending_unmute",
        }
    }

    /// Whether audio is currently muted.
    pub fn is_muted(&self) -> bool {
        !matches!(self, MuteState::Unmuted)
    }
}

impl std::fmt::Display for MuteState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Side effect requested by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Mute,
    Unmute,
    Notify(Notification),
    StartUnmuteTimer { id: TimerId, delay: Duration },
    CancelUnmuteTimer(TimerId),
}

/// Debounced mute/unmute decisions with an optional grace period.
#[derive(Debug, Clone)]
pub struct MuteStateMachine {
    state: MuteState,
    wait_before_unmute: Duration,
    show_notification: bool,
    next_timer_id: u64,
}

impl MuteStateMachine {
    pub fn new(settings: &Settings) -> Self {
        Self {
            state: MuteState::Unmuted,
            wait_before_unmute: settings.wait_before_unmute,
            show_notification: settings.show_notification,
            next_timer_id: 0,
        }
    }

    pub fn state(&self) -> MuteState {
        self.state
    }

    /// Apply a classified event.
    pub fn on_event(&mut self, event: ClassifiedEvent) -> Vec<Command> {
        match (self.state, event) {
            (_, ClassifiedEvent::Irrelevant) => Vec::new(),

            (MuteState::Unmuted, ClassifiedEvent::AdStarted) => {
                self.state = MuteState::Muted;
                let mut commands = vec![Command::Mute];
                if self.show_notification {
                    commands.push(Command::Notify(Notification::ad_muted()));
                }
                commands
            }

            // Already muted; duplicate starts are absorbed.
            (MuteState::Muted, ClassifiedEvent::AdStarted) => Vec::new(),

            // Back-to-back ads: keep audio muted, drop the scheduled unmute.
            (MuteState::PendingUnmute(id), ClassifiedEvent::AdStarted) => {
                self.state = MuteState::Muted;
                vec![Command::CancelUnmuteTimer(id)]
            }

            (MuteState::Muted, ClassifiedEvent::AdEnded) => {
                if self.wait_before_unmute.is_zero() {
                    self.state = MuteState::Unmuted;
                    vec![Command::Unmute]
                } else {
                    let id = self.allocate_timer();
                    self.state = MuteState::PendingUnmute(id);
                    vec![Command::StartUnmuteTimer {
                        id,
                        delay: self.wait_before_unmute,
                    }]
                }
            }

            (MuteState::Unmuted | MuteState::PendingUnmute(_), ClassifiedEvent::AdEnded) => {
                Vec::new()
            }
        }
    }

    /// Apply the expiration of an unmute timer. Stale timers are ignored.
    pub fn on_timer_elapsed(&mut self, id: TimerId) -> Vec<Command> {
        match self.state {
            MuteState::PendingUnmute(pending) if pending == id => {
                self.state = MuteState::Unmuted;
                vec![Command::Unmute]
            }
            _ => {
                tracing::debug!(%id, state = %self.state, "ignoring stale unmute timer");
                Vec::new()
            }
        }
    }

    /// Run a scheduled unmute now instead of waiting for its timer.
    ///
    /// Used when the player goes away after an ad has already ended. A plain
    /// `Muted` state is left alone.
    pub fn flush_pending_unmute(&mut self) -> Vec<Command> {
        match self.state {
            MuteState::PendingUnmute(id) => {
                self.state = MuteState::Unmuted;
                vec![Command::CancelUnmuteTimer(id), Command::Unmute]
            }
            _ => Vec::new(),
        }
    }

    fn allocate_timer(&mut self) -> TimerId {
        let id = TimerId(self.next_timer_id);
        self.next_timer_id += 1;
        id
    }
}
