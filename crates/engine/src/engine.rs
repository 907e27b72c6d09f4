//! Event loop executing the state machine's commands.

use crate::session::Session;
use crate::state::{Command, MuteState};
use spotify_mute_bus::{Event, EventReceiver, EventSender, TimerId, WeakEventSender};
use spotify_mute_config::Settings;
use spotify_mute_detect::{AdDetectorRef, ClassifiedEvent, TrackState};
use spotify_mute_mixer::MuteControllerRef;
use spotify_mute_notify::NotifierRef;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Why the engine loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineExit {
    /// A [`Event::Shutdown`] or [`Event::PlayerGone`] was received.
    Shutdown,
    /// Every sender went away.
    QueueClosed,
}

struct PendingTimer {
    id: TimerId,
    cancel: CancellationToken,
}

/// Single consumer of the event queue.
///
/// Each event is processed to completion, side effects included, before the
/// next one is received. Unmute timers post back into the same queue, so a
/// timer expiring and an ad starting are always handled one after the other.
pub struct Engine {
    session: Session,
    detector: AdDetectorRef,
    controller: MuteControllerRef,
    notifier: NotifierRef,
    timer_sender: WeakEventSender,
    pending: Option<PendingTimer>,
}

impl Engine {
    /// `timer_sender` must feed the queue this engine will [`run`](Self::run) on.
    /// Only a weak handle is kept, so the queue closes once every other
    /// sender is dropped.
    pub fn new(
        settings: &Settings,
        detector: AdDetectorRef,
        controller: MuteControllerRef,
        notifier: NotifierRef,
        timer_sender: EventSender,
    ) -> Self {
        Self {
            session: Session::new(settings),
            detector,
            controller,
            notifier,
            timer_sender: timer_sender.downgrade(),
            pending: None,
        }
    }

    pub fn mute_state(&self) -> MuteState {
        self.session.mute_state()
    }

    pub fn track(&self) -> &TrackState {
        self.session.track()
    }

    /// Whether an unmute timer is scheduled and not cancelled.
    pub fn has_pending_timer(&self) -> bool {
        self.pending.is_some()
    }

    /// Process events until shutdown.
    pub async fn run(&mut self, events: &mut EventReceiver) -> EngineExit {
        tracing::info!(state = %self.mute_state(), "engine started");

        while let Some(envelope) = events.recv().await {
            tracing::trace!(seq = envelope.seq, event = ?envelope.event, "event received");
            if !self.handle(envelope.event).await {
                tracing::info!("engine stopped");
                return EngineExit::Shutdown;
            }
        }

        tracing::info!("event queue closed, engine stopped");
        EngineExit::QueueClosed
    }

    /// Process one event. Returns false on shutdown.
    pub async fn handle(&mut self, event: Event) -> bool {
        let mut running = true;
        let commands = match event {
            Event::Playback(notification) => {
                let (classified, commands) = self
                    .session
                    .on_notification(&notification, self.detector.as_ref());

                match classified {
                    ClassifiedEvent::AdStarted => tracing::info!(
                        track_id = ?notification.track_id,
                        "advertisement started"
                    ),
                    ClassifiedEvent::AdEnded => tracing::info!(
                        track_id = ?notification.track_id,
                        "advertisement ended"
                    ),
                    ClassifiedEvent::Irrelevant => tracing::debug!(
                        track_id = ?notification.track_id,
                        status = %notification.status,
                        "irrelevant notification"
                    ),
                }
                commands
            }
            Event::UnmuteTimerElapsed(id) => {
                if self.pending.as_ref().map(|p| p.id) == Some(id) {
                    self.pending = None;
                }
                self.session.on_timer_elapsed(id)
            }
            Event::PlayerGone => {
                tracing::info!(state = %self.mute_state(), "player gone");
                running = false;
                self.session.on_player_gone()
            }
            Event::Shutdown => return false,
        };

        self.execute(commands).await;
        running
    }

    async fn execute(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Mute => match self.controller.mute().await {
                    Ok(()) => tracing::info!("sound muted"),
                    Err(e) => tracing::warn!("failed to mute: {}", e),
                },
                Command::Unmute => match self.controller.unmute().await {
                    Ok(()) => tracing::info!("sound unmuted"),
                    Err(e) => tracing::warn!("failed to unmute: {}", e),
                },
                Command::Notify(notification) => self.notifier.notify(&notification),
                Command::StartUnmuteTimer { id, delay } => self.start_timer(id, delay),
                Command::CancelUnmuteTimer(id) => self.cancel_timer(id),
            }
        }
    }

    fn start_timer(&mut self, id: TimerId, delay: Duration) {
        if let Some(previous) = self.pending.take() {
            tracing::warn!(previous = %previous.id, %id, "replacing pending unmute timer");
            previous.cancel.cancel();
        }

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let sender = self.timer_sender.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!(%id, "unmute timer cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    let delivered = match sender.upgrade() {
                        Some(sender) => sender.send(Event::UnmuteTimerElapsed(id)).await,
                        None => false,
                    };
                    if !delivered {
                        tracing::warn!(%id, "event queue closed before unmute timer fired");
                    }
                }
            }
        });

        tracing::info!(%id, delay_ms = delay.as_millis() as u64, "unmute scheduled");
        self.pending = Some(PendingTimer { id, cancel });
    }

    fn cancel_timer(&mut self, id: TimerId) {
        match self.pending.take() {
            Some(pending) if pending.id == id => {
                pending.cancel.cancel();
                tracing::info!(%id, "pending unmute cancelled");
            }
            other => {
                tracing::debug!(%id, "no matching unmute timer to cancel");
                self.pending = other;
            }
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel.cancel();
        }
    }
}
