//! Process-wide detection state.

use crate::state::{Command, MuteState, MuteStateMachine};
use spotify_mute_bus::TimerId;
use spotify_mute_config::Settings;
use spotify_mute_detect::{classify, AdDetector, ClassifiedEvent, PlaybackNotification, TrackState};

/// Everything that survives from one event to the next: the last known track
/// and the mute state. Owned by the engine loop.
#[derive(Debug, Clone)]
pub struct Session {
    track: TrackState,
    machine: MuteStateMachine,
}

impl Session {
    pub fn new(settings: &Settings) -> Self {
        Self {
            track: TrackState::Unknown,
            machine: MuteStateMachine::new(settings),
        }
    }

    pub fn track(&self) -> &TrackState {
        &self.track
    }

    pub fn mute_state(&self) -> MuteState {
        self.machine.state()
    }

    /// Classify a notification and apply it.
    pub fn on_notification(
        &mut self,
        notification: &PlaybackNotification,
        detector: &dyn AdDetector,
    ) -> (ClassifiedEvent, Vec<Command>) {
        let classification = classify(&self.track, notification, detector);
        self.track = classification.next;

        let commands = self.machine.on_event(classification.event);
        (classification.event, commands)
    }

    pub fn on_timer_elapsed(&mut self, id: TimerId) -> Vec<Command> {
        self.machine.on_timer_elapsed(id)
    }

    /// The player went away: the track is forgotten and a scheduled unmute
    /// runs now.
    pub fn on_player_gone(&mut self) -> Vec<Command> {
        self.track = TrackState::Unknown;
        self.machine.flush_pending_unmute()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spotify_mute_detect::SpotifyAdDetector;

    #[test]
    fn test_duplicate_ad_notifications_mute_once() {
        let mut session = Session::new(&Settings::default());
        let ad = PlaybackNotification::playing("spotify:ad:1");

        let (event, commands) = session.on_notification(&ad, &SpotifyAdDetector);
        assert_eq!(event, ClassifiedEvent::AdStarted);
        assert!(commands.contains(&Command::Mute));

        let (event, commands) = session.on_notification(&ad, &SpotifyAdDetector);
        assert_eq!(event, ClassifiedEvent::Irrelevant);
        assert!(commands.is_empty());

        assert_eq!(session.mute_state(), MuteState::Muted);
        assert_eq!(session.track().track_id(), Some("spotify:ad:1"));
    }

    #[test]
    fn test_track_after_ad_unmutes() {
        let mut session = Session::new(&Settings::default());
        session.on_notification(&PlaybackNotification::playing("spotify:ad:1"), &SpotifyAdDetector);

        let (event, commands) = session.on_notification(
            &PlaybackNotification::playing("spotify:track:1"),
            &SpotifyAdDetector,
        );
        assert_eq!(event, ClassifiedEvent::AdEnded);
        assert_eq!(commands, vec![Command::Unmute]);
        assert_eq!(session.mute_state(), MuteState::Unmuted);
    }
}
