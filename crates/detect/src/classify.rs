//! Edge classification of player notifications.
//!
//! Pure domain logic: no I/O, no clocks. The caller owns the previous
//! [`TrackState`] and stores the returned one.

use crate::detector::AdDetector;
use crate::notification::{PlaybackNotification, PlaybackStatus};

/// Outcome of classifying one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifiedEvent {
    AdStarted,
    AdEnded,
    Irrelevant,
}

/// Last known track, as far as ad detection is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrackState {
    /// Nothing seen yet, or playback stopped.
    #[default]
    Unknown,
    Known { id: String, is_ad: bool },
}

impl TrackState {
    pub fn is_ad(&self) -> bool {
        matches!(self, TrackState::Known { is_ad: true, .. })
    }

    pub fn track_id(&self) -> Option<&str> {
        match self {
            TrackState::Known { id, .. } => Some(id),
            TrackState::Unknown => None,
        }
    }
}

/// Classified event together with the track state to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub event: ClassifiedEvent,
    pub next: TrackState,
}

impl Classification {
    fn irrelevant(previous: &TrackState) -> Self {
        Self {
            event: ClassifiedEvent::Irrelevant,
            next: previous.clone(),
        }
    }
}

/// Classify `notification` against the previously known track.
///
/// - `AdStarted` only on the edge into an ad (from a non-ad or unknown track)
/// - `AdEnded` only on the edge out of an ad: a new non-ad track starts
///   playing, or playback stops
/// - everything else, duplicates and pauses included, is `Irrelevant`
pub fn classify(
    previous: &TrackState,
    notification: &PlaybackNotification,
    detector: &dyn AdDetector,
) -> Classification {
    match notification.status {
        PlaybackStatus::Paused => Classification::irrelevant(previous),
        PlaybackStatus::Stopped => Classification {
            event: if previous.is_ad() {
                ClassifiedEvent::AdEnded
            } else {
                ClassifiedEvent::Irrelevant
            },
            next: TrackState::Unknown,
        },
        PlaybackStatus::Playing => classify_playing(previous, notification, detector),
    }
}

fn classify_playing(
    previous: &TrackState,
    notification: &PlaybackNotification,
    detector: &dyn AdDetector,
) -> Classification {
    let Some(track_id) = notification.track_id() else {
        tracing::debug!(
            title = ?notification.title,
            "notification without track id, ignoring"
        );
        return Classification::irrelevant(previous);
    };

    if previous.track_id() == Some(track_id) {
        return Classification::irrelevant(previous);
    }

    let is_ad = detector.is_advertisement(notification);
    let event = match (previous.is_ad(), is_ad) {
        (false, true) => ClassifiedEvent::AdStarted,
        (true, false) => ClassifiedEvent::AdEnded,
        // Consecutive ads belong to the same segment.
        _ => ClassifiedEvent::Irrelevant,
    };

    Classification {
        event,
        next: TrackState::Known {
            id: track_id.to_string(),
            is_ad,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::SpotifyAdDetector;

    const AD: &str = "spotify:ad:0001";
    const AD_2: &str = "spotify:ad:0002";
    const SONG: &str = "spotify:track:aaaa";
    const SONG_2: &str = "spotify:track:bbbb";

    /// Feed notifications through `classify`, threading the state.
    fn run(notifications: &[PlaybackNotification]) -> Vec<ClassifiedEvent> {
        let mut state = TrackState::default();
        notifications
            .iter()
            .map(|n| {
                let c = classify(&state, n, &SpotifyAdDetector);
                state = c.next;
                c.event
            })
            .collect()
    }

    fn paused(id: &str) -> PlaybackNotification {
        PlaybackNotification::new(PlaybackStatus::Paused).with_track_id(id)
    }

    fn stopped() -> PlaybackNotification {
        PlaybackNotification::new(PlaybackStatus::Stopped)
    }

    use ClassifiedEvent::*;

    #[test]
    fn test_ad_from_unknown_starts() {
        let events = run(&[PlaybackNotification::playing(AD)]);
        assert_eq!(events, vec![AdStarted]);
    }

    #[test]
    fn test_song_from_unknown_is_irrelevant() {
        let events = run(&[PlaybackNotification::playing(SONG)]);
        assert_eq!(events, vec![Irrelevant]);
    }

    #[test]
    fn test_song_ad_song() {
        let events = run(&[
            PlaybackNotification::playing(SONG),
            PlaybackNotification::playing(AD),
            PlaybackNotification::playing(SONG_2),
        ]);
        assert_eq!(events, vec![Irrelevant, AdStarted, AdEnded]);
    }

    #[test]
    fn test_duplicate_ad_notification_does_not_refire() {
        let events = run(&[
            PlaybackNotification::playing(AD),
            PlaybackNotification::playing(AD),
        ]);
        assert_eq!(events, vec![AdStarted, Irrelevant]);
    }

    #[test]
    fn test_back_to_back_ads_are_one_segment() {
        let events = run(&[
            PlaybackNotification::playing(AD),
            PlaybackNotification::playing(AD_2),
            PlaybackNotification::playing(SONG),
        ]);
        assert_eq!(events, vec![AdStarted, Irrelevant, AdEnded]);
    }

    #[test]
    fn test_song_change_is_irrelevant() {
        let events = run(&[
            PlaybackNotification::playing(SONG),
            PlaybackNotification::playing(SONG_2),
        ]);
        assert_eq!(events, vec![Irrelevant, Irrelevant]);
    }

    #[test]
    fn test_pause_and_resume_are_irrelevant() {
        let events = run(&[
            PlaybackNotification::playing(SONG),
            paused(SONG),
            PlaybackNotification::playing(SONG),
            PlaybackNotification::playing(AD),
            paused(AD),
            PlaybackNotification::playing(AD),
        ]);
        assert_eq!(
            events,
            vec![Irrelevant, Irrelevant, Irrelevant, AdStarted, Irrelevant, Irrelevant]
        );
    }

    #[test]
    fn test_stop_ends_ad_segment() {
        let events = run(&[PlaybackNotification::playing(AD), stopped()]);
        assert_eq!(events, vec![AdStarted, AdEnded]);
    }

    #[test]
    fn test_stop_resets_track_so_replayed_ad_starts_again() {
        let events = run(&[
            PlaybackNotification::playing(AD),
            stopped(),
            PlaybackNotification::playing(AD),
        ]);
        assert_eq!(events, vec![AdStarted, AdEnded, AdStarted]);
    }

    #[test]
    fn test_stop_during_song_is_irrelevant() {
        let events = run(&[PlaybackNotification::playing(SONG), stopped()]);
        assert_eq!(events, vec![Irrelevant, Irrelevant]);
    }

    #[test]
    fn test_missing_track_id_keeps_state() {
        let previous = TrackState::Known {
            id: AD.to_string(),
            is_ad: true,
        };
        let blank = PlaybackNotification::playing("   ");

        let c = classify(&previous, &blank, &SpotifyAdDetector);
        assert_eq!(c.event, Irrelevant);
        assert_eq!(c.next, previous);

        let missing = PlaybackNotification::new(PlaybackStatus::Playing);
        let c = classify(&previous, &missing, &SpotifyAdDetector);
        assert_eq!(c.event, Irrelevant);
        assert_eq!(c.next, previous);
    }

    #[test]
    fn test_custom_detector() {
        let by_title = |n: &PlaybackNotification| n.title.as_deref() == Some("Advertisement");
        let ad = PlaybackNotification::playing("42").with_title("Advertisement");

        let c = classify(&TrackState::Unknown, &ad, &by_title);
        assert_eq!(c.event, AdStarted);
        assert!(c.next.is_ad());
    }
}
