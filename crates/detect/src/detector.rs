use crate::notification::PlaybackNotification;
use std::sync::Arc;

/// Track id prefixes Spotify uses for advertisements.
///
/// Older clients report `spotify:ad:<id>`, newer ones an object path.
pub const SPOTIFY_AD_PREFIXES: &[&str] = &["spotify:ad", "/com/spotify/ad/"];

/// Decides whether a notification describes an advertisement.
pub trait AdDetector: Send + Sync {
    fn is_advertisement(&self, notification: &PlaybackNotification) -> bool;
}

/// Shared detector reference.
pub type AdDetectorRef = Arc<dyn AdDetector>;

impl<F> AdDetector for F
where
    F: Fn(&PlaybackNotification) -> bool + Send + Sync,
{
    fn is_advertisement(&self, notification: &PlaybackNotification) -> bool {
        self(notification)
    }
}

/// Detects Spotify ads by their track id.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpotifyAdDetector;

impl AdDetector for SpotifyAdDetector {
    fn is_advertisement(&self, notification: &PlaybackNotification) -> bool {
        notification
            .track_id()
            .map(|id| SPOTIFY_AD_PREFIXES.iter().any(|prefix| id.starts_with(prefix)))
            .unwrap_or(false)
    }
}

/// Treats tracks without a named artist as advertisements.
///
/// Useful for players that do not mark ads in the track id.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankArtistDetector;

impl AdDetector for BlankArtistDetector {
    fn is_advertisement(&self, notification: &PlaybackNotification) -> bool {
        notification.artists.iter().all(|a| a.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spotify_legacy_ad_id() {
        let n = PlaybackNotification::playing("spotify:ad:000000012c8e9a4e");
        assert!(SpotifyAdDetector.is_advertisement(&n));
    }

    #[test]
    fn test_spotify_object_path_ad_id() {
        let n = PlaybackNotification::playing("/com/spotify/ad/5a7c1d");
        assert!(SpotifyAdDetector.is_advertisement(&n));
    }

    #[test]
    fn test_spotify_regular_track() {
        let n = PlaybackNotification::playing("spotify:track:4uLU6hMCjMI75M1A2tKUQC");
        assert!(!SpotifyAdDetector.is_advertisement(&n));

        let n = PlaybackNotification::playing("/com/spotify/track/4uLU6hMCjMI75M1A2tKUQC");
        assert!(!SpotifyAdDetector.is_advertisement(&n));
    }

    #[test]
    fn test_spotify_missing_id_is_not_an_ad() {
        let n = PlaybackNotification::new(crate::PlaybackStatus::Playing);
        assert!(!SpotifyAdDetector.is_advertisement(&n));
    }

    #[test]
    fn test_blank_artist() {
        let ad = PlaybackNotification::playing("x").with_title("Advertisement");
        assert!(BlankArtistDetector.is_advertisement(&ad));

        let blank = PlaybackNotification::playing("x").with_artist("  ");
        assert!(BlankArtistDetector.is_advertisement(&blank));

        let song = PlaybackNotification::playing("x").with_artist("Nina Simone");
        assert!(!BlankArtistDetector.is_advertisement(&song));
    }

    #[test]
    fn test_closure_detector() {
        let detector = |n: &PlaybackNotification| n.title.as_deref() == Some("Spotify");
        let n = PlaybackNotification::playing("x").with_title("Spotify");
        assert!(detector.is_advertisement(&n));
    }
}
