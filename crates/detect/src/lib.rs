//! Advertisement detection for spotify-mute.
//!
//! Turns raw player notifications into edge events:
//!
//! ```text
//! PlaybackNotification ──classify(previous track)──▶ AdStarted | AdEnded | Irrelevant
//! ```
//!
//! What counts as an advertisement is decided by an [`AdDetector`], so the
//! heuristic can be swapped without touching the edge logic.

mod classify;
mod detector;
mod notification;

pub use classify::{classify, Classification, ClassifiedEvent, TrackState};
pub use detector::{AdDetector, AdDetectorRef, BlankArtistDetector, SpotifyAdDetector, SPOTIFY_AD_PREFIXES};
pub use notification::{PlaybackNotification, PlaybackStatus};
