//! Session bus listener for the Spotify MPRIS interface.
//!
//! Subscribes to `PropertiesChanged` on the player object and forwards a
//! [`PlaybackNotification`](spotify_mute_detect::PlaybackNotification)
//! snapshot into the engine's event queue for every playback change.

mod error;
mod listener;
mod metadata;

pub use error::BusError;
pub use listener::{BusListener, ListenerExit, PLAYER_INTERFACE, PLAYER_PATH, SPOTIFY_BUS_NAME};
pub use metadata::{notification_from_metadata, notification_from_parts};
