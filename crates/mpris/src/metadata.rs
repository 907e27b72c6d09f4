//! Conversion from MPRIS property values to playback notifications.

use spotify_mute_detect::{PlaybackNotification, PlaybackStatus};
use std::collections::HashMap;
use zbus::zvariant::{OwnedValue, Value};

const TRACK_ID: &str = "mpris:trackid";
const TITLE: &str = "xesam:title";
const ARTIST: &str = "xesam:artist";

/// Build a notification from the player's `PlaybackStatus` and `Metadata`
/// properties. Returns `None` for an unknown playback status.
pub fn notification_from_metadata(
    status: &str,
    metadata: &HashMap<String, OwnedValue>,
) -> Option<PlaybackNotification> {
    let lookup = |key: &str| metadata.get(key).map(|value| &**value);
    notification_from_parts(status, lookup(TRACK_ID), lookup(TITLE), lookup(ARTIST))
}

/// Same as [`notification_from_metadata`] with the metadata entries already
/// looked up.
pub fn notification_from_parts(
    status: &str,
    track_id: Option<&Value<'_>>,
    title: Option<&Value<'_>>,
    artists: Option<&Value<'_>>,
) -> Option<PlaybackNotification> {
    let Some(status) = PlaybackStatus::from_mpris(status) else {
        tracing::debug!(status, "unknown playback status");
        return None;
    };

    let mut notification = PlaybackNotification::new(status);
    notification.track_id = track_id.and_then(string_value);
    notification.title = title.and_then(string_value);
    notification.artists = artists.map(string_list).unwrap_or_default();
    Some(notification)
}

// Spotify has sent the track id both as a string and as an object path.
fn string_value(value: &Value<'_>) -> Option<String> {
    match value {
        Value::Str(s) => Some(s.to_string()),
        Value::ObjectPath(path) => Some(path.to_string()),
        Value::Value(inner) => string_value(inner),
        _ => None,
    }
}

fn string_list(value: &Value<'_>) -> Vec<String> {
    match value {
        Value::Array(array) => array.iter().filter_map(string_value).collect(),
        Value::Value(inner) => string_list(inner),
        other => string_value(other).into_iter().collect(),
    }
}
