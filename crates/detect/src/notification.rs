/// Playback status as reported by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackStatus {
    Playing,
    Paused,
    Stopped,
}

impl PlaybackStatus {
    /// Parse an MPRIS `PlaybackStatus` value.
    pub fn from_mpris(value: &str) -> Option<Self> {
        match value {
            "Playing" => Some(PlaybackStatus::Playing),
            "Paused" => Some(PlaybackStatus::Paused),
            "Stopped" => Some(PlaybackStatus::Stopped),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PlaybackStatus::Playing => "Playing",
            PlaybackStatus::Paused => "Paused",
            PlaybackStatus::Stopped => "Stopped",
        };
        write!(f, "{}", label)
    }
}

/// Snapshot of the player state carried by one bus notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackNotification {
    /// Player-specific track identifier (`mpris:trackid`).
    pub track_id: Option<String>,

    /// Track title (`xesam:title`)
    pub title: Option<String>,

    /// Track artists (`xesam:artist`)
    pub artists: Vec<String>,

    pub status: PlaybackStatus,
}

impl PlaybackNotification {
    pub fn new(status: PlaybackStatus) -> Self {
        Self {
            track_id: None,
            title: None,
            artists: Vec::new(),
            status,
        }
    }

    /// Shorthand for a notification about a playing track.
    pub fn playing(track_id: impl Into<String>) -> Self {
        Self::new(PlaybackStatus::Playing).with_track_id(track_id)
    }

    pub fn with_track_id(mut self, track_id: impl Into<String>) -> Self {
        self.track_id = Some(track_id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artists.push(artist.into());
        self
    }

    /// Track id, if present and not blank.
    pub fn track_id(&self) -> Option<&str> {
        self.track_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}
