use thiserror::Error;

/// Errors from the session bus side.
#[derive(Debug, Error)]
pub enum BusError {
    /// Could not reach the session bus.
    #[error("failed to connect to the session bus: {0}")]
    Connect(#[source] zbus::Error),

    /// Nobody owns the player's bus name.
    #[error("Spotify is not running ({name} has no owner on the session bus)")]
    PlayerNotRunning { name: String },

    /// Could not subscribe to player signals.
    #[error("failed to subscribe to player signals: {0}")]
    Subscribe(#[source] zbus::Error),

    /// Reading a player property failed.
    #[error("failed to read player property {property}: {source}")]
    Property {
        property: &'static str,
        #[source]
        source: zbus::Error,
    },
}
