//! Player signal subscription.

use crate::error::BusError;
use crate::metadata::notification_from_metadata;
use futures::StreamExt;
use spotify_mute_bus::{Event, EventSender};
use spotify_mute_detect::PlaybackNotification;
use std::collections::HashMap;
use zbus::fdo::{DBusProxy, PropertiesProxy};
use zbus::names::BusName;
use zbus::zvariant::OwnedValue;
use zbus::{CacheProperties, Connection};

/// Well-known bus name of the Spotify desktop client.
pub const SPOTIFY_BUS_NAME: &str = "org.mpris.MediaPlayer2.spotify";

/// Object path of every MPRIS player.
pub const PLAYER_PATH: &str = "/org/mpris/MediaPlayer2";

/// Interface carrying playback state.
pub const PLAYER_INTERFACE: &str = "org.mpris.MediaPlayer2.Player";

const WATCHED_PROPERTIES: [&str; 2] = ["PlaybackStatus", "Metadata"];

#[zbus::proxy(
    interface = "org.mpris.MediaPlayer2.Player",
    default_service = "org.mpris.MediaPlayer2.spotify",
    default_path = "/org/mpris/MediaPlayer2",
    gen_blocking = false
)]
trait Player {
    #[zbus(property)]
    fn playback_status(&self) -> zbus::Result<String>;

    #[zbus(property)]
    fn metadata(&self) -> zbus::Result<HashMap<String, OwnedValue>>;
}

/// Why the listener returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerExit {
    /// The player released its bus name.
    PlayerGone,
    /// The event queue was closed.
    QueueClosed,
    /// The bus stopped delivering signals.
    StreamEnded,
}

/// Session bus connection watching one player.
pub struct BusListener {
    connection: Connection,
    player: PlayerProxy<'static>,
}

impl BusListener {
    /// Connect to the session bus and check that Spotify is running.
    pub async fn connect() -> Result<Self, BusError> {
        let connection = Connection::session().await.map_err(BusError::Connect)?;

        let dbus = DBusProxy::new(&connection).await.map_err(BusError::Connect)?;
        let name = BusName::try_from(SPOTIFY_BUS_NAME)
            .map_err(|e| BusError::Connect(zbus::Error::from(e)))?;
        let running = dbus
            .name_has_owner(name)
            .await
            .map_err(|e| BusError::Connect(e.into()))?;
        if !running {
            return Err(BusError::PlayerNotRunning {
                name: SPOTIFY_BUS_NAME.to_string(),
            });
        }

        // Property reads must see the value the signal announced, not a
        // cache that may not have caught up yet.
        let player = PlayerProxy::builder(&connection)
            .cache_properties(CacheProperties::No)
            .build()
            .await
            .map_err(BusError::Connect)?;

        tracing::info!(name = SPOTIFY_BUS_NAME, "connected to session bus");
        Ok(Self { connection, player })
    }

    /// Read both player properties.
    pub async fn snapshot(&self) -> Result<Option<PlaybackNotification>, BusError> {
        let status = self
            .player
            .playback_status()
            .await
            .map_err(|source| BusError::Property {
                property: "PlaybackStatus",
                source,
            })?;
        let metadata = self
            .player
            .metadata()
            .await
            .map_err(|source| BusError::Property {
                property: "Metadata",
                source,
            })?;

        Ok(notification_from_metadata(&status, &metadata))
    }

    /// Forward player changes into `sender` until the player quits, the
    /// queue closes or the bus goes away.
    ///
    /// The current state is sent first so an ad already playing at startup
    /// gets muted.
    pub async fn run(self, sender: EventSender) -> Result<ListenerExit, BusError> {
        let properties = PropertiesProxy::builder(&self.connection)
            .destination(SPOTIFY_BUS_NAME)
            .map_err(BusError::Subscribe)?
            .path(PLAYER_PATH)
            .map_err(BusError::Subscribe)?
            .cache_properties(CacheProperties::No)
            .build()
            .await
            .map_err(BusError::Subscribe)?;
        let mut changes = properties
            .receive_properties_changed()
            .await
            .map_err(BusError::Subscribe)?;

        let dbus = DBusProxy::new(&self.connection)
            .await
            .map_err(BusError::Subscribe)?;
        let mut owner_changes = dbus
            .receive_name_owner_changed_with_args(&[(0, SPOTIFY_BUS_NAME)])
            .await
            .map_err(BusError::Subscribe)?;

        tracing::debug!(path = PLAYER_PATH, interface = PLAYER_INTERFACE, "subscribed");

        if !self.forward_snapshot(&sender).await {
            return Ok(ListenerExit::QueueClosed);
        }

        loop {
            tokio::select! {
                signal = changes.next() => {
                    let Some(signal) = signal else {
                        tracing::warn!("properties stream ended");
                        return Ok(ListenerExit::StreamEnded);
                    };
                    let args = match signal.args() {
                        Ok(args) => args,
                        Err(e) => {
                            tracing::warn!("malformed PropertiesChanged signal: {}", e);
                            continue;
                        }
                    };
                    if args.interface_name().as_str() != PLAYER_INTERFACE {
                        continue;
                    }
                    let relevant = args
                        .changed_properties()
                        .keys()
                        .any(|key| WATCHED_PROPERTIES.contains(key));
                    if !relevant {
                        continue;
                    }

                    if !self.forward_snapshot(&sender).await {
                        return Ok(ListenerExit::QueueClosed);
                    }
                }
                signal = owner_changes.next() => {
                    let Some(signal) = signal else {
                        tracing::warn!("name owner stream ended");
                        return Ok(ListenerExit::StreamEnded);
                    };
                    match signal.args() {
                        Ok(args) if args.new_owner().is_none() => {
                            tracing::info!(name = SPOTIFY_BUS_NAME, "player left the bus");
                            return Ok(ListenerExit::PlayerGone);
                        }
                        Ok(_) => tracing::debug!(name = SPOTIFY_BUS_NAME, "player owner changed"),
                        Err(e) => tracing::warn!("malformed NameOwnerChanged signal: {}", e),
                    }
                }
            }
        }
    }

    /// Returns false when the queue is closed.
    async fn forward_snapshot(&self, sender: &EventSender) -> bool {
        match self.snapshot().await {
            Ok(Some(notification)) => {
                tracing::debug!(
                    track_id = ?notification.track_id,
                    status = %notification.status,
                    "playback changed"
                );
                sender.send(Event::Playback(notification)).await
            }
            Ok(None) => true,
            Err(e) => {
                tracing::warn!("{}", e);
                true
            }
        }
    }
}
