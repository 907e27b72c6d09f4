//! spotify-mute - Main entry point
//!
//! Watches the Spotify client on the session bus and mutes the system mixer
//! while an advertisement plays.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use spotify_mute_bus::Event;
use spotify_mute_config::{parse_config, ConfigError, Settings};
use spotify_mute_detect::SpotifyAdDetector;
use spotify_mute_engine::Engine;
use spotify_mute_mixer::AmixerController;
use spotify_mute_mpris::{BusListener, ListenerExit};
use spotify_mute_notify::{DesktopNotifier, NotifierRef, NullNotifier};
use tokio::signal;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod args;

use args::{version_banner, Args};

/// Exit status for configuration and bus errors.
const EXIT_FAILURE: u8 = 4;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    if args.version {
        println!("{}", version_banner());
        return ExitCode::SUCCESS;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,spotify_mute=debug")),
        )
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", exit_message(&e));
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

async fn run(args: Args) -> Result<()> {
    info!("{}", version_banner());

    let settings = load_settings(args.config.as_deref())?;
    info!("Effective configuration:");
    for line in settings.describe() {
        info!("  {}", line);
    }

    let listener = BusListener::connect().await?;

    let (sender, mut receiver) = spotify_mute_bus::channel();
    let notifier: NotifierRef = if settings.show_notification {
        Arc::new(DesktopNotifier::new())
    } else {
        Arc::new(NullNotifier)
    };
    let mut engine = Engine::new(
        &settings,
        Arc::new(SpotifyAdDetector),
        Arc::new(AmixerController::new()),
        notifier,
        sender.clone(),
    );
    let engine_task = tokio::spawn(async move { engine.run(&mut receiver).await });

    let listener_exit = tokio::select! {
        exit = listener.run(sender.clone()) => {
            let exit = exit?;
            match exit {
                ListenerExit::PlayerGone => info!("Spotify has quit, shutting down"),
                other => warn!(?other, "bus listener stopped, shutting down"),
            }
            Some(exit)
        }
        _ = shutdown_signal() => None,
    };

    sender.send(final_event(listener_exit)).await;
    let exit = engine_task.await.context("engine task failed")?;
    debug!(?exit, "engine finished");
    Ok(())
}

/// Load settings from `path`, falling back to defaults when no file is given
/// or the file does not exist.
fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let Some(path) = path else {
        warn!("No configuration file given, using defaults");
        return Ok(Settings::default());
    };

    match parse_config(path) {
        Ok(settings) => {
            info!("Loaded configuration from {}", path.display());
            Ok(settings)
        }
        Err(e) if e.is_not_found() => {
            warn!(
                "Configuration file {} not found, using defaults",
                path.display()
            );
            Ok(Settings::default())
        }
        Err(e) => Err(e),
    }
}

/// Event that stops the engine. Only a departed player finishes a pending
/// unmute; on a signal the audio is left as it is.
fn final_event(listener_exit: Option<ListenerExit>) -> Event {
    match listener_exit {
        Some(ListenerExit::PlayerGone) => Event::PlayerGone,
        _ => Event::Shutdown,
    }
}

fn exit_message(error: &anyhow::Error) -> String {
    let message = format!("{:#}", error);
    if message.ends_with('.') {
        format!("{} Exiting.", message)
    } else {
        format!("{}. Exiting.", message)
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}
