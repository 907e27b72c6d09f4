//! Settings for spotify-mute.
//!
//! Settings are created once at startup, either from defaults or from an
//! INI file, and never change afterwards.
//!
//! ```ini
//! [SPOTIFY_MUTE]
//! Mode = MUTIFY
//! WaitBeforeUnmute = 1.5
//! ShowNotification = true
//!
//! # Optional, overrides the main section for the MUTIFY mode.
//! [MUTIFY]
//! ShowNotification = false
//! ```

mod error;
mod parser;
mod settings;

pub use error::{ConfigError, ConfigResult};
pub use parser::{parse_config, parse_config_content};
pub use settings::{
    Mode, Settings, DEFAULT_SHOW_NOTIFICATION, DEFAULT_WAIT_BEFORE_UNMUTE, MAIN_SECTION,
};
