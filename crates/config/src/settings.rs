//! Validated settings.

use std::time::Duration;

/// Main configuration section.
pub const MAIN_SECTION: &str = "SPOTIFY_MUTE";

/// Default grace period between the end of an ad and unmuting.
pub const DEFAULT_WAIT_BEFORE_UNMUTE: Duration = Duration::ZERO;

pub const DEFAULT_SHOW_NOTIFICATION: bool = true;

/// How advertisements are silenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Mute the master channel while an ad plays.
    #[default]
    Mutify,
}

impl Mode {
    pub const ALL: &'static [Mode] = &[Mode::Mutify];

    /// Name used in the configuration file, both as `Mode` value and as
    /// section name for mode-specific entries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Mutify => "MUTIFY",
        }
    }

    /// Entries that may appear in this mode's section.
    pub fn valid_entries(&self) -> &'static [&'static str] {
        match self {
            Mode::Mutify => &["ShowNotification", "WaitBeforeUnmute"],
        }
    }

    pub fn from_name(name: &str) -> Option<Mode> {
        Self::ALL.iter().copied().find(|m| m.as_str() == name)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable settings for the lifetime of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub mode: Mode,

    /// Delay before unmuting once an ad ends. Zero unmutes immediately.
    pub wait_before_unmute: Duration,

    /// Show a desktop notification when an ad gets muted.
    pub show_notification: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            wait_before_unmute: DEFAULT_WAIT_BEFORE_UNMUTE,
            show_notification: DEFAULT_SHOW_NOTIFICATION,
        }
    }
}

impl Settings {
    /// Effective values keyed by their configuration entry, sorted by key.
    pub fn effective_entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Mode", self.mode.to_string()),
            ("ShowNotification", self.show_notification.to_string()),
            (
                "WaitBeforeUnmute",
                self.wait_before_unmute.as_secs_f64().to_string(),
            ),
        ]
    }

    /// Effective values as aligned `key = value` lines.
    pub fn describe(&self) -> Vec<String> {
        let entries = self.effective_entries();
        let width = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);

        entries
            .into_iter()
            .map(|(key, value)| format!("{:<width$} = {}", key, value, width = width))
            .collect()
    }
}
