//! INI configuration parser.
//!
//! Validation order: sections, entries, mode, then values. Entries in the
//! mode section override the same entries in the main section.

use crate::error::{ConfigError, ConfigResult};
use crate::settings::{Mode, Settings, DEFAULT_SHOW_NOTIFICATION, MAIN_SECTION};
use ini::{Ini, Properties};
use std::path::Path;
use std::time::Duration;

const MAIN_SECTION_ENTRIES: &[&str] = &["Mode", "ShowNotification", "WaitBeforeUnmute"];

/// Parse a configuration file into validated settings.
pub fn parse_config(path: &Path) -> ConfigResult<Settings> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_config_content(&content, path)
}

/// Parse configuration content (for testing without filesystem).
pub fn parse_config_content(content: &str, path: &Path) -> ConfigResult<Settings> {
    let ini = Ini::load_from_str(content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    validate_sections(&ini, path)?;
    let mode = validate_mode(&ini)?;

    let main = ini.section(Some(MAIN_SECTION));
    let mode_section = ini.section(Some(mode.as_str()));
    let lookup = |entry: &str| {
        mode_section
            .and_then(|p| p.get(entry))
            .or_else(|| main.and_then(|p| p.get(entry)))
    };

    let wait_before_unmute = match lookup("WaitBeforeUnmute") {
        Some(raw) => parse_wait_before_unmute(raw)?,
        None => Settings::default().wait_before_unmute,
    };

    let show_notification = lookup("ShowNotification")
        .map(parse_show_notification)
        .unwrap_or(DEFAULT_SHOW_NOTIFICATION);

    let settings = Settings {
        mode,
        wait_before_unmute,
        show_notification,
    };
    tracing::debug!(?settings, path = %path.display(), "configuration parsed");

    Ok(settings)
}

fn valid_entries(section: &str) -> Option<&'static [&'static str]> {
    if section == MAIN_SECTION {
        return Some(MAIN_SECTION_ENTRIES);
    }
    Mode::from_name(section).map(|mode| mode.valid_entries())
}

fn validate_sections(ini: &Ini, path: &Path) -> ConfigResult<()> {
    for (section, properties) in ini.iter() {
        let Some(section) = section else {
            if !properties.is_empty() {
                return Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    message: "entries outside of a section".to_string(),
                });
            }
            continue;
        };

        let Some(allowed) = valid_entries(section) else {
            return Err(ConfigError::InvalidSection {
                section: section.to_string(),
            });
        };

        validate_entries(section, properties, allowed)?;
    }

    Ok(())
}

fn validate_entries(section: &str, properties: &Properties, allowed: &[&str]) -> ConfigResult<()> {
    for (entry, _) in properties.iter() {
        if !allowed.contains(&entry) {
            return Err(ConfigError::InvalidEntry {
                section: section.to_string(),
                entry: entry.to_string(),
            });
        }
    }
    Ok(())
}

fn validate_mode(ini: &Ini) -> ConfigResult<Mode> {
    let configured = ini.section(Some(MAIN_SECTION)).and_then(|p| p.get("Mode"));

    configured
        .and_then(Mode::from_name)
        .ok_or_else(|| ConfigError::InvalidValue {
            entry: "Mode".to_string(),
            value: configured.unwrap_or("<missing>").to_string(),
            expected: Mode::ALL
                .iter()
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

fn parse_wait_before_unmute(raw: &str) -> ConfigResult<Duration> {
    let invalid = |expected: &str| ConfigError::InvalidValue {
        entry: "WaitBeforeUnmute".to_string(),
        value: raw.to_string(),
        expected: expected.to_string(),
    };

    let seconds: f64 = raw.trim().parse().map_err(|_| invalid("of type float"))?;
    if seconds < 0.0 {
        return Err(invalid("greater or equal zero"));
    }

    Duration::try_from_secs_f64(seconds).map_err(|_| invalid("a finite number of seconds"))
}

/// Only the literal `false` (any case) disables notifications.
fn parse_show_notification(raw: &str) -> bool {
    !raw.trim().eq_ignore_ascii_case("false")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(content: &str) -> ConfigResult<Settings> {
        parse_config_content(content, Path::new("test.ini"))
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let settings = parse("[SPOTIFY_MUTE]\nMode = MUTIFY\n").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_full_main_section() {
        let settings = parse(
            "[SPOTIFY_MUTE]\nMode = MUTIFY\nWaitBeforeUnmute = 2.5\nShowNotification = FALSE\n",
        )
        .unwrap();

        assert_eq!(settings.wait_before_unmute, Duration::from_millis(2500));
        assert!(!settings.show_notification);
    }

    #[test]
    fn test_show_notification_only_false_disables() {
        for (raw, expected) in [
            ("false", false),
            ("False", false),
            ("no", true),
            ("0", true),
            ("true", true),
            ("", true),
        ] {
            let content = format!("[SPOTIFY_MUTE]\nMode = MUTIFY\nShowNotification = {raw}\n");
            let settings = parse(&content).unwrap();
            assert_eq!(settings.show_notification, expected, "value {raw:?}");
        }
    }

    #[test]
    fn test_mode_section_overrides_main_section() {
        let settings = parse(
            "[SPOTIFY_MUTE]\nMode = MUTIFY\nWaitBeforeUnmute = 1\nShowNotification = true\n\n\
             [MUTIFY]\nWaitBeforeUnmute = 3\nShowNotification = false\n",
        )
        .unwrap();

        assert_eq!(settings.wait_before_unmute, Duration::from_secs(3));
        assert!(!settings.show_notification);
    }

    #[test]
    fn test_invalid_mode() {
        let err = parse("[SPOTIFY_MUTE]\nMode = SILENCE\n").unwrap_err();
        match err {
            ConfigError::InvalidValue { entry, value, .. } => {
                assert_eq!(entry, "Mode");
                assert_eq!(value, "SILENCE");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_mode_is_rejected() {
        let err = parse("[SPOTIFY_MUTE]\nWaitBeforeUnmute = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref entry, .. } if entry == "Mode"));
    }

    #[test]
    fn test_negative_wait_is_rejected() {
        let err = parse("[SPOTIFY_MUTE]\nMode = MUTIFY\nWaitBeforeUnmute = -1\n").unwrap_err();
        assert!(err.to_string().contains("greater or equal zero"));
    }

    #[test]
    fn test_non_numeric_wait_is_rejected() {
        let err = parse("[SPOTIFY_MUTE]\nMode = MUTIFY\nWaitBeforeUnmute = soon\n").unwrap_err();
        assert!(err.to_string().contains("of type float"));
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        let err = parse("[SPOTIFY_MUTE]\nMode = MUTIFY\n[EXTRA]\nFoo = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSection { ref section } if section == "EXTRA"));
    }

    #[test]
    fn test_mode_entry_not_allowed_in_mode_section() {
        let err = parse("[SPOTIFY_MUTE]\nMode = MUTIFY\n[MUTIFY]\nMode = MUTIFY\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEntry { ref section, ref entry } if section == "MUTIFY" && entry == "Mode"
        ));
    }

    #[test]
    fn test_entries_are_case_sensitive() {
        let err = parse("[SPOTIFY_MUTE]\nMode = MUTIFY\nshownotification = false\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEntry { .. }));
    }

    #[test]
    fn test_parse_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[SPOTIFY_MUTE]").unwrap();
        writeln!(file, "Mode = MUTIFY").unwrap();
        writeln!(file, "WaitBeforeUnmute = 0.5").unwrap();

        let settings = parse_config(file.path()).unwrap();
        assert_eq!(settings.wait_before_unmute, Duration::from_millis(500));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_config(&dir.path().join("absent.ini")).unwrap_err();
        assert!(err.is_not_found());
    }
}
