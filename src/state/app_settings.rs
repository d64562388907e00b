use log::{LevelFilter, warn};
use std::path::PathBuf;
use std::time::Duration;

pub const SNAPSHOT_ENV: &str = "BRACKETVIEW_SNAPSHOT";
pub const LOG_ENV: &str = "BRACKETVIEW_LOG";
pub const RELOAD_ENV: &str = "BRACKETVIEW_RELOAD_SECS";

const DEFAULT_RELOAD_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: LevelFilter,
    pub snapshot: Option<PathBuf>,
    /// `None` disables periodic reloads.
    pub reload_every: Option<Duration>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: LevelFilter::Info,
            snapshot: None,
            reload_every: Some(Duration::from_secs(DEFAULT_RELOAD_SECS)),
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Settings from an arbitrary key lookup. Bad values fall back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(path) = lookup(SNAPSHOT_ENV).filter(|p| !p.trim().is_empty()) {
            settings.snapshot = Some(PathBuf::from(path.trim()));
        }

        if let Some(level) = lookup(LOG_ENV) {
            match level.trim().parse::<LevelFilter>() {
                Ok(level) => settings.log_level = level,
                Err(_) => warn!("ignoring {LOG_ENV}={level:?}: not a log level"),
            }
        }

        if let Some(secs) = lookup(RELOAD_ENV) {
            match secs.trim().parse::<u64>() {
                Ok(0) => settings.reload_every = None,
                Ok(secs) => settings.reload_every = Some(Duration::from_secs(secs)),
                Err(_) => warn!("ignoring {RELOAD_ENV}={secs:?}: not a number of seconds"),
            }
        }

        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> AppSettings {
        let env: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppSettings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings(&[]);
        assert_eq!(settings.log_level, LevelFilter::Info);
        assert_eq!(settings.snapshot, None);
        assert_eq!(settings.reload_every, Some(Duration::from_secs(30)));
        assert!(!settings.full_screen);
    }

    #[test]
    fn test_overrides() {
        let settings = settings(&[
            (SNAPSHOT_ENV, "/tmp/cup.json"),
            (LOG_ENV, "debug"),
            (RELOAD_ENV, "5"),
        ]);
        assert_eq!(settings.snapshot, Some(PathBuf::from("/tmp/cup.json")));
        assert_eq!(settings.log_level, LevelFilter::Debug);
        assert_eq!(settings.reload_every, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_zero_disables_reload() {
        assert_eq!(settings(&[(RELOAD_ENV, "0")]).reload_every, None);
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let settings = settings(&[(LOG_ENV, "loud"), (RELOAD_ENV, "soon"), (SNAPSHOT_ENV, "  ")]);
        assert_eq!(settings.log_level, LevelFilter::Info);
        assert_eq!(settings.reload_every, Some(Duration::from_secs(30)));
        assert_eq!(settings.snapshot, None);
    }
}
