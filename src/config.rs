use crate::dates::Zone;
use crate::schedule::{DEFAULT_KIOSK_TAG, DEFAULT_LOOKAHEAD_HOURS};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConferenceConfig {
    pub name: String,
    /// IANA zone name the schedule is shown in.
    pub timezone: String,
    pub start: Option<DateTime<Utc>>,
}

impl Default for ConferenceConfig {
    fn default() -> Self {
        Self {
            name: "DEF CON".to_string(),
            timezone: "America/Los_Angeles".to_string(),
            start: None,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct KioskConfig {
    pub tag: i64,
    pub lookahead_hours: u32,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            tag: DEFAULT_KIOSK_TAG,
            lookahead_hours: DEFAULT_LOOKAHEAD_HOURS,
        }
    }
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub conference: ConferenceConfig,
    pub data_dir: Option<PathBuf>,
    pub kiosk: KioskConfig,
}

impl Config {
    /// Reads the config file, falling back to defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Error reading `{}`", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Error parsing `{}`", path.display()))
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.conference
            .timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("Invalid timezone `{}`: {}", self.conference.timezone, e))
    }

    /// The conference zone, or the viewer's zone when `local_time` is set.
    pub fn zone(&self, local_time: bool) -> Result<Zone> {
        if local_time {
            Ok(Zone::Viewer)
        } else {
            Ok(Zone::Conference(self.timezone()?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        let config = Config::load(&dir.path().join("config.toml"))?;
        assert_eq!(config, Config::default());
        assert_eq!(config.kiosk.tag, 45589);
        assert_eq!(config.kiosk.lookahead_hours, 6);
        assert_eq!(
            config.zone(false)?,
            Zone::Conference(chrono_tz::America::Los_Angeles)
        );
        assert_eq!(config.zone(true)?, Zone::Viewer);
        Ok(())
    }

    #[test]
    fn test_partial_file() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
data_dir = "/srv/feeds"

[conference]
timezone = "Europe/Berlin"
start = "2023-08-11T00:00:00-07:00"

[kiosk]
lookahead_hours = 2
"#,
        )?;
        let config = Config::load(&path)?;
        assert_eq!(config.conference.name, "DEF CON");
        assert_eq!(config.timezone()?, chrono_tz::Europe::Berlin);
        assert_eq!(
            config.conference.start,
            Some(Utc.with_ymd_and_hms(2023, 8, 11, 7, 0, 0).unwrap())
        );
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/feeds")));
        assert_eq!(config.kiosk.tag, 45589);
        assert_eq!(config.kiosk.lookahead_hours, 2);
        Ok(())
    }

    #[test]
    fn test_invalid_timezone() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "[conference]\ntimezone = \"Mars/Olympus\"\n")?;
        let config = Config::load(&path)?;
        assert!(config.timezone().is_err());
        assert!(config.zone(true).is_ok());
        Ok(())
    }
}
