use crate::error::{FeedError, ScheduleError};
use crate::model::{Event, Location, Organization, Speaker, Tag};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

pub const EVENTS_FILE: &str = "events.json";
pub const SPEAKERS_FILE: &str = "speakers.json";
pub const LOCATIONS_FILE: &str = "locations.json";
pub const TAGS_FILE: &str = "tags.json";
pub const ORGANIZATIONS_FILE: &str = "organizations.json";

fn read_feed<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ScheduleError> {
    let upstream = |source: FeedError| ScheduleError::UpstreamFailure {
        path: PathBuf::from(path),
        source,
    };
    let contents = fs::read_to_string(path).map_err(|e| upstream(e.into()))?;
    let items: Vec<T> = serde_json::from_str(&contents).map_err(|e| upstream(e.into()))?;
    log::debug!("loaded {} records from {}", items.len(), path.display());
    Ok(items)
}

/// Events sorted by begin, which the day grouping relies on.
pub fn load_events(data_dir: &Path) -> Result<Vec<Event>, ScheduleError> {
    let mut events: Vec<Event> = read_feed(&data_dir.join(EVENTS_FILE))?;
    events.sort_by_key(|e| e.begin);
    Ok(events)
}

pub fn load_speakers(data_dir: &Path) -> Result<Vec<Speaker>, ScheduleError> {
    read_feed(&data_dir.join(SPEAKERS_FILE))
}

pub fn load_locations(data_dir: &Path) -> Result<Vec<Location>, ScheduleError> {
    read_feed(&data_dir.join(LOCATIONS_FILE))
}

pub fn load_organizations(data_dir: &Path) -> Result<Vec<Organization>, ScheduleError> {
    read_feed(&data_dir.join(ORGANIZATIONS_FILE))
}

/// Tags are optional; a missing feed yields none.
pub fn load_tags(data_dir: &Path) -> Result<Vec<Tag>, ScheduleError> {
    let path = data_dir.join(TAGS_FILE);
    if !path.exists() {
        log::debug!("no tag feed at {}", path.display());
        return Ok(vec![]);
    }
    read_feed(&path)
}
