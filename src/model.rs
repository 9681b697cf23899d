use chrono::{DateTime, Utc};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Placeholder colour some feeds carry for untyped events.
const PLACEHOLDER_COLOR: &str = "#ababa";
const PLACEHOLDER_REPLACEMENT: &str = "#e25238";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Link {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct LocationRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct EventType {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub color: String,
}

impl EventType {
    /// Terminal colour for the event type, if the feed colour is usable.
    pub fn display_color(&self) -> Option<Color> {
        let hex = if self.color == PLACEHOLDER_COLOR {
            PLACEHOLDER_REPLACEMENT
        } else {
            self.color.as_str()
        };
        Color::from_str(hex).ok()
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct SpeakerRef {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct TagRef {
    pub id: i64,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Event {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: LocationRef,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default)]
    pub speakers: Vec<SpeakerRef>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub tags: Vec<TagRef>,
}

impl Event {
    pub fn has_tag(&self, tag_id: i64) -> bool {
        self.tags.iter().any(|t| t.id == tag_id)
    }

    /// Speaker names joined the way the search stage matches them.
    pub fn speaker_names(&self) -> String {
        self.speakers
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Affiliation {
    pub organization: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct SpeakerLink {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub sort_order: i64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct EventRef {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Speaker {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub affiliations: Vec<Affiliation>,
    #[serde(default)]
    pub links: Vec<SpeakerLink>,
    #[serde(default)]
    pub events: Vec<EventRef>,
}

impl Speaker {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Hacker")
    }

    pub fn sorted_links(&self) -> Vec<&SpeakerLink> {
        let mut links: Vec<_> = self.links.iter().collect();
        links.sort_by_key(|l| l.sort_order);
        links
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Location {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub hotel: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Tag {
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub links: Vec<Link>,
    /// Tag carried by the events this organization runs.
    #[serde(default)]
    pub tag_id_as_organizer: Option<i64>,
}
