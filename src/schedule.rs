//! Selecting, ordering and grouping the events a view shows.
//!
//! Everything here is a pure function of its inputs: no I/O, no clock reads,
//! and caller-owned data is only borrowed.

use crate::dates::{self, Zone};
use crate::error::ScheduleError;
use crate::model::{Event, Organization, Speaker};
use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub const DEFAULT_KIOSK_TAG: i64 = 45589;
pub const DEFAULT_LOOKAHEAD_HOURS: u32 = 6;

/// The day tab row selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tab {
    /// A weekday label such as `Thu`.
    Day(String),
    Bookmarks,
    Speakers,
    /// No tab selected, e.g. while a search is active.
    Cleared,
}

#[derive(Debug, Clone)]
pub struct FilterCriteria {
    pub event_id: Option<i64>,
    pub hide_completed: bool,
    pub tab: Tab,
    /// Event type name; empty disables the category stage.
    pub category: String,
    /// Free text; empty disables the search stage.
    pub search: String,
    pub zone: Zone,
}

impl FilterCriteria {
    pub fn new(zone: Zone) -> Self {
        Self {
            event_id: None,
            hide_completed: true,
            tab: Tab::Cleared,
            category: String::new(),
            search: String::new(),
            zone,
        }
    }
}

/// Inputs a filter pass needs besides the events themselves.
pub struct FilterContext<'a> {
    pub criteria: &'a FilterCriteria,
    pub bookmarks: &'a BTreeSet<i64>,
    pub now: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SingleEvent,
    HideCompleted,
    Bookmarks,
    Category,
    Search,
    DayTab,
}

/// Evaluation order; the first stage that decides wins.
pub const STAGES: [Stage; 6] = [
    Stage::SingleEvent,
    Stage::HideCompleted,
    Stage::Bookmarks,
    Stage::Category,
    Stage::Search,
    Stage::DayTab,
];

impl Stage {
    /// `Some(verdict)` if this stage decides the event, `None` to defer.
    pub fn decide(&self, event: &Event, ctx: &FilterContext) -> Option<bool> {
        let criteria = ctx.criteria;
        match self {
            Stage::SingleEvent => criteria.event_id.map(|id| event.id == id),
            Stage::HideCompleted => {
                (criteria.hide_completed && event.end <= ctx.now).then_some(false)
            }
            Stage::Bookmarks => {
                (criteria.tab == Tab::Bookmarks).then(|| ctx.bookmarks.contains(&event.id))
            }
            Stage::Category => (!criteria.category.is_empty())
                .then(|| event.event_type.name == criteria.category),
            Stage::Search => {
                (!criteria.search.is_empty()).then(|| matches_query(event, &criteria.search))
            }
            Stage::DayTab => match &criteria.tab {
                Tab::Day(label) => {
                    Some(dates::weekday_label(event.begin, criteria.zone) == *label)
                }
                _ => None,
            },
        }
    }
}

fn matches_query(event: &Event, query: &str) -> bool {
    let query = query.to_lowercase();
    event.title.to_lowercase().contains(&query)
        || event.description.to_lowercase().contains(&query)
        || event.speaker_names().to_lowercase().contains(&query)
}

pub fn passes(event: &Event, ctx: &FilterContext) -> bool {
    STAGES
        .iter()
        .find_map(|stage| stage.decide(event, ctx))
        .unwrap_or(false)
}

pub fn filter_events<'a>(events: &'a [Event], ctx: &FilterContext) -> Vec<&'a Event> {
    events.iter().filter(|e| passes(e, ctx)).collect()
}

/// Events beginning on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGroup<'a> {
    pub key: String,
    pub events: Vec<&'a Event>,
}

/// Buckets events by [`dates::day_key`], keeping buckets in first-seen order
/// and sorting each bucket by begin (stable).
pub fn group_by_day<'a>(events: &[&'a Event], zone: Zone) -> Vec<DayGroup<'a>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<DayGroup<'a>> = Vec::new();
    for &event in events {
        let key = dates::day_key(event.begin, zone);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(DayGroup {
                key,
                events: vec![],
            });
            groups.len() - 1
        });
        groups[slot].events.push(event);
    }
    for group in groups.iter_mut() {
        group.events.sort_by_key(|e| e.begin);
    }
    groups
}

/// Filter then group in one pass.
pub fn schedule<'a>(events: &'a [Event], ctx: &FilterContext) -> Vec<DayGroup<'a>> {
    group_by_day(&filter_events(events, ctx), ctx.criteria.zone)
}

/// A day tab: the weekday label and the day key of its first event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayTab {
    pub label: String,
    pub key: String,
}

/// Day tabs for the days that have events, in first-seen order.
pub fn day_tabs(
    events: &[Event],
    zone: Zone,
    hide_completed: bool,
    now: DateTime<Utc>,
) -> Vec<DayTab> {
    let mut tabs: Vec<DayTab> = Vec::new();
    for event in events.iter().filter(|e| !hide_completed || e.end > now) {
        let label = dates::weekday_label(event.begin, zone);
        if !tabs.iter().any(|t| t.label == label) {
            tabs.push(DayTab {
                label,
                key: dates::day_key(event.begin, zone),
            });
        }
    }
    tabs
}

/// Weekday labels that have events. The first entry is the default tab.
pub fn con_days(
    events: &[Event],
    zone: Zone,
    hide_completed: bool,
    now: DateTime<Utc>,
) -> Vec<String> {
    day_tabs(events, zone, hide_completed, now)
        .into_iter()
        .map(|t| t.label)
        .collect()
}

/// Distinct event type names, sorted.
pub fn categories(events: &[Event]) -> BTreeSet<String> {
    events.iter().map(|e| e.event_type.name.clone()).collect()
}

/// Events carrying `tag_id` that begin within `[now, now + lookahead_hours]`.
pub fn kiosk_filter(
    events: &[Event],
    tag_id: i64,
    lookahead_hours: u32,
    now: DateTime<Utc>,
) -> Vec<&Event> {
    let horizon = now + Duration::hours(i64::from(lookahead_hours));
    events
        .iter()
        .filter(|e| e.has_tag(tag_id))
        .filter(|e| e.begin >= now && e.begin <= horizon)
        .collect()
}

/// Kiosk view contents: the kiosk window, sorted by begin, grouped by day.
pub fn kiosk_schedule(
    events: &[Event],
    tag_id: i64,
    lookahead_hours: u32,
    now: DateTime<Utc>,
    zone: Zone,
) -> Vec<DayGroup<'_>> {
    let mut selected = kiosk_filter(events, tag_id, lookahead_hours, now);
    selected.sort_by_key(|e| e.begin);
    group_by_day(&selected, zone)
}

/// Events carrying `tag_id`, grouped by day.
pub fn tag_events(events: &[Event], tag_id: i64, zone: Zone) -> Vec<DayGroup<'_>> {
    let tagged: Vec<&Event> = events.iter().filter(|e| e.has_tag(tag_id)).collect();
    group_by_day(&tagged, zone)
}

fn initial(name: &str) -> char {
    name.chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('#')
}

/// Speaker directory: first letter of the name to speakers sorted by name.
pub fn group_speakers(speakers: &[Speaker]) -> BTreeMap<char, Vec<&Speaker>> {
    let mut groups: BTreeMap<char, Vec<&Speaker>> = BTreeMap::new();
    for speaker in speakers {
        groups.entry(initial(&speaker.name)).or_default().push(speaker);
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
    }
    groups
}

pub fn search_speakers<'a>(speakers: &'a [Speaker], query: &str) -> Vec<&'a Speaker> {
    let query = query.to_lowercase();
    speakers
        .iter()
        .filter(|s| s.name.to_lowercase().contains(&query))
        .collect()
}

pub fn find_event(events: &[Event], id: Option<i64>) -> Result<&Event, ScheduleError> {
    let id = id.ok_or(ScheduleError::MissingData("event"))?;
    events
        .iter()
        .find(|e| e.id == id)
        .ok_or(ScheduleError::NotFound { kind: "event", id })
}

pub fn find_speaker(speakers: &[Speaker], id: Option<i64>) -> Result<&Speaker, ScheduleError> {
    let id = id.ok_or(ScheduleError::MissingData("speaker"))?;
    speakers
        .iter()
        .find(|s| s.id == id)
        .ok_or(ScheduleError::NotFound { kind: "speaker", id })
}

pub fn find_organization(
    orgs: &[Organization],
    id: Option<i64>,
) -> Result<&Organization, ScheduleError> {
    let id = id.ok_or(ScheduleError::MissingData("organization"))?;
    orgs.iter().find(|o| o.id == id).ok_or(ScheduleError::NotFound {
        kind: "organization",
        id,
    })
}

/// A speaker's back-references resolved against the event feed, ordered by
/// begin. References to events missing from the feed are skipped.
pub fn speaker_events<'a>(speaker: &Speaker, events: &'a [Event]) -> Vec<&'a Event> {
    let mut found: Vec<&Event> = speaker
        .events
        .iter()
        .filter_map(|r| events.iter().find(|e| e.id == r.id))
        .collect();
    found.sort_by_key(|e| e.begin);
    found
}
