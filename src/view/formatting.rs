use crate::dates::{self, Countdown, Zone};
use crate::model::{Event, Location, Organization, Speaker};
use crate::schedule::{DayGroup, DayTab};
use crate::theme::Theme;
use crossterm::style::Stylize;
use std::collections::{BTreeMap, BTreeSet};

const BOOKMARK_MARK: &str = "*";

/// Bold heading in the view's accent colour.
pub fn heading(text: &str, theme: &Theme) -> String {
    text.with(theme.term_color()).bold().to_string()
}

pub fn format_event_line(event: &Event, zone: Zone, bookmarked: bool) -> String {
    format!(
        "{} {}  {} [{}] @ {}",
        if bookmarked { BOOKMARK_MARK } else { " " },
        dates::compact_time_range(event.begin, event.end, zone),
        event.title,
        event.event_type.name,
        event.location.name
    )
}

/// Day headings followed by their events.
pub fn format_schedule(
    groups: &[DayGroup],
    zone: Zone,
    bookmarks: &BTreeSet<i64>,
    theme: &Theme,
) -> Vec<String> {
    if groups.is_empty() {
        return vec!["No events".to_string()];
    }
    let mut lines = vec![];
    for group in groups {
        lines.push(heading(&dates::date_group_title(&group.key), theme));
        for event in &group.events {
            lines.push(format_event_line(
                event,
                zone,
                bookmarks.contains(&event.id),
            ));
        }
        lines.push(String::new());
    }
    lines
}

pub fn format_event_details(
    event: &Event,
    zone: Zone,
    bookmarked: bool,
    theme: &Theme,
) -> Vec<String> {
    let mut lines = vec![heading(&event.title, theme)];
    if bookmarked {
        lines.push("Bookmarked".to_string());
    }
    lines.push(event.event_type.name.clone());
    lines.push(format!(
        "{} - {}",
        dates::event_time(event.begin, zone, true),
        dates::event_time(event.end, zone, true)
    ));
    lines.push(event.location.name.clone());
    lines.push(String::new());
    lines.extend(event.description.lines().map(str::to_string));
    if !event.links.is_empty() {
        lines.push(String::new());
        for link in &event.links {
            lines.push(format!("{}: {}", link.label, link.url));
        }
    }
    if !event.speakers.is_empty() {
        lines.push(String::new());
        lines.push(heading("Speakers", theme));
        for speaker in &event.speakers {
            lines.push(format!(
                "{} ({})",
                speaker.name,
                speaker.title.as_deref().unwrap_or("Hacker")
            ));
        }
    }
    lines
}

/// One `id  name` line per speaker.
pub fn format_speaker_list(speakers: &[&Speaker]) -> Vec<String> {
    speakers
        .iter()
        .map(|s| format!("{:>6}  {}", s.id, s.name))
        .collect()
}

pub fn format_speaker_directory(
    groups: &BTreeMap<char, Vec<&Speaker>>,
    theme: &Theme,
) -> Vec<String> {
    let mut lines = vec![];
    for (letter, speakers) in groups {
        lines.push(heading(&letter.to_string(), theme));
        lines.extend(
            format_speaker_list(speakers)
                .into_iter()
                .map(|l| format!("  {}", l)),
        );
    }
    lines
}

pub fn format_speaker_details(
    speaker: &Speaker,
    events: &[&Event],
    zone: Zone,
    theme: &Theme,
) -> Vec<String> {
    let mut lines = vec![heading(&speaker.name, theme)];
    lines.push(speaker.display_title().to_string());
    for affiliation in &speaker.affiliations {
        lines.push(format!("{}, {}", affiliation.organization, affiliation.title));
    }
    lines.push(String::new());
    lines.extend(speaker.description.lines().map(str::to_string));
    let links = speaker.sorted_links();
    if !links.is_empty() {
        lines.push(String::new());
        lines.push(heading("Links", theme));
        for link in links {
            lines.push(format!("{}: {}", link.title, link.url));
        }
    }
    if !events.is_empty() {
        lines.push(String::new());
        lines.push(heading("Events", theme));
        for event in events {
            lines.push(format!("{} ({})", event.title, event.id));
            lines.push(format!(
                "  {}",
                dates::compact_time_range(event.begin, event.end, zone)
            ));
            lines.push(format!("  {}", event.location.name));
        }
    }
    lines
}

/// Organization details, followed by its events when it organizes any.
pub fn format_organization(
    org: &Organization,
    groups: &[DayGroup],
    zone: Zone,
    theme: &Theme,
) -> Vec<String> {
    let mut lines = vec![heading(&org.name, theme)];
    if !org.description.is_empty() {
        lines.push(String::new());
        lines.extend(org.description.lines().map(str::to_string));
    }
    if org.tag_id_as_organizer.is_some() {
        lines.push(String::new());
        lines.push(heading(&format!("{} Events", org.name), theme));
        if groups.is_empty() {
            lines.push("No events".to_string());
        }
        for group in groups {
            lines.push(dates::date_group_title(&group.key));
            for event in &group.events {
                lines.push(format_event_line(event, zone, false));
            }
        }
    }
    if !org.links.is_empty() {
        lines.push(String::new());
        lines.push(heading("Links", theme));
        for link in &org.links {
            lines.push(format!("{}: {}", link.label, link.url));
        }
    }
    lines
}

pub fn format_locations(locations: &[Location]) -> Vec<String> {
    let mut sorted: Vec<&Location> = locations.iter().collect();
    sorted.sort_by(|a, b| a.hotel.cmp(&b.hotel).then_with(|| a.name.cmp(&b.name)));
    sorted
        .iter()
        .map(|l| match &l.hotel {
            Some(hotel) => format!("{} ({})", l.name, hotel),
            None => l.name.clone(),
        })
        .collect()
}

/// Day tabs with the default (first) tab marked, e.g. `[Thu Aug 10] Fri Aug 11`.
pub fn format_days(tabs: &[DayTab]) -> String {
    tabs.iter()
        .enumerate()
        .map(|(i, t)| {
            let text = format!("{} {}", t.label, dates::tab_date_title(&t.key));
            if i == 0 {
                format!("[{}]", text)
            } else {
                text
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_countdown(name: &str, countdown: &Countdown) -> String {
    format!("{} starts in {}", name, countdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::event;
    use crate::model::{Link, SpeakerLink, SpeakerRef};
    use chrono::{TimeZone, Utc};

    const LA: Zone = Zone::Conference(chrono_tz::America::Los_Angeles);

    fn get_event() -> Event {
        let mut e = event(
            42,
            Utc.with_ymd_and_hms(2023, 8, 11, 17, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2023, 8, 11, 18, 0, 0).unwrap(),
        );
        e.title = "WiFi Hacking 101".to_string();
        e.description = "line one\nline two".to_string();
        e.links = vec![Link {
            label: "Slides".to_string(),
            url: "https://example.org/slides".to_string(),
        }];
        e.speakers = vec![SpeakerRef {
            id: 1,
            name: "Alice".to_string(),
            title: None,
        }];
        e
    }

    #[test]
    fn test_format_event_line() {
        let e = get_event();
        assert_eq!(
            format_event_line(&e, LA, true),
            "* Fri Aug 11, 10:00 - 11:00 PDT  WiFi Hacking 101 [Talk] @ Track 1"
        );
        assert!(format_event_line(&e, LA, false).starts_with("  Fri"));
    }

    #[test]
    fn test_format_schedule() {
        let e = get_event();
        let groups = vec![DayGroup {
            key: "2023-08-11".to_string(),
            events: vec![&e],
        }];
        let lines = format_schedule(&groups, LA, &BTreeSet::from([42]), &Theme::default());
        assert!(lines[0].contains("August 11"));
        assert!(lines[1].starts_with("* "));
        assert_eq!(
            format_schedule(&[], LA, &BTreeSet::new(), &Theme::default()),
            vec!["No events"]
        );
    }

    #[test]
    fn test_format_event_details() {
        let lines = format_event_details(&get_event(), LA, false, &Theme::default());
        assert!(lines.contains(&"Fri, Aug 11, 10:00 PDT - Fri, Aug 11, 11:00 PDT".to_string()));
        assert!(lines.contains(&"line two".to_string()));
        assert!(lines.contains(&"Slides: https://example.org/slides".to_string()));
        assert!(lines.contains(&"Alice (Hacker)".to_string()));
        assert!(!lines.contains(&"Bookmarked".to_string()));
    }

    #[test]
    fn test_format_speaker_details() {
        let e = get_event();
        let speaker = Speaker {
            id: 1,
            name: "Alice".to_string(),
            title: Some("Researcher".to_string()),
            description: String::new(),
            affiliations: vec![],
            links: vec![
                SpeakerLink {
                    title: "Site".to_string(),
                    url: "https://b".to_string(),
                    sort_order: 2,
                },
                SpeakerLink {
                    title: "Blog".to_string(),
                    url: "https://a".to_string(),
                    sort_order: 1,
                },
            ],
            events: vec![],
        };
        let lines = format_speaker_details(&speaker, &[&e], LA, &Theme::default());
        assert_eq!(lines[1], "Researcher");
        let blog = lines.iter().position(|l| l == "Blog: https://a").unwrap();
        let site = lines.iter().position(|l| l == "Site: https://b").unwrap();
        assert!(blog < site);
        assert!(lines.contains(&"  Fri Aug 11, 10:00 - 11:00 PDT".to_string()));
    }

    fn speaker(id: i64, name: &str) -> Speaker {
        Speaker {
            id,
            name: name.to_string(),
            title: None,
            description: String::new(),
            affiliations: vec![],
            links: vec![],
            events: vec![],
        }
    }

    #[test]
    fn test_format_speaker_list_and_directory() {
        let alice = speaker(7, "Alice");
        let alex = speaker(1234, "alex");
        assert_eq!(
            format_speaker_list(&[&alex, &alice]),
            vec!["  1234  alex", "     7  Alice"]
        );
        let groups = BTreeMap::from([('A', vec![&alex, &alice])]);
        let lines = format_speaker_directory(&groups, &Theme::default());
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains('A'));
        assert_eq!(lines[1], "    1234  alex");
        assert_eq!(lines[2], "       7  Alice");
    }

    fn get_org(tag: Option<i64>) -> Organization {
        Organization {
            id: 4,
            name: "Car Hacking Village".to_string(),
            description: "Cars.\nMore cars.".to_string(),
            links: vec![Link {
                label: "Site".to_string(),
                url: "https://chv.example".to_string(),
            }],
            tag_id_as_organizer: tag,
        }
    }

    #[test]
    fn test_format_organization() {
        let e = get_event();
        let groups = vec![DayGroup {
            key: "2023-08-11".to_string(),
            events: vec![&e],
        }];
        let lines = format_organization(&get_org(Some(77)), &groups, LA, &Theme::default());
        assert!(lines[0].contains("Car Hacking Village"));
        assert!(lines.contains(&"More cars.".to_string()));
        assert!(lines.iter().any(|l| l.contains("Car Hacking Village Events")));
        assert!(lines.contains(&"August 11".to_string()));
        assert!(lines.contains(&format_event_line(&e, LA, false)));
        assert_eq!(lines.last(), Some(&"Site: https://chv.example".to_string()));

        let lines = format_organization(&get_org(Some(77)), &[], LA, &Theme::default());
        assert!(lines.contains(&"No events".to_string()));
    }

    #[test]
    fn test_format_organization_without_organizer_tag() {
        let lines = format_organization(&get_org(None), &[], LA, &Theme::default());
        assert!(!lines.iter().any(|l| l.contains("Events")));
        assert!(!lines.contains(&"No events".to_string()));
    }

    #[test]
    fn test_format_locations() {
        let locations = vec![
            Location {
                id: 1,
                name: "Track 2".to_string(),
                hotel: Some("Forum".to_string()),
            },
            Location {
                id: 2,
                name: "Track 1".to_string(),
                hotel: Some("Forum".to_string()),
            },
        ];
        assert_eq!(
            format_locations(&locations),
            vec!["Track 1 (Forum)", "Track 2 (Forum)"]
        );
    }

    #[test]
    fn test_format_days() {
        let tabs = vec![
            DayTab {
                label: "Thu".to_string(),
                key: "2023-08-10".to_string(),
            },
            DayTab {
                label: "Fri".to_string(),
                key: "2023-08-11".to_string(),
            },
        ];
        assert_eq!(format_days(&tabs), "[Thu Aug 10] Fri Aug 11");
        assert_eq!(format_days(&[]), "");
    }

    #[test]
    fn test_format_countdown() {
        let countdown = Countdown {
            days: 2,
            hours: 3,
            minutes: 4,
            seconds: 5,
        };
        assert_eq!(
            format_countdown("DEF CON", &countdown),
            "DEF CON starts in 2 days 3 hours 4 minutes 5 seconds"
        );
    }
}
