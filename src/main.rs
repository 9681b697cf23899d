mod bookmarks;
mod config;
mod dates;
mod error;
mod feed;
mod kiosk;
mod model;
mod schedule;
mod theme;
mod view;

use crate::bookmarks::{BookmarkStore, JsonBookmarks};
use crate::config::Config;
use crate::dates::Zone;
use crate::error::ScheduleError;
use crate::schedule::{FilterContext, FilterCriteria, Tab};
use crate::theme::Theme;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::{Path, PathBuf};

#[macro_use]
extern crate lazy_static;

fn xdg_dir(var: &str, fallback: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| {
        std::env::var("HOME")
            .map(|home| format!("{}/{}", home, fallback))
            .unwrap_or_else(|_| format!("{}/{}", std::env::temp_dir().display(), fallback))
    })
}

lazy_static! {
    static ref CONFIG_FILE_PATH: String =
        format!("{}/confsched/config.toml", xdg_dir("XDG_CONFIG_HOME", ".config"));
    static ref BOOKMARKS_FILE_PATH: String = format!(
        "{}/confsched/bookmarks.json",
        xdg_dir("XDG_STATE_HOME", ".local/state")
    );
}

#[derive(Debug, Subcommand)]
enum BookmarkCommand {
    /// Bookmark an event
    Add { id: i64 },
    /// Remove an event bookmark
    Remove { id: i64 },
    /// List bookmarked event ids
    List,
}

#[derive(Debug, Default, clap::Args)]
struct EventFilters {
    /// Day tab to show (e.g. Thu); defaults to the first conference day
    #[arg(long)]
    day: Option<String>,

    /// Only show events of this type (exact match)
    #[arg(long)]
    category: Option<String>,

    /// Case-insensitive search over titles, descriptions and speaker names
    #[arg(long)]
    search: Option<String>,

    /// Only show bookmarked events
    #[arg(long)]
    bookmarks_only: bool,

    /// Only show this event, ignoring every other filter
    #[arg(long)]
    event: Option<i64>,

    /// Include events that have already ended
    #[arg(long)]
    show_completed: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the schedule grouped by day
    Events {
        #[command(flatten)]
        filters: EventFilters,
    },
    /// Show the details of a single event
    Event {
        /// Event id
        id: Option<i64>,
    },
    /// List the conference days that have events
    Days {
        /// Include days whose events have all ended
        #[arg(long)]
        show_completed: bool,
    },
    /// List the event categories
    Categories {},
    /// Show the speaker directory
    Speakers {
        /// Only list speakers whose name contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Show the details of a single speaker
    Speaker {
        /// Speaker id
        id: Option<i64>,
    },
    /// Show an organization and the events it runs
    Organization {
        /// Organization id
        id: Option<i64>,
    },
    /// List the venue locations
    Locations {},
    /// Manage bookmarked events
    Bookmark {
        #[command(subcommand)]
        command: BookmarkCommand,
    },
    /// Time left until the conference starts
    Countdown {},
    /// Run the unattended kiosk display
    Tv {
        /// Only show events carrying this tag id
        #[arg(long)]
        tag: Option<i64>,

        /// How many hours ahead to show
        #[arg(long)]
        hours: Option<u32>,
    },
}

/// CONFSCHED - A terminal viewer for conference schedules.
/// Events, speakers and locations are read from JSON feeds and shown in the
/// conference's timezone, with day, category, search and bookmark filters.
#[derive(Parser, Debug)]
#[command(version, about, long_about=None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the events, speakers, locations, tags and organizations feeds
    #[arg(long)]
    data: Option<PathBuf>,

    /// Location of the config file
    #[arg(long, default_value = &**CONFIG_FILE_PATH)]
    config: PathBuf,

    /// Location of the bookmarks file
    #[arg(long, default_value = &**BOOKMARKS_FILE_PATH)]
    bookmarks: PathBuf,

    /// Show times in this machine's timezone instead of the conference's
    #[arg(long)]
    local_time: bool,
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

/// Resolves CLI flags into filter criteria, in the same way the tab row,
/// category menu and search box interact: a search or category clears the
/// day tab, and the day tab defaults to the first conference day.
fn build_criteria(zone: Zone, filters: EventFilters, con_days: &[String]) -> FilterCriteria {
    let mut criteria = FilterCriteria::new(zone);
    criteria.event_id = filters.event;
    criteria.hide_completed = !filters.show_completed;
    criteria.category = filters.category.unwrap_or_default();
    criteria.search = filters.search.unwrap_or_default();
    criteria.tab = if filters.bookmarks_only {
        Tab::Bookmarks
    } else if !criteria.category.is_empty() || !criteria.search.is_empty() {
        Tab::Cleared
    } else if let Some(day) = filters.day {
        Tab::Day(day)
    } else {
        con_days
            .first()
            .cloned()
            .map(Tab::Day)
            .unwrap_or(Tab::Cleared)
    };
    criteria
}

fn report(err: ScheduleError) -> anyhow::Error {
    log::error!("{}", err);
    anyhow::anyhow!(err.user_message())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = Config::load(&args.config)?;
    let zone = config.zone(args.local_time)?;
    let data_dir = args
        .data
        .clone()
        .or_else(|| config.data_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let store = JsonBookmarks::new(&args.bookmarks);
    let theme = Theme::random(&mut rand::rng());
    let now = chrono::Utc::now();

    match args.command {
        Commands::Events { filters } => {
            let events = feed::load_events(&data_dir).map_err(report)?;
            let con_days = schedule::con_days(&events, zone, !filters.show_completed, now);
            let criteria = build_criteria(zone, filters, &con_days);
            let bookmarks = store.all()?;
            let ctx = FilterContext {
                criteria: &criteria,
                bookmarks: &bookmarks,
                now,
            };
            let groups = schedule::schedule(&events, &ctx);
            print_lines(&view::formatting::format_schedule(
                &groups, zone, &bookmarks, &theme,
            ));
        }
        Commands::Event { id } => {
            let events = feed::load_events(&data_dir).map_err(report)?;
            let event = schedule::find_event(&events, id).map_err(report)?;
            let bookmarked = store.contains(event.id)?;
            print_lines(&view::formatting::format_event_details(
                event, zone, bookmarked, &theme,
            ));
        }
        Commands::Days { show_completed } => {
            let events = feed::load_events(&data_dir).map_err(report)?;
            let tabs = schedule::day_tabs(&events, zone, !show_completed, now);
            println!("{}", view::formatting::format_days(&tabs));
        }
        Commands::Categories {} => {
            let events = feed::load_events(&data_dir).map_err(report)?;
            for category in schedule::categories(&events) {
                println!("{}", category);
            }
        }
        Commands::Speakers { search } => {
            let speakers = feed::load_speakers(&data_dir).map_err(report)?;
            let lines = match search {
                Some(query) => view::formatting::format_speaker_list(&schedule::search_speakers(
                    &speakers, &query,
                )),
                None => view::formatting::format_speaker_directory(
                    &schedule::group_speakers(&speakers),
                    &theme,
                ),
            };
            print_lines(&lines);
        }
        Commands::Speaker { id } => {
            let speakers = feed::load_speakers(&data_dir).map_err(report)?;
            let events = feed::load_events(&data_dir).map_err(report)?;
            let speaker = schedule::find_speaker(&speakers, id).map_err(report)?;
            let speaker_events = schedule::speaker_events(speaker, &events);
            print_lines(&view::formatting::format_speaker_details(
                speaker,
                &speaker_events,
                zone,
                &theme,
            ));
        }
        Commands::Organization { id } => {
            let orgs = feed::load_organizations(&data_dir).map_err(report)?;
            let org = schedule::find_organization(&orgs, id).map_err(report)?;
            let events = match org.tag_id_as_organizer {
                Some(_) => feed::load_events(&data_dir).map_err(report)?,
                None => vec![],
            };
            let groups = match org.tag_id_as_organizer {
                Some(tag) => schedule::tag_events(&events, tag, zone),
                None => vec![],
            };
            print_lines(&view::formatting::format_organization(
                org, &groups, zone, &theme,
            ));
        }
        Commands::Locations {} => {
            let locations = feed::load_locations(&data_dir).map_err(report)?;
            print_lines(&view::formatting::format_locations(&locations));
        }
        Commands::Bookmark { command } => match command {
            BookmarkCommand::Add { id } => store.add(id)?,
            BookmarkCommand::Remove { id } => store.remove(id)?,
            BookmarkCommand::List => {
                for id in store.all()? {
                    println!("{}", id);
                }
            }
        },
        Commands::Countdown {} => {
            let start = config
                .conference
                .start
                .context("No conference start configured")?;
            let countdown = dates::countdown(start, now);
            println!(
                "{}",
                view::formatting::format_countdown(&config.conference.name, &countdown)
            );
        }
        Commands::Tv { tag, hours } => {
            let events = feed::load_events(&data_dir).map_err(report)?;
            let tag = tag.unwrap_or(config.kiosk.tag);
            let hours = hours.unwrap_or(config.kiosk.lookahead_hours);
            let title = kiosk_title(&data_dir, tag, &config.conference.name);
            let mut terminal = view::init()?;
            let res =
                view::tv::App::new(&events, tag, hours, zone, title, theme).run(&mut terminal);
            view::restore()?;
            res?
        }
    }

    Ok(())
}

/// Sidebar title for the kiosk: the tag's label if the tag feed knows it.
fn kiosk_title(data_dir: &Path, tag: i64, fallback: &str) -> String {
    match feed::load_tags(data_dir) {
        Ok(tags) => tags
            .into_iter()
            .find(|t| t.id == tag)
            .map(|t| t.label)
            .unwrap_or_else(|| fallback.to_string()),
        Err(e) => {
            log::warn!("{}", e);
            fallback.to_string()
        }
    }
}
