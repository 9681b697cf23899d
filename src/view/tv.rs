use crate::dates::{self, Zone};
use crate::kiosk::{Action, CancellationToken, Rotation};
use crate::model::Event;
use crate::schedule::{self, DayGroup};
use crate::theme::Theme;
use chrono::Utc;
use ratatui::prelude::*;
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    symbols::border,
    widgets::{Block, Borders, Paragraph},
};

/// Scroll units that make up one terminal row.
const UNITS_PER_ROW: u16 = 45;
const MAX_POLL: Duration = Duration::from_secs(1);

pub struct App<'a> {
    events: &'a [Event],
    groups: Vec<DayGroup<'a>>,
    tag: i64,
    lookahead_hours: u32,
    zone: Zone,
    title: String,
    theme: Theme,
    rotation: Rotation,
    scroll: u16,
    exit: bool,
}

impl<'a> App<'a> {
    pub fn new(
        events: &'a [Event],
        tag: i64,
        lookahead_hours: u32,
        zone: Zone,
        title: String,
        theme: Theme,
    ) -> Self {
        Self {
            events,
            groups: vec![],
            tag,
            lookahead_hours,
            zone,
            title,
            theme,
            rotation: Rotation::new(CancellationToken::new()),
            scroll: 0,
            exit: false,
        }
    }

    /// runs the kiosk loop until the user quits
    pub fn run(&mut self, terminal: &mut super::Tui) -> io::Result<()> {
        let actions = self.rotation.start(Instant::now());
        self.apply(&actions);
        let res = self.run_loop(terminal);
        log::debug!("stopping kiosk rotation in {:?}", self.rotation.phase());
        self.rotation.cancel();
        res
    }

    fn run_loop(&mut self, terminal: &mut super::Tui) -> io::Result<()> {
        while !self.exit {
            terminal.draw(|frame| self.render_frame(frame))?;
            self.handle_events()?;
            let actions = self.rotation.tick(Instant::now());
            self.apply(&actions);
        }
        Ok(())
    }

    fn apply(&mut self, actions: &[Action]) {
        for action in actions {
            match action {
                Action::Recompute => {
                    self.groups = schedule::kiosk_schedule(
                        self.events,
                        self.tag,
                        self.lookahead_hours,
                        Utc::now(),
                        self.zone,
                    );
                    log::debug!(
                        "kiosk window has {} events",
                        self.groups.iter().map(|g| g.events.len()).sum::<usize>()
                    );
                }
                Action::ScrollBy(units) => self.scroll = self.scroll.saturating_add(*units),
                Action::ScrollToTop => self.scroll = 0,
            }
        }
    }

    fn render_frame(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }

    fn poll_timeout(&self) -> Duration {
        self.rotation
            .next_wakeup()
            .map(|at| at.saturating_duration_since(Instant::now()))
            .map_or(MAX_POLL, |d| d.min(MAX_POLL))
    }

    /// updates the application's state based on user input
    fn handle_events(&mut self) -> io::Result<()> {
        if let Ok(true) = event::poll(self.poll_timeout()) {
            match event::read()? {
                // it's important to check that the event is a key press event as
                // crossterm also emits key release and repeat events on Windows.
                TermEvent::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    self.handle_key_event(key_event)
                }
                _ => {}
            };
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.exit(),
            _ => {}
        }
    }

    fn exit(&mut self) {
        self.exit = true;
    }

    fn schedule_lines(&self) -> Vec<Line<'a>> {
        if self.groups.is_empty() {
            return vec![Line::from(vec!["No upcoming events".into()])];
        }
        let accent = self.theme.tui_color();
        let mut lines = vec![];
        for group in &self.groups {
            lines.push(Line::from(vec![dates::date_group_title(&group.key)
                .fg(accent)
                .bold()]));
            for event in &group.events {
                let dot = event.event_type.display_color().unwrap_or(accent);
                lines.push(Line::from(vec![
                    "● ".fg(dot),
                    dates::time_range(event.begin, event.end, self.zone, true).into(),
                ]));
                lines.push(Line::from(vec!["  ".into(), event.title.clone().bold()]));
                lines.push(Line::from(vec![
                    "  ".into(),
                    event.location.name.clone().into(),
                ]));
                lines.push(Line::from(vec![]));
            }
        }
        lines
    }

    fn scroll_rows(&self, content_rows: usize) -> u16 {
        let max = u16::try_from(content_rows.saturating_sub(1)).unwrap_or(u16::MAX);
        (self.scroll / UNITS_PER_ROW).min(max)
    }
}

impl Widget for &App<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [schedule_area, sidebar_area] =
            Layout::horizontal([Constraint::Percentage(75), Constraint::Percentage(25)])
                .areas(area);

        let lines = self.schedule_lines();
        let rows = self.scroll_rows(lines.len());
        let block = Block::default()
            .title(Line::from(" Upcoming ".bold()).centered())
            .title_bottom(Line::from(vec![" Quit ".into(), "<Q> ".bold()]).centered())
            .borders(Borders::ALL)
            .border_set(border::ROUNDED);
        Paragraph::new(Text::from(lines))
            .block(block)
            .scroll((rows, 0))
            .render(schedule_area, buf);

        let sidebar = Text::from(vec![
            Line::from(vec![]),
            Line::from(vec![self.title.clone().fg(self.theme.tui_color()).bold()]),
            Line::from(vec![]),
            Line::from(vec!["Current time:".into()]),
            Line::from(vec![dates::clock(Utc::now(), self.zone).bold()]),
        ]);
        Paragraph::new(sidebar)
            .centered()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_set(border::DOUBLE),
            )
            .render(sidebar_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::event;
    use crate::model::TagRef;
    use crate::theme::Accent;

    const LA: Zone = Zone::Conference(chrono_tz::America::Los_Angeles);

    fn get_events() -> Vec<Event> {
        let begin = Utc::now() + chrono::Duration::hours(1);
        let end = begin + chrono::Duration::hours(1);
        let mut soon = event(1, begin, end);
        soon.tags = vec![TagRef {
            id: 45589,
            label: "Info".to_string(),
        }];
        vec![soon, event(2, begin, end)]
    }

    fn kiosk_app(events: &[Event], tag: i64) -> App<'_> {
        App::new(events, tag, 6, LA, "NFO Node".to_string(), Theme::new(Accent::Teal))
    }

    fn render(app: &App) -> String {
        let area = Rect::new(0, 0, 100, 20);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        buf.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_recompute_fills_kiosk_window() {
        let events = get_events();
        let mut app = kiosk_app(&events, 45589);
        app.apply(&[Action::Recompute]);
        assert_eq!(app.groups.len(), 1);
        assert_eq!(app.groups[0].events[0].id, 1);
        let screen = render(&app);
        assert!(screen.contains("Event 1"));
        assert!(!screen.contains("Event 2"));
        assert!(screen.contains("NFO Node"));
    }

    #[test]
    fn test_empty_window() {
        let events = get_events();
        let mut app = kiosk_app(&events, 1);
        app.apply(&[Action::Recompute]);
        assert!(render(&app).contains("No upcoming events"));
    }

    #[test]
    fn test_scroll_actions() {
        let events = get_events();
        let mut app = kiosk_app(&events, 45589);
        app.apply(&[Action::Recompute, Action::ScrollBy(45), Action::ScrollBy(45)]);
        assert_eq!(app.scroll, 90);
        assert_eq!(app.scroll_rows(100), 2);
        // clamped to the last content row
        assert_eq!(app.scroll_rows(2), 1);
        app.apply(&[Action::ScrollToTop]);
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn test_quit_key() {
        let events = get_events();
        let mut app = kiosk_app(&events, 45589);
        app.handle_key_event(KeyCode::Char('q').into());
        assert!(app.exit);
    }
}
