//! Timing for the unattended kiosk display.
//!
//! The display shows the kiosk window, then on every recompute it refreshes
//! the window and starts scrolling down in fixed steps until the scroll
//! period ends and it jumps back to the top. [`Rotation`] only decides *when*
//! things happen; the view owns the data and the scroll offset.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const RECOMPUTE_INTERVAL: Duration = Duration::from_millis(70_100);
pub const SCROLL_STEP_INTERVAL: Duration = Duration::from_millis(900);
pub const SCROLL_STEP: u16 = 45;
pub const SCROLL_DURATION: Duration = Duration::from_millis(70_000);

/// Shared flag that stops a [`Rotation`] for good.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Showing the first window, before the first recompute.
    Displaying,
    Scrolling {
        next_step: Instant,
        until: Instant,
    },
    /// Back at the top, waiting for the next recompute.
    ResettingScroll,
}

/// What the view must do in response to a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Recompute,
    ScrollBy(u16),
    ScrollToTop,
}

#[derive(Debug, Clone, Copy)]
enum Timer {
    Recompute,
    Step,
    Reset,
}

#[derive(Debug)]
pub struct Rotation {
    phase: Phase,
    next_recompute: Option<Instant>,
    token: CancellationToken,
}

impl Rotation {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            phase: Phase::Idle,
            next_recompute: None,
            token,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Begins displaying; the first window is computed immediately.
    pub fn start(&mut self, now: Instant) -> Vec<Action> {
        if self.token.is_cancelled() {
            return vec![];
        }
        self.phase = Phase::Displaying;
        self.next_recompute = Some(now + RECOMPUTE_INTERVAL);
        vec![Action::Recompute]
    }

    /// Stops both the recompute and the scroll timers.
    pub fn cancel(&mut self) {
        self.token.cancel();
        self.stop();
    }

    fn stop(&mut self) {
        self.phase = Phase::Idle;
        self.next_recompute = None;
    }

    fn next_due(&self) -> Option<(Instant, Timer)> {
        let recompute = self.next_recompute.map(|at| (at, Timer::Recompute));
        let scroll = match self.phase {
            Phase::Scrolling { next_step, until } if next_step < until => {
                Some((next_step, Timer::Step))
            }
            Phase::Scrolling { until, .. } => Some((until, Timer::Reset)),
            _ => None,
        };
        [scroll, recompute]
            .into_iter()
            .flatten()
            .min_by_key(|(at, _)| *at)
    }

    /// When the next action falls due, for sizing the view's poll timeout.
    pub fn next_wakeup(&self) -> Option<Instant> {
        self.next_due().map(|(at, _)| at)
    }

    /// Fires every timer due at or before `now`, in order.
    pub fn tick(&mut self, now: Instant) -> Vec<Action> {
        let mut actions = vec![];
        if self.token.is_cancelled() {
            self.stop();
            return actions;
        }
        while let Some((at, timer)) = self.next_due() {
            if at > now {
                break;
            }
            match timer {
                Timer::Recompute => {
                    actions.push(Action::Recompute);
                    self.phase = Phase::Scrolling {
                        next_step: at + SCROLL_STEP_INTERVAL,
                        until: at + SCROLL_DURATION,
                    };
                    self.next_recompute = Some(at + RECOMPUTE_INTERVAL);
                }
                Timer::Step => {
                    actions.push(Action::ScrollBy(SCROLL_STEP));
                    if let Phase::Scrolling { next_step, until } = self.phase {
                        self.phase = Phase::Scrolling {
                            next_step: next_step + SCROLL_STEP_INTERVAL,
                            until,
                        };
                    }
                }
                Timer::Reset => {
                    actions.push(Action::ScrollToTop);
                    self.phase = Phase::ResettingScroll;
                }
            }
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> (Rotation, Instant) {
        let base = Instant::now();
        let mut rotation = Rotation::new(CancellationToken::new());
        assert_eq!(rotation.start(base), vec![Action::Recompute]);
        (rotation, base)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_idle_until_started() {
        let mut rotation = Rotation::new(CancellationToken::new());
        assert_eq!(rotation.phase(), Phase::Idle);
        assert!(rotation.tick(Instant::now() + ms(200_000)).is_empty());
        assert_eq!(rotation.next_wakeup(), None);
    }

    #[test]
    fn test_displaying_before_first_recompute() {
        let (mut rotation, base) = started();
        assert_eq!(rotation.phase(), Phase::Displaying);
        assert!(rotation.tick(base + ms(70_099)).is_empty());
        assert_eq!(rotation.next_wakeup(), Some(base + RECOMPUTE_INTERVAL));
    }

    #[test]
    fn test_recompute_starts_scrolling() {
        let (mut rotation, base) = started();
        assert_eq!(rotation.tick(base + ms(70_100)), vec![Action::Recompute]);
        assert!(matches!(rotation.phase(), Phase::Scrolling { .. }));
        assert!(rotation.tick(base + ms(70_999)).is_empty());
        assert_eq!(
            rotation.tick(base + ms(71_000)),
            vec![Action::ScrollBy(SCROLL_STEP)]
        );
        assert_eq!(
            rotation.tick(base + ms(72_800)),
            vec![Action::ScrollBy(45), Action::ScrollBy(45)]
        );
    }

    #[test]
    fn test_full_cycle() {
        let (mut rotation, base) = started();
        let actions = rotation.tick(base + ms(70_100 + 70_000));
        assert_eq!(actions.first(), Some(&Action::Recompute));
        assert_eq!(actions.last(), Some(&Action::ScrollToTop));
        let steps = actions
            .iter()
            .filter(|a| matches!(a, Action::ScrollBy(_)))
            .count();
        // steps at 0.9s .. 69.3s
        assert_eq!(steps, 77);
        assert_eq!(rotation.phase(), Phase::ResettingScroll);

        assert!(rotation.tick(base + ms(140_199)).is_empty());
        assert_eq!(rotation.tick(base + ms(140_200)), vec![Action::Recompute]);
        assert!(matches!(rotation.phase(), Phase::Scrolling { .. }));
    }

    #[test]
    fn test_cancel_stops_everything() {
        let base = Instant::now();
        let token = CancellationToken::new();
        let mut rotation = Rotation::new(token.clone());
        rotation.start(base);
        rotation.tick(base + ms(71_000));
        token.cancel();
        assert!(rotation.tick(base + ms(200_000)).is_empty());
        assert_eq!(rotation.phase(), Phase::Idle);
        assert_eq!(rotation.next_wakeup(), None);
        assert!(rotation.start(base + ms(200_000)).is_empty());
    }

    #[test]
    fn test_cancel_directly() {
        let (mut rotation, base) = started();
        rotation.cancel();
        assert_eq!(rotation.phase(), Phase::Idle);
        assert!(rotation.tick(base + ms(70_100)).is_empty());
    }
}
