//! # Countdown Module - The session timer
//!
//! A session has a fixed time budget. Once the first key is accepted the countdown starts and
//! loses one second per tick until it reaches zero, which forces the session to complete.
//!
//! The countdown never reads the system time itself. Hosts either deliver ticks directly
//! through [`Countdown::tick`], or hand the current time of a [`Clock`] to
//! [`Countdown::poll`], which fires every tick that became due since the last poll.
//!
//! ```rust
//! use racecore::countdown::{Clock, Countdown, ManualClock, Tick};
//! use web_time::Duration;
//!
//! let clock = ManualClock::new();
//! let mut countdown = Countdown::new(2);
//!
//! countdown.start(clock.now());
//! clock.advance(Duration::from_secs(1));
//! assert_eq!(countdown.poll(clock.now()), Some(Tick::Remaining(1)));
//!
//! clock.advance(Duration::from_secs(1));
//! assert_eq!(countdown.poll(clock.now()), Some(Tick::Expired));
//! assert!(!countdown.is_running());
//! ```

use std::cell::Cell;
use std::rc::Rc;

use web_time::{Duration, Instant};

/// Time between two ticks
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// A source of the current time
pub trait Clock {
    fn now(&self) -> Instant;
}

/// The wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to
///
/// Clones share the same time, so a test can keep one clone and hand another to a session.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, duration: Duration) {
        self.offset.set(self.offset.get() + duration);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }
}

/// The result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Time is left
    Remaining(u32),
    /// The countdown hit zero and stopped
    Expired,
}

/// Schedule of a running countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TimerHandle {
    next_deadline: Instant,
}

/// A countdown ticking once per second
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    budget: u32,
    remaining: u32,
    handle: Option<TimerHandle>,
}

impl Countdown {
    pub const fn new(budget: u32) -> Self {
        Self {
            budget,
            remaining: budget,
            handle: None,
        }
    }

    pub const fn budget(&self) -> u32 {
        self.budget
    }

    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    pub const fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Seconds counted down so far
    pub const fn elapsed(&self) -> u32 {
        self.budget - self.remaining
    }

    /// Start ticking. Starting a running countdown does nothing.
    pub fn start(&mut self, now: Instant) {
        if self.handle.is_none() {
            self.handle = Some(TimerHandle {
                next_deadline: now + TICK_INTERVAL,
            });
        }
    }

    /// Stop ticking. Safe to call on a stopped countdown.
    pub fn stop(&mut self) {
        self.handle = None;
    }

    /// Stop and restore the full budget
    pub fn reset(&mut self) {
        self.stop();
        self.remaining = self.budget;
    }

    /// Count down one second
    ///
    /// Returns `None` if the countdown isn't running.
    pub fn tick(&mut self) -> Option<Tick> {
        self.handle?;

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.stop();
            return Some(Tick::Expired);
        }

        Some(Tick::Remaining(self.remaining))
    }

    /// Fire every tick that is due at `now`, returning the last one
    pub fn poll(&mut self, now: Instant) -> Option<Tick> {
        let mut last = None;

        while let Some(handle) = self.handle.as_mut()
            && handle.next_deadline <= now
        {
            handle.next_deadline += TICK_INTERVAL;
            last = self.tick();
        }

        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_until_expired() {
        let mut countdown = Countdown::new(3);
        countdown.start(Instant::now());

        assert_eq!(countdown.tick(), Some(Tick::Remaining(2)));
        assert_eq!(countdown.tick(), Some(Tick::Remaining(1)));
        assert_eq!(countdown.tick(), Some(Tick::Expired));
        assert_eq!(countdown.remaining(), 0);
        assert!(!countdown.is_running());

        // Nothing happens after expiry
        assert_eq!(countdown.tick(), None);
        assert_eq!(countdown.remaining(), 0);
    }

    #[test]
    fn test_tick_requires_start() {
        let mut countdown = Countdown::new(15);
        assert_eq!(countdown.tick(), None);
        assert_eq!(countdown.remaining(), 15);
    }

    #[test]
    fn test_start_is_idempotent() {
        let clock = ManualClock::new();
        let mut countdown = Countdown::new(15);

        countdown.start(clock.now());
        clock.advance(Duration::from_millis(600));
        countdown.start(clock.now());

        // The second start must not push the deadline back
        clock.advance(Duration::from_millis(400));
        assert_eq!(countdown.poll(clock.now()), Some(Tick::Remaining(14)));
    }

    #[test]
    fn test_stop_twice() {
        let mut countdown = Countdown::new(15);
        countdown.start(Instant::now());
        countdown.stop();
        countdown.stop();
        assert!(!countdown.is_running());
    }

    #[test]
    fn test_poll_catches_up() {
        let clock = ManualClock::new();
        let mut countdown = Countdown::new(15);
        countdown.start(clock.now());

        assert_eq!(countdown.poll(clock.now()), None);

        clock.advance(Duration::from_millis(3500));
        assert_eq!(countdown.poll(clock.now()), Some(Tick::Remaining(12)));
        assert_eq!(countdown.elapsed(), 3);

        clock.advance(Duration::from_secs(60));
        assert_eq!(countdown.poll(clock.now()), Some(Tick::Expired));
        assert_eq!(countdown.remaining(), 0);
    }

    #[test]
    fn test_reset_restores_budget() {
        let mut countdown = Countdown::new(5);
        countdown.start(Instant::now());
        countdown.tick();
        countdown.reset();

        assert_eq!(countdown.remaining(), 5);
        assert!(!countdown.is_running());
    }
}
