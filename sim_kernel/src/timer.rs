//! # Simulated Tick Timer
//!
//! The simulation clock. It counts ticks and remembers when the next tick
//! is due; it never interrupts anything.
//!
//! ## Philosophy
//!
//! **Re-arming is explicit.**
//!
//! The kernel re-arms the timer at the end of every tick. The run loop
//! asks how long it may block on the inbox before the armed tick fires.
//! Cancelling the timer ends the tick chain. With a zero interval the next
//! tick fires as soon as the inbox is empty, which keeps tests fast and
//! fully deterministic.

use std::time::{Duration, Instant};

/// Self-scheduling tick source
///
/// # Examples
///
/// ```
/// use sim_kernel::timer::TickTimer;
/// use std::time::Duration;
///
/// let mut timer = TickTimer::new(Duration::ZERO);
/// assert_eq!(timer.current_ticks(), 0);
///
/// timer.arm();
/// assert!(timer.is_armed());
/// assert_eq!(timer.advance(), 1);
/// assert!(!timer.is_armed());
/// ```
#[derive(Debug, Clone)]
pub struct TickTimer {
    /// Ticks elapsed since the simulation started
    ticks: u64,
    /// Delay between two ticks
    interval: Duration,
    /// When the armed tick fires
    deadline: Option<Instant>,
}

impl TickTimer {
    /// Creates a disarmed timer at tick 0
    pub fn new(interval: Duration) -> Self {
        Self {
            ticks: 0,
            interval,
            deadline: None,
        }
    }

    /// Returns the current tick count
    pub fn current_ticks(&self) -> u64 {
        self.ticks
    }

    /// Returns the configured interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Consumes the armed tick and advances the clock by one
    pub fn advance(&mut self) -> u64 {
        self.deadline = None;
        self.ticks = self.ticks.saturating_add(1);
        self.ticks
    }

    /// Schedules the next tick one interval from now
    pub fn arm(&mut self) {
        self.deadline = Some(Instant::now() + self.interval);
    }

    /// Cancels the pending tick; the chain stops here
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the armed tick fires
    ///
    /// Returns `None` when the timer is disarmed and `Duration::ZERO` when
    /// the tick is already due.
    pub fn time_until_due(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

impl Default for TickTimer {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_timer_is_disarmed_at_zero() {
        let timer = TickTimer::new(Duration::from_millis(10));
        assert_eq!(timer.current_ticks(), 0);
        assert_eq!(timer.interval(), Duration::from_millis(10));
        assert!(!timer.is_armed());
        assert_eq!(timer.time_until_due(), None);
    }

    #[test]
    fn test_advance_is_monotonic() {
        let mut timer = TickTimer::default();
        assert_eq!(timer.advance(), 1);
        assert_eq!(timer.advance(), 2);
        assert_eq!(timer.current_ticks(), 2);
    }

    #[test]
    fn test_zero_interval_is_due_immediately() {
        let mut timer = TickTimer::default();
        timer.arm();
        assert_eq!(timer.time_until_due(), Some(Duration::ZERO));
    }

    #[test]
    fn test_interval_deadline_in_future() {
        let mut timer = TickTimer::new(Duration::from_secs(60));
        timer.arm();
        let remaining = timer.time_until_due().unwrap();
        assert!(remaining > Duration::from_secs(59));
    }

    #[test]
    fn test_cancel_stops_chain() {
        let mut timer = TickTimer::default();
        timer.arm();
        timer.cancel();
        assert!(!timer.is_armed());
        assert_eq!(timer.current_ticks(), 0);
    }

    #[test]
    fn test_saturates_instead_of_overflowing() {
        let mut timer = TickTimer {
            ticks: u64::MAX,
            interval: Duration::ZERO,
            deadline: None,
        };
        assert_eq!(timer.advance(), u64::MAX);
    }
}
