use std::fmt::Display;
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeZone};

use crate::constants::CLOCK_INTERVAL;

const LABEL_FORMAT: &str = "%a %b %-d %H:%M";

/// Periodic task that recomputes the menu bar timestamp.
///
/// Driven by the frame loop: `tick` is called on every idle pass and only
/// recomputes once `interval` has elapsed since the previous update. The
/// clock never touches window state.
#[derive(Debug)]
pub struct Clock {
    interval: Duration,
    running: bool,
    last_tick: Option<Instant>,
    label: String,
}

impl Clock {
    pub fn new() -> Self {
        Self::with_interval(CLOCK_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            running: false,
            last_tick: None,
            label: String::new(),
        }
    }

    pub fn start<Tz>(&mut self, now: Instant, wall: &DateTime<Tz>)
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.running = true;
        self.last_tick = Some(now);
        self.label = wall.format(LABEL_FORMAT).to_string();
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.last_tick = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns whether the label was recomputed.
    pub fn tick<Tz>(&mut self, now: Instant, wall: &DateTime<Tz>) -> bool
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        if !self.running {
            return false;
        }
        if let Some(last) = self.last_tick
            && now.saturating_duration_since(last) < self.interval
        {
            return false;
        }
        self.last_tick = Some(now);
        self.label = wall.format(LABEL_FORMAT).to_string();
        true
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn wall(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 21, 14, minute, 0).unwrap()
    }

    #[test]
    fn label_uses_short_weekday_and_month() {
        let mut clock = Clock::new();
        clock.start(Instant::now(), &wall(5));
        assert_eq!(clock.label(), "Tue Jan 21 14:05");
    }

    #[test]
    fn ticks_only_after_interval() {
        let start = Instant::now();
        let mut clock = Clock::new();
        clock.start(start, &wall(0));
        assert!(!clock.tick(start + Duration::from_millis(400), &wall(1)));
        assert_eq!(clock.label(), "Tue Jan 21 14:00");
        assert!(clock.tick(start + CLOCK_INTERVAL, &wall(1)));
        assert_eq!(clock.label(), "Tue Jan 21 14:01");
        assert!(!clock.tick(start + CLOCK_INTERVAL + Duration::from_millis(10), &wall(2)));
    }

    #[test]
    fn stopped_clock_ignores_ticks() {
        let start = Instant::now();
        let mut clock = Clock::new();
        assert!(!clock.tick(start, &wall(0)));
        clock.start(start, &wall(0));
        clock.stop();
        assert!(!clock.is_running());
        assert!(!clock.tick(start + Duration::from_secs(5), &wall(9)));
        assert_eq!(clock.label(), "Tue Jan 21 14:00");
    }
}
