use std::time::{Duration, Instant};

use crate::constants::{BATTERY_DRAIN_INTERVAL, BATTERY_INITIAL_LEVEL, BATTERY_RECHARGE_THRESHOLD};

/// Simulated battery: loses one percent per interval and jumps back to a
/// full charge on the tick after it has dropped to the threshold.
#[derive(Debug)]
pub struct Battery {
    level: u8,
    interval: Duration,
    last_tick: Option<Instant>,
}

impl Battery {
    pub fn new() -> Self {
        Self {
            level: BATTERY_INITIAL_LEVEL,
            interval: BATTERY_DRAIN_INTERVAL,
            last_tick: None,
        }
    }

    pub fn with_level(level: u8) -> Self {
        Self {
            level: level.min(100),
            ..Self::new()
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn label(&self) -> String {
        format!("{}%", self.level)
    }

    pub fn start(&mut self, now: Instant) {
        self.last_tick = Some(now);
    }

    /// Applies one drain step per elapsed interval. Returns whether the
    /// level changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(mut last) = self.last_tick else {
            return false;
        };
        let mut changed = false;
        while now.saturating_duration_since(last) >= self.interval {
            last += self.interval;
            self.drain_step();
            changed = true;
        }
        self.last_tick = Some(last);
        changed
    }

    fn drain_step(&mut self) {
        if self.level <= BATTERY_RECHARGE_THRESHOLD {
            self.level = 100;
            tracing::debug!("battery recharged");
        } else {
            self.level -= 1;
        }
    }
}

impl Default for Battery {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_one_percent_per_interval() {
        let start = Instant::now();
        let mut battery = Battery::new();
        battery.start(start);
        assert!(!battery.tick(start + Duration::from_secs(29)));
        assert_eq!(battery.level(), BATTERY_INITIAL_LEVEL);
        assert!(battery.tick(start + BATTERY_DRAIN_INTERVAL));
        assert_eq!(battery.level(), BATTERY_INITIAL_LEVEL - 1);
    }

    #[test]
    fn catches_up_on_missed_intervals() {
        let start = Instant::now();
        let mut battery = Battery::with_level(50);
        battery.start(start);
        battery.tick(start + BATTERY_DRAIN_INTERVAL * 3);
        assert_eq!(battery.level(), 47);
    }

    #[test]
    fn resets_after_reaching_threshold() {
        let start = Instant::now();
        let mut battery = Battery::with_level(16);
        battery.start(start);
        battery.tick(start + BATTERY_DRAIN_INTERVAL);
        assert_eq!(battery.level(), 15);
        battery.tick(start + BATTERY_DRAIN_INTERVAL * 2);
        assert_eq!(battery.level(), 100);
        assert_eq!(battery.label(), "100%");
    }

    #[test]
    fn unstarted_battery_holds_level() {
        let mut battery = Battery::new();
        assert!(!battery.tick(Instant::now()));
        assert_eq!(battery.level(), BATTERY_INITIAL_LEVEL);
    }
}
