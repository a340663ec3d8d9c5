//! Shared crate-wide constants.

use std::time::Duration;

/// Minimum number of visible cells a window must keep within the viewport
/// when drag clamping is enabled, so the user can grab its title bar again.
pub const MIN_FLOATING_VISIBLE_MARGIN: u16 = 4;

/// Window size used when an application does not declare its own.
pub const FALLBACK_WINDOW_WIDTH: u16 = 48;
pub const FALLBACK_WINDOW_HEIGHT: u16 = 14;

/// Position of the first window opened on an empty desktop, relative to the
/// viewport origin.
pub const CASCADE_ORIGIN_X: i32 = 4;
pub const CASCADE_ORIGIN_Y: i32 = 1;

/// Diagonal offset applied per already-open window so new windows cascade
/// instead of stacking exactly on top of each other.
pub const CASCADE_STEP_X: i32 = 3;
pub const CASCADE_STEP_Y: i32 = 1;

/// Refresh cadence of the menu bar clock.
pub const CLOCK_INTERVAL: Duration = Duration::from_secs(1);

/// Cadence of the simulated battery drain.
pub const BATTERY_DRAIN_INTERVAL: Duration = Duration::from_secs(30);
pub const BATTERY_INITIAL_LEVEL: u8 = 85;
/// Once the level reaches this value the next tick recharges to 100%.
pub const BATTERY_RECHARGE_THRESHOLD: u8 = 15;

pub const DEBUG_LOG_MAX_LINES: usize = 2000;
