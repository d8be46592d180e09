//! Clock state and time-of-day arithmetic
//!
//! `ClockState` owns the synced time value. It is written once by a successful
//! sync and read every loop pass by the display code; between writes it
//! advances with the monotonic millisecond counter. There is no periodic
//! resync and no drift correction.

const SECS_PER_DAY: i64 = 86_400;
const SECS_PER_HOUR: i64 = 3600;
const SECS_PER_MINUTE: i64 = 60;

/// Whether the clock holds a synced time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeStatus {
    /// No sync attempted yet
    NotSet,
    /// Last sync attempt failed; the next loop pass retries
    NeedsSync,
    /// Synced; stays set for the process lifetime
    Set,
}

/// Hour/minute/second of the local day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl TimeOfDay {
    /// Midnight, shown while the clock is not set
    pub const MIDNIGHT: Self = Self {
        hour: 0,
        minute: 0,
        second: 0,
    };

    /// Split local epoch seconds into a time of day
    ///
    /// Pre-epoch values wrap backwards into the previous day.
    pub fn from_epoch_secs(epoch_secs: i64) -> Self {
        let secs_today = epoch_secs.rem_euclid(SECS_PER_DAY);
        Self {
            hour: (secs_today / SECS_PER_HOUR) as u8,
            minute: ((secs_today % SECS_PER_HOUR) / SECS_PER_MINUTE) as u8,
            second: (secs_today % SECS_PER_MINUTE) as u8,
        }
    }

    /// Display digits for positions 0..=3 (HH:MM)
    pub fn digits(&self) -> [u8; 4] {
        time_digits(self.hour, self.minute)
    }
}

/// Tens-of-hour, ones-of-hour, tens-of-minute, ones-of-minute
pub fn time_digits(hour: u8, minute: u8) -> [u8; 4] {
    [hour / 10, hour % 10, minute / 10, minute % 10]
}

/// Synced wall-clock time anchored to the monotonic counter
#[derive(Debug, Clone)]
pub struct ClockState {
    status: TimeStatus,
    /// Local epoch seconds at the moment of the last successful sync
    epoch_secs: i64,
    /// Monotonic milliseconds at the moment of the last successful sync
    synced_at_ms: u64,
}

impl ClockState {
    pub const fn new() -> Self {
        Self {
            status: TimeStatus::NotSet,
            epoch_secs: 0,
            synced_at_ms: 0,
        }
    }

    pub fn status(&self) -> TimeStatus {
        self.status
    }

    /// `true` once a sync has succeeded
    pub fn is_set(&self) -> bool {
        self.status == TimeStatus::Set
    }

    /// Record a synced time observed at monotonic instant `now_ms`
    pub fn set(&mut self, epoch_secs: i64, now_ms: u64) {
        self.epoch_secs = epoch_secs;
        self.synced_at_ms = now_ms;
        self.status = TimeStatus::Set;
    }

    /// Record a failed sync attempt
    ///
    /// A clock that is already set keeps its time.
    pub fn mark_sync_failed(&mut self) {
        if self.status != TimeStatus::Set {
            self.status = TimeStatus::NeedsSync;
        }
    }

    /// Current local epoch seconds, or `None` before the first sync
    pub fn now(&self, now_ms: u64) -> Option<i64> {
        if !self.is_set() {
            return None;
        }
        let elapsed_secs = now_ms.saturating_sub(self.synced_at_ms) / 1000;
        Some(self.epoch_secs + elapsed_secs as i64)
    }

    /// Time of day to display; midnight until the first sync
    pub fn time_of_day(&self, now_ms: u64) -> TimeOfDay {
        self.now(now_ms)
            .map(TimeOfDay::from_epoch_secs)
            .unwrap_or(TimeOfDay::MIDNIGHT)
    }
}

impl Default for ClockState {
    fn default() -> Self {
        Self::new()
    }
}
