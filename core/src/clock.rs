use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::TourEvent;

/// Generation of a [`SessionClock`]. Every reset starts a new epoch, and ticks
/// stamped with an older one are discarded.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClockEpoch(u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
enum ClockPhase {
    Armed,
    Running,
    Stopped,
}

/// What the clock did in response to a tour event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClockSignal {
    Started,
    Stopped { elapsed_secs: u32 },
}

/// Whole-seconds counter whose lifecycle follows the tour: armed by a reset,
/// started by the first move, stopped once by the end of the tour.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClock {
    elapsed_secs: u32,
    phase: ClockPhase,
    epoch: ClockEpoch,
}

impl SessionClock {
    pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

    pub fn new() -> Self {
        Self {
            elapsed_secs: 0,
            phase: ClockPhase::Armed,
            epoch: ClockEpoch::default(),
        }
    }

    pub fn epoch(&self) -> ClockEpoch {
        self.epoch
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn is_running(&self) -> bool {
        self.phase == ClockPhase::Running
    }

    pub fn has_stopped(&self) -> bool {
        self.phase == ClockPhase::Stopped
    }

    /// Zeroes the counter, re-arms start/stop and invalidates every earlier tick source.
    pub fn reset(&mut self) -> ClockEpoch {
        self.elapsed_secs = 0;
        self.phase = ClockPhase::Armed;
        self.epoch = ClockEpoch(self.epoch.0.wrapping_add(1));
        log::trace!("clock reset, epoch {:?}", self.epoch);
        self.epoch
    }

    /// Starts counting; only the first call after a reset has any effect.
    pub fn start(&mut self) -> bool {
        if self.phase != ClockPhase::Armed {
            return false;
        }
        self.phase = ClockPhase::Running;
        log::debug!("clock started");
        true
    }

    /// Freezes the counter and yields the final value, exactly once per epoch.
    pub fn stop(&mut self) -> Option<u32> {
        if self.phase == ClockPhase::Stopped {
            return None;
        }
        self.phase = ClockPhase::Stopped;
        log::debug!("clock stopped at {}", format_elapsed(self.elapsed_secs));
        Some(self.elapsed_secs)
    }

    /// Advances by one second if `epoch` is current and the clock is running.
    pub fn tick(&mut self, epoch: ClockEpoch) -> bool {
        if epoch != self.epoch {
            log::trace!("discarding tick from stale epoch {:?}", epoch);
            return false;
        }
        if !self.is_running() {
            return false;
        }
        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        true
    }

    pub fn on_event(&mut self, event: &TourEvent) -> Option<ClockSignal> {
        match event {
            TourEvent::FirstMoveMade => self.start().then_some(ClockSignal::Started),
            TourEvent::TourEnded(_) => self
                .stop()
                .map(|elapsed_secs| ClockSignal::Stopped { elapsed_secs }),
        }
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats whole seconds as zero-padded `MM:SS`; minutes are not capped.
pub fn format_elapsed(total_secs: u32) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Parses `MM:SS` back into whole seconds. Seconds must be below 60.
pub fn parse_elapsed(text: &str) -> Option<u64> {
    let (minutes, seconds) = text.trim().split_once(':')?;
    let digits = |field: &str| !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit());
    if !digits(minutes) || !digits(seconds) || seconds.len() != 2 {
        return None;
    }
    let minutes: u64 = minutes.parse().ok()?;
    let seconds: u64 = seconds.parse().ok()?;
    if seconds >= 60 {
        return None;
    }
    minutes.checked_mul(60)?.checked_add(seconds)
}
