//! Read-only statistics view over a session.
//!
//! Two efficiency formulas exist in the wild for this kind of timer:
//! focus time over open time, and open time over open-plus-paused time.
//! They measure different things, so both are exposed and the
//! presentation layer picks which one to show.

use serde::{Deserialize, Serialize};

use crate::session::SessionState;

/// Snapshot of the four monotonic usage counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Seconds spent counting down in focus.
    pub focus_work_sec: u64,
    /// Seconds the session sat open but paused.
    pub paused_sec: u64,
    /// Seconds spent in microbreaks.
    pub microbreak_sec: u64,
    /// Seconds spent running in any mode.
    pub total_open_sec: u64,
}

impl StatsSnapshot {
    pub fn of(state: &SessionState) -> Self {
        Self {
            focus_work_sec: state.focus_work_sec,
            paused_sec: state.paused_sec,
            microbreak_sec: state.microbreak_sec,
            total_open_sec: state.total_open_sec,
        }
    }

    /// Share of open time spent focused: `focus_work / total_open`.
    pub fn focus_share_percent(&self) -> u32 {
        ratio_percent(self.focus_work_sec, self.total_open_sec)
    }

    /// Share of attended time spent running:
    /// `total_open / (total_open + paused)`.
    pub fn active_share_percent(&self) -> u32 {
        ratio_percent(self.total_open_sec, self.total_open_sec + self.paused_sec)
    }
}

fn ratio_percent(num: u64, den: u64) -> u32 {
    if den == 0 {
        0
    } else {
        ((num as f64 / den as f64) * 100.0).round() as u32
    }
}
