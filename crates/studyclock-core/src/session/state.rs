use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Fixed duration of a lunch break in seconds.
pub const LUNCH_SEC: u32 = 60 * 60;

/// Grace window near a phase's start within which rewind steps to the
/// previous phase instead of restarting the current one.
pub const REWIND_GRACE_SEC: u32 = 10;

/// Remaining-second values at which an eye-rest microbreak is inserted
/// during focus (40 and 20 minutes remaining).
pub const REST_CHECKPOINTS_SEC: [u32; 2] = [40 * 60, 20 * 60];

fn default_remind_at() -> BTreeSet<u32> {
    [40 * 60, 20 * 60, 0].into_iter().collect()
}

/// Current phase of the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Focus,
    Break,
    Lunch,
}

/// What to do when an active microbreak ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AfterMicrobreak {
    /// Continue the frozen focus countdown.
    ResumeFocus,
    GoBreak,
    GoFocus,
}

/// Phase snapshot captured when entering lunch, restored when leaving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunchReturn {
    pub mode: Mode,
    pub remaining: u32,
    pub running: bool,
}

/// All timer/session state: configuration, current phase, countdown, and
/// cumulative statistics.
///
/// Owned exclusively by [`SessionEngine`](super::SessionEngine); nothing
/// outside the engine mutates it. Unsigned second counters with saturating
/// decrements keep `remaining >= 0` by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    // Configuration
    pub focus_min: u32,
    pub break_min: u32,
    /// Microbreak length in seconds; 0 disables microbreaks.
    pub micro_sec: u32,
    pub session_goal: u32,

    // Phase
    pub mode: Mode,
    pub remaining: u32,

    // Progress
    pub completed_units: u32,
    pub finished: bool,

    // Run control
    pub running: bool,

    // Microbreak sub-state
    pub microbreak_active: bool,
    pub microbreak_remaining: u32,
    pub after_micro: Option<AfterMicrobreak>,

    // Reminder tracking, cleared every time focus (re)starts
    pub reminded_this_focus: BTreeSet<u32>,
    pub remind_at: BTreeSet<u32>,

    /// Present only while `mode == Lunch`.
    pub lunch_return: Option<LunchReturn>,

    // Statistics, reset only by an explicit reset
    pub total_open_sec: u64,
    pub paused_sec: u64,
    pub microbreak_sec: u64,
    pub focus_work_sec: u64,
}

impl SessionState {
    /// A fresh paused session with the documented defaults: 50 min focus,
    /// 10 min break, 60 s microbreak, goal of 7 units.
    pub fn new() -> Self {
        Self {
            focus_min: 50,
            break_min: 10,
            micro_sec: 60,
            session_goal: 7,
            mode: Mode::Focus,
            remaining: 50 * 60,
            completed_units: 0,
            finished: false,
            running: false,
            microbreak_active: false,
            microbreak_remaining: 0,
            after_micro: None,
            reminded_this_focus: BTreeSet::new(),
            remind_at: default_remind_at(),
            lunch_return: None,
            total_open_sec: 0,
            paused_sec: 0,
            microbreak_sec: 0,
            focus_work_sec: 0,
        }
    }

    pub fn focus_duration(&self) -> u32 {
        self.focus_min * 60
    }

    pub fn break_duration(&self) -> u32 {
        self.break_min * 60
    }

    /// Full duration of the current phase.
    pub fn phase_duration(&self) -> u32 {
        match self.mode {
            Mode::Focus => self.focus_duration(),
            Mode::Break => self.break_duration(),
            Mode::Lunch => LUNCH_SEC,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
