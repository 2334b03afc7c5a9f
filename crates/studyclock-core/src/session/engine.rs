//! Session transition engine.
//!
//! The engine is a tick-driven state machine. It has no internal clock --
//! the presentation layer calls [`SessionEngine::on_tick`] once per second
//! while the session is running and [`SessionEngine::on_idle_tick`] once
//! per second unconditionally.
//!
//! ## Phases
//!
//! ```text
//! Focus -> (microbreak) -> Break -> Focus -> ... -> finished
//!   |                        ^
//!   +---- Lunch (suspend) ---+  restores the interrupted phase
//! ```
//!
//! Two collaborators are injected at construction: a change notifier,
//! invoked after every state mutation so the caller can re-render, and a
//! signal emitter, invoked at phase and microbreak boundaries to alert the
//! user. State is always mutated fully before either callback runs.

use serde::{Deserialize, Serialize};

use super::state::{
    AfterMicrobreak, LunchReturn, Mode, SessionState, LUNCH_SEC, REST_CHECKPOINTS_SEC,
    REWIND_GRACE_SEC,
};

/// Settings carried from the presentation layer into
/// [`SessionEngine::apply_settings`].
///
/// Durations are expected to be pre-validated at the configuration
/// boundary (`focus_min >= 1`, `session_goal >= 1`); the engine only
/// clamps `start_unit` into range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub focus_min: u32,
    pub break_min: u32,
    pub micro_sec: u32,
    pub session_goal: u32,
    /// 1-based unit to continue from; clamped to `[1, session_goal]`.
    pub start_unit: u32,
}

/// Cumulative focus progress across the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusProgress {
    pub done_sec: u64,
    pub left_sec: u64,
    pub total_sec: u64,
    /// Rounded to the nearest integer; 0 when `total_sec` is 0.
    pub percent: u32,
}

/// The transition engine. Owns the [`SessionState`] and exposes every
/// mutating operation.
pub struct SessionEngine {
    state: SessionState,
    on_change: Box<dyn FnMut()>,
    on_signal: Box<dyn FnMut()>,
}

impl SessionEngine {
    pub fn new(
        state: SessionState,
        on_change: impl FnMut() + 'static,
        on_signal: impl FnMut() + 'static,
    ) -> Self {
        Self {
            state,
            on_change: Box::new(on_change),
            on_signal: Box::new(on_signal),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Hand the state back, e.g. for shutdown persistence.
    pub fn into_state(self) -> SessionState {
        self.state
    }

    fn notify(&mut self) {
        (self.on_change)()
    }

    fn signal(&mut self) {
        (self.on_signal)()
    }

    // ── Phase transitions ────────────────────────────────────────────

    fn switch_to_break(&mut self) {
        self.state.mode = Mode::Break;
        self.state.remaining = self.state.break_duration();
        self.state.lunch_return = None;
        self.signal();
    }

    fn switch_to_focus(&mut self) {
        self.state.mode = Mode::Focus;
        self.state.remaining = self.state.focus_duration();
        self.state.reminded_this_focus.clear();
        self.state.lunch_return = None;
        self.signal();
    }

    /// Suspend the current phase for a one-hour lunch break. The
    /// interrupted `(mode, remaining, running)` triple is restored when
    /// the lunch countdown ends.
    pub fn start_lunch(&mut self) {
        if self.state.finished {
            return;
        }
        self.state.lunch_return = Some(LunchReturn {
            mode: self.state.mode,
            remaining: self.state.remaining,
            running: self.state.running,
        });
        self.clear_microbreak();
        self.state.mode = Mode::Lunch;
        self.state.remaining = LUNCH_SEC;
        self.state.running = true;
        self.notify();
    }

    fn return_from_lunch(&mut self) {
        if let Some(prev) = self.state.lunch_return.take() {
            self.state.mode = prev.mode;
            self.state.remaining = prev.remaining;
            self.state.running = prev.running;
        } else {
            // No snapshot to restore (e.g. loaded mid-lunch from disk).
            self.switch_to_focus();
        }
    }

    fn finish_focus_unit(&mut self, with_microbreak: bool) {
        self.state.completed_units += 1;
        if self.state.completed_units >= self.state.session_goal {
            self.mark_finished();
            self.notify();
            return;
        }
        if with_microbreak {
            self.start_microbreak(AfterMicrobreak::GoBreak);
        } else {
            self.switch_to_break();
            self.notify();
        }
    }

    /// Terminal transition; idempotent. `finished` is only cleared again
    /// by [`reset`](Self::reset) or [`apply_settings`](Self::apply_settings).
    fn mark_finished(&mut self) {
        self.state.finished = true;
        self.state.running = false;
        self.clear_microbreak();
    }

    fn clear_microbreak(&mut self) {
        self.state.microbreak_active = false;
        self.state.microbreak_remaining = 0;
        self.state.after_micro = None;
    }

    // ── Microbreaks ──────────────────────────────────────────────────

    fn start_microbreak(&mut self, after: AfterMicrobreak) {
        if self.state.micro_sec == 0 {
            // Microbreaks disabled: run the follow-up transition right away
            // without ever becoming active.
            self.state.after_micro = Some(after);
            self.end_microbreak();
            return;
        }
        self.state.microbreak_active = true;
        self.state.microbreak_remaining = self.state.micro_sec;
        self.state.after_micro = Some(after);
        self.signal();
        self.notify();
    }

    fn end_microbreak(&mut self) {
        self.signal();
        self.state.microbreak_active = false;
        self.state.microbreak_remaining = 0;
        match self.state.after_micro.take() {
            Some(AfterMicrobreak::GoBreak) => self.switch_to_break(),
            Some(AfterMicrobreak::GoFocus) => self.switch_to_focus(),
            // The frozen focus countdown simply continues.
            Some(AfterMicrobreak::ResumeFocus) | None => {}
        }
        self.notify();
    }

    // ── Per-second ticks ─────────────────────────────────────────────

    /// Advance the session by one second. Only meaningful while running;
    /// a no-op when paused or finished.
    pub fn on_tick(&mut self) {
        if self.state.finished || !self.state.running {
            return;
        }
        self.state.total_open_sec += 1;

        if self.state.microbreak_active {
            self.state.microbreak_sec += 1;
            self.state.microbreak_remaining = self.state.microbreak_remaining.saturating_sub(1);
            if self.state.microbreak_remaining == 0 {
                self.end_microbreak();
            } else {
                self.notify();
            }
            return;
        }

        if self.state.mode == Mode::Focus {
            self.state.focus_work_sec += 1;
        }
        self.state.remaining = self.state.remaining.saturating_sub(1);

        // Reminder checkpoints fire once per focus phase. A checkpoint at
        // 0 remaining takes precedence over the plain phase-end check
        // below; both feed the same unit-completion handler.
        if self.state.mode == Mode::Focus {
            let at = self.state.remaining;
            if self.state.remind_at.contains(&at) && self.state.reminded_this_focus.insert(at) {
                if REST_CHECKPOINTS_SEC.contains(&at) {
                    // Eye-rest pause; the countdown stays frozen at this
                    // value until the microbreak completes.
                    self.start_microbreak(AfterMicrobreak::ResumeFocus);
                    return;
                }
                if at == 0 {
                    self.finish_focus_unit(true);
                    return;
                }
            }
        }

        if self.state.remaining == 0 {
            match self.state.mode {
                Mode::Focus => self.finish_focus_unit(true),
                Mode::Break => {
                    self.switch_to_focus();
                    self.notify();
                }
                Mode::Lunch => {
                    self.return_from_lunch();
                    self.notify();
                }
            }
            return;
        }

        self.notify();
    }

    /// Called once per second regardless of run state; accrues the time
    /// the user left the session open but paused.
    pub fn on_idle_tick(&mut self) {
        if !self.state.running && !self.state.microbreak_active && !self.state.finished {
            self.state.paused_sec += 1;
        }
    }

    // ── User controls ────────────────────────────────────────────────

    pub fn start(&mut self) {
        if self.state.finished {
            return;
        }
        self.state.running = true;
        self.notify();
    }

    pub fn pause(&mut self) {
        self.state.running = false;
        self.notify();
    }

    pub fn toggle(&mut self) {
        if self.state.running {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Return to a paused full focus phase at unit 1 and zero all
    /// statistics counters.
    pub fn reset(&mut self) {
        let s = &mut self.state;
        s.running = false;
        s.mode = Mode::Focus;
        s.remaining = s.focus_duration();
        s.completed_units = 0;
        s.finished = false;
        s.microbreak_active = false;
        s.microbreak_remaining = 0;
        s.after_micro = None;
        s.reminded_this_focus.clear();
        s.lunch_return = None;
        s.total_open_sec = 0;
        s.paused_sec = 0;
        s.microbreak_sec = 0;
        s.focus_work_sec = 0;
        self.notify();
    }

    /// Skip forward: end an active microbreak, finish the current focus
    /// unit without a microbreak, or leave a break/lunch for focus.
    pub fn skip(&mut self) {
        if self.state.finished {
            return;
        }
        if self.state.microbreak_active {
            self.end_microbreak();
            return;
        }
        match self.state.mode {
            Mode::Focus => self.finish_focus_unit(false),
            Mode::Break | Mode::Lunch => {
                self.switch_to_focus();
                self.notify();
            }
        }
    }

    /// Step backward. An active microbreak is cancelled outright. More
    /// than [`REWIND_GRACE_SEC`] into a phase the phase restarts;
    /// within the grace window the session steps to the previous phase.
    pub fn rewind(&mut self) {
        if self.state.finished {
            return;
        }
        if self.state.microbreak_active {
            // Cancel without running the follow-up transition.
            self.clear_microbreak();
            self.notify();
            return;
        }

        let duration = self.state.phase_duration();
        let elapsed = duration.saturating_sub(self.state.remaining);
        if elapsed > REWIND_GRACE_SEC {
            self.state.remaining = duration;
            self.notify();
            return;
        }

        match self.state.mode {
            Mode::Focus if self.state.completed_units > 0 => {
                self.state.completed_units -= 1;
                self.switch_to_break();
            }
            // No previous phase exists before the first unit.
            Mode::Focus => self.state.remaining = duration,
            Mode::Break => self.switch_to_focus(),
            Mode::Lunch => self.return_from_lunch(),
        }
        self.notify();
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// Apply new durations and goal mid-session. When neither running nor
    /// in a microbreak, the current countdown is resized immediately so
    /// the change takes effect without waiting for the phase to roll over.
    pub fn apply_settings(&mut self, update: SettingsUpdate) {
        let s = &mut self.state;
        s.focus_min = update.focus_min;
        s.break_min = update.break_min;
        s.micro_sec = update.micro_sec;
        s.session_goal = update.session_goal;

        let start_unit = update.start_unit.max(1).min(s.session_goal.max(1));
        s.completed_units = start_unit - 1;
        s.finished = false;

        if !s.running && !s.microbreak_active {
            s.remaining = match s.mode {
                Mode::Focus => s.focus_duration(),
                Mode::Break | Mode::Lunch => s.break_duration(),
            };
        }
        self.notify();
    }

    // ── Derived queries ──────────────────────────────────────────────

    /// The 1-based unit currently in progress.
    pub fn current_unit(&self) -> u32 {
        if self.state.finished {
            self.state.session_goal
        } else {
            (self.state.completed_units + 1).min(self.state.session_goal)
        }
    }

    /// Cumulative focus seconds completed across the session, clamped to
    /// `[0, total]`.
    pub fn focus_progress(&self) -> FocusProgress {
        let block = u64::from(self.state.focus_duration());
        let total = u64::from(self.state.session_goal) * block;

        let mut done = u64::from(self.state.completed_units) * block;
        if self.state.mode == Mode::Focus && !self.state.finished {
            done += block.saturating_sub(u64::from(self.state.remaining));
        }
        let done = done.min(total);

        let percent = if total == 0 {
            0
        } else {
            ((done as f64 / total as f64) * 100.0).round() as u32
        };
        FocusProgress {
            done_sec: done,
            left_sec: total - done,
            total_sec: total,
            percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use proptest::prelude::*;

    use super::*;

    fn engine(state: SessionState) -> SessionEngine {
        SessionEngine::new(state, || {}, || {})
    }

    fn counting_engine(state: SessionState) -> (SessionEngine, Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let changes = Rc::new(Cell::new(0));
        let signals = Rc::new(Cell::new(0));
        let c = Rc::clone(&changes);
        let s = Rc::clone(&signals);
        let engine = SessionEngine::new(
            state,
            move || c.set(c.get() + 1),
            move || s.set(s.get() + 1),
        );
        (engine, changes, signals)
    }

    fn running_state() -> SessionState {
        let mut s = SessionState::new();
        s.running = true;
        s
    }

    #[test]
    fn tick_is_noop_when_paused_or_finished() {
        let mut e = engine(SessionState::new());
        e.on_tick();
        assert_eq!(e.state().remaining, 3000);
        assert_eq!(e.state().total_open_sec, 0);

        let mut s = running_state();
        s.finished = true;
        s.running = false;
        s.completed_units = s.session_goal;
        let mut e = engine(s);
        e.on_tick();
        assert_eq!(e.state().total_open_sec, 0);
    }

    #[test]
    fn tick_accrues_stats_and_counts_down() {
        let mut e = engine(running_state());
        e.on_tick();
        let s = e.state();
        assert_eq!(s.remaining, 2999);
        assert_eq!(s.total_open_sec, 1);
        assert_eq!(s.focus_work_sec, 1);
        assert_eq!(s.microbreak_sec, 0);
    }

    #[test]
    fn reminder_at_40_min_freezes_countdown_and_fires_once() {
        let mut e = engine(running_state());
        for _ in 0..600 {
            e.on_tick();
        }
        let s = e.state();
        assert_eq!(s.remaining, 2400);
        assert!(s.microbreak_active);
        assert_eq!(s.after_micro, Some(AfterMicrobreak::ResumeFocus));
        assert_eq!(s.microbreak_remaining, 60);
        assert!(s.reminded_this_focus.contains(&2400));

        // Run the microbreak out; the countdown resumes where it froze.
        for _ in 0..60 {
            e.on_tick();
        }
        assert!(!e.state().microbreak_active);
        assert_eq!(e.state().remaining, 2400);
        e.on_tick();
        let s = e.state();
        assert_eq!(s.remaining, 2399);
        assert!(!s.microbreak_active, "2400 must not re-trigger");
        assert_eq!(s.total_open_sec, 661);
        assert_eq!(s.focus_work_sec, 601);
        assert_eq!(s.microbreak_sec, 60);
    }

    #[test]
    fn zero_length_microbreak_is_never_observed_active() {
        let mut s = running_state();
        s.micro_sec = 0;
        s.remaining = 1;
        let mut e = engine(s);
        e.on_tick();
        let s = e.state();
        assert_eq!(s.completed_units, 1);
        assert_eq!(s.mode, Mode::Break);
        assert_eq!(s.remaining, 600);
        assert!(!s.microbreak_active);
        assert_eq!(s.after_micro, None);
        assert_eq!(s.microbreak_sec, 0);
    }

    #[test]
    fn focus_end_without_zero_checkpoint_still_completes_unit() {
        let mut s = running_state();
        s.remind_at.remove(&0);
        s.remaining = 1;
        let mut e = engine(s);
        e.on_tick();
        let s = e.state();
        assert_eq!(s.completed_units, 1);
        assert!(s.microbreak_active);
        assert_eq!(s.after_micro, Some(AfterMicrobreak::GoBreak));
        assert_eq!(s.remaining, 0);
    }

    #[test]
    fn microbreak_then_break_after_focus_unit() {
        let mut s = running_state();
        s.micro_sec = 5;
        s.remaining = 1;
        let mut e = engine(s);
        e.on_tick();
        assert!(e.state().microbreak_active);
        assert_eq!(e.state().microbreak_remaining, 5);
        for _ in 0..5 {
            e.on_tick();
        }
        let s = e.state();
        assert_eq!(s.mode, Mode::Break);
        assert_eq!(s.remaining, 600);
        assert_eq!(s.microbreak_sec, 5);
    }

    #[test]
    fn completing_final_unit_is_terminal() {
        let mut s = running_state();
        s.session_goal = 2;
        s.completed_units = 1;
        s.remaining = 1;
        let mut e = engine(s);
        e.on_tick();
        let s = e.state();
        assert!(s.finished);
        assert!(!s.running);
        assert_eq!(s.completed_units, 2);
        assert!(!s.microbreak_active);

        e.start();
        assert!(!e.state().running);
        e.skip();
        assert_eq!(e.state().completed_units, 2);
        e.rewind();
        assert_eq!(e.state().mode, Mode::Focus);
        e.start_lunch();
        assert_eq!(e.state().mode, Mode::Focus);
    }

    #[test]
    fn apply_settings_clears_finished() {
        let mut s = SessionState::new();
        s.session_goal = 2;
        s.completed_units = 2;
        s.finished = true;
        let mut e = engine(s);
        e.apply_settings(SettingsUpdate {
            focus_min: 50,
            break_min: 10,
            micro_sec: 60,
            session_goal: 3,
            start_unit: 3,
        });
        let s = e.state();
        assert!(!s.finished);
        assert_eq!(s.completed_units, 2);
        assert_eq!(s.session_goal, 3);
    }

    #[test]
    fn apply_settings_clamps_start_unit() {
        let mut e = engine(SessionState::new());
        e.apply_settings(SettingsUpdate {
            focus_min: 50,
            break_min: 10,
            micro_sec: 60,
            session_goal: 5,
            start_unit: 99,
        });
        assert_eq!(e.state().completed_units, 4);

        e.apply_settings(SettingsUpdate {
            focus_min: 50,
            break_min: 10,
            micro_sec: 60,
            session_goal: 5,
            start_unit: 0,
        });
        assert_eq!(e.state().completed_units, 0);
    }

    #[test]
    fn apply_settings_resizes_countdown_only_while_idle() {
        let mut e = engine(SessionState::new());
        e.apply_settings(SettingsUpdate {
            focus_min: 30,
            break_min: 10,
            micro_sec: 60,
            session_goal: 7,
            start_unit: 1,
        });
        assert_eq!(e.state().remaining, 1800);

        let mut s = running_state();
        s.remaining = 1234;
        let mut e = engine(s);
        e.apply_settings(SettingsUpdate {
            focus_min: 30,
            break_min: 10,
            micro_sec: 60,
            session_goal: 7,
            start_unit: 1,
        });
        assert_eq!(e.state().remaining, 1234);
    }

    #[test]
    fn reset_returns_to_pristine_focus() {
        let mut s = running_state();
        s.mode = Mode::Break;
        s.remaining = 42;
        s.completed_units = 3;
        s.finished = false;
        s.microbreak_active = true;
        s.microbreak_remaining = 7;
        s.after_micro = Some(AfterMicrobreak::GoBreak);
        s.reminded_this_focus.insert(2400);
        s.total_open_sec = 100;
        s.paused_sec = 50;
        s.microbreak_sec = 9;
        s.focus_work_sec = 80;
        let mut e = engine(s);
        e.reset();
        let s = e.state();
        assert_eq!(s.mode, Mode::Focus);
        assert_eq!(s.remaining, 3000);
        assert_eq!(s.completed_units, 0);
        assert!(!s.finished);
        assert!(!s.running);
        assert!(!s.microbreak_active);
        assert_eq!(s.after_micro, None);
        assert!(s.reminded_this_focus.is_empty());
        assert_eq!(s.total_open_sec, 0);
        assert_eq!(s.paused_sec, 0);
        assert_eq!(s.microbreak_sec, 0);
        assert_eq!(s.focus_work_sec, 0);
    }

    #[test]
    fn skip_in_focus_goes_straight_to_break() {
        let mut s = running_state();
        s.remaining = 1500;
        let mut e = engine(s);
        e.skip();
        let s = e.state();
        assert_eq!(s.completed_units, 1);
        assert_eq!(s.mode, Mode::Break);
        assert!(!s.microbreak_active);
    }

    #[test]
    fn skip_in_break_starts_fresh_focus() {
        let mut s = running_state();
        s.mode = Mode::Break;
        s.remaining = 300;
        s.reminded_this_focus.insert(2400);
        let mut e = engine(s);
        e.skip();
        let s = e.state();
        assert_eq!(s.mode, Mode::Focus);
        assert_eq!(s.remaining, 3000);
        assert!(s.reminded_this_focus.is_empty());
    }

    #[test]
    fn skip_ends_microbreak_with_followup() {
        let mut s = running_state();
        s.microbreak_active = true;
        s.microbreak_remaining = 30;
        s.after_micro = Some(AfterMicrobreak::GoBreak);
        let mut e = engine(s);
        e.skip();
        let s = e.state();
        assert!(!s.microbreak_active);
        assert_eq!(s.mode, Mode::Break);
    }

    #[test]
    fn rewind_cancels_microbreak_without_followup() {
        let mut s = running_state();
        s.remaining = 2400;
        s.microbreak_active = true;
        s.microbreak_remaining = 30;
        s.after_micro = Some(AfterMicrobreak::GoBreak);
        let mut e = engine(s);
        e.rewind();
        let s = e.state();
        assert!(!s.microbreak_active);
        assert_eq!(s.after_micro, None);
        assert_eq!(s.mode, Mode::Focus);
        assert_eq!(s.remaining, 2400);
    }

    #[test]
    fn rewind_restarts_phase_past_grace_window() {
        let mut s = running_state();
        s.mode = Mode::Break;
        s.remaining = 600 - 11;
        let mut e = engine(s);
        e.rewind();
        let s = e.state();
        assert_eq!(s.mode, Mode::Break);
        assert_eq!(s.remaining, 600);
    }

    #[test]
    fn rewind_steps_back_within_grace_window() {
        let mut s = running_state();
        s.mode = Mode::Break;
        s.remaining = 600;
        let mut e = engine(s);
        e.rewind();
        let s = e.state();
        assert_eq!(s.mode, Mode::Focus);
        assert_eq!(s.remaining, 3000);
    }

    #[test]
    fn rewind_focus_with_completed_units_returns_to_break() {
        let mut s = running_state();
        s.completed_units = 2;
        s.remaining = 3000 - 5;
        let mut e = engine(s);
        e.rewind();
        let s = e.state();
        assert_eq!(s.completed_units, 1);
        assert_eq!(s.mode, Mode::Break);
        assert_eq!(s.remaining, 600);
    }

    #[test]
    fn rewind_first_focus_only_restarts() {
        let mut s = running_state();
        s.remaining = 2995;
        let mut e = engine(s);
        e.rewind();
        let s = e.state();
        assert_eq!(s.mode, Mode::Focus);
        assert_eq!(s.remaining, 3000);
        assert_eq!(s.completed_units, 0);
    }

    #[test]
    fn lunch_restores_interrupted_break() {
        let mut s = SessionState::new();
        s.mode = Mode::Break;
        s.remaining = 137;
        let mut e = engine(s);
        e.start_lunch();
        let s = e.state();
        assert_eq!(s.mode, Mode::Lunch);
        assert_eq!(s.remaining, 3600);
        assert!(s.running);
        assert_eq!(
            s.lunch_return,
            Some(LunchReturn {
                mode: Mode::Break,
                remaining: 137,
                running: false,
            })
        );

        e.state.remaining = 1;
        e.on_tick();
        let s = e.state();
        assert_eq!(s.mode, Mode::Break);
        assert_eq!(s.remaining, 137);
        assert!(!s.running);
        assert_eq!(s.lunch_return, None);
    }

    #[test]
    fn rewind_during_lunch_restores_snapshot() {
        let mut s = running_state();
        s.remaining = 500;
        let mut e = engine(s);
        e.start_lunch();
        e.rewind();
        let s = e.state();
        assert_eq!(s.mode, Mode::Focus);
        assert_eq!(s.remaining, 500);
        assert!(s.running);
    }

    #[test]
    fn skip_during_lunch_drops_snapshot() {
        let mut e = engine(running_state());
        e.start_lunch();
        e.skip();
        let s = e.state();
        assert_eq!(s.mode, Mode::Focus);
        assert_eq!(s.remaining, 3000);
        assert_eq!(s.lunch_return, None);
    }

    #[test]
    fn start_lunch_cancels_active_microbreak() {
        let mut s = running_state();
        s.microbreak_active = true;
        s.microbreak_remaining = 20;
        s.after_micro = Some(AfterMicrobreak::ResumeFocus);
        let mut e = engine(s);
        e.start_lunch();
        let s = e.state();
        assert_eq!(s.mode, Mode::Lunch);
        assert!(!s.microbreak_active);
        assert_eq!(s.after_micro, None);
    }

    #[test]
    fn idle_tick_accrues_only_while_paused() {
        let mut e = engine(SessionState::new());
        e.on_idle_tick();
        assert_eq!(e.state().paused_sec, 1);

        let mut e = engine(running_state());
        e.on_idle_tick();
        assert_eq!(e.state().paused_sec, 0);

        let mut s = SessionState::new();
        s.microbreak_active = true;
        s.after_micro = Some(AfterMicrobreak::ResumeFocus);
        let mut e = engine(s);
        e.on_idle_tick();
        assert_eq!(e.state().paused_sec, 0);

        let mut s = SessionState::new();
        s.finished = true;
        s.completed_units = s.session_goal;
        let mut e = engine(s);
        e.on_idle_tick();
        assert_eq!(e.state().paused_sec, 0);
    }

    #[test]
    fn current_unit_is_one_based_and_capped() {
        let mut s = SessionState::new();
        s.completed_units = 2;
        let e = engine(s.clone());
        assert_eq!(e.current_unit(), 3);

        s.completed_units = 7;
        s.finished = true;
        let e = engine(s);
        assert_eq!(e.current_unit(), 7);
    }

    #[test]
    fn focus_progress_midway_through_unit_three() {
        let mut s = SessionState::new();
        s.completed_units = 2;
        s.remaining = 2700;
        let e = engine(s);
        let p = e.focus_progress();
        assert_eq!(p.done_sec, 6300);
        assert_eq!(p.total_sec, 21000);
        assert_eq!(p.left_sec, 14700);
        assert_eq!(p.percent, 30);
    }

    #[test]
    fn focus_progress_ignores_countdown_outside_focus() {
        let mut s = SessionState::new();
        s.mode = Mode::Break;
        s.remaining = 300;
        s.completed_units = 1;
        let e = engine(s);
        assert_eq!(e.focus_progress().done_sec, 3000);
    }

    #[test]
    fn focus_progress_zero_total_yields_zero_percent() {
        let mut s = SessionState::new();
        s.focus_min = 0;
        s.remaining = 0;
        let e = engine(s);
        let p = e.focus_progress();
        assert_eq!(p.total_sec, 0);
        assert_eq!(p.percent, 0);
    }

    #[test]
    fn callbacks_fire_after_mutation() {
        let (mut e, changes, signals) = counting_engine(running_state());
        e.pause();
        assert_eq!(changes.get(), 1);
        e.start();
        assert_eq!(changes.get(), 2);
        assert_eq!(signals.get(), 0);

        // A focus unit finishing signals at the microbreak boundary.
        e.state.remaining = 1;
        e.on_tick();
        assert!(signals.get() >= 1);
    }

    fn apply_op(engine: &mut SessionEngine, op: u8) {
        match op {
            0 => engine.on_tick(),
            1 => engine.on_idle_tick(),
            2 => engine.start(),
            3 => engine.pause(),
            4 => engine.toggle(),
            5 => engine.skip(),
            6 => engine.rewind(),
            7 => engine.start_lunch(),
            _ => engine.reset(),
        }
    }

    proptest! {
        #[test]
        fn invariants_hold_for_any_operation_sequence(
            ops in proptest::collection::vec(0u8..9, 0..200)
        ) {
            let mut state = SessionState::new();
            state.focus_min = 1;
            state.break_min = 1;
            state.micro_sec = 3;
            state.session_goal = 3;
            state.remaining = 60;
            let mut engine = SessionEngine::new(state, || {}, || {});

            for op in ops {
                apply_op(&mut engine, op);
                let s = engine.state();
                prop_assert!(s.completed_units <= s.session_goal);
                if s.microbreak_active {
                    prop_assert!(s.after_micro.is_some());
                } else {
                    prop_assert_eq!(s.microbreak_remaining, 0);
                    prop_assert!(s.after_micro.is_none());
                }
                if s.finished {
                    prop_assert_eq!(s.completed_units, s.session_goal);
                    prop_assert!(!s.running);
                }
                prop_assert!(s.reminded_this_focus.is_subset(&s.remind_at));
                prop_assert!(s.lunch_return.is_none() || s.mode == Mode::Lunch);
            }
        }
    }
}
