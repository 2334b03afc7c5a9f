//! TOML-based session snapshot persistence.
//!
//! The persisted form is a flat record of primitive scalars stored at
//! `~/.config/studyclock/session.toml`. The run flag is deliberately not
//! part of the snapshot: a loaded session always starts paused.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::StorageError;
use crate::session::{AfterMicrobreak, Mode, SessionState, LUNCH_SEC};

fn default_focus_min() -> u32 {
    50
}
fn default_break_min() -> u32 {
    10
}
fn default_micro_sec() -> u32 {
    60
}
fn default_session_goal() -> u32 {
    7
}

/// Flat persistence record for configuration and runtime state.
///
/// Every field has a documented default so a missing or partial file
/// yields a usable session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default = "default_focus_min")]
    pub focus_min: u32,
    #[serde(default = "default_break_min")]
    pub break_min: u32,
    #[serde(default = "default_micro_sec")]
    pub micro_sec: u32,
    #[serde(default = "default_session_goal")]
    pub session_goal: u32,

    #[serde(default)]
    pub mode: Mode,
    /// Absent on first launch; derived from the mode's configured
    /// duration when loading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,

    #[serde(default)]
    pub completed_units: u32,
    #[serde(default)]
    pub finished: bool,

    #[serde(default)]
    pub microbreak_active: bool,
    #[serde(default)]
    pub microbreak_remaining: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_micro: Option<AfterMicrobreak>,

    #[serde(default)]
    pub total_open_sec: u64,
    #[serde(default)]
    pub paused_sec: u64,
    #[serde(default)]
    pub microbreak_sec: u64,
    #[serde(default)]
    pub focus_work_sec: u64,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            focus_min: default_focus_min(),
            break_min: default_break_min(),
            micro_sec: default_micro_sec(),
            session_goal: default_session_goal(),
            mode: Mode::Focus,
            remaining: None,
            completed_units: 0,
            finished: false,
            microbreak_active: false,
            microbreak_remaining: 0,
            after_micro: None,
            total_open_sec: 0,
            paused_sec: 0,
            microbreak_sec: 0,
            focus_work_sec: 0,
        }
    }
}

impl SessionSnapshot {
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            focus_min: state.focus_min,
            break_min: state.break_min,
            micro_sec: state.micro_sec,
            session_goal: state.session_goal,
            mode: state.mode,
            remaining: Some(state.remaining),
            completed_units: state.completed_units,
            finished: state.finished,
            microbreak_active: state.microbreak_active,
            microbreak_remaining: state.microbreak_remaining,
            after_micro: state.after_micro,
            total_open_sec: state.total_open_sec,
            paused_sec: state.paused_sec,
            microbreak_sec: state.microbreak_sec,
            focus_work_sec: state.focus_work_sec,
        }
    }

    /// Build the in-memory session. `running` is always forced to false;
    /// resuming is a user action.
    pub fn into_state(self) -> SessionState {
        let mut state = SessionState::new();
        state.focus_min = self.focus_min;
        state.break_min = self.break_min;
        state.micro_sec = self.micro_sec;
        state.session_goal = self.session_goal;
        state.mode = self.mode;
        state.remaining = self.remaining.unwrap_or(match self.mode {
            Mode::Focus => self.focus_min * 60,
            Mode::Break => self.break_min * 60,
            Mode::Lunch => LUNCH_SEC,
        });
        state.completed_units = self.completed_units;
        state.finished = self.finished;
        state.running = false;
        state.microbreak_active = self.microbreak_active;
        state.microbreak_remaining = self.microbreak_remaining;
        state.after_micro = self.after_micro;
        state.total_open_sec = self.total_open_sec;
        state.paused_sec = self.paused_sec;
        state.microbreak_sec = self.microbreak_sec;
        state.focus_work_sec = self.focus_work_sec;
        state
    }
}

/// Snapshot store bound to a file path.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store at the default data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn open() -> Result<Self, StorageError> {
        Ok(Self {
            path: data_dir()?.join("session.toml"),
        })
    }

    /// Store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted snapshot, or defaults when no file exists yet.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(&self) -> Result<SessionSnapshot, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| StorageError::LoadFailed {
                    path: self.path.clone(),
                    message: e.to_string(),
                })
            }
            Err(_) => Ok(SessionSnapshot::default()),
        }
    }

    /// Persist the snapshot.
    ///
    /// # Errors
    /// Returns an error if the snapshot cannot be serialized or written.
    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        let content =
            toml::to_string_pretty(snapshot).map_err(|e| StorageError::SaveFailed {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        std::fs::write(&self.path, content).map_err(|e| StorageError::SaveFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}
