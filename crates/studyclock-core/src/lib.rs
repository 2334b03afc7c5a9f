//! # StudyClock Core Library
//!
//! Core business logic for StudyClock, a single-user focus/break session
//! timer. The library is CLI-first: every operation is available through
//! the `studyclock-cli` binary, which is a thin presentation layer over
//! this crate.
//!
//! ## Architecture
//!
//! - **Session engine**: a tick-driven state machine. It has no internal
//!   clock -- the caller invokes [`SessionEngine::on_tick`] once per second
//!   while the session runs, and [`SessionEngine::on_idle_tick`] once per
//!   second unconditionally.
//! - **Storage**: TOML-based snapshot persistence so a session survives
//!   restarts.
//! - **Statistics**: read-only counters derived from the session state.
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: transition engine owning all session state
//! - [`SessionState`]: configuration, phase, and cumulative statistics
//! - [`SessionStore`]: snapshot load/save
//! - [`StatsSnapshot`]: statistics view with efficiency queries

pub mod error;
pub mod fmt;
pub mod session;
pub mod stats;
pub mod storage;

pub use error::{CoreError, Result, StorageError};
pub use session::{
    AfterMicrobreak, FocusProgress, LunchReturn, Mode, SessionEngine, SessionState,
    SettingsUpdate,
};
pub use stats::StatsSnapshot;
pub use storage::{SessionSnapshot, SessionStore};
