mod engine;
mod state;

pub use engine::{FocusProgress, SessionEngine, SettingsUpdate};
pub use state::{
    AfterMicrobreak, LunchReturn, Mode, SessionState, LUNCH_SEC, REST_CHECKPOINTS_SEC,
    REWIND_GRACE_SEC,
};
