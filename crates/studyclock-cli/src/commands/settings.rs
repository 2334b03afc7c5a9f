use clap::Args;
use studyclock_core::{Result, SessionStore, SettingsUpdate};

use super::timer::{load_engine, save_engine};

/// Settings applied to the running session and persisted immediately.
/// Omitted values keep their current configuration.
#[derive(Args)]
pub struct SettingsArgs {
    /// Focus phase length in minutes
    #[arg(long = "focus", value_parser = clap::value_parser!(u32).range(1..=300))]
    pub focus_min: Option<u32>,

    /// Break phase length in minutes
    #[arg(long = "break", value_parser = clap::value_parser!(u32).range(1..=120))]
    pub break_min: Option<u32>,

    /// Microbreak length in seconds; 0 disables microbreaks
    #[arg(long = "micro", value_parser = clap::value_parser!(u32).range(0..=600))]
    pub micro_sec: Option<u32>,

    /// Target number of focus units
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=50))]
    pub goal: Option<u32>,

    /// 1-based unit to continue from
    #[arg(long = "start-unit", value_parser = clap::value_parser!(u32).range(1..=50))]
    pub start_unit: Option<u32>,
}

pub fn run(args: SettingsArgs) -> Result<()> {
    let store = SessionStore::open()?;
    let (mut engine, _dirty) = load_engine(&store)?;

    let current = engine.state();
    let update = SettingsUpdate {
        focus_min: args.focus_min.unwrap_or(current.focus_min),
        break_min: args.break_min.unwrap_or(current.break_min),
        micro_sec: args.micro_sec.unwrap_or(current.micro_sec),
        session_goal: args.goal.unwrap_or(current.session_goal),
        start_unit: args.start_unit.unwrap_or_else(|| engine.current_unit()),
    };
    engine.apply_settings(update);

    // Configuration changes are persisted at the point of change.
    save_engine(&store, &engine)?;
    println!("{}", serde_json::to_string_pretty(engine.state())?);
    Ok(())
}
