use clap::Subcommand;
use studyclock_core::fmt::format_hm;
use studyclock_core::{Result, SessionStore, StatsSnapshot};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Current session counters and efficiency
    Show,
}

pub fn run(action: StatsAction) -> Result<()> {
    let store = SessionStore::open()?;
    let state = store.load()?.into_state();

    match action {
        StatsAction::Show => {
            let stats = StatsSnapshot::of(&state);
            // Both efficiency variants are reported; picking one is a
            // display decision, not the core's.
            let report = serde_json::json!({
                "focus_work_sec": stats.focus_work_sec,
                "paused_sec": stats.paused_sec,
                "microbreak_sec": stats.microbreak_sec,
                "total_open_sec": stats.total_open_sec,
                "focus_work_hm": format_hm(stats.focus_work_sec),
                "paused_hm": format_hm(stats.paused_sec),
                "microbreak_hm": format_hm(stats.microbreak_sec),
                "total_open_hm": format_hm(stats.total_open_sec),
                "focus_share_percent": stats.focus_share_percent(),
                "active_share_percent": stats.active_share_percent(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
