use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use clap::Subcommand;
use studyclock_core::fmt::{format_hm, format_mmss};
use studyclock_core::{Mode, Result, SessionEngine, SessionSnapshot, SessionStore};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Resume the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Toggle between running and paused
    Toggle,
    /// Skip to the next phase (focus: completes the unit)
    Skip,
    /// Restart the phase, or step back to the previous one near its start
    Rewind,
    /// Reset the session and zero all statistics
    Reset,
    /// Suspend the session for a one-hour lunch break
    Lunch,
    /// Print current session state as JSON
    Status,
    /// Drive the session in the foreground, one tick per second
    Run {
        /// Stop after this many seconds instead of running to the goal
        #[arg(long)]
        seconds: Option<u64>,
    },
}

fn ring_bell() {
    eprint!("\x07");
}

/// Rebuild the engine from the persisted snapshot. The change notifier
/// raises a dirty flag; the foreground driver re-renders when it is set.
pub(crate) fn load_engine(store: &SessionStore) -> Result<(SessionEngine, Rc<Cell<bool>>)> {
    let snapshot = store.load()?;
    let dirty = Rc::new(Cell::new(false));
    let flag = Rc::clone(&dirty);
    let engine = SessionEngine::new(snapshot.into_state(), move || flag.set(true), ring_bell);
    Ok((engine, dirty))
}

pub(crate) fn save_engine(store: &SessionStore, engine: &SessionEngine) -> Result<()> {
    store.save(&SessionSnapshot::from_state(engine.state()))?;
    Ok(())
}

pub fn run(action: TimerAction) -> Result<()> {
    let store = SessionStore::open()?;
    let (mut engine, dirty) = load_engine(&store)?;

    match action {
        TimerAction::Start => engine.start(),
        TimerAction::Pause => engine.pause(),
        TimerAction::Toggle => engine.toggle(),
        TimerAction::Skip => engine.skip(),
        TimerAction::Rewind => engine.rewind(),
        TimerAction::Reset => engine.reset(),
        TimerAction::Lunch => engine.start_lunch(),
        TimerAction::Status => {}
        TimerAction::Run { seconds } => run_foreground(&store, &mut engine, &dirty, seconds)?,
    }

    save_engine(&store, &engine)?;
    println!("{}", serde_json::to_string_pretty(engine.state())?);
    Ok(())
}

/// The one-second drivers: the idle tick runs unconditionally, the
/// session tick only while running. State is persisted every second so
/// the session survives being killed mid-run.
fn run_foreground(
    store: &SessionStore,
    engine: &mut SessionEngine,
    dirty: &Rc<Cell<bool>>,
    seconds: Option<u64>,
) -> Result<()> {
    engine.start();
    render(engine);

    let mut elapsed = 0u64;
    loop {
        if seconds.is_some_and(|limit| elapsed >= limit) {
            break;
        }
        std::thread::sleep(Duration::from_secs(1));
        engine.on_idle_tick();
        if engine.state().running {
            engine.on_tick();
        }
        elapsed += 1;
        save_engine(store, engine)?;
        if dirty.replace(false) {
            render(engine);
        }
        if engine.state().finished {
            break;
        }
    }
    eprintln!();
    Ok(())
}

fn render(engine: &SessionEngine) {
    let s = engine.state();
    if s.finished {
        eprint!("\r[done ] unit {}/{}                    ", s.session_goal, s.session_goal);
        return;
    }
    if s.microbreak_active {
        eprint!(
            "\r[micro] {}   unit {}/{}                ",
            format_mmss(s.microbreak_remaining),
            engine.current_unit(),
            s.session_goal,
        );
        return;
    }
    let label = match s.mode {
        Mode::Focus => "focus",
        Mode::Break => "break",
        Mode::Lunch => "lunch",
    };
    let progress = engine.focus_progress();
    eprint!(
        "\r[{label}] {}   unit {}/{}   {}/{} ({}%)   ",
        format_mmss(s.remaining),
        engine.current_unit(),
        s.session_goal,
        format_hm(progress.done_sec),
        format_hm(progress.total_sec),
        progress.percent,
    );
}
