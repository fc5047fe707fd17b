// headless.rs - Window-less run loop fed by a command schedule

use automaton::error::ChannelClosed;
use automaton::{RunSummary, SimulationEngine, command_channel};

use crate::cli::ScheduledCommand;

/// Runs up to `frames` frames, sending each scheduled command through the
/// channel just before its frame. Stops early on `quit`.
pub fn run(
    mut engine: SimulationEngine,
    frames: u64,
    schedule: &[ScheduledCommand],
) -> Result<RunSummary, ChannelClosed> {
    let (tx, mut rx) = command_channel();

    let mut schedule = schedule.to_vec();
    schedule.sort_by_key(|s| s.frame);
    let mut pending = schedule.into_iter().peekable();

    tracing::info!(
        frames,
        rule = engine.active_rule(),
        live = engine.grid().population(),
        "headless run starting"
    );

    for frame in 0..frames {
        while let Some(scheduled) = pending.next_if(|s| s.frame <= frame) {
            tx.send(scheduled.command)?;
        }

        let report = engine.frame(&mut rx, None);
        tracing::debug!(frame, generation = engine.generation(), ?report, "frame");

        if report.quit {
            break;
        }
    }

    Ok(engine.summary())
}
