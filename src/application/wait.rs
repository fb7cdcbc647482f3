//! Deploy-wait timer

use std::time::Duration;

use crate::config::WaitConfig;
use crate::domain::ports::{DeployEvent, DeployEventSink, Sleeper};

/// Block for `wait.seconds` in `wait.interval_seconds` chunks, announcing the
/// remaining time before each chunk. Returns the total time slept.
pub fn wait_for_deploy(
    wait: &WaitConfig,
    sleeper: &dyn Sleeper,
    events: &dyn DeployEventSink,
) -> Duration {
    let total = Duration::from_secs(wait.seconds);
    if total.is_zero() {
        return Duration::ZERO;
    }
    // Validation rejects a zero interval with a non-zero total; sleep in one
    // chunk anyway if it slips through.
    let step = match wait.interval_seconds {
        0 => total,
        secs => Duration::from_secs(secs),
    };

    events.on_event(DeployEvent::info(format!(
        "Waiting {}s for the auto-deploy to finish",
        wait.seconds
    )));

    let mut remaining = total;
    while !remaining.is_zero() {
        events.on_event(DeployEvent::Countdown { remaining });
        let chunk = step.min(remaining);
        sleeper.sleep(chunk);
        remaining -= chunk;
    }

    events.on_event(DeployEvent::ok("Wait finished"));
    total
}
