use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::info;

use super::{refresh, ClientTable, RefreshStatus};
use crate::controller::Session;

/// Granularity of the interrupt check while waiting for the next cycle
const WAIT_SLICE: Duration = Duration::from_millis(100);

/// Refreshes immediately, then every `interval`, until `interrupted` is set.
/// `on_cycle` receives the table and status after each refresh. Returns the
/// number of completed cycles.
pub fn run_refresh_loop<F>(
    session: &mut Session,
    table: &mut ClientTable,
    interval: Duration,
    interrupted: &AtomicBool,
    mut on_cycle: F,
) -> usize
where
    F: FnMut(&ClientTable, &RefreshStatus),
{
    info!("Starting refresh loop (interval: {:.1}s)", interval.as_secs_f64());
    let mut cycles = 0;

    while !interrupted.load(Ordering::SeqCst) {
        let cycle_start = Instant::now();

        let status = refresh(session, table);
        cycles += 1;
        on_cycle(table, &status);

        // Sleep for what is left of the interval, waking up to check for interrupts
        while let Some(remaining) = interval.checked_sub(cycle_start.elapsed()) {
            if interrupted.load(Ordering::SeqCst) || remaining.is_zero() {
                break;
            }
            std::thread::sleep(remaining.min(WAIT_SLICE));
        }
    }

    info!("Refresh loop stopped after {} cycle(s)", cycles);
    cycles
}
