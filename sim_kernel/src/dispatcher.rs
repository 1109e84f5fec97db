//! Round-robin dispatcher
//!
//! Pure selection logic. The scan starts right after the last process
//! that held the CPU, so the starting point rotates and no process is
//! perpetually favored. The caller performs the actual transition.

use crate::pcb::PcbTable;
use core_types::Pid;

/// Round-robin selection over a [`PcbTable`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher;

impl Dispatcher {
    /// Picks the next READY process
    ///
    /// Scans circularly from `(last_running + 1) mod N`; with no anchor the
    /// scan starts at index 0. Returns `None` when nothing is READY, which
    /// is a legitimate idle tick rather than an error.
    pub fn select_next(table: &PcbTable, last_running: Option<Pid>) -> Option<Pid> {
        let count = table.len();
        if count == 0 {
            return None;
        }
        let start = last_running.map_or(0, |pid| (pid.index() + 1) % count);

        (0..count)
            .map(|offset| Pid::new((start + offset) % count))
            .find(|&pid| {
                table
                    .get(pid)
                    .is_some_and(|pcb| pcb.status().is_dispatchable())
            })
    }
}
