//! Process Control Block table
//!
//! The table is the only shared mutable state of the simulation. It is
//! owned by the kernel controller; everybody else gets `&PcbTable`.
//! All transitions go through crate-private methods that keep `Done`
//! absorbing.

use core_types::{ActorId, Pid, ProcessStatus};
use serde::{Deserialize, Serialize};

/// Scheduling record of one simulated process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pcb {
    pid: Pid,
    handle: ActorId,
    status: ProcessStatus,
    remaining_quantum: u32,
    remaining_burst: u32,
    initial_burst: u32,
    io_wait_remaining: u32,
    total_ready_wait: u64,
    completed_at: Option<u64>,
}

impl Pcb {
    /// Creates a READY process with `burst` ticks of work
    pub fn new(pid: Pid, handle: ActorId, burst: u32) -> Self {
        Self {
            pid,
            handle,
            status: ProcessStatus::Ready,
            remaining_quantum: 0,
            remaining_burst: burst,
            initial_burst: burst,
            io_wait_remaining: 0,
            total_ready_wait: 0,
            completed_at: None,
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Handle of the workload actor behind this process
    pub fn handle(&self) -> ActorId {
        self.handle
    }

    pub fn status(&self) -> ProcessStatus {
        self.status
    }

    pub fn remaining_quantum(&self) -> u32 {
        self.remaining_quantum
    }

    /// Ticks of CPU work left; authoritative for termination
    pub fn remaining_burst(&self) -> u32 {
        self.remaining_burst
    }

    pub fn initial_burst(&self) -> u32 {
        self.initial_burst
    }

    /// Ticks left in the current I/O block (meaningful only while SLEEP)
    pub fn io_wait_remaining(&self) -> u32 {
        self.io_wait_remaining
    }

    /// Ticks spent in READY so far
    pub fn total_ready_wait(&self) -> u64 {
        self.total_ready_wait
    }

    /// Tick at which the process became DONE
    pub fn completed_at(&self) -> Option<u64> {
        self.completed_at
    }

    pub(crate) fn mark_running(&mut self, quantum: u32) {
        if self.status.is_terminal() {
            return;
        }
        self.status = ProcessStatus::Running;
        self.remaining_quantum = quantum;
    }

    pub(crate) fn mark_ready(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        self.status = ProcessStatus::Ready;
    }

    pub(crate) fn mark_sleep(&mut self, io_wait: u32) {
        if self.status.is_terminal() {
            return;
        }
        self.status = ProcessStatus::Sleep;
        self.io_wait_remaining = io_wait;
    }

    /// Returns false if the process was already DONE
    pub(crate) fn mark_done(&mut self, tick: u64) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = ProcessStatus::Done;
        self.completed_at = Some(tick);
        true
    }

    /// Charges one tick of CPU time to a RUNNING process
    pub(crate) fn charge_tick(&mut self) {
        if self.status != ProcessStatus::Running {
            return;
        }
        self.remaining_quantum = self.remaining_quantum.saturating_sub(1);
        self.remaining_burst = self.remaining_burst.saturating_sub(1);
    }

    /// Counts down an I/O block; returns true when the process woke up
    pub(crate) fn tick_io(&mut self) -> bool {
        if self.status != ProcessStatus::Sleep {
            return false;
        }
        self.io_wait_remaining = self.io_wait_remaining.saturating_sub(1);
        if self.io_wait_remaining == 0 {
            self.status = ProcessStatus::Ready;
            return true;
        }
        false
    }

    pub(crate) fn accrue_ready_wait(&mut self) {
        if self.status == ProcessStatus::Ready {
            self.total_ready_wait += 1;
        }
    }
}

/// All PCBs of a simulation, indexed by [`Pid`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcbTable {
    pcbs: Vec<Pcb>,
}

impl PcbTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self { pcbs: Vec::new() }
    }

    /// Appends a process; its pid must equal the current length
    pub(crate) fn push(&mut self, pcb: Pcb) {
        debug_assert_eq!(pcb.pid().index(), self.pcbs.len());
        self.pcbs.push(pcb);
    }

    pub fn len(&self) -> usize {
        self.pcbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pcbs.is_empty()
    }

    pub fn get(&self, pid: Pid) -> Option<&Pcb> {
        self.pcbs.get(pid.index())
    }

    pub(crate) fn get_mut(&mut self, pid: Pid) -> Option<&mut Pcb> {
        self.pcbs.get_mut(pid.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pcb> {
        self.pcbs.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Pcb> {
        self.pcbs.iter_mut()
    }

    /// Maps an actor handle back to its process
    pub fn find_by_handle(&self, handle: ActorId) -> Option<Pid> {
        self.pcbs
            .iter()
            .find(|pcb| pcb.handle == handle)
            .map(|pcb| pcb.pid)
    }

    /// Number of processes currently in `status`
    pub fn count(&self, status: ProcessStatus) -> usize {
        self.pcbs.iter().filter(|pcb| pcb.status == status).count()
    }

    /// Checks if every process reached DONE
    pub fn all_done(&self) -> bool {
        !self.pcbs.is_empty() && self.pcbs.iter().all(|pcb| pcb.status.is_terminal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(bursts: &[u32]) -> PcbTable {
        let mut table = PcbTable::new();
        for (index, &burst) in bursts.iter().enumerate() {
            table.push(Pcb::new(Pid::new(index), ActorId::new(), burst));
        }
        table
    }

    #[test]
    fn test_new_pcb_is_ready() {
        let pcb = Pcb::new(Pid::new(0), ActorId::new(), 4);
        assert_eq!(pcb.status(), ProcessStatus::Ready);
        assert_eq!(pcb.remaining_burst(), 4);
        assert_eq!(pcb.initial_burst(), 4);
        assert_eq!(pcb.total_ready_wait(), 0);
        assert_eq!(pcb.completed_at(), None);
    }

    #[test]
    fn test_charge_tick_only_while_running() {
        let mut pcb = Pcb::new(Pid::new(0), ActorId::new(), 4);
        pcb.charge_tick();
        assert_eq!(pcb.remaining_burst(), 4);

        pcb.mark_running(2);
        pcb.charge_tick();
        assert_eq!(pcb.remaining_quantum(), 1);
        assert_eq!(pcb.remaining_burst(), 3);
        assert_eq!(pcb.initial_burst(), 4);
    }

    #[test]
    fn test_io_countdown_wakes_process() {
        let mut pcb = Pcb::new(Pid::new(0), ActorId::new(), 4);
        pcb.mark_running(5);
        pcb.mark_sleep(2);
        assert!(!pcb.tick_io());
        assert_eq!(pcb.status(), ProcessStatus::Sleep);
        assert!(pcb.tick_io());
        assert_eq!(pcb.status(), ProcessStatus::Ready);
        assert!(!pcb.tick_io());
    }

    #[test]
    fn test_ready_wait_accrues_only_when_ready() {
        let mut pcb = Pcb::new(Pid::new(0), ActorId::new(), 4);
        pcb.accrue_ready_wait();
        pcb.mark_running(5);
        pcb.accrue_ready_wait();
        pcb.mark_sleep(1);
        pcb.accrue_ready_wait();
        assert_eq!(pcb.total_ready_wait(), 1);
    }

    #[test]
    fn test_done_is_absorbing() {
        let mut pcb = Pcb::new(Pid::new(0), ActorId::new(), 4);
        assert!(pcb.mark_done(3));
        assert!(!pcb.mark_done(9));
        assert_eq!(pcb.completed_at(), Some(3));

        pcb.mark_ready();
        pcb.mark_running(5);
        pcb.mark_sleep(2);
        assert_eq!(pcb.status(), ProcessStatus::Done);
    }

    #[test]
    fn test_find_by_handle() {
        let table = table(&[1, 2, 3]);
        let handle = table.get(Pid::new(2)).unwrap().handle();
        assert_eq!(table.find_by_handle(handle), Some(Pid::new(2)));
        assert_eq!(table.find_by_handle(ActorId::new()), None);
    }

    #[test]
    fn test_all_done() {
        let mut table = table(&[1, 1]);
        assert!(!table.all_done());
        table.get_mut(Pid::new(0)).unwrap().mark_done(1);
        assert!(!table.all_done());
        table.get_mut(Pid::new(1)).unwrap().mark_done(2);
        assert!(table.all_done());
        assert_eq!(table.count(ProcessStatus::Done), 2);
    }

    #[test]
    fn test_empty_table_is_not_done() {
        assert!(!PcbTable::new().all_done());
    }
}
