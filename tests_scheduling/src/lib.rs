//! Scheduling Test Utilities
//!
//! This crate provides shared utilities for end-to-end scheduling tests.
//!
//! ## Test Philosophy
//!
//! - **Real actors where it matters**: liveness and invariant checks run
//!   against [`InlineWorkloads`], so I/O requests come from actual workloads
//! - **Deterministic**: every run is seeded and reproducible
//! - **Observe every tick**: invariants are checked after each tick, not
//!   only on the final report

use core_types::{Pid, ProcessStatus};
use ipc::{event_channel, EventInbox};
use services_workload::InlineWorkloads;
use sim_kernel::{Kernel, SchedulerConfig};

/// Seeded configuration with real workloads
pub fn workload_config(process_count: usize, io_request_percent: u8, seed: u64) -> SchedulerConfig {
    SchedulerConfig {
        process_count,
        io_request_percent,
        seed: Some(seed),
        max_ticks: Some(100_000),
        ..SchedulerConfig::default()
    }
}

/// Creates and starts a kernel driving inline workload actors
///
/// # Panics
///
/// Panics if the configuration is invalid.
pub fn inline_kernel(config: SchedulerConfig) -> (Kernel<InlineWorkloads>, EventInbox) {
    let (events, inbox) = event_channel();
    let port = InlineWorkloads::new(events, config.workload_policy());
    let mut kernel = Kernel::new(config, port).expect("invalid test configuration");
    kernel.start().expect("inline port never fails to spawn");
    (kernel, inbox)
}

/// Status of every process, by pid order
pub fn statuses<P: sim_kernel::WorkloadPort>(kernel: &Kernel<P>) -> Vec<ProcessStatus> {
    kernel.table().iter().map(|pcb| pcb.status()).collect()
}

/// Ready wait of every process, by pid order
pub fn ready_waits<P: sim_kernel::WorkloadPort>(kernel: &Kernel<P>) -> Vec<u64> {
    kernel.table().iter().map(|pcb| pcb.total_ready_wait()).collect()
}

/// Steps the kernel tick by tick until it finishes, calling `observe`
/// after every tick
///
/// Returns the number of ticks taken.
///
/// # Panics
///
/// Panics if the kernel is still running after `limit` ticks.
pub fn run_observed<P, F>(
    kernel: &mut Kernel<P>,
    inbox: &EventInbox,
    limit: u64,
    mut observe: F,
) -> u64
where
    P: sim_kernel::WorkloadPort,
    F: FnMut(&Kernel<P>),
{
    kernel.drain(inbox);
    while !kernel.is_finished() {
        assert!(
            kernel.current_ticks() < limit,
            "still running after {} ticks",
            limit
        );
        kernel.step(inbox);
        observe(kernel);
    }
    kernel.current_ticks()
}

/// Pids currently RUNNING
pub fn running<P: sim_kernel::WorkloadPort>(kernel: &Kernel<P>) -> Vec<Pid> {
    kernel
        .table()
        .iter()
        .filter(|pcb| pcb.status() == ProcessStatus::Running)
        .map(|pcb| pcb.pid())
        .collect()
}
