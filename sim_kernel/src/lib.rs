//! # Simulated Kernel
//!
//! This crate provides the kernel side of a preemptive round-robin CPU
//! scheduler simulation.
//!
//! ## Purpose
//!
//! One kernel controller multiplexes the CPU across a fixed set of
//! simulated processes:
//! - Timer-driven preemption after a fixed quantum
//! - I/O-induced blocking with random wait times
//! - Termination once a process's CPU burst is used up
//!
//! ## Philosophy
//!
//! **Testability is a first-class design constraint.**
//!
//! Time only moves when a tick is delivered, randomness can be seeded,
//! and every scheduling decision lands in an audit trail. The kernel talks
//! to workloads only through the [`port::WorkloadPort`] seam, so tests can
//! replace real actors with a recorder.

pub mod config;
pub mod dispatcher;
pub mod pcb;
pub mod port;
pub mod report;
pub mod scheduler;
pub mod test_utils;
pub mod timer;

pub use config::{ConfigError, SchedulerConfig, WorkloadPolicy};
pub use dispatcher::Dispatcher;
pub use pcb::{Pcb, PcbTable};
pub use port::{PortError, WorkloadPort};
pub use report::{ProcessReport, SimulationReport};
pub use scheduler::{Kernel, KernelState, ScheduleEvent};
pub use timer::TickTimer;

use ipc::ChannelClosed;
use thiserror::Error;

/// Errors that stop the kernel run loop
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Workload port error: {0}")]
    Port(#[from] PortError),

    #[error("Kernel inbox closed: {0}")]
    InboxClosed(#[from] ChannelClosed),

    #[error("Tick limit of {0} exceeded before all processes finished")]
    TickLimitExceeded(u64),
}
