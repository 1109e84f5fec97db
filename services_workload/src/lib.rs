//! # Workload Service
//!
//! This crate implements the simulated processes the kernel schedules.
//!
//! ## Philosophy
//!
//! - **Driven, never free-running**: an actor does at most one unit of
//!   work per command and then blocks until the next one
//! - **No shared state**: actors never see the PCB table; they answer only
//!   through the kernel inbox
//! - **Kernel decides lifecycle**: actors never terminate themselves
//!
//! ## Ports
//!
//! - [`InlineWorkloads`]: actors applied on the kernel thread
//! - [`ThreadedWorkloads`]: one blocking thread per actor

pub mod actor;
pub mod inline;
pub mod threaded;

pub use actor::{ActorSignal, ActorState, TickOutcome, WorkloadActor};
pub use inline::InlineWorkloads;
pub use threaded::ThreadedWorkloads;
