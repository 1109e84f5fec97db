//! # Core Types
//!
//! This crate defines the fundamental types shared by the scheduler
//! simulation.
//!
//! ## Philosophy
//!
//! - **Typed identities**: a process index and an actor handle are distinct
//!   types and cannot be confused.
//! - **Explicit lifecycle**: process states are a closed enum, not integers.
//!
//! ## Key Types
//!
//! - [`Pid`]: Stable table index of a simulated process
//! - [`ActorId`]: Opaque handle to the workload actor behind a process
//! - [`ProcessStatus`]: READY / RUNNING / SLEEP / DONE

pub mod ids;
pub mod process;

pub use ids::{ActorId, Pid};
pub use process::ProcessStatus;
