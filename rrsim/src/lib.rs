//! # Round-Robin Scheduler Simulator Host
//!
//! This crate provides the command-line host for the scheduler simulation.
//!
//! ## Philosophy
//!
//! - **Host owns I/O**: the kernel and actors only log; the host prints
//!   the report
//! - **Deterministic mode is first-class**: `--seed` with `--inline`
//!   reproduces a run exactly
//!
//! ## Responsibilities
//!
//! The host runtime:
//! - Parses flags and an optional JSON configuration
//! - Installs the console logger
//! - Chooses threaded or inline workload actors
//! - Renders the final report as text or JSON

pub mod options;
pub mod runtime;

pub use options::{parse_args, usage, HostOptions};
pub use runtime::{ActorMode, HostRuntime, HostRuntimeError, OutputFormat};
