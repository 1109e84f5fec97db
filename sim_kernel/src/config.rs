//! Simulation configuration
//!
//! All knobs are fixed before the kernel starts. A configuration that
//! fails [`SchedulerConfig::validate`] never produces a running kernel.

use core_types::Pid;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors (fatal at startup)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("process_count must be at least 1")]
    ZeroProcesses,

    #[error("time_quantum must be at least 1 tick")]
    ZeroQuantum,

    #[error("max_cpu_burst must be at least 1 tick")]
    ZeroCpuBurst,

    #[error("max_io_wait must be at least 1 tick")]
    ZeroIoWait,

    #[error("io_request_percent must be within 0..=100, got {0}")]
    IoPercentOutOfRange(u8),

    #[error("initial_bursts has {actual} entries, expected {expected}")]
    BurstCountMismatch { expected: usize, actual: usize },

    #[error("initial burst for {pid} must be at least 1 tick")]
    ZeroBurst { pid: Pid },

    #[error("Invalid configuration: {0}")]
    Parse(String),
}

/// Scheduler configuration
///
/// Defaults reproduce the reference setup: ten processes, a five tick
/// quantum, bursts in 1..=10, I/O waits in 1..=5 and a 20% chance that a
/// workload requests I/O after consuming a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Number of simulated processes (N)
    pub process_count: usize,
    /// Ticks per dispatch before forced preemption
    pub time_quantum: u32,
    /// Inclusive upper bound for random initial bursts (lower bound 1)
    pub max_cpu_burst: u32,
    /// Inclusive upper bound for random I/O waits (lower bound 1)
    pub max_io_wait: u32,
    /// Chance, in percent, that a workload requests I/O after a tick
    pub io_request_percent: u8,
    /// Explicit per-process bursts; replaces the random draw when set
    pub initial_bursts: Option<Vec<u32>>,
    /// Seed for every random draw; entropy when absent
    pub seed: Option<u64>,
    /// Wall-clock delay between ticks
    pub tick_interval_ms: u64,
    /// Abort the run loop once this many ticks elapsed
    pub max_ticks: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            process_count: 10,
            time_quantum: 5,
            max_cpu_burst: 10,
            max_io_wait: 5,
            io_request_percent: 20,
            initial_bursts: None,
            seed: None,
            tick_interval_ms: 0,
            max_ticks: None,
        }
    }
}

impl SchedulerConfig {
    /// Parses a configuration from JSON; missing fields take defaults
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Checks every startup constraint
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.process_count == 0 {
            return Err(ConfigError::ZeroProcesses);
        }
        if self.time_quantum == 0 {
            return Err(ConfigError::ZeroQuantum);
        }
        if self.max_cpu_burst == 0 {
            return Err(ConfigError::ZeroCpuBurst);
        }
        if self.max_io_wait == 0 {
            return Err(ConfigError::ZeroIoWait);
        }
        if self.io_request_percent > 100 {
            return Err(ConfigError::IoPercentOutOfRange(self.io_request_percent));
        }
        if let Some(bursts) = &self.initial_bursts {
            if bursts.len() != self.process_count {
                return Err(ConfigError::BurstCountMismatch {
                    expected: self.process_count,
                    actual: bursts.len(),
                });
            }
            if let Some(index) = bursts.iter().position(|&burst| burst == 0) {
                return Err(ConfigError::ZeroBurst {
                    pid: Pid::new(index),
                });
            }
        }
        Ok(())
    }

    /// Returns the delay between two ticks
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Returns the parameters handed to workload actors
    pub fn workload_policy(&self) -> WorkloadPolicy {
        WorkloadPolicy {
            max_cpu_burst: self.max_cpu_burst,
            io_request_percent: self.io_request_percent,
            seed: self.seed,
        }
    }
}

/// Parameters for the application-side workload model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadPolicy {
    /// Upper bound of the actor's own burst estimate
    pub max_cpu_burst: u32,
    /// Chance, in percent, of an I/O request per consumed tick
    pub io_request_percent: u8,
    /// Base seed; each actor derives its own from it
    pub seed: Option<u64>,
}

impl WorkloadPolicy {
    /// Seed for the actor behind `pid`, if the run is seeded
    pub fn actor_seed(&self, pid: Pid) -> Option<u64> {
        self.seed
            .map(|seed| seed ^ (pid.index() as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}

impl Default for WorkloadPolicy {
    fn default() -> Self {
        SchedulerConfig::default().workload_policy()
    }
}
