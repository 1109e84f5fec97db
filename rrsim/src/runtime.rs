//! # Host Runtime
//!
//! Wires the kernel, the chosen workload port and the inbox together and
//! runs one simulation to completion.

use crate::options::HostOptions;
use ipc::event_channel;
use services_workload::{InlineWorkloads, ThreadedWorkloads};
use sim_kernel::{ConfigError, Kernel, KernelError, SimulationReport, WorkloadPort};
use thiserror::Error;

/// Host runtime error types
#[derive(Debug, Error)]
pub enum HostRuntimeError {
    #[error("{0}")]
    Usage(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where workload actors execute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorMode {
    /// One thread per actor
    Threaded,
    /// On the kernel thread
    Inline,
}

/// Report rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Host runtime
pub struct HostRuntime {
    options: HostOptions,
}

impl HostRuntime {
    /// Creates a runtime; the configuration is checked here
    pub fn new(options: HostOptions) -> Result<Self, HostRuntimeError> {
        options.config.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &HostOptions {
        &self.options
    }

    /// Runs the simulation until every process is DONE
    pub fn run(&self) -> Result<SimulationReport, HostRuntimeError> {
        let (events, inbox) = event_channel();
        let policy = self.options.config.workload_policy();
        let port: Box<dyn WorkloadPort> = match self.options.mode {
            ActorMode::Threaded => Box::new(ThreadedWorkloads::new(events, policy)),
            ActorMode::Inline => Box::new(InlineWorkloads::new(events, policy)),
        };

        let mut kernel = Kernel::new(self.options.config.clone(), port)?;
        Ok(kernel.run(&inbox)?)
    }

    /// Renders a report in the configured format
    pub fn render(&self, report: &SimulationReport) -> Result<String, HostRuntimeError> {
        match self.options.output {
            OutputFormat::Text => Ok(report.to_string()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        }
    }
}
