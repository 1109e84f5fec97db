//! Simulation report
//!
//! Pure aggregation over the final PCB table. All processes arrive at
//! tick 0, so a process's turnaround equals the tick it became DONE.

use crate::pcb::PcbTable;
use core_types::Pid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Final numbers for one process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessReport {
    pub pid: Pid,
    pub initial_burst: u32,
    pub total_ready_wait: u64,
    /// Tick at which the process became DONE
    pub completed_at: Option<u64>,
}

/// Aggregated outcome of a finished simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub total_ticks: u64,
    pub processes: Vec<ProcessReport>,
    /// Mean of `total_ready_wait` over all processes
    pub average_ready_wait: f64,
    /// Mean completion tick over processes that completed
    pub average_turnaround: f64,
}

impl SimulationReport {
    /// Builds the report from the table as it stands
    pub fn from_table(table: &PcbTable, total_ticks: u64) -> Self {
        let processes: Vec<ProcessReport> = table
            .iter()
            .map(|pcb| ProcessReport {
                pid: pcb.pid(),
                initial_burst: pcb.initial_burst(),
                total_ready_wait: pcb.total_ready_wait(),
                completed_at: pcb.completed_at(),
            })
            .collect();

        let average_ready_wait = mean(processes.iter().map(|p| p.total_ready_wait));
        let average_turnaround = mean(processes.iter().filter_map(|p| p.completed_at));

        Self {
            total_ticks,
            processes,
            average_ready_wait,
            average_turnaround,
        }
    }

    pub fn process(&self, pid: Pid) -> Option<&ProcessReport> {
        self.processes.iter().find(|p| p.pid == pid)
    }
}

fn mean(values: impl Iterator<Item = u64>) -> f64 {
    let (sum, count) = values.fold((0u64, 0u64), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=================================================")?;
        writeln!(f, "   Round-robin scheduler simulation finished")?;
        writeln!(f, "=================================================")?;
        writeln!(f, "Total simulated time: {} ticks", self.total_ticks)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<6} {:>13} {:>16} {:>12}",
            "PID", "Initial burst", "Ready wait", "Completed"
        )?;
        for p in &self.processes {
            let completed = p
                .completed_at
                .map_or_else(|| "-".to_string(), |tick| tick.to_string());
            writeln!(
                f,
                "{:<6} {:>13} {:>16} {:>12}",
                p.pid.to_string(),
                p.initial_burst,
                p.total_ready_wait,
                completed
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Average ready wait: {:.2} ticks", self.average_ready_wait)?;
        write!(f, "Average turnaround: {:.2} ticks", self.average_turnaround)
    }
}
