//! Process lifecycle states

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scheduling status of a simulated process
///
/// A process starts `Ready`, moves between `Ready`, `Running` and `Sleep`
/// while it has work left, and ends in `Done`. `Done` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessStatus {
    /// Waiting in the ready queue
    Ready,
    /// Holding the CPU
    Running,
    /// Blocked on simulated I/O
    Sleep,
    /// Finished; never transitions again
    Done,
}

impl ProcessStatus {
    /// Checks if the process can never run again
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessStatus::Done)
    }

    /// Checks if the dispatcher may pick this process
    pub fn is_dispatchable(&self) -> bool {
        matches!(self, ProcessStatus::Ready)
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessStatus::Ready => write!(f, "READY"),
            ProcessStatus::Running => write!(f, "RUNNING"),
            ProcessStatus::Sleep => write!(f, "SLEEP"),
            ProcessStatus::Done => write!(f, "DONE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(ProcessStatus::Done.is_terminal());
        assert!(!ProcessStatus::Ready.is_terminal());
        assert!(!ProcessStatus::Running.is_terminal());
        assert!(!ProcessStatus::Sleep.is_terminal());
    }

    #[test]
    fn test_only_ready_is_dispatchable() {
        assert!(ProcessStatus::Ready.is_dispatchable());
        assert!(!ProcessStatus::Running.is_dispatchable());
        assert!(!ProcessStatus::Sleep.is_dispatchable());
        assert!(!ProcessStatus::Done.is_dispatchable());
    }

    #[test]
    fn test_display() {
        assert_eq!(ProcessStatus::Sleep.to_string(), "SLEEP");
    }
}
