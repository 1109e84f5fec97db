//! Event and command vocabulary

use core_types::ActorId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An event delivered to the kernel controller
///
/// These replace the asynchronous triggers of a signal-driven design
/// (timer interrupt, I/O trap, child-exit notification). All of them travel
/// through the same ordered inbox, so the kernel handles exactly one at a
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KernelEvent {
    /// One unit of simulated time elapsed
    Tick,
    /// The running actor asks to block on I/O
    IoRequest { actor: ActorId },
    /// The actor's execution unit is gone
    Exited { actor: ActorId },
}

impl KernelEvent {
    /// Returns the actor that raised this event, if any
    pub fn actor(&self) -> Option<ActorId> {
        match self {
            KernelEvent::Tick => None,
            KernelEvent::IoRequest { actor } | KernelEvent::Exited { actor } => Some(*actor),
        }
    }
}

impl fmt::Display for KernelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelEvent::Tick => write!(f, "Tick"),
            KernelEvent::IoRequest { actor } => write!(f, "IoRequest({})", actor),
            KernelEvent::Exited { actor } => write!(f, "Exited({})", actor),
        }
    }
}

/// A command sent from the kernel controller to one workload actor
///
/// An actor reacts to each command at most once and then blocks again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorCommand {
    /// Leave the dormant state; the process was dispatched
    Resume,
    /// Return to dormant; the process was preempted or blocked
    Suspend,
    /// Burn one CPU tick of work
    ConsumeTick,
    /// Stop for good; the kernel reclaimed the slot
    Terminate,
}

impl fmt::Display for ActorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorCommand::Resume => write!(f, "Resume"),
            ActorCommand::Suspend => write!(f, "Suspend"),
            ActorCommand::ConsumeTick => write!(f, "ConsumeTick"),
            ActorCommand::Terminate => write!(f, "Terminate"),
        }
    }
}
