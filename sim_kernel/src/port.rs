//! Kernel-side seam to the workload actors
//!
//! The kernel never touches an actor directly. It spawns actors and sends
//! them commands through a [`WorkloadPort`]; actors answer only by putting
//! events into the kernel inbox.
//!
//! Implementations must finish delivering a command (including any event
//! the actor emits in reaction) before `send` returns. That keeps the
//! inbox order identical whether actors run inline or on their own threads.

use core_types::{ActorId, Pid};
use ipc::ActorCommand;
use thiserror::Error;

/// Errors reported by a workload port
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    #[error("Unknown actor: {0}")]
    UnknownActor(ActorId),

    #[error("Actor already exited: {0}")]
    ActorExited(ActorId),

    #[error("Failed to spawn actor for {pid}: {reason}")]
    SpawnFailed { pid: Pid, reason: String },
}

/// Command delivery to workload actors
pub trait WorkloadPort {
    /// Creates the actor behind `pid`; it starts dormant
    fn spawn(&mut self, pid: Pid) -> Result<ActorId, PortError>;

    /// Delivers one command and waits until the actor reacted
    fn send(&mut self, actor: ActorId, command: ActorCommand) -> Result<(), PortError>;

    /// Stops every remaining actor
    fn shutdown(&mut self);
}

impl<P: WorkloadPort + ?Sized> WorkloadPort for Box<P> {
    fn spawn(&mut self, pid: Pid) -> Result<ActorId, PortError> {
        (**self).spawn(pid)
    }

    fn send(&mut self, actor: ActorId, command: ActorCommand) -> Result<(), PortError> {
        (**self).send(actor, command)
    }

    fn shutdown(&mut self) {
        (**self).shutdown()
    }
}
