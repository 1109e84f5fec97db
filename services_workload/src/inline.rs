//! Actors driven on the kernel's own thread
//!
//! Every command is applied synchronously and any resulting event is in
//! the inbox before `send` returns. This is the deterministic harness used
//! by tests and by `rrsim --inline`.

use crate::actor::{ActorSignal, WorkloadActor};
use core_types::{ActorId, Pid};
use ipc::{ActorCommand, EventSender, KernelEvent};
use log::warn;
use sim_kernel::{PortError, WorkloadPolicy, WorkloadPort};
use std::collections::HashMap;

/// Same-thread workload port
#[derive(Debug)]
pub struct InlineWorkloads {
    events: EventSender,
    policy: WorkloadPolicy,
    actors: HashMap<ActorId, WorkloadActor>,
}

impl InlineWorkloads {
    pub fn new(events: EventSender, policy: WorkloadPolicy) -> Self {
        Self {
            events,
            policy,
            actors: HashMap::new(),
        }
    }

    /// Inspects an actor, for tests and diagnostics
    pub fn actor(&self, id: ActorId) -> Option<&WorkloadActor> {
        self.actors.get(&id)
    }

    /// Number of actors that have not exited
    pub fn live_actors(&self) -> usize {
        self.actors.values().filter(|a| !a.is_exited()).count()
    }
}

impl WorkloadPort for InlineWorkloads {
    fn spawn(&mut self, pid: Pid) -> Result<ActorId, PortError> {
        let id = ActorId::new();
        self.actors
            .insert(id, WorkloadActor::on_create(pid, id, &self.policy));
        Ok(id)
    }

    fn send(&mut self, actor: ActorId, command: ActorCommand) -> Result<(), PortError> {
        let target = self
            .actors
            .get_mut(&actor)
            .ok_or(PortError::UnknownActor(actor))?;
        if target.is_exited() {
            return Err(PortError::ActorExited(actor));
        }

        let event = match target.apply(command) {
            Some(ActorSignal::IoRequest) => KernelEvent::IoRequest { actor },
            Some(ActorSignal::Exited) => KernelEvent::Exited { actor },
            None => return Ok(()),
        };
        if self.events.send(event).is_err() {
            warn!("[{}] kernel inbox closed, {} lost", target.pid(), event);
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        for actor in self.actors.values_mut() {
            actor.on_terminate();
        }
    }
}
