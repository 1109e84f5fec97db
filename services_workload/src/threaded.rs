//! One OS thread per workload actor
//!
//! Each actor thread blocks on its command channel while dormant. After
//! reacting to a command it acknowledges it, and any event it raised is
//! already in the kernel inbox by then. The kernel waits for that
//! acknowledgement, so inbox order matches the inline port exactly.
//!
//! When an actor thread ends for any reason (terminate, shutdown, panic)
//! an exit notification is posted to the kernel inbox.

use crate::actor::{ActorSignal, WorkloadActor};
use core_types::{ActorId, Pid};
use ipc::{ActorCommand, EventSender, KernelEvent};
use log::{debug, warn};
use sim_kernel::{PortError, WorkloadPolicy, WorkloadPort};
use std::collections::{HashMap, HashSet};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

struct ActorThread {
    pid: Pid,
    commands: mpsc::Sender<ActorCommand>,
    acks: mpsc::Receiver<()>,
    handle: JoinHandle<()>,
}

/// Posts the exit notification when the actor thread unwinds or returns
struct ExitNotice {
    actor: ActorId,
    events: EventSender,
}

impl Drop for ExitNotice {
    fn drop(&mut self) {
        let _ = self.events.send(KernelEvent::Exited { actor: self.actor });
    }
}

/// Thread-per-actor workload port
pub struct ThreadedWorkloads {
    events: EventSender,
    policy: WorkloadPolicy,
    actors: HashMap<ActorId, ActorThread>,
    exited: HashSet<ActorId>,
}

impl ThreadedWorkloads {
    pub fn new(events: EventSender, policy: WorkloadPolicy) -> Self {
        Self {
            events,
            policy,
            actors: HashMap::new(),
            exited: HashSet::new(),
        }
    }

    /// Number of actor threads not yet joined
    pub fn live_actors(&self) -> usize {
        self.actors.len()
    }

    fn reap(&mut self, actor: ActorId) {
        if let Some(thread) = self.actors.remove(&actor) {
            drop(thread.commands);
            if thread.handle.join().is_err() {
                warn!("[{}] actor thread panicked", thread.pid);
            }
        }
        self.exited.insert(actor);
    }
}

impl WorkloadPort for ThreadedWorkloads {
    fn spawn(&mut self, pid: Pid) -> Result<ActorId, PortError> {
        let id = ActorId::new();
        let actor = WorkloadActor::on_create(pid, id, &self.policy);
        let (command_tx, command_rx) = mpsc::channel();
        let (ack_tx, ack_rx) = mpsc::channel();
        let events = self.events.clone();

        let handle = thread::Builder::new()
            .name(format!("workload-{}", pid))
            .spawn(move || actor_loop(actor, command_rx, ack_tx, events))
            .map_err(|e| PortError::SpawnFailed {
                pid,
                reason: e.to_string(),
            })?;

        self.actors.insert(
            id,
            ActorThread {
                pid,
                commands: command_tx,
                acks: ack_rx,
                handle,
            },
        );
        Ok(id)
    }

    fn send(&mut self, actor: ActorId, command: ActorCommand) -> Result<(), PortError> {
        if self.exited.contains(&actor) {
            return Err(PortError::ActorExited(actor));
        }
        let thread = self
            .actors
            .get(&actor)
            .ok_or(PortError::UnknownActor(actor))?;

        let delivered = thread.commands.send(command).is_ok() && thread.acks.recv().is_ok();
        if command == ActorCommand::Terminate || !delivered {
            self.reap(actor);
        }
        if delivered {
            Ok(())
        } else {
            Err(PortError::ActorExited(actor))
        }
    }

    fn shutdown(&mut self) {
        let remaining: Vec<ActorId> = self.actors.keys().copied().collect();
        for actor in remaining {
            self.reap(actor);
        }
    }
}

impl Drop for ThreadedWorkloads {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn actor_loop(
    mut actor: WorkloadActor,
    commands: mpsc::Receiver<ActorCommand>,
    acks: mpsc::Sender<()>,
    events: EventSender,
) {
    let id = actor.id();
    let notice = ExitNotice {
        actor: id,
        events: events.clone(),
    };

    while let Ok(command) = commands.recv() {
        match actor.apply(command) {
            Some(ActorSignal::IoRequest) => {
                if events.send(KernelEvent::IoRequest { actor: id }).is_err() {
                    break;
                }
            }
            Some(ActorSignal::Exited) => break,
            None => {}
        }
        if acks.send(()).is_err() {
            break;
        }
    }

    debug!("[{} actor] exiting", actor.pid());
    drop(commands);
    drop(notice);
    let _ = acks.send(());
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipc::event_channel;

    fn policy(io_request_percent: u8) -> WorkloadPolicy {
        WorkloadPolicy {
            max_cpu_burst: 10,
            io_request_percent,
            seed: Some(11),
        }
    }

    #[test]
    fn test_commands_are_acknowledged() {
        let (events, inbox) = event_channel();
        let mut port = ThreadedWorkloads::new(events, policy(0));
        let actor = port.spawn(Pid::new(0)).unwrap();

        port.send(actor, ActorCommand::Resume).unwrap();
        port.send(actor, ActorCommand::ConsumeTick).unwrap();
        port.send(actor, ActorCommand::Suspend).unwrap();
        assert_eq!(inbox.try_recv(), None);
        assert_eq!(port.live_actors(), 1);
    }

    #[test]
    fn test_io_request_queued_before_ack() {
        let (events, inbox) = event_channel();
        let mut port = ThreadedWorkloads::new(
            events,
            WorkloadPolicy {
                max_cpu_burst: 1_000,
                io_request_percent: 100,
                seed: Some(2),
            },
        );
        let actor = port.spawn(Pid::new(0)).unwrap();

        port.send(actor, ActorCommand::Resume).unwrap();
        port.send(actor, ActorCommand::ConsumeTick).unwrap();
        assert_eq!(inbox.try_recv(), Some(KernelEvent::IoRequest { actor }));
    }

    #[test]
    fn test_terminate_posts_exit_and_joins() {
        let (events, inbox) = event_channel();
        let mut port = ThreadedWorkloads::new(events, policy(0));
        let actor = port.spawn(Pid::new(3)).unwrap();

        port.send(actor, ActorCommand::Terminate).unwrap();
        assert_eq!(inbox.try_recv(), Some(KernelEvent::Exited { actor }));
        assert_eq!(port.live_actors(), 0);
        assert_eq!(
            port.send(actor, ActorCommand::Resume),
            Err(PortError::ActorExited(actor))
        );
    }

    #[test]
    fn test_shutdown_joins_everyone() {
        let (events, _inbox) = event_channel();
        let mut port = ThreadedWorkloads::new(events, policy(0));
        for index in 0..4 {
            port.spawn(Pid::new(index)).unwrap();
        }
        port.shutdown();
        assert_eq!(port.live_actors(), 0);
    }

    #[test]
    fn test_panicking_actor_reports_exit() {
        let (events, inbox) = event_channel();
        let mut port = ThreadedWorkloads::new(events.clone(), policy(0));
        let actor = ActorId::new();
        let (command_tx, command_rx) = mpsc::channel::<ActorCommand>();
        let (ack_tx, ack_rx) = mpsc::channel::<()>();
        let notice = ExitNotice { actor, events };

        let handle = thread::spawn(move || {
            let _notice = notice;
            let _acks = ack_tx;
            if command_rx.recv().is_ok() {
                panic!("workload crashed");
            }
        });
        port.actors.insert(
            actor,
            ActorThread {
                pid: Pid::new(0),
                commands: command_tx,
                acks: ack_rx,
                handle,
            },
        );

        assert_eq!(
            port.send(actor, ActorCommand::Resume),
            Err(PortError::ActorExited(actor))
        );
        assert_eq!(inbox.try_recv(), Some(KernelEvent::Exited { actor }));
        assert_eq!(port.live_actors(), 0);
        assert_eq!(
            port.send(actor, ActorCommand::ConsumeTick),
            Err(PortError::ActorExited(actor))
        );
    }
}
