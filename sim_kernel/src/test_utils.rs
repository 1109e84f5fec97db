//! Test utilities for scheduling tests
//!
//! This module provides a workload port that only records what the kernel
//! asked for, plus helpers to build deterministic kernels.

use crate::config::SchedulerConfig;
use crate::port::{PortError, WorkloadPort};
use crate::scheduler::{Kernel, ScheduleEvent};
use core_types::{ActorId, Pid};
use ipc::{event_channel, ActorCommand, EventInbox, EventSender, KernelEvent};
use std::collections::HashSet;

/// Workload port that records commands instead of running actors
///
/// A `Terminate` command is answered with the exit notification a real
/// actor would produce. Commands to terminated actors fail with
/// [`PortError::ActorExited`], like they would against a real port.
#[derive(Debug)]
pub struct RecordingPort {
    events: EventSender,
    actors: Vec<(Pid, ActorId)>,
    exited: HashSet<ActorId>,
    commands: Vec<(ActorId, ActorCommand)>,
    shut_down: bool,
}

impl RecordingPort {
    pub fn new(events: EventSender) -> Self {
        Self {
            events,
            actors: Vec::new(),
            exited: HashSet::new(),
            commands: Vec::new(),
            shut_down: false,
        }
    }

    /// Every delivered command, in order
    pub fn commands(&self) -> &[(ActorId, ActorCommand)] {
        &self.commands
    }

    /// Commands delivered to one actor, in order
    pub fn commands_for(&self, actor: ActorId) -> Vec<ActorCommand> {
        self.commands
            .iter()
            .filter(|(target, _)| *target == actor)
            .map(|(_, command)| *command)
            .collect()
    }

    /// Actor spawned for `pid`
    pub fn actor_of(&self, pid: Pid) -> Option<ActorId> {
        self.actors
            .iter()
            .find(|(spawned, _)| *spawned == pid)
            .map(|(_, actor)| *actor)
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl WorkloadPort for RecordingPort {
    fn spawn(&mut self, pid: Pid) -> Result<ActorId, PortError> {
        let actor = ActorId::new();
        self.actors.push((pid, actor));
        Ok(actor)
    }

    fn send(&mut self, actor: ActorId, command: ActorCommand) -> Result<(), PortError> {
        if !self.actors.iter().any(|(_, known)| *known == actor) {
            return Err(PortError::UnknownActor(actor));
        }
        if self.exited.contains(&actor) {
            return Err(PortError::ActorExited(actor));
        }
        self.commands.push((actor, command));
        if command == ActorCommand::Terminate {
            self.exited.insert(actor);
            let _ = self.events.send(KernelEvent::Exited { actor });
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        self.shut_down = true;
    }
}

/// Seeded configuration with fixed bursts and no random I/O
///
/// I/O waits are drawn from `1..=3`.
pub fn deterministic_config(bursts: &[u32], quantum: u32) -> SchedulerConfig {
    SchedulerConfig {
        process_count: bursts.len(),
        time_quantum: quantum,
        max_cpu_burst: bursts.iter().copied().max().unwrap_or(1).max(1),
        max_io_wait: 3,
        io_request_percent: 0,
        initial_bursts: Some(bursts.to_vec()),
        seed: Some(7),
        tick_interval_ms: 0,
        max_ticks: Some(10_000),
    }
}

/// Creates and starts a kernel on a [`RecordingPort`]
///
/// # Panics
///
/// Panics if the configuration is invalid.
pub fn recording_kernel(config: SchedulerConfig) -> (Kernel<RecordingPort>, EventInbox) {
    let (events, inbox) = event_channel();
    let mut kernel =
        Kernel::new(config, RecordingPort::new(events)).expect("invalid test configuration");
    kernel.start().expect("recording port never fails to spawn");
    (kernel, inbox)
}

/// Pids in the order they were dispatched
pub fn dispatch_sequence(log: &[ScheduleEvent]) -> Vec<Pid> {
    log.iter()
        .filter_map(|event| match event {
            ScheduleEvent::Dispatched { pid, .. } => Some(*pid),
            _ => None,
        })
        .collect()
}

/// Tick at which `pid` became DONE
pub fn termination_tick(log: &[ScheduleEvent], pid: Pid) -> Option<u64> {
    log.iter().find_map(|event| match event {
        ScheduleEvent::Terminated {
            pid: done,
            timestamp_ticks,
        } if *done == pid => Some(*timestamp_ticks),
        _ => None,
    })
}
