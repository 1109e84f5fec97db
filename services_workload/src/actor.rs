//! Workload actor state machine
//!
//! Models the application side of one simulated process. The actor keeps
//! its own burst estimate purely for narration; the kernel's PCB burst is
//! what decides termination. The two counters may disagree, and an actor
//! that believes it is finished simply waits to be torn down.

use core_types::{ActorId, Pid};
use ipc::ActorCommand;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sim_kernel::WorkloadPolicy;

/// Execution state of an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorState {
    /// Blocked, waiting to be resumed
    Dormant,
    /// Dispatched; reacts to tick commands
    Active,
    /// Terminated by the kernel
    Exited,
}

/// What the actor tells the kernel after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorSignal {
    /// Block me on I/O
    IoRequest,
    /// My execution unit is gone
    Exited,
}

/// Result of one consumed tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The actor was not active; nothing happened
    Ignored,
    /// Work continues
    Continue { remaining: u32 },
    /// The actor asked for I/O and went dormant
    IoRequested { remaining: u32 },
    /// Local estimate is used up; waiting for the kernel to reclaim us
    AwaitingTeardown,
}

/// Application-level behavior of one simulated process
#[derive(Debug)]
pub struct WorkloadActor {
    pid: Pid,
    id: ActorId,
    state: ActorState,
    burst_estimate: u32,
    io_request_percent: u8,
    rng: StdRng,
}

impl WorkloadActor {
    /// One-time initialization
    ///
    /// Draws the local burst estimate from `1..=max_cpu_burst` and starts
    /// dormant.
    pub fn on_create(pid: Pid, id: ActorId, policy: &WorkloadPolicy) -> Self {
        let mut rng = match policy.actor_seed(pid) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let estimate = rng.gen_range(1..=policy.max_cpu_burst.max(1));
        debug!("[{} actor] initial burst estimate {}, dormant", pid, estimate);
        Self::with_estimate(pid, id, estimate, policy.io_request_percent, rng)
    }

    /// Creates a dormant actor with a known estimate
    pub fn with_estimate(
        pid: Pid,
        id: ActorId,
        burst_estimate: u32,
        io_request_percent: u8,
        rng: StdRng,
    ) -> Self {
        Self {
            pid,
            id,
            state: ActorState::Dormant,
            burst_estimate,
            io_request_percent,
            rng,
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn state(&self) -> ActorState {
        self.state
    }

    /// Local, non-authoritative burst estimate
    pub fn burst_estimate(&self) -> u32 {
        self.burst_estimate
    }

    pub fn is_exited(&self) -> bool {
        self.state == ActorState::Exited
    }

    /// Dormant -> active; no-op when already active
    pub fn on_resume(&mut self) {
        if self.state == ActorState::Dormant {
            self.state = ActorState::Active;
        }
    }

    /// Active -> dormant
    pub fn on_suspend(&mut self) {
        if self.state == ActorState::Active {
            self.state = ActorState::Dormant;
        }
    }

    /// Burns one tick of local work
    pub fn on_consume_tick(&mut self) -> TickOutcome {
        if self.state != ActorState::Active {
            debug!("[{} actor] tick while {:?}, ignored", self.pid, self.state);
            return TickOutcome::Ignored;
        }
        if self.burst_estimate == 0 {
            return TickOutcome::AwaitingTeardown;
        }

        self.burst_estimate -= 1;
        let remaining = self.burst_estimate;

        if remaining > 0 && self.rng.gen_range(0..100u8) < self.io_request_percent {
            debug!("[{} actor] {} left, requesting I/O", self.pid, remaining);
            self.state = ActorState::Dormant;
            TickOutcome::IoRequested { remaining }
        } else if remaining == 0 {
            debug!("[{} actor] burst reached zero, awaiting teardown", self.pid);
            TickOutcome::AwaitingTeardown
        } else {
            debug!("[{} actor] running, {} left", self.pid, remaining);
            TickOutcome::Continue { remaining }
        }
    }

    /// Imposed termination
    pub fn on_terminate(&mut self) {
        self.state = ActorState::Exited;
    }

    /// Reacts to one command
    ///
    /// Exited actors ignore everything.
    pub fn apply(&mut self, command: ActorCommand) -> Option<ActorSignal> {
        if self.is_exited() {
            return None;
        }
        match command {
            ActorCommand::Resume => {
                self.on_resume();
                None
            }
            ActorCommand::Suspend => {
                self.on_suspend();
                None
            }
            ActorCommand::ConsumeTick => match self.on_consume_tick() {
                TickOutcome::IoRequested { .. } => Some(ActorSignal::IoRequest),
                _ => None,
            },
            ActorCommand::Terminate => {
                self.on_terminate();
                Some(ActorSignal::Exited)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(estimate: u32, io_percent: u8) -> WorkloadActor {
        WorkloadActor::with_estimate(
            Pid::new(0),
            ActorId::new(),
            estimate,
            io_percent,
            StdRng::seed_from_u64(1),
        )
    }

    #[test]
    fn test_on_create_draws_within_bounds() {
        let policy = WorkloadPolicy {
            max_cpu_burst: 4,
            io_request_percent: 20,
            seed: Some(3),
        };
        for index in 0..20 {
            let actor = WorkloadActor::on_create(Pid::new(index), ActorId::new(), &policy);
            assert!((1..=4).contains(&actor.burst_estimate()));
            assert_eq!(actor.state(), ActorState::Dormant);
        }
    }

    #[test]
    fn test_resume_is_idempotent() {
        let mut actor = actor(3, 0);
        actor.on_resume();
        actor.on_resume();
        assert_eq!(actor.state(), ActorState::Active);
    }

    #[test]
    fn test_dormant_actor_ignores_ticks() {
        let mut actor = actor(3, 0);
        assert_eq!(actor.on_consume_tick(), TickOutcome::Ignored);
        assert_eq!(actor.burst_estimate(), 3);
    }

    #[test]
    fn test_consume_counts_down_to_teardown() {
        let mut actor = actor(2, 0);
        actor.on_resume();
        assert_eq!(actor.on_consume_tick(), TickOutcome::Continue { remaining: 1 });
        assert_eq!(actor.on_consume_tick(), TickOutcome::AwaitingTeardown);
        assert_eq!(actor.on_consume_tick(), TickOutcome::AwaitingTeardown);
        assert_eq!(actor.burst_estimate(), 0);
        // Never self-terminates.
        assert_eq!(actor.state(), ActorState::Active);
    }

    #[test]
    fn test_certain_io_request_goes_dormant() {
        let mut actor = actor(5, 100);
        actor.on_resume();
        assert_eq!(
            actor.on_consume_tick(),
            TickOutcome::IoRequested { remaining: 4 }
        );
        assert_eq!(actor.state(), ActorState::Dormant);
    }

    #[test]
    fn test_no_io_request_on_last_tick() {
        let mut actor = actor(1, 100);
        actor.on_resume();
        assert_eq!(actor.on_consume_tick(), TickOutcome::AwaitingTeardown);
    }

    #[test]
    fn test_apply_maps_signals() {
        let mut actor = actor(5, 100);
        assert_eq!(actor.apply(ActorCommand::Resume), None);
        assert_eq!(
            actor.apply(ActorCommand::ConsumeTick),
            Some(ActorSignal::IoRequest)
        );
        assert_eq!(actor.apply(ActorCommand::Resume), None);
        assert_eq!(actor.apply(ActorCommand::Suspend), None);
        assert_eq!(actor.state(), ActorState::Dormant);
        assert_eq!(
            actor.apply(ActorCommand::Terminate),
            Some(ActorSignal::Exited)
        );
        assert_eq!(actor.apply(ActorCommand::Resume), None);
        assert!(actor.is_exited());
    }

    #[test]
    fn test_io_probability_roughly_twenty_percent() {
        let mut actor = actor(u32::MAX, 20);
        actor.on_resume();
        let mut requests = 0;
        for _ in 0..10_000 {
            if let TickOutcome::IoRequested { .. } = actor.on_consume_tick() {
                requests += 1;
                actor.on_resume();
            }
        }
        assert!((1_500..2_500).contains(&requests), "got {}", requests);
    }

    #[test]
    fn test_state_serializes_by_name() {
        let mut actor = actor(3, 0);
        actor.on_resume();

        let json = serde_json::to_string(&actor.state()).unwrap();
        assert_eq!(json, "\"Active\"");
        let parsed: ActorState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ActorState::Active);
    }
}
