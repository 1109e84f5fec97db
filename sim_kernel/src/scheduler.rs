//! Kernel controller for preemptive round-robin scheduling
//!
//! ## Philosophy
//!
//! - **Single writer**: the kernel is the only code that mutates the PCB
//!   table. Actors never see it; they only receive commands.
//! - **One event at a time**: ticks, I/O requests and exit notifications
//!   are handled strictly in inbox order, so no two updates interleave.
//! - **Kernel bookkeeping is authoritative**: an actor keeps its own burst
//!   estimate for narration, but only the PCB's `remaining_burst` decides
//!   when a process terminates.
//!
//! ## Tick processing
//!
//! 1. SLEEP processes count down their I/O wait and wake up at zero.
//! 2. READY processes accrue one tick of ready wait.
//! 3. The RUNNING process is charged a tick and told to consume it. Burst
//!    exhaustion terminates it; otherwise quantum expiry sends it back to
//!    READY. Termination wins when both happen in the same tick.
//! 4. With nobody running, the dispatcher is asked for a process.
//! 5. The timer is re-armed.

use crate::config::{ConfigError, SchedulerConfig};
use crate::dispatcher::Dispatcher;
use crate::pcb::{Pcb, PcbTable};
use crate::port::WorkloadPort;
use crate::report::SimulationReport;
use crate::timer::TickTimer;
use crate::KernelError;
use core_types::{ActorId, Pid, ProcessStatus};
use ipc::{ActorCommand, EventInbox, KernelEvent};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Lifecycle of the simulation as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KernelState {
    /// Configured; no process exists yet
    Created,
    /// Processes exist and ticks are flowing
    Running,
    /// Every process is DONE and the report was produced
    Finished,
}

/// Scheduling event for the audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleEvent {
    /// A process and its actor were created
    ProcessCreated {
        pid: Pid,
        initial_burst: u32,
        timestamp_ticks: u64,
    },
    /// A process was given the CPU
    Dispatched { pid: Pid, timestamp_ticks: u64 },
    /// The running process used up its quantum
    QuantumExpired { pid: Pid, timestamp_ticks: u64 },
    /// The running process blocked on I/O
    IoBlocked {
        pid: Pid,
        io_wait: u32,
        timestamp_ticks: u64,
    },
    /// A sleeping process finished its I/O
    IoCompleted { pid: Pid, timestamp_ticks: u64 },
    /// A process became DONE
    Terminated { pid: Pid, timestamp_ticks: u64 },
    /// A tick ended with no process running
    Idle { timestamp_ticks: u64 },
    /// Every process is DONE
    Finished { timestamp_ticks: u64 },
}

/// The kernel controller
///
/// Owns the clock, the PCB table and the actor port. Drive it either
/// through [`Kernel::run`] or event by event with [`Kernel::handle_event`].
pub struct Kernel<P: WorkloadPort> {
    config: SchedulerConfig,
    table: PcbTable,
    port: P,
    rng: StdRng,
    timer: TickTimer,
    /// The running slot
    current: Option<Pid>,
    state: KernelState,
    audit_log: Vec<ScheduleEvent>,
    report: Option<SimulationReport>,
}

impl<P: WorkloadPort> Kernel<P> {
    /// Creates a kernel; invalid configurations never get this far
    pub fn new(config: SchedulerConfig, port: P) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let timer = TickTimer::new(config.tick_interval());

        Ok(Self {
            config,
            table: PcbTable::new(),
            port,
            rng,
            timer,
            current: None,
            state: KernelState::Created,
            audit_log: Vec::new(),
            report: None,
        })
    }

    /// Creates every process, dispatches the first one and arms the timer
    ///
    /// Calling it again after a successful start does nothing.
    pub fn start(&mut self) -> Result<(), KernelError> {
        if self.state != KernelState::Created {
            return Ok(());
        }

        // Nothing is committed until every actor exists
        let max_cpu_burst = self.config.max_cpu_burst;
        let tick = self.timer.current_ticks();
        let mut created = Vec::with_capacity(self.config.process_count);
        for index in 0..self.config.process_count {
            let pid = Pid::new(index);
            let handle = match self.port.spawn(pid) {
                Ok(handle) => handle,
                Err(err) => {
                    self.port.shutdown();
                    return Err(err.into());
                }
            };
            let burst = match self
                .config
                .initial_bursts
                .as_ref()
                .and_then(|bursts| bursts.get(index))
            {
                Some(&burst) => burst,
                None => self.rng.gen_range(1..=max_cpu_burst),
            };
            created.push(Pcb::new(pid, handle, burst));
        }

        for pcb in created {
            info!(
                "[kernel] created {} ({}), initial burst {}",
                pcb.pid(),
                pcb.handle(),
                pcb.initial_burst()
            );
            self.audit_log.push(ScheduleEvent::ProcessCreated {
                pid: pcb.pid(),
                initial_burst: pcb.initial_burst(),
                timestamp_ticks: tick,
            });
            self.table.push(pcb);
        }

        info!(
            "[kernel] {} processes, time quantum {}",
            self.config.process_count, self.config.time_quantum
        );
        self.state = KernelState::Running;
        self.schedule_next(None);
        self.timer.arm();
        Ok(())
    }

    /// Runs until every process is DONE
    ///
    /// Blocks on the inbox between events. When the armed tick is due and
    /// nothing else is queued, the tick is delivered.
    pub fn run(&mut self, inbox: &EventInbox) -> Result<SimulationReport, KernelError> {
        self.start()?;

        loop {
            if let Some(report) = &self.report {
                return Ok(report.clone());
            }

            let event = match self.timer.time_until_due() {
                Some(wait) => inbox.recv_timeout(wait)?.unwrap_or(KernelEvent::Tick),
                None => inbox.recv()?,
            };

            if event == KernelEvent::Tick {
                if let Some(limit) = self.config.max_ticks {
                    if self.timer.current_ticks() >= limit {
                        warn!("[kernel] tick limit {} reached, aborting", limit);
                        self.timer.cancel();
                        self.port.shutdown();
                        return Err(KernelError::TickLimitExceeded(limit));
                    }
                }
            }

            self.handle_event(event);
        }
    }

    /// Handles every event already queued, without waiting
    ///
    /// Returns the number of events handled.
    pub fn drain(&mut self, inbox: &EventInbox) -> usize {
        let mut handled = 0;
        while let Some(event) = inbox.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Delivers one tick and then everything it caused
    pub fn step(&mut self, inbox: &EventInbox) {
        self.handle_event(KernelEvent::Tick);
        self.drain(inbox);
    }

    /// Processes one event
    pub fn handle_event(&mut self, event: KernelEvent) {
        match self.state {
            KernelState::Created => {
                warn!("[kernel] {} before start, dropped", event);
                return;
            }
            KernelState::Finished => {
                debug!("[kernel] {} after finish, dropped", event);
                return;
            }
            KernelState::Running => {}
        }

        match event {
            KernelEvent::Tick => self.on_tick(),
            KernelEvent::IoRequest { actor } => self.on_io_request(actor),
            KernelEvent::Exited { actor } => self.on_exit(actor),
        }
    }

    /// Timer interrupt
    pub fn on_tick(&mut self) {
        if self.state != KernelState::Running {
            return;
        }
        let tick = self.timer.advance();

        for pcb in self.table.iter_mut() {
            if pcb.tick_io() {
                info!("[kernel: tick {}] {} I/O complete -> READY", tick, pcb.pid());
                self.audit_log.push(ScheduleEvent::IoCompleted {
                    pid: pcb.pid(),
                    timestamp_ticks: tick,
                });
            }
        }

        for pcb in self.table.iter_mut() {
            pcb.accrue_ready_wait();
        }

        match self.current {
            Some(pid) => self.charge_running(pid, tick),
            None => self.schedule_next(None),
        }

        if self.current.is_none() && !self.table.all_done() {
            debug!("[kernel: tick {}] idle", tick);
            self.audit_log.push(ScheduleEvent::Idle {
                timestamp_ticks: tick,
            });
        }

        if self.state == KernelState::Running {
            self.timer.arm();
        }
    }

    fn charge_running(&mut self, pid: Pid, tick: u64) {
        let Some(pcb) = self.table.get_mut(pid) else {
            self.current = None;
            return;
        };
        pcb.charge_tick();
        let actor = pcb.handle();
        let burst_left = pcb.remaining_burst();
        let quantum_left = pcb.remaining_quantum();

        self.command(actor, ActorCommand::ConsumeTick);

        if burst_left == 0 {
            info!("[kernel: tick {}] {} CPU burst complete -> DONE", tick, pid);
            self.terminate(pid, tick);
            self.command(actor, ActorCommand::Terminate);
            self.current = None;
            self.schedule_next(None);
        } else if quantum_left == 0 {
            info!("[kernel: tick {}] {} time quantum expired -> READY", tick, pid);
            if let Some(pcb) = self.table.get_mut(pid) {
                pcb.mark_ready();
            }
            self.audit_log.push(ScheduleEvent::QuantumExpired {
                pid,
                timestamp_ticks: tick,
            });
            self.command(actor, ActorCommand::Suspend);
            self.schedule_next(Some(pid));
        }
    }

    /// I/O trap raised by an actor
    pub fn on_io_request(&mut self, actor: ActorId) {
        if self.state != KernelState::Running {
            return;
        }
        let tick = self.timer.current_ticks();
        let Some(pid) = self.table.find_by_handle(actor) else {
            warn!("[kernel: tick {}] I/O request from unknown {}, dropped", tick, actor);
            return;
        };
        if self.current != Some(pid) {
            warn!(
                "[kernel: tick {}] I/O request from {} which is not running, dropped",
                tick, pid
            );
            return;
        }

        let io_wait = self.rng.gen_range(1..=self.config.max_io_wait);
        if let Some(pcb) = self.table.get_mut(pid) {
            pcb.mark_sleep(io_wait);
        }
        info!(
            "[kernel: tick {}] {} requested I/O -> SLEEP ({} ticks)",
            tick, pid, io_wait
        );
        self.audit_log.push(ScheduleEvent::IoBlocked {
            pid,
            io_wait,
            timestamp_ticks: tick,
        });
        self.command(actor, ActorCommand::Suspend);
        self.schedule_next(Some(pid));
    }

    /// Exit notification for an actor's execution unit
    pub fn on_exit(&mut self, actor: ActorId) {
        if self.state != KernelState::Running {
            return;
        }
        let tick = self.timer.current_ticks();
        let Some(pid) = self.table.find_by_handle(actor) else {
            warn!("[kernel: tick {}] exit of unknown {}, dropped", tick, actor);
            return;
        };

        self.terminate(pid, tick);
        if self.current == Some(pid) {
            self.current = None;
            self.schedule_next(None);
        }
        debug!("[kernel: tick {}] {} ({}) reaped", tick, pid, actor);

        if self.table.all_done() {
            self.finish();
        }
    }

    /// Marks `pid` DONE; a second call is a no-op
    fn terminate(&mut self, pid: Pid, tick: u64) {
        let newly_done = self
            .table
            .get_mut(pid)
            .is_some_and(|pcb| pcb.mark_done(tick));
        if newly_done {
            self.audit_log.push(ScheduleEvent::Terminated {
                pid,
                timestamp_ticks: tick,
            });
        }
    }

    /// Dispatch action: hand the CPU to the next READY process, if any
    fn schedule_next(&mut self, anchor: Option<Pid>) {
        let tick = self.timer.current_ticks();
        let Some(pid) = Dispatcher::select_next(&self.table, anchor) else {
            self.current = None;
            return;
        };
        let quantum = self.config.time_quantum;
        let Some(pcb) = self.table.get_mut(pid) else {
            self.current = None;
            return;
        };
        pcb.mark_running(quantum);
        let actor = pcb.handle();
        let burst_left = pcb.remaining_burst();

        self.current = Some(pid);
        self.audit_log.push(ScheduleEvent::Dispatched {
            pid,
            timestamp_ticks: tick,
        });
        info!(
            "[kernel: tick {}] dispatch {}, quantum {}, burst left {}",
            tick, pid, quantum, burst_left
        );
        self.command(actor, ActorCommand::Resume);
    }

    fn finish(&mut self) {
        let tick = self.timer.current_ticks();
        self.state = KernelState::Finished;
        self.timer.cancel();

        let report = SimulationReport::from_table(&self.table, tick);
        info!(
            "[kernel: tick {}] all {} processes done, average ready wait {:.2}",
            tick,
            self.table.len(),
            report.average_ready_wait
        );
        self.audit_log.push(ScheduleEvent::Finished {
            timestamp_ticks: tick,
        });
        self.report = Some(report);
        self.port.shutdown();
    }

    /// Sends a command; failures are logged and otherwise ignored
    fn command(&mut self, actor: ActorId, command: ActorCommand) {
        if let Err(err) = self.port.send(actor, command) {
            warn!(
                "[kernel: tick {}] {} not delivered: {}",
                self.timer.current_ticks(),
                command,
                err
            );
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn table(&self) -> &PcbTable {
        &self.table
    }

    pub fn state(&self) -> KernelState {
        self.state
    }

    /// The process holding the CPU
    pub fn current(&self) -> Option<Pid> {
        self.current
    }

    pub fn current_ticks(&self) -> u64 {
        self.timer.current_ticks()
    }

    pub fn is_finished(&self) -> bool {
        self.state == KernelState::Finished
    }

    /// The report, once every process is DONE
    pub fn report(&self) -> Option<&SimulationReport> {
        self.report.as_ref()
    }

    pub fn audit_log(&self) -> &[ScheduleEvent] {
        &self.audit_log
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    /// Status of `pid`, for assertions
    pub fn status(&self, pid: Pid) -> Option<ProcessStatus> {
        self.table.get(pid).map(|pcb| pcb.status())
    }
}
