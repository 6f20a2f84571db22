//! Run control: start/stop, mode switching and the tick schedule.
//!
//! The session never waits on anything. Callers feed it the current
//! [`Instant`], take a [`DecisionRequest`] when a tick is due and hand back
//! the matching [`DecisionReply`] whenever it arrives.

use std::time::{Duration, Instant};

use crate::agent::{DecisionReply, DecisionRequest};
use crate::encounter::dice::Roller;
use crate::encounter::log::{EventLog, LogSource};
use crate::encounter::mechanics::SpecialMechanics;
use crate::encounter::resolver::{TickStatus, resolve_tick};
use crate::encounter::{EncounterState, Room, RunMode};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LoopTiming {
    /// Delay between pressing start and the first tick.
    pub start_delay: Duration,
    /// Delay between the end of one tick and the next.
    pub tick_delay: Duration,
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self {
            start_delay: Duration::from_millis(1_000),
            tick_delay: Duration::from_millis(3_000),
        }
    }
}

struct PendingTick {
    id: u64,
    mechanics: SpecialMechanics,
}

pub struct Session<R: Roller> {
    mode: RunMode,
    state: EncounterState,
    log: EventLog,
    running: bool,
    loading: bool,
    next_tick_at: Option<Instant>,
    pending: Option<PendingTick>,
    next_id: u64,
    timing: LoopTiming,
    rng: R,
}

impl<R: Roller> Session<R> {
    pub fn new(rng: R, timing: LoopTiming) -> Self {
        let mut session = Self {
            mode: RunMode::Simulation,
            state: EncounterState::idle(),
            log: EventLog::default(),
            running: false,
            loading: false,
            next_tick_at: None,
            pending: None,
            next_id: 1,
            timing,
            rng,
        };
        session.log_mode_switch();
        session
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn state(&self) -> &EncounterState {
        &self.state
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// True while a decision request is out and unanswered.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn next_tick_at(&self) -> Option<Instant> {
        self.next_tick_at
    }

    pub fn start(&mut self, now: Instant) {
        if self.mode == RunMode::PluginBridge {
            self.log.push(
                LogSource::Error,
                "Cannot start from the UI in plugin bridge mode. The external plugin must initiate actions.",
            );
            return;
        }
        if self.running {
            return;
        }

        self.running = true;
        if matches!(self.state.current_room, Room::Idle | Room::Complete) {
            self.state = EncounterState::new_run();
            self.log.clear();
            self.log.push(
                LogSource::System,
                format!(
                    "Starting new Theatre of Blood run. First room: {}.",
                    self.state.current_room
                ),
            );
            tracing::info!("new run started");
        } else {
            self.log.push(LogSource::System, "Resuming bot...");
            tracing::info!(room = %self.state.current_room, "run resumed");
        }
        self.next_tick_at = Some(now + self.timing.start_delay);
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.halt();
        self.log.push(LogSource::System, "Bot stopped by user.");
        tracing::info!(room = %self.state.current_room, "run stopped by user");
    }

    fn halt(&mut self) {
        self.running = false;
        self.loading = false;
        self.next_tick_at = None;
        self.pending = None;
    }

    /// Switches mode, resetting the encounter and the log. Refused while a run
    /// is active; returns whether the switch happened.
    pub fn set_mode(&mut self, mode: RunMode) -> bool {
        if self.running {
            tracing::debug!("mode switch refused while running");
            return false;
        }
        self.mode = mode;
        self.halt();
        self.state = EncounterState::idle();
        self.log.clear();
        self.log_mode_switch();
        tracing::info!(mode = mode.as_str(), "mode switched");
        true
    }

    pub fn toggle_mode(&mut self) -> bool {
        self.set_mode(self.mode.toggled())
    }

    fn log_mode_switch(&mut self) {
        self.log
            .push(LogSource::System, format!("Switched to {}.", self.mode.as_str()));
        if self.mode == RunMode::PluginBridge {
            self.log.push(
                LogSource::System,
                "This application is now ready to receive game state from an external plugin.",
            );
        }
    }

    /// When a tick is due, rolls its mechanics and returns the request to send
    /// to the decision service. At most one request is outstanding.
    pub fn poll_due(&mut self, now: Instant) -> Option<DecisionRequest> {
        if !self.running || self.pending.is_some() {
            return None;
        }
        let due = self.next_tick_at?;
        if now < due {
            return None;
        }

        self.next_tick_at = None;
        let mechanics = SpecialMechanics::roll(self.state.current_room, &mut self.rng);
        let id = self.next_id;
        self.next_id += 1;
        self.pending = Some(PendingTick {
            id,
            mechanics: mechanics.clone(),
        });
        self.loading = true;
        self.log.push(
            LogSource::Model,
            format!("Analyzing situation in {}...", self.state.current_room),
        );

        Some(DecisionRequest {
            id,
            state: self.state.clone(),
            mechanics,
        })
    }

    /// Resolves the pending tick with `reply`. Replies that do not match the
    /// outstanding request are dropped and `None` is returned.
    pub fn apply_decision(&mut self, reply: DecisionReply, now: Instant) -> Option<TickStatus> {
        let pending = match self.pending.take() {
            Some(pending) if pending.id == reply.id => pending,
            other => {
                self.pending = other;
                tracing::debug!(reply = reply.id, "discarding stale decision");
                return None;
            }
        };
        self.loading = false;

        if let Some(failure) = &reply.failure {
            self.log.push(
                LogSource::Error,
                format!("Decision service failed: {failure}"),
            );
        }
        let action = &reply.action;
        self.log.push(
            LogSource::Model,
            format!(
                "Decision: {} on {}. Reason: {}",
                action.action, action.target, action.reasoning
            ),
        );

        let outcome = resolve_tick(
            &self.state,
            &pending.mechanics,
            action,
            &mut self.rng,
            &mut self.log,
        );
        self.state = outcome.state;

        match outcome.status {
            TickStatus::Wiped | TickStatus::Complete => {
                self.halt();
                tracing::info!(status = ?outcome.status, "run finished");
            }
            TickStatus::RoomCleared(room) => {
                tracing::info!(room = %room, "room cleared");
                self.next_tick_at = Some(now + self.timing.tick_delay);
            }
            TickStatus::Continue => {
                self.next_tick_at = Some(now + self.timing.tick_delay);
            }
        }
        Some(outcome.status)
    }
}
