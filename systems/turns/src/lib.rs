#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn scheduling system that paces setup, the player turn and the actor turn.
//!
//! The scheduler never blocks. Every timed wait is a named phase with the
//! time still owed; `TimeAdvanced` events pay that time down and, once a wait
//! is settled, the scheduler emits the commands for the next step.

use std::{fmt, time::Duration};

use scavenge_core::{ActorView, Command, Event, Outcome, SessionSnapshot, TurnState};
use tracing::{debug, error, info};

const DEFAULT_SETUP_DELAY: Duration = Duration::from_secs(2);
const DEFAULT_TURN_DELAY: Duration = Duration::from_millis(100);
const DEFAULT_MAX_DAYS: u32 = 4;

/// Configuration parameters required to construct the turn scheduler.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    setup_delay: Duration,
    turn_delay: Duration,
    max_days: u32,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// Reaching `max_days` during setup ends the session as a win instead of
    /// building another level.
    #[must_use]
    pub const fn new(setup_delay: Duration, turn_delay: Duration, max_days: u32) -> Self {
        Self {
            setup_delay,
            turn_delay,
            max_days,
        }
    }

    /// Time the title card stays up after a level is built.
    #[must_use]
    pub const fn setup_delay(&self) -> Duration {
        self.setup_delay
    }

    /// Pause before the first actor moves.
    #[must_use]
    pub const fn turn_delay(&self) -> Duration {
        self.turn_delay
    }

    /// Day at which the session is won.
    #[must_use]
    pub const fn max_days(&self) -> u32 {
        self.max_days
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_SETUP_DELAY, DEFAULT_TURN_DELAY, DEFAULT_MAX_DAYS)
    }
}

/// Wait the scheduler is currently settling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Wait {
    /// Title card delay after building a level.
    Setup,
    /// Pause at the start of the actor turn.
    TurnStart,
    /// Stand-in for actor movement when no actor exists.
    EmptyRoster,
    /// Step time of the actor at this activation index.
    ActorStep(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// Nothing armed; waiting for a state change.
    Idle,
    /// A wait is armed with the remaining time.
    Waiting { wait: Wait, remaining: Duration },
    /// `EnterTurnState(PlayerTurn)` was emitted but the world has not yet
    /// reported the change; the session snapshot may still read an older state.
    Handover,
    /// The level could not be built; the session stays in setup.
    Stalled,
    /// The session ended.
    Halted,
}

/// Pure system that sequences turns and emits the commands driving them.
#[derive(Debug)]
pub struct TurnScheduler {
    config: Config,
    phase: Phase,
}

impl TurnScheduler {
    /// Creates a new scheduler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            phase: Phase::Idle,
        }
    }

    /// Configuration the scheduler was created with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Reports whether the input collaborator may accept a player action.
    ///
    /// This is the input gate. It agrees with `query::can_act` once every
    /// emitted command has been applied, and stays closed while a hand-over
    /// to the player is still in flight.
    #[must_use]
    pub fn can_act(&self, session: &SessionSnapshot) -> bool {
        session.state == TurnState::PlayerTurn && self.phase == Phase::Idle
    }

    /// Reports whether the overlay should block the board.
    #[must_use]
    pub fn is_blocking(&self, session: &SessionSnapshot) -> bool {
        session.state.is_blocking()
    }

    /// Reports whether the last setup failed and the session cannot continue.
    #[must_use]
    pub fn is_stalled(&self) -> bool {
        self.phase == Phase::Stalled
    }

    /// Consumes world events and the current session to emit turn commands.
    ///
    /// `build_level` is invoked with the new day when a level must be built;
    /// it pushes the level's placement commands into the provided buffer.
    pub fn handle<F, E>(
        &mut self,
        events: &[Event],
        session: &SessionSnapshot,
        actors: &ActorView,
        mut build_level: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(u32, &mut Vec<Command>) -> Result<(), E>,
        E: fmt::Display,
    {
        for event in events {
            match event {
                Event::TurnStateChanged { state } => self.on_state_changed(*state),
                Event::TimeAdvanced { dt } => self.advance(*dt, actors, out),
                _ => {}
            }
        }

        if session.state == TurnState::GameOver {
            self.phase = Phase::Halted;
            return;
        }
        if self.phase == Phase::Handover && session.state == TurnState::PlayerTurn {
            self.phase = Phase::Idle;
        }

        if session.state == TurnState::Setup && self.phase == Phase::Idle {
            self.begin_setup(session, &mut build_level, out);
        }
    }

    fn on_state_changed(&mut self, state: TurnState) {
        match state {
            TurnState::GameOver => self.phase = Phase::Halted,
            TurnState::Setup => {
                if self.phase != Phase::Halted {
                    self.phase = Phase::Idle;
                }
            }
            TurnState::ActorTurn => {
                if self.phase == Phase::Idle {
                    self.arm(Wait::TurnStart, self.config.turn_delay);
                }
            }
            TurnState::PlayerTurn => {
                if self.phase == Phase::Handover {
                    self.phase = Phase::Idle;
                }
            }
        }
    }

    fn begin_setup<F, E>(
        &mut self,
        session: &SessionSnapshot,
        build_level: &mut F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(u32, &mut Vec<Command>) -> Result<(), E>,
        E: fmt::Display,
    {
        let day = session.day.saturating_add(1);
        out.push(Command::AdvanceDay);

        if day >= self.config.max_days {
            let outcome = Outcome::Survived {
                days: day.saturating_sub(1),
            };
            info!(day, "final day reached");
            out.push(Command::DeclareGameOver { outcome });
            self.phase = Phase::Halted;
            return;
        }

        out.push(Command::ClearLevel);
        match build_level(day, out) {
            Ok(()) => {
                debug!(day, "level built, arming setup delay");
                self.arm(Wait::Setup, self.config.setup_delay);
            }
            Err(reason) => {
                error!(day, %reason, "level could not be built");
                out.push(Command::ReportLevelLoadFailure {
                    day,
                    reason: reason.to_string(),
                });
                self.phase = Phase::Stalled;
            }
        }
    }

    fn arm(&mut self, wait: Wait, duration: Duration) {
        self.phase = Phase::Waiting {
            wait,
            remaining: duration,
        };
    }

    fn advance(&mut self, dt: Duration, actors: &ActorView, out: &mut Vec<Command>) {
        let mut available = dt;
        while let Phase::Waiting { wait, remaining } = self.phase {
            if available < remaining {
                self.phase = Phase::Waiting {
                    wait,
                    remaining: remaining - available,
                };
                return;
            }
            available -= remaining;
            self.settle(wait, actors, out);
        }
    }

    fn settle(&mut self, wait: Wait, actors: &ActorView, out: &mut Vec<Command>) {
        match wait {
            Wait::Setup => self.enter_player_turn(out),
            Wait::TurnStart => {
                if actors.is_empty() {
                    self.arm(Wait::EmptyRoster, self.config.turn_delay);
                } else {
                    self.activate(0, actors, out);
                }
            }
            Wait::EmptyRoster => self.enter_player_turn(out),
            Wait::ActorStep(index) => self.activate(index + 1, actors, out),
        }
    }

    fn activate(&mut self, index: usize, actors: &ActorView, out: &mut Vec<Command>) {
        match actors.get(index) {
            Some(actor) => {
                debug!(actor = actor.id.get(), index, "activating actor");
                out.push(Command::ActivateActor { actor: actor.id });
                self.arm(Wait::ActorStep(index), actor.move_duration);
            }
            None => self.enter_player_turn(out),
        }
    }

    fn enter_player_turn(&mut self, out: &mut Vec<Command>) {
        out.push(Command::EnterTurnState {
            state: TurnState::PlayerTurn,
        });
        self.phase = Phase::Handover;
    }
}

impl Default for TurnScheduler {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
