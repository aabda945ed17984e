#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for Scavenge.
//!
//! The world owns everything that must survive a level transition (the day
//! counter, the player's food, the turn state) alongside the tiles and actors
//! of the level currently on the board. It is created once at process start
//! and mutated only through [`apply`].

mod registry;

use std::time::Duration;

use scavenge_core::{ActorId, Command, Event, Outcome, TilePlacement, TurnState, WELCOME_BANNER};
use tracing::{debug, info, warn};

pub use registry::{ActorHandle, ActorRegistry};

const DEFAULT_STARTING_FOOD: i32 = 100;

/// Parameters applied when the world is created.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    starting_food: i32,
}

impl Config {
    /// Creates a configuration granting the player `starting_food` points.
    #[must_use]
    pub const fn new(starting_food: i32) -> Self {
        Self { starting_food }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_STARTING_FOOD)
    }
}

/// Session state that persists across level reloads.
#[derive(Clone, Debug)]
struct Session {
    day: u32,
    food: i32,
    state: TurnState,
    outcome: Option<Outcome>,
    load_failure: Option<(u32, String)>,
}

/// Represents the authoritative Scavenge world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    session: Session,
    tiles: Vec<TilePlacement>,
    registry: ActorRegistry,
    next_actor_id: u32,
    tick_index: u64,
}

impl World {
    /// Creates a new world in the setup state, before the first day.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            banner: WELCOME_BANNER,
            session: Session {
                day: 0,
                food: config.starting_food,
                state: TurnState::Setup,
                outcome: None,
                load_failure: None,
            },
            tiles: Vec::new(),
            registry: ActorRegistry::new(),
            next_actor_id: 0,
            tick_index: 0,
        }
    }

    fn allocate_actor_id(&mut self) -> ActorId {
        let id = ActorId::new(self.next_actor_id);
        self.next_actor_id = self.next_actor_id.saturating_add(1);
        id
    }

    fn enter_state(&mut self, state: TurnState, out_events: &mut Vec<Event>) {
        if self.session.state == TurnState::GameOver || self.session.state == state {
            return;
        }
        debug!(from = ?self.session.state, to = ?state, "turn state changed");
        self.session.state = state;
        out_events.push(Event::TurnStateChanged { state });
    }

    fn finish(&mut self, outcome: Outcome, out_events: &mut Vec<Event>) {
        if self.session.state == TurnState::GameOver {
            return;
        }
        info!(%outcome, "session finished");
        self.session.state = TurnState::GameOver;
        self.session.outcome = Some(outcome);
        out_events.push(Event::TurnStateChanged {
            state: TurnState::GameOver,
        });
        out_events.push(Event::GameOver { outcome });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::AdvanceDay => {
            if world.session.state == TurnState::GameOver {
                return;
            }
            world.session.day = world.session.day.saturating_add(1);
            world.session.load_failure = None;
            info!(day = world.session.day, "day advanced");
            out_events.push(Event::DayAdvanced {
                day: world.session.day,
            });
        }
        Command::ClearLevel => {
            world.tiles.clear();
            world.registry.clear();
            out_events.push(Event::LevelCleared);
        }
        Command::PlaceTile { placement } => {
            world.tiles.push(placement);
            out_events.push(Event::TilePlaced { placement });
        }
        Command::SpawnActor {
            placement,
            move_duration,
        } => {
            let actor = world.allocate_actor_id();
            world.tiles.push(placement);
            world.registry.register(ActorHandle::new(
                actor,
                placement.position,
                move_duration,
            ));
            out_events.push(Event::TilePlaced { placement });
            out_events.push(Event::ActorSpawned {
                actor,
                position: placement.position,
                move_duration,
            });
        }
        Command::EnterTurnState { state } => {
            if state == TurnState::GameOver {
                warn!("game over requested without an outcome; use DeclareGameOver");
                return;
            }
            world.enter_state(state, out_events);
        }
        Command::ConsumePlayerTurn => {
            if world.session.state != TurnState::PlayerTurn {
                out_events.push(Event::PlayerActionRejected {
                    state: world.session.state,
                });
                return;
            }
            out_events.push(Event::PlayerTurnConsumed);
            world.enter_state(TurnState::ActorTurn, out_events);
        }
        Command::ActivateActor { actor } => {
            if world.registry.get(actor).is_some() {
                out_events.push(Event::ActorActivated { actor });
            } else {
                debug!(actor = actor.get(), "ignoring activation of unknown actor");
            }
        }
        Command::AdjustFood { delta } => {
            if world.session.state == TurnState::GameOver {
                return;
            }
            world.session.food = world.session.food.saturating_add(delta);
            let food = world.session.food;
            out_events.push(Event::FoodChanged { food });
            if food <= 0 {
                let days = world.session.day;
                world.finish(Outcome::Starved { days }, out_events);
            }
        }
        Command::CompleteLevel => match world.session.state {
            TurnState::PlayerTurn | TurnState::ActorTurn => {
                world.enter_state(TurnState::Setup, out_events);
            }
            TurnState::Setup | TurnState::GameOver => {
                debug!(state = ?world.session.state, "ignoring level completion");
            }
        },
        Command::DeclareGameOver { outcome } => {
            world.finish(outcome, out_events);
        }
        Command::ReportLevelLoadFailure { day, reason } => {
            world.session.load_failure = Some((day, reason.clone()));
            out_events.push(Event::LevelLoadFailed { day, reason });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use scavenge_core::{ActorView, Outcome, SessionSnapshot, TilePlacement, TurnState};

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Captures the state that persists across levels.
    #[must_use]
    pub fn session(world: &World) -> SessionSnapshot {
        SessionSnapshot {
            day: world.session.day,
            food: world.session.food,
            state: world.session.state,
        }
    }

    /// Current day; zero before the first level has been set up.
    #[must_use]
    pub fn day(world: &World) -> u32 {
        world.session.day
    }

    /// Player food points.
    #[must_use]
    pub fn food(world: &World) -> i32 {
        world.session.food
    }

    /// Active turn state.
    #[must_use]
    pub fn turn_state(world: &World) -> TurnState {
        world.session.state
    }

    /// Reports whether the world is in the player turn.
    ///
    /// Input adapters gate on `TurnScheduler::can_act`, which also stays
    /// closed while a hand-over is in flight. Both agree once every command
    /// the scheduler emitted has been applied.
    #[must_use]
    pub fn can_act(world: &World) -> bool {
        world.session.state == TurnState::PlayerTurn
    }

    /// Reports whether an overlay should block the player during setup or the actor turn.
    #[must_use]
    pub fn is_blocking(world: &World) -> bool {
        world.session.state.is_blocking()
    }

    /// Final outcome once the session has ended.
    #[must_use]
    pub fn outcome(world: &World) -> Option<Outcome> {
        world.session.outcome
    }

    /// Text an overlay should display, if any.
    #[must_use]
    pub fn status_message(world: &World) -> Option<String> {
        if let Some(outcome) = world.session.outcome {
            return Some(outcome.to_string());
        }
        if let Some((day, reason)) = &world.session.load_failure {
            return Some(format!("Day {day} could not be loaded: {reason}"));
        }
        match world.session.state {
            TurnState::Setup if world.session.day > 0 => Some(format!("Day {}", world.session.day)),
            _ => None,
        }
    }

    /// Tiles placed for the current level in placement order.
    #[must_use]
    pub fn tiles(world: &World) -> &[TilePlacement] {
        &world.tiles
    }

    /// Captures the actor registry in activation order.
    #[must_use]
    pub fn actor_view(world: &World) -> ActorView {
        world.registry.view()
    }

    /// Number of ticks applied since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

/// Sum of every registered actor's move duration.
#[must_use]
pub fn total_move_duration(world: &World) -> Duration {
    world
        .registry
        .all()
        .iter()
        .map(ActorHandle::move_duration)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scavenge_core::{GridPosition, TileCategory, TileVariant};

    fn enemy_at(x: i32, y: i32) -> TilePlacement {
        TilePlacement::new(
            TileCategory::Enemy,
            TileVariant::new(0),
            GridPosition::new(x, y),
        )
    }

    #[test]
    fn consume_player_turn_is_rejected_during_setup() {
        let mut world = World::default();
        let mut events = Vec::new();

        apply(&mut world, Command::ConsumePlayerTurn, &mut events);

        assert_eq!(
            events,
            vec![Event::PlayerActionRejected {
                state: TurnState::Setup
            }]
        );
        assert_eq!(query::turn_state(&world), TurnState::Setup);
    }

    #[test]
    fn consume_player_turn_hands_over_to_actors() {
        let mut world = World::default();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::EnterTurnState {
                state: TurnState::PlayerTurn,
            },
            &mut events,
        );
        assert!(query::can_act(&world));
        events.clear();

        apply(&mut world, Command::ConsumePlayerTurn, &mut events);

        assert_eq!(
            events,
            vec![
                Event::PlayerTurnConsumed,
                Event::TurnStateChanged {
                    state: TurnState::ActorTurn
                },
            ]
        );
        assert!(query::is_blocking(&world));
        assert!(!query::can_act(&world));
    }

    #[test]
    fn spawned_actors_register_in_order_and_clear_per_level() {
        let mut world = World::default();
        let mut events = Vec::new();
        for x in [3, 1, 2] {
            apply(
                &mut world,
                Command::SpawnActor {
                    placement: enemy_at(x, 0),
                    move_duration: Duration::from_millis(100),
                },
                &mut events,
            );
        }

        let positions: Vec<i32> = query::actor_view(&world)
            .iter()
            .map(|actor| actor.position.x())
            .collect();
        assert_eq!(positions, vec![3, 1, 2]);
        assert_eq!(
            query::tiles(&world)
                .iter()
                .filter(|placement| placement.category == TileCategory::Enemy)
                .count(),
            3
        );
        assert_eq!(total_move_duration(&world), Duration::from_millis(300));

        apply(&mut world, Command::ClearLevel, &mut events);
        assert!(query::actor_view(&world).is_empty());
        assert!(query::tiles(&world).is_empty());
    }

    #[test]
    fn actor_ids_keep_growing_across_levels() {
        let mut world = World::default();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnActor {
                placement: enemy_at(0, 0),
                move_duration: Duration::ZERO,
            },
            &mut events,
        );
        apply(&mut world, Command::ClearLevel, &mut events);
        apply(
            &mut world,
            Command::SpawnActor {
                placement: enemy_at(0, 0),
                move_duration: Duration::ZERO,
            },
            &mut events,
        );

        let ids: Vec<u32> = query::actor_view(&world)
            .iter()
            .map(|actor| actor.id.get())
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn starving_ends_the_session() {
        let mut world = World::new(Config::new(2));
        let mut events = Vec::new();
        apply(&mut world, Command::AdvanceDay, &mut events);
        events.clear();

        apply(&mut world, Command::AdjustFood { delta: -2 }, &mut events);

        assert_eq!(
            events,
            vec![
                Event::FoodChanged { food: 0 },
                Event::TurnStateChanged {
                    state: TurnState::GameOver
                },
                Event::GameOver {
                    outcome: Outcome::Starved { days: 1 }
                },
            ]
        );
        assert_eq!(
            query::status_message(&world).as_deref(),
            Some("After 1 days, you starved.")
        );
    }

    #[test]
    fn game_over_is_terminal() {
        let mut world = World::default();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::DeclareGameOver {
                outcome: Outcome::Survived { days: 3 },
            },
            &mut events,
        );
        events.clear();

        apply(
            &mut world,
            Command::EnterTurnState {
                state: TurnState::PlayerTurn,
            },
            &mut events,
        );
        apply(&mut world, Command::AdvanceDay, &mut events);
        apply(
            &mut world,
            Command::DeclareGameOver {
                outcome: Outcome::Starved { days: 0 },
            },
            &mut events,
        );

        assert!(events.is_empty());
        assert_eq!(query::turn_state(&world), TurnState::GameOver);
        assert_eq!(query::outcome(&world), Some(Outcome::Survived { days: 3 }));
    }

    #[test]
    fn completing_a_level_returns_to_setup() {
        let mut world = World::default();
        let mut events = Vec::new();
        apply(&mut world, Command::AdvanceDay, &mut events);
        apply(
            &mut world,
            Command::EnterTurnState {
                state: TurnState::PlayerTurn,
            },
            &mut events,
        );
        events.clear();

        apply(&mut world, Command::CompleteLevel, &mut events);

        assert_eq!(
            events,
            vec![Event::TurnStateChanged {
                state: TurnState::Setup
            }]
        );
        assert_eq!(query::status_message(&world).as_deref(), Some("Day 1"));
    }

    #[test]
    fn load_failure_is_reported_until_next_day() {
        let mut world = World::default();
        let mut events = Vec::new();
        apply(&mut world, Command::AdvanceDay, &mut events);
        apply(
            &mut world,
            Command::ReportLevelLoadFailure {
                day: 1,
                reason: "missing".to_owned(),
            },
            &mut events,
        );

        assert_eq!(
            query::status_message(&world).as_deref(),
            Some("Day 1 could not be loaded: missing")
        );
        assert_eq!(query::turn_state(&world), TurnState::Setup);
    }
}
