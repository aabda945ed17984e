//! Headless frame loop that plays a scripted session.

use anyhow::{bail, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use scavenge_core::{Command, Event, Outcome};
use scavenge_system_board::{BoardGenerator, BuildMode, Config as BoardConfig, TilePalette};
use scavenge_system_layout::{DirectoryLevels, EmbeddedLevels, LevelSource};
use scavenge_system_turns::{Config as TurnConfig, TurnScheduler};
use scavenge_world::{self as world, query, World};
use tracing::{debug, info};

/// Result of a finished session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Report {
    /// Seed every random decision was drawn from.
    pub(crate) seed: u64,
    /// How the session ended.
    pub(crate) outcome: Outcome,
    /// Frames simulated before the session ended.
    pub(crate) frames: u64,
    /// Food the player had left.
    pub(crate) food: i32,
    /// Overlay messages in the order they were shown.
    pub(crate) transcript: Vec<String>,
}

/// Composes the world and systems from `settings` and plays until game over.
///
/// Fails when a level cannot be loaded or the frame budget runs out.
pub(crate) fn run(settings: &crate::settings::Settings) -> Result<Report> {
    let seed = settings.seed.unwrap_or_else(rand::random);
    info!(seed, "starting session");

    let source: Box<dyn LevelSource> = match &settings.board.levels {
        Some(root) => Box::new(DirectoryLevels::new(root.clone())),
        None => Box::new(EmbeddedLevels),
    };
    let mode = if settings.board.procedural {
        BuildMode::Procedural
    } else {
        BuildMode::Layout
    };
    let board_config = BoardConfig::new(
        settings.board.columns,
        settings.board.rows,
        TilePalette::default(),
        mode,
    )
    .with_wall_count(settings.board.wall_count)
    .with_food_count(settings.board.food_count);

    let world = World::new(world::Config::new(settings.starting_food));
    let banner = query::welcome_banner(&world).to_owned();
    let mut session = Session {
        world,
        scheduler: TurnScheduler::new(TurnConfig::new(
            settings.setup_delay(),
            settings.turn_delay(),
            settings.max_days,
        )),
        board: BoardGenerator::new(board_config, ChaCha8Rng::seed_from_u64(seed)),
        source,
        moves_per_day: settings.moves_per_day,
        moves_taken: 0,
        transcript: vec![banner],
        last_message: None,
    };
    let config = session.board.config();
    info!(
        columns = config.columns(),
        rows = config.rows(),
        mode = ?config.mode(),
        "board configured"
    );
    session.pump(Vec::new());

    loop {
        let frames = query::tick_index(&session.world);
        if let Some(outcome) = query::outcome(&session.world) {
            let food = query::food(&session.world);
            info!(%outcome, frames, food, "session finished");
            return Ok(Report {
                seed,
                outcome,
                frames,
                food,
                transcript: session.transcript,
            });
        }
        if session.scheduler.is_stalled() {
            let message = query::status_message(&session.world).unwrap_or_default();
            bail!("session stalled: {message}");
        }
        if frames == settings.max_frames {
            bail!(
                "session unfinished after {frames} frames on day {}",
                query::day(&session.world)
            );
        }

        session.submit(Command::Tick {
            dt: settings.frame(),
        });
        session.play_move();
    }
}

struct Session {
    world: World,
    scheduler: TurnScheduler,
    board: BoardGenerator<ChaCha8Rng>,
    source: Box<dyn LevelSource>,
    moves_per_day: u32,
    moves_taken: u32,
    transcript: Vec<String>,
    last_message: Option<String>,
}

impl Session {
    fn submit(&mut self, command: Command) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        if events.contains(&Event::PlayerTurnConsumed) {
            debug!(
                actors = query::actor_view(&self.world).len(),
                steps = ?world::total_move_duration(&self.world),
                "actor turn begins"
            );
        }
        self.pump(events);
    }

    fn pump(&mut self, mut events: Vec<Event>) {
        loop {
            let session = query::session(&self.world);
            let actors = query::actor_view(&self.world);
            let board = &mut self.board;
            let source = &*self.source;
            let mut commands = Vec::new();
            self.scheduler.handle(
                &events,
                &session,
                &actors,
                |day, out: &mut Vec<Command>| board.build_level(day, source, out),
                &mut commands,
            );
            if commands.is_empty() {
                break;
            }
            events.clear();
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
            for event in &events {
                if let Event::ActorActivated { actor } = event {
                    debug!(actor = actor.get(), "actor moved");
                }
            }
        }
        self.refresh_overlay();
    }

    fn refresh_overlay(&mut self) {
        let message = query::status_message(&self.world);
        if message != self.last_message {
            if let Some(text) = &message {
                info!(message = %text, "overlay");
                self.transcript.push(text.clone());
            }
            self.last_message = message;
        }
    }

    /// Scripted player: takes a step costing one food, then leaves through the exit.
    fn play_move(&mut self) {
        if !self.scheduler.can_act(&query::session(&self.world)) {
            return;
        }
        if self.moves_taken >= self.moves_per_day {
            self.moves_taken = 0;
            self.submit(Command::CompleteLevel);
            return;
        }
        self.moves_taken += 1;
        self.submit(Command::ConsumePlayerTurn);
        self.submit(Command::AdjustFood { delta: -1 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn settings() -> Settings {
        Settings {
            seed: Some(11),
            ..Settings::default()
        }
    }

    #[test]
    fn scripted_player_survives_bundled_levels() {
        let report = run(&settings()).expect("session finishes");

        assert_eq!(report.outcome, Outcome::Survived { days: 3 });
        assert_eq!(
            report.transcript,
            vec![
                "Welcome to Scavenge. Survive the days.".to_owned(),
                "Day 1".to_owned(),
                "Day 2".to_owned(),
                "Day 3".to_owned(),
                "You survived 3 days!".to_owned(),
            ]
        );
    }

    #[test]
    fn scarce_food_starves_the_player() {
        let mut settings = settings();
        settings.starting_food = 2;
        settings.board.procedural = true;

        let report = run(&settings).expect("session finishes");

        assert_eq!(report.outcome, Outcome::Starved { days: 1 });
        assert_eq!(report.food, 0);
    }

    #[test]
    fn same_seed_replays_the_same_session() {
        let mut settings = settings();
        settings.board.procedural = true;

        assert_eq!(
            run(&settings).expect("first run"),
            run(&settings).expect("second run")
        );
    }

    #[test]
    fn missing_level_directory_stalls_the_session() {
        let mut settings = settings();
        settings.board.levels = Some("/nonexistent/levels".into());

        let error = run(&settings).expect_err("day 1 is missing");

        assert!(error
            .to_string()
            .contains("Day 1 could not be loaded"));
    }

    #[test]
    fn frame_budget_bounds_the_session() {
        let mut settings = settings();
        settings.max_frames = 10;

        let error = run(&settings).expect_err("two second title card exceeds budget");

        assert!(error.to_string().contains("unfinished after 10 frames"));
    }
}
