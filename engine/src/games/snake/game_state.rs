use std::collections::HashSet;
use std::time::Duration;

use crate::config::Validate;
use crate::games::SessionRng;
use crate::log;
use super::error::{PlacementError, SetupError};
use super::food::{FoodField, SpawnContext};
use super::grid::{center, in_bounds, wrap};
use super::obstacles::generate_obstacles;
use super::portal::PortalField;
use super::settings::{GameSettings, MIN_TICK_INTERVAL_MS};
use super::snake::Snake;
use super::snapshot::{PortalView, SnakeSnapshot};
use super::timers::{TimerEvent, TimerQueue};
use super::types::{DeathReason, Direction, FoodKind, Point, RoundState, WallMode};

pub const INITIAL_DIRECTION: Direction = Direction::Right;
/// Segments removed from the tail by purple food.
pub const PURPLE_SHRINK: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Paused or over; nothing moved.
    Idle,
    Moved {
        teleported: bool,
        eaten: Option<FoodKind>,
    },
    GameOver(DeathReason),
}

/// Tick period after a golden food: 80% of the current one, never below the floor.
pub fn sped_up(interval: Duration) -> Duration {
    let micros = interval.as_micros() as u64 * 4 / 5;
    Duration::from_micros(micros).max(Duration::from_millis(MIN_TICK_INTERVAL_MS as u64))
}

/// Sole owner of a round's board. Ticks, inputs and timer events all go
/// through `&mut self`, one at a time.
#[derive(Clone, Debug)]
pub struct SnakeGameState {
    pub settings: GameSettings,
    pub snake: Snake,
    pub foods: FoodField,
    pub obstacles: HashSet<Point>,
    pub portals: PortalField,
    pub score: u32,
    pub tick_interval: Duration,
    pub round_state: RoundState,
    pub tick: u64,
    pub timers: TimerQueue,
    clock: Duration,
    next_settings: Option<GameSettings>,
}

impl SnakeGameState {
    pub fn new(settings: GameSettings, rng: &mut SessionRng) -> Result<Self, SetupError> {
        settings.validate().map_err(SetupError::InvalidSettings)?;
        let grid_size = settings.grid_size();
        let mut state = Self {
            snake: Snake::new(center(grid_size), INITIAL_DIRECTION),
            foods: FoodField::new(settings.fruit_spawn_mode),
            obstacles: HashSet::new(),
            portals: PortalField::default(),
            score: 0,
            tick_interval: settings.tick_interval(),
            round_state: RoundState::Running,
            tick: 0,
            timers: TimerQueue::new(),
            clock: Duration::ZERO,
            next_settings: None,
            settings,
        };
        state.reset(rng)?;
        Ok(state)
    }

    pub fn grid_size(&self) -> usize {
        self.settings.grid_size()
    }

    /// Round clock: time since the last reset.
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Starts a fresh round. Every timer of the previous round is dropped.
    pub fn reset(&mut self, rng: &mut SessionRng) -> Result<(), PlacementError> {
        let settings = self.next_settings.clone().unwrap_or_else(|| self.settings.clone());
        let grid_size = settings.grid_size();

        let obstacles = generate_obstacles(grid_size, settings.obstacles, rng)?;
        let portals = match settings.wall_mode {
            WallMode::Portal => PortalField::generate(grid_size, rng)?,
            WallMode::Wrap | WallMode::Collision => PortalField::default(),
        };

        self.next_settings = None;
        self.timers.clear();
        self.clock = Duration::ZERO;
        self.tick = 0;
        self.score = 0;
        self.tick_interval = settings.tick_interval();
        self.round_state = RoundState::Running;
        self.snake = Snake::new(center(grid_size), INITIAL_DIRECTION);
        self.obstacles = obstacles;
        self.portals = portals;
        self.foods = FoodField::new(settings.fruit_spawn_mode);
        self.settings = settings;
        self.with_spawn_context(Duration::ZERO, rng, |foods, ctx| foods.start_round(ctx));

        log!(
            "Round reset: grid {}x{}, walls {:?}, food {:?}, {} obstacles, seed {}",
            grid_size,
            grid_size,
            self.settings.wall_mode,
            self.settings.fruit_spawn_mode,
            self.obstacles.len(),
            rng.seed()
        );
        Ok(())
    }

    /// Board-shaping changes reset right away; anything else waits for the
    /// next round. Returns whether a reset happened. Rejected settings leave
    /// the round and any held settings untouched.
    pub fn update_settings(
        &mut self,
        settings: GameSettings,
        rng: &mut SessionRng,
    ) -> Result<bool, SetupError> {
        settings.validate().map_err(SetupError::InvalidSettings)?;
        let needs_reset = self.settings.requires_reset(&settings);
        let previous = self.next_settings.replace(settings);
        if needs_reset {
            log!("Grid size or obstacle density changed, resetting round");
            if let Err(e) = self.reset(rng) {
                self.next_settings = previous;
                return Err(e.into());
            }
        }
        Ok(needs_reset)
    }

    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.round_state != RoundState::Running {
            return false;
        }
        self.snake.queue_direction(direction)
    }

    pub fn toggle_pause(&mut self) -> RoundState {
        self.round_state = match self.round_state {
            RoundState::Running => RoundState::Paused,
            RoundState::Paused => RoundState::Running,
            over @ RoundState::GameOver(_) => over,
        };
        self.round_state
    }

    /// Earliest pending timer on the round clock. Nothing fires once the
    /// round is over.
    pub fn next_timer_deadline(&self) -> Option<Duration> {
        if self.round_state.is_over() {
            return None;
        }
        self.timers.next_deadline()
    }

    /// Moves the round clock forward and fires every timer that came due,
    /// in deadline order. Runs while paused as well.
    pub fn advance_clock(&mut self, now: Duration, rng: &mut SessionRng) -> usize {
        self.clock = self.clock.max(now);
        let mut fired = 0;
        while !self.round_state.is_over() {
            let Some((due, event)) = self.timers.pop_due(self.clock) else {
                break;
            };
            self.fire(due, event, rng);
            fired += 1;
        }
        fired
    }

    fn fire(&mut self, due: Duration, event: TimerEvent, rng: &mut SessionRng) {
        let grid_size = self.grid_size();
        match event {
            TimerEvent::FoodExpired(id) => {
                self.with_spawn_context(due, rng, |foods, ctx| foods.expire(id, ctx));
            }
            TimerEvent::TimedSpecialSpawn => {
                self.with_spawn_context(due, rng, |foods, ctx| foods.spawn_timed_special(ctx));
            }
            TimerEvent::RandomReroll => {
                self.with_spawn_context(due, rng, |foods, ctx| foods.reroll(ctx));
            }
            TimerEvent::PortalCooldownEnd(color) => self.portals.end_cooldown(color),
            TimerEvent::PortalRelocate(color) => {
                if let Err(e) = self.portals.relocate(color, grid_size, rng) {
                    log!("Keeping {} portals in place: {}", color, e);
                }
            }
        }
    }

    /// One movement step.
    pub fn update(&mut self, rng: &mut SessionRng) -> TickOutcome {
        if self.round_state != RoundState::Running {
            return TickOutcome::Idle;
        }

        let grid_size = self.grid_size();
        self.snake.apply_pending_direction();
        let mut next_head = self.snake.head().step(self.snake.direction);
        let mut teleported = false;

        match self.settings.wall_mode {
            WallMode::Portal => {
                if let Some(teleport) =
                    self.portals
                        .try_teleport(next_head, grid_size, self.clock, &mut self.timers)
                {
                    next_head = teleport.position;
                    self.snake.direction = teleport.direction;
                    teleported = true;
                } else if !in_bounds(next_head, grid_size) {
                    return self.end_round(DeathReason::WallCollision);
                }
            }
            WallMode::Wrap => next_head = wrap(next_head, grid_size),
            WallMode::Collision => {
                if !in_bounds(next_head, grid_size) {
                    return self.end_round(DeathReason::WallCollision);
                }
            }
        }

        if self.snake.occupies(next_head) {
            return self.end_round(DeathReason::SelfCollision);
        }
        if self.obstacles.contains(&next_head) {
            return self.end_round(DeathReason::ObstacleCollision);
        }

        let length_before = self.snake.len();
        let food_here = self.foods.item_at(next_head).is_some();
        self.snake.advance(next_head, food_here);

        let eaten = if food_here {
            let now = self.clock;
            self.with_spawn_context(now, rng, |foods, ctx| foods.consume(next_head, ctx))
        } else {
            None
        };
        if let Some(kind) = eaten {
            self.apply_food_effect(kind, length_before);
        }

        self.tick += 1;
        TickOutcome::Moved { teleported, eaten }
    }

    fn apply_food_effect(&mut self, kind: FoodKind, length_before: usize) {
        self.score += kind.score_value();
        match kind {
            FoodKind::Regular => {}
            FoodKind::Golden => {
                self.tick_interval = sped_up(self.tick_interval);
                log!("Speed up: tick interval now {} ms", self.tick_interval.as_millis());
            }
            FoodKind::Purple => {
                self.snake
                    .truncate(length_before.saturating_sub(PURPLE_SHRINK).max(1));
            }
        }
    }

    fn end_round(&mut self, reason: DeathReason) -> TickOutcome {
        self.round_state = RoundState::GameOver(reason);
        log!("Game over: snake {} at tick {}, score {}", reason, self.tick, self.score);
        TickOutcome::GameOver(reason)
    }

    fn with_spawn_context<R>(
        &mut self,
        now: Duration,
        rng: &mut SessionRng,
        f: impl FnOnce(&mut FoodField, &mut SpawnContext<'_>) -> R,
    ) -> R {
        let snake = &self.snake;
        let obstacles = &self.obstacles;
        let blocked = |p: Point| snake.occupies(p) || obstacles.contains(&p);
        let mut ctx = SpawnContext {
            grid_size: self.settings.grid_size(),
            now,
            rng,
            timers: &mut self.timers,
            blocked: &blocked,
        };
        f(&mut self.foods, &mut ctx)
    }

    pub fn snapshot(&self) -> SnakeSnapshot {
        let grid_size = self.grid_size();
        let mut obstacles: Vec<Point> = self.obstacles.iter().copied().collect();
        obstacles.sort_by_key(|p| (p.y, p.x));

        SnakeSnapshot {
            tick: self.tick,
            grid_size: self.settings.grid_size,
            wall_mode: self.settings.wall_mode,
            theme: self.settings.theme,
            snake: self.snake.body.iter().copied().collect(),
            direction: self.snake.direction,
            foods: self.foods.items.clone(),
            obstacles,
            portals: self
                .portals
                .portals
                .iter()
                .map(|p| PortalView::new(p, grid_size, self.portals.is_cooling_down(p.color)))
                .collect(),
            score: self.score,
            tick_interval_ms: self.tick_interval.as_millis() as u64,
            round_state: self.round_state,
        }
    }
}
