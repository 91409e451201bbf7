use std::ops::Range;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::games::SessionRng;
use crate::log;
use super::grid::random_free_cell;
use super::timers::{TimerEvent, TimerQueue};
use super::types::{FoodKind, FoodSpawnMode, Point};

pub const SPECIAL_FOOD_LIFETIME: Duration = Duration::from_secs(10);
/// Chance that a mixed-mode spawn is golden or purple instead of regular.
pub const SPECIAL_FOOD_CHANCE: f64 = 0.1;
pub const SPECIAL_SPAWN_INTERVAL: Range<Duration> = Duration::from_secs(10)..Duration::from_secs(60);
pub const RANDOM_REROLL_DIVISOR: u32 = 3;
pub const RANDOM_REGULAR_CHANCE: f64 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FoodId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: FoodId,
    pub position: Point,
    pub kind: FoodKind,
}

/// What a food operation needs from the rest of the board.
pub struct SpawnContext<'a> {
    pub grid_size: usize,
    pub now: Duration,
    pub rng: &'a mut SessionRng,
    pub timers: &'a mut TimerQueue,
    /// Cells taken by the snake or obstacles.
    pub blocked: &'a dyn Fn(Point) -> bool,
}

#[derive(Clone, Debug)]
pub struct FoodField {
    pub items: Vec<FoodItem>,
    pub mode: FoodSpawnMode,
    next_id: u64,
}

impl FoodField {
    pub fn new(mode: FoodSpawnMode) -> Self {
        Self {
            items: Vec::new(),
            mode,
            next_id: 0,
        }
    }

    pub fn item_at(&self, p: Point) -> Option<&FoodItem> {
        self.items.iter().find(|item| item.position == p)
    }

    pub fn get(&self, id: FoodId) -> Option<&FoodItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn count_of(&self, kind: FoodKind) -> usize {
        self.items.iter().filter(|item| item.kind == kind).count()
    }

    /// Seeds the board for a fresh round and arms the mode's recurring timer.
    pub fn start_round(&mut self, ctx: &mut SpawnContext<'_>) {
        self.items.clear();
        self.spawn_replacement(ctx);

        match self.mode {
            FoodSpawnMode::Normal | FoodSpawnMode::Mixed => {}
            FoodSpawnMode::Timed => Self::schedule_timed_spawn(ctx),
            FoodSpawnMode::Random => Self::schedule_random_reroll(ctx),
        }
    }

    /// Removes the item at `p` and replenishes the board. Returns the eaten kind.
    pub fn consume(&mut self, p: Point, ctx: &mut SpawnContext<'_>) -> Option<FoodKind> {
        let index = self.items.iter().position(|item| item.position == p)?;
        let eaten = self.items.remove(index);
        ctx.timers.cancel_food_expiry(eaten.id);

        log!("Ate {:?} food at ({}, {})", eaten.kind, p.x, p.y);

        if eaten.kind == FoodKind::Regular || self.items.is_empty() {
            self.spawn_replacement(ctx);
        }
        Some(eaten.kind)
    }

    /// Drops an uneaten special item. Ids already gone are ignored.
    pub fn expire(&mut self, id: FoodId, ctx: &mut SpawnContext<'_>) -> bool {
        let Some(index) = self.items.iter().position(|item| item.id == id) else {
            return false;
        };
        let expired = self.items.remove(index);
        log!(
            "{:?} food at ({}, {}) expired",
            expired.kind,
            expired.position.x,
            expired.position.y
        );

        if self.items.is_empty() {
            self.spawn_replacement(ctx);
        }
        true
    }

    /// Timed mode cadence: one special item now, the next one later.
    pub fn spawn_timed_special(&mut self, ctx: &mut SpawnContext<'_>) -> Option<FoodId> {
        let kind = Self::roll_special_kind(ctx.rng);
        let id = self.place(kind, true, ctx);
        Self::schedule_timed_spawn(ctx);
        id
    }

    /// Random mode: the whole food set is replaced by one fresh item.
    pub fn reroll(&mut self, ctx: &mut SpawnContext<'_>) -> Option<FoodId> {
        for item in self.items.drain(..) {
            ctx.timers.cancel_food_expiry(item.id);
        }

        let kind = if ctx.rng.chance(RANDOM_REGULAR_CHANCE) {
            FoodKind::Regular
        } else {
            Self::roll_special_kind(ctx.rng)
        };
        let id = self.place(kind, false, ctx);
        Self::schedule_random_reroll(ctx);
        id
    }

    /// The spawn that follows a regular item being eaten.
    fn spawn_replacement(&mut self, ctx: &mut SpawnContext<'_>) -> Option<FoodId> {
        match self.mode {
            FoodSpawnMode::Mixed if ctx.rng.chance(SPECIAL_FOOD_CHANCE) => {
                let kind = Self::roll_special_kind(ctx.rng);
                self.place(kind, true, ctx)
            }
            FoodSpawnMode::Normal
            | FoodSpawnMode::Mixed
            | FoodSpawnMode::Timed
            | FoodSpawnMode::Random => self.place(FoodKind::Regular, false, ctx),
        }
    }

    fn place(&mut self, kind: FoodKind, expires: bool, ctx: &mut SpawnContext<'_>) -> Option<FoodId> {
        let items = &self.items;
        let blocked = ctx.blocked;
        let position = random_free_cell(ctx.grid_size, ctx.rng, |p| {
            blocked(p) || items.iter().any(|item| item.position == p)
        });

        let Some(position) = position else {
            log!("No free cell left for {:?} food", kind);
            return None;
        };

        let id = FoodId(self.next_id);
        self.next_id += 1;
        self.items.push(FoodItem { id, position, kind });

        if expires {
            ctx.timers
                .schedule(ctx.now + SPECIAL_FOOD_LIFETIME, TimerEvent::FoodExpired(id));
        }
        log!("Spawned {:?} food at ({}, {})", kind, position.x, position.y);
        Some(id)
    }

    fn roll_special_kind(rng: &mut SessionRng) -> FoodKind {
        if rng.chance(0.5) {
            FoodKind::Golden
        } else {
            FoodKind::Purple
        }
    }

    fn schedule_timed_spawn(ctx: &mut SpawnContext<'_>) {
        let delay = ctx.rng.random_duration(SPECIAL_SPAWN_INTERVAL);
        ctx.timers.schedule(ctx.now + delay, TimerEvent::TimedSpecialSpawn);
    }

    fn schedule_random_reroll(ctx: &mut SpawnContext<'_>) {
        let range = SPECIAL_SPAWN_INTERVAL.start / RANDOM_REROLL_DIVISOR
            ..SPECIAL_SPAWN_INTERVAL.end / RANDOM_REROLL_DIVISOR;
        let delay = ctx.rng.random_duration(range);
        ctx.timers.schedule(ctx.now + delay, TimerEvent::RandomReroll);
    }
}
