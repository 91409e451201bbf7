use serde::{Deserialize, Serialize};

use super::food::FoodItem;
use super::portal::Portal;
use super::types::{DeathReason, Direction, Edge, Orientation, Point, PortalColor, RoundState, Theme, WallMode};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortalView {
    pub color: PortalColor,
    pub edge: Edge,
    pub orientation: Orientation,
    pub start: Point,
    pub end: Point,
    pub size: usize,
    pub cooling_down: bool,
}

impl PortalView {
    pub fn new(portal: &Portal, grid_size: usize, cooling_down: bool) -> Self {
        Self {
            color: portal.color,
            edge: portal.edge,
            orientation: portal.orientation(),
            start: portal.start(grid_size),
            end: portal.end(grid_size),
            size: portal.size,
            cooling_down,
        }
    }
}

/// Read-only view of a round handed to whatever draws it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnakeSnapshot {
    pub tick: u64,
    pub grid_size: u32,
    pub wall_mode: WallMode,
    pub theme: Theme,
    pub snake: Vec<Point>,
    pub direction: Direction,
    pub foods: Vec<FoodItem>,
    pub obstacles: Vec<Point>,
    pub portals: Vec<PortalView>,
    pub score: u32,
    pub tick_interval_ms: u64,
    pub round_state: RoundState,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameOverSummary {
    pub score: u32,
    pub reason: DeathReason,
    pub ticks: u64,
    pub is_new_high_score: bool,
}
