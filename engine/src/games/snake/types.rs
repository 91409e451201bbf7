use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Grid cell. Coordinates are signed so a prospective head can sit one step
/// outside the board before the wall policy resolves it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Screen coordinates: y grows downward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    pub fn is_opposite(&self, other: &Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
                | (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallMode {
    Wrap,
    Collision,
    Portal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleDensity {
    None,
    Few,
    Medium,
    Many,
}

impl ObstacleDensity {
    /// Share of the board covered, in percent.
    pub fn percent(self) -> usize {
        match self {
            ObstacleDensity::None => 0,
            ObstacleDensity::Few => 5,
            ObstacleDensity::Medium => 10,
            ObstacleDensity::Many => 15,
        }
    }

    pub fn obstacle_count(self, grid_size: usize) -> usize {
        grid_size * grid_size * self.percent() / 100
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodSpawnMode {
    Normal,
    Mixed,
    Timed,
    Random,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodKind {
    Regular,
    Golden,
    Purple,
}

impl FoodKind {
    pub fn is_special(self) -> bool {
        !matches!(self, FoodKind::Regular)
    }

    pub fn score_value(self) -> u32 {
        match self {
            FoodKind::Regular => 1,
            FoodKind::Golden => 5,
            FoodKind::Purple => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
    Colorful,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortalColor {
    Blue,
    Green,
}

impl PortalColor {
    pub const ALL: [PortalColor; 2] = [PortalColor::Blue, PortalColor::Green];
}

impl fmt::Display for PortalColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortalColor::Blue => write!(f, "blue"),
            PortalColor::Green => write!(f, "green"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Board side a portal sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    pub fn orientation(self) -> Orientation {
        match self {
            Edge::Top | Edge::Bottom => Orientation::Horizontal,
            Edge::Left | Edge::Right => Orientation::Vertical,
        }
    }

    /// Direction that leads away from this edge into the board.
    pub fn inward(self) -> Direction {
        match self {
            Edge::Top => Direction::Down,
            Edge::Bottom => Direction::Up,
            Edge::Left => Direction::Right,
            Edge::Right => Direction::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
    ObstacleCollision,
}

impl fmt::Display for DeathReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeathReason::WallCollision => write!(f, "hit a wall"),
            DeathReason::SelfCollision => write!(f, "bit itself"),
            DeathReason::ObstacleCollision => write!(f, "hit an obstacle"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    Running,
    Paused,
    GameOver(DeathReason),
}

impl RoundState {
    pub fn is_over(&self) -> bool {
        matches!(self, RoundState::GameOver(_))
    }
}

macro_rules! lowercase_from_str {
    ($ty:ty, $what:literal, [$($name:literal => $variant:expr),+ $(,)?]) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($name => Ok($variant),)+
                    other => Err(format!(
                        "Unknown {} '{}', expected one of: {}",
                        $what,
                        other,
                        [$($name),+].join(", ")
                    )),
                }
            }
        }
    };
}

lowercase_from_str!(WallMode, "wall mode", [
    "wrap" => WallMode::Wrap,
    "collision" => WallMode::Collision,
    "portal" => WallMode::Portal,
]);

lowercase_from_str!(ObstacleDensity, "obstacle density", [
    "none" => ObstacleDensity::None,
    "few" => ObstacleDensity::Few,
    "medium" => ObstacleDensity::Medium,
    "many" => ObstacleDensity::Many,
]);

lowercase_from_str!(FoodSpawnMode, "fruit spawn mode", [
    "normal" => FoodSpawnMode::Normal,
    "mixed" => FoodSpawnMode::Mixed,
    "timed" => FoodSpawnMode::Timed,
    "random" => FoodSpawnMode::Random,
]);

lowercase_from_str!(Theme, "theme", [
    "dark" => Theme::Dark,
    "light" => Theme::Light,
    "colorful" => Theme::Colorful,
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medium_density_on_20_grid_is_40() {
        assert_eq!(ObstacleDensity::Medium.obstacle_count(20), 40);
    }

    #[test]
    fn test_density_count_is_floored() {
        assert_eq!(ObstacleDensity::Few.obstacle_count(15), 11);
        assert_eq!(ObstacleDensity::Many.obstacle_count(25), 93);
    }

    #[test]
    fn test_edge_inward_is_perpendicular() {
        for edge in Edge::ALL {
            let (dx, dy) = edge.inward().delta();
            match edge.orientation() {
                Orientation::Horizontal => assert_eq!(dx, 0),
                Orientation::Vertical => assert_eq!(dy, 0),
            }
        }
    }

    #[test]
    fn test_unknown_wall_mode_is_rejected() {
        let err = "bouncy".parse::<WallMode>().unwrap_err();
        assert!(err.contains("bouncy"));
        assert_eq!("Portal".parse::<WallMode>().unwrap(), WallMode::Portal);
    }
}
