pub mod error;
pub mod food;
pub mod game_state;
pub mod grid;
pub mod obstacles;
pub mod portal;
pub mod session;
pub mod settings;
pub mod snake;
pub mod snapshot;
pub mod timers;
pub mod types;

pub use error::{PlacementError, SetupError};
pub use food::{FoodField, FoodId, FoodItem};
pub use game_state::{SnakeGameState, TickOutcome};
pub use portal::{Portal, PortalField};
pub use session::{SessionCommand, SessionSummary, SnakeSession};
pub use settings::{GameSettings, SpeedPreset};
pub use snake::Snake;
pub use snapshot::{GameOverSummary, PortalView, SnakeSnapshot};
pub use types::{
    DeathReason, Direction, Edge, FoodKind, FoodSpawnMode, ObstacleDensity, Orientation, Point,
    PortalColor, RoundState, Theme, WallMode,
};
