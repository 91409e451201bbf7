use std::future::Future;

use super::snake::{GameOverSummary, SnakeSnapshot};

/// Outbound sink for round snapshots. Implementations draw or forward them;
/// the simulation never depends on how.
pub trait GameBroadcaster: Send + Sync + Clone + 'static {
    fn broadcast_state(&self, snapshot: SnakeSnapshot) -> impl Future<Output = ()> + Send;

    fn broadcast_game_over(&self, summary: GameOverSummary) -> impl Future<Output = ()> + Send;
}
