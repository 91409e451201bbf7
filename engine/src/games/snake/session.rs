use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, sleep_until, Instant, Interval, MissedTickBehavior};

use crate::games::{GameBroadcaster, SessionRng};
use crate::high_scores::HighScoreStore;
use crate::log;
use super::game_state::{SnakeGameState, TickOutcome};
use super::settings::GameSettings;
use super::snapshot::GameOverSummary;
use super::types::Direction;

#[derive(Clone, Debug, PartialEq)]
pub enum SessionCommand {
    Turn(Direction),
    TogglePause,
    Reset,
    UpdateSettings(GameSettings),
    Quit,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub rounds_played: u32,
    pub best_score: u32,
    pub last_score: u32,
}

pub struct SnakeSession;

impl SnakeSession {
    /// Drives rounds until `Quit` arrives or the command channel closes.
    /// Ticks, timer deadlines and commands are handled one at a time by
    /// this task, which is the only owner of the game state.
    pub async fn run(
        settings: GameSettings,
        mut rng: SessionRng,
        mut commands: mpsc::UnboundedReceiver<SessionCommand>,
        broadcaster: impl GameBroadcaster,
        high_scores: impl HighScoreStore,
    ) -> Result<SessionSummary, String> {
        let mut state = SnakeGameState::new(settings, &mut rng).map_err(|e| e.to_string())?;
        let mut summary = SessionSummary::default();

        let mut round_started = Instant::now();
        let mut tick_period = state.tick_interval;
        let mut ticker = new_ticker(tick_period);

        log!("Session started with seed {}", rng.seed());
        broadcaster.broadcast_state(state.snapshot()).await;

        loop {
            let timer_deadline = state.next_timer_deadline().map(|d| round_started + d);

            tokio::select! {
                _ = ticker.tick() => {
                    let fired = state.advance_clock(round_started.elapsed(), &mut rng);
                    match state.update(&mut rng) {
                        TickOutcome::Idle => {
                            if fired > 0 {
                                broadcaster.broadcast_state(state.snapshot()).await;
                            }
                        }
                        TickOutcome::Moved { .. } => {
                            broadcaster.broadcast_state(state.snapshot()).await;
                        }
                        TickOutcome::GameOver(reason) => {
                            let is_new_high_score = match high_scores.add_high_score(state.score) {
                                Ok(ranked) => {
                                    if ranked {
                                        log!("Score {} entered the high-score table", state.score);
                                    }
                                    ranked
                                }
                                Err(e) => {
                                    log!("Failed to record high score: {}", e);
                                    false
                                }
                            };
                            summary.rounds_played += 1;
                            summary.last_score = state.score;
                            summary.best_score = summary.best_score.max(state.score);

                            broadcaster.broadcast_state(state.snapshot()).await;
                            broadcaster.broadcast_game_over(GameOverSummary {
                                score: state.score,
                                reason,
                                ticks: state.tick,
                                is_new_high_score,
                            }).await;
                        }
                    }

                    if state.tick_interval != tick_period {
                        tick_period = state.tick_interval;
                        ticker = new_ticker(tick_period);
                    }
                }
                _ = sleep_until_deadline(timer_deadline) => {
                    if state.advance_clock(round_started.elapsed(), &mut rng) > 0 {
                        broadcaster.broadcast_state(state.snapshot()).await;
                    }
                }
                command = commands.recv() => {
                    let Some(command) = command else {
                        log!("Command channel closed, ending session");
                        break;
                    };
                    let restarted = match command {
                        SessionCommand::Turn(direction) => {
                            state.set_direction(direction);
                            false
                        }
                        SessionCommand::TogglePause => {
                            let round_state = state.toggle_pause();
                            log!("Round state: {:?}", round_state);
                            broadcaster.broadcast_state(state.snapshot()).await;
                            false
                        }
                        SessionCommand::Reset => match state.reset(&mut rng) {
                            Ok(()) => true,
                            Err(e) => {
                                log!("Reset failed, keeping current round: {}", e);
                                false
                            }
                        },
                        SessionCommand::UpdateSettings(new_settings) => {
                            match state.update_settings(new_settings, &mut rng) {
                                Ok(restarted) => restarted,
                                Err(e) => {
                                    log!("Settings rejected, keeping current round: {}", e);
                                    false
                                }
                            }
                        }
                        SessionCommand::Quit => break,
                    };

                    if restarted {
                        round_started = Instant::now();
                        tick_period = state.tick_interval;
                        ticker = new_ticker(tick_period);
                        broadcaster.broadcast_state(state.snapshot()).await;
                    }
                }
            }
        }

        log!(
            "Session ended after {} rounds, best score {}",
            summary.rounds_played,
            summary.best_score
        );
        Ok(summary)
    }
}

fn new_ticker(period: Duration) -> Interval {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
