mod config;
mod input;
mod terminal_broadcaster;

use clap::Parser;
use snake_engine::config::FileContentProvider;
use snake_engine::games::SessionRng;
use snake_engine::games::snake::{GameSettings, SnakeSession, SpeedPreset, WallMode};
use snake_engine::high_scores::{HighScoreStore, YamlHighScoreStore};
use snake_engine::logger;
use snake_engine::log;
use tokio::sync::mpsc;

use config::{Validate, CONFIG_FILE};
use terminal_broadcaster::TerminalBroadcaster;

#[derive(Parser)]
#[command(name = "snake_terminal_client")]
struct Args {
    /// YAML config file; defaults are used when it does not exist
    #[arg(long, default_value = CONFIG_FILE)]
    config: String,

    /// slow, normal or fast
    #[arg(long)]
    speed: Option<SpeedPreset>,

    #[arg(long)]
    grid_size: Option<u32>,

    /// wrap, collision or portal
    #[arg(long)]
    wall_mode: Option<WallMode>,

    /// Replays a round exactly when reused
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    use_log_prefix: bool,
}

fn apply_overrides(game: &mut GameSettings, args: &Args) {
    if let Some(speed) = args.speed {
        game.speed_ms = speed.interval_ms();
    }
    if let Some(grid_size) = args.grid_size {
        game.grid_size = grid_size;
    }
    if let Some(wall_mode) = args.wall_mode {
        game.wall_mode = wall_mode;
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Snake".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let mut config = config::get_config_manager(&args.config).get_config()?;
    apply_overrides(&mut config.game, &args);
    config.game.validate()?;

    let rng = match args.seed {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };
    let high_scores = YamlHighScoreStore::new(FileContentProvider::new(config.high_score_file.clone()));
    if let Some(best) = high_scores.load()?.best() {
        log!("Best score so far: {}", best);
    }

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    input::spawn_input_reader(command_tx);

    println!("w/a/s/d + Enter to steer, p to pause, r to restart, q to quit");
    let summary = SnakeSession::run(
        config.game,
        rng,
        command_rx,
        TerminalBroadcaster::new(),
        high_scores,
    )
    .await?;

    println!(
        "Played {} rounds, best score {}",
        summary.rounds_played, summary.best_score
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::parse_from([
            "snake_terminal_client",
            "--speed",
            "fast",
            "--grid-size",
            "25",
            "--wall-mode",
            "wrap",
            "--seed",
            "7",
        ]);
        let mut game = GameSettings::default();

        apply_overrides(&mut game, &args);

        assert_eq!(game.speed_ms, 100);
        assert_eq!(game.grid_size, 25);
        assert_eq!(game.wall_mode, WallMode::Wrap);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.config, CONFIG_FILE);
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let args = Args::parse_from(["snake_terminal_client"]);
        let mut game = GameSettings::default();

        apply_overrides(&mut game, &args);

        assert_eq!(game, GameSettings::default());
    }

    #[test]
    fn test_unknown_wall_mode_is_rejected() {
        let result = Args::try_parse_from(["snake_terminal_client", "--wall-mode", "bouncy"]);
        assert!(result.is_err());
    }
}
