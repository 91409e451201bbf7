use std::io::BufRead;
use std::thread::JoinHandle;

use snake_engine::games::snake::{Direction, SessionCommand};
use snake_engine::log;
use tokio::sync::mpsc;

/// Maps one typed line to a command. Unknown input is ignored.
pub fn parse_command(line: &str) -> Option<SessionCommand> {
    let command = match line.trim().to_ascii_lowercase().as_str() {
        "w" | "up" => SessionCommand::Turn(Direction::Up),
        "a" | "left" => SessionCommand::Turn(Direction::Left),
        "s" | "down" => SessionCommand::Turn(Direction::Down),
        "d" | "right" => SessionCommand::Turn(Direction::Right),
        "p" | "pause" | "" => SessionCommand::TogglePause,
        "r" | "reset" => SessionCommand::Reset,
        "q" | "quit" | "exit" => SessionCommand::Quit,
        _ => return None,
    };
    Some(command)
}

/// Reads stdin on its own thread; a blocked read can't be cancelled from async code.
pub fn spawn_input_reader(command_tx: mpsc::UnboundedSender<SessionCommand>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    log!("Failed to read input: {}", e);
                    break;
                }
            };
            let Some(command) = parse_command(&line) else {
                continue;
            };
            let quit = command == SessionCommand::Quit;
            if command_tx.send(command).is_err() || quit {
                return;
            }
        }
        let _ = command_tx.send(SessionCommand::Quit);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_keys() {
        assert_eq!(parse_command("w"), Some(SessionCommand::Turn(Direction::Up)));
        assert_eq!(parse_command("A"), Some(SessionCommand::Turn(Direction::Left)));
        assert_eq!(parse_command(" s \n"), Some(SessionCommand::Turn(Direction::Down)));
        assert_eq!(parse_command("right"), Some(SessionCommand::Turn(Direction::Right)));
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(parse_command("p"), Some(SessionCommand::TogglePause));
        assert_eq!(parse_command(""), Some(SessionCommand::TogglePause));
        assert_eq!(parse_command("r"), Some(SessionCommand::Reset));
        assert_eq!(parse_command("quit"), Some(SessionCommand::Quit));
    }

    #[test]
    fn test_unknown_input_is_ignored() {
        assert_eq!(parse_command("x"), None);
        assert_eq!(parse_command("wasd"), None);
    }
}
