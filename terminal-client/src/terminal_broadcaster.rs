use std::io::Write;

use snake_engine::games::GameBroadcaster;
use snake_engine::games::snake::{
    Edge, FoodKind, GameOverSummary, Point, PortalColor, RoundState, SnakeSnapshot, Theme, WallMode,
};
use snake_engine::log;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const RESET: &str = "\x1b[0m";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Glyph {
    Empty,
    Head,
    Body,
    Obstacle,
    Food(FoodKind),
    Portal(PortalColor, bool),
    Wall,
    Corner,
}

impl Glyph {
    fn symbol(self) -> char {
        match self {
            Glyph::Empty => '.',
            Glyph::Head => '@',
            Glyph::Body => 'o',
            Glyph::Obstacle => '#',
            Glyph::Food(FoodKind::Regular) => '*',
            Glyph::Food(FoodKind::Golden) => '$',
            Glyph::Food(FoodKind::Purple) => '%',
            Glyph::Portal(PortalColor::Blue, false) => 'B',
            Glyph::Portal(PortalColor::Blue, true) => 'b',
            Glyph::Portal(PortalColor::Green, false) => 'G',
            Glyph::Portal(PortalColor::Green, true) => 'g',
            Glyph::Wall => '=',
            Glyph::Corner => '+',
        }
    }

    fn color(self, theme: Theme) -> Option<&'static str> {
        if theme != Theme::Colorful {
            return None;
        }
        match self {
            Glyph::Empty | Glyph::Wall | Glyph::Corner => None,
            Glyph::Head => Some("\x1b[1;32m"),
            Glyph::Body => Some("\x1b[32m"),
            Glyph::Obstacle => Some("\x1b[90m"),
            Glyph::Food(FoodKind::Regular) => Some("\x1b[31m"),
            Glyph::Food(FoodKind::Golden) => Some("\x1b[33m"),
            Glyph::Food(FoodKind::Purple) => Some("\x1b[35m"),
            Glyph::Portal(PortalColor::Blue, _) => Some("\x1b[34m"),
            Glyph::Portal(PortalColor::Green, _) => Some("\x1b[36m"),
        }
    }
}

fn portal_on_border(snapshot: &SnakeSnapshot, edge: Edge, along: i32) -> Option<Glyph> {
    snapshot
        .portals
        .iter()
        .find(|p| {
            let (from, to) = match edge {
                Edge::Top | Edge::Bottom => (p.start.x, p.end.x),
                Edge::Left | Edge::Right => (p.start.y, p.end.y),
            };
            p.edge == edge && along >= from && along <= to
        })
        .map(|p| Glyph::Portal(p.color, p.cooling_down))
}

fn cell_glyph(snapshot: &SnakeSnapshot, p: Point) -> Glyph {
    if snapshot.snake.first() == Some(&p) {
        Glyph::Head
    } else if snapshot.snake.contains(&p) {
        Glyph::Body
    } else if let Some(food) = snapshot.foods.iter().find(|f| f.position == p) {
        Glyph::Food(food.kind)
    } else if snapshot.obstacles.contains(&p) {
        Glyph::Obstacle
    } else {
        Glyph::Empty
    }
}

fn border_glyph(snapshot: &SnakeSnapshot, edge: Edge, along: i32) -> Glyph {
    if let Some(portal) = portal_on_border(snapshot, edge, along) {
        return portal;
    }
    match snapshot.wall_mode {
        WallMode::Wrap => Glyph::Empty,
        WallMode::Collision | WallMode::Portal => Glyph::Wall,
    }
}

fn push_glyph(out: &mut String, glyph: Glyph, theme: Theme) {
    match glyph.color(theme) {
        Some(color) => {
            out.push_str(color);
            out.push(glyph.symbol());
            out.push_str(RESET);
        }
        None => out.push(glyph.symbol()),
    }
}

/// Draws the board with a one-cell frame. Portals show on the frame next
/// to the edge cells they cover.
pub fn render(snapshot: &SnakeSnapshot) -> String {
    let n = snapshot.grid_size as i32;
    let theme = snapshot.theme;
    let mut out = String::new();

    let horizontal = |out: &mut String, edge: Edge| {
        push_glyph(out, Glyph::Corner, theme);
        for x in 0..n {
            push_glyph(out, border_glyph(snapshot, edge, x), theme);
        }
        push_glyph(out, Glyph::Corner, theme);
        out.push('\n');
    };

    horizontal(&mut out, Edge::Top);
    for y in 0..n {
        push_glyph(&mut out, border_glyph(snapshot, Edge::Left, y), theme);
        for x in 0..n {
            push_glyph(&mut out, cell_glyph(snapshot, Point::new(x, y)), theme);
        }
        push_glyph(&mut out, border_glyph(snapshot, Edge::Right, y), theme);
        out.push('\n');
    }
    horizontal(&mut out, Edge::Bottom);

    let status = match snapshot.round_state {
        RoundState::Running => "running".to_string(),
        RoundState::Paused => "paused (p to resume)".to_string(),
        RoundState::GameOver(reason) => format!("game over: {} (r to restart)", reason),
    };
    out.push_str(&format!(
        "Score: {}  Length: {}  Tick: {} ms  {}\n",
        snapshot.score,
        snapshot.snake.len(),
        snapshot.tick_interval_ms,
        status
    ));
    out
}

#[derive(Clone, Default)]
pub struct TerminalBroadcaster;

impl TerminalBroadcaster {
    pub fn new() -> Self {
        Self
    }
}

impl GameBroadcaster for TerminalBroadcaster {
    async fn broadcast_state(&self, snapshot: SnakeSnapshot) {
        let frame = render(&snapshot);
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = write!(stdout, "{}{}", CLEAR_SCREEN, frame).and_then(|_| stdout.flush()) {
            log!("Failed to draw frame: {}", e);
        }
    }

    async fn broadcast_game_over(&self, summary: GameOverSummary) {
        let mut line = format!("Final score {} after {} moves.", summary.score, summary.ticks);
        if summary.is_new_high_score {
            line.push_str(" New high score!");
        }
        println!("{}", line);
    }
}
