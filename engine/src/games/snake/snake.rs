use std::collections::VecDeque;

use super::grid::occupied;
use super::types::{Direction, Point};

#[derive(Clone, Debug)]
pub struct Snake {
    /// Head first. Never empty.
    pub body: VecDeque<Point>,
    pub direction: Direction,
    pub pending_direction: Option<Direction>,
}

impl Snake {
    pub fn new(start_pos: Point, direction: Direction) -> Self {
        Self {
            body: VecDeque::from([start_pos]),
            direction,
            pending_direction: None,
        }
    }

    pub fn from_body(body: impl IntoIterator<Item = Point>, direction: Direction) -> Self {
        let body: VecDeque<Point> = body.into_iter().collect();
        assert!(!body.is_empty(), "Snake body must have at least one segment");
        Self {
            body,
            direction,
            pending_direction: None,
        }
    }

    pub fn head(&self) -> Point {
        *self.body.front().expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn occupies(&self, p: Point) -> bool {
        occupied(p, &self.body)
    }

    /// Buffers a turn for the next tick. Reversals onto the current heading
    /// are refused.
    pub fn queue_direction(&mut self, direction: Direction) -> bool {
        if direction.is_opposite(&self.direction) {
            return false;
        }
        self.pending_direction = Some(direction);
        true
    }

    pub fn apply_pending_direction(&mut self) {
        if let Some(direction) = self.pending_direction.take() {
            self.direction = direction;
        }
    }

    pub fn advance(&mut self, new_head: Point, grow: bool) {
        self.body.push_front(new_head);
        if !grow {
            self.body.pop_back();
        }
    }

    /// Cuts segments off the tail, always keeping the head.
    pub fn truncate(&mut self, len: usize) {
        self.body.truncate(len.max(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupies_covers_whole_body_including_tail() {
        let snake = Snake::from_body(
            [Point::new(4, 4), Point::new(3, 4), Point::new(2, 4)],
            Direction::Right,
        );
        assert!(snake.occupies(Point::new(4, 4)));
        assert!(snake.occupies(Point::new(2, 4)));
        assert!(!snake.occupies(Point::new(5, 4)));
    }

    #[test]
    fn test_reverse_turn_is_refused() {
        let mut snake = Snake::new(Point::new(5, 5), Direction::Right);
        assert!(!snake.queue_direction(Direction::Left));
        assert_eq!(snake.pending_direction, None);
        assert!(snake.queue_direction(Direction::Up));
    }

    #[test]
    fn test_two_quick_turns_cannot_reverse() {
        let mut snake = Snake::new(Point::new(5, 5), Direction::Right);
        assert!(snake.queue_direction(Direction::Up));
        // Still moving right until the next tick applies the turn.
        assert!(!snake.queue_direction(Direction::Left));
        snake.apply_pending_direction();
        assert_eq!(snake.direction, Direction::Up);
    }

    #[test]
    fn test_advance_and_grow() {
        let mut snake = Snake::new(Point::new(5, 5), Direction::Right);
        snake.advance(Point::new(6, 5), true);
        assert_eq!(snake.len(), 2);
        snake.advance(Point::new(7, 5), false);
        assert_eq!(snake.body, VecDeque::from([Point::new(7, 5), Point::new(6, 5)]));
    }

    #[test]
    fn test_truncate_keeps_head() {
        let mut snake = Snake::from_body([Point::new(3, 1), Point::new(2, 1)], Direction::Right);
        snake.truncate(0);
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Point::new(3, 1));
    }
}
