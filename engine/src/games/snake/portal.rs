use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::games::SessionRng;
use crate::log;
use super::error::PlacementError;
use super::grid::in_bounds;
use super::timers::{TimerEvent, TimerQueue};
use super::types::{Direction, Edge, Orientation, Point, PortalColor};

pub const MIN_PORTAL_SIZE: usize = 2;
pub const MAX_PORTAL_SIZE: usize = 5;
pub const PORTAL_COOLDOWN: Duration = Duration::from_secs(1);
pub const PORTAL_RELOCATION_DELAY: Duration = Duration::from_secs(1);
const PLACEMENT_ATTEMPTS: usize = 1000;

/// A run of `size` edge cells starting `offset` cells along `edge`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portal {
    pub edge: Edge,
    pub offset: usize,
    pub size: usize,
    pub color: PortalColor,
}

impl Portal {
    pub fn orientation(&self) -> Orientation {
        self.edge.orientation()
    }

    fn last(&self) -> usize {
        self.offset + self.size - 1
    }

    pub fn contains_along(&self, along: usize) -> bool {
        along >= self.offset && along <= self.last()
    }

    /// Same wall line and intersecting spans.
    pub fn overlaps(&self, other: &Portal) -> bool {
        self.edge == other.edge && !(self.last() < other.offset || self.offset > other.last())
    }

    pub fn cell_at(&self, along: usize, grid_size: usize) -> Point {
        let along = along as i32;
        let far = grid_size as i32 - 1;
        match self.edge {
            Edge::Top => Point::new(along, 0),
            Edge::Bottom => Point::new(along, far),
            Edge::Left => Point::new(0, along),
            Edge::Right => Point::new(far, along),
        }
    }

    pub fn start(&self, grid_size: usize) -> Point {
        self.cell_at(self.offset, grid_size)
    }

    pub fn end(&self, grid_size: usize) -> Point {
        self.cell_at(self.last(), grid_size)
    }
}

/// Where the head comes out and which way it then moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Teleport {
    pub position: Point,
    pub direction: Direction,
}

#[derive(Clone, Debug, Default)]
pub struct PortalField {
    pub portals: Vec<Portal>,
    pub cooldowns: HashSet<PortalColor>,
}

impl PortalField {
    /// Two pairs, one per color, each pair sharing a random size.
    pub fn generate(grid_size: usize, rng: &mut SessionRng) -> Result<Self, PlacementError> {
        let mut field = Self::default();
        for color in PortalColor::ALL {
            let size = rng.random_range(MIN_PORTAL_SIZE..=MAX_PORTAL_SIZE);
            let pair = field.place_pair(color, size, grid_size, rng)?;
            field.portals.extend(pair);
        }
        Ok(field)
    }

    pub fn pair(&self, color: PortalColor) -> impl Iterator<Item = &Portal> {
        self.portals.iter().filter(move |p| p.color == color)
    }

    pub fn is_cooling_down(&self, color: PortalColor) -> bool {
        self.cooldowns.contains(&color)
    }

    /// Resolves a head that left the board. `None` means no open portal was
    /// hit and the move is an ordinary wall collision.
    pub fn try_teleport(
        &mut self,
        prospective: Point,
        grid_size: usize,
        now: Duration,
        timers: &mut TimerQueue,
    ) -> Option<Teleport> {
        if in_bounds(prospective, grid_size) {
            return None;
        }

        let n = grid_size as i32;
        let (edge, along) = if prospective.x < 0 {
            (Edge::Left, prospective.y)
        } else if prospective.x >= n {
            (Edge::Right, prospective.y)
        } else if prospective.y < 0 {
            (Edge::Top, prospective.x)
        } else {
            (Edge::Bottom, prospective.x)
        };
        let along = along.clamp(0, n - 1) as usize;

        let entry_index = self.portals.iter().position(|p| {
            p.edge == edge && p.contains_along(along) && !self.is_cooling_down(p.color)
        })?;
        let entry = self.portals[entry_index];
        let exit = self
            .portals
            .iter()
            .enumerate()
            .find(|(i, p)| *i != entry_index && p.color == entry.color)
            .map(|(_, p)| *p)?;

        let relative = (along - entry.offset) as f64 / entry.size as f64;
        let exit_along = ((exit.offset as f64 + relative * exit.size as f64).floor() as usize)
            .clamp(exit.offset, exit.last());

        self.cooldowns.insert(entry.color);
        timers.schedule(now + PORTAL_COOLDOWN, TimerEvent::PortalCooldownEnd(entry.color));
        timers.schedule(now + PORTAL_RELOCATION_DELAY, TimerEvent::PortalRelocate(entry.color));

        let teleport = Teleport {
            position: exit.cell_at(exit_along, grid_size),
            direction: exit.edge.inward(),
        };
        log!(
            "Teleported through {} portal: {:?} -> {:?} at ({}, {})",
            entry.color,
            entry.edge,
            exit.edge,
            teleport.position.x,
            teleport.position.y
        );
        Some(teleport)
    }

    pub fn end_cooldown(&mut self, color: PortalColor) {
        self.cooldowns.remove(&color);
    }

    /// Moves one color's pair somewhere new, keeping its size. On failure the
    /// old pair stays where it was.
    pub fn relocate(
        &mut self,
        color: PortalColor,
        grid_size: usize,
        rng: &mut SessionRng,
    ) -> Result<(), PlacementError> {
        let size = match self.pair(color).next() {
            Some(portal) => portal.size,
            None => rng.random_range(MIN_PORTAL_SIZE..=MAX_PORTAL_SIZE),
        };

        let others = Self {
            portals: self.portals.iter().copied().filter(|p| p.color != color).collect(),
            cooldowns: HashSet::new(),
        };
        let pair = others.place_pair(color, size, grid_size, rng)?;

        self.portals.retain(|p| p.color != color);
        self.portals.extend(pair);
        log!("Relocated {} portals", color);
        Ok(())
    }

    fn place_pair(
        &self,
        color: PortalColor,
        size: usize,
        grid_size: usize,
        rng: &mut SessionRng,
    ) -> Result<[Portal; 2], PlacementError> {
        let first = self.place_one(color, size, grid_size, rng, None)?;
        let second = self.place_one(color, size, grid_size, rng, Some(&first))?;
        Ok([first, second])
    }

    fn place_one(
        &self,
        color: PortalColor,
        size: usize,
        grid_size: usize,
        rng: &mut SessionRng,
        sibling: Option<&Portal>,
    ) -> Result<Portal, PlacementError> {
        if size > grid_size {
            return Err(PlacementError::Infeasible {
                what: "portal cells",
                requested: size,
                available: grid_size,
            });
        }

        for _ in 0..PLACEMENT_ATTEMPTS {
            let candidate = Portal {
                edge: Edge::ALL[rng.random_range(0..Edge::ALL.len())],
                offset: rng.random_range(0..=grid_size - size),
                size,
                color,
            };
            let collides = self
                .portals
                .iter()
                .chain(sibling)
                .any(|existing| existing.overlaps(&candidate));
            if !collides {
                return Ok(candidate);
            }
        }

        Err(PlacementError::AttemptsExhausted {
            what: "portal",
            attempts: PLACEMENT_ATTEMPTS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: usize = 20;

    fn portal(edge: Edge, offset: usize, size: usize, color: PortalColor) -> Portal {
        Portal { edge, offset, size, color }
    }

    fn assert_no_overlaps(portals: &[Portal]) {
        for (i, a) in portals.iter().enumerate() {
            for b in &portals[i + 1..] {
                assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_generate_places_two_pairs_without_overlap() {
        for seed in 0..50 {
            let mut rng = SessionRng::new(seed);
            let field = PortalField::generate(GRID, &mut rng).unwrap();

            assert_eq!(field.portals.len(), 4);
            for color in PortalColor::ALL {
                let sizes: Vec<usize> = field.pair(color).map(|p| p.size).collect();
                assert_eq!(sizes.len(), 2);
                assert_eq!(sizes[0], sizes[1]);
                assert!((MIN_PORTAL_SIZE..=MAX_PORTAL_SIZE).contains(&sizes[0]));
            }
            for p in &field.portals {
                assert!(in_bounds(p.start(GRID), GRID) && in_bounds(p.end(GRID), GRID));
            }
            assert_no_overlaps(&field.portals);
        }
    }

    #[test]
    fn test_generate_on_tiny_grid_is_infeasible() {
        let mut rng = SessionRng::new(3);
        let result = PortalField::generate(1, &mut rng);
        assert!(matches!(result, Err(PlacementError::Infeasible { available: 1, .. })));
    }

    #[test]
    fn test_relocate_gives_up_on_crowded_walls() {
        let mut field = PortalField {
            portals: Edge::ALL
                .iter()
                .map(|edge| portal(*edge, 0, GRID, PortalColor::Green))
                .collect(),
            cooldowns: HashSet::new(),
        };
        field.portals.push(portal(Edge::Top, 2, 3, PortalColor::Blue));
        let before = field.portals.clone();
        let mut rng = SessionRng::new(8);

        let result = field.relocate(PortalColor::Blue, GRID, &mut rng);

        assert_eq!(
            result,
            Err(PlacementError::AttemptsExhausted { what: "portal", attempts: PLACEMENT_ATTEMPTS })
        );
        assert_eq!(field.portals, before);
    }

    #[test]
    fn test_overlap_requires_same_edge() {
        let top = portal(Edge::Top, 3, 4, PortalColor::Blue);
        assert!(top.overlaps(&portal(Edge::Top, 6, 2, PortalColor::Green)));
        assert!(!top.overlaps(&portal(Edge::Top, 7, 2, PortalColor::Green)));
        assert!(!top.overlaps(&portal(Edge::Bottom, 3, 4, PortalColor::Green)));
        assert!(!top.overlaps(&portal(Edge::Left, 0, 5, PortalColor::Green)));
    }

    #[test]
    fn test_teleport_maps_relative_offset_and_points_inward() {
        let mut field = PortalField {
            portals: vec![
                portal(Edge::Right, 4, 4, PortalColor::Blue),
                portal(Edge::Top, 10, 2, PortalColor::Blue),
            ],
            cooldowns: HashSet::new(),
        };
        let mut timers = TimerQueue::new();

        // Head at (19, 6) moving right; relative offset 2/4 on the entry.
        let teleport = field
            .try_teleport(Point::new(20, 6), GRID, Duration::ZERO, &mut timers)
            .unwrap();

        // floor(10 + 0.5 * 2) = 11 along the top edge.
        assert_eq!(teleport.position, Point::new(11, 0));
        assert_eq!(teleport.direction, Direction::Down);
        assert!(field.is_cooling_down(PortalColor::Blue));
        assert_eq!(
            timers.deadline_of(&TimerEvent::PortalCooldownEnd(PortalColor::Blue)),
            Some(PORTAL_COOLDOWN)
        );
        assert_eq!(
            timers.deadline_of(&TimerEvent::PortalRelocate(PortalColor::Blue)),
            Some(PORTAL_RELOCATION_DELAY)
        );
    }

    #[test]
    fn test_exit_directions_for_every_edge() {
        let expected = [
            (Edge::Top, Point::new(2, 0), Direction::Down),
            (Edge::Bottom, Point::new(2, 19), Direction::Up),
            (Edge::Left, Point::new(0, 2), Direction::Right),
            (Edge::Right, Point::new(19, 2), Direction::Left),
        ];
        for (edge, cell, direction) in expected {
            let mut field = PortalField {
                portals: vec![
                    portal(Edge::Top, 15, 3, PortalColor::Green),
                    portal(edge, 2, 3, PortalColor::Green),
                ],
                cooldowns: HashSet::new(),
            };
            if edge == Edge::Top {
                field.portals[0] = portal(Edge::Left, 15, 3, PortalColor::Green);
            }
            let entry = field.portals[0];
            let prospective = match entry.edge {
                Edge::Top => Point::new(15, -1),
                _ => Point::new(-1, 15),
            };

            let teleport = field
                .try_teleport(prospective, GRID, Duration::ZERO, &mut TimerQueue::new())
                .unwrap();
            assert_eq!(teleport.position, cell, "exit on {:?}", edge);
            assert_eq!(teleport.direction, direction, "exit on {:?}", edge);
        }
    }

    #[test]
    fn test_no_teleport_when_missing_portal_or_cooling_down() {
        let mut field = PortalField {
            portals: vec![
                portal(Edge::Left, 0, 3, PortalColor::Blue),
                portal(Edge::Right, 10, 3, PortalColor::Blue),
            ],
            cooldowns: HashSet::new(),
        };
        let mut timers = TimerQueue::new();

        assert!(field.try_teleport(Point::new(-1, 8), GRID, Duration::ZERO, &mut timers).is_none());
        assert!(field.try_teleport(Point::new(5, 5), GRID, Duration::ZERO, &mut timers).is_none());

        field.cooldowns.insert(PortalColor::Blue);
        assert!(field.try_teleport(Point::new(-1, 1), GRID, Duration::ZERO, &mut timers).is_none());
        assert!(timers.is_empty());

        field.end_cooldown(PortalColor::Blue);
        assert!(field.try_teleport(Point::new(-1, 1), GRID, Duration::ZERO, &mut timers).is_some());
    }

    #[test]
    fn test_relocate_moves_only_that_color() {
        let mut rng = SessionRng::new(77);
        let mut field = PortalField::generate(GRID, &mut rng).unwrap();
        let green_before: Vec<Portal> = field.pair(PortalColor::Green).copied().collect();
        let blue_size = field.pair(PortalColor::Blue).next().unwrap().size;

        field.relocate(PortalColor::Blue, GRID, &mut rng).unwrap();

        let green_after: Vec<Portal> = field.pair(PortalColor::Green).copied().collect();
        assert_eq!(green_before, green_after);
        let blue: Vec<Portal> = field.pair(PortalColor::Blue).copied().collect();
        assert_eq!(blue.len(), 2);
        assert!(blue.iter().all(|p| p.size == blue_size));
        assert_no_overlaps(&field.portals);
    }
}
