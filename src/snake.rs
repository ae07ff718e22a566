use std::collections::VecDeque;

use crate::Coords;
use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Unit step on the board; y grows downwards.
    pub fn vector(self) -> (i16, i16) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right)
        )
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Coords, old_tail: Option<Coords> },
    HitWall,
    HitSelf,
}

/// Head at the front of `body`, tail at the back.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Coords>,
    direction: Direction,
    pending_direction: Option<Direction>,
}

impl Snake {
    /// Builds a straight snake of `size` cells whose head is at `pos`, trailing
    /// away from `direction`.
    pub fn new(pos: Coords, size: i16, direction: Direction) -> Self {
        let diff = direction.vector();

        let body = (0..size.max(1))
            .map(|i| (pos.0 - diff.0 * i, pos.1 - diff.1 * i))
            .collect();
        Snake { body, direction, pending_direction: None }
    }

    #[cfg(test)]
    pub fn from_body(body: Vec<Coords>, direction: Direction) -> Self {
        assert!(!body.is_empty(), "a snake needs at least one segment");
        Snake { body: body.into(), direction, pending_direction: None }
    }

    pub fn body(&self) -> &VecDeque<Coords> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn occupies(&self, pos: Coords) -> bool {
        self.body.contains(&pos)
    }

    /// Position the head would move to with the current heading.
    fn next_head(&self) -> Coords {
        let (dx, dy) = self.direction.vector();
        let head = self.head();
        (head.0 + dx, head.1 + dy)
    }

    /// Advances one cell on a `board_size` square board. On a crash the body is
    /// left untouched.
    pub fn move_step(&mut self, board_size: i16, grow: impl FnOnce(Coords) -> bool) -> MoveResult {
        self.commit_direction();
        let new_head = self.next_head();

        if new_head.0 < 0 || new_head.1 < 0 || new_head.0 >= board_size || new_head.1 >= board_size {
            return HitWall;
        }
        if self.occupies(new_head) {
            return HitSelf;
        }

        self.body.push_front(new_head);

        if grow(new_head) {
            Moved { new_head, old_tail: None }
        } else {
            let old_tail = self.body.pop_back();
            Moved { new_head, old_tail }
        }
    }

    /// Queues a turn for the next step. Turning back onto the current heading
    /// is rejected; between steps the last accepted turn wins.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction.is_opposite(self.direction) {
            return false;
        }
        self.pending_direction = Some(new_direction);
        true
    }

    #[cfg(test)]
    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    #[cfg(test)]
    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    fn commit_direction(&mut self) {
        if let Some(dir) = self.pending_direction.take() {
            self.direction = dir;
        }
    }
}
