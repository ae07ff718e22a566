use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::Coords;
use crate::render::{render, Grid};
use crate::settings::Settings;
use crate::snake::{Direction, MoveResult, Snake};

// Rejection sampling gives up after this many draws and scans the free cells.
const FOOD_SAMPLE_ATTEMPTS: usize = 64;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndReason {
    WallCollision,
    SelfCollision,
    /// Every cell is snake; nothing left to eat.
    BoardFilled,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Idle,
    Running,
    GameOver(EndReason),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Skipped,
    Moved,
    Ate { at: Coords, score: u32 },
    Ended(EndReason),
}

pub struct GameState {
    board_size: i16,
    initial_length: i16,
    score_increment: u32,
    snake: Snake,
    food: Coords,
    score: u32,
    status: Status,
    rng: StdRng,
    seed: u64,
}

impl GameState {
    pub fn new(settings: &Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let rng = StdRng::seed_from_u64(seed);
        let snake = initial_snake(settings.board_size, settings.initial_length);

        let mut state = GameState {
            board_size: settings.board_size,
            initial_length: settings.initial_length,
            score_increment: settings.score_increment,
            snake,
            food: (0, 0),
            score: 0,
            status: Status::Idle,
            rng,
            seed,
        };
        state.reset();
        state
    }

    #[cfg(test)]
    /// Builds a running game with an explicit layout.
    pub fn with_layout(settings: &Settings, snake: Snake, food: Coords) -> Self {
        let mut state = Self::new(settings);
        state.snake = snake;
        state.food = food;
        state.status = Status::Running;
        state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn board_size(&self) -> i16 {
        self.board_size
    }

    #[cfg(test)]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[cfg(test)]
    pub fn food(&self) -> Coords {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    pub fn grid(&self) -> Grid {
        render(&self.snake, self.food, self.board_size)
    }

    /// Starts a fresh game from Idle or GameOver. Returns false if a game is
    /// already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.reset();
        self.status = Status::Running;
        true
    }

    /// Back to the initial layout, Idle.
    pub fn reset(&mut self) {
        self.snake = initial_snake(self.board_size, self.initial_length);
        self.score = 0;
        self.status = Status::Idle;
        // The initial snake never fills a board that passed validation.
        self.food = self.place_food().unwrap_or((0, 0));
    }

    /// Queues a turn. Ignored unless running or when it would reverse the snake.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if !self.is_running() {
            return false;
        }
        self.snake.set_direction(direction)
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Skipped;
        }

        let food = self.food;
        match self.snake.move_step(self.board_size, |head| head == food) {
            MoveResult::HitWall => self.end(EndReason::WallCollision),
            MoveResult::HitSelf => self.end(EndReason::SelfCollision),
            MoveResult::Moved { old_tail: Some(_), .. } => TickOutcome::Moved,
            MoveResult::Moved { new_head, old_tail: None } => {
                self.score += self.score_increment;
                match self.place_food() {
                    Some(pos) => {
                        self.food = pos;
                        TickOutcome::Ate { at: new_head, score: self.score }
                    }
                    None => self.end(EndReason::BoardFilled),
                }
            }
        }
    }

    fn end(&mut self, reason: EndReason) -> TickOutcome {
        self.status = Status::GameOver(reason);
        TickOutcome::Ended(reason)
    }

    fn place_food(&mut self) -> Option<Coords> {
        let size = self.board_size;
        if self.snake.len() >= size as usize * size as usize {
            return None;
        }

        for _ in 0..FOOD_SAMPLE_ATTEMPTS {
            let pos = (self.rng.gen_range(0..size), self.rng.gen_range(0..size));
            if !self.snake.occupies(pos) {
                return Some(pos);
            }
        }

        let snake = &self.snake;
        let choices: Vec<Coords> = (0..size)
            .flat_map(|y| (0..size).map(move |x| (x, y)))
            .filter(|pos| !snake.occupies(*pos))
            .collect();
        choices.choose(&mut self.rng).copied()
    }
}

fn initial_snake(board_size: i16, length: i16) -> Snake {
    let center = (board_size / 2, board_size / 2);
    Snake::new(center, length, Direction::Right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction::*;
    use std::collections::HashSet;

    fn settings(seed: u64) -> Settings {
        Settings { seed: Some(seed), ..Settings::default() }
    }

    fn running(body: Vec<Coords>, dir: Direction, food: Coords) -> GameState {
        GameState::with_layout(&settings(42), Snake::from_body(body, dir), food)
    }

    fn body_vec(state: &GameState) -> Vec<Coords> {
        state.snake().body().iter().copied().collect()
    }

    #[test]
    fn test_new_is_idle_with_initial_layout() {
        let state = GameState::new(&settings(1));
        assert_eq!(state.status(), Status::Idle);
        assert_eq!(body_vec(&state), vec![(10, 10)]);
        assert_eq!(state.snake().get_direction(), Right);
        assert_eq!(state.score(), 0);
        assert!(!state.snake().occupies(state.food()));
    }

    #[test]
    fn test_idle_game_does_not_tick() {
        let mut state = GameState::new(&settings(1));
        let before = body_vec(&state);
        assert_eq!(state.tick(), TickOutcome::Skipped);
        assert_eq!(body_vec(&state), before);
    }

    #[test]
    fn test_steer_ignored_when_not_running() {
        let mut state = GameState::new(&settings(1));
        assert!(!state.steer(Up));
        assert_eq!(state.snake().pending_direction(), None);
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let mut state = running(vec![(5, 5)], Right, (6, 5));
        assert_eq!(state.tick(), TickOutcome::Ate { at: (6, 5), score: 10 });
        assert_eq!(state.snake().head(), (6, 5));
        assert_eq!(body_vec(&state), vec![(6, 5), (5, 5)]);
        assert_eq!(state.score(), 10);
        assert_ne!(state.food(), (6, 5));
        assert!(!state.snake().occupies(state.food()));
        assert!(state.is_running());
    }

    #[test]
    fn test_wall_collision_freezes_state() {
        let mut state = running(vec![(0, 0)], Left, (5, 5));
        assert_eq!(state.tick(), TickOutcome::Ended(EndReason::WallCollision));
        assert_eq!(state.status(), Status::GameOver(EndReason::WallCollision));
        assert_eq!(body_vec(&state), vec![(0, 0)]);

        assert_eq!(state.tick(), TickOutcome::Skipped);
        assert_eq!(body_vec(&state), vec![(0, 0)]);
        assert_eq!(state.food(), (5, 5));
    }

    #[test]
    fn test_self_collision() {
        let mut state = running(vec![(5, 5), (4, 5)], Left, (9, 9));
        assert_eq!(state.tick(), TickOutcome::Ended(EndReason::SelfCollision));
        assert_eq!(body_vec(&state), vec![(5, 5), (4, 5)]);
    }

    #[test]
    fn test_reversal_never_commits() {
        let mut state = running(vec![(5, 5), (4, 5)], Right, (9, 9));
        assert!(!state.steer(Left));
        assert_eq!(state.tick(), TickOutcome::Moved);
        assert_eq!(state.snake().head(), (6, 5));
    }

    #[test]
    fn test_head_advances_by_direction_vector() {
        let mut state = running(vec![(10, 10), (9, 10), (8, 10)], Right, (0, 0));
        let turns = [None, Some(Up), None, Some(Left), Some(Down), None, Some(Right)];
        for turn in turns.iter() {
            if let Some(dir) = turn {
                state.steer(*dir);
            }
            let pending = state.snake().pending_direction();
            let dir = pending.unwrap_or(state.snake().get_direction());
            let (dx, dy) = dir.vector();
            let head = state.snake().head();

            assert_eq!(state.tick(), TickOutcome::Moved);
            assert_eq!(state.snake().head(), (head.0 + dx, head.1 + dy));
            assert_eq!(state.snake().len(), 3);
        }
    }

    /// Picks the move towards the food: the longer axis first, then the other
    /// one, then any sideways move that stays on the board. Never a reversal.
    fn chase(state: &GameState) -> Direction {
        let head = state.snake().head();
        let food = state.food();
        let heading = state.snake().get_direction();
        let size = state.board_size();

        let (dx, dy) = (food.0 - head.0, food.1 - head.1);
        let horizontal = if dx < 0 { Left } else { Right };
        let vertical = if dy < 0 { Up } else { Down };
        let mut wanted = Vec::new();
        if dx.abs() >= dy.abs() {
            wanted.extend([horizontal, vertical]);
        } else {
            wanted.extend([vertical, horizontal]);
        }
        wanted.retain(|d| match d {
            Left | Right => dx != 0,
            Up | Down => dy != 0,
        });
        wanted.extend([Up, Down, Left, Right]);

        wanted
            .into_iter()
            .filter(|d| !d.is_opposite(heading))
            .find(|d| {
                let (vx, vy) = d.vector();
                let next = (head.0 + vx, head.1 + vy);
                next.0 >= 0 && next.1 >= 0 && next.0 < size && next.1 < size
            })
            .unwrap_or(heading)
    }

    #[test]
    fn test_long_run_keeps_invariants() {
        let mut state = GameState::new(&settings(7));
        state.start();
        let mut ate = 0;
        let mut last = TickOutcome::Skipped;

        // Chasing food without avoiding the body grows the snake until it
        // runs into itself, or fills the board.
        for _ in 0..50_000 {
            if !state.is_running() {
                break;
            }
            let dir = chase(&state);
            state.steer(dir);
            let head = state.snake().head();
            let (vx, vy) = dir.vector();

            last = state.tick();
            match last {
                TickOutcome::Moved | TickOutcome::Ate { .. } => {
                    assert_eq!(state.snake().head(), (head.0 + vx, head.1 + vy));
                    let body = body_vec(&state);
                    let unique: HashSet<Coords> = body.iter().copied().collect();
                    assert_eq!(unique.len(), body.len());
                    assert!(!state.snake().occupies(state.food()));
                    assert!(body.iter().all(|p| p.0 >= 0 && p.1 >= 0 && p.0 < 20 && p.1 < 20));
                    if let TickOutcome::Ate { .. } = last {
                        ate += 1;
                        assert_eq!(state.snake().len(), ate + 1);
                    }
                }
                TickOutcome::Ended(_) => assert!(matches!(state.status(), Status::GameOver(_))),
                TickOutcome::Skipped => panic!("a running game skipped a tick"),
            }
        }

        assert!(ate > 1, "the snake ate {} times", ate);
        assert!(matches!(last, TickOutcome::Ended(_)));
        let filled = last == TickOutcome::Ended(EndReason::BoardFilled);
        assert_eq!(state.score(), (ate + filled as usize) as u32 * 10);
    }

    #[test]
    fn test_filling_the_board_ends_the_game() {
        let small = Settings { board_size: 5, seed: Some(3), ..Settings::default() };
        // Zigzag covering all but (0, 4); head at (1, 4) moving left
        let mut body: Vec<Coords> = Vec::new();
        for y in 0..5i16 {
            let row: Vec<i16> = if y % 2 == 0 { (0..5).rev().collect() } else { (0..5).collect() };
            for x in row {
                body.push((x, y));
            }
        }
        body.retain(|p| *p != (0, 4));
        body.reverse();
        assert_eq!(body[0], (1, 4));

        let mut state = GameState::with_layout(&small, Snake::from_body(body, Left), (0, 4));
        assert_eq!(state.tick(), TickOutcome::Ended(EndReason::BoardFilled));
        assert_eq!(state.score(), 10);
        assert_eq!(state.snake().len(), 25);
    }

    #[test]
    fn test_food_placement_falls_back_to_free_cells() {
        let small = Settings { board_size: 5, seed: Some(11), ..Settings::default() };
        let mut body: Vec<Coords> = Vec::new();
        for y in 0..5i16 {
            for x in 0..5i16 {
                if (x, y) != (2, 2) {
                    body.push((x, y));
                }
            }
        }
        let mut state = GameState::with_layout(&small, Snake::from_body(body, Right), (2, 2));
        for _ in 0..20 {
            assert_eq!(state.place_food(), Some((2, 2)));
        }
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = running(vec![(0, 0)], Up, (5, 5));
        state.tick();
        assert!(matches!(state.status(), Status::GameOver(_)));

        assert!(state.start());
        assert!(state.is_running());
        assert_eq!(body_vec(&state), vec![(10, 10)]);
        assert_eq!(state.score(), 0);
        assert!(!state.start());
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut state = running(vec![(5, 5)], Right, (6, 5));
        state.tick();
        state.reset();
        assert_eq!(state.status(), Status::Idle);
        assert_eq!(state.score(), 0);
        assert_eq!(body_vec(&state), vec![(10, 10)]);
        assert_eq!(state.snake().get_direction(), Right);
    }

    #[test]
    fn test_same_seed_same_food() {
        let a = GameState::new(&settings(99));
        let b = GameState::new(&settings(99));
        assert_eq!(a.food(), b.food());
        assert_eq!(a.seed(), 99);
    }
}
