use std::time::{Duration, Instant};

use crate::{log, TermCoords};
use crate::error::{Error, ErrorConversion, Result};
use crate::input::{map_key, Command};
use crate::render::Cell;
use crate::session::{Session, Update};
use crate::settings::Settings;
use crate::state::{EndReason, Status};
use crate::term::TermManager;

// How long to wait for keys when no tick is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(250);

const CELL_WIDTH: u16 = 2;
const SNAKE_HEAD: &str = "@@";
const SNAKE_BODY: &str = "\u{2588}\u{2588}";
const FOOD: &str = "()";
const EMPTY: &str = "  ";
const DEAD_SNAKE: &str = "XX";

pub struct SnakeGame {
    session: Session,
    term: TermManager,
    origin: TermCoords,
}

impl SnakeGame {
    pub fn new(settings: &Settings) -> Result<Self> {
        let term = TermManager::new()?;
        let session = Session::new(settings);
        let origin = board_origin(term.get_terminal_size(), settings.board_size)?;

        let state = session.state();
        log!("Board {}x{}, seed {}", state.board_size(), state.board_size(), state.seed());
        Ok(SnakeGame { session, term, origin })
    }

    /// Runs until the player quits. The terminal is restored on every path out.
    pub fn run(&mut self) -> Result {
        self.term.setup().with_trace_step("setting up terminal")?;
        let res = self.event_loop();
        self.session.shutdown();
        let restored = self.term.restore();
        res.and(restored)
    }

    fn event_loop(&mut self) -> Result {
        self.term.clear()?;
        let frame = frame_size(self.session.state().board_size());
        self.term.draw_borders(self.origin, frame)?;
        self.draw()?;
        self.show_intro()?;

        loop {
            let timeout = self.session.time_until_next(Instant::now()).unwrap_or(IDLE_POLL);

            for key_ev in self.term.read_key_events(timeout)? {
                match map_key(&key_ev) {
                    Some(Command::Quit) => {
                        self.session.handle(Command::Quit, Instant::now());
                        return Ok(());
                    }
                    Some(cmd) => {
                        let update = self.session.handle(cmd, Instant::now());
                        self.show(update)?;
                    }
                    None => {}
                }
            }

            let update = self.session.poll(Instant::now());
            self.show(update)?;
        }
    }

    fn show(&mut self, update: Update) -> Result {
        match update {
            Update::Nothing => Ok(()),
            Update::Redraw => self.draw(),
            Update::Started | Update::Resumed => {
                self.term.hide_message()?;
                self.draw()
            }
            Update::Reset => {
                self.term.hide_message()?;
                self.draw()?;
                self.show_intro()
            }
            Update::Paused => {
                self.term.show_message(&["Paused", "Press Esc to resume", "or Q to quit"])
            }
            Update::Ended(reason) => {
                self.draw()?;
                self.game_over(reason)
            }
        }
    }

    fn show_intro(&mut self) -> Result {
        self.term.show_message(&[
            "Arrow keys or WASD to move",
            "Enter to start, Esc to pause",
            "R to reset, Q to quit",
        ])
    }

    fn game_over(&mut self, reason: EndReason) -> Result {
        let s = if reason == EndReason::BoardFilled {"You won!"} else {"Game over!"};

        self.term.show_message(&[
            s,
            &*format!("Score: {}", self.session.state().score()),
            "",
            "Enter to play again,",
            "or Q to quit."
        ])
    }

    fn draw(&mut self) -> Result {
        let state = self.session.state();
        let dead = matches!(state.status(), Status::GameOver(reason) if reason != EndReason::BoardFilled);
        let grid = state.grid();
        let board_size = state.board_size();
        let score = state.score();
        let (x0, y0) = (self.origin.0 + 1, self.origin.1 + 1);

        for ((x, y), cell) in grid.iter() {
            let glyph = match cell {
                Cell::Head | Cell::Body if dead => DEAD_SNAKE,
                Cell::Head => SNAKE_HEAD,
                Cell::Body => SNAKE_BODY,
                Cell::Food => FOOD,
                Cell::Empty => EMPTY,
            };
            self.term.print_str_at((x0 + x as u16 * CELL_WIDTH, y0 + y as u16), glyph)?;
        }

        let (_, frame_h) = frame_size(board_size);
        let score_line = format!(" Score: {:<8}", score);
        self.term.print_str_at((self.origin.0, self.origin.1 + frame_h), &score_line)?;
        self.term.flush()
    }
}

/// Top-left corner of the framed board centred in a terminal of size `term`.
/// The board needs its frame plus one row underneath for the score.
fn board_origin(term: TermCoords, board_size: i16) -> Result<TermCoords> {
    let (frame_w, frame_h) = frame_size(board_size);
    let needed = (frame_w, frame_h + 1);
    if term.0 < needed.0 || term.1 < needed.1 {
        return Err(Error::terminal_too_small(term, needed));
    }
    Ok(((term.0 - needed.0) / 2, (term.1 - needed.1) / 2))
}

fn frame_size(board_size: i16) -> TermCoords {
    let cells = board_size.max(0) as u16;
    (cells * CELL_WIDTH + 2, cells + 2)
}
