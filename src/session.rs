use std::time::{Duration, Instant};

use crate::log;
use crate::input::Command;
use crate::settings::Settings;
use crate::state::{EndReason, GameState, TickOutcome};
use crate::ticker::Ticker;

/// What the screen has to reflect after a command or a tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Update {
    Nothing,
    Redraw,
    Started,
    Reset,
    Paused,
    Resumed,
    Ended(EndReason),
}

/// Game state plus the timer that drives it. The ticker runs exactly while a
/// game is running and not paused.
pub struct Session {
    state: GameState,
    ticker: Ticker,
    paused: bool,
}

impl Session {
    pub fn new(settings: &Settings) -> Self {
        Session {
            state: GameState::new(settings),
            ticker: Ticker::new(settings.tick_interval()),
            paused: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.ticker.time_until_next(now)
    }

    pub fn handle(&mut self, cmd: Command, now: Instant) -> Update {
        match cmd {
            Command::Turn(dir) => {
                self.state.steer(dir);
                Update::Nothing
            }
            Command::Start => {
                if !self.state.start() {
                    return Update::Nothing;
                }
                log!("Game started");
                self.paused = false;
                self.ticker.start(now);
                Update::Started
            }
            Command::Reset => {
                if !self.state.is_running() {
                    return Update::Nothing;
                }
                log!("Game reset at score {}", self.state.score());
                self.ticker.stop();
                self.paused = false;
                self.state.reset();
                Update::Reset
            }
            Command::Pause => self.toggle_pause(now),
            Command::Quit => {
                log!("Quit with score {}", self.state.score());
                self.shutdown();
                Update::Nothing
            }
        }
    }

    /// Runs one step if the ticker is due.
    pub fn poll(&mut self, now: Instant) -> Update {
        if !self.ticker.poll(now) {
            return Update::Nothing;
        }

        match self.state.tick() {
            TickOutcome::Skipped => {
                self.ticker.stop();
                Update::Nothing
            }
            TickOutcome::Moved => Update::Redraw,
            TickOutcome::Ate { at, score } => {
                log!("Ate food at ({}, {}), score {}", at.0, at.1, score);
                Update::Redraw
            }
            TickOutcome::Ended(reason) => {
                self.ticker.stop();
                log!("Game over ({:?}), score {}", reason, self.state.score());
                Update::Ended(reason)
            }
        }
    }

    pub fn shutdown(&mut self) {
        self.ticker.stop();
    }

    fn toggle_pause(&mut self, now: Instant) -> Update {
        if !self.state.is_running() {
            return Update::Nothing;
        }

        self.paused = !self.paused;
        if self.paused {
            log!("Paused");
            self.ticker.stop();
            Update::Paused
        } else {
            self.ticker.start(now);
            Update::Resumed
        }
    }

    #[cfg(test)]
    fn ticking(&self) -> bool {
        self.ticker.is_running()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}
