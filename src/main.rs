mod cli;
mod error;
mod game;
mod input;
mod logger;
mod render;
mod session;
mod settings;
mod snake;
mod state;
mod term;
mod ticker;

use clap::Parser;

/// Board cell, (x, y) with y growing downwards.
pub type Coords = (i16, i16);
/// Terminal column and row.
pub type TermCoords = (u16, u16);

fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> error::Result {
    let settings = cli::Args::parse().into_settings()?;
    logger::init_logger(settings.log_file.as_deref())?;
    log!("Starting with {:?}", settings);

    let mut game = game::SnakeGame::new(&settings)?;
    game.run()
}
