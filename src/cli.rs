use clap::Parser;

use crate::error::{ErrorConversion, Result};
use crate::settings::Settings;

#[derive(Parser, Debug, Default)]
#[command(name = "gridsnake", about = "Snake on a square grid, in the terminal")]
pub struct Args {
    /// YAML settings file; flags below override its values
    #[arg(long)]
    pub config: Option<String>,

    /// Cells per side of the board
    #[arg(long)]
    pub board_size: Option<i16>,

    /// Milliseconds between simulation steps
    #[arg(long)]
    pub tick_ms: Option<u64>,

    /// Points awarded per food eaten
    #[arg(long)]
    pub score_increment: Option<u32>,

    /// Snake length at the start of a game
    #[arg(long)]
    pub initial_length: Option<i16>,

    /// Seed for food placement
    #[arg(long)]
    pub seed: Option<u64>,

    /// Append log lines to this file
    #[arg(long)]
    pub log_file: Option<String>,
}

impl Args {
    pub fn into_settings(self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        self.apply(&mut settings);
        settings.validate().with_trace_step("validating settings")?;
        Ok(settings)
    }

    fn apply(self, settings: &mut Settings) {
        if let Some(v) = self.board_size {
            settings.board_size = v;
        }
        if let Some(v) = self.tick_ms {
            settings.tick_interval_ms = v;
        }
        if let Some(v) = self.score_increment {
            settings.score_increment = v;
        }
        if let Some(v) = self.initial_length {
            settings.initial_length = v;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if self.log_file.is_some() {
            settings.log_file = self.log_file;
        }
    }
}
