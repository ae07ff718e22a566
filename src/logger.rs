use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::{Mutex, OnceLock};

use chrono::Local;

use crate::error::Result;

static LOGGER: OnceLock<Logger> = OnceLock::new();

// The terminal belongs to the game, so lines only ever go to a file.
pub struct Logger {
    sink: Option<Mutex<File>>,
}

impl Logger {
    fn new(sink: Option<File>) -> Self {
        Self { sink: sink.map(Mutex::new) }
    }

    pub fn log(&self, file: &str, line: u32, message: &str) {
        if let Some(sink) = &self.sink {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
            let entry = format_entry(&timestamp, file, line, message);
            if let Ok(mut f) = sink.lock() {
                // A failed log write is not worth ending the game over.
                let _ = writeln!(f, "{}", entry);
            }
        }
    }
}

pub fn init_logger(path: Option<&str>) -> Result {
    let sink = match path {
        Some(p) => Some(OpenOptions::new().create(true).append(true).open(p)?),
        None => None,
    };
    LOGGER.get_or_init(|| Logger::new(sink));
    Ok(())
}

pub fn log(file: &str, line: u32, message: &str) {
    if let Some(logger) = LOGGER.get() {
        logger.log(file, line, message);
    }
}

fn format_entry(timestamp: &str, file: &str, line: u32, message: &str) -> String {
    let file_name = file.rsplit(['/', '\\']).next().unwrap_or(file);
    format!("[{}][{}:{}] {}", timestamp, file_name, line, message)
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::logger::log(file!(), line!(), &format!($($arg)*))
    };
}
