mod args;
mod config;

pub use args::{Args, Command, InitArgs, ScoreArgs, ShowArgs};
pub use config::ScoreConfig;
