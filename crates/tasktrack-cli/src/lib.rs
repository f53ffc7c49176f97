pub mod cli;
pub mod commands;
pub mod settings;

pub use cli::{Cli, Commands};
pub use settings::Settings;
