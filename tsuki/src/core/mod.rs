pub use self::{config::BotConfig, context::Context};

mod config;
mod context;

pub mod logging;
