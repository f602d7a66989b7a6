/// Aroodes - Lord of the Mysteries Discord Bot
///
/// Core library providing the Beyonder pathway catalog, the progression
/// engine, the Aroodes mirror persona, and the Discord and web surfaces.

pub mod config;
pub mod core;
pub mod database;
pub mod discord;
pub mod web;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
