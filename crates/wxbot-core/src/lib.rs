//! Core domain + application logic for the weather bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and the weather
//! provider live behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod scheduler;
pub mod store;
pub mod weather;

#[cfg(test)]
mod testing;

pub use errors::{Error, Result};
