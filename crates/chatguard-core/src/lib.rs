//! Core domain + moderation logic for the ChatGuard group moderation bot.
//!
//! This crate is intentionally framework-agnostic. The Telegram Bot API lives
//! behind ports (traits) implemented in the adapter crate.

pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod duration;
pub mod errors;
pub mod formatting;
pub mod invite;
pub mod logging;
pub mod messaging;
pub mod moderation;
pub mod permissions;
pub mod ports;

#[cfg(test)]
mod testing;

pub use errors::{Error, Result};
