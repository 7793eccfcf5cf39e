//! Moderation action engine: ban, unban, timed mute and unmute.
//!
//! Each command runs as a self-contained request: local validation, admin
//! checks against the remote service, the mutation, then exactly one reply.

pub mod engine;
pub mod error;
pub mod request;

pub use engine::{ActionOutcome, ActionResult, ModerationContext, ModerationEngine};
pub use error::{DeniedParty, ModerationError};
pub use request::{ModerationKind, ModerationRequest};
