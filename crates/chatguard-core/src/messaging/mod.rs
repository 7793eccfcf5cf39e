//! Outbound messaging port and the incoming command model.

pub mod port;
pub mod types;
