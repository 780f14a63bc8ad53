//! Infrastructure layer: content loading and telemetry.

pub mod content;
pub mod error;
pub mod telemetry;
