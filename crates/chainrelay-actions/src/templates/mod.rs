//! Message templates. Pure functions from decoded data to sink payloads.

pub mod discord;
pub mod format;
pub mod slack;

pub use discord::{MinipoolTemplate, RewardsAnnouncement};
