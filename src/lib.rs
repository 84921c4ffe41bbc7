//! Weekly pick'em pool engine: pick validation against per-week point
//! limits, kickoff locking, grading and standings.

pub mod config;
pub mod error;
pub mod output;
pub mod picks;
pub mod scoring;
pub mod season;

pub use error::PoolError;
