//! SQLite storage, logging and settings for the streak engine.

pub mod config;
pub mod logging;
pub mod persistence;
