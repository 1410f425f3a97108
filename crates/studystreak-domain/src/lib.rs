//! Streak rules with no I/O: the record, the state machine, the clock and
//! the storage contract the outer layers implement.

pub mod shared;
pub mod streak;

pub use shared::{DomainError, UserId};
