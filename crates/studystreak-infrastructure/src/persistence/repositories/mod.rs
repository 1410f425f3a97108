pub mod streak_repo;

pub use streak_repo::SqliteStreakRepository;
