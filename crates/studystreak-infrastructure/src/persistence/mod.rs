pub mod repositories;
pub mod users;

mod database;
mod repository_base;
mod result_ext;

pub use database::Database;
pub(crate) use repository_base::SqliteRepositoryBase;
pub(crate) use result_ext::ResultExt;
