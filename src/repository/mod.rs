//! SQLite access for both resources. Functions take the pool directly and
//! return `sqlx::Error`; handlers map it through `AppError`.

pub mod contacts;
pub mod installations;
pub mod paging;

pub use paging::{Page, PageMetadata, PageRequest};
