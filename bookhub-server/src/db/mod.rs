//! Database access layer

pub mod books;
pub mod logs;
pub mod orders;
pub mod users;
