pub mod comments;
pub mod content;
pub mod db;
pub mod error;
pub mod middleware;
pub mod moderation;
pub mod orm;
pub mod pagination;
pub mod reports;
pub mod reviews;
pub mod session;
pub mod users;
pub mod web;

pub use error::Error;

/// Convenience alias used by the core operation modules.
pub type Result<T> = std::result::Result<T, Error>;
