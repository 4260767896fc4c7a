pub mod comments;
pub mod reports;
pub mod review_tags;
pub mod reviews;
pub mod tags;
pub mod users;
