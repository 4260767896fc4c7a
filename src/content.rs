//! Resolution of a polymorphic content reference to its author.
//!
//! A report targets either a review or a comment; the caller supplies the
//! `(content_type, content_id)` pair and never the author. Resolving here,
//! synchronously at report creation, is what keeps `reported_user_id`
//! trustworthy — a client cannot frame an arbitrary user.

use crate::orm::{comments, reports::ContentType, reviews};
use crate::{Error, Result};
use sea_orm::{DatabaseConnection, EntityTrait};

/// Returns the id of the user who authored the referenced content, or
/// `NotFound` for the concrete entity if it does not exist. Unrecognized
/// content-type integers never reach this far; they are rejected as
/// validation errors when the request is decoded.
pub async fn resolve_author(
    db: &DatabaseConnection,
    content_type: ContentType,
    content_id: i32,
) -> Result<i32> {
    match content_type {
        ContentType::Review => reviews::Entity::find_by_id(content_id)
            .one(db)
            .await?
            .map(|review| review.user_id)
            .ok_or_else(|| Error::not_found("Review")),
        ContentType::Comment => comments::Entity::find_by_id(content_id)
            .one(db)
            .await?
            .map(|comment| comment.user_id)
            .ok_or_else(|| Error::not_found("Comment")),
    }
}
