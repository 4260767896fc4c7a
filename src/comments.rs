//! Threaded-comment operations.
//!
//! Comments live in flat storage keyed by id with a nullable parent
//! reference. The two listing operations are separate queries matching the
//! two-level reading contract: root comments newest-first, replies
//! oldest-first (read as a conversation). Traversal is never recursive.

use crate::moderation::can_mutate;
use crate::orm::{comments, reviews, users::Role};
use crate::pagination::{Page, PageParams};
use crate::{Error, Result};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};

/// Create a root comment or a reply on a review.
///
/// Fails before any row is written: `ReviewNotFound` if the review is
/// absent, `CommentNotFound` if a claimed parent is absent, `Mismatch` if
/// the parent belongs to a different review.
pub async fn create_comment(
    db: &DatabaseConnection,
    author_id: i32,
    review_id: i32,
    text: &str,
    parent_comment_id: Option<i32>,
) -> Result<comments::Model> {
    if text.trim().is_empty() {
        return Err(Error::validation("Comment text cannot be empty"));
    }

    reviews::Entity::find_by_id(review_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Review"))?;

    if let Some(parent_id) = parent_comment_id {
        let parent = comments::Entity::find_by_id(parent_id)
            .one(db)
            .await?
            .ok_or_else(|| Error::not_found("Comment"))?;

        if parent.review_id != review_id {
            return Err(Error::Mismatch("Comment"));
        }
    }

    let comment = comments::ActiveModel {
        user_id: Set(author_id),
        review_id: Set(review_id),
        parent_comment_id: Set(parent_comment_id),
        text: Set(text.to_owned()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    match parent_comment_id {
        Some(parent_id) => log::info!(
            "User {} created comment {} on review {} as reply to {}",
            author_id,
            comment.id,
            review_id,
            parent_id
        ),
        None => log::info!(
            "User {} created comment {} on review {}",
            author_id,
            comment.id,
            review_id
        ),
    }

    Ok(comment)
}

/// Root comments of a review, newest first. Id is the deterministic
/// tie-break for equal timestamps.
pub async fn list_roots(
    db: &DatabaseConnection,
    review_id: i32,
    params: PageParams,
) -> Result<Page<comments::Model>> {
    let paginator = comments::Entity::find()
        .filter(comments::Column::ReviewId.eq(review_id))
        .filter(comments::Column::ParentCommentId.is_null())
        .order_by_desc(comments::Column::CreatedAt)
        .order_by_desc(comments::Column::Id)
        .paginate(db, params.page_size() as usize);

    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(params.page_index() as usize).await?;

    Ok(Page::new(items, total as u64, params))
}

/// Direct replies to a comment, oldest first.
pub async fn list_replies(
    db: &DatabaseConnection,
    parent_comment_id: i32,
    params: PageParams,
) -> Result<Page<comments::Model>> {
    let paginator = comments::Entity::find()
        .filter(comments::Column::ParentCommentId.eq(parent_comment_id))
        .order_by_asc(comments::Column::CreatedAt)
        .order_by_asc(comments::Column::Id)
        .paginate(db, params.page_size() as usize);

    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(params.page_index() as usize).await?;

    Ok(Page::new(items, total as u64, params))
}

/// Replace a comment's text. The guard sequence is fixed: existence, then
/// review agreement, then authorization. `created_at` is preserved.
pub async fn update_comment(
    db: &DatabaseConnection,
    acting_user_id: i32,
    acting_role: Role,
    review_id: i32,
    comment_id: i32,
    new_text: &str,
) -> Result<i32> {
    if new_text.trim().is_empty() {
        return Err(Error::validation("Comment text cannot be empty"));
    }

    let existing = load_for_mutation(db, acting_user_id, acting_role, review_id, comment_id).await?;

    let mut active: comments::ActiveModel = existing.into();
    active.text = Set(new_text.to_owned());
    active.update(db).await?;

    log::info!(
        "Updated comment {} on review {} by user {}",
        comment_id,
        review_id,
        acting_user_id
    );

    Ok(comment_id)
}

/// Delete a comment under the same guard sequence as update. A comment with
/// live replies is not deletable; replies must be removed first.
pub async fn delete_comment(
    db: &DatabaseConnection,
    acting_user_id: i32,
    acting_role: Role,
    review_id: i32,
    comment_id: i32,
) -> Result<i32> {
    let existing = load_for_mutation(db, acting_user_id, acting_role, review_id, comment_id).await?;

    let has_replies = comments::Entity::find()
        .filter(comments::Column::ParentCommentId.eq(comment_id))
        .one(db)
        .await?
        .is_some();

    if has_replies {
        return Err(Error::Conflict("comment has replies"));
    }

    existing.delete(db).await?;

    log::info!(
        "Deleted comment {} on review {} by user {}",
        comment_id,
        review_id,
        acting_user_id
    );

    Ok(comment_id)
}

/// Shared guard sequence for update and delete: NotFound, then Mismatch
/// against the declared review (defense against cross-review id confusion),
/// then the owner-or-elevated check.
async fn load_for_mutation(
    db: &DatabaseConnection,
    acting_user_id: i32,
    acting_role: Role,
    review_id: i32,
    comment_id: i32,
) -> Result<comments::Model> {
    let existing = comments::Entity::find_by_id(comment_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Comment"))?;

    if existing.review_id != review_id {
        return Err(Error::Mismatch("Comment"));
    }

    if !can_mutate(acting_user_id, acting_role, existing.user_id) {
        log::warn!(
            "User {} denied mutation of comment {} owned by {}",
            acting_user_id,
            comment_id,
            existing.user_id
        );
        return Err(Error::Forbidden("Comment"));
    }

    Ok(existing)
}
