//! Review CRUD and tag-set maintenance.
//!
//! A review exclusively owns its tag associations: on update the join rows
//! are cleared and rebuilt from the submitted names inside one transaction,
//! never diffed. Tags themselves are shared and created on demand.

use crate::moderation::can_mutate;
use crate::orm::{review_tags, reviews, tags, users::Role};
use crate::pagination::{Page, PageParams};
use crate::{Error, Result};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};

/// Listing filter for reviews. Predicates are conjunctive.
#[derive(Clone, Debug, Default)]
pub struct ReviewFilter {
    pub author_id: Option<i32>,
    /// Case-sensitive substring match over the game name.
    pub search: Option<String>,
    /// Exact tag name.
    pub tag: Option<String>,
    /// `gamename` or `createdat`, case-insensitive; defaults to game name.
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
    pub page: PageParams,
}

/// Create a review authored by the caller, with its tag set.
pub async fn create_review(
    db: &DatabaseConnection,
    author_id: i32,
    game_name: &str,
    description: &str,
    tag_names: &[String],
) -> Result<reviews::Model> {
    if game_name.trim().is_empty() {
        return Err(Error::validation("Game name is required"));
    }
    if description.trim().is_empty() {
        return Err(Error::validation("Description is required"));
    }

    let txn = db.begin().await?;

    let review = reviews::ActiveModel {
        user_id: Set(author_id),
        game_name: Set(game_name.to_owned()),
        description: Set(description.to_owned()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    attach_tags(&txn, review.id, tag_names).await?;
    txn.commit().await?;

    log::info!("User {} created review {}", author_id, review.id);

    Ok(review)
}

/// Fetch one review plus its tag names.
pub async fn get_review(
    db: &DatabaseConnection,
    review_id: i32,
) -> Result<(reviews::Model, Vec<String>)> {
    let review = reviews::Entity::find_by_id(review_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Review"))?;

    let tag_names = tag_names_for(db, review_id).await?;

    Ok((review, tag_names))
}

/// Paged review listing.
pub async fn list_reviews(
    db: &DatabaseConnection,
    filter: ReviewFilter,
) -> Result<Page<reviews::Model>> {
    let mut query = reviews::Entity::find();

    if let Some(author_id) = filter.author_id {
        query = query.filter(reviews::Column::UserId.eq(author_id));
    }

    if let Some(search) = filter.search.as_deref() {
        if !search.is_empty() {
            query = query.filter(reviews::Column::GameName.contains(search));
        }
    }

    if let Some(tag_name) = filter.tag.as_deref() {
        let tag = tags::Entity::find()
            .filter(tags::Column::Name.eq(tag_name))
            .one(db)
            .await?;

        let review_ids: Vec<i32> = match tag {
            Some(tag) => review_tags::Entity::find()
                .filter(review_tags::Column::TagId.eq(tag.id))
                .all(db)
                .await?
                .into_iter()
                .map(|rt| rt.review_id)
                .collect(),
            None => Vec::new(),
        };

        if review_ids.is_empty() {
            return Ok(Page::new(Vec::new(), 0, filter.page));
        }
        query = query.filter(reviews::Column::Id.is_in(review_ids));
    }

    let descending = matches!(
        filter.sort_direction.map(|s| s.to_lowercase()).as_deref(),
        Some("desc")
    );
    query = match filter.sort_by.map(|s| s.to_lowercase()).as_deref() {
        Some("createdat") if descending => query.order_by_desc(reviews::Column::CreatedAt),
        Some("createdat") => query.order_by_asc(reviews::Column::CreatedAt),
        _ if descending => query.order_by_desc(reviews::Column::GameName),
        _ => query.order_by_asc(reviews::Column::GameName),
    };
    query = query.order_by_asc(reviews::Column::Id);

    let params = filter.page;
    let paginator = query.paginate(db, params.page_size() as usize);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(params.page_index() as usize).await?;

    Ok(Page::new(items, total as u64, params))
}

/// Update a review's fields and rebuild its tag set. Owner or elevated role
/// only; `created_at` is preserved.
pub async fn update_review(
    db: &DatabaseConnection,
    acting_user_id: i32,
    acting_role: Role,
    review_id: i32,
    game_name: &str,
    description: &str,
    tag_names: &[String],
) -> Result<i32> {
    if game_name.trim().is_empty() {
        return Err(Error::validation("Game name is required"));
    }
    if description.trim().is_empty() {
        return Err(Error::validation("Description is required"));
    }

    let existing = reviews::Entity::find_by_id(review_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Review"))?;

    if !can_mutate(acting_user_id, acting_role, existing.user_id) {
        log::warn!(
            "User {} denied mutation of review {} owned by {}",
            acting_user_id,
            review_id,
            existing.user_id
        );
        return Err(Error::Forbidden("Review"));
    }

    let txn = db.begin().await?;

    let mut active: reviews::ActiveModel = existing.into();
    active.game_name = Set(game_name.to_owned());
    active.description = Set(description.to_owned());
    active.update(&txn).await?;

    // Clear and rebuild, never diff.
    review_tags::Entity::delete_many()
        .filter(review_tags::Column::ReviewId.eq(review_id))
        .exec(&txn)
        .await?;
    attach_tags(&txn, review_id, tag_names).await?;

    txn.commit().await?;

    log::info!("Updated review {} by user {}", review_id, acting_user_id);

    Ok(review_id)
}

/// Delete a review. Owner or elevated role only. Comments and tag join rows
/// go with it via the store's cascade.
pub async fn delete_review(
    db: &DatabaseConnection,
    acting_user_id: i32,
    acting_role: Role,
    review_id: i32,
) -> Result<i32> {
    let existing = reviews::Entity::find_by_id(review_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Review"))?;

    if !can_mutate(acting_user_id, acting_role, existing.user_id) {
        log::warn!(
            "User {} denied deletion of review {} owned by {}",
            acting_user_id,
            review_id,
            existing.user_id
        );
        return Err(Error::Forbidden("Review"));
    }

    existing.delete(db).await?;

    log::info!("Deleted review {} by user {}", review_id, acting_user_id);

    Ok(review_id)
}

/// Tag names attached to a review.
pub async fn tag_names_for(db: &DatabaseConnection, review_id: i32) -> Result<Vec<String>> {
    let tag_ids: Vec<i32> = review_tags::Entity::find()
        .filter(review_tags::Column::ReviewId.eq(review_id))
        .all(db)
        .await?
        .into_iter()
        .map(|rt| rt.tag_id)
        .collect();

    if tag_ids.is_empty() {
        return Ok(Vec::new());
    }

    let names = tags::Entity::find()
        .filter(tags::Column::Id.is_in(tag_ids))
        .order_by_asc(tags::Column::Name)
        .all(db)
        .await?
        .into_iter()
        .map(|t| t.name)
        .collect();

    Ok(names)
}

/// Insert join rows for the given tag names, creating unknown tags on the
/// way. Duplicate names in the input collapse to one association.
async fn attach_tags(
    txn: &DatabaseTransaction,
    review_id: i32,
    tag_names: &[String],
) -> Result<()> {
    let mut seen = Vec::new();

    for name in tag_names {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("Tag name cannot be empty"));
        }
        if seen.iter().any(|s: &String| s == name) {
            continue;
        }
        seen.push(name.to_owned());

        let tag_id = match tags::Entity::find()
            .filter(tags::Column::Name.eq(name))
            .one(txn)
            .await?
        {
            Some(tag) => tag.id,
            None => {
                tags::ActiveModel {
                    name: Set(name.to_owned()),
                    ..Default::default()
                }
                .insert(txn)
                .await?
                .id
            }
        };

        review_tags::ActiveModel {
            review_id: Set(review_id),
            tag_id: Set(tag_id),
            ..Default::default()
        }
        .insert(txn)
        .await?;
    }

    Ok(())
}
