//! User account operations.
//!
//! Two distinct mutation paths exist on purpose. The self-service path lets
//! a user edit their own account and consults nothing beyond identity. The
//! moderation path acts on somebody else's account and is gated by the tier
//! guard [`crate::moderation::can_moderate`], which keys off the target's
//! role: Admin accounts cannot be touched at all, Moderator accounts only by
//! an Admin.

use crate::moderation::can_moderate;
use crate::orm::users::{self, Role};
use crate::{Error, Result};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
};

/// Register a new account. Always a plain User; elevation happens out of
/// band.
pub async fn create_user(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<users::Model> {
    ensure_unique(db, username, email, None).await?;

    let user = users::ActiveModel {
        username: Set(username.to_owned()),
        email: Set(email.to_owned()),
        password_hash: Set(password_hash.to_owned()),
        role: Set(Role::User),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    log::info!("Registered user {} ({})", user.id, user.username);

    Ok(user)
}

pub async fn get_user(db: &DatabaseConnection, user_id: i32) -> Result<users::Model> {
    users::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("User"))
}

pub async fn get_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<users::Model>> {
    Ok(users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .one(db)
        .await?)
}

/// Self-service path: a user updates their own account. No tier guard.
pub async fn update_own_account(
    db: &DatabaseConnection,
    user_id: i32,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<i32> {
    let existing = get_user(db, user_id).await?;
    ensure_unique(db, username, email, Some(user_id)).await?;

    let mut active: users::ActiveModel = existing.into();
    active.username = Set(username.to_owned());
    active.email = Set(email.to_owned());
    active.password_hash = Set(password_hash.to_owned());
    active.update(db).await?;

    log::info!("User {} updated their account", user_id);

    Ok(user_id)
}

/// Moderation path: rewrite another user's credentials (username, email,
/// password reset). Denied outright for Admin targets; Moderator targets
/// require an Admin actor.
pub async fn update_user_for_moderation(
    db: &DatabaseConnection,
    acting_role: Role,
    target_user_id: i32,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<i32> {
    let existing = get_user(db, target_user_id).await?;

    if !can_moderate(acting_role, existing.role) {
        log::warn!(
            "Moderation update of user {} (role {:?}) denied for actor role {:?}",
            target_user_id,
            existing.role,
            acting_role
        );
        return Err(Error::Forbidden("User"));
    }

    ensure_unique(db, username, email, Some(target_user_id)).await?;

    let mut active: users::ActiveModel = existing.into();
    active.username = Set(username.to_owned());
    active.email = Set(email.to_owned());
    active.password_hash = Set(password_hash.to_owned());
    active.update(db).await?;

    log::info!("Moderation update of user {}", target_user_id);

    Ok(target_user_id)
}

/// Moderation path: delete a user account under the same tier guard.
pub async fn delete_user_for_moderation(
    db: &DatabaseConnection,
    acting_role: Role,
    target_user_id: i32,
) -> Result<i32> {
    let existing = get_user(db, target_user_id).await?;

    if !can_moderate(acting_role, existing.role) {
        log::warn!(
            "Moderation deletion of user {} (role {:?}) denied for actor role {:?}",
            target_user_id,
            existing.role,
            acting_role
        );
        return Err(Error::Forbidden("User"));
    }

    existing.delete(db).await?;

    log::info!("Moderation deleted user {}", target_user_id);

    Ok(target_user_id)
}

/// Username and email must be unique across accounts, ignoring
/// `exclude_user_id` (the account being edited).
async fn ensure_unique(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
    exclude_user_id: Option<i32>,
) -> Result<()> {
    let mut errors = Vec::new();

    let taken = |found: Option<&users::Model>| match (found, exclude_user_id) {
        (Some(user), Some(id)) => user.id != id,
        (Some(_), None) => true,
        (None, _) => false,
    };

    let by_name = users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .one(db)
        .await?;
    if taken(by_name.as_ref()) {
        errors.push("Username already taken".to_owned());
    }

    let by_email = users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await?;
    if taken(by_email.as_ref()) {
        errors.push("Email already exists".to_owned());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(errors))
    }
}
