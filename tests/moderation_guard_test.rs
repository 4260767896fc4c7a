//! Integration tests for the tier guard on moderation actions against user
//! accounts, and the owner-or-elevated rule on content mutation.
mod common;
use serial_test::serial;

use common::{database::*, fixtures::*};
use gamereviews::orm::users::{self, Role};
use gamereviews::reviews::{delete_review, update_review};
use gamereviews::session::hash_password;
use gamereviews::users::{delete_user_for_moderation, update_user_for_moderation};
use gamereviews::Error;
use sea_orm::EntityTrait;

async fn reload_user(db: &sea_orm::DatabaseConnection, id: i32) -> Option<users::Model> {
    users::Entity::find_by_id(id).one(db).await.unwrap()
}

#[actix_rt::test]
#[serial]
async fn admin_accounts_cannot_be_moderated_by_anyone() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let admin = create_test_user(&db, "head_admin", Role::Admin).await.unwrap();
    let hash = hash_password(TEST_PASSWORD).unwrap();

    // Every tier, including another Admin, is refused.
    for acting_role in [Role::User, Role::Moderator, Role::Admin] {
        let result = update_user_for_moderation(
            &db, acting_role, admin.id, "renamed", "renamed@test.com", &hash,
        )
        .await;
        assert!(
            matches!(result, Err(Error::Forbidden(_))),
            "update by {:?} should be forbidden",
            acting_role
        );

        let result = delete_user_for_moderation(&db, acting_role, admin.id).await;
        assert!(
            matches!(result, Err(Error::Forbidden(_))),
            "deletion by {:?} should be forbidden",
            acting_role
        );
    }

    // The account is untouched.
    let reloaded = reload_user(&db, admin.id).await.expect("admin still exists");
    assert_eq!(reloaded.username, "head_admin");
    assert_eq!(reloaded.email, "head_admin@test.com");

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn moderator_accounts_require_an_admin_actor() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let target = create_test_user(&db, "junior_mod", Role::Moderator).await.unwrap();
    let hash = hash_password(TEST_PASSWORD).unwrap();

    let result = update_user_for_moderation(
        &db, Role::Moderator, target.id, "renamed", "renamed@test.com", &hash,
    )
    .await;
    assert!(matches!(result, Err(Error::Forbidden(_))));

    let result = delete_user_for_moderation(&db, Role::User, target.id).await;
    assert!(matches!(result, Err(Error::Forbidden(_))));

    // An Admin may rewrite a moderator's account.
    update_user_for_moderation(
        &db, Role::Admin, target.id, "renamed", "renamed@test.com", &hash,
    )
    .await
    .expect("admin update of moderator");

    let reloaded = reload_user(&db, target.id).await.unwrap();
    assert_eq!(reloaded.username, "renamed");
    assert_eq!(reloaded.role, Role::Moderator);

    delete_user_for_moderation(&db, Role::Admin, target.id)
        .await
        .expect("admin deletion of moderator");
    assert!(reload_user(&db, target.id).await.is_none());

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn plain_users_are_moderated_by_any_elevated_actor() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let target = create_test_user(&db, "member", Role::User).await.unwrap();
    let hash = hash_password(TEST_PASSWORD).unwrap();

    // A plain user never moderates anyone.
    let result = update_user_for_moderation(
        &db, Role::User, target.id, "renamed", "renamed@test.com", &hash,
    )
    .await;
    assert!(matches!(result, Err(Error::Forbidden(_))));

    update_user_for_moderation(
        &db, Role::Moderator, target.id, "renamed", "renamed@test.com", &hash,
    )
    .await
    .expect("moderator update of user");

    delete_user_for_moderation(&db, Role::Admin, target.id)
        .await
        .expect("admin deletion of user");
    assert!(reload_user(&db, target.id).await.is_none());

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn moderating_a_missing_user_is_not_found() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let hash = hash_password(TEST_PASSWORD).unwrap();
    let result =
        update_user_for_moderation(&db, Role::Admin, 424242, "x", "x@test.com", &hash).await;
    assert!(matches!(result, Err(Error::NotFound { entity: "User" })));

    let result = delete_user_for_moderation(&db, Role::Admin, 424242).await;
    assert!(matches!(result, Err(Error::NotFound { entity: "User" })));

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn moderation_update_still_enforces_credential_uniqueness() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let existing = create_test_user(&db, "taken", Role::User).await.unwrap();
    let target = create_test_user(&db, "member", Role::User).await.unwrap();
    let hash = hash_password(TEST_PASSWORD).unwrap();

    let result =
        update_user_for_moderation(&db, Role::Admin, target.id, "taken", "fresh@test.com", &hash)
            .await;
    assert!(matches!(result, Err(Error::Validation(_))));

    // Keeping the target's own credentials is not a collision.
    update_user_for_moderation(&db, Role::Admin, target.id, "member", "member@test.com", &hash)
        .await
        .expect("no-op rename");

    let reloaded = reload_user(&db, existing.id).await.unwrap();
    assert_eq!(reloaded.username, "taken");

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn content_mutation_is_owner_or_elevated() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let owner = create_test_user(&db, "owner", Role::User).await.unwrap();
    let stranger = create_test_user(&db, "stranger", Role::User).await.unwrap();
    let moderator = create_test_user(&db, "mod", Role::Moderator).await.unwrap();

    let review = create_test_review(&db, owner.id, "Noita").await.unwrap();

    let result = update_review(
        &db, stranger.id, Role::User, review.id, "Defaced", "nope", &[],
    )
    .await;
    assert!(matches!(result, Err(Error::Forbidden(_))));

    let result = delete_review(&db, stranger.id, Role::User, review.id).await;
    assert!(matches!(result, Err(Error::Forbidden(_))));

    // The owner edits their own review; a moderator may delete it.
    update_review(
        &db, owner.id, Role::User, review.id, "Noita", "updated text", &[],
    )
    .await
    .expect("owner update");

    delete_review(&db, moderator.id, Role::Moderator, review.id)
        .await
        .expect("moderator deletion");

    cleanup_test_data(&db).await.expect("cleanup");
}
