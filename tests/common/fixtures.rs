//! Test fixtures for creating test data
#![allow(dead_code)]

use chrono::{NaiveDateTime, Utc};
use gamereviews::orm::{comments, reports, reviews, users};
use gamereviews::session::hash_password;
use sea_orm::{entity::*, ActiveValue::Set, DatabaseConnection, DbErr};

/// Plain-text password shared by all fixture users.
pub const TEST_PASSWORD: &str = "password123";

/// Create a test user with the given role and known credentials.
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
    role: users::Role,
) -> Result<users::Model, DbErr> {
    let password_hash = hash_password(TEST_PASSWORD)
        .map_err(|e| DbErr::Custom(format!("Password hashing failed: {}", e)))?;

    users::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{}@test.com", username)),
        password_hash: Set(password_hash),
        role: Set(role),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Create a review owned by `user_id`.
pub async fn create_test_review(
    db: &DatabaseConnection,
    user_id: i32,
    game_name: &str,
) -> Result<reviews::Model, DbErr> {
    reviews::ActiveModel {
        user_id: Set(user_id),
        game_name: Set(game_name.to_string()),
        description: Set("A test review".to_string()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Insert a comment row directly, bypassing the thread manager, so tests
/// can control timestamps and build specific shapes.
pub async fn create_test_comment(
    db: &DatabaseConnection,
    user_id: i32,
    review_id: i32,
    parent_comment_id: Option<i32>,
    text: &str,
    created_at: NaiveDateTime,
) -> Result<comments::Model, DbErr> {
    comments::ActiveModel {
        user_id: Set(user_id),
        review_id: Set(review_id),
        parent_comment_id: Set(parent_comment_id),
        text: Set(text.to_string()),
        created_at: Set(created_at),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Insert a report row directly with full control over its fields.
pub async fn create_test_report(
    db: &DatabaseConnection,
    reporter_id: i32,
    reported_user_id: i32,
    content_id: i32,
    content_type: reports::ContentType,
    reason: &str,
    description: &str,
    status: reports::ReportStatus,
) -> Result<reports::Model, DbErr> {
    let now = Utc::now().naive_utc();
    reports::ActiveModel {
        reporter_id: Set(reporter_id),
        reported_user_id: Set(reported_user_id),
        content_id: Set(content_id),
        content_type: Set(content_type),
        reason: Set(reason.to_string()),
        description: Set(description.to_string()),
        status: Set(status),
        moderator_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}
