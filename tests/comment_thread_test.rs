//! Integration tests for the comment thread manager: reply/parent/review
//! consistency, the two listing orders, and the mutation guard sequence.
mod common;
use serial_test::serial;

use chrono::{Duration, Utc};
use common::{database::*, fixtures::*};
use gamereviews::comments::{
    create_comment, delete_comment, list_replies, list_roots, update_comment,
};
use gamereviews::orm::{comments, users::Role};
use gamereviews::pagination::PageParams;
use gamereviews::Error;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

#[actix_rt::test]
#[serial]
async fn reply_must_share_the_parents_review() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let author = create_test_user(&db, "author", Role::User).await.unwrap();
    let review_a = create_test_review(&db, author.id, "Outer Wilds").await.unwrap();
    let review_b = create_test_review(&db, author.id, "Hades").await.unwrap();

    let parent = create_comment(&db, author.id, review_a.id, "root on A", None)
        .await
        .expect("root comment");

    // Attaching a reply under review B to a comment on review A must fail.
    let result = create_comment(&db, author.id, review_b.id, "stray reply", Some(parent.id)).await;
    assert!(matches!(result, Err(Error::Mismatch(_))));

    // And no row may have been created.
    let count = comments::Entity::find()
        .filter(comments::Column::ReviewId.eq(review_b.id))
        .all(&db)
        .await
        .unwrap()
        .len();
    assert_eq!(count, 0, "mismatched reply must not be persisted");

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn missing_review_or_parent_aborts_creation() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let author = create_test_user(&db, "author", Role::User).await.unwrap();
    let review = create_test_review(&db, author.id, "Celeste").await.unwrap();

    let result = create_comment(&db, author.id, review.id + 1000, "text", None).await;
    assert!(matches!(result, Err(Error::NotFound { entity: "Review" })));

    let result = create_comment(&db, author.id, review.id, "text", Some(424242)).await;
    assert!(matches!(result, Err(Error::NotFound { entity: "Comment" })));

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn root_and_reply_listings_are_disjoint_and_ordered() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let author = create_test_user(&db, "author", Role::User).await.unwrap();
    let review = create_test_review(&db, author.id, "Disco Elysium").await.unwrap();

    let base = Utc::now().naive_utc();
    let root_old = create_test_comment(&db, author.id, review.id, None, "old root", base)
        .await
        .unwrap();
    let root_new = create_test_comment(
        &db,
        author.id,
        review.id,
        None,
        "new root",
        base + Duration::seconds(10),
    )
    .await
    .unwrap();

    let reply_first = create_test_comment(
        &db,
        author.id,
        review.id,
        Some(root_old.id),
        "first reply",
        base + Duration::seconds(1),
    )
    .await
    .unwrap();
    let reply_second = create_test_comment(
        &db,
        author.id,
        review.id,
        Some(root_old.id),
        "second reply",
        base + Duration::seconds(2),
    )
    .await
    .unwrap();

    // Roots: newest first, no replies mixed in.
    let roots = list_roots(&db, review.id, PageParams::default()).await.unwrap();
    assert_eq!(roots.total, 2);
    let ids: Vec<i32> = roots.items.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![root_new.id, root_old.id]);
    assert!(roots.items.iter().all(|c| c.parent_comment_id.is_none()));

    // Replies: oldest first, only children of the requested parent.
    let replies = list_replies(&db, root_old.id, PageParams::default()).await.unwrap();
    assert_eq!(replies.total, 2);
    let ids: Vec<i32> = replies.items.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![reply_first.id, reply_second.id]);
    assert!(replies
        .items
        .iter()
        .all(|c| c.parent_comment_id == Some(root_old.id)));

    let replies_of_new = list_replies(&db, root_new.id, PageParams::default()).await.unwrap();
    assert_eq!(replies_of_new.total, 0);

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn equal_timestamps_keep_a_deterministic_order() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let author = create_test_user(&db, "author", Role::User).await.unwrap();
    let review = create_test_review(&db, author.id, "Factorio").await.unwrap();

    let at = Utc::now().naive_utc();
    let first = create_test_comment(&db, author.id, review.id, None, "a", at).await.unwrap();
    let second = create_test_comment(&db, author.id, review.id, None, "b", at).await.unwrap();

    // Newest-first with the id tie-break puts later insertions first.
    let roots = list_roots(&db, review.id, PageParams::default()).await.unwrap();
    let ids: Vec<i32> = roots.items.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn update_guards_and_preserves_creation_time() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let owner = create_test_user(&db, "owner", Role::User).await.unwrap();
    let stranger = create_test_user(&db, "stranger", Role::User).await.unwrap();
    let moderator = create_test_user(&db, "mod", Role::Moderator).await.unwrap();

    let review = create_test_review(&db, owner.id, "Rain World").await.unwrap();
    let comment = create_comment(&db, owner.id, review.id, "original", None)
        .await
        .unwrap();

    // A plain user who does not own the comment is refused.
    let result = update_comment(&db, stranger.id, Role::User, review.id, comment.id, "hacked").await;
    assert!(matches!(result, Err(Error::Forbidden(_))));

    // Supplying the wrong review id is a mismatch even for the owner.
    let result =
        update_comment(&db, owner.id, Role::User, review.id + 999, comment.id, "text").await;
    assert!(matches!(result, Err(Error::Mismatch(_))));

    // A moderator may edit someone else's comment.
    update_comment(&db, moderator.id, Role::Moderator, review.id, comment.id, "moderated")
        .await
        .expect("moderator update");

    let reloaded = comments::Entity::find_by_id(comment.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.text, "moderated");
    assert_eq!(reloaded.created_at, comment.created_at);

    cleanup_test_data(&db).await.expect("cleanup");
}

#[actix_rt::test]
#[serial]
async fn deleting_a_parent_with_replies_is_refused() {
    let db = setup_test_database().await.expect("db");
    cleanup_test_data(&db).await.expect("cleanup");

    let owner = create_test_user(&db, "owner", Role::User).await.unwrap();
    let review = create_test_review(&db, owner.id, "Subnautica").await.unwrap();

    let parent = create_comment(&db, owner.id, review.id, "parent", None).await.unwrap();
    let reply = create_comment(&db, owner.id, review.id, "reply", Some(parent.id))
        .await
        .unwrap();

    let result = delete_comment(&db, owner.id, Role::User, review.id, parent.id).await;
    assert!(matches!(result, Err(Error::Conflict(_))));

    // Parent is still there.
    assert!(comments::Entity::find_by_id(parent.id)
        .one(&db)
        .await
        .unwrap()
        .is_some());

    // Remove the reply first, then the parent goes away cleanly.
    delete_comment(&db, owner.id, Role::User, review.id, reply.id)
        .await
        .expect("delete reply");
    delete_comment(&db, owner.id, Role::User, review.id, parent.id)
        .await
        .expect("delete parent");

    assert!(comments::Entity::find_by_id(parent.id)
        .one(&db)
        .await
        .unwrap()
        .is_none());

    cleanup_test_data(&db).await.expect("cleanup");
}
