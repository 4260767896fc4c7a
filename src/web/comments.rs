//! Threaded-comment endpoints, nested under their review.

use crate::comments as comment_ops;
use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::orm::comments;
use crate::pagination::{Page, PageParams, DEFAULT_PAGE_SIZE};
use actix_web::{delete, get, post, put, web, Error, HttpResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(create_root_comment)
        .service(create_reply)
        .service(list_root_comments)
        .service(list_replies)
        .service(update_comment)
        .service(delete_comment);
}

#[derive(Serialize)]
struct CommentResponse {
    id: i32,
    user_id: i32,
    review_id: i32,
    parent_comment_id: Option<i32>,
    text: String,
    created_at: chrono::NaiveDateTime,
}

impl From<comments::Model> for CommentResponse {
    fn from(comment: comments::Model) -> Self {
        Self {
            id: comment.id,
            user_id: comment.user_id,
            review_id: comment.review_id,
            parent_comment_id: comment.parent_comment_id,
            text: comment.text,
            created_at: comment.created_at,
        }
    }
}

#[derive(Deserialize, Validate)]
struct CommentForm {
    #[validate(length(min = 1, max = 505, message = "Comment text must be 1-505 characters"))]
    text: String,
}

#[derive(Deserialize)]
struct CommentPageQuery {
    page: Option<u64>,
    page_size: Option<u64>,
}

impl CommentPageQuery {
    fn params(&self) -> PageParams {
        PageParams::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

#[post("/api/reviews/{review_id}/comments")]
async fn create_root_comment(
    client: ClientCtx,
    path: web::Path<i32>,
    form: web::Json<CommentForm>,
) -> Result<HttpResponse, Error> {
    let caller = client.require_login()?;
    form.validate().map_err(crate::Error::from)?;

    let comment =
        comment_ops::create_comment(get_db_pool(), caller.id, path.into_inner(), &form.text, None)
            .await?;

    Ok(HttpResponse::Ok().json(comment.id))
}

#[post("/api/reviews/{review_id}/comments/{parent_comment_id}/replies")]
async fn create_reply(
    client: ClientCtx,
    path: web::Path<(i32, i32)>,
    form: web::Json<CommentForm>,
) -> Result<HttpResponse, Error> {
    let caller = client.require_login()?;
    form.validate().map_err(crate::Error::from)?;

    let (review_id, parent_comment_id) = path.into_inner();
    let comment = comment_ops::create_comment(
        get_db_pool(),
        caller.id,
        review_id,
        &form.text,
        Some(parent_comment_id),
    )
    .await?;

    Ok(HttpResponse::Ok().json(comment.id))
}

#[get("/api/reviews/{review_id}/comments")]
async fn list_root_comments(
    path: web::Path<i32>,
    query: web::Query<CommentPageQuery>,
) -> Result<HttpResponse, Error> {
    let page =
        comment_ops::list_roots(get_db_pool(), path.into_inner(), query.params()).await?;

    Ok(HttpResponse::Ok().json(to_response_page(page)))
}

#[get("/api/reviews/{review_id}/comments/{parent_comment_id}/replies")]
async fn list_replies(
    path: web::Path<(i32, i32)>,
    query: web::Query<CommentPageQuery>,
) -> Result<HttpResponse, Error> {
    let (_review_id, parent_comment_id) = path.into_inner();
    let page =
        comment_ops::list_replies(get_db_pool(), parent_comment_id, query.params()).await?;

    Ok(HttpResponse::Ok().json(to_response_page(page)))
}

#[put("/api/reviews/{review_id}/comments/{comment_id}")]
async fn update_comment(
    client: ClientCtx,
    path: web::Path<(i32, i32)>,
    form: web::Json<CommentForm>,
) -> Result<HttpResponse, Error> {
    let caller = client.require_login()?;
    form.validate().map_err(crate::Error::from)?;

    let (review_id, comment_id) = path.into_inner();
    let id = comment_ops::update_comment(
        get_db_pool(),
        caller.id,
        caller.role,
        review_id,
        comment_id,
        &form.text,
    )
    .await?;

    Ok(HttpResponse::Ok().json(id))
}

#[delete("/api/reviews/{review_id}/comments/{comment_id}")]
async fn delete_comment(
    client: ClientCtx,
    path: web::Path<(i32, i32)>,
) -> Result<HttpResponse, Error> {
    let caller = client.require_login()?;

    let (review_id, comment_id) = path.into_inner();
    let id = comment_ops::delete_comment(
        get_db_pool(),
        caller.id,
        caller.role,
        review_id,
        comment_id,
    )
    .await?;

    Ok(HttpResponse::Ok().json(id))
}

fn to_response_page(page: Page<comments::Model>) -> Page<CommentResponse> {
    page.map(CommentResponse::from)
}
