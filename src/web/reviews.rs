//! Review endpoints.

use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::orm::reviews;
use crate::pagination::{Page, PageParams, DEFAULT_PAGE_SIZE};
use crate::reviews::{self as review_ops, ReviewFilter};
use actix_web::{delete, get, post, put, web, Error, HttpResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(create_review)
        .service(list_reviews)
        .service(my_reviews)
        .service(get_review)
        .service(update_review)
        .service(delete_review);
}

#[derive(Serialize)]
struct ReviewResponse {
    id: i32,
    user_id: i32,
    game_name: String,
    description: String,
    created_at: chrono::NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
}

impl ReviewResponse {
    fn from_model(review: reviews::Model, tags: Option<Vec<String>>) -> Self {
        Self {
            id: review.id,
            user_id: review.user_id,
            game_name: review.game_name,
            description: review.description,
            created_at: review.created_at,
            tags,
        }
    }
}

fn validate_tags(tags: &[String]) -> Result<(), validator::ValidationError> {
    if tags.iter().any(|t| t.len() > 20) {
        let mut err = validator::ValidationError::new("length");
        err.message = Some("Tag name cannot exceed 20 characters".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Deserialize, Validate)]
struct ReviewForm {
    #[validate(length(min = 1, max = 30, message = "Game name must be 1-30 characters"))]
    game_name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    description: String,
    #[serde(default)]
    #[validate(custom = "validate_tags")]
    tags: Vec<String>,
}

#[post("/api/reviews")]
async fn create_review(
    client: ClientCtx,
    form: web::Json<ReviewForm>,
) -> Result<HttpResponse, Error> {
    let caller = client.require_login()?;
    form.validate().map_err(crate::Error::from)?;

    let review = review_ops::create_review(
        get_db_pool(),
        caller.id,
        &form.game_name,
        &form.description,
        &form.tags,
    )
    .await?;

    Ok(HttpResponse::Ok().json(review.id))
}

#[derive(Deserialize)]
struct ReviewListQuery {
    search: Option<String>,
    tag: Option<String>,
    sort_by: Option<String>,
    sort_direction: Option<String>,
    page: Option<u64>,
    page_size: Option<u64>,
}

impl ReviewListQuery {
    fn into_filter(self, author_id: Option<i32>) -> ReviewFilter {
        ReviewFilter {
            author_id,
            search: self.search,
            tag: self.tag,
            sort_by: self.sort_by,
            sort_direction: self.sort_direction,
            page: PageParams::new(
                self.page.unwrap_or(1),
                self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            ),
        }
    }
}

#[get("/api/reviews")]
async fn list_reviews(query: web::Query<ReviewListQuery>) -> Result<HttpResponse, Error> {
    let page = review_ops::list_reviews(get_db_pool(), query.into_inner().into_filter(None)).await?;

    Ok(HttpResponse::Ok().json(to_response_page(page)))
}

#[get("/api/reviews/me")]
async fn my_reviews(
    client: ClientCtx,
    query: web::Query<ReviewListQuery>,
) -> Result<HttpResponse, Error> {
    let caller = client.require_login()?;
    let filter = query.into_inner().into_filter(Some(caller.id));
    let page = review_ops::list_reviews(get_db_pool(), filter).await?;

    Ok(HttpResponse::Ok().json(to_response_page(page)))
}

#[get("/api/reviews/{review_id}")]
async fn get_review(path: web::Path<i32>) -> Result<HttpResponse, Error> {
    let (review, tags) = review_ops::get_review(get_db_pool(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ReviewResponse::from_model(review, Some(tags))))
}

#[put("/api/reviews/{review_id}")]
async fn update_review(
    client: ClientCtx,
    path: web::Path<i32>,
    form: web::Json<ReviewForm>,
) -> Result<HttpResponse, Error> {
    let caller = client.require_login()?;
    form.validate().map_err(crate::Error::from)?;

    let id = review_ops::update_review(
        get_db_pool(),
        caller.id,
        caller.role,
        path.into_inner(),
        &form.game_name,
        &form.description,
        &form.tags,
    )
    .await?;

    Ok(HttpResponse::Ok().json(id))
}

#[delete("/api/reviews/{review_id}")]
async fn delete_review(client: ClientCtx, path: web::Path<i32>) -> Result<HttpResponse, Error> {
    let caller = client.require_login()?;

    let id =
        review_ops::delete_review(get_db_pool(), caller.id, caller.role, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(id))
}

fn to_response_page(page: Page<reviews::Model>) -> Page<ReviewResponse> {
    page.map(|review| ReviewResponse::from_model(review, None))
}
