//! User moderation endpoints.
//!
//! Both routes demand an elevated caller at the boundary; the tier guard on
//! the target's role is applied inside the user operations.

use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::session::hash_password;
use crate::users;
use actix_web::{delete, put, web, Error, HttpResponse};
use serde::Deserialize;
use validator::Validate;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(update_user).service(delete_user);
}

#[derive(Deserialize, Validate)]
struct ModerationUpdateForm {
    #[validate(length(min = 1, max = 20, message = "Username must be 1-20 characters"))]
    username: String,
    #[validate(email(message = "Invalid email format"))]
    email: String,
    #[validate(length(min = 8, max = 30, message = "Password must be 8-30 characters"))]
    new_password: String,
}

#[put("/api/moderation/users/{user_id}")]
async fn update_user(
    client: ClientCtx,
    path: web::Path<i32>,
    form: web::Json<ModerationUpdateForm>,
) -> Result<HttpResponse, Error> {
    let caller = client.require_moderator()?;
    form.validate().map_err(crate::Error::from)?;

    let password_hash = hash_password(&form.new_password)
        .map_err(|e| crate::Error::validation(format!("Password rejected: {}", e)))?;

    let id = users::update_user_for_moderation(
        get_db_pool(),
        caller.role,
        path.into_inner(),
        &form.username,
        &form.email,
        &password_hash,
    )
    .await?;

    Ok(HttpResponse::Ok().json(id))
}

#[delete("/api/moderation/users/{user_id}")]
async fn delete_user(client: ClientCtx, path: web::Path<i32>) -> Result<HttpResponse, Error> {
    let caller = client.require_moderator()?;

    let id =
        users::delete_user_for_moderation(get_db_pool(), caller.role, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(id))
}
