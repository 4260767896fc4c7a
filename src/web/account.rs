//! Registration, login, and self-service account management.

use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::orm::users::Role;
use crate::session::{hash_password, login_session, logout_session, verify_password};
use crate::users;
use actix_session::Session;
use actix_web::{get, post, put, web, Error, HttpResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(register)
        .service(login)
        .service(logout)
        .service(current_user)
        .service(update_own_account);
}

#[derive(Serialize)]
struct UserResponse {
    id: i32,
    username: String,
    email: String,
    role: Role,
}

#[derive(Deserialize, Validate)]
struct RegisterForm {
    #[validate(length(min = 1, max = 20, message = "Username must be 1-20 characters"))]
    username: String,
    #[validate(length(min = 8, max = 30, message = "Password must be 8-30 characters"))]
    password: String,
    #[validate(email(message = "Invalid email format"))]
    email: String,
}

#[post("/api/register")]
async fn register(
    session: Session,
    form: web::Json<RegisterForm>,
) -> Result<HttpResponse, Error> {
    form.validate().map_err(crate::Error::from)?;

    let password_hash = hash_password(&form.password)
        .map_err(|e| crate::Error::validation(format!("Password rejected: {}", e)))?;

    let user = users::create_user(get_db_pool(), &form.username, &form.email, &password_hash)
        .await?;

    login_session(&session, user.id)?;

    Ok(HttpResponse::Ok().json(UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        role: user.role,
    }))
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

#[post("/api/login")]
async fn login(session: Session, form: web::Json<LoginForm>) -> Result<HttpResponse, Error> {
    let user = users::get_by_username(get_db_pool(), &form.username).await?;

    // Same rejection for unknown user and bad password.
    let user = match user {
        Some(user) if verify_password(&form.password, &user.password_hash) => user,
        _ => {
            log::warn!("Failed login attempt for username {:?}", form.username);
            return Err(crate::Error::validation("Invalid username or password").into());
        }
    };

    login_session(&session, user.id)?;

    Ok(HttpResponse::Ok().json(UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        role: user.role,
    }))
}

#[post("/api/logout")]
async fn logout(session: Session) -> HttpResponse {
    logout_session(&session);
    HttpResponse::Ok().finish()
}

#[get("/api/me")]
async fn current_user(client: ClientCtx) -> Result<HttpResponse, Error> {
    let caller = client.require_login()?;
    let user = users::get_user(get_db_pool(), caller.id).await?;

    Ok(HttpResponse::Ok().json(UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        role: user.role,
    }))
}

#[derive(Deserialize, Validate)]
struct UpdateAccountForm {
    #[validate(length(min = 1, max = 20, message = "Username must be 1-20 characters"))]
    username: String,
    #[validate(email(message = "Invalid email format"))]
    email: String,
    #[validate(length(min = 8, max = 30, message = "Password must be 8-30 characters"))]
    new_password: String,
}

/// Self-service path. Deliberately does not consult the moderation tier
/// guard: a user always owns their own account.
#[put("/api/me")]
async fn update_own_account(
    client: ClientCtx,
    form: web::Json<UpdateAccountForm>,
) -> Result<HttpResponse, Error> {
    let caller = client.require_login()?;
    form.validate().map_err(crate::Error::from)?;

    let password_hash = hash_password(&form.new_password)
        .map_err(|e| crate::Error::validation(format!("Password rejected: {}", e)))?;

    let id = users::update_own_account(
        get_db_pool(),
        caller.id,
        &form.username,
        &form.email,
        &password_hash,
    )
    .await?;

    Ok(HttpResponse::Ok().json(id))
}
