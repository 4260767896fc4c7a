//! Per-request client context.
//!
//! The extractor reads the session cookie and loads the acting user's row,
//! so every handler sees a fresh id/role pair. A missing or stale session
//! simply yields a guest context; routes that need identity call
//! `require_login`/`require_moderator` and let the error map to 401/403.

use crate::db::get_db_pool;
use crate::moderation::is_elevated;
use crate::orm::users::{self, Role};
use crate::session::session_user_id;
use actix_session::SessionExt;
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use sea_orm::EntityTrait;

/// The authenticated caller for one request cycle.
#[derive(Clone, Debug)]
pub struct Client {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

/// Client context passed to routes. `None` is a guest.
#[derive(Clone, Debug, Default)]
pub struct ClientCtx {
    client: Option<Client>,
}

impl ClientCtx {
    pub fn client(&self) -> Option<&Client> {
        self.client.as_ref()
    }

    pub fn is_user(&self) -> bool {
        self.client.is_some()
    }

    pub fn is_moderator(&self) -> bool {
        self.client
            .as_ref()
            .map(|c| is_elevated(c.role))
            .unwrap_or(false)
    }

    /// The caller, or `Unauthorized` for guests.
    pub fn require_login(&self) -> Result<&Client, crate::Error> {
        self.client.as_ref().ok_or(crate::Error::Unauthorized)
    }

    /// The caller if Moderator/Admin; guests get 401, plain users 403.
    pub fn require_moderator(&self) -> Result<&Client, crate::Error> {
        let client = self.require_login()?;
        if is_elevated(client.role) {
            Ok(client)
        } else {
            Err(crate::Error::Forbidden("resource"))
        }
    }
}

impl FromRequest for ClientCtx {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, actix_web::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let session = req.get_session();

        Box::pin(async move {
            let user_id = match session_user_id(&session) {
                Some(id) => id,
                None => return Ok(ClientCtx::default()),
            };

            let user = users::Entity::find_by_id(user_id)
                .one(get_db_pool())
                .await
                .map_err(crate::Error::Database)?;

            let client = match user {
                Some(user) => Some(Client {
                    id: user.id,
                    username: user.username,
                    role: user.role,
                }),
                None => {
                    // Session outlived the account.
                    session.purge();
                    None
                }
            };

            Ok(ClientCtx { client })
        })
    }
}
