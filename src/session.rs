//! Password hashing and session identity helpers.
//!
//! The session cookie stores only the user id; the acting user's role is
//! loaded fresh on every request by the [`crate::middleware::ClientCtx`]
//! extractor, so a role change takes effect immediately.

use actix_session::Session;
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use once_cell::sync::Lazy;

const SESSION_USER_ID: &str = "uid";

static ARGON2: Lazy<Argon2<'static>> = Lazy::new(Argon2::default);

pub fn get_argon2() -> &'static Argon2<'static> {
    &ARGON2
}

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(get_argon2()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Verify a plaintext password against a stored PHC-format hash.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => get_argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::warn!("Stored password hash failed to parse: {}", e);
            false
        }
    }
}

/// Record the authenticated user id on the session.
pub fn login_session(session: &Session, user_id: i32) -> Result<(), actix_web::Error> {
    session
        .insert(SESSION_USER_ID, user_id)
        .map_err(actix_web::Error::from)
}

/// Read the authenticated user id, if any.
pub fn session_user_id(session: &Session) -> Option<i32> {
    session.get::<i32>(SESSION_USER_ID).ok().flatten()
}

/// Drop the session entirely.
pub fn logout_session(session: &Session) {
    session.purge();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hash = hash_password("correct horse").expect("hashing failed");
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
