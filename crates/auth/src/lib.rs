//! Bearer-token authentication: JWT issuance/verification, password
//! hashing, and (behind the `server` feature) the actix-web extractors
//! that sit in front of every mutating REST handler.
pub mod crypto;
pub mod dto;
pub mod session;

#[cfg(feature = "server")]
pub mod middleware;

pub use crypto::Crypto;
pub use session::Session;

use arena_core::ID;
use arena_database::Member;
use arena_database::Schema;

/// Creates the sessions table. Must run after [`arena_database::migrate`]
/// since it references `members` by foreign key.
pub async fn migrate(client: &tokio_postgres::Client) -> Result<(), tokio_postgres::Error> {
    client.batch_execute(Session::creates()).await?;
    client.batch_execute(Session::indices()).await?;
    Ok(())
}

/// JWT payload: identifies the member and the session backing the
/// token, so a revoked session invalidates every token issued under it
/// even before expiry.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    sub: ID<Member>,
    sid: ID<Session>,
    exp: u64,
}

impl Claims {
    pub fn new(user: ID<Member>, session: ID<Session>) -> Self {
        let expires_at = std::time::SystemTime::now() + Crypto::duration();
        let exp = expires_at
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system clock is after the epoch")
            .as_secs();
        Self {
            sub: user,
            sid: session,
            exp,
        }
    }

    pub fn user(&self) -> ID<Member> {
        self.sub
    }

    pub fn session(&self) -> ID<Session> {
        self.sid
    }

    pub fn expired(&self) -> bool {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system clock is after the epoch")
            .as_secs();
        now >= self.exp
    }
}

/// Hashes a plaintext password with Argon2, returning the PHC string
/// form suitable for storage in [`Member::credential_hash`].
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::PasswordHasher;
    let salt = argon2::password_hash::SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2::Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verifies a plaintext password against a stored PHC hash string.
pub fn verify_password(password: &str, stored: &str) -> bool {
    use argon2::PasswordVerifier;
    let Ok(parsed) = argon2::PasswordHash::new(stored) else {
        return false;
    };
    argon2::Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_fresh_claim_is_not_expired() {
        let claims = Claims::new(ID::default(), ID::default());
        assert!(!claims.expired());
    }

    #[test]
    fn password_hashing_round_trips() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("wrong", &hash));
    }
}
