use crate::Crypto;
use arena_core::ID;
use arena_core::Unique;
use arena_database::Member;
use arena_database::SESSIONS;
use arena_database::Schema;

/// Persisted session for token management; revoking a session
/// invalidates every bearer token issued under it immediately.
#[derive(Debug, Clone)]
pub struct Session {
    id: ID<Self>,
    user: ID<Member>,
    hash: Vec<u8>,
    expires: std::time::SystemTime,
    revoked: bool,
}

impl Unique for Session {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

impl Session {
    pub fn new(user: ID<Member>, hash: Vec<u8>) -> Self {
        Self {
            id: ID::default(),
            user,
            hash,
            expires: std::time::SystemTime::now() + Crypto::duration(),
            revoked: false,
        }
    }

    pub fn user(&self) -> ID<Member> {
        self.user
    }

    pub fn with_hash(mut self, hash: Vec<u8>) -> Self {
        self.hash = hash;
        self
    }

    pub fn hash(&self) -> &[u8] {
        &self.hash
    }

    pub fn expires_at(&self) -> std::time::SystemTime {
        self.expires
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked
    }

    pub async fn insert(&self, client: &tokio_postgres::Client) -> Result<(), tokio_postgres::Error> {
        client
            .execute(
                "INSERT INTO sessions (id, user_id, token_hash, expires_at, revoked) VALUES ($1, $2, $3, $4, $5)",
                &[&self.id.inner(), &self.user.inner(), &self.hash, &self.expires, &self.revoked],
            )
            .await?;
        Ok(())
    }

    pub async fn revoke(client: &tokio_postgres::Client, id: ID<Self>) -> Result<(), tokio_postgres::Error> {
        client
            .execute("UPDATE sessions SET revoked = TRUE WHERE id = $1", &[&id.inner()])
            .await?;
        Ok(())
    }

    pub async fn is_revoked_in_db(
        client: &tokio_postgres::Client,
        id: ID<Self>,
    ) -> Result<bool, tokio_postgres::Error> {
        let row = client
            .query_opt("SELECT revoked FROM sessions WHERE id = $1", &[&id.inner()])
            .await?;
        Ok(row.map(|r| r.get(0)).unwrap_or(true))
    }
}

impl Schema for Session {
    fn name() -> &'static str {
        SESSIONS
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            SESSIONS,
            " (
                id          UUID PRIMARY KEY,
                user_id     UUID NOT NULL REFERENCES members(id) ON DELETE CASCADE,
                token_hash  BYTEA NOT NULL,
                expires_at  TIMESTAMPTZ NOT NULL,
                revoked     BOOLEAN NOT NULL DEFAULT FALSE
            );"
        )
    }
    fn indices() -> &'static str {
        const_format::concatcp!(
            "CREATE INDEX IF NOT EXISTS idx_sessions_user ON ",
            SESSIONS,
            " (user_id);
             CREATE INDEX IF NOT EXISTS idx_sessions_expires ON ",
            SESSIONS,
            " (expires_at) WHERE NOT revoked;"
        )
    }
    fn truncates() -> &'static str {
        const_format::concatcp!("TRUNCATE TABLE ", SESSIONS, ";")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_fresh_session_is_not_revoked() {
        let session = Session::new(ID::default(), vec![1, 2, 3]);
        assert!(!session.is_revoked());
        assert!(session.expires_at() > std::time::SystemTime::now());
    }
}
