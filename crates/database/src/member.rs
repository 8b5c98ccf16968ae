//! Player identity (distilled spec §3): id, display name, human-or-AI
//! kind, and an optional credential hash for humans. AI identities are
//! name-keyed into the AI registry via their own `display_name`
//! (distilled spec §3, "AI identities are name-keyed into the AI
//! registry"), so no separate AI-profile table is needed.
use arena_core::ID;
use arena_core::Unique;
use arena_pg::MEMBERS;
use arena_pg::Schema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Human,
    Ai,
}

#[derive(Debug, Clone)]
pub struct Member {
    id: ID<Self>,
    display_name: String,
    kind: MemberKind,
    credential_hash: Option<Vec<u8>>,
}

impl Unique for Member {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

impl Member {
    pub fn human(display_name: impl Into<String>, credential_hash: Vec<u8>) -> Self {
        Self {
            id: ID::default(),
            display_name: display_name.into(),
            kind: MemberKind::Human,
            credential_hash: Some(credential_hash),
        }
    }

    pub fn ai(display_name: impl Into<String>) -> Self {
        Self {
            id: ID::default(),
            display_name: display_name.into(),
            kind: MemberKind::Ai,
            credential_hash: None,
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn is_ai(&self) -> bool {
        self.kind == MemberKind::Ai
    }

    pub fn credential_hash(&self) -> Option<&[u8]> {
        self.credential_hash.as_deref()
    }

    pub async fn insert(&self, client: &tokio_postgres::Client) -> Result<(), arena_pg::PgErr> {
        client
            .execute(
                "INSERT INTO members (id, display_name, kind, credential_hash) VALUES ($1, $2, $3, $4)",
                &[
                    &self.id.inner(),
                    &self.display_name,
                    &matches!(self.kind, MemberKind::Ai),
                    &self.credential_hash,
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn by_id(
        client: &tokio_postgres::Client,
        id: ID<Self>,
    ) -> Result<Option<Self>, arena_pg::PgErr> {
        let row = client
            .query_opt("SELECT id, display_name, kind, credential_hash FROM members WHERE id = $1", &[&id.inner()])
            .await?;
        Ok(row.map(Self::from_row))
    }

    pub async fn by_display_name(
        client: &tokio_postgres::Client,
        display_name: &str,
    ) -> Result<Option<Self>, arena_pg::PgErr> {
        let row = client
            .query_opt(
                "SELECT id, display_name, kind, credential_hash FROM members WHERE display_name = $1",
                &[&display_name],
            )
            .await?;
        Ok(row.map(Self::from_row))
    }

    fn from_row(row: tokio_postgres::Row) -> Self {
        let is_ai: bool = row.get(2);
        Self {
            id: row.get::<_, uuid::Uuid>(0).into(),
            display_name: row.get(1),
            kind: if is_ai { MemberKind::Ai } else { MemberKind::Human },
            credential_hash: row.get(3),
        }
    }
}

impl Schema for Member {
    fn name() -> &'static str {
        MEMBERS
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            MEMBERS,
            " (
                id              UUID PRIMARY KEY,
                display_name    TEXT NOT NULL UNIQUE,
                kind            BOOLEAN NOT NULL,
                credential_hash BYTEA
            );"
        )
    }
    fn indices() -> &'static str {
        const_format::concatcp!(
            "CREATE INDEX IF NOT EXISTS idx_members_display_name ON ",
            MEMBERS,
            " (display_name);"
        )
    }
    fn truncates() -> &'static str {
        const_format::concatcp!("TRUNCATE TABLE ", MEMBERS, " CASCADE;")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ai_member_has_no_credential() {
        let ai = Member::ai("negamax");
        assert!(ai.is_ai());
        assert!(ai.credential_hash().is_none());
        assert_eq!(ai.display_name(), "negamax");
    }

    #[test]
    fn human_member_carries_its_hash() {
        let human = Member::human("alice", vec![1, 2, 3]);
        assert!(!human.is_ai());
        assert_eq!(human.credential_hash(), Some([1, 2, 3].as_slice()));
    }
}
