//! Game row store adapter (distilled spec §3, §4, component "Game row
//! store adapter"): CRUD for the per-instance row the turn orchestrator
//! loads, mutates, and persists. The row's `state` and `config` columns
//! hold opaque JSON blobs — this crate never interprets their contents,
//! only `arena-rules`/`arena-gameroom` do.
use crate::Member;
use arena_core::ID;
use arena_core::Kind;
use arena_core::Position;
use arena_core::Unique;
use arena_pg::GAMES;
use arena_pg::Schema;
use arena_rules::AnyState;
use arena_rules::Status;

/// Maps a [`Status`] onto the `in_progress` / terminal-tag taxonomy
/// distilled spec §3 describes for the row's `status` column.
pub fn status_tag(status: Status) -> String {
    match status {
        Status::InProgress => "in_progress".to_string(),
        Status::Draw => "draw".to_string(),
        Status::Stalemate => "stalemate".to_string(),
        Status::Won { winner } => format!("p{winner}_won"),
        Status::Checkmate { winner } => format!("p{winner}_checkmate"),
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GameRow {
    id: ID<Self>,
    state: AnyState,
    participants: Vec<ID<Member>>,
    created_at: std::time::SystemTime,
}

impl Unique for GameRow {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

impl GameRow {
    pub fn new(state: AnyState, participants: Vec<ID<Member>>) -> Self {
        Self {
            id: ID::default(),
            state,
            participants,
            created_at: std::time::SystemTime::now(),
        }
    }

    pub fn kind(&self) -> Kind {
        self.state.kind()
    }

    pub fn state(&self) -> &AnyState {
        &self.state
    }

    pub fn turn(&self) -> Position {
        self.state.turn()
    }

    pub fn status(&self) -> Status {
        self.state.status()
    }

    pub fn participants(&self) -> &[ID<Member>] {
        &self.participants
    }

    /// The participant designated by the current turn, if the seat index
    /// is in range (it always is for a row this crate produced).
    pub fn mover(&self) -> Option<ID<Member>> {
        self.participants.get(self.turn()).copied()
    }

    pub fn replace_state(&mut self, state: AnyState) {
        self.state = state;
    }

    pub async fn insert(&self, client: &tokio_postgres::Client) -> Result<(), arena_pg::PgErr> {
        let state = serde_json::to_value(&self.state).expect("AnyState always serializes");
        let kind = self.kind().to_string();
        let status = status_tag(self.status());
        let participants: Vec<uuid::Uuid> = self.participants.iter().map(|p| p.inner()).collect();
        client
            .execute(
                "INSERT INTO games (id, kind, state, turn, status, participants, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
                &[
                    &self.id.inner(),
                    &kind,
                    &state,
                    &(self.turn() as i32),
                    &status,
                    &participants,
                    &self.created_at,
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn update(&self, client: &tokio_postgres::Client) -> Result<(), arena_pg::PgErr> {
        let state = serde_json::to_value(&self.state).expect("AnyState always serializes");
        let status = status_tag(self.status());
        client
            .execute(
                "UPDATE games SET state = $2, turn = $3, status = $4 WHERE id = $1",
                &[&self.id.inner(), &state, &(self.turn() as i32), &status],
            )
            .await?;
        Ok(())
    }

    pub async fn delete(client: &tokio_postgres::Client, id: ID<Self>) -> Result<(), arena_pg::PgErr> {
        client.execute("DELETE FROM games WHERE id = $1", &[&id.inner()]).await?;
        Ok(())
    }

    pub async fn by_id(
        client: &tokio_postgres::Client,
        id: ID<Self>,
    ) -> Result<Option<Self>, arena_pg::PgErr> {
        let row = client
            .query_opt(
                "SELECT id, state, participants, created_at FROM games WHERE id = $1",
                &[&id.inner()],
            )
            .await?;
        Ok(row.map(Self::from_row))
    }

    pub async fn in_progress(
        client: &tokio_postgres::Client,
        kind: Kind,
    ) -> Result<Vec<Self>, arena_pg::PgErr> {
        let rows = client
            .query(
                "SELECT id, state, participants, created_at FROM games
                 WHERE kind = $1 AND status = 'in_progress' ORDER BY created_at DESC",
                &[&kind.to_string()],
            )
            .await?;
        Ok(rows.into_iter().map(Self::from_row).collect())
    }

    fn from_row(row: tokio_postgres::Row) -> Self {
        let state: serde_json::Value = row.get(1);
        let participants: Vec<uuid::Uuid> = row.get(2);
        Self {
            id: row.get::<_, uuid::Uuid>(0).into(),
            state: serde_json::from_value(state).expect("persisted state round-trips"),
            participants: participants.into_iter().map(ID::from).collect(),
            created_at: row.get(3),
        }
    }
}

impl Schema for GameRow {
    fn name() -> &'static str {
        GAMES
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            GAMES,
            " (
                id              UUID PRIMARY KEY,
                kind            TEXT NOT NULL,
                state           JSONB NOT NULL,
                turn            INTEGER NOT NULL,
                status          TEXT NOT NULL,
                participants    UUID[] NOT NULL,
                created_at      TIMESTAMPTZ NOT NULL
            );"
        )
    }
    fn indices() -> &'static str {
        const_format::concatcp!(
            "CREATE INDEX IF NOT EXISTS idx_games_kind_status ON ",
            GAMES,
            " (kind, status);"
        )
    }
    fn truncates() -> &'static str {
        const_format::concatcp!("TRUNCATE TABLE ", GAMES, ";")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_rules::AnyConfig;

    #[test]
    fn fresh_row_reports_the_right_kind_and_mover() {
        let state = AnyState::initial(AnyConfig::TicTacToe(Default::default()));
        let p0: ID<Member> = ID::default();
        let p1: ID<Member> = ID::default();
        let row = GameRow::new(state, vec![p0, p1]);
        assert_eq!(row.kind(), arena_core::Kind::TicTacToe);
        assert_eq!(row.mover(), Some(p0));
    }

    #[test]
    fn status_tag_matches_the_distilled_taxonomy() {
        assert_eq!(status_tag(Status::InProgress), "in_progress");
        assert_eq!(status_tag(Status::Draw), "draw");
        assert_eq!(status_tag(Status::Won { winner: 1 }), "p1_won");
    }
}
