//! One applied move, kept around for replay and undo (distilled spec
//! §4.5, "Undo (Chess): replay from the stored initial position over
//! the move-history list"). Every kind's moves are recorded uniformly
//! through [`arena_rules::AnyMove`] rather than one table per game.
use arena_core::ID;
use arena_core::Unique;
use arena_database::GameRow;
use arena_database::Member;
use arena_pg::MOVES;
use arena_pg::Schema;
use arena_rules::AnyMove;

/// Composite identity: (game, seq). `seq` is the zero-based ordinal of
/// this move within its game's history.
#[derive(Debug, Clone)]
pub struct Play {
    game: ID<GameRow>,
    seq: u32,
    mover: Option<ID<Member>>,
    action: AnyMove,
}

impl Play {
    pub fn new(game: ID<GameRow>, seq: u32, mover: Option<ID<Member>>, action: AnyMove) -> Self {
        Self {
            game,
            seq,
            mover,
            action,
        }
    }
    pub fn game(&self) -> ID<GameRow> {
        self.game
    }
    pub fn seq(&self) -> u32 {
        self.seq
    }
    pub fn mover(&self) -> Option<ID<Member>> {
        self.mover
    }
    pub fn action(&self) -> &AnyMove {
        &self.action
    }

    pub async fn insert(&self, client: &tokio_postgres::Client) -> Result<(), tokio_postgres::Error> {
        let action = serde_json::to_value(&self.action).expect("AnyMove always serializes");
        client
            .execute(
                "INSERT INTO moves (game_id, seq, mover_id, action) VALUES ($1, $2, $3, $4)",
                &[&self.game.inner(), &(self.seq as i32), &self.mover.map(|m| m.inner()), &action],
            )
            .await?;
        Ok(())
    }

    /// The full recorded history for a game, in application order —
    /// the sequence the Chess undo handler replays to rebuild state.
    pub async fn history(
        client: &tokio_postgres::Client,
        game: ID<GameRow>,
    ) -> Result<Vec<Self>, tokio_postgres::Error> {
        let rows = client
            .query(
                "SELECT game_id, seq, mover_id, action FROM moves WHERE game_id = $1 ORDER BY seq ASC",
                &[&game.inner()],
            )
            .await?;
        Ok(rows.into_iter().map(Self::from_row).collect())
    }

    fn from_row(row: tokio_postgres::Row) -> Self {
        let action: serde_json::Value = row.get(3);
        let mover: Option<uuid::Uuid> = row.get(2);
        Self {
            game: row.get::<_, uuid::Uuid>(0).into(),
            seq: row.get::<_, i32>(1) as u32,
            mover: mover.map(ID::from),
            action: serde_json::from_value(action).expect("persisted move round-trips"),
        }
    }
}

impl Schema for Play {
    fn name() -> &'static str {
        MOVES
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            MOVES,
            " (
                game_id   UUID NOT NULL REFERENCES games(id) ON DELETE CASCADE,
                seq       INTEGER NOT NULL,
                mover_id  UUID REFERENCES members(id),
                action    JSONB NOT NULL,
                PRIMARY KEY (game_id, seq)
            );"
        )
    }
    fn indices() -> &'static str {
        const_format::concatcp!(
            "CREATE INDEX IF NOT EXISTS idx_moves_game ON ",
            MOVES,
            " (game_id, seq);"
        )
    }
    fn truncates() -> &'static str {
        const_format::concatcp!("TRUNCATE TABLE ", MOVES, ";")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_play_carries_its_ordinal_and_mover() {
        let game = ID::default();
        let mover = ID::default();
        let play = Play::new(game, 3, Some(mover), AnyMove::TicTacToe(4));
        assert_eq!(play.seq(), 3);
        assert_eq!(play.mover(), Some(mover));
        assert_eq!(play.game(), game);
    }
}
