//! Seat assignment: which member occupies which [`Position`] in a
//! game, used by the orchestrator to resolve a mover's identity and
//! by the REST surface to report game membership.
use arena_core::ID;
use arena_core::Position;
use arena_core::Unique;
use arena_database::GameRow;
use arena_database::Member;
use arena_pg::SEATS;
use arena_pg::Schema;

#[derive(Debug, Clone, Copy)]
pub struct Participant {
    id: ID<Self>,
    game: ID<GameRow>,
    seat: Position,
    member: ID<Member>,
}

impl Unique for Participant {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

impl Participant {
    pub fn new(game: ID<GameRow>, seat: Position, member: ID<Member>) -> Self {
        Self {
            id: ID::default(),
            game,
            seat,
            member,
        }
    }
    pub fn game(&self) -> ID<GameRow> {
        self.game
    }
    pub fn seat(&self) -> Position {
        self.seat
    }
    pub fn member(&self) -> ID<Member> {
        self.member
    }

    pub async fn insert(&self, client: &tokio_postgres::Client) -> Result<(), tokio_postgres::Error> {
        client
            .execute(
                "INSERT INTO seats (id, game_id, seat, member_id) VALUES ($1, $2, $3, $4)",
                &[&self.id.inner(), &self.game.inner(), &(self.seat as i32), &self.member.inner()],
            )
            .await?;
        Ok(())
    }

    pub async fn for_game(
        client: &tokio_postgres::Client,
        game: ID<GameRow>,
    ) -> Result<Vec<Self>, tokio_postgres::Error> {
        let rows = client
            .query(
                "SELECT id, game_id, seat, member_id FROM seats WHERE game_id = $1 ORDER BY seat ASC",
                &[&game.inner()],
            )
            .await?;
        Ok(rows.into_iter().map(Self::from_row).collect())
    }

    fn from_row(row: tokio_postgres::Row) -> Self {
        Self {
            id: row.get::<_, uuid::Uuid>(0).into(),
            game: row.get::<_, uuid::Uuid>(1).into(),
            seat: row.get::<_, i32>(2) as Position,
            member: row.get::<_, uuid::Uuid>(3).into(),
        }
    }
}

impl Schema for Participant {
    fn name() -> &'static str {
        SEATS
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            SEATS,
            " (
                id        UUID PRIMARY KEY,
                game_id   UUID NOT NULL REFERENCES games(id) ON DELETE CASCADE,
                seat      INTEGER NOT NULL,
                member_id UUID NOT NULL REFERENCES members(id),
                UNIQUE (game_id, seat)
            );"
        )
    }
    fn indices() -> &'static str {
        const_format::concatcp!(
            "CREATE INDEX IF NOT EXISTS idx_seats_game ON ",
            SEATS,
            " (game_id);"
        )
    }
    fn truncates() -> &'static str {
        const_format::concatcp!("TRUNCATE TABLE ", SEATS, ";")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_participant_remembers_its_seat() {
        let game = ID::default();
        let member = ID::default();
        let participant = Participant::new(game, 1, member);
        assert_eq!(participant.seat(), 1);
        assert_eq!(participant.member(), member);
    }
}
