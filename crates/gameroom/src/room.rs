//! Per-game turn orchestrator (distilled spec §4.5): validates the
//! mover, applies a move through the rule engine, persists the row,
//! publishes the resulting event, then loops AI turns until a human is
//! back on move or the game ends.
use crate::Event;
use crate::Protocol;
use crate::Table;
use arena_core::ID;
use arena_core::Kind;
use arena_database::GameRow;
use arena_database::Member;
use arena_players::Registry;
use arena_records::Participant;
use arena_records::Play;
use arena_rules::AnyConfig;
use arena_rules::AnyMove;
use arena_rules::Status;
use tokio::sync::Mutex;

#[derive(Debug, Clone, thiserror::Error)]
pub enum RoomError {
    #[error("game not found")]
    NotFound,
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("game is already over")]
    GameOver,
    #[error("illegal move: {0}")]
    IllegalMove(String),
    #[error("internal error: {0}")]
    Internal(String),
}

fn internal(e: impl std::fmt::Display) -> RoomError {
    RoomError::Internal(e.to_string())
}

/// Imperative shell around a single game row: owns the per-row event
/// stream and mediates every mutation through the rule engine.
///
/// `lock` is the per-row logical lock the turn orchestrator requires:
/// `Arc<Room>` sharing (see `arena-hosting`'s room registry) makes a
/// `Room` reachable from concurrent requests, but reachability alone
/// doesn't serialize the read-apply-persist-publish sequence below —
/// two overlapping `apply_move` calls would otherwise both read the
/// same row, both pass the mover check, and race on `GameRow::update`.
/// Holding `lock` for that whole sequence is what actually serializes
/// it, one cascade at a time.
pub struct Room {
    id: ID<GameRow>,
    table: Table,
    lock: Mutex<()>,
}

impl Room {
    pub fn new(id: ID<GameRow>) -> Self {
        Self {
            id,
            table: Table::new(),
            lock: Mutex::new(()),
        }
    }

    pub fn id(&self) -> ID<GameRow> {
        self.id
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.table.subscribe()
    }

    /// Creates a new row, persists it, and publishes its `create` event.
    /// Runs the AI cascade immediately in case the first mover is an AI.
    pub async fn create(
        client: &tokio_postgres::Client,
        registry: &Registry,
        _kind: Kind,
        config: AnyConfig,
        participants: Vec<ID<Member>>,
    ) -> Result<(Self, GameRow), RoomError> {
        let state = arena_rules::AnyState::initial(config);
        let status = state.status();
        let mut row = GameRow::new(state, participants.clone());
        row.insert(client).await.map_err(internal)?;
        for (seat, member) in participants.iter().enumerate() {
            Participant::new(row.id(), seat, *member).insert(client).await.map_err(internal)?;
        }
        let room = Self::new(row.id());
        room.table.publish(Event::Create {
            state: row.state().clone(),
            status,
        });
        room.cascade(client, registry, &mut row).await?;
        Ok((room, row))
    }

    /// Validates the requester is on move, applies the decoded move,
    /// persists and publishes, then cascades any following AI turns.
    pub async fn apply_move(
        &self,
        client: &tokio_postgres::Client,
        registry: &Registry,
        requester: ID<Member>,
        body: serde_json::Value,
    ) -> Result<GameRow, RoomError> {
        let _guard = self.lock.lock().await;
        let mut row = GameRow::by_id(client, self.id)
            .await
            .map_err(internal)?
            .ok_or(RoomError::NotFound)?;
        if row.status() != Status::InProgress {
            return Err(RoomError::GameOver);
        }
        let mover = row.mover().ok_or_else(|| internal("no participant at the current seat"))?;
        if mover != requester {
            return Err(RoomError::NotYourTurn);
        }
        let mv = Protocol::decode(row.state(), body).map_err(|e| RoomError::IllegalMove(e.to_string()))?;
        self.apply_and_record(client, &mut row, Some(requester), mv).await?;
        self.cascade(client, registry, &mut row).await?;
        Ok(row)
    }

    /// Chess-only: replays history truncated by `plies`.
    pub async fn undo(&self, client: &tokio_postgres::Client, plies: usize) -> Result<GameRow, RoomError> {
        let _guard = self.lock.lock().await;
        let mut row = GameRow::by_id(client, self.id)
            .await
            .map_err(internal)?
            .ok_or(RoomError::NotFound)?;
        let next = row.state().undo(plies).map_err(|e| RoomError::IllegalMove(e.to_string()))?;
        row.replace_state(next);
        row.update(client).await.map_err(internal)?;
        self.table.publish(Event::Undo {
            state: row.state().clone(),
            status: row.status(),
        });
        Ok(row)
    }

    async fn apply_and_record(
        &self,
        client: &tokio_postgres::Client,
        row: &mut GameRow,
        by: Option<ID<Member>>,
        mv: AnyMove,
    ) -> Result<(), RoomError> {
        let (next, status) = row.state().apply(mv).map_err(|e| RoomError::IllegalMove(e.to_string()))?;
        row.replace_state(next);
        row.update(client).await.map_err(internal)?;
        let seq = Play::history(client, row.id()).await.map_err(internal)?.len() as u32;
        Play::new(row.id(), seq, by, mv)
            .insert(client)
            .await
            .map_err(internal)?;
        log::debug!("[room {}] applied move by {:?}, status now {:?}", row.id(), by, status);
        self.table.publish(Event::Move {
            by,
            mv,
            state: row.state().clone(),
            status,
        });
        Ok(())
    }

    /// Loops AI turns while the game is in progress and the mover at
    /// the current seat is an AI participant. Breaks (leaving the turn
    /// pointer untouched) if the strategy is unknown, declines to move,
    /// or produces an illegal move.
    async fn cascade(
        &self,
        client: &tokio_postgres::Client,
        registry: &Registry,
        row: &mut GameRow,
    ) -> Result<(), RoomError> {
        while row.status() == Status::InProgress {
            let Some(seat) = row.mover() else { break };
            let Some(member) = Member::by_id(client, seat).await.map_err(internal)? else {
                break;
            };
            if !member.is_ai() {
                break;
            }
            let Some(player) = registry.get(member.display_name()) else {
                log::warn!("[room {}] no registered AI named {}", row.id(), member.display_name());
                break;
            };
            let Some(mv) = player.select_move(row.state()).await else {
                log::warn!("[room {}] AI {} declined to move", row.id(), member.display_name());
                break;
            };
            if let Err(e) = self.apply_and_record(client, row, Some(seat), mv).await {
                log::warn!("[room {}] AI {} produced an illegal move: {}", row.id(), member.display_name(), e);
                break;
            }
        }
        Ok(())
    }
}
