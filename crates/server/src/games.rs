//! REST surface for game rows (distilled spec §6): one route group per
//! `<kind>`, delegating every mutation to [`arena_gameroom::Room`] via
//! the process-wide [`arena_hosting::Arena`] registry.
use crate::ApiError;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::web;
use arena_auth::Auth;
use arena_core::ID;
use arena_core::Kind;
use arena_core::Unique;
use arena_database::GameRow;
use arena_database::Member;
use arena_hosting::Arena;
use arena_rules::AnyConfig;
use std::str::FromStr;
use std::sync::Arc;

fn parse_kind(path: &str) -> Result<Kind, ApiError> {
    Kind::from_str(path).map_err(|_| ApiError::BadRequest(format!("unknown game kind '{path}'")))
}

#[derive(serde::Deserialize)]
pub struct ParticipantSpec {
    /// An existing member id (typically the authenticated human).
    pub member_id: Option<uuid::Uuid>,
    /// The display name of a registered AI strategy; a matching `Member`
    /// is created on first use if one doesn't already exist.
    pub ai: Option<String>,
}

#[derive(serde::Deserialize)]
pub struct CreateGameRequest {
    pub participants: Vec<ParticipantSpec>,
    /// Variant-specific configuration (e.g. `{"kind": "nim", "piles": [3,5,7]}`).
    /// Falls back to [`AnyConfig::default_for`] when absent.
    #[serde(default)]
    pub config: Option<serde_json::Value>,
}

async fn resolve_participant(
    client: &tokio_postgres::Client,
    spec: &ParticipantSpec,
) -> Result<ID<Member>, ApiError> {
    if let Some(id) = spec.member_id {
        return Ok(ID::from(id));
    }
    let name = spec
        .ai
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("participant needs member_id or ai".into()))?;
    if let Some(existing) = Member::by_display_name(client, name).await? {
        return Ok(existing.id());
    }
    let member = Member::ai(name);
    member.insert(client).await?;
    Ok(member.id())
}

pub async fn list(arena: web::Data<Arc<Arena>>, path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let kind = parse_kind(&path)?;
    let rows = GameRow::in_progress(arena.client(), kind).await?;
    Ok(HttpResponse::Ok().json(rows.iter().map(row_json).collect::<Vec<_>>()))
}

pub async fn create(
    arena: web::Data<Arc<Arena>>,
    path: web::Path<String>,
    body: web::Json<CreateGameRequest>,
) -> Result<HttpResponse, ApiError> {
    let kind = parse_kind(&path)?;
    let mut participants = Vec::with_capacity(body.participants.len());
    for spec in &body.participants {
        participants.push(resolve_participant(arena.client(), spec).await?);
    }
    let config = match body.config.clone() {
        Some(value) => serde_json::from_value(value)
            .map_err(|e| ApiError::BadRequest(format!("invalid config: {e}")))?,
        None => AnyConfig::default_for(kind),
    };
    if config.kind() != kind {
        return Err(ApiError::BadRequest("config kind does not match route".into()));
    }
    let row = arena.create(kind, config, participants).await?;
    Ok(HttpResponse::Ok().json(row_json(&row)))
}

pub async fn get(arena: web::Data<Arc<Arena>>, path: web::Path<(String, uuid::Uuid)>) -> Result<HttpResponse, ApiError> {
    let (_kind, id) = path.into_inner();
    let row = GameRow::by_id(arena.client(), ID::from(id)).await?.ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(row_json(&row)))
}

pub async fn apply_move(
    arena: web::Data<Arc<Arena>>,
    auth: Auth,
    path: web::Path<(String, uuid::Uuid)>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, ApiError> {
    let (_kind, id) = path.into_inner();
    let id = ID::from(id);
    let room = arena.get_or_open(id).await.ok_or(ApiError::NotFound)?;
    let row = room
        .apply_move(arena.client(), arena.registry(), auth.user(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(row_json(&row)))
}

/// Undoes the last human ply, plus the AI's reply to it if one followed
/// (distilled spec §4.5: undoing against an AI opponent also rewinds
/// its response, not just the human's own move).
pub async fn undo(
    arena: web::Data<Arc<Arena>>,
    _auth: Auth,
    path: web::Path<(String, uuid::Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let (_kind, id) = path.into_inner();
    let id = ID::from(id);
    let room = arena.get_or_open(id).await.ok_or(ApiError::NotFound)?;
    let plies = last_mover_plies(arena.client(), id).await?;
    let row = room.undo(arena.client(), plies).await?;
    Ok(HttpResponse::Ok().json(row_json(&row)))
}

/// 2 when the most recent recorded move was played by an AI member, 1
/// otherwise (no history, or the last mover was human).
async fn last_mover_plies(client: &tokio_postgres::Client, id: ID<GameRow>) -> Result<usize, ApiError> {
    let history = arena_records::Play::history(client, id).await?;
    let Some(last) = history.last() else { return Ok(1) };
    let Some(mover) = last.mover() else { return Ok(1) };
    let is_ai = Member::by_id(client, mover).await?.map(|m| m.is_ai()).unwrap_or(false);
    Ok(if is_ai { 2 } else { 1 })
}

pub async fn delete(
    arena: web::Data<Arc<Arena>>,
    _auth: Auth,
    path: web::Path<(String, uuid::Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let (_kind, id) = path.into_inner();
    let id = ID::from(id);
    GameRow::delete(arena.client(), id).await?;
    arena.close(id).await;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "deleted" })))
}

/// Azul-only: runs the MCTS player's search without applying the
/// result, returning its policy/value visualization (distilled spec
/// §6, `POST /azul/{id}/visualize_ai`).
pub async fn visualize_ai(
    arena: web::Data<Arc<Arena>>,
    path: web::Path<(String, uuid::Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let (_kind, id) = path.into_inner();
    let id = ID::from(id);
    let row = GameRow::by_id(arena.client(), id).await?.ok_or(ApiError::NotFound)?;
    let player = arena.registry().get("mcts").ok_or_else(|| ApiError::Internal("mcts strategy not registered".into()))?;
    let visualization = player.visualize(row.state());
    Ok(HttpResponse::Ok().json(visualization.unwrap_or(serde_json::Value::Null)))
}

pub async fn ws(
    arena: web::Data<Arc<Arena>>,
    path: web::Path<(String, uuid::Uuid)>,
    req: HttpRequest,
    body: web::Payload,
) -> Result<HttpResponse, ApiError> {
    let (_kind, id) = path.into_inner();
    let id = ID::from(id);
    let room = arena.get_or_open(id).await.ok_or(ApiError::NotFound)?;
    let (response, session, stream) = actix_ws::handle(&req, body).map_err(|e| ApiError::Internal(e.to_string()))?;
    arena_hosting::spawn_bridge(room, session, stream);
    Ok(response)
}

fn row_json(row: &GameRow) -> serde_json::Value {
    serde_json::json!({
        "id": row.id().to_string(),
        "kind": row.kind().to_string(),
        "state": row.state(),
        "turn": row.turn(),
        "status": arena_database::status_tag(row.status()),
        "participants": row.participants().iter().map(|p| p.to_string()).collect::<Vec<_>>(),
    })
}
