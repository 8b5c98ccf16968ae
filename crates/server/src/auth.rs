//! Credential issuance and session management (distilled spec §6:
//! `POST /auth/signup`, `POST /auth/login`, `GET /auth/me`).
use crate::ApiError;
use actix_web::HttpResponse;
use actix_web::web;
use arena_auth::Auth;
use arena_auth::Claims;
use arena_auth::Crypto;
use arena_auth::Session;
use arena_auth::dto::AuthResponse;
use arena_auth::dto::LoginRequest;
use arena_auth::dto::RegisterRequest;
use arena_auth::dto::UserInfo;
use arena_core::Unique;
use arena_database::Member;
use std::sync::Arc;

pub async fn signup(
    client: web::Data<Arc<tokio_postgres::Client>>,
    crypto: web::Data<Crypto>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    if Member::by_display_name(&client, &body.display_name).await?.is_some() {
        return Err(ApiError::BadRequest("display name already taken".into()));
    }
    let hash = arena_auth::hash_password(&body.password).map_err(|e| ApiError::Internal(e.to_string()))?;
    let member = Member::human(body.display_name.clone(), hash.into_bytes());
    member.insert(&client).await?;
    issue_session(&client, &crypto, member).await
}

pub async fn login(
    client: web::Data<Arc<tokio_postgres::Client>>,
    crypto: web::Data<Crypto>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let member = Member::by_display_name(&client, &body.display_name)
        .await?
        .ok_or(ApiError::Unauthorized)?;
    let stored = member.credential_hash().ok_or(ApiError::Unauthorized)?;
    let stored = std::str::from_utf8(stored).map_err(|_| ApiError::Internal("corrupt credential hash".into()))?;
    if !arena_auth::verify_password(&body.password, stored) {
        return Err(ApiError::Unauthorized);
    }
    issue_session(&client, &crypto, member).await
}

pub async fn me(auth: Auth, client: web::Data<Arc<tokio_postgres::Client>>) -> Result<HttpResponse, ApiError> {
    let member = Member::by_id(&client, auth.user()).await?.ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(UserInfo {
        id: member.id().to_string(),
        display_name: member.display_name().to_string(),
    }))
}

async fn issue_session(
    client: &tokio_postgres::Client,
    crypto: &Crypto,
    member: Member,
) -> Result<HttpResponse, ApiError> {
    let session = Session::new(member.id(), Vec::new());
    let claims = Claims::new(member.id(), session.id());
    let token = crypto.encode(&claims).map_err(|e| ApiError::Internal(e.to_string()))?;
    let session = session.with_hash(arena_auth::Crypto::hash(&token));
    session.insert(client).await.map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: UserInfo {
            id: member.id().to_string(),
            display_name: member.display_name().to_string(),
        },
    }))
}
