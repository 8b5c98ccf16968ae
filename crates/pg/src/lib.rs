//! Generic PostgreSQL schema traits.
//!
//! This crate carries only the connection-establishment and schema-metadata
//! machinery that every persisted type needs ([`Schema`] and [`db()`]); the
//! bulk-COPY binary wire format the poker training pipeline relied on has no
//! counterpart here and was dropped. Row types load themselves with plain
//! `tokio_postgres::Client::query`/`query_opt` calls (see `arena-database`'s
//! `GameRow::by_id`, `Member::by_id`) rather than through a generic trait.
mod schema;

pub use schema::*;

use std::sync::Arc;
use tokio_postgres::Client;

/// Establishes a database connection from the `DB_URL` environment variable.
///
/// Returns an `Arc<Client>` suitable for sharing across async tasks.
///
/// # Panics
///
/// Panics if `DB_URL` is not set or if connection fails.
pub async fn db() -> Arc<Client> {
    log::info!("connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let url = std::env::var("DB_URL").expect("DB_URL must be set");
    let (client, connection) = tokio_postgres::connect(&url, tls)
        .await
        .expect("database connection failed");
    tokio::spawn(connection);
    client
        .execute("SET client_min_messages TO WARNING", &[])
        .await
        .expect("set client_min_messages");
    Arc::new(client)
}

/// PostgreSQL error type alias.
pub type PgErr = tokio_postgres::Error;

/// Table for persisted game rows (one per in-progress or finished game).
#[rustfmt::skip]
pub const GAMES:    &str = "games";
/// Table for registered accounts.
#[rustfmt::skip]
pub const MEMBERS:  &str = "members";
/// Table for move history, one row per applied move.
#[rustfmt::skip]
pub const MOVES:    &str = "moves";
/// Table for per-seat participant metadata (human vs AI, display name).
#[rustfmt::skip]
pub const SEATS:    &str = "seats";
