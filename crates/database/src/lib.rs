//! Game row store adapter (distilled spec §4, component "Game row store
//! adapter"): CRUD for persisted game rows and member accounts.
//!
//! Builds on [`arena_pg`]'s generic `Schema`/`db()` with the two domain row
//! types this platform actually persists.
pub mod member;
pub mod row;

pub use member::Member;
pub use member::MemberKind;
pub use row::GameRow;
pub use row::status_tag;

pub use arena_pg::Schema;
pub use arena_pg::db;

/// Table for bearer-token sessions (owned conceptually by `arena-auth`,
/// which depends on this crate for storage rather than the other way
/// around, to avoid a dependency cycle with [`Member`]).
#[rustfmt::skip]
pub const SESSIONS: &str = "sessions";

/// Creates every table this crate owns, in dependency order, and their
/// indices. Called once at startup (distilled spec §6, environment
/// `RESET_DB_ON_STARTUP`).
pub async fn migrate(client: &tokio_postgres::Client) -> Result<(), arena_pg::PgErr> {
    client.batch_execute(Member::creates()).await?;
    client.batch_execute(Member::indices()).await?;
    client.batch_execute(GameRow::creates()).await?;
    client.batch_execute(GameRow::indices()).await?;
    Ok(())
}
