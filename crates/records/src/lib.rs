//! Move history and seat records (distilled spec §4.5/§4.6): the
//! durable trail the orchestrator writes alongside each applied move,
//! used for Chess undo and generic replay.
pub mod participant;
pub mod play;

pub use participant::Participant;
pub use play::Play;

use arena_database::Schema;

/// Creates this crate's tables. Must run after [`arena_database::migrate`]
/// since both reference the `games`/`members` tables by foreign key.
pub async fn migrate(client: &tokio_postgres::Client) -> Result<(), tokio_postgres::Error> {
    client.batch_execute(Play::creates()).await?;
    client.batch_execute(Play::indices()).await?;
    client.batch_execute(Participant::creates()).await?;
    client.batch_execute(Participant::indices()).await?;
    Ok(())
}
