//! WebSocket fan-out (distilled spec §6: "tails the corresponding
//! stream; each inbound bus message is forwarded verbatim as a text
//! frame"). A subscriber connecting mid-game only sees events from
//! its subscription point onward — it never replays history (distilled
//! spec §4.6, grounded in the original implementation's Redis
//! `XREAD last_id = "$"`).
use arena_gameroom::Room;
use futures::StreamExt;
use std::sync::Arc;

/// Spawns a task that tails `room`'s event stream and forwards every
/// event to the WebSocket session as a JSON text frame, until the
/// client disconnects or the stream lags too far behind to catch up.
pub fn spawn(room: Arc<Room>, mut session: actix_ws::Session, mut stream: actix_ws::MessageStream) {
    let mut events = room.subscribe();
    actix_web::rt::spawn(async move {
        loop {
            tokio::select! {
                biased;
                event = events.recv() => match event {
                    Ok(event) => {
                        let text = serde_json::to_string(&event).expect("Event always serializes");
                        if session.text(text).await.is_err() {
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        log::warn!("[ws {}] subscriber lagged, skipped {} events", room.id(), skipped);
                        continue;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                },
                msg = stream.next() => match msg {
                    Some(Ok(actix_ws::Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => continue,
                },
            }
        }
        log::debug!("[ws {}] subscriber disconnected", room.id());
    });
}
