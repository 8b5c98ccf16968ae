//! The broadcast side of a game's logical stream: every event the
//! orchestrator publishes for a row fans out to every connected
//! WebSocket subscriber (distilled spec §4.6). A subscriber that
//! connects mid-game only sees events from its subscription point
//! onward — there is no replay from history.
use crate::Event;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug)]
pub struct Table {
    tx: tokio::sync::broadcast::Sender<Event>,
}

impl Table {
    pub fn new() -> Self {
        let (tx, _rx) = tokio::sync::broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// A fresh subscription sees only events published after this call.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Best-effort publish: a lagging or absent subscriber never blocks
    /// or fails the orchestrator.
    pub fn publish(&self, event: Event) {
        log::debug!("[table] publish: {}", event);
        if self.tx.send(event).is_err() {
            log::debug!("[table] publish: no subscribers");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_rules::AnyConfig;
    use arena_rules::AnyState;
    use arena_rules::Status;

    #[test]
    fn a_late_subscriber_does_not_see_earlier_events() {
        let table = Table::new();
        let state = AnyState::initial(AnyConfig::TicTacToe(Default::default()));
        table.publish(Event::Create {
            state: state.clone(),
            status: state.status(),
        });
        let mut rx = table.subscribe();
        table.publish(Event::Create {
            state: state.clone(),
            status: state.status(),
        });
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn publishing_with_no_subscribers_does_not_panic() {
        let table = Table::new();
        let state = AnyState::initial(AnyConfig::TicTacToe(Default::default()));
        table.publish(Event::Create {
            state: state.clone(),
            status: state.status(),
        });
        assert_eq!(table.subscriber_count(), 0);
    }
}
