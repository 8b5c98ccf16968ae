//! Turn orchestrator and event publisher (distilled spec §4.5/§4.6):
//! the component that threads human and AI moves through persistent
//! game state while fanning out every transition to subscribers.
mod event;
mod protocol;
mod room;
mod table;

pub use event::Event;
pub use protocol::Protocol;
pub use protocol::ProtocolError;
pub use room::Room;
pub use room::RoomError;
pub use table::Table;
