//! Process-wide room registry and WebSocket fan-out (distilled spec
//! §4.6, §5.1).
mod arena;
mod bridge;

pub use arena::Arena;
pub use bridge::spawn as spawn_bridge;
