//! Unified backend binary.
//!
//! Runs the HTTP and WebSocket surface on `BIND_ADDR` (e.g. `0.0.0.0:8888`).

#[tokio::main]
async fn main() {
    arena_core::log();
    arena_core::kys();
    arena_server::run().await.unwrap();
}
