//! Observation tensor codec and action<->index bijections.
//!
//! [`azul`] is the rich one: a fixed-layout numeric tensor for the Azul
//! predictor plus its `(source, color, destination)` action-index formula
//! (distilled spec §4.2). [`simple`] gives every other game a small bijective
//! action<->index mapping in the same idiom, grounded on the teacher's
//! bijective-enum action encoding (`crates/gameplay/src/action.rs`).
pub mod azul;
pub mod simple;
