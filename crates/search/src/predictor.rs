//! The neural-network tensor runtime is out of scope for this platform
//! (distilled spec §1, "treated as a black-box `(obs, mask) -> (logits,
//! value)` predictor whose weights are loaded from a file"). [`Predictor`]
//! is the seam: MCTS only ever calls through this trait, so a real tensor
//! runtime slots in later without touching search code.
use arena_core::Utility;

/// A `(observation, action mask) -> (policy logits, value)` black box.
pub trait Predictor: Send + Sync {
    /// `logits.len()` must equal `mask.len()`; masked-out entries may hold
    /// any value, they are never read before renormalization.
    fn predict(&self, obs: &[f32], mask: &[f32]) -> (Vec<Utility>, Utility);
}

/// Deterministic stand-in used where no trained weights are configured:
/// uniform policy over legal actions, value 0 (no opinion). Loaded "from a
/// file" in the full system; this is the file-less default.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformPredictor;

impl Predictor for UniformPredictor {
    fn predict(&self, _obs: &[f32], mask: &[f32]) -> (Vec<Utility>, Utility) {
        let legal = mask.iter().filter(|&&m| m > 0.0).count().max(1) as Utility;
        let logits = mask.iter().map(|&m| if m > 0.0 { 1.0 / legal } else { 0.0 }).collect();
        (logits, 0.0)
    }
}
