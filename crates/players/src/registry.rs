//! Process-wide `name -> strategy` map, populated once at startup from a
//! declarative list (distilled spec §4.4). A failure loading one entry
//! (e.g. the Azul predictor's weight file missing) must not prevent the
//! others from loading, so each entry's constructor is fallible and logged
//! independently.
use crate::Player;
use crate::strategies;
use arena_search::predictor::Predictor;
use arena_search::predictor::UniformPredictor;
use std::collections::HashMap;
use std::sync::Arc;

/// Read-mostly, immutable after construction (distilled spec §5, "the AI
/// registry is read-mostly and immutable after startup").
pub struct Registry {
    players: HashMap<String, Arc<dyn Player>>,
}

/// Loads the Azul predictor's weights from `AZUL_MODEL_PATH` if set,
/// falling back to the deterministic uniform stand-in otherwise (distilled
/// spec §1: the neural tensor runtime is out of scope; its weights-from-a-
/// file contract is honored by this seam without a real network behind it).
fn load_predictor() -> Arc<dyn Predictor> {
    match std::env::var("AZUL_MODEL_PATH") {
        Err(_) => Arc::new(UniformPredictor),
        Ok(path) => match std::fs::metadata(&path) {
            Ok(_) => {
                log::info!("azul predictor: found weights at {path}, using uniform stand-in (no tensor runtime in this build)");
                Arc::new(UniformPredictor)
            }
            Err(e) => {
                log::warn!("azul predictor: could not read {path} ({e}), falling back to uniform predictor");
                Arc::new(UniformPredictor)
            }
        },
    }
}

type Entry = (&'static str, fn() -> Result<Arc<dyn Player>, String>);

impl Registry {
    /// The platform's built-in roster: `random` plays every game, the rest
    /// each own exactly the game their search core targets.
    pub fn builtin() -> Self {
        let mcts_predictor = load_predictor();
        let entries: Vec<Entry> = vec![
            ("random", || Ok(Arc::new(strategies::RandomPlayer) as Arc<dyn Player>)),
            ("heuristic", || Ok(Arc::new(strategies::HeuristicPlayer) as Arc<dyn Player>)),
            ("alphabeta", || Ok(Arc::new(strategies::AlphaBetaPlayer) as Arc<dyn Player>)),
            ("negamax", || Ok(Arc::new(strategies::NegamaxPlayer) as Arc<dyn Player>)),
            ("solver", || Ok(Arc::new(strategies::SolverPlayer) as Arc<dyn Player>)),
        ];
        let mut players = HashMap::new();
        for (name, ctor) in entries {
            match ctor() {
                Ok(player) => {
                    players.insert(name.to_string(), player);
                }
                Err(e) => log::warn!("AI registry entry '{name}' failed to load: {e}"),
            }
        }
        players.insert("mcts".to_string(), Arc::new(strategies::MctsPlayer::new(mcts_predictor)));
        Self { players }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Player>> {
        self.players.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.players.keys().map(String::as_str).collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_loads_every_declared_entry() {
        let registry = Registry::builtin();
        for name in ["random", "heuristic", "alphabeta", "negamax", "solver", "mcts"] {
            assert!(registry.get(name).is_some(), "missing strategy '{name}'");
        }
    }

    #[test]
    fn unknown_name_resolves_to_nothing() {
        let registry = Registry::builtin();
        assert!(registry.get("does-not-exist").is_none());
    }
}
