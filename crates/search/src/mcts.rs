//! Single-player-optimization PUCT MCTS for Azul.
//!
//! Node shape, PUCT selection, opponent-as-environment sampling, and
//! `advance` tree-reuse-with-revalidation are grounded on `MctsNnAI` in
//! `other_examples/6e467433_drakewald-Azul_Engine__src-ai-mcts_nn_ai.rs.rs`
//! (`sync_tree_with_state`, `run_search`, `best_move`), with the
//! masked-softmax-degenerate-falls-back-to-uniform renormalization grounded
//! on `mask_and_normalize_policy` in the same file. The arena-of-`Vec<Node>`
//! layout with integer-handle parent links follows dream-go's tree module
//! (`other_examples/a591ea10_boomerchi-dream-go__src-mcts-mod.rs.rs`), used
//! here in place of `Rc<RefCell<_>>` so `advance` can sever a parent link
//! with one field write instead of breaking a reference cycle.
use crate::predictor::Predictor;
use arena_core::MCTS_DEFAULT_ITERATIONS;
use arena_core::PUCT_C;
use arena_core::Position;
use arena_core::Probability;
use arena_core::Score;
use arena_core::Utility;
use arena_core::Visits;
use arena_rules::Rules;
use arena_rules::Status;
use arena_rules::azul::Azul;
use arena_rules::azul::Move;
use arena_rules::azul::State;
use rand::Rng as _;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::collections::HashMap;

struct Node {
    state: State,
    parent: Option<usize>,
    prior: Probability,
    visits: Visits,
    value_sum: Utility,
    player_to_move: Position,
    children: HashMap<Move, usize>,
    expanded: bool,
}

impl Node {
    fn root(state: State) -> Self {
        let player_to_move = Azul::turn(&state);
        Self {
            state,
            parent: None,
            prior: 1.0,
            visits: 0,
            value_sum: 0.0,
            player_to_move,
            children: HashMap::new(),
            expanded: false,
        }
    }

    fn value(&self) -> Utility {
        if self.visits == 0 { 0.0 } else { self.value_sum / self.visits as Utility }
    }
}

/// The agent's normalized final score, clipped to `[-1, 1]` (distilled spec
/// §4.3.1, "evaluation at terminal"). `spread` is the largest plausible
/// score gap the engine expects between two Azul boards; beyond that the
/// clip saturates rather than distorting comparisons near the middle.
const SCORE_SPREAD: Score = 60;

fn terminal_value(state: &State, agent: Position) -> Utility {
    let agent_score = state.players[agent].score as Utility;
    let best_other = state
        .players
        .iter()
        .enumerate()
        .filter(|&(seat, _)| seat != agent)
        .map(|(_, board)| board.score as Utility)
        .fold(Utility::MIN, Utility::max);
    let diff = if state.players.len() == 1 { agent_score } else { agent_score - best_other };
    (diff / SCORE_SPREAD as Utility).clamp(-1.0, 1.0)
}

/// Single-player-optimization PUCT tree for one Azul table, seen from one
/// player's perspective (`agent`). Every MCTS instance is single-threaded
/// and owns exactly one tree (distilled spec §4.3.1, "concurrency").
pub struct Mcts {
    nodes: Vec<Node>,
    agent: Position,
    rng: SmallRng,
}

impl Mcts {
    pub fn new(state: State, agent: Position, seed: u64) -> Self {
        Self {
            nodes: vec![Node::root(state)],
            agent,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn root_state(&self) -> &State {
        &self.nodes[0].state
    }

    /// Runs [`MCTS_DEFAULT_ITERATIONS`] simulations, each a select-expand-
    /// backprop pass from the root.
    pub fn search(&mut self, predictor: &dyn Predictor) {
        self.search_for(predictor, MCTS_DEFAULT_ITERATIONS);
    }

    pub fn search_for(&mut self, predictor: &dyn Predictor, iterations: Visits) {
        for _ in 0..iterations {
            let leaf = self.select(0);
            let value = self.expand(leaf, predictor);
            self.backprop(leaf, value);
        }
    }

    /// Descends from `node` to an unexpanded or terminal leaf. At an
    /// opponent node, samples from the cached policy instead of maximizing
    /// PUCT, treating the opponent as a random environment variable
    /// conditioned on the model (distilled spec §4.3.1, "selection").
    fn select(&mut self, mut node: usize) -> usize {
        loop {
            if !self.nodes[node].expanded || Azul::status(&self.nodes[node].state).is_terminal() {
                return node;
            }
            let is_agent = self.nodes[node].player_to_move == self.agent;
            node = if is_agent { self.select_by_puct(node) } else { self.sample_opponent_child(node) };
        }
    }

    fn select_by_puct(&self, node: usize) -> usize {
        let parent_visits = self.nodes[node].visits.max(1) as Utility;
        self.nodes[node]
            .children
            .values()
            .copied()
            .max_by(|&a, &b| {
                let score = |n: usize| {
                    let child = &self.nodes[n];
                    child.value() + PUCT_C * child.prior * parent_visits.sqrt() / (1.0 + child.visits as Utility)
                };
                score(a).partial_cmp(&score(b)).unwrap_or(std::cmp::Ordering::Equal)
            })
            .expect("expanded node has at least one child")
    }

    fn sample_opponent_child(&mut self, node: usize) -> usize {
        let children: Vec<(usize, Probability)> = self.nodes[node]
            .children
            .values()
            .map(|&c| (c, self.nodes[c].prior))
            .collect();
        let total: Probability = children.iter().map(|&(_, p)| p).sum();
        if total <= 0.0 {
            return children[0].0;
        }
        let mut draw = self.rng.random_range(0.0..total);
        for (child, prior) in &children {
            if draw < *prior {
                return *child;
            }
            draw -= prior;
        }
        children.last().expect("expanded node has at least one child").0
    }

    /// Expands `leaf` if non-terminal, returning the value to backpropagate.
    fn expand(&mut self, leaf: usize, predictor: &dyn Predictor) -> Utility {
        let state = self.nodes[leaf].state.clone();
        let status = Azul::status(&state);
        if status.is_terminal() {
            return terminal_value(&state, self.agent);
        }

        let legal = Azul::legal_moves(&state);
        let num_factories = state.factories.len();
        let obs = arena_codec::azul::state_to_input(&state, self.agent);
        let mask = arena_codec::azul::legal_mask(&legal, num_factories);
        let (logits, value) = predictor.predict(&obs, &mask);
        let priors = normalize_priors(&logits, &mask, &legal, num_factories);

        for &mv in &legal {
            let (child_state, _) = Azul::apply(&state, mv).expect("legal_moves only yields legal moves");
            let index = arena_codec::azul::action_to_index(mv, num_factories);
            let child = Node {
                player_to_move: Azul::turn(&child_state),
                prior: priors[index],
                state: child_state,
                parent: Some(leaf),
                visits: 0,
                value_sum: 0.0,
                children: HashMap::new(),
                expanded: false,
            };
            let child_idx = self.nodes.len();
            self.nodes.push(child);
            self.nodes[leaf].children.insert(mv, child_idx);
        }
        self.nodes[leaf].expanded = true;
        value
    }

    fn backprop(&mut self, leaf: usize, value: Utility) {
        // Single-player-optimization mode: the whole tree estimates the
        // agent's utility, so the value is added unchanged at every
        // ancestor (distilled spec §4.3.1, "backpropagation").
        let mut cursor = Some(leaf);
        while let Some(node) = cursor {
            self.nodes[node].visits += 1;
            self.nodes[node].value_sum += value;
            cursor = self.nodes[node].parent;
        }
    }

    /// Root action selection at temperature `t` (distilled spec §4.3.1).
    /// `t == 0.0` takes the visit-count argmax; `t > 0.0` samples
    /// proportional to `visits^(1/t)`.
    pub fn best_move(&mut self, temperature: f32) -> Move {
        let root = &self.nodes[0];
        let mut entries: Vec<(Move, Visits)> = root.children.iter().map(|(&mv, &c)| (mv, self.nodes[c].visits)).collect();
        if temperature <= 0.0 {
            entries.sort_by_key(|&(_, visits)| std::cmp::Reverse(visits));
            return entries.first().map(|&(mv, _)| mv).unwrap_or_else(|| fallback_move(&root.state));
        }
        let weights: Vec<f64> = entries
            .iter()
            .map(|&(_, visits)| (visits as f64).powf(1.0 / temperature as f64))
            .collect();
        let total: f64 = weights.iter().sum();
        if total <= 0.0 || entries.is_empty() {
            return fallback_move(&root.state);
        }
        let mut draw = self.rng.random_range(0.0..total);
        for (i, w) in weights.iter().enumerate() {
            if draw < *w {
                return entries[i].0;
            }
            draw -= w;
        }
        entries.last().map(|&(mv, _)| mv).unwrap_or_else(|| fallback_move(&root.state))
    }

    /// Promotes the child reached by `action` to a fresh root holding
    /// `new_state`, severing the parent link so the discarded siblings
    /// become collectable. If any cached grandchild's action is no longer
    /// legal in `new_state` (stochastic refill divergence) or `action` was
    /// never expanded, starts over from a bare root instead (distilled spec
    /// §4.3.1, "tree reuse").
    pub fn advance(&mut self, action: Move, new_state: State) {
        let promoted = self.nodes[0].children.get(&action).copied();
        let reusable = promoted.is_some_and(|idx| self.subtree_legal_in(idx, &new_state));

        if let Some(idx) = promoted.filter(|_| reusable) {
            let mut kept = self.collect_subtree(idx);
            let mut remap = HashMap::new();
            for (new_index, &old_index) in kept.iter().enumerate() {
                remap.insert(old_index, new_index);
            }
            let mut rebuilt = Vec::with_capacity(kept.len());
            for &old_index in &kept {
                let mut node = std::mem::replace(
                    &mut self.nodes[old_index],
                    Node::root(new_state.clone()),
                );
                node.parent = node.parent.and_then(|p| remap.get(&p).copied());
                node.children = node.children.into_iter().map(|(mv, c)| (mv, remap[&c])).collect();
                rebuilt.push(node);
            }
            rebuilt[0].state = new_state;
            rebuilt[0].parent = None;
            kept.clear();
            self.nodes = rebuilt;
        } else {
            self.nodes = vec![Node::root(new_state)];
        }
    }

    fn collect_subtree(&self, root: usize) -> Vec<usize> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(n) = stack.pop() {
            order.push(n);
            stack.extend(self.nodes[n].children.values().copied());
        }
        order.sort_unstable();
        order
    }

    /// A cached child's action is still legal in `new_state` iff replaying
    /// it from `new_state` is accepted; stops at depth 1 (direct children)
    /// since that is the only divergence `advance` can introduce per turn.
    fn subtree_legal_in(&self, idx: usize, new_state: &State) -> bool {
        let legal = Azul::legal_moves(new_state);
        self.nodes[idx].children.keys().all(|mv| legal.contains(mv))
    }
}

fn normalize_priors(
    logits: &[Utility],
    mask: &[f32],
    legal: &[Move],
    num_factories: usize,
) -> Vec<Probability> {
    let mut exps = vec![0.0f32; logits.len()];
    let mut total = 0.0f32;
    for (i, &m) in mask.iter().enumerate() {
        if m > 0.0 {
            let e = logits[i].exp();
            exps[i] = e;
            total += e;
        }
    }
    if total <= 0.0 || !total.is_finite() {
        // Degenerate masked softmax: fall back to uniform over legal moves.
        let uniform = 1.0 / legal.len().max(1) as Probability;
        for &mv in legal {
            exps[arena_codec::azul::action_to_index(mv, num_factories)] = uniform;
        }
        return exps;
    }
    for e in &mut exps {
        *e /= total;
    }
    exps
}

fn fallback_move(state: &State) -> Move {
    Azul::legal_moves(state)
        .into_iter()
        .next()
        .expect("the turn orchestrator never asks for a move when none is legal")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::UniformPredictor;
    use arena_rules::azul::Config;

    #[test]
    fn search_always_returns_a_legal_move() {
        let state = Azul::initial(Config::default());
        let mut mcts = Mcts::new(state, 0, 7);
        mcts.search_for(&UniformPredictor, 32);
        let mv = mcts.best_move(0.0);
        assert!(Azul::legal_moves(mcts.root_state()).contains(&mv));
    }

    #[test]
    fn advance_resynchronizes_the_root_state() {
        let state = Azul::initial(Config::default());
        let mut mcts = Mcts::new(state.clone(), 0, 7);
        mcts.search_for(&UniformPredictor, 16);
        let mv = mcts.best_move(0.0);
        let (next, _) = Azul::apply(&state, mv).unwrap();
        mcts.advance(mv, next.clone());
        assert_eq!(mcts.root_state().round, next.round);
        assert_eq!(mcts.root_state().current, next.current);
    }

    #[test]
    fn terminal_value_is_clamped_to_unit_range() {
        let mut state = Azul::initial(Config::default());
        state.players[0].score = 10_000;
        state.players[1].score = 0;
        state.status = Status::Won { winner: 0 };
        assert_eq!(terminal_value(&state, 0), 1.0);
    }
}
