//! Azul observation tensor and action<->index bijection.
//!
//! Layout and action-space formula grounded on distilled spec §4.2, with the
//! tensor-flattening idiom (fixed offset bookkeeping through one big `Vec<f32>`)
//! grounded on `state_to_input` in
//! `other_examples/6e467433_drakewald-Azul_Engine__src-ai-mcts_nn_ai.rs.rs`.
use arena_rules::azul::Destination;
use arena_rules::azul::Move;
use arena_rules::azul::Source;
use arena_rules::azul::State;

const COLORS: usize = arena_core::AZUL_COLORS;
const WALL: usize = arena_core::AZUL_WALL_SIZE;
const FLOOR: usize = arena_core::AZUL_FLOOR_SLOTS;
/// Round one-hot width; rounds at or beyond this clamp to the last slot.
const ROUND_BUCKETS: usize = 8;

/// Destination codes 0..4 address pattern-line rows; 5 addresses the floor.
const DEST_FLOOR: usize = WALL;
const DEST_WIDTH: usize = WALL + 1;

/// Size of the flat action space for a table with `num_factories` factories.
pub fn action_size(num_factories: usize) -> usize {
    (num_factories + 1) * COLORS * DEST_WIDTH
}

/// `(source_index * 5 * 6) + (color * 6) + destination_code`; `source_index
/// == num_factories` means the center (distilled spec §4.2, "Action space").
pub fn action_to_index(mv: Move, num_factories: usize) -> usize {
    let source_index = match mv.source {
        Source::Factory(i) => i,
        Source::Center => num_factories,
    };
    let destination_code = match mv.destination {
        Destination::Row(r) => r,
        Destination::Floor => DEST_FLOOR,
    };
    (source_index * COLORS * DEST_WIDTH) + (mv.color as usize * DEST_WIDTH) + destination_code
}

/// Inverse of [`action_to_index`]. Returns `None` for an index outside
/// `0..action_size(num_factories)`.
pub fn index_to_action(index: usize, num_factories: usize) -> Option<Move> {
    if index >= action_size(num_factories) {
        return None;
    }
    let destination_code = index % DEST_WIDTH;
    let rest = index / DEST_WIDTH;
    let color = (rest % COLORS) as u8;
    let source_index = rest / COLORS;
    let source = if source_index == num_factories {
        Source::Center
    } else {
        Source::Factory(source_index)
    };
    let destination = if destination_code == DEST_FLOOR {
        Destination::Floor
    } else {
        Destination::Row(destination_code)
    };
    Some(Move {
        source,
        color,
        destination,
    })
}

/// Dense 0/1 mask over `0..action_size(num_factories)`; 1 where the action is
/// in `legal`.
pub fn legal_mask(legal: &[Move], num_factories: usize) -> Vec<f32> {
    let mut mask = vec![0.0f32; action_size(num_factories)];
    for &mv in legal {
        mask[action_to_index(mv, num_factories)] = 1.0;
    }
    mask
}

fn completed_rows(wall: &[[bool; WALL]; WALL]) -> u32 {
    wall.iter().filter(|row| row.iter().all(|&c| c)).count() as u32
}
fn completed_cols(wall: &[[bool; WALL]; WALL]) -> u32 {
    (0..WALL).filter(|&c| (0..WALL).all(|r| wall[r][c])).count() as u32
}
fn completed_color_sets(wall: &[[bool; WALL]; WALL]) -> u32 {
    (0..COLORS)
        .filter(|&color| (0..WALL).all(|r| wall[r][(color + r) % WALL]))
        .count() as u32
}

/// Flattens `state`, viewed from `perspective`'s seat, into the fixed-layout
/// tensor the predictor consumes (distilled spec §4.2):
/// 1. spatial one-hot block (pattern lines + wall, per color, per player)
/// 2. factories block (per-factory + center color counts)
/// 3. global block (bag/discard/marker/round/floors/scores/bonus preview/
///    remaining-tile vector)
pub fn state_to_input(state: &State, perspective: usize) -> Vec<f32> {
    let n = state.players.len();
    let order: Vec<usize> = (0..n).map(|i| (perspective + i) % n).collect();

    let mut out = Vec::new();

    // 1. Spatial block: per player, per {pattern_lines, wall}, 5 color planes of 5x5.
    for &seat in &order {
        let board = &state.players[seat];
        for color in 0..COLORS as u8 {
            for row in 0..WALL {
                for col in 0..WALL {
                    let line = board.pattern_lines[row];
                    let present = col < line.count as usize && line.color == Some(color);
                    out.push(if present { 1.0 } else { 0.0 });
                }
            }
        }
        for color in 0..COLORS as u8 {
            for row in 0..WALL {
                for col in 0..WALL {
                    let wall_col = (color as usize + row) % WALL;
                    let present = col == wall_col && board.wall[row][col];
                    out.push(if present { 1.0 } else { 0.0 });
                }
            }
        }
    }

    // 2. Factories block: (N+1) x 5 counts.
    for factory in &state.factories {
        for color in 0..COLORS {
            out.push(factory[color] as f32);
        }
    }
    for color in 0..COLORS {
        out.push(state.center[color] as f32);
    }

    // 3. Global block.
    for color in 0..COLORS {
        out.push(state.bag[color] as f32);
    }
    for color in 0..COLORS {
        out.push(state.discard[color] as f32);
    }
    out.push(if state.marker_in_center { 1.0 } else { 0.0 });
    let round_bucket = (state.round as usize).saturating_sub(1).min(ROUND_BUCKETS - 1);
    for i in 0..ROUND_BUCKETS {
        out.push(if i == round_bucket { 1.0 } else { 0.0 });
    }
    for &seat in &order {
        let board = &state.players[seat];
        for i in 0..FLOOR {
            let value = match board.floor.get(i) {
                None => -1.0,
                Some(arena_rules::azul::FloorSlot::Tile(c)) => *c as f32,
                Some(arena_rules::azul::FloorSlot::Marker) => COLORS as f32,
            };
            out.push(value);
        }
    }
    for &seat in &order {
        out.push(state.players[seat].score as f32);
    }
    for &seat in &order {
        let wall = &state.players[seat].wall;
        out.push(completed_rows(wall) as f32);
        out.push(completed_cols(wall) as f32);
        out.push(completed_color_sets(wall) as f32);
    }
    for color in 0..COLORS {
        let remaining = state.bag[color]
            + state.discard[color]
            + state.factories.iter().map(|f| f[color]).sum::<u32>()
            + state.center[color];
        out.push(remaining as f32);
    }

    out
}

/// Length of the vector [`state_to_input`] returns for a table of
/// `num_players`/`num_factories`.
pub fn input_size(num_players: usize, num_factories: usize) -> usize {
    let spatial = num_players * 2 * COLORS * WALL * WALL;
    let factories = (num_factories + 1) * COLORS;
    let global = COLORS + COLORS + 1 + ROUND_BUCKETS + num_players * FLOOR + num_players + num_players * 3 + COLORS;
    spatial + factories + global
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_rules::Rules;
    use arena_rules::azul::Azul;
    use arena_rules::azul::Config;

    #[test]
    fn action_index_roundtrips_over_the_full_space() {
        let num_factories = 5;
        for index in 0..action_size(num_factories) {
            let mv = index_to_action(index, num_factories).expect("in-range index decodes");
            assert_eq!(action_to_index(mv, num_factories), index);
        }
    }

    #[test]
    fn out_of_range_index_decodes_to_none() {
        let num_factories = 5;
        assert_eq!(index_to_action(action_size(num_factories), num_factories), None);
    }

    #[test]
    fn legal_moves_from_a_real_state_all_roundtrip() {
        let state = Azul::initial(Config::default());
        let num_factories = state.factories.len();
        for mv in Azul::legal_moves(&state) {
            let idx = action_to_index(mv, num_factories);
            assert_eq!(index_to_action(idx, num_factories), Some(mv));
        }
    }

    #[test]
    fn input_vector_matches_declared_size() {
        let state = Azul::initial(Config::default());
        let obs = state_to_input(&state, 0);
        assert_eq!(obs.len(), input_size(state.players.len(), state.factories.len()));
    }

    #[test]
    fn mask_marks_exactly_the_legal_actions() {
        let state = Azul::initial(Config::default());
        let num_factories = state.factories.len();
        let legal = Azul::legal_moves(&state);
        let mask = legal_mask(&legal, num_factories);
        let marked: usize = mask.iter().filter(|&&m| m > 0.0).count();
        assert_eq!(marked, legal.len());
    }
}
