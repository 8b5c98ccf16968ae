//! Azul: the two-phase offer/wall-tiling engine.
//!
//! State shape grounded on
//! `other_examples/6e467433_drakewald-Azul_Engine__src-ai-mcts_nn_ai.rs.rs`
//! (factories/center/players/pattern-lines/wall/floor-line/first-player
//! marker) and the original implementation's `zero/azul/rules.py` /
//! `zero/azul/env.py` for the exact tiling, floor-penalty, and bonus
//! constants this distillation carries forward.
use crate::Rules;
use crate::RuleError;
use crate::Status;
use arena_core::AZUL_COLORS as COLORS;
use arena_core::AZUL_COL_BONUS;
use arena_core::AZUL_COLOR_BONUS;
use arena_core::AZUL_FACTORY_SIZE;
use arena_core::AZUL_FLOOR_PENALTY;
use arena_core::AZUL_FLOOR_SLOTS as FLOOR_SLOTS;
use arena_core::AZUL_ROW_BONUS;
use arena_core::AZUL_TILES_PER_COLOR;
use arena_core::AZUL_WALL_SIZE as WALL_SIZE;
use arena_core::Position;
use arena_core::Score;

/// A tile color, 0..5. The wall's fixed pattern is `col = (color + row) % 5`.
pub type Color = u8;

/// A tile or the first-player marker, as it sits on a floor line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FloorSlot {
    Tile(Color),
    Marker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct PatternLine {
    pub color: Option<Color>,
    pub count: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlayerBoard {
    pub score: Score,
    pub wall: [[bool; WALL_SIZE]; WALL_SIZE],
    pub pattern_lines: [PatternLine; WALL_SIZE],
    pub floor: Vec<FloorSlot>,
}

impl PlayerBoard {
    fn empty() -> Self {
        Self {
            score: 0,
            wall: [[false; WALL_SIZE]; WALL_SIZE],
            pattern_lines: Default::default(),
            floor: Vec::new(),
        }
    }
    pub fn wall_column(row: usize, color: Color) -> usize {
        (color as usize + row) % WALL_SIZE
    }
    fn floor_push(&mut self, slot: FloorSlot) -> bool {
        if self.floor.len() < FLOOR_SLOTS {
            self.floor.push(slot);
            true
        } else {
            false
        }
    }
}

/// `source = N` means the center; `destination = Floor` routes all taken
/// tiles to the floor line, bypassing the pattern lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Source {
    Factory(usize),
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Destination {
    Row(usize),
    Floor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Move {
    pub source: Source,
    pub color: Color,
    pub destination: Destination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Offer,
    WallTiling,
    Preparation,
    Final,
}

/// Deterministic splitmix64 generator. Carried inside [`State`] (not a
/// `rand` RNG type) so that bag draws and factory refills replay exactly
/// from the persisted state blob (distilled spec §5, "seedable for
/// deterministic tests").
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rng(u64);

impl Rng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }
    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct State {
    pub players: Vec<PlayerBoard>,
    pub bag: [u32; COLORS],
    pub discard: [u32; COLORS],
    pub factories: Vec<[u32; COLORS]>,
    pub center: [u32; COLORS],
    pub marker_in_center: bool,
    pub round: u32,
    pub current: Position,
    pub initial_mover: Position,
    pub phase: Phase,
    pub status: Status,
    pub rng: Rng,
    pub log: Vec<Move>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub players: usize,
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self { players: 2, seed: 0 }
    }
}

pub struct Azul;

fn factory_count(players: usize) -> usize {
    2 * players + 1
}

fn draw_one(bag: &mut [u32; COLORS], discard: &mut [u32; COLORS], rng: &mut Rng) -> Option<Color> {
    let total: u32 = bag.iter().sum();
    if total == 0 {
        let moved: u32 = discard.iter().sum();
        if moved == 0 {
            return None;
        }
        *bag = *discard;
        *discard = [0; COLORS];
    }
    let total: u32 = bag.iter().sum();
    if total == 0 {
        return None;
    }
    let mut pick = rng.below(total as usize) as u32;
    for color in 0..COLORS {
        if pick < bag[color] {
            bag[color] -= 1;
            return Some(color as Color);
        }
        pick -= bag[color];
    }
    unreachable!("pick index must land inside one color bucket")
}

fn refill_factories(state: &mut State) {
    for factory in state.factories.iter_mut() {
        *factory = [0; COLORS];
        for _ in 0..AZUL_FACTORY_SIZE {
            match draw_one(&mut state.bag, &mut state.discard, &mut state.rng) {
                Some(color) => factory[color as usize] += 1,
                None => break,
            }
        }
    }
}

/// Contiguous horizontal+vertical run length a tile at `(row, col)` would
/// score if placed on `wall` right now. Exposed for one-ply heuristic
/// strategies that peek at a pattern-line completion's eventual wall value
/// before the real wall-tiling phase runs.
pub fn score_wall_placement(wall: &[[bool; WALL_SIZE]; WALL_SIZE], row: usize, col: usize) -> Score {
    let h = {
        let mut left = col;
        while left > 0 && wall[row][left - 1] {
            left -= 1;
        }
        let mut right = col;
        while right + 1 < WALL_SIZE && wall[row][right + 1] {
            right += 1;
        }
        right - left
    };
    let v = {
        let mut up = row;
        while up > 0 && wall[up - 1][col] {
            up -= 1;
        }
        let mut down = row;
        while down + 1 < WALL_SIZE && wall[down + 1][col] {
            down += 1;
        }
        down - up
    };
    match (h > 0, v > 0) {
        (true, true) => (h + 1 + v + 1) as Score,
        (true, false) => (h + 1) as Score,
        (false, true) => (v + 1) as Score,
        (false, false) => 1,
    }
}

fn end_of_game_bonus(wall: &[[bool; WALL_SIZE]; WALL_SIZE]) -> Score {
    let mut bonus = 0;
    for row in wall.iter() {
        if row.iter().all(|&c| c) {
            bonus += AZUL_ROW_BONUS;
        }
    }
    for col in 0..WALL_SIZE {
        if (0..WALL_SIZE).all(|r| wall[r][col]) {
            bonus += AZUL_COL_BONUS;
        }
    }
    for color in 0..COLORS {
        if (0..WALL_SIZE).all(|r| wall[r][PlayerBoard::wall_column(r, color as Color)]) {
            bonus += AZUL_COLOR_BONUS;
        }
    }
    bonus
}

/// Runs wall-tiling for every player, refills or terminates, and returns the
/// resulting status. Called synchronously at the end of `apply` once the
/// offer phase empties every factory and the center (distilled spec
/// §4.1.1).
fn run_wall_tiling(state: &mut State) -> Status {
    state.phase = Phase::WallTiling;
    let mut any_row_completed = false;
    for board in state.players.iter_mut() {
        for row in 0..WALL_SIZE {
            let line = board.pattern_lines[row];
            let capacity = row as u8 + 1;
            if line.count != capacity {
                continue;
            }
            let color = line.color.expect("full line always has a color");
            let col = PlayerBoard::wall_column(row, color);
            board.wall[row][col] = true;
            board.score += score_wall_placement(&board.wall, row, col);
            state.discard[color as usize] += (capacity - 1) as u32;
            board.pattern_lines[row] = PatternLine::default();
        }
        let occupied = board.floor.len();
        if occupied > 0 {
            board.score += AZUL_FLOOR_PENALTY[occupied.min(FLOOR_SLOTS) - 1];
            board.score = board.score.max(0);
        }
        for slot in board.floor.drain(..) {
            if let FloorSlot::Tile(color) = slot {
                state.discard[color as usize] += 1;
            }
        }
        if board.wall.iter().any(|row| row.iter().all(|&c| c)) {
            any_row_completed = true;
        }
    }
    if any_row_completed {
        for board in state.players.iter_mut() {
            board.score += end_of_game_bonus(&board.wall);
        }
        state.phase = Phase::Final;
        let max_score = state.players.iter().map(|p| p.score).max().unwrap_or(0);
        let winners: Vec<Position> = state
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.score == max_score)
            .map(|(i, _)| i)
            .collect();
        if winners.len() == 1 {
            Status::Won { winner: winners[0] }
        } else {
            Status::Draw
        }
    } else {
        state.phase = Phase::Preparation;
        refill_factories(state);
        state.round += 1;
        state.marker_in_center = true;
        state.current = state.initial_mover;
        state.phase = Phase::Offer;
        Status::InProgress
    }
}

impl Rules for Azul {
    type State = State;
    type Move = Move;
    type Config = Config;

    fn initial(config: Config) -> State {
        let players = config.players.max(2);
        let mut state = State {
            players: (0..players).map(|_| PlayerBoard::empty()).collect(),
            bag: [AZUL_TILES_PER_COLOR as u32; COLORS],
            discard: [0; COLORS],
            factories: vec![[0; COLORS]; factory_count(players)],
            center: [0; COLORS],
            marker_in_center: true,
            round: 1,
            current: 0,
            initial_mover: 0,
            phase: Phase::Offer,
            status: Status::InProgress,
            rng: Rng(config.seed),
            log: Vec::new(),
        };
        refill_factories(&mut state);
        state
    }

    fn legal_moves(state: &State) -> Vec<Move> {
        if state.status.is_terminal() {
            return Vec::new();
        }
        let board = &state.players[state.current];
        let mut moves = Vec::new();
        let sources: Vec<(Source, &[u32; COLORS])> = state
            .factories
            .iter()
            .enumerate()
            .map(|(i, f)| (Source::Factory(i), f))
            .chain(std::iter::once((Source::Center, &state.center)))
            .collect();
        for (source, counts) in sources {
            for color in 0..COLORS as Color {
                if counts[color as usize] == 0 {
                    continue;
                }
                moves.push(Move {
                    source,
                    color,
                    destination: Destination::Floor,
                });
                for row in 0..WALL_SIZE {
                    let line = board.pattern_lines[row];
                    let capacity = row as u8 + 1;
                    let wall_col = PlayerBoard::wall_column(row, color);
                    if line.count >= capacity {
                        continue;
                    }
                    if line.color.is_some_and(|c| c != color) {
                        continue;
                    }
                    if board.wall[row][wall_col] {
                        continue;
                    }
                    moves.push(Move {
                        source,
                        color,
                        destination: Destination::Row(row),
                    });
                }
            }
        }
        moves
    }

    fn turn(state: &State) -> Position {
        state.current
    }

    fn status(state: &State) -> Status {
        state.status
    }

    fn apply(state: &State, mv: Move) -> Result<(State, Status), RuleError> {
        if state.status.is_terminal() {
            return Err(RuleError::GameOver);
        }
        let mut state = state.clone();
        let mover = state.current;

        let available = match mv.source {
            Source::Factory(i) => state
                .factories
                .get(i)
                .ok_or(RuleError::OutOfBounds)?
                .get(mv.color as usize)
                .copied()
                .ok_or(RuleError::OutOfBounds)?,
            Source::Center => state
                .center
                .get(mv.color as usize)
                .copied()
                .ok_or(RuleError::OutOfBounds)?,
        };
        if available == 0 {
            return Err(RuleError::SourceEmpty);
        }
        if let Destination::Row(row) = mv.destination {
            let board = &state.players[mover];
            let line = *board
                .pattern_lines
                .get(row)
                .ok_or(RuleError::OutOfBounds)?;
            let capacity = row as u8 + 1;
            if line.count >= capacity {
                return Err(RuleError::Other("pattern line already full".into()));
            }
            if line.color.is_some_and(|c| c != mv.color) {
                return Err(RuleError::LineColorMismatch);
            }
            if board.wall[row][PlayerBoard::wall_column(row, mv.color)] {
                return Err(RuleError::WallConflict);
            }
        }

        let mut taken = available;
        match mv.source {
            Source::Factory(i) => {
                let factory = &mut state.factories[i];
                factory[mv.color as usize] = 0;
                for c in 0..COLORS {
                    if c != mv.color as usize {
                        state.center[c] += factory[c];
                        factory[c] = 0;
                    }
                }
            }
            Source::Center => {
                state.center[mv.color as usize] = 0;
                if state.marker_in_center {
                    state.marker_in_center = false;
                    let board = &mut state.players[mover];
                    if !board.floor_push(FloorSlot::Marker) {
                        let last = board.floor.len() - 1;
                        board.floor[last] = FloorSlot::Marker;
                    }
                    state.initial_mover = mover;
                }
            }
        }

        let board = &mut state.players[mover];
        match mv.destination {
            Destination::Row(row) => {
                let capacity = row as u8 + 1;
                let line = &mut board.pattern_lines[row];
                let space = (capacity - line.count) as u32;
                let placed = space.min(taken);
                line.count += placed as u8;
                line.color = Some(mv.color);
                taken -= placed;
            }
            Destination::Floor => {}
        }
        for _ in 0..taken {
            if !board.floor_push(FloorSlot::Tile(mv.color)) {
                state.discard[mv.color as usize] += 1;
            }
        }

        state.log.push(mv);

        let round_over = state.factories.iter().all(|f| f.iter().all(|&n| n == 0))
            && state.center.iter().all(|&n| n == 0);
        let status = if round_over {
            run_wall_tiling(&mut state)
        } else {
            state.current = (state.current + 1) % state.players.len();
            Status::InProgress
        };
        state.status = status;
        Ok((state, status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total_tiles(state: &State) -> u32 {
        let bag: u32 = state.bag.iter().sum();
        let discard: u32 = state.discard.iter().sum();
        let factories: u32 = state.factories.iter().map(|f| f.iter().sum::<u32>()).sum();
        let center: u32 = state.center.iter().sum();
        let boards: u32 = state
            .players
            .iter()
            .map(|p| {
                let lines: u32 = p.pattern_lines.iter().map(|l| l.count as u32).sum();
                let wall: u32 = p
                    .wall
                    .iter()
                    .flatten()
                    .filter(|&&c| c)
                    .count() as u32;
                let floor: u32 = p
                    .floor
                    .iter()
                    .filter(|s| matches!(s, FloorSlot::Tile(_)))
                    .count() as u32;
                lines + wall + floor
            })
            .sum();
        bag + discard + factories + center + boards
    }

    #[test]
    fn fresh_two_player_game_has_a_hundred_tiles() {
        let state = Azul::initial(Config::default());
        assert_eq!(total_tiles(&state), 100);
        assert_eq!(state.factories.len(), 5);
    }

    #[test]
    fn total_tile_count_is_conserved_across_many_moves() {
        let mut state = Azul::initial(Config { players: 2, seed: 7 });
        let mut guard = 0;
        while !Azul::status(&state).is_terminal() && guard < 400 {
            guard += 1;
            let moves = Azul::legal_moves(&state);
            assert!(!moves.is_empty(), "azul never empties legal moves before terminal");
            let mv = moves[guard % moves.len()];
            let (next, _) = Azul::apply(&state, mv).expect("legal move from legal_moves");
            assert_eq!(total_tiles(&next), 100, "tile count invariant after move {guard}");
            state = next;
        }
    }

    #[test]
    fn pattern_line_never_exceeds_capacity_or_holds_two_colors() {
        let mut state = Azul::initial(Config { players: 2, seed: 3 });
        for _ in 0..50 {
            if Azul::status(&state).is_terminal() {
                break;
            }
            let moves = Azul::legal_moves(&state);
            let mv = moves[0];
            state = Azul::apply(&state, mv).unwrap().0;
            for board in &state.players {
                for (row, line) in board.pattern_lines.iter().enumerate() {
                    assert!(line.count as usize <= row + 1);
                }
            }
        }
    }

    #[test]
    fn wall_column_matches_fixed_color_pattern() {
        for row in 0..WALL_SIZE {
            for color in 0..COLORS as Color {
                let col = PlayerBoard::wall_column(row, color);
                assert_eq!(col, (color as usize + row) % WALL_SIZE);
            }
        }
    }

    #[test]
    fn taking_from_an_empty_source_is_illegal() {
        let state = Azul::initial(Config::default());
        let mv = Move {
            source: Source::Factory(0),
            color: 0,
            destination: Destination::Floor,
        };
        // whichever color the first factory doesn't have is illegal
        let present: Vec<Color> = (0..COLORS as Color)
            .filter(|&c| state.factories[0][c as usize] > 0)
            .collect();
        let absent = (0..COLORS as Color).find(|c| !present.contains(c));
        if let Some(color) = absent {
            let mv = Move { color, ..mv };
            assert_eq!(Azul::apply(&state, mv).unwrap_err(), RuleError::SourceEmpty);
        }
    }

    #[test]
    fn isolated_tile_scores_one_point() {
        let wall = [[false; WALL_SIZE]; WALL_SIZE];
        assert_eq!(score_wall_placement(&wall, 2, 2), 1);
    }

    #[test]
    fn contiguous_row_and_column_score_sum_of_both_runs() {
        let mut wall = [[false; WALL_SIZE]; WALL_SIZE];
        wall[2][1] = true;
        wall[2][3] = true;
        wall[1][2] = true;
        // placing at (2,2): horizontal run = 3 (1,2,3), vertical run = 2 (1,2)
        assert_eq!(score_wall_placement(&wall, 2, 2), 3 + 2);
    }
}
