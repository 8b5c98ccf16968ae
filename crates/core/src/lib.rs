//! Core type aliases, traits, and constants for the arena platform.
//!
//! This crate provides the foundational types and configuration parameters
//! shared across every rule engine, search core, and service layer in the
//! workspace.
#![allow(dead_code)]

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Seat/participant index within a game (0-based).
pub type Position = usize;
/// Azul scores, floor penalties, and bonus totals.
pub type Score = i32;
/// Depth bound for minimax/negamax search.
pub type Depth = u8;
/// Visit counts and simulation budgets for MCTS.
pub type Visits = u32;
/// PUCT Q-values, policy priors, and predictor outputs.
pub type Utility = f32;
/// Action-selection temperature and softmax-style weights.
pub type Probability = f32;

// ============================================================================
// TRAITS
// ============================================================================
/// Random instance generation for testing and search-tree seeding.
pub trait Arbitrary {
    /// Generate a uniformly random instance.
    fn random() -> Self;
}

/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Generic ID wrapper providing compile-time type safety over uuid::Uuid.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }
    /// Cast ID<T> to ID<U> while preserving the underlying UUID.
    /// Useful for converting between marker types (e.g. row id -> stream key).
    pub fn cast<U>(self) -> ID<U> {
        ID {
            inner: self.inner,
            marker: PhantomData,
        }
    }
}

impl<T> From<ID<T>> for uuid::Uuid {
    fn from(id: ID<T>) -> Self {
        id.inner()
    }
}
impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self {
            inner: uuid::Uuid::now_v7(),
            marker: PhantomData,
        }
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.serialize(serializer)
    }
}
impl<'de, T> serde::Deserialize<'de> for ID<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Self {
            inner: uuid::Uuid::deserialize(deserializer)?,
            marker: PhantomData,
        })
    }
}

// ============================================================================
// GAME-KIND DISCRIMINANT
// ============================================================================
/// The seven game kinds this platform hosts. One seam where game-kind
/// dispatch happens; everything above this enum (orchestrator, HTTP layer,
/// AI registry) is written once and generic over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    TicTacToe,
    Connect4,
    Chess,
    Nim,
    Wythoff,
    Santorini,
    Azul,
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Kind::TicTacToe => "tictactoe",
            Kind::Connect4 => "connect4",
            Kind::Chess => "chess",
            Kind::Nim => "nim",
            Kind::Wythoff => "wythoff",
            Kind::Santorini => "santorini",
            Kind::Azul => "azul",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Kind {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tictactoe" => Ok(Kind::TicTacToe),
            "connect4" => Ok(Kind::Connect4),
            "chess" => Ok(Kind::Chess),
            "nim" => Ok(Kind::Nim),
            "wythoff" => Ok(Kind::Wythoff),
            "santorini" => Ok(Kind::Santorini),
            "azul" => Ok(Kind::Azul),
            _ => Err(()),
        }
    }
}

// ============================================================================
// AZUL PARAMETERS
// ============================================================================
/// Distinct tile colors in the bag.
pub const AZUL_COLORS: usize = 5;
/// Copies of each color in a fresh bag (5 colors x 20 = 100 tiles total).
pub const AZUL_TILES_PER_COLOR: usize = 20;
/// Total tile count, conserved across bag/discard/factories/center/boards.
pub const AZUL_TOTAL_TILES: usize = AZUL_COLORS * AZUL_TILES_PER_COLOR;
/// Tiles a factory holds when freshly filled.
pub const AZUL_FACTORY_SIZE: usize = 4;
/// Factory count for two players; three/four player variants use 2n+1.
pub const AZUL_FACTORIES_2P: usize = 5;
/// Floor line capacity.
pub const AZUL_FLOOR_SLOTS: usize = 7;
/// Cumulative floor penalty at each occupied slot index 0..7.
pub const AZUL_FLOOR_PENALTY: [i32; AZUL_FLOOR_SLOTS] = [-1, -2, -4, -6, -8, -11, -14];
/// Bonus per fully-occupied wall row.
pub const AZUL_ROW_BONUS: i32 = 2;
/// Bonus per fully-occupied wall column.
pub const AZUL_COL_BONUS: i32 = 7;
/// Bonus per fully-placed color (all five copies on the wall).
pub const AZUL_COLOR_BONUS: i32 = 10;
/// Wall and pattern-line side length.
pub const AZUL_WALL_SIZE: usize = 5;

// ============================================================================
// SEARCH PARAMETERS
// ============================================================================
/// Default PUCT exploration constant.
pub const PUCT_C: Utility = 1.5;
/// Default MCTS simulation budget per move.
pub const MCTS_DEFAULT_ITERATIONS: Visits = 400;
/// Default depth bound for Chess alpha-beta search.
pub const CHESS_DEFAULT_DEPTH: Depth = 4;
/// Default depth bound for Connect-4 negamax search.
pub const CONNECT4_DEFAULT_DEPTH: Depth = 7;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
/// Level is further narrowed by `RUST_LOG` when set.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Info);
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        filter,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Register Ctrl+C handler for immediate (non-graceful) termination.
#[cfg(feature = "server")]
pub fn kys() {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.unwrap();
        println!();
        log::warn!("violent interrupt received, exiting immediately");
        std::process::exit(0);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_roundtrips_through_uuid() {
        let id: ID<()> = ID::default();
        let raw: uuid::Uuid = id.into();
        let back: ID<()> = raw.into();
        assert_eq!(id, back);
    }

    #[test]
    fn id_cast_preserves_bits() {
        struct A;
        struct B;
        let a: ID<A> = ID::default();
        let b: ID<B> = a.cast();
        assert_eq!(a.inner(), b.inner());
    }

    #[test]
    fn kind_roundtrips_through_str() {
        for kind in [
            Kind::TicTacToe,
            Kind::Connect4,
            Kind::Chess,
            Kind::Nim,
            Kind::Wythoff,
            Kind::Santorini,
            Kind::Azul,
        ] {
            let s = kind.to_string();
            let parsed: Kind = s.parse().expect("round-trippable kind string");
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn azul_tile_count_is_100() {
        assert_eq!(AZUL_TOTAL_TILES, 100);
    }

    #[test]
    fn azul_floor_penalty_is_nonincreasing() {
        for w in AZUL_FLOOR_PENALTY.windows(2) {
            assert!(w[1] <= w[0]);
        }
    }
}
