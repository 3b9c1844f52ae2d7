use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

pub use clock::*;
pub use engine::*;
pub use error::*;
pub use leaderboard::*;
pub use score::*;
pub use session::*;
pub use settings::*;
pub use storage::*;
pub use tile::*;
pub use types::*;

mod clock;
mod engine;
mod error;
mod leaderboard;
mod score;
mod session;
mod settings;
mod storage;
mod tile;
mod types;

/// Side length of a square board.
///
/// Any side from [`BoardSize::MIN`] to [`BoardSize::MAX`] is accepted; [`BoardSize::STANDARD`]
/// lists the sizes offered to players.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BoardSize(Coord);

impl BoardSize {
    pub const MIN: Coord = 3;
    pub const MAX: Coord = 8;
    pub const STANDARD: [BoardSize; 4] = [Self(5), Self(6), Self(7), Self(8)];

    pub const fn new_unchecked(side: Coord) -> Self {
        Self(side)
    }

    pub fn new(side: Coord) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&side) {
            Ok(Self::new_unchecked(side))
        } else {
            Err(GameError::UnsupportedBoardSize(side))
        }
    }

    pub const fn side(self) -> Coord {
        self.0
    }

    pub const fn dim(self) -> Coord2 {
        (self.0, self.0)
    }

    pub const fn total_cells(self) -> CellCount {
        mult(self.0, self.0)
    }

    pub fn is_standard(self) -> bool {
        Self::STANDARD.contains(&self)
    }

    pub const fn contains(self, (row, col): Coord2) -> bool {
        row < self.0 && col < self.0
    }

    pub fn validate_coords(self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords(coords))
        }
    }

    /// Label used for storage and display, e.g. `5x5`.
    pub fn label(self) -> String {
        self.to_string()
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self(5)
    }
}

impl TryFrom<u8> for BoardSize {
    type Error = GameError;

    fn try_from(side: u8) -> Result<Self> {
        Self::new(side)
    }
}

impl From<BoardSize> for u8 {
    fn from(size: BoardSize) -> Self {
        size.0
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.0, self.0)
    }
}

/// Accepts either a bare side (`6`) or a label (`6x6`).
impl FromStr for BoardSize {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let side = match s.split_once(['x', 'X']) {
            Some((rows, cols)) if rows.trim() == cols.trim() => rows.trim(),
            Some(_) => return Err(GameError::UnsupportedBoardSize(0)),
            None => s,
        };
        let side: u8 = side
            .parse()
            .map_err(|_| GameError::UnsupportedBoardSize(0))?;
        Self::new(side)
    }
}

/// Effect of a single player action on the tour.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    NoChange,
    Placed,
    Moved,
    Won,
    Lost,
}

impl MoveOutcome {
    pub const fn has_update(self) -> bool {
        use MoveOutcome::*;
        match self {
            NoChange => false,
            Placed => true,
            Moved => true,
            Won => true,
            Lost => true,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}
