use thiserror::Error;

use crate::Coord2;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Unsupported board size {0}x{0}")]
    UnsupportedBoardSize(u8),
    #[error("Invalid coordinates {0:?}")]
    InvalidCoords(Coord2),
    #[error("Illegal knight move to {0:?}")]
    IllegalMove(Coord2),
    #[error("Player name must not be empty")]
    EmptyPlayerName,
}

pub type Result<T> = core::result::Result<T, GameError>;
