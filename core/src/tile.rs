use serde::{Deserialize, Serialize};

/// Visitation state of one board cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TourCell {
    Unvisited,
    Visited,
    /// Cell currently occupied by the knight.
    Current,
}

impl TourCell {
    pub const fn is_unvisited(self) -> bool {
        matches!(self, Self::Unvisited)
    }

    /// Visited cells include the one the knight stands on.
    pub const fn is_visited(self) -> bool {
        matches!(self, Self::Visited | Self::Current)
    }
}

impl Default for TourCell {
    fn default() -> Self {
        Self::Unvisited
    }
}
