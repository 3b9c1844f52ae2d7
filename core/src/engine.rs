use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - InProgress -> Won
/// - InProgress -> Lost
///
/// Only a new game leaves a finished state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TourState {
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl TourState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for TourState {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// Result of the tour so far; immutable once terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TourOutcome {
    InProgress,
    Won { move_count: CellCount },
    Lost { move_count: CellCount },
}

impl TourOutcome {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won { .. } | Self::Lost { .. })
    }

    pub const fn move_count(self) -> Option<CellCount> {
        match self {
            Self::InProgress => None,
            Self::Won { move_count } | Self::Lost { move_count } => Some(move_count),
        }
    }
}

impl Default for TourOutcome {
    fn default() -> Self {
        Self::InProgress
    }
}

/// Lifecycle signals consumed by the session clock and recorder.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TourEvent {
    FirstMoveMade,
    TourEnded(TourOutcome),
}

pub type LegalMoves = SmallVec<[Coord2; 8]>;
pub type TourEvents = SmallVec<[TourEvent; 2]>;

/// What a single action did, and the events it emitted in order.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub outcome: MoveOutcome,
    pub events: TourEvents,
}

impl Transition {
    pub(crate) fn unchanged() -> Self {
        Self {
            outcome: MoveOutcome::NoChange,
            events: SmallVec::new(),
        }
    }

    pub fn has_update(&self) -> bool {
        self.outcome.has_update()
    }

    /// Terminal outcome reached by this action, if any.
    pub fn ended(&self) -> Option<TourOutcome> {
        self.events.iter().find_map(|event| match event {
            TourEvent::TourEnded(outcome) => Some(*outcome),
            TourEvent::FirstMoveMade => None,
        })
    }
}

/// Knight destinations from `position` that are on the board and still unvisited.
pub fn legal_moves(position: Coord2, board: &Array2<TourCell>) -> LegalMoves {
    board
        .iter_knight_moves(position)
        .filter(|&pos| board[pos.to_nd_index()].is_unvisited())
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TourEngine {
    size: BoardSize,
    board: Array2<TourCell>,
    knight: Option<Coord2>,
    path: Vec<Coord2>,
    outcome: TourOutcome,
}

impl TourEngine {
    pub fn new(size: BoardSize) -> Self {
        Self {
            size,
            board: Array2::default(size.dim().to_nd_index()),
            knight: None,
            path: Vec::with_capacity(size.total_cells().into()),
            outcome: TourOutcome::InProgress,
        }
    }

    /// Rebuilds a tour by replaying `path` from a fresh board.
    pub fn from_path(size: BoardSize, path: &[Coord2]) -> Result<Self> {
        let mut engine = Self::new(size);
        for &coords in path {
            let coords = size.validate_coords(coords)?;
            if !engine.make_move(coords).has_update() {
                return Err(GameError::IllegalMove(coords));
            }
        }
        Ok(engine)
    }

    /// Clears the board for a new game, possibly of a different size.
    pub fn initialize(&mut self, size: BoardSize) {
        *self = Self::new(size);
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn board(&self) -> &Array2<TourCell> {
        &self.board
    }

    pub fn cell_at(&self, coords: Coord2) -> TourCell {
        self.board[coords.to_nd_index()]
    }

    pub fn knight(&self) -> Option<Coord2> {
        self.knight
    }

    pub fn path(&self) -> &[Coord2] {
        &self.path
    }

    pub fn visited_count(&self) -> CellCount {
        CellCount::try_from(self.path.len()).unwrap_or(CellCount::MAX)
    }

    pub fn outcome(&self) -> TourOutcome {
        self.outcome
    }

    pub fn state(&self) -> TourState {
        match (self.knight, self.outcome) {
            (None, _) => TourState::NotStarted,
            (Some(_), TourOutcome::InProgress) => TourState::InProgress,
            (Some(_), TourOutcome::Won { .. }) => TourState::Won,
            (Some(_), TourOutcome::Lost { .. }) => TourState::Lost,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// 1-based position of `coords` in the path, if the knight has been there.
    pub fn move_number_at(&self, coords: Coord2) -> Option<usize> {
        self.path
            .iter()
            .position(|&visited| visited == coords)
            .map(|index| index + 1)
    }

    /// Legal destinations from the knight's current cell; empty before placement.
    pub fn legal_moves(&self) -> LegalMoves {
        self.knight
            .map(|knight| legal_moves(knight, &self.board))
            .unwrap_or_default()
    }

    pub fn is_legal_target(&self, coords: Coord2) -> bool {
        if self.is_finished() || !self.size.contains(coords) {
            return false;
        }

        match self.knight {
            None => true,
            Some(_) => self.legal_moves().contains(&coords),
        }
    }

    /// Applies a player action targeting `coords`.
    ///
    /// Actions that are not legal right now (tour finished, out of bounds, or not a knight
    /// move onto an unvisited cell) leave the engine untouched and report
    /// [`MoveOutcome::NoChange`].
    pub fn make_move(&mut self, coords: Coord2) -> Transition {
        if self.is_finished() {
            log::trace!("ignoring move to {:?}, tour already ended", coords);
            return Transition::unchanged();
        }

        if !self.size.contains(coords) {
            log::debug!("ignoring out of bounds move to {:?}", coords);
            return Transition::unchanged();
        }

        match self.knight {
            None => self.place_knight(coords),
            Some(from) if legal_moves(from, &self.board).contains(&coords) => {
                self.advance_knight(from, coords)
            }
            Some(from) => {
                log::trace!("ignoring illegal move {:?} -> {:?}", from, coords);
                Transition::unchanged()
            }
        }
    }

    fn place_knight(&mut self, coords: Coord2) -> Transition {
        self.board[coords.to_nd_index()] = TourCell::Current;
        self.knight = Some(coords);
        self.path.push(coords);
        log::debug!("knight placed at {:?} on {}", coords, self.size);

        let mut events = SmallVec::new();
        events.push(TourEvent::FirstMoveMade);
        self.finish_transition(MoveOutcome::Placed, events)
    }

    fn advance_knight(&mut self, from: Coord2, to: Coord2) -> Transition {
        self.board[from.to_nd_index()] = TourCell::Visited;
        self.board[to.to_nd_index()] = TourCell::Current;
        self.knight = Some(to);
        self.path.push(to);
        log::trace!(
            "knight moved {:?} -> {:?}, visited {}/{}",
            from,
            to,
            self.visited_count(),
            self.size.total_cells()
        );

        self.finish_transition(MoveOutcome::Moved, SmallVec::new())
    }

    fn finish_transition(&mut self, outcome: MoveOutcome, mut events: TourEvents) -> Transition {
        let visited = self.visited_count();

        let ended = if visited == self.size.total_cells() {
            Some((MoveOutcome::Won, TourOutcome::Won { move_count: visited }))
        } else if self.legal_moves().is_empty() {
            Some((MoveOutcome::Lost, TourOutcome::Lost { move_count: visited }))
        } else {
            None
        };

        match ended {
            Some((move_outcome, tour_outcome)) => {
                self.outcome = tour_outcome;
                // an ended tour has no current cell; `knight` keeps the final position
                if let Some(last) = self.knight {
                    self.board[last.to_nd_index()] = TourCell::Visited;
                }
                log::debug!("tour ended: {:?}", tour_outcome);
                events.push(TourEvent::TourEnded(tour_outcome));
                Transition {
                    outcome: move_outcome,
                    events,
                }
            }
            None => Transition { outcome, events },
        }
    }
}
