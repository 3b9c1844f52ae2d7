use chrono::{DateTime, FixedOffset};
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Trimmed, non-empty display name attached to recorded scores.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(GameError::EmptyPlayerName);
        }
        Ok(Self(name.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerName {
    type Error = GameError;

    fn try_from(name: String) -> Result<Self> {
        Self::new(name)
    }
}

impl From<PlayerName> for String {
    fn from(name: PlayerName) -> Self {
        name.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Final numbers of a finished tour.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TourSummary {
    pub board_size: BoardSize,
    pub move_count: CellCount,
    pub elapsed_secs: u32,
}

impl TourSummary {
    pub fn elapsed_time(&self) -> String {
        format_elapsed(self.elapsed_secs)
    }
}

/// Something the presentation layer should tell the player.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionNotice {
    TourStarted,
    Victory { record: ScoreRecord },
    /// The tour was won but the score could not be stored.
    VictoryNotSaved { summary: TourSummary, error: String },
    Defeat { summary: TourSummary },
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionUpdate {
    pub transition: Transition,
    pub notices: Vec<SessionNotice>,
}

impl SessionUpdate {
    fn ignored() -> Self {
        Self {
            transition: Transition::unchanged(),
            notices: Vec::new(),
        }
    }

    pub fn has_update(&self) -> bool {
        self.transition.has_update()
    }
}

/// One player's play session: the current tour, its clock, and score recording.
///
/// The engine's events are routed here in order; the clock only reacts to
/// [`TourEvent::FirstMoveMade`] and [`TourEvent::TourEnded`], and a won tour is
/// recorded once the clock has produced its final value.
#[derive(Clone, Debug)]
pub struct GameSession {
    player: PlayerName,
    engine: Option<TourEngine>,
    clock: SessionClock,
    last_summary: Option<TourSummary>,
}

impl GameSession {
    pub fn new(player: PlayerName) -> Self {
        Self {
            player,
            engine: None,
            clock: SessionClock::new(),
            last_summary: None,
        }
    }

    pub fn player(&self) -> &PlayerName {
        &self.player
    }

    pub fn engine(&self) -> Option<&TourEngine> {
        self.engine.as_ref()
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.clock.elapsed_secs()
    }

    pub fn state(&self) -> TourState {
        self.engine
            .as_ref()
            .map_or(TourState::NotStarted, TourEngine::state)
    }

    pub fn outcome(&self) -> TourOutcome {
        self.engine
            .as_ref()
            .map_or(TourOutcome::InProgress, TourEngine::outcome)
    }

    /// Whether clicks are currently accepted.
    pub fn is_active(&self) -> bool {
        self.engine
            .as_ref()
            .is_some_and(|engine| !engine.is_finished())
    }

    pub fn last_summary(&self) -> Option<TourSummary> {
        self.last_summary
    }

    /// Starts a fresh tour; ticks stamped with any earlier epoch stop counting.
    pub fn start_new_game(&mut self, size: BoardSize) -> ClockEpoch {
        match self.engine.as_mut() {
            Some(engine) => engine.initialize(size),
            None => self.engine = Some(TourEngine::new(size)),
        }
        self.last_summary = None;
        let epoch = self.clock.reset();
        log::debug!("{} started a new {} game", self.player, size);
        epoch
    }

    pub fn tick(&mut self, epoch: ClockEpoch) -> bool {
        self.clock.tick(epoch)
    }

    /// Handles a click on `coords`; `now` stamps the score record if this click wins.
    pub fn click(
        &mut self,
        coords: Coord2,
        store: &mut impl KeyValueStore,
        now: DateTime<FixedOffset>,
    ) -> SessionUpdate {
        let Some(engine) = self.engine.as_mut() else {
            log::debug!("no game started, ignoring click at {:?}", coords);
            return SessionUpdate::ignored();
        };
        let size = engine.size();
        let transition = engine.make_move(coords);

        let mut notices = Vec::new();
        for event in &transition.events {
            match (event, self.clock.on_event(event)) {
                (TourEvent::FirstMoveMade, Some(ClockSignal::Started)) => {
                    notices.push(SessionNotice::TourStarted);
                }
                (TourEvent::TourEnded(outcome), Some(ClockSignal::Stopped { elapsed_secs })) => {
                    notices.extend(self.finish_tour(size, *outcome, elapsed_secs, store, now));
                }
                (event, signal) => {
                    log::warn!("unexpected clock response {:?} to {:?}", signal, event);
                }
            }
        }

        SessionUpdate {
            transition,
            notices,
        }
    }

    fn finish_tour(
        &mut self,
        board_size: BoardSize,
        outcome: TourOutcome,
        elapsed_secs: u32,
        store: &mut impl KeyValueStore,
        now: DateTime<FixedOffset>,
    ) -> Option<SessionNotice> {
        let move_count = outcome.move_count()?;
        let summary = TourSummary {
            board_size,
            move_count,
            elapsed_secs,
        };
        self.last_summary = Some(summary);

        Some(match outcome {
            TourOutcome::Won { .. } => {
                match record_win(store, &self.player, board_size, move_count, elapsed_secs, now) {
                    Ok(record) => SessionNotice::Victory { record },
                    Err(err) => {
                        log::error!("score for {} not saved: {}", self.player, err);
                        SessionNotice::VictoryNotSaved {
                            summary,
                            error: err.to_string(),
                        }
                    }
                }
            }
            _ => {
                log::debug!("{} lost after {} moves", self.player, move_count);
                SessionNotice::Defeat { summary }
            }
        })
    }
}
