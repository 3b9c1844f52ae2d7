use chrono::{DateTime, FixedOffset, NaiveDate};
use core::fmt;
use core::num::ParseIntError;
use serde::{Deserialize, Serialize};

use crate::*;

/// Creation-ordered record identifier, stored as a decimal string of milliseconds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct RecordId(u64);

impl RecordId {
    pub fn from_millis(millis: i64) -> Self {
        Self(millis.max(0).unsigned_abs())
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0.to_string()
    }
}

impl TryFrom<String> for RecordId {
    type Error = ParseIntError;

    fn try_from(raw: String) -> core::result::Result<Self, Self::Error> {
        raw.trim().parse().map(Self)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted result of one won tour. Field names follow the stored JSON layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    id: RecordId,
    username: String,
    #[serde(rename = "time")]
    elapsed_time: String,
    board_size: String,
    #[serde(rename = "moves")]
    move_count: CellCount,
    date: NaiveDate,
}

impl ScoreRecord {
    pub(crate) fn new(
        id: RecordId,
        username: &PlayerName,
        elapsed_time: String,
        board_size: BoardSize,
        move_count: CellCount,
        date: NaiveDate,
    ) -> Self {
        Self {
            id,
            username: username.as_str().to_owned(),
            elapsed_time,
            board_size: board_size.label(),
            move_count,
            date,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Elapsed time as `MM:SS`.
    pub fn elapsed_time(&self) -> &str {
        &self.elapsed_time
    }

    /// Elapsed time in seconds, `None` when the stored text is malformed.
    pub fn elapsed_secs(&self) -> Option<u64> {
        parse_elapsed(&self.elapsed_time)
    }

    /// Board label such as `5x5`.
    pub fn board_size(&self) -> &str {
        &self.board_size
    }

    pub fn move_count(&self) -> CellCount {
        self.move_count
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Every recorded win, in creation order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBook {
    records: Vec<ScoreRecord>,
}

impl StorageKey for ScoreBook {
    const KEY: &'static str = "knightsTourLeaderboard";
}

impl ScoreBook {
    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn rank(&self, size: BoardSize) -> LeaderboardView<'_> {
        rank(&self.records, size)
    }

    pub fn rank_all(&self) -> LeaderboardView<'_> {
        rank_all(&self.records)
    }

    /// Next id at or after `millis`, kept strictly above every id already in the book.
    fn next_id(&self, millis: i64) -> RecordId {
        let candidate = RecordId::from_millis(millis);
        match self.records.iter().map(ScoreRecord::id).max() {
            Some(last) if last >= candidate => RecordId(last.0.saturating_add(1)),
            _ => candidate,
        }
    }

    fn push(&mut self, record: ScoreRecord) {
        self.records.push(record);
    }
}

/// Builds the record for a won tour and appends it to the stored score book.
///
/// Read-modify-write: the whole book is loaded, extended and stored back under
/// [`ScoreBook::KEY`]. An error means the score was not saved.
pub fn record_win(
    store: &mut impl KeyValueStore,
    username: &PlayerName,
    size: BoardSize,
    move_count: CellCount,
    elapsed_secs: u32,
    now: DateTime<FixedOffset>,
) -> core::result::Result<ScoreRecord, StorageError> {
    let mut book = ScoreBook::load_or_default(store);
    let record = ScoreRecord::new(
        book.next_id(now.timestamp_millis()),
        username,
        format_elapsed(elapsed_secs),
        size,
        move_count,
        now.date_naive(),
    );

    book.push(record.clone());
    book.save(store)?;

    log::info!(
        "recorded {} win for {} in {} ({} moves)",
        record.board_size(),
        record.username(),
        record.elapsed_time(),
        record.move_count()
    );
    Ok(record)
}
