use crate::*;

/// Ranked, non-owning projection over score records.
#[derive(Clone, Debug, PartialEq)]
pub struct LeaderboardView<'a> {
    entries: Vec<&'a ScoreRecord>,
}

/// One leaderboard line; `rank` is 1-based.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LeaderboardRow<'a> {
    pub rank: usize,
    pub record: &'a ScoreRecord,
}

impl<'a> LeaderboardView<'a> {
    pub fn entries(&self) -> &[&'a ScoreRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best record, only when there is someone to beat.
    pub fn champion(&self) -> Option<&'a ScoreRecord> {
        match self.entries.as_slice() {
            [first, _, ..] => Some(*first),
            _ => None,
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = LeaderboardRow<'a>> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, &record)| LeaderboardRow {
                rank: index + 1,
                record,
            })
    }
}

/// Malformed times rank after every valid one.
fn sort_key(record: &ScoreRecord) -> (u64, CellCount) {
    (
        record.elapsed_secs().unwrap_or(u64::MAX),
        record.move_count(),
    )
}

fn ranked<'a>(records: impl Iterator<Item = &'a ScoreRecord>) -> LeaderboardView<'a> {
    let mut entries: Vec<_> = records.collect();
    // stable: equal (time, moves) keep their stored order
    entries.sort_by_key(|record| sort_key(record));
    LeaderboardView { entries }
}

/// Records for `size`, fastest first, fewer moves breaking ties.
pub fn rank(records: &[ScoreRecord], size: BoardSize) -> LeaderboardView<'_> {
    let label = size.label();
    ranked(
        records
            .iter()
            .filter(|record| record.board_size() == label),
    )
}

/// Same ordering as [`rank`] across every board size.
pub fn rank_all(records: &[ScoreRecord]) -> LeaderboardView<'_> {
    ranked(records.iter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::tests::record;

    fn five() -> BoardSize {
        BoardSize::new(5).unwrap()
    }

    fn ids(view: &LeaderboardView<'_>) -> Vec<u64> {
        view.entries().iter().map(|record| record.id().get()).collect()
    }

    #[test]
    fn equal_time_prefers_fewer_moves() {
        let records = [record(1, "00:09", "5x5", 20), record(2, "00:09", "5x5", 18)];

        let view = rank(&records, five());

        assert_eq!(ids(&view), vec![2, 1]);
        assert_eq!(view.champion().map(|r| r.move_count()), Some(18));
    }

    #[test]
    fn time_compares_as_seconds() {
        let records = [
            record(1, "10:00", "5x5", 25),
            record(2, "02:30", "5x5", 25),
            record(3, "00:59", "5x5", 25),
            record(4, "100:00", "5x5", 25),
        ];

        assert_eq!(ids(&rank(&records, five())), vec![3, 2, 1, 4]);
    }

    #[test]
    fn malformed_times_sort_last() {
        let records = [
            record(1, "??", "5x5", 25),
            record(2, "59:59", "5x5", 25),
            record(3, "", "5x5", 25),
        ];

        assert_eq!(ids(&rank(&records, five())), vec![2, 1, 3]);
    }

    #[test]
    fn filters_by_board_size() {
        let records = [
            record(1, "00:30", "6x6", 36),
            record(2, "00:50", "5x5", 25),
            record(3, "00:10", "8x8", 64),
        ];

        let view = rank(&records, five());
        assert_eq!(ids(&view), vec![2]);
        assert_eq!(view.champion(), None);
        assert_eq!(ids(&rank(&records, BoardSize::new(7).unwrap())), Vec::<u64>::new());
        assert_eq!(ids(&rank_all(&records)), vec![3, 1, 2]);
    }

    #[test]
    fn ranking_is_stable_and_idempotent() {
        let records = [
            record(1, "00:20", "5x5", 25),
            record(2, "00:10", "5x5", 25),
            record(3, "00:20", "5x5", 25),
            record(4, "00:10", "5x5", 25),
        ];

        let view = rank(&records, five());
        assert_eq!(ids(&view), vec![2, 4, 1, 3]);

        let again: Vec<ScoreRecord> = view.entries().iter().map(|&r| r.clone()).collect();
        assert_eq!(ids(&rank(&again, five())), ids(&view));
    }

    #[test]
    fn rows_are_numbered_from_one() {
        let records = [record(1, "00:20", "5x5", 25), record(2, "00:10", "5x5", 25)];

        let view = rank(&records, five());
        let ranks: Vec<_> = view.rows().map(|row| (row.rank, row.record.id().get())).collect();

        assert_eq!(ranks, vec![(1, 2), (2, 1)]);
    }

    #[test]
    fn corrupt_store_ranks_empty() {
        let mut store = MemoryStore::new();
        store
            .set(ScoreBook::KEY, "{not json".to_owned())
            .unwrap();

        let book = ScoreBook::load_or_default(&store);

        assert!(book.rank(five()).is_empty());
        assert!(book.rank_all().is_empty());
    }
}
