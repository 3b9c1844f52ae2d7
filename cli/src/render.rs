use core::fmt;
use knights_tour_core::{
    format_elapsed, GameSession, LeaderboardView, SessionNotice, TourCell, TourEngine, TourState,
};

/// Board grid: move numbers on visited cells, `N` for the knight, `*` for legal targets.
pub struct BoardView<'a>(pub &'a TourEngine);

impl fmt::Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let engine = self.0;
        let side = engine.size().side();
        let targets = engine.legal_moves();

        write!(f, "   ")?;
        for col in 0..side {
            write!(f, "{col:>3}")?;
        }
        writeln!(f)?;

        for row in 0..side {
            write!(f, "{row:>3}")?;
            for col in 0..side {
                let coords = (row, col);
                match engine.cell_at(coords) {
                    TourCell::Current => write!(f, "{:>3}", "N")?,
                    TourCell::Visited => match engine.move_number_at(coords) {
                        Some(number) => write!(f, "{number:>3}")?,
                        None => write!(f, "{:>3}", "#")?,
                    },
                    TourCell::Unvisited if targets.contains(&coords) => write!(f, "{:>3}", "*")?,
                    TourCell::Unvisited => write!(f, "{:>3}", ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// One-line summary of the session: board, progress, clock and state.
pub struct StatusLine<'a>(pub &'a GameSession);

impl fmt::Display for StatusLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.0;
        let Some(engine) = session.engine() else {
            return write!(f, "No game in progress, type `new` to start");
        };
        let state = match session.state() {
            TourState::NotStarted => "place the knight on any cell",
            TourState::InProgress => "in progress",
            TourState::Won => "tour complete",
            TourState::Lost => "no moves left",
        };
        write!(
            f,
            "{} | {} | visited {}/{} | {} | {}",
            session.player(),
            engine.size(),
            engine.visited_count(),
            engine.size().total_cells(),
            format_elapsed(session.elapsed_secs()),
            state
        )
    }
}

pub struct NoticeText<'a>(pub &'a SessionNotice);

impl fmt::Display for NoticeText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            SessionNotice::TourStarted => write!(f, "Clock started."),
            SessionNotice::Victory { record } => write!(
                f,
                "Tour complete! {} moves in {}. Score saved for {}.",
                record.move_count(),
                record.elapsed_time(),
                record.username()
            ),
            SessionNotice::VictoryNotSaved { summary, error } => write!(
                f,
                "Tour complete! {} moves in {}, but the score could not be saved: {}",
                summary.move_count,
                summary.elapsed_time(),
                error
            ),
            SessionNotice::Defeat { summary } => write!(
                f,
                "No legal moves left. Visited {} of {} cells in {}.",
                summary.move_count,
                summary.board_size.total_cells(),
                summary.elapsed_time()
            ),
        }
    }
}

pub struct LeaderboardText<'a> {
    pub title: String,
    pub view: LeaderboardView<'a>,
}

impl fmt::Display for LeaderboardText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.view.is_empty() {
            return write!(f, "No scores yet for {}.", self.title);
        }

        writeln!(f, "Leaderboard {}", self.title)?;
        writeln!(
            f,
            "{:>4}  {:<16} {:>6} {:>6} {:>6}  {}",
            "#", "Player", "Time", "Moves", "Board", "Date"
        )?;
        for row in self.view.rows() {
            let record = row.record;
            writeln!(
                f,
                "{:>3}.  {:<16} {:>6} {:>6} {:>6}  {}",
                row.rank,
                record.username(),
                record.elapsed_time(),
                record.move_count(),
                record.board_size(),
                record.date()
            )?;
        }
        match self.view.champion() {
            Some(champion) => write!(
                f,
                "Champion: {} ({})",
                champion.username(),
                champion.elapsed_time()
            ),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knights_tour_core::{BoardSize, PlayerName};

    fn engine(path: &[(u8, u8)]) -> TourEngine {
        TourEngine::from_path(BoardSize::new(5).unwrap(), path).unwrap()
    }

    #[test]
    fn empty_board_is_all_dots() {
        let rendered = BoardView(&engine(&[])).to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "     0  1  2  3  4");
        assert_eq!(lines[1], "  0  .  .  .  .  .");
    }

    #[test]
    fn board_marks_path_knight_and_targets() {
        let rendered = BoardView(&engine(&[(0, 0), (1, 2)])).to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[1], "  0  1  .  .  .  *");
        assert_eq!(lines[2], "  1  .  .  N  .  .");
        assert_eq!(lines[3], "  2  *  .  .  .  *");
        assert_eq!(lines[4], "  3  .  *  .  *  .");
    }

    #[test]
    fn status_before_and_after_start() {
        let mut session = GameSession::new(PlayerName::new("Tristan").unwrap());
        assert_eq!(
            StatusLine(&session).to_string(),
            "No game in progress, type `new` to start"
        );

        session.start_new_game(BoardSize::new(6).unwrap());
        assert_eq!(
            StatusLine(&session).to_string(),
            "Tristan | 6x6 | visited 0/36 | 00:00 | place the knight on any cell"
        );
    }

    #[test]
    fn empty_leaderboard_says_so() {
        let text = LeaderboardText {
            title: "7x7".to_owned(),
            view: knights_tour_core::rank(&[], BoardSize::new(7).unwrap()),
        };

        assert_eq!(text.to_string(), "No scores yet for 7x7.");
    }
}
