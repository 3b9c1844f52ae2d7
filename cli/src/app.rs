use anyhow::Context;
use chrono::{DateTime, FixedOffset, Local};
use knights_tour_core::{
    BoardSize, ClockEpoch, GameSession, KeyValueStore, PlayerName, ScoreBook, SessionClock,
    SessionNotice, Settings, Stored, StoredOrDefault, TourState,
};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{self, MissedTickBehavior};

use crate::command::{Command, CommandError, TopScope, HELP};
use crate::render::{BoardView, LeaderboardText, NoticeText, StatusLine};

/// What the input loop should do after a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    /// The clock was reset or started; the ticker must follow the current epoch again.
    ClockChanged(String),
    Quit,
}

/// Terminal front end over a [`GameSession`] and its store.
pub struct App<S> {
    session: GameSession,
    store: S,
    settings: Settings,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(player: PlayerName, store: S) -> Self {
        let settings = Settings::load_or_default(&store);
        Self {
            session: GameSession::new(player),
            store,
            settings,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn epoch(&self) -> ClockEpoch {
        self.session.clock().epoch()
    }

    /// Makes `size` the board for new tours and remembers it.
    pub fn remember_board_size(&mut self, size: BoardSize) {
        if self.settings.board_size == size {
            return;
        }
        self.settings.board_size = size;
        if let Err(err) = self.settings.save(&mut self.store) {
            log::warn!("board size not remembered: {}", err);
        }
    }

    pub fn start(&mut self) -> ClockEpoch {
        self.session.start_new_game(self.settings.board_size)
    }

    pub fn tick(&mut self, epoch: ClockEpoch) -> bool {
        self.session.tick(epoch)
    }

    pub fn handle_line(&mut self, line: &str, now: DateTime<FixedOffset>) -> Reply {
        match line.parse::<Command>() {
            Ok(command) => self.execute(command, now),
            Err(CommandError::Empty) => Reply::Text(String::new()),
            Err(err) => Reply::Text(err.to_string()),
        }
    }

    pub fn execute(&mut self, command: Command, now: DateTime<FixedOffset>) -> Reply {
        match command {
            Command::New(size) => {
                if let Some(size) = size {
                    self.remember_board_size(size);
                }
                self.start();
                Reply::ClockChanged(self.board_text())
            }
            Command::Move(coords) => {
                let update = self.session.click(coords, &mut self.store, now);
                if !update.has_update() {
                    return Reply::Text(self.rejected_move_text(coords));
                }

                let mut text = self.board_text();
                for notice in &update.notices {
                    text.push('\n');
                    text.push_str(&NoticeText(notice).to_string());
                }
                if update.notices.contains(&SessionNotice::TourStarted) {
                    Reply::ClockChanged(text)
                } else {
                    Reply::Text(text)
                }
            }
            Command::Board => Reply::Text(self.board_text()),
            Command::Moves => Reply::Text(self.moves_text()),
            Command::Top(scope) => Reply::Text(self.leaderboard_text(scope)),
            Command::Help => Reply::Text(HELP.to_owned()),
            Command::Quit => Reply::Quit,
        }
    }

    fn board_text(&self) -> String {
        match self.session.engine() {
            Some(engine) => format!("{}{}", BoardView(engine), StatusLine(&self.session)),
            None => StatusLine(&self.session).to_string(),
        }
    }

    fn moves_text(&self) -> String {
        match self.session.state() {
            TourState::NotStarted => "Place the knight on any cell.".to_owned(),
            TourState::Won | TourState::Lost => "The tour is over, type `new` to play again.".to_owned(),
            TourState::InProgress => {
                let moves = self
                    .session
                    .engine()
                    .map(|engine| engine.legal_moves())
                    .unwrap_or_default();
                let listed: Vec<String> = moves
                    .iter()
                    .map(|(row, col)| format!("{row} {col}"))
                    .collect();
                format!("Legal moves: {}", listed.join(", "))
            }
        }
    }

    fn rejected_move_text(&self, (row, col): (u8, u8)) -> String {
        match self.session.state() {
            TourState::InProgress => format!("Can't move to {row} {col}. {}", self.moves_text()),
            _ if self.session.engine().is_none() => "Type `new` to start a game.".to_owned(),
            _ => self.moves_text(),
        }
    }

    fn leaderboard_text(&self, scope: TopScope) -> String {
        let book = ScoreBook::load_or_default(&self.store);
        let current = self
            .session
            .engine()
            .map_or(self.settings.board_size, |engine| engine.size());

        let text = match scope {
            TopScope::All => LeaderboardText {
                title: "all sizes".to_owned(),
                view: book.rank_all(),
            },
            TopScope::Current => LeaderboardText {
                title: current.label(),
                view: book.rank(current),
            },
            TopScope::Size(size) => LeaderboardText {
                title: size.label(),
                view: book.rank(size),
            },
        };
        text.to_string()
    }

    /// Reads commands from stdin until `quit` or end of input, advancing the clock once a second.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut stdout = std::io::stdout();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        let mut epoch = self.start();
        let mut ticker = time::interval(SessionClock::TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.reset();

        show(
            &mut stdout,
            &format!("Knight's tour, type `help` for commands.\n{}", self.board_text()),
        )?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("failed to read command")? else {
                        log::debug!("input closed");
                        break;
                    };
                    match self.handle_line(&line, Local::now().fixed_offset()) {
                        Reply::Text(text) => show(&mut stdout, &text)?,
                        Reply::ClockChanged(text) => {
                            epoch = self.epoch();
                            ticker.reset();
                            show(&mut stdout, &text)?;
                        }
                        Reply::Quit => break,
                    }
                }
                _ = ticker.tick() => {
                    self.tick(epoch);
                }
            }
        }
        Ok(())
    }
}

fn show(out: &mut impl Write, text: &str) -> anyhow::Result<()> {
    if !text.is_empty() {
        writeln!(out, "{text}")?;
    }
    write!(out, "> ")?;
    out.flush().context("failed to write to stdout")
}

#[cfg(test)]
mod tests {
    use super::*;
    use knights_tour_core::MemoryStore;

    const TOUR_5X5: [&str; 25] = [
        "0 0", "1 2", "0 4", "2 3", "4 4", "3 2", "4 0", "2 1", "0 2", "1 0", "3 1", "4 3", "2 4",
        "0 3", "1 1", "3 0", "4 2", "3 4", "1 3", "0 1", "2 0", "4 1", "2 2", "1 4", "3 3",
    ];

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-06-01T09:30:00+00:00").unwrap()
    }

    fn app() -> App<MemoryStore> {
        let mut app = App::new(PlayerName::new("Bors").unwrap(), MemoryStore::new());
        app.start();
        app
    }

    fn text(reply: Reply) -> String {
        match reply {
            Reply::Text(text) | Reply::ClockChanged(text) => text,
            Reply::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn first_move_starts_the_clock() {
        let mut app = app();
        let epoch = app.epoch();

        let reply = app.handle_line("2 2", now());

        assert!(matches!(reply, Reply::ClockChanged(ref text) if text.contains("Clock started.")));
        assert!(app.tick(epoch));
        assert!(matches!(app.handle_line("0 1", now()), Reply::Text(_)));
    }

    #[test]
    fn illegal_move_lists_options() {
        let mut app = app();
        app.handle_line("0 0", now());

        let reply = text(app.handle_line("1 1", now()));

        assert_eq!(reply, "Can't move to 1 1. Legal moves: 1 2, 2 1");
    }

    #[test]
    fn parse_errors_are_reported() {
        let mut app = app();

        assert_eq!(
            app.handle_line("dance", now()),
            Reply::Text("Unknown command \"dance\", try `help`".to_owned())
        );
        assert_eq!(app.handle_line("   ", now()), Reply::Text(String::new()));
        assert_eq!(app.handle_line("quit", now()), Reply::Quit);
    }

    #[test]
    fn completed_tour_reaches_the_leaderboard() {
        let mut app = app();

        let mut last = String::new();
        for step in TOUR_5X5 {
            last = text(app.handle_line(step, now()));
        }

        assert!(last.contains("Tour complete! 25 moves in 00:00. Score saved for Bors."));
        let board = text(app.handle_line("top", now()));
        assert!(board.starts_with("Leaderboard 5x5"));
        assert!(board.contains("Bors"));
        assert_eq!(
            text(app.handle_line("top 6", now())),
            "No scores yet for 6x6."
        );
        assert_eq!(
            text(app.handle_line("moves", now())),
            "The tour is over, type `new` to play again."
        );
    }

    #[test]
    fn new_size_is_remembered() {
        let mut app = app();

        let reply = app.handle_line("new 6", now());

        assert!(matches!(reply, Reply::ClockChanged(_)));
        assert_eq!(app.session().engine().unwrap().size(), BoardSize::new(6).unwrap());
        assert_eq!(app.settings().board_size, BoardSize::new(6).unwrap());

        let reopened = App::new(PlayerName::new("Bors").unwrap(), app.store.clone());
        assert_eq!(reopened.settings().board_size, BoardSize::new(6).unwrap());
    }
}
