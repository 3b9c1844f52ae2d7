use core::str::FromStr;
use knights_tour_core::{BoardSize, Coord, Coord2, GameError};
use thiserror::Error;

/// Which scores `top` lists.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TopScope {
    Current,
    Size(BoardSize),
    All,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    New(Option<BoardSize>),
    Move(Coord2),
    Board,
    Moves,
    Top(TopScope),
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command {0:?}, try `help`")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Game(#[from] GameError),
}

pub const HELP: &str = "\
Commands:
  new [N]        start a new tour, optionally on an NxN board (3-8)
  R C            move the knight to row R, column C (0-based)
  move R C       same as above
  board          show the board
  moves          list legal destinations
  top [N|all]    show the leaderboard for the current board, size N, or all sizes
  help           show this help
  quit           leave the game";

const MOVE_USAGE: &str = "move R C";

fn parse_coords(row: &str, col: &str) -> Result<Coord2, CommandError> {
    let parse = |raw: &str| raw.parse::<Coord>().map_err(|_| CommandError::Usage(MOVE_USAGE));
    Ok((parse(row)?, parse(col)?))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&head, args)) = words.split_first() else {
            return Err(CommandError::Empty);
        };

        if head.chars().all(|c| c.is_ascii_digit()) {
            return match args {
                [col] => parse_coords(head, col).map(Command::Move),
                _ => Err(CommandError::Usage(MOVE_USAGE)),
            };
        }

        match (head.to_ascii_lowercase().as_str(), args) {
            ("new" | "n", []) => Ok(Command::New(None)),
            ("new" | "n", [size]) => Ok(Command::New(Some(size.parse()?))),
            ("new" | "n", _) => Err(CommandError::Usage("new [N]")),
            ("move" | "m", [row, col]) => parse_coords(row, col).map(Command::Move),
            ("move" | "m", _) => Err(CommandError::Usage(MOVE_USAGE)),
            ("board" | "b", []) => Ok(Command::Board),
            ("moves", []) => Ok(Command::Moves),
            ("top" | "scores", []) => Ok(Command::Top(TopScope::Current)),
            ("top" | "scores", [scope]) if scope.eq_ignore_ascii_case("all") => {
                Ok(Command::Top(TopScope::All))
            }
            ("top" | "scores", [size]) => Ok(Command::Top(TopScope::Size(size.parse()?))),
            ("help" | "h" | "?", _) => Ok(Command::Help),
            ("quit" | "q" | "exit", _) => Ok(Command::Quit),
            ("board" | "b" | "moves" | "top" | "scores", _) => {
                Err(CommandError::Unknown(line.trim().to_owned()))
            }
            _ => Err(CommandError::Unknown(head.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(side: u8) -> BoardSize {
        BoardSize::new(side).unwrap()
    }

    #[test]
    fn bare_coordinates_are_a_move() {
        assert_eq!("2 3".parse::<Command>(), Ok(Command::Move((2, 3))));
        assert_eq!("  move 0 4 ".parse::<Command>(), Ok(Command::Move((0, 4))));
        assert_eq!("M 7 7".parse::<Command>(), Ok(Command::Move((7, 7))));
    }

    #[test]
    fn malformed_moves_show_usage() {
        assert_eq!("2".parse::<Command>(), Err(CommandError::Usage(MOVE_USAGE)));
        assert_eq!("move 1 x".parse::<Command>(), Err(CommandError::Usage(MOVE_USAGE)));
        assert_eq!("1 999".parse::<Command>(), Err(CommandError::Usage(MOVE_USAGE)));
    }

    #[test]
    fn new_accepts_optional_size() {
        assert_eq!("new".parse::<Command>(), Ok(Command::New(None)));
        assert_eq!("new 6".parse::<Command>(), Ok(Command::New(Some(size(6)))));
        assert_eq!("n 7x7".parse::<Command>(), Ok(Command::New(Some(size(7)))));
        assert_eq!(
            "new 12".parse::<Command>(),
            Err(CommandError::Game(GameError::UnsupportedBoardSize(12)))
        );
    }

    #[test]
    fn top_scopes() {
        assert_eq!("top".parse::<Command>(), Ok(Command::Top(TopScope::Current)));
        assert_eq!("top ALL".parse::<Command>(), Ok(Command::Top(TopScope::All)));
        assert_eq!("scores 8".parse::<Command>(), Ok(Command::Top(TopScope::Size(size(8)))));
    }

    #[test]
    fn unknown_and_empty() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "jump".parse::<Command>(),
            Err(CommandError::Unknown("jump".to_owned()))
        );
        assert_eq!("q".parse::<Command>(), Ok(Command::Quit));
    }
}
