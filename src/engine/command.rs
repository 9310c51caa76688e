/// A single line of the engine input.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    /// Draw the current position.
    Display,
    /// List the legal moves of the player to move.
    Moves,
    Undo {
        n: usize,
    },
    /// Classify the current position.
    State,
    /// Print the match text.
    Game,
    NewGame,
    Quit,
    /// Anything else consisting of a single token is a move in the notation.
    Move(String),
    Empty,
    Unknown(String),
}

fn parse_undo(parts: &[&str]) -> Command {
    match parts {
        [_] => Command::Undo { n: 1 },
        [_, n] => n.parse().map_or_else(
            |_| Command::Unknown(parts.join(" ")),
            |n| Command::Undo { n },
        ),
        _ => Command::Unknown(parts.join(" ")),
    }
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let parts: Vec<&str> = input.split_whitespace().collect();

        match parts.as_slice() {
            [] => Self::Empty,
            ["d"] => Self::Display,
            ["moves"] => Self::Moves,
            ["undo", ..] => parse_undo(&parts),
            ["state"] => Self::State,
            ["game"] => Self::Game,
            ["new"] => Self::NewGame,
            ["quit"] => Self::Quit,
            [text] => Self::Move((*text).to_string()),
            _ => Self::Unknown(input.trim().to_string()),
        }
    }
}
