//! Failures surfaced by the rules engine. None of them are recovered from
//! internally: a rejected operation leaves the game untouched and the caller
//! decides whether to re-prompt the user or abort.

use crate::chess::core::Color;

/// Domain errors of the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Requested move is not possible for the piece: own-piece capture,
    /// geometry violation, moving into check or an impossible castle.
    #[error("illegal move: {reason}")]
    IllegalMove {
        #[allow(missing_docs)]
        reason: String,
    },
    /// Notation text does not match the grammar or contradicts the board.
    #[error("can not parse move '{text}': {reason}")]
    MoveParse {
        #[allow(missing_docs)]
        text: String,
        #[allow(missing_docs)]
        reason: String,
    },
    /// Notation matched none or more than one piece of the player.
    #[error("ambiguous move '{text}': {reason}")]
    AmbiguousMove {
        #[allow(missing_docs)]
        text: String,
        #[allow(missing_docs)]
        reason: String,
    },
    /// The piece does not belong to the player whose turn it is.
    #[error("wrong player: it is {expected:?}'s turn, got {got:?} piece")]
    WrongPlayer {
        #[allow(missing_docs)]
        expected: Color,
        #[allow(missing_docs)]
        got: Color,
    },
    /// The game is over: the player to move is checkmated.
    #[error("checkmate: {winner:?} wins")]
    Checkmate {
        #[allow(missing_docs)]
        winner: Color,
    },
    /// The game is over without a winner.
    #[error("draw: {reason}")]
    Draw {
        #[allow(missing_docs)]
        reason: String,
    },
}

impl Error {
    pub(super) fn illegal(reason: impl Into<String>) -> Self {
        Self::IllegalMove {
            reason: reason.into(),
        }
    }

    pub(super) fn parse(text: &str, reason: impl Into<String>) -> Self {
        Self::MoveParse {
            text: text.to_owned(),
            reason: reason.into(),
        }
    }

    pub(super) fn ambiguous(text: &str, reason: impl Into<String>) -> Self {
        Self::AmbiguousMove {
            text: text.to_owned(),
            reason: reason.into(),
        }
    }

    /// Ambiguous moves are a special case of unparsable moves.
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(self, Self::MoveParse { .. } | Self::AmbiguousMove { .. })
    }

    /// Returns true for the errors signalling the end of the game.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        matches!(self, Self::Checkmate { .. } | Self::Draw { .. })
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn taxonomy() {
        assert!(Error::parse("x", "wrong move format").is_parse_error());
        assert!(Error::ambiguous("Ne5", "two knights").is_parse_error());
        assert!(!Error::illegal("no").is_parse_error());
        assert!(Error::Checkmate {
            winner: Color::Black
        }
        .is_game_over());
        assert!(!Error::WrongPlayer {
            expected: Color::White,
            got: Color::Black
        }
        .is_game_over());
    }

    #[test]
    fn messages() {
        assert_eq!(
            Error::parse("z9", "wrong move format").to_string(),
            "can not parse move 'z9': wrong move format"
        );
        assert_eq!(
            Error::Checkmate {
                winner: Color::White
            }
            .to_string(),
            "checkmate: White wins"
        );
        assert_eq!(
            Error::WrongPlayer {
                expected: Color::White,
                got: Color::Black
            }
            .to_string(),
            "wrong player: it is White's turn, got Black piece"
        );
    }
}
