//! [`Game`] is the turn-by-turn record of a chess game: the positions that
//! occurred, the moves leading to them and the player to move next. Moves
//! are given either as pieces and target squares or in the positional
//! notation:
//!
//! - `[source file][source rank][piece code]<target file><target rank>`,
//!   e.g. `g1Nf3`, `Nf3`, `gNf3` or `e4`. Missing piece code means a pawn,
//!   partial source is used to pick between several candidates.
//! - `0-0` and `0-0-0` for kingside and queenside castling.
//!
//! A whole game ("match") is written as rounds of one or two moves, one round
//! per line.

use std::fmt;

use itertools::Itertools;

use crate::chess::board::{Board, Move, Status};
use crate::chess::core::{parse_file, parse_rank, CastleSides, Color, Square, KING_FILE};
use crate::chess::error::Error;
use crate::chess::piece::{Piece, PieceKind};

/// Parsed, but not yet resolved against a board, move notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Notation {
    Castle(CastleSides),
    Regular {
        file: Option<i8>,
        rank: Option<i8>,
        code: Option<char>,
        target: Square,
    },
}

impl TryFrom<&str> for Notation {
    type Error = Error;

    fn try_from(text: &str) -> Result<Self, Error> {
        match text {
            "0-0" => return Ok(Self::Castle(CastleSides::KINGSIDE)),
            "0-0-0" => return Ok(Self::Castle(CastleSides::QUEENSIDE)),
            _ => (),
        }
        let wrong_format = || Error::parse(text, "wrong move format");
        if !text.is_ascii() || !(2..=5).contains(&text.len()) {
            return Err(wrong_format());
        }
        let (prefix, target) = text.split_at(text.len() - 2);
        let target = Square::try_from(target).map_err(|_| wrong_format())?;
        let mut prefix = prefix.chars().peekable();
        let file = prefix
            .next_if(|c| c.is_ascii_lowercase())
            .map(parse_file)
            .transpose()
            .map_err(|_| wrong_format())?;
        let rank = prefix
            .next_if(char::is_ascii_digit)
            .map(parse_rank)
            .transpose()
            .map_err(|_| wrong_format())?;
        let code = prefix.next_if(char::is_ascii_uppercase);
        if prefix.next().is_some() {
            return Err(wrong_format());
        }
        Ok(Self::Regular {
            file,
            rank,
            code,
            target,
        })
    }
}

/// Positions and moves of a game, from the first one to the latest.
///
/// There is always one more position than there are moves: the first
/// position is the one the game started from.
#[derive(Clone, Debug)]
pub struct Game {
    history: Vec<Board>,
    moves: Vec<Move>,
    current_player: Color,
}

impl Game {
    /// The player who has the first move in a standard game.
    pub const FIRST_PLAYER: Color = Color::White;

    /// Starts a standard game.
    #[must_use]
    pub fn new() -> Self {
        Self::from_position(Board::starting(), Self::FIRST_PLAYER)
    }

    /// Starts a game from an arbitrary position.
    #[must_use]
    pub fn from_position(board: Board, player: Color) -> Self {
        Self {
            history: vec![board],
            moves: Vec::new(),
            current_player: player,
        }
    }

    /// Starts a standard game and replays the moves given in the notation.
    ///
    /// # Errors
    ///
    /// The first move that can't be parsed or played.
    pub fn from_moves<T: AsRef<str>>(moves: impl IntoIterator<Item = T>) -> Result<Self, Error> {
        let mut game = Self::new();
        for text in moves {
            let _ = game.play(text.as_ref())?;
        }
        Ok(game)
    }

    /// Replays the match text, see [`Game::parse_match`].
    ///
    /// # Errors
    ///
    /// The first move that can't be parsed or played.
    pub fn from_match(text: &str) -> Result<Self, Error> {
        Self::from_moves(Self::parse_match(text))
    }

    /// Splits the match text (rounds of up to two moves separated by
    /// newlines) into a list of moves.
    #[must_use]
    pub fn parse_match(text: &str) -> Vec<&str> {
        text.split_whitespace().collect()
    }

    /// The latest position.
    #[must_use]
    pub fn board(&self) -> &Board {
        debug_assert_eq!(self.history.len(), self.moves.len() + 1);
        &self.history[self.moves.len()]
    }

    /// All positions of the game in chronological order.
    #[must_use]
    pub fn history(&self) -> &[Board] {
        &self.history
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// The player who makes the next move.
    #[must_use]
    pub const fn current_player(&self) -> Color {
        self.current_player
    }

    /// Number of moves played.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Resolves the notation against the latest position for the current
    /// player.
    ///
    /// # Errors
    ///
    /// See [`Game::parse_move_on`].
    pub fn parse_move(&self, text: &str) -> Result<Move, Error> {
        Self::parse_move_on(self.board(), self.current_player, text)
    }

    /// Resolves the notation to the piece that moves and its target.
    ///
    /// When the source square is not given completely, the piece is searched
    /// among the player's pieces of the given kind which can move to the
    /// target; the partial source narrows the search down.
    ///
    /// # Errors
    ///
    /// - [`Error::MoveParse`] if the text doesn't match the notation, the
    ///   castle is not possible, or the piece on the source square differs
    ///   from the requested one.
    /// - [`Error::AmbiguousMove`] if not exactly one piece matches.
    pub fn parse_move_on(board: &Board, player: Color, text: &str) -> Result<Move, Error> {
        let (file, rank, code, target) = match Notation::try_from(text)? {
            Notation::Castle(side) => return Self::parse_castle(board, player, side, text),
            Notation::Regular {
                file,
                rank,
                code,
                target,
            } => (file, rank, code, target),
        };
        let kind = PieceKind::from_code(code.unwrap_or('P'), player)
            .map_err(|e| Error::parse(text, e.to_string()))?;
        let piece = match (file, rank) {
            (Some(x), Some(y)) => {
                let source = Square::new(x, y);
                *board
                    .at(source)
                    .ok_or_else(|| Error::parse(text, format!("no piece on {source}")))?
            },
            _ => {
                let candidates = board
                    .pieces(Some(kind), Some(player))
                    .filter(|piece| piece.possible_moves(board).contains(target))
                    .filter(|piece| file.map_or(true, |x| piece.position().x() == x))
                    .filter(|piece| rank.map_or(true, |y| piece.position().y() == y))
                    .collect_vec();
                match candidates.as_slice() {
                    [piece] => **piece,
                    [] => {
                        return Err(Error::ambiguous(
                            text,
                            format!("no {kind} can move to {target}"),
                        ))
                    },
                    _ => {
                        return Err(Error::ambiguous(
                            text,
                            format!(
                                "{} can move to {target}",
                                candidates.iter().map(ToString::to_string).join(", ")
                            ),
                        ))
                    },
                }
            },
        };
        if piece != kind {
            return Err(Error::parse(
                text,
                format!("{piece} is a {}, not a {kind}", piece.kind()),
            ));
        }
        if piece.color() != player {
            return Err(Error::parse(
                text,
                format!("{piece} does not belong to {player:?}"),
            ));
        }
        let parsed = Move::new(piece, target);
        tracing::trace!(text, %parsed, "parsed");
        Ok(parsed)
    }

    fn parse_castle(
        board: &Board,
        player: Color,
        side: CastleSides,
        text: &str,
    ) -> Result<Move, Error> {
        let not_possible = || Error::parse(text, "castling not possible");
        let king = board
            .at(Square::new(KING_FILE, player.home_rank()))
            .filter(|king| **king == PieceKind::King && king.color() == player)
            .ok_or_else(not_possible)?;
        if !board.castle_sides(player).contains(side) {
            return Err(not_possible());
        }
        let target = side.king_target(player).ok_or_else(not_possible)?;
        Ok(Move::new(*king, target))
    }

    /// Moves the piece of the current player and passes the turn.
    ///
    /// # Errors
    ///
    /// - [`Error::WrongPlayer`] if it's not the piece owner's turn.
    /// - [`Error::IllegalMove`] if the board rejects the move or the move
    ///   leaves own king in check.
    ///
    /// On error the game is left unchanged.
    pub fn make_move(&mut self, piece: &Piece, target: Square) -> Result<(), Error> {
        if piece.color() != self.current_player {
            return Err(Error::WrongPlayer {
                expected: self.current_player,
                got: piece.color(),
            });
        }
        let current = self.board();
        let board = current.make_move(piece, target)?;
        if board.is_check(piece.color()) {
            return Err(Error::illegal(format!(
                "{piece} to {target} leaves the king in check"
            )));
        }
        // The record keeps the piece as it stood on the board, touched flag
        // included.
        let on_board = current.at(piece.position()).copied().unwrap_or(*piece);
        let played = Move::new(on_board, target);
        tracing::debug!(%played, player = ?self.current_player, "move");
        self.history.push(board);
        self.moves.push(played);
        self.current_player = !self.current_player;
        Ok(())
    }

    /// Parses the notation and plays the move.
    ///
    /// # Errors
    ///
    /// See [`Game::parse_move`] and [`Game::make_move`].
    pub fn play(&mut self, text: &str) -> Result<Move, Error> {
        let next = self.parse_move(text)?;
        self.make_move(&next.piece(), next.target())?;
        Ok(next)
    }

    /// Takes back the last `n` moves. Does nothing and returns false if fewer
    /// than `n` moves were played.
    pub fn undo(&mut self, n: usize) -> bool {
        if n == 0 || self.moves.len() < n {
            return false;
        }
        let remaining = self.moves.len() - n;
        self.moves.truncate(remaining);
        self.history.truncate(remaining + 1);
        if n % 2 == 1 {
            self.current_player = !self.current_player;
        }
        tracing::debug!(n, remaining, "undo");
        true
    }

    /// Classifies the latest position for the current player.
    ///
    /// # Errors
    ///
    /// [`Error::Checkmate`] or [`Error::Draw`] if the game is over.
    pub fn check_state(&self) -> Result<Status, Error> {
        match self.board().status(self.current_player) {
            Status::Checkmate(loser) => Err(Error::Checkmate { winner: !loser }),
            Status::Stalemate(player) => Err(Error::Draw {
                reason: format!("{player:?} is stalemated"),
            }),
            status => Ok(status),
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Game {
    /// Writes the match text: one round per line, each line terminated by a
    /// newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.moves.is_empty() {
            return writeln!(f);
        }
        for round in self.moves.chunks(2) {
            writeln!(f, "{}", round.iter().format(" "))?;
        }
        Ok(())
    }
}
