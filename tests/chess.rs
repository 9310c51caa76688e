use pretty_assertions::assert_eq;
use wuki::chess::board::{Board, Status};
use wuki::chess::core::{CastleSides, Color, Square};
use wuki::chess::error::Error;
use wuki::chess::game::Game;
use wuki::chess::piece::{Piece, PieceKind};

fn square(square: &str) -> Square {
    Square::try_from(square).unwrap_or_else(|e| panic!("invalid square {square}: {e}"))
}

fn piece(kind: PieceKind, color: Color, position: &str) -> Piece {
    Piece::new(kind, color, square(position))
}

#[test]
fn squares() {
    for x in -1..=8 {
        for y in -1..=8 {
            let square = Square::new(x, y);
            assert_eq!(
                square.within_board(),
                (0..8).contains(&x) && (0..8).contains(&y)
            );
            if square.within_board() {
                let (file, rank) = square.file_rank();
                assert_eq!(Square::from_file_rank(file, rank).unwrap(), square);
                assert_eq!(Square::try_from(square.to_string().as_str()).unwrap(), square);
            }
        }
    }
}

#[test]
fn moves_never_mutate_the_board() {
    let board = Board::starting();
    let before = board.clone();
    for next in board.possible_moves(Color::White, false) {
        let after = board.make_move(&next.piece(), next.target()).unwrap();
        assert_eq!(board, before);
        assert_eq!(after.pieces(None, None).count(), 32);
        assert!(after.at(next.source()).is_none());
    }
    assert_eq!(board.pieces(None, None).count(), 32);
}

#[test]
fn attacks_of_lone_kings() {
    let board = Board::new([
        piece(PieceKind::King, Color::White, "d4"),
        piece(PieceKind::King, Color::Black, "d6"),
    ])
    .unwrap();
    for player in Color::ALL {
        assert!(board.possible_moves(player, true).is_empty());
        assert!(board.attacked_squares(player).is_empty());
        assert!(!board.is_check(player));
    }
    // d5 is next to both kings.
    let white_king = board.king(Color::White).unwrap();
    assert!(!board.legal_targets(white_king).contains(square("d5")));
    assert_eq!(board.legal_targets(white_king).len(), 5);
}

#[test]
fn checkmate() {
    let board = Board::new([
        piece(PieceKind::King, Color::White, "a1"),
        piece(PieceKind::Queen, Color::Black, "a8"),
        piece(PieceKind::Queen, Color::Black, "h8"),
        piece(PieceKind::Queen, Color::Black, "h1"),
    ])
    .unwrap();
    assert!(board.is_checkmate(Color::White));
    let game = Game::from_position(board, Color::White);
    assert_eq!(
        game.check_state(),
        Err(Error::Checkmate {
            winner: Color::Black
        })
    );
}

#[test]
fn stalemate() {
    let board = Board::new([
        piece(PieceKind::King, Color::White, "a1"),
        piece(PieceKind::King, Color::Black, "c3"),
        piece(PieceKind::Rook, Color::Black, "b2"),
    ])
    .unwrap();
    assert!(board.is_stalemate(Color::White));
    assert!(!board.is_checkmate(Color::White));
    let game = Game::from_position(board, Color::White);
    assert!(matches!(game.check_state(), Err(Error::Draw { .. })));
}

#[test]
fn castling_round_trip() {
    let mut game = Game::from_moves(["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5"]).unwrap();
    assert_eq!(
        game.board().castle_sides(Color::White),
        CastleSides::KINGSIDE
    );
    let castle = game.play("0-0").unwrap();
    assert_eq!(castle.castle_side(), Some(CastleSides::KINGSIDE));
    let board = game.board();
    assert_eq!(board.at(square("g1")).unwrap().kind(), PieceKind::King);
    assert_eq!(board.at(square("f1")).unwrap().kind(), PieceKind::Rook);
    assert!(board.at(square("e1")).is_none());
    assert!(board.at(square("h1")).is_none());

    let _ = game.play("d6").unwrap();
    let _ = game.play("d3").unwrap();
    let _ = game.play("Be6").unwrap();
    let _ = game.play("Nc3").unwrap();
    let _ = game.play("Qd7").unwrap();
    let _ = game.play("Be3").unwrap();
    // The g8 knight is still at home.
    assert_eq!(
        game.board().castle_sides(Color::Black),
        CastleSides::QUEENSIDE
    );
    let _ = game.play("0-0-0").unwrap();
    let board = game.board();
    assert_eq!(board.at(square("c8")).unwrap().kind(), PieceKind::King);
    assert_eq!(board.at(square("d8")).unwrap().kind(), PieceKind::Rook);
    assert!(board.at(square("a8")).is_none());
    assert!(game.to_string().ends_with("c1Be3 0-0-0\n"));

    // Both sides are gone after the king moved.
    assert!(game.undo(1));
    let _ = game.play("Kd8").unwrap();
    let _ = game.play("a3").unwrap();
    let _ = game.play("Ke8").unwrap();
    let _ = game.play("a4").unwrap();
    assert_eq!(game.board().castle_sides(Color::Black), CastleSides::empty());
    assert!(matches!(game.play("0-0"), Err(Error::MoveParse { .. })));
}

#[test]
fn ambiguous_knights() {
    let board = Board::new([
        piece(PieceKind::King, Color::White, "h1"),
        piece(PieceKind::Knight, Color::White, "f7"),
        piece(PieceKind::Knight, Color::White, "d3"),
        piece(PieceKind::King, Color::Black, "a8"),
    ])
    .unwrap();
    let mut game = Game::from_position(board, Color::White);
    let error = game.play("Ne5").unwrap_err();
    assert!(matches!(error, Error::AmbiguousMove { .. }));
    assert!(error.is_parse_error());
    assert!(game.is_empty());

    let played = game.play("fNe5").unwrap();
    assert_eq!(played.source(), square("f7"));
    assert!(game.undo(1));
    let played = game.play("3Ne5").unwrap();
    assert_eq!(played.source(), square("d3"));
    assert_eq!(game.to_string(), "d3Ne5\n");
}

#[test]
fn undo_round_trip() {
    let moves = [
        "e4", "e5", "Nf3", "Nc6", "Bb5", "a6", "Ba4", "Nf6", "0-0", "Be7",
    ];
    let mut game = Game::from_moves(moves).unwrap();
    let full = game.clone();
    for n in 1..=moves.len() {
        let mut shortened = full.clone();
        assert!(shortened.undo(n));
        assert_eq!(shortened.len(), moves.len() - n);
        assert_eq!(shortened.history().len(), moves.len() - n + 1);
        let expected = Game::from_moves(&moves[..moves.len() - n]).unwrap();
        assert_eq!(shortened.current_player(), expected.current_player());
        assert_eq!(shortened.board(), expected.board());
    }
    assert!(game.undo(moves.len()));
    assert_eq!(game.current_player(), Game::FIRST_PLAYER);
    assert_eq!(game.board(), &Board::starting());
    assert!(!game.undo(1));
}

#[test]
fn game_states() {
    let mut game = Game::new();
    assert_eq!(game.check_state(), Ok(Status::Normal));
    for text in ["e4", "e5", "Bc4", "Nc6", "Qh5", "Nf6"] {
        let _ = game.play(text).unwrap();
    }
    let _ = game.play("Qf7").unwrap();
    // Scholar's mate.
    assert_eq!(
        game.check_state(),
        Err(Error::Checkmate {
            winner: Color::White
        })
    );
    assert_eq!(game.board().captured(Color::Black).len(), 1);
    assert!(matches!(
        game.play("Ke7"),
        Err(Error::AmbiguousMove { .. })
    ));
}

#[test]
fn match_text() {
    let text = "e2Pe4 e7Pe5\ng1Nf3 b8Nc6\nf1Bb5\n";
    let game = Game::from_match(text).unwrap();
    assert_eq!(game.len(), 5);
    assert_eq!(game.to_string(), text);
    assert_eq!(Game::new().to_string(), "\n");
    assert!(matches!(
        Game::from_match("e2Pe4 e2Pe4\n"),
        Err(Error::MoveParse { .. })
    ));
}
