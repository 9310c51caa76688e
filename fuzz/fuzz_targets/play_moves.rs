#![no_main]
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use wuki::chess::board::Board;
use wuki::chess::game::Game;

// Every byte picks one of the legal moves. The rendered notation has to
// resolve back to the same move, and undoing everything has to restore the
// starting position.
fuzz_target!(|data: &[u8]| {
    let mut game = Game::new();
    for choice in data {
        let moves = game
            .board()
            .possible_moves(game.current_player(), false);
        if moves.is_empty() {
            break;
        }
        let next = moves[*choice as usize % moves.len()];
        assert_eq!(game.parse_move(&next.to_string()), Ok(next));
        game.make_move(&next.piece(), next.target()).unwrap();
    }
    let played = game.len();
    assert_eq!(game.undo(played), played > 0);
    assert_eq!(game.board(), &Board::starting());
});
