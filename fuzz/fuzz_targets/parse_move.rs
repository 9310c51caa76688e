#![no_main]
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use wuki::chess::game::Game;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let mut game = Game::new();
        let before = game.board().clone();
        if game.play(text).is_err() {
            assert_eq!(game.board(), &before);
            assert!(game.is_empty());
        }
    }
});
