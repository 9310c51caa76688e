//! The engine connects the rules with the outside world: it reads commands
//! line by line from the input stream, applies them to the [`Game`] and
//! writes responses to the output stream.
//!
//! [`Engine::run`] is the "main loop" of the binary. Rejected moves and
//! malformed commands are reported and the loop continues.

use std::io::{BufRead, Write};

use itertools::Itertools;

use crate::chess::game::Game;
use crate::engine::command::Command;

mod command;

/// Drives a [`Game`] with commands from the input stream.
pub struct Engine<'a, R: BufRead, W: Write> {
    game: Game,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Engine<'a, R, W> {
    /// Creates a new instance of the engine with a new game and provided I/O.
    #[must_use]
    pub fn new(input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            game: Game::new(),
            input,
            output,
        }
    }

    /// Continuously reads the input stream and executes the commands until
    /// "quit" is sent or the input is exhausted.
    ///
    /// # Errors
    ///
    /// Only I/O errors are propagated.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            match Command::parse(&line) {
                Command::Display => writeln!(self.output, "{}", self.game.board())?,
                Command::Moves => self.handle_moves()?,
                Command::Undo { n } => self.handle_undo(n)?,
                Command::State => self.handle_state()?,
                Command::Game => write!(self.output, "{}", self.game)?,
                Command::NewGame => self.game = Game::new(),
                Command::Quit => break,
                Command::Move(text) => self.handle_move(&text)?,
                Command::Empty => {},
                Command::Unknown(command) => {
                    writeln!(self.output, "unknown command: {command}")?;
                },
            }
        }
        Ok(())
    }

    /// Lists the legal moves of the player to move in the notation.
    fn handle_moves(&mut self) -> anyhow::Result<()> {
        let moves = self
            .game
            .board()
            .possible_moves(self.game.current_player(), false)
            .iter()
            .map(ToString::to_string)
            .sorted()
            .join(" ");
        writeln!(self.output, "{moves}")?;
        Ok(())
    }

    fn handle_undo(&mut self, n: usize) -> anyhow::Result<()> {
        if !self.game.undo(n) {
            writeln!(
                self.output,
                "can not undo {n} moves: {} played",
                self.game.len()
            )?;
        }
        Ok(())
    }

    fn handle_state(&mut self) -> anyhow::Result<()> {
        match self.game.check_state() {
            Ok(status) => writeln!(self.output, "{status}")?,
            Err(e) => writeln!(self.output, "{e}")?,
        }
        Ok(())
    }

    /// Plays the move and announces the end of the game when it happens.
    fn handle_move(&mut self, text: &str) -> anyhow::Result<()> {
        match self.game.play(text) {
            Ok(played) => {
                writeln!(self.output, "{played}")?;
                if let Err(e) = self.game.check_state() {
                    writeln!(self.output, "{e}")?;
                }
            },
            Err(e) => {
                tracing::debug!(%e, "rejected move");
                writeln!(self.output, "error: {e}")?;
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use super::*;

    fn run(input: &str) -> String {
        let mut input = Cursor::new(input.as_bytes());
        let mut output = Vec::new();
        Engine::new(&mut input, &mut output).run().unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn play_and_record() {
        assert_eq!(
            run("e4\ne5\n\ngame\nundo\ngame\nundo 5\n"),
            "e2Pe4\n\
             e7Pe5\n\
             e2Pe4 e7Pe5\n\
             e2Pe4\n\
             can not undo 5 moves: 1 played\n"
        );
    }

    #[test]
    fn errors_do_not_stop_the_loop() {
        assert_eq!(
            run("e5\nz9\nhello world\ne4\n"),
            "error: ambiguous move 'e5': no Pawn can move to e5\n\
             error: can not parse move 'z9': wrong move format\n\
             unknown command: hello world\n\
             e2Pe4\n"
        );
    }

    #[test]
    fn quit_stops_reading() {
        assert_eq!(run("e4\nquit\ne5\n"), "e2Pe4\n");
    }

    #[test]
    fn state_and_moves() {
        assert_eq!(
            run("moves\nstate\n"),
            "a2Pa3 a2Pa4 b1Na3 b1Nc3 b2Pb3 b2Pb4 c2Pc3 c2Pc4 d2Pd3 d2Pd4 e2Pe3 e2Pe4 f2Pf3 \
             f2Pf4 g1Nf3 g1Nh3 g2Pg3 g2Pg4 h2Ph3 h2Ph4\n\
             normal\n"
        );
        assert_eq!(
            run("f3\ne5\ng4\nQh4\nstate\n"),
            "f2Pf3\ne7Pe5\ng2Pg4\nd8Qh4\ncheckmate: Black wins\ncheckmate: Black wins\n"
        );
    }

    #[test]
    fn new_game() {
        assert_eq!(run("e4\nnew\ngame\n"), "e2Pe4\n\n");
    }
}
