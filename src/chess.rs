//! Implementation of chess rules: pieces and their movement, positions, and
//! the game played from them.

pub mod bitboard;
pub mod board;
pub mod core;
pub mod error;
pub mod game;
pub mod piece;
