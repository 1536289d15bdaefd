//! A simplified chess rules core.
//!
//! The crate answers four questions about a board position: where a piece
//! may go, whether a king is attacked, which moves would resolve such an
//! attack, and whether the position is terminal. Presentation is left to the
//! caller: it picks an origin and a destination, hands them to
//! [`game::GameState::attempt_move`], and gets back either the next state or
//! a typed [`game::MoveError`] to re-prompt on.
//!
//! The rule set intentionally omits castling, en passant, and promotion.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod board;
pub mod board_display;
pub mod color;
pub mod coord;
pub mod end_state;
pub mod fen;
pub mod fuzz;
pub mod game;
pub mod piece;
pub mod resolve;
pub mod threat;
