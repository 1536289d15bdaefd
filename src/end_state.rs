use std::fmt::{self, Display, Formatter};

use crate::color::Color;

/// Terminal outcome of a game. `Win` is checkmate; `Draw` is the stalemate
/// outcome this crate assigns when the side to move has no legal move while
/// not in check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndState {
    Win(Color),
    Draw,
}
impl Display for EndState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EndState::Win(color) => write!(f, "{color} wins by checkmate")?,
            EndState::Draw => write!(f, "draw by stalemate")?,
        }
        Ok(())
    }
}
