//! Threat analysis: which enemy pieces currently reach a king's square, and
//! whether a candidate move would leave the mover's own king attacked.
//!
//! Both queries work from scratch against the board they are given; nothing
//! is cached across moves, so they can never report a stale answer after a
//! board mutation.

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use rustc_hash::FxHashSet;

use crate::{board::Board, color::Color, coord::Coord};

/// A king is missing from the board. All legality logic depends on king
/// location, so this is board corruption, not a game event; callers abort
/// the current operation rather than recover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KingNotFound(pub Color);
impl Display for KingNotFound {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "no {} king on the board", self.0)?;
        Ok(())
    }
}
impl Error for KingNotFound {}

/// The positions of every enemy piece whose pseudo-legal moves reach
/// `king_color`'s king. Empty means not in check; two or more is a double
/// check, which the resolution solver handles uniformly.
pub fn threats(board: &Board, king_color: Color) -> Result<FxHashSet<Coord>, KingNotFound> {
    let king = board.king_of(king_color).ok_or(KingNotFound(king_color))?;
    Ok(board
        .pieces_of(!king_color)
        .filter(|(position, piece)| {
            piece
                .pseudo_legal_moves(board, *position)
                .contains(&king)
        })
        .map(|(position, _)| position)
        .collect())
}

pub fn in_check(board: &Board, king_color: Color) -> Result<bool, KingNotFound> {
    Ok(!threats(board, king_color)?.is_empty())
}

/// Whether moving the piece at `origin` to `destination` would leave
/// `mover`'s king attacked. The move is played on a by-value copy of the
/// board (any occupant of `destination` is overwritten, which is how
/// captures happen) and the copy is discarded; the real board is untouched.
pub fn would_self_check(
    board: &Board,
    mover: Color,
    origin: Coord,
    destination: Coord,
) -> Result<bool, KingNotFound> {
    let mut copy = *board;
    copy[destination] = copy[origin].take();
    in_check(&copy, mover)
}
