//! Check resolution: every (origin, destination) pair for the defending
//! side that would end an active check this turn.

use rustc_hash::FxHashSet;

use crate::{
    board::Board,
    color::Color,
    coord::Coord,
    piece::PieceKind,
    threat::{KingNotFound, would_self_check},
};

/// Finds every defending move that resolves the given check, as a set of
/// (piece origin, destination) pairs. Empty input threats yield an empty
/// set; a non-empty result means the check is escapable.
///
/// A non-king candidate counts only if, for *every* active threat, it either
/// captures that attacker or interposes on its attack line; a move that
/// blocks one of two simultaneous attackers is never offered. King moves are
/// judged purely by simulation, since the safety of the destination square
/// depends on the whole board. Every surviving candidate is then confirmed
/// on a scratch copy of the board, so a pinned capturer, or a geometric
/// "block" that does not actually stop the attacker (a knight check shares
/// no attack line), is ruled out here and not first at move application.
/// The result is exactly the set of legal check-resolving moves.
pub fn resolving_moves(
    board: &Board,
    defender: Color,
    threats: &FxHashSet<Coord>,
) -> Result<FxHashSet<(Coord, Coord)>, KingNotFound> {
    let king = board.king_of(defender).ok_or(KingNotFound(defender))?;
    let mut resolving = FxHashSet::default();
    if threats.is_empty() {
        return Ok(resolving);
    }
    for (origin, piece) in board.pieces_of(defender) {
        for destination in piece.pseudo_legal_moves(board, origin) {
            let candidate = piece.kind == PieceKind::King
                || threats
                    .iter()
                    .all(|threat| destination == *threat || interposes(king, *threat, destination));
            if candidate && !would_self_check(board, defender, origin, destination)? {
                resolving.insert((origin, destination));
            }
        }
    }
    Ok(resolving)
}

/// Whether `candidate` lies strictly between `king` and `threat` on a shared
/// rank, file, or diagonal (either orientation).
fn interposes(king: Coord, threat: Coord, candidate: Coord) -> bool {
    let dx = i16::from(threat.x) - i16::from(king.x);
    let dy = i16::from(threat.y) - i16::from(king.y);
    let cx = i16::from(candidate.x) - i16::from(king.x);
    let cy = i16::from(candidate.y) - i16::from(king.y);
    if dy == 0 && cy == 0 {
        strictly_between(cx, dx)
    } else if dx == 0 && cx == 0 {
        strictly_between(cy, dy)
    } else if dx.abs() == dy.abs() && cx.abs() == cy.abs() && cy.signum() == dy.signum() {
        strictly_between(cx, dx)
    } else {
        false
    }
}

fn strictly_between(c: i16, d: i16) -> bool {
    c != 0 && c.signum() == d.signum() && c.abs() < d.abs()
}
