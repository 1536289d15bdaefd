//! Differential testing against the `chess` crate's move generator.
//!
//! Random playouts from the starting position compare our fully validated
//! move set with the reference generator's, in both directions, at every
//! ply. The exported FEN always declares castling and en passant
//! unavailable, so the reference generates exactly the moves this rule set
//! knows about, except promotion: the reference splits a pawn's arrival on
//! the last rank into four moves, so moves collapse to (origin, destination)
//! pairs, and playouts restart rather than leave a pawn on the last rank,
//! which the reference board cannot represent unpromoted.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use rustc_hash::FxHashSet;

use crate::{
    board_display::BoardDisplay,
    coord::Coord,
    fen::Fen,
    game::GameState,
    piece::PieceKind,
};

impl From<chess::Piece> for PieceKind {
    fn from(value: chess::Piece) -> Self {
        match value {
            chess::Piece::Pawn => PieceKind::Pawn,
            chess::Piece::Knight => PieceKind::Knight,
            chess::Piece::Bishop => PieceKind::Bishop,
            chess::Piece::Rook => PieceKind::Rook,
            chess::Piece::Queen => PieceKind::Queen,
            chess::Piece::King => PieceKind::King,
        }
    }
}
impl From<chess::Square> for Coord {
    fn from(value: chess::Square) -> Self {
        Coord::new(
            value.get_file().to_index().try_into().unwrap(),
            (7 - value.get_rank().to_index()).try_into().unwrap(),
        )
    }
}
fn as_pair(value: chess::ChessMove) -> (Coord, Coord) {
    (value.get_source().into(), value.get_dest().into())
}

/// Panics if our legal move set disagrees with the reference generator's
/// for the same position, in either direction.
pub fn compare_with_reference(state: &GameState) {
    let fen = Fen {
        board: state.board,
        to_move: state.to_move,
    };
    let moves: FxHashSet<(Coord, Coord)> = state.legal_moves().unwrap().into_iter().collect();
    let reference: chess::Board = fen.to_string().parse().unwrap();
    let reference_moves: FxHashSet<(Coord, Coord)> = chess::MoveGen::new_legal(&reference)
        .map(as_pair)
        .collect();
    let display = BoardDisplay {
        board: &state.board,
        view: state.to_move,
        highlighted: &[],
        info: "",
    };
    if let Some((origin, destination)) = moves.difference(&reference_moves).next() {
        panic!("generated {origin} to {destination} but it's not a legal move\n{display}\n{fen}");
    }
    if let Some((origin, destination)) = reference_moves.difference(&moves).next() {
        panic!("{origin} to {destination} not found\n{display}\n{fen}");
    }
}

/// Plays `plies` random moves from the starting position, comparing with
/// the reference at every position and restarting whenever the game ends
/// or only promotion moves remain.
pub fn fuzz(seed: u64, plies: u32) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut state = GameState::new();
    for _ in 0..plies {
        compare_with_reference(&state);
        let moves: Box<[_]> = state
            .legal_moves()
            .unwrap()
            .into_iter()
            .filter(|(origin, destination)| !would_promote(&state, *origin, *destination))
            .collect();
        if moves.is_empty() {
            state = GameState::new();
            continue;
        }
        let (origin, destination) = moves[rng.random_range(0..moves.len())];
        state = state.attempt_move(origin, destination).unwrap();
        if state.outcome.is_some() {
            state = GameState::new();
        }
    }
}

fn would_promote(state: &GameState, origin: Coord, destination: Coord) -> bool {
    (destination.y == 0 || destination.y == 7)
        && state.board[origin].is_some_and(|piece| piece.kind == PieceKind::Pawn)
}

#[cfg(test)]
mod test {
    use super::{compare_with_reference, fuzz};
    use crate::{fen::Fen, game::GameState};

    #[test]
    fn starting_position_agrees_with_the_reference() {
        compare_with_reference(&GameState::new());
    }

    #[test]
    fn loaded_positions_agree_with_the_reference() {
        for fen in [
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w - - 0 1",
            "4k3/8/8/8/1b6/8/3PPP2/4K3 w - - 0 1",
            "4k3/4r3/8/8/8/8/4R3/4K3 b - - 0 1",
        ] {
            let fen: Fen = fen.parse().unwrap();
            let state = match GameState::from_position(fen.board, fen.to_move) {
                Ok(state) => state,
                Err(err) => panic!("{err}"),
            };
            compare_with_reference(&state);
        }
    }

    #[test]
    fn seeded_playouts_agree_with_the_reference() {
        for seed in 0..4 {
            fuzz(seed, 150);
        }
    }
}
