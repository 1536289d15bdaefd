//! The turn controller: owns the real board, applies accepted moves, records
//! captures, and evaluates terminal state after every turn.

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use rustc_hash::FxHashSet;

use crate::{
    board::Board,
    color::Color,
    coord::Coord,
    end_state::EndState,
    piece::Piece,
    resolve::resolving_moves,
    threat::{KingNotFound, threats, would_self_check},
};

/// A move rejected by the validation pipeline.
///
/// Every variant except `KingNotFound` is user-correctable: the input state
/// is untouched and the caller re-prompts at the same stage. `KingNotFound`
/// wraps the internal invariant breach and is not recoverable by asking the
/// user again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveError {
    /// The game already ended; no further moves are accepted.
    GameOver(EndState),
    /// The chosen origin square holds no piece.
    EmptyOrigin(Coord),
    /// The chosen origin holds an opposing piece.
    WrongSideOrigin(Coord),
    /// The piece at the origin has no pseudo-legal move at all.
    NoLegalMovesForPiece(Coord),
    /// The side to move is in check and this piece cannot help the king,
    /// although other pieces may.
    OriginDoesNotResolveCheck(Coord),
    /// The destination holds a piece of the mover's own color.
    DestinationOccupiedByOwnPiece(Coord),
    /// The destination is not in the chosen piece's candidate set.
    IllegalDestination(Coord),
    /// The move would leave the mover's own king attacked, either by
    /// staying in check or by exposing a pin line.
    MoveExposesOwnKing { origin: Coord, destination: Coord },
    /// A king is missing from the board; see [`KingNotFound`].
    KingNotFound(KingNotFound),
}
impl Display for MoveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::GameOver(end_state) => {
                write!(f, "the game is over: {end_state}")?;
            }
            MoveError::EmptyOrigin(origin) => write!(f, "{origin} is empty")?,
            MoveError::WrongSideOrigin(origin) => {
                write!(f, "the piece on {origin} belongs to the opponent")?;
            }
            MoveError::NoLegalMovesForPiece(origin) => {
                write!(f, "the piece on {origin} has no possible move")?;
            }
            MoveError::OriginDoesNotResolveCheck(origin) => {
                write!(f, "the piece on {origin} cannot protect the king")?;
            }
            MoveError::DestinationOccupiedByOwnPiece(destination) => {
                write!(f, "{destination} is occupied by one of the mover's own pieces")?;
            }
            MoveError::IllegalDestination(destination) => {
                write!(f, "the chosen piece cannot reach {destination}")?;
            }
            MoveError::MoveExposesOwnKing {
                origin,
                destination,
            } => {
                write!(f, "moving {origin} to {destination} would leave the king in check")?;
            }
            MoveError::KingNotFound(err) => write!(f, "{err}")?,
        }
        Ok(())
    }
}
impl Error for MoveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MoveError::KingNotFound(err) => Some(err),
            _ => None,
        }
    }
}
impl From<KingNotFound> for MoveError {
    fn from(value: KingNotFound) -> Self {
        MoveError::KingNotFound(value)
    }
}

/// The whole game at one point in time: the real board, the side to move,
/// the capture lists, and the terminal outcome once one is reached.
///
/// Values are immutable per turn: every inquiry is a pure function of the
/// state, and [`GameState::attempt_move`] returns a fresh state instead of
/// mutating the input. Threat sets are recomputed from scratch on every
/// inquiry, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub to_move: Color,
    /// Black pieces captured by White, in capture order. Display only.
    pub captured_by_white: Vec<Piece>,
    /// White pieces captured by Black, in capture order. Display only.
    pub captured_by_black: Vec<Piece>,
    pub outcome: Option<EndState>,
}
impl GameState {
    /// The standard starting position, White to move.
    pub fn new() -> Self {
        GameState {
            board: Board::default(),
            to_move: Color::White,
            captured_by_white: Vec::new(),
            captured_by_black: Vec::new(),
            outcome: None,
        }
    }
    /// Starts from an arbitrary position, evaluating terminal state right
    /// away so a loaded mate or stalemate reports its outcome.
    pub fn from_position(board: Board, to_move: Color) -> Result<Self, KingNotFound> {
        let mut state = GameState {
            board,
            to_move,
            captured_by_white: Vec::new(),
            captured_by_black: Vec::new(),
            outcome: None,
        };
        state.evaluate_terminal()?;
        Ok(state)
    }
    /// Pseudo-legal destinations for the piece on `origin`; empty when the
    /// square is empty or holds an opposing piece.
    pub fn possible_moves(&self, origin: Coord) -> Vec<Coord> {
        match self.board[origin] {
            Some(piece) if piece.color == self.to_move => {
                piece.pseudo_legal_moves(&self.board, origin)
            }
            _ => Vec::new(),
        }
    }
    pub fn threats(&self, color: Color) -> Result<FxHashSet<Coord>, KingNotFound> {
        threats(&self.board, color)
    }
    pub fn in_check(&self, color: Color) -> Result<bool, KingNotFound> {
        Ok(!self.threats(color)?.is_empty())
    }
    /// Every (origin, destination) pair that would resolve the current
    /// check. Empty when the side to move is not in check.
    pub fn resolving_moves(&self) -> Result<FxHashSet<(Coord, Coord)>, KingNotFound> {
        let threats = self.threats(self.to_move)?;
        resolving_moves(&self.board, self.to_move, &threats)
    }
    pub fn is_checkmate(&self) -> Result<bool, KingNotFound> {
        Ok(!self.threats(self.to_move)?.is_empty() && self.resolving_moves()?.is_empty())
    }
    /// Every fully validated move for the side to move.
    pub fn legal_moves(&self) -> Result<Vec<(Coord, Coord)>, KingNotFound> {
        let mut moves = Vec::new();
        for (origin, piece) in self.board.pieces_of(self.to_move) {
            for destination in piece.pseudo_legal_moves(&self.board, origin) {
                if !would_self_check(&self.board, self.to_move, origin, destination)? {
                    moves.push((origin, destination));
                }
            }
        }
        Ok(moves)
    }
    /// Runs the whole validation pipeline on a candidate move in one shot.
    /// On success the returned state has the move applied, captures
    /// recorded, and terminal state evaluated; on failure the error names
    /// the pipeline stage that rejected the move and `self` is unchanged.
    pub fn attempt_move(&self, origin: Coord, destination: Coord) -> Result<Self, MoveError> {
        if let Some(end_state) = self.outcome {
            return Err(MoveError::GameOver(end_state));
        }
        let Some(piece) = self.board[origin] else {
            return Err(MoveError::EmptyOrigin(origin));
        };
        if piece.color != self.to_move {
            return Err(MoveError::WrongSideOrigin(origin));
        }
        let candidates = piece.pseudo_legal_moves(&self.board, origin);
        if candidates.is_empty() {
            return Err(MoveError::NoLegalMovesForPiece(origin));
        }
        let threats = self.threats(self.to_move)?;
        if !threats.is_empty() {
            let resolving = resolving_moves(&self.board, self.to_move, &threats)?;
            if !resolving.iter().any(|(resolver, _)| *resolver == origin) {
                return Err(MoveError::OriginDoesNotResolveCheck(origin));
            }
        }
        if self.board[destination].is_some_and(|other| other.color == piece.color) {
            return Err(MoveError::DestinationOccupiedByOwnPiece(destination));
        }
        if !candidates.contains(&destination) {
            return Err(MoveError::IllegalDestination(destination));
        }
        if would_self_check(&self.board, self.to_move, origin, destination)? {
            return Err(MoveError::MoveExposesOwnKing {
                origin,
                destination,
            });
        }
        let mut next = self.clone();
        next.apply(origin, destination);
        next.evaluate_terminal()?;
        Ok(next)
    }
    /// Applies an already validated move: records the capture, latches the
    /// `moved` flag, relocates the piece, and flips the turn.
    fn apply(&mut self, origin: Coord, destination: Coord) {
        if let Some(captured) = self.board[destination] {
            match self.to_move {
                Color::White => self.captured_by_white.push(captured),
                Color::Black => self.captured_by_black.push(captured),
            }
        }
        let mut piece = self.board[origin].take();
        if let Some(piece) = &mut piece {
            piece.moved = true;
        }
        self.board[destination] = piece;
        self.to_move = !self.to_move;
    }
    fn evaluate_terminal(&mut self) -> Result<(), KingNotFound> {
        let threats = threats(&self.board, self.to_move)?;
        if threats.is_empty() {
            // Stalemate. The reference rule set had no answer for this
            // position and would wait forever for a move that cannot exist;
            // here it ends the game as a draw.
            if self.legal_moves()?.is_empty() {
                self.outcome = Some(EndState::Draw);
            }
        } else if resolving_moves(&self.board, self.to_move, &threats)?.is_empty() {
            self.outcome = Some(EndState::Win(!self.to_move));
        }
        Ok(())
    }
}
impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}

#[cfg(test)]
mod test {
    use super::{GameState, MoveError};
    use crate::{
        board::Board,
        color::Color,
        coord::Coord,
        end_state::EndState,
        piece::PieceKind,
    };

    fn coord(s: &str) -> Coord {
        s.parse().unwrap()
    }
    fn play(state: &GameState, origin: &str, destination: &str) -> GameState {
        state.attempt_move(coord(origin), coord(destination)).unwrap()
    }

    #[test]
    fn opening_pawns_have_exactly_two_destinations() {
        let state = GameState::new();
        for x in 0..8 {
            let origin = Coord::new(x, 6);
            assert_eq!(state.possible_moves(origin).len(), 2);
        }
    }

    #[test]
    fn possible_moves_is_empty_for_empty_or_enemy_origins() {
        let state = GameState::new();
        assert!(state.possible_moves(coord("e4")).is_empty());
        assert!(state.possible_moves(coord("e7")).is_empty());
    }

    #[test]
    fn origin_stage_errors() {
        let state = GameState::new();
        assert_eq!(
            state.attempt_move(coord("e4"), coord("e5")),
            Err(MoveError::EmptyOrigin(coord("e4")))
        );
        assert_eq!(
            state.attempt_move(coord("e7"), coord("e5")),
            Err(MoveError::WrongSideOrigin(coord("e7")))
        );
        // a rook boxed in by its own pieces cannot move at all
        assert_eq!(
            state.attempt_move(coord("a1"), coord("a3")),
            Err(MoveError::NoLegalMovesForPiece(coord("a1")))
        );
    }

    #[test]
    fn destination_stage_errors() {
        let state = GameState::new();
        assert_eq!(
            state.attempt_move(coord("b1"), coord("d2")),
            Err(MoveError::DestinationOccupiedByOwnPiece(coord("d2")))
        );
        assert_eq!(
            state.attempt_move(coord("b1"), coord("b3")),
            Err(MoveError::IllegalDestination(coord("b3")))
        );
    }

    #[test]
    fn moves_apply_latch_the_flag_and_flip_the_turn() {
        let state = GameState::new();
        let state = play(&state, "e2", "e4");
        assert_eq!(state.to_move, Color::Black);
        assert_eq!(state.board[coord("e2")], None);
        let pawn = state.board[coord("e4")].unwrap();
        assert!(pawn.moved);
        assert_eq!(pawn.kind, PieceKind::Pawn);
        assert_eq!(state.outcome, None);
    }

    #[test]
    fn captures_are_recorded_in_order() {
        let state = GameState::new();
        let state = play(&state, "e2", "e4");
        let state = play(&state, "d7", "d5");
        let state = play(&state, "e4", "d5");
        assert_eq!(state.captured_by_white.len(), 1);
        assert_eq!(state.captured_by_white[0].kind, PieceKind::Pawn);
        assert_eq!(state.captured_by_white[0].color, Color::Black);
        assert!(state.captured_by_black.is_empty());
        let state = play(&state, "d8", "d5");
        assert_eq!(state.captured_by_black.len(), 1);
        assert_eq!(state.captured_by_black[0].color, Color::White);
    }

    #[test]
    fn a_pinned_piece_may_not_leave_the_pin_line() {
        let mut board = Board::empty();
        board.place(coord("e1"), Color::White, PieceKind::King);
        board.place(coord("e8"), Color::Black, PieceKind::King);
        board.place(coord("e4"), Color::White, PieceKind::Rook);
        board.place(coord("e6"), Color::Black, PieceKind::Rook);
        let state = GameState::from_position(board, Color::White).unwrap();
        let rejected = state.attempt_move(coord("e4"), coord("a4"));
        assert_eq!(
            rejected,
            Err(MoveError::MoveExposesOwnKing {
                origin: coord("e4"),
                destination: coord("a4"),
            })
        );
        // the failed attempt leaves the state untouched
        assert_eq!(state.board, board);
        assert_eq!(state.to_move, Color::White);
    }

    #[test]
    fn in_check_only_resolving_origins_are_accepted() {
        let mut board = Board::empty();
        board.place(coord("e1"), Color::White, PieceKind::King);
        board.place(coord("h8"), Color::Black, PieceKind::King);
        board.place(coord("e7"), Color::Black, PieceKind::Rook);
        board.place(coord("a7"), Color::White, PieceKind::Rook);
        board.place(coord("h2"), Color::White, PieceKind::Pawn);
        let state = GameState::from_position(board, Color::White).unwrap();
        assert!(state.in_check(Color::White).unwrap());
        assert!(!state.is_checkmate().unwrap());
        assert_eq!(
            state.attempt_move(coord("h2"), coord("h3")),
            Err(MoveError::OriginDoesNotResolveCheck(coord("h2")))
        );
        let state = play(&state, "a7", "e7");
        assert!(!state.in_check(Color::White).unwrap());
        assert_eq!(state.captured_by_white.len(), 1);
    }

    #[test]
    fn boxed_king_against_a_queen_is_checkmate() {
        let mut board = Board::empty();
        board.place(coord("g1"), Color::White, PieceKind::King);
        board.place(coord("f2"), Color::White, PieceKind::Pawn);
        board.place(coord("g2"), Color::White, PieceKind::Pawn);
        board.place(coord("h2"), Color::White, PieceKind::Pawn);
        board.place(coord("b1"), Color::Black, PieceKind::Queen);
        board.place(coord("h8"), Color::Black, PieceKind::King);
        let state = GameState::from_position(board, Color::White).unwrap();
        assert!(state.is_checkmate().unwrap());
        assert!(state.resolving_moves().unwrap().is_empty());
        assert_eq!(state.outcome, Some(EndState::Win(Color::Black)));
        assert_eq!(
            state.attempt_move(coord("g1"), coord("h1")),
            Err(MoveError::GameOver(EndState::Win(Color::Black)))
        );
    }

    #[test]
    fn checkmate_agrees_with_threats_and_resolving_moves() {
        // resolvable check: not checkmate
        let mut board = Board::empty();
        board.place(coord("e1"), Color::White, PieceKind::King);
        board.place(coord("e8"), Color::Black, PieceKind::King);
        board.place(coord("e5"), Color::Black, PieceKind::Rook);
        let state = GameState::from_position(board, Color::White).unwrap();
        assert!(state.in_check(Color::White).unwrap());
        assert!(!state.resolving_moves().unwrap().is_empty());
        assert!(!state.is_checkmate().unwrap());
        assert_eq!(state.outcome, None);
    }

    #[test]
    fn stalemate_ends_the_game_as_a_draw() {
        let mut board = Board::empty();
        board.place(coord("a8"), Color::Black, PieceKind::King);
        board.place(coord("b6"), Color::White, PieceKind::King);
        board.place(coord("c7"), Color::White, PieceKind::Queen);
        let state = GameState::from_position(board, Color::Black).unwrap();
        assert!(!state.in_check(Color::Black).unwrap());
        assert!(state.legal_moves().unwrap().is_empty());
        assert_eq!(state.outcome, Some(EndState::Draw));
    }

    #[test]
    fn fools_mate() {
        let state = GameState::new();
        let state = play(&state, "f2", "f3");
        let state = play(&state, "e7", "e5");
        let state = play(&state, "g2", "g4");
        let state = play(&state, "d8", "h4");
        assert_eq!(state.outcome, Some(EndState::Win(Color::Black)));
        assert!(state.is_checkmate().unwrap());
        assert!(state.threats(Color::White).unwrap().contains(&coord("h4")));
    }

    #[test]
    fn resolving_moves_match_legal_moves_while_in_check() {
        let state = GameState::new();
        let state = play(&state, "e2", "e4");
        let state = play(&state, "e7", "e5");
        let state = play(&state, "d1", "h5");
        let state = play(&state, "d7", "d6");
        let state = play(&state, "h5", "e5");
        // Black is in check from the queen on e5
        assert!(state.in_check(Color::Black).unwrap());
        let legal: Vec<_> = state.legal_moves().unwrap();
        let resolving = state.resolving_moves().unwrap();
        assert_eq!(legal.len(), resolving.len());
        assert!(legal.iter().all(|movement| resolving.contains(movement)));
    }
}
