use std::fmt::{self, Display, Formatter};

use crate::{
    board::Board,
    color::Color,
    coord::{Coord, pawn_direction},
};

/// The closed set of piece kinds. Movement rules dispatch on this tag; there
/// is no per-kind type or trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
impl Display for PieceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PieceKind::Pawn => write!(f, "pawn")?,
            PieceKind::Knight => write!(f, "knight")?,
            PieceKind::Bishop => write!(f, "bishop")?,
            PieceKind::Rook => write!(f, "rook")?,
            PieceKind::Queen => write!(f, "queen")?,
            PieceKind::King => write!(f, "king")?,
        }
        Ok(())
    }
}

/// A piece as it sits on a board cell. `moved` latches to true on the
/// piece's first applied move and only gates the pawn double-step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
    pub moved: bool,
}
impl Piece {
    pub fn new(color: Color, kind: PieceKind) -> Self {
        Piece {
            color,
            kind,
            moved: false,
        }
    }
    pub fn fen(self) -> char {
        let c = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
    pub fn figurine(self) -> char {
        match (self.color, self.kind) {
            (Color::White, PieceKind::Pawn) => '♙',
            (Color::White, PieceKind::Knight) => '♘',
            (Color::White, PieceKind::Bishop) => '♗',
            (Color::White, PieceKind::Rook) => '♖',
            (Color::White, PieceKind::Queen) => '♕',
            (Color::White, PieceKind::King) => '♔',
            (Color::Black, PieceKind::Pawn) => '♟',
            (Color::Black, PieceKind::Knight) => '♞',
            (Color::Black, PieceKind::Bishop) => '♝',
            (Color::Black, PieceKind::Rook) => '♜',
            (Color::Black, PieceKind::Queen) => '♛',
            (Color::Black, PieceKind::King) => '♚',
        }
    }
    /// Destinations consistent with this piece's movement pattern and the
    /// board occupancy, ignoring whether the mover's own king ends up in
    /// check. Callers pass the piece's actual position as `origin`.
    pub fn pseudo_legal_moves(self, board: &Board, origin: Coord) -> Vec<Coord> {
        match self.kind {
            PieceKind::Pawn => {
                let forward = origin
                    .line(0, pawn_direction(self.color))
                    .take_while(|position| board[*position].is_none())
                    .take(if self.moved { 1 } else { 2 });
                let captures = origin.pawn_captures(self.color).filter(|position| {
                    board[*position].is_some_and(|piece| piece.color != self.color)
                });
                forward.chain(captures).collect()
            }
            PieceKind::Knight => origin
                .knight_moves()
                .filter(|position| {
                    board[*position].is_none_or(|piece| piece.color != self.color)
                })
                .collect(),
            PieceKind::Bishop => origin
                .bishop_lines()
                .flat_map(|line| board.scan_ray(line, self.color))
                .collect(),
            PieceKind::Rook => origin
                .rook_lines()
                .flat_map(|line| board.scan_ray(line, self.color))
                .collect(),
            PieceKind::Queen => origin
                .queen_lines()
                .flat_map(|line| board.scan_ray(line, self.color))
                .collect(),
            PieceKind::King => origin
                .king_moves()
                .filter(|position| {
                    board[*position].is_none_or(|piece| piece.color != self.color)
                })
                .collect(),
        }
    }
}
impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.kind)?;
        Ok(())
    }
}
