use std::ops::{Index, IndexMut};

use crate::{
    color::Color,
    coord::Coord,
    piece::{Piece, PieceKind},
};

/// An 8×8 grid of cells, each holding at most one piece. Row 0 is Black's
/// home rank. The board owns its pieces as plain values, so a copy is a deep
/// copy: mutating a copied board never affects the original. Speculative
/// analysis relies on exactly that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    pub squares: [[Option<Piece>; 8]; 8],
}
impl Board {
    /// A board with no pieces, for assembling test and analysis positions.
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
        }
    }
    pub fn place(&mut self, position: Coord, color: Color, kind: PieceKind) {
        self[position] = Some(Piece::new(color, kind));
    }
    /// Every piece on the board with its position, row by row from the top.
    pub fn pieces(&self) -> impl Iterator<Item = (Coord, Piece)> {
        self.squares.iter().zip(0..).flat_map(|(row, y)| {
            row.iter()
                .zip(0..)
                .filter_map(move |(piece, x)| piece.map(|piece| (Coord::new(x, y), piece)))
        })
    }
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Coord, Piece)> {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }
    pub fn king_of(&self, color: Color) -> Option<Coord> {
        self.pieces_of(color)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(position, _)| position)
    }
    /// Ray scan shared by bishop, rook, and queen movement: walk `line`
    /// outward, yielding empty squares; stop at the first occupied square,
    /// yielding it only when it holds an enemy of `color`.
    pub fn scan_ray(
        &self,
        line: impl Iterator<Item = Coord>,
        color: Color,
    ) -> impl Iterator<Item = Coord> {
        let mut stop_next = false;
        line.take_while(move |position| {
            if stop_next {
                false
            } else {
                self[*position].is_none_or(|piece| {
                    if piece.color == color {
                        false
                    } else {
                        stop_next = true;
                        true
                    }
                })
            }
        })
    }
}
impl Index<Coord> for Board {
    type Output = Option<Piece>;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.squares[index.y as usize][index.x as usize]
    }
}
impl IndexMut<Coord> for Board {
    fn index_mut(&mut self, index: Coord) -> &mut Self::Output {
        &mut self.squares[index.y as usize][index.x as usize]
    }
}
impl Default for Board {
    /// The standard starting layout: back-rank pieces on rows 0 and 7,
    /// pawns on rows 1 and 6, empty middle.
    fn default() -> Self {
        let pieces = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        Board {
            squares: [
                pieces.map(|kind| Some(Piece::new(Color::Black, kind))),
                [Some(Piece::new(Color::Black, PieceKind::Pawn)); 8],
                [None; 8],
                [None; 8],
                [None; 8],
                [None; 8],
                [Some(Piece::new(Color::White, PieceKind::Pawn)); 8],
                pieces.map(|kind| Some(Piece::new(Color::White, kind))),
            ],
        }
    }
}
