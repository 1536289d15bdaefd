//! FEN import and export, used by the test tooling to set up positions and
//! to hand boards to the reference move generator.
//!
//! Only the placement and side-to-move fields carry information. The rule
//! set has no castling or en passant, so the export always writes `- -` for
//! those fields and `0 1` for the clocks, and the import ignores everything
//! past the side to move.

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    iter::{once, repeat},
    str::FromStr,
};

use crate::{
    board::Board,
    color::Color,
    coord::pawn_home_rank,
    piece::{Piece, PieceKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fen {
    pub board: Board,
    pub to_move: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFenError {
    NotEnoughSquaresOnRow,
    ExceedingSquaresOnRow,
    UnexpectedChar(char),
    UnexpectedEol,
}
impl Display for ParseFenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParseFenError::NotEnoughSquaresOnRow => write!(f, "not enough squares on a row")?,
            ParseFenError::ExceedingSquaresOnRow => write!(f, "too many squares on a row")?,
            ParseFenError::UnexpectedChar(c) => write!(f, "unexpected character `{c}`")?,
            ParseFenError::UnexpectedEol => write!(f, "unexpected end of input")?,
        }
        Ok(())
    }
}
impl Error for ParseFenError {}

impl FromStr for Fen {
    type Err = ParseFenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut characters = s.chars();
        let mut squares = [[None; 8]; 8];

        let mut x: u8 = 0;
        let mut y: u8 = 0;
        while x < 8 || y < 7 {
            if let Some(c) = characters.next() {
                if c == '/' {
                    if x == 8 {
                        x = 0;
                        y += 1;
                    } else {
                        return Err(ParseFenError::NotEnoughSquaresOnRow);
                    }
                } else if matches!(c, '1'..='8') {
                    x = x
                        .checked_add(c as u8 - b'0')
                        .ok_or(ParseFenError::ExceedingSquaresOnRow)?;
                    if x > 8 {
                        return Err(ParseFenError::ExceedingSquaresOnRow);
                    }
                } else {
                    let (color, kind) = match c {
                        'P' => (Color::White, PieceKind::Pawn),
                        'N' => (Color::White, PieceKind::Knight),
                        'B' => (Color::White, PieceKind::Bishop),
                        'R' => (Color::White, PieceKind::Rook),
                        'Q' => (Color::White, PieceKind::Queen),
                        'K' => (Color::White, PieceKind::King),
                        'p' => (Color::Black, PieceKind::Pawn),
                        'n' => (Color::Black, PieceKind::Knight),
                        'b' => (Color::Black, PieceKind::Bishop),
                        'r' => (Color::Black, PieceKind::Rook),
                        'q' => (Color::Black, PieceKind::Queen),
                        'k' => (Color::Black, PieceKind::King),
                        c => return Err(ParseFenError::UnexpectedChar(c)),
                    };
                    squares[y as usize][x as usize] = Some(Piece {
                        color,
                        kind,
                        // a pawn off its home rank must have moved
                        moved: kind != PieceKind::Pawn || pawn_home_rank(color) != y,
                    });
                    x += 1;
                }
            } else {
                return Err(ParseFenError::UnexpectedEol);
            }
        }
        let space = characters.next().ok_or(ParseFenError::UnexpectedEol)?;
        if space != ' ' {
            return Err(ParseFenError::UnexpectedChar(space));
        }
        let to_move = match characters.next().ok_or(ParseFenError::UnexpectedEol)? {
            'w' | 'W' => Color::White,
            'b' | 'B' => Color::Black,
            c => return Err(ParseFenError::UnexpectedChar(c)),
        };
        Ok(Fen {
            board: Board { squares },
            to_move,
        })
    }
}
impl Display for Fen {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (row, first) in self
            .board
            .squares
            .into_iter()
            .zip(once(true).chain(repeat(false)))
        {
            if !first {
                write!(f, "/")?;
            }
            let mut pieces = row.into_iter().peekable();
            while let Some(piece) = pieces.next() {
                if let Some(piece) = piece {
                    write!(f, "{}", piece.fen())?;
                } else {
                    let mut count = 1;
                    while pieces.peek().is_some_and(Option::is_none) {
                        pieces.next();
                        count += 1;
                    }
                    write!(f, "{count}")?;
                }
            }
        }
        write!(f, " {} - - 0 1", self.to_move.lowercase())?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{Fen, ParseFenError};
    use crate::{board::Board, color::Color, coord::Coord, piece::PieceKind};

    const STARTING: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1";

    #[test]
    fn starting_position_round_trips() {
        let fen: Fen = STARTING.parse().unwrap();
        assert_eq!(fen.board, Board::default());
        assert_eq!(fen.to_move, Color::White);
        assert_eq!(fen.to_string(), STARTING);
    }

    #[test]
    fn pawns_off_their_home_rank_parse_as_moved() {
        let fen: Fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b - - 0 1"
            .parse()
            .unwrap();
        let advanced = fen.board[Coord::new(4, 4)].unwrap();
        assert_eq!(advanced.kind, PieceKind::Pawn);
        assert!(advanced.moved);
        let home = fen.board[Coord::new(0, 6)].unwrap();
        assert!(!home.moved);
        assert_eq!(fen.to_move, Color::Black);
    }

    #[test]
    fn sparse_board_round_trips() {
        let mut board = Board::empty();
        board.place(Coord::new(4, 7), Color::White, PieceKind::King);
        board.place(Coord::new(4, 0), Color::Black, PieceKind::King);
        board.place(Coord::new(0, 4), Color::White, PieceKind::Queen);
        let fen = Fen {
            board,
            to_move: Color::Black,
        };
        let text = fen.to_string();
        assert_eq!(text, "4k3/8/8/8/Q7/8/8/4K3 b - - 0 1");
        let parsed: Fen = text.parse().unwrap();
        assert_eq!(parsed.board, board);
    }

    #[test]
    fn malformed_inputs_are_rejected() {
        assert_eq!(
            "rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1".parse::<Fen>(),
            Err(ParseFenError::NotEnoughSquaresOnRow)
        );
        assert_eq!(
            "rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1".parse::<Fen>(),
            Err(ParseFenError::ExceedingSquaresOnRow)
        );
        assert_eq!(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x - - 0 1".parse::<Fen>(),
            Err(ParseFenError::UnexpectedChar('x'))
        );
        assert_eq!(
            "rnbqkbnr/pppppppp/8/8".parse::<Fen>(),
            Err(ParseFenError::UnexpectedEol)
        );
    }
}
