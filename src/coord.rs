use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use crate::color::Color;

/// A square of the board. `x` is the file (0 = a), `y` the row counted from
/// the top, so `y == 0` is rank 8, Black's home rank.
///
/// A constructed `Coord` is always on the board; the fallible constructors
/// and [`Coord::move_by`] reject anything outside the 8×8 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub x: u8,
    pub y: u8,
}
impl Coord {
    pub fn new(x: u8, y: u8) -> Self {
        debug_assert!(x < 8);
        debug_assert!(y < 8);
        Coord { x, y }
    }
    pub fn new_checked(x: u8, y: u8) -> Option<Self> {
        if x < 8 && y < 8 { Some(Coord { x, y }) } else { None }
    }
    pub fn move_by(self, x: i8, y: i8) -> Option<Self> {
        let x = self.x.checked_add_signed(x)?;
        let y = self.y.checked_add_signed(y)?;
        Self::new_checked(x, y)
    }
    /// Squares reachable in one step along `(x, y)`, nearest first, stopping
    /// at the board edge. The origin itself is not included.
    pub fn line(self, x: i8, y: i8) -> impl Iterator<Item = Self> {
        (1..).map_while(move |distance| self.move_by(x * distance, y * distance))
    }
    pub fn king_moves(self) -> impl Iterator<Item = Self> {
        KING_OFFSETS
            .into_iter()
            .filter_map(move |(x, y)| self.move_by(x, y))
    }
    pub fn knight_moves(self) -> impl Iterator<Item = Self> {
        [(1, 2), (2, 1)]
            .into_iter()
            .flat_map(|(x, y)| [(x, y), (-x, y), (x, -y), (-x, -y)])
            .filter_map(move |(x, y)| self.move_by(x, y))
    }
    pub fn rook_lines(self) -> impl Iterator<Item = impl Iterator<Item = Self>> {
        ROOK_DIRECTIONS.into_iter().map(move |(x, y)| self.line(x, y))
    }
    pub fn bishop_lines(self) -> impl Iterator<Item = impl Iterator<Item = Self>> {
        BISHOP_DIRECTIONS
            .into_iter()
            .map(move |(x, y)| self.line(x, y))
    }
    pub fn queen_lines(self) -> impl Iterator<Item = impl Iterator<Item = Self>> {
        KING_OFFSETS.into_iter().map(move |(x, y)| self.line(x, y))
    }
    /// The two squares a pawn of `color` attacks from here. Capture squares
    /// only; forward advances are not attacks.
    pub fn pawn_captures(self, color: Color) -> impl Iterator<Item = Self> {
        let y = pawn_direction(color);
        [(1, y), (-1, y)]
            .into_iter()
            .filter_map(move |(x, y)| self.move_by(x, y))
    }
    /// The shade of this square. a8 is a light square.
    pub fn color(self) -> Color {
        if (self.x + self.y) % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }
    pub fn from_chars(x: char, y: char) -> Result<Self, ParseCoordError> {
        let x = match x {
            'a'..='h' => x as u8 - b'a',
            _ => return Err(ParseCoordError::InvalidX(x)),
        };
        let y = match y {
            '1'..='8' => 7 - (y as u8 - b'1'),
            _ => return Err(ParseCoordError::InvalidY(y)),
        };
        Ok(Coord { x, y })
    }
}

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// The `y` delta of a single pawn advance. White pawns move toward `y == 0`.
pub fn pawn_direction(color: Color) -> i8 {
    match color {
        Color::White => -1,
        Color::Black => 1,
    }
}
pub fn pawn_home_rank(color: Color) -> u8 {
    match color {
        Color::White => 6,
        Color::Black => 1,
    }
}

impl Display for Coord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let x = (self.x + b'a') as char;
        let y = 8 - self.y;
        write!(f, "{x}{y}")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseCoordError {
    Empty,
    YNotProvided,
    InvalidX(char),
    InvalidY(char),
    UnexpectedSymbol(char),
}
impl Display for ParseCoordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParseCoordError::Empty => write!(f, "expected 2 characters, found none instead")?,
            ParseCoordError::YNotProvided => write!(f, "expected 2 characters, found 1 instead")?,
            ParseCoordError::InvalidX(c) => write!(f, "`{c}` is not a letter from a to h")?,
            ParseCoordError::InvalidY(c) => write!(f, "`{c}` is not a number from 1 to 8")?,
            ParseCoordError::UnexpectedSymbol(c) => {
                write!(f, "unexpected `{c}`, only 2 characters are expected")?;
            }
        }
        Ok(())
    }
}
impl Error for ParseCoordError {}

impl FromStr for Coord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut characters = s.chars();
        let x = characters.next().ok_or(ParseCoordError::Empty)?;
        let y = characters.next().ok_or(ParseCoordError::YNotProvided)?;
        let coord = Coord::from_chars(x, y)?;
        if let Some(c) = characters.next() {
            return Err(ParseCoordError::UnexpectedSymbol(c));
        }
        Ok(coord)
    }
}
