//! Board string encodings.
//!
//! Compressed form: `"<empty rows>,<row chunks>,<right-well rows>"`. Leading
//! all-empty rows and trailing rows filled in columns 0-8 with an open column 9
//! are stored as counts. Every other row is two symbols from `a-z A-F`, each
//! carrying 5 cells MSB first (`a` = `00000`, `F` = `11111`).
//!
//! Plain form: 200 characters of `0`/`1`, row-major from the top.

use thiserror::Error;

use crate::core::Board;
use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH};

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;
const ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyzABCDEF";
const WELL_ROW: [u8; WIDTH] = [1, 1, 1, 1, 1, 1, 1, 1, 1, 0];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardCodecError {
    #[error("invalid compressed board: must contain 20 rows, but found {0}")]
    WrongRowCount(usize),
    #[error("compressed board needs three comma-separated sections")]
    MissingSection,
    #[error("invalid row count {0:?}")]
    InvalidCount(String),
    #[error("invalid board symbol {0:?}")]
    InvalidSymbol(char),
    #[error("row chunks must come in pairs, got {0} symbols")]
    OddChunkLength(usize),
    #[error("plain board must be 200 cells, got {0}")]
    InvalidLength(usize),
}

fn symbol_bits(c: char) -> Result<u8, BoardCodecError> {
    ALPHABET
        .iter()
        .position(|&s| s as char == c)
        .map(|i| i as u8)
        .ok_or(BoardCodecError::InvalidSymbol(c))
}

fn parse_count(s: &str) -> Result<usize, BoardCodecError> {
    s.trim()
        .parse()
        .map_err(|_| BoardCodecError::InvalidCount(s.to_string()))
}

fn row_bits(board: &Board, y: usize) -> [u8; WIDTH] {
    let mut bits = [0u8; WIDTH];
    for (b, cell) in bits.iter_mut().zip(board.row(y)) {
        *b = cell.as_u8();
    }
    bits
}

/// Decode either the compressed or the plain form.
pub fn decode_board(s: &str) -> Result<Board, BoardCodecError> {
    let s = s.trim();
    if s.contains(',') {
        decode_compressed(s)
    } else {
        decode_bits(s)
    }
}

fn decode_compressed(s: &str) -> Result<Board, BoardCodecError> {
    let mut sections = s.split(',');
    let (Some(empty), Some(chunks), Some(wells), None) =
        (sections.next(), sections.next(), sections.next(), sections.next())
    else {
        return Err(BoardCodecError::MissingSection);
    };
    let empty = parse_count(empty)?;
    let wells = parse_count(wells)?;
    let chunks: Vec<char> = chunks.trim().chars().collect();
    if chunks.len() % 2 != 0 {
        return Err(BoardCodecError::OddChunkLength(chunks.len()));
    }

    let total = empty.saturating_add(chunks.len() / 2).saturating_add(wells);
    if total != HEIGHT {
        return Err(BoardCodecError::WrongRowCount(total));
    }

    let mut rows = [[0u8; WIDTH]; HEIGHT];
    for (i, pair) in chunks.chunks(2).enumerate() {
        let value = (u16::from(symbol_bits(pair[0])?) << 5) | u16::from(symbol_bits(pair[1])?);
        let row = &mut rows[empty + i];
        for (x, cell) in row.iter_mut().enumerate() {
            *cell = ((value >> (WIDTH - 1 - x)) & 1) as u8;
        }
    }
    for row in rows.iter_mut().skip(HEIGHT - wells) {
        *row = WELL_ROW;
    }
    Board::from_rows(&rows).ok_or(BoardCodecError::WrongRowCount(HEIGHT))
}

fn decode_bits(s: &str) -> Result<Board, BoardCodecError> {
    let len = s.chars().count();
    if len != WIDTH * HEIGHT {
        if len % WIDTH == 0 {
            return Err(BoardCodecError::WrongRowCount(len / WIDTH));
        }
        return Err(BoardCodecError::InvalidLength(len));
    }
    let mut board = Board::new();
    for (i, c) in s.chars().enumerate() {
        let cell = match c {
            '0' => Cell::Empty,
            '1' => Cell::Filled,
            other => return Err(BoardCodecError::InvalidSymbol(other)),
        };
        board.set((i % WIDTH) as i8, (i / WIDTH) as i8, cell);
    }
    Ok(board)
}

/// Encode into the compressed form.
pub fn encode_board(board: &Board) -> String {
    let empty = (0..HEIGHT).take_while(|&y| board.is_row_empty(y)).count();
    let wells = (empty..HEIGHT)
        .rev()
        .take_while(|&y| row_bits(board, y) == WELL_ROW)
        .count();

    let mut out = format!("{empty},");
    for y in empty..HEIGHT - wells {
        let value = row_bits(board, y)
            .iter()
            .fold(0usize, |acc, &b| (acc << 1) | b as usize);
        out.push(ALPHABET[value >> 5] as char);
        out.push(ALPHABET[value & 0x1F] as char);
    }
    out.push(',');
    out.push_str(&wells.to_string());
    out
}

/// Encode into the plain 200-character form.
pub fn encode_bits(board: &Board) -> String {
    board
        .cells()
        .iter()
        .map(|c| if c.is_filled() { '1' } else { '0' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Board {
        let mut rows = [[0u8; WIDTH]; HEIGHT];
        rows[15] = [0, 0, 0, 0, 1, 1, 0, 0, 0, 0];
        rows[16] = [1, 0, 1, 1, 1, 1, 1, 1, 0, 0];
        for row in rows.iter_mut().skip(17) {
            *row = WELL_ROW;
        }
        Board::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_decode_known_string() {
        // "bg" = 00001 00110, "aa" = empty
        let board = decode_board("17,bgaa,1").unwrap();
        assert!(board.is_filled(4, 17));
        assert!(board.is_filled(7, 17));
        assert!(board.is_filled(8, 17));
        assert_eq!(board.filled_count(), 3 + 9);
        assert!(board.is_row_empty(18));
        assert!(!board.is_filled(9, 19));
    }

    #[test]
    fn test_empty_and_full_well() {
        assert_eq!(decode_board("20,,0").unwrap(), Board::new());
        assert_eq!(encode_board(&Board::new()), "20,,0");
        let wells = decode_board("0,,20").unwrap();
        assert_eq!(wells.filled_count(), 9 * 20);
        assert_eq!(encode_board(&wells), "0,,20");
    }

    #[test]
    fn test_round_trip() {
        let board = sample();
        let encoded = encode_board(&board);
        assert!(encoded.starts_with("15,"));
        assert!(encoded.ends_with(",3"));
        assert_eq!(decode_board(&encoded).unwrap(), board);
        assert_eq!(decode_board(&encode_bits(&board)).unwrap(), board);
    }

    #[test]
    fn test_wrong_row_count() {
        assert_eq!(decode_board("18,FF,0"), Err(BoardCodecError::WrongRowCount(19)));
        assert_eq!(decode_board("20,aa,1"), Err(BoardCodecError::WrongRowCount(22)));
        assert_eq!(decode_board(&"0".repeat(190)), Err(BoardCodecError::WrongRowCount(19)));
    }

    #[test]
    fn test_malformed() {
        assert_eq!(decode_board("x,,0"), Err(BoardCodecError::InvalidCount("x".into())));
        assert_eq!(decode_board("19,a,0"), Err(BoardCodecError::OddChunkLength(1)));
        assert_eq!(decode_board("19,a!,0"), Err(BoardCodecError::InvalidSymbol('!')));
        assert_eq!(decode_board("20,"), Err(BoardCodecError::MissingSection));
        assert_eq!(decode_board("0101"), Err(BoardCodecError::InvalidLength(4)));
        let mut bits = "0".repeat(199);
        bits.push('2');
        assert_eq!(decode_board(&bits), Err(BoardCodecError::InvalidSymbol('2')));
    }
}
