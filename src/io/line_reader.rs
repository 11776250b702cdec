use std::{io::BufRead, ops::Index, str::FromStr};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LineReaderError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Unexpected end of input before line {}", lineno + 1)]
    UnexpectedEof { lineno: usize },

    #[error("Line {} contains `{token}`, which is not an integer", lineno + 1)]
    InvalidInteger { lineno: usize, token: String },

    #[error("Line {} contains `{token}`, which is not a non-negative count", lineno + 1)]
    InvalidCount { lineno: usize, token: String },

    #[error("Line {} contains `{token}`, which is not a decimal number", lineno + 1)]
    InvalidFloat { lineno: usize, token: String },

    #[error("Line {} has {found} values, but expected {expected}", lineno + 1)]
    TokenCountMismatch {
        lineno: usize,
        expected: usize,
        found: usize,
    },
}

/// Returns true if the line's tokens are not separated by exactly one space each,
/// i.e. there is leading/trailing whitespace, repeated spaces or other whitespace
/// characters. Empty lines are not considered to have extra whitespace.
pub fn has_extra_whitespace(line: &str) -> bool {
    !line.is_empty()
        && (line.split(' ').any(str::is_empty)
            || line.contains(|c: char| c.is_whitespace() && c != ' '))
}

fn parse_tokens<T: FromStr>(
    lineno: usize,
    line: &str,
    error: impl Fn(usize, String) -> LineReaderError,
) -> Result<Vec<T>, LineReaderError> {
    line.split_whitespace()
        .map(|token| token.parse().map_err(|_| error(lineno, token.to_string())))
        .collect()
}

pub fn parse_ints(lineno: usize, line: &str) -> Result<Vec<i64>, LineReaderError> {
    parse_tokens(lineno, line, |lineno, token| LineReaderError::InvalidInteger {
        lineno,
        token,
    })
}

/// Parses a line consisting of exactly `N` integers.
pub fn parse_exact_ints<const N: usize>(
    lineno: usize,
    line: &str,
) -> Result<[i64; N], LineReaderError> {
    let ints = parse_ints(lineno, line)?;
    let found = ints.len();
    ints.try_into().map_err(|_| LineReaderError::TokenCountMismatch {
        lineno,
        expected: N,
        found,
    })
}

/// Parses a line consisting of a single non-negative integer.
pub fn parse_count(lineno: usize, line: &str) -> Result<usize, LineReaderError> {
    let counts: Vec<usize> = parse_tokens(lineno, line, |lineno, token| {
        LineReaderError::InvalidCount { lineno, token }
    })?;

    match counts[..] {
        [count] => Ok(count),
        _ => Err(LineReaderError::TokenCountMismatch {
            lineno,
            expected: 1,
            found: counts.len(),
        }),
    }
}

pub fn parse_doubles(lineno: usize, line: &str) -> Result<Vec<f64>, LineReaderError> {
    parse_tokens(lineno, line, |lineno, token| LineReaderError::InvalidFloat {
        lineno,
        token,
    })
}

/// Row-major grid of integers with fixed dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntGrid {
    rows: usize,
    cols: usize,
    cells: Vec<i64>,
}

impl IntGrid {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<i64> {
        (row < self.rows && col < self.cols).then(|| self.cells[row * self.cols + col])
    }

    pub fn row(&self, row: usize) -> &[i64] {
        assert!(row < self.rows, "row {row} out of bounds");
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }
}

impl Index<(usize, usize)> for IntGrid {
    type Output = i64;

    fn index(&self, (row, col): (usize, usize)) -> &i64 {
        assert!(col < self.cols, "column {col} out of bounds");
        &self.cells[row * self.cols + col]
    }
}

/// Line-oriented reader that keeps track of the (0-based) number of the next line.
pub struct LineReader<R> {
    reader: R,
    lineno: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, lineno: 0 }
    }

    /// Number of the line returned by the next read.
    pub fn lineno(&self) -> usize {
        self.lineno
    }

    /// Returns the next line without its terminator, or `None` at the end of the input.
    pub fn try_next_line(&mut self) -> Result<Option<(usize, String)>, LineReaderError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
        }
        if line.ends_with('\r') {
            line.pop();
        }
        if self.lineno == 0 && line.starts_with('\u{feff}') {
            line.remove(0);
        }

        let lineno = self.lineno;
        self.lineno += 1;
        Ok(Some((lineno, line)))
    }

    pub fn next_line(&mut self) -> Result<(usize, String), LineReaderError> {
        let lineno = self.lineno;
        self.try_next_line()?
            .ok_or(LineReaderError::UnexpectedEof { lineno })
    }

    pub fn remaining_lines(
        &mut self,
    ) -> impl Iterator<Item = Result<(usize, String), LineReaderError>> + '_ {
        std::iter::from_fn(move || self.try_next_line().transpose())
    }

    pub fn read_strings(&mut self) -> Result<Vec<String>, LineReaderError> {
        let (_, line) = self.next_line()?;
        Ok(line.split_whitespace().map(String::from).collect())
    }

    pub fn read_ints(&mut self) -> Result<Vec<i64>, LineReaderError> {
        let (lineno, line) = self.next_line()?;
        parse_ints(lineno, &line)
    }

    pub fn read_exact_ints<const N: usize>(&mut self) -> Result<[i64; N], LineReaderError> {
        let (lineno, line) = self.next_line()?;
        parse_exact_ints(lineno, &line)
    }

    pub fn read_count(&mut self) -> Result<usize, LineReaderError> {
        let (lineno, line) = self.next_line()?;
        parse_count(lineno, &line)
    }

    /// Decimal numbers always use `.` as separator, independent of any locale.
    pub fn read_doubles(&mut self) -> Result<Vec<f64>, LineReaderError> {
        let (lineno, line) = self.next_line()?;
        parse_doubles(lineno, &line)
    }

    pub fn read_int_grid(&mut self, rows: usize, cols: usize) -> Result<IntGrid, LineReaderError> {
        let mut cells = Vec::with_capacity(rows.saturating_mul(cols).min(1 << 16));

        for _ in 0..rows {
            let (lineno, line) = self.next_line()?;
            let row = parse_ints(lineno, &line)?;
            if row.len() != cols {
                return Err(LineReaderError::TokenCountMismatch {
                    lineno,
                    expected: cols,
                    found: row.len(),
                });
            }
            cells.extend(row);
        }

        Ok(IntGrid { rows, cols, cells })
    }
}
