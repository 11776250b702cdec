use crate::io::line_reader::*;

use std::{
    fmt,
    fs::File,
    io::{BufRead, BufReader, Write},
    path::Path,
};

use thiserror::Error;
use tracing::{debug, error, warn};

/// Upper bound on capacity reserved from declared counts before the entries are actually read.
const MAX_PREALLOC: usize = 1 << 12;

/// A vine hanging at `distance` from the start with the given `length`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Vine {
    pub distance: i64,
    pub length: i64,
}

impl Vine {
    pub fn new(distance: i64, length: i64) -> Self {
        Self { distance, length }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCase {
    target_distance: i64,
    vines: Vec<Vine>,
}

impl TestCase {
    pub fn new(target_distance: i64, vines: Vec<Vine>) -> Self {
        Self {
            target_distance,
            vines,
        }
    }

    pub fn target_distance(&self) -> i64 {
        self.target_distance
    }

    /// Vines in input order
    pub fn vines(&self) -> &[Vine] {
        &self.vines
    }

    pub fn num_vines(&self) -> usize {
        self.vines.len()
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vines, target {}",
            self.num_vines(),
            self.target_distance
        )
    }
}

#[derive(Debug, Error)]
pub enum InputFileError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Error while reading input: {0}")]
    VisitorError(#[from] InputFileVisitorError),
    #[error("Warning while reading input (paranoid mode): {0}")]
    VisitorWarning(#[from] InputFileVisitorWarning),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputFile {
    test_cases: Vec<TestCase>,
}

impl InputFile {
    pub fn num_test_cases(&self) -> usize {
        self.test_cases.len()
    }

    pub fn test_cases(&self) -> &[TestCase] {
        &self.test_cases
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestCase> {
        self.test_cases.iter()
    }

    pub fn read(path: &Path, paranoid: bool) -> Result<Self, InputFileError> {
        debug!("Read input from {path:?}");
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file), paranoid)
    }

    /// Reads all test cases from `reader`. Warnings are logged and only reported as
    /// errors if `paranoid` is set; no test cases are returned if anything fails.
    pub fn read_from(mut reader: impl BufRead, paranoid: bool) -> Result<Self, InputFileError> {
        let mut visitor = InputFileVisitor::process(&mut reader);

        if !visitor.errors.is_empty() || !visitor.warnings.is_empty() {
            for w in &visitor.warnings {
                warn!(" {w}");
            }

            for e in &visitor.errors {
                error!(" {e}");
            }

            if !visitor.errors.is_empty() {
                return Err(InputFileError::VisitorError(visitor.errors.remove(0)));
            }

            if paranoid {
                return Err(InputFileError::VisitorWarning(visitor.warnings.remove(0)));
            }
        }

        Ok(Self {
            test_cases: visitor.test_cases,
        })
    }

    /// Writes one `Case #i: ...` line per test case followed by the total count.
    pub fn write_summary(&self, writer: &mut impl Write) -> std::io::Result<()> {
        for (i, case) in self.test_cases.iter().enumerate() {
            writeln!(writer, "Case #{}: {case}", i + 1)?;
        }
        writeln!(writer, "Test cases: {}", self.num_test_cases())
    }
}

impl<'a> IntoIterator for &'a InputFile {
    type Item = &'a TestCase;
    type IntoIter = std::slice::Iter<'a, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.test_cases.iter()
    }
}

impl IntoIterator for InputFile {
    type Item = TestCase;
    type IntoIter = std::vec::IntoIter<TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.test_cases.into_iter()
    }
}

//////////////////////////////////////////////////////////////////

#[derive(Default, Debug)]
pub struct InputFileVisitor {
    pub errors: Vec<InputFileVisitorError>,
    pub warnings: Vec<InputFileVisitorWarning>,
    pub header: Option<usize>,
    pub test_cases: Vec<TestCase>,
}

#[derive(Error, Debug)]
pub enum InputFileVisitorError {
    #[error("Input is empty; expected number of test cases in line 1")]
    NoHeaderFound,

    #[error("Header indicates {expected} test cases, but found only {found}")]
    MissingTestCases { expected: usize, found: usize },

    #[error("Test case {case} indicates {expected} vines, but found only {found}")]
    MissingVines {
        case: usize,
        expected: usize,
        found: usize,
    },

    #[error("Test case {case} ends without target distance")]
    MissingTargetDistance { case: usize },

    #[error(transparent)]
    Format(LineReaderError),

    #[error(transparent)]
    Io(std::io::Error),
}

impl From<LineReaderError> for InputFileVisitorError {
    fn from(e: LineReaderError) -> Self {
        match e {
            LineReaderError::Io(e) => Self::Io(e),
            e => Self::Format(e),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum InputFileVisitorWarning {
    #[error("Line {} has extra whitespace", lineno + 1)]
    ExtraWhitespace { lineno: usize },

    #[error("Line {} follows the last test case", lineno + 1)]
    TrailingContent { lineno: usize },
}

impl InputFileVisitor {
    pub fn process(reader: &mut impl BufRead) -> InputFileVisitor {
        let mut visitor = InputFileVisitor::default();
        let mut lines = LineReader::new(reader);

        if let Err(e) = visitor.read_test_cases(&mut lines) {
            visitor.errors.push(e);
            return visitor;
        }

        if let Err(e) = visitor.check_trailing_lines(&mut lines) {
            visitor.errors.push(e);
        }

        visitor
    }

    fn next_line<R: BufRead>(
        &mut self,
        lines: &mut LineReader<R>,
    ) -> Result<Option<(usize, String)>, InputFileVisitorError> {
        let next = lines.try_next_line()?;
        if let Some((lineno, line)) = &next {
            if has_extra_whitespace(line) {
                self.warnings.push(InputFileVisitorWarning::ExtraWhitespace {
                    lineno: *lineno,
                });
            }
        }
        Ok(next)
    }

    fn read_test_cases<R: BufRead>(
        &mut self,
        lines: &mut LineReader<R>,
    ) -> Result<(), InputFileVisitorError> {
        let Some((lineno, line)) = self.next_line(lines)? else {
            return Err(InputFileVisitorError::NoHeaderFound);
        };

        let num_test_cases = parse_count(lineno, &line)?;
        self.header = Some(num_test_cases);
        self.test_cases = Vec::with_capacity(num_test_cases.min(MAX_PREALLOC));

        for case in 1..=num_test_cases {
            let Some((lineno, line)) = self.next_line(lines)? else {
                return Err(InputFileVisitorError::MissingTestCases {
                    expected: num_test_cases,
                    found: case - 1,
                });
            };

            let num_vines = parse_count(lineno, &line)?;
            let mut vines = Vec::with_capacity(num_vines.min(MAX_PREALLOC));

            for found in 0..num_vines {
                let Some((lineno, line)) = self.next_line(lines)? else {
                    return Err(InputFileVisitorError::MissingVines {
                        case,
                        expected: num_vines,
                        found,
                    });
                };

                let [distance, length] = parse_exact_ints::<2>(lineno, &line)?;
                vines.push(Vine::new(distance, length));
            }

            let Some((lineno, line)) = self.next_line(lines)? else {
                return Err(InputFileVisitorError::MissingTargetDistance { case });
            };

            let [target_distance] = parse_exact_ints::<1>(lineno, &line)?;
            self.test_cases.push(TestCase::new(target_distance, vines));
        }

        Ok(())
    }

    fn check_trailing_lines<R: BufRead>(
        &mut self,
        lines: &mut LineReader<R>,
    ) -> Result<(), InputFileVisitorError> {
        for next in lines.remaining_lines() {
            let (lineno, line) = next?;
            if !line.trim().is_empty() {
                self.warnings
                    .push(InputFileVisitorWarning::TrailingContent { lineno });
                break;
            }
        }

        Ok(())
    }
}
