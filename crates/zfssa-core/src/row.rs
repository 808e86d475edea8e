// ── Input rows ──
//
// Input files are comma-separated, headerless and ragged: each operation
// decides which widths it accepts. `Columns` walks a row left to right,
// converting each cell into its typed value and reporting the first
// mismatch.

use std::fmt;
use std::path::Path;

use thiserror::Error;

use crate::error::CoreError;
use crate::size;

/// One line of an input file, cells trimmed.
pub type Row = Vec<String>;

/// Read every data row of a CSV input file.
///
/// Lines starting with `#` and blank lines are skipped.
pub fn read_rows(path: &Path) -> Result<Vec<Row>, CoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| CoreError::InputFile {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record.iter().map(str::to_owned).collect());
    }
    Ok(rows)
}

// ── Widths ──────────────────────────────────────────────────────────

/// Column counts accepted by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widths {
    Exactly(usize),
    Either(usize, usize),
    AtLeast(usize),
}

impl Widths {
    pub fn accepts(self, len: usize) -> bool {
        match self {
            Self::Exactly(n) => len == n,
            Self::Either(a, b) => len == a || len == b,
            Self::AtLeast(n) => len >= n,
        }
    }
}

impl fmt::Display for Widths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "{n}"),
            Self::Either(a, b) => write!(f, "{a} or {b}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

// ── Errors ──────────────────────────────────────────────────────────

/// Why a row could not be bound to its record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("Error in line {row:?} It needs to be {expected} columns long")]
    Width { row: Row, expected: Widths },

    #[error("Error in line {row:?} column {column} ({name}) value '{value}': {reason}")]
    Field {
        row: Row,
        /// 1-based column number.
        column: usize,
        name: &'static str,
        value: String,
        reason: String,
    },
}

// ── Cursor ──────────────────────────────────────────────────────────

/// Left-to-right typed access to the cells of a row.
#[derive(Debug)]
pub struct Columns<'a> {
    row: &'a [String],
    next: usize,
}

impl<'a> Columns<'a> {
    /// Check the width, then start at the first column.
    pub fn bind(row: &'a [String], expected: Widths) -> Result<Self, RowError> {
        if !expected.accepts(row.len()) {
            return Err(RowError::Width {
                row: row.to_vec(),
                expected,
            });
        }
        Ok(Self { row, next: 0 })
    }

    /// Cells not consumed yet.
    pub fn rest(&mut self) -> &'a [String] {
        let rest = self.row.get(self.next..).unwrap_or_default();
        self.next = self.row.len();
        rest
    }

    /// Free text, possibly empty.
    pub fn text(&mut self, _name: &'static str) -> &'a str {
        self.take().1
    }

    /// An identifier (pool, project, share name): must not be empty.
    pub fn ident(&mut self, name: &'static str) -> Result<&'a str, RowError> {
        let (column, value) = self.take();
        if value.is_empty() {
            return Err(self.field_error(column, name, value, "must not be empty"));
        }
        Ok(value)
    }

    /// `true` / `false` in any case.
    pub fn flag(&mut self, name: &'static str) -> Result<bool, RowError> {
        let (column, value) = self.take();
        if value.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if value.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(self.field_error(column, name, value, "expected true or false"))
        }
    }

    /// Bytes, either raw or `<n><unit>` shorthand.
    pub fn size(&mut self, name: &'static str) -> Result<u64, RowError> {
        let (column, value) = self.take();
        size::parse_size(value).map_err(|e| self.field_error(column, name, value, e))
    }

    /// A power-of-two block size, raw or shorthand.
    pub fn blocksize(&mut self, name: &'static str) -> Result<u64, RowError> {
        let (column, value) = self.take();
        size::to_blocksize(value).map_err(|e| self.field_error(column, name, value, e))
    }

    /// Raise a field error for a value the caller validated itself.
    pub fn reject(
        &self,
        column: usize,
        name: &'static str,
        value: &str,
        reason: impl fmt::Display,
    ) -> RowError {
        self.field_error(column, name, value, reason)
    }

    /// 1-based number of the column the next accessor will read.
    pub fn position(&self) -> usize {
        self.next + 1
    }

    fn take(&mut self) -> (usize, &'a str) {
        let column = self.next + 1;
        let value = self.row.get(self.next).map_or("", String::as_str);
        self.next += 1;
        (column, value)
    }

    fn field_error(
        &self,
        column: usize,
        name: &'static str,
        value: &str,
        reason: impl fmt::Display,
    ) -> RowError {
        RowError::Field {
            row: self.row.to_vec(),
            column,
            name,
            value: value.to_owned(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn read_rows_skips_comments_and_blanks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "# pool,project\npool_0, alpha\n\n#pool_0,skipped\npool_1,beta,extra\n"
        )
        .unwrap();

        let rows = read_rows(file.path()).unwrap();
        assert_eq!(
            rows,
            vec![row(&["pool_0", "alpha"]), row(&["pool_1", "beta", "extra"])]
        );
    }

    #[test]
    fn read_rows_missing_file() {
        let err = read_rows(Path::new("/nonexistent/rows.csv")).unwrap_err();
        assert!(matches!(err, CoreError::InputFile { .. }));
    }

    #[test]
    fn width_error_names_expected_width() {
        let cells = row(&["pool_0", "alpha", "x"]);
        let err = Columns::bind(&cells, Widths::Exactly(19)).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"Error in line ["pool_0", "alpha", "x"] It needs to be 19 columns long"#
        );

        let err = Columns::bind(&cells, Widths::Either(2, 19)).unwrap_err();
        assert!(err.to_string().ends_with("It needs to be 2 or 19 columns long"));

        let short = row(&["project"]);
        let err = Columns::bind(&short, Widths::AtLeast(2)).unwrap_err();
        assert!(err.to_string().ends_with("It needs to be at least 2 columns long"));
    }

    #[test]
    fn typed_accessors() {
        let cells = row(&["pool_0", "TRUE", "false", "10g", "128k", ""]);
        let mut cols = Columns::bind(&cells, Widths::Exactly(6)).unwrap();
        assert_eq!(cols.ident("pool").unwrap(), "pool_0");
        assert!(cols.flag("readonly").unwrap());
        assert!(!cols.flag("atime").unwrap());
        assert_eq!(cols.size("quota").unwrap(), 10_737_418_240);
        assert_eq!(cols.blocksize("recordsize").unwrap(), 131_072);
        assert_eq!(cols.text("sharesmb"), "");
    }

    #[test]
    fn first_bad_field_is_reported() {
        let cells = row(&["pool_0", "", "maybe"]);
        let mut cols = Columns::bind(&cells, Widths::Exactly(3)).unwrap();
        cols.ident("pool").unwrap();
        let err = cols.ident("project").unwrap_err();
        assert!(matches!(err, RowError::Field { column: 2, name: "project", .. }));

        let mut cols = Columns::bind(&cells, Widths::Exactly(3)).unwrap();
        cols.text("pool");
        cols.text("project");
        let err = cols.flag("nodestroy").unwrap_err();
        assert!(err.to_string().contains("column 3 (nodestroy) value 'maybe'"));
    }
}
