//! In-memory rectangular grid of string cells.
//!
//! Row 0 conventionally holds the header labels. Rows loaded from disk may
//! have differing widths; tables produced by the aggregator are rectangular.

/// A table of string cells, row 0 being the header
///
/// **Public** - shared by the input, aggregation and output layers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from already split rows
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// All rows, header included
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Consume the table, returning its rows
    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }

    /// Number of rows, header included
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row 0, if any
    pub fn header(&self) -> Option<&[String]> {
        self.row(0)
    }

    /// Width of the header row (0 for an empty table)
    pub fn width(&self) -> usize {
        self.header().map_or(0, <[String]>::len)
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Every row after the header
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Prefix the table with a header row
    pub fn with_header(mut self, header: Vec<String>) -> Self {
        self.rows.insert(0, header);
        self
    }

    /// Column index of a header label
    pub fn header_index(&self, header: &str) -> Option<usize> {
        self.header()?.iter().position(|h| h == header)
    }

    /// Location `(row, column)` of the first cell equal to `value`
    ///
    /// Scans row-major from row 0, so the header row takes part in the search.
    pub fn find_value(&self, value: &str) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(row, cells)| {
            cells
                .iter()
                .position(|cell| cell == value)
                .map(|column| (row, column))
        })
    }

    /// First data row whose cell in `column` equals `value`
    pub fn find_in_column(&self, column: usize, value: &str) -> Option<usize> {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, cells)| cells.get(column).is_some_and(|cell| cell == value))
            .map(|(row, _)| row)
    }

    /// Cell under `header` in row `row`
    pub fn value(&self, header: &str, row: usize) -> Option<&str> {
        let column = self.header_index(header)?;
        self.rows.get(row)?.get(column).map(String::as_str)
    }
}
