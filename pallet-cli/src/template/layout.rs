//! Where things live in the reference template

use std::fmt;

/// Error when parsing an `A1`-style cell or column reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellRefError {
    Empty,
    /// Column part is missing or not letters
    BadColumn { input: String },
    /// Row part is missing, zero, or not a number
    BadRow { input: String },
}

impl fmt::Display for CellRefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellRefError::Empty => write!(f, "cell reference cannot be empty"),
            CellRefError::BadColumn { input } => {
                write!(f, "'{}' is not a valid column (expected letters like 'B')", input)
            }
            CellRefError::BadRow { input } => {
                write!(f, "'{}' has no valid row number (expected e.g. 'C1')", input)
            }
        }
    }
}

impl std::error::Error for CellRefError {}

/// Parse a column name ("A", "B", ..., "AA") into a zero-based index
pub fn parse_column(input: &str) -> Result<u16, CellRefError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CellRefError::Empty);
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphabetic()) || trimmed.len() > 3 {
        return Err(CellRefError::BadColumn {
            input: trimmed.to_string(),
        });
    }

    let mut index: u32 = 0;
    for c in trimmed.chars() {
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as u32 + 1;
        index = index * 26 + digit;
    }

    // XFD is the last Excel column
    if index > 16_384 {
        return Err(CellRefError::BadColumn {
            input: trimmed.to_string(),
        });
    }

    Ok((index - 1) as u16)
}

/// Parse an `A1` reference into zero-based (row, column)
pub fn parse_cell(input: &str) -> Result<(u32, u16), CellRefError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CellRefError::Empty);
    }

    let split = trimmed
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| CellRefError::BadRow {
            input: trimmed.to_string(),
        })?;
    let (col_part, row_part) = trimmed.split_at(split);

    let col = parse_column(col_part)?;
    let row: u32 = row_part.parse().map_err(|_| CellRefError::BadRow {
        input: trimmed.to_string(),
    })?;
    if row == 0 {
        return Err(CellRefError::BadRow {
            input: trimmed.to_string(),
        });
    }

    Ok((row - 1, col))
}

/// Column positions (zero-based) of the reference template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLayout {
    /// Sheet to read; the first sheet when `None`
    pub sheet: Option<String>,
    pub label_column: u16,
    pub code_column: u16,
    pub quantity_column: u16,
    /// First data row (zero-based)
    pub first_row: u32,
    /// Cell holding the report date (zero-based row, column)
    pub date_cell: (u32, u16),
}

impl Default for TemplateLayout {
    /// Label in A, code in B, quantity in C, data from row 3, date in C1
    fn default() -> Self {
        Self {
            sheet: None,
            label_column: 0,
            code_column: 1,
            quantity_column: 2,
            first_row: 2,
            date_cell: (0, 2),
        }
    }
}
