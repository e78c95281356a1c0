//! Reference rows loaded from the spreadsheet template

use serde::Serialize;

use super::Code;

/// One coded row of the template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceRow {
    /// Zero-based sheet row the code was read from
    pub row: u32,
    pub code: Code,
    /// Descriptive label next to the code (e.g. the unit name)
    pub label: String,
}

/// Ordered list of legitimate codes with their labels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceSheet {
    rows: Vec<ReferenceRow>,
}

impl ReferenceSheet {
    pub fn new(rows: Vec<ReferenceRow>) -> Self {
        Self { rows }
    }

    /// Build from bare codes, numbering rows from zero and leaving labels empty
    #[cfg(test)]
    pub fn from_codes(codes: impl IntoIterator<Item = Code>) -> Self {
        let rows = codes
            .into_iter()
            .enumerate()
            .map(|(idx, code)| ReferenceRow {
                row: idx as u32,
                code,
                label: String::new(),
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[ReferenceRow] {
        &self.rows
    }

    pub fn codes(&self) -> impl Iterator<Item = &Code> {
        self.rows.iter().map(|r| &r.code)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
