//! Read the reference template

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use calamine::{Data, Reader, Xlsx};

use crate::pallets::{Code, ReferenceRow, ReferenceSheet};

use super::layout::TemplateLayout;

/// The reference template could not be used
///
/// Always a deployment or configuration problem, never bad operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Template file does not exist
    Missing { path: String },
    /// Template exists but is not a readable workbook
    Unreadable { path: String, reason: String },
    /// Requested sheet is absent, or the workbook has no sheets
    NoSheet { path: String, sheet: Option<String> },
    /// Sheet has no coded rows below the first data row
    NoReferenceRows { path: String },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::Missing { path } => {
                write!(f, "reference template not found: {}", path)
            }
            TemplateError::Unreadable { path, reason } => {
                write!(f, "reference template {} could not be read: {}", path, reason)
            }
            TemplateError::NoSheet { path, sheet } => match sheet {
                Some(name) => write!(f, "reference template {} has no sheet '{}'", path, name),
                None => write!(f, "reference template {} has no sheets", path),
            },
            TemplateError::NoReferenceRows { path } => write!(
                f,
                "reference template {} lists no location codes - check the layout configuration",
                path
            ),
        }
    }
}

impl std::error::Error for TemplateError {}

/// Cell contents of one worksheet
#[derive(Debug, Clone, Default)]
pub struct SheetData {
    pub name: String,
    /// Non-empty cells keyed by zero-based (row, column)
    pub cells: BTreeMap<(u32, u16), Data>,
    /// Formulas (without the leading '=') keyed like `cells`
    pub formulas: BTreeMap<(u32, u16), String>,
}

/// A loaded template: every sheet of the workbook plus the reference rows of
/// the configured sheet
#[derive(Debug, Clone)]
pub struct Template {
    /// Name of the sheet holding the codes, date and quantities
    pub sheet_name: String,
    /// All sheets in workbook order
    pub sheets: Vec<SheetData>,
    pub reference: ReferenceSheet,
}

impl Template {
    /// The sheet holding the codes
    pub fn sheet(&self) -> Option<&SheetData> {
        self.sheets.iter().find(|s| s.name == self.sheet_name)
    }
}

/// Load the template from disk
pub fn load_template(path: &Path, layout: &TemplateLayout) -> Result<Template, TemplateError> {
    let display = path.display().to_string();

    if !path.exists() {
        return Err(TemplateError::Missing { path: display });
    }

    let file = File::open(path).map_err(|e| TemplateError::Unreadable {
        path: display.clone(),
        reason: e.to_string(),
    })?;

    read_template(BufReader::new(file), layout, &display)
}

/// Read a template from any seekable source; `origin` names it in errors
pub fn read_template<RS: Read + Seek>(
    reader: RS,
    layout: &TemplateLayout,
    origin: &str,
) -> Result<Template, TemplateError> {
    let unreadable = |reason: String| TemplateError::Unreadable {
        path: origin.to_string(),
        reason,
    };

    let mut workbook: Xlsx<_> = Xlsx::new(reader).map_err(|e| unreadable(e.to_string()))?;

    let sheet_name = match &layout.sheet {
        Some(name) => workbook
            .sheet_names()
            .into_iter()
            .find(|s| s == name)
            .ok_or_else(|| TemplateError::NoSheet {
                path: origin.to_string(),
                sheet: Some(name.clone()),
            })?,
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| TemplateError::NoSheet {
                path: origin.to_string(),
                sheet: None,
            })?,
    };

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| unreadable(e.to_string()))?;
        let formula_range = workbook
            .worksheet_formula(&name)
            .map_err(|e| unreadable(e.to_string()))?;

        let mut sheet = SheetData {
            name,
            ..SheetData::default()
        };
        if let Some((start_row, start_col)) = range.start() {
            for (r, c, value) in range.used_cells() {
                let row = start_row + r as u32;
                let col = (start_col as usize + c) as u16;
                sheet.cells.insert((row, col), value.clone());
            }
        }
        if let Some((start_row, start_col)) = formula_range.start() {
            for (r, c, formula) in formula_range.used_cells() {
                if formula.is_empty() {
                    continue;
                }
                let row = start_row + r as u32;
                let col = (start_col as usize + c) as u16;
                sheet.formulas.insert((row, col), formula.clone());
            }
        }
        sheets.push(sheet);
    }

    let reference = sheets
        .iter()
        .find(|s| s.name == sheet_name)
        .map(|s| reference_rows(&s.cells, layout))
        .unwrap_or_default();
    if reference.is_empty() {
        return Err(TemplateError::NoReferenceRows {
            path: origin.to_string(),
        });
    }

    log::info!(
        "Loaded template {} ({} sheets, codes on '{}'): {} reference codes",
        origin,
        sheets.len(),
        sheet_name,
        reference.len()
    );

    Ok(Template {
        sheet_name,
        sheets,
        reference,
    })
}

fn reference_rows(cells: &BTreeMap<(u32, u16), Data>, layout: &TemplateLayout) -> ReferenceSheet {
    let mut rows = Vec::new();

    for (&(row, col), value) in cells {
        if col != layout.code_column || row < layout.first_row {
            continue;
        }

        let raw = cell_string(value);
        if raw.trim().is_empty() {
            continue;
        }

        match Code::parse(&raw) {
            Ok(code) => {
                if rows.iter().any(|r: &ReferenceRow| r.code == code) {
                    log::warn!("Template row {}: code {} listed twice, using the first", row + 1, code);
                    continue;
                }
                let label = cells
                    .get(&(row, layout.label_column))
                    .map(cell_string)
                    .unwrap_or_default();
                rows.push(ReferenceRow { row, code, label });
            }
            Err(e) => log::warn!("Template row {}: {}", row + 1, e),
        }
    }

    ReferenceSheet::new(rows)
}

/// Render a cell the way it reads on screen
pub fn cell_string(value: &Data) -> String {
    match value {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // Check if it's a whole number
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::template::fixtures::sample_template_bytes;

    #[test]
    fn test_reads_reference_rows() {
        let template = read_template(
            Cursor::new(sample_template_bytes()),
            &TemplateLayout::default(),
            "memory",
        )
        .unwrap();

        assert_eq!(template.sheet_name, "Paletes");
        let names: Vec<_> = template.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Paletes", "Notas"]);

        let rows = template.reference.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].code.as_str(), "S21");
        assert_eq!(rows[0].row, 2);
        assert_eq!(rows[0].label, "Câmara 1");
        assert_eq!(rows[1].code.as_str(), "S22");
        assert_eq!(rows[2].label, "Câmara 2");
    }

    #[test]
    fn test_reads_formulas_separately_from_values() {
        let template = read_template(
            Cursor::new(sample_template_bytes()),
            &TemplateLayout::default(),
            "memory",
        )
        .unwrap();

        let sheet = template.sheet().unwrap();
        let formula = sheet.formulas.get(&(6, 2)).unwrap();
        assert_eq!(formula.trim_start_matches('='), "SUM(C3:C5)");
        assert!(!sheet.formulas.contains_key(&(2, 1)));
    }

    #[test]
    fn test_codes_are_read_from_the_configured_sheet() {
        let layout = TemplateLayout {
            sheet: Some("Notas".into()),
            ..TemplateLayout::default()
        };
        let err = read_template(Cursor::new(sample_template_bytes()), &layout, "memory").unwrap_err();
        assert!(matches!(err, TemplateError::NoReferenceRows { .. }));
    }

    #[test]
    fn test_header_row_is_not_a_code() {
        let layout = TemplateLayout {
            first_row: 0,
            ..TemplateLayout::default()
        };
        let template = read_template(Cursor::new(sample_template_bytes()), &layout, "memory").unwrap();
        // "Data:" and "Código" are skipped as non-codes
        assert_eq!(template.reference.len(), 3);
    }

    #[test]
    fn test_missing_sheet() {
        let layout = TemplateLayout {
            sheet: Some("Other".into()),
            ..TemplateLayout::default()
        };
        let err = read_template(Cursor::new(sample_template_bytes()), &layout, "memory").unwrap_err();
        assert_eq!(
            err,
            TemplateError::NoSheet {
                path: "memory".into(),
                sheet: Some("Other".into())
            }
        );
    }

    #[test]
    fn test_wrong_code_column_has_no_rows() {
        let layout = TemplateLayout {
            code_column: 3,
            ..TemplateLayout::default()
        };
        let err = read_template(Cursor::new(sample_template_bytes()), &layout, "memory").unwrap_err();
        assert!(matches!(err, TemplateError::NoReferenceRows { .. }));
    }

    #[test]
    fn test_garbage_bytes_are_unreadable() {
        let err = read_template(
            Cursor::new(b"not a workbook".to_vec()),
            &TemplateLayout::default(),
            "memory",
        )
        .unwrap_err();
        assert!(matches!(err, TemplateError::Unreadable { .. }));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planilha_base.xlsx");
        let err = load_template(&path, &TemplateLayout::default()).unwrap_err();
        assert!(matches!(err, TemplateError::Missing { .. }));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planilha_base.xlsx");
        std::fs::write(&path, sample_template_bytes()).unwrap();

        let template = load_template(&path, &TemplateLayout::default()).unwrap();
        assert_eq!(template.reference.len(), 3);
    }
}
