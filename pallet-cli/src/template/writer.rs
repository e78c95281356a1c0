//! Write the filled copy of the template

use anyhow::{Context, Result};
use calamine::Data;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::pallets::ReportRow;

use super::layout::TemplateLayout;
use super::reader::{SheetData, Template};

const DATE_NUM_FORMAT: &str = "dd/mm/yyyy";
const DURATION_NUM_FORMAT: &str = "[h]:mm:ss";

/// Copy the template and fill in the date cell and quantity column
///
/// Every sheet is copied with its values, formulas and date cells; only the
/// configured sheet is filled in. `rows` must come from the same template's
/// reference rows, in order. Other cell styles are not carried over.
pub fn fill_template(
    template: &Template,
    layout: &TemplateLayout,
    date_str: &str,
    rows: &[ReportRow],
) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    for sheet in &template.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        copy_sheet(worksheet, sheet)
            .with_context(|| format!("Failed to copy template sheet '{}'", sheet.name))?;

        if sheet.name != template.sheet_name {
            continue;
        }

        let (date_row, date_col) = layout.date_cell;
        worksheet.write_string(date_row, date_col, date_str)?;

        for (reference, report) in template.reference.rows().iter().zip(rows) {
            debug_assert_eq!(reference.code, report.code);
            worksheet.write_number(reference.row, layout.quantity_column, f64::from(report.quantity))?;
        }
    }

    let bytes = workbook
        .save_to_buffer()
        .context("Failed to build filled spreadsheet")?;

    log::info!(
        "Filled sheet '{}' of {} with {} rows ({} bytes)",
        template.sheet_name,
        template.sheets.len(),
        rows.len(),
        bytes.len()
    );

    Ok(bytes)
}

fn copy_sheet(ws: &mut Worksheet, sheet: &SheetData) -> Result<()> {
    for (&(row, col), value) in &sheet.cells {
        if sheet.formulas.contains_key(&(row, col)) {
            continue;
        }
        write_cell(ws, row, col, value)
            .with_context(|| format!("Failed to copy cell ({}, {})", row + 1, col + 1))?;
    }

    for (&(row, col), formula) in &sheet.formulas {
        ws.write_formula(row, col, formula.as_str())
            .with_context(|| format!("Failed to copy formula at ({}, {})", row + 1, col + 1))?;
    }

    Ok(())
}

fn write_cell(ws: &mut Worksheet, row: u32, col: u16, value: &Data) -> Result<()> {
    match value {
        Data::String(s) => {
            ws.write_string(row, col, s)?;
        }
        Data::Float(f) => {
            ws.write_number(row, col, *f)?;
        }
        Data::Int(i) => {
            ws.write_number(row, col, *i as f64)?;
        }
        Data::Bool(b) => {
            ws.write_boolean(row, col, *b)?;
        }
        Data::DateTime(dt) => {
            let num_format = if dt.is_duration() {
                DURATION_NUM_FORMAT
            } else {
                DATE_NUM_FORMAT
            };
            let format = Format::new().set_num_format(num_format);
            ws.write_number_with_format(row, col, dt.as_f64(), &format)?;
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => {
            ws.write_string(row, col, s)?;
        }
        Data::Error(e) => {
            log::debug!("Skipping error cell ({}, {}): {:?}", row + 1, col + 1, e);
        }
        _ => {}
    }
    Ok(())
}
