//! PDF summary report: unit, code and quantity per reference row

use anyhow::{Context, Result};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};

use crate::pallets::{ReportRow, report};

/// A4 portrait, in points
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: f32 = 50.0;
const LINE_HEIGHT: f32 = 18.0;
const ROWS_PER_PAGE: usize = 38;

/// Column x positions
const UNIT_X: f32 = MARGIN;
const CODE_X: f32 = 330.0;
const QTY_X: f32 = 450.0;

/// Render the report rows as a paginated PDF
pub fn render_pdf(title: &str, date_str: &str, rows: &[ReportRow]) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
            "F2" => bold_id,
        },
    });

    let chunks: Vec<&[ReportRow]> = if rows.is_empty() {
        vec![rows]
    } else {
        rows.chunks(ROWS_PER_PAGE).collect()
    };
    let page_count = chunks.len();

    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(page_count);
    for (idx, chunk) in chunks.iter().enumerate() {
        let is_last = idx + 1 == page_count;
        let operations = page_operations(
            title,
            date_str,
            chunk,
            idx + 1,
            page_count,
            is_last.then(|| report::total(rows)),
        );

        let content = Content { operations };
        let encoded = content
            .encode()
            .with_context(|| format!("Failed to encode PDF page {}", idx + 1))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.iter().map(|id| Object::from(*id)).collect::<Vec<_>>(),
        "Count" => page_count as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0_i64.into(), 0_i64.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).context("Failed to write PDF report")?;

    log::info!("Rendered PDF report: {} rows on {} pages", rows.len(), page_count);
    Ok(bytes)
}

fn page_operations(
    title: &str,
    date_str: &str,
    rows: &[ReportRow],
    page: usize,
    page_count: usize,
    total: Option<u64>,
) -> Vec<Operation> {
    let mut ops = Vec::new();
    let top = PAGE_HEIGHT as f32 - MARGIN;

    text(&mut ops, "F2", 16.0, MARGIN, top, title);
    text(&mut ops, "F1", 11.0, MARGIN, top - 22.0, &format!("Data: {}", date_str));

    let header_y = top - 56.0;
    text(&mut ops, "F2", 11.0, UNIT_X, header_y, "Unidade");
    text(&mut ops, "F2", 11.0, CODE_X, header_y, "Código");
    text(&mut ops, "F2", 11.0, QTY_X, header_y, "Quantidade");
    rule(&mut ops, header_y - 5.0);

    let mut y = header_y - LINE_HEIGHT - 4.0;
    for row in rows {
        text(&mut ops, "F1", 10.0, UNIT_X, y, &row.label);
        text(&mut ops, "F1", 10.0, CODE_X, y, row.code.as_str());
        text(&mut ops, "F1", 10.0, QTY_X, y, &row.quantity.to_string());
        y -= LINE_HEIGHT;
    }

    if let Some(total) = total {
        rule(&mut ops, y + LINE_HEIGHT - 5.0);
        text(&mut ops, "F2", 10.0, UNIT_X, y - 4.0, "Total");
        text(&mut ops, "F2", 10.0, QTY_X, y - 4.0, &total.to_string());
    }

    text(
        &mut ops,
        "F1",
        9.0,
        PAGE_WIDTH as f32 - MARGIN - 60.0,
        MARGIN / 2.0,
        &format!("Página {}/{}", page, page_count),
    );

    ops
}

fn text(ops: &mut Vec<Operation>, font: &str, size: f32, x: f32, y: f32, value: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(win_ansi(value), StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn rule(ops: &mut Vec<Operation>, y: f32) {
    ops.push(Operation::new("w", vec![0.5_f32.into()]));
    ops.push(Operation::new("m", vec![MARGIN.into(), y.into()]));
    ops.push(Operation::new(
        "l",
        vec![(PAGE_WIDTH as f32 - MARGIN).into(), y.into()],
    ));
    ops.push(Operation::new("S", vec![]));
}

/// Latin-1 subset of WinAnsi; anything else becomes '?'
fn win_ansi(value: &str) -> Vec<u8> {
    value
        .chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pallets::Code;

    fn rows(n: usize) -> Vec<ReportRow> {
        (0..n)
            .map(|i| ReportRow {
                label: format!("Câmara {}", i / 10 + 1),
                code: Code::parse(&format!("S{:02}", i % 100)).unwrap(),
                quantity: i as u32,
            })
            .collect()
    }

    #[test]
    fn test_single_page_report() {
        let bytes = render_pdf("Controle de Paletes", "16/10/2026", &rows(3)).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_long_report_paginates() {
        let bytes = render_pdf("Controle de Paletes", "16/10/2026", &rows(ROWS_PER_PAGE * 2 + 1)).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(win_ansi("Câmara"), vec![b'C', 0xE2, b'm', b'a', b'r', b'a']);
        assert_eq!(win_ansi("S21 → 6"), b"S21 ? 6".to_vec());
    }
}
