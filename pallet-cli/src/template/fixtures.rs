//! In-memory templates for tests

use rust_xlsxwriter::{Format, Workbook};

/// Serial number of 16/10/2026 in the 1900 date system
pub const SAMPLE_DATE_SERIAL: f64 = 46311.0;

/// Template shaped like the warehouse sheet: title + date in row 1,
/// headers in row 2, units/codes from row 3, a SUM total in row 7 and a
/// second sheet with notes
pub fn sample_template_bytes() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.set_name("Paletes").unwrap();
    ws.write_string(0, 0, "CONTROLE DE PALETES").unwrap();
    ws.write_string(0, 1, "Data:").unwrap();
    ws.write_string(1, 0, "Unidade").unwrap();
    ws.write_string(1, 1, "Código").unwrap();
    ws.write_string(1, 2, "Quantidade").unwrap();
    ws.write_string(2, 0, "Câmara 1").unwrap();
    ws.write_string(2, 1, "S21").unwrap();
    ws.write_string(3, 0, "Câmara 1").unwrap();
    ws.write_string(3, 1, "s22 ").unwrap();
    ws.write_string(4, 0, "Câmara 2").unwrap();
    ws.write_string(4, 1, "S31").unwrap();
    ws.write_number(4, 3, 12.5).unwrap();
    ws.write_string(5, 0, "Observações").unwrap();
    ws.write_string(5, 1, "ver anexo").unwrap();
    ws.write_string(6, 0, "Total").unwrap();
    ws.write_formula(6, 2, "=SUM(C3:C5)").unwrap();
    let date_format = Format::new().set_num_format("dd/mm/yyyy");
    ws.write_number_with_format(1, 4, SAMPLE_DATE_SERIAL, &date_format)
        .unwrap();

    let notes = workbook.add_worksheet();
    notes.set_name("Notas").unwrap();
    notes.write_string(0, 0, "Contar paletes vazios separadamente").unwrap();
    workbook.save_to_buffer().unwrap()
}
