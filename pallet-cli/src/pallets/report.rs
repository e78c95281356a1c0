//! Report rows: the final mapping laid over the template's reference rows

use serde::Serialize;

use super::types::{Code, Quantity, QuantityMap, ReferenceSheet};

/// One line of the generated report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub label: String,
    pub code: Code,
    pub quantity: Quantity,
}

/// One row per reference row, in template order
///
/// Codes the operator never mentioned are reported as zero, not omitted.
pub fn report_rows(reference: &ReferenceSheet, final_map: &QuantityMap) -> Vec<ReportRow> {
    reference
        .rows()
        .iter()
        .map(|r| ReportRow {
            label: r.label.clone(),
            code: r.code,
            quantity: final_map.get_or_zero(&r.code),
        })
        .collect()
}

/// Sum of all report quantities
pub fn total(rows: &[ReportRow]) -> u64 {
    rows.iter().map(|r| u64::from(r.quantity)).sum()
}

/// Date as written into file names: `DD/MM/YYYY` becomes `DD-MM-YYYY`
pub fn file_stem(prefix: &str, date_str: &str) -> String {
    format!("{}_{}", prefix, date_str.replace('/', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pallets::types::ReferenceRow;

    fn code(s: &str) -> Code {
        Code::parse(s).unwrap()
    }

    #[test]
    fn test_absent_codes_default_to_zero() {
        let reference = ReferenceSheet::new(vec![
            ReferenceRow { row: 2, code: code("S21"), label: "Unit A".into() },
            ReferenceRow { row: 3, code: code("S22"), label: "Unit A".into() },
            ReferenceRow { row: 4, code: code("S31"), label: "Unit B".into() },
        ]);
        let final_map = QuantityMap::from([(code("S21"), 6), (code("S31"), 9)]);

        let rows = report_rows(&reference, &final_map);

        let summary: Vec<_> = rows.iter().map(|r| (r.code.to_string(), r.quantity)).collect();
        assert_eq!(
            summary,
            vec![("S21".to_string(), 6), ("S22".to_string(), 0), ("S31".to_string(), 9)]
        );
        assert_eq!(rows[2].label, "Unit B");
        assert_eq!(total(&rows), 15);
    }

    #[test]
    fn test_file_stem_replaces_slashes() {
        assert_eq!(
            file_stem("CONTROLE_DE_PALETES", "16/10/2026"),
            "CONTROLE_DE_PALETES_16-10-2026"
        );
    }
}
