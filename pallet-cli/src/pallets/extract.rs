//! Pallet count extraction from free-form operator text
//!
//! Operators type (or dictate) counts like `S21 - 6, S31 - 9` or `s21,4 s22 10`.
//! Every occurrence of a location code is reported, together with the
//! quantity that follows it when one could be read.

use std::fmt;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{Code, Quantity, QuantityMap};

/// `S` + two digits, optional whitespace around an optional `-` or `,`, then
/// the quantity digits. The quantity group is optional so that codes without
/// a numeral still show up as diagnostics instead of vanishing.
static CODE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(S[0-9]{2})\s*(?:[-,])?\s*([0-9]+)?")
        .expect("valid extraction pattern")
});

/// Why a code occurrence produced no quantity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The code was not followed by a numeral
    MissingQuantity,
    /// The numeral does not fit a pallet count
    QuantityOutOfRange { digits: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingQuantity => write!(f, "no quantity after code"),
            Diagnostic::QuantityOutOfRange { digits } => {
                write!(f, "quantity '{}' is too large", digits)
            }
        }
    }
}

/// One code occurrence found in the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub code: Code,
    pub quantity: Option<Quantity>,
    pub diagnostic: Option<Diagnostic>,
    /// Byte range of the matched text
    pub span: Range<usize>,
}

impl Extraction {
    pub fn is_usable(&self) -> bool {
        self.quantity.is_some()
    }

    /// The text this occurrence was read from, without trailing separators
    pub fn matched<'a>(&self, text: &'a str) -> &'a str {
        text.get(self.span.clone())
            .unwrap_or_default()
            .trim_end_matches(|c: char| c.is_whitespace() || c == '-' || c == ',')
    }
}

/// Scan text for every code occurrence, in order
pub fn scan(text: &str) -> Vec<Extraction> {
    let mut found = Vec::new();

    for caps in CODE_PATTERN.captures_iter(text) {
        let (Some(whole), Some(code_match)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        let code = match Code::parse(code_match.as_str()) {
            Ok(code) => code,
            Err(e) => {
                log::debug!("Pattern matched a non-code '{}': {}", code_match.as_str(), e);
                continue;
            }
        };

        let (quantity, diagnostic) = match caps.get(2) {
            Some(digits) => match digits.as_str().parse::<Quantity>() {
                Ok(qty) => (Some(qty), None),
                Err(_) => (
                    None,
                    Some(Diagnostic::QuantityOutOfRange {
                        digits: digits.as_str().to_string(),
                    }),
                ),
            },
            None => (None, Some(Diagnostic::MissingQuantity)),
        };

        match &diagnostic {
            Some(d) => log::debug!("Skipping {} at {:?}: {}", code, whole.range(), d),
            None => log::debug!("Parsed {} -> {:?}", code, quantity),
        }

        found.push(Extraction {
            code,
            quantity,
            diagnostic,
            span: whole.range(),
        });
    }

    found
}

/// Fold scanned occurrences into the code → quantity mapping
///
/// Occurrences without a readable quantity are dropped. When a code appears
/// more than once, the last quantity wins. Text without any code yields an
/// empty mapping.
pub fn extract(extractions: &[Extraction]) -> QuantityMap {
    let map: QuantityMap = extractions
        .iter()
        .filter_map(|e| e.quantity.map(|qty| (e.code, qty)))
        .collect();

    log::info!(
        "Extracted {} codes from {} occurrences",
        map.len(),
        extractions.len()
    );
    map
}

/// Occurrences that were skipped by `extract`
pub fn skipped(extractions: &[Extraction]) -> impl Iterator<Item = &Extraction> {
    extractions.iter().filter(|e| !e.is_usable())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> Code {
        Code::parse(s).unwrap()
    }

    fn extract_text(text: &str) -> QuantityMap {
        extract(&scan(text))
    }

    #[test]
    fn test_basic_pairs() {
        let map = extract_text("S21 - 6, S31 - 9");
        assert_eq!(map, QuantityMap::from([(code("S21"), 6), (code("S31"), 9)]));
    }

    #[test]
    fn test_malformed_quantity_is_omitted() {
        let map = extract_text("S21 - 6, S99 - abc");
        assert_eq!(map, QuantityMap::from([(code("S21"), 6)]));
    }

    #[test]
    fn test_last_occurrence_wins() {
        assert_eq!(extract_text("S21-3 S21-7"), QuantityMap::from([(code("S21"), 7)]));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(extract_text("s21-4"), QuantityMap::from([(code("S21"), 4)]));
    }

    #[test]
    fn test_separator_variants() {
        let expected = QuantityMap::from([(code("S31"), 9)]);
        for text in ["S31,9", "S31 - 9", "S31 9", "S31-9", "S31 , 9", "S319"] {
            assert_eq!(extract_text(text), expected, "input: {:?}", text);
        }
    }

    #[test]
    fn test_no_matches_is_empty() {
        assert!(extract_text("").is_empty());
        assert!(extract_text("nothing to see here, 42 pallets").is_empty());
    }

    #[test]
    fn test_zero_is_a_valid_quantity() {
        assert_eq!(extract_text("S05 0"), QuantityMap::from([(code("S05"), 0)]));
    }

    #[test]
    fn test_free_prose_around_codes() {
        let text = "Today: S21 has 6? no wait, S21 - 8. Also s40,12\nS41 3";
        let map = extract_text(text);
        assert_eq!(map.get(&code("S21")), Some(8));
        assert_eq!(map.get(&code("S40")), Some(12));
        assert_eq!(map.get(&code("S41")), Some(3));
        // "S21 has 6" is not a pair: words between code and number
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_scan_reports_diagnostics() {
        let found = scan("S21 - 6, S99 - abc, S40 99999999999");
        assert_eq!(found.len(), 3);

        assert_eq!(found[0].quantity, Some(6));
        assert_eq!(found[0].diagnostic, None);

        assert_eq!(found[1].code, code("S99"));
        assert_eq!(found[1].diagnostic, Some(Diagnostic::MissingQuantity));

        assert_eq!(
            found[2].diagnostic,
            Some(Diagnostic::QuantityOutOfRange {
                digits: "99999999999".to_string()
            })
        );

        let skipped: Vec<_> = skipped(&found).map(|e| e.code.to_string()).collect();
        assert_eq!(skipped, vec!["S99", "S40"]);
    }

    #[test]
    fn test_span_covers_matched_text() {
        let text = "x S21 - 6 y";
        let found = scan(text);
        assert_eq!(&text[found[0].span.clone()], "S21 - 6");
    }

    #[test]
    fn test_matched_text_of_skipped_code() {
        let text = "S21 - 6, S99 - abc";
        let found = scan(text);
        assert_eq!(found[0].matched(text), "S21 - 6");
        assert_eq!(found[1].matched(text), "S99");
        assert_eq!(found[1].matched("short"), "");
    }

    #[test]
    fn test_skipped_occurrence_does_not_reset_quantity() {
        let found = scan("S21 - 6, S99 - abc, S21 8 s31,2, S21 x");
        assert_eq!(skipped(&found).count(), 2);
        assert_eq!(
            extract(&found),
            QuantityMap::from([(code("S21"), 8), (code("S31"), 2)])
        );
    }

    #[test]
    fn test_code_without_quantity_does_not_swallow_next_pair() {
        let map = extract_text("S21, S31 5");
        assert_eq!(map, QuantityMap::from([(code("S31"), 5)]));
    }
}
