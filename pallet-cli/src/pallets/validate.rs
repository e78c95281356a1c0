//! Validation of extracted codes against the reference code list

use std::collections::HashSet;

use super::types::{Code, QuantityMap};

/// Keep only the candidates whose code is in the reference list
///
/// Order of `reference` does not matter for filtering. An empty result means
/// nothing valid was found; callers decide how to report that.
pub fn validate<'a>(
    candidates: &QuantityMap,
    reference: impl IntoIterator<Item = &'a Code>,
) -> QuantityMap {
    let known: HashSet<&Code> = reference.into_iter().collect();

    let valid: QuantityMap = candidates
        .iter()
        .filter(|(code, _)| known.contains(code))
        .map(|(code, qty)| (*code, qty))
        .collect();

    log::debug!(
        "Validated {} of {} candidate codes against {} reference codes",
        valid.len(),
        candidates.len(),
        known.len()
    );

    valid
}

/// Candidate codes that are not in the reference list
pub fn rejected<'a>(
    candidates: &QuantityMap,
    reference: impl IntoIterator<Item = &'a Code>,
) -> Vec<Code> {
    let known: HashSet<&Code> = reference.into_iter().collect();

    candidates
        .codes()
        .filter(|code| !known.contains(code))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> Code {
        Code::parse(s).unwrap()
    }

    #[test]
    fn test_filters_unknown_codes() {
        let candidates = QuantityMap::from([(code("S21"), 5), (code("S99"), 2)]);
        let reference = [code("S21"), code("S31")];

        let valid = validate(&candidates, &reference);

        assert_eq!(valid, QuantityMap::from([(code("S21"), 5)]));
        assert!(!valid.contains(&code("S31")));
        assert_eq!(rejected(&candidates, &reference), vec![code("S99")]);
    }

    #[test]
    fn test_idempotent() {
        let candidates = QuantityMap::from([(code("S21"), 5), (code("S99"), 2), (code("S31"), 0)]);
        let reference = [code("S31"), code("S21")];

        let once = validate(&candidates, &reference);
        let twice = validate(&once, &reference);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_overlap_is_empty() {
        let candidates = QuantityMap::from([(code("S99"), 2)]);
        assert!(validate(&candidates, &[code("S21")]).is_empty());
        assert!(validate(&QuantityMap::new(), &[code("S21")]).is_empty());
    }

    #[test]
    fn test_inputs_are_untouched() {
        let candidates = QuantityMap::from([(code("S21"), 5), (code("S99"), 2)]);
        let before = candidates.clone();
        let _ = validate(&candidates, &[code("S21")]);
        assert_eq!(candidates, before);
    }
}
