//! Code → quantity mapping shared by every pipeline stage

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Code;

/// Pallet count for a location
pub type Quantity = u32;

/// Mapping from location code to pallet count
///
/// Keys are unique. Inserting a code that is already present replaces its
/// quantity, so folding a sequence of pairs keeps the last one per code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuantityMap {
    entries: BTreeMap<Code, Quantity>,
}

impl QuantityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the quantity for a code, returning the replaced value if any
    pub fn insert(&mut self, code: Code, quantity: Quantity) -> Option<Quantity> {
        self.entries.insert(code, quantity)
    }

    pub fn get(&self, code: &Code) -> Option<Quantity> {
        self.entries.get(code).copied()
    }

    /// Quantity for a code, zero when the code was never mentioned
    pub fn get_or_zero(&self, code: &Code) -> Quantity {
        self.get(code).unwrap_or(0)
    }

    pub fn contains(&self, code: &Code) -> bool {
        self.entries.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn codes(&self) -> impl Iterator<Item = &Code> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Code, Quantity)> {
        self.entries.iter().map(|(code, qty)| (code, *qty))
    }

    /// Total pallets across all codes
    pub fn total(&self) -> u64 {
        self.entries.values().map(|q| u64::from(*q)).sum()
    }

    /// Entries rendered in the given order; codes not in the mapping are skipped
    pub fn ordered_by<'a>(&self, order: impl IntoIterator<Item = &'a Code>) -> Vec<(Code, Quantity)> {
        order
            .into_iter()
            .filter_map(|code| self.get(code).map(|qty| (*code, qty)))
            .collect()
    }
}

impl FromIterator<(Code, Quantity)> for QuantityMap {
    fn from_iter<I: IntoIterator<Item = (Code, Quantity)>>(iter: I) -> Self {
        let mut map = QuantityMap::new();
        for (code, qty) in iter {
            map.insert(code, qty);
        }
        map
    }
}

impl<const N: usize> From<[(Code, Quantity); N]> for QuantityMap {
    fn from(pairs: [(Code, Quantity); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> Code {
        Code::parse(s).unwrap()
    }

    #[test]
    fn test_collect_keeps_last_quantity() {
        let map: QuantityMap = vec![(code("S21"), 3), (code("S31"), 1), (code("S21"), 7)]
            .into_iter()
            .collect();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&code("S21")), Some(7));
        assert_eq!(map.total(), 8);
    }

    #[test]
    fn test_ordered_by_follows_given_order() {
        let map = QuantityMap::from([(code("S21"), 6), (code("S31"), 9)]);
        let order = [code("S31"), code("S22"), code("S21")];

        assert_eq!(map.ordered_by(&order), vec![(code("S31"), 9), (code("S21"), 6)]);
        assert_eq!(map.get_or_zero(&code("S22")), 0);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let map = QuantityMap::from([(code("S31"), 9), (code("S21"), 6)]);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"S21":6,"S31":9}"#);
    }
}
