//! Folding reviewed rows back into the final mapping

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::{Code, Quantity, QuantityMap};

/// How to treat a code that appears in more than one reviewed row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The last row for a code wins (default)
    #[default]
    LastWriteWins,
    /// Any repeated code fails the review
    Reject,
}

/// Error when reviewed rows do not line up with the validated mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    /// The same code appears in more than one row
    DuplicateCode { code: Code },
    /// A row carries a code that was not in the validated mapping
    UnexpectedCode { code: Code },
    /// A validated code has no row
    MissingCode { code: Code },
}

impl fmt::Display for ReviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewError::DuplicateCode { code } => {
                write!(f, "code {} appears more than once in the review", code)
            }
            ReviewError::UnexpectedCode { code } => write!(
                f,
                "code {} was not part of the interpreted rows - rows cannot be added during review",
                code
            ),
            ReviewError::MissingCode { code } => write!(
                f,
                "code {} is missing from the review - rows cannot be removed during review",
                code
            ),
        }
    }
}

impl std::error::Error for ReviewError {}

/// Build the final mapping from the reviewed rows
///
/// The reviewed rows may change quantities but must cover exactly the codes
/// of `validated`.
pub fn resolve(
    validated: &QuantityMap,
    edited_rows: &[(Code, Quantity)],
    policy: DuplicatePolicy,
) -> Result<QuantityMap, ReviewError> {
    let mut final_map = QuantityMap::new();
    let mut seen = HashSet::new();

    for (code, qty) in edited_rows {
        if !validated.contains(code) {
            return Err(ReviewError::UnexpectedCode { code: *code });
        }

        if !seen.insert(*code) && policy == DuplicatePolicy::Reject {
            return Err(ReviewError::DuplicateCode { code: *code });
        }

        if let Some(previous) = final_map.insert(*code, *qty) {
            log::warn!("Code {} reviewed twice, {} replaced by {}", code, previous, qty);
        }
    }

    if let Some(code) = validated.codes().find(|c| !final_map.contains(c)) {
        return Err(ReviewError::MissingCode { code: *code });
    }

    for (code, qty) in final_map.iter() {
        let before = validated.get_or_zero(code);
        if before != qty {
            log::info!("Review changed {}: {} -> {}", code, before, qty);
        }
    }

    Ok(final_map)
}
