//! Per-submission state between "interpret" and "confirm"
//!
//! A [`Submission`] is created by interpreting operator text against the
//! reference rows. Confirming it consumes the value, so one interpretation
//! can only ever produce one report. Starting over means interpreting again.

use std::fmt;

use chrono::NaiveDate;

use super::extract::{self, Extraction};
use super::report::{self, ReportRow};
use super::resolve::{self, DuplicatePolicy, ReviewError};
use super::types::{Code, Quantity, QuantityMap, ReferenceSheet};
use super::validate;

/// Date format used in reports and on the command line
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse a `DD/MM/YYYY` date
pub fn parse_date(input: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Recoverable pipeline failures; the operator fixes the input and retries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// No extracted code is in the reference list
    NoValidCodesFound {
        /// Codes that were read but are not in the template
        unknown: Vec<Code>,
        /// Code occurrences without a usable quantity
        skipped: usize,
    },
    /// Reviewed rows do not match the interpreted rows
    Review(ReviewError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::NoValidCodesFound { unknown, skipped } => {
                write!(f, "no valid codes found")?;
                if !unknown.is_empty() {
                    let list: Vec<_> = unknown.iter().map(|c| c.to_string()).collect();
                    write!(f, " (not in template: {})", list.join(", "))?;
                }
                if *skipped > 0 {
                    write!(f, " ({} codes without a quantity)", skipped)?;
                }
                Ok(())
            }
            PipelineError::Review(e) => write!(f, "review rejected: {}", e),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Review(e) => Some(e),
            PipelineError::NoValidCodesFound { .. } => None,
        }
    }
}

impl From<ReviewError> for PipelineError {
    fn from(e: ReviewError) -> Self {
        PipelineError::Review(e)
    }
}

/// An interpreted submission awaiting review
#[derive(Debug, Clone)]
pub struct Submission {
    date: NaiveDate,
    valid: QuantityMap,
    review_order: Vec<Code>,
    extractions: Vec<Extraction>,
    rejected: Vec<Code>,
}

impl Submission {
    /// Extract and validate operator text against the reference rows
    pub fn interpret(
        text: &str,
        reference: &ReferenceSheet,
        date: NaiveDate,
    ) -> Result<Self, PipelineError> {
        let extractions = extract::scan(text);
        let candidates = extract::extract(&extractions);
        let valid = validate::validate(&candidates, reference.codes());
        let rejected = validate::rejected(&candidates, reference.codes());

        if valid.is_empty() {
            log::warn!("No valid codes in submission text");
            return Err(PipelineError::NoValidCodesFound {
                unknown: rejected,
                skipped: extract::skipped(&extractions).count(),
            });
        }

        let review_order = valid
            .ordered_by(reference.codes())
            .into_iter()
            .map(|(code, _)| code)
            .collect();

        log::info!(
            "Interpreted submission for {}: {} valid, {} not in template",
            format_date(date),
            valid.len(),
            rejected.len()
        );

        Ok(Self {
            date,
            valid,
            review_order,
            extractions,
            rejected,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn valid(&self) -> &QuantityMap {
        &self.valid
    }

    /// Rows offered for review, in template order
    pub fn review_rows(&self) -> Vec<(Code, Quantity)> {
        self.valid.ordered_by(&self.review_order)
    }

    /// Code occurrences dropped for lack of a usable quantity
    pub fn skipped(&self) -> impl Iterator<Item = &Extraction> {
        extract::skipped(&self.extractions)
    }

    /// Codes read from the text but missing from the template
    pub fn rejected(&self) -> &[Code] {
        &self.rejected
    }

    /// Apply the reviewed rows and close the submission
    pub fn confirm(
        self,
        edited_rows: &[(Code, Quantity)],
        policy: DuplicatePolicy,
    ) -> Result<ConfirmedSubmission, PipelineError> {
        let final_map = resolve::resolve(&self.valid, edited_rows, policy)?;
        Ok(ConfirmedSubmission {
            date: self.date,
            final_map,
        })
    }
}

/// Final mapping ready for the report assembler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedSubmission {
    pub date: NaiveDate,
    pub final_map: QuantityMap,
}

impl ConfirmedSubmission {
    pub fn date_string(&self) -> String {
        format_date(self.date)
    }

    pub fn report_rows(&self, reference: &ReferenceSheet) -> Vec<ReportRow> {
        report::report_rows(reference, &self.final_map)
    }
}
