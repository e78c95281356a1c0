//! Pallet count pipeline
//!
//! Operator text is scanned for location codes, checked against the template's
//! reference rows, reviewed, and folded into the final mapping that feeds the
//! spreadsheet and PDF outputs.

pub mod extract;
pub mod report;
pub mod resolve;
pub mod session;
pub mod types;
pub mod validate;

pub use extract::{Diagnostic, Extraction, extract, scan};
pub use report::{ReportRow, report_rows};
pub use resolve::{DuplicatePolicy, ReviewError, resolve};
pub use session::{ConfirmedSubmission, PipelineError, Submission, format_date, parse_date};
pub use types::*;
pub use validate::validate;
