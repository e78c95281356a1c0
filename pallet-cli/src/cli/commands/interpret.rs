//! Interpret command: extract and validate, show the result, write nothing

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use colored::*;
use serde::Serialize;

use crate::cli::{TextInput, date_arg, load_reference, review, today};
use crate::config::Config;
use crate::pallets::{Code, Quantity, Submission, format_date};

#[derive(Args, Debug)]
pub struct InterpretArgs {
    #[command(flatten)]
    pub input: TextInput,

    /// Report date as DD/MM/YYYY (default: today)
    #[arg(short, long, value_parser = date_arg)]
    pub date: Option<NaiveDate>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Machine-readable interpretation result
#[derive(Debug, Serialize)]
struct InterpretSummary {
    date: String,
    rows: Vec<SummaryRow>,
    total: u64,
    not_in_template: Vec<Code>,
    skipped: Vec<SkippedCode>,
}

#[derive(Debug, Serialize)]
struct SummaryRow {
    code: Code,
    quantity: Quantity,
}

#[derive(Debug, Serialize)]
struct SkippedCode {
    code: Code,
    reason: String,
}

impl InterpretSummary {
    fn from_submission(submission: &Submission) -> Self {
        Self {
            date: format_date(submission.date()),
            rows: submission
                .review_rows()
                .into_iter()
                .map(|(code, quantity)| SummaryRow { code, quantity })
                .collect(),
            total: submission.valid().total(),
            not_in_template: submission.rejected().to_vec(),
            skipped: submission
                .skipped()
                .map(|e| SkippedCode {
                    code: e.code,
                    reason: e.diagnostic.as_ref().map(|d| d.to_string()).unwrap_or_default(),
                })
                .collect(),
        }
    }
}

pub fn handle_interpret_command(args: InterpretArgs, config: &Config) -> Result<()> {
    let text = args.input.read()?;
    let template = load_reference(config)?;
    let date = args.date.unwrap_or_else(today);

    let submission = Submission::interpret(&text, &template.reference, date)?;

    if args.json {
        let summary = InterpretSummary::from_submission(&submission);
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} {} codes for {}",
        "Interpreted".green().bold(),
        submission.valid().len(),
        format_date(date).bright_white()
    );
    println!();
    review::print_rows(&submission.review_rows(), &template.reference);
    println!();
    println!("  Total pallets: {}", submission.valid().total().to_string().bold());

    review::print_feedback(&submission, &text);

    Ok(())
}
