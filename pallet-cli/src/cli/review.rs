//! Terminal review of interpreted rows
//!
//! The row set is fixed: the operator can change quantities but not add or
//! remove codes. Overrides naming other codes, and repeated overrides, are
//! passed through as extra rows so the resolver can judge them.

use std::collections::HashSet;

use anyhow::Result;
use colored::*;
use dialoguer::{Confirm, Input};

use crate::pallets::{Code, Quantity, ReferenceSheet, Submission};

/// `--set` value parser: `S21=7` (or `S21:7`)
pub fn parse_override(input: &str) -> Result<(Code, Quantity), String> {
    let (code, qty) = input
        .split_once(['=', ':'])
        .ok_or_else(|| format!("'{}' should look like S21=7", input))?;

    let code = Code::parse(code).map_err(|e| e.to_string())?;
    let qty = qty
        .trim()
        .parse::<Quantity>()
        .map_err(|_| format!("'{}' is not a valid pallet count", qty.trim()))?;

    Ok((code, qty))
}

/// Apply overrides in order
///
/// The first override for a listed code replaces that row's quantity. Any
/// further override for the same code, and any override for an unlisted
/// code, is appended as an extra row.
pub fn apply_overrides(rows: &mut Vec<(Code, Quantity)>, overrides: &[(Code, Quantity)]) {
    let listed = rows.len();
    let mut replaced = HashSet::new();

    for &(code, qty) in overrides {
        let position = rows[..listed].iter().position(|(c, _)| *c == code);
        match position {
            Some(idx) if replaced.insert(code) => rows[idx].1 = qty,
            _ => rows.push((code, qty)),
        }
    }
}

/// Print rows as a unit / code / quantity table
pub fn print_rows(rows: &[(Code, Quantity)], reference: &ReferenceSheet) {
    let label_width = rows
        .iter()
        .map(|(code, _)| label_for(reference, code).chars().count())
        .max()
        .unwrap_or(0)
        .max("Unit".len());

    println!(
        "  {:<width$}  {:<6}  {:>8}",
        "Unit".bold(),
        "Code".bold(),
        "Pallets".bold(),
        width = label_width
    );
    for (code, qty) in rows {
        println!(
            "  {:<width$}  {:<6}  {:>8}",
            label_for(reference, code),
            code.as_str().cyan(),
            qty,
            width = label_width
        );
    }
}

/// Print warnings for codes that will not reach the report
///
/// `text` is the interpreted input, used to quote each skipped occurrence.
pub fn print_feedback(submission: &Submission, text: &str) {
    for skipped in submission.skipped() {
        let reason = skipped
            .diagnostic
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_default();
        println!(
            "  {} {}: {} (at \"{}\")",
            "skipped".yellow(),
            skipped.code,
            reason,
            skipped.matched(text).dimmed()
        );
    }
    for code in submission.rejected() {
        println!("  {} {}: not in the template", "ignored".yellow(), code);
    }
}

/// Ask for a new quantity per row; Enter keeps the current value
pub fn prompt_edits(rows: &mut [(Code, Quantity)], reference: &ReferenceSheet) -> Result<()> {
    let edit = Confirm::new()
        .with_prompt("Edit any quantity?")
        .default(false)
        .interact()?;
    if !edit {
        return Ok(());
    }

    for (code, qty) in rows.iter_mut() {
        let label = label_for(reference, code);
        let prompt = if label.is_empty() {
            code.to_string()
        } else {
            format!("{} ({})", code, label)
        };
        *qty = Input::<Quantity>::new()
            .with_prompt(prompt)
            .default(*qty)
            .interact_text()?;
    }

    Ok(())
}

pub fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(true).interact()?)
}

fn label_for<'a>(reference: &'a ReferenceSheet, code: &Code) -> &'a str {
    reference
        .rows()
        .iter()
        .find(|r| &r.code == code)
        .map(|r| r.label.as_str())
        .unwrap_or("")
}
