//! Generate command: interpret, review, confirm and write the documents

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use colored::*;
use is_terminal::IsTerminal;

use crate::cli::{TextInput, date_arg, load_reference, review, today};
use crate::config::Config;
use crate::pallets::{Code, Quantity, Submission, format_date, report};
use crate::template::{fill_template, render_pdf};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub input: TextInput,

    /// Report date as DD/MM/YYYY (default: today)
    #[arg(short, long, value_parser = date_arg)]
    pub date: Option<NaiveDate>,

    /// Change a quantity before generating, e.g. --set S21=7 (repeatable)
    #[arg(long = "set", value_name = "CODE=QTY", value_parser = review::parse_override)]
    pub overrides: Vec<(Code, Quantity)>,

    /// Also write the PDF report
    #[arg(long)]
    pub pdf: bool,

    /// Skip the interactive review and confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Output directory (default: configured output.directory)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

pub fn handle_generate_command(args: GenerateArgs, config: &Config) -> Result<()> {
    let text = args.input.read()?;
    let template = load_reference(config)?;
    let layout = config.template_layout()?;
    let date = args.date.unwrap_or_else(today);

    let submission = Submission::interpret(&text, &template.reference, date)?;

    println!(
        "{} {} codes for {}",
        "Interpreted".green().bold(),
        submission.valid().len(),
        format_date(date).bright_white()
    );
    review::print_feedback(&submission, &text);

    let mut rows = submission.review_rows();
    review::apply_overrides(&mut rows, &args.overrides);

    let interactive = !args.yes && std::io::stdin().is_terminal();
    if interactive {
        println!();
        review::print_rows(&rows, &template.reference);
        println!();
        review::prompt_edits(&mut rows, &template.reference)?;
    }

    println!();
    review::print_rows(&rows, &template.reference);
    println!();

    if interactive && !review::confirm("Generate the spreadsheet?")? {
        println!("{}", "Cancelled, nothing written.".yellow());
        return Ok(());
    }

    let confirmed = submission.confirm(&rows, config.duplicate_policy())?;
    let date_str = confirmed.date_string();
    let report_rows = confirmed.report_rows(&template.reference);
    let stem = report::file_stem(&config.output.file_prefix, &date_str);
    let out_dir = args.output.as_deref().unwrap_or(&config.output.directory);

    let xlsx = fill_template(&template, &layout, &date_str, &report_rows)?;
    let xlsx_path = write_output(out_dir, &format!("{}.xlsx", stem), &xlsx)?;
    println!("{} {}", "Spreadsheet:".green().bold(), xlsx_path.display());

    if args.pdf || config.output.always_pdf {
        let pdf = render_pdf(&config.output.pdf_title, &date_str, &report_rows)?;
        let pdf_path = write_output(out_dir, &format!("{}.pdf", stem), &pdf)?;
        println!("{} {}", "PDF report:".green().bold(), pdf_path.display());
    }

    println!(
        "  {} codes in template, {} pallets in total",
        report_rows.len(),
        report::total(&report_rows)
    );

    Ok(())
}

fn write_output(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let path = dir.join(file_name);
    fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}
