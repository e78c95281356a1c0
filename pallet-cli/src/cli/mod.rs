//! Command-line surface

pub mod commands;
pub mod review;

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};

use crate::config::Config;
use crate::pallets::parse_date;
use crate::template::{Template, load_template};

#[derive(Subcommand)]
pub enum Commands {
    /// Read the counts and show what would be reported, without writing files
    Interpret(commands::interpret::InterpretArgs),
    /// Read, review and write the filled spreadsheet (and PDF)
    Generate(commands::generate::GenerateArgs),
    /// List the location codes of the reference template
    Codes(commands::codes::CodesArgs),
}

/// Where the operator text comes from
#[derive(Args, Debug, Clone)]
pub struct TextInput {
    /// Counts as typed, e.g. "S21 - 6, S31 - 9" ("-" reads stdin)
    pub text: Option<String>,

    /// Read the counts from a file
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

impl TextInput {
    pub fn read(&self) -> Result<String> {
        match (&self.text, &self.file) {
            (Some(_), Some(_)) => {
                anyhow::bail!("Cannot specify both counts text and --file option")
            }
            (None, None) => {
                anyhow::bail!("Either provide the counts text or use --file to read them from a file")
            }
            (Some(text), None) if text == "-" => {
                let mut buffer = String::new();
                std::io::stdin()
                    .read_to_string(&mut buffer)
                    .context("Failed to read counts from stdin")?;
                Ok(buffer)
            }
            (Some(text), None) => Ok(text.clone()),
            (None, Some(path)) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read counts file: {}", path.display())),
        }
    }
}

/// `--date` value parser
pub fn date_arg(input: &str) -> Result<NaiveDate, String> {
    parse_date(input).map_err(|e| format!("expected DD/MM/YYYY ({})", e))
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Load the reference template named by the configuration
pub fn load_reference(config: &Config) -> Result<Template> {
    let layout = config.template_layout()?;
    Ok(load_template(&config.template.path, &layout)?)
}
