//! Codes command: list the template's reference rows

use anyhow::Result;
use clap::Args;
use colored::*;

use crate::cli::load_reference;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct CodesArgs {
    /// Print the rows as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn handle_codes_command(args: CodesArgs, config: &Config) -> Result<()> {
    let template = load_reference(config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(template.reference.rows())?);
        return Ok(());
    }

    println!(
        "{} ({} codes, sheet '{}')",
        config.template.path.display().to_string().cyan(),
        template.reference.len(),
        template.sheet_name
    );
    for row in template.reference.rows() {
        println!("  {:>4}  {}  {}", row.row + 1, row.code.as_str().bold(), row.label);
    }

    Ok(())
}
