use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::*;

mod cli;
mod config;
mod pallets;
mod template;

use cli::Commands;
use config::Config;
use pallets::PipelineError;
use template::TemplateError;

#[derive(Parser)]
#[command(name = "pallet-cli")]
#[command(about = "Turn free-form pallet counts into the warehouse control spreadsheet")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/pallet-cli/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reference template, overrides the configured path
    #[arg(long, global = true)]
    template: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_error(&err),
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = cli.template {
        config.template.path = path;
    }

    match cli.command {
        Commands::Interpret(args) => cli::commands::interpret::handle_interpret_command(args, &config),
        Commands::Generate(args) => cli::commands::generate::handle_generate_command(args, &config),
        Commands::Codes(args) => cli::commands::codes::handle_codes_command(args, &config),
    }
}

/// Bad input, broken deployment and everything else get distinct messages and exit codes
fn report_error(err: &anyhow::Error) -> ExitCode {
    if let Some(pipeline) = err.downcast_ref::<PipelineError>() {
        eprintln!("{} {}", "Warning:".yellow().bold(), pipeline);
        eprintln!("{}", pipeline_hint(pipeline));
        return ExitCode::from(1);
    }

    if let Some(template) = err.downcast_ref::<TemplateError>() {
        eprintln!("{} {}", "Configuration error:".red().bold(), template);
        eprintln!(
            "Set template.path in the config file, {} or --template.",
            config::TEMPLATE_ENV
        );
        return ExitCode::from(2);
    }

    eprintln!("{} {:#}", "Error:".red().bold(), err);
    ExitCode::from(3)
}

fn pipeline_hint(err: &PipelineError) -> &'static str {
    match err {
        PipelineError::NoValidCodesFound { .. } => "Correct the text and interpret again.",
        PipelineError::Review(_) => {
            "Check the --set values and reviewed quantities, then generate again."
        }
    }
}
