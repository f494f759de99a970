use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use quill_common::error::ResultExt;
use quill_common::logging::init_logging;
use quill_common::{Error, QuillConfig, Validate};
use quill_voice::{VoiceAnalysisResult, VoiceAnalyzer};

/// Quill Voice - character voice analysis for stories.
#[derive(Parser, Debug)]
#[command(name = "quill-voice")]
#[command(author = "theonlyhennygod")]
#[command(version = "0.1.0")]
#[command(about = "Analyze character voices in narrative text.", long_about = None)]
struct Cli {
    /// Config file (default: ~/.quill/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format (pretty, json)
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze every character voice in a story and print the result as JSON
    Analyze {
        /// Story text file, or "-" for stdin
        file: PathBuf,
    },

    /// Compare character voices between a draft and its revision
    Compare {
        /// Draft story text
        draft: PathBuf,

        /// Revised story text
        revised: PathBuf,

        /// Inputs are saved analysis JSON instead of story text
        #[arg(long)]
        analyses: bool,
    },

    /// Print a pass/fail voice verdict for a story
    Validate {
        /// Story text file, or "-" for stdin
        file: PathBuf,
    },
}

fn read_input(path: &Path) -> quill_common::Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read story from stdin")?;
        return Ok(buffer);
    }
    if !path.exists() {
        return Err(Error::NotFound(path.display().to_string()));
    }
    std::fs::read_to_string(path).context(format!("Failed to read {}", path.display()))
}

fn read_analysis(path: &Path) -> quill_common::Result<VoiceAnalysisResult> {
    let content = read_input(path)?;
    serde_json::from_str(&content)
        .context(format!("Failed to parse voice analysis from {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Load and validate configuration; both failures exit with the config code.
fn load_config(path: Option<&Path>) -> quill_common::Result<QuillConfig> {
    let config =
        QuillConfig::load_with_env(path).map_err(|e| Error::Config(format!("{e:#}")))?;
    config.validate()?;
    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e.downcast_ref::<Error>().map_or(1, Error::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let log_level = cli.log_level.as_deref().unwrap_or(&config.observability.log_level);
    let log_format = cli.log_format.as_deref().unwrap_or(&config.observability.log_format);
    init_logging(log_level, log_format);

    let analyzer = VoiceAnalyzer::from_config(config.voice);

    match cli.command {
        Commands::Analyze { file } => {
            let text = read_input(&file)?;
            print_json(&analyzer.analyze(&text, None))
        }
        Commands::Compare {
            draft,
            revised,
            analyses,
        } => {
            let (draft, revised) = if analyses {
                (read_analysis(&draft)?, read_analysis(&revised)?)
            } else {
                (
                    analyzer.analyze(&read_input(&draft)?, None),
                    analyzer.analyze(&read_input(&revised)?, None),
                )
            };
            print_json(&analyzer.compare_stages(Some(&draft), Some(&revised), None))
        }
        Commands::Validate { file } => {
            let text = read_input(&file)?;
            print_json(&analyzer.validate(&text, None))
        }
    }
}
