// gridcell CLI - mask normalization and headless cell event replay

mod exit_codes;
mod replay;

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use gridcell_config::{CellProfiles, ConfigError};
use gridcell_engine::{CellOptions, CellValue};
use gridcell_mask::{
    apply_mask, convert_legacy_mask, extract_raw_value, is_mask_complete, MaskPreset,
};

use exit_codes::{EXIT_CELL, EXIT_INCOMPLETE, EXIT_IO, EXIT_PARSE, EXIT_SUCCESS, EXIT_USAGE};
use replay::ReplayError;

#[derive(Parser)]
#[command(name = "gridcell")]
#[command(about = "Data-grid cell masks and interaction replay")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format, unformat and check masked values
    #[command(subcommand)]
    Mask(MaskCommands),

    /// Drive a cell editor from a JSON-lines script of host events
    #[command(after_help = "\
Script lines (one JSON object per line, `#` lines ignored):
  {\"op\": \"focus\"}
  {\"op\": \"input\", \"value\": \"42\"}
  {\"op\": \"tick\", \"ms\": 300}
  {\"op\": \"key\", \"key\": \"Enter\"}
  {\"op\": \"blur\", \"relatedTarget\": 7}

Examples:
  gridcell replay --script session.jsonl --options cells.toml --column phone
  gridcell replay --script session.jsonl --value '\"draft\"'")]
    Replay {
        /// Script file (JSON lines)
        #[arg(long, short = 's')]
        script: PathBuf,

        /// Profile file (.json or .toml); defaults to the user config
        #[arg(long, short = 'o')]
        options: Option<PathBuf>,

        /// Column whose options to use
        #[arg(long, short = 'c')]
        column: Option<String>,

        /// Initial cell value as JSON (bare text is taken as a string)
        #[arg(long)]
        value: Option<String>,
    },
}

#[derive(Subcommand)]
enum MaskCommands {
    /// Format raw input through a mask
    #[command(after_help = "\
Examples:
  gridcell mask apply 5551234567 --pattern '(000) 000-0000'
  gridcell mask apply 12252024 --preset dateUS")]
    Apply {
        raw: String,
        #[command(flatten)]
        mask: MaskArgs,
    },

    /// Strip mask literals, leaving the raw characters
    Extract {
        masked: String,
        #[command(flatten)]
        mask: MaskArgs,
    },

    /// Exit 0 if every placeholder is filled, 1 otherwise
    Check {
        value: String,
        #[command(flatten)]
        mask: MaskArgs,
    },

    /// Rewrite a legacy mask (`9` placeholders) to current syntax
    Convert { legacy: String },

    /// Print a preset's pattern, or list all presets
    Preset { name: Option<String> },
}

#[derive(Args)]
struct MaskArgs {
    /// Mask pattern (0 digit, a letter, * any)
    #[arg(long, short = 'p', conflicts_with = "preset")]
    pattern: Option<String>,

    /// Named preset (phoneUS, ssn, dateUS, ...)
    #[arg(long)]
    preset: Option<String>,
}

impl MaskArgs {
    fn resolve(&self) -> Result<Option<String>, CliError> {
        match (&self.pattern, &self.preset) {
            (Some(pattern), _) => Ok(Some(convert_legacy_mask(pattern))),
            (None, Some(key)) => {
                let preset = MaskPreset::from_key(key)
                    .ok_or_else(|| CliError::args(format!("unknown mask preset '{key}'")).with_hint(preset_hint()))?;
                Ok(preset.pattern().map(str::to_string))
            }
            (None, None) => Ok(None),
        }
    }
}

pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    /// Exit with a code but print nothing.
    pub fn silent(code: u8) -> Self {
        Self { code, message: String::new(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io { .. } => CliError::io(err.to_string()),
            ConfigError::UnsupportedFormat(_) => CliError::args(err.to_string()),
            ConfigError::Parse { .. } | ConfigError::Serialize(_) => CliError::parse(err.to_string()),
        }
    }
}

impl From<ReplayError> for CliError {
    fn from(err: ReplayError) -> Self {
        let code = match err {
            ReplayError::Io(_) => EXIT_IO,
            ReplayError::Script { .. } => EXIT_PARSE,
            ReplayError::Cell(_) => EXIT_CELL,
        };
        Self { code, message: err.to_string(), hint: None }
    }
}

fn preset_hint() -> String {
    let keys: Vec<&str> = MaskPreset::ALL.iter().map(|p| p.key()).collect();
    format!("available presets: {}", keys.join(", "))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Mask(command) => cmd_mask(command),
        Commands::Replay { script, options, column, value } => {
            cmd_replay(script, options, column, value)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn cmd_mask(command: MaskCommands) -> Result<(), CliError> {
    match command {
        MaskCommands::Apply { raw, mask } => {
            println!("{}", apply_mask(&raw, mask.resolve()?.as_deref()));
        }
        MaskCommands::Extract { masked, mask } => {
            println!("{}", extract_raw_value(&masked, mask.resolve()?.as_deref()));
        }
        MaskCommands::Check { value, mask } => {
            if !is_mask_complete(&value, mask.resolve()?.as_deref()) {
                return Err(CliError::silent(EXIT_INCOMPLETE));
            }
        }
        MaskCommands::Convert { legacy } => {
            println!("{}", convert_legacy_mask(&legacy));
        }
        MaskCommands::Preset { name: Some(name) } => {
            let preset = MaskPreset::from_key(&name)
                .ok_or_else(|| CliError::args(format!("unknown mask preset '{name}'")).with_hint(preset_hint()))?;
            println!("{}", preset.pattern().unwrap_or(""));
        }
        MaskCommands::Preset { name: None } => {
            for preset in MaskPreset::ALL {
                println!("{:<12} {}", preset.key(), preset.pattern().unwrap_or("-"));
            }
        }
    }
    Ok(())
}

fn cmd_replay(
    script: PathBuf,
    options: Option<PathBuf>,
    column: Option<String>,
    value: Option<String>,
) -> Result<(), CliError> {
    let profiles = match &options {
        Some(path) => CellProfiles::load_from(path)?,
        None => CellProfiles::load(),
    };
    let options: CellOptions = match &column {
        Some(column) => profiles.options_for(column).clone(),
        None => profiles.defaults.clone(),
    };
    let initial = value.as_deref().map(parse_value).unwrap_or_default();

    let file = File::open(&script)
        .map_err(|e| CliError::io(format!("{}: {}", script.display(), e)))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = replay::run(BufReader::new(file), &options, initial, &mut out)?;
    out.flush().map_err(|e| CliError::io(e.to_string()))?;

    log::info!(
        "replayed {} ops, {} events, final state {:?}",
        summary.operations,
        summary.events,
        summary.state
    );
    Ok(())
}

/// JSON if it parses, otherwise the literal text.
fn parse_value(raw: &str) -> CellValue {
    serde_json::from_str(raw).unwrap_or_else(|_| CellValue::text(raw))
}
