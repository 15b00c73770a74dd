// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::Write;
use std::path::{Path, PathBuf};
use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use hansub::app_config::{self, Config};
use hansub::export::{parse_json, parse_srt};
use hansub::{
    ExportFormat, GenerationRequest, JitterAlignment, ParticleSelector, SubtitleEditor,
    SubtitleEntry, SubtitleGenerator,
};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for ExportFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFormat {
    Srt,
    Vtt,
    Ass,
    Json,
}

impl From<CliFormat> for ExportFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Srt => ExportFormat::Srt,
            CliFormat::Vtt => ExportFormat::Vtt,
            CliFormat::Ass => ExportFormat::Ass,
            CliFormat::Json => ExportFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate timed subtitles from a JSON request of text sections
    Generate {
        /// Request file: {"sections": [{"text", "durationSeconds"}], "language", ...}
        #[arg(value_name = "REQUEST_JSON")]
        request: PathBuf,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<CliFormat>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Apply simulated alignment jitter of up to N ms
        #[arg(long, value_name = "N")]
        align_jitter_ms: Option<u64>,
    },

    /// Convert an SRT or JSON subtitle file to another format
    Convert {
        /// Input file (.srt or .json)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum)]
        format: CliFormat,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report timing and text problems in an SRT or JSON subtitle file
    Validate {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Normalize Korean particles in a piece of text
    Particles {
        text: String,
    },

    /// Generate shell completions for hansub
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// hansub - Korean-aware subtitle timing and editing
#[derive(Parser, Debug)]
#[command(name = "hansub")]
#[command(version)]
#[command(about = "Korean-aware subtitle generation, validation and conversion")]
#[command(long_about = "hansub turns sections of generated text into timed subtitles, fixing Korean particles on the way.

EXAMPLES:
    hansub generate request.json -f srt -o out.srt   # Generate SRT from text sections
    hansub generate request.json --align-jitter-ms 80 # Nudge timings with simulated alignment
    hansub convert movie.srt -f ass -o movie.ass      # Convert between formats
    hansub validate movie.srt                         # Print warnings
    hansub particles \"개발가 시작됩니다\"            # Fix particles
    hansub completions bash > hansub.bash             # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and marker for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "❌"),
            Level::Warn => ("\x1B[1;33m", "🚧"),
            Level::Info => ("\x1B[1;32m", " "),
            Level::Debug => ("\x1B[1;36m", "🔍"),
            Level::Trace => ("\x1B[1;35m", "📋"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, marker) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
                colour, now, marker, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Trace is the ceiling; the effective level is set once config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "hansub", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config)?;
    if let Some(level) = cli.log_level.clone() {
        config.log_level = level.into();
    }
    log::set_max_level(LevelFilter::from(&config.log_level));
    config.validate().context("Configuration validation failed")?;

    match cli.command {
        Commands::Generate { request, format, output, align_jitter_ms } => {
            run_generate(&config, &request, format, output.as_deref(), align_jitter_ms).await
        }
        Commands::Convert { input, format, output } => {
            run_convert(&config, &input, format.into(), output.as_deref())
        }
        Commands::Validate { input } => run_validate(&config, &input),
        Commands::Particles { text } => {
            println!("{}", ParticleSelector::process_text(&text));
            Ok(())
        }
        Commands::Completions { .. } => Ok(()),
    }
}

async fn run_generate(
    config: &Config,
    request_path: &Path,
    format: Option<CliFormat>,
    output: Option<&Path>,
    align_jitter_ms: Option<u64>,
) -> Result<()> {
    let content = std::fs::read_to_string(request_path)
        .context(format!("Failed to read request file: {}", request_path.display()))?;
    let request: GenerationRequest = serde_json::from_str(&content)
        .context(format!("Failed to parse request file: {}", request_path.display()))?;

    let entries = SubtitleGenerator::new(config).generate(&request);
    let mut editor = SubtitleEditor::new(config);
    editor.load(entries)?;

    if let Some(max_jitter_ms) = align_jitter_ms {
        editor.auto_align(&JitterAlignment::new(max_jitter_ms)).await?;
    }

    for warning in editor.validate() {
        warn!("{}", warning);
    }

    let format = match format {
        Some(format) => format.into(),
        None => config.export.default_format.parse::<ExportFormat>()?,
    };
    write_output(&editor.export(format)?, output)
}

fn run_convert(config: &Config, input: &Path, format: ExportFormat, output: Option<&Path>) -> Result<()> {
    let entries = read_subtitles(input)?;
    let mut editor = SubtitleEditor::new(config);
    editor.load(entries)?;
    write_output(&editor.export(format)?, output)
}

fn run_validate(config: &Config, input: &Path) -> Result<()> {
    let entries = read_subtitles(input)?;
    let warnings = hansub::validate_subtitles(&entries, &config.timing);

    if warnings.is_empty() {
        info!("{}: {} subtitles, no problems found", input.display(), entries.len());
        return Ok(());
    }

    for warning in &warnings {
        println!("{}", warning);
    }
    Err(anyhow!("{} problems found in {}", warnings.len(), input.display()))
}

fn read_subtitles(input: &Path) -> Result<Vec<SubtitleEntry>> {
    let content = std::fs::read_to_string(input)
        .context(format!("Failed to read subtitle file: {}", input.display()))?;

    let extension = input
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    let entries = match extension.as_str() {
        "json" => parse_json(&content)?,
        "srt" => parse_srt(&content)?,
        other => return Err(anyhow!("Unsupported input format: '{}'", other)),
    };
    info!("Read {} subtitles from {}", entries.len(), input.display());
    Ok(entries)
}

fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .context(format!("Failed to write output file: {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}
